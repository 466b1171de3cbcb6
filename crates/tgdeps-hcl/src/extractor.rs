//! Record extraction from Terragrunt configuration text.
//!
//! This is a pattern-based reader, not an HCL evaluator. Block headers are
//! located with regexes and block bodies by brace matching that understands
//! strings and heredocs. Values are taken literally; interpolations such as
//! `"${get_terragrunt_dir()}/../vpc"` are kept as written.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::ops::Range;
use std::sync::LazyLock;
use tgdeps_core::{InputValue, ModuleRecord};

static DEPENDENCIES_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bdependencies\s*\{").expect("valid regex"));
static PATHS_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bpaths\s*=\s*\[([^\]]*)\]").expect("valid regex"));
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("valid regex"));

static DEPENDENCY_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bdependency\s+"[^"]*"\s*\{"#).expect("valid regex"));
static CONFIG_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*config_path\s*=\s*"([^"]*)""#).expect("valid regex"));

static INCLUDE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\binclude(?:\s+"[^"]*")?\s*\{"#).expect("valid regex"));
static PATH_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*path\s*=\s*"([^"]*)""#).expect("valid regex"));

static TERRAFORM_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bterraform\s*\{").expect("valid regex"));
static SOURCE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*source\s*=\s*"([^"]*)""#).expect("valid regex"));

static VERSION_CONSTRAINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*terragrunt_version_constraint\s*=\s*"([^"]*)""#).expect("valid regex")
});
static INPUTS_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*inputs\s*=\s*\{").expect("valid regex"));

/// Extracts a [`ModuleRecord`] from the text of one configuration file.
///
/// Dependency paths come from three places, in this order:
/// 1. the `paths` list of a `dependencies` block
/// 2. the `config_path` of each `dependency "name"` block
/// 3. the literal `path` of each `include` block
///
/// Repeated paths keep their first occurrence. Blank paths are skipped.
///
/// # Example
///
/// ```
/// use tgdeps_hcl::extract_record;
///
/// let record = extract_record(
///     "/live/app/terragrunt.hcl",
///     r#"
///     dependency "vpc" {
///       config_path = "../vpc"
///     }
///     inputs = {
///       name = "app"
///     }
///     "#,
/// );
///
/// assert_eq!(record.dependency_paths, vec!["../vpc"]);
/// assert_eq!(record.inputs.len(), 1);
/// ```
pub fn extract_record(identity: impl Into<String>, content: &str) -> ModuleRecord {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let stripped = strip_comments(content);
    let doc = Document::new(&stripped);
    let mut record = ModuleRecord::new(identity);

    record.dependency_paths = dependency_paths(&doc);
    record.source = doc
        .blocks(&TERRAFORM_BLOCK)
        .find_map(|body| capture(&SOURCE_ATTR, body));
    record.version_constraint = doc.attribute(&VERSION_CONSTRAINT);
    record.inputs = doc
        .blocks(&INPUTS_BLOCK)
        .next()
        .map(parse_inputs)
        .unwrap_or_default();

    record
}

/// Removes `#`, `//` and `/* */` comments, leaving strings and heredocs
/// untouched. Line breaks are preserved.
pub fn strip_comments(content: &str) -> String {
    let bytes = content.as_bytes();
    let mut out = String::with_capacity(content.len());
    let mut copy_from = 0;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(end) = skip_heredoc(content, i) {
            i = end;
            continue;
        }

        match bytes[i] {
            b'"' => i = scan_string(bytes, i).0,
            b'#' => {
                out.push_str(&content[copy_from..i]);
                i = line_end(bytes, i);
                copy_from = i;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                out.push_str(&content[copy_from..i]);
                i = line_end(bytes, i);
                copy_from = i;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                out.push_str(&content[copy_from..i]);
                i = match content[i + 2..].find("*/") {
                    Some(offset) => i + 2 + offset + 2,
                    None => bytes.len(),
                };
                out.push(' ');
                copy_from = i;
            }
            _ => i += 1,
        }
    }

    out.push_str(&content[copy_from..]);
    out
}

fn dependency_paths(doc: &Document<'_>) -> Vec<String> {
    let mut paths = Vec::new();

    for body in doc.blocks(&DEPENDENCIES_BLOCK) {
        if let Some(list) = PATHS_LIST.captures(body).and_then(|caps| caps.get(1)) {
            paths.extend(
                QUOTED
                    .captures_iter(list.as_str())
                    .filter_map(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string()),
            );
        }
    }

    paths.extend(doc.blocks(&DEPENDENCY_BLOCK).filter_map(|body| capture(&CONFIG_PATH, body)));
    paths.extend(doc.blocks(&INCLUDE_BLOCK).filter_map(|body| capture(&PATH_ATTR, body)));

    let mut seen = HashSet::new();
    paths.retain(|path| !path.trim().is_empty() && seen.insert(path.clone()));
    paths
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Comment-free configuration text plus the byte ranges of its heredocs.
/// Pattern matches starting inside a heredoc are embedded text, not
/// configuration, and are skipped.
struct Document<'a> {
    text: &'a str,
    heredocs: Vec<Range<usize>>,
}

impl<'a> Document<'a> {
    fn new(text: &'a str) -> Self {
        let bytes = text.as_bytes();
        let mut heredocs = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            if let Some(end) = skip_heredoc(text, i) {
                heredocs.push(i..end);
                i = end;
            } else if bytes[i] == b'"' {
                i = scan_string(bytes, i).0;
            } else {
                i += 1;
            }
        }

        Self { text, heredocs }
    }

    fn in_heredoc(&self, offset: usize) -> bool {
        self.heredocs.iter().any(|span| span.contains(&offset))
    }

    /// Bodies of every block whose header (ending in `{`) matches `header`.
    fn blocks<'s>(&'s self, header: &'s Regex) -> impl Iterator<Item = &'a str> + 's {
        header
            .find_iter(self.text)
            .filter(|m| !self.in_heredoc(m.start()))
            .filter_map(|m| block_body(self.text, m.end() - 1))
    }

    fn attribute(&self, pattern: &Regex) -> Option<String> {
        pattern
            .captures_iter(self.text)
            .filter_map(|caps| caps.get(1))
            .find(|m| !self.in_heredoc(m.start()))
            .map(|m| m.as_str().to_string())
    }
}

/// Text between the brace at `open` and its matching close brace.
fn block_body(content: &str, open: usize) -> Option<&str> {
    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        if let Some(end) = skip_heredoc(content, i) {
            i = end;
            continue;
        }

        match bytes[i] {
            b'"' => {
                i = scan_string(bytes, i).0;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&content[open + 1..i]);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Scans the string starting at the quote at `start`. Returns the index
/// just past the closing quote and whether one was found; an unterminated
/// string stops at the end of its line.
fn scan_string(bytes: &[u8], start: usize) -> (usize, bool) {
    let mut i = start + 1;
    let mut interpolation = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                interpolation += 1;
                i += 1;
            }
            b'{' if interpolation > 0 => interpolation += 1,
            b'}' if interpolation > 0 => interpolation -= 1,
            b'"' if interpolation == 0 => return (i + 1, true),
            b'\n' if interpolation == 0 => return (i, false),
            _ => {}
        }
        i += 1;
    }

    (bytes.len(), false)
}

/// If a heredoc (`<<EOF` or `<<-EOF`) starts at `start`, returns the index
/// just past its terminator line.
fn skip_heredoc(content: &str, start: usize) -> Option<usize> {
    let rest = content.get(start..)?.strip_prefix("<<")?;
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    let marker_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if marker_len == 0 {
        return None;
    }
    let marker = &rest[..marker_len];

    let body_start = start + content[start..].find('\n')? + 1;
    let mut offset = body_start;
    for line in content[body_start..].split_inclusive('\n') {
        offset += line.len();
        if line.trim() == marker {
            return Some(offset);
        }
    }

    Some(content.len())
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |pos| from + pos)
}

/// Literal `key = value` pairs of an `inputs` body. Entries whose value is
/// an expression rather than a literal are skipped.
fn parse_inputs(body: &str) -> BTreeMap<String, InputValue> {
    let mut cursor = Cursor { src: body, pos: 0 };
    cursor.parse_entries(false).unwrap_or_default()
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n' | b',')) {
            self.pos += 1;
        }
    }

    fn at_value_end(&mut self) -> bool {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
            self.pos += 1;
        }
        matches!(self.peek(), None | Some(b'\n' | b',' | b'}' | b']'))
    }

    /// Entries up to the end of input, or up to the closing brace when
    /// `nested`. A nested map containing any non-literal fails as a whole.
    fn parse_entries(&mut self, nested: bool) -> Option<BTreeMap<String, InputValue>> {
        let mut entries = BTreeMap::new();

        loop {
            self.skip_separators();
            match self.peek() {
                None if nested => return None,
                None => return Some(entries),
                Some(b'}') if nested => {
                    self.pos += 1;
                    return Some(entries);
                }
                _ => {}
            }

            let Some(key) = self.parse_key() else {
                if nested {
                    return None;
                }
                self.skip_expression();
                continue;
            };

            while matches!(self.peek(), Some(b' ' | b'\t')) {
                self.pos += 1;
            }
            if !(self.eat(b'=') || self.eat(b':')) {
                if nested {
                    return None;
                }
                self.skip_expression();
                continue;
            }
            self.skip_whitespace();

            let start = self.pos;
            match self.parse_value() {
                Some(value) if self.at_value_end() => {
                    entries.insert(key, value);
                }
                _ if nested => return None,
                _ => {
                    self.pos = start;
                    self.skip_expression();
                }
            }
        }
    }

    fn parse_key(&mut self) -> Option<String> {
        let bytes = self.src.as_bytes();
        match self.peek()? {
            b'"' => {
                let (end, terminated) = scan_string(bytes, self.pos);
                if !terminated {
                    return None;
                }
                let key = self.src[self.pos + 1..end - 1].to_string();
                self.pos = end;
                Some(key)
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let len = bytes[self.pos..]
                    .iter()
                    .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_' || **b == b'-')
                    .count();
                let key = self.src[self.pos..self.pos + len].to_string();
                self.pos += len;
                Some(key)
            }
            _ => None,
        }
    }

    fn parse_value(&mut self) -> Option<InputValue> {
        match self.peek()? {
            b'"' => self.parse_string().map(InputValue::String),
            b'[' => self.parse_list(),
            b'{' => {
                self.pos += 1;
                self.parse_entries(true).map(InputValue::Map)
            }
            b't' | b'f' => self.parse_bool(),
            b'-' | b'0'..=b'9' => self.parse_number(),
            _ => None,
        }
    }

    fn parse_string(&mut self) -> Option<String> {
        let (end, terminated) = scan_string(self.src.as_bytes(), self.pos);
        if !terminated {
            return None;
        }
        let raw = &self.src[self.pos + 1..end - 1];
        self.pos = end;
        Some(unescape(raw))
    }

    fn parse_list(&mut self) -> Option<InputValue> {
        self.pos += 1;
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            if self.eat(b']') {
                return Some(InputValue::List(items));
            }
            items.push(self.parse_value()?);
            self.skip_whitespace();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b']') {
                return Some(InputValue::List(items));
            }
            return None;
        }
    }

    fn parse_bool(&mut self) -> Option<InputValue> {
        let word_len = self.src.as_bytes()[self.pos..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_' || **b == b'.')
            .count();
        let value = match &self.src[self.pos..self.pos + word_len] {
            "true" => true,
            "false" => false,
            _ => return None,
        };
        self.pos += word_len;
        Some(InputValue::Bool(value))
    }

    fn parse_number(&mut self) -> Option<InputValue> {
        let len = self.src.as_bytes()[self.pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
            .count();
        let number = self.src[self.pos..self.pos + len].parse::<f64>().ok()?;
        self.pos += len;
        Some(InputValue::Number(number))
    }

    /// Advances past an expression that is not a literal: to the next
    /// newline or comma outside any brackets, strings or heredocs.
    fn skip_expression(&mut self) {
        let bytes = self.src.as_bytes();
        let mut depth = 0usize;

        while self.pos < bytes.len() {
            if let Some(end) = skip_heredoc(self.src, self.pos) {
                self.pos = end;
                continue;
            }

            match bytes[self.pos] {
                b'"' => {
                    self.pos = scan_string(bytes, self.pos).0;
                    continue;
                }
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                b'\n' | b',' if depth == 0 => return,
                _ => {}
            }
            self.pos += 1;
        }
    }
}

fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = "/live/prod/app/terragrunt.hcl";

    #[test]
    fn test_dependencies_block() {
        let record = extract_record(
            APP,
            r#"
dependencies {
  paths = ["../vpc", "../security-group"]
}
"#,
        );

        assert_eq!(record.dependency_paths, vec!["../vpc", "../security-group"]);
    }

    #[test]
    fn test_all_declaration_forms_in_order() {
        let record = extract_record(
            APP,
            r#"
include "root" {
  path = "../../root.hcl"
}

dependency "db" {
  config_path = "../db"

  mock_outputs = {
    endpoint = "localhost"
  }
}

dependencies {
  paths = ["../vpc"]
}
"#,
        );

        assert_eq!(
            record.dependency_paths,
            vec!["../vpc", "../db", "../../root.hcl"]
        );
    }

    #[test]
    fn test_repeated_paths_keep_first() {
        let record = extract_record(
            APP,
            r#"
dependencies {
  paths = ["../vpc", "../db"]
}
dependency "vpc" {
  config_path = "../vpc"
}
"#,
        );

        assert_eq!(record.dependency_paths, vec!["../vpc", "../db"]);
    }

    #[test]
    fn test_include_with_function_call_is_ignored() {
        let record = extract_record(
            APP,
            r#"
include {
  path = find_in_parent_folders()
}
"#,
        );

        assert!(record.dependency_paths.is_empty());
    }

    #[test]
    fn test_commented_out_dependencies_ignored() {
        let record = extract_record(
            APP,
            r#"
# dependency "old" {
#   config_path = "../old"
# }
// dependencies { paths = ["../legacy"] }
/*
dependency "gone" {
  config_path = "../gone"
}
*/
dependency "vpc" {
  config_path = "../vpc" # the network
}
"#,
        );

        assert_eq!(record.dependency_paths, vec!["../vpc"]);
    }

    #[test]
    fn test_comment_markers_inside_strings_survive() {
        let stripped = strip_comments(r#"source = "git::https://example.com/modules.git//vpc?ref=v1#x" # tail"#);
        assert_eq!(
            stripped.trim_end(),
            r#"source = "git::https://example.com/modules.git//vpc?ref=v1#x""#
        );
    }

    #[test]
    fn test_terraform_source_and_version_constraint() {
        let record = extract_record(
            APP,
            r#"
terragrunt_version_constraint = ">= 0.50.0"

terraform {
  source = "git::https://example.com/modules.git//app?ref=v1.2.0"

  extra_arguments "retry" {
    commands = ["apply"]
  }
}
"#,
        );

        assert_eq!(
            record.source.as_deref(),
            Some("git::https://example.com/modules.git//app?ref=v1.2.0")
        );
        assert_eq!(record.version_constraint.as_deref(), Some(">= 0.50.0"));
    }

    #[test]
    fn test_literal_inputs() {
        let record = extract_record(
            APP,
            r#"
inputs = {
  name          = "app"
  replicas      = 3
  ratio         = 0.5
  enabled       = true
  zones         = ["a", "b"]
  vpc_id        = dependency.vpc.outputs.vpc_id
  tags          = merge(local.tags, {
    team = "core"
  })
  prefix        = "${local.env}-app"
  "quoted-key"  = false
}
"#,
        );

        let inputs = &record.inputs;
        assert_eq!(inputs.get("name"), Some(&InputValue::from("app")));
        assert_eq!(inputs.get("replicas"), Some(&InputValue::Number(3.0)));
        assert_eq!(inputs.get("ratio"), Some(&InputValue::Number(0.5)));
        assert_eq!(inputs.get("enabled"), Some(&InputValue::Bool(true)));
        assert_eq!(
            inputs.get("zones"),
            Some(&InputValue::List(vec!["a".into(), "b".into()]))
        );
        assert_eq!(inputs.get("prefix"), Some(&InputValue::from("${local.env}-app")));
        assert_eq!(inputs.get("quoted-key"), Some(&InputValue::Bool(false)));
        assert!(!inputs.contains_key("vpc_id"));
        assert!(!inputs.contains_key("tags"));
        assert!(!inputs.contains_key("team"));
    }

    #[test]
    fn test_nested_literal_map_input() {
        let record = extract_record(
            APP,
            r#"
inputs = {
  tags = {
    env  = "prod"
    tier = 1
  }
}
"#,
        );

        let mut expected = BTreeMap::new();
        expected.insert("env".to_string(), InputValue::from("prod"));
        expected.insert("tier".to_string(), InputValue::Number(1.0));
        assert_eq!(record.inputs.get("tags"), Some(&InputValue::Map(expected)));
    }

    #[test]
    fn test_heredoc_does_not_confuse_blocks() {
        let record = extract_record(
            APP,
            r#"
generate "provider" {
  path     = "provider.tf"
  contents = <<EOF
provider "aws" {
  # dependency "fake" { config_path = "../fake" }
  region = "us-east-1"
EOF
}

dependency "vpc" {
  config_path = "../vpc"
}
"#,
        );

        assert_eq!(record.dependency_paths, vec!["../vpc"]);
    }

    #[test]
    fn test_empty_file() {
        let record = extract_record(APP, "");

        assert_eq!(record.identity, APP);
        assert!(record.dependency_paths.is_empty());
        assert!(record.inputs.is_empty());
        assert!(record.source.is_none());
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let record = extract_record(
            APP,
            "\u{feff}dependency \"vpc\" {\n  config_path = \"../vpc\"\n}\n",
        );
        assert_eq!(record.dependency_paths, vec!["../vpc"]);
    }

    #[test]
    fn test_non_ascii_identifiers() {
        let record = extract_record(
            APP,
            r#"
locals {
  région = "eu"
  équipe = <<EOT
café
EOT
}

dependency "vpc" {
  config_path = "../vpc"
}

inputs = {
  zône   = local.région
  name   = "app-ü"
  owner  = "ops"
}
"#,
        );

        assert_eq!(record.dependency_paths, vec!["../vpc"]);
        assert_eq!(record.inputs.get("name"), Some(&InputValue::from("app-ü")));
        assert_eq!(record.inputs.get("owner"), Some(&InputValue::from("ops")));
    }

    #[test]
    fn test_unterminated_block_is_ignored() {
        let record = extract_record(APP, "dependency \"vpc\" {\n  config_path = \"../vpc\"\n");
        assert!(record.dependency_paths.is_empty());
    }
}
