//! Circular dependency formatter.

use colored::Colorize;
use std::fmt::{self, Write};

pub fn write_cycles<'a, F>(out: &mut String, cycles: &'a [Vec<String>], short: F) -> fmt::Result
where
    F: Fn(&'a str) -> &'a str,
{
    writeln!(out, "\n🔄 Circular Dependencies ({}):", cycles.len())?;
    for (idx, cycle) in cycles.iter().enumerate() {
        // Closed walk: the first module is repeated at the end.
        let modules = cycle.len().saturating_sub(1).max(1);
        writeln!(
            out,
            "  {}  Cycle {} ({} modules):",
            "⚠️".red(),
            idx + 1,
            modules
        )?;
        let cycle_str = cycle
            .iter()
            .map(|id| short(id.as_str()))
            .collect::<Vec<_>>()
            .join(" → ");
        writeln!(out, "     {}", cycle_str)?;
    }
    Ok(())
}
