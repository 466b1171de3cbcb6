//! Filesystem abstraction for tgdeps.
//!
//! This crate provides a `FileSystem` trait with a native implementation
//! (`std::fs` behind `tokio::task::spawn_blocking`) and an in-memory one for
//! hosts without a disk and for tests.
//!
//! # Example
//!
//! ```no_run
//! use tgdeps_fs::{DiscoveryOptions, FileSystem, NativeFileSystem};
//!
//! # #[tokio::main]
//! # async fn main() -> std::io::Result<()> {
//! let fs = NativeFileSystem::new(".")?;
//! let configs = fs
//!     .discover_files(fs.project_root(), &["terragrunt.hcl"], &[], &DiscoveryOptions::default())
//!     .await?;
//! println!("{} units", configs.len());
//! # Ok(())
//! # }
//! ```

mod file_system;
pub use file_system::{DiscoveryOptions, FileMetadata, FileSystem};

#[cfg(feature = "native")]
pub mod native;
#[cfg(feature = "native")]
pub use native::NativeFileSystem;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "memory")]
pub use memory::MemoryFileSystem;

#[cfg(feature = "native")]
pub use NativeFileSystem as DefaultFileSystem;

#[cfg(all(not(feature = "native"), feature = "memory"))]
pub use MemoryFileSystem as DefaultFileSystem;
