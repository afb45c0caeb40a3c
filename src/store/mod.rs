//! Record storage
//!
//! - `flat_file` - newline-separated flat file with backup and atomic rewrite
//! - `lock` - per-file write exclusion shared between store instances

pub mod flat_file;
pub mod lock;

pub use flat_file::FlatFileStore;
pub use lock::FileLockRegistry;
