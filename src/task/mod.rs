//! External ingestion task
//!
//! The worker treats the scraper as an opaque process that exits with a
//! status code. `IngestTask` is the seam; `ProcessTask` is the real thing.

pub mod process;
pub mod traits;

pub use process::ProcessTask;
pub use traits::{IngestTask, TaskExit};
