//! Storage module for persisting fetched records
//!
//! Crawl state lives entirely in the output directory: a code counts as
//! harvested when its record file exists. There is no manifest and no
//! database.

mod json_file;
mod traits;

pub use json_file::JsonFileStore;
pub use traits::{RecordStore, StoreError, StoreResult};
