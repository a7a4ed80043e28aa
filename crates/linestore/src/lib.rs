//! # linestore
//!
//! Line-oriented access to append-only text datasets.
//!
//! ## Design
//! - Datasets are plain text files, one record per line
//! - Lookups stream the file from the start; memory is bounded by the
//!   read buffer plus the returned line
//! - Errors distinguish "line out of range" from "file unreadable"

#![warn(missing_docs)]

mod dataset;
mod error;
mod locator;

pub use dataset::{Dataset, DEFAULT_EXTENSION, SCAN_BUFFER_SIZE};
pub use error::{Error, Result};
pub use locator::{locate, LineLocator};
