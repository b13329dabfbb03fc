//! Utility functions

mod filename;

pub use filename::{attachment_disposition, output_filename, sanitize_filename};
