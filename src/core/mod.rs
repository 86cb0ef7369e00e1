//! Core module for cercatore
//!
//! This module contains the core types and the file discovery stage.

pub mod scanner;
mod types;

pub use scanner::discover_files;
pub use types::*;
