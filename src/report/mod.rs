//! Report renderers for merge results.
//!
//! - [`terminal`] - colored summary box; `--verbose` adds license and error
//!   tables, `--quiet` reduces it to one line.

pub mod terminal;
