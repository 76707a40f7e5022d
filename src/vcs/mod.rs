// src/vcs/mod.rs

//! Version-control side of a run: which files changed, and which of them
//! count.

pub mod filter;
pub mod git;

pub use filter::ChangeFilter;
pub use git::{changed_files, parse_name_only};
