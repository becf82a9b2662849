#![forbid(unsafe_code)]
//! dirsize — disk usage of a directory tree, as a sorted tree or a flat listing.

pub mod cli;
pub mod error;
pub mod ignore;
pub mod render;
pub mod report;
pub mod size;
pub mod tree;
