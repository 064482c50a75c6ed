//! portalscope library
//!
//! Session caches, search history and search orchestration for exploring Rick
//! and Morty locations, plus the remote API clients they are fed by. The
//! `portalscope` binary is a terminal UI over this library.

pub mod cache;
pub mod cli;
pub mod data;
pub mod history;
pub mod logging;
pub mod search;
