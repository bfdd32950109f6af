//! Utility functions

pub mod time;

pub use time::now_secs;
