//! Application state

pub mod ico;
