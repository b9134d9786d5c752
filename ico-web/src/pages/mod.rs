//! Page modules

pub mod ico;
pub mod status;

pub use ico::IcoPage;
pub use status::StatusPage;
