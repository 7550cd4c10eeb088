//! Library components of the INCA import CLI.

pub mod import;
pub mod logging;
pub mod types;
