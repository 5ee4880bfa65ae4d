//! # Utilities Module
//!
//! Internal utility modules for the broadcast-core crate.

pub(crate) mod gas;
pub(crate) mod logger;

pub use gas::gwei_to_wei;
pub use logger::setup_logger;
