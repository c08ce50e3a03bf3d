pub mod classifier;
pub mod config;
pub mod decision;
pub mod error;
pub mod last_action;
pub mod orchestrator;
pub mod ports;
pub mod types;
pub mod window;

pub use error::{CleanupError, RemoteCall, Result};
