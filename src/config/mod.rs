//! Configuration module for finplan
//!
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::FinplanPaths;
pub use settings::Settings;
