/// Utility modules for error handling, logging and parameter checks
pub mod error;
pub mod logger;
pub mod params;

// Re-export commonly used types
pub use error::{ClassifierError, Result};
pub use params::{accuracy_ratio, clamp_k};
