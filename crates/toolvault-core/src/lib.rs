//! # ToolVault Core
//!
//! Canonical types shared by every ToolVault crate: the output type
//! enumeration, rendering hints, detection results, errors and configuration.
//!
//! ## Core Modules
//!
//! - [`models`] - `OutputType`, `OutputMetadata`, `DetectionResult`, `RenderMode`
//! - [`error`] - Error types and the `Result` alias
//! - [`config`] - Configuration structure and store directory resolution
//! - [`profiles`] - Configuration profiles for different environments
//!
//! ## Usage Examples
//!
//! ```
//! use toolvault_core::prelude::*;
//! use serde_json::json;
//!
//! let meta = OutputMetadata::from_value(json!({"type": "table"})).unwrap();
//! assert_eq!(meta.output_type().unwrap(), Some(OutputType::Table));
//!
//! let result = DetectionResult::new(OutputType::Chart, 1.2);
//! assert_eq!(result.confidence, 1.0);
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod profiles;

pub use config::{ToolVaultConfig, default_store_dir};
pub use error::{Error, Result};
pub use models::*;
pub use profiles::ConfigProfile;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ToolVaultConfig;
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        DetectionResult, OutputMetadata, OutputType, RenderMode, clamp_confidence, json_kind,
    };
    pub use crate::profiles::ConfigProfile;
}
