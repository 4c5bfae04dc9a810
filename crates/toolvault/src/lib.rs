//! # ToolVault
//!
//! Command-line front end for output type detection and rendering.
//!
//! - [`cli`]: argument definitions
//! - [`settings`]: layered configuration (profile, file, environment)
//! - [`commands`]: `detect`, `render`, `history` and `templates`
//! - [`logging`]: `env_logger` setup
//!
//! The library crates do the real work:
//! [`toolvault_detect`] decides the type, [`toolvault_render`] draws it and
//! [`toolvault_store`] keeps history and templates.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;

pub use cli::Cli;
pub use commands::App;
pub use settings::load_config;

pub use toolvault_core::{OutputMetadata, OutputType, RenderMode, ToolVaultConfig};
pub use toolvault_detect::detect_output_type;
pub use toolvault_render::{OutputRenderer, RendererSet, TerminalRenderer};
