//! `astrav.toml` configuration: how sources are discovered and where the
//! symbol tables live.

pub mod loader;
pub mod schema;

pub use loader::{discover, load_from_path, load_from_str, ConfigError, CONFIG_FILE_NAME};
pub use schema::{Config, LoadConfig, ValidationError, ValidationIssue};
