//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BotConfig (validated, immutable)
//!
//! environment
//!     → credentials.rs (four required variables, first missing is fatal)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the bot runs without a config file
//! - Secrets come only from the environment, never from the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod validation;

pub use credentials::{Credentials, CredentialsError};
pub use loader::{load_config, ConfigError};
pub use schema::{BotConfig, LogFormat, LoggingConfig, StreamConfig};
