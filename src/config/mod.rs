//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → cli.rs (command-line overrides)
//!     → validation.rs (semantic checks)
//!     → ExporterConfig (validated, immutable)
//!     → sections handed to each subsystem
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow running with no file at all
//! - Validation separates syntactic (serde) from semantic checks
//! - Tunnel definitions are not config: they are re-read every cycle

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use schema::ExporterConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProbeConfig;
pub use schema::SchedulerConfig;
pub use schema::TunnelsConfig;
