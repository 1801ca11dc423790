//! Tunnel discovery subsystem.
//!
//! # Data Flow
//! ```text
//! interfaces.d/gre*.conf
//!     → resolver.rs (list matching entries)
//!     → parser.rs (line declarations → TunnelDefinition)
//!     → target.rs (complete definition → Target, derive inside peer)
//!     → Resolution { targets, unprocessed }
//! ```
//!
//! # Design Decisions
//! - Targets are rebuilt from scratch every cycle; nothing is cached
//! - A broken entry never stops its siblings from being resolved
//! - Only filesystem reads, no shared state

pub mod parser;
pub mod resolver;
pub mod target;

pub use parser::TunnelDefinition;
pub use resolver::{Resolution, TargetResolver};
pub use target::Target;

use thiserror::Error;

/// Why a single tunnel definition could not become a [`Target`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("netmask {0} is not contiguous")]
    InvalidNetmask(std::net::Ipv4Addr),

    #[error("no peer address in {local}/{prefix}")]
    NoPeerAddress {
        local: std::net::Ipv4Addr,
        prefix: u8,
    },

    #[error("failed to read entry: {0}")]
    Io(#[from] std::io::Error),
}
