//! Target resolution from the tunnel configuration directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::TunnelsConfig;
use crate::tunnel::{ParseError, Target, TunnelDefinition};

/// Result of one resolution pass.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Valid targets, in directory listing order.
    pub targets: Vec<Target>,
    /// Entries that matched the naming pattern but could not be used.
    pub unprocessed: Vec<PathBuf>,
}

impl Resolution {
    pub fn unprocessed_count(&self) -> usize {
        self.unprocessed.len()
    }
}

/// Builds the current target set from `interfaces.d`-style entries.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    config: TunnelsConfig,
}

impl TargetResolver {
    pub fn new(config: TunnelsConfig) -> Self {
        Self { config }
    }

    pub fn config_root(&self) -> &Path {
        &self.config.config_path
    }

    /// Resolve targets. An unreadable root yields an empty resolution.
    pub fn resolve(&self) -> Resolution {
        match self.try_resolve() {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::warn!(
                    path = %self.config.config_path.display(),
                    error = %e,
                    "Failed to list tunnel definitions, resolving zero targets"
                );
                Resolution::default()
            }
        }
    }

    /// Resolve targets, failing only if the root itself cannot be listed.
    pub fn try_resolve(&self) -> io::Result<Resolution> {
        let mut resolution = Resolution::default();

        for path in self.entries()? {
            match self.load_entry(&path) {
                Ok(target) => {
                    tracing::debug!(
                        path = %path.display(),
                        interface = %target.interface_name,
                        peer = %target.internal_peer_address,
                        prefix = target.prefix(),
                        "Resolved tunnel"
                    );
                    resolution.targets.push(target);
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Unprocessed tunnel definition");
                    resolution.unprocessed.push(path);
                }
            }
        }

        Ok(resolution)
    }

    fn entries(&self) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.config.config_path)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !self.matches_pattern(name) {
                continue;
            }
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            paths.push(entry.path());
        }
        Ok(paths)
    }

    fn matches_pattern(&self, file_name: &str) -> bool {
        let prefix = &self.config.file_prefix;
        let suffix = &self.config.file_suffix;
        file_name.len() >= prefix.len() + suffix.len()
            && file_name.starts_with(prefix.as_str())
            && file_name.ends_with(suffix.as_str())
    }

    fn load_entry(&self, path: &Path) -> Result<Target, ParseError> {
        let content = fs::read_to_string(path)?;
        TunnelDefinition::parse(&content, &self.config.interface_prefix).into_target()
    }
}
