//! Reference classification and validation.
//!
//! Turns operator input into a [`Reference`]: a magnet link, a local
//! descriptor (`.torrent`) file, or a URL to a remote descriptor. The checks
//! run in a fixed order and the first match wins; only a file-existence check
//! touches the outside world.

mod error;

pub use error::ValidationError;

use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::config::{Config, ConfigError};

/// The shape a validated reference took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    Magnet(String),
    LocalDescriptor(PathBuf),
    RemoteDescriptor(Url),
}

/// A validated reference. Only [`Validator::validate`] produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    kind: ReferenceKind,
}

impl Reference {
    pub fn kind(&self) -> &ReferenceKind {
        &self.kind
    }

    pub fn into_kind(self) -> ReferenceKind {
        self.kind
    }

    #[cfg(test)]
    pub(crate) fn from_kind(kind: ReferenceKind) -> Self {
        Self { kind }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ReferenceKind::Magnet(uri) => write!(f, "{}", uri),
            ReferenceKind::LocalDescriptor(path) => write!(f, "{}", path.display()),
            ReferenceKind::RemoteDescriptor(url) => write!(f, "{}", url),
        }
    }
}

/// Classifies references against the configured magnet pattern and descriptor extension.
#[derive(Debug, Clone)]
pub struct Validator {
    magnet: Regex,
    extension: String,
}

impl Validator {
    pub fn new(cfg: &Config) -> Result<Self, ConfigError> {
        let magnet = Regex::new(&cfg.magnet_pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: cfg.magnet_pattern.clone(),
            source,
        })?;
        Ok(Self {
            magnet,
            extension: cfg.descriptor_extension.to_lowercase(),
        })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Classify `input`. Order: empty check, magnet pattern, existing local
    /// file, absolute URL; anything else is unrecognized.
    pub fn validate(&self, input: &str) -> Result<Reference, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError::EmptyReference);
        }

        if self.magnet.is_match(input) {
            return Ok(Reference {
                kind: ReferenceKind::Magnet(input.to_string()),
            });
        }

        let path = Path::new(input);
        if path.is_file() {
            if self.has_extension(input) {
                return Ok(Reference {
                    kind: ReferenceKind::LocalDescriptor(path.to_path_buf()),
                });
            }
            return Err(self.wrong_extension(input));
        }

        if let Some(url) = parse_absolute_url(input) {
            if self.has_extension(url.path()) {
                return Ok(Reference {
                    kind: ReferenceKind::RemoteDescriptor(url),
                });
            }
            return Err(self.wrong_extension(input));
        }

        Err(ValidationError::UnrecognizedReference {
            input: input.to_string(),
            extension: self.extension.clone(),
        })
    }

    fn has_extension(&self, s: &str) -> bool {
        s.to_lowercase().ends_with(&self.extension)
    }

    fn wrong_extension(&self, input: &str) -> ValidationError {
        ValidationError::WrongExtension {
            input: input.to_string(),
            extension: self.extension.clone(),
        }
    }
}

/// Absolute URL with both a scheme and a host.
fn parse_absolute_url(input: &str) -> Option<Url> {
    let url = Url::parse(input).ok()?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Some(url),
        _ => None,
    }
}

/// Strips surrounding whitespace and the quotes terminals add when a file is dragged in.
pub fn clean_input(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests;
