//! Tag normalization
//!
//! Player, clan, and war identifiers arrive from clients in whatever shape
//! the user typed: lower-case, missing the `#` prefix, padded with
//! whitespace. `Tag` holds the canonical form so the rest of the gateway
//! never has to think about it again.

use std::fmt;

use crate::error::{GatewayError, Result};

// == Tag ==
/// A canonicalized player, clan, or war tag.
///
/// Canonical form: trimmed, upper-cased, prefixed with `#`. Two tags are
/// equal iff their canonical forms are equal. Percent-encoding for URLs
/// happens at the request layer, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Parses a raw tag string into canonical form.
    ///
    /// Fails when the input is empty or whitespace-only. Parsing an
    /// already-canonical tag yields the same tag.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GatewayError::InvalidTag(
                "Tag must not be empty".to_string(),
            ));
        }

        let upper = trimmed.to_uppercase();
        let canonical = if upper.starts_with('#') {
            upper
        } else {
            format!("#{}", upper)
        };

        Ok(Self(canonical))
    }

    /// The canonical `#`-prefixed form.
    pub fn canonical(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
