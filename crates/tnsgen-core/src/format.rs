//! Per-mode storage formats and the textual spec parsers
//!
//! A tensor's storage layout is described mode by mode with a format tag.
//! The command line carries two comma-delimited specs: one listing the
//! extent of each mode (`"4,4,8"`) and one listing the format tag of each
//! mode (`"d,s,g"`). The two specs are positionally aligned; a length
//! mismatch is rejected before any tensor is built.
//!
//! # Tokens
//!
//! | Token | Format | Index structure |
//! |-------|--------------|----------------------------------|
//! | `d` | [`ModeFormat::Dense`] | none (implicit full range) |
//! | `s` | [`ModeFormat::Sparse`] | positions + indices |
//! | `c` | [`ModeFormat::Compressed`] | positions + indices |
//! | `g` | [`ModeFormat::Singleton`] | indices only |
//!
//! Unrecognized tokens are a hard [`ParseError`]; they are never silently
//! skipped, which would desynchronize the format sequence from the extents.
//!
//! # Examples
//!
//! ```
//! use tnsgen_core::format::{parse_dims, parse_formats, ModeFormat};
//!
//! let dims = parse_dims("4,4,8").unwrap();
//! assert_eq!(dims, vec![4, 4, 8]);
//!
//! let formats = parse_formats("d,s,g").unwrap();
//! assert_eq!(
//!     formats,
//!     vec![ModeFormat::Dense, ModeFormat::Sparse, ModeFormat::Singleton]
//! );
//! ```

use std::fmt;

use crate::error::ParseError;

/// Storage format for a single tensor mode
///
/// Drives both nonzero generation and packing via exhaustive matching, so a
/// new format variant is a compile-time-checked, localized change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeFormat {
    /// Implicit full range; no index compression along this mode
    Dense,
    /// Positions + indices pair storing only the coordinates that occur
    Sparse,
    /// Same index layout as [`ModeFormat::Sparse`]; kept as a distinct tag
    /// because interchange files and format specs distinguish the two
    Compressed,
    /// At most one child coordinate per parent prefix; single index array
    Singleton,
}

impl ModeFormat {
    /// Parse a single-character spec token
    pub fn from_token(token: &str) -> Result<Self, ParseError> {
        match token {
            "d" => Ok(ModeFormat::Dense),
            "s" => Ok(ModeFormat::Sparse),
            "c" => Ok(ModeFormat::Compressed),
            "g" => Ok(ModeFormat::Singleton),
            _ => Err(ParseError::UnknownFormat {
                token: token.to_string(),
            }),
        }
    }

    /// The spec token for this format
    pub fn token(&self) -> &'static str {
        match self {
            ModeFormat::Dense => "d",
            ModeFormat::Sparse => "s",
            ModeFormat::Compressed => "c",
            ModeFormat::Singleton => "g",
        }
    }

    /// Whether packing this mode records a positions array
    pub fn has_positions(&self) -> bool {
        matches!(self, ModeFormat::Sparse | ModeFormat::Compressed)
    }
}

impl fmt::Display for ModeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Parse a comma-delimited dimension spec into an extents sequence
///
/// Each token must be a positive integer literal. An empty or
/// whitespace-only spec yields an empty sequence (a degenerate order-0
/// tensor, rejected by tensor construction downstream).
///
/// # Errors
///
/// Returns [`ParseError::InvalidDimension`] for non-numeric tokens,
/// propagating the underlying integer-conversion failure, and
/// [`ParseError::ZeroExtent`] for zero extents.
pub fn parse_dims(spec: &str) -> Result<Vec<usize>, ParseError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Ok(Vec::new());
    }

    spec.split(',')
        .enumerate()
        .map(|(mode, token)| {
            let token = token.trim();
            let extent: usize = token.parse().map_err(|source| ParseError::InvalidDimension {
                token: token.to_string(),
                source,
            })?;
            if extent == 0 {
                return Err(ParseError::ZeroExtent { mode });
            }
            Ok(extent)
        })
        .collect()
}

/// Parse a comma-delimited format spec into a mode format sequence
///
/// Tokens are drawn from `{s,d,c,g}`. An unrecognized token is a hard
/// [`ParseError::UnknownFormat`]; the sequence length always equals the
/// token count on success.
pub fn parse_formats(spec: &str) -> Result<Vec<ModeFormat>, ParseError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Ok(Vec::new());
    }

    spec.split(',')
        .map(|token| ModeFormat::from_token(token.trim()))
        .collect()
}
