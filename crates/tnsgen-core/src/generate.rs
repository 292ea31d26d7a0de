//! Random tensor generation driven by per-mode storage formats
//!
//! Generation expands coordinate prefixes mode by mode, outer mode first.
//! Each mode's format decides how a parent prefix fans out:
//!
//! - `Dense`: every coordinate in `[0, extent)` appears under each prefix
//! - `Sparse`/`Compressed`: a random subset per prefix at the configured
//!   density (never empty, so the tensor stays non-trivial)
//! - `Singleton`: exactly one uniformly chosen coordinate per prefix
//!
//! Expansion is sequential by construction: the prefixes produced by one
//! mode size the next. The run is fully reproducible from the seed.
//!
//! # Examples
//!
//! ```
//! use tnsgen_core::format::parse_formats;
//! use tnsgen_core::generate::{generate, GenConfig};
//!
//! let formats = parse_formats("d,d").unwrap();
//! let tensor = generate("A", &[4, 4], &formats, &GenConfig::default()).unwrap();
//!
//! // Dense modes fan out fully: 4 × 4 coordinates, all in bounds.
//! assert_eq!(tensor.nnz(), 16);
//! ```

use scirs2_core::random::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::error::{ParseError, TnsResult};
use crate::format::ModeFormat;
use crate::tensor::SparseTensor;

/// Generation parameters
#[derive(Debug, Clone)]
pub struct GenConfig {
    /// Seed for the random source; identical seeds reproduce identical
    /// nonzero sets for the same shape and formats
    pub seed: u64,

    /// Per-coordinate keep probability for Sparse/Compressed modes, in (0, 1]
    pub density: f64,

    /// Half-open range values are drawn from; excludes zero so every stored
    /// entry is a genuine nonzero
    pub value_range: (f64, f64),
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            density: 0.05,
            value_range: (0.1, 1.0),
        }
    }
}

/// Generate a random sparse tensor consistent with the given mode formats
///
/// # Errors
///
/// Returns a parse-class error for a shape/format length mismatch or a
/// density outside (0, 1], and a consistency error for an empty or
/// zero-valued shape (via tensor construction).
pub fn generate(
    name: impl Into<String>,
    shape: &[usize],
    formats: &[ModeFormat],
    config: &GenConfig,
) -> TnsResult<SparseTensor<f64>> {
    if shape.len() != formats.len() {
        return Err(ParseError::RankMismatch {
            dims: shape.len(),
            formats: formats.len(),
        }
        .into());
    }
    if !(config.density > 0.0 && config.density <= 1.0) {
        return Err(ParseError::InvalidDensity {
            value: config.density,
        }
        .into());
    }

    let mut tensor = SparseTensor::new(name, shape.to_vec(), formats.to_vec())?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    // Prefix expansion, outer mode first. Children are emitted in ascending
    // coordinate order, so the final coordinate list is lexicographically
    // sorted and duplicate-free.
    let mut prefixes: Vec<Vec<usize>> = vec![Vec::new()];
    for (mode, (&extent, format)) in shape.iter().zip(formats).enumerate() {
        let mut expanded = Vec::new();
        for prefix in &prefixes {
            match format {
                ModeFormat::Dense => {
                    for coord in 0..extent {
                        expanded.push(child(prefix, coord));
                    }
                }
                ModeFormat::Sparse | ModeFormat::Compressed => {
                    let mut kept = 0;
                    for coord in 0..extent {
                        if rng.random_range(0.0..1.0) < config.density {
                            expanded.push(child(prefix, coord));
                            kept += 1;
                        }
                    }
                    if kept == 0 {
                        expanded.push(child(prefix, rng.random_range(0..extent)));
                    }
                }
                ModeFormat::Singleton => {
                    expanded.push(child(prefix, rng.random_range(0..extent)));
                }
            }
        }
        debug!(mode, format = %format, prefixes = expanded.len(), "expanded mode");
        prefixes = expanded;
    }

    let (low, high) = config.value_range;
    for coordinate in prefixes {
        let value = rng.random_range(low..high);
        tensor.push(coordinate, value)?;
    }

    debug!(
        name = tensor.name(),
        nnz = tensor.nnz(),
        density = tensor.density(),
        "generated tensor"
    );
    Ok(tensor)
}

fn child(prefix: &[usize], coord: usize) -> Vec<usize> {
    let mut next = Vec::with_capacity(prefix.len() + 1);
    next.extend_from_slice(prefix);
    next.push(coord);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TnsError;
    use crate::format::parse_formats;

    fn gen(dims: &[usize], spec: &str, config: &GenConfig) -> SparseTensor<f64> {
        let formats = parse_formats(spec).unwrap();
        generate("T", dims, &formats, config).unwrap()
    }

    #[test]
    fn test_dense_modes_fan_out_fully() {
        let tensor = gen(&[4, 4], "d,d", &GenConfig::default());
        assert_eq!(tensor.nnz(), 16);
    }

    #[test]
    fn test_same_seed_reproduces_nonzero_set() {
        let config = GenConfig::default();
        let a = gen(&[4, 4], "s,s", &config);
        let b = gen(&[4, 4], "s,s", &config);
        assert_eq!(a.indices(), b.indices());
        assert_eq!(a.values(), b.values());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = gen(&[16, 16], "s,s", &GenConfig::default());
        let b = gen(
            &[16, 16],
            "s,s",
            &GenConfig {
                seed: 7,
                ..GenConfig::default()
            },
        );
        // Astronomically unlikely to collide on both coordinates and values.
        assert!(a.indices() != b.indices() || a.values() != b.values());
    }

    #[test]
    fn test_coordinates_unique_and_in_bounds() {
        let tensor = gen(&[5, 6, 7], "d,s,c", &GenConfig::default());
        let mut seen = std::collections::HashSet::new();
        for (index, _) in tensor.entries() {
            assert!(seen.insert(index.to_vec()), "duplicate {index:?}");
            for (&coord, &extent) in index.iter().zip(tensor.shape()) {
                assert!(coord < extent);
            }
        }
    }

    #[test]
    fn test_singleton_has_one_child_per_prefix() {
        let tensor = gen(&[4, 4, 8], "d,d,g", &GenConfig::default());
        // Every (mode0, mode1) prefix exists exactly once.
        assert_eq!(tensor.nnz(), 16);
        let mut prefixes = std::collections::HashSet::new();
        for (index, _) in tensor.entries() {
            assert!(prefixes.insert(index[..2].to_vec()));
        }
    }

    #[test]
    fn test_sparse_prefix_never_empty() {
        // Tiny density still yields at least one child per prefix.
        let config = GenConfig {
            density: 0.001,
            ..GenConfig::default()
        };
        let tensor = gen(&[3, 10], "d,s", &config);
        assert!(tensor.nnz() >= 3);
    }

    #[test]
    fn test_values_in_configured_range() {
        let tensor = gen(&[8, 8], "s,s", &GenConfig::default());
        for &value in tensor.values() {
            assert!((0.1..1.0).contains(&value));
        }
    }

    #[test]
    fn test_rank_mismatch_is_a_hard_error() {
        let formats = parse_formats("d").unwrap();
        let err = generate("A", &[4, 4], &formats, &GenConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            TnsError::Parse(ParseError::RankMismatch {
                dims: 2,
                formats: 1
            })
        ));
    }

    #[test]
    fn test_invalid_density_rejected() {
        let formats = parse_formats("d,d").unwrap();
        for density in [0.0, -0.5, 1.5] {
            let config = GenConfig {
                density,
                ..GenConfig::default()
            };
            let err = generate("A", &[4, 4], &formats, &config).unwrap_err();
            assert!(matches!(
                err,
                TnsError::Parse(ParseError::InvalidDensity { .. })
            ));
        }
    }
}
