//! Packing a coordinate tensor into per-mode compressed index structures
//!
//! Packing walks the modes left to right, maintaining one segment of the
//! lexicographically sorted entry list per distinct coordinate prefix. Each
//! mode's format decides what the level records:
//!
//! - `Dense`: no index arrays; every parent slot expands to `extent` child
//!   slots and positions stay implicit (`coordinate * stride`)
//! - `Sparse`/`Compressed`: a positions array delimiting, per parent slot, a
//!   run of sorted deduplicated child coordinates in the indices array
//! - `Singleton`: a bare indices array with at most one child per occupied
//!   parent slot
//!
//! The leaf level carries the values array, one entry per leaf slot; slots
//! introduced by dense fan-out with nothing beneath hold zero padding.
//!
//! Packing is a pure transformation. It fails only on an upstream invariant
//! breach (duplicate coordinate, Singleton cardinality violation), which is
//! a fatal [`ConsistencyError`] rather than a recoverable condition.
//!
//! # Examples
//!
//! ```
//! use tnsgen_core::format::parse_formats;
//! use tnsgen_core::pack::{pack, ModeIndex};
//! use tnsgen_core::tensor::SparseTensor;
//!
//! let formats = parse_formats("d,s").unwrap();
//! let mut tensor = SparseTensor::new("A", vec![2, 4], formats).unwrap();
//! tensor.push(vec![0, 1], 5.0).unwrap();
//! tensor.push(vec![0, 3], 6.0).unwrap();
//! tensor.push(vec![1, 2], 7.0).unwrap();
//!
//! let packed = pack(&tensor).unwrap();
//! match packed.mode_index(1) {
//!     ModeIndex::Compressed { pos, idx } => {
//!         assert_eq!(pos, &[0, 2, 3]);
//!         assert_eq!(idx, &[1, 3, 2]);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use scirs2_core::numeric::Float;
use tracing::debug;

use crate::error::{ConsistencyError, TnsResult};
use crate::format::ModeFormat;
use crate::tensor::SparseTensor;

/// Index structure recorded for one packed mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeIndex {
    /// Implicit full range; only the extent is kept
    Dense { extent: usize },

    /// Position/index pair: `pos` has one entry per parent slot plus one,
    /// monotonically increasing; `idx` holds the concatenated sorted child
    /// coordinate runs
    Compressed { pos: Vec<usize>, idx: Vec<usize> },

    /// One child coordinate per occupied parent slot, in parent order
    Singleton { idx: Vec<usize> },
}

/// Tensor after packing: per-mode index structures plus leaf values
#[derive(Debug, Clone)]
pub struct PackedTensor<T> {
    name: String,
    shape: Vec<usize>,
    formats: Vec<ModeFormat>,
    modes: Vec<ModeIndex>,
    values: Vec<T>,
    nnz: usize,
}

impl<T: Float> PackedTensor<T> {
    /// Tensor identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extent of each mode
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Storage format of each mode
    pub fn formats(&self) -> &[ModeFormat] {
        &self.formats
    }

    /// Rank (number of modes)
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of stored nonzero entries (zero padding excluded)
    pub fn nnz(&self) -> usize {
        self.nnz
    }

    /// Index structure of the given level
    ///
    /// # Panics
    ///
    /// Panics if `level >= rank()`.
    pub fn mode_index(&self, level: usize) -> &ModeIndex {
        &self.modes[level]
    }

    /// Leaf values, one per leaf slot (dense padding slots hold zero)
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Reconstruct the stored (coordinate, value) entries
    ///
    /// Expands the index structures level by level and skips zero-valued
    /// padding slots. Fails with a [`ConsistencyError`] if the index arrays
    /// are not mutually consistent, including the one non-invertible layout:
    /// a Singleton level whose parent slots are not all occupied.
    pub fn entries(&self) -> TnsResult<Vec<(Vec<usize>, T)>> {
        let mut slots: Vec<Vec<usize>> = vec![Vec::new()];

        for (level, mode) in self.modes.iter().enumerate() {
            let mut expanded = Vec::new();
            match mode {
                ModeIndex::Dense { extent } => {
                    for slot in &slots {
                        for coord in 0..*extent {
                            expanded.push(child(slot, coord));
                        }
                    }
                }
                ModeIndex::Compressed { pos, idx } => {
                    if pos.len() != slots.len() + 1 {
                        return Err(ConsistencyError::InvalidPackedIndex {
                            level,
                            reason: format!(
                                "positions array has length {} for {} parent slots",
                                pos.len(),
                                slots.len()
                            ),
                        }
                        .into());
                    }
                    for (slot, run) in slots.iter().zip(pos.windows(2)) {
                        for &coord in &idx[run[0]..run[1]] {
                            expanded.push(child(slot, coord));
                        }
                    }
                }
                ModeIndex::Singleton { idx } => {
                    if idx.len() != slots.len() {
                        return Err(ConsistencyError::InvalidPackedIndex {
                            level,
                            reason: format!(
                                "singleton level has {} children for {} parent slots; \
                                 unoccupied parents make the level non-invertible",
                                idx.len(),
                                slots.len()
                            ),
                        }
                        .into());
                    }
                    for (slot, &coord) in slots.iter().zip(idx) {
                        expanded.push(child(slot, coord));
                    }
                }
            }
            slots = expanded;
        }

        if slots.len() != self.values.len() {
            return Err(ConsistencyError::InvalidPackedIndex {
                level: self.modes.len().saturating_sub(1),
                reason: format!(
                    "{} leaf slots but {} values",
                    slots.len(),
                    self.values.len()
                ),
            }
            .into());
        }

        Ok(slots
            .into_iter()
            .zip(self.values.iter())
            .filter(|(_, value)| !value.is_zero())
            .map(|(coordinate, &value)| (coordinate, value))
            .collect())
    }
}

/// Pack a coordinate tensor into per-mode index structures
///
/// # Errors
///
/// Fails with a fatal [`ConsistencyError`] on a duplicate coordinate or a
/// Singleton mode holding more than one child under a parent prefix. Both
/// indicate an upstream bug, not bad user input.
pub fn pack<T: Float>(tensor: &SparseTensor<T>) -> TnsResult<PackedTensor<T>> {
    let entries = tensor.sorted_entries();

    for pair in entries.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(ConsistencyError::DuplicateIndex {
                index: pair[0].0.clone(),
            }
            .into());
        }
    }

    // One segment per distinct coordinate prefix, in lexicographic prefix
    // order. Segment counts at each level depend on the previous level, so
    // modes are processed strictly left to right.
    let mut segments: Vec<(usize, usize)> = vec![(0, entries.len())];
    let mut modes = Vec::with_capacity(tensor.rank());

    for (mode, (&extent, format)) in tensor.shape().iter().zip(tensor.formats()).enumerate() {
        let mut next = Vec::new();
        match format {
            ModeFormat::Dense => {
                for &(start, end) in &segments {
                    let mut at = start;
                    for coord in 0..extent {
                        let run_start = at;
                        while at < end && entries[at].0[mode] == coord {
                            at += 1;
                        }
                        next.push((run_start, at));
                    }
                }
                modes.push(ModeIndex::Dense { extent });
            }
            ModeFormat::Sparse | ModeFormat::Compressed => {
                let mut pos = vec![0];
                let mut idx = Vec::new();
                for &(start, end) in &segments {
                    let mut at = start;
                    while at < end {
                        let coord = entries[at].0[mode];
                        let run_start = at;
                        while at < end && entries[at].0[mode] == coord {
                            at += 1;
                        }
                        idx.push(coord);
                        next.push((run_start, at));
                    }
                    pos.push(idx.len());
                }
                modes.push(ModeIndex::Compressed { pos, idx });
            }
            ModeFormat::Singleton => {
                let mut idx = Vec::new();
                for &(start, end) in &segments {
                    if start == end {
                        continue;
                    }
                    let coord = entries[start].0[mode];
                    if entries[start..end].iter().any(|(index, _)| index[mode] != coord) {
                        return Err(ConsistencyError::SingletonCardinality {
                            mode,
                            prefix: entries[start].0[..mode].to_vec(),
                        }
                        .into());
                    }
                    idx.push(coord);
                    next.push((start, end));
                }
                modes.push(ModeIndex::Singleton { idx });
            }
        }
        debug!(mode, format = %format, slots = next.len(), "packed mode");
        segments = next;
    }

    let mut values = Vec::with_capacity(segments.len());
    for &(start, end) in &segments {
        match end - start {
            0 => values.push(T::zero()),
            1 => values.push(entries[start].1),
            _ => {
                // Unreachable after the duplicate scan; a multi-entry leaf
                // slot means two entries share every coordinate.
                return Err(ConsistencyError::DuplicateIndex {
                    index: entries[start].0.clone(),
                }
                .into());
            }
        }
    }

    Ok(PackedTensor {
        name: tensor.name().to_string(),
        shape: tensor.shape().to_vec(),
        formats: tensor.formats().to_vec(),
        modes,
        values,
        nnz: tensor.nnz(),
    })
}

fn child(prefix: &[usize], coord: usize) -> Vec<usize> {
    let mut next = Vec::with_capacity(prefix.len() + 1);
    next.extend_from_slice(prefix);
    next.push(coord);
    next
}
