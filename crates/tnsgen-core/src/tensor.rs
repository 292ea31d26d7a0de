//! COO-style sparse tensor with per-mode storage formats
//!
//! The flat (coordinate, value) representation every pipeline stage works
//! from: the generator fills it, the packer compresses it, and the `.tns`
//! reader reconstructs it. Coordinates are unique within a tensor and each
//! mode carries the format tag that later drives packing.
//!
//! # Examples
//!
//! ```
//! use tnsgen_core::format::ModeFormat;
//! use tnsgen_core::tensor::SparseTensor;
//!
//! let mut tensor = SparseTensor::<f64>::new(
//!     "A",
//!     vec![3, 4],
//!     vec![ModeFormat::Dense, ModeFormat::Sparse],
//! )
//! .unwrap();
//! tensor.push(vec![0, 1], 2.5).unwrap();
//! tensor.push(vec![2, 0], 1.5).unwrap();
//!
//! assert_eq!(tensor.nnz(), 2);
//! assert_eq!(tensor.shape(), &[3, 4]);
//! ```

use crate::error::ConsistencyError;
use crate::format::ModeFormat;

/// Sparse tensor in coordinate form
///
/// Stores nonzeros as (coordinate, value) pairs plus the per-mode format
/// tags that govern how each mode is packed. Constructed once per
/// invocation, mutated only during generation, then packed and serialized.
#[derive(Debug, Clone)]
pub struct SparseTensor<T> {
    /// Identifier, used only for output naming
    name: String,

    /// Extent of each mode
    shape: Vec<usize>,

    /// Storage format of each mode, positionally aligned with `shape`
    formats: Vec<ModeFormat>,

    /// Coordinates of nonzero entries
    /// Each inner vec is [i₀, i₁, ..., iₙ₋₁]
    indices: Vec<Vec<usize>>,

    /// Values at the corresponding coordinates
    values: Vec<T>,
}

impl<T: Clone> SparseTensor<T> {
    /// Create an empty tensor with the given shape and mode formats
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The shape is empty or contains zeros
    /// - The format sequence length differs from the shape length
    pub fn new(
        name: impl Into<String>,
        shape: Vec<usize>,
        formats: Vec<ModeFormat>,
    ) -> Result<Self, ConsistencyError> {
        if shape.is_empty() {
            return Err(ConsistencyError::EmptyShape);
        }
        if shape.contains(&0) {
            return Err(ConsistencyError::ZeroInShape);
        }
        if formats.len() != shape.len() {
            return Err(ConsistencyError::FormatCountMismatch {
                shape: shape.len(),
                formats: formats.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            shape,
            formats,
            indices: Vec::new(),
            values: Vec::new(),
        })
    }

    /// Create a tensor from pre-built coordinate and value arrays
    ///
    /// Used by the `.tns` reader. Validates every coordinate in addition to
    /// the shape/format checks performed by [`SparseTensor::new`].
    pub fn from_parts(
        name: impl Into<String>,
        shape: Vec<usize>,
        formats: Vec<ModeFormat>,
        indices: Vec<Vec<usize>>,
        values: Vec<T>,
    ) -> Result<Self, ConsistencyError> {
        if indices.len() != values.len() {
            return Err(ConsistencyError::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            });
        }

        let mut tensor = Self::new(name, shape, formats)?;
        for (index, value) in indices.into_iter().zip(values) {
            tensor.push(index, value)?;
        }
        Ok(tensor)
    }

    /// Add a nonzero entry
    ///
    /// Note: Does not check for duplicate coordinates; the packer rejects
    /// duplicates when building index structures.
    pub fn push(&mut self, index: Vec<usize>, value: T) -> Result<(), ConsistencyError> {
        if index.len() != self.shape.len() {
            return Err(ConsistencyError::IndexRankMismatch {
                expected: self.shape.len(),
                got: index.len(),
            });
        }

        for (&coord, &extent) in index.iter().zip(&self.shape) {
            if coord >= extent {
                return Err(ConsistencyError::IndexOutOfBounds {
                    index,
                    shape: self.shape.clone(),
                });
            }
        }

        self.indices.push(index);
        self.values.push(value);
        Ok(())
    }

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

    /// Number of nonzero entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Get coordinates
    pub fn indices(&self) -> &[Vec<usize>] {
        &self.indices
    }

    /// Get values
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterate over (coordinate, value) pairs
    pub fn entries(&self) -> impl Iterator<Item = (&[usize], &T)> {
        self.indices
            .iter()
            .map(|idx| idx.as_slice())
            .zip(self.values.iter())
    }

    /// Compute density (nnz / total elements)
    pub fn density(&self) -> f64 {
        let total: usize = self.shape.iter().product();
        self.nnz() as f64 / total as f64
    }

    /// Sort entries in row-major (lexicographic) coordinate order
    ///
    /// Packing relies on this ordering to delimit per-prefix runs.
    pub fn sort(&mut self) {
        let mut perm: Vec<usize> = (0..self.nnz()).collect();
        perm.sort_by(|&i, &j| self.indices[i].cmp(&self.indices[j]));

        let old_indices = std::mem::take(&mut self.indices);
        let old_values = std::mem::take(&mut self.values);

        self.indices = perm.iter().map(|&i| old_indices[i].clone()).collect();
        self.values = perm.iter().map(|&i| old_values[i].clone()).collect();
    }

    /// Entries sorted lexicographically, leaving the tensor untouched
    pub fn sorted_entries(&self) -> Vec<(Vec<usize>, T)> {
        let mut entries: Vec<(Vec<usize>, T)> = self
            .indices
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense2(name: &str, shape: Vec<usize>) -> SparseTensor<f64> {
        let formats = vec![ModeFormat::Dense; shape.len()];
        SparseTensor::new(name, shape, formats).unwrap()
    }

    #[test]
    fn test_creation() {
        let tensor = dense2("A", vec![3, 4]);
        assert_eq!(tensor.name(), "A");
        assert_eq!(tensor.shape(), &[3, 4]);
        assert_eq!(tensor.rank(), 2);
        assert_eq!(tensor.nnz(), 0);
    }

    #[test]
    fn test_rejects_empty_shape() {
        let err = SparseTensor::<f64>::new("A", vec![], vec![]).unwrap_err();
        assert!(matches!(err, ConsistencyError::EmptyShape));
    }

    #[test]
    fn test_rejects_zero_extent() {
        let err =
            SparseTensor::<f64>::new("A", vec![3, 0], vec![ModeFormat::Dense; 2]).unwrap_err();
        assert!(matches!(err, ConsistencyError::ZeroInShape));
    }

    #[test]
    fn test_rejects_format_count_mismatch() {
        let err =
            SparseTensor::<f64>::new("A", vec![4, 4], vec![ModeFormat::Dense]).unwrap_err();
        assert!(matches!(
            err,
            ConsistencyError::FormatCountMismatch {
                shape: 2,
                formats: 1
            }
        ));
    }

    #[test]
    fn test_push_validates_bounds() {
        let mut tensor = dense2("A", vec![3, 3]);
        tensor.push(vec![2, 2], 1.0).unwrap();

        let err = tensor.push(vec![3, 0], 1.0).unwrap_err();
        assert!(matches!(err, ConsistencyError::IndexOutOfBounds { .. }));

        let err = tensor.push(vec![0], 1.0).unwrap_err();
        assert!(matches!(err, ConsistencyError::IndexRankMismatch { .. }));
    }

    #[test]
    fn test_from_parts_length_mismatch() {
        let err = SparseTensor::from_parts(
            "A",
            vec![3, 3],
            vec![ModeFormat::Dense; 2],
            vec![vec![0, 0], vec![1, 1]],
            vec![1.0],
        )
        .unwrap_err();
        assert!(matches!(err, ConsistencyError::LengthMismatch { .. }));
    }

    #[test]
    fn test_density() {
        let mut tensor = dense2("A", vec![10, 10]);
        tensor.push(vec![0, 0], 1.0).unwrap();
        tensor.push(vec![1, 1], 2.0).unwrap();
        assert_eq!(tensor.density(), 0.02);
    }

    #[test]
    fn test_sort() {
        let mut tensor = dense2("A", vec![3, 3]);
        tensor.push(vec![2, 0], 1.0).unwrap();
        tensor.push(vec![0, 1], 2.0).unwrap();
        tensor.push(vec![1, 0], 3.0).unwrap();
        tensor.sort();

        assert_eq!(tensor.indices()[0], vec![0, 1]);
        assert_eq!(tensor.indices()[1], vec![1, 0]);
        assert_eq!(tensor.indices()[2], vec![2, 0]);
        assert_eq!(tensor.values(), &[2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_sorted_entries_preserves_original_order() {
        let mut tensor = dense2("A", vec![3, 3]);
        tensor.push(vec![2, 0], 1.0).unwrap();
        tensor.push(vec![0, 1], 2.0).unwrap();

        let sorted = tensor.sorted_entries();
        assert_eq!(sorted[0].0, vec![0, 1]);
        assert_eq!(tensor.indices()[0], vec![2, 0]);
    }
}
