use std::{
    collections::HashSet,
    error::Error,
    fmt::{self, Display},
};

/// Errors produced when building or validating a `SparseDelta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaErr {
    /// The amount of indices and values differ.
    LengthMismatch { indices: usize, values: usize },
    /// An index appears more than once.
    DuplicateIndex(usize),
    /// An index lies outside of `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for DeltaErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaErr::LengthMismatch { indices, values } => {
                write!(f, "sparse delta has {indices} indices but {values} values")
            }
            DeltaErr::DuplicateIndex(index) => {
                write!(f, "sparse delta contains index {index} more than once")
            }
            DeltaErr::IndexOutOfRange { index, len } => {
                write!(f, "sparse delta index {index} is out of range for {len} parameters")
            }
        }
    }
}

impl Error for DeltaErr {}

/// A partial view of a parameter vector, pairs of unique coordinate indices and values.
///
/// The pairing order is preserved, a delta built from a ranking keeps the ranking order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseDelta {
    indices: Vec<usize>,
    values: Vec<f32>,
}

impl SparseDelta {
    /// Creates a new `SparseDelta`.
    ///
    /// # Arguments
    /// * `indices` - The coordinates this delta refers to, must be unique.
    /// * `values` - The value for each coordinate, paired by position.
    ///
    /// # Returns
    /// A `DeltaErr` if the lengths differ or an index is repeated.
    pub fn new(indices: Vec<usize>, values: Vec<f32>) -> Result<Self, DeltaErr> {
        if indices.len() != values.len() {
            return Err(DeltaErr::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            });
        }

        let mut seen = HashSet::with_capacity(indices.len());
        if let Some(&dup) = indices.iter().find(|&&i| !seen.insert(i)) {
            return Err(DeltaErr::DuplicateIndex(dup));
        }

        Ok(Self { indices, values })
    }

    /// Creates a new `SparseDelta` taking the values at `indices` from a dense vector.
    ///
    /// # Returns
    /// A `DeltaErr` if an index is out of range for `dense` or repeated.
    pub fn gather(dense: &[f32], indices: Vec<usize>) -> Result<Self, DeltaErr> {
        if let Some(&index) = indices.iter().find(|&&i| i >= dense.len()) {
            return Err(DeltaErr::IndexOutOfRange {
                index,
                len: dense.len(),
            });
        }

        let values = indices.iter().map(|&i| dense[i]).collect();
        Self::new(indices, values)
    }

    /// Checks every index lies within `[0, len)`.
    pub fn check_bounds(&self, len: usize) -> Result<(), DeltaErr> {
        match self.indices.iter().find(|&&i| i >= len) {
            Some(&index) => Err(DeltaErr::IndexOutOfRange { index, len }),
            None => Ok(()),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates the `(index, value)` pairs in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<f32>) {
        (self.indices, self.values)
    }
}
