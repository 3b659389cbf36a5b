use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::{NormalError, uniform::Error as UniformError};

/// The result type used in the entire `ml_core` crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// Errors produced when a local computation receives invalid inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum MlErr {
    /// A density (fraction of coordinates) outside of `[0, 1]`.
    InvalidDensity(f64),
    /// A learning rate that is not a finite positive number.
    InvalidLearningRate(f32),
    /// Two buffers that should be of the same length aren't.
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// The parameters of a probability distribution were rejected.
    Distribution(String),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::InvalidDensity(theta) => {
                write!(f, "invalid density {theta}, must be within [0, 1]")
            }
            MlErr::InvalidLearningRate(lr) => {
                write!(f, "invalid learning rate {lr}, must be finite and positive")
            }
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(f, "size mismatch for {what}: got {got}, expected {expected}"),
            MlErr::Distribution(detail) => write!(f, "invalid distribution: {detail}"),
        }
    }
}

impl Error for MlErr {}

impl From<NormalError> for MlErr {
    fn from(value: NormalError) -> Self {
        Self::Distribution(value.to_string())
    }
}

impl From<UniformError> for MlErr {
    fn from(value: UniformError) -> Self {
        Self::Distribution(value.to_string())
    }
}
