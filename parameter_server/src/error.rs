use std::{
    error::Error,
    fmt::{self, Display},
};

use comms::DeltaErr;
use ml_core::MlErr;

/// The parameter server's result type.
pub type Result<T> = std::result::Result<T, ServerErr>;

/// Aggregator failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerErr {
    /// A delta that doesn't fit the global parameter vector.
    Delta(DeltaErr),
    /// An invalid density or distribution.
    Ml(MlErr),
    /// The parameter generator ran out before filling the global vector.
    ParamGenExhausted { got: usize, expected: usize },
}

impl Display for ServerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerErr::Delta(e) => write!(f, "rejected delta: {e}"),
            ServerErr::Ml(e) => write!(f, "{e}"),
            ServerErr::ParamGenExhausted { got, expected } => write!(
                f,
                "parameter generator exhausted after {got} of {expected} parameters"
            ),
        }
    }
}

impl Error for ServerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServerErr::Delta(e) => Some(e),
            ServerErr::Ml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DeltaErr> for ServerErr {
    fn from(value: DeltaErr) -> Self {
        Self::Delta(value)
    }
}

impl From<MlErr> for ServerErr {
    fn from(value: MlErr) -> Self {
        Self::Ml(value)
    }
}
