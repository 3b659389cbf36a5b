use std::{error::Error, fmt};

use comms::DeltaErr;
use ml_core::MlErr;
use parameter_server::ServerErr;

/// The client module's result type.
pub type Result<T> = std::result::Result<T, ClientErr>;

/// Client failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientErr {
    /// A delta that doesn't fit the local parameter vector.
    Delta(DeltaErr),
    /// The local computation rejected its inputs.
    Ml(MlErr),
    /// The aggregator rejected a request.
    Server(ServerErr),
    /// A dense vector whose length differs from the amount of parameters.
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
}

impl fmt::Display for ClientErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientErr::Delta(e) => write!(f, "delta error: {e}"),
            ClientErr::Ml(e) => write!(f, "local computation error: {e}"),
            ClientErr::Server(e) => write!(f, "aggregator error: {e}"),
            ClientErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(f, "{what} length mismatch: got {got}, expected {expected}"),
        }
    }
}

impl Error for ClientErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClientErr::Delta(e) => Some(e),
            ClientErr::Ml(e) => Some(e),
            ClientErr::Server(e) => Some(e),
            ClientErr::SizeMismatch { .. } => None,
        }
    }
}

impl From<DeltaErr> for ClientErr {
    fn from(value: DeltaErr) -> Self {
        Self::Delta(value)
    }
}

impl From<MlErr> for ClientErr {
    fn from(value: MlErr) -> Self {
        Self::Ml(value)
    }
}

impl From<ServerErr> for ClientErr {
    fn from(value: ServerErr) -> Self {
        Self::Server(value)
    }
}
