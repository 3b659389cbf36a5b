use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use super::{AggregatorSpec, ClientSpec};

/// The specification of a whole synchronization round: one aggregator, the clients that
/// take turns against it and the densities of each direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSpec {
    pub aggregator: AggregatorSpec,
    pub clients: Vec<ClientSpec>,
    pub theta_upload: f64,
    pub theta_download: f64,
}

impl Default for RoundSpec {
    fn default() -> Self {
        let num_params = NonZeroUsize::new(100).unwrap_or(NonZeroUsize::MIN);

        Self {
            aggregator: AggregatorSpec::new(num_params),
            clients: vec![ClientSpec::new(1)],
            theta_upload: 0.2,
            theta_download: 0.2,
        }
    }
}
