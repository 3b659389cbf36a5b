use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use super::ParamGenSpec;

/// The specification for an `Aggregator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorSpec {
    pub num_params: NonZeroUsize,
    #[serde(default = "AggregatorSpec::default_shard_size")]
    pub shard_size: NonZeroUsize,
    #[serde(default)]
    pub param_gen: ParamGenSpec,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AggregatorSpec {
    fn default_shard_size() -> NonZeroUsize {
        NonZeroUsize::new(1024).unwrap_or(NonZeroUsize::MIN)
    }

    /// A specification for `num_params` standard normal parameters.
    pub fn new(num_params: NonZeroUsize) -> Self {
        Self {
            num_params,
            shard_size: Self::default_shard_size(),
            param_gen: ParamGenSpec::default(),
            seed: None,
        }
    }
}
