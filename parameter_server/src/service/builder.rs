use comms::specs::AggregatorSpec;
use log::info;
use ml_core::resolve;

use crate::{Aggregator, Result};

/// Builds `Aggregator`s given a specification.
#[derive(Debug, Default)]
pub struct AggregatorBuilder;

impl AggregatorBuilder {
    /// Creates a new `AggregatorBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `Aggregator` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification of the aggregator.
    ///
    /// # Returns
    /// A new `Aggregator` or a `ServerErr` if the specification has an invalid distribution.
    pub fn build(&self, spec: &AggregatorSpec) -> Result<Aggregator> {
        let nparams = spec.num_params;
        let rng = resolve::rng(spec.seed);
        let param_gen = resolve::param_gen(spec.param_gen, rng, nparams.get())?;

        let aggregator = Aggregator::new(nparams, spec.shard_size, param_gen)?;

        info!(
            num_params = nparams.get(),
            shard_size = spec.shard_size.get();
            "aggregator ready"
        );

        Ok(aggregator)
    }
}
