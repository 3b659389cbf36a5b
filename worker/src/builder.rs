use comms::specs::ClientSpec;
use log::info;
use ml_core::{
    initialization::ParamGen,
    resolve::{self, BoxedGradientSource},
};
use parameter_server::Aggregator;

use crate::{Client, ClientConfig, ClientErr, Result};

/// Builds `Client`s given a specification.
#[derive(Debug, Default)]
pub struct ClientBuilder;

impl ClientBuilder {
    /// Creates a new `ClientBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a `Client` bound to `aggregator` from a `ClientSpec`.
    ///
    /// The local parameters get as long as the aggregator's and the gradient source is the
    /// random placeholder `spec` describes. A seeded `spec` yields a reproducible client.
    ///
    /// # Args
    /// * `spec` - The specification of the client.
    /// * `aggregator` - The aggregator to synchronize with.
    ///
    /// # Returns
    /// A fully initialized `Client` or a `ClientErr` if `spec` is invalid.
    pub fn build(
        &self,
        spec: &ClientSpec,
        aggregator: Aggregator,
    ) -> Result<Client<BoxedGradientSource>> {
        let nparams = aggregator.len();
        let config = ClientConfig::new(spec.client_id, spec.learning_rate)?;

        let param_rng = resolve::rng(spec.seed);
        let params = resolve::param_gen(spec.param_gen, param_rng, nparams)?
            .take_exact(nparams)
            .ok_or(ClientErr::SizeMismatch {
                what: "initial parameters",
                got: 0,
                expected: nparams,
            })?;

        let grad_rng = resolve::rng(spec.seed.map(|seed| seed.wrapping_add(1)));
        let source = resolve::gradient_source(spec.gradient, grad_rng)?;

        info!(
            client_id = spec.client_id,
            learning_rate = spec.learning_rate;
            "client ready"
        );

        Client::new(config, params, source, aggregator)
    }
}
