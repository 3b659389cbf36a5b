use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{MlErr, Result};

/// Abstraction over the local loss/gradient computation of a client.
///
/// Implementations encapsulate all model-, data- and loss-specific logic, the client treats
/// this trait as a black box mapping its current parameters and a training batch into a
/// dense gradient.
pub trait GradientSource {
    /// The training batch consumed by a single step.
    type Batch: ?Sized;

    /// Computes the gradient of the local loss at `params`.
    ///
    /// # Arguments
    /// * `params` - Read-only slice containing the current local parameters.
    /// * `batch` - The training data for this step.
    /// * `grad` - Output buffer, of the same length as `params`.
    ///
    /// # Errors
    /// Implementations should return `MlErr::SizeMismatch` when lengths don't match.
    fn gradient(&mut self, params: &[f32], batch: &Self::Batch, grad: &mut [f32]) -> Result<()>;
}

impl<G: GradientSource + ?Sized> GradientSource for Box<G> {
    type Batch = G::Batch;

    fn gradient(&mut self, params: &[f32], batch: &Self::Batch, grad: &mut [f32]) -> Result<()> {
        (**self).gradient(params, batch, grad)
    }
}

/// A stand-in gradient source that ignores both the parameters and the data and samples
/// every coordinate from a distribution.
pub struct RandGradient<R: Rng, D: Distribution<f32> = Normal<f32>> {
    rng: R,
    distribution: D,
}

impl<R: Rng, D: Distribution<f32>> RandGradient<R, D> {
    /// Creates a new `RandGradient` source.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `distribution` - The distribution each gradient coordinate is sampled from.
    pub fn new(rng: R, distribution: D) -> Self {
        Self { rng, distribution }
    }
}

impl<R: Rng> RandGradient<R, Normal<f32>> {
    /// Creates a new `RandGradient` sampling the standard normal distribution.
    pub fn standard_normal(rng: R) -> Result<Self> {
        Ok(Self::new(rng, Normal::new(0., 1.)?))
    }
}

impl<R: Rng, D: Distribution<f32>> GradientSource for RandGradient<R, D> {
    type Batch = ();

    fn gradient(&mut self, params: &[f32], _batch: &(), grad: &mut [f32]) -> Result<()> {
        if params.len() != grad.len() {
            return Err(MlErr::SizeMismatch {
                what: "gradient buffer",
                got: grad.len(),
                expected: params.len(),
            });
        }

        grad.iter_mut()
            .for_each(|g| *g = self.distribution.sample(&mut self.rng));

        Ok(())
    }
}
