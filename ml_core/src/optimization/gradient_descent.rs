use super::Optimizer;
use crate::{MlErr, Result};

/// Plain gradient descent, `params -= learning_rate * grad`.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// The learning rate used when none is configured.
    pub const DEFAULT_LEARNING_RATE: f32 = 0.01;

    /// Creates a new `GradientDescent` optimizer.
    ///
    /// # Arguments
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    ///
    /// # Returns
    /// An `MlErr::InvalidLearningRate` if `learning_rate` isn't finite and positive.
    pub fn new(learning_rate: f32) -> Result<Self> {
        if !learning_rate.is_finite() || learning_rate <= 0. {
            return Err(MlErr::InvalidLearningRate(learning_rate));
        }

        Ok(Self { learning_rate })
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self {
            learning_rate: Self::DEFAULT_LEARNING_RATE,
        }
    }
}

impl Optimizer for GradientDescent {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        if grad.len() != params.len() {
            return Err(MlErr::SizeMismatch {
                what: "gradient",
                got: grad.len(),
                expected: params.len(),
            });
        }

        let lr = self.learning_rate;

        for (p, g) in params.iter_mut().zip(grad) {
            *p -= lr * g;
        }

        Ok(())
    }
}
