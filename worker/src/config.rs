use ml_core::{Result, optimization::GradientDescent};

/// Immutable settings of a client instance.
#[derive(Debug, Clone, Copy)]
pub struct ClientConfig {
    client_id: usize,
    optimizer: GradientDescent,
}

impl ClientConfig {
    /// Creates a new client configuration.
    ///
    /// # Args
    /// * `client_id` - Identifier used for observability.
    /// * `learning_rate` - The step size of the local gradient descent.
    ///
    /// # Returns
    /// An `MlErr::InvalidLearningRate` if `learning_rate` isn't finite and positive.
    pub fn new(client_id: usize, learning_rate: f32) -> Result<Self> {
        Ok(Self {
            client_id,
            optimizer: GradientDescent::new(learning_rate)?,
        })
    }

    /// A configuration using the default learning rate.
    pub fn with_id(client_id: usize) -> Self {
        Self {
            client_id,
            optimizer: GradientDescent::default(),
        }
    }

    pub fn client_id(&self) -> usize {
        self.client_id
    }

    pub fn learning_rate(&self) -> f32 {
        self.optimizer.learning_rate()
    }

    /// The local optimizer this configuration describes.
    pub fn optimizer(&self) -> GradientDescent {
        self.optimizer
    }
}
