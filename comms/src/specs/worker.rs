use serde::{Deserialize, Serialize};

use super::{DistributionSpec, ParamGenSpec};

/// The specification for the placeholder gradient of a client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientSpec {
    Rand { distribution: DistributionSpec },
}

impl Default for GradientSpec {
    fn default() -> Self {
        Self::Rand {
            distribution: DistributionSpec::default(),
        }
    }
}

/// The specification for a `Client`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSpec {
    pub client_id: usize,
    #[serde(default = "ClientSpec::default_learning_rate")]
    pub learning_rate: f32,
    #[serde(default)]
    pub param_gen: ParamGenSpec,
    #[serde(default)]
    pub gradient: GradientSpec,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ClientSpec {
    fn default_learning_rate() -> f32 {
        0.01
    }

    /// A specification for a client with standard normal parameters and gradients.
    pub fn new(client_id: usize) -> Self {
        Self {
            client_id,
            learning_rate: Self::default_learning_rate(),
            param_gen: ParamGenSpec::default(),
            gradient: GradientSpec::default(),
            seed: None,
        }
    }
}
