mod round;
mod server;
mod worker;

use serde::{Deserialize, Serialize};

pub use round::RoundSpec;
pub use server::AggregatorSpec;
pub use worker::{ClientSpec, GradientSpec};

/// The specification for a `Distribution` to sample from.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionSpec {
    Uniform { low: f32, high: f32 },
    Normal { mean: f32, std_dev: f32 },
}

impl Default for DistributionSpec {
    fn default() -> Self {
        Self::Normal {
            mean: 0.,
            std_dev: 1.,
        }
    }
}

/// The specification for the `ParamGen` trait, the amount of parameters is implied
/// by the vector being initialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamGenSpec {
    Const { value: f32 },
    Rand { distribution: DistributionSpec },
}

impl Default for ParamGenSpec {
    fn default() -> Self {
        Self::Rand {
            distribution: DistributionSpec::default(),
        }
    }
}
