mod error;
pub mod gradient;
pub mod initialization;
pub mod optimization;
pub mod resolve;
pub mod selection;

pub use error::{MlErr, Result};
pub use gradient::{GradientSource, RandGradient};
pub use selection::{Density, RankKey, select_top_k};
