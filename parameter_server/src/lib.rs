mod aggregator;
mod error;
mod service;
mod storage;

pub use aggregator::Aggregator;
pub use error::{Result, ServerErr};
pub use service::AggregatorBuilder;
