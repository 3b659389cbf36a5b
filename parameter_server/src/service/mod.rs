mod builder;
mod dispatch;

pub use builder::AggregatorBuilder;
