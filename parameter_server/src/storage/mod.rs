mod shard;
mod store;

pub(super) use shard::ParameterShard;
pub use store::ParameterStore;
