mod delta;
mod deserialize;
pub mod msg;
mod serialize;
pub mod specs;

pub use delta::{DeltaErr, SparseDelta};
pub use deserialize::Deserialize;
pub use serialize::Serialize;
