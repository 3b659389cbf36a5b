use std::num::NonZeroUsize;

use comms::SparseDelta;
use log::{debug, trace};
use ml_core::{Density, initialization::ParamGen, select_top_k};

use crate::{Result, storage::ParameterStore};

/// The owner of the authoritative global parameters.
///
/// Accepts sparse uploads of gradient values and serves sparse downloads of the parameters
/// that received the most uploads. Cloning is cheap, clones share the same global state so
/// any amount of clients can hold one.
#[derive(Debug, Clone)]
pub struct Aggregator {
    store: ParameterStore,
}

impl Aggregator {
    /// Creates a new `Aggregator` with every update count at zero.
    ///
    /// # Arguments
    /// * `nparams` - The length of the global parameter vector.
    /// * `shard_size` - The maximum amount of parameters guarded by a single lock.
    /// * `param_gen` - The generator of the initial global parameters.
    ///
    /// # Returns
    /// A new `Aggregator` or `ServerErr::ParamGenExhausted` if `param_gen` falls short.
    pub fn new<PG: ParamGen>(
        nparams: NonZeroUsize,
        shard_size: NonZeroUsize,
        param_gen: PG,
    ) -> Result<Self> {
        let store = ParameterStore::new(nparams, shard_size, param_gen)?;
        Ok(Self { store })
    }

    /// The length of the global parameter vector.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Adds each uploaded value to its global parameter and bumps that parameter's update count.
    ///
    /// The whole delta is validated before anything is applied.
    ///
    /// # Returns
    /// A `ServerErr::Delta` if any index is out of range.
    pub fn apply_upload(&self, delta: &SparseDelta) -> Result<()> {
        self.store.apply(delta)?;
        debug!(entries = delta.len(); "applied upload");
        Ok(())
    }

    /// Selects the most frequently updated parameters.
    ///
    /// Ranks coordinates by update count, ties broken by ascending index, and returns the
    /// current global values at the selected coordinates in ranking order. The update counts
    /// are left untouched.
    ///
    /// # Arguments
    /// * `density` - The fraction of parameters to send.
    pub fn select_download(&self, density: Density) -> Result<SparseDelta> {
        let counts = self.store.pull_counts();
        let indices = select_top_k(&counts, density);
        let values = self.store.gather(&indices)?;

        trace!(density = density.get(), entries = indices.len(); "selected download");
        Ok(SparseDelta::new(indices, values)?)
    }

    /// A copy of the global parameters.
    pub fn pull_params(&self) -> Vec<f32> {
        self.store.pull_params()
    }

    /// A copy of the per-parameter update counts.
    pub fn update_counts(&self) -> Vec<u64> {
        self.store.pull_counts()
    }
}
