use std::{num::NonZeroUsize, sync::Arc};

use comms::{DeltaErr, SparseDelta};
use ml_core::initialization::ParamGen;
use rayon::prelude::*;

use crate::{Result, ServerErr, storage::ParameterShard};

/// Partitions the global parameters in shards and leverages parallelization to apply
/// sparse uploads touching many shards at once.
///
/// Cloning is cheap, every clone shares the same shards.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    nparams: usize,
    shards: Arc<[ParameterShard]>,
    shard_size: NonZeroUsize,
}

impl ParameterStore {
    /// Creates a new `ParameterStore`.
    ///
    /// # Arguments
    /// * `nparams` - The amount of parameters to hold.
    /// * `shard_size` - The maximum amount of parameters per shard.
    /// * `param_gen` - A parameter generator with at least `nparams` values.
    ///
    /// # Returns
    /// A new `ParameterStore` or `ServerErr::ParamGenExhausted` if `param_gen` falls short.
    pub fn new<PG: ParamGen>(
        nparams: NonZeroUsize,
        shard_size: NonZeroUsize,
        mut param_gen: PG,
    ) -> Result<Self> {
        let mut filled = 0;
        let mut shards = Vec::new();

        while filled < nparams.get() {
            let want = shard_size.get().min(nparams.get() - filled);

            let params = match param_gen.take_exact(want) {
                Some(params) => params,
                None => {
                    return Err(ServerErr::ParamGenExhausted {
                        got: filled,
                        expected: nparams.get(),
                    });
                }
            };

            filled += params.len();
            shards.push(ParameterShard::new(params));
        }

        Ok(Self {
            nparams: nparams.get(),
            shards: Arc::from(shards),
            shard_size,
        })
    }

    pub fn len(&self) -> usize {
        self.nparams
    }

    /// Applies every pair of `delta` to the parameters and their update counts.
    ///
    /// # Returns
    /// A `ServerErr::Delta` if any index is out of bounds, in which case nothing is applied.
    pub fn apply(&self, delta: &SparseDelta) -> Result<()> {
        delta.check_bounds(self.nparams)?;

        let size = self.shard_size.get();
        let mut buckets = vec![Vec::new(); self.shards.len()];

        for (i, value) in delta.iter() {
            buckets[i / size].push((i % size, value));
        }

        self.shards
            .par_iter()
            .zip(buckets.par_iter())
            .filter(|(_, entries)| !entries.is_empty())
            .for_each(|(shard, entries)| shard.apply(entries));

        Ok(())
    }

    /// Gathers all the sharded parameters into a local buffer.
    pub fn pull_params(&self) -> Vec<f32> {
        let mut out = vec![0.; self.nparams];

        self.shards
            .par_iter()
            .zip(out.par_chunks_mut(self.shard_size.get()))
            .for_each(|(shard, out_slice)| shard.pull_params(out_slice));

        out
    }

    /// Gathers all the sharded update counts into a local buffer.
    ///
    /// Shards are read one at a time, the result isn't an atomic snapshot of the store.
    pub fn pull_counts(&self) -> Vec<u64> {
        let mut out = vec![0; self.nparams];

        self.shards
            .par_iter()
            .zip(out.par_chunks_mut(self.shard_size.get()))
            .for_each(|(shard, out_slice)| shard.pull_counts(out_slice));

        out
    }

    /// Reads the parameters at `indices`, in the given order.
    ///
    /// # Returns
    /// A `ServerErr::Delta` if any index is out of bounds.
    pub fn gather(&self, indices: &[usize]) -> Result<Vec<f32>> {
        let size = self.shard_size.get();

        indices
            .iter()
            .map(|&i| match self.shards.get(i / size) {
                Some(shard) if i < self.nparams && i % size < shard.len() => {
                    Ok(shard.param(i % size))
                }
                _ => Err(ServerErr::Delta(DeltaErr::IndexOutOfRange {
                    index: i,
                    len: self.nparams,
                })),
            })
            .collect()
    }
}
