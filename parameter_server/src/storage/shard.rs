use parking_lot::RwLock;

/// The state guarded by a shard's lock, both buffers are always the same length.
#[derive(Debug)]
struct ShardState {
    params: Box<[f32]>,
    counts: Box<[u64]>,
}

/// A contiguous slice of the global parameters together with how many uploads touched
/// each of them.
///
/// Uploads take the write lock so that concurrent `+=` on the same coordinate serialize,
/// reads take the read lock and may observe any interleaving of those uploads.
#[derive(Debug)]
pub struct ParameterShard {
    nparams: usize,
    state: RwLock<ShardState>,
}

impl ParameterShard {
    /// Creates a new `ParameterShard` with all update counts at zero.
    ///
    /// # Arguments
    /// * `params` - The initial state of the parameters.
    ///
    /// # Returns
    /// A new `ParameterShard` instance.
    pub fn new(params: Vec<f32>) -> Self {
        let nparams = params.len();

        Self {
            nparams,
            state: RwLock::new(ShardState {
                params: params.into_boxed_slice(),
                counts: vec![0; nparams].into_boxed_slice(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.nparams
    }

    /// Adds every value to its parameter and bumps its update count.
    ///
    /// # Arguments
    /// * `entries` - Pairs of shard-local offsets and values, offsets must be in bounds.
    pub fn apply(&self, entries: &[(usize, f32)]) {
        let mut state = self.state.write();
        let ShardState { params, counts } = &mut *state;

        for &(offset, value) in entries {
            params[offset] += value;
            counts[offset] += 1;
        }
    }

    /// Copies the shard's parameters into `out`, which must be of the shard's length.
    pub fn pull_params(&self, out: &mut [f32]) {
        out.copy_from_slice(&self.state.read().params);
    }

    /// Copies the shard's update counts into `out`, which must be of the shard's length.
    pub fn pull_counts(&self, out: &mut [u64]) {
        out.copy_from_slice(&self.state.read().counts);
    }

    /// Reads a single parameter at a shard-local offset.
    pub fn param(&self, offset: usize) -> f32 {
        self.state.read().params[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_adds_and_counts() {
        let shard = ParameterShard::new(vec![1.; 3]);

        shard.apply(&[(0, 1.), (2, -0.5)]);
        shard.apply(&[(0, 2.)]);

        let mut params = [0.; 3];
        shard.pull_params(&mut params);
        assert_eq!(params, [4., 1., 0.5]);

        let mut counts = [0; 3];
        shard.pull_counts(&mut counts);
        assert_eq!(counts, [2, 0, 1]);
        assert_eq!(shard.param(2), 0.5);
    }
}
