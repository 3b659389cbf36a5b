use comms::SparseDelta;
use log::{debug, info};
use ml_core::{
    Density, GradientSource, select_top_k,
    optimization::{GradientDescent, Optimizer},
};
use parameter_server::Aggregator;

use crate::{ClientConfig, ClientErr, Result};

/// The local parameters before and after merging a download.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub before: Vec<f32>,
    pub after: Vec<f32>,
    /// The overwritten coordinates, in the order the aggregator ranked them.
    pub indices: Vec<usize>,
}

impl SyncReport {
    /// The change of every overwritten coordinate, paired with `indices`.
    pub fn diff(&self) -> Vec<f32> {
        self.indices
            .iter()
            .map(|&i| self.after[i] - self.before[i])
            .collect()
    }
}

/// Everything a client exchanged during one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    /// The dense gradient of the local step.
    pub gradient: Vec<f32>,
    /// The sparse gradient sent to the aggregator.
    pub upload: SparseDelta,
    pub sync: SyncReport,
}

/// A federated client, owner of a local copy of the parameters.
///
/// Every round it takes a local optimization step, uploads the largest gradient
/// coordinates and overwrites its most stale coordinates with the aggregator's values.
pub struct Client<G: GradientSource, O: Optimizer = GradientDescent> {
    client_id: usize,
    params: Vec<f32>,
    source: G,
    optimizer: O,
    aggregator: Aggregator,
}

impl<G: GradientSource> Client<G> {
    /// Creates a new `Client` that descends along the gradient.
    ///
    /// # Args
    /// * `config` - The client's settings.
    /// * `params` - The initial local parameters.
    /// * `source` - The local gradient computation.
    /// * `aggregator` - The aggregator to synchronize with.
    ///
    /// # Returns
    /// A `ClientErr::SizeMismatch` if `params` isn't as long as the global parameters.
    pub fn new(
        config: ClientConfig,
        params: Vec<f32>,
        source: G,
        aggregator: Aggregator,
    ) -> Result<Self> {
        Self::with_optimizer(
            config.client_id(),
            params,
            source,
            config.optimizer(),
            aggregator,
        )
    }
}

impl<G: GradientSource, O: Optimizer> Client<G, O> {
    /// Creates a new `Client` with a custom local optimizer.
    ///
    /// # Returns
    /// A `ClientErr::SizeMismatch` if `params` isn't as long as the global parameters.
    pub fn with_optimizer(
        client_id: usize,
        params: Vec<f32>,
        source: G,
        optimizer: O,
        aggregator: Aggregator,
    ) -> Result<Self> {
        if params.len() != aggregator.len() {
            return Err(ClientErr::SizeMismatch {
                what: "local parameters",
                got: params.len(),
                expected: aggregator.len(),
            });
        }

        Ok(Self {
            client_id,
            params,
            source,
            optimizer,
            aggregator,
        })
    }

    pub fn id(&self) -> usize {
        self.client_id
    }

    /// The current local parameters.
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Computes the gradient over the local parameters and takes an optimizer step with it.
    ///
    /// # Arguments
    /// * `batch` - The training data for this step.
    ///
    /// # Returns
    /// The dense gradient.
    pub fn local_step(&mut self, batch: &G::Batch) -> Result<Vec<f32>> {
        let mut grad = vec![0.; self.params.len()];

        self.source.gradient(&self.params, batch, &mut grad)?;
        self.optimizer.update_params(&grad, &mut self.params)?;

        debug!(client_id = self.client_id; "local step done");
        Ok(grad)
    }

    /// Selects the gradient coordinates of largest magnitude.
    ///
    /// # Arguments
    /// * `grad` - A dense gradient of every parameter.
    /// * `density` - The fraction of coordinates to upload.
    ///
    /// # Returns
    /// The raw gradient values at the selected coordinates, or a `ClientErr::SizeMismatch`
    /// if `grad` isn't as long as the parameters.
    pub fn select_upload(&self, grad: &[f32], density: Density) -> Result<SparseDelta> {
        if grad.len() != self.params.len() {
            return Err(ClientErr::SizeMismatch {
                what: "gradient",
                got: grad.len(),
                expected: self.params.len(),
            });
        }

        let magnitudes: Vec<f32> = grad.iter().map(|g| g.abs()).collect();
        let indices = select_top_k(&magnitudes, density);

        Ok(SparseDelta::gather(grad, indices)?)
    }

    /// Selects the upload and has the aggregator apply it.
    ///
    /// # Returns
    /// The delta that was applied.
    pub fn upload(&self, grad: &[f32], density: Density) -> Result<SparseDelta> {
        let delta = self.select_upload(grad, density)?;
        self.aggregator.apply_upload(&delta)?;

        debug!(client_id = self.client_id, entries = delta.len(); "uploaded gradient");
        Ok(delta)
    }

    /// Downloads the aggregator's most updated parameters and merges them, keeping a copy
    /// of the local parameters from before the merge.
    ///
    /// # Arguments
    /// * `density` - The fraction of coordinates to download.
    pub fn sync_download(&mut self, density: Density) -> Result<SyncReport> {
        let delta = self.aggregator.select_download(density)?;
        let before = self.params.clone();

        self.merge_download(&delta)?;

        Ok(SyncReport {
            before,
            after: self.params.clone(),
            indices: delta.into_parts().0,
        })
    }

    /// Same as `sync_download` without the snapshot.
    ///
    /// # Returns
    /// The overwritten coordinates.
    pub fn pull_download(&mut self, density: Density) -> Result<Vec<usize>> {
        let delta = self.aggregator.select_download(density)?;
        self.merge_download(&delta)?;
        Ok(delta.into_parts().0)
    }

    /// Overwrites the local parameters at the delta's coordinates, leaving the rest untouched.
    ///
    /// # Returns
    /// A `ClientErr::Delta` if any index is out of range, in which case nothing is written.
    pub fn merge_download(&mut self, delta: &SparseDelta) -> Result<()> {
        delta.check_bounds(self.params.len())?;

        for (i, value) in delta.iter() {
            self.params[i] = value;
        }

        debug!(client_id = self.client_id, entries = delta.len(); "merged download");
        Ok(())
    }

    /// Runs a whole round: local step, upload, and download.
    ///
    /// # Arguments
    /// * `batch` - The training data for the local step.
    /// * `upload` - The fraction of gradient coordinates to upload.
    /// * `download` - The fraction of parameters to download.
    pub fn round(
        &mut self,
        batch: &G::Batch,
        upload: Density,
        download: Density,
    ) -> Result<RoundReport> {
        let gradient = self.local_step(batch)?;
        let upload = self.upload(&gradient, upload)?;
        let sync = self.sync_download(download)?;

        info!(
            client_id = self.client_id,
            uploaded = upload.len(),
            downloaded = sync.indices.len();
            "round finished"
        );

        Ok(RoundReport {
            gradient,
            upload,
            sync,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use ml_core::{MlErr, initialization::ConstParamGen};

    use super::*;

    /// Yields the same gradient every step, whatever the parameters.
    struct FixedGradient(Vec<f32>);

    impl GradientSource for FixedGradient {
        type Batch = ();

        fn gradient(&mut self, _params: &[f32], _batch: &(), grad: &mut [f32]) -> ml_core::Result<()> {
            if grad.len() != self.0.len() {
                return Err(MlErr::SizeMismatch {
                    what: "gradient",
                    got: grad.len(),
                    expected: self.0.len(),
                });
            }

            grad.copy_from_slice(&self.0);
            Ok(())
        }
    }

    fn aggregator(nparams: usize) -> Aggregator {
        let n = NonZeroUsize::new(nparams).unwrap();
        Aggregator::new(n, n, ConstParamGen::new(0., nparams)).unwrap()
    }

    fn client(grad: Vec<f32>, params: Vec<f32>) -> Client<FixedGradient> {
        let agg = aggregator(params.len());
        let config = ClientConfig::new(1, 0.5).unwrap();
        Client::new(config, params, FixedGradient(grad), agg).unwrap()
    }

    fn density(theta: f64) -> Density {
        Density::new(theta).unwrap()
    }

    #[test]
    fn rejects_params_of_wrong_length() {
        let config = ClientConfig::with_id(0);
        let res = Client::new(config, vec![0.; 3], FixedGradient(vec![]), aggregator(4));

        assert!(matches!(
            res,
            Err(ClientErr::SizeMismatch { got: 3, expected: 4, .. })
        ));
    }

    #[test]
    fn local_step_descends() {
        let mut client = client(vec![2., -4., 0.], vec![1., 1., 1.]);

        let grad = client.local_step(&()).unwrap();
        assert_eq!(grad, [2., -4., 0.]);
        assert_eq!(client.params(), [0., 3., 1.]);
    }

    #[test]
    fn upload_picks_largest_magnitudes() {
        let client = client(vec![], vec![0.; 6]);
        let grad = [0.1, -3., 2., -0.5, 2., 0.];

        let delta = client.select_upload(&grad, density(0.5)).unwrap();
        assert_eq!(delta.indices(), [1, 2, 4]);
        assert_eq!(delta.values(), [-3., 2., 2.]);
    }

    #[test]
    fn upload_rejects_wrong_gradient_length() {
        let client = client(vec![], vec![0.; 5]);

        let err = client.select_upload(&[1.; 4], Density::FULL).unwrap_err();
        assert_eq!(
            err,
            ClientErr::SizeMismatch {
                what: "gradient",
                got: 4,
                expected: 5
            }
        );
    }

    #[test]
    fn empty_densities_exchange_nothing() {
        let mut client = client(vec![1.; 4], vec![3.; 4]);

        let report = client.round(&(), Density::EMPTY, Density::EMPTY).unwrap();
        assert!(report.upload.is_empty());
        assert!(report.sync.indices.is_empty());
        assert_eq!(report.sync.before, report.sync.after);
    }

    #[test]
    fn merge_is_all_or_nothing() {
        let mut client = client(vec![], vec![1.; 3]);

        let delta = SparseDelta::new(vec![0, 3], vec![9., 9.]).unwrap();
        assert!(matches!(
            client.merge_download(&delta),
            Err(ClientErr::Delta(_))
        ));
        assert_eq!(client.params(), [1.; 3]);
    }

    #[test]
    fn sync_report_diff() {
        let mut client = client(vec![0., 0., 5.], vec![1., 1., 1.]);
        let grad = client.local_step(&()).unwrap();
        client.upload(&grad, density(0.4)).unwrap();

        let report = client.sync_download(density(0.4)).unwrap();
        assert_eq!(report.indices, [2]);
        assert_eq!(report.after[2], 5.);
        assert_eq!(report.diff(), [5. - (1. - 0.5 * 5.)]);
    }
}
