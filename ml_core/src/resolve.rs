use comms::specs::{DistributionSpec, GradientSpec, ParamGenSpec};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Normal, Uniform};

use crate::{
    GradientSource, RandGradient, Result,
    initialization::{ConstParamGen, ParamGen, RandParamGen},
};

/// A gradient source that can be handed over to another thread.
pub type BoxedGradientSource = Box<dyn GradientSource<Batch = ()> + Send>;

/// Resolves a `DistributionSpec` into its concrete distribution and hands it to `callback`,
/// so that every generic consumer gets a statically dispatched distribution.
///
/// # Arguments
/// * `dist_spec` - A specification for a distribution.
/// * `callback` - The closure to call passing in the created distribution.
macro_rules! with_distribution {
    ($dist_spec:expr, $callback:expr) => {
        match $dist_spec {
            DistributionSpec::Uniform { low, high } => ($callback)(Uniform::new(low, high)?),
            DistributionSpec::Normal { mean, std_dev } => ($callback)(Normal::new(mean, std_dev)?),
        }
    };
}

/// Creates a random number generator given (or not) a seed.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Resolves the parameter generator for a vector of `limit` parameters.
///
/// # Returns
/// An `MlErr::Distribution` if the specified distribution is invalid.
pub fn param_gen(spec: ParamGenSpec, rng: StdRng, limit: usize) -> Result<Box<dyn ParamGen>> {
    match spec {
        ParamGenSpec::Const { value } => Ok(Box::new(ConstParamGen::new(value, limit))),
        ParamGenSpec::Rand { distribution } => with_distribution!(distribution, |dist| {
            Ok(Box::new(RandParamGen::new(rng, dist, limit)) as Box<dyn ParamGen>)
        }),
    }
}

/// Resolves the placeholder gradient source of a client.
///
/// # Returns
/// An `MlErr::Distribution` if the specified distribution is invalid.
pub fn gradient_source(spec: GradientSpec, rng: StdRng) -> Result<BoxedGradientSource> {
    match spec {
        GradientSpec::Rand { distribution } => with_distribution!(distribution, |dist| {
            Ok(Box::new(RandGradient::new(rng, dist)) as BoxedGradientSource)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MlErr;

    #[test]
    fn const_param_gen() {
        let mut param_gen = param_gen(ParamGenSpec::Const { value: 2. }, rng(None), 3).unwrap();
        assert_eq!(param_gen.take_exact(3).unwrap(), [2.; 3]);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn seeded_param_gens_agree() {
        let spec = ParamGenSpec::default();

        let mut a = param_gen(spec, rng(Some(11)), 8).unwrap();
        let mut b = param_gen(spec, rng(Some(11)), 8).unwrap();
        assert_eq!(a.take_exact(8), b.take_exact(8));
    }

    #[test]
    fn invalid_distribution() {
        let spec = GradientSpec::Rand {
            distribution: DistributionSpec::Uniform { low: 1., high: 0. },
        };

        assert!(matches!(
            gradient_source(spec, rng(None)),
            Err(MlErr::Distribution(_))
        ));
    }

    #[test]
    fn uniform_gradient_in_range() {
        let spec = GradientSpec::Rand {
            distribution: DistributionSpec::Uniform { low: 0., high: 0.5 },
        };

        let mut source = gradient_source(spec, rng(Some(1))).unwrap();
        let mut grad = [1.; 16];
        source.gradient(&[0.; 16], &(), &mut grad).unwrap();
        assert!(grad.iter().all(|g| (0. ..0.5).contains(g)));
    }
}
