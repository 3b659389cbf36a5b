use std::cmp::Ordering;

use crate::{MlErr, Result};

/// The fraction of a vector's coordinates that take part in a sparse transmission.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Density(f64);

impl Density {
    /// Nothing is selected.
    pub const EMPTY: Self = Self(0.);

    /// Every coordinate is selected.
    pub const FULL: Self = Self(1.);

    /// Creates a new `Density`.
    ///
    /// # Arguments
    /// * `theta` - The fraction of coordinates to select.
    ///
    /// # Returns
    /// An `MlErr::InvalidDensity` if `theta` is NaN or outside of `[0, 1]`.
    pub fn new(theta: f64) -> Result<Self> {
        if !(0. ..=1.).contains(&theta) {
            return Err(MlErr::InvalidDensity(theta));
        }

        Ok(Self(theta))
    }

    /// Returns the raw fraction.
    pub fn get(self) -> f64 {
        self.0
    }

    /// The amount of coordinates this density selects out of `len`, `floor(theta * len)`.
    pub fn count(self, len: usize) -> usize {
        ((self.0 * len as f64).floor() as usize).min(len)
    }
}

impl TryFrom<f64> for Density {
    type Error = MlErr;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

/// A value that can rank coordinates under a total order.
pub trait RankKey: Copy {
    fn rank_cmp(&self, other: &Self) -> Ordering;
}

impl RankKey for f32 {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl RankKey for f64 {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

macro_rules! ord_rank_key {
    ($($t:ty),*) => {
        $(
            impl RankKey for $t {
                fn rank_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

ord_rank_key!(u32, u64, usize);

/// Selects the coordinates with the largest keys.
///
/// Picks `density.count(keys.len())` indices, ordered by descending key and breaking ties
/// by ascending index, so equal keys always resolve the same way.
///
/// # Arguments
/// * `keys` - The ranking key of every coordinate.
/// * `density` - The fraction of coordinates to select.
///
/// # Returns
/// The selected indices, possibly empty.
pub fn select_top_k<K: RankKey>(keys: &[K], density: Density) -> Vec<usize> {
    let k = density.count(keys.len());
    if k == 0 {
        return Vec::new();
    }

    let by_rank = |a: &usize, b: &usize| keys[*b].rank_cmp(&keys[*a]).then(a.cmp(b));
    let mut indices: Vec<usize> = (0..keys.len()).collect();

    if k < indices.len() {
        indices.select_nth_unstable_by(k - 1, by_rank);
        indices.truncate(k);
    }

    indices.sort_unstable_by(by_rank);
    indices
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    fn density(theta: f64) -> Density {
        Density::new(theta).unwrap()
    }

    #[test]
    fn rejects_out_of_range_density() {
        assert_eq!(Density::new(-0.1), Err(MlErr::InvalidDensity(-0.1)));
        assert_eq!(Density::new(1.5), Err(MlErr::InvalidDensity(1.5)));
        assert!(Density::new(f64::NAN).is_err());
        assert!(Density::try_from(0.5).is_ok());
    }

    #[test]
    fn count_floors() {
        assert_eq!(density(0.2).count(100), 20);
        assert_eq!(density(0.4).count(100), 40);
        assert_eq!(density(0.25).count(10), 2);
        assert_eq!(Density::FULL.count(7), 7);
        assert_eq!(Density::EMPTY.count(7), 0);
    }

    #[test]
    fn empty_density_selects_nothing() {
        let keys = [3., 1., 2.];
        assert!(select_top_k(&keys, Density::EMPTY).is_empty());
        assert!(select_top_k::<f32>(&[], Density::FULL).is_empty());
    }

    #[test]
    fn full_density_selects_everything_once() {
        let keys = [0.5, 3., 1., 3., -2.];
        let selected = select_top_k(&keys, Density::FULL);
        assert_eq!(selected, [1, 3, 2, 0, 4]);
    }

    #[test]
    fn ties_resolve_by_ascending_index() {
        let counts: [u64; 6] = [0, 1, 0, 1, 1, 0];
        assert_eq!(select_top_k(&counts, density(0.5)), [1, 3, 4]);
        assert_eq!(select_top_k(&counts, density(0.7)), [1, 3, 4, 0]);
    }

    #[test]
    fn top_k_holds_for_random_vectors() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let len = rng.random_range(1..200);
            let keys: Vec<f32> = (0..len).map(|_| rng.random_range(-10.0..10.0)).collect();
            let theta = rng.random_range(0.0..=1.0);

            let selected = select_top_k(&keys, density(theta));
            assert_eq!(selected.len(), density(theta).count(len));

            let mut seen = vec![false; len];
            for &i in &selected {
                assert!(i < len);
                assert!(!seen[i], "index {i} selected twice");
                seen[i] = true;
            }

            for pair in selected.windows(2) {
                assert!(keys[pair[0]] >= keys[pair[1]]);
            }

            let min_selected = selected.iter().map(|&i| keys[i]).fold(f32::INFINITY, f32::min);
            for (i, &key) in keys.iter().enumerate() {
                if !seen[i] {
                    assert!(key <= min_selected);
                }
            }
        }
    }
}
