/// A `ParamGen` generates values for the initial state of a parameter vector.
pub trait ParamGen {
    /// Should sample at most `n` parameters.
    ///
    /// # Arguments
    /// * `n` - The upper limit of samples to generate.
    ///
    /// # Returns
    /// `None` once the generator is exhausted.
    fn sample(&mut self, n: usize) -> Option<Vec<f32>>;

    /// Drains the generator into a single vector of exactly `n` parameters.
    ///
    /// # Returns
    /// `None` if the generator runs out before `n` parameters are produced.
    fn take_exact(&mut self, n: usize) -> Option<Vec<f32>> {
        let mut params = Vec::with_capacity(n);

        while params.len() < n {
            let sample = self.sample(n - params.len())?;
            if sample.is_empty() {
                return None;
            }
            params.extend(sample);
        }

        Some(params)
    }
}

impl<P: ParamGen + ?Sized> ParamGen for Box<P> {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        (**self).sample(n)
    }
}
