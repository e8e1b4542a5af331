use rand::Rng;
use rand_distr::{Distribution, Gamma, GammaError};

/// Smallest concentration handed to the Gamma draws. Zero or negative
/// weights would make the distribution undefined.
pub const MIN_ALPHA: f64 = 1e-3;

/// Dirichlet distribution built from independent Gamma(alpha_i, 1) draws.
#[derive(Debug, Clone)]
pub struct DirichletSampler {
    alphas: Vec<f64>,
    gammas: Vec<Gamma<f64>>,
}

impl DirichletSampler {
    pub fn new(alphas: &[f64]) -> Result<Self, GammaError> {
        let alphas: Vec<f64> = alphas
            .iter()
            .map(|&a| if a.is_finite() && a > MIN_ALPHA { a } else { MIN_ALPHA })
            .collect();
        let gammas = alphas
            .iter()
            .map(|&a| Gamma::new(a, 1.0))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { alphas, gammas })
    }

    pub fn len(&self) -> usize {
        self.alphas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alphas.is_empty()
    }

    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }
}

impl Distribution<Vec<f64>> for DirichletSampler {
    /// Proportions summing to 1. If every Gamma draw underflows to zero
    /// (tiny alphas), all mass goes to the largest alpha.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let draws: Vec<f64> = self.gammas.iter().map(|g| g.sample(rng)).collect();
        normalize(draws, &self.alphas)
    }
}

fn normalize(mut draws: Vec<f64>, alphas: &[f64]) -> Vec<f64> {
    let total: f64 = draws.iter().sum();
    if total > 0.0 && total.is_finite() {
        for d in draws.iter_mut() {
            *d /= total;
        }
        return draws;
    }

    let mut largest = 0;
    for (i, &a) in alphas.iter().enumerate() {
        if a > alphas[largest] {
            largest = i;
        }
    }
    let mut point = vec![0.0; draws.len()];
    if let Some(p) = point.get_mut(largest) {
        *p = 1.0;
    }
    point
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_lie_on_the_simplex() {
        let sampler = DirichletSampler::new(&[10.0, 5.0, 2.5, 0.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = sampler.sample(&mut rng);
            assert_eq!(p.len(), 4);
            assert!(p.iter().all(|&x| (0.0..=1.0).contains(&x)));
            assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn non_positive_alphas_are_floored() {
        let sampler = DirichletSampler::new(&[-3.0, 0.0, f64::NAN, 2.0]).unwrap();
        assert_eq!(sampler.alphas(), &[MIN_ALPHA, MIN_ALPHA, MIN_ALPHA, 2.0]);
    }

    #[test]
    fn mean_tracks_concentration() {
        let sampler = DirichletSampler::new(&[30.0, 10.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let n = 4_000;
        let mean: f64 = (0..n).map(|_| sampler.sample(&mut rng)[0]).sum::<f64>() / n as f64;
        assert!((mean - 0.75).abs() < 0.02, "mean was {}", mean);
    }

    #[test]
    fn underflow_puts_all_mass_on_largest_alpha() {
        let alphas = [MIN_ALPHA, 3.0 * MIN_ALPHA, 2.0 * MIN_ALPHA];
        assert_eq!(normalize(vec![0.0; 3], &alphas), vec![0.0, 1.0, 0.0]);
        // first of equal alphas
        assert_eq!(normalize(vec![0.0, 0.0], &[0.5, 0.5]), vec![1.0, 0.0]);
    }

    #[test]
    fn tiny_alphas_still_sum_to_one() {
        let sampler = DirichletSampler::new(&[MIN_ALPHA, 2.0 * MIN_ALPHA]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut point_masses = 0;
        for _ in 0..2_000 {
            let p = sampler.sample(&mut rng);
            assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9, "{:?}", p);
            if p == vec![0.0, 1.0] {
                point_masses += 1;
            }
        }
        assert!(point_masses > 0);
    }

    #[test]
    fn seeded_draws_repeat() {
        let sampler = DirichletSampler::new(&[1.0, 2.0, 3.0]).unwrap();
        let a = sampler.sample(&mut StdRng::seed_from_u64(9));
        let b = sampler.sample(&mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
