use ndarray::ArrayView1;
use rand::Rng;

/// Exponential crossover: copy a contiguous, wrapping run of mutant genes
/// into the target, starting at a random gene. At least one gene is copied,
/// the run continues while a uniform draw in [0, 1) is below `cr`.
pub(crate) fn exponential_crossover<R: Rng + ?Sized>(
    target: ArrayView1<i64>,
    mutant: &[i64],
    cr: f64,
    rng: &mut R,
) -> Vec<i64> {
    let n = target.len();
    let mut trial = target.to_vec();
    let mut j = rng.random_range(0..n);
    let mut l = 0usize;
    loop {
        trial[j] = mutant[j];
        l += 1;
        j = (j + 1) % n;
        if rng.random::<f64>() >= cr || l >= n {
            break;
        }
    }
    trial
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_zero_rate_copies_exactly_one_gene() {
        let target = Array1::<i64>::zeros(6);
        let mutant = vec![1; 6];
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let t = exponential_crossover(target.view(), &mutant, 0.0, &mut rng);
            assert_eq!(t.iter().sum::<i64>(), 1);
        }
    }

    #[test]
    fn test_full_rate_copies_everything() {
        let target = Array1::<i64>::zeros(5);
        let mutant = vec![3, 4, 5, 6, 7];
        let mut rng = StdRng::seed_from_u64(6);
        assert_eq!(exponential_crossover(target.view(), &mutant, 1.0, &mut rng), mutant);
    }

    #[test]
    fn test_copied_genes_are_contiguous_with_wrap() {
        let target = Array1::<i64>::zeros(8);
        let mutant = vec![1; 8];
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let t = exponential_crossover(target.view(), &mutant, 0.5, &mut rng);
            // a wrapping run has at most one 0 -> 1 edge around the ring
            let rises = (0..8).filter(|&k| t[k] == 0 && t[(k + 1) % 8] == 1).count();
            assert!(rises <= 1);
            assert!(t.contains(&1));
        }
    }
}
