use ndarray::ArrayView1;
use rand::Rng;

use crate::bounds::Bounds;

/// best/1 mutation on integer genes.
///
/// Gene `j` becomes `best[j] + f * (x1[j] - x2[j])`, truncated toward zero and
/// clamped to its bounds, when a Bernoulli(`mutation_prob`) draw succeeds;
/// otherwise it keeps the target's value.
#[allow(clippy::too_many_arguments)]
pub(crate) fn mutant_best1<R: Rng + ?Sized>(
    target: ArrayView1<i64>,
    best: ArrayView1<i64>,
    x1: ArrayView1<i64>,
    x2: ArrayView1<i64>,
    f: f64,
    mutation_prob: f64,
    bounds: &Bounds,
    rng: &mut R,
) -> Vec<i64> {
    (0..target.len())
        .map(|j| {
            if mutation_prob >= 1.0 || rng.random::<f64>() < mutation_prob {
                let v = best[j] as f64 + f * (x1[j] - x2[j]) as f64;
                bounds.clamp_gene(j, v as i64)
            } else {
                target[j]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_mutation_truncates_and_clamps() {
        let bounds = Bounds::new(&[(1, 10), (1, 10), (1, 4)]).unwrap();
        let target = array![9, 9, 9];
        let best = array![5, 5, 4];
        let x1 = array![4, 1, 10];
        let x2 = array![1, 4, 1];
        let mut rng = StdRng::seed_from_u64(1);
        let (f, p) = (0.6, 1.0);
        let m =
            mutant_best1(target.view(), best.view(), x1.view(), x2.view(), f, p, &bounds, &mut rng);
        // 5 + 1.8 -> 6, 5 - 1.8 -> 3 (3.2 truncated), 4 + 5.4 -> clamped to 4
        assert_eq!(m, vec![6, 3, 4]);
    }

    #[test]
    fn test_zero_probability_keeps_target() {
        let bounds = Bounds::new(&[(1, 10); 4]).unwrap();
        let target = array![2, 3, 4, 5];
        let other = array![9, 9, 9, 9];
        let mut rng = StdRng::seed_from_u64(2);
        let (t, o) = (target.view(), other.view());
        let m = mutant_best1(t, o, o, t, 0.5, 0.0, &bounds, &mut rng);
        assert_eq!(m, target.to_vec());
    }
}
