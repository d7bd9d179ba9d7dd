use rand::{Rng, RngCore};

/// Returns a uniformly chosen index in `0..len`, excluding `excluded`.
///
/// Returns `None` if no index other than `excluded` exists.
pub(crate) fn index_excluding(rng: &mut dyn RngCore, len: usize, excluded: usize) -> Option<usize> {
    if excluded >= len {
        return (len > 0).then(|| rng.gen_range(0..len));
    }
    if len < 2 {
        return None;
    }
    let index = rng.gen_range(0..len - 1);
    Some(if index >= excluded { index + 1 } else { index })
}

/// Returns two distinct indices in `0..len`, uniformly chosen.
///
/// Returns `None` if `len < 2`.
pub(crate) fn distinct_pair(rng: &mut dyn RngCore, len: usize) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    let first = rng.gen_range(0..len);
    let second = index_excluding(rng, len, first)?;
    Some((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn index_excluding_never_returns_excluded() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 2..10 {
            for excluded in 0..len {
                for _ in 0..50 {
                    let index = index_excluding(&mut rng, len, excluded).unwrap();
                    assert!(index < len);
                    assert_ne!(index, excluded);
                }
            }
        }
    }

    #[test]
    fn index_excluding_single_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(index_excluding(&mut rng, 1, 0), None);
        assert_eq!(index_excluding(&mut rng, 0, 0), None);
        assert_eq!(index_excluding(&mut rng, 1, 3), Some(0));
    }

    #[test]
    fn distinct_pair_is_distinct() {
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(distinct_pair(&mut rng, 1), None);
        for _ in 0..200 {
            let (a, b) = distinct_pair(&mut rng, 3).unwrap();
            assert_ne!(a, b);
            assert!(a < 3 && b < 3);
        }
    }
}
