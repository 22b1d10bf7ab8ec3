//! Label-preserving shuffle of extracted pairs

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::errors::{FeatureError, FeatureResult};

/// Shuffle two index-aligned vectors with one shared permutation
///
/// Every element of `data` keeps its partner in `labels`. Passing the same
/// seed reproduces the same order; `None` draws a fresh seed.
///
/// # Arguments
/// * `data` - First vector, reordered in place
/// * `labels` - Second vector, reordered in place
/// * `seed` - Optional seed for the permutation
///
/// # Returns
/// The seed that was used, or an error if the vectors differ in length
pub fn shuffle_pairs<A, B>(data: &mut Vec<A>, labels: &mut Vec<B>, seed: Option<u64>) -> FeatureResult<u64> {
    if data.len() != labels.len() {
        return Err(FeatureError::MalformedPackage(format!(
            "cannot shuffle {} vectors with {} labels", data.len(), labels.len()
        )));
    }

    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut pairs: Vec<(A, B)> = data.drain(..).zip(labels.drain(..)).collect();
    pairs.shuffle(&mut rng);
    let (shuffled_data, shuffled_labels): (Vec<A>, Vec<B>) = pairs.into_iter().unzip();

    *data = shuffled_data;
    *labels = shuffled_labels;

    debug!("Shuffled {} pairs with seed {}", data.len(), seed);
    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_stay_together() {
        let mut data: Vec<usize> = (0..100).collect();
        let mut labels: Vec<usize> = (0..100).map(|v| v * 7).collect();
        shuffle_pairs(&mut data, &mut labels, None).unwrap();

        assert_eq!(data.len(), 100);
        for (d, l) in data.iter().zip(&labels) {
            assert_eq!(*l, d * 7);
        }
        let mut sorted = data.clone();
        sorted.sort();
        assert_eq!(sorted, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut first: Vec<u32> = (0..50).collect();
        let mut first_labels = first.clone();
        let mut second = first.clone();
        let mut second_labels = first.clone();

        let seed = shuffle_pairs(&mut first, &mut first_labels, Some(42)).unwrap();
        shuffle_pairs(&mut second, &mut second_labels, Some(seed)).unwrap();
        assert_eq!(first, second);
        assert_ne!(first, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut data = vec![1, 2, 3];
        let mut labels = vec![1];
        assert!(shuffle_pairs(&mut data, &mut labels, Some(1)).is_err());
    }
}
