//! One-hot label encoding

/// Binary class-membership vector with exactly one 1
pub type OneHotLabel = Vec<u8>;

/// Encode a class index as a one-hot label
///
/// # Arguments
/// * `index` - Position of the class in the class list
/// * `len` - Number of classes
///
/// # Returns
/// A label of length `len` with a 1 at `index`
pub fn one_hot(index: usize, len: usize) -> OneHotLabel {
    debug_assert!(index < len, "class index {} outside {} classes", index, len);
    let mut label = vec![0; len];
    label[index] = 1;
    label
}

/// Position of the single 1 in a well-formed label
///
/// Returns `None` when the label has no 1, more than one 1, or any value
/// other than 0 and 1.
pub fn hot_index(label: &[u8]) -> Option<usize> {
    let mut hot = None;
    for (index, &value) in label.iter().enumerate() {
        match value {
            0 => {}
            1 if hot.is_none() => hot = Some(index),
            _ => return None,
        }
    }
    hot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hot_places_single_one() {
        assert_eq!(one_hot(0, 2), vec![1, 0]);
        assert_eq!(one_hot(3, 5), vec![0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_hot_index() {
        assert_eq!(hot_index(&one_hot(2, 4)), Some(2));
        assert_eq!(hot_index(&[0, 0, 0]), None);
        assert_eq!(hot_index(&[1, 1, 0]), None);
        assert_eq!(hot_index(&[0, 2, 0]), None);
    }
}
