use std::collections::BTreeSet;

use crate::PlotError;

/// Every sample index covered by any segment of a segment list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MembershipSet {
    indices: BTreeSet<usize>,
}

impl MembershipSet {
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Largest member, if any.
    pub fn max(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Fails with [`PlotError::InvalidIndex`] on the first member that does not
    /// address a sample of a series of length `len`.
    pub(crate) fn check_bounds(&self, len: usize) -> Result<(), PlotError> {
        match self.indices.range(len..).next() {
            Some(&index) => Err(PlotError::InvalidIndex { index, len }),
            None => Ok(()),
        }
    }
}

impl FromIterator<usize> for MembershipSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

/// Flatten a segment list into the set of all indices it covers.
///
/// Segments may overlap, repeat indices or arrive in any order; only the union
/// matters.
pub fn flatten<S: AsRef<[usize]>>(segments: &[S]) -> MembershipSet {
    segments
        .iter()
        .flat_map(|segment| segment.as_ref().iter().copied())
        .collect()
}

pub(crate) fn check_lengths(
    left: &'static str,
    left_len: usize,
    right: &'static str,
    right_len: usize,
) -> Result<(), PlotError> {
    if left_len != right_len {
        return Err(PlotError::LengthMismatch {
            left,
            left_len,
            right,
            right_len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_empty_list_is_empty() {
        let segments: Vec<Vec<usize>> = Vec::new();
        assert!(flatten(&segments).is_empty());
    }

    #[test]
    fn flatten_is_union_regardless_of_order() {
        let a = flatten(&[vec![4, 5, 6], vec![1, 2], vec![5, 6, 7]]);
        let b = flatten(&[vec![7, 6], vec![2, 1, 4], vec![5]]);
        assert_eq!(a, b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 2, 4, 5, 6, 7]);
        assert_eq!(a.max(), Some(7));
    }

    #[test]
    fn flatten_accepts_slices() {
        let first = [3usize, 4];
        let second = [9usize];
        let set = flatten(&[&first[..], &second[..]]);
        assert!(set.contains(3));
        assert!(set.contains(9));
        assert!(!set.contains(5));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn bounds_check_reports_first_offender() {
        let set = flatten(&[vec![1, 8, 12]]);
        assert!(set.check_bounds(13).is_ok());
        match set.check_bounds(8) {
            Err(PlotError::InvalidIndex { index, len }) => {
                assert_eq!(index, 8);
                assert_eq!(len, 8);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn length_check() {
        assert!(check_lengths("altitude", 3, "distance", 3).is_ok());
        assert!(matches!(
            check_lengths("altitude", 3, "distance", 2),
            Err(PlotError::LengthMismatch {
                left_len: 3,
                right_len: 2,
                ..
            })
        ));
    }
}
