//! Deduplicated quadkey sets at a single zoom level.

use std::collections::btree_set;
use std::collections::BTreeSet;

use serde::Serialize;

use super::CoverageError;
use crate::coord::{Quadkey, MAX_ZOOM, MIN_ZOOM};

/// A set of quadkeys that all share one zoom level.
///
/// Iteration is in lexicographic order, so output built from a set is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageSet {
    zoom: u8,
    quadkeys: BTreeSet<Quadkey>,
}

impl CoverageSet {
    /// Creates an empty set for `zoom`.
    pub fn new(zoom: u8) -> Result<Self, CoverageError> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(CoverageError::InvalidZoom(zoom));
        }
        Ok(Self {
            zoom,
            quadkeys: BTreeSet::new(),
        })
    }

    /// Builds a set from quadkeys, which must all be at `zoom`.
    pub fn from_quadkeys<I>(zoom: u8, quadkeys: I) -> Result<Self, CoverageError>
    where
        I: IntoIterator<Item = Quadkey>,
    {
        let mut set = Self::new(zoom)?;
        for quadkey in quadkeys {
            set.insert(quadkey)?;
        }
        Ok(set)
    }

    /// Adds a quadkey. Returns whether it was new.
    pub fn insert(&mut self, quadkey: Quadkey) -> Result<bool, CoverageError> {
        if quadkey.zoom() != self.zoom {
            return Err(CoverageError::ZoomMismatch {
                expected: self.zoom,
                actual: quadkey.zoom(),
            });
        }
        Ok(self.quadkeys.insert(quadkey))
    }

    #[inline]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.quadkeys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quadkeys.is_empty()
    }

    pub fn contains(&self, quadkey: &Quadkey) -> bool {
        self.quadkeys.contains(quadkey)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Quadkey> {
        self.quadkeys.iter()
    }

    /// Derives the coarser grouping keys by keeping the first `zoom`
    /// digits of every quadkey and dropping duplicates.
    ///
    /// This is pure prefix truncation: the result is never larger than
    /// `self`, and every member is an ancestor of some member of `self`.
    pub fn coarsen(&self, zoom: u8) -> Result<CoverageSet, CoverageError> {
        if zoom < MIN_ZOOM || zoom > self.zoom {
            return Err(CoverageError::InvalidZoom(zoom));
        }
        let mut coarse = CoverageSet::new(zoom)?;
        for quadkey in &self.quadkeys {
            coarse.quadkeys.insert(quadkey.truncate(zoom)?);
        }
        Ok(coarse)
    }

    /// Adds every member of `other`, which must be at the same zoom.
    pub fn merge(&mut self, other: &CoverageSet) -> Result<(), CoverageError> {
        if other.zoom != self.zoom {
            return Err(CoverageError::ZoomMismatch {
                expected: self.zoom,
                actual: other.zoom,
            });
        }
        self.quadkeys.extend(other.quadkeys.iter().cloned());
        Ok(())
    }

    /// Quadkeys as plain strings, in set order.
    pub fn to_strings(&self) -> Vec<String> {
        self.quadkeys.iter().map(|q| q.to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a CoverageSet {
    type Item = &'a Quadkey;
    type IntoIter = btree_set::Iter<'a, Quadkey>;

    fn into_iter(self) -> Self::IntoIter {
        self.quadkeys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qk(s: &str) -> Quadkey {
        s.parse().unwrap()
    }

    #[test]
    fn test_insert_dedupes() {
        let mut set = CoverageSet::new(3).unwrap();
        assert!(set.insert(qk("012")).unwrap());
        assert!(!set.insert(qk("012")).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_rejects_other_zoom() {
        let mut set = CoverageSet::new(3).unwrap();
        let result = set.insert(qk("0123"));
        assert_eq!(
            result,
            Err(CoverageError::ZoomMismatch {
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn test_new_rejects_bad_zoom() {
        assert_eq!(CoverageSet::new(0), Err(CoverageError::InvalidZoom(0)));
        assert_eq!(CoverageSet::new(24), Err(CoverageError::InvalidZoom(24)));
    }

    #[test]
    fn test_coarsen_truncates_and_dedupes() {
        let set = CoverageSet::from_quadkeys(
            5,
            ["01230", "01231", "01232", "03000", "21003"].map(qk),
        )
        .unwrap();

        let coarse = set.coarsen(3).unwrap();
        assert_eq!(coarse.zoom(), 3);
        assert_eq!(coarse.to_strings(), vec!["012", "030", "210"]);
    }

    #[test]
    fn test_coarsen_to_same_zoom_is_identity() {
        let set = CoverageSet::from_quadkeys(2, ["01", "33"].map(qk)).unwrap();
        assert_eq!(set.coarsen(2).unwrap(), set);
    }

    #[test]
    fn test_coarsen_rejects_finer_zoom() {
        let set = CoverageSet::from_quadkeys(2, ["01"].map(qk)).unwrap();
        assert_eq!(set.coarsen(3), Err(CoverageError::InvalidZoom(3)));
    }

    #[test]
    fn test_merge() {
        let mut a = CoverageSet::from_quadkeys(2, ["01", "02"].map(qk)).unwrap();
        let b = CoverageSet::from_quadkeys(2, ["02", "03"].map(qk)).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.to_strings(), vec!["01", "02", "03"]);

        let c = CoverageSet::new(3).unwrap();
        assert!(a.merge(&c).is_err());
    }
}
