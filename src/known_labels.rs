//! The ordered set of label codes seen during an annotation session.

use std::fmt;

/// The label code reserved for unlabeled background voxels.
pub const BACKGROUND_LABEL: i32 = 0;

/// An insertion-ordered set of integer label codes. The background code `0` is always the first element,
/// and the set only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownLabels {
    codes: Vec<i32>,
}

impl Default for KnownLabels {
    fn default() -> KnownLabels {
        KnownLabels { codes: vec![BACKGROUND_LABEL] }
    }
}

impl KnownLabels {

    /// Build a set from the given codes, in order, skipping duplicates. Background is prepended if missing.
    pub fn from_codes<I>(codes: I) -> KnownLabels
    where
        I: IntoIterator<Item = i32>,
    {
        let mut known = KnownLabels::default();
        for code in codes {
            known.insert(code);
        }
        known
    }

    /// Add a code to the end of the set. Returns `false` if it was already known.
    pub fn insert(&mut self, code: i32) -> bool {
        if self.contains(code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    pub fn contains(&self, code: i32) -> bool {
        self.codes.contains(&code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Always `false`, the background code is never removed. Pairs with `len` for clippy's `len_without_is_empty` lint.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, i32> {
        self.codes.iter()
    }

    /// The known codes in insertion order.
    pub fn as_slice(&self) -> &[i32] {
        &self.codes
    }

    /// The known codes without the background code, e.g. for populating a label selection control.
    pub fn foreground(&self) -> impl Iterator<Item = i32> + '_ {
        self.codes.iter().copied().filter(|c| *c != BACKGROUND_LABEL)
    }
}

impl<'a> IntoIterator for &'a KnownLabels {
    type Item = &'a i32;
    type IntoIter = std::slice::Iter<'a, i32>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

impl fmt::Display for KnownLabels {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} known labels (including background).", self.codes.len())
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn a_new_set_contains_only_background() {
        let known = KnownLabels::default();
        assert_eq!(known.as_slice(), &[0]);
        assert_eq!(1, known.len());
        assert_eq!(0, known.foreground().count());
    }

    #[test]
    fn background_is_always_first_and_duplicates_are_skipped() {
        let known = KnownLabels::from_codes(vec![3, 1, 3, 0, 2]);
        assert_eq!(known.as_slice(), &[0, 3, 1, 2]);
        assert_eq!(known.foreground().collect::<Vec<i32>>(), vec![3, 1, 2]);
    }

    #[test]
    fn insert_reports_whether_the_code_was_new() {
        let mut known = KnownLabels::default();
        assert!(known.insert(5));
        assert!(!known.insert(5));
        assert!(!known.insert(0));
        assert_eq!(known.as_slice(), &[0, 5]);
    }
}
