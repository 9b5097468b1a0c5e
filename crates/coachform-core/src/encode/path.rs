//! Bracketed-path key grammar
//!
//! A key is the first segment rendered bare, followed by every further
//! segment in square brackets: `root`, `root[name]`, `root[plan][trainings][0][weekday]`.
//! Building keys through this one function keeps ad hoc string
//! concatenation (missing brackets, off-by-one indices) out of the engine.

use std::fmt::Write as _;

/// One segment of a wire path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seg {
    /// A named field or collection
    Key(&'static str),
    /// A row's live position within its collection
    Index(usize),
}

impl std::fmt::Display for Seg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seg::Key(k) => write!(f, "{}", k),
            Seg::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Render a segment path as a bracketed key
///
/// The empty path renders as the empty string.
pub fn bracketed(segments: &[Seg]) -> String {
    let mut key = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i == 0 {
            let _ = write!(key, "{}", seg);
        } else {
            let _ = write!(key, "[{}]", seg);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_root_scalar() {
        assert_eq!(bracketed(&[Seg::Key("root"), Seg::Key("name")]), "root[name]");
    }

    #[test]
    fn test_nested_collection_path() {
        let segs = [
            Seg::Key("root"),
            Seg::Key("plan"),
            Seg::Key("trainings"),
            Seg::Index(0),
            Seg::Key("exercises"),
            Seg::Index(2),
            Seg::Key("sets"),
            Seg::Index(10),
            Seg::Key("series"),
        ];
        assert_eq!(
            bracketed(&segs),
            "root[plan][trainings][0][exercises][2][sets][10][series]"
        );
    }

    #[test]
    fn test_single_segment_is_bare() {
        assert_eq!(bracketed(&[Seg::Key("root")]), "root");
    }

    #[test]
    fn test_empty_path_is_empty_string() {
        assert_eq!(bracketed(&[]), "");
    }

    fn seg_strategy() -> impl Strategy<Value = Seg> {
        prop_oneof![
            Just(Seg::Key("plan")),
            Just(Seg::Key("trainings")),
            Just(Seg::Key("weekday")),
            (0usize..100).prop_map(Seg::Index),
        ]
    }

    proptest! {
        /// Every non-head segment contributes exactly one bracket pair,
        /// and rendering is a pure function of the segments.
        #[test]
        fn prop_bracket_count_and_determinism(segs in prop::collection::vec(seg_strategy(), 1..8)) {
            let mut path = vec![Seg::Key("root")];
            path.extend(&segs);
            let a = bracketed(&path);
            let b = bracketed(&path);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.matches('[').count(), segs.len());
            prop_assert_eq!(a.matches(']').count(), segs.len());
            prop_assert!(a.starts_with("root["));
        }
    }
}
