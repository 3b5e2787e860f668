use std::fmt;

use crate::catalog::Catalog;
use crate::embedding::Embedding;
use crate::error::MatchError;

/// Outcome of one matching session.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The closest stored face was within tolerance
    Matched { label: String, distance: f32 },
    /// Every stored face was at or beyond tolerance
    NotMatched,
    /// The catalog was empty
    NoCandidates,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Matched { label, distance } => {
                write!(f, "Face matched: {} (distance {:.3})", label, distance)
            }
            Verdict::NotMatched => write!(f, "Face not matched"),
            Verdict::NoCandidates => write!(f, "No known faces available for comparison"),
        }
    }
}

/// Nearest-neighbor search with a rejection threshold.
///
/// The closest catalog entry wins, ties going to the earlier entry. A match
/// requires the distance to be strictly below `tolerance`; a distance
/// exactly at the threshold does not match. Pure and deterministic.
pub fn identify(
    catalog: &Catalog,
    query: &Embedding,
    tolerance: f32,
) -> Result<Verdict, MatchError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(MatchError::InvalidTolerance(tolerance));
    }

    let mut entries = catalog.iter();
    let (mut best_entry, mut best_distance) = match entries.next() {
        Some(entry) => (entry, query.distance(&entry.embedding)?),
        None => return Ok(Verdict::NoCandidates),
    };
    for entry in entries {
        let distance = query.distance(&entry.embedding)?;
        if distance < best_distance {
            best_entry = entry;
            best_distance = distance;
        }
    }

    if best_distance < tolerance {
        Ok(Verdict::Matched {
            label: best_entry.label.clone(),
            distance: best_distance,
        })
    } else {
        Ok(Verdict::NotMatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn entry(label: &str, values: Vec<f32>) -> CatalogEntry {
        CatalogEntry {
            label: label.to_string(),
            embedding: Embedding::new(values),
        }
    }

    fn catalog(entries: Vec<CatalogEntry>) -> Catalog {
        entries.into_iter().collect()
    }

    #[test]
    fn empty_catalog_yields_no_candidates() {
        let query = Embedding::new(vec![0.0, 0.0]);
        let verdict = identify(&Catalog::new(), &query, 0.6).unwrap();
        assert_eq!(verdict, Verdict::NoCandidates);
    }

    #[test]
    fn non_empty_catalog_never_yields_no_candidates() {
        let query = Embedding::new(vec![0.0, 0.0]);
        let far = catalog(vec![entry("Far", vec![100.0, 100.0])]);
        assert_eq!(identify(&far, &query, 0.6).unwrap(), Verdict::NotMatched);

        let near = catalog(vec![entry("Near", vec![0.1, 0.0])]);
        assert!(matches!(
            identify(&near, &query, 0.6).unwrap(),
            Verdict::Matched { .. }
        ));
    }

    #[test]
    fn closest_entry_wins() {
        let query = Embedding::new(vec![0.0, 0.0]);
        let cat = catalog(vec![
            entry("Alice", vec![0.3, 0.0]),
            entry("Bob", vec![0.8, 0.0]),
        ]);
        match identify(&cat, &query, 0.6).unwrap() {
            Verdict::Matched { label, distance } => {
                assert_eq!(label, "Alice");
                assert!((distance - 0.3).abs() < 1e-6);
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn tighter_tolerance_rejects_the_same_catalog() {
        let query = Embedding::new(vec![0.0, 0.0]);
        let cat = catalog(vec![
            entry("Alice", vec![0.3, 0.0]),
            entry("Bob", vec![0.8, 0.0]),
        ]);
        assert_eq!(identify(&cat, &query, 0.2).unwrap(), Verdict::NotMatched);
    }

    #[test]
    fn ties_go_to_the_first_entry() {
        let query = Embedding::new(vec![0.0, 0.0]);
        let cat = catalog(vec![
            entry("First", vec![0.5, 0.0]),
            entry("Second", vec![-0.5, 0.0]),
        ]);
        match identify(&cat, &query, 0.6).unwrap() {
            Verdict::Matched { label, .. } => assert_eq!(label, "First"),
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn distance_equal_to_tolerance_does_not_match() {
        let query = Embedding::new(vec![0.0, 0.0]);
        let cat = catalog(vec![entry("Edge", vec![0.5, 0.0])]);
        assert_eq!(identify(&cat, &query, 0.5).unwrap(), Verdict::NotMatched);
    }

    #[test]
    fn distance_just_below_tolerance_matches() {
        let query = Embedding::new(vec![0.0, 0.0]);
        let cat = catalog(vec![entry("Edge", vec![0.5, 0.0])]);
        assert!(matches!(
            identify(&cat, &query, 0.5 + f32::EPSILON).unwrap(),
            Verdict::Matched { .. }
        ));
    }

    #[test]
    fn exact_query_always_matches_for_positive_tolerance() {
        let query = Embedding::new(vec![0.7, -0.2, 0.1]);
        let cat = catalog(vec![entry("Self", vec![0.7, -0.2, 0.1])]);
        match identify(&cat, &query, 1e-9).unwrap() {
            Verdict::Matched { distance, .. } => assert_eq!(distance, 0.0),
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn identical_inputs_give_identical_verdicts() {
        let query = Embedding::new(vec![0.1, 0.2]);
        let cat = catalog(vec![
            entry("Alice", vec![0.3, 0.1]),
            entry("Bob", vec![0.0, 0.0]),
        ]);
        let first = identify(&cat, &query, 0.6).unwrap();
        let second = identify(&cat, &query, 0.6).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn negative_tolerance_is_a_configuration_error() {
        let query = Embedding::new(vec![0.0]);
        let cat = catalog(vec![entry("A", vec![0.1])]);
        assert!(matches!(
            identify(&cat, &query, -0.1),
            Err(MatchError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn non_finite_tolerance_is_a_configuration_error() {
        let query = Embedding::new(vec![0.0]);
        let cat = catalog(vec![entry("A", vec![0.1])]);
        assert!(matches!(
            identify(&cat, &query, f32::NAN),
            Err(MatchError::InvalidTolerance(_))
        ));
        assert!(matches!(
            identify(&cat, &query, f32::INFINITY),
            Err(MatchError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn dimension_mismatch_fails_fast() {
        let query = Embedding::new(vec![0.0, 0.0]);
        let cat = catalog(vec![
            entry("Good", vec![0.1, 0.0]),
            entry("Bad", vec![0.1, 0.0, 0.0]),
        ]);
        assert!(matches!(
            identify(&cat, &query, 0.6),
            Err(MatchError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn duplicate_labels_are_independent_candidates() {
        let query = Embedding::new(vec![0.0, 0.0]);
        let cat = catalog(vec![
            entry("Alice", vec![5.0, 0.0]),
            entry("Alice", vec![0.2, 0.0]),
        ]);
        match identify(&cat, &query, 0.6).unwrap() {
            Verdict::Matched { label, distance } => {
                assert_eq!(label, "Alice");
                assert!((distance - 0.2).abs() < 1e-6);
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }
}
