//! Keyword set similarity.
//!
//! Pure Rust implementations without external dependencies.

use std::collections::HashSet;

/// Jaccard overlap |A ∩ B| / |A ∪ B| of two keyword lists treated as sets.
///
/// Returns value in [0.0, 1.0]. Two empty lists have similarity 0.0 so that
/// items with no usable tokens never merge.
pub fn jaccard(a: &[String], b: &[String]) -> f32 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f32 / union as f32
}

/// Append unseen keywords from `incoming`, preserving insertion order, until
/// `cap` entries are held.
pub fn merge_keywords(existing: &mut Vec<String>, incoming: &[String], cap: usize) {
    for keyword in incoming {
        if existing.len() >= cap {
            break;
        }
        if !existing.contains(keyword) {
            existing.push(keyword.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_jaccard_identical() {
        let a = kw(&["gpu", "export", "rules"]);
        assert!((jaccard(&a, &a) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_jaccard_disjoint() {
        let a = kw(&["gpu", "export"]);
        let b = kw(&["pricing", "tiers"]);
        assert!(jaccard(&a, &b).abs() < 0.001);
    }

    #[test]
    fn test_jaccard_partial() {
        let a = kw(&["gpu", "export", "rules"]);
        let b = kw(&["gpu", "export", "china", "limits"]);
        // 2 shared of 5 distinct
        assert!((jaccard(&a, &b) - 0.4).abs() < 0.001);
    }

    #[test]
    fn test_jaccard_ignores_duplicates() {
        let a = kw(&["gpu", "gpu"]);
        let b = kw(&["gpu"]);
        assert!((jaccard(&a, &b) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_jaccard_empty() {
        let empty: Vec<String> = Vec::new();
        assert!(jaccard(&empty, &empty).abs() < 0.001);
        assert!(jaccard(&empty, &kw(&["gpu"])).abs() < 0.001);
    }

    #[test]
    fn test_merge_keywords_preserves_order() {
        let mut existing = kw(&["gpu", "export"]);
        merge_keywords(&mut existing, &kw(&["export", "china", "rules"]), 12);
        assert_eq!(existing, kw(&["gpu", "export", "china", "rules"]));
    }

    #[test]
    fn test_merge_keywords_respects_cap() {
        let mut existing = kw(&["a1", "a2", "a3"]);
        merge_keywords(&mut existing, &kw(&["b1", "b2", "b3"]), 4);
        assert_eq!(existing, kw(&["a1", "a2", "a3", "b1"]));
    }
}
