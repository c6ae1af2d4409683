//! Random selection of catalog entries.
//!
//! Selection draws from the eligible subset of the catalog (all entries, or
//! only safe ones) and caps the number of results at the size of that
//! subset, so a request can never spin waiting for entries that don't
//! exist.

use crate::catalog::{Catalog, Entry};
use rand::Rng;
use serde::Deserialize;

/// How repeated entries are handled within one selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// Every slot is an independent uniform draw; an entry may repeat.
    #[default]
    WithReplacement,
    /// No entry appears more than once.
    Distinct,
}

fn eligible(catalog: &Catalog, include_unsafe: bool) -> Vec<&Entry> {
    catalog
        .iter()
        .filter(|entry| include_unsafe || entry.safe)
        .collect()
}

/// Number of entries a selection will return for this request.
///
/// `min(count, catalog size, eligible size)`.
pub fn effective_count(catalog: &Catalog, include_unsafe: bool, count: usize) -> usize {
    let eligible = if include_unsafe {
        catalog.len()
    } else {
        catalog.safe_count()
    };
    count.min(catalog.len()).min(eligible)
}

/// Pick up to `count` relative paths from the catalog at random.
pub fn select<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    include_unsafe: bool,
    count: usize,
    sampling: Sampling,
    rng: &mut R,
) -> Vec<&'a str> {
    let pool = eligible(catalog, include_unsafe);
    let count = count.min(catalog.len()).min(pool.len());
    if count == 0 {
        return Vec::new();
    }

    match sampling {
        Sampling::WithReplacement => (0..count)
            .map(|_| pool[rng.random_range(0..pool.len())].relative_path.as_str())
            .collect(),
        Sampling::Distinct => rand::seq::index::sample(rng, pool.len(), count)
            .into_iter()
            .map(|index| pool[index].relative_path.as_str())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Entry::new("a.gif", true),
            Entry::new("b.gif", true),
            Entry::new("c.gif", true),
            Entry::new("nsfw/x.gif", false),
        ])
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x6966)
    }

    #[test]
    fn returns_requested_count_when_available() {
        let catalog = catalog();
        let picked = select(&catalog, true, 2, Sampling::WithReplacement, &mut rng());
        assert_eq!(picked.len(), 2);

        let known: HashSet<_> = catalog.iter().map(|e| e.relative_path.as_str()).collect();
        assert!(picked.iter().all(|path| known.contains(path)));
    }

    #[test]
    fn count_is_capped_at_catalog_size() {
        let catalog = catalog();
        let picked = select(&catalog, true, 100, Sampling::WithReplacement, &mut rng());
        assert_eq!(picked.len(), 4);
    }

    #[test]
    fn zero_count_returns_nothing() {
        let catalog = catalog();
        let picked = select(&catalog, true, 0, Sampling::WithReplacement, &mut rng());
        assert!(picked.is_empty());
    }

    #[test]
    fn safe_only_never_returns_unsafe_entries() {
        let catalog = catalog();
        let mut rng = rng();
        for _ in 0..200 {
            let picked = select(&catalog, false, 3, Sampling::WithReplacement, &mut rng);
            assert!(picked.iter().all(|path| !path.starts_with("nsfw/")));
        }
    }

    #[test]
    fn safe_only_over_request_is_capped_at_safe_subset() {
        // 4 entries, 3 safe: asking for 5 safe ones must stop at 3
        let catalog = catalog();
        assert_eq!(effective_count(&catalog, false, 5), 3);

        let picked = select(&catalog, false, 5, Sampling::WithReplacement, &mut rng());
        assert_eq!(picked.len(), 3);

        let picked = select(&catalog, false, 5, Sampling::Distinct, &mut rng());
        let unique: HashSet<_> = picked.iter().copied().collect();
        assert_eq!(unique, HashSet::from(["a.gif", "b.gif", "c.gif"]));
    }

    #[test]
    fn no_safe_entries_returns_empty() {
        let catalog = Catalog::new(vec![
            Entry::new("nsfw/x.gif", false),
            Entry::new("nsfw/y.gif", false),
        ]);
        let picked = select(&catalog, false, 10, Sampling::WithReplacement, &mut rng());
        assert!(picked.is_empty());
    }

    #[test]
    fn empty_catalog_returns_empty() {
        let catalog = Catalog::default();
        assert!(select(&catalog, true, 10, Sampling::WithReplacement, &mut rng()).is_empty());
        assert!(select(&catalog, false, 10, Sampling::Distinct, &mut rng()).is_empty());
    }

    #[test]
    fn with_replacement_can_repeat_entries() {
        let catalog = Catalog::new(vec![Entry::new("a.gif", true), Entry::new("b.gif", true)]);
        let mut rng = rng();
        let repeated = (0..100).any(|_| {
            let picked = select(&catalog, true, 2, Sampling::WithReplacement, &mut rng);
            picked[0] == picked[1]
        });
        assert!(repeated);
    }

    #[test]
    fn distinct_never_repeats_entries() {
        let catalog = catalog();
        let mut rng = rng();
        for _ in 0..100 {
            let picked = select(&catalog, true, 4, Sampling::Distinct, &mut rng);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), 4);
        }
    }

    #[test]
    fn sampling_parses_from_snake_case() {
        let sampling: Sampling = serde_json::from_str("\"distinct\"").unwrap();
        assert_eq!(sampling, Sampling::Distinct);
        let sampling: Sampling = serde_json::from_str("\"with_replacement\"").unwrap();
        assert_eq!(sampling, Sampling::WithReplacement);
    }
}
