//! Link resolution: from id-based [`LinkSpec`]s to index pairs the force
//! loop can use directly.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::building::LinkSpec;
use crate::error::{LayoutError, Result};
use crate::types::BodyId;

/// A link between two bodies of one run, by index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedLink {
    pub source: BodyId,
    pub target: BodyId,
    pub strength: f64,
    /// `true` if auto-completion created this link.
    pub synthetic: bool,
}

fn pair_key(a: BodyId, b: BodyId) -> (BodyId, BodyId) {
    if a < b { (a, b) } else { (b, a) }
}

/// Maps caller links onto body indices.
///
/// Links naming an unknown id, linking a body to itself, or repeating an
/// already-seen unordered pair are dropped; the first link for a pair wins.
///
/// ### Returns
/// - The surviving links in input order.
/// - `Err(LayoutError::InvalidStrength)` if a surviving link's strength is
///   not a positive finite number.
pub fn resolve(links: &[LinkSpec], index: &HashMap<&str, BodyId>) -> Result<Vec<ResolvedLink>> {
    let mut seen = HashSet::with_capacity(links.len());
    let mut out = Vec::with_capacity(links.len());

    for link in links {
        let (Some(&source), Some(&target)) = (
            index.get(link.source.as_str()),
            index.get(link.target.as_str()),
        ) else {
            debug!(source = %link.source, target = %link.target, "dropping link to unknown building");
            continue;
        };
        if source == target {
            debug!(id = %link.source, "dropping self-link");
            continue;
        }
        if !seen.insert(pair_key(source, target)) {
            debug!(source = %link.source, target = %link.target, "dropping duplicate link");
            continue;
        }
        if !(link.strength.is_finite() && link.strength > 0.0) {
            return Err(LayoutError::InvalidStrength {
                from: link.source.clone(),
                to: link.target.clone(),
                strength: link.strength,
            });
        }

        out.push(ResolvedLink {
            source,
            target,
            strength: link.strength,
            synthetic: false,
        });
    }
    Ok(out)
}

/// Adds a `weak_strength` link for every unordered pair of the `count`
/// bodies that has none yet.
///
/// Synthesized links are appended in `(i, j)` order with `i < j`.
pub fn complete(links: &mut Vec<ResolvedLink>, count: usize, weak_strength: f64) {
    let existing: HashSet<_> = links
        .iter()
        .map(|l| pair_key(l.source, l.target))
        .collect();

    let before = links.len();
    for i in 0..count {
        for j in (i + 1)..count {
            if !existing.contains(&(i, j)) {
                links.push(ResolvedLink {
                    source: i,
                    target: j,
                    strength: weak_strength,
                    synthetic: true,
                });
            }
        }
    }
    debug!(added = links.len() - before, "auto-completed weak links");
}

/// Number of links touching each body.
pub fn degrees(links: &[ResolvedLink], count: usize) -> Vec<usize> {
    let mut deg = vec![0; count];
    for l in links {
        deg[l.source] += 1;
        deg[l.target] += 1;
    }
    deg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index<'a>(ids: &[&'a str]) -> HashMap<&'a str, BodyId> {
        ids.iter().enumerate().map(|(i, &id)| (id, i)).collect()
    }

    #[test]
    fn resolve_maps_ids_to_indices() {
        let idx = index(&["a", "b", "c"]);
        let links = resolve(&[LinkSpec::new("c", "a", 4.0)], &idx).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].source, links[0].target), (2, 0));
        assert_eq!(links[0].strength, 4.0);
        assert!(!links[0].synthetic);
    }

    #[test]
    fn resolve_drops_dangling_self_and_duplicate_links() {
        let idx = index(&["a", "b"]);
        let links = resolve(
            &[
                LinkSpec::new("a", "ghost", 5.0),
                LinkSpec::new("a", "a", 5.0),
                LinkSpec::new("a", "b", 7.0),
                LinkSpec::new("b", "a", 2.0),
            ],
            &idx,
        )
        .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].strength, 7.0);
    }

    #[test]
    fn resolve_rejects_non_positive_strength() {
        let idx = index(&["a", "b"]);
        let err = resolve(&[LinkSpec::new("a", "b", 0.0)], &idx).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidStrength { .. }));

        // A dangling link is dropped before its strength is looked at.
        assert!(resolve(&[LinkSpec::new("a", "zzz", -1.0)], &idx).is_ok());
    }

    #[test]
    fn complete_adds_weak_links_for_missing_pairs() {
        let idx = index(&["a", "b", "c"]);
        let mut links = resolve(&[LinkSpec::new("a", "b", 5.0)], &idx).unwrap();
        complete(&mut links, 3, 1.0);

        assert_eq!(links.len(), 3);
        let pairs: HashSet<_> = links.iter().map(|l| pair_key(l.source, l.target)).collect();
        assert_eq!(pairs, HashSet::from([(0, 1), (0, 2), (1, 2)]));
        assert!(links.iter().all(|l| l.source != l.target));

        let ab = links.iter().find(|l| pair_key(l.source, l.target) == (0, 1)).unwrap();
        assert_eq!(ab.strength, 5.0);
        assert!(!ab.synthetic);
        for l in links.iter().filter(|l| pair_key(l.source, l.target) != (0, 1)) {
            assert_eq!(l.strength, 1.0);
            assert!(l.synthetic);
        }
    }

    #[test]
    fn complete_respects_reversed_explicit_links() {
        let idx = index(&["a", "b"]);
        let mut links = resolve(&[LinkSpec::new("b", "a", 3.0)], &idx).unwrap();
        complete(&mut links, 2, 1.0);
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn degrees_count_both_endpoints() {
        let mut links = Vec::new();
        complete(&mut links, 4, 1.0);
        assert_eq!(links.len(), 6);
        assert_eq!(degrees(&links, 4), vec![3, 3, 3, 3]);
        assert_eq!(degrees(&[], 2), vec![0, 0]);
    }
}
