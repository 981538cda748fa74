use crate::harvest::CandidateTarget;
use crate::url::{join_route, normalize_origin};
use std::collections::HashSet;

/// Expands origins × routes into the ordered candidate sequence
///
/// For each origin the root URL comes first, followed by one candidate per
/// route in catalog order. Origins that cannot be normalized are skipped with a
/// warning. Repeated URLs keep their first occurrence only, so the origin that
/// listed a URL first owns it.
pub fn expand_candidates(origins: &[String], routes: &[String]) -> Vec<CandidateTarget> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::with_capacity(origins.len() * (routes.len() + 1));

    for origin in origins {
        let origin_id = origin.trim();
        let root = match normalize_origin(origin_id) {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!("Skipping origin '{}': {}", origin_id, e);
                continue;
            }
        };

        let urls = std::iter::once(root.clone())
            .chain(routes.iter().map(|route| join_route(&root, route)));

        for full_url in urls {
            if seen.insert(full_url.clone()) {
                candidates.push(CandidateTarget::new(full_url, origin_id));
            }
        }
    }

    candidates
}
