//! Cost-based ranking for overload resolution.
//!
//! Selects the cheapest viable candidate. Equal costs are not broken by any
//! further rule; the tie is reported as ambiguous.

use hierarch_core::ResolutionVerdict;

use super::OverloadMatch;

/// Find the best match from viable candidates.
///
/// # Returns
///
/// * `NoMatch` - `viable` is empty
/// * `Unique` - one candidate has the strictly lowest cost
/// * `Ambiguous` - several candidates tie for the lowest cost, sorted by
///   signature
pub fn find_best_match(viable: Vec<OverloadMatch>) -> ResolutionVerdict<OverloadMatch> {
    let Some(best_cost) = viable.iter().map(|m| m.total_cost).min() else {
        return ResolutionVerdict::NoMatch;
    };

    let mut best: Vec<_> = viable
        .into_iter()
        .filter(|m| m.total_cost == best_cost)
        .collect();

    if best.len() == 1 {
        return ResolutionVerdict::Unique(best.remove(0));
    }

    best.sort_by_cached_key(|m| m.candidate.to_string());
    ResolutionVerdict::Ambiguous(best)
}
