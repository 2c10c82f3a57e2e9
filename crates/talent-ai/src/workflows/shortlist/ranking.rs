use std::cmp::Ordering;

use super::domain::{Recommendation, ResolvedShortlistOptions, ScoredCandidate};

/// Filter, order, and cap candidates.
///
/// Returns the kept candidates together with the number that qualified before truncation.
pub fn rank_candidates(
    candidates: Vec<ScoredCandidate>,
    options: &ResolvedShortlistOptions,
) -> (Vec<ScoredCandidate>, usize) {
    let mut qualified: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter(|candidate| meets_min_score(candidate, options.min_score))
        .filter(|candidate| passes_recommendation_filter(candidate, options))
        .collect();

    if options.prioritize_budget_fit {
        qualified.sort_by(budget_fit_order);
    } else {
        qualified.sort_by(default_order);
    }

    let total = qualified.len();
    qualified.truncate(options.max_candidates);
    (qualified, total)
}

fn meets_min_score(candidate: &ScoredCandidate, min_score: u8) -> bool {
    candidate
        .composite_score
        .is_some_and(|score| score >= min_score)
}

fn passes_recommendation_filter(
    candidate: &ScoredCandidate,
    options: &ResolvedShortlistOptions,
) -> bool {
    match candidate.recommendation {
        Some(Recommendation::HighlyRecommended) => true,
        Some(Recommendation::Recommended | Recommendation::Neutral) => {
            !options.include_only_highly_recommended
        }
        Some(Recommendation::NotRecommended) | None => false,
    }
}

fn recommendation_rank(candidate: &ScoredCandidate) -> u8 {
    candidate
        .recommendation
        .map(Recommendation::rank)
        .unwrap_or(0)
}

// `Option` orders `None` first, so comparing right-to-left puts missing scores last.
fn descending<T: Ord>(left: Option<T>, right: Option<T>) -> Ordering {
    right.cmp(&left)
}

/// Composite score, then recommendation rank, then most recent, then id.
pub fn default_order(left: &ScoredCandidate, right: &ScoredCandidate) -> Ordering {
    descending(left.composite_score, right.composite_score)
        .then_with(|| recommendation_rank(right).cmp(&recommendation_rank(left)))
        .then_with(|| right.created_at.cmp(&left.created_at))
        .then_with(|| left.id.cmp(&right.id))
}

/// Composite score, then price score, then delivery score, then most recent, then id.
pub fn budget_fit_order(left: &ScoredCandidate, right: &ScoredCandidate) -> Ordering {
    descending(left.composite_score, right.composite_score)
        .then_with(|| descending(left.price_score, right.price_score))
        .then_with(|| descending(left.delivery_score, right.delivery_score))
        .then_with(|| right.created_at.cmp(&left.created_at))
        .then_with(|| left.id.cmp(&right.id))
}
