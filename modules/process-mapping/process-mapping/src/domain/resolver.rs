//! Mapping selection.
//!
//! Given the candidate mappings for an operation, picks the one that should
//! handle a request:
//!
//! 1. Keep mappings for the requested operation that are currently effective
//!    and whose scope keys are either unset (wildcard) or equal to the request.
//! 2. Rank by specificity (descending), then priority (ascending), then id
//!    (ascending).
//! 3. Return the first, or `NotFound` when nothing survived.
//!
//! A scoped mapping never matches a request that lacks that scope key, so a
//! request without a tenant only sees vanilla mappings.

use std::cmp::Ordering;

use process_mapping_sdk::{ApiProcessMapping, Resolution, ResolveRequest};
use time::OffsetDateTime;
use tracing::warn;

pub const TENANT_WEIGHT: u32 = 100;
pub const PRODUCT_WEIGHT: u32 = 10;
pub const CHANNEL_WEIGHT: u32 = 1;

/// Returns `true` if the mapping is active and `now` lies in
/// `[effective_from, effective_to)`. Unset bounds are open.
#[must_use]
pub fn is_effective_at(mapping: &ApiProcessMapping, now: OffsetDateTime) -> bool {
    mapping.is_active
        && mapping.effective_from.is_none_or(|from| now >= from)
        && mapping.effective_to.is_none_or(|to| now < to)
}

/// Specificity score: 100 per tenant, 10 per product, 1 per channel.
#[must_use]
pub fn specificity(mapping: &ApiProcessMapping) -> u32 {
    let mut score = 0;
    if mapping.tenant_id.is_some() {
        score += TENANT_WEIGHT;
    }
    if mapping.product_id.is_some() {
        score += PRODUCT_WEIGHT;
    }
    if mapping.channel().is_some() {
        score += CHANNEL_WEIGHT;
    }
    score
}

/// An unset mapping key matches anything; a set key matches only an equal
/// request value.
fn scope_matches<T: PartialEq + ?Sized>(mapping: Option<&T>, request: Option<&T>) -> bool {
    match mapping {
        None => true,
        Some(value) => request == Some(value),
    }
}

/// Returns `true` if the mapping's operation and scope keys admit the request.
#[must_use]
pub fn matches_request(mapping: &ApiProcessMapping, request: &ResolveRequest) -> bool {
    mapping.operation_id == request.operation_id
        && scope_matches(mapping.tenant_id.as_ref(), request.tenant_id.as_ref())
        && scope_matches(mapping.product_id.as_deref(), request.product_id.as_deref())
        && scope_matches(mapping.channel(), request.channel())
}

/// Total order used for ranking: best candidate first.
fn rank(a: &ApiProcessMapping, b: &ApiProcessMapping) -> Ordering {
    specificity(b)
        .cmp(&specificity(a))
        .then_with(|| a.priority.cmp(&b.priority))
        .then_with(|| a.id.cmp(&b.id))
}

/// Earliest instant after `now` at which an active candidate for `request`
/// enters or leaves its effective window. A resolution computed at `now`
/// may change at that instant, so it must not be reused past it.
#[must_use]
pub fn next_boundary(
    candidates: &[ApiProcessMapping],
    request: &ResolveRequest,
    now: OffsetDateTime,
) -> Option<OffsetDateTime> {
    candidates
        .iter()
        .filter(|m| m.is_active && matches_request(m, request))
        .flat_map(|m| [m.effective_from, m.effective_to])
        .flatten()
        .filter(|bound| *bound > now)
        .min()
}

/// Selects the mapping that handles `request` at `now`.
pub fn select<I>(candidates: I, request: &ResolveRequest, now: OffsetDateTime) -> Resolution
where
    I: IntoIterator<Item = ApiProcessMapping>,
{
    let mut eligible: Vec<ApiProcessMapping> = candidates
        .into_iter()
        .filter(|m| matches_request(m, request) && is_effective_at(m, now))
        .collect();

    eligible.sort_by(rank);

    if let [best, runner_up, ..] = eligible.as_slice()
        && specificity(best) == specificity(runner_up)
        && best.priority == runner_up.priority
    {
        warn!(
            operation_id = %request.operation_id,
            selected = %best.id,
            shadowed = %runner_up.id,
            specificity = specificity(best),
            priority = best.priority,
            "Ambiguous process mappings: equal specificity and priority, falling back to id order"
        );
    }

    eligible
        .into_iter()
        .next()
        .map_or(Resolution::NotFound, Resolution::Found)
}
