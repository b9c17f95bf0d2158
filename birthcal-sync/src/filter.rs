//! Blacklist filter — removes excluded entities before diffing.
//!
//! Pure and deterministic: same inputs produce the same output set,
//! independent of rule iteration order. An empty rule set is a valid
//! "allow all" configuration.

use birthcal_types::{ExclusionRule, SourceEntity};
use tracing::debug;

/// Returns the entities not suppressed by any exclusion rule,
/// preserving input order.
///
/// A rule with `group = None` excludes every entity of its account; a rule
/// with a group label excludes only entities carrying that label under
/// that account. Entities matching no rule pass through unchanged.
#[must_use]
pub fn apply_exclusions(
    entities: &[SourceEntity],
    rules: &[ExclusionRule],
) -> Vec<SourceEntity> {
    if rules.is_empty() {
        return entities.to_vec();
    }

    let filtered: Vec<SourceEntity> = entities
        .iter()
        .filter(|entity| !is_excluded(entity, rules))
        .cloned()
        .collect();

    debug!(
        "Exclusion filter kept {}/{} entities ({} rules)",
        filtered.len(),
        entities.len(),
        rules.len()
    );
    filtered
}

/// Returns true if any rule suppresses the entity.
#[must_use]
pub fn is_excluded(entity: &SourceEntity, rules: &[ExclusionRule]) -> bool {
    rules.iter().any(|rule| rule.excludes(entity))
}
