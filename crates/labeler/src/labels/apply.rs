//! Namespace label applier
//!
//! Pure planning step: given the labels a namespace currently carries and the
//! resolved target, compute the labels it should carry next and whether the
//! change warrants a write or an override notice.

use crate::labels::policy::ProtectedLabels;
use crate::labels::resolve::ResolvedTarget;
use std::collections::BTreeMap;

/// Outcome of planning one namespace's labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPlan {
    /// The full label mapping the namespace should carry next
    pub next: BTreeMap<String, String>,
    /// Whether `next` differs from the current mapping
    pub changed: bool,
    /// Whether a pre-existing non-protected label was replaced or removed by
    /// a declaration. A clear caused by zero declarations is not an override.
    pub overrode: bool,
}

/// Plan the next label mapping for a namespace.
///
/// Non-protected labels become exactly `target.labels`; protected labels pass
/// through untouched whatever the declarations say.
#[must_use]
pub fn plan_labels(
    current: Option<&BTreeMap<String, String>>,
    target: &ResolvedTarget,
    policy: &ProtectedLabels,
) -> LabelPlan {
    let empty = BTreeMap::new();
    let current = current.unwrap_or(&empty);

    let mut next: BTreeMap<String, String> = current
        .iter()
        .filter(|(key, _)| policy.is_protected(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    // The resolver already drops protected keys; filtering again keeps the
    // invariant local to this function as well.
    next.extend(
        target
            .labels
            .iter()
            .filter(|(key, _)| !policy.is_protected(key))
            .map(|(key, value)| (key.clone(), value.clone())),
    );

    let overrode = target.has_declarations
        && current.iter().any(|(key, value)| {
            !policy.is_protected(key) && target.labels.get(key) != Some(value)
        });

    LabelPlan {
        changed: next != *current,
        next,
        overrode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn target(entries: &[(&str, &str)], has_declarations: bool) -> ResolvedTarget {
        ResolvedTarget {
            labels: map(entries),
            has_declarations,
        }
    }

    #[test]
    fn absent_mapping_is_treated_as_empty() {
        let plan = plan_labels(
            None,
            &target(&[("env", "prod")], true),
            &ProtectedLabels::default(),
        );
        assert_eq!(plan.next, map(&[("env", "prod")]));
        assert!(plan.changed);
        assert!(!plan.overrode);
    }

    #[test]
    fn stale_labels_are_stripped_and_target_merged() {
        let current = map(&[("app.kubernetes.io/name", "x"), ("stale", "1")]);
        let plan = plan_labels(
            Some(&current),
            &target(&[("env", "prod")], true),
            &ProtectedLabels::default(),
        );

        assert_eq!(
            plan.next,
            map(&[("app.kubernetes.io/name", "x"), ("env", "prod")])
        );
        assert!(plan.changed);
        assert!(plan.overrode);
    }

    #[test]
    fn protected_labels_survive_empty_target() {
        let current = map(&[("app.kubernetes.io/version", "2"), ("team", "payments")]);
        let plan = plan_labels(Some(&current), &target(&[], false), &ProtectedLabels::default());

        assert_eq!(plan.next, map(&[("app.kubernetes.io/version", "2")]));
        assert!(plan.changed);
        // Zero declarations: the clear is not an override.
        assert!(!plan.overrode);
    }

    #[test]
    fn matching_state_is_a_noop() {
        let current = map(&[("app.kubernetes.io/name", "x"), ("env", "prod")]);
        let plan = plan_labels(
            Some(&current),
            &target(&[("env", "prod")], true),
            &ProtectedLabels::default(),
        );

        assert_eq!(plan.next, current);
        assert!(!plan.changed);
        assert!(!plan.overrode);
    }

    #[test]
    fn value_change_on_existing_key_is_an_override() {
        let current = map(&[("env", "staging")]);
        let plan = plan_labels(
            Some(&current),
            &target(&[("env", "prod")], true),
            &ProtectedLabels::default(),
        );

        assert!(plan.changed);
        assert!(plan.overrode);
        assert_eq!(plan.next, map(&[("env", "prod")]));
    }

    #[test]
    fn purely_additive_target_is_not_an_override() {
        let current = map(&[("env", "prod")]);
        let plan = plan_labels(
            Some(&current),
            &target(&[("env", "prod"), ("tier", "gold")], true),
            &ProtectedLabels::default(),
        );

        assert!(plan.changed);
        assert!(!plan.overrode);
    }

    #[test]
    fn declared_protected_value_never_lands() {
        let current = map(&[("app.kubernetes.io/version", "1")]);
        // Even a target that somehow carries a protected key must not clobber
        // the namespace value.
        let plan = plan_labels(
            Some(&current),
            &target(&[("app.kubernetes.io/version", "9")], true),
            &ProtectedLabels::default(),
        );

        assert_eq!(
            plan.next.get("app.kubernetes.io/version").map(String::as_str),
            Some("1")
        );
        assert!(!plan.changed);
    }
}
