//! Declaration resolver
//!
//! Collapses the set of `NamespaceLabel` declarations present in a namespace
//! into the single label mapping the namespace should carry. Resolution is
//! last-writer-wins across whole declarations: only the newest declaration
//! contributes, older ones are not merged in at the field level.

use crate::crds::NamespaceLabel;
use crate::labels::policy::ProtectedLabels;
use std::collections::BTreeMap;

/// The non-protected labels a namespace should end up with after one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Desired non-protected labels
    pub labels: BTreeMap<String, String>,
    /// Whether any declaration existed at all
    pub has_declarations: bool,
}

/// Resolve the declarations of one namespace into a [`ResolvedTarget`].
///
/// The newest declaration by `metadata.creationTimestamp` wins. Timestamps
/// have one-second granularity, so ties are possible; the lexicographically
/// greatest object name breaks them, giving every input set a fixed total
/// order. Protected keys are dropped from the winning mapping.
#[must_use]
pub fn resolve_target(
    declarations: &[NamespaceLabel],
    policy: &ProtectedLabels,
) -> ResolvedTarget {
    let newest = declarations.iter().max_by(|a, b| {
        let a_key = (
            a.metadata.creation_timestamp.as_ref(),
            a.metadata.name.as_deref(),
        );
        let b_key = (
            b.metadata.creation_timestamp.as_ref(),
            b.metadata.name.as_deref(),
        );
        a_key.cmp(&b_key)
    });

    let Some(newest) = newest else {
        return ResolvedTarget::default();
    };

    let labels = newest
        .spec
        .labels
        .iter()
        .filter(|(key, _)| !policy.is_protected(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    ResolvedTarget {
        labels,
        has_declarations: true,
    }
}
