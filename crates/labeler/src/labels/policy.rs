//! Protected label policy
//!
//! Label keys the platform owns. Declarations can never add, change, or
//! remove these keys on a namespace, regardless of recency.

use std::collections::BTreeSet;

/// Keys reserved for platform ownership metadata.
const DEFAULT_PROTECTED_LABELS: [&str; 6] = [
    "app.kubernetes.io/name",
    "app.kubernetes.io/instance",
    "app.kubernetes.io/version",
    "app.kubernetes.io/component",
    "app.kubernetes.io/part-of",
    "app.kubernetes.io/managed-by",
];

/// Immutable set of label keys immune to user declarations.
///
/// Held as data so the set can grow through configuration without touching
/// resolver or applier logic.
#[derive(Debug, Clone)]
pub struct ProtectedLabels {
    keys: BTreeSet<String>,
}

impl Default for ProtectedLabels {
    fn default() -> Self {
        ProtectedLabels {
            keys: DEFAULT_PROTECTED_LABELS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl ProtectedLabels {
    /// Build the default set extended with additional keys from configuration.
    pub fn with_additional<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut policy = ProtectedLabels::default();
        policy.keys.extend(extra.into_iter().map(Into::into));
        policy
    }

    /// Whether `key` is owned by the platform.
    #[must_use]
    pub fn is_protected(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Number of protected keys (startup logging only).
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
