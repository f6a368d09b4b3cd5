//! Custom Resource Definitions owned by the namespace labeler

pub mod namespacelabel;

pub use namespacelabel::{NamespaceLabel, NamespaceLabelSpec};
