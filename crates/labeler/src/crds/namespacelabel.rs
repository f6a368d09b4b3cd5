//! `NamespaceLabel` Custom Resource Definition
//!
//! A `NamespaceLabel` declares the set of labels its namespace should carry.
//! Several declarations may coexist in one namespace; the controller applies
//! the newest one (see `labels::resolve`). The controller only ever reads
//! these objects - their spec is never written back.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[kube(group = "dana.io", version = "v1alpha1", kind = "NamespaceLabel")]
#[kube(namespaced)]
#[kube(printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#)]
pub struct NamespaceLabelSpec {
    /// Desired labels for the namespace holding this object. An empty or
    /// omitted map clears every label the platform does not own.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}
