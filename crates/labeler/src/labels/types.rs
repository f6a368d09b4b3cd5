//! Shared controller context and error taxonomy

use crate::labels::config::ControllerConfig;
use crate::labels::policy::ProtectedLabels;
use kube::runtime::events::Recorder;
use kube::Client;
use std::sync::Arc;
use thiserror::Error;

/// Finalizer ensuring a deleted declaration re-triggers its namespace before
/// it disappears from listings.
pub const NAMESPACE_LABEL_FINALIZER: &str = "dana.io/namespacelabel-cleanup";

/// Context shared by every reconciliation pass
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client
    pub client: Client,
    /// Controller configuration loaded at startup
    pub config: Arc<ControllerConfig>,
    /// Label keys owned by the platform
    pub policy: Arc<ProtectedLabels>,
    /// Event recorder for override notices
    pub recorder: Recorder,
}

/// Failures a reconciliation pass can surface. Nothing is retried here; the
/// controller runtime owns retry policy and re-invokes with fresh state.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read cluster state: {0}")]
    FetchFailed(#[source] kube::Error),

    #[error("namespace {0} not found")]
    NamespaceNotFound(String),

    #[error("namespace {0} changed since it was read")]
    WriteConflict(String),

    #[error("failed to update namespace labels: {0}")]
    WriteFailed(#[source] kube::Error),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("object has no object key")]
    MissingObjectKey,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
