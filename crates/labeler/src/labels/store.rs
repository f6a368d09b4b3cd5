//! External collaborators behind minimal seams
//!
//! The orchestrator talks to the cluster through three narrow traits so the
//! whole read-compute-write cycle runs against in-memory fakes in tests. The
//! kube-backed implementations below are the only code that touches the API
//! server.

use crate::crds::NamespaceLabel;
use crate::labels::types::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{ListParams, PostParams};
use kube::runtime::events::{Event, EventType, Recorder};
use kube::{Api, Client, Resource, ResourceExt};
use tracing::warn;

/// Read-only listing of the declarations present in a namespace.
#[async_trait]
pub trait DeclarationSource {
    async fn list(&self, namespace: &str) -> Result<Vec<NamespaceLabel>>;
}

/// Fetch and conditionally replace the target namespace object.
#[async_trait]
pub trait NamespaceStore {
    async fn get(&self, name: &str) -> Result<Namespace>;

    /// Replace the namespace, guarded by the `resourceVersion` carried in
    /// `namespace`. Fails with [`Error::WriteConflict`] when the stored
    /// version moved since the fetch.
    async fn replace(&self, namespace: &Namespace) -> Result<()>;
}

/// Fire-and-forget override notices. Implementations must never block the
/// pass or surface failures from the sink itself.
#[async_trait]
pub trait NotificationSink {
    async fn notify_override(&self, namespace: &Namespace, reason: &str, message: &str);
}

/// `DeclarationSource` backed by the cluster.
pub struct KubeDeclarationSource {
    client: Client,
}

impl KubeDeclarationSource {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeclarationSource for KubeDeclarationSource {
    async fn list(&self, namespace: &str) -> Result<Vec<NamespaceLabel>> {
        let api: Api<NamespaceLabel> = Api::namespaced(self.client.clone(), namespace);
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(Error::FetchFailed)?;
        Ok(list.items)
    }
}

/// `NamespaceStore` backed by the cluster.
pub struct KubeNamespaceStore {
    api: Api<Namespace>,
}

impl KubeNamespaceStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

#[async_trait]
impl NamespaceStore for KubeNamespaceStore {
    async fn get(&self, name: &str) -> Result<Namespace> {
        match self.api.get(name).await {
            Ok(namespace) => Ok(namespace),
            Err(kube::Error::Api(response)) if response.code == 404 => {
                Err(Error::NamespaceNotFound(name.to_string()))
            }
            Err(e) => Err(Error::FetchFailed(e)),
        }
    }

    async fn replace(&self, namespace: &Namespace) -> Result<()> {
        let name = namespace.name_any();
        match self
            .api
            .replace(&name, &PostParams::default(), namespace)
            .await
        {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(response)) if response.code == 409 => {
                Err(Error::WriteConflict(name))
            }
            Err(kube::Error::Api(response)) if response.code == 404 => {
                Err(Error::NamespaceNotFound(name))
            }
            Err(e) => Err(Error::WriteFailed(e)),
        }
    }
}

/// `NotificationSink` publishing warning Events against the namespace.
pub struct EventRecorderSink {
    recorder: Recorder,
}

impl EventRecorderSink {
    #[must_use]
    pub fn new(recorder: Recorder) -> Self {
        Self { recorder }
    }
}

#[async_trait]
impl NotificationSink for EventRecorderSink {
    async fn notify_override(&self, namespace: &Namespace, reason: &str, message: &str) {
        let event = Event {
            type_: EventType::Warning,
            reason: reason.to_string(),
            note: Some(message.to_string()),
            action: "ReconcileLabels".to_string(),
            secondary: None,
        };
        let reference = namespace.object_ref(&());
        if let Err(e) = self.recorder.publish(&event, &reference).await {
            // Notices never fail the pass.
            warn!(
                namespace = %namespace.name_any(),
                error = %e,
                "Failed to publish override event"
            );
        }
    }
}
