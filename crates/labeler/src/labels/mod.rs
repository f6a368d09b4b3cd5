//! # Namespace Label Reconciliation
//!
//! Projects `NamespaceLabel` declarations onto the labels of their owning
//! Namespace. The moving parts:
//!
//! - **ProtectedLabels**: label keys the platform owns, immune to declarations
//! - **resolve**: collapses a namespace's declarations into one target mapping
//! - **apply**: plans the minimal label mutation for the namespace
//! - **controller**: the per-namespace read-compute-write orchestrator
//! - **store**: narrow seams over the cluster for listing, writes, and events

use crate::crds::NamespaceLabel;
use futures::StreamExt;
use kube::api::ListParams;
use kube::runtime::controller::{Action, Controller};
use kube::runtime::events::{Recorder, Reporter};
use kube::runtime::watcher::Config;
use kube::{Api, Client, ResourceExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

pub mod apply;
pub mod config;
pub mod controller;
pub mod policy;
pub mod resolve;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use apply::{plan_labels, LabelPlan};
pub use config::ControllerConfig;
pub use controller::{reconcile_namespace, reconcile_namespace_label};
pub use policy::ProtectedLabels;
pub use resolve::{resolve_target, ResolvedTarget};
pub use types::{Context, Error, Result};

/// Main entry point for the namespace label controller
#[instrument(skip(client, config))]
pub async fn run_label_controller(client: Client, config: ControllerConfig) -> Result<()> {
    let policy = ProtectedLabels::with_additional(config.protected_labels.clone());
    info!(
        protected_keys = policy.len(),
        "Starting NamespaceLabel controller"
    );

    let reporter = Reporter {
        controller: "namespace-label-controller".to_string(),
        instance: std::env::var("HOSTNAME").ok(),
    };
    let recorder = Recorder::new(client.clone(), reporter);

    let context = Arc::new(types::Context {
        client: client.clone(),
        config: Arc::new(config),
        policy: Arc::new(policy),
        recorder,
    });

    let declarations: Api<NamespaceLabel> = Api::all(client);

    // Startup visibility: list existing declarations so we can see what the
    // controller should observe
    match declarations.list(&ListParams::default()).await {
        Ok(list) => {
            info!(
                "Controller startup: found {} NamespaceLabel declaration(s)",
                list.items.len()
            );
        }
        Err(e) => {
            error!("Failed to list NamespaceLabels at startup: {}", e);
        }
    }

    let watcher_config = Config::default().any_semantic();

    Controller::new(declarations, watcher_config)
        .run(reconcile_namespace_label, error_policy, context)
        .for_each(|reconciliation_result| async move {
            match reconciliation_result {
                Ok(declaration) => {
                    info!(
                        declaration = ?declaration,
                        "NamespaceLabel reconciliation successful"
                    );
                }
                Err(reconciliation_err) => {
                    error!(
                        error = ?reconciliation_err,
                        "NamespaceLabel reconciliation error"
                    );
                }
            }
        })
        .await;

    info!("NamespaceLabel controller shutting down");
    Ok(())
}

/// Error policy: log and hand the key back to the queue after a short delay.
/// Write conflicts in particular need a re-invocation with fresh state.
fn error_policy(
    declaration: Arc<NamespaceLabel>,
    err: &Error,
    ctx: Arc<types::Context>,
) -> Action {
    error!(
        error = ?err,
        declaration = %declaration.name_any(),
        "NamespaceLabel reconciliation failed, requeueing"
    );
    Action::requeue(Duration::from_secs(ctx.config.requeue_on_error_seconds))
}
