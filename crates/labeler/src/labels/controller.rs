//! Reconciliation orchestrator
//!
//! One pass per namespace key: list declarations, resolve the target mapping,
//! fetch the namespace, plan the next label set, notify on overrides, and
//! write back only when something changed. Every failure propagates verbatim;
//! retry policy belongs to the controller runtime.

use crate::crds::NamespaceLabel;
use crate::labels::apply::plan_labels;
use crate::labels::config::NotificationConfig;
use crate::labels::policy::ProtectedLabels;
use crate::labels::resolve::resolve_target;
use crate::labels::store::{
    DeclarationSource, EventRecorderSink, KubeDeclarationSource, KubeNamespaceStore,
    NamespaceStore, NotificationSink,
};
use crate::labels::types::{Context, Error, Result, NAMESPACE_LABEL_FINALIZER};
use kube::runtime::controller::Action;
use kube::runtime::finalizer::{finalizer, Event as FinalizerEvent};
use kube::{Api, ResourceExt};
use std::sync::Arc;
use tracing::{debug, info, instrument};

const OVERRIDE_REASON: &str = "Override";

/// Entry point registered with the controller runtime, keyed by declaration.
///
/// Apply and Cleanup both run the same namespace reconciliation: a deleted
/// declaration carries a deletion timestamp and is excluded from resolution,
/// so the cleanup pass converges the namespace without it.
#[instrument(skip(ctx), fields(declaration = %declaration.name_any()))]
pub async fn reconcile_namespace_label(
    declaration: Arc<NamespaceLabel>,
    ctx: Arc<Context>,
) -> Result<Action> {
    let namespace = declaration.namespace().ok_or(Error::MissingObjectKey)?;
    let api: Api<NamespaceLabel> = Api::namespaced(ctx.client.clone(), &namespace);

    finalizer(
        &api,
        NAMESPACE_LABEL_FINALIZER,
        declaration,
        |event| async {
            match event {
                FinalizerEvent::Apply(decl) | FinalizerEvent::Cleanup(decl) => {
                    apply_declared_labels(&decl, &ctx).await
                }
            }
        },
    )
    .await
    .map_err(|e| match e {
        kube::runtime::finalizer::Error::ApplyFailed(err)
        | kube::runtime::finalizer::Error::CleanupFailed(err) => err,
        kube::runtime::finalizer::Error::AddFinalizer(e)
        | kube::runtime::finalizer::Error::RemoveFinalizer(e) => Error::WriteFailed(e),
        kube::runtime::finalizer::Error::UnnamedObject => Error::MissingObjectKey,
        kube::runtime::finalizer::Error::InvalidFinalizer => {
            Error::ConfigError("invalid finalizer name".to_string())
        }
    })
}

async fn apply_declared_labels(declaration: &NamespaceLabel, ctx: &Context) -> Result<Action> {
    let namespace = declaration.namespace().ok_or(Error::MissingObjectKey)?;

    let declarations = KubeDeclarationSource::new(ctx.client.clone());
    let namespaces = KubeNamespaceStore::new(ctx.client.clone());
    let notifications = EventRecorderSink::new(ctx.recorder.clone());

    match reconcile_namespace(
        &namespace,
        &declarations,
        &namespaces,
        &notifications,
        &ctx.policy,
        &ctx.config.notifications,
    )
    .await
    {
        Ok(_) => Ok(Action::await_change()),
        // The namespace vanished while its declarations were being torn
        // down; there is nothing left to converge, let the finalizer clear.
        Err(Error::NamespaceNotFound(_))
            if declaration.metadata.deletion_timestamp.is_some() =>
        {
            debug!("Namespace already gone, skipping cleanup pass");
            Ok(Action::await_change())
        }
        Err(e) => Err(e),
    }
}

/// Run one full reconciliation pass for `namespace`.
///
/// Returns whether the namespace was written. Pure sequencing over the
/// injected collaborators; no retries, no partial writes.
pub async fn reconcile_namespace<D, N, S>(
    namespace: &str,
    declarations: &D,
    namespaces: &N,
    notifications: &S,
    policy: &ProtectedLabels,
    notify: &NotificationConfig,
) -> Result<bool>
where
    D: DeclarationSource + Send + Sync,
    N: NamespaceStore + Send + Sync,
    S: NotificationSink + Send + Sync,
{
    let listed = declarations.list(namespace).await?;
    let active: Vec<NamespaceLabel> = listed
        .into_iter()
        .filter(|d| d.metadata.deletion_timestamp.is_none())
        .collect();
    debug!(
        namespace = %namespace,
        declarations = active.len(),
        "Resolving namespace label declarations"
    );

    let target = resolve_target(&active, policy);

    let current = namespaces.get(namespace).await?;
    let plan = plan_labels(current.metadata.labels.as_ref(), &target, policy);

    if plan.overrode || (notify.always_notify && target.has_declarations) {
        notifications
            .notify_override(
                &current,
                OVERRIDE_REASON,
                &format!(
                    "The newest NamespaceLabel declaration replaced existing labels on namespace {namespace}"
                ),
            )
            .await;
    }

    if !plan.changed {
        debug!(namespace = %namespace, "Namespace labels already converged");
        return Ok(false);
    }

    let mut updated = current;
    updated.metadata.labels = Some(plan.next);
    namespaces.replace(&updated).await?;

    info!(namespace = %namespace, "Namespace labels updated");
    Ok(true)
}
