//! Cluster gateway: the narrow operation set the orchestrator consumes
//!
//! [`ClusterGateway`] is the seam between the provisioning state machine
//! and the cluster. Tests drive the state machine against a mock; the
//! production [`KubeGateway`] talks to one namespace through a
//! `kube::Client` and runs the API proxy as a `kubectl proxy` child
//! process.

use std::path::Path;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use k8s_openapi::api::rbac::v1::{ClusterRoleBinding, RoleRef, Subject};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{
    Api, AttachParams, DeleteParams, DynamicObject, ListParams, LogParams, Patch, PatchParams,
    PostParams,
};
use kube::discovery::ApiResource;
use kube::Client;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tracing::{debug, info, trace, warn};

#[cfg(test)]
use mockall::automock;

use crate::manifest::{self, ManifestDoc};
use crate::pods::pod_is_ready;
use crate::{Error, Result};

/// Field manager name for server-side apply
const FIELD_MANAGER: &str = "scout-testbed";

/// Default local port for the API proxy
const DEFAULT_PROXY_PORT: u16 = 8001;

/// Interval between pod readiness polls
const READY_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Operations the orchestrator needs from the cluster.
///
/// Implementations are scoped to a single namespace at construction; the
/// namespace lifecycle operations act on that namespace.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterGateway: Send + Sync {
    /// Start a local proxy/tunnel to the cluster API
    async fn start_proxy(&self) -> Result<()>;

    /// Stop the API proxy; never fails
    async fn stop_proxy(&self);

    /// Create the environment namespace
    async fn create_namespace(&self) -> Result<()>;

    /// Delete the environment namespace; absence is not an error
    async fn delete_namespace(&self) -> Result<()>;

    /// Apply a (possibly multi-document) manifest file into the namespace
    async fn apply_manifest(&self, manifest: &Path) -> Result<()>;

    /// Wait until every pod in the namespace reports Ready
    ///
    /// Expiry surfaces as [`Error::ReadinessTimeout`], distinct from
    /// cluster API failures.
    async fn wait_for_pods_ready(&self, timeout: Duration) -> Result<()>;

    /// List all pods currently in the namespace
    async fn list_pods(&self) -> Result<Vec<Pod>>;

    /// Copy a local file into `remote_dir` of the given pod container
    async fn copy_to_pod(
        &self,
        local: &Path,
        remote_dir: &str,
        pod: &str,
        container: &str,
    ) -> Result<()>;

    /// Launch a command in the pod without awaiting its completion
    async fn exec_detached(&self, pod: &str, container: &str, command: &[String]) -> Result<()>;

    /// Fetch the pod's current log contents
    async fn fetch_logs(&self, pod: &str) -> Result<String>;

    /// Bind cluster-admin to the namespace's default service account;
    /// an existing binding is not an error
    async fn grant_cluster_admin(&self, binding: &str) -> Result<()>;

    /// Remove the cluster-admin binding; absence is not an error
    async fn revoke_cluster_admin(&self, binding: &str) -> Result<()>;

    /// Delete a stale DebugSession resource; absence is not an error
    async fn delete_debug_session(&self, name: &str) -> Result<()>;
}

/// Production gateway over a `kube::Client`, scoped to one namespace.
pub struct KubeGateway {
    client: Client,
    namespace: String,
    proxy_port: u16,
    // kill_on_drop on the child means the proxy dies with the gateway even
    // when stop_proxy is never reached
    proxy: Mutex<Option<Child>>,
}

impl KubeGateway {
    /// Create a gateway for the given namespace.
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            proxy_port: DEFAULT_PROXY_PORT,
            proxy: Mutex::new(None),
        }
    }

    /// Override the local API proxy port.
    pub fn with_proxy_port(mut self, port: u16) -> Self {
        self.proxy_port = port;
        self
    }

    /// The namespace this gateway operates on.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn pods(&self) -> Api<Pod> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    async fn apply_document(&self, doc: &ManifestDoc) -> Result<()> {
        let namespace = doc.namespace.as_deref().unwrap_or(&self.namespace);
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &doc.resource);
        let params = PatchParams::apply(FIELD_MANAGER).force();
        api.patch(&doc.name, &params, &Patch::Apply(&doc.value))
            .await?;
        trace!(
            kind = %doc.resource.kind,
            name = %doc.name,
            namespace = %namespace,
            "applied manifest document"
        );
        Ok(())
    }
}

/// Bind `cluster-admin` to the namespace's default service account.
fn admin_binding(namespace: &str, name: &str) -> ClusterRoleBinding {
    ClusterRoleBinding {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: "ClusterRole".to_string(),
            name: "cluster-admin".to_string(),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".to_string(),
            name: "default".to_string(),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        }]),
    }
}

/// The Scout DebugSession custom resource
fn debug_session_resource() -> ApiResource {
    manifest::build_api_resource("scout.dev/v1", "DebugSession")
}

/// Treat an API error with the given status code as success.
///
/// Covers the idempotency contracts: 409 on create-if-exists, 404 on
/// delete-if-absent.
fn allow_status<T>(result: std::result::Result<T, kube::Error>, allowed: u16) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(ae)) if ae.code == allowed => {
            trace!(code = allowed, "API status tolerated");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl ClusterGateway for KubeGateway {
    async fn start_proxy(&self) -> Result<()> {
        if let Ok(guard) = self.proxy.lock() {
            if guard.is_some() {
                return Ok(());
            }
        }

        let child = Command::new("kubectl")
            .arg("proxy")
            .arg(format!("--port={}", self.proxy_port))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::gateway("start-proxy", format!("failed to spawn kubectl proxy: {e}"))
            })?;

        match self.proxy.lock() {
            Ok(mut guard) => *guard = Some(child),
            Err(_) => {
                return Err(Error::gateway("start-proxy", "proxy state lock poisoned"));
            }
        }

        info!(port = self.proxy_port, "API proxy started");
        Ok(())
    }

    async fn stop_proxy(&self) {
        if let Ok(mut guard) = self.proxy.lock() {
            if let Some(mut child) = guard.take() {
                match child.start_kill() {
                    Ok(()) => debug!("API proxy stopped"),
                    Err(e) => warn!(error = %e, "failed to stop API proxy"),
                }
            }
        }
    }

    async fn create_namespace(&self) -> Result<()> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let ns = Namespace {
            metadata: ObjectMeta {
                name: Some(self.namespace.clone()),
                ..Default::default()
            },
            ..Default::default()
        };
        api.create(&PostParams::default(), &ns).await?;
        info!(namespace = %self.namespace, "namespace created");
        Ok(())
    }

    async fn delete_namespace(&self) -> Result<()> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        allow_status(
            api.delete(&self.namespace, &DeleteParams::default()).await,
            404,
        )?;
        info!(namespace = %self.namespace, "namespace deletion requested");
        Ok(())
    }

    async fn apply_manifest(&self, manifest_path: &Path) -> Result<()> {
        let raw = tokio::fs::read_to_string(manifest_path).await.map_err(|e| {
            Error::gateway(
                "apply-manifest",
                format!("failed to read {}: {e}", manifest_path.display()),
            )
        })?;

        for doc in manifest::parse_documents(&raw)? {
            self.apply_document(&doc).await?;
        }
        debug!(manifest = %manifest_path.display(), "manifest applied");
        Ok(())
    }

    async fn wait_for_pods_ready(&self, timeout: Duration) -> Result<()> {
        let api = self.pods();
        let start = Instant::now();

        loop {
            if start.elapsed() >= timeout {
                return Err(Error::readiness_timeout(timeout));
            }

            match api.list(&ListParams::default()).await {
                Ok(pods) => {
                    let total = pods.items.len();
                    let ready = pods.items.iter().filter(|p| pod_is_ready(p)).count();
                    trace!(ready, total, "pod readiness poll");
                    if total > 0 && ready == total {
                        info!(count = total, "all pods ready");
                        return Ok(());
                    }
                }
                // transient list failures keep polling until the bound expires
                Err(e) => trace!(error = %e, "pod readiness poll failed"),
            }

            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    async fn list_pods(&self) -> Result<Vec<Pod>> {
        let pods = self.pods().list(&ListParams::default()).await?;
        Ok(pods.items)
    }

    async fn copy_to_pod(
        &self,
        local: &Path,
        remote_dir: &str,
        pod: &str,
        container: &str,
    ) -> Result<()> {
        let bytes = tokio::fs::read(local).await.map_err(|e| {
            Error::gateway("copy", format!("failed to read {}: {e}", local.display()))
        })?;
        let file_name = local
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::gateway("copy", format!("unusable local path {}", local.display()))
            })?;
        let remote = format!("{}/{}", remote_dir.trim_end_matches('/'), file_name);

        let params = AttachParams {
            container: Some(container.to_string()),
            stdin: true,
            stdout: false,
            stderr: true,
            ..Default::default()
        };
        let script = format!("cat > {remote} && chmod +x {remote}");
        let mut attached = self
            .pods()
            .exec(
                pod,
                vec!["sh".to_string(), "-c".to_string(), script],
                &params,
            )
            .await?;

        {
            let mut stdin = attached
                .stdin()
                .ok_or_else(|| Error::gateway("copy", "exec session has no stdin"))?;
            stdin.write_all(&bytes).await.map_err(|e| {
                Error::gateway("copy", format!("failed to stream file to {pod}: {e}"))
            })?;
            stdin.shutdown().await.map_err(|e| {
                Error::gateway("copy", format!("failed to close stream to {pod}: {e}"))
            })?;
        }
        attached.join().await.map_err(|e| {
            Error::gateway("copy", format!("exec session failed for {pod}: {e}"))
        })?;

        debug!(pod = %pod, remote = %remote, bytes = bytes.len(), "file copied into pod");
        Ok(())
    }

    async fn exec_detached(&self, pod: &str, container: &str, command: &[String]) -> Result<()> {
        let params = AttachParams {
            container: Some(container.to_string()),
            stdin: false,
            stdout: true,
            stderr: true,
            ..Default::default()
        };
        let attached = self.pods().exec(pod, command.to_vec(), &params).await?;

        // The session stays open as long as the remote process runs; park
        // it on a task nobody observes.
        let pod = pod.to_string();
        tokio::spawn(async move {
            if let Err(e) = attached.join().await {
                debug!(pod = %pod, error = %e, "detached exec session ended with error");
            }
        });
        Ok(())
    }

    async fn fetch_logs(&self, pod: &str) -> Result<String> {
        let logs = self.pods().logs(pod, &LogParams::default()).await?;
        Ok(logs)
    }

    async fn grant_cluster_admin(&self, binding: &str) -> Result<()> {
        let api: Api<ClusterRoleBinding> = Api::all(self.client.clone());
        allow_status(
            api.create(
                &PostParams::default(),
                &admin_binding(&self.namespace, binding),
            )
            .await,
            409,
        )?;
        info!(binding = %binding, "cluster-admin granted to namespace service account");
        Ok(())
    }

    async fn revoke_cluster_admin(&self, binding: &str) -> Result<()> {
        let api: Api<ClusterRoleBinding> = Api::all(self.client.clone());
        allow_status(api.delete(binding, &DeleteParams::default()).await, 404)?;
        debug!(binding = %binding, "cluster-admin binding revoked");
        Ok(())
    }

    async fn delete_debug_session(&self, name: &str) -> Result<()> {
        let api: Api<DynamicObject> = Api::namespaced_with(
            self.client.clone(),
            &self.namespace,
            &debug_session_resource(),
        );
        allow_status(api.delete(name, &DeleteParams::default()).await, 404)?;
        debug!(name = %name, "stale debug session cleared");
        Ok(())
    }
}
