//! Environment provisioning and teardown for Scout end-to-end tests
//!
//! [`Testbed::setup`] drives the full startup sequence against a
//! [`ClusterGateway`]: proxy up, namespace create, manifest apply,
//! readiness wait, pod classification, agent binary injection, victim
//! selection, permission grant, stale-state cleanup. Every step is a hard
//! gate; the environment is disposable and cheap to recreate, so the first
//! failure aborts and cleanup is delegated entirely to
//! [`Testbed::teardown`], which is best-effort throughout and never fails
//! the caller.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use k8s_openapi::api::core::v1::Pod;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::gateway::ClusterGateway;
use crate::pods::{classify, pod_name, pod_node, ClassifiedPods, PodRole, RolePrefixes};
use crate::step::{self, StepMode};
use crate::wait::WaitPolicy;
use crate::{Error, Result};

/// Default ClusterRoleBinding name for the environment's permission grant
pub const DEFAULT_ADMIN_BINDING: &str = "scout-testbed-cluster-admin";
/// Default container name inside agent pods
pub const DEFAULT_AGENT_CONTAINER: &str = "scout";
/// Default directory the agent binary is copied to inside the pod
pub const DEFAULT_AGENT_REMOTE_DIR: &str = "/tmp";

/// Configuration for one test environment.
#[derive(Clone, Debug)]
pub struct TestbedConfig {
    /// Namespace the environment lives in
    pub namespace: String,
    /// Manifest for the Scout agent workload
    pub agent_manifest: PathBuf,
    /// Manifest for the sample-api workload
    pub api_manifest: PathBuf,
    /// Manifest for the sample-worker workload
    pub worker_manifest: PathBuf,
    /// Locally built agent binary to inject into agent pods
    pub agent_binary: PathBuf,
    /// Directory inside the agent pod the binary is copied to
    pub agent_remote_dir: String,
    /// Container name inside agent pods
    pub agent_container: String,
    /// ClusterRoleBinding name for the permission grant
    pub admin_binding: String,
    /// Debug session name to clear before the run starts
    pub debug_session: String,
    /// Pod name prefixes for role classification
    pub prefixes: RolePrefixes,
    /// Wait durations for the setup/teardown sequences
    pub waits: WaitPolicy,
}

impl TestbedConfig {
    /// Configuration with production defaults for the given namespace and
    /// debug session name.
    pub fn new(namespace: impl Into<String>, debug_session: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            agent_manifest: PathBuf::from("tests/fixtures/scout-agent.yaml"),
            api_manifest: PathBuf::from("tests/fixtures/sample-api.yaml"),
            worker_manifest: PathBuf::from("tests/fixtures/sample-worker.yaml"),
            agent_binary: PathBuf::from("target/scout/scout"),
            agent_remote_dir: DEFAULT_AGENT_REMOTE_DIR.to_string(),
            agent_container: DEFAULT_AGENT_CONTAINER.to_string(),
            admin_binding: DEFAULT_ADMIN_BINDING.to_string(),
            debug_session: debug_session.into(),
            prefixes: RolePrefixes::default(),
            waits: WaitPolicy::default(),
        }
    }
}

/// The provisioned environment.
///
/// Built in a single setup pass and treated as immutable afterwards; the
/// victims are `Some` in every handle [`Testbed::setup`] returns.
#[derive(Clone, Debug)]
pub struct TestEnv {
    /// Namespace all other resources are scoped to
    pub namespace: String,
    /// sample-api pods by node
    pub api_pods: HashMap<String, Pod>,
    /// sample-worker pods by node
    pub worker_pods: HashMap<String, Pod>,
    /// agent pods by node
    pub agent_pods: HashMap<String, Pod>,
    /// The sample-api pod the test will operate against
    pub victim_api: Option<Pod>,
    /// The sample-worker pod the test will operate against
    pub victim_worker: Option<Pod>,
    /// Name of the ClusterRoleBinding granted to this environment
    pub admin_binding: String,
}

impl TestEnv {
    /// The agent pod scheduled on `node`, if one was recorded.
    pub fn agent_on(&self, node: &str) -> Option<&Pod> {
        self.agent_pods.get(node)
    }
}

/// Drives setup and teardown of one test environment.
pub struct Testbed {
    gateway: Arc<dyn ClusterGateway>,
    config: TestbedConfig,
}

impl Testbed {
    /// Create a testbed over the given gateway.
    pub fn new(gateway: Arc<dyn ClusterGateway>, config: TestbedConfig) -> Self {
        Self { gateway, config }
    }

    /// The configuration this testbed runs with.
    pub fn config(&self) -> &TestbedConfig {
        &self.config
    }

    /// Provision the environment.
    ///
    /// Fail-fast: the first error aborts the remaining steps and surfaces
    /// immediately. No rollback is attempted; call [`Testbed::teardown`]
    /// regardless of how far setup got.
    pub async fn setup(&self) -> Result<TestEnv> {
        let gw = self.gateway.as_ref();
        let cfg = &self.config;
        let waits = &cfg.waits;

        info!(namespace = %cfg.namespace, "provisioning test environment");

        step::run(StepMode::Fatal, "start-proxy", gw.start_proxy()).await?;

        step::run(StepMode::Fatal, "create-namespace", gw.create_namespace()).await?;
        // give the control plane time to propagate the new namespace
        sleep(waits.namespace_propagation).await;

        step::run(
            StepMode::Fatal,
            "apply-agent-manifest",
            gw.apply_manifest(&cfg.agent_manifest),
        )
        .await?;
        step::run(
            StepMode::Fatal,
            "apply-api-manifest",
            gw.apply_manifest(&cfg.api_manifest),
        )
        .await?;
        step::run(
            StepMode::Fatal,
            "apply-worker-manifest",
            gw.apply_manifest(&cfg.worker_manifest),
        )
        .await?;
        // let the scheduler place pods before polling readiness
        sleep(waits.scheduler_settle).await;

        step::run(
            StepMode::Fatal,
            "wait-pods-ready",
            gw.wait_for_pods_ready(waits.readiness_timeout),
        )
        .await?;

        let pods = gw.list_pods().await?;
        let classified = classify(&pods, &cfg.prefixes);
        debug!(
            api = classified.api.len(),
            worker = classified.worker.len(),
            agent = classified.agent.len(),
            "pods classified"
        );

        self.inject_agents(&classified).await?;

        let victim_api = choose_victim(&classified.api, PodRole::Api)?;
        let victim_worker = choose_victim(&classified.worker, PodRole::Worker)?;
        if classified.agent.is_empty() {
            return Err(Error::missing_pod(PodRole::Agent));
        }
        // the test drives the agent through the pod next to its victim
        ensure_agent_colocated(&classified.agent, &victim_api)?;

        step::run(
            StepMode::Fatal,
            "grant-cluster-admin",
            gw.grant_cluster_admin(&cfg.admin_binding),
        )
        .await?;

        // a previous run may have left a debug session behind under our name
        step::run(
            StepMode::BestEffort,
            "clear-stale-debug-session",
            gw.delete_debug_session(&cfg.debug_session),
        )
        .await?;

        // wait for things to settle, freshly launched agents included
        sleep(waits.post_setup_settle).await;

        info!(
            namespace = %cfg.namespace,
            victim_api = %pod_name(&victim_api),
            victim_worker = %pod_name(&victim_worker),
            "environment ready"
        );

        Ok(TestEnv {
            namespace: cfg.namespace.clone(),
            api_pods: classified.api,
            worker_pods: classified.worker,
            agent_pods: classified.agent,
            victim_api: Some(victim_api),
            victim_worker: Some(victim_worker),
            admin_binding: cfg.admin_binding.clone(),
        })
    }

    /// Tear the environment down.
    ///
    /// Never fails the caller: every step is attempted regardless of the
    /// others' outcomes, and the proxy is stopped last unconditionally.
    /// Pass `None` when setup failed before producing a handle.
    pub async fn teardown(&self, env: Option<&TestEnv>) {
        let gw = self.gateway.as_ref();
        let cfg = &self.config;

        info!(namespace = %cfg.namespace, "tearing down test environment");

        let _ = step::run(
            StepMode::BestEffort,
            "revoke-cluster-admin",
            gw.revoke_cluster_admin(&cfg.admin_binding),
        )
        .await;

        let _ = step::run(
            StepMode::BestEffort,
            "capture-agent-logs",
            self.emit_agent_logs(env),
        )
        .await;

        // namespace deletion can be slow; dispatch it in the background
        // and do not observe the result
        let gateway = Arc::clone(&self.gateway);
        let namespace = cfg.namespace.clone();
        tokio::spawn(async move {
            if let Err(e) = gateway.delete_namespace().await {
                warn!(namespace = %namespace, error = %e, "background namespace deletion failed");
            }
        });
        // give the deletion call time to leave the process
        sleep(cfg.waits.deletion_dispatch_grace).await;

        gw.stop_proxy().await;
        info!(namespace = %cfg.namespace, "teardown complete");
    }

    /// Copy the agent binary into every agent pod and launch it.
    async fn inject_agents(&self, classified: &ClassifiedPods) -> Result<()> {
        let cfg = &self.config;

        for (node, pod) in &classified.agent {
            let name = pod_name(pod);

            if !cfg.agent_binary.exists() {
                return Err(Error::precondition(format!(
                    "agent binary not found at {}; build the scout binary before running the e2e suite",
                    cfg.agent_binary.display()
                )));
            }

            self.gateway
                .copy_to_pod(
                    &cfg.agent_binary,
                    &cfg.agent_remote_dir,
                    name,
                    &cfg.agent_container,
                )
                .await?;

            let remote = remote_binary_path(cfg)?;
            self.gateway
                .exec_detached(name, &cfg.agent_container, &agent_launch_command(&remote))
                .await?;

            debug!(node = %node, pod = %name, "agent binary injected and launched");
        }

        Ok(())
    }

    /// Emit the logs of the agent pod colocated with the api victim, for
    /// post-mortem diagnostics.
    async fn emit_agent_logs(&self, env: Option<&TestEnv>) -> Result<()> {
        let Some(env) = env else {
            debug!("no environment handle, skipping agent log capture");
            return Ok(());
        };
        let Some(victim) = env.victim_api.as_ref() else {
            debug!("no victim recorded, skipping agent log capture");
            return Ok(());
        };
        let node = pod_node(victim).unwrap_or_default();
        let Some(agent) = env.agent_on(node) else {
            return Err(Error::missing_pod_on_node(PodRole::Agent, node));
        };

        let logs = self.gateway.fetch_logs(pod_name(agent)).await?;
        info!(pod = %pod_name(agent), "agent logs:\n{logs}");
        Ok(())
    }
}

/// Pick an arbitrary pod from the role map; first-seen, no tie-break.
fn choose_victim(pods: &HashMap<String, Pod>, role: PodRole) -> Result<Pod> {
    pods.values()
        .next()
        .cloned()
        .ok_or_else(|| Error::missing_pod(role))
}

/// The victim's node must also carry an agent pod.
fn ensure_agent_colocated(agents: &HashMap<String, Pod>, victim: &Pod) -> Result<()> {
    let node = pod_node(victim).unwrap_or_default();
    if agents.contains_key(node) {
        Ok(())
    } else {
        Err(Error::missing_pod_on_node(PodRole::Agent, node))
    }
}

/// Where the injected binary lands inside the pod.
fn remote_binary_path(cfg: &TestbedConfig) -> Result<String> {
    let file_name = cfg
        .agent_binary
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::precondition(format!(
                "unusable agent binary path {}",
                cfg.agent_binary.display()
            ))
        })?;
    Ok(format!(
        "{}/{}",
        cfg.agent_remote_dir.trim_end_matches('/'),
        file_name
    ))
}

/// Launch the injected binary with output redirected to the pod's main
/// process streams.
///
/// The agent container is not in the host pid namespace, so the pod's
/// primary process is pid 1; redirecting there lands the output in the
/// pod's log stream.
fn agent_launch_command(remote: &str) -> Vec<String> {
    vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("{remote} > /proc/1/fd/1 2> /proc/1/fd/2"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    use k8s_openapi::api::core::v1::PodSpec;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    use crate::gateway::MockClusterGateway;

    fn pod(name: &str, node: &str) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                node_name: Some(node.to_string()),
                ..Default::default()
            }),
            status: None,
        }
    }

    fn test_config(binary: &Path) -> TestbedConfig {
        let mut config = TestbedConfig::new("scout-e2e", "e2e-debug-session");
        config.agent_binary = binary.to_path_buf();
        config.waits = WaitPolicy::instant();
        config
    }

    /// Expectations for the steps every setup walks through before pod
    /// discovery.
    fn expect_provisioning_preamble(mock: &mut MockClusterGateway) {
        mock.expect_start_proxy().returning(|| Ok(()));
        mock.expect_create_namespace().returning(|| Ok(()));
        mock.expect_apply_manifest().times(3).returning(|_| Ok(()));
        mock.expect_wait_for_pods_ready().returning(|_| Ok(()));
    }

    /// Story: a healthy cluster yields a fully populated environment
    /// handle with both victims chosen and every agent pod armed
    #[tokio::test]
    async fn story_setup_provisions_a_complete_environment() {
        let binary = tempfile::NamedTempFile::new().unwrap();
        let pods = vec![
            pod("sample-api-7f9c-x1", "n1"),
            pod("sample-api-7f9c-x2", "n2"),
            pod("sample-worker-5d2b-y1", "n1"),
            pod("scout-agent-z1", "n1"),
            pod("scout-agent-z2", "n2"),
            pod("kube-proxy-q8r", "n1"),
        ];

        let mut mock = MockClusterGateway::new();
        expect_provisioning_preamble(&mut mock);
        mock.expect_list_pods()
            .returning(move || Ok(pods.clone()));
        mock.expect_copy_to_pod()
            .times(2)
            .returning(|_, _, _, _| Ok(()));
        mock.expect_exec_detached()
            .times(2)
            .withf(|_, container, command| {
                container == "scout"
                    && command.len() == 3
                    && command[2].contains("/proc/1/fd/1")
                    && command[2].contains("2> /proc/1/fd/2")
            })
            .returning(|_, _, _| Ok(()));
        mock.expect_grant_cluster_admin().returning(|_| Ok(()));
        mock.expect_delete_debug_session().returning(|_| Ok(()));

        let testbed = Testbed::new(Arc::new(mock), test_config(binary.path()));
        let env = testbed.setup().await.unwrap();

        assert_eq!(env.namespace, "scout-e2e");
        assert_eq!(env.api_pods.len(), 2);
        assert_eq!(env.worker_pods.len(), 1);
        assert_eq!(env.agent_pods.len(), 2);
        assert!(env.victim_api.is_some());
        assert!(env.victim_worker.is_some());
        assert_eq!(env.admin_binding, DEFAULT_ADMIN_BINDING);
        assert!(env.agent_on("n1").is_some());
        assert!(env.agent_on("n3").is_none());
    }

    /// Story: a namespace missing any required role fails setup with an
    /// error naming that role instead of proceeding with a null victim
    #[tokio::test]
    async fn story_setup_fails_when_a_role_is_missing() {
        let cases = [
            (
                vec![pod("sample-worker-y1", "n1"), pod("scout-agent-z1", "n1")],
                PodRole::Api,
            ),
            (
                vec![pod("sample-api-x1", "n1"), pod("scout-agent-z1", "n1")],
                PodRole::Worker,
            ),
            (
                vec![pod("sample-api-x1", "n1"), pod("sample-worker-y1", "n1")],
                PodRole::Agent,
            ),
        ];

        for (pods, missing_role) in cases {
            let binary = tempfile::NamedTempFile::new().unwrap();
            let mut mock = MockClusterGateway::new();
            expect_provisioning_preamble(&mut mock);
            mock.expect_list_pods()
                .returning(move || Ok(pods.clone()));
            mock.expect_copy_to_pod().returning(|_, _, _, _| Ok(()));
            mock.expect_exec_detached().returning(|_, _, _| Ok(()));

            let testbed = Testbed::new(Arc::new(mock), test_config(binary.path()));
            let err = testbed.setup().await.unwrap_err();
            assert_eq!(err.role(), Some(missing_role), "case {missing_role:?}");
        }
    }

    /// Story: both roles present but never sharing a node fails the
    /// colocation gate with the victim's node in the error
    #[tokio::test]
    async fn story_setup_fails_when_no_agent_shares_the_victims_node() {
        let binary = tempfile::NamedTempFile::new().unwrap();
        let pods = vec![
            pod("sample-api-x1", "n2"),
            pod("sample-worker-y1", "n1"),
            pod("scout-agent-z1", "n1"),
        ];

        let mut mock = MockClusterGateway::new();
        expect_provisioning_preamble(&mut mock);
        mock.expect_list_pods()
            .returning(move || Ok(pods.clone()));
        mock.expect_copy_to_pod().returning(|_, _, _, _| Ok(()));
        mock.expect_exec_detached().returning(|_, _, _| Ok(()));

        let testbed = Testbed::new(Arc::new(mock), test_config(binary.path()));
        let err = testbed.setup().await.unwrap_err();

        assert_eq!(err.role(), Some(PodRole::Agent));
        assert!(err.to_string().contains("on node n2"));
    }

    /// Story: a readiness timeout surfaces as the dedicated timeout error
    /// and aborts before pod discovery
    #[tokio::test]
    async fn story_readiness_timeout_aborts_setup() {
        let binary = tempfile::NamedTempFile::new().unwrap();
        let mut mock = MockClusterGateway::new();
        mock.expect_start_proxy().returning(|| Ok(()));
        mock.expect_create_namespace().returning(|| Ok(()));
        mock.expect_apply_manifest().times(3).returning(|_| Ok(()));
        mock.expect_wait_for_pods_ready()
            .returning(|timeout| Err(Error::readiness_timeout(timeout)));
        // no list_pods expectation: reaching discovery would panic the mock

        let testbed = Testbed::new(Arc::new(mock), test_config(binary.path()));
        let err = testbed.setup().await.unwrap_err();
        assert!(err.is_timeout());
    }

    /// Story: a missing local agent binary is a precondition failure and
    /// no copy is ever attempted
    #[tokio::test]
    async fn story_missing_binary_aborts_before_injection() {
        let pods = vec![
            pod("sample-api-x1", "n1"),
            pod("sample-worker-y1", "n1"),
            pod("scout-agent-z1", "n1"),
        ];

        let mut mock = MockClusterGateway::new();
        expect_provisioning_preamble(&mut mock);
        mock.expect_list_pods()
            .returning(move || Ok(pods.clone()));
        // no copy_to_pod expectation: any copy attempt panics the mock

        let testbed = Testbed::new(
            Arc::new(mock),
            test_config(Path::new("/nonexistent/scout")),
        );
        let err = testbed.setup().await.unwrap_err();

        assert!(matches!(err, Error::Precondition { .. }));
        assert!(err.to_string().contains("/nonexistent/scout"));
    }

    /// Story: teardown is total — with every gateway call failing it still
    /// walks all four steps and stops the proxy last
    #[tokio::test]
    async fn story_teardown_runs_every_step_despite_failures() {
        let env = TestEnv {
            namespace: "scout-e2e".to_string(),
            api_pods: HashMap::from([("n1".to_string(), pod("sample-api-x1", "n1"))]),
            worker_pods: HashMap::from([("n1".to_string(), pod("sample-worker-y1", "n1"))]),
            agent_pods: HashMap::from([("n1".to_string(), pod("scout-agent-z1", "n1"))]),
            victim_api: Some(pod("sample-api-x1", "n1")),
            victim_worker: Some(pod("sample-worker-y1", "n1")),
            admin_binding: DEFAULT_ADMIN_BINDING.to_string(),
        };

        let mut mock = MockClusterGateway::new();
        mock.expect_revoke_cluster_admin()
            .returning(|_| Err(Error::gateway("revoke", "rbac unavailable")));
        mock.expect_fetch_logs()
            .returning(|_| Err(Error::gateway("logs", "pod gone")));
        mock.expect_delete_namespace()
            .returning(|| Err(Error::gateway("delete-ns", "api unavailable")));
        mock.expect_stop_proxy().times(1).returning(|| ());

        let binary = tempfile::NamedTempFile::new().unwrap();
        let testbed = Testbed::new(Arc::new(mock), test_config(binary.path()));
        testbed.teardown(Some(&env)).await;

        // let the detached deletion task run before the mock is verified
        sleep(Duration::from_millis(50)).await;
    }

    /// Story: a setup that failed before producing a handle still gets a
    /// full cleanup pass, minus the log capture nothing was recorded for
    #[tokio::test]
    async fn story_teardown_without_environment_still_cleans_up() {
        let mut mock = MockClusterGateway::new();
        mock.expect_revoke_cluster_admin().returning(|_| Ok(()));
        mock.expect_delete_namespace().times(1).returning(|| Ok(()));
        mock.expect_stop_proxy().times(1).returning(|| ());
        // no fetch_logs expectation: a log fetch would panic the mock

        let binary = tempfile::NamedTempFile::new().unwrap();
        let testbed = Testbed::new(Arc::new(mock), test_config(binary.path()));
        testbed.teardown(None).await;

        sleep(Duration::from_millis(50)).await;
    }

    /// Story: an environment whose agent map never got populated tears
    /// down without fetching logs and without panicking
    #[tokio::test]
    async fn story_teardown_with_empty_agent_map_skips_log_capture() {
        let env = TestEnv {
            namespace: "scout-e2e".to_string(),
            api_pods: HashMap::from([("n1".to_string(), pod("sample-api-x1", "n1"))]),
            worker_pods: HashMap::new(),
            agent_pods: HashMap::new(),
            victim_api: Some(pod("sample-api-x1", "n1")),
            victim_worker: None,
            admin_binding: DEFAULT_ADMIN_BINDING.to_string(),
        };

        let mut mock = MockClusterGateway::new();
        mock.expect_revoke_cluster_admin().returning(|_| Ok(()));
        mock.expect_delete_namespace().returning(|| Ok(()));
        mock.expect_stop_proxy().times(1).returning(|| ());

        let binary = tempfile::NamedTempFile::new().unwrap();
        let testbed = Testbed::new(Arc::new(mock), test_config(binary.path()));
        testbed.teardown(Some(&env)).await;

        sleep(Duration::from_millis(50)).await;
    }

    /// Story: with api pods on n1 and n2 but an agent only on n1, the
    /// victim choice decides whether the colocation gate passes; moving
    /// the agent to n2 makes the n2 choice succeed
    #[test]
    fn story_victim_choice_decides_the_colocation_outcome() {
        let api = HashMap::from([
            ("n1".to_string(), pod("sample-api-x1", "n1")),
            ("n2".to_string(), pod("sample-api-x2", "n2")),
        ]);
        let agents_on_n1 = HashMap::from([("n1".to_string(), pod("scout-agent-z1", "n1"))]);

        // the chosen victim is one of the two, no tie-break promised
        let victim = choose_victim(&api, PodRole::Api).unwrap();
        let node = pod_node(&victim).unwrap();
        assert!(node == "n1" || node == "n2");

        assert!(ensure_agent_colocated(&agents_on_n1, &api["n1"]).is_ok());
        let err = ensure_agent_colocated(&agents_on_n1, &api["n2"]).unwrap_err();
        assert!(err.to_string().contains("on node n2"));

        let agents_on_n2 = HashMap::from([("n2".to_string(), pod("scout-agent-z1", "n2"))]);
        assert!(ensure_agent_colocated(&agents_on_n2, &api["n2"]).is_ok());
    }

    #[test]
    fn test_choose_victim_fails_on_empty_map() {
        let err = choose_victim(&HashMap::new(), PodRole::Worker).unwrap_err();
        assert_eq!(err.role(), Some(PodRole::Worker));
    }

    #[test]
    fn test_remote_binary_path_joins_dir_and_file_name() {
        let binary = tempfile::NamedTempFile::new().unwrap();
        let mut config = test_config(binary.path());
        config.agent_binary = PathBuf::from("target/scout/scout");
        config.agent_remote_dir = "/tmp/".to_string();
        assert_eq!(remote_binary_path(&config).unwrap(), "/tmp/scout");
    }

    #[test]
    fn test_agent_launch_command_redirects_to_pid_one() {
        let command = agent_launch_command("/tmp/scout");
        assert_eq!(command[0], "sh");
        assert_eq!(command[1], "-c");
        assert_eq!(command[2], "/tmp/scout > /proc/1/fd/1 2> /proc/1/fd/2");
    }
}
