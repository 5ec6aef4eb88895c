//! Pod classification for the test topology
//!
//! The test namespace runs one pod of each role per node: the two demo
//! workloads (`sample-api`, `sample-worker`) and the Scout agent. Pods are
//! assigned to roles purely by name prefix; anything else in the namespace
//! is ignored. The one-per-node assumption is not enforced — if two pods
//! of the same role land on the same node the later one wins.

use std::collections::HashMap;
use std::fmt;

use k8s_openapi::api::core::v1::Pod;

/// Default name prefix for sample-api workload pods
pub const API_POD_PREFIX: &str = "sample-api";
/// Default name prefix for sample-worker workload pods
pub const WORKER_POD_PREFIX: &str = "sample-worker";
/// Default name prefix for Scout agent pods
pub const AGENT_POD_PREFIX: &str = "scout";

/// The "Ready" pod condition type
const CONDITION_READY: &str = "Ready";
/// The "True" condition status value
const STATUS_TRUE: &str = "True";

/// The role a pod plays in the test topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PodRole {
    /// A sample-api workload instance
    Api,
    /// A sample-worker workload instance
    Worker,
    /// A Scout agent instance
    Agent,
}

impl fmt::Display for PodRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PodRole::Api => f.write_str("sample-api"),
            PodRole::Worker => f.write_str("sample-worker"),
            PodRole::Agent => f.write_str("agent"),
        }
    }
}

/// Name prefixes used to classify pods into roles.
#[derive(Clone, Debug)]
pub struct RolePrefixes {
    /// Prefix matching sample-api pods
    pub api: String,
    /// Prefix matching sample-worker pods
    pub worker: String,
    /// Prefix matching agent pods
    pub agent: String,
}

impl Default for RolePrefixes {
    fn default() -> Self {
        Self {
            api: API_POD_PREFIX.to_string(),
            worker: WORKER_POD_PREFIX.to_string(),
            agent: AGENT_POD_PREFIX.to_string(),
        }
    }
}

/// Pods partitioned by role, keyed by the node each pod is scheduled to.
///
/// Iteration order over the maps is arbitrary; nothing downstream may
/// depend on it (victim selection is explicitly arbitrary).
#[derive(Clone, Debug, Default)]
pub struct ClassifiedPods {
    /// sample-api pods by node name
    pub api: HashMap<String, Pod>,
    /// sample-worker pods by node name
    pub worker: HashMap<String, Pod>,
    /// agent pods by node name
    pub agent: HashMap<String, Pod>,
}

/// Partition `pods` into role buckets by name prefix.
///
/// Pods matching no prefix are skipped, as are pods not yet scheduled to a
/// node (they carry no usable map key). Pure function of its inputs.
pub fn classify(pods: &[Pod], prefixes: &RolePrefixes) -> ClassifiedPods {
    let mut classified = ClassifiedPods::default();

    for pod in pods {
        let name = pod_name(pod);
        let Some(node) = pod_node(pod) else {
            tracing::trace!(pod = %name, "skipping pod with no node assignment");
            continue;
        };

        if name.starts_with(&prefixes.api) {
            classified.api.insert(node.to_string(), pod.clone());
        } else if name.starts_with(&prefixes.worker) {
            classified.worker.insert(node.to_string(), pod.clone());
        } else if name.starts_with(&prefixes.agent) {
            classified.agent.insert(node.to_string(), pod.clone());
        }
    }

    classified
}

/// The pod's name, or an empty string if unset.
pub fn pod_name(pod: &Pod) -> &str {
    pod.metadata.name.as_deref().unwrap_or_default()
}

/// The node the pod is scheduled to, if any.
pub fn pod_node(pod: &Pod) -> Option<&str> {
    pod.spec.as_ref().and_then(|s| s.node_name.as_deref())
}

/// Whether the pod reports the `Ready` condition with status `True`.
pub fn pod_is_ready(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .map(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == CONDITION_READY && c.status == STATUS_TRUE)
        })
        .unwrap_or(false)
}
