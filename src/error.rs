//! Error types for the testbed orchestrator
//!
//! Setup is fail-fast: the first error aborts the remaining steps and is
//! surfaced to the caller. Teardown recovers from every error locally, so
//! these variants only ever escape during provisioning. The variants keep
//! the failure classes a caller needs to tell apart: a missing local
//! binary, a cluster API failure, a readiness timeout, and a topology
//! problem (a required pod role that was never found).

use std::time::Duration;

use thiserror::Error;

use crate::pods::PodRole;

/// Main error type for testbed operations
#[derive(Debug, Error)]
pub enum Error {
    /// Kubernetes API error
    #[error("kubernetes error: {source}")]
    Kube {
        /// The underlying kube-rs error
        #[from]
        source: kube::Error,
    },

    /// A local precondition was not met before touching the cluster
    #[error("precondition failed: {message}")]
    Precondition {
        /// Description of the unmet precondition
        message: String,
    },

    /// Gateway operation failure outside the Kubernetes API itself
    /// (proxy spawn, manifest I/O, exec stream plumbing)
    #[error("cluster gateway error [{operation}]: {message}")]
    Gateway {
        /// The gateway operation that failed (e.g. "start-proxy", "copy")
        operation: String,
        /// Description of what failed
        message: String,
    },

    /// Pods did not become ready within the configured bound
    ///
    /// Distinct from [`Error::Kube`] so callers can tell "cluster
    /// unreachable" apart from "cluster slow or unhealthy".
    #[error("timed out after {waited:?} waiting for pods to become ready")]
    ReadinessTimeout {
        /// How long the orchestrator waited before giving up
        waited: Duration,
    },

    /// A required pod role was not found in the namespace
    #[error("cannot find {role} pod")]
    MissingPod {
        /// The role no pod was classified under
        role: PodRole,
    },

    /// A required pod role was not found on a specific node
    ///
    /// Raised by the colocation gate: the victim's node must also carry an
    /// agent pod.
    #[error("cannot find {role} pod on node {node}")]
    MissingPodOnNode {
        /// The absent role
        role: PodRole,
        /// The node the role was required on
        node: String,
    },
}

impl Error {
    /// Create a precondition error with the given message
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition {
            message: msg.into(),
        }
    }

    /// Create a gateway error for the given operation
    pub fn gateway(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Gateway {
            operation: operation.into(),
            message: msg.into(),
        }
    }

    /// Create a readiness timeout error
    pub fn readiness_timeout(waited: Duration) -> Self {
        Self::ReadinessTimeout { waited }
    }

    /// Create a missing-pod error for the given role
    pub fn missing_pod(role: PodRole) -> Self {
        Self::MissingPod { role }
    }

    /// Create a missing-pod error for the given role on a specific node
    pub fn missing_pod_on_node(role: PodRole, node: impl Into<String>) -> Self {
        Self::MissingPodOnNode {
            role,
            node: node.into(),
        }
    }

    /// Whether this error is the readiness timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::ReadinessTimeout { .. })
    }

    /// The pod role this error is about, if any
    pub fn role(&self) -> Option<PodRole> {
        match self {
            Error::MissingPod { role } | Error::MissingPodOnNode { role, .. } => Some(*role),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Story: a missing agent binary is reported as a user-facing
    /// precondition failure, not a generic I/O error
    #[test]
    fn story_missing_binary_is_a_precondition_failure() {
        let err = Error::precondition("agent binary not found at target/scout/scout");
        assert!(err.to_string().contains("precondition failed"));
        assert!(err.to_string().contains("target/scout/scout"));
        assert!(!err.is_timeout());
    }

    /// Story: a readiness timeout is distinguishable from a cluster error
    #[test]
    fn story_timeout_is_distinct_from_cluster_errors() {
        let err = Error::readiness_timeout(Duration::from_secs(120));
        assert!(err.is_timeout());
        assert!(err.to_string().contains("120s"));

        let err = Error::gateway("apply", "connection refused");
        assert!(!err.is_timeout());
    }

    /// Story: missing-pod errors name the role so the failure message says
    /// which part of the topology never came up
    #[test]
    fn story_missing_pod_errors_name_the_role() {
        let err = Error::missing_pod(PodRole::Api);
        assert_eq!(err.role(), Some(PodRole::Api));
        assert!(err.to_string().contains("cannot find sample-api pod"));

        let err = Error::missing_pod_on_node(PodRole::Agent, "n2");
        assert_eq!(err.role(), Some(PodRole::Agent));
        assert!(err.to_string().contains("on node n2"));
    }

    #[test]
    fn test_gateway_error_includes_operation() {
        let err = Error::gateway("start-proxy", "kubectl not found");
        assert!(err.to_string().contains("[start-proxy]"));
        assert!(err.to_string().contains("kubectl not found"));
        assert_eq!(err.role(), None);
    }
}
