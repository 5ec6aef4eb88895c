//! Ephemeral Kubernetes test environments for Scout end-to-end tests
//!
//! A test run provisions a disposable namespace containing the demo
//! workloads and a Scout agent pod per node, injects the locally built
//! agent binary into each agent pod, launches it remotely, grants the
//! namespace's service account elevated permissions, and tears the whole
//! environment down afterwards.
//!
//! The crate is organized around a narrow [`ClusterGateway`] trait so the
//! orchestration sequence can be exercised against mocks:
//!
//! - `gateway`: the cluster operations the orchestrator consumes, plus the
//!   production `kube`-backed implementation
//! - `pods`: prefix-based classification of discovered pods into roles
//! - `testbed`: the setup/teardown state machine and the environment handle
//! - `wait`: named, overridable wait durations
//! - `step`: shared fatal/best-effort step sequencing

pub mod error;
pub mod gateway;
mod manifest;
pub mod pods;
pub mod step;
pub mod testbed;
pub mod wait;

pub use error::Error;
pub use gateway::{ClusterGateway, KubeGateway};
pub use pods::{classify, ClassifiedPods, PodRole, RolePrefixes};
pub use testbed::{TestEnv, Testbed, TestbedConfig};
pub use wait::WaitPolicy;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
