//! Typed mock of the Istio/Kubernetes cluster client for unit tests.
//!
//! [`ClientMock`] implements [`IstioClient`] by answering every call from a
//! per-operation [`Stub`]. Nothing talks to a cluster: a test configures the
//! answers it needs, hands the mock to the code under test, and checks which
//! calls were made. A call nobody configured panics, so incomplete setup fails
//! loudly instead of returning an empty value.
//!
//! # Examples
//!
//! ## Stubbing individual calls
//!
//! ```rust
//! use istio_kube_mock::{fixtures, ClientMock, Error, IstioClient};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let k8s = ClientMock::new();
//! k8s.get_pods
//!     .returns(("bookinfo", "app=reviews"), Ok(fixtures::fake_pod_list()));
//! k8s.mock_empty_workload("bookinfo", "details-v1");
//!
//! let pods = k8s.get_pods("bookinfo", "app=reviews").await.unwrap();
//! assert_eq!(pods.len(), 3);
//!
//! let missing = k8s.get_deployment("bookinfo", "details-v1").await;
//! assert!(matches!(missing, Err(Error::NotFound { .. })));
//! # }
//! ```
//!
//! ## Sharing through a client factory
//!
//! ```rust
//! use istio_kube_mock::{ClientFactory, ClientFactoryMock, ClientMock, IstioClient};
//! use std::sync::Arc;
//!
//! let k8s: Arc<dyn IstioClient> = Arc::new(ClientMock::new());
//! let factory = ClientFactoryMock::new(Arc::clone(&k8s));
//!
//! let client = factory.get_client("any-token").unwrap();
//! assert!(Arc::ptr_eq(&client, &k8s));
//! assert!(client.is_openshift());
//! ```

mod builder;
mod client;
mod error;
mod factory;
pub mod fixtures;
pub mod label_selector;
mod mock;
pub mod resources;
mod stub;

#[cfg(test)]
mod factory_test;
#[cfg(test)]
mod label_selector_test;
#[cfg(test)]
mod stub_test;

pub use builder::ClientMockBuilder;
pub use client::{ClientFactory, IstioClient};
pub use error::{Error, Result};
pub use factory::ClientFactoryMock;
pub use mock::ClientMock;
pub use stub::{IntoArgs, Responder, Stub};
