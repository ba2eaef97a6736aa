//! Custom resources which are not part of the Kubernetes API itself, and therefore not covered by
//! [`k8s_openapi`].
pub mod vpa;
