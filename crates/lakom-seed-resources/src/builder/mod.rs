//! This module provides builders for various (Kubernetes) objects.
//!
//! They are generic over the concrete object they produce. Everything specific to the Lakom
//! deployment lives in [`crate::resources`].
pub mod meta;
pub mod pdb;
pub mod pod;
pub mod webhook;
