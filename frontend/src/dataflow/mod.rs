//! Event plumbing shared by the navigation core.
//!
//! State lives in `zoon::Mutable` / `zoon::MutableVec` cells on the
//! [`Store`](crate::store::Store); events that must be handled by a single
//! owner travel through a [`Relay`].

pub mod relay;

pub use relay::{Relay, relay};
