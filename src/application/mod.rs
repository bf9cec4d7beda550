//! Application layer
//!
//! Use cases that turn presentation-layer commands into calls on the domain
//! services.

pub mod auth;
