//! OSCode Admin - operator console for the OSCode community site
//!
//! Staff sign in against the remote admin API and manage:
//! - the team roster, including member photos
//! - community events
//! - the contact inbox fed by the public site
//!
//! The UI is a Dioxus app ([`app`]); everything below it is plain async Rust
//! over the [`api::AdminApi`] trait so it can be driven from tests.

// =============================================================================
// Lints - Enforce code quality and consistency
// =============================================================================

// Deny truly dangerous patterns (these will fail the build)
#![deny(unsafe_code)]
#![deny(unused_must_use)]

// Dioxus UI app
pub mod app;

// Client core (shared between native and WASM builds)
pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod resource;
pub mod session;
pub mod upload;

// In-memory admin API for development and integration tests
#[cfg(feature = "server")]
pub mod mock_server;

#[cfg(test)]
pub(crate) mod testing;
