//! Shared wire types for the OSCode admin API.
//!
//! This crate defines the records and payloads that cross the boundary between:
//! - the operator console (`oscode-admin`) - the API consumer
//! - the admin API (and the in-repo mock used for tests and local development)
//!
//! # Modules
//! - [`roster`] - Team member records
//! - [`events`] - Community event records
//! - [`contact`] - Inbound contact messages
//! - [`auth`] - Login/verify/logout, upload and acknowledgement payloads
//! - [`stats`] - Dashboard statistics

pub mod auth;
pub mod contact;
pub mod events;
pub mod roster;
pub mod stats;
mod nullable;
mod timestamp;

// Re-export commonly used types at crate root
pub use auth::{
    Ack, ErrorBody, LoginRequest, LoginResponse, LogoutRequest, UploadResponse, VerifyResponse,
};
pub use contact::ContactMessage;
pub use events::{Event, EventType};
pub use roster::{TeamMember, YEARS};
pub use stats::{DashboardOverview, DashboardStats};
