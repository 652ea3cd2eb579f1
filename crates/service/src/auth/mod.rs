//! Auth module: domain types, storage contracts, hashing and token policy, and the
//! service orchestrating registration, login and token verification.
//!
//! The service only talks to storage through [`repository::CredentialStore`] and
//! [`repository::AppRegistry`], so any backend (SeaORM, in-memory) can be plugged in.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use errors::AuthError;
pub use service::{AuthConfig, AuthService, DynAuthService};
