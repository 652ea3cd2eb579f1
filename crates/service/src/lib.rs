//! Service layer holding the authentication business logic.
//! - Storage is reached only through the traits in `auth::repository`.
//! - `auth::repo::seaorm` binds those traits to the `models` entities.

pub mod auth;
#[cfg(test)]
pub mod test_support;
