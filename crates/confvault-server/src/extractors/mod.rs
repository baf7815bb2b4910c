//! Request extractors.

pub mod principal;
pub mod query;

pub use principal::Principal;
pub use query::IdentityQuery;
