//! Business logic services built on top of the repositories.

pub mod auth;
pub mod checkout;
pub mod export;
