//! Infrastructure layer - credential stores, hashing, tokens and observability

pub mod auth;
pub mod logging;
pub mod observability;
pub mod user;
