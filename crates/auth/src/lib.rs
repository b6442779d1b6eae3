//! Identity provider implementations.
//!
//! [`aad::AadPasswordProvider`] acquires service-account tokens from an
//! Azure AD authority with the resource-owner password grant.

pub mod aad;

pub use aad::AadPasswordProvider;
