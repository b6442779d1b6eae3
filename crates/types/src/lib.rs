//! Core types and traits for the pbiembed workspace.
//!
//! This crate defines the shared abstractions used across all layers of the
//! embed-token service: error types, the bearer token representation, the
//! analytics API models, the uniform response envelope, and the async traits
//! implemented by the identity provider and analytics API clients.

pub mod embed;
pub mod envelope;
pub mod error;
pub mod model;
pub mod token;
pub mod traits;

pub use embed::EmbedConfig;
pub use envelope::{ResponseEnvelope, ResultType};
pub use error::{ConfigIssue, EmbedError};
pub use model::{Dataset, EffectiveIdentity, EmbedToken, GenerateTokenRequest, Report};
pub use token::AccessToken;
pub use traits::{AnalyticsApi, AnalyticsConnector, IdentityProvider, PasswordCredential, TokenRequest};
