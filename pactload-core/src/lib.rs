//! pactload core library: domain types, expression resolution, pact documents.
//!
//! Public API surface:
//! - [`types`]: newtypes for provider and consumer names
//! - [`error`]: [`PactError`]
//! - [`expression`]: `${key:default}` placeholders and list expressions
//! - [`document`]: the [`PactDocument`] envelope and its reader
//! - [`registry`]: the consumer-keyed [`PactRegistry`]

pub mod document;
pub mod error;
pub mod expression;
pub mod registry;
pub mod types;

pub use document::{PactDocument, Participant};
pub use error::PactError;
pub use expression::{
    parse_expression, parse_list_expression, MapResolver, SystemPropertyResolver, ValueResolver,
};
pub use registry::PactRegistry;
pub use types::{ConsumerName, ProviderName};
