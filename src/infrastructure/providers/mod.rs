//! # Provider Adapters
//!
//! Integrations with third-party shipping aggregators.
//!
//! ## Available Adapters
//!
//! - [`GeAdapter`]: GE, static API key
//! - [`ToneAdapter`]: T1, static API key scoped to a store
//! - [`PakkeAdapter`]: Pakke, raw API key in `Authorization`
//! - [`ManuableAdapter`]: Manuable, session token managed by [`token_manager`]
//!
//! Every adapter normalizes its provider's payloads into
//! [`CanonicalQuote`](crate::domain::entities::CanonicalQuote) and
//! [`GuideResult`](crate::domain::entities::GuideResult).

pub mod classify;
pub mod error;
pub mod ge;
pub mod http_client;
pub mod manuable;
pub mod pakke;
pub mod token_manager;
pub mod tone;
pub mod traits;

pub use error::{AuthSignal, ProviderError, ProviderResult};
pub use ge::{GeAdapter, GeConfig};
pub use http_client::HttpClient;
pub use manuable::{ManuableAdapter, ManuableConfig, ManuableTokenOps};
pub use pakke::{PakkeAdapter, PakkeConfig};
pub use token_manager::{
    TokenOperations, execute_with_retry_on_unauthorized, execute_with_token_management,
};
pub use tone::{ToneAdapter, ToneConfig};
pub use traits::{Annotated, GuideProvider, Provider, QuoteProvider};
