//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! ## Quotes
//! - `POST /api/v1/quotes` - Aggregate quotes from every provider
//!
//! ## Guides
//! - `POST /api/v1/guides` - Create a guide with the chosen provider
//!
//! ## Margins
//! - `GET /api/v1/margins` - Current margin configuration
//! - `PUT /api/v1/margins/global` - Replace the global margin
//! - `PUT /api/v1/margins/{provider}/{courier}` - Upsert a courier override
//! - `DELETE /api/v1/margins/{provider}/{courier}` - Remove a courier override
//!
//! ## Health
//! - `GET /api/v1/health` - Health check endpoint
//!
//! # Usage
//!
//! ```ignore
//! use shipping_quotes::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState {
//!     aggregator: /* ... */,
//!     guides: /* ... */,
//!     margins: /* ... */,
//! });
//!
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{ApiError, ApiResult, AppState, HealthResponse, MarginUpdateRequest};
pub use routes::create_router;
