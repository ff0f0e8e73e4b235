//! # Token Manager
//!
//! Session token lifecycle for providers that authenticate with a stored
//! bearer token.
//!
//! Tokens are never expired proactively. An operation runs with the stored
//! token; when the provider answers "unauthorized" a fresh token is created,
//! persisted, and the operation is retried exactly once.
//!
//! Two entry points exist:
//!
//! - [`execute_with_token_management`] reacts to unauthorized *errors*.
//! - [`execute_with_retry_on_unauthorized`] reacts to a *sentinel message*
//!   in an otherwise successful result, for flows that report expiry in-band.
//!
//! # Examples
//!
//! ```ignore
//! let outcome = execute_with_token_management(
//!     move |token| adapter.fetch_rates(token, payload),
//!     "get_quote",
//!     false,
//!     &token_ops,
//!     "[Manuable]",
//! )
//! .await?;
//! println!("{:?}", outcome.messages);
//! ```

use crate::infrastructure::providers::error::{
    AuthSignal, ProviderError, ProviderResult, UNAUTHORIZED_MESSAGE,
};
use crate::infrastructure::providers::traits::Annotated;
use async_trait::async_trait;
use std::future::Future;
use tracing::{debug, info, warn};

/// Token storage and issuance for one provider.
#[async_trait]
pub trait TokenOperations: Send + Sync {
    /// Returns the stored token for the environment, if any.
    async fn get_stored_token(&self, is_prod: bool) -> ProviderResult<Option<String>>;

    /// Requests a fresh token from the provider.
    async fn create_new_token(&self) -> ProviderResult<String>;

    /// Persists a token for the environment, replacing any previous one.
    async fn update_stored_token(&self, token: &str, is_prod: bool) -> ProviderResult<()>;

    /// Provider-specific phrase that marks an error message as unauthorized.
    fn invalid_token_phrase(&self) -> Option<&str> {
        None
    }
}

/// Returns true if a failure means the token is no longer accepted.
///
/// # Examples
///
/// ```
/// use shipping_quotes::infrastructure::providers::error::AuthSignal;
/// use shipping_quotes::infrastructure::providers::token_manager::is_unauthorized;
///
/// assert!(is_unauthorized(AuthSignal::Http { status: 401 }, None));
/// assert!(is_unauthorized(
///     AuthSignal::Message { text: "Invalid token supplied" },
///     Some("Invalid token"),
/// ));
/// assert!(!is_unauthorized(AuthSignal::Unknown, Some("Invalid token")));
/// ```
#[must_use]
pub fn is_unauthorized(signal: AuthSignal<'_>, invalid_token_phrase: Option<&str>) -> bool {
    match signal {
        AuthSignal::Http { status } => status == 401,
        AuthSignal::Message { text } => {
            text == UNAUTHORIZED_MESSAGE
                || invalid_token_phrase
                    .is_some_and(|phrase| !phrase.is_empty() && text.contains(phrase))
        }
        AuthSignal::Unknown => false,
    }
}

/// Runs `operation` with a valid token, refreshing it once on expiry.
///
/// 1. Without a stored token, a new one is created, persisted, and the
///    operation runs once.
/// 2. With a stored token, the operation runs; an unauthorized failure
///    triggers one refresh and one retry. A second failure propagates.
///
/// # Errors
///
/// - Token creation or persistence failures propagate unchanged
/// - Non-unauthorized operation failures propagate unchanged
/// - `ProviderError::Unknown` becomes `ProviderError::InvalidRequest`
pub async fn execute_with_token_management<T, F, Fut>(
    operation: F,
    operation_name: &str,
    is_prod: bool,
    token_ops: &dyn TokenOperations,
    provider_prefix: &str,
) -> ProviderResult<Annotated<T>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = ProviderResult<T>>,
{
    let describe = |error: ProviderError| describe_unknown(error, operation_name, provider_prefix);
    let mut messages = Vec::new();

    let Some(token) = token_ops.get_stored_token(is_prod).await.map_err(describe)? else {
        info!(
            provider = provider_prefix,
            operation = operation_name,
            "No stored token, creating one"
        );
        let token = refresh_token(token_ops, is_prod).await?;
        messages.push(format!("{} No stored token, new token created", provider_prefix));

        let result = operation(token).await.map_err(describe)?;
        messages.push(completed(operation_name, provider_prefix));
        return Ok(Annotated::new(result, messages));
    };

    match operation(token).await {
        Ok(result) => {
            debug!(provider = provider_prefix, operation = operation_name, "Stored token accepted");
            messages.push(format!("{} Stored token is valid", provider_prefix));
            messages.push(completed(operation_name, provider_prefix));
            Ok(Annotated::new(result, messages))
        }
        Err(error) if is_unauthorized(error.auth_signal(), token_ops.invalid_token_phrase()) => {
            info!(
                provider = provider_prefix,
                operation = operation_name,
                error = %error,
                "Token rejected, refreshing and retrying once"
            );
            let token = refresh_token(token_ops, is_prod).await?;
            messages.push(format!(
                "{} Token expired, new token created and {} retried",
                provider_prefix, operation_name
            ));

            let result = operation(token).await.map_err(|error| {
                warn!(
                    provider = provider_prefix,
                    operation = operation_name,
                    error = %error,
                    "Retry failed"
                );
                describe(error)
            })?;
            messages.push(completed(operation_name, provider_prefix));
            Ok(Annotated::new(result, messages))
        }
        Err(error) => Err(describe(error)),
    }
}

/// Re-runs an operation with a fresh token when its result carries `sentinel`.
///
/// `initial` is awaited once. If its messages contain `sentinel`, a new token
/// is created and persisted, and `retry(token)` replaces the result.
///
/// # Errors
///
/// Any failure at any stage is reported as the generic invalid request
/// error; the underlying cause is logged.
#[allow(clippy::too_many_arguments)]
pub async fn execute_with_retry_on_unauthorized<T, I, R, Fut>(
    initial: I,
    retry: R,
    operation_name: &str,
    sentinel: &str,
    token_ops: &dyn TokenOperations,
    is_prod: bool,
    provider_prefix: &str,
) -> ProviderResult<Annotated<T>>
where
    I: Future<Output = ProviderResult<Annotated<T>>>,
    R: FnOnce(String) -> Fut,
    Fut: Future<Output = ProviderResult<Annotated<T>>>,
{
    let generic = |error: ProviderError| to_generic(error, operation_name, provider_prefix);

    let outcome = initial.await.map_err(generic)?;
    if !outcome.has_message(sentinel) {
        return Ok(outcome);
    }

    info!(
        provider = provider_prefix,
        operation = operation_name,
        "Session expired, refreshing and retrying once"
    );
    let token = refresh_token(token_ops, is_prod).await.map_err(generic)?;
    let mut retried = retry(token).await.map_err(generic)?;
    retried.messages.insert(
        0,
        format!(
            "{} Session expired, new token created and {} retried",
            provider_prefix, operation_name
        ),
    );
    Ok(retried)
}

async fn refresh_token(token_ops: &dyn TokenOperations, is_prod: bool) -> ProviderResult<String> {
    let token = token_ops.create_new_token().await?;
    token_ops.update_stored_token(&token, is_prod).await?;
    Ok(token)
}

fn completed(operation_name: &str, provider_prefix: &str) -> String {
    format!("{} {} completed", provider_prefix, operation_name)
}

fn describe_unknown(
    error: ProviderError,
    operation_name: &str,
    provider_prefix: &str,
) -> ProviderError {
    match error {
        ProviderError::Unknown { message } => {
            warn!(
                provider = provider_prefix,
                operation = operation_name,
                cause = %message,
                "Unexpected failure"
            );
            ProviderError::invalid_request(format!(
                "{} {} failed with an unexpected error",
                provider_prefix, operation_name
            ))
        }
        other => other,
    }
}

fn to_generic(error: ProviderError, operation_name: &str, provider_prefix: &str) -> ProviderError {
    warn!(
        provider = provider_prefix,
        operation = operation_name,
        error = %error,
        "Operation failed"
    );
    ProviderError::generic()
}
