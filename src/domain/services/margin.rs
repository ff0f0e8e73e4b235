//! # Margin Engine
//!
//! Pure profit-margin computation over canonical quotes.
//!
//! Two primitive computations are provided, [`add_percentage_margin`] and
//! [`add_absolute_margin`], both rounding to two decimals. On top of them sit
//! the resolution rules:
//!
//! - [`apply_courier_or_default_margin`]: courier override, else global default
//! - [`apply_global_or_none`]: global margin, else leave totals untouched
//! - [`apply_margins`]: the single entry point every call site uses
//!
//! Missing configuration is a valid degraded state and is reported through
//! the `messages` list. Non-finite numeric input is a caller error and is
//! rejected with [`MarginError::InvalidNumber`] before any arithmetic.
//!
//! # Examples
//!
//! ```
//! use shipping_quotes::domain::services::margin::{add_absolute_margin, add_percentage_margin};
//!
//! assert_eq!(add_percentage_margin(10.0, 150.5).unwrap(), 165.55);
//! assert_eq!(add_absolute_margin(20.0, 99.999).unwrap(), 120.0);
//! assert!(add_percentage_margin(f64::NAN, 10.0).is_err());
//! ```

use crate::domain::entities::margin_config::{
    GlobalMarginConfig, MarginLookup, MarginTable, ProfitMargin,
};
use crate::domain::entities::quote::CanonicalQuote;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::arithmetic::{ArithmeticError, ensure_finite, round2};
use crate::domain::value_objects::{AdjustmentSource, MarginType, ProviderName};
use thiserror::Error;

/// Confirmation appended once per batch of adjusted quotes.
pub const PROFIT_MARGIN_APPLIED: &str = "Profit margin applied";

/// Appended when there is no margin configuration at all.
pub const MARGIN_CONFIG_MISSING: &str = "Profit margin not applied: no margin configuration found";

/// Appended when the global margin value is not a usable number.
pub const MARGIN_VALUE_INVALID: &str =
    "Profit margin not applied: global margin value is not a valid number";

/// Error type for margin computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarginError {
    /// An input was `NaN` or infinite.
    #[error("invalid margin input: {0}")]
    InvalidNumber(#[from] ArithmeticError),

    /// The quote rejected the adjustment.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type for margin computation.
pub type MarginResult<T> = Result<T, MarginError>;

/// Returns `round2(amount * (1 + margin_value / 100))`.
///
/// # Errors
///
/// Returns `MarginError::InvalidNumber` if either input is not finite.
pub fn add_percentage_margin(margin_value: f64, amount: f64) -> MarginResult<f64> {
    let margin_value = ensure_finite(margin_value, "margin value")?;
    let amount = ensure_finite(amount, "amount")?;
    Ok(round2(amount * (1.0 + margin_value / 100.0)))
}

/// Returns `round2(amount + margin_value)`.
///
/// # Errors
///
/// Returns `MarginError::InvalidNumber` if either input is not finite.
pub fn add_absolute_margin(margin_value: f64, amount: f64) -> MarginResult<f64> {
    let margin_value = ensure_finite(margin_value, "margin value")?;
    let amount = ensure_finite(amount, "amount")?;
    Ok(round2(amount + margin_value))
}

/// Computes the adjusted amount for a margin.
///
/// # Errors
///
/// Returns `MarginError::InvalidNumber` if either input is not finite.
pub fn compute_margin(margin: &ProfitMargin, amount: f64) -> MarginResult<f64> {
    match margin.margin_type {
        MarginType::Percentage => add_percentage_margin(margin.value, amount),
        MarginType::Absolute => add_absolute_margin(margin.value, amount),
    }
}

/// Applies `margin` to the quote and tags its provenance.
///
/// # Errors
///
/// Returns `MarginError::InvalidNumber` for non-finite input, or
/// `MarginError::Domain` if the quote was already adjusted.
pub fn apply_profit_margin(
    quote: &mut CanonicalQuote,
    margin: &ProfitMargin,
    source: AdjustmentSource,
) -> MarginResult<()> {
    let new_total = compute_margin(margin, quote.total())?;
    quote.apply_adjustment(new_total, margin.value, margin.margin_type, source)?;
    Ok(())
}

/// Applies the courier override for the quote, falling back to the global
/// margin.
///
/// A fallback appends a diagnostic naming the missing provider or courier;
/// identical diagnostics are only recorded once.
///
/// # Errors
///
/// Returns a `MarginError` if the resolved margin cannot be applied.
pub fn apply_courier_or_default_margin(
    quote: &mut CanonicalQuote,
    table: &MarginTable,
    messages: &mut Vec<String>,
) -> MarginResult<()> {
    let provider = quote.source();
    match table.lookup(provider, quote.courier()) {
        MarginLookup::Custom(margin) => {
            apply_profit_margin(quote, &margin, AdjustmentSource::Custom)
        }
        MarginLookup::MissingCourier => {
            let note = match quote.courier() {
                Some(courier) => format!(
                    "No custom margin for {} on {}, default profit margin applied",
                    courier, provider
                ),
                None => format!(
                    "Unrecognized courier on {}, default profit margin applied",
                    provider
                ),
            };
            push_unique(messages, note);
            apply_profit_margin(quote, &table.global(), AdjustmentSource::Default)
        }
        MarginLookup::MissingProvider => {
            push_unique(messages, missing_provider_note(provider));
            apply_profit_margin(quote, &table.global(), AdjustmentSource::Default)
        }
    }
}

/// Applies the global margin uniformly, or leaves totals unchanged.
///
/// With no margin, or a margin whose value is not a number, totals are left
/// as-is and an explanatory message is appended. Otherwise every quote is
/// adjusted and a single confirmation message is appended.
///
/// # Errors
///
/// Returns a `MarginError` if a quote total is not finite or a quote was
/// already adjusted.
pub fn apply_global_or_none(
    quotes: &mut [CanonicalQuote],
    global: Option<&ProfitMargin>,
    messages: &mut Vec<String>,
) -> MarginResult<()> {
    let Some(margin) = global else {
        messages.push(MARGIN_CONFIG_MISSING.to_string());
        return Ok(());
    };
    if !margin.is_valid() {
        messages.push(MARGIN_VALUE_INVALID.to_string());
        return Ok(());
    }

    for quote in quotes.iter_mut() {
        apply_profit_margin(quote, margin, AdjustmentSource::Default)?;
    }
    messages.push(PROFIT_MARGIN_APPLIED.to_string());
    Ok(())
}

/// Applies margins to a batch of quotes using one configuration snapshot.
///
/// Without a usable global margin this degrades to [`apply_global_or_none`].
/// Otherwise every quote goes through [`apply_courier_or_default_margin`] and
/// one confirmation message is appended for the batch.
///
/// # Errors
///
/// Returns a `MarginError` if a resolved margin cannot be applied.
pub fn apply_margins(
    quotes: &mut [CanonicalQuote],
    config: Option<&GlobalMarginConfig>,
    messages: &mut Vec<String>,
) -> MarginResult<()> {
    let config = match config {
        Some(config) if config.global_margin_profit.is_valid() => config,
        other => {
            return apply_global_or_none(
                quotes,
                other.map(|c| &c.global_margin_profit),
                messages,
            );
        }
    };

    if quotes.is_empty() {
        return Ok(());
    }

    let table = MarginTable::from_config(config);
    for quote in quotes.iter_mut() {
        apply_courier_or_default_margin(quote, &table, messages)?;
    }
    messages.push(PROFIT_MARGIN_APPLIED.to_string());
    Ok(())
}

fn missing_provider_note(provider: ProviderName) -> String {
    format!(
        "No margin settings for provider {}, default profit margin applied",
        provider
    )
}

fn push_unique(messages: &mut Vec<String>, message: String) {
    if !messages.contains(&message) {
        messages.push(message);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::CourierName;
    use proptest::prelude::*;

    fn quote(courier: Option<CourierName>, source: ProviderName, total: f64) -> CanonicalQuote {
        CanonicalQuote::new(1, "Service", total, source).with_courier(courier)
    }

    fn ge_dhl_config() -> GlobalMarginConfig {
        let mut config = GlobalMarginConfig::new(ProfitMargin::percentage(10.0));
        config.upsert_courier_margin(
            ProviderName::Ge,
            CourierName::Dhl,
            ProfitMargin::percentage(15.0),
        );
        config
    }

    mod primitives {
        use super::*;

        #[test]
        fn percentage_margin() {
            assert_eq!(add_percentage_margin(10.0, 150.5).unwrap(), 165.55);
            assert_eq!(add_percentage_margin(15.0, 100.0).unwrap(), 115.0);
        }

        #[test]
        fn absolute_margin() {
            assert_eq!(add_absolute_margin(25.0, 100.0).unwrap(), 125.0);
            assert_eq!(add_absolute_margin(0.333, 1.0).unwrap(), 1.33);
        }

        #[test]
        fn negative_midpoint_rounds_half_up() {
            assert_eq!(add_absolute_margin(-2.0, 0.875).unwrap(), -1.12);
        }

        #[test]
        fn zero_margin_only_rounds() {
            assert_eq!(add_percentage_margin(0.0, 12.345_6).unwrap(), round2(12.345_6));
            assert_eq!(add_absolute_margin(0.0, 12.345_6).unwrap(), round2(12.345_6));
        }

        #[test]
        fn nan_is_rejected() {
            assert!(matches!(
                add_percentage_margin(f64::NAN, 10.0),
                Err(MarginError::InvalidNumber(_))
            ));
            assert!(matches!(
                add_absolute_margin(10.0, f64::NAN),
                Err(MarginError::InvalidNumber(_))
            ));
            assert!(add_absolute_margin(f64::INFINITY, 10.0).is_err());
        }
    }

    mod courier_or_default {
        use super::*;

        #[test]
        fn courier_override_wins() {
            let table = MarginTable::from_config(&ge_dhl_config());
            let mut messages = Vec::new();
            let mut q = quote(Some(CourierName::Dhl), ProviderName::Ge, 100.0);

            apply_courier_or_default_margin(&mut q, &table, &mut messages).unwrap();

            assert_eq!(q.total(), 115.0);
            assert_eq!(
                q.adjustment().unwrap().adjustment_source,
                AdjustmentSource::Custom
            );
            assert!(messages.is_empty());
        }

        #[test]
        fn missing_courier_falls_back_to_default() {
            let table = MarginTable::from_config(&ge_dhl_config());
            let mut messages = Vec::new();
            let mut q = quote(Some(CourierName::Ups), ProviderName::Ge, 100.0);

            apply_courier_or_default_margin(&mut q, &table, &mut messages).unwrap();

            assert_eq!(q.total(), 110.0);
            assert_eq!(
                q.adjustment().unwrap().adjustment_source,
                AdjustmentSource::Default
            );
            assert_eq!(messages.len(), 1);
            assert!(messages[0].contains("UPS"));
            assert!(messages[0].contains("GE"));
        }

        #[test]
        fn missing_provider_falls_back_to_default() {
            let table = MarginTable::from_config(&ge_dhl_config());
            let mut messages = Vec::new();
            let mut q = quote(Some(CourierName::Dhl), ProviderName::Manuable, 200.0);

            apply_courier_or_default_margin(&mut q, &table, &mut messages).unwrap();

            assert_eq!(q.total(), 220.0);
            assert!(messages[0].contains("provider Mn"));
        }

        #[test]
        fn fallback_notes_are_deduplicated() {
            let table = MarginTable::from_config(&ge_dhl_config());
            let mut messages = Vec::new();
            for _ in 0..3 {
                let mut q = quote(Some(CourierName::Ups), ProviderName::Ge, 10.0);
                apply_courier_or_default_margin(&mut q, &table, &mut messages).unwrap();
            }
            assert_eq!(messages.len(), 1);
        }
    }

    mod global_or_none {
        use super::*;

        #[test]
        fn missing_config_leaves_totals() {
            let mut quotes = vec![quote(None, ProviderName::Ge, 50.0)];
            let mut messages = Vec::new();

            apply_global_or_none(&mut quotes, None, &mut messages).unwrap();

            assert_eq!(quotes[0].total(), 50.0);
            assert!(!quotes[0].is_adjusted());
            assert_eq!(messages, vec![MARGIN_CONFIG_MISSING.to_string()]);
        }

        #[test]
        fn invalid_value_leaves_totals() {
            let mut quotes = vec![quote(None, ProviderName::Ge, 50.0)];
            let mut messages = Vec::new();
            let margin = ProfitMargin::percentage(f64::NAN);

            apply_global_or_none(&mut quotes, Some(&margin), &mut messages).unwrap();

            assert_eq!(quotes[0].total(), 50.0);
            assert_eq!(messages, vec![MARGIN_VALUE_INVALID.to_string()]);
        }

        #[test]
        fn applies_uniformly_with_single_message() {
            let mut quotes = vec![
                quote(None, ProviderName::Ge, 50.0),
                quote(Some(CourierName::Dhl), ProviderName::Tone, 100.0),
            ];
            let mut messages = Vec::new();
            let margin = ProfitMargin::absolute(5.0);

            apply_global_or_none(&mut quotes, Some(&margin), &mut messages).unwrap();

            assert_eq!(quotes[0].total(), 55.0);
            assert_eq!(quotes[1].total(), 105.0);
            assert_eq!(messages, vec![PROFIT_MARGIN_APPLIED.to_string()]);
        }
    }

    mod unified {
        use super::*;

        #[test]
        fn override_precedence_across_batch() {
            let mut quotes = vec![
                quote(Some(CourierName::Dhl), ProviderName::Ge, 100.0),
                quote(Some(CourierName::Ups), ProviderName::Ge, 100.0),
            ];
            let mut messages = Vec::new();

            apply_margins(&mut quotes, Some(&ge_dhl_config()), &mut messages).unwrap();

            assert_eq!(quotes[0].total(), 115.0);
            assert_eq!(quotes[1].total(), 110.0);
            assert_eq!(
                messages
                    .iter()
                    .filter(|m| m.as_str() == PROFIT_MARGIN_APPLIED)
                    .count(),
                1
            );
        }

        #[test]
        fn no_config_degrades_to_none() {
            let mut quotes = vec![quote(None, ProviderName::Pakke, 70.0)];
            let mut messages = Vec::new();

            apply_margins(&mut quotes, None, &mut messages).unwrap();

            assert_eq!(quotes[0].total(), 70.0);
            assert_eq!(messages, vec![MARGIN_CONFIG_MISSING.to_string()]);
        }

        #[test]
        fn empty_batch_adds_no_confirmation() {
            let mut messages = Vec::new();
            apply_margins(&mut [], Some(&ge_dhl_config()), &mut messages).unwrap();
            assert!(messages.is_empty());
        }

        #[test]
        fn second_application_is_rejected() {
            let mut quotes = vec![quote(None, ProviderName::Ge, 10.0)];
            let mut messages = Vec::new();
            let config = GlobalMarginConfig::new(ProfitMargin::absolute(1.0));
            apply_margins(&mut quotes, Some(&config), &mut messages).unwrap();
            let again = apply_margins(&mut quotes, Some(&config), &mut messages);
            assert!(matches!(
                again,
                Err(MarginError::Domain(DomainError::MarginAlreadyApplied(_)))
            ));
        }
    }

    proptest! {
        #[test]
        fn percentage_result_has_two_decimals(
            margin in 0.0f64..100.0,
            amount in 0.0f64..100_000.0,
        ) {
            let result = add_percentage_margin(margin, amount).unwrap();
            let scaled = result * 100.0;
            prop_assert!((scaled - scaled.round()).abs() < 1e-6);
        }

        #[test]
        fn absolute_result_has_two_decimals(
            margin in 0.0f64..1_000.0,
            amount in 0.0f64..100_000.0,
        ) {
            let result = add_absolute_margin(margin, amount).unwrap();
            let scaled = result * 100.0;
            prop_assert!((scaled - scaled.round()).abs() < 1e-6);
        }

        #[test]
        fn zero_margin_is_rounding_only(amount in 0.0f64..100_000.0) {
            prop_assert_eq!(add_percentage_margin(0.0, amount).unwrap(), round2(amount));
            prop_assert_eq!(add_absolute_margin(0.0, amount).unwrap(), round2(amount));
        }
    }
}
