//! Keeps the USD and IQD amounts of a currency exchange consistent with its rate.
//!
//! The form state is passed in and returned explicitly: each edit produces the
//! next state and the caller decides where to keep it.

use crate::core::currency::parse_decimal;
use anyhow::{Context, Result, bail};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

/// Direction of an exchange. Only labels the entry; the arithmetic is the same
/// either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExchangeType {
    #[default]
    UsdToIqd,
    IqdToUsd,
}

impl Display for ExchangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ExchangeType::UsdToIqd => "USD → IQD",
                ExchangeType::IqdToUsd => "IQD → USD",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    Usd,
    Iqd,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExchangeAmounts {
    pub usd_amount: String,
    pub iqd_amount: String,
}

/// Working state of one exchange entry as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeFormState {
    pub exchange_type: ExchangeType,
    pub rate: String,
    pub usd_amount: String,
    pub iqd_amount: String,
    pub auto_calculate: bool,
}

/// A completed exchange with every field parsed, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeEntry {
    pub exchange_type: ExchangeType,
    pub rate: Decimal,
    pub usd_amount: Decimal,
    pub iqd_amount: Decimal,
}

impl ExchangeFormState {
    pub fn new(exchange_type: ExchangeType, rate: impl Into<String>, auto_calculate: bool) -> Self {
        Self {
            exchange_type,
            rate: rate.into(),
            usd_amount: String::new(),
            iqd_amount: String::new(),
            auto_calculate,
        }
    }

    /// The rate, if it is a number greater than zero.
    pub fn valid_rate(&self) -> Option<Decimal> {
        parse_decimal(&self.rate).filter(|rate| *rate > Decimal::ZERO)
    }

    pub fn amounts(&self) -> ExchangeAmounts {
        ExchangeAmounts {
            usd_amount: self.usd_amount.clone(),
            iqd_amount: self.iqd_amount.clone(),
        }
    }

    /// Applies a keystroke-level edit of one amount field.
    pub fn apply_edit(self, field: AmountField, raw: &str) -> Self {
        let amounts = on_field_edited(&self, field, raw);
        Self {
            usd_amount: amounts.usd_amount,
            iqd_amount: amounts.iqd_amount,
            ..self
        }
    }

    /// Replaces the rate. Amounts already entered are left as they are.
    pub fn with_rate(self, rate: impl Into<String>) -> Self {
        Self {
            rate: rate.into(),
            ..self
        }
    }

    /// Turns auto-calculation on or off for subsequent edits.
    pub fn with_auto_calculate(self, auto_calculate: bool) -> Self {
        Self {
            auto_calculate,
            ..self
        }
    }

    pub fn to_entry(&self) -> Result<ExchangeEntry> {
        let Some(rate) = self.valid_rate() else {
            bail!("Exchange rate must be a positive number, got '{}'", self.rate);
        };
        let usd_amount = parse_decimal(&self.usd_amount)
            .with_context(|| format!("Invalid USD amount: '{}'", self.usd_amount))?;
        let iqd_amount = parse_decimal(&self.iqd_amount)
            .with_context(|| format!("Invalid IQD amount: '{}'", self.iqd_amount))?;

        Ok(ExchangeEntry {
            exchange_type: self.exchange_type,
            rate,
            usd_amount,
            iqd_amount,
        })
    }
}

/// Strips everything but ASCII digits and the first decimal point.
pub fn sanitize_amount(raw: &str) -> String {
    let mut seen_point = false;
    raw.chars()
        .filter(|c| match c {
            '0'..='9' => true,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            _ => false,
        })
        .collect()
}

/// Computes both amounts after `field` was edited to `raw`.
///
/// The edited field always takes the sanitized text verbatim, so partial input
/// such as `"12."` survives. The other field is derived only when
/// auto-calculation is on and the rate is positive: IQD is rounded to a whole
/// unit, USD is shown with two decimals, and an unparseable edited value clears
/// the derived field.
pub fn on_field_edited(state: &ExchangeFormState, field: AmountField, raw: &str) -> ExchangeAmounts {
    let sanitized = sanitize_amount(raw);
    let mut amounts = state.amounts();

    match field {
        AmountField::Usd => amounts.usd_amount = sanitized.clone(),
        AmountField::Iqd => amounts.iqd_amount = sanitized.clone(),
    }

    if !state.auto_calculate {
        return amounts;
    }
    let Some(rate) = state.valid_rate() else {
        debug!("Skipping auto-calculation, rate '{}' is not positive", state.rate);
        return amounts;
    };

    let value = parse_decimal(&sanitized);
    match field {
        AmountField::Usd => {
            amounts.iqd_amount = value
                .and_then(|usd| usd.checked_mul(rate))
                .map(|iqd| {
                    iqd.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                        .normalize()
                        .to_string()
                })
                .unwrap_or_default();
        }
        AmountField::Iqd => {
            amounts.usd_amount = value
                .and_then(|iqd| iqd.checked_div(rate))
                .map(|usd| {
                    let usd = usd.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                    format!("{usd:.2}")
                })
                .unwrap_or_default();
        }
    }

    debug!(
        "Exchange edit {:?}={:?} at rate {} -> usd={:?} iqd={:?}",
        field, sanitized, rate, amounts.usd_amount, amounts.iqd_amount
    );
    amounts
}
