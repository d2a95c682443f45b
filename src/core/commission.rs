//! Daily and monthly commission (bonus) totals for the dashboard.
use crate::core::currency::{Currency, CurrencyTotals, lenient_decimal};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// A bonus exactly as the backend serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommission {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommissionRecord {
    pub amount: Decimal,
    pub currency: Currency,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommissionSummary {
    pub date: NaiveDate,
    pub daily: CurrencyTotals,
    pub monthly: CurrencyTotals,
}

fn parse_record_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Converts raw bonuses into typed records.
///
/// Bonuses without a recognizable currency or date cannot be bucketed and are
/// skipped. Amounts follow the usual lenient coercion.
pub fn normalize_commissions(raw: Vec<RawCommission>) -> Vec<CommissionRecord> {
    raw.into_iter()
        .filter_map(|bonus| {
            let currency = match bonus.currency.as_deref().map(str::parse::<Currency>) {
                Some(Ok(currency)) => currency,
                _ => {
                    debug!("Skipping bonus with unknown currency: {:?}", bonus.currency);
                    return None;
                }
            };
            let Some(date) = bonus.created_at.as_deref().and_then(parse_record_date) else {
                debug!("Skipping bonus with unparseable date: {:?}", bonus.created_at);
                return None;
            };
            Some(CommissionRecord {
                amount: lenient_decimal(bonus.amount.as_ref()),
                currency,
                date,
            })
        })
        .collect()
}

/// Totals the commissions earned on `today` and in the calendar month of `today`.
pub fn summarize_commissions(records: &[CommissionRecord], today: NaiveDate) -> CommissionSummary {
    let mut summary = CommissionSummary {
        date: today,
        ..Default::default()
    };

    for record in records {
        if record.date.year() != today.year() || record.date.month() != today.month() {
            continue;
        }
        summary.monthly.add(record.currency, record.amount);
        if record.date == today {
            summary.daily.add(record.currency, record.amount);
        }
    }

    debug!(
        "Commission summary for {}: daily={:?} monthly={:?}",
        today, summary.daily, summary.monthly
    );
    summary
}
