//! Currencies handled by the office and decimal helpers shared by the calculators.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "usd", alias = "USD")]
    Usd,
    #[serde(rename = "iqd", alias = "IQD")]
    Iqd,
    #[serde(rename = "usdt", alias = "USDT")]
    Usdt,
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Currency::Usd => "USD",
                Currency::Iqd => "IQD",
                Currency::Usdt => "USDT",
            }
        )
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "IQD" => Ok(Currency::Iqd),
            "USDT" => Ok(Currency::Usdt),
            _ => Err(anyhow::anyhow!("Invalid currency: {}", s)),
        }
    }
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Iqd, Currency::Usdt];

    /// Number of decimal places shown for amounts in this currency.
    ///
    /// IQD has no subunit in practice, so it is always displayed as a whole number.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::Iqd => 0,
            Currency::Usd | Currency::Usdt => 2,
        }
    }
}

/// Running balances in the three currencies the office deals in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CurrencyTotals {
    pub usd: Decimal,
    pub iqd: Decimal,
    pub usdt: Decimal,
}

impl CurrencyTotals {
    pub fn get(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Usd => self.usd,
            Currency::Iqd => self.iqd,
            Currency::Usdt => self.usdt,
        }
    }

    /// Adds `amount` to the balance of `currency`.
    ///
    /// An addition that would overflow `Decimal` leaves the balance unchanged.
    pub fn add(&mut self, currency: Currency, amount: Decimal) {
        let slot = match currency {
            Currency::Usd => &mut self.usd,
            Currency::Iqd => &mut self.iqd,
            Currency::Usdt => &mut self.usdt,
        };
        match slot.checked_add(amount) {
            Some(sum) => *slot = sum,
            None => warn!("Overflow adding {amount} {currency} to {slot}, amount ignored"),
        }
    }

    pub fn merge(&mut self, other: &CurrencyTotals) {
        for currency in Currency::ALL {
            self.add(currency, other.get(currency));
        }
    }
}

/// Parses decimal text the way a permissive numeric input does.
///
/// Accepts an optional sign, `"12."` and `".5"`. Returns `None` for empty
/// text, a lone `"."`, any other character, or values out of `Decimal` range.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };

    if body.is_empty() || body == "." {
        return None;
    }
    if !body.chars().all(|c| c.is_ascii_digit() || c == '.') || body.matches('.').count() > 1 {
        return None;
    }

    let body = body.strip_suffix('.').unwrap_or(body);
    let normalized = if body.starts_with('.') {
        format!("{sign}0{body}")
    } else {
        format!("{sign}{body}")
    };
    Decimal::from_str(&normalized).ok()
}

/// Coerces a loosely typed JSON amount into a decimal.
///
/// Numbers and numeric strings are converted; `null`, missing values and
/// anything unparseable count as zero.
pub fn lenient_decimal(value: Option<&Value>) -> Decimal {
    let parsed = match value {
        Some(Value::Number(n)) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Some(Value::String(s)) => parse_decimal(s),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        if value.is_some_and(|v| !v.is_null()) {
            debug!("Unparseable amount {:?}, treating as zero", value);
        }
        Decimal::ZERO
    })
}
