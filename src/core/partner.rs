//! Partner safe records as fetched from the backend, and their normalized form.

use crate::core::currency::{Currency, lenient_decimal};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SafeTypeKind {
    Crypto,
    Physical,
}

impl From<&str> for SafeTypeKind {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "crypto" => SafeTypeKind::Crypto,
            _ => SafeTypeKind::Physical,
        }
    }
}

/// A partner's holdings within one safe-type.
///
/// Totals are running balances maintained by the backend and may be negative
/// when the office owes the partner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerSafeRecord {
    pub id: String,
    pub partner_name: String,
    pub partner_phone: Option<String>,
    pub safe_type_name: String,
    pub safe_type_kind: SafeTypeKind,
    pub total_usd: Decimal,
    pub total_iqd: Decimal,
    pub total_usdt: Decimal,
}

impl PartnerSafeRecord {
    pub fn total(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Usd => self.total_usd,
            Currency::Iqd => self.total_iqd,
            Currency::Usdt => self.total_usdt,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPartner {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSafeType {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Reads a nested object, falling back to its default when the backend sends
/// `null`, a bare foreign key or anything else that is not the expected shape.
fn object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        debug!("Unexpected nested object in partner safe: {e}");
        T::default()
    }))
}

/// A partner safe exactly as the backend serves it.
///
/// Amounts arrive as numbers, strings or `null` depending on the endpoint, so
/// they are kept as raw JSON until normalization. Every field is optional so
/// one damaged record cannot fail the whole list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPartnerSafe {
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "object_or_default")]
    pub partner: RawPartner,
    #[serde(default, deserialize_with = "object_or_default")]
    pub safe_type: RawSafeType,
    #[serde(default)]
    pub total_usd: Option<Value>,
    #[serde(default)]
    pub total_iqd: Option<Value>,
    #[serde(default)]
    pub total_usdt: Option<Value>,
}

impl From<RawPartnerSafe> for PartnerSafeRecord {
    fn from(raw: RawPartnerSafe) -> Self {
        let id = match raw.id {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        let partner_phone = raw
            .partner
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        let safe_type_kind = raw
            .safe_type
            .kind
            .as_deref()
            .map_or(SafeTypeKind::Physical, SafeTypeKind::from);

        PartnerSafeRecord {
            id,
            partner_name: raw.partner.name.unwrap_or_default(),
            partner_phone,
            safe_type_name: raw.safe_type.name.unwrap_or_default(),
            safe_type_kind,
            total_usd: lenient_decimal(raw.total_usd.as_ref()),
            total_iqd: lenient_decimal(raw.total_iqd.as_ref()),
            total_usdt: lenient_decimal(raw.total_usdt.as_ref()),
        }
    }
}

/// Shapes raw backend records into typed partner safes.
pub fn normalize_partner_safes(raw: Vec<RawPartnerSafe>) -> Vec<PartnerSafeRecord> {
    debug!("Normalizing {} partner safe records", raw.len());
    raw.into_iter().map(PartnerSafeRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_type_kind_from_str() {
        assert_eq!(SafeTypeKind::from("crypto"), SafeTypeKind::Crypto);
        assert_eq!(SafeTypeKind::from("CRYPTO "), SafeTypeKind::Crypto);
        assert_eq!(SafeTypeKind::from("physical"), SafeTypeKind::Physical);
        assert_eq!(SafeTypeKind::from("cash box"), SafeTypeKind::Physical);
    }

    #[test]
    fn test_normalize_full_record() {
        let raw: Vec<RawPartnerSafe> = serde_json::from_value(json!([
            {
                "id": 7,
                "partner": {"name": "Al-Rafidain Office", "phone": "0770 000 0000"},
                "safe_type": {"name": "Binance", "type": "crypto"},
                "total_usd": "1500.50",
                "total_iqd": 2000000,
                "total_usdt": -50
            }
        ]))
        .unwrap();

        let records = normalize_partner_safes(raw);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "7");
        assert_eq!(record.partner_name, "Al-Rafidain Office");
        assert_eq!(record.partner_phone.as_deref(), Some("0770 000 0000"));
        assert_eq!(record.safe_type_name, "Binance");
        assert_eq!(record.safe_type_kind, SafeTypeKind::Crypto);
        assert_eq!(record.total_usd, "1500.50".parse::<Decimal>().unwrap());
        assert_eq!(record.total_iqd, Decimal::from(2_000_000));
        assert_eq!(record.total(Currency::Usdt), Decimal::from(-50));
    }

    #[test]
    fn test_normalize_null_nested_objects() {
        let raw: Vec<RawPartnerSafe> = serde_json::from_value(json!([
            {
                "id": 1,
                "partner": {"name": "Office A"},
                "safe_type": {"name": "Main Cash"},
                "total_usd": 10
            },
            {"id": 2, "partner": null, "safe_type": {"name": "Main Cash"}, "total_usd": 5},
            {"id": 3, "partner": {"name": "Office C"}, "safe_type": null, "total_iqd": 1000},
            {"partner": 42, "safe_type": "Binance", "total_usdt": "7"}
        ]))
        .unwrap();

        let records = normalize_partner_safes(raw);

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].partner_name, "Office A");
        assert_eq!(records[1].partner_name, "");
        assert_eq!(records[1].safe_type_name, "Main Cash");
        assert_eq!(records[1].total_usd, Decimal::from(5));
        assert_eq!(records[2].partner_name, "Office C");
        assert_eq!(records[2].safe_type_name, "");
        assert_eq!(records[2].safe_type_kind, SafeTypeKind::Physical);
        assert_eq!(records[3].id, "");
        assert_eq!(records[3].partner_name, "");
        assert_eq!(records[3].safe_type_name, "");
        assert_eq!(records[3].total_usdt, Decimal::from(7));
    }

    #[test]
    fn test_normalize_degrades_missing_fields() {
        let raw: Vec<RawPartnerSafe> = serde_json::from_value(json!([
            {
                "id": "abc-1",
                "partner": {"name": "Walk-in", "phone": "  "},
                "safe_type": {"name": "Main Cash"},
                "total_usd": null,
                "total_iqd": "n/a"
            }
        ]))
        .unwrap();

        let record = &normalize_partner_safes(raw)[0];

        assert_eq!(record.id, "abc-1");
        assert_eq!(record.partner_phone, None);
        assert_eq!(record.safe_type_kind, SafeTypeKind::Physical);
        assert_eq!(record.total_usd, Decimal::ZERO);
        assert_eq!(record.total_iqd, Decimal::ZERO);
        assert_eq!(record.total_usdt, Decimal::ZERO);
    }
}
