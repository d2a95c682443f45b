//! Aggregation of partner balances by safe-type.
use crate::core::currency::{Currency, CurrencyTotals};
use crate::core::partner::PartnerSafeRecord;
use std::collections::BTreeMap;
use tracing::debug;

/// Summed balances of every partner safe sharing one safe-type name.
pub type SafeTypeTotal = CurrencyTotals;

/// Groups partner safes by safe-type name and sums their USD, IQD and USDT totals.
///
/// Only safe-types that appear in `records` get an entry. Sums are exact
/// decimal additions, negative balances included, and the result does not
/// depend on the order of `records`. Keys are sorted by name.
pub fn aggregate_by_safe_type(records: &[PartnerSafeRecord]) -> BTreeMap<String, SafeTypeTotal> {
    let mut totals: BTreeMap<String, SafeTypeTotal> = BTreeMap::new();

    for record in records {
        let entry = totals.entry(record.safe_type_name.clone()).or_default();
        for currency in Currency::ALL {
            entry.add(currency, record.total(currency));
        }
    }

    debug!(
        "Aggregated {} partner safes into {} safe-types",
        records.len(),
        totals.len()
    );
    totals
}

/// Sums the per-safe-type totals into one office-wide balance.
pub fn grand_total(totals: &BTreeMap<String, SafeTypeTotal>) -> CurrencyTotals {
    totals
        .values()
        .fold(CurrencyTotals::default(), |mut acc, total| {
            acc.merge(total);
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::partner::SafeTypeKind;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn record(id: &str, safe_type: &str, usd: &str, iqd: &str, usdt: &str) -> PartnerSafeRecord {
        PartnerSafeRecord {
            id: id.to_string(),
            partner_name: format!("Partner {id}"),
            partner_phone: None,
            safe_type_name: safe_type.to_string(),
            safe_type_kind: SafeTypeKind::Physical,
            total_usd: dec(usd),
            total_iqd: dec(iqd),
            total_usdt: dec(usdt),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        assert!(aggregate_by_safe_type(&[]).is_empty());
    }

    #[test]
    fn test_groups_by_safe_type_name() {
        let records = vec![
            record("1", "Main Cash", "100.10", "150000", "0"),
            record("2", "Binance", "0", "0", "250.5"),
            record("3", "Main Cash", "0.20", "50000", "10"),
        ];

        let totals = aggregate_by_safe_type(&records);

        assert_eq!(
            totals.keys().cloned().collect::<Vec<_>>(),
            vec!["Binance".to_string(), "Main Cash".to_string()]
        );
        assert_eq!(totals["Main Cash"].usd, dec("100.30"));
        assert_eq!(totals["Main Cash"].iqd, dec("200000"));
        assert_eq!(totals["Main Cash"].usdt, dec("10"));
        assert_eq!(totals["Binance"].usdt, dec("250.5"));
        assert_eq!(totals["Binance"].usd, Decimal::ZERO);
    }

    #[test]
    fn test_negative_balances_are_preserved() {
        let records = vec![
            record("1", "Debts", "-50", "0", "0"),
            record("2", "Debts", "20", "-1000", "0"),
        ];

        let totals = aggregate_by_safe_type(&records);

        assert_eq!(totals["Debts"].usd, dec("-30"));
        assert_eq!(totals["Debts"].iqd, dec("-1000"));
    }

    #[test]
    fn test_order_independent_and_repeatable() {
        let mut records = vec![
            record("1", "A", "1.1", "10", "0.01"),
            record("2", "B", "2.2", "20", "0.02"),
            record("3", "A", "3.3", "30", "0.03"),
        ];

        let first = aggregate_by_safe_type(&records);
        let again = aggregate_by_safe_type(&records);
        records.reverse();
        let reversed = aggregate_by_safe_type(&records);

        assert_eq!(first, again);
        assert_eq!(first, reversed);
        // No binary float drift: 1.1 + 3.3 is exactly 4.4.
        assert_eq!(first["A"].usd, dec("4.4"));
    }

    #[test]
    fn test_grand_total() {
        let records = vec![
            record("1", "A", "10", "1000", "1"),
            record("2", "B", "-4", "500", "2"),
        ];

        let total = grand_total(&aggregate_by_safe_type(&records));

        assert_eq!(total.usd, dec("6"));
        assert_eq!(total.iqd, dec("1500"));
        assert_eq!(total.usdt, dec("3"));
    }
}
