//! Archive object encoding: one CSV object per (date, account), header plus
//! one row per advisory check.

use crate::types::CheckResult;
use anyhow::{Context, Result};

/// Encode a full set of rows into CSV bytes. The column order comes from
/// the `CheckResult` field order; an absent savings estimate encodes as an
/// empty field, which stays distinct from `0`.
pub fn encode(rows: &[CheckResult]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .context("failed to encode check result row")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::Error::from(e.into_error()))
        .context("failed to flush csv writer")
}

/// Decode an archive object back into rows.
pub fn decode(content: &[u8]) -> Result<Vec<CheckResult>> {
    let mut reader = csv::Reader::from_reader(content);
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record.context("failed to decode check result row")?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CheckStatus;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn row(
        check_id: &str,
        status: CheckStatus,
        savings: Option<Decimal>,
    ) -> CheckResult {
        CheckResult {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            account_id: "111111111111".to_string(),
            status,
            check_id: check_id.to_string(),
            check_name: "Idle Instances".to_string(),
            estimated_monthly_savings: savings,
            account_name: "acme-prod".to_string(),
            category: "cost_optimizing".to_string(),
        }
    }

    #[test]
    fn test_header_and_column_order() {
        let content = encode(&[row("c1", CheckStatus::Ok, None)]).unwrap();
        let text = String::from_utf8(content).unwrap();

        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "date,account_id,status,check_id,check_name,estimated_monthly_savings,account_name,category"
        );
    }

    #[test]
    fn test_status_spelling() {
        let content = encode(&[
            row("c1", CheckStatus::Ok, None),
            row("c2", CheckStatus::Warning, None),
            row("c3", CheckStatus::Error, None),
            row("c4", CheckStatus::NotAvailable, None),
        ])
        .unwrap();
        let text = String::from_utf8(content).unwrap();

        let statuses: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|line| line.split(',').nth(2).unwrap())
            .collect();
        assert_eq!(statuses, ["ok", "warning", "error", "not_available"]);
    }

    #[test]
    fn test_round_trip_preserves_rows() {
        let rows = vec![
            row("c1", CheckStatus::Warning, Some(Decimal::new(2050, 2))),
            row("c2", CheckStatus::Ok, None),
            row("c3", CheckStatus::NotAvailable, None),
        ];

        let content = encode(&rows).unwrap();
        let decoded = decode(&content).unwrap();

        assert_eq!(decoded, rows);
    }

    #[test]
    fn test_no_estimate_is_distinct_from_zero() {
        let rows = vec![
            row("c1", CheckStatus::Ok, None),
            row("c2", CheckStatus::Ok, Some(Decimal::ZERO)),
        ];

        let content = encode(&rows).unwrap();
        let decoded = decode(&content).unwrap();

        assert_eq!(decoded[0].estimated_monthly_savings, None);
        assert_eq!(decoded[1].estimated_monthly_savings, Some(Decimal::ZERO));
        assert_ne!(
            decoded[0].estimated_monthly_savings,
            decoded[1].estimated_monthly_savings
        );
    }

    #[test]
    fn test_decimal_precision_survives_round_trip() {
        // 20.50 must not collapse to 20.5 or pick up float artifacts
        let rows = vec![row("c1", CheckStatus::Warning, Some(Decimal::new(2050, 2)))];

        let content = encode(&rows).unwrap();
        let text = String::from_utf8(content.clone()).unwrap();
        assert!(text.contains("20.50"));

        let decoded = decode(&content).unwrap();
        assert_eq!(
            decoded[0].estimated_monthly_savings,
            Some(Decimal::new(2050, 2))
        );
    }

    #[test]
    fn test_empty_row_set_round_trips() {
        let content = encode(&[]).unwrap();
        let decoded = decode(&content).unwrap();
        assert!(decoded.is_empty());
    }
}
