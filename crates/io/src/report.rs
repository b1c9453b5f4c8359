//! Summary rendering: pretty JSON (the machine contract) and a plain-text
//! report for terminals.

use std::fmt;

use bankrecon_recon::Summary;

/// Pretty-printed JSON, two-space indent, trailing newline.
pub fn to_json(summary: &Summary) -> Result<String, serde_json::Error> {
    let mut s = serde_json::to_string_pretty(summary)?;
    s.push('\n');
    Ok(s)
}

/// Plain-text rendering. Sections with nothing to show are omitted.
pub fn human_summary(summary: &Summary) -> String {
    HumanSummary(summary).to_string()
}

/// `Display` adapter behind [`human_summary`].
pub struct HumanSummary<'a>(pub &'a Summary);

impl fmt::Display for HumanSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        writeln!(f, "Total processed: {}", s.total_processed)?;
        writeln!(f, "Total matched: {}", s.total_matched)?;
        writeln!(f, "Total unmatched: {}", s.total_unmatched)?;
        writeln!(f, "Total amount discrepancy (minor): {}", s.total_amount_discrepancy_minor)?;

        if !s.matched_with_discrepancies.is_empty() {
            writeln!(f, "\nMatched with amount differences:")?;
            for d in &s.matched_with_discrepancies {
                writeln!(
                    f,
                    "- {} (bank={}): system={} bank={} diff={}",
                    d.identifier,
                    d.source_name,
                    d.system_signed_minor,
                    d.external_signed_minor,
                    d.abs_diff_minor
                )?;
            }
        }

        if !s.system_missing_in_bank.is_empty() {
            writeln!(f, "\nSystem missing in bank:")?;
            for m in &s.system_missing_in_bank {
                writeln!(f, "- {} ({}) amountMinor={}", m.identifier, m.direction, m.magnitude_minor)?;
            }
        }

        if !s.bank_missing_in_system.is_empty() {
            writeln!(f, "\nBank missing in system:")?;
            // BTreeMap: banks already ascending
            for (bank, rows) in &s.bank_missing_in_system {
                writeln!(f, "  [{bank}]")?;
                for m in rows {
                    writeln!(f, "  - {} amountMinor={}", m.identifier, m.signed_amount_minor)?;
                }
            }
        }

        if !s.notes.is_empty() {
            writeln!(f, "\nNotes:")?;
            for n in &s.notes {
                writeln!(f, "- {n}")?;
            }
        }
        Ok(())
    }
}

/// One-line digest for stderr after a run.
pub fn one_line(summary: &Summary) -> String {
    let bank_only: usize = summary.bank_missing_in_system.values().map(Vec::len).sum();
    format!(
        "recon: {} processed, {} matched, {} amount differences, {} system-only, {} bank-only",
        summary.total_processed,
        summary.total_matched,
        summary.matched_with_discrepancies.len(),
        summary.system_missing_in_bank.len(),
        bank_only,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankrecon_recon::model::{
        Direction, Discrepancy, MissingFromExternal, MissingFromInternal,
    };
    use std::collections::BTreeMap;

    fn empty() -> Summary {
        Summary {
            total_processed: 0,
            total_matched: 0,
            total_unmatched: 0,
            total_amount_discrepancy_minor: 0,
            system_missing_in_bank: vec![],
            bank_missing_in_system: BTreeMap::new(),
            matched_with_discrepancies: vec![],
            notes: vec![],
        }
    }

    fn busy() -> Summary {
        let mut groups = BTreeMap::new();
        groups.insert(
            "bank_bni".to_string(),
            vec![MissingFromInternal {
                identifier: "N1".into(),
                signed_amount_minor: -700,
                source_name: "bank_bni".into(),
            }],
        );
        groups.insert(
            "bank_bca".to_string(),
            vec![MissingFromInternal {
                identifier: "C1".into(),
                signed_amount_minor: 300,
                source_name: "bank_bca".into(),
            }],
        );
        Summary {
            total_processed: 7,
            total_matched: 2,
            total_unmatched: 3,
            total_amount_discrepancy_minor: 500,
            system_missing_in_bank: vec![MissingFromExternal {
                identifier: "S4".into(),
                magnitude_minor: 4000,
                direction: Direction::Debit,
            }],
            bank_missing_in_system: groups,
            matched_with_discrepancies: vec![Discrepancy {
                identifier: "S3".into(),
                system_signed_minor: 10000,
                external_signed_minor: 9500,
                abs_diff_minor: 500,
                source_name: "bank_bca".into(),
            }],
            notes: vec!["duplicate bank IDs detected: X in banks=[a b]".into()],
        }
    }

    #[test]
    fn text_totals_only() {
        assert_eq!(
            human_summary(&empty()),
            "Total processed: 0\nTotal matched: 0\nTotal unmatched: 0\nTotal amount discrepancy (minor): 0\n"
        );
    }

    #[test]
    fn text_all_sections() {
        let expected = "\
Total processed: 7
Total matched: 2
Total unmatched: 3
Total amount discrepancy (minor): 500

Matched with amount differences:
- S3 (bank=bank_bca): system=10000 bank=9500 diff=500

System missing in bank:
- S4 (DEBIT) amountMinor=4000

Bank missing in system:
  [bank_bca]
  - C1 amountMinor=300
  [bank_bni]
  - N1 amountMinor=-700

Notes:
- duplicate bank IDs detected: X in banks=[a b]
";
        assert_eq!(human_summary(&busy()), expected);
    }

    #[test]
    fn json_empty_collections() {
        let v: serde_json::Value = serde_json::from_str(&to_json(&empty()).unwrap()).unwrap();
        assert_eq!(v["systemMissingInBank"], serde_json::json!([]));
        assert_eq!(v["bankMissingInSystem"], serde_json::json!({}));
        assert_eq!(v["matchedWithDiscrepancies"], serde_json::json!([]));
        assert!(v.get("notes").is_none());
    }

    #[test]
    fn json_is_pretty_with_newline() {
        let s = to_json(&busy()).unwrap();
        assert!(s.starts_with("{\n  \"totalProcessed\": 7,"));
        assert!(s.ends_with("}\n"));
        // groups keyed in ascending order
        assert!(s.find("\"bank_bca\"").unwrap() < s.find("\"bank_bni\"").unwrap());
    }

    #[test]
    fn digest() {
        assert_eq!(
            one_line(&busy()),
            "recon: 7 processed, 2 matched, 1 amount differences, 1 system-only, 2 bank-only"
        );
    }
}
