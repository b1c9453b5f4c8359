use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate};

use bankrecon_recon::model::{Direction, ExternalBatch, ExternalRecord, InternalRecord};
use bankrecon_recon::{money, reconcile, Summary};

fn sys(id: &str, amount: &str, direction: &str) -> InternalRecord {
    let ts = DateTime::parse_from_rfc3339("2024-02-10T09:30:00+07:00").unwrap();
    InternalRecord::new(
        id,
        money::normalize(amount).unwrap(),
        direction.parse::<Direction>().unwrap(),
        ts,
    )
    .unwrap()
}

fn batch(name: &str, rows: &[(&str, &str)]) -> ExternalBatch {
    let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
    let mut b = ExternalBatch::new(name);
    for (id, amount) in rows {
        b.push(*id, money::normalize(amount).unwrap(), date).unwrap();
    }
    b
}

fn february() -> (Vec<InternalRecord>, Vec<ExternalBatch>) {
    let system = vec![
        sys("S1", "150.00", "CREDIT"),
        sys("S2", "75.25", "DEBIT"),
        sys("S3", "500.00", "DEBIT"),
        sys("S4", "12.00", "CREDIT"),
        sys("S5", "1,000.00", "credit"),
        sys("S6", "20", "debit"),
    ];
    let banks = vec![
        batch(
            "bank_bca",
            &[
                ("S1", "150.00"),
                ("S3", "-495.00"),
                ("BCA_ONLY1", "33.10"),
                ("DUP-100", "10.00"),
                ("S5", "1000"),
                ("DUP-100", "10.00"),
            ],
        ),
        batch("bank_bni", &[("S2", "-75.25"), ("S6", "-20.00"), ("BNI_ONLY1", "-4.50")]),
    ];
    (system, banks)
}

// -------------------------------------------------------------------------
// Scenarios
// -------------------------------------------------------------------------

#[test]
fn full_scenario() {
    let (system, banks) = february();
    let s = reconcile(&system, &banks);

    assert_eq!(s.total_processed, 15);
    assert_eq!(s.total_matched, 5);
    assert_eq!(s.system_missing_in_bank.len(), 1);
    assert_eq!(s.system_missing_in_bank[0].identifier, "S4");
    assert_eq!(s.bank_missing_in_system["bank_bca"].len(), 2);
    assert_eq!(s.bank_missing_in_system["bank_bca"][0].identifier, "BCA_ONLY1");
    assert_eq!(s.bank_missing_in_system["bank_bca"][1].identifier, "DUP-100");
    assert_eq!(s.bank_missing_in_system["bank_bni"].len(), 1);
    assert_eq!(s.total_unmatched, 4);
    assert_eq!(s.total_amount_discrepancy_minor, 500);
    assert_eq!(s.matched_with_discrepancies.len(), 1);
    assert_eq!(s.matched_with_discrepancies[0].identifier, "S3");
    assert_eq!(s.notes.len(), 1);
    assert!(s.notes[0].contains("DUP-100"));
}

#[test]
fn same_id_matched_and_bank_only_grouped() {
    let system = vec![sys("SAME-1", "100.00", "CREDIT")];
    let banks = vec![batch("bank_a", &[("SAME-1", "100.00"), ("ONLY-A", "123.45")])];
    let s = reconcile(&system, &banks);

    assert_eq!(s.total_matched, 1);
    assert_eq!(s.total_amount_discrepancy_minor, 0);
    assert!(s.system_missing_in_bank.is_empty());
    let only_a = &s.bank_missing_in_system["bank_a"];
    assert_eq!(only_a.len(), 1);
    assert_eq!(only_a[0].identifier, "ONLY-A");
    assert_eq!(only_a[0].signed_amount_minor, 12345);
}

#[test]
fn debit_with_drift() {
    let system = vec![sys("S3", "500.00", "DEBIT")];
    let banks = vec![batch("bank_bca", &[("S3", "-495.00")])];
    let s = reconcile(&system, &banks);
    assert_eq!(s.matched_with_discrepancies[0].abs_diff_minor, 500);
    assert_eq!(s.matched_with_discrepancies[0].system_signed_minor, -50000);
    assert_eq!(s.matched_with_discrepancies[0].external_signed_minor, -49500);
}

#[test]
fn duplicate_across_feeds() {
    let system = vec![sys("X", "1.00", "CREDIT")];
    let banks = vec![batch("bank_a", &[("X", "1.00")]), batch("bank_b", &[("X", "9.99")])];
    let s = reconcile(&system, &banks);

    assert_eq!(s.total_processed, 3);
    assert_eq!(s.total_matched, 1);
    assert!(s.matched_with_discrepancies.is_empty());
    let note = &s.notes[0];
    assert!(note.contains('X'));
    assert!(note.contains("bank_a"));
    assert!(note.contains("bank_b"));
}

// -------------------------------------------------------------------------
// Determinism and completeness
// -------------------------------------------------------------------------

#[test]
fn repeated_runs_are_byte_identical() {
    let (system, banks) = february();
    let first = serde_json::to_string_pretty(&reconcile(&system, &banks)).unwrap();
    for _ in 0..5 {
        let again = serde_json::to_string_pretty(&reconcile(&system, &banks)).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn input_order_only_affects_duplicate_winner() {
    let (mut system, banks) = february();
    let forward = reconcile(&system, &banks);
    system.reverse();
    let reversed = reconcile(&system, &banks);
    assert_eq!(forward, reversed);
}

#[test]
fn every_identifier_classified_once() {
    let (system, banks) = february();
    let s: Summary = reconcile(&system, &banks);

    let mut distinct: BTreeSet<&str> = system.iter().map(|r| r.identifier()).collect();
    for b in &banks {
        distinct.extend(b.records().iter().map(|r| r.identifier()));
    }
    assert_eq!(s.total_matched + s.total_unmatched, distinct.len());
}

#[test]
fn json_contract_field_names() {
    let (system, banks) = february();
    let v = serde_json::to_value(reconcile(&system, &banks)).unwrap();

    for key in [
        "totalProcessed",
        "totalMatched",
        "totalUnmatched",
        "totalAmountDiscrepancyMinor",
        "systemMissingInBank",
        "bankMissingInSystem",
        "matchedWithDiscrepancies",
        "notes",
    ] {
        assert!(v.get(key).is_some(), "missing {key}");
    }
    let missing = &v["systemMissingInBank"][0];
    assert_eq!(missing["trxID"], "S4");
    assert_eq!(missing["amountMinor"], 1200);
    assert_eq!(missing["type"], "CREDIT");
    let bank_only = &v["bankMissingInSystem"]["bank_bni"][0];
    assert_eq!(bank_only["unique_identifier"], "BNI_ONLY1");
    assert_eq!(bank_only["amountMinor"], -450);
    assert_eq!(bank_only["bank"], "bank_bni");
    let d = &v["matchedWithDiscrepancies"][0];
    assert_eq!(d["id"], "S3");
    assert_eq!(d["systemAmountMinor"], -50000);
    assert_eq!(d["bankAmountMinor"], -49500);
    assert_eq!(d["absDiffMinor"], 500);
    assert_eq!(d["bank"], "bank_bca");
}

#[test]
fn notes_omitted_when_empty() {
    let system = vec![sys("A", "1.00", "CREDIT")];
    let banks = vec![batch("bank_a", &[("A", "1.00")])];
    let v = serde_json::to_value(reconcile(&system, &banks)).unwrap();
    assert!(v.get("notes").is_none());
    assert_eq!(v["systemMissingInBank"], serde_json::json!([]));
    assert_eq!(v["bankMissingInSystem"], serde_json::json!({}));
}

#[test]
fn bank_groups_follow_batch_name() {
    let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
    let mut b = ExternalBatch::new("bank_a");
    assert!(b.push_record(ExternalRecord::new("ONLY", 5, date, "bank_z").unwrap()).is_err());
    b.push("ONLY", 5, date).unwrap();

    let s = reconcile(&[], &[b]);
    let groups: Vec<&str> = s.bank_missing_in_system.keys().map(String::as_str).collect();
    assert_eq!(groups, ["bank_a"]);
    assert_eq!(s.bank_missing_in_system["bank_a"][0].source_name, "bank_a");
}
