use crate::index::RecordIndex;
use crate::model::{
    Classification, Discrepancy, ExternalRecord, InternalRecord, MissingFromExternal,
    MissingFromInternal,
};

/// Identity join of the internal index against the external index.
///
/// Returns one classification per distinct identifier: internal identifiers
/// first (ascending), then external-only identifiers (ascending).
pub fn match_by_identifier(
    internal: &RecordIndex<'_, InternalRecord>,
    external: &RecordIndex<'_, ExternalRecord>,
) -> Vec<Classification> {
    let mut results = Vec::with_capacity(internal.len() + external.len());

    for id in internal.sorted_keys() {
        let Some(system) = internal.get(id) else { continue };
        let classification = match external.get(id) {
            Some(bank) => compare_amounts(system, bank),
            None => Classification::MissingFromExternal(MissingFromExternal {
                identifier: id.to_string(),
                magnitude_minor: system.magnitude_minor(),
                direction: system.direction(),
            }),
        };
        results.push(classification);
    }

    for id in external.sorted_keys() {
        if internal.contains(id) {
            continue;
        }
        let Some(bank) = external.get(id) else { continue };
        results.push(Classification::MissingFromInternal(MissingFromInternal {
            identifier: id.to_string(),
            signed_amount_minor: bank.signed_amount_minor(),
            source_name: bank.source_name().to_string(),
        }));
    }

    results
}

/// Exact integer comparison of the canonical internal amount against the
/// bank's signed amount.
fn compare_amounts(system: &InternalRecord, bank: &ExternalRecord) -> Classification {
    let system_signed = system.canonical_minor();
    let bank_signed = bank.signed_amount_minor();
    let abs_diff = system_signed.abs_diff(bank_signed);

    if abs_diff == 0 {
        return Classification::Matched { identifier: system.identifier().to_string() };
    }

    Classification::MatchedWithDiscrepancy(Discrepancy {
        identifier: system.identifier().to_string(),
        system_signed_minor: system_signed,
        external_signed_minor: bank_signed,
        abs_diff_minor: i64::try_from(abs_diff).unwrap_or(i64::MAX),
        source_name: bank.source_name().to_string(),
    })
}
