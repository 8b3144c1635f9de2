//! JSON record loader.
//!
//! Wire shape:
//! `{"sends": [ns...], "receives": [ns...], "pairs": [[enter, leave?,
//! delay?], ...], "fits": {"sends": [[[left, right], [seed...]], ...],
//! "receives": [...]}}` — every key optional, absent meaning empty.

use serde::Deserialize;
use serde_json::Value;

use crate::error::AnalysisError;

use super::{pair_from_row, parse_fit_hint, FitHint, FitHints, Record};

#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    #[serde(default)]
    sends: Vec<u64>,
    #[serde(default)]
    receives: Vec<u64>,
    #[serde(default)]
    pairs: Vec<Vec<u64>>,
    #[serde(default)]
    fits: RawFits,
}

#[derive(Debug, Default, Deserialize)]
struct RawFits {
    #[serde(default)]
    sends: Vec<Value>,
    #[serde(default)]
    receives: Vec<Value>,
}

/// Parse a JSON benchmark record.
pub fn parse(content: &str) -> Result<Record, AnalysisError> {
    let raw: RawRecord = serde_json::from_str(content)
        .map_err(|err| AnalysisError::MalformedRecord(format!("invalid JSON record: {err}")))?;

    let pairs = raw
        .pairs
        .iter()
        .filter(|row| !row.is_empty())
        .map(|row| pair_from_row(row))
        .collect::<Result<Vec<_>, _>>()?;

    let fits = FitHints {
        sends: parse_hints(&raw.fits.sends)?,
        receives: parse_hints(&raw.fits.receives)?,
    };

    Record::new(raw.sends, raw.receives, pairs, fits)
}

fn parse_hints(values: &[Value]) -> Result<Vec<FitHint>, AnalysisError> {
    values.iter().map(parse_fit_hint).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PairRecord;

    #[test]
    fn test_parse_full_record() {
        let record = parse(
            r#"{
                "sends": [100, 200, 300],
                "receives": [150, 0, 350],
                "pairs": [[100, 140, 40], [200, 260]],
                "fits": {"sends": [[]], "receives": [[[0, 200], [0.0, 1.0]]]}
            }"#,
        )
        .unwrap();

        assert_eq!(record.sends, vec![100, 200, 300]);
        assert_eq!(record.receives, vec![150, 350]);
        assert_eq!(
            record.pairs,
            vec![
                PairRecord {
                    enter_ns: 100,
                    leave_ns: Some(140),
                    delay_ns: Some(40)
                },
                PairRecord {
                    enter_ns: 200,
                    leave_ns: Some(260),
                    delay_ns: None
                },
            ]
        );
        assert_eq!(record.fits.sends.len(), 1);
        assert!(record.fits.sends[0].is_default());
        assert_eq!(record.fits.receives.len(), 1);
        assert!(record.fits.receives[0].window.is_some());
    }

    #[test]
    fn test_all_keys_optional() {
        let record = parse("{}").unwrap();
        assert!(record.sends.is_empty());
        assert!(record.receives.is_empty());
        assert!(record.pairs.is_empty());
        assert!(record.fits.sends.is_empty());
        assert!(record.fits.receives.is_empty());
    }

    #[test]
    fn test_empty_pair_rows_are_dropped() {
        let record = parse(r#"{"pairs": [[], [10]]}"#).unwrap();
        assert_eq!(record.pairs.len(), 1);
    }

    #[test]
    fn test_oversized_pair_row_is_malformed() {
        let err = parse(r#"{"pairs": [[1, 2, 3, 4]]}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord(_)));
    }

    #[test]
    fn test_backwards_sends_fail_validation() {
        let err = parse(r#"{"sends": [100, 90]}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation { .. }));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord(_)));
    }
}
