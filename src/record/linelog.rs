//! Legacy line-oriented log loader.
//!
//! The probe's older plain-text format: `sends:`, `receives:`, `pairs:`
//! and `fits:` section headers, each followed by body lines. Parsing is an
//! explicit state machine; a body line that does not belong to the current
//! section closes it and is re-examined as a section header, and unknown
//! headers resynchronize without error.
//!
//! Body formats: bare integer nanosecond timestamps under `sends` and
//! `receives` (a receive of exactly 0 closes the section — it is the
//! probe's lost-message sentinel), comma-separated `enter[,leave[,delay]]`
//! rows under `pairs`, and `name: [json]` hint lines under `fits`.

use serde_json::Value;

use crate::error::AnalysisError;

use super::{pair_from_row, parse_fit_hint, FitHints, PairRecord, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    ExpectSection,
    InSends,
    InReceives,
    InPairs,
    InFits,
}

#[derive(Debug, Default)]
struct Parser {
    state: State,
    sends: Vec<u64>,
    receives: Vec<u64>,
    pairs: Vec<PairRecord>,
    fits: FitHints,
}

/// Parse a legacy line log into a record.
pub fn parse(content: &str) -> Result<Record, AnalysisError> {
    let mut parser = Parser::default();
    for line in content.lines() {
        parser.feed(&line.trim().to_lowercase())?;
    }
    Record::new(parser.sends, parser.receives, parser.pairs, parser.fits)
}

impl Parser {
    fn feed(&mut self, line: &str) -> Result<(), AnalysisError> {
        let consumed = match self.state {
            State::ExpectSection => {
                self.dispatch(line);
                true
            }
            State::InSends => self.push_send(line),
            State::InReceives => self.push_receive(line),
            State::InPairs => self.push_pair(line)?,
            State::InFits => self.push_fit(line)?,
        };

        if !consumed {
            // Section over; the same line may open the next one.
            self.state = State::ExpectSection;
            self.dispatch(line);
        }
        Ok(())
    }

    /// Transition on a section header; unknown prefixes are a no-op.
    fn dispatch(&mut self, line: &str) {
        self.state = match line.split(':').next().unwrap_or("") {
            "sends" => State::InSends,
            "receives" => State::InReceives,
            "pairs" => State::InPairs,
            "fits" => State::InFits,
            _ => State::ExpectSection,
        };
    }

    fn push_send(&mut self, line: &str) -> bool {
        match line.parse::<u64>() {
            Ok(ts) => {
                self.sends.push(ts);
                true
            }
            Err(_) => false,
        }
    }

    fn push_receive(&mut self, line: &str) -> bool {
        match line.parse::<u64>() {
            Ok(0) => {
                // Lost-message sentinel closes the section.
                self.state = State::ExpectSection;
                true
            }
            Ok(ts) => {
                self.receives.push(ts);
                true
            }
            Err(_) => false,
        }
    }

    fn push_pair(&mut self, line: &str) -> Result<bool, AnalysisError> {
        if !line.contains(',') {
            return Ok(false);
        }

        let mut fields = Vec::with_capacity(3);
        for field in line.split(',').map(str::trim) {
            let value = field.parse::<u64>().map_err(|_| {
                AnalysisError::MalformedRecord(format!(
                    "unparsable pair field {field:?} in line {line:?}"
                ))
            })?;
            fields.push(value);
        }
        self.pairs.push(pair_from_row(&fields)?);
        Ok(true)
    }

    fn push_fit(&mut self, line: &str) -> Result<bool, AnalysisError> {
        let Some((name, rest)) = line.split_once(':') else {
            return Ok(false);
        };
        let hints = match name.trim() {
            "sends" => &mut self.fits.sends,
            "receives" => &mut self.fits.receives,
            _ => return Ok(false),
        };

        let value: Value = serde_json::from_str(&format!("[{}]", rest.trim())).map_err(|err| {
            AnalysisError::MalformedRecord(format!("invalid fit line {line:?}: {err}"))
        })?;
        hints.push(parse_fit_hint(&value)?);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sectioned_log() {
        let record = parse(
            "sends:\n100\n200\n300\n\
             receives:\n150\n250\n\
             pairs:\n100, 140, 40\n200, 260\n\
             fits:\nsends: [0, 200], [0.0, 1.0]\n",
        )
        .unwrap();

        assert_eq!(record.sends, vec![100, 200, 300]);
        assert_eq!(record.receives, vec![150, 250]);
        assert_eq!(record.pairs.len(), 2);
        assert_eq!(record.pairs[0].delay_ns, Some(40));
        assert_eq!(record.pairs[1].delay_ns, None);
        assert_eq!(record.fits.sends.len(), 1);
        assert!(record.fits.sends[0].window.is_some());
        assert!(record.fits.sends[0].seed.is_some());
    }

    #[test]
    fn test_section_header_right_after_data_is_not_lost() {
        // No separator line between sections.
        let record = parse("sends:\n100\nreceives:\n150\n").unwrap();
        assert_eq!(record.sends, vec![100]);
        assert_eq!(record.receives, vec![150]);
    }

    #[test]
    fn test_zero_receive_closes_the_section() {
        let record = parse("receives:\n150\n0\n250\n").unwrap();
        // The 250 after the sentinel is outside any section.
        assert_eq!(record.receives, vec![150]);
    }

    #[test]
    fn test_backwards_sends_fail_with_indices_and_values() {
        let err = parse("sends:\n100\n90\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "message 2 has been sent earlier than message 1 (90 < 100)"
        );
    }

    #[test]
    fn test_unknown_section_is_skipped() {
        let record = parse("bogus:\n42\nsends:\n100\n").unwrap();
        assert_eq!(record.sends, vec![100]);
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let record = parse("SENDS:\n100\n").unwrap();
        assert_eq!(record.sends, vec![100]);
    }

    #[test]
    fn test_unparsable_pair_field_is_malformed() {
        let err = parse("pairs:\n100, oops\n").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord(_)));
    }

    #[test]
    fn test_empty_fit_hint() {
        let record = parse("fits:\nsends:\n").unwrap();
        assert_eq!(record.fits.sends.len(), 1);
        assert!(record.fits.sends[0].is_default());
    }

    #[test]
    fn test_unknown_fit_name_resyncs() {
        // `pairs:` inside the fits section reopens the pairs section.
        let record = parse("fits:\nsends: [0, 10]\npairs:\n1, 2\n").unwrap();
        assert_eq!(record.fits.sends.len(), 1);
        assert_eq!(record.pairs.len(), 1);
    }
}
