//! Key/value record parsing for snapshot files.
//!
//! Every structured snapshot file is a sequence of `key=value` lines where
//! the key is letters and spaces and the value is a run of digits in one of
//! two shapes (decimal or hexadecimal). A line that does not fit that shape
//! is a structural failure and aborts the run; a well-shaped line whose key
//! is not recognized for the file kind is only a warning and is skipped.

use std::path::Path;

/// Character class expected for a file's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Decimal,
    Hex,
}

impl ValueShape {
    fn matches(self, c: char) -> bool {
        match self {
            ValueShape::Decimal => c.is_ascii_digit(),
            ValueShape::Hex => c.is_ascii_hexdigit(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ValueShape::Decimal => "decimal",
            ValueShape::Hex => "hexadecimal",
        }
    }
}

/// Declarative per-file-kind schema: the recognized keys and the value
/// shape every line in the file must use.
pub struct FileSchema {
    pub keys: &'static [&'static str],
    pub shape: ValueShape,
}

/// One parsed `key=value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub value: String,
}

/// Split a line into `(key, value)` if it has the expected shape.
///
/// The key must be non-empty letters and spaces; the value must be a
/// non-empty run of characters in `shape`. Returns None otherwise.
fn split_pair(line: &str, shape: ValueShape) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;

    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        return None;
    }

    if value.is_empty() || !value.chars().all(|c| shape.matches(c)) {
        return None;
    }

    Some((key, value))
}

/// Parse all records of a file's text against a schema.
///
/// Blank lines are tolerated. A malformed line is fatal; an unrecognized
/// key is logged to stderr and skipped.
pub fn parse_records(
    text: &str,
    schema: &FileSchema,
    source: &Path,
) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let mut records = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = split_pair(line, schema.shape) else {
            return Err(format!(
                "{}: malformed line {:?}: expected '<key>=<{} value>'",
                source.display(),
                line,
                schema.shape.describe()
            )
            .into());
        };

        if !schema.keys.contains(&key) {
            eprintln!("warning: unknown key '{}' when parsing {}", key, source.display());
            continue;
        }

        records.push(Record {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SUITE: FileSchema = FileSchema {
        keys: &["Passed", "Failed", "Executed", "Total", "Skipped"],
        shape: ValueShape::Decimal,
    };

    const GENERAL: FileSchema = FileSchema {
        keys: &["hash"],
        shape: ValueShape::Hex,
    };

    fn src() -> PathBuf {
        PathBuf::from("unit_tests_100")
    }

    #[test]
    fn parses_recognized_decimal_records() {
        let text = "Passed=10\nFailed=2\nSkipped=0\n";
        let records = parse_records(text, &SUITE, &src()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], Record { key: "Passed".into(), value: "10".into() });
        assert_eq!(records[2], Record { key: "Skipped".into(), value: "0".into() });
    }

    #[test]
    fn keys_may_contain_spaces() {
        let schema = FileSchema {
            keys: &["Tested lines"],
            shape: ValueShape::Decimal,
        };
        let records = parse_records("Tested lines=512\n", &schema, &src()).unwrap();
        assert_eq!(records[0].key, "Tested lines");
        assert_eq!(records[0].value, "512");
    }

    #[test]
    fn hex_values_accepted_for_hex_shape() {
        let records = parse_records("hash=deadBEEF01\n", &GENERAL, &src()).unwrap();
        assert_eq!(records[0].value, "deadBEEF01");
    }

    #[test]
    fn hex_value_rejected_for_decimal_shape() {
        let err = parse_records("Passed=1f\n", &SUITE, &src()).unwrap_err();
        assert!(err.to_string().contains("malformed line"));
    }

    #[test]
    fn unknown_key_is_skipped_not_fatal() {
        let records = parse_records("Bogus=5\nPassed=3\n", &SUITE, &src()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "Passed");
    }

    #[test]
    fn wrong_separator_is_fatal() {
        let err = parse_records("Passed:5\n", &SUITE, &src()).unwrap_err();
        assert!(err.to_string().contains("unit_tests_100"));
        assert!(err.to_string().contains("malformed line"));
    }

    #[test]
    fn missing_value_is_fatal() {
        assert!(parse_records("Passed=\n", &SUITE, &src()).is_err());
    }

    #[test]
    fn key_with_digits_is_fatal() {
        assert!(parse_records("Pass3d=5\n", &SUITE, &src()).is_err());
    }

    #[test]
    fn blank_lines_tolerated() {
        let records = parse_records("Passed=1\n\nFailed=0\n", &SUITE, &src()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn counters_round_trip_exactly() {
        let values = [0u64, 1, 13, 1024, 987_654_321];
        for v in values {
            let text = format!("Total={v}\n");
            let records = parse_records(&text, &SUITE, &src()).unwrap();
            assert_eq!(records[0].value.parse::<u64>().unwrap(), v);
        }
    }
}
