//! Sequential, human-readable entry numbers.
//!
//! Entry numbers are company-scoped and formatted `JE-#####` with zero
//! padding. Allocation must happen inside the posting transaction; this
//! module only knows the format.

use super::error::JournalError;

/// Prefix for journal entry numbers.
pub const ENTRY_NUMBER_PREFIX: &str = "JE-";

/// Minimum digits in the numeric part (zero padded, grows past 99999).
const ENTRY_NUMBER_DIGITS: usize = 5;

/// Formats a sequence value as an entry number, e.g. `7` -> `JE-00007`.
#[must_use]
pub fn format_entry_number(sequence: u64) -> String {
    format!("{ENTRY_NUMBER_PREFIX}{sequence:0ENTRY_NUMBER_DIGITS$}")
}

/// Parses an entry number back to its sequence value.
///
/// # Errors
///
/// Returns `JournalError::Database` describing the malformed value; a bad
/// stored number means corrupted data, not caller error.
pub fn parse_entry_number(entry_number: &str) -> Result<u64, JournalError> {
    let digits = entry_number
        .strip_prefix(ENTRY_NUMBER_PREFIX)
        .ok_or_else(|| JournalError::Database(format!("malformed entry number: {entry_number}")))?;
    digits
        .parse::<u64>()
        .map_err(|_| JournalError::Database(format!("malformed entry number: {entry_number}")))
}

/// Returns the entry number following `latest`, or the first number if the
/// company has no entries yet.
///
/// # Errors
///
/// Returns an error if `latest` is malformed.
pub fn next_entry_number(latest: Option<&str>) -> Result<String, JournalError> {
    let next = match latest {
        Some(number) => parse_entry_number(number)? + 1,
        None => 1,
    };
    Ok(format_entry_number(next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_five_digits() {
        assert_eq!(format_entry_number(1), "JE-00001");
        assert_eq!(format_entry_number(42), "JE-00042");
        assert_eq!(format_entry_number(99999), "JE-99999");
    }

    #[test]
    fn test_format_grows_past_five_digits() {
        assert_eq!(format_entry_number(100000), "JE-100000");
    }

    #[test]
    fn test_parse_round_trip() {
        for n in [1, 7, 99999, 123456] {
            assert_eq!(parse_entry_number(&format_entry_number(n)).unwrap(), n);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_entry_number("INV-00001").is_err());
        assert!(parse_entry_number("JE-").is_err());
        assert!(parse_entry_number("JE-xyz").is_err());
    }

    #[test]
    fn test_next_entry_number() {
        assert_eq!(next_entry_number(None).unwrap(), "JE-00001");
        assert_eq!(next_entry_number(Some("JE-00001")).unwrap(), "JE-00002");
        assert_eq!(next_entry_number(Some("JE-00419")).unwrap(), "JE-00420");
    }
}
