//! IBAN (International Bank Account Number) scanning and validation.

use super::patterns::IBAN_CANDIDATE;

/// Finds IBAN-like runs in full document text.
pub struct IbanScanner {
    validate: bool,
}

impl IbanScanner {
    /// Create a scanner that keeps every IBAN-shaped run.
    pub fn new() -> Self {
        Self { validate: false }
    }

    /// Set whether to keep only runs that pass the mod-97 checksum.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Scan text for IBAN candidates, in order of appearance.
    ///
    /// Spaces are removed first, since printed IBANs are usually grouped in
    /// blocks of four.
    pub fn scan(&self, text: &str) -> Vec<String> {
        let compact = text.replace(' ', "");

        IBAN_CANDIDATE
            .find_iter(&compact)
            .map(|m| m.as_str().to_string())
            .filter(|candidate| !self.validate || validate_iban(candidate))
            .collect()
    }
}

impl Default for IbanScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate an IBAN using the checksum algorithm.
///
/// Algorithm:
/// 1. Move first 4 characters to the end
/// 2. Replace letters with numbers (A=10, B=11, ..., Z=35)
/// 3. The resulting number mod 97 should equal 1
pub fn validate_iban(iban: &str) -> bool {
    let iban: String = iban
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if iban.len() < 5 || !iban.is_ascii() {
        return false;
    }

    let (country_code, rest) = iban.split_at(2);
    let check_digits = &rest[..2];

    if !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    if !check_digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    // Remainder is folded digit by digit; the number is too large for u64
    let mut remainder: u32 = 0;
    for c in iban[4..].chars().chain(iban[..4].chars()) {
        let value = match c.to_digit(36) {
            Some(v) => v,
            None => return false,
        };
        remainder = if value < 10 {
            (remainder * 10 + value) % 97
        } else {
            (remainder * 100 + value) % 97
        };
    }

    remainder == 1
}

/// Format IBAN in groups of 4 characters.
pub fn format_iban(iban: &str) -> String {
    let cleaned: Vec<char> = iban.chars().filter(|c| !c.is_whitespace()).collect();

    cleaned
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_iban_valid() {
        assert!(validate_iban("DE89370400440532013000"));
        assert!(validate_iban("ES91 2100 0418 4502 0005 1332"));
    }

    #[test]
    fn test_validate_iban_invalid() {
        assert!(!validate_iban("DE00370400440532013000"));
        assert!(!validate_iban("DE89"));
        assert!(!validate_iban("1289370400440532013000"));
    }

    #[test]
    fn test_scan_grouped_iban() {
        let text = "Transfer to: ES91 2100 0418 4502 0005 1332, thank you";
        let found = IbanScanner::new().scan(text);
        assert_eq!(found, vec!["ES9121000418450200051332".to_string()]);
    }

    #[test]
    fn test_scan_with_validation_drops_bad_checksums() {
        let text = "DE89370400440532013000\nDE00370400440532013000";
        assert_eq!(IbanScanner::new().scan(text).len(), 2);
        assert_eq!(
            IbanScanner::new().with_validation(true).scan(text),
            vec!["DE89370400440532013000".to_string()]
        );
    }

    #[test]
    fn test_format_iban() {
        assert_eq!(
            format_iban("ES9121000418450200051332"),
            "ES91 2100 0418 4502 0005 1332"
        );
    }
}
