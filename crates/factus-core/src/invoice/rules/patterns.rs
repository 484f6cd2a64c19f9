//! Common regex patterns for field rules.
//!
//! Date patterns run against text already passed through
//! [`normalize_date_text`](super::dates::normalize_date_text), so they only
//! need to match lower-case ASCII with single spaces.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 2023-02-23, 2023.2.23, 2023/02/23
    pub static ref DATE_YMD: Regex = Regex::new(
        r"^\s*([0-9]{4})[./\-]([0-9]{1,2})[./\-]([0-9]{1,2})\s*$"
    ).unwrap();

    // 23-02-2023, 23.2.23, 23/02/2023
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^\s*([0-9]{1,2})[./\-]([0-9]{1,2})[./\-]([0-9]{2,4})\s*$"
    ).unwrap();

    // 23 feb 2023
    pub static ref DATE_DAY_MONTH_NAME: Regex = Regex::new(
        r"^\s*([0-9]{1,2})\s+([a-z.]+)\s+([0-9]{2,4})\s*$"
    ).unwrap();

    // feb 23 2023 (comma already collapsed)
    pub static ref DATE_MONTH_NAME_DAY: Regex = Regex::new(
        r"^\s*([a-z.]+)\s+([0-9]{1,2})\s+([0-9]{2,4})\s*$"
    ).unwrap();

    // 23 de febrero de 2023
    pub static ref DATE_SPANISH_LONG: Regex = Regex::new(
        r"^\s*([0-9]{1,2})\s+(?:de\s+)?([a-z.]+)\s+(?:de\s+)?([0-9]{2,4})\s*$"
    ).unwrap();

    pub static ref DATE_SLASH: Regex = Regex::new(
        r"^\s*([0-9]{1,2})/([0-9]{1,2})/([0-9]{2,4})\s*$"
    ).unwrap();

    // Commas and tabs collapse to a single space before date matching
    pub static ref COMMA_TAB_RUN: Regex = Regex::new(r"[,\t]+").unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // Provider normalization: everything outside [a-z0-9] becomes a separator
    pub static ref NON_ALNUM_RUN: Regex = Regex::new(r"[^a-z0-9]+").unwrap();

    // Selection glue predicates
    pub static ref NUMERIC_FRAGMENT: Regex = Regex::new(r"^(?:€?|[0-9.,]+)$").unwrap();

    pub static ref NAME_PIECE: Regex = Regex::new(r"^[A-Za-zÀ-ÿ&'.\-]+$").unwrap();

    // IBAN-like runs in space-stripped document text
    pub static ref IBAN_CANDIDATE: Regex = Regex::new(r"[A-Z]{2}[0-9A-Z]{13,32}").unwrap();
}
