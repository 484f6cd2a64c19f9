//! Invoice field rules: date normalization, provider canonicalization and
//! IBAN scanning.

pub mod rules;

pub use rules::{normalize_provider, parse_date, DateParts, IbanScanner};
