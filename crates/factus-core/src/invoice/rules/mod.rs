//! Rule-based field normalizers for invoice text.

pub mod dates;
pub mod iban;
pub mod patterns;
pub mod provider;
pub mod text;

pub use dates::{month_from_name, normalize_date_text, parse_date, DateParts};
pub use iban::{format_iban, validate_iban, IbanScanner};
pub use provider::{normalize_provider, LEGAL_SUFFIXES};
pub use text::strip_accents;
