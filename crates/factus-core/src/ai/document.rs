//! Mapping of document-AI extraction responses to field candidates.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AiCandidateSet;
use crate::invoice::rules::iban::IbanScanner;
use crate::models::record::FieldKey;

/// Document-AI response, reduced to what candidate mapping needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentExtraction {
    /// Full document text.
    pub text: String,
    pub entities: Vec<DocumentEntity>,
}

/// One typed entity found in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mention_text: String,
}

impl DocumentEntity {
    pub fn new(entity_type: impl Into<String>, mention_text: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            mention_text: mention_text.into(),
        }
    }
}

/// Field an entity type feeds, if any. Matching is case-insensitive.
pub fn field_for_entity(entity_type: &str) -> Option<FieldKey> {
    match entity_type.to_lowercase().as_str() {
        "invoice_id" | "invoice-number" | "invoice_number" => Some(FieldKey::Invoice),
        "supplier_name" | "merchant" | "vendor" | "issuer" | "supplier" => Some(FieldKey::Provider),
        "total_amount" | "grand_total" | "amount_total" | "invoice_total" => Some(FieldKey::Total),
        "invoice_date" | "date" | "issue_date" | "purchase_date" => Some(FieldKey::Date),
        "supplier_tax_id" | "vat_number" | "tax_id" | "vatid" => Some(FieldKey::TaxId),
        _ => None,
    }
}

/// Build the candidate set for one document.
///
/// Entities with a blank mention or an unmapped type are skipped. IBAN
/// candidates come from the full text rather than from entities.
pub fn candidates_from_document(doc: &DocumentExtraction, validate_iban: bool) -> AiCandidateSet {
    let mut set = AiCandidateSet::default();

    for entity in &doc.entities {
        let value = entity.mention_text.trim();
        if value.is_empty() {
            continue;
        }
        match field_for_entity(&entity.entity_type) {
            Some(field) => set.get_mut(field).push(value.to_string()),
            None => debug!("Ignoring entity type '{}'", entity.entity_type),
        }
    }

    set.iban = IbanScanner::new()
        .with_validation(validate_iban)
        .scan(&doc.text);

    set
}
