//! Contact ingestion.
//!
//! Turns raw delimited text (an uploaded contact file) into a normalized
//! batch of contacts. Manual form entry bypasses parsing and builds the same
//! `Contact` records directly; both paths feed the validation module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::normalize_phone;

/// A single outbound contact. Ephemeral: lives only until the dispatcher
/// consumes the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub phone_number: String,
    #[serde(default)]
    pub name: String,
}

impl Contact {
    /// Manual-entry constructor. Values are taken as typed; normalization
    /// happens during batch validation.
    pub fn new(phone_number: &str, name: &str) -> Self {
        Self {
            phone_number: phone_number.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestionError {
    #[error("Contact file is empty")]
    Empty,
}

const DELIMITER: char = ',';

/// Parse delimited contact text into an ordered batch.
///
/// The first line is skipped as a header only when its first field contains
/// "phone" case-insensitively; otherwise every line is data. Fields are
/// trimmed and stripped of quote characters. Blank lines are skipped; every
/// other line contributes exactly one contact.
pub fn parse_contacts(text: &str) -> Result<Vec<Contact>, IngestionError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(IngestionError::Empty);
    }

    let start = if is_header(lines[0]) { 1 } else { 0 };

    let mut contacts = Vec::with_capacity(lines.len().saturating_sub(start));
    for line in &lines[start..] {
        let mut fields = line.split(DELIMITER).map(clean_field);
        // split always yields at least one field
        let phone = fields.next().unwrap_or_default();
        let name = fields.next().unwrap_or_default();
        contacts.push(Contact {
            phone_number: normalize_phone(&phone),
            name,
        });
    }

    Ok(contacts)
}

fn is_header(line: &str) -> bool {
    line.split(DELIMITER)
        .next()
        .map(|f| f.trim().to_ascii_lowercase().contains("phone"))
        .unwrap_or(false)
}

fn clean_field(field: &str) -> String {
    field
        .trim()
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .collect()
}

/// The downloadable contact file template (export only).
pub fn csv_template() -> &'static str {
    "phone_number,name\n+1234567890,John Doe\n+0987654321,Jane Smith"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_round_trips() {
        let contacts = parse_contacts(csv_template()).unwrap();
        assert_eq!(
            contacts,
            vec![
                Contact::new("+1234567890", "John Doe"),
                Contact::new("+0987654321", "Jane Smith"),
            ]
        );
    }

    #[test]
    fn header_is_only_skipped_when_first_field_mentions_phone() {
        let with_header = "Phone Number,Name\n+14155550100,Alice";
        assert_eq!(
            parse_contacts(with_header).unwrap(),
            vec![Contact::new("+14155550100", "Alice")]
        );

        // First line is data when it does not look like a header.
        let without_header = "+14155550100,Alice\n+442079460958,Bob";
        assert_eq!(parse_contacts(without_header).unwrap().len(), 2);

        // "phone" in a later field does not make the first line a header.
        let tricky = "+14155550100,phone booth repair\n+442079460958,Bob";
        assert_eq!(parse_contacts(tricky).unwrap().len(), 2);
    }

    #[test]
    fn fields_are_trimmed_and_unquoted() {
        let text = "phone_number,name\n \"+1 415 555 0100\" , 'Alice Smith' ";
        let contacts = parse_contacts(text).unwrap();
        assert_eq!(contacts[0].phone_number, "+14155550100");
        assert_eq!(contacts[0].name, "Alice Smith");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = "phone_number,name\n\n+14155550100,Alice\n   \n+442079460958,Bob\n";
        assert_eq!(parse_contacts(text).unwrap().len(), 2);
    }

    #[test]
    fn name_defaults_to_empty() {
        let contacts = parse_contacts("+14155550100").unwrap();
        assert_eq!(contacts, vec![Contact::new("+14155550100", "")]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(parse_contacts(""), Err(IngestionError::Empty));
        assert_eq!(parse_contacts("  \n \n"), Err(IngestionError::Empty));
    }
}
