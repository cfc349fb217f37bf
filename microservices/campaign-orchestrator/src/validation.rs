//! Phone number and batch validation rules.
//!
//! Every contact batch passes through here before the dispatcher will touch
//! it. Validation is all-or-nothing per batch: one bad number rejects the
//! whole submission.

use thiserror::Error;

use crate::contacts::Contact;

/// Strip every character that is not a digit or a leading `+`.
pub fn normalize_phone(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c == '+' && out.is_empty() {
            out.push(c);
        }
    }
    out
}

/// E.164 shape: `+`, a non-zero first digit, 2-15 digits total.
pub fn is_valid_e164(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };
    if !(2..=15).contains(&digits.len()) {
        return false;
    }
    let mut chars = digits.chars();
    match chars.next() {
        Some(c) if ('1'..='9').contains(&c) => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_digit())
}

/// A single-digit IVR menu key.
pub fn is_valid_action_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_digit())
}

/// Batch validation errors. Both are recoverable: the operator corrects the
/// batch and resubmits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("Batch contains no contacts with a phone number")]
    Empty,

    #[error("{count} contact(s) have an invalid phone number; expected E.164 format (e.g. +14155550100)")]
    InvalidPhoneNumbers { count: usize },
}

/// Validate a contact batch for dispatch.
///
/// Contacts whose phone number is blank after trimming are not counted; if
/// nothing remains the batch is empty. Any remaining contact whose normalized
/// number fails the E.164 check rejects the entire batch with the count of
/// offenders.
pub fn validate_batch(contacts: &[Contact]) -> Result<Vec<Contact>, BatchError> {
    let present: Vec<&Contact> = contacts
        .iter()
        .filter(|c| !c.phone_number.trim().is_empty())
        .collect();

    if present.is_empty() {
        return Err(BatchError::Empty);
    }

    let mut valid = Vec::with_capacity(present.len());
    let mut invalid = 0usize;

    for contact in present {
        let phone = normalize_phone(&contact.phone_number);
        if is_valid_e164(&phone) {
            valid.push(Contact {
                phone_number: phone,
                name: contact.name.trim().to_string(),
            });
        } else {
            invalid += 1;
        }
    }

    if invalid > 0 {
        return Err(BatchError::InvalidPhoneNumbers { count: invalid });
    }

    Ok(valid)
}
