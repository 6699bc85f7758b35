use crate::dom::FieldMap;

use super::FormErrors;

pub const FIRST_NAME_TOO_SHORT: &str = "Vorname muss mindestens 2 Zeichen enthalten";
pub const LAST_NAME_TOO_SHORT: &str = "Nachname muss mindestens 2 Zeichen enthalten";
pub const EMAIL_INVALID: &str = "Bitte geben Sie eine gültige E-Mail-Adresse ein";
pub const SUBJECT_TOO_SHORT: &str = "Betreff muss mindestens 3 Zeichen enthalten";
pub const MESSAGE_TOO_SHORT: &str = "Nachricht muss mindestens 10 Zeichen enthalten";
pub const CONSENT_MISSING: &str = "Sie müssen der Datenschutzerklärung zustimmen";
pub const CHOICE_MISSING: &str = "Bitte wählen Sie eine Option aus";

fn trimmed_len(fields: &FieldMap, name: &str) -> usize {
    fields
        .get(name)
        .map(|value| value.trim().chars().count())
        .unwrap_or(0)
}

/// `local@domain.tld` with no whitespace and no second `@`.
pub fn is_valid_email(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // Some dot must have text on both sides.
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

pub fn validate_contact(fields: &FieldMap) -> FormErrors {
    let mut errors = FormErrors::new();
    let mut reject = |field: &str, message: &str| {
        errors.insert(field.to_string(), message.to_string());
    };

    if trimmed_len(fields, "firstName") < 2 {
        reject("firstName", FIRST_NAME_TOO_SHORT);
    }
    if trimmed_len(fields, "lastName") < 2 {
        reject("lastName", LAST_NAME_TOO_SHORT);
    }
    let email_ok = fields
        .get("email")
        .map_or(false, |email| is_valid_email(email.trim()));
    if !email_ok {
        reject("email", EMAIL_INVALID);
    }
    if trimmed_len(fields, "subject") < 3 {
        reject("subject", SUBJECT_TOO_SHORT);
    }
    if trimmed_len(fields, "message") < 10 {
        reject("message", MESSAGE_TOO_SHORT);
    }
    if fields.get("privacyConsent").map_or(true, |value| value.is_empty()) {
        reject("privacyConsent", CONSENT_MISSING);
    }

    errors
}

pub fn validate_poll(fields: &FieldMap) -> FormErrors {
    let mut errors = FormErrors::new();
    if fields.get("challenge").map_or(true, |choice| choice.is_empty()) {
        errors.insert("challenge".to_string(), CHOICE_MISSING.to_string());
    }
    errors
}
