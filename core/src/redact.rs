//! Redaction of contact identifiers in backend-generated text.
//!
//! Only the app's own output is redacted, not the screenshot. The phone rule
//! keeps short service numbers such as `997` or `15999` intact.

use std::sync::LazyLock;

use regex::{Captures, Regex};

pub const REDACTED_EMAIL: &str = "[redacted email]";
pub const REDACTED_NUMBER: &str = "[redacted number]";

/// Phone-like runs shorter than this many digits are left alone.
const MIN_PHONE_DIGITS: usize = 8;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").expect("email pattern compiles")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s-]{6,}\d").expect("phone pattern compiles"));

pub fn redact_emails(text: &str) -> String {
    EMAIL.replace_all(text, REDACTED_EMAIL).into_owned()
}

pub fn redact_phones(text: &str) -> String {
    PHONE
        .replace_all(text, |caps: &Captures| {
            let run = &caps[0];
            let digits = run.chars().filter(char::is_ascii_digit).count();
            if digits >= MIN_PHONE_DIGITS {
                REDACTED_NUMBER.to_string()
            } else {
                run.to_string()
            }
        })
        .into_owned()
}

/// Emails first, so digits inside an address are not mistaken for a phone.
pub fn redact_identifiers(text: &str) -> String {
    redact_phones(&redact_emails(text))
}
