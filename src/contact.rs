//! Contact form validation and feedback.
//!
//! Nothing is sent anywhere: a valid submission only shows a thank-you message
//! and clears the form.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::page::{ContactForm, Document};

/// Shown after a valid submission
pub const SUCCESS_MESSAGE: &str = "Thanks! I'll be in touch soon.";

/// Why a submission was rejected. The display text is shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Form not found.")]
    FormMissing,

    #[error("Please add your name.")]
    MissingName,

    #[error("Please provide an email address.")]
    MissingEmail,

    #[error("That email address doesn't look right.")]
    InvalidEmail,

    #[error("Let me know how I can help.")]
    MissingMessage,
}

/// Something, an `@`, then a domain with at least one dot. No whitespace.
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| {
            panic!("Invalid email pattern: {}", e);
        })
    })
}

/// Check the form fields in order: name, email, message.
/// The first failing check wins.
pub fn validate_form(form: Option<&ContactForm>) -> Result<(), ValidationError> {
    let form = form.ok_or(ValidationError::FormMissing)?;

    if form.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }

    let email = form.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !email_pattern().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    if form.message.trim().is_empty() {
        return Err(ValidationError::MissingMessage);
    }

    Ok(())
}

/// Submit handler.
///
/// Does nothing without a feedback slot. Otherwise clears previous feedback and
/// shows either the validation message (`error`) or the success message
/// (`success`), resetting the form on success.
pub fn handle_submit(doc: &mut Document) -> Option<Result<(), ValidationError>> {
    let feedback = doc.feedback.as_mut()?;

    let result = validate_form(doc.contact_form.as_ref());
    feedback.text.clear();
    feedback.classes.remove("error");
    feedback.classes.remove("success");

    match result {
        Err(e) => {
            tracing::debug!("Contact form rejected: {:?}", e);
            feedback.text = e.to_string();
            feedback.classes.add("error");
        }
        Ok(()) => {
            tracing::info!("Contact form accepted");
            feedback.text = SUCCESS_MESSAGE.to_string();
            feedback.classes.add("success");
            if let Some(form) = doc.contact_form.as_mut() {
                form.reset();
            }
        }
    }

    Some(result)
}
