//! Contact form command

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{OutputFormat, print_status};
use crate::config::Config;
use crate::contact;
use crate::page::{ContactForm, Document};

#[derive(Serialize)]
struct ContactResult {
    valid: bool,
    message: String,
}

/// Fill the page's form and submit it
fn submit(config: &Config, form: ContactForm) -> Option<ContactResult> {
    let mut doc = Document::from_config(&config.page);
    if let Some(slot) = doc.contact_form.as_mut() {
        *slot = form;
    }

    let result = contact::handle_submit(&mut doc)?;
    let message = doc.feedback.map(|f| f.text).unwrap_or_default();
    Some(ContactResult {
        valid: result.is_ok(),
        message,
    })
}

pub async fn run(name: String, email: String, message: String, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    let Some(result) = submit(&config, ContactForm { name, email, message }) else {
        anyhow::bail!("The page has no form feedback area");
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_status(result.valid, &result.message),
    }

    Ok(())
}
