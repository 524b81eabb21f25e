//! Contact form: collects the fields, fakes the round trip and reports back
//! in the page's language.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::components::notification::Notifier;
use crate::config::selectors;
use crate::dom::{self, BindingSet, Target};
use crate::error::SiteError;
use crate::request::SimulatedRequest;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormMessages {
    pub sending: &'static str,
    pub success: &'static str,
}

impl Locale {
    /// Picks a locale from an `<html lang>` value such as `fr` or `fr-CA`.
    /// Anything unrecognised falls back to English.
    pub fn from_lang(lang: Option<&str>) -> Self {
        let primary = lang
            .and_then(|l| l.trim().split(['-', '_']).next())
            .map(|p| p.to_ascii_lowercase());
        match primary.as_deref() {
            Some("fr") => Locale::Fr,
            _ => Locale::En,
        }
    }

    pub fn messages(&self) -> FormMessages {
        match self {
            Locale::En => FormMessages {
                sending: "Sending...",
                success: "Message sent successfully!",
            },
            Locale::Fr => FormMessages {
                sending: "Envoi...",
                success: "Message envoyé avec succès !",
            },
        }
    }
}

/// Field name to value, in name order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormPayload(BTreeMap<String, String>);

impl FormPayload {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Whether an input contributes to the payload. Unchecked boxes and buttons
/// are left out, as a browser form submission would.
pub fn input_is_submitted(kind: &str, checked: bool) -> bool {
    match kind {
        "checkbox" | "radio" => checked,
        "submit" | "button" | "reset" | "image" | "file" => false,
        _ => true,
    }
}

fn field_value(el: &Element) -> Option<(String, String)> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        if input.disabled() || !input_is_submitted(&input.type_(), input.checked()) {
            return None;
        }
        return Some((input.name(), input.value()));
    }
    if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        return (!area.disabled()).then(|| (area.name(), area.value()));
    }
    if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        return (!select.disabled()).then(|| (select.name(), select.value()));
    }
    None
}

pub fn collect(form: &HtmlFormElement) -> Result<FormPayload, SiteError> {
    let mut payload = FormPayload::default();
    for el in dom::query_all_in(form, selectors::NAMED_FIELDS)? {
        if let Some((name, value)) = field_value(&el) {
            payload.insert(name, value);
        }
    }
    Ok(payload)
}

fn page_locale() -> Locale {
    let lang = dom::document()
        .ok()
        .and_then(|d| d.document_element())
        .and_then(|root| root.get_attribute("lang"));
    Locale::from_lang(lang.as_deref())
}

fn submit(form: &Element, event: &Event, notifier: &Notifier) -> Result<(), SiteError> {
    event.prevent_default();
    let form = match form.dyn_ref::<HtmlFormElement>() {
        Some(f) => f.clone(),
        None => return Ok(()),
    };

    let button = dom::query_all_in(&form, selectors::SUBMIT_BUTTON)?
        .into_iter()
        .find_map(|el| el.dyn_into::<HtmlButtonElement>().ok());
    if button.as_ref().map_or(false, |b| b.disabled()) {
        // Still sending the previous message.
        return Ok(());
    }

    let payload = collect(&form)?;
    let messages = page_locale().messages();
    if payload.is_empty() {
        warn!("contact form has no named fields");
    }
    info!("contact form submitted with {} fields", payload.len());

    let original_label = button.as_ref().and_then(|b| b.text_content());
    if let Some(button) = &button {
        button.set_text_content(Some(messages.sending));
        button.set_disabled(true);
    }

    let notifier = notifier.clone();
    spawn_local(async move {
        if let Err(e) = SimulatedRequest::default().send("/contact", &payload).await {
            warn!("contact request failed: {}", e);
        }
        notifier.success(messages.success);
        form.reset();
        if let Some(button) = button {
            button.set_text_content(original_label.as_deref());
            button.set_disabled(false);
        }
    });
    Ok(())
}

pub fn contact_bindings(notifier: Notifier) -> BindingSet {
    BindingSet::new().on("contact-submit", Target::All(selectors::CONTACT_FORM), "submit", move |form, event| {
        if let Err(e) = submit(form, event, &notifier) {
            warn!("contact form: {}", e);
        }
    })
}
