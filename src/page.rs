use gloo_timers::callback::Timeout;
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use crate::components::modal::ModalHandle;
use crate::config::{self, classes, selectors};
use crate::dom::{self, BindingSet, Target};
use crate::error::SiteError;

const PRESSED: &str = "scale(0.95)";

const LOADED_STYLES: &str = r#"
    body {
        opacity: 0;
        transition: opacity 0.5s ease;
    }
    body.loaded {
        opacity: 1;
    }
"#;

pub const WELCOME: &str = r#"
🚀 ATPERF Website Loaded Successfully!
📊 Performance monitoring at your fingertips
⚡ Built with modern web technologies
🔍 Ready to optimize your systems

Visit: https://atperf.com
Contact: contact@atperf.com
"#;

/// Brief pressed look on the clicked trigger.
fn press(el: &Element) {
    let Some(el) = el.dyn_ref::<HtmlElement>().cloned() else {
        return;
    };
    if let Err(e) = el.style().set_property("transform", PRESSED) {
        warn!("press feedback: {:?}", e);
        return;
    }
    Timeout::new(config::PRESS_FEEDBACK, move || {
        if let Err(e) = el.style().remove_property("transform") {
            warn!("press feedback reset: {:?}", e);
        }
    })
    .forget();
}

pub fn test_tool_bindings(modal: ModalHandle) -> BindingSet {
    BindingSet::new().on("test-tool", Target::All(selectors::TEST_TRIGGERS), "click", move |el: &Element, e: &Event| {
        e.prevent_default();
        press(el);
        modal.open();
    })
}

fn mark_loaded(document: &Document) -> Result<(), SiteError> {
    let body = document.body().ok_or(SiteError::NoBody)?;
    let head = document.head().ok_or(SiteError::NoDocument)?;
    let style = document.create_element("style")?;
    style.set_text_content(Some(LOADED_STYLES));
    head.append_child(&style)?;
    body.class_list().add_1(classes::LOADED)?;
    Ok(())
}

/// `document.readyState` once the `load` event has already fired.
fn load_finished(ready_state: &str) -> bool {
    ready_state == "complete"
}

/// Adds the `loaded` body class once the page has finished loading, right
/// away if that already happened.
pub fn load_bindings(document: &Document) -> Result<BindingSet, SiteError> {
    if load_finished(&document.ready_state()) {
        mark_loaded(document)?;
        return Ok(BindingSet::new());
    }
    Ok(BindingSet::new().on("page-loaded", Target::Window, "load", |_, _| {
        if let Err(e) = dom::document().and_then(|d| mark_loaded(&d)) {
            warn!("could not mark page as loaded: {}", e);
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loaded_rule_fades_the_body_in() {
        assert!(LOADED_STYLES.contains("body.loaded"));
        assert!(LOADED_STYLES.contains("opacity: 1"));
    }

    #[test]
    fn only_a_complete_document_counts_as_loaded() {
        assert!(load_finished("complete"));
        assert!(!load_finished("interactive"));
        assert!(!load_finished("loading"));
    }

    #[test]
    fn banner_names_the_site() {
        assert!(WELCOME.contains("ATPERF"));
        assert!(WELCOME.contains("contact@atperf.com"));
    }
}
