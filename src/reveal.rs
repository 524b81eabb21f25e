use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::{self, classes, selectors};
use crate::dom;
use crate::error::SiteError;

/// What to do with a watched element when the observer reports it.
#[derive(Debug, PartialEq)]
pub enum RevealStep {
    /// Not in view yet; keep watching.
    Wait,
    /// Add the fade-in class and stop watching.
    FadeIn,
    /// Already faded in; just stop watching.
    Release,
}

pub fn reveal_step(intersecting: bool, already_faded: bool) -> RevealStep {
    match (intersecting, already_faded) {
        (false, _) => RevealStep::Wait,
        (true, false) => RevealStep::FadeIn,
        (true, true) => RevealStep::Release,
    }
}

/// Watches cards and section headers and gives each the fade-in class the
/// first time it scrolls into view. Returns how many elements are watched.
pub fn observe(document: &Document) -> Result<usize, SiteError> {
    let targets = dom::query_all(document, selectors::REVEAL_TARGETS)?;
    if targets.is_empty() {
        return Ok(0);
    }

    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            let target = entry.target();
            let faded = target.class_list().contains(classes::FADE_IN);
            match reveal_step(entry.is_intersecting(), faded) {
                RevealStep::Wait => continue,
                RevealStep::FadeIn => {
                    if let Err(e) = target.class_list().add_1(classes::FADE_IN) {
                        warn!("fade-in: {:?}", e);
                    }
                }
                RevealStep::Release => {}
            }
            observer.unobserve(&target);
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config::REVEAL_THRESHOLD));
    options.set_root_margin(config::REVEAL_ROOT_MARGIN);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    for el in &targets {
        observer.observe(el);
    }
    debug!("watching {} elements for fade-in", targets.len());
    Ok(targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays observer reports for one element the way `observe` handles them.
    fn replay(reports: &[bool]) -> usize {
        let (mut watched, mut faded, mut fade_ins) = (true, false, 0);
        for &intersecting in reports {
            if !watched {
                continue;
            }
            match reveal_step(intersecting, faded) {
                RevealStep::Wait => {}
                RevealStep::FadeIn => {
                    faded = true;
                    fade_ins += 1;
                    watched = false;
                }
                RevealStep::Release => watched = false,
            }
        }
        fade_ins
    }

    #[test]
    fn element_fades_in_once_across_repeated_visits() {
        assert_eq!(replay(&[false, true, false, true, false, true]), 1);
    }

    #[test]
    fn element_out_of_view_never_fades() {
        assert_eq!(replay(&[false, false]), 0);
    }

    #[test]
    fn steps_follow_visibility_and_class() {
        assert_eq!(reveal_step(false, false), RevealStep::Wait);
        assert_eq!(reveal_step(true, false), RevealStep::FadeIn);
        assert_eq!(reveal_step(true, true), RevealStep::Release);
    }
}
