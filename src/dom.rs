//! Thin helpers over `web_sys` plus the declarative listener list every
//! page behavior registers through.

use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, NodeList, Window};

use crate::error::SiteError;

pub fn window() -> Result<Window, SiteError> {
    web_sys::window().ok_or(SiteError::NoWindow)
}

pub fn document() -> Result<Document, SiteError> {
    window()?.document().ok_or(SiteError::NoDocument)
}

pub fn body() -> Result<HtmlElement, SiteError> {
    document()?.body().ok_or(SiteError::NoBody)
}

pub fn query(document: &Document, selector: &str) -> Result<Option<Element>, SiteError> {
    document
        .query_selector(selector)
        .map_err(|e| SiteError::selector(selector, e))
}

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, SiteError> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|e| SiteError::selector(selector, e))?;
    Ok(elements(&nodes))
}

pub fn query_all_in(parent: &Element, selector: &str) -> Result<Vec<Element>, SiteError> {
    let nodes = parent
        .query_selector_all(selector)
        .map_err(|e| SiteError::selector(selector, e))?;
    Ok(elements(&nodes))
}

fn elements(nodes: &NodeList) -> Vec<Element> {
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// True when `target` is `container` or one of its descendants.
pub fn contains(container: &Element, target: Option<EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
        .map(|node| container.contains(Some(&node)))
        .unwrap_or(false)
}

/// Where a binding's listener is installed.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Window,
    Document,
    /// Every element matching the selector at attach time.
    All(&'static str),
}

pub type Handler = Rc<dyn Fn(&Element, &Event)>;

/// One named event listener. The handler receives the element it was bound
/// to (the document element for window and document bindings).
pub struct Binding {
    pub name: &'static str,
    pub target: Target,
    pub event: &'static str,
    handler: Handler,
}

/// Enumerable set of listeners, attached in one go for the lifetime of the page.
#[derive(Default)]
pub struct BindingSet {
    bindings: Vec<Binding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, name: &'static str, target: Target, event: &'static str, handler: F) -> Self
    where
        F: Fn(&Element, &Event) + 'static,
    {
        self.bindings.push(Binding {
            name,
            target,
            event,
            handler: Rc::new(handler),
        });
        self
    }

    pub fn extend(mut self, other: BindingSet) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.bindings.iter().map(|b| b.name).collect()
    }

    /// Installs every listener and returns how many were registered. Listeners
    /// are leaked on purpose: the page never tears them down.
    pub fn attach(self, document: &Document) -> Result<usize, SiteError> {
        let window = window()?;
        let root = document.document_element().ok_or(SiteError::NoDocument)?;
        let mut installed = 0;

        for binding in self.bindings {
            let targets: Vec<(EventTarget, Element)> = match &binding.target {
                Target::Window => vec![(window.clone().into(), root.clone())],
                Target::Document => vec![(document.clone().into(), root.clone())],
                Target::All(selector) => match query_all(document, selector) {
                    Ok(found) => found
                        .into_iter()
                        .map(|el| (el.clone().into(), el))
                        .collect(),
                    Err(e) => {
                        warn!("binding {} skipped: {}", binding.name, e);
                        continue;
                    }
                },
            };

            if targets.is_empty() {
                debug!("binding {} has no targets on this page", binding.name);
            }

            for (target, element) in targets {
                let handler = binding.handler.clone();
                let callback = Closure::wrap(Box::new(move |event: Event| {
                    handler(&element, &event);
                }) as Box<dyn FnMut(Event)>);
                target.add_event_listener_with_callback(binding.event, callback.as_ref().unchecked_ref())?;
                callback.forget();
                installed += 1;
            }
        }

        Ok(installed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_are_enumerable_in_registration_order() {
        let set = BindingSet::new()
            .on("menu-toggle", Target::All(".hamburger"), "click", |_, _| {})
            .on("active-link", Target::Window, "scroll", |_, _| {});
        assert_eq!(set.names(), vec!["menu-toggle", "active-link"]);
    }

    #[test]
    fn extend_keeps_both_sets() {
        let nav = BindingSet::new().on("a", Target::Document, "click", |_, _| {});
        let page = BindingSet::new().on("b", Target::Window, "load", |_, _| {});
        let all = nav.extend(page);
        assert_eq!(all.names(), vec!["a", "b"]);
    }

    #[test]
    fn empty_set_has_nothing_to_attach() {
        assert!(BindingSet::new().names().is_empty());
    }
}
