//! Mobile menu, smooth in-page scrolling and the scroll-driven active link.

use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::config::{self, classes, selectors};
use crate::dom::{self, BindingSet, Target};
use crate::error::SiteError;

/// What an in-page anchor's href asks for.
#[derive(Debug, PartialEq)]
pub enum AnchorTarget<'a> {
    /// No href at all, or an empty one. The browser handles the click.
    Missing,
    /// Just `#`. The jump to the top is suppressed and nothing else happens.
    Bare,
    /// A selector to look up, such as `#services`.
    Selector(&'a str),
}

pub fn anchor_target(href: Option<&str>) -> AnchorTarget<'_> {
    match href {
        None | Some("") => AnchorTarget::Missing,
        Some(h) if h.trim() == "#" => AnchorTarget::Bare,
        Some(h) => AnchorTarget::Selector(h),
    }
}

/// Absolute scroll position that puts an element just below the fixed header.
pub fn scroll_destination(viewport_top: f64, page_offset: f64) -> f64 {
    viewport_top + page_offset - config::HEADER_OFFSET
}

/// Vertical extent of a `section[id]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpan {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// The section under the reading line for the given scroll offset.
pub fn active_section(sections: &[SectionSpan], scroll_y: f64) -> Option<&str> {
    let line = scroll_y + config::ACTIVE_SECTION_LEAD;
    sections
        .iter()
        .find(|s| s.contains(line))
        .map(|s| s.id.as_str())
}

pub fn link_is_active(href: Option<&str>, active: Option<&str>) -> bool {
    match (href.and_then(|h| h.strip_prefix('#')), active) {
        (Some(fragment), Some(id)) => fragment == id,
        _ => false,
    }
}

/// A click closes the menu unless it landed on the toggle or inside the menu.
pub fn closes_menu(on_toggle: bool, in_menu: bool) -> bool {
    !on_toggle && !in_menu
}

fn set_active(elements: &[&Element], active: bool) {
    for el in elements {
        let list = el.class_list();
        let result = if active {
            list.add_1(classes::ACTIVE)
        } else {
            list.remove_1(classes::ACTIVE)
        };
        if let Err(e) = result {
            warn!("could not update active class: {:?}", e);
        }
    }
}

/// Hamburger toggle and the two ways of closing the menu. Empty when the
/// page lacks either element.
pub fn menu_bindings(document: &Document) -> Result<BindingSet, SiteError> {
    let hamburger = dom::query(document, selectors::HAMBURGER)?;
    let menu = dom::query(document, selectors::NAV_MENU)?;
    let (hamburger, menu) = match (hamburger, menu) {
        (Some(h), Some(m)) => (h, m),
        _ => {
            debug!("no mobile menu on this page");
            return Ok(BindingSet::new());
        }
    };

    let toggle = {
        let menu = menu.clone();
        move |hamburger: &Element, _: &web_sys::Event| {
            for el in [hamburger, &menu] {
                if let Err(e) = el.class_list().toggle(classes::ACTIVE) {
                    warn!("menu toggle: {:?}", e);
                }
            }
        }
    };

    let close_on_link = {
        let (hamburger, menu) = (hamburger.clone(), menu.clone());
        move |_: &Element, _: &web_sys::Event| set_active(&[&hamburger, &menu], false)
    };

    let close_outside = move |_: &Element, e: &web_sys::Event| {
        let target = e.target();
        if closes_menu(dom::contains(&hamburger, target.clone()), dom::contains(&menu, target)) {
            set_active(&[&hamburger, &menu], false);
        }
    };

    Ok(BindingSet::new()
        .on("menu-toggle", Target::All(selectors::HAMBURGER), "click", toggle)
        .on("menu-close-on-link", Target::All(selectors::MENU_LINKS), "click", close_on_link)
        .on("menu-close-outside", Target::Document, "click", close_outside))
}

fn smooth_scroll(anchor: &Element, event: &web_sys::Event) {
    let href = anchor.get_attribute("href");
    let selector = match anchor_target(href.as_deref()) {
        AnchorTarget::Missing => return,
        AnchorTarget::Bare => {
            event.prevent_default();
            return;
        }
        AnchorTarget::Selector(s) => s,
    };

    let document = match dom::document() {
        Ok(d) => d,
        Err(e) => {
            warn!("smooth scroll unavailable: {}", e);
            return;
        }
    };

    let target = match dom::query(&document, selector) {
        Ok(Some(target)) => target,
        Ok(None) => return,
        Err(e) => {
            warn!("invalid smooth scroll target: {}", e);
            return;
        }
    };

    event.prevent_default();
    if let Err(e) = scroll_to(&target) {
        warn!("smooth scroll to {} failed: {}", selector, e);
    }
}

fn scroll_to(target: &Element) -> Result<(), SiteError> {
    let window = dom::window()?;
    let top = scroll_destination(target.get_bounding_client_rect().top(), window.page_y_offset()?);
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
    Ok(())
}

pub fn smooth_scroll_bindings() -> BindingSet {
    BindingSet::new().on("smooth-scroll", Target::All(selectors::ANCHORS), "click", smooth_scroll)
}

fn section_spans(document: &Document) -> Result<Vec<SectionSpan>, SiteError> {
    Ok(dom::query_all(document, selectors::SECTIONS)?
        .into_iter()
        .filter_map(|el| {
            let id = el.id();
            let el = el.dyn_into::<HtmlElement>().ok()?;
            Some(SectionSpan {
                id,
                top: el.offset_top() as f64,
                height: el.offset_height() as f64,
            })
        })
        .collect())
}

/// Marks the nav link of the section under the reading line; clears the rest.
pub fn update_active_link() -> Result<(), SiteError> {
    let window = dom::window()?;
    let document = dom::document()?;
    let sections = section_spans(&document)?;
    let active = active_section(&sections, window.scroll_y()?);

    for link in dom::query_all(&document, selectors::NAV_LINKS)? {
        let on = link_is_active(link.get_attribute("href").as_deref(), active);
        set_active(&[&link], on);
    }
    Ok(())
}

pub fn active_link_bindings() -> BindingSet {
    BindingSet::new().on("active-link", Target::Window, "scroll", |_, _| {
        if let Err(e) = update_active_link() {
            warn!("active link update failed: {}", e);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans() -> Vec<SectionSpan> {
        vec![
            SectionSpan { id: "s1".into(), top: 0.0, height: 500.0 },
            SectionSpan { id: "s2".into(), top: 500.0, height: 500.0 },
        ]
    }

    #[test]
    fn reading_line_sits_below_the_scroll_offset() {
        // 350 + 100 lands in s1, 450 + 100 in s2
        assert_eq!(active_section(&spans(), 350.0), Some("s1"));
        assert_eq!(active_section(&spans(), 450.0), Some("s2"));
    }

    #[test]
    fn active_link_flips_at_the_scroll_boundary() {
        // Sections laid out so s1 covers scroll offsets [0, 500) and s2 [500, 1000).
        let sections = vec![
            SectionSpan { id: "s1".into(), top: 100.0, height: 500.0 },
            SectionSpan { id: "s2".into(), top: 600.0, height: 500.0 },
        ];
        assert_eq!(active_section(&sections, 450.0), Some("s1"));
        assert_eq!(active_section(&sections, 550.0), Some("s2"));
    }

    #[test]
    fn offsets_map_to_sections_by_span() {
        let sections = spans();
        assert_eq!(active_section(&sections, 0.0), Some("s1"));
        assert_eq!(active_section(&sections, 399.0), Some("s1"));
        assert_eq!(active_section(&sections, 400.0), Some("s2"));
        assert_eq!(active_section(&sections, 899.0), Some("s2"));
    }

    #[test]
    fn nothing_is_active_past_the_last_section() {
        assert_eq!(active_section(&spans(), 900.0), None);
        assert_eq!(active_section(&[], 0.0), None);
    }

    #[test]
    fn only_the_matching_link_is_active() {
        assert!(link_is_active(Some("#s1"), Some("s1")));
        assert!(!link_is_active(Some("#s2"), Some("s1")));
        assert!(!link_is_active(Some("/about"), Some("s1")));
        assert!(!link_is_active(Some("#s1"), None));
        assert!(!link_is_active(None, Some("s1")));
    }

    #[test]
    fn anchor_targets_are_classified() {
        assert_eq!(anchor_target(None), AnchorTarget::Missing);
        assert_eq!(anchor_target(Some("")), AnchorTarget::Missing);
        assert_eq!(anchor_target(Some("#")), AnchorTarget::Bare);
        assert_eq!(anchor_target(Some(" # ")), AnchorTarget::Bare);
        assert_eq!(anchor_target(Some("#contact")), AnchorTarget::Selector("#contact"));
        assert_eq!(anchor_target(Some("#1nope")), AnchorTarget::Selector("#1nope"));
    }

    #[test]
    fn destination_clears_the_header() {
        assert_eq!(scroll_destination(300.0, 1000.0), 1220.0);
        assert_eq!(scroll_destination(-200.0, 1000.0), 720.0);
    }

    #[test]
    fn outside_clicks_close_the_menu() {
        assert!(closes_menu(false, false));
        assert!(!closes_menu(true, false));
        assert!(!closes_menu(false, true));
    }

    #[test]
    fn nav_bindings_are_named() {
        assert_eq!(smooth_scroll_bindings().names(), vec!["smooth-scroll"]);
        assert_eq!(active_link_bindings().names(), vec!["active-link"]);
    }
}
