use log::Level;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug  // Chatty when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

// Notification timings (ms)
pub const NOTICE_REVEAL_DELAY: u32 = 100;
pub const NOTICE_DWELL: u32 = 4000;
pub const NOTICE_EXIT: u32 = 300;

// Modal timings (ms)
pub const MODAL_ENTER_DELAY: u32 = 10;
pub const MODAL_EXIT: u32 = 300;

/// Fake network latency for both forms.
pub const SIMULATED_REQUEST_DELAY: u32 = 2000;

/// How long a test-tool trigger stays pressed after a click.
pub const PRESS_FEEDBACK: u32 = 150;

/// Height of the fixed header; smooth scrolling stops this far above the target.
pub const HEADER_OFFSET: f64 = 80.0;

/// Distance below the top of the viewport used to decide which section is current.
pub const ACTIVE_SECTION_LEAD: f64 = 100.0;

pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

pub const OVERLAY_ROOT_ID: &str = "atperf-overlay";

pub mod selectors {
    pub const HAMBURGER: &str = ".hamburger";
    pub const NAV_MENU: &str = ".nav-menu";
    pub const MENU_LINKS: &str = ".nav-link, .language-link";
    pub const NAV_LINKS: &str = ".nav-link";
    pub const ANCHORS: &str = "a[href^=\"#\"]";
    pub const SECTIONS: &str = "section[id]";
    pub const CONTACT_FORM: &str = ".form";
    pub const SUBMIT_BUTTON: &str = "button[type=\"submit\"]";
    pub const TEST_TRIGGERS: &str = ".btn-test, .test-tool-link";
    pub const REVEAL_TARGETS: &str = ".service-card, .use-case-card, .section-header";
    pub const NAMED_FIELDS: &str = "input[name], textarea[name], select[name]";
}

pub mod classes {
    pub const ACTIVE: &str = "active";
    pub const FADE_IN: &str = "fade-in";
    pub const LOADED: &str = "loaded";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_is_removed_after_the_exit_transition() {
        assert!(NOTICE_REVEAL_DELAY < NOTICE_DWELL);
        assert_eq!(NOTICE_DWELL + NOTICE_EXIT, 4300);
    }

    #[test]
    fn release_builds_do_not_log_debug() {
        if cfg!(debug_assertions) {
            assert_eq!(log_level(), Level::Debug);
        } else {
            assert_eq!(log_level(), Level::Info);
        }
    }
}
