use log::{debug, error, info, warn};
use web_sys::Element;
use yew::prelude::*;

mod config;
mod contact;
mod dom;
mod error;
mod nav;
mod page;
mod reveal;
mod request;
mod components {
    pub mod modal;
    pub mod notification;
}

use components::{
    modal::{ModalHandle, ModalState, TestToolModal},
    notification::{use_notifier, NotificationHost, Notifier},
};
use dom::BindingSet;
use error::SiteError;

/// Collects every page binding. A feature whose setup fails is logged and
/// left out so the rest of the page keeps working.
fn page_bindings(document: &web_sys::Document, notifier: Notifier, modal: ModalHandle) -> BindingSet {
    let menu = nav::menu_bindings(document).unwrap_or_else(|e| {
        warn!("mobile menu disabled: {}", e);
        BindingSet::new()
    });
    let load = page::load_bindings(document).unwrap_or_else(|e| {
        warn!("load marker disabled: {}", e);
        BindingSet::new()
    });

    menu.extend(nav::smooth_scroll_bindings())
        .extend(nav::active_link_bindings())
        .extend(contact::contact_bindings(notifier))
        .extend(page::test_tool_bindings(modal))
        .extend(load)
}

fn wire_page(notifier: Notifier, modal: ModalHandle) -> Result<(), SiteError> {
    let document = dom::document()?;

    let bindings = page_bindings(&document, notifier, modal);
    debug!("page bindings: {:?}", bindings.names());
    let attached = bindings.attach(&document)?;
    info!("attached {} listeners", attached);

    if let Err(e) = nav::update_active_link() {
        warn!("initial active link: {}", e);
    }

    match reveal::observe(&document) {
        Ok(watched) => debug!("fade-in watching {} elements", watched),
        Err(e) => warn!("scroll animations disabled: {}", e),
    }
    Ok(())
}

#[function_component(Overlay)]
fn overlay() -> Html {
    let modal = use_reducer(ModalState::default);
    let notifier = use_notifier();

    {
        let handle = ModalHandle::new(modal.dispatcher());
        use_effect_with_deps(
            move |_| {
                match notifier {
                    Some(notifier) => {
                        if let Err(e) = wire_page(notifier, handle) {
                            error!("page wiring failed: {}", e);
                        }
                    }
                    None => error!("overlay mounted outside the notification host"),
                }
                || ()
            },
            (), // Wire once; bindings live as long as the page
        );
    }

    html! { <TestToolModal state={modal} /> }
}

#[function_component]
fn App() -> Html {
    html! {
        <NotificationHost>
            <Overlay />
        </NotificationHost>
    }
}

/// Container for the modal and toasts, appended to the static page body.
fn overlay_root() -> Result<Element, SiteError> {
    let document = dom::document()?;
    let root = document.create_element("div")?;
    root.set_id(config::OVERLAY_ROOT_ID);
    dom::body()?.append_child(&root)?;
    Ok(root)
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");
    gloo_console::log!(page::WELCOME);

    match overlay_root() {
        Ok(root) => {
            info!("Starting interaction layer");
            yew::Renderer::<App>::with_root(root).render();
        }
        Err(e) => error!("cannot mount overlay: {}", e),
    }
}
