use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen_futures::spawn_local;
use web_sys::{EventTarget, HtmlInputElement, KeyboardEvent};
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::components::notification::use_notifier;
use crate::config;
use crate::dom;
use crate::request::SimulatedRequest;

const SUBMIT_IDLE: &str = "Commencer l'essai gratuit";
const SUBMIT_BUSY: &str = "Préparation de votre démo...";
const DEMO_READY: &str = "Démo préparée ! Vous recevrez un email avec les instructions.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    /// Displayed, waiting one tick so the enter transition can play.
    Opening,
    Open,
    /// Exit transition playing; still displayed.
    Closing,
}

pub enum ModalAction {
    Open,
    Shown,
    Close,
    Hidden,
    SubmitStarted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModalState {
    pub phase: ModalPhase,
    /// Set by the first open; the markup stays in the page afterwards.
    pub mounted: bool,
    pub submitting: bool,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            phase: ModalPhase::Closed,
            mounted: false,
            submitting: false,
        }
    }
}

impl ModalState {
    /// Page scroll is frozen from the moment the modal opens until it has fully closed.
    pub fn locks_scroll(&self) -> bool {
        self.phase != ModalPhase::Closed
    }

    /// Body scroll setting to apply, or None before the first open so the
    /// page's own inline style is left alone.
    pub fn scroll_lock(&self) -> Option<bool> {
        self.mounted.then(|| self.locks_scroll())
    }

    /// Inline display for the backdrop, or None while nothing is rendered.
    pub fn display_style(&self) -> Option<&'static str> {
        if !self.mounted {
            return None;
        }
        Some(match self.phase {
            ModalPhase::Closed => "display: none;",
            _ => "display: flex;",
        })
    }
}

impl Reducible for ModalState {
    type Action = ModalAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match (action, self.phase) {
            (ModalAction::Open, ModalPhase::Closed | ModalPhase::Closing) => {
                next.mounted = true;
                next.phase = ModalPhase::Opening;
            }
            (ModalAction::Shown, ModalPhase::Opening) => next.phase = ModalPhase::Open,
            (ModalAction::Close, ModalPhase::Open | ModalPhase::Opening) => {
                next.phase = ModalPhase::Closing;
            }
            (ModalAction::Hidden, ModalPhase::Closing) => {
                next.phase = ModalPhase::Closed;
                next.submitting = false;
            }
            (ModalAction::SubmitStarted, ModalPhase::Open) if !self.submitting => {
                next.submitting = true;
            }
            _ => return self,
        }
        Rc::new(next)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DemoFormError {
    #[error("Veuillez remplir tous les champs")]
    Incomplete,
}

/// Contact details captured by the demo form.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DemoLead {
    pub email: String,
    pub company: String,
}

impl DemoLead {
    /// Both fields must be non-empty. The email format is not checked.
    pub fn parse(email: String, company: String) -> Result<Self, DemoFormError> {
        if email.is_empty() || company.is_empty() {
            return Err(DemoFormError::Incomplete);
        }
        Ok(Self { email, company })
    }
}

#[derive(Debug, PartialEq)]
pub enum SubmitPlan {
    /// Closed, or a submission is already running.
    Ignore,
    Reject(DemoFormError),
    Send(DemoLead),
}

pub fn plan_submit(state: &ModalState, email: String, company: String) -> SubmitPlan {
    if state.phase != ModalPhase::Open || state.submitting {
        return SubmitPlan::Ignore;
    }
    match DemoLead::parse(email, company) {
        Ok(lead) => SubmitPlan::Send(lead),
        Err(e) => SubmitPlan::Reject(e),
    }
}

/// Cloneable handle the page bindings use to drive the modal.
#[derive(Clone, PartialEq)]
pub struct ModalHandle {
    dispatcher: UseReducerDispatcher<ModalState>,
}

impl ModalHandle {
    pub fn new(dispatcher: UseReducerDispatcher<ModalState>) -> Self {
        Self { dispatcher }
    }

    pub fn open(&self) {
        self.dispatcher.dispatch(ModalAction::Open);
    }
}

/// A backdrop click is one whose target is the backdrop itself, not
/// anything inside the content box.
pub fn is_backdrop_click<T: PartialEq>(target: Option<&T>, backdrop: Option<&T>) -> bool {
    matches!((target, backdrop), (Some(t), Some(b)) if t == b)
}

fn set_body_scroll(locked: bool) {
    let overflow = if locked { "hidden" } else { "" };
    match dom::body() {
        Ok(body) => {
            if let Err(e) = body.style().set_property("overflow", overflow) {
                warn!("cannot toggle page scroll: {:?}", e);
            }
        }
        Err(e) => warn!("cannot toggle page scroll: {}", e),
    }
}

#[derive(Properties, PartialEq)]
pub struct TestToolModalProps {
    pub state: UseReducerHandle<ModalState>,
}

#[function_component(TestToolModal)]
pub fn test_tool_modal(props: &TestToolModalProps) -> Html {
    let state = props.state.clone();
    let notifier = use_notifier();
    let email_ref = use_node_ref();
    let company_ref = use_node_ref();
    let backdrop_ref = use_node_ref();

    // Phase timers and scroll lock. Dropping the pending timeout on the next
    // phase change cancels it. Body scroll is left alone until the first open.
    {
        let dispatcher = state.dispatcher();
        let scroll_lock = state.scroll_lock();
        use_effect_with_deps(
            move |phase: &ModalPhase| {
                if let Some(locked) = scroll_lock {
                    set_body_scroll(locked);
                }
                let pending = match phase {
                    ModalPhase::Opening => Some(Timeout::new(config::MODAL_ENTER_DELAY, move || {
                        dispatcher.dispatch(ModalAction::Shown);
                    })),
                    ModalPhase::Closing => Some(Timeout::new(config::MODAL_EXIT, move || {
                        dispatcher.dispatch(ModalAction::Hidden);
                    })),
                    ModalPhase::Open | ModalPhase::Closed => None,
                };
                move || drop(pending)
            },
            state.phase,
        );
    }

    {
        let dispatcher = state.dispatcher();
        use_event_with_window("keydown", move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                dispatcher.dispatch(ModalAction::Close);
            }
        });
    }

    let on_close = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(ModalAction::Close))
    };

    // Yew delegates events from the overlay root, so current_target is never
    // the backdrop; compare against the node itself.
    let on_backdrop = {
        let dispatcher = state.dispatcher();
        let backdrop_ref = backdrop_ref.clone();
        Callback::from(move |e: MouseEvent| {
            let backdrop = backdrop_ref.get().map(EventTarget::from);
            if is_backdrop_click(e.target().as_ref(), backdrop.as_ref()) {
                dispatcher.dispatch(ModalAction::Close);
            }
        })
    };

    let on_submit = {
        let state = state.clone();
        let email_ref = email_ref.clone();
        let company_ref = company_ref.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let read = |r: &NodeRef| {
                r.cast::<HtmlInputElement>()
                    .map(|input| input.value())
                    .unwrap_or_default()
            };

            match plan_submit(&state, read(&email_ref), read(&company_ref)) {
                SubmitPlan::Ignore => {}
                SubmitPlan::Reject(err) => {
                    if let Some(notifier) = &notifier {
                        notifier.error(err.to_string());
                    }
                }
                SubmitPlan::Send(lead) => {
                    state.dispatch(ModalAction::SubmitStarted);
                    let dispatcher = state.dispatcher();
                    let notifier = notifier.clone();
                    spawn_local(async move {
                        if let Err(e) = SimulatedRequest::default().send("/demo", &lead).await {
                            warn!("demo request failed: {}", e);
                        }
                        info!("demo prepared for {}", lead.company);
                        if let Some(notifier) = notifier {
                            notifier.success(DEMO_READY);
                        }
                        dispatcher.dispatch(ModalAction::Close);
                    });
                }
            }
        })
    };

    let Some(display) = state.display_style() else {
        return html! {};
    };
    let shown = (state.phase == ModalPhase::Open).then(|| "show");
    let submit_label = if state.submitting { SUBMIT_BUSY } else { SUBMIT_IDLE };

    html! {
        <>
            <style>
                {r#"
                    .modal {
                        display: none;
                        position: fixed;
                        z-index: 10000;
                        left: 0;
                        top: 0;
                        width: 100%;
                        height: 100%;
                        background-color: rgba(0, 0, 0, 0.8);
                        justify-content: center;
                        align-items: center;
                        opacity: 0;
                        transition: opacity 0.3s ease;
                    }
                    .modal.show {
                        opacity: 1;
                    }
                    .modal-content {
                        background: white;
                        border-radius: 20px;
                        max-width: 500px;
                        width: 90%;
                        max-height: 90vh;
                        overflow-y: auto;
                        transform: scale(0.7);
                        transition: transform 0.3s ease;
                    }
                    .modal.show .modal-content {
                        transform: scale(1);
                    }
                    .modal-header {
                        padding: 2rem 2rem 1rem;
                        display: flex;
                        justify-content: space-between;
                        align-items: center;
                        border-bottom: 1px solid #eee;
                    }
                    .modal-header h2 {
                        color: #1a1a1a;
                        font-size: 1.5rem;
                        margin: 0;
                    }
                    .modal-close {
                        font-size: 2rem;
                        cursor: pointer;
                        color: #999;
                        transition: color 0.3s ease;
                    }
                    .modal-close:hover {
                        color: #FF6B35;
                    }
                    .modal-body {
                        padding: 2rem;
                    }
                    .modal-body p {
                        color: #666;
                        margin-bottom: 2rem;
                        font-size: 1.1rem;
                    }
                    .demo-features {
                        margin-bottom: 2rem;
                    }
                    .feature-item {
                        display: flex;
                        align-items: center;
                        gap: 1rem;
                        margin-bottom: 1rem;
                        padding: 0.5rem;
                    }
                    .feature-icon {
                        font-size: 1.5rem;
                    }
                    .demo-form {
                        display: flex;
                        flex-direction: column;
                        gap: 1rem;
                    }
                    .demo-input {
                        padding: 1rem;
                        border: 2px solid #eee;
                        border-radius: 10px;
                        font-size: 1rem;
                        transition: border-color 0.3s ease;
                    }
                    .demo-input:focus {
                        outline: none;
                        border-color: #FF6B35;
                    }
                    .demo-submit {
                        margin-top: 1rem;
                    }
                "#}
            </style>
            <div id="testToolModal" ref={backdrop_ref} class={classes!("modal", shown)} style={display} onclick={on_backdrop}>
                <div class="modal-content">
                    <div class="modal-header">
                        <h2>{"Tester notre outil ATPERF"}</h2>
                        <span class="modal-close" onclick={on_close}>{"×"}</span>
                    </div>
                    <div class="modal-body">
                        <p>{"Découvrez la puissance de notre plateforme de monitoring de performance !"}</p>
                        <div class="demo-features">
                            <div class="feature-item">
                                <span class="feature-icon">{"📊"}</span>
                                <span>{"Monitoring en temps réel"}</span>
                            </div>
                            <div class="feature-item">
                                <span class="feature-icon">{"⚡"}</span>
                                <span>{"Optimisation automatique"}</span>
                            </div>
                            <div class="feature-item">
                                <span class="feature-icon">{"🔍"}</span>
                                <span>{"Analyses approfondies"}</span>
                            </div>
                        </div>
                        <div class="demo-form">
                            <input ref={email_ref} type="email" placeholder="Votre email professionnel" class="demo-input" required=true />
                            <input ref={company_ref} type="text" placeholder="Nom de votre entreprise" class="demo-input" required=true />
                            <button class="btn btn-primary btn-large demo-submit" disabled={state.submitting} onclick={on_submit}>
                                {submit_label}
                            </button>
                        </div>
                    </div>
                </div>
            </div>
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(actions: Vec<ModalAction>) -> ModalState {
        actions
            .into_iter()
            .fold(Rc::new(ModalState::default()), |s, a| s.reduce(a))
            .as_ref()
            .clone()
    }

    fn opened() -> ModalState {
        run(vec![ModalAction::Open, ModalAction::Shown])
    }

    #[test]
    fn starts_closed_and_unmounted() {
        let state = ModalState::default();
        assert_eq!(state.phase, ModalPhase::Closed);
        assert!(!state.mounted);
        assert!(!state.locks_scroll());
    }

    #[test]
    fn open_goes_through_opening() {
        let state = run(vec![ModalAction::Open]);
        assert_eq!(state.phase, ModalPhase::Opening);
        assert!(state.locks_scroll());
        assert_eq!(opened().phase, ModalPhase::Open);
    }

    #[test]
    fn reopening_reuses_the_mounted_modal() {
        let state = run(vec![
            ModalAction::Open,
            ModalAction::Shown,
            ModalAction::Close,
            ModalAction::Hidden,
            ModalAction::Open,
            ModalAction::Shown,
        ]);
        assert_eq!(state.phase, ModalPhase::Open);
        assert!(state.mounted);
        assert_eq!(state.display_style(), Some("display: flex;"));
    }

    #[test]
    fn nothing_renders_before_the_first_open() {
        assert_eq!(ModalState::default().display_style(), None);
        let closed = run(vec![
            ModalAction::Open,
            ModalAction::Shown,
            ModalAction::Close,
            ModalAction::Hidden,
        ]);
        // Closed again but kept in the page, only hidden.
        assert_eq!(closed.display_style(), Some("display: none;"));
    }

    #[test]
    fn only_clicks_on_the_backdrop_itself_close() {
        let backdrop = "modal";
        let content = "modal-content";
        assert!(is_backdrop_click(Some(&backdrop), Some(&backdrop)));
        assert!(!is_backdrop_click(Some(&content), Some(&backdrop)));
        assert!(!is_backdrop_click(None, Some(&backdrop)));
        assert!(!is_backdrop_click(Some(&backdrop), None));
    }

    #[test]
    fn scroll_stays_locked_until_fully_closed() {
        let closing = run(vec![ModalAction::Open, ModalAction::Shown, ModalAction::Close]);
        assert_eq!(closing.phase, ModalPhase::Closing);
        assert!(closing.locks_scroll());

        let closed = run(vec![
            ModalAction::Open,
            ModalAction::Shown,
            ModalAction::Close,
            ModalAction::Hidden,
        ]);
        assert!(!closed.locks_scroll());
        assert_eq!(closed.scroll_lock(), Some(false));
        assert!(closed.mounted);
    }

    #[test]
    fn page_scroll_is_untouched_until_first_open() {
        assert_eq!(ModalState::default().scroll_lock(), None);
        assert_eq!(run(vec![ModalAction::Open]).scroll_lock(), Some(true));
    }

    #[test]
    fn close_while_closed_is_ignored() {
        let state = Rc::new(ModalState::default());
        let after = state.clone().reduce(ModalAction::Close);
        assert!(Rc::ptr_eq(&state, &after));
    }

    #[test]
    fn open_during_exit_transition_reopens() {
        let state = run(vec![
            ModalAction::Open,
            ModalAction::Shown,
            ModalAction::Close,
            ModalAction::Open,
        ]);
        assert_eq!(state.phase, ModalPhase::Opening);
        // The exit timer of the interrupted close must not shut it again.
        let state = Rc::new(state).reduce(ModalAction::Hidden);
        assert_eq!(state.phase, ModalPhase::Opening);
    }

    #[test]
    fn valid_demo_submit_is_sent() {
        let plan = plan_submit(&opened(), "a@b.c".into(), "ACME".into());
        assert_eq!(
            plan,
            SubmitPlan::Send(DemoLead {
                email: "a@b.c".into(),
                company: "ACME".into(),
            })
        );
    }

    #[test]
    fn missing_field_is_rejected_and_modal_stays_open() {
        let state = opened();
        assert_eq!(
            plan_submit(&state, "".into(), "ACME".into()),
            SubmitPlan::Reject(DemoFormError::Incomplete)
        );
        assert_eq!(
            plan_submit(&state, "a@b.c".into(), "".into()),
            SubmitPlan::Reject(DemoFormError::Incomplete)
        );
        assert_eq!(state.phase, ModalPhase::Open);
    }

    #[test]
    fn rejection_message_is_user_facing() {
        assert_eq!(DemoFormError::Incomplete.to_string(), "Veuillez remplir tous les champs");
    }

    #[test]
    fn email_format_is_not_checked() {
        assert!(DemoLead::parse("not-an-email".into(), "ACME".into()).is_ok());
    }

    #[test]
    fn submit_runs_once_then_closes_and_resets() {
        let submitting = Rc::new(opened()).reduce(ModalAction::SubmitStarted);
        assert!(submitting.submitting);
        assert_eq!(
            plan_submit(&submitting, "a@b.c".into(), "ACME".into()),
            SubmitPlan::Ignore
        );

        let closed = submitting
            .reduce(ModalAction::Close)
            .reduce(ModalAction::Hidden);
        assert_eq!(closed.phase, ModalPhase::Closed);
        assert!(!closed.submitting);
    }

    #[test]
    fn submit_is_ignored_unless_open() {
        assert_eq!(
            plan_submit(&ModalState::default(), "a@b.c".into(), "ACME".into()),
            SubmitPlan::Ignore
        );
    }
}
