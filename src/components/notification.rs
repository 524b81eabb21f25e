use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::debug;
use yew::prelude::*;

use crate::config;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    #[default]
    Info,
}

impl NoticeKind {
    pub fn class(&self) -> &'static str {
        match self {
            NoticeKind::Success => "notification-success",
            NoticeKind::Error => "notification-error",
            NoticeKind::Info => "notification-info",
        }
    }
}

/// Entering: in the page but still off-screen. Leaving: sliding out, removed next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticePhase {
    Entering,
    Visible,
    Leaving,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
    pub phase: NoticePhase,
}

impl Notice {
    pub fn new(id: u64, message: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            id,
            message: message.into(),
            kind,
            phase: NoticePhase::Entering,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum NoticeAction {
    Push(Notice),
    Reveal(u64),
    Hide(u64),
    Remove(u64),
}

/// The single notification slot. Timed actions carry the id of the notice
/// that scheduled them and do nothing once that notice has been replaced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoticeSlot {
    pub current: Option<Notice>,
}

impl NoticeSlot {
    fn holds(&self, id: u64) -> bool {
        self.current.as_ref().map_or(false, |n| n.id == id)
    }

    /// Moves the current notice to `phase`, or drops it when `phase` is None.
    fn advance(self: Rc<Self>, id: u64, phase: Option<NoticePhase>) -> Rc<Self> {
        if !self.holds(id) {
            return self;
        }
        let current = match phase {
            Some(phase) => self.current.clone().map(|n| Notice { phase, ..n }),
            None => None,
        };
        Rc::new(NoticeSlot { current })
    }
}

impl Reducible for NoticeSlot {
    type Action = NoticeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            NoticeAction::Push(notice) => Rc::new(NoticeSlot { current: Some(notice) }),
            NoticeAction::Reveal(id) => self.advance(id, Some(NoticePhase::Visible)),
            NoticeAction::Hide(id) => self.advance(id, Some(NoticePhase::Leaving)),
            NoticeAction::Remove(id) => self.advance(id, None),
        }
    }
}

/// Timed follow-ups for notice `id`, as (delay in ms from the push, action).
/// Removal lands one exit transition after hiding starts.
pub fn schedule(id: u64) -> [(u32, NoticeAction); 3] {
    [
        (config::NOTICE_REVEAL_DELAY, NoticeAction::Reveal(id)),
        (config::NOTICE_DWELL, NoticeAction::Hide(id)),
        (config::NOTICE_DWELL + config::NOTICE_EXIT, NoticeAction::Remove(id)),
    ]
}

/// Handle for raising notifications, shared through context.
#[derive(Clone)]
pub struct Notifier {
    dispatcher: UseReducerDispatcher<NoticeSlot>,
    next_id: Rc<Cell<u64>>,
}

impl PartialEq for Notifier {
    fn eq(&self, other: &Self) -> bool {
        self.dispatcher == other.dispatcher && Rc::ptr_eq(&self.next_id, &other.next_id)
    }
}

impl Notifier {
    /// Replaces whatever is showing and schedules reveal, hide and removal.
    pub fn notify(&self, message: impl Into<String>, kind: NoticeKind) {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let message = message.into();
        debug!("notification #{} ({:?}): {}", id, kind, message);

        self.dispatcher.dispatch(NoticeAction::Push(Notice::new(id, message, kind)));

        for (delay, action) in schedule(id) {
            let dispatcher = self.dispatcher.clone();
            Timeout::new(delay, move || dispatcher.dispatch(action)).forget();
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(message, NoticeKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(message, NoticeKind::Error);
    }
}

#[hook]
pub fn use_notifier() -> Option<Notifier> {
    use_context::<Notifier>()
}

#[derive(Properties, PartialEq)]
pub struct NotificationHostProps {
    #[prop_or_default]
    pub children: Children,
}

/// Owns the notification slot, provides a `Notifier` to its children and
/// renders the current toast.
#[function_component(NotificationHost)]
pub fn notification_host(props: &NotificationHostProps) -> Html {
    let slot = use_reducer(NoticeSlot::default);
    let next_id = use_state(|| Rc::new(Cell::new(0u64)));

    let notifier = Notifier {
        dispatcher: slot.dispatcher(),
        next_id: (*next_id).clone(),
    };

    let toast = match &slot.current {
        Some(notice) => {
            let shown = (notice.phase == NoticePhase::Visible).then(|| "show");
            html! {
                <div key={notice.id.to_string()} class={classes!("notification", notice.kind.class(), shown)}>
                    {notice.message.clone()}
                </div>
            }
        }
        None => html! {},
    };

    html! {
        <ContextProvider<Notifier> context={notifier}>
            <style>
                {r#"
                    .notification {
                        position: fixed;
                        top: 100px;
                        right: 20px;
                        padding: 1rem 1.5rem;
                        border-radius: 10px;
                        color: white;
                        font-weight: 600;
                        z-index: 10001;
                        transform: translateX(400px);
                        transition: transform 0.3s ease;
                        max-width: 300px;
                        box-shadow: 0 10px 30px rgba(0, 0, 0, 0.2);
                    }
                    .notification-success {
                        background: linear-gradient(135deg, #4CAF50, #45a049);
                    }
                    .notification-error {
                        background: linear-gradient(135deg, #f44336, #da190b);
                    }
                    .notification-info {
                        background: linear-gradient(135deg, #FF6B35, #e55a2b);
                    }
                    .notification.show {
                        transform: translateX(0);
                    }
                "#}
            </style>
            { for props.children.iter() }
            { toast }
        </ContextProvider<Notifier>>
    }
}
