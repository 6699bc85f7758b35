//! Which handler runs for which `(source, event)` pair.
//!
//! The table is filled once at start-up from the elements that exist on the
//! page; a host installs one listener per row and forwards every event to
//! `PageController::dispatch`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    MenuToggle,
    /// Navigation link by its position among `.nav-link` elements.
    NavLink(usize),
    AcceptCookies,
    DeclineCookies,
    ContactForm,
    PollForm,
    ScrollTop,
    /// Count-up element by its position among `[data-count-up]` elements.
    Counter(usize),
    Window,
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Scroll,
    Resize,
    Online,
    Offline,
    /// Visibility change reported by an intersection observer.
    Intersect,
}

impl EventKind {
    /// DOM event type to listen for. `Intersect` has none.
    pub fn dom_name(&self) -> Option<&'static str> {
        match self {
            EventKind::Click => Some("click"),
            EventKind::Submit => Some("submit"),
            EventKind::Scroll => Some("scroll"),
            EventKind::Resize => Some("resize"),
            EventKind::Online => Some("online"),
            EventKind::Offline => Some("offline"),
            EventKind::Intersect => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    ToggleMenu,
    NavClick,
    AcceptCookies,
    DeclineCookies,
    SubmitContact,
    SubmitPoll,
    ScrollToTop,
    BackToTop,
    ScrollSpy,
    CloseOnResize,
    CloseOnOutsideClick,
    ConnectionRestored,
    ConnectionLost,
    CountUp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub source: Source,
    pub kind: EventKind,
    pub handlers: Vec<Handler>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    rows: Vec<Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `handler` after any handler already bound to the same pair.
    pub fn bind(&mut self, source: Source, kind: EventKind, handler: Handler) {
        match self
            .rows
            .iter_mut()
            .find(|row| row.source == source && row.kind == kind)
        {
            Some(row) => row.handlers.push(handler),
            None => self.rows.push(Binding {
                source,
                kind,
                handlers: vec![handler],
            }),
        }
    }

    pub fn handlers_for(&self, source: Source, kind: EventKind) -> &[Handler] {
        self.rows
            .iter()
            .find(|row| row.source == source && row.kind == kind)
            .map(|row| row.handlers.as_slice())
            .unwrap_or(&[])
    }

    pub fn rows(&self) -> &[Binding] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One browser event as the controller sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<N> {
    pub source: Source,
    pub kind: EventKind,
    /// Element the event started on, needed for outside-click detection.
    pub target: Option<N>,
    pub intersection_ratio: Option<f64>,
}

impl<N> Event<N> {
    pub fn new(source: Source, kind: EventKind) -> Self {
        Self {
            source,
            kind,
            target: None,
            intersection_ratio: None,
        }
    }

    pub fn click(source: Source) -> Self {
        Self::new(source, EventKind::Click)
    }

    pub fn document_click(target: N) -> Self {
        Self {
            target: Some(target),
            ..Self::new(Source::Document, EventKind::Click)
        }
    }

    pub fn submit(source: Source) -> Self {
        Self::new(source, EventKind::Submit)
    }

    pub fn window(kind: EventKind) -> Self {
        Self::new(Source::Window, kind)
    }

    pub fn intersect(counter: usize, ratio: f64) -> Self {
        Self {
            intersection_ratio: Some(ratio),
            ..Self::new(Source::Counter(counter), EventKind::Intersect)
        }
    }
}

/// What the host should do with the original browser event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub prevent_default: bool,
}

impl Outcome {
    pub fn prevented() -> Self {
        Self {
            prevent_default: true,
        }
    }

    pub fn merge(self, other: Outcome) -> Outcome {
        Outcome {
            prevent_default: self.prevent_default || other.prevent_default,
        }
    }
}
