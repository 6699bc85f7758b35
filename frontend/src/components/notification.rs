use std::collections::BTreeMap;

use crate::dom::{selectors, Dom};
use crate::scheduler::{Scheduler, Task};

pub const OFFLINE_AT_START: &str = "Keine Internetverbindung. Bitte versuchen Sie es später erneut.";
pub const CONNECTION_RESTORED: &str = "Verbindung wiederhergestellt";
pub const CONNECTION_LOST: &str = "Verbindung unterbrochen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoticeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
}

impl NoticeKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            NoticeKind::Info => "alert alert-info",
            NoticeKind::Success => "alert alert-success",
            NoticeKind::Warning => "alert alert-warning",
        }
    }
}

/// Alerts currently on the page, each removed again after a fixed lifetime.
#[derive(Debug)]
pub struct Notices<N> {
    next_id: u64,
    live: BTreeMap<NoticeId, N>,
}

impl<N: Clone> Notices<N> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            live: BTreeMap::new(),
        }
    }

    /// Puts an alert at the top of `.container`. Without a container nothing
    /// is shown and nothing is scheduled.
    pub fn show<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        scheduler: &mut Scheduler,
        lifetime_ms: u64,
        message: &str,
        kind: NoticeKind,
    ) -> Option<NoticeId> {
        let host = dom.query(selectors::NOTICE_HOST)?;

        let node = dom.create_element("div");
        dom.set_attribute(&node, "class", kind.class_name());
        dom.set_attribute(&node, "role", "alert");
        dom.set_text(&node, message);
        dom.prepend_child(&host, &node);

        let id = NoticeId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, node);
        scheduler.schedule(lifetime_ms, Task::DismissNotice(id));
        log::debug!("notice {:?} shown: {}", id, message);
        Some(id)
    }

    pub fn dismiss<D: Dom<Node = N>>(&mut self, dom: &mut D, id: NoticeId) {
        if let Some(node) = self.live.remove(&id) {
            dom.remove(&node);
        }
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }
}

impl<N: Clone> Default for Notices<N> {
    fn default() -> Self {
        Self::new()
    }
}
