//! Count-up numbers: each `[data-count-up]` element animates from zero to
//! its target the first time it is at least half visible.

use crate::config::Settings;
use crate::dom::{parse_int, selectors, Dom};
use crate::scheduler::{Scheduler, Task};

pub const VISIBLE_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    target: i64,
    increment: f64,
    current: f64,
}

#[derive(Debug)]
pub struct Counters<N> {
    nodes: Vec<N>,
    runs: Vec<Option<Run>>,
}

impl<N: Clone> Counters<N> {
    pub fn new(nodes: Vec<N>) -> Self {
        let runs = vec![None; nodes.len()];
        Self { nodes, runs }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_running(&self, index: usize) -> bool {
        matches!(self.runs.get(index), Some(Some(_)))
    }

    /// Starts the animation for `index` when it crosses the visibility
    /// threshold for the first time. The `counted` class marks elements
    /// that already ran.
    pub fn observe<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        scheduler: &mut Scheduler,
        settings: &Settings,
        index: usize,
        ratio: f64,
    ) {
        let Some(node) = self.nodes.get(index).cloned() else {
            return;
        };
        if ratio < VISIBLE_RATIO || dom.has_class(&node, selectors::COUNTED) {
            return;
        }

        let target = dom
            .attribute(&node, selectors::COUNT_UP_ATTR)
            .and_then(|raw| parse_int(&raw))
            .unwrap_or(0);
        let frames = settings.count_up_duration_ms as f64 / settings.frame_ms.max(1) as f64;
        self.runs[index] = Some(Run {
            target,
            increment: target as f64 / frames,
            current: 0.0,
        });
        dom.add_class(&node, selectors::COUNTED);
        log::debug!("count-up {} started towards {}", index, target);

        self.step(dom, scheduler, settings, index);
    }

    /// One animation frame.
    pub fn step<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        scheduler: &mut Scheduler,
        settings: &Settings,
        index: usize,
    ) {
        let (Some(node), Some(slot)) = (self.nodes.get(index), self.runs.get_mut(index)) else {
            return;
        };
        let Some(run) = slot.as_mut() else {
            return;
        };

        run.current += run.increment;
        if run.current < run.target as f64 {
            dom.set_text(node, &(run.current.floor() as i64).to_string());
            scheduler.schedule(settings.frame_ms, Task::CounterFrame(index));
        } else {
            dom.set_text(node, &run.target.to_string());
            *slot = None;
        }
    }
}
