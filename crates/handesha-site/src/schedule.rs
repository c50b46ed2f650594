//! Fire-and-forget timers expressed as data.
//!
//! # Design
//! - A delayed effect is a [`DeferredTask`]; running one against a page may
//!   yield a follow-up task.
//! - Hosts own the clock: the browser schedules with `gloo-timers`, native
//!   hosts and tests drive a [`ManualScheduler`].

use std::time::Duration;

use tracing::debug;

use crate::dom::{Document, classes, ids};
use crate::membership::NOTICE_ID;

/// Delayed page effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredTask {
    /// Hide the startup overlay.
    HideLoadingOverlay,
    /// Hide the contact form success banner.
    HideFormSuccess,
    /// Start fading the membership notice; removal follows after `remove_after`.
    FadeNotice {
        /// Delay between fade start and removal.
        remove_after: Duration,
    },
    /// Remove the membership notice if it is still attached.
    RemoveNotice,
}

impl DeferredTask {
    /// Apply the effect. Returns a follow-up task to schedule, if any.
    pub fn run<D: Document>(self, doc: &mut D) -> Option<(Duration, Self)> {
        match self {
            Self::HideLoadingOverlay => {
                hide(doc, ids::LOADING_OVERLAY);
                None
            }
            Self::HideFormSuccess => {
                hide(doc, ids::FORM_SUCCESS);
                None
            }
            Self::FadeNotice { remove_after } => {
                let notice = doc.element_by_id(NOTICE_ID)?;
                doc.set_style(&notice, "opacity", "0");
                doc.set_style(&notice, "transform", "translateX(100%)");
                Some((remove_after, Self::RemoveNotice))
            }
            Self::RemoveNotice => {
                if let Some(notice) = doc.element_by_id(NOTICE_ID) {
                    doc.remove(&notice);
                }
                None
            }
        }
    }
}

fn hide<D: Document>(doc: &mut D, id: &str) {
    match doc.element_by_id(id) {
        Some(node) => doc.set_class(&node, classes::HIDDEN, true),
        None => debug!(id, "element missing; nothing to hide"),
    }
}

/// Accepts delayed tasks.
pub trait Scheduler {
    /// Run `task` once `delay` has elapsed. Not cancellable.
    fn schedule(&mut self, delay: Duration, task: DeferredTask);
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    due: Duration,
    seq: u64,
    task: DeferredTask,
}

/// Scheduler driven by an explicit virtual clock.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_seq: u64,
    queue: Vec<Pending>,
}

impl ManualScheduler {
    /// Empty queue at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed so far.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.now
    }

    /// Tasks waiting to run.
    #[must_use]
    pub fn pending(&self) -> Vec<DeferredTask> {
        let mut queue = self.queue.clone();
        queue.sort_by_key(|pending| (pending.due, pending.seq));
        queue.into_iter().map(|pending| pending.task).collect()
    }

    /// Advance the clock by `by`, running due tasks in order against `doc`.
    /// Follow-ups that fall due inside the window run too. Returns the number
    /// of tasks run.
    pub fn advance<D: Document>(&mut self, by: Duration, doc: &mut D) -> usize {
        let target = self.now + by;
        let mut ran = 0;
        while let Some(index) = self.next_due(target) {
            let pending = self.queue.remove(index);
            self.now = pending.due;
            if let Some((delay, follow_up)) = pending.task.run(doc) {
                self.schedule(delay, follow_up);
            }
            ran += 1;
        }
        self.now = target;
        ran
    }

    fn next_due(&self, target: Duration) -> Option<usize> {
        self.queue
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= target)
            .min_by_key(|(_, pending)| (pending.due, pending.seq))
            .map(|(index, _)| index)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, task: DeferredTask) {
        self.queue.push(Pending {
            due: self.now + delay,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    #[test]
    fn overlay_hides_only_after_delay() {
        let mut doc = MemoryDocument::new();
        let body = doc.body_node();
        let overlay = doc.element_with_id(body, "div", ids::LOADING_OVERLAY);
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::from_millis(500), DeferredTask::HideLoadingOverlay);

        assert_eq!(scheduler.advance(Duration::from_millis(499), &mut doc), 0);
        assert!(!doc.has_class(&overlay, classes::HIDDEN));
        assert_eq!(scheduler.advance(Duration::from_millis(1), &mut doc), 1);
        assert!(doc.has_class(&overlay, classes::HIDDEN));
    }

    #[test]
    fn fade_schedules_removal() {
        let mut doc = MemoryDocument::new();
        let body = doc.body_node();
        let notice = doc.element_with_id(body, "div", NOTICE_ID);
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(
            Duration::from_secs(8),
            DeferredTask::FadeNotice {
                remove_after: Duration::from_millis(500),
            },
        );

        scheduler.advance(Duration::from_secs(8), &mut doc);
        assert_eq!(doc.style(notice, "opacity"), Some("0"));
        assert_eq!(scheduler.pending(), vec![DeferredTask::RemoveNotice]);
        scheduler.advance(Duration::from_millis(500), &mut doc);
        assert!(!doc.is_attached(&notice));
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn fade_without_notice_is_a_no_op() {
        let mut doc = MemoryDocument::new();
        let follow_up = DeferredTask::FadeNotice {
            remove_after: Duration::from_millis(500),
        }
        .run(&mut doc);
        assert_eq!(follow_up, None);
        assert_eq!(doc.writes(), 0);
    }

    #[test]
    fn tasks_run_in_due_order() {
        let mut doc = MemoryDocument::new();
        let body = doc.body_node();
        let banner = doc.element_with_id(body, "div", ids::FORM_SUCCESS);
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::from_secs(5), DeferredTask::HideFormSuccess);
        scheduler.schedule(Duration::from_millis(500), DeferredTask::HideLoadingOverlay);
        assert_eq!(
            scheduler.pending(),
            vec![DeferredTask::HideLoadingOverlay, DeferredTask::HideFormSuccess]
        );
        assert_eq!(scheduler.advance(Duration::from_secs(10), &mut doc), 2);
        assert!(doc.has_class(&banner, classes::HIDDEN));
        assert_eq!(scheduler.elapsed(), Duration::from_secs(10));
    }
}
