//! Deferred tasks on browser timers.

use std::time::Duration;

use gloo_timers::callback::Timeout;

use super::document::WebDocument;
use crate::schedule::{DeferredTask, Scheduler};

/// Runs deferred tasks against the live page with `setTimeout`.
#[derive(Clone, Debug)]
pub(crate) struct BrowserScheduler {
    doc: WebDocument,
}

impl BrowserScheduler {
    pub(crate) const fn new(doc: WebDocument) -> Self {
        Self { doc }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, delay: Duration, task: DeferredTask) {
        let mut scheduler = self.clone();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            if let Some((delay, follow_up)) = task.run(&mut scheduler.doc) {
                scheduler.schedule(delay, follow_up);
            }
        })
        .forget();
    }
}
