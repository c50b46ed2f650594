//! Small page behaviors: mobile menu, contact form, navbar shadow, reveal.

use tracing::debug;

use crate::dom::{Document, classes, ids};
use crate::schedule::{DeferredTask, Scheduler};

/// Class added to `<nav>` once the page has scrolled.
pub const NAV_SHADOW_CLASS: &str = "shadow-md";
/// Scroll offset past which the navbar gets its shadow.
pub const NAV_SHADOW_OFFSET: f64 = 50.0;
/// Class marking scroll-revealed sections.
pub const REVEAL_CLASS: &str = "reveal";
/// Distance from the viewport bottom at which a section is revealed.
pub const REVEAL_MARGIN: f64 = 100.0;

/// Toggle the mobile menu. Returns whether it is now open.
pub fn toggle_mobile_menu<D: Document>(doc: &mut D) -> Option<bool> {
    let menu = doc.element_by_id(ids::MOBILE_MENU)?;
    let hidden = doc.toggle_class(&menu, classes::HIDDEN);
    Some(!hidden)
}

/// Close the mobile menu after one of its links was followed.
pub fn close_mobile_menu<D: Document>(doc: &mut D) {
    if let Some(menu) = doc.element_by_id(ids::MOBILE_MENU) {
        doc.set_class(&menu, classes::HIDDEN, true);
    }
}

/// Links inside the mobile menu, for hosts that wire per-link handlers.
pub fn mobile_menu_links<D: Document>(doc: &D) -> Vec<D::Node> {
    doc.element_by_id(ids::MOBILE_MENU)
        .map(|menu| doc.descendants_by_tag(&menu, "a"))
        .unwrap_or_default()
}

/// Show the contact success banner and hide it again after `visible_for`.
pub fn on_contact_submit<D: Document>(
    doc: &mut D,
    scheduler: &mut dyn Scheduler,
    visible_for: std::time::Duration,
) {
    let Some(banner) = doc.element_by_id(ids::FORM_SUCCESS) else {
        debug!("contact success banner missing");
        return;
    };
    doc.set_class(&banner, classes::HIDDEN, false);
    scheduler.schedule(visible_for, DeferredTask::HideFormSuccess);
}

/// Add or drop the navbar shadow for the current scroll offset.
pub fn update_navbar_shadow<D: Document>(doc: &mut D, scroll_y: f64) {
    if let Some(nav) = doc.first_by_tag("nav") {
        doc.set_class(&nav, NAV_SHADOW_CLASS, scroll_y > NAV_SHADOW_OFFSET);
    }
}

/// Mark every `.reveal` section near the viewport as active. Sections are
/// never un-revealed. Returns how many were newly revealed.
pub fn reveal_sections<D: Document>(doc: &mut D, viewport_height: f64) -> usize {
    let mut revealed = 0;
    for node in doc.elements_with_class(REVEAL_CLASS) {
        if doc.has_class(&node, classes::ACTIVE) {
            continue;
        }
        let Some(top) = doc.viewport_top(&node) else {
            continue;
        };
        if top < viewport_height - REVEAL_MARGIN {
            doc.set_class(&node, classes::ACTIVE, true);
            revealed += 1;
        }
    }
    revealed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use crate::schedule::ManualScheduler;
    use std::time::Duration;

    #[test]
    fn menu_toggles_and_closes() {
        let mut doc = MemoryDocument::new();
        let body = doc.body_node();
        let menu = doc.element_with_id(body, "div", ids::MOBILE_MENU);
        doc.seed_class(menu, classes::HIDDEN);
        doc.element(menu, "a");
        doc.element(menu, "a");

        assert_eq!(toggle_mobile_menu(&mut doc), Some(true));
        assert_eq!(mobile_menu_links(&doc).len(), 2);
        close_mobile_menu(&mut doc);
        assert!(doc.has_class(&menu, classes::HIDDEN));
        assert_eq!(toggle_mobile_menu(&mut MemoryDocument::new()), None);
    }

    #[test]
    fn contact_banner_hides_after_delay() {
        let mut doc = MemoryDocument::new();
        let body = doc.body_node();
        let banner = doc.element_with_id(body, "div", ids::FORM_SUCCESS);
        doc.seed_class(banner, classes::HIDDEN);
        let mut scheduler = ManualScheduler::new();

        on_contact_submit(&mut doc, &mut scheduler, Duration::from_secs(5));
        assert!(!doc.has_class(&banner, classes::HIDDEN));
        scheduler.advance(Duration::from_secs(5), &mut doc);
        assert!(doc.has_class(&banner, classes::HIDDEN));
    }

    #[test]
    fn navbar_shadow_tracks_scroll_offset() {
        let mut doc = MemoryDocument::new();
        let body = doc.body_node();
        let nav = doc.element(body, "nav");
        update_navbar_shadow(&mut doc, 50.0);
        assert!(!doc.has_class(&nav, NAV_SHADOW_CLASS));
        update_navbar_shadow(&mut doc, 51.0);
        assert!(doc.has_class(&nav, NAV_SHADOW_CLASS));
        update_navbar_shadow(&mut doc, 0.0);
        assert!(!doc.has_class(&nav, NAV_SHADOW_CLASS));
    }

    #[test]
    fn reveal_marks_sections_near_viewport() {
        let mut doc = MemoryDocument::new();
        let body = doc.body_node();
        let near = doc.element(body, "section");
        doc.seed_class(near, REVEAL_CLASS);
        doc.set_viewport_top(near, 599.0);
        let far = doc.element(body, "section");
        doc.seed_class(far, REVEAL_CLASS);
        doc.set_viewport_top(far, 700.0);

        assert_eq!(reveal_sections(&mut doc, 700.0), 1);
        assert!(doc.has_class(&near, classes::ACTIVE));
        assert!(!doc.has_class(&far, classes::ACTIVE));
        assert_eq!(reveal_sections(&mut doc, 700.0), 0);
    }
}
