//! End-to-end startup, language switch and membership flow on an in-memory page.

use std::rc::Rc;
use std::time::Duration;

use handesha_site::dom::{Document, I18N_ATTR, I18N_PLACEHOLDER_ATTR, MemoryDocument, NodeId, classes, ids};
use handesha_site::i18n::StaticSource;
use handesha_site::membership::{MembershipOutcome, NOTICE_ID};
use handesha_site::preferences::{MemoryPreferences, PREFERRED_LANGUAGE_KEY};
use handesha_site::schedule::ManualScheduler;
use handesha_site::{FixedClock, LoadState, LocaleCode, LocaleSwitch, Site, SiteSettings};
use serde_json::json;

struct Page {
    doc: MemoryDocument,
    slogan: NodeId,
    email: NodeId,
    overlay: NodeId,
    member_label: NodeId,
    active_text: NodeId,
}

fn page() -> Page {
    let mut doc = MemoryDocument::new();
    let body = doc.body_node();
    let overlay = doc.element_with_id(body, "div", ids::LOADING_OVERLAY);
    doc.element_with_id(body, "button", "lang-en");
    doc.element_with_id(body, "button", "lang-ar");
    let slogan = doc.element_with_id(body, "h2", "hero-slogan");
    doc.seed_attribute(slogan, I18N_ATTR, "hero.slogan");
    let email = doc.element(body, "input");
    doc.seed_attribute(email, I18N_PLACEHOLDER_ATTR, "contact.form.email");
    doc.element_with_id(body, "span", ids::ACTIVE_NUMBER);
    let active_text = doc.element_with_id(body, "span", ids::ACTIVE_TEXT);
    let member = doc.element_with_id(body, "button", ids::MEMBER_BTN);
    let member_label = doc.element(member, "span");
    Page {
        doc,
        slogan,
        email,
        overlay,
        member_label,
        active_text,
    }
}

fn site(at: &str) -> Site<MemoryDocument> {
    Site::new(
        SiteSettings::default(),
        Box::new(MemoryPreferences::default()),
        Rc::new(FixedClock::new(at.parse().expect("valid datetime"))),
    )
}

#[tokio::test]
async fn startup_switch_and_membership_flow() {
    let mut page = page();
    let mut scheduler = ManualScheduler::new();
    let mut site = site("2026-01-10T12:00:00");

    site.initialize(&StaticSource::bundled(), &mut page.doc, &mut scheduler)
        .await;

    assert_eq!(site.controller().state(), LoadState::Ready);
    assert_eq!(page.doc.text(&page.slogan), "Empowering Future Engineers");
    assert_eq!(
        page.doc.attribute(&page.email, "placeholder").as_deref(),
        Some("Your email")
    );
    assert_eq!(page.doc.text(&page.active_text), "months Active");
    assert!(!page.doc.has_class(&page.overlay, classes::HIDDEN));
    scheduler.advance(Duration::from_millis(500), &mut page.doc);
    assert!(page.doc.has_class(&page.overlay, classes::HIDDEN));

    let switched = site
        .change_language(LocaleCode::Ar, &mut page.doc)
        .expect("ready");
    assert_eq!(
        switched,
        LocaleSwitch::Switched {
            from: LocaleCode::En,
            to: LocaleCode::Ar
        }
    );
    let root = page.doc.root();
    assert_eq!(page.doc.attribute(&root, "dir").as_deref(), Some("rtl"));
    assert_eq!(page.doc.attribute(&root, "lang").as_deref(), Some("ar"));
    assert_eq!(page.doc.text(&page.slogan), "تمكين مهندسي المستقبل");
    assert_eq!(page.doc.text(&page.active_text), "أشهر نشطة");
    assert_eq!(
        Some(page.doc.text(&page.member_label).as_str()),
        site.controller()
            .store()
            .resolve(LocaleCode::Ar, "contact.social.memberButton")
    );
    assert_eq!(
        site.controller()
            .preferences()
            .load(PREFERRED_LANGUAGE_KEY)
            .as_deref(),
        Some("ar")
    );

    page.doc.reset_writes();
    assert_eq!(
        site.change_language(LocaleCode::Ar, &mut page.doc),
        Ok(LocaleSwitch::Unchanged)
    );
    assert_eq!(page.doc.writes(), 0);

    assert_eq!(
        site.on_member_click(&mut page.doc, &mut scheduler),
        MembershipOutcome::Closed
    );
    site.on_member_click(&mut page.doc, &mut scheduler);
    assert_eq!(page.doc.count_with_id(NOTICE_ID), 1);
    scheduler.advance(Duration::from_secs(9), &mut page.doc);
    assert_eq!(page.doc.count_with_id(NOTICE_ID), 0);
}

#[test]
fn failed_fetch_degrades_but_switching_still_works() {
    let mut page = page();
    page.doc.seed_text(page.slogan, "authored");
    page.doc.seed_text(page.member_label, "Become a Member");
    let mut scheduler = ManualScheduler::new();
    let mut site = site("2026-01-10T12:00:00");

    assert!(site.begin_loading());
    site.finish_loading(
        Err(handesha_site::LoadError::Fetch {
            location: "translations.json".to_string(),
            detail: "404".to_string(),
        }),
        &mut page.doc,
        &mut scheduler,
    );

    assert_eq!(site.controller().state(), LoadState::Ready);
    assert_eq!(page.doc.text(&page.slogan), "authored");
    assert_eq!(site.translate("hero.slogan", &[]), "hero.slogan");
    assert_eq!(page.doc.text(&page.member_label), "Become a Member");
    assert!(site.change_language(LocaleCode::Ar, &mut page.doc).is_ok());
    assert_eq!(page.doc.text(&page.slogan), "authored");
    assert_eq!(page.doc.text(&page.member_label), "Become a Member");
}

#[test]
fn host_config_overrides_content_after_translation() {
    let mut page = page();
    let mut scheduler = ManualScheduler::new();
    let mut site = site("2026-01-10T12:00:00");
    site.begin_loading();
    site.finish_loading(
        Ok(handesha_site::i18n::BUNDLED_TRANSLATIONS.as_bytes().to_vec()),
        &mut page.doc,
        &mut scheduler,
    );

    let issues = site.on_config_change(
        &json!({"hero_slogan": "Engineers Build Tomorrow", "primary_color": null, "font_size": 99}),
        &mut page.doc,
    );

    assert_eq!(issues.len(), 1);
    assert_eq!(page.doc.text(&page.slogan), "Engineers Build Tomorrow");
    assert_eq!(page.doc.custom_property("--primary"), Some("#092b56"));
    assert_eq!(page.doc.custom_property("font-size"), Some("16px"));
}
