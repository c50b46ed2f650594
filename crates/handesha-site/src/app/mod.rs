//! Browser binding: wires page events to the [`Site`] runtime.
//!
//! # Design
//! - One [`Site`] per page, shared by event handlers through `Rc<RefCell<_>>`.
//! - No borrow of the site is held across the translation fetch.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::console;
use gloo::events::EventListener;
use gloo::utils::window;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

use crate::content::ContentBridge;
use crate::dom::{Document, ids};
use crate::i18n::{LocaleCode, TranslationSource};
use crate::membership::{MembershipOutcome, NOTICE_DISMISS_ID};
use crate::page::mobile_menu_links;
use crate::settings::SiteSettings;
use crate::site::{Site, SystemClock};

mod document;
mod fetch;
mod host;
mod storage;
mod timers;

use document::WebDocument;
use fetch::FetchSource;
use storage::LocalPreferences;
use timers::BrowserScheduler;

type SharedSite = Rc<RefCell<Site<WebDocument>>>;

/// Entry point for the wasm build.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let Some(doc) = WebDocument::from_window() else {
        console::error!("document unavailable; site runtime not started");
        return;
    };
    let settings = SiteSettings::default();
    let source = FetchSource::new(settings.translations_url.clone());
    let sdk = host::element_sdk();
    let mut site = Site::new(settings, Box::new(LocalPreferences), Rc::new(SystemClock));
    if let Some(sdk) = &sdk {
        let channel = host::SdkChannel::new(sdk.clone());
        site = site.with_content_bridge(ContentBridge::default().with_host(Box::new(channel)));
    }
    let site: SharedSite = Rc::new(RefCell::new(site));

    if let Some(sdk) = &sdk {
        host::init(sdk, &site, &doc);
    }
    bind_language_buttons(&site, &doc);
    bind_page_events(&site, &doc);
    on_scroll(&site, &doc);

    let started = site.borrow_mut().begin_loading();
    if started {
        let mut doc = doc;
        wasm_bindgen_futures::spawn_local(async move {
            let fetched = source.fetch().await;
            let mut scheduler = BrowserScheduler::new(doc.clone());
            site.borrow_mut()
                .finish_loading(fetched, &mut doc, &mut scheduler);
        });
    }
}

fn bind_language_buttons(site: &SharedSite, doc: &WebDocument) {
    for locale in LocaleCode::all() {
        let Some(button) = doc.element_by_id(locale.button_id()) else {
            continue;
        };
        let site = Rc::clone(site);
        let mut doc = doc.clone();
        EventListener::new(&button, "click", move |_| {
            if let Err(err) = site.borrow_mut().change_language(locale, &mut doc) {
                console::warn!(format!("language switch ignored: {err}"));
            }
        })
        .forget();
    }
}

fn bind_page_events(site: &SharedSite, doc: &WebDocument) {
    if let Some(button) = doc.element_by_id(ids::MOBILE_MENU_BTN) {
        listen(&button, "click", site, doc, |site, doc, _| site.on_menu_toggle(doc));
    }
    for link in mobile_menu_links(doc) {
        listen(&link, "click", site, doc, |site, doc, _| site.on_menu_link(doc));
    }
    if let Some(form) = doc.element_by_id(ids::CONTACT_FORM) {
        listen(&form, "submit", site, doc, |site, doc, _| {
            let mut scheduler = BrowserScheduler::new(doc.clone());
            site.on_contact_submit(doc, &mut scheduler);
        });
    }
    if let Some(button) = doc.element_by_id(ids::MEMBER_BTN) {
        listen(&button, "click", site, doc, |site, doc, _| {
            let mut scheduler = BrowserScheduler::new(doc.clone());
            if let MembershipOutcome::Redirect(url) = site.on_member_click(doc, &mut scheduler) {
                if let Err(err) = window().open_with_url_and_target(&url, "_blank") {
                    console::error!("failed to open membership form", err);
                }
            }
        });
    }
    if let Some(body) = doc.body() {
        listen(&body, "click", site, doc, |site, doc, event| {
            let dismissed = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|target| target.closest(&format!("#{NOTICE_DISMISS_ID}")).ok().flatten())
                .is_some();
            if dismissed {
                site.on_notice_dismiss(doc);
            }
        });
    }

    let scroll_site = Rc::clone(site);
    let scroll_doc = doc.clone();
    EventListener::new(&window(), "scroll", move |_| on_scroll(&scroll_site, &scroll_doc)).forget();
}

fn listen(
    target: &Element,
    event: &'static str,
    site: &SharedSite,
    doc: &WebDocument,
    handler: impl Fn(&mut Site<WebDocument>, &mut WebDocument, &Event) + 'static,
) {
    let site = Rc::clone(site);
    let mut doc = doc.clone();
    EventListener::new(target, event, move |event| {
        handler(&mut site.borrow_mut(), &mut doc, event);
    })
    .forget();
}

fn on_scroll(site: &SharedSite, doc: &WebDocument) {
    let scroll_y = window().scroll_y().unwrap_or(0.0);
    let viewport = window()
        .inner_height()
        .ok()
        .and_then(|height| height.as_f64())
        .unwrap_or(0.0);
    let mut doc = doc.clone();
    site.borrow().on_scroll(&mut doc, scroll_y, viewport);
}
