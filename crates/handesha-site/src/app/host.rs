//! Bridge to the optional `window.elementSdk` editor host.

use std::rc::Rc;

use gloo::console;
use js_sys::{Function, JSON, Object, Reflect};
use serde_json::{Map, Value};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::SharedSite;
use super::document::WebDocument;
use crate::content::{CapabilityDescriptor, ConfigValue, HostChannel};

/// Forwards setter calls to `elementSdk.setConfig`.
pub(crate) struct SdkChannel {
    sdk: JsValue,
}

impl SdkChannel {
    pub(crate) const fn new(sdk: JsValue) -> Self {
        Self { sdk }
    }
}

impl HostChannel for SdkChannel {
    fn set_config(&mut self, patch: &Map<String, Value>) {
        let Some(payload) = to_js(&Value::Object(patch.clone())) else {
            return;
        };
        let sdk = self.sdk.clone();
        // The host may call straight back into `onConfigChange`; run after the
        // current borrow of the site is released.
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = call_method(&sdk, "setConfig", &payload) {
                console::warn!("elementSdk.setConfig failed", err);
            }
        });
    }
}

/// The host SDK object, when the page runs inside the editor.
pub(crate) fn element_sdk() -> Option<JsValue> {
    let window = web_sys::window()?;
    let sdk = Reflect::get(&window, &JsValue::from_str("elementSdk")).ok()?;
    (!sdk.is_undefined() && !sdk.is_null()).then_some(sdk)
}

/// Register the site with the host editor.
pub(crate) fn init(sdk: &JsValue, site: &SharedSite, doc: &WebDocument) {
    let handshake = Object::new();
    let defaults = to_js(&site.borrow().bridge().default_config_json()).unwrap_or(JsValue::NULL);
    set(&handshake, "defaultConfig", &defaults);

    let on_change = {
        let site = Rc::clone(site);
        let mut doc = doc.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |config: JsValue| {
            let payload = from_js(&config).unwrap_or(Value::Null);
            let Ok(mut site) = site.try_borrow_mut() else {
                console::warn!("config change ignored while the site is busy");
                return;
            };
            for issue in site.on_config_change(&payload, &mut doc) {
                console::warn!(issue.to_string());
            }
        })
    };
    set(&handshake, "onConfigChange", &on_change.into_js_value());

    let capabilities = {
        let site = Rc::clone(site);
        Closure::<dyn Fn(JsValue) -> JsValue>::new(move |_config: JsValue| {
            capabilities_object(&site)
        })
    };
    set(&handshake, "mapToCapabilities", &capabilities.into_js_value());

    let panel = {
        let site = Rc::clone(site);
        Closure::<dyn Fn(JsValue) -> JsValue>::new(move |_config: JsValue| {
            let map = js_sys::Map::new();
            for (key, value) in site.borrow().bridge().edit_panel_values() {
                map.set(&JsValue::from_str(key), &JsValue::from_str(&value));
            }
            map.into()
        })
    };
    set(&handshake, "mapToEditPanelValues", &panel.into_js_value());

    if let Err(err) = call_method(sdk, "init", &handshake.into()) {
        console::error!("elementSdk.init failed", err);
    }
}

fn capabilities_object(site: &SharedSite) -> JsValue {
    let caps = site.borrow().bridge().capabilities();
    let result = Object::new();
    let recolorables = js_sys::Array::new();
    for descriptor in caps.recolorables {
        recolorables.push(&descriptor_object(site, descriptor));
    }
    set(&result, "recolorables", &recolorables);
    set(&result, "borderables", &js_sys::Array::new());
    set(&result, "fontEditable", &descriptor_object(site, caps.font_editable));
    set(&result, "fontSizeable", &descriptor_object(site, caps.font_sizeable));
    result.into()
}

fn descriptor_object(site: &SharedSite, descriptor: CapabilityDescriptor) -> JsValue {
    let object = Object::new();
    let getter = {
        let site = Rc::clone(site);
        Closure::<dyn Fn() -> JsValue>::new(move || match descriptor.get(site.borrow().bridge()) {
            ConfigValue::Text(text) => JsValue::from_str(&text),
            ConfigValue::Pixels(px) => JsValue::from(px),
        })
    };
    let setter = {
        let site = Rc::clone(site);
        Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let raw = from_js(&value).unwrap_or(Value::Null);
            let mut site = site.borrow_mut();
            if let Err(err) = descriptor.set(site.bridge_mut(), &raw) {
                console::warn!(format!("{} rejected: {err}", descriptor.field().key()));
            }
        })
    };
    set(&object, "get", &getter.into_js_value());
    set(&object, "set", &setter.into_js_value());
    object.into()
}

fn set(target: &Object, key: &str, value: &JsValue) {
    if Reflect::set(target, &JsValue::from_str(key), value).is_err() {
        console::warn!(format!("failed to set {key}"));
    }
}

fn call_method(target: &JsValue, name: &str, argument: &JsValue) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    method.call1(target, argument)
}

fn to_js(value: &Value) -> Option<JsValue> {
    let text = serde_json::to_string(value).ok()?;
    JSON::parse(&text).ok()
}

fn from_js(value: &JsValue) -> Option<Value> {
    if value.is_undefined() {
        return Some(Value::Null);
    }
    let text = JSON::stringify(value).ok()?.as_string()?;
    serde_json::from_str(&text).ok()
}
