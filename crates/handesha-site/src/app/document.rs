//! [`Document`] over the live browser page.

use gloo::console;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, NodeList};

use crate::dom::{Document, TaggedElement};

/// Handle to the browser document. Cheap to clone.
#[derive(Clone, Debug)]
pub(crate) struct WebDocument {
    document: web_sys::Document,
    root: Element,
}

impl WebDocument {
    /// The window's document, if the page has one.
    pub(crate) fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let root = document.document_element()?;
        Some(Self { document, root })
    }

    fn select_all(&self, selector: &str) -> Vec<Element> {
        self.document
            .query_selector_all(selector)
            .map(|list| elements(&list))
            .unwrap_or_default()
    }
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn report(action: &str, result: Result<(), wasm_bindgen::JsValue>) {
    if let Err(err) = result {
        console::warn!(format!("{action} failed"), err);
    }
}

impl Document for WebDocument {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn first_by_tag(&self, tag: &str) -> Option<Element> {
        self.document.query_selector(tag).ok().flatten()
    }

    fn tagged(&self, attribute: &str) -> Vec<TaggedElement<Element>> {
        self.select_all(&format!("[{attribute}]"))
            .into_iter()
            .filter_map(|node| {
                let key = node.get_attribute(attribute)?;
                Some(TaggedElement {
                    tag: node.tag_name().to_ascii_uppercase(),
                    key,
                    node,
                })
            })
            .collect()
    }

    fn elements_with_class(&self, class: &str) -> Vec<Element> {
        self.select_all(&format!(".{class}"))
    }

    fn descendants_by_tag(&self, parent: &Element, tag: &str) -> Vec<Element> {
        parent
            .query_selector_all(tag)
            .map(|list| elements(&list))
            .unwrap_or_default()
    }

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_uppercase()
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        report("setAttribute", node.set_attribute(name, value));
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_class(&mut self, node: &Element, class: &str, present: bool) {
        let list = node.class_list();
        let result = if present {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
        report("classList update", result);
    }

    fn toggle_class(&mut self, node: &Element, class: &str) -> bool {
        node.class_list().toggle(class).unwrap_or(false)
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            report("style.setProperty", element.style().set_property(property, value));
        }
    }

    fn create_element(&mut self, parent: &Element, tag: &str) -> Option<Element> {
        let element = self.document.create_element(tag).ok()?;
        parent.append_child(&element).ok()?;
        Some(element)
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn clear_children(&mut self, node: &Element) {
        node.set_inner_html("");
    }

    fn is_attached(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn viewport_top(&self, node: &Element) -> Option<f64> {
        Some(node.get_bounding_client_rect().top())
    }
}
