//! Host page abstraction.
//!
//! # Design
//! - Components talk to the page through [`Document`] only, so the same code
//!   drives the browser (`web-sys`) and the in-memory [`MemoryDocument`].
//! - Lookups return `Option`; callers skip silently when a node is absent.

mod applier;
mod memory;

pub use applier::{Binding, DomApplier, WriteMode, update_document_direction};
pub use memory::{MemoryDocument, NodeId};

/// Attribute naming the translation key for content.
pub const I18N_ATTR: &str = "data-i18n";
/// Attribute naming the translation key for placeholder-only translation.
pub const I18N_PLACEHOLDER_ATTR: &str = "data-i18n-placeholder";

/// Element ids the page is expected to carry.
pub mod ids {
    /// Activity counter number.
    pub const ACTIVE_NUMBER: &str = "active-number";
    /// Activity counter label.
    pub const ACTIVE_TEXT: &str = "active-text";
    /// Startup overlay.
    pub const LOADING_OVERLAY: &str = "loading-overlay";
    /// Mobile menu toggle button.
    pub const MOBILE_MENU_BTN: &str = "mobile-menu-btn";
    /// Mobile menu panel.
    pub const MOBILE_MENU: &str = "mobile-menu";
    /// Contact form.
    pub const CONTACT_FORM: &str = "contact-form";
    /// Contact form success banner.
    pub const FORM_SUCCESS: &str = "form-success";
    /// Membership call-to-action.
    pub const MEMBER_BTN: &str = "member-btn";
}

/// Utility classes toggled by the runtime.
pub mod classes {
    /// Hides an element.
    pub const HIDDEN: &str = "hidden";
    /// Marks the selected language button.
    pub const ACTIVE: &str = "active";
    /// Enables right-to-left style overrides on `<body>`.
    pub const RTL: &str = "rtl";
}

/// Element carrying a tagging attribute, discovered by [`Document::tagged`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggedElement<N> {
    /// Node handle.
    pub node: N,
    /// Upper-case tag name (`INPUT`, `META`, ...).
    pub tag: String,
    /// Attribute value.
    pub key: String,
}

/// Read/write access to the host page.
pub trait Document {
    /// Cheap handle to an element.
    type Node: Clone + PartialEq + std::fmt::Debug;

    /// Attached element with the given id.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// First attached element with the given tag name, in document order.
    fn first_by_tag(&self, tag: &str) -> Option<Self::Node>;

    /// Attached elements carrying `attribute`, in document order.
    fn tagged(&self, attribute: &str) -> Vec<TaggedElement<Self::Node>>;

    /// Attached elements carrying `class`, in document order.
    fn elements_with_class(&self, class: &str) -> Vec<Self::Node>;

    /// Descendants of `parent` with the given tag name, in document order.
    fn descendants_by_tag(&self, parent: &Self::Node, tag: &str) -> Vec<Self::Node>;

    /// The `<html>` element.
    fn root(&self) -> Self::Node;

    /// The `<body>` element.
    fn body(&self) -> Option<Self::Node>;

    /// Upper-case tag name.
    fn tag_name(&self, node: &Self::Node) -> String;

    /// Text content.
    fn text(&self, node: &Self::Node) -> String;

    /// Replace text content.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Attribute value.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Set an attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Whether `class` is present.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Add or remove `class`.
    fn set_class(&mut self, node: &Self::Node, class: &str, present: bool);

    /// Flip `class`, returning whether it is now present.
    fn toggle_class(&mut self, node: &Self::Node, class: &str) -> bool {
        let present = !self.has_class(node, class);
        self.set_class(node, class, present);
        present
    }

    /// Set an inline style property (`font-size`, `--primary`, ...).
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Create an element and append it to `parent`. `None` if the host
    /// refuses the tag.
    fn create_element(&mut self, parent: &Self::Node, tag: &str) -> Option<Self::Node>;

    /// Detach an element from the page.
    fn remove(&mut self, node: &Self::Node);

    /// Detach every child of `node`.
    fn clear_children(&mut self, node: &Self::Node);

    /// Whether the element is still part of the page.
    fn is_attached(&self, node: &Self::Node) -> bool;

    /// Distance from the viewport top to the element's top edge.
    fn viewport_top(&self, node: &Self::Node) -> Option<f64>;
}
