//! Writes resolved translations into registered page surfaces.

use tracing::debug;

use super::{Document, I18N_ATTR, I18N_PLACEHOLDER_ATTR, classes};
use crate::i18n::{LocaleCode, TranslationStore};

/// How a resolved string is written into its element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace text content.
    Text,
    /// Set the `placeholder` attribute.
    Placeholder,
    /// Set the `content` attribute.
    Content,
}

impl WriteMode {
    /// Mode implied by an element's upper-case tag name.
    #[must_use]
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "INPUT" | "TEXTAREA" => Self::Placeholder,
            "META" => Self::Content,
            _ => Self::Text,
        }
    }
}

/// One translatable surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding<N> {
    /// Target element.
    pub node: N,
    /// Dotted key path.
    pub key: String,
    /// Write mode.
    pub mode: WriteMode,
}

/// Registration list of translatable surfaces, built once at startup.
#[derive(Clone, Debug)]
pub struct DomApplier<N> {
    content: Vec<Binding<N>>,
    placeholders: Vec<Binding<N>>,
}

impl<N> Default for DomApplier<N> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            placeholders: Vec::new(),
        }
    }
}

impl<N: Clone + PartialEq> DomApplier<N> {
    /// Empty registration list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every element tagged with `data-i18n` or
    /// `data-i18n-placeholder`. Returns the number of new bindings.
    pub fn register_tagged<D: Document<Node = N>>(&mut self, doc: &D) -> usize {
        let before = self.len();
        for tagged in doc.tagged(I18N_ATTR) {
            self.register(tagged.node, tagged.key, WriteMode::for_tag(&tagged.tag));
        }
        for tagged in doc.tagged(I18N_PLACEHOLDER_ATTR) {
            self.register_placeholder(tagged.node, tagged.key);
        }
        self.len() - before
    }

    /// Register a content surface. Re-registering a node replaces its key.
    pub fn register(&mut self, node: N, key: impl Into<String>, mode: WriteMode) {
        upsert(&mut self.content, node, key.into(), mode);
    }

    /// Register a placeholder-only surface.
    pub fn register_placeholder(&mut self, node: N, key: impl Into<String>) {
        upsert(&mut self.placeholders, node, key.into(), WriteMode::Placeholder);
    }

    /// Total registered surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len() + self.placeholders.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write every content binding, then placeholders, the page title and
    /// `<html lang>`. Returns the number of bindings written.
    ///
    /// Does nothing while the store is empty. Bindings whose key misses keep
    /// their current content.
    pub fn apply_all<D: Document<Node = N>>(
        &self,
        store: &TranslationStore,
        locale: LocaleCode,
        doc: &mut D,
    ) -> usize {
        if !store.is_loaded() {
            return 0;
        }
        let mut written = write_bindings(&self.content, store, locale, doc);
        written += self.apply_placeholders(store, locale, doc);

        match (doc.first_by_tag("title"), store.resolve(locale, "common.siteName")) {
            (Some(title), Some(name)) => doc.set_text(&title, name),
            (None, _) => debug!("page has no <title>"),
            (_, None) => debug!(locale = locale.code(), "common.siteName missing"),
        }
        let root = doc.root();
        doc.set_attribute(&root, "lang", locale.code());
        written
    }

    /// Write placeholder-only bindings. Returns the number written.
    pub fn apply_placeholders<D: Document<Node = N>>(
        &self,
        store: &TranslationStore,
        locale: LocaleCode,
        doc: &mut D,
    ) -> usize {
        write_bindings(&self.placeholders, store, locale, doc)
    }
}

fn upsert<N: PartialEq>(list: &mut Vec<Binding<N>>, node: N, key: String, mode: WriteMode) {
    if let Some(existing) = list.iter_mut().find(|binding| binding.node == node) {
        existing.key = key;
        existing.mode = mode;
    } else {
        list.push(Binding { node, key, mode });
    }
}

fn write_bindings<D: Document>(
    bindings: &[Binding<D::Node>],
    store: &TranslationStore,
    locale: LocaleCode,
    doc: &mut D,
) -> usize {
    let mut written = 0;
    for binding in bindings {
        let Some(text) = store.resolve(locale, &binding.key) else {
            continue;
        };
        match binding.mode {
            WriteMode::Text => doc.set_text(&binding.node, text),
            WriteMode::Placeholder => doc.set_attribute(&binding.node, "placeholder", text),
            WriteMode::Content => doc.set_attribute(&binding.node, "content", text),
        }
        written += 1;
    }
    written
}

/// Set `<html dir>` and the `<body>` RTL class for `locale`.
pub fn update_document_direction<D: Document>(doc: &mut D, locale: LocaleCode) {
    let root = doc.root();
    doc.set_attribute(&root, "dir", if locale.is_rtl() { "rtl" } else { "ltr" });
    if let Some(body) = doc.body() {
        doc.set_class(&body, classes::RTL, locale.is_rtl());
    }
}
