//! `CSSStyleDeclaration`: one interface over standalone, element-bound and
//! computed declaration blocks.

use crate::element_style::ElementStyle;
use crate::error::CssomError;
use crate::host::{StyleAttributeHost, STYLE_ATTRIBUTE};
use crate::store::{PropertyStore, StoreOptions};
use std::fmt;
use std::rc::Rc;
use stylekit_common::StyleConfig;
use stylekit_cssparser::{is_css_whitespace, parse_declaration_list, IMPORTANT};
use stylekit_dom::Node;
use tracing::{debug, warn};

/// Where a declaration's state lives. Fixed at construction.
#[derive(Debug)]
enum DeclarationMode<E> {
    /// Owns its store.
    Standalone(PropertyStore),
    /// Derived from an element's `style` attribute on every access.
    Bound {
        view: ElementStyle<E>,
        computed: bool,
    },
}

/// What a write-back does with an empty serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmptyStyle {
    /// Write an empty attribute.
    Keep,
    /// Remove the attribute altogether.
    RemoveAttribute,
}

/// A CSS declaration block as seen by script.
#[derive(Debug)]
pub struct CssStyleDeclaration<E = Node> {
    mode: DeclarationMode<E>,
}

impl CssStyleDeclaration {
    /// Create an empty standalone declaration.
    pub fn new() -> Self {
        Self::standalone(StoreOptions::default())
    }

    /// Create an empty standalone declaration with the given options.
    pub fn standalone(options: StoreOptions) -> Self {
        Self {
            mode: DeclarationMode::Standalone(PropertyStore::with_options(options)),
        }
    }

    /// Create an empty standalone declaration configured by `config`.
    pub fn from_config(config: &StyleConfig) -> Self {
        Self::standalone(StoreOptions::from(config))
    }
}

impl Default for CssStyleDeclaration {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: StyleAttributeHost> CssStyleDeclaration<E> {
    /// Create a live declaration over `element`'s style attribute.
    pub fn for_element(element: &Rc<E>) -> Self {
        Self::bound(element, false, StoreOptions::default())
    }

    /// Create a read-only computed declaration for `element`.
    pub fn computed(element: &Rc<E>) -> Self {
        Self::bound(element, true, StoreOptions::default())
    }

    /// Create a declaration bound to `element`.
    pub fn bound(element: &Rc<E>, computed: bool, options: StoreOptions) -> Self {
        Self {
            mode: DeclarationMode::Bound {
                view: ElementStyle::new(element, options),
                computed,
            },
        }
    }

    /// Whether this is a read-only computed declaration.
    pub fn is_computed(&self) -> bool {
        matches!(self.mode, DeclarationMode::Bound { computed: true, .. })
    }

    /// Whether this declaration is bound to an element.
    pub fn is_bound(&self) -> bool {
        matches!(self.mode, DeclarationMode::Bound { .. })
    }

    /// The owning element, if bound and still alive.
    pub fn parent_element(&self) -> Option<Rc<E>> {
        match &self.mode {
            DeclarationMode::Standalone(_) => None,
            DeclarationMode::Bound { view, .. } => view.element(),
        }
    }

    // ==================== Reads ====================

    /// Number of declared properties.
    pub fn length(&self) -> usize {
        self.read(PropertyStore::len)
    }

    /// Serialized declaration text. Always empty for computed declarations.
    pub fn css_text(&self) -> String {
        if self.is_computed() {
            return String::new();
        }
        self.read(PropertyStore::to_css_text)
    }

    /// Property name at `index`, or an empty string when out of range.
    pub fn item(&self, index: usize) -> String {
        self.read(|store| store.item(index).map(str::to_string).unwrap_or_default())
    }

    /// Value of a property, or an empty string when absent.
    pub fn get_property_value(&self, name: &str) -> String {
        self.read(|store| {
            store
                .get(name)
                .map(|entry| entry.value.clone())
                .unwrap_or_default()
        })
    }

    /// `"important"` when the property is set and important, else empty.
    pub fn get_property_priority(&self, name: &str) -> String {
        self.read(|store| match store.get(name) {
            Some(entry) if entry.important => IMPORTANT.to_string(),
            _ => String::new(),
        })
    }

    /// Value of a property addressed by its IDL attribute name
    /// (`backgroundColor`, `cssFloat`).
    pub fn get_by_attribute_name(&self, attribute: &str) -> String {
        self.get_property_value(&attribute_to_property_name(attribute))
    }

    // ==================== Writes ====================

    /// Replace the whole declaration block.
    pub fn set_css_text(&mut self, text: &str) -> Result<(), CssomError> {
        self.ensure_mutable("cssText", None)?;
        let options = self.options();
        self.mutate(EmptyStyle::Keep, |store| {
            *store = PropertyStore::parse_with(text, options);
        });
        Ok(())
    }

    /// Set a property.
    ///
    /// An invalid `priority` (anything but absent, empty or `"important"`)
    /// makes the call a no-op. An empty value removes the property.
    pub fn set_property(
        &mut self,
        name: &str,
        value: impl fmt::Display,
        priority: Option<&str>,
    ) -> Result<(), CssomError> {
        self.ensure_mutable("setProperty", Some(name))?;
        let Some(important) = parse_priority(priority) else {
            debug!(property = name, ?priority, "Ignoring setProperty with invalid priority");
            return Ok(());
        };

        let value = value.to_string();
        let value = value.trim_matches(is_css_whitespace);
        if value.is_empty() {
            return self.remove_property(name).map(|_| ());
        }

        if !survives_serialization(name, value) {
            debug!(property = name, value, "Ignoring setProperty that would not re-parse");
            return Ok(());
        }

        self.mutate(EmptyStyle::Keep, |store| store.set(name, value, important));
        Ok(())
    }

    /// Set a property's value, keeping its current priority.
    pub fn set_property_value(
        &mut self,
        name: &str,
        value: impl fmt::Display,
    ) -> Result<(), CssomError> {
        self.ensure_mutable("setPropertyValue", Some(name))?;
        let important = self.read(|store| store.get(name).is_some_and(|entry| entry.important));
        let priority = if important { IMPORTANT } else { "" };
        self.set_property(name, value, Some(priority))
    }

    /// Change the priority of an existing property.
    ///
    /// Absent properties and invalid priorities are ignored.
    pub fn set_property_priority(&mut self, name: &str, priority: &str) -> Result<(), CssomError> {
        self.ensure_mutable("setPropertyPriority", Some(name))?;
        let Some(important) = parse_priority(Some(priority)) else {
            return Ok(());
        };
        if !self.read(|store| store.get(name).is_some()) {
            return Ok(());
        }

        self.mutate(EmptyStyle::Keep, |store| {
            store.set_importance(name, important);
        });
        Ok(())
    }

    /// Set a property addressed by its IDL attribute name.
    pub fn set_by_attribute_name(
        &mut self,
        attribute: &str,
        value: impl fmt::Display,
    ) -> Result<(), CssomError> {
        self.set_property(&attribute_to_property_name(attribute), value, None)
    }

    /// Remove a property, returning the value it had (empty when absent).
    pub fn remove_property(&mut self, name: &str) -> Result<String, CssomError> {
        self.ensure_mutable("removeProperty", Some(name))?;
        let removed = self.mutate(EmptyStyle::RemoveAttribute, |store| {
            let previous = store
                .get(name)
                .map(|entry| entry.value.clone())
                .unwrap_or_default();
            store.remove(name);
            previous
        });
        Ok(removed)
    }

    // ==================== Dispatch ====================

    fn options(&self) -> StoreOptions {
        match &self.mode {
            DeclarationMode::Standalone(store) => store.options(),
            DeclarationMode::Bound { view, .. } => view.options(),
        }
    }

    fn ensure_mutable(
        &self,
        operation: &'static str,
        property: Option<&str>,
    ) -> Result<(), CssomError> {
        if self.is_computed() {
            return Err(CssomError::read_only(operation, property));
        }
        Ok(())
    }

    /// Run `f` against the active store.
    fn read<R>(&self, f: impl FnOnce(&PropertyStore) -> R) -> R {
        match &self.mode {
            DeclarationMode::Standalone(store) => f(store),
            DeclarationMode::Bound { view, .. } => f(&view.get_element_style()),
        }
    }

    /// Run `f` against the active store and, when bound, write the result
    /// back to the element. Callers check mutability first.
    fn mutate<R>(&mut self, empty: EmptyStyle, f: impl FnOnce(&mut PropertyStore) -> R) -> R {
        match &mut self.mode {
            DeclarationMode::Standalone(store) => f(store),
            DeclarationMode::Bound { view, .. } => {
                let mut store = view.get_element_style();
                let result = f(&mut store);
                write_back(view, &store, empty);
                result
            }
        }
    }
}

/// Write `store` into the element's style attribute without notification and
/// signal the document when the element is connected.
fn write_back<E: StyleAttributeHost>(
    view: &ElementStyle<E>,
    store: &PropertyStore,
    empty: EmptyStyle,
) {
    let Some(element) = view.element() else {
        warn!("Style write-back skipped: element no longer exists");
        return;
    };

    let text = store.to_css_text();
    if text.is_empty() && empty == EmptyStyle::RemoveAttribute {
        element.remove_attribute_silently(STYLE_ATTRIBUTE);
    } else {
        let attribute = element.create_attribute(STYLE_ATTRIBUTE, &text);
        element.insert_attribute_silently(attribute);
    }

    let connected = element.is_connected();
    if connected {
        element.bump_structural_cache_id();
    }
    debug!(len = text.len(), connected, "Style attribute written back");
}

/// `None` for an invalid priority, otherwise whether it means important.
fn parse_priority(priority: Option<&str>) -> Option<bool> {
    match priority {
        None | Some("") => Some(false),
        Some(priority) if priority.eq_ignore_ascii_case(IMPORTANT) => Some(true),
        Some(_) => None,
    }
}

/// Whether `name: value` parses back unchanged and leaves a following
/// declaration intact.
///
/// Bound declarations re-parse the attribute on every access, so anything
/// stored must read back unchanged in every mode. An unclosed group, string
/// or comment parses fine alone but swallows whatever is serialized after it.
fn survives_serialization(name: &str, value: &str) -> bool {
    let text = format!("{name}: {value}; {name}: {value};");
    match parse_declaration_list(&text).as_slice() {
        [first, second] => {
            first == second && first.property == name && first.value == value && !first.important
        }
        _ => false,
    }
}

/// Convert an IDL attribute name to a property name.
///
/// `backgroundColor` → `background-color`, `webkitTransform` →
/// `-webkit-transform`, `cssFloat` → `float`.
pub fn attribute_to_property_name(attribute: &str) -> String {
    if attribute == "cssFloat" {
        return "float".to_string();
    }

    let mut out = String::with_capacity(attribute.len() + 4);
    if attribute.starts_with("webkit")
        && attribute[6..].starts_with(|c: char| c.is_ascii_uppercase())
    {
        out.push('-');
    }
    for c in attribute.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
