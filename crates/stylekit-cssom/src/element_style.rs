//! Live view of an element's `style` attribute.

use crate::host::{StyleAttributeHost, STYLE_ATTRIBUTE};
use crate::store::{PropertyStore, StoreOptions};
use std::rc::{Rc, Weak};

/// Derives a [`PropertyStore`] from an element's current `style` attribute.
///
/// Nothing is cached between calls. The attribute can change through other
/// code at any time, so every access re-parses it; two views of the same
/// element therefore always agree.
#[derive(Debug)]
pub struct ElementStyle<E> {
    element: Weak<E>,
    options: StoreOptions,
}

impl<E: StyleAttributeHost> ElementStyle<E> {
    /// Create a view of `element`'s style attribute.
    pub fn new(element: &Rc<E>, options: StoreOptions) -> Self {
        Self {
            element: Rc::downgrade(element),
            options,
        }
    }

    /// The element, if it is still alive.
    pub fn element(&self) -> Option<Rc<E>> {
        self.element.upgrade()
    }

    /// Options used when parsing the attribute.
    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Parse the element's current style attribute into a fresh store.
    ///
    /// A missing attribute (or a dropped element) yields an empty store.
    pub fn get_element_style(&self) -> PropertyStore {
        let text = self
            .element()
            .and_then(|element| element.read_attribute(STYLE_ATTRIBUTE))
            .unwrap_or_default();
        PropertyStore::parse_with(&text, self.options)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::FakeElement;
    use super::*;

    #[test]
    fn test_reads_current_attribute() {
        let element = FakeElement::with_style("color: red; margin: 0");
        let view = ElementStyle::new(&element, StoreOptions::default());
        let store = view.get_element_style();
        assert_eq!(store.len(), 5);
        assert_eq!(store.get("color").unwrap().value, "red");
    }

    #[test]
    fn test_missing_attribute_is_empty() {
        let element = Rc::new(FakeElement::default());
        let view = ElementStyle::new(&element, StoreOptions::default());
        assert!(view.get_element_style().is_empty());
    }

    #[test]
    fn test_every_access_reparses() {
        let element = FakeElement::with_style("color: red");
        let view = ElementStyle::new(&element, StoreOptions::default());
        let before = view.get_element_style();

        // Changed behind the view's back.
        *element.style.borrow_mut() = Some("color: blue".to_string());

        assert_eq!(before.get("color").unwrap().value, "red");
        assert_eq!(view.get_element_style().get("color").unwrap().value, "blue");
    }

    #[test]
    fn test_dropped_element_is_empty() {
        let element = FakeElement::with_style("color: red");
        let view = ElementStyle::new(&element, StoreOptions::default());
        drop(element);
        assert!(view.element().is_none());
        assert!(view.get_element_style().is_empty());
    }

    #[test]
    fn test_options_are_applied() {
        let element = FakeElement::with_style("margin: 0");
        let options = StoreOptions {
            expand_shorthands: false,
        };
        let view = ElementStyle::new(&element, options);
        assert_eq!(view.options(), options);
        assert_eq!(view.get_element_style().item(0), Some("margin"));
    }
}
