//! # StyleKit CSSOM
//!
//! CSS declaration blocks (`CSSStyleDeclaration`) for inline styles.
//!
//! A [`CssStyleDeclaration`] is one of:
//!
//! 1. **Standalone**: owns a [`PropertyStore`].
//! 2. **Bound**: a live view of an element's `style` attribute. Every access
//!    re-parses the attribute through [`ElementStyle`]; every mutation writes
//!    the serialized result back through the element's silent attribute path
//!    and bumps the document's structural cache id when the element is
//!    connected.
//! 3. **Computed**: bound and read-only. Mutations fail with
//!    [`CssomError::ReadOnly`] and `cssText` reads as empty.
//!
//! ```rust,ignore
//! use stylekit_cssom::CssStyleDeclaration;
//! use stylekit_dom::Document;
//!
//! let doc = Document::parse_html(r#"<p id="p" style="color: red">x</p>"#)?;
//! let p = doc.get_element_by_id("p").unwrap();
//! let mut style = CssStyleDeclaration::for_element(&p);
//! style.set_property("margin", "1px 2px", None)?;
//! assert_eq!(style.get_property_value("margin-left"), "2px");
//! ```

pub mod declaration;
pub mod element_style;
pub mod error;
pub mod host;
pub mod shorthand;
pub mod store;

pub use declaration::{attribute_to_property_name, CssStyleDeclaration};
pub use element_style::ElementStyle;
pub use error::CssomError;
pub use host::{StyleAttributeHost, STYLE_ATTRIBUTE};
pub use shorthand::{Shorthand, SHORTHANDS};
pub use store::{normalize_property_name, PropertyEntry, PropertyStore, StoreOptions};
