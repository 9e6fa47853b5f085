//! Ordered, priority-aware storage for one declaration block.

use crate::shorthand;
use std::borrow::Cow;
use std::fmt;
use stylekit_common::StyleConfig;
use stylekit_cssparser::{parse_declaration_list, serialize_declarations};
use tracing::{debug, trace};

/// How a store treats incoming declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Decompose shorthands into their longhands. When disabled, shorthands
    /// are stored under their own name like any other property.
    pub expand_shorthands: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            expand_shorthands: true,
        }
    }
}

impl From<&StyleConfig> for StoreOptions {
    fn from(config: &StyleConfig) -> Self {
        Self {
            expand_shorthands: config.expand_shorthands,
        }
    }
}

/// One declared property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Normalized property name.
    pub name: String,
    /// Raw value text.
    pub value: String,
    /// `!important` flag.
    pub important: bool,
}

/// Normalize a property name for storage and comparison.
///
/// Property names are ASCII case-insensitive and stored lowercase. Custom
/// properties (`--name`) are case-sensitive and kept verbatim.
pub fn normalize_property_name(name: &str) -> Cow<'_, str> {
    if name.starts_with("--") || !name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name.to_ascii_lowercase())
    }
}

/// An ordered collection of property entries.
///
/// Names are unique. Re-declaring a name updates the existing entry in place,
/// so insertion order (and therefore [`PropertyStore::item`] and the
/// serialization) only changes when a new name is introduced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    entries: Vec<PropertyEntry>,
    options: StoreOptions,
}

impl PropertyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given options.
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            entries: Vec::new(),
            options,
        }
    }

    /// Parse declaration text into a new store.
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, StoreOptions::default())
    }

    /// Parse declaration text into a new store with the given options.
    ///
    /// Later declarations of a name overwrite earlier ones but keep the
    /// earlier position.
    pub fn parse_with(text: &str, options: StoreOptions) -> Self {
        let mut store = Self::with_options(options);
        for declaration in parse_declaration_list(text) {
            store.set(&declaration.property, &declaration.value, declaration.important);
        }
        debug!(len = text.len(), entries = store.len(), "Parsed declaration block");
        store
    }

    /// The options this store was created with.
    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the entry at `index`, in insertion order.
    pub fn item(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.name.as_str())
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyEntry> {
        self.entries.iter()
    }

    /// The entry stored under exactly this name, without shorthand
    /// recombination.
    pub fn entry(&self, name: &str) -> Option<&PropertyEntry> {
        let name = normalize_property_name(name);
        self.find(&name)
    }

    /// Look up a property.
    ///
    /// A shorthand name with no entry of its own is answered by recombining
    /// its longhands; this needs every longhand present with the same
    /// importance.
    pub fn get(&self, name: &str) -> Option<Cow<'_, PropertyEntry>> {
        let name = normalize_property_name(name);
        if let Some(entry) = self.find(&name) {
            return Some(Cow::Borrowed(entry));
        }

        let shorthand = shorthand::lookup(&name)?;
        let mut important = None;
        let mut values = Vec::with_capacity(shorthand.longhands.len());
        for longhand in shorthand.longhands {
            let entry = self.find(longhand)?;
            match important {
                None => important = Some(entry.important),
                Some(flag) if flag != entry.important => return None,
                Some(_) => {}
            }
            values.push(entry.value.as_str());
        }

        let value = shorthand.combine(&values)?;
        Some(Cow::Owned(PropertyEntry {
            name: name.into_owned(),
            value,
            important: important.unwrap_or(false),
        }))
    }

    /// Set a property, creating or overwriting its entry.
    ///
    /// Shorthands are stored as their longhands when the value decomposes;
    /// otherwise (or with shorthand expansion disabled) the value is stored
    /// verbatim under the shorthand's own name.
    pub fn set(&mut self, name: &str, value: &str, important: bool) {
        let name = normalize_property_name(name);

        if self.options.expand_shorthands {
            if let Some(shorthand) = shorthand::lookup(&name) {
                if let Some(longhands) = shorthand.expand(value) {
                    self.remove_entry(&name);
                    for (longhand, longhand_value) in longhands {
                        self.set_entry(longhand, longhand_value, important);
                    }
                    return;
                }
                trace!(property = %name, value, "Storing undecomposable shorthand verbatim");
            }
        }

        self.set_entry(&name, value.to_string(), important);
    }

    /// Change the importance of an existing property (or of every longhand
    /// of a shorthand). Returns whether anything matched.
    pub fn set_importance(&mut self, name: &str, important: bool) -> bool {
        let name = normalize_property_name(name);
        let longhands = shorthand::lookup(&name).map_or(&[][..], |s| s.longhands);

        let mut matched = false;
        for entry in &mut self.entries {
            if entry.name == name || longhands.contains(&entry.name.as_str()) {
                entry.important = important;
                matched = true;
            }
        }
        matched
    }

    /// Remove a property. A shorthand name also removes all of its
    /// longhands. Returns whether any entry was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let name = normalize_property_name(name);
        let mut removed = self.remove_entry(&name);
        if let Some(shorthand) = shorthand::lookup(&name) {
            for longhand in shorthand.longhands {
                removed |= self.remove_entry(longhand);
            }
        }
        removed
    }

    /// Canonical declaration text (`name: value; name: value !important;`).
    pub fn to_css_text(&self) -> String {
        serialize_declarations(
            self.entries
                .iter()
                .map(|entry| (entry.name.as_str(), entry.value.as_str(), entry.important)),
        )
    }

    fn find(&self, name: &str) -> Option<&PropertyEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    fn set_entry(&mut self, name: &str, value: String, important: bool) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                entry.value = value;
                entry.important = important;
            }
            None => self.entries.push(PropertyEntry {
                name: name.to_string(),
                value,
                important,
            }),
        }
    }

    fn remove_entry(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.name != name);
        self.entries.len() != before
    }
}

impl fmt::Display for PropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_text())
    }
}

impl<'a> IntoIterator for &'a PropertyStore {
    type Item = &'a PropertyEntry;
    type IntoIter = std::slice::Iter<'a, PropertyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
