//! Shorthand properties and their longhands.
//!
//! Each shorthand is a row in [`SHORTHANDS`]: its name, its longhands in
//! serialization order, a function splitting a shorthand value into one value
//! per longhand and a function recombining longhand values. Supporting a new
//! shorthand means adding a row.

use stylekit_cssparser::split_components;

/// Keywords valid for every property.
const CSS_WIDE_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert", "revert-layer"];

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

const BORDER_WIDTH_KEYWORDS: &[&str] = &["thin", "medium", "thick"];

/// Value stored for a longhand the shorthand value did not mention.
const OMITTED: &str = "initial";

/// A shorthand property.
pub struct Shorthand {
    pub name: &'static str,
    pub longhands: &'static [&'static str],
    split: fn(&str) -> Option<Vec<String>>,
    combine: fn(&[&str]) -> Option<String>,
}

impl std::fmt::Debug for Shorthand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shorthand")
            .field("name", &self.name)
            .field("longhands", &self.longhands)
            .finish()
    }
}

impl Shorthand {
    /// Decompose a shorthand value into `(longhand, value)` pairs.
    ///
    /// Returns `None` when the value does not fit the shorthand's grammar.
    pub fn expand(&self, value: &str) -> Option<Vec<(&'static str, String)>> {
        let values = match css_wide_keyword(value) {
            Some(keyword) => vec![keyword.to_string(); self.longhands.len()],
            None => (self.split)(value)?,
        };
        if values.len() != self.longhands.len() {
            return None;
        }
        Some(self.longhands.iter().copied().zip(values).collect())
    }

    /// Recombine longhand values (in [`Shorthand::longhands`] order) into a
    /// shorthand value.
    pub fn combine(&self, values: &[&str]) -> Option<String> {
        if values.len() != self.longhands.len() {
            return None;
        }
        if let Some(first) = values.first() {
            if css_wide_keyword(first).is_some() && values.iter().all(|value| value == first) {
                return Some((*first).to_string());
            }
        }
        (self.combine)(values)
    }

    /// Whether `property` is one of this shorthand's longhands.
    pub fn contains(&self, property: &str) -> bool {
        self.longhands.contains(&property)
    }
}

/// Look up a shorthand by (normalized) property name.
pub fn lookup(name: &str) -> Option<&'static Shorthand> {
    SHORTHANDS.iter().find(|shorthand| shorthand.name == name)
}

/// Every supported shorthand.
pub static SHORTHANDS: &[Shorthand] = &[
    Shorthand {
        name: "margin",
        longhands: &["margin-top", "margin-right", "margin-bottom", "margin-left"],
        split: split_box_edges,
        combine: combine_box_edges,
    },
    Shorthand {
        name: "padding",
        longhands: &["padding-top", "padding-right", "padding-bottom", "padding-left"],
        split: split_box_edges,
        combine: combine_box_edges,
    },
    Shorthand {
        name: "inset",
        longhands: &["top", "right", "bottom", "left"],
        split: split_box_edges,
        combine: combine_box_edges,
    },
    Shorthand {
        name: "border-width",
        longhands: &[
            "border-top-width",
            "border-right-width",
            "border-bottom-width",
            "border-left-width",
        ],
        split: split_box_edges,
        combine: combine_box_edges,
    },
    Shorthand {
        name: "border-style",
        longhands: &[
            "border-top-style",
            "border-right-style",
            "border-bottom-style",
            "border-left-style",
        ],
        split: split_box_edges,
        combine: combine_box_edges,
    },
    Shorthand {
        name: "border-color",
        longhands: &[
            "border-top-color",
            "border-right-color",
            "border-bottom-color",
            "border-left-color",
        ],
        split: split_box_edges,
        combine: combine_box_edges,
    },
    Shorthand {
        name: "border-radius",
        longhands: &[
            "border-top-left-radius",
            "border-top-right-radius",
            "border-bottom-right-radius",
            "border-bottom-left-radius",
        ],
        split: split_corners,
        combine: combine_box_edges,
    },
    Shorthand {
        name: "border-top",
        longhands: &["border-top-width", "border-top-style", "border-top-color"],
        split: split_border_side,
        combine: combine_border_side,
    },
    Shorthand {
        name: "border-right",
        longhands: &["border-right-width", "border-right-style", "border-right-color"],
        split: split_border_side,
        combine: combine_border_side,
    },
    Shorthand {
        name: "border-bottom",
        longhands: &["border-bottom-width", "border-bottom-style", "border-bottom-color"],
        split: split_border_side,
        combine: combine_border_side,
    },
    Shorthand {
        name: "border-left",
        longhands: &["border-left-width", "border-left-style", "border-left-color"],
        split: split_border_side,
        combine: combine_border_side,
    },
    Shorthand {
        name: "border",
        longhands: &[
            "border-top-width",
            "border-right-width",
            "border-bottom-width",
            "border-left-width",
            "border-top-style",
            "border-right-style",
            "border-bottom-style",
            "border-left-style",
            "border-top-color",
            "border-right-color",
            "border-bottom-color",
            "border-left-color",
        ],
        split: split_border,
        combine: combine_border,
    },
    Shorthand {
        name: "gap",
        longhands: &["row-gap", "column-gap"],
        split: split_pair,
        combine: combine_pair,
    },
    Shorthand {
        name: "overflow",
        longhands: &["overflow-x", "overflow-y"],
        split: split_pair,
        combine: combine_pair,
    },
    Shorthand {
        name: "place-items",
        longhands: &["align-items", "justify-items"],
        split: split_pair,
        combine: combine_pair,
    },
];

fn css_wide_keyword(value: &str) -> Option<&'static str> {
    CSS_WIDE_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| value.eq_ignore_ascii_case(keyword))
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

// ==================== Box edges ====================

/// `a` / `a b` / `a b c` / `a b c d` → top, right, bottom, left.
fn split_box_edges(value: &str) -> Option<Vec<String>> {
    let parts = split_components(value);
    if parts.iter().any(|part| css_wide_keyword(part).is_some()) {
        return None;
    }
    let edges = match parts.as_slice() {
        [all] => [*all; 4],
        [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
        [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
        [top, right, bottom, left] => [*top, *right, *bottom, *left],
        _ => return None,
    };
    Some(owned(&edges))
}

/// Corner radii use the box-edge arity rules. Elliptical radii (`a / b`)
/// are not decomposed.
fn split_corners(value: &str) -> Option<Vec<String>> {
    if value.contains('/') {
        return None;
    }
    split_box_edges(value)
}

fn combine_box_edges(values: &[&str]) -> Option<String> {
    if values.iter().any(|value| css_wide_keyword(value).is_some()) {
        return None;
    }
    let [top, right, bottom, left] = values else {
        return None;
    };
    let combined = if right != left {
        format!("{top} {right} {bottom} {left}")
    } else if top != bottom {
        format!("{top} {right} {bottom}")
    } else if top != right {
        format!("{top} {right}")
    } else {
        (*top).to_string()
    };
    Some(combined)
}

// ==================== Pairs ====================

fn split_pair(value: &str) -> Option<Vec<String>> {
    let parts = split_components(value);
    if parts.iter().any(|part| css_wide_keyword(part).is_some()) {
        return None;
    }
    match parts.as_slice() {
        [both] => Some(owned(&[*both, *both])),
        [first, second] => Some(owned(&[*first, *second])),
        _ => None,
    }
}

fn combine_pair(values: &[&str]) -> Option<String> {
    if values.iter().any(|value| css_wide_keyword(value).is_some()) {
        return None;
    }
    match values {
        [first, second] if first == second => Some((*first).to_string()),
        [first, second] => Some(format!("{first} {second}")),
        _ => None,
    }
}

// ==================== Borders ====================

fn is_border_style(component: &str) -> bool {
    BORDER_STYLES
        .iter()
        .any(|style| component.eq_ignore_ascii_case(style))
}

fn is_border_width(component: &str) -> bool {
    if BORDER_WIDTH_KEYWORDS
        .iter()
        .any(|keyword| component.eq_ignore_ascii_case(keyword))
    {
        return true;
    }
    let lower = component.to_ascii_lowercase();
    if lower.starts_with("calc(") {
        return true;
    }
    let unsigned = lower
        .strip_prefix('+')
        .or_else(|| lower.strip_prefix('-'))
        .unwrap_or(lower.as_str());
    unsigned
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.')
}

/// `[width || style || color]` in any order → width, style, color.
fn split_border_side(value: &str) -> Option<Vec<String>> {
    let parts = split_components(value);
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut width = None;
    let mut style = None;
    let mut color = None;
    for part in parts {
        if css_wide_keyword(part).is_some() {
            return None;
        }
        let slot = if is_border_style(part) {
            &mut style
        } else if is_border_width(part) {
            &mut width
        } else {
            &mut color
        };
        if slot.replace(part).is_some() {
            return None;
        }
    }

    Some(owned(&[
        width.unwrap_or(OMITTED),
        style.unwrap_or(OMITTED),
        color.unwrap_or(OMITTED),
    ]))
}

fn combine_border_side(values: &[&str]) -> Option<String> {
    let mut components = Vec::with_capacity(values.len());
    for value in values {
        if *value == OMITTED {
            continue;
        }
        if css_wide_keyword(value).is_some() {
            return None;
        }
        components.push(*value);
    }
    if components.is_empty() {
        return Some(OMITTED.to_string());
    }
    Some(components.join(" "))
}

fn split_border(value: &str) -> Option<Vec<String>> {
    let side = split_border_side(value)?;
    Some(
        side.iter()
            .flat_map(|component| std::iter::repeat(component.clone()).take(4))
            .collect(),
    )
}

fn combine_border(values: &[&str]) -> Option<String> {
    let mut side = Vec::with_capacity(3);
    for group in values.chunks(4) {
        let first = group.first()?;
        if group.iter().any(|value| value != first) {
            return None;
        }
        side.push(*first);
    }
    combine_border_side(&side)
}
