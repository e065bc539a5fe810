use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const INTERACTIVE_TAGS: &[&str] = &["A", "INPUT", "BUTTON", "SELECT", "TEXTAREA"];

const INLINE_HANDLERS: &[&str] = &["onclick", "onmousedown", "onmouseup", "onkeydown", "onkeyup"];

/// The slice of a DOM element the classifiers look at.
pub trait ElementLike {
    fn tag_name(&self) -> &str;

    fn get_attribute(&self, name: &str) -> Option<&str>;

    fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }
}

/// Resolved style values, as returned by `getComputedStyle` in a page script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputedStyle {
    pub cursor: String,
    pub opacity: String,
    pub display: String,
    pub visibility: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            cursor: "auto".into(),
            opacity: "1".into(),
            display: "block".into(),
            visibility: "visible".into(),
        }
    }
}

/// A detached element description, typically deserialized from a page script result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    #[serde(rename = "tagName")]
    pub tag_name: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl ElementSnapshot {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

impl ElementLike for ElementSnapshot {
    fn tag_name(&self) -> &str {
        &self.tag_name
    }

    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// True for native controls, elements with inline input handlers, or a pointer cursor.
pub fn is_interactive<E: ElementLike + ?Sized>(element: &E, style: &ComputedStyle) -> bool {
    let tag = element.tag_name();
    INTERACTIVE_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
        || INLINE_HANDLERS.iter().any(|h| element.has_attribute(h))
        || style.cursor == "pointer"
}

pub fn is_visible<E: ElementLike + ?Sized>(element: &E, style: &ComputedStyle) -> bool {
    !style.opacity.is_empty()
        && style.opacity != "0"
        && style.display != "none"
        && style.visibility != "hidden"
        && element.get_attribute("aria-hidden") != Some("true")
}

/// An element worth offering as an action target.
pub fn is_actionable<E: ElementLike + ?Sized>(element: &E, style: &ComputedStyle) -> bool {
    is_interactive(element, style) && is_visible(element, style)
}
