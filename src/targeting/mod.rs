pub mod element;
pub mod scripts;
pub mod selector;

use serde::Deserialize;

pub use element::{is_actionable, is_interactive, is_visible, ComputedStyle, ElementLike, ElementSnapshot};
pub use selector::xpath_to_css;

/// Result of evaluating [`scripts::describe_element_script`] on a page.
#[derive(Debug, Clone, Deserialize)]
pub struct DescribedElement {
    pub element: ElementSnapshot,
    #[serde(default)]
    pub style: ComputedStyle,
}

impl DescribedElement {
    pub fn is_actionable(&self) -> bool {
        is_actionable(&self.element, &self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn described_hidden_button_is_not_actionable() {
        let raw = r#"{
            "element": {"tagName": "BUTTON", "attributes": {"type": "submit"}},
            "style": {"cursor": "pointer", "opacity": "1", "display": "none", "visibility": "visible"}
        }"#;
        let described: DescribedElement = serde_json::from_str(raw).unwrap();
        assert!(!described.is_actionable());
    }
}
