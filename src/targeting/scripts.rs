/// Function source an executor calls on a resolved node (`this`) before acting on it,
/// centring the node in the viewport.
pub const SCROLL_INTO_VIEW_SCRIPT: &str =
    "function() { this.scrollIntoView({ block: 'center', inline: 'center' }); }";

/// Page script resolving a CSS selector to the inputs of the element classifiers.
///
/// Evaluates to `null` when nothing matches, otherwise to
/// `{ element: { tagName, attributes }, style: { cursor, opacity, display, visibility } }`,
/// which deserializes into [`super::element::ElementSnapshot`] and [`super::element::ComputedStyle`].
pub fn describe_element_script(css_selector: &str) -> String {
    let selector = serde_json::Value::String(css_selector.to_string());
    format!(
        r#"(() => {{
  const el = document.querySelector({selector});
  if (!el) return null;
  const cs = window.getComputedStyle(el);
  const attributes = {{}};
  for (const attr of el.attributes) attributes[attr.name] = attr.value;
  return {{
    element: {{ tagName: el.tagName, attributes }},
    style: {{ cursor: cs.cursor, opacity: cs.opacity, display: cs.display, visibility: cs.visibility }},
  }};
}})()"#
    )
}

/// Page script counting elements matched by `css_selector`; the usual stability measurement.
pub fn count_elements_script(css_selector: &str) -> String {
    let selector = serde_json::Value::String(css_selector.to_string());
    format!("document.querySelectorAll({selector}).length")
}
