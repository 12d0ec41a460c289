//! In-page element lookup.
//!
//! Selectors are resolved by a small script evaluated in the top document. It
//! searches the document first and then every same-origin frame, depth first,
//! so controls rendered inside the Catch-e frames are reachable with the same
//! selectors as top-level ones. Coordinates are reported in top-level viewport
//! space so CDP mouse events land on the element.

use crate::{Error, Result};
use catche_core::Selector;
use serde::Deserialize;

const LOCATOR_JS: &str = r#"
(function (selector, action, value) {
    function find(doc) {
        if (selector.kind === 'css') {
            return doc.querySelector(selector.value);
        }
        const spec = selector.value;
        const needle = spec.text.trim();
        const matches = Array.from(doc.querySelectorAll(spec.scope)).filter(function (el) {
            const text = (el.textContent || '').replace(/\s+/g, ' ').trim();
            return spec.exact ? text === needle : text.indexOf(needle) !== -1;
        });
        const innermost = matches.filter(function (el) {
            return !matches.some(function (other) { return other !== el && el.contains(other); });
        });
        return innermost[0] || null;
    }

    function search(doc, frames) {
        const el = find(doc);
        if (el) {
            return { el: el, frames: frames };
        }
        const children = doc.querySelectorAll('iframe, frame');
        for (let i = 0; i < children.length; i++) {
            let inner = null;
            try { inner = children[i].contentDocument; } catch (e) { inner = null; }
            if (!inner) {
                continue;
            }
            const found = search(inner, frames.concat([children[i]]));
            if (found) {
                return found;
            }
        }
        return null;
    }

    const found = search(document, []);
    if (!found) {
        return null;
    }
    const el = found.el;

    if (action === 'exists') {
        return true;
    }
    if (action === 'fill') {
        el.focus();
        el.value = value;
        el.dispatchEvent(new Event('input', { bubbles: true }));
        el.dispatchEvent(new Event('change', { bubbles: true }));
        return true;
    }
    if (action === 'point') {
        el.scrollIntoView({ block: 'center', inline: 'center' });
        let x = 0;
        let y = 0;
        for (let i = 0; i < found.frames.length; i++) {
            const rect = found.frames[i].getBoundingClientRect();
            x += rect.left + found.frames[i].clientLeft;
            y += rect.top + found.frames[i].clientTop;
        }
        const rect = el.getBoundingClientRect();
        return { x: x + rect.left + rect.width / 2, y: y + rect.top + rect.height / 2 };
    }
    return null;
})
"#;

/// What the locator script does with the element it finds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// `true` when present, `null` otherwise
    Exists,
    /// Set the element's value; `true` when done, `null` when absent
    Fill,
    /// Scroll into view and return the centre point, `null` when absent
    Point,
}

impl Action {
    fn as_str(&self) -> &'static str {
        match self {
            Action::Exists => "exists",
            Action::Fill => "fill",
            Action::Point => "point",
        }
    }
}

/// Centre of an element in top-level viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub(crate) struct ViewportPoint {
    pub x: f64,
    pub y: f64,
}

/// Build the expression that applies `action` to the first match of `selector`
pub(crate) fn script(selector: &Selector, action: Action, value: Option<&str>) -> Result<String> {
    let encode = |v: serde_json::Result<String>| v.map_err(|e| Error::Script(e.to_string()));

    Ok(format!(
        "{}({}, {}, {})",
        LOCATOR_JS.trim(),
        encode(serde_json::to_string(selector))?,
        encode(serde_json::to_string(action.as_str()))?,
        encode(serde_json::to_string(&value))?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_embeds_selector_as_json() {
        let script = script(&Selector::contains("td", "Card Services"), Action::Point, None).unwrap();

        assert!(script.starts_with("(function (selector, action, value)"));
        assert!(script.ends_with(
            r#"({"kind":"text","value":{"scope":"td","text":"Card Services","exact":false}}, "point", null)"#
        ));
    }

    #[test]
    fn test_fill_value_is_escaped() {
        let script = script(
            &Selector::css("input[name=\"fm_int_interface_code\"]"),
            Action::Fill,
            Some("CAL\"NS"),
        )
        .unwrap();

        assert!(script.contains(r#""input[name=\"fm_int_interface_code\"]""#));
        assert!(script.ends_with(r#""fill", "CAL\"NS")"#));
    }

    #[test]
    fn test_point_deserializes_from_script_result() {
        let point: Option<ViewportPoint> =
            serde_json::from_value(serde_json::json!({ "x": 10.5, "y": 20.0 })).unwrap();
        assert_eq!(point, Some(ViewportPoint { x: 10.5, y: 20.0 }));

        let absent: Option<ViewportPoint> = serde_json::from_value(serde_json::Value::Null).unwrap();
        assert!(absent.is_none());
    }
}
