use dom::{Document, NodeKey};

/// Where a computed value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Declared on the element itself.
    Specified,
    /// Copied from the parent's computed value.
    Inherited,
    /// The property's initial value.
    Initial,
}

/// Properties the editing surface cares about that inherit by default.
/// `text-direction` is the model's name for `direction` and inherits the same way.
const INHERITED: &[&str] = &[
    "color",
    "direction",
    "font-family",
    "font-size",
    "font-style",
    "font-variant",
    "font-weight",
    "letter-spacing",
    "line-height",
    "text-align",
    "text-direction",
    "text-transform",
    "white-space",
    "pointer-events",
];

const INITIAL: &[(&str, &str)] = &[
    ("direction", "ltr"),
    ("display", "inline"),
    ("font-size", "16px"),
    ("font-style", "normal"),
    ("font-variant", "normal"),
    ("font-weight", "400"),
    ("letter-spacing", "normal"),
    ("line-height", "normal"),
    ("pointer-events", "auto"),
    ("position", "static"),
    ("text-align", "left"),
    ("text-decoration", "none"),
    ("text-transform", "none"),
    ("vertical-align", "baseline"),
    ("white-space", "normal"),
];

pub fn is_inherited(name: &str) -> bool {
    INHERITED.contains(&name)
}

pub fn initial_value(name: &str) -> Option<&'static str> {
    INITIAL.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
}

fn default_display_for(tag: &str) -> &'static str {
    match tag {
        "div" | "p" | "body" | "html" => "block",
        _ => "inline",
    }
}

/// Resolved style of one node: every specified, inherited or initial value
/// we know about, each tagged with its [`Origin`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComputedStyle {
    values: Vec<(String, String, Origin)>,
}

impl ComputedStyle {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _, _)| k == name)
            .map(|(_, v, _)| v.as_str())
    }

    /// Like [`get`](Self::get) but falls back to `default` when the value is
    /// missing or empty.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.get(name) {
            Some(v) if !v.is_empty() => v,
            _ => default,
        }
    }

    pub fn origin(&self, name: &str) -> Option<Origin> {
        self.values
            .iter()
            .find(|(k, _, _)| k == name)
            .map(|(_, _, o)| *o)
    }

    /// The value only if the node itself declares it.
    pub fn specified(&self, name: &str) -> Option<&str> {
        match self.origin(name) {
            Some(Origin::Specified) => self.get(name),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Origin)> {
        self.values
            .iter()
            .map(|(k, v, o)| (k.as_str(), v.as_str(), *o))
    }

    fn set(&mut self, name: &str, value: &str, origin: Origin) {
        match self.values.iter_mut().find(|(k, _, _)| k == name) {
            Some(entry) => {
                entry.1 = value.to_string();
                entry.2 = origin;
            }
            None => self
                .values
                .push((name.to_string(), value.to_string(), origin)),
        }
    }
}

/// Compute the final, inherited style for `key` (`getComputedStyle`).
///
/// - Inherited properties come from the parent's computed style.
/// - The element's own inline declarations override them.
/// - Known properties still missing get their initial value.
///
/// Text nodes resolve to their parent's style.
pub fn compute_style(doc: &Document, key: NodeKey) -> ComputedStyle {
    if doc.is_text(key) {
        return match doc.parent(key) {
            Some(parent) => inherit_all(&compute_style(doc, parent)),
            None => initial_style(),
        };
    }

    let mut chain = vec![key];
    chain.extend(doc.ancestors(key));

    let mut parent: Option<ComputedStyle> = None;
    for &node in chain.iter().rev() {
        parent = Some(compute_one(doc, node, parent.as_ref()));
    }
    parent.unwrap_or_else(initial_style)
}

fn compute_one(doc: &Document, key: NodeKey, parent: Option<&ComputedStyle>) -> ComputedStyle {
    // 1. Inherit
    let mut result = ComputedStyle::default();
    if let Some(p) = parent {
        for (name, value, _) in p.iter() {
            if is_inherited(name) {
                result.set(name, value, Origin::Inherited);
            }
        }
    }

    // 2. Apply specified declarations
    for (name, value) in doc.style_declarations(key) {
        result.set(name, value, Origin::Specified);
    }

    // 3. Fill initial values
    for (name, value) in INITIAL {
        if result.get(name).is_none() {
            if *name == "display" {
                let display = doc.tag_name(key).map(default_display_for).unwrap_or(*value);
                result.set(name, display, Origin::Initial);
            } else {
                result.set(name, value, Origin::Initial);
            }
        }
    }
    result
}

fn inherit_all(parent: &ComputedStyle) -> ComputedStyle {
    let mut result = ComputedStyle::default();
    for (name, value, origin) in parent.iter() {
        let origin = if origin == Origin::Initial {
            Origin::Initial
        } else {
            Origin::Inherited
        };
        result.set(name, value, origin);
    }
    result
}

fn initial_style() -> ComputedStyle {
    let mut result = ComputedStyle::default();
    for (name, value) in INITIAL {
        result.set(name, value, Origin::Initial);
    }
    result
}
