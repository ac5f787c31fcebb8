use crate::document::Document;
use crate::types::{NodeKey, NodeKind};
use std::fmt::Write;

fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

impl Document {
    /// Debug serialization. Inline style and encoded properties are folded into
    /// a single `style` attribute, encoded ones as `--name` custom properties.
    pub fn to_html(&self, key: NodeKey) -> String {
        let mut out = String::new();
        self.write_html(key, &mut out);
        out
    }

    fn write_html(&self, key: NodeKey, out: &mut String) {
        match self.kind(key) {
            Some(NodeKind::Text(text)) => escape_text(text, out),
            Some(NodeKind::Element(el)) => {
                out.push('<');
                out.push_str(&el.name);
                for (name, value) in &el.attributes {
                    out.push(' ');
                    out.push_str(name);
                    if let Some(v) = value {
                        out.push_str("=\"");
                        escape_attr(v, out);
                        out.push('"');
                    }
                }
                if !el.style.is_empty() || !el.encoded.is_empty() {
                    let mut style = String::new();
                    for (name, value) in &el.style {
                        let _ = write!(style, "{name}: {value}; ");
                    }
                    for (name, value) in &el.encoded {
                        let _ = write!(style, "--{name}: {value}; ");
                    }
                    out.push_str(" style=\"");
                    escape_attr(style.trim_end(), out);
                    out.push('"');
                }
                out.push('>');
                if &*el.name == "br" {
                    return;
                }
                for &child in self.children(key) {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(&el.name);
                out.push('>');
            }
            None => {}
        }
    }
}
