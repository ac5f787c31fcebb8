use crate::LayoutNode;
use core_types::Rect;
use dom::Document;
use log::warn;
use serde::Serialize;
use serde_json::{Value, json};

/// Renderable record for one measured run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PositionData {
    pub text: String,
    pub fills: Value,
    pub direction: String,
    pub font_family: String,
    pub font_size: String,
    pub font_style: String,
    pub font_weight: String,
    pub font_variant: String,
    pub text_decoration: String,
    pub text_transform: String,
    pub line_height: String,
    pub letter_spacing: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

pub fn default_fills() -> Value {
    json!([{ "fill-color": "#000000", "fill-opacity": 1 }])
}

impl PositionData {
    /// Projects a layout node through its inline's resolved style. `None`
    /// when the node was never measured.
    pub fn from_layout_node(doc: &Document, node: &LayoutNode) -> Option<PositionData> {
        let rect: Rect = node.rect?;
        let style = css::compute_style(doc, node.node);
        let get = |name: &str| style.get_or(name, "").to_string();

        let fills = match doc.encoded_property(node.node, "fills") {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|err| {
                warn!(target: "layout.scan", "malformed fills on {}: {err}", node.node);
                default_fills()
            }),
            None => default_fills(),
        };

        Some(PositionData {
            text: node.text.clone(),
            fills,
            direction: style.get_or("text-direction", "ltr").to_string(),
            font_family: get("font-family"),
            font_size: get("font-size"),
            font_style: get("font-style"),
            font_weight: get("font-weight"),
            font_variant: get("font-variant"),
            text_decoration: get("text-decoration"),
            text_transform: get("text-transform"),
            line_height: get("line-height"),
            letter_spacing: get("letter-spacing"),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            x1: rect.x1(),
            y1: rect.y1(),
            x2: rect.x2(),
            y2: rect.y2(),
        })
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
