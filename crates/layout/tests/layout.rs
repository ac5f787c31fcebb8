use content::{Inline, Paragraph, Root};
use dom::Document;
use layout::{MonospaceMeasurer, PositionData, TextLayout, default_fills};
use serde_json::json;

fn engine() -> TextLayout<MonospaceMeasurer> {
    TextLayout::new(MonospaceMeasurer::new(10.0, 20.0)).unwrap()
}

fn single(text: &str, align: &str) -> Root {
    Root::new(vec![
        Paragraph::new(vec![Inline::new(text)]).with_attr("text-align", align),
    ])
}

fn texts(positions: &[PositionData]) -> Vec<&str> {
    positions.iter().map(|p| p.text.as_str()).collect()
}

#[test]
fn wrapped_inline_yields_one_run_per_line() {
    let mut layout = engine();
    let positions = layout
        .layout_from_content(&single("abcdefgh", "left"), 40.0)
        .unwrap();
    assert_eq!(texts(&positions), ["abcd", "efgh"]);

    let first = &positions[0];
    assert_eq!((first.x, first.y, first.width, first.height), (0.0, 0.0, 40.0, 20.0));
    assert_eq!((first.x2, first.y2), (40.0, 20.0));
    let second = &positions[1];
    assert_eq!((second.x, second.y, second.width), (0.0, 20.0, 40.0));
}

#[test]
fn justify_never_straddles_a_space() {
    let mut layout = engine();
    let positions = layout
        .layout_from_content(&single("ab cd", "justify"), 200.0)
        .unwrap();
    assert_eq!(texts(&positions), ["ab", "cd"]);
    assert_eq!(positions[1].x, 30.0);
}

#[test]
fn paragraphs_and_breaks_stack_vertically() {
    let root = Root::new(vec![
        Paragraph::new(vec![Inline::new("a"), Inline::line_break(), Inline::new("b")]),
        Paragraph::new(vec![Inline::new("second")]),
    ]);
    let mut layout = engine();
    let positions = layout.layout_from_content(&root, 100.0).unwrap();
    assert_eq!(texts(&positions), ["a", "b", "second"]);
    let ys: Vec<f32> = positions.iter().map(|p| p.y).collect();
    assert_eq!(ys, [0.0, 20.0, 40.0]);
}

#[test]
fn right_alignment_offsets_runs() {
    let mut layout = engine();
    let positions = layout
        .layout_from_content(&single("ab", "right"), 100.0)
        .unwrap();
    assert_eq!(positions[0].x, 80.0);
}

#[test]
fn empty_inlines_produce_nothing() {
    let mut layout = engine();
    let positions = layout.layout_from_content(&single("", "left"), 100.0).unwrap();
    assert!(positions.is_empty());
}

#[test]
fn position_data_carries_resolved_style() {
    let fills = json!([{ "fill-color": "#336699", "fill-opacity": 0.5 }]);
    let root = Root::new(vec![
        Paragraph::new(vec![
            Inline::new("styled")
                .with_attr("font-weight", "700")
                .with_attr("font-family", "mono")
                .with_attr("fills", fills.clone()),
            Inline::new(" plain"),
        ])
        .with_attr("text-direction", "rtl")
        .with_attr("font-size", "14"),
    ]);
    let mut layout = engine();
    let positions = layout.layout_from_content(&root, 500.0).unwrap();
    assert_eq!(texts(&positions), ["styled", " plain"]);

    let styled = &positions[0];
    assert_eq!(styled.fills, fills);
    assert_eq!(styled.font_weight, "700");
    assert_eq!(styled.font_family, "mono");
    assert_eq!(styled.direction, "rtl");
    assert_eq!(styled.font_size, "14px");

    let plain = &positions[1];
    assert_eq!(plain.fills, default_fills());
    assert_eq!(plain.font_weight, "400");
    assert_eq!(plain.x, 60.0);

    let value = serde_json::to_value(styled).unwrap();
    assert_eq!(value["font-family"], json!("mono"));
    assert_eq!(value["x2"], json!(60.0));
}

#[test]
fn layout_leaves_the_source_alone_and_reuses_its_surface() {
    let mut doc = Document::new();
    let host = doc.create_element("div");
    doc.set_style_property(host, "width", "40px").unwrap();
    let root = content::to_dom(&mut doc, &single("abcdefgh", "left")).unwrap();
    doc.append_child(host, root).unwrap();
    let before = doc.to_html(host);

    let mut layout = engine();
    let first = layout.layout_from_element(&doc, root).unwrap();
    let second = layout.layout_from_element(&doc, root).unwrap();
    assert_eq!(first, second);
    assert_eq!(doc.to_html(host), before);

    let surface = layout.surface();
    assert_eq!(surface.children(layout.container()).len(), 1);
    assert_eq!(surface.style_property(layout.container(), "width"), Some("40px"));
    assert_eq!(surface.data(layout.container(), "layout"), Some("true"));
}

#[test]
fn engines_are_independent() {
    let mut narrow = engine();
    let mut wide = engine();
    let root = single("abcdefgh", "left");
    assert_eq!(narrow.layout_from_content(&root, 40.0).unwrap().len(), 2);
    assert_eq!(wide.layout_from_content(&root, 400.0).unwrap().len(), 1);
    assert_eq!(narrow.layout_from_content(&root, 40.0).unwrap().len(), 2);
}

#[test]
fn stale_element_is_an_error() {
    let doc = Document::new();
    let mut layout = engine();
    assert!(layout.layout_from_element(&doc, dom::NodeKey(42)).is_err());
}

/// Deterministic pseudo-random text over a small alphabet.
fn sample_text(seed: u64, len: usize) -> String {
    const ALPHABET: &[char] = &['a', 'b', 'é', ' ', 'x', 'ß', 'q', ' '];
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ALPHABET[(state >> 33) as usize % ALPHABET.len()]
        })
        .collect()
}

#[test]
fn runs_reassemble_the_text() {
    for seed in 0..40u64 {
        let text = sample_text(seed, 1 + (seed as usize * 7) % 60);
        for width in [10.0, 30.0, 70.0, 1000.0] {
            let mut layout = engine();
            let left = layout
                .layout_from_content(&single(&text, "left"), width)
                .unwrap();
            let joined: String = left.iter().map(|p| p.text.as_str()).collect();
            assert_eq!(joined, text, "seed {seed}, width {width}");

            let justified = layout
                .layout_from_content(&single(&text, "justify"), width)
                .unwrap();
            let joined: String = justified.iter().map(|p| p.text.as_str()).collect();
            let expected: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            assert_eq!(joined, expected, "seed {seed}, width {width}");
        }
    }
}

#[test]
fn repeated_passes_reuse_the_measurement_surface() {
    let mut layout = engine();
    let root = Root::new(vec![
        Paragraph::new(vec![Inline::new("abc"), Inline::new("def")]),
        Paragraph::new(vec![Inline::new("ghi")]),
    ]);
    for _ in 0..2 {
        layout.layout_from_content(&root, 400.0).unwrap();
    }
    let settled = layout.surface().slot_count();
    for _ in 0..50 {
        let positions = layout.layout_from_content(&root, 400.0).unwrap();
        assert_eq!(texts(&positions), ["abc", "def", "ghi"]);
    }
    assert_eq!(layout.surface().slot_count(), settled);
}
