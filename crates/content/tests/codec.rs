use content::{
    ContentError, EditorDefaults, Inline, Level, Paragraph, Root, StyleMap, StyleSource,
    create_element_from_node, create_inline_element, from_dom, to_dom,
};
use dom::Document;
use serde_json::json;

fn sample() -> Root {
    Root::new(vec![
        Paragraph::new(vec![
            Inline::new("Hello ")
                .with_attr("font-family", "sourcesanspro")
                .with_attr("font-size", "14"),
            Inline::new("world").with_attr("font-weight", "700"),
        ])
        .with_attr("text-align", "center")
        .with_attr("font-size", "16"),
        Paragraph::new(vec![Inline::new("second").with_attr("letter-spacing", "2")])
            .with_attr("text-direction", "rtl"),
    ])
    .with_attr("vertical-align", "bottom")
}

#[test]
fn round_trip_preserves_structure_and_styles() {
    let mut doc = Document::new();
    let model = sample();
    let root = to_dom(&mut doc, &model).unwrap();
    let back = from_dom(&doc, Some(root)).unwrap();
    assert_eq!(back, model);
}

#[test]
fn numeric_native_attributes_round_trip() {
    let model = Root::new(vec![
        Paragraph::new(vec![
            Inline::new("x")
                .with_attr("font-size", 14)
                .with_attr("line-height", 1.2)
                .with_attr("fills", json!([{ "fill-opacity": 1 }])),
        ])
        .with_attr("font-size", 16),
    ]);
    let inline = &model.paragraphs()[0].inlines[0];
    assert_eq!(inline.attrs["font-size"], json!("14"));
    assert_eq!(inline.attrs["line-height"], json!("1.2"));
    assert_eq!(inline.attrs["fills"], json!([{ "fill-opacity": 1 }]));

    let mut doc = Document::new();
    let root = to_dom(&mut doc, &model).unwrap();
    assert_eq!(from_dom(&doc, Some(root)), Some(model));
}

#[test]
fn units_are_written_and_stripped() {
    let mut doc = Document::new();
    let root = to_dom(&mut doc, &sample()).unwrap();
    let paragraph = doc.children(root)[0];
    assert_eq!(doc.style_property(paragraph, "font-size"), Some("16px"));
    assert_eq!(doc.data(paragraph, "itype"), Some("paragraph"));
    assert_eq!(doc.tag_name(doc.children(paragraph)[0]), Some("span"));

    let back = from_dom(&doc, Some(root)).unwrap();
    assert_eq!(back.paragraphs()[0].attrs["font-size"], json!("16"));
}

#[test]
fn inherited_paragraph_styles_do_not_leak_into_inlines() {
    let mut doc = Document::new();
    let root = to_dom(&mut doc, &sample()).unwrap();
    let back = from_dom(&doc, Some(root)).unwrap();
    let world = &back.paragraphs()[0].inlines[1];
    assert!(!world.attrs.contains_key("font-size"));
    assert!(!world.attrs.contains_key("line-height"));
}

#[test]
fn newline_sentinel_becomes_a_single_break() {
    let mut doc = Document::new();
    let model = Root::new(vec![Paragraph::new(vec![
        Inline::new("a"),
        Inline::line_break(),
    ])]);
    let root = to_dom(&mut doc, &model).unwrap();
    let paragraph = doc.children(root)[0];
    let br_inline = doc.children(paragraph)[1];

    let children = doc.children(br_inline);
    assert_eq!(children.len(), 1);
    assert!(doc.is_line_break(children[0]));
    assert!(doc.text_nodes(br_inline).is_empty());

    let back = from_dom(&doc, Some(root)).unwrap();
    assert_eq!(back.paragraphs()[0].inlines[1].text, "\n");
}

#[test]
fn encoded_attributes_use_the_side_channel() {
    let fills = json!([{ "fill-color": "#ff0000", "fill-opacity": 0.5 }]);
    let model = Root::new(vec![Paragraph::new(vec![
        Inline::new("red")
            .with_attr("fills", fills.clone())
            .with_attr("typography-ref-id", "abc"),
    ])]);
    let mut doc = Document::new();
    let root = to_dom(&mut doc, &model).unwrap();
    let inline = doc.children(doc.children(root)[0])[0];
    assert_eq!(doc.style_property(inline, "fills"), None);
    assert!(doc.encoded_property(inline, "fills").is_some());

    let back = from_dom(&doc, Some(root)).unwrap();
    assert_eq!(back.paragraphs()[0].inlines[0].attrs["fills"], fills);
    assert_eq!(
        back.paragraphs()[0].inlines[0].attrs["typography-ref-id"],
        json!("abc")
    );
}

#[test]
fn malformed_encoding_is_treated_as_absent() {
    let mut doc = Document::new();
    let root = to_dom(&mut doc, &sample()).unwrap();
    let inline = doc.children(doc.children(root)[0])[0];
    doc.set_encoded_property(inline, "fills", "[{\"fill-color\":").unwrap();

    let back = from_dom(&doc, Some(root)).unwrap();
    let attrs = &back.paragraphs()[0].inlines[0].attrs;
    assert!(!attrs.contains_key("fills"));
    assert_eq!(attrs["font-family"], json!("sourcesanspro"));
}

#[test]
fn invalid_model_leaves_document_untouched() {
    let mut doc = Document::new();
    let bad = Root::new(vec![Paragraph::new(vec![Inline::new("ok")]), Paragraph::new(vec![])]);
    let err = to_dom(&mut doc, &bad).unwrap_err();
    assert!(matches!(err, ContentError::InvalidParagraph { index: 1, .. }));
    assert_eq!(doc.node_count(), 0);

    let empty = Root::new(vec![]);
    assert!(matches!(
        to_dom(&mut doc, &empty),
        Err(ContentError::InvalidParagraphSet(_))
    ));
    assert_eq!(doc.node_count(), 0);
}

#[test]
fn inline_children_cannot_mix_text_and_breaks() {
    let mut doc = Document::new();
    let text = doc.create_text("a");
    let br = doc.create_element("br");
    let defaults = EditorDefaults::default().resolve();
    let source = StyleSource::Defaults {
        defaults: &defaults,
        overrides: None,
    };

    let err = create_element_from_node(&mut doc, Level::Inline, source, &[text, br]).unwrap_err();
    assert!(matches!(
        err,
        ContentError::InvalidChildren {
            level: Level::Inline,
            ..
        }
    ));
    let err = create_element_from_node(&mut doc, Level::Inline, source, &[]).unwrap_err();
    assert!(matches!(err, ContentError::InvalidChildren { .. }));

    let err = create_element_from_node(&mut doc, Level::Paragraph, source, &[text]).unwrap_err();
    assert_eq!(
        err,
        ContentError::InvalidChildren {
            level: Level::Paragraph,
            reason: "some child is not an inline".into()
        }
    );
}

#[test]
fn defaults_fill_styles_and_overrides_win() {
    let mut doc = Document::new();
    let defaults = EditorDefaults::default().resolve();
    let overrides: StyleMap = [("font-weight".to_string(), "700".to_string())].into();
    let inline = create_inline_element(
        &mut doc,
        "",
        StyleSource::Defaults {
            defaults: &defaults,
            overrides: Some(&overrides),
        },
    )
    .unwrap();
    assert_eq!(doc.style_property(inline, "font-weight"), Some("700"));
    assert_eq!(doc.style_property(inline, "font-size"), Some("14px"));
    assert_eq!(doc.style_property(inline, "font-variant"), Some("regular"));
    assert_eq!(doc.text_content(inline), "");
}

#[test]
fn missing_root_reads_as_no_content() {
    let doc = Document::new();
    assert_eq!(from_dom(&doc, None), None);
}
