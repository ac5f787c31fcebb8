use crate::{Document, DomError, NodeKey};

fn paragraph_with_text(doc: &mut Document, text: &str) -> (NodeKey, NodeKey, NodeKey) {
    let p = doc.create_element("div");
    let span = doc.create_element("span");
    let t = doc.create_text(text);
    doc.append_child(span, t).unwrap();
    doc.append_child(p, span).unwrap();
    (p, span, t)
}

#[test]
fn append_links_parent_and_children() {
    let mut doc = Document::new();
    let (p, span, t) = paragraph_with_text(&mut doc, "hello");
    assert_eq!(doc.parent(t), Some(span));
    assert_eq!(doc.parent(span), Some(p));
    assert_eq!(doc.children(p), &[span]);
    assert_eq!(doc.text_content(p), "hello");
}

#[test]
fn append_moves_node_from_previous_parent() {
    let mut doc = Document::new();
    let (p, span, _) = paragraph_with_text(&mut doc, "x");
    let other = doc.create_element("div");
    doc.append_child(other, span).unwrap();
    assert!(doc.children(p).is_empty());
    assert_eq!(doc.parent(span), Some(other));
}

#[test]
fn cycles_are_rejected() {
    let mut doc = Document::new();
    let (p, span, _) = paragraph_with_text(&mut doc, "x");
    assert_eq!(
        doc.append_child(span, p),
        Err(DomError::CycleDetected { parent: span, child: p })
    );
}

#[test]
fn text_and_br_cannot_have_children() {
    let mut doc = Document::new();
    let t = doc.create_text("a");
    let br = doc.create_element("br");
    let x = doc.create_element("span");
    assert_eq!(doc.append_child(t, x), Err(DomError::InvalidParent(t)));
    assert_eq!(doc.append_child(br, x), Err(DomError::InvalidParent(br)));
}

#[test]
fn insert_before_places_node() {
    let mut doc = Document::new();
    let p = doc.create_element("div");
    let a = doc.create_text("a");
    let c = doc.create_text("c");
    doc.append_children(p, &[a, c]).unwrap();
    let b = doc.create_text("b");
    doc.insert_before(p, b, Some(c)).unwrap();
    assert_eq!(doc.text_content(p), "abc");
    assert_eq!(doc.next_sibling(a), Some(b));
    assert_eq!(doc.previous_sibling(c), Some(b));
}

#[test]
fn remove_drops_subtree() {
    let mut doc = Document::new();
    let (p, span, t) = paragraph_with_text(&mut doc, "x");
    doc.remove(span).unwrap();
    assert!(!doc.is_live(span));
    assert!(!doc.is_live(t));
    assert!(doc.children(p).is_empty());
    assert_eq!(doc.set_text(t, "y"), Err(DomError::UnknownKey(t)));
}

#[test]
fn removed_slots_are_reused() {
    let mut source = Document::new();
    let (p, _, _) = paragraph_with_text(&mut source, "abc");
    let mut doc = Document::new();
    let container = doc.create_element("div");
    for _ in 0..100 {
        let copy = doc.import_subtree(&source, p).unwrap();
        doc.replace_children(container, &[copy]).unwrap();
    }
    assert_eq!(doc.descendants(container).len(), 3);
    assert!(doc.slot_count() <= 7, "slots: {}", doc.slot_count());
}

#[test]
fn reused_slots_do_not_revive_old_keys() {
    let mut doc = Document::new();
    let (_, span, t) = paragraph_with_text(&mut doc, "x");
    doc.remove(span).unwrap();
    let fresh = doc.create_text("y");
    assert_ne!(fresh, t);
    assert!(!doc.is_live(t));
    assert_eq!(doc.text_content(fresh), "y");
}

#[test]
fn replace_children_keeps_reused_nodes() {
    let mut doc = Document::new();
    let p = doc.create_element("div");
    let a = doc.create_text("a");
    let b = doc.create_text("b");
    doc.append_children(p, &[a, b]).unwrap();
    let c = doc.create_text("c");
    doc.replace_children(p, &[c, a]).unwrap();
    assert_eq!(doc.text_content(p), "ca");
    assert!(!doc.is_live(b));
}

#[test]
fn dataset_and_style_round_trip() {
    let mut doc = Document::new();
    let el = doc.create_element("SPAN");
    doc.set_data(el, "itype", "inline").unwrap();
    doc.set_style_property(el, "Font-Size", " 14px ").unwrap();
    doc.set_encoded_property(el, "fills", "[]").unwrap();
    assert_eq!(doc.tag_name(el), Some("span"));
    assert_eq!(doc.data(el, "itype"), Some("inline"));
    assert_eq!(doc.style_property(el, "font-size"), Some("14px"));
    assert_eq!(doc.encoded_property(el, "fills"), Some("[]"));

    doc.set_style_property(el, "font-size", "").unwrap();
    assert_eq!(doc.style_property(el, "font-size"), None);
}

#[test]
fn query_returns_document_order() {
    let mut doc = Document::new();
    let root = doc.create_element("div");
    let (p1, s1, _) = paragraph_with_text(&mut doc, "one");
    let (p2, s2, _) = paragraph_with_text(&mut doc, "two");
    for k in [s1, s2] {
        doc.set_data(k, "itype", "inline").unwrap();
    }
    doc.append_children(root, &[p1, p2]).unwrap();
    assert_eq!(doc.query_data_value(root, "itype", "inline"), vec![s1, s2]);
    assert_eq!(doc.text_content(root), "onetwo");
}

#[test]
fn import_subtree_copies_across_documents() {
    let mut src = Document::new();
    let (p, span, _) = paragraph_with_text(&mut src, "copy me");
    src.set_style_property(span, "font-weight", "700").unwrap();

    let mut dst = Document::new();
    let copy = dst.import_subtree(&src, p).unwrap();
    assert_eq!(dst.parent(copy), None);
    assert_eq!(dst.text_content(copy), "copy me");
    let copied_span = dst.first_child(copy).unwrap();
    assert_eq!(dst.style_property(copied_span, "font-weight"), Some("700"));
}

#[test]
fn normalize_merges_adjacent_text() {
    let mut doc = Document::new();
    let span = doc.create_element("span");
    let a = doc.create_text("ab");
    let empty = doc.create_text("");
    let b = doc.create_text("cd");
    doc.append_children(span, &[a, empty, b]).unwrap();
    doc.normalize(span).unwrap();
    assert_eq!(doc.children(span), &[a]);
    assert_eq!(doc.text(a), Some("abcd"));
}

#[test]
fn html_serialization_folds_styles() {
    let mut doc = Document::new();
    let span = doc.create_element("span");
    doc.set_data(span, "itype", "inline").unwrap();
    doc.set_style_property(span, "font-size", "14px").unwrap();
    let br = doc.create_element("br");
    doc.append_child(span, br).unwrap();
    assert_eq!(
        doc.to_html(span),
        "<span data-itype=\"inline\" style=\"font-size: 14px;\"><br></span>"
    );
}
