#![no_main]

use content::{from_dom, parse_content, to_dom};
use dom::Document;
use libfuzzer_sys::fuzz_target;

// Once content has been through the DOM, a second pass must not change it.
fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(Some(root)) = parse_content(json) else {
        return;
    };
    let mut doc = Document::new();
    let Ok(element) = to_dom(&mut doc, &root) else {
        return;
    };
    let Some(first) = from_dom(&doc, Some(element)) else {
        panic!("materialized root did not read back");
    };
    let element = to_dom(&mut doc, &first).expect("read-back content materializes");
    assert_eq!(from_dom(&doc, Some(element)), Some(first));
});
