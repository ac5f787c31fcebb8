#![no_main]

use core_types::Rect;
use layout::split_runs;
use libfuzzer_sys::fuzz_target;

// First byte: justify flag and the wrap pattern seed. The rest is the text.
fuzz_target!(|data: &[u8]| {
    let Some((&head, rest)) = data.split_first() else {
        return;
    };
    let text = String::from_utf8_lossy(rest);
    let justify = head & 1 == 1;
    let mut calls = 0usize;

    let runs = split_runs(&text, justify, |start, end| {
        assert!(text.is_char_boundary(start));
        assert!(text.is_char_boundary(end));
        assert!(start <= end);
        calls += 1;
        assert!(calls <= 4 * text.len() + 4, "scan made no progress");
        // Rect count driven by the seed so wraps land at arbitrary offsets.
        let count = ((head >> 1) as usize).wrapping_add(end * 7) % 3;
        (0..count)
            .map(|i| Rect {
                x: start as f32,
                y: i as f32 * 20.0,
                width: 10.0,
                height: 20.0,
            })
            .collect()
    });

    let total: usize = runs.iter().map(|run| run.text.chars().count()).sum();
    assert!(total <= text.chars().count());
    assert!(runs.iter().all(|run| !run.text.is_empty()));
});
