//! Run-splitting scan.
//!
//! Recovers visually contiguous runs from one text node using nothing but
//! range rect queries: a run ends when extending it by one char makes the
//! range span two rects (the char wrapped), or, under `justify`, at every
//! whitespace char.

use core_types::Rect;
use log::trace;

/// One flushed run of a single text node.
#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    pub text: String,
    pub rect: Option<Rect>,
}

/// Splits `text` into runs.
///
/// `measure(start, end)` returns the client rects of the byte range
/// `[start, end)`; rects with no width must already be filtered out.
/// Offsets passed to it are always char boundaries.
///
/// Runs with empty text are not reported. An empty measurement never
/// replaces the last good rect of the run being built; a run that never
/// measured anything is reported with no rect.
pub fn split_runs<F>(text: &str, justify: bool, mut measure: F) -> Vec<Run>
where
    F: FnMut(usize, usize) -> Vec<Rect>,
{
    // Byte offset of every char start plus the end of the text, so `to + 1`
    // is always the next char boundary.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let chars: Vec<char> = text.chars().collect();
    let size = chars.len();

    let mut runs = Vec::new();
    let mut from = 0usize;
    let mut to = 0usize;
    let mut current = String::new();
    let mut prev_rect: Option<Rect> = None;
    // Set when the last step closed a run without advancing `to`; a second
    // multi-rect measurement in a row then skips forward instead of looping.
    let mut guard = false;

    while to < size {
        let rects = measure(bounds[from], bounds[to + 1]);
        let split_by_words = justify && chars[to].is_whitespace();

        if rects.len() > 1 && guard {
            trace!(target: "layout.scan", "skipping char {to} after repeated wrap");
            from += 1;
            to += 1;
            guard = false;
        } else if rects.len() > 1 || split_by_words {
            trace!(
                target: "layout.scan",
                "run boundary at {to} (wrap: {}, word: {split_by_words})",
                rects.len() > 1
            );
            flush(&mut runs, &mut current, prev_rect);
            prev_rect = None;
            if split_by_words {
                to += 1;
            }
            from = to;
            guard = true;
        } else {
            if let Some(rect) = rects.first() {
                prev_rect = Some(*rect);
            }
            current.push(chars[to]);
            to += 1;
            guard = false;
        }
    }

    let rects = measure(bounds[from.min(size)], bounds[to.min(size)]);
    flush(&mut runs, &mut current, rects.first().copied());
    runs
}

fn flush(runs: &mut Vec<Run>, text: &mut String, rect: Option<Rect>) {
    if text.is_empty() {
        return;
    }
    runs.push(Run {
        text: std::mem::take(text),
        rect,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed 10px chars, `per_line` chars per line.
    fn grid(text: &str, per_line: usize) -> impl FnMut(usize, usize) -> Vec<Rect> + '_ {
        move |start, end| {
            let first = text[..start].chars().count();
            let last = first + text[start..end].chars().count();
            let mut rects: Vec<Rect> = Vec::new();
            for i in first..last {
                let line = i / per_line;
                let col = i % per_line;
                let rect = Rect::new(col as f32 * 10.0, line as f32 * 20.0, 10.0, 20.0);
                match rects.last_mut() {
                    Some(last) if last.y == rect.y => *last = last.union(&rect),
                    _ => rects.push(rect),
                }
            }
            rects
        }
    }

    fn texts(runs: &[Run]) -> Vec<&str> {
        runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn wrapped_text_splits_per_line() {
        let runs = split_runs("abcdefgh", false, grid("abcdefgh", 4));
        assert_eq!(texts(&runs), ["abcd", "efgh"]);
        assert_eq!(runs[0].rect, Some(Rect::new(0.0, 0.0, 40.0, 20.0)));
        assert_eq!(runs[1].rect, Some(Rect::new(0.0, 20.0, 40.0, 20.0)));
    }

    #[test]
    fn justify_splits_at_whitespace() {
        let runs = split_runs("ab cd", true, grid("ab cd", 80));
        assert_eq!(texts(&runs), ["ab", "cd"]);
        assert_eq!(runs[1].rect, Some(Rect::new(30.0, 0.0, 20.0, 20.0)));
    }

    #[test]
    fn consecutive_whitespace_under_justify_emits_no_empty_runs() {
        let runs = split_runs("a   b", true, grid("a   b", 80));
        assert_eq!(texts(&runs), ["a", "b"]);
    }

    #[test]
    fn left_aligned_text_keeps_spaces() {
        let runs = split_runs("ab cd", false, grid("ab cd", 80));
        assert_eq!(texts(&runs), ["ab cd"]);
    }

    #[test]
    fn repeated_wrap_skips_forward() {
        // Every range straddles two lines.
        let runs = split_runs("xyz", false, |_, _| {
            vec![Rect::new(0.0, 0.0, 5.0, 5.0), Rect::new(0.0, 5.0, 5.0, 5.0)]
        });
        assert!(runs.is_empty());
    }

    #[test]
    fn empty_measurement_keeps_last_rect() {
        let first = Rect::new(0.0, 0.0, 10.0, 20.0);
        let second = Rect::new(0.0, 20.0, 10.0, 20.0);
        let runs = split_runs("abc", false, |start, end| match (start, end) {
            (0, 1) => vec![first],
            (0, 3) => vec![first, second],
            (2, 3) => vec![second],
            _ => Vec::new(),
        });
        assert_eq!(
            runs,
            vec![
                Run {
                    text: "ab".into(),
                    rect: Some(first)
                },
                Run {
                    text: "c".into(),
                    rect: Some(second)
                },
            ]
        );
    }

    #[test]
    fn unmeasured_run_does_not_inherit_the_previous_rect() {
        let line1 = Rect::new(0.0, 0.0, 20.0, 20.0);
        let line2 = Rect::new(0.0, 20.0, 10.0, 20.0);
        // "cd" only ever measures empty; the space closes it under justify.
        let runs = split_runs("abcd e", true, |start, end| match (start, end) {
            (0, 1) | (0, 2) => vec![line1],
            (0, 3) => vec![line1, line2],
            (5, 6) => vec![line2],
            _ => Vec::new(),
        });
        assert_eq!(texts(&runs), ["ab", "cd", "e"]);
        assert_eq!(runs[0].rect, Some(line1));
        assert_eq!(runs[1].rect, None);
        assert_eq!(runs[2].rect, Some(line2));
    }

    #[test]
    fn every_char_survives_without_justify() {
        for per_line in 1..6 {
            let text = "héllo wörld, ça va?";
            let runs = split_runs(text, false, grid(text, per_line));
            let joined: String = runs.iter().map(|r| r.text.as_str()).collect();
            assert_eq!(joined, text, "per_line = {per_line}");
        }
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(split_runs("", false, grid("", 4)).is_empty());
    }
}
