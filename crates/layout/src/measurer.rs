use core_types::{Rect, Size};
use dom::{Document, NodeKey};
use std::collections::HashMap;

/// A range inside one text node, in UTF-8 byte offsets on char boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRange {
    pub node: NodeKey,
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub const fn new(node: NodeKey, start: usize, end: usize) -> Self {
        Self { node, start, end }
    }

    pub fn set_start(&mut self, node: NodeKey, offset: usize) {
        self.node = node;
        self.start = offset;
    }

    pub fn set_end(&mut self, node: NodeKey, offset: usize) {
        self.node = node;
        self.end = offset;
    }

    pub fn is_collapsed(&self) -> bool {
        self.start >= self.end
    }
}

impl Default for TextRange {
    fn default() -> Self {
        Self::new(NodeKey::INVALID, 0, 0)
    }
}

/// Geometry queries against rendered text.
///
/// This is the only window the layout engine has into how text was actually
/// laid out: one rect per visual line fragment the range covers.
pub trait RangeMeasurer {
    /// Called once per pass after the surface subtree under `container` has
    /// been rebuilt and before any rect query.
    fn prepare(&mut self, _surface: &Document, _container: NodeKey) {}

    /// Client rects of `range`, in visual order.
    fn client_rects(&self, surface: &Document, range: &TextRange) -> Vec<Rect>;

    /// Content box of `element`. Defaults to its computed `width`/`height`.
    fn client_size(&self, doc: &Document, element: NodeKey) -> Size {
        let style = css::compute_style(doc, element);
        let px = |name: &str| style.get(name).and_then(css::parse_px).unwrap_or(0.0);
        Size::new(px("width"), px("height"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

impl Align {
    fn from_css(value: &str) -> Align {
        match value {
            "right" | "end" => Align::Right,
            "center" => Align::Center,
            // justify is laid out ragged
            _ => Align::Left,
        }
    }
}

enum Token {
    Char {
        node: NodeKey,
        start: usize,
        end: usize,
        whitespace: bool,
    },
    Break,
    BlockStart(Align),
    BlockEnd,
}

#[derive(Clone, Copy, Debug)]
struct CharBox {
    start: usize,
    end: usize,
    line: usize,
    x: f32,
}

struct Line {
    align: Align,
    /// Right edge of the last non-whitespace glyph.
    content_width: f32,
    used: bool,
}

/// Fixed-pitch text layout for headless use.
///
/// Every char advances by the same width and every line has the same height.
/// Words wrap greedily at whitespace; a word wider than the container breaks
/// between chars. Trailing whitespace hangs past the edge. `<br>` forces a
/// break and each block starts on a fresh line.
#[derive(Clone, Debug)]
pub struct MonospaceMeasurer {
    advance: f32,
    line_height: f32,
    boxes: HashMap<NodeKey, Vec<CharBox>>,
    offsets: Vec<f32>,
}

impl MonospaceMeasurer {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
            boxes: HashMap::new(),
            offsets: Vec::new(),
        }
    }

    pub fn advance(&self) -> f32 {
        self.advance
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Number of lines produced by the last `prepare`.
    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }

    fn collect(surface: &Document, key: NodeKey, tokens: &mut Vec<Token>) {
        if let Some(text) = surface.text(key) {
            for (start, ch) in text.char_indices() {
                tokens.push(Token::Char {
                    node: key,
                    start,
                    end: start + ch.len_utf8(),
                    whitespace: ch.is_whitespace(),
                });
            }
            return;
        }
        if surface.is_line_break(key) {
            tokens.push(Token::Break);
            return;
        }
        let style = css::compute_style(surface, key);
        let block = style.get("display") == Some("block");
        if block {
            tokens.push(Token::BlockStart(Align::from_css(style.get_or("text-align", "left"))));
        }
        for &child in surface.children(key) {
            Self::collect(surface, child, tokens);
        }
        if block {
            tokens.push(Token::BlockEnd);
        }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(10.0, 20.0)
    }
}

struct Flow {
    advance: f32,
    width: Option<f32>,
    lines: Vec<Line>,
    x: f32,
    placed: bool,
    aligns: Vec<Align>,
    boxes: HashMap<NodeKey, Vec<CharBox>>,
}

impl Flow {
    fn current_align(&self) -> Align {
        self.aligns.last().copied().unwrap_or(Align::Left)
    }

    fn line_index(&self) -> usize {
        self.lines.len() - 1
    }

    fn newline(&mut self) {
        let align = self.current_align();
        self.lines.push(Line {
            align,
            content_width: 0.0,
            used: false,
        });
        self.x = 0.0;
        self.placed = false;
    }

    fn newline_if_used(&mut self) {
        if self.placed {
            self.newline();
        }
    }

    /// Drops empty lines left behind by closing blocks.
    fn trim_trailing(&mut self) {
        while self.lines.last().is_some_and(|line| !line.used) {
            self.lines.pop();
        }
    }

    fn overflows(&self, extra: f32) -> bool {
        match self.width {
            Some(width) => self.x > 0.0 && self.x + extra > width,
            None => false,
        }
    }

    fn place(&mut self, node: NodeKey, start: usize, end: usize, whitespace: bool) {
        if !self.placed {
            let align = self.current_align();
            let index = self.line_index();
            self.lines[index].align = align;
        }
        let line = self.line_index();
        self.boxes.entry(node).or_default().push(CharBox {
            start,
            end,
            line,
            x: self.x,
        });
        self.x += self.advance;
        self.lines[line].used = true;
        if !whitespace {
            self.lines[line].content_width = self.x;
        }
        self.placed = true;
    }

    fn place_word(&mut self, word: &[Token]) {
        let word_width = word.len() as f32 * self.advance;
        if self.overflows(word_width) {
            self.newline();
        }
        for token in word {
            if let Token::Char {
                node, start, end, ..
            } = *token
            {
                if self.overflows(self.advance) {
                    self.newline();
                }
                self.place(node, start, end, false);
            }
        }
    }
}

impl RangeMeasurer for MonospaceMeasurer {
    fn prepare(&mut self, surface: &Document, container: NodeKey) {
        let width = self
            .client_size(surface, container)
            .width;
        let width = (width > 0.0).then_some(width);

        let mut tokens = Vec::new();
        Self::collect(surface, container, &mut tokens);

        let mut flow = Flow {
            advance: self.advance,
            width,
            lines: Vec::new(),
            x: 0.0,
            placed: false,
            aligns: Vec::new(),
            boxes: HashMap::new(),
        };
        flow.newline();

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                Token::BlockStart(align) => {
                    flow.newline_if_used();
                    flow.aligns.push(align);
                }
                Token::BlockEnd => {
                    flow.newline_if_used();
                    flow.aligns.pop();
                }
                Token::Break => {
                    let index = flow.line_index();
                    flow.lines[index].used = true;
                    flow.newline();
                }
                Token::Char {
                    node,
                    start,
                    end,
                    whitespace: true,
                } => flow.place(node, start, end, true),
                Token::Char { .. } => {
                    let word_end = tokens[i..]
                        .iter()
                        .position(|t| !matches!(t, Token::Char { whitespace: false, .. }))
                        .map_or(tokens.len(), |n| i + n);
                    flow.place_word(&tokens[i..word_end]);
                    i = word_end;
                    continue;
                }
            }
            i += 1;
        }
        flow.trim_trailing();

        self.offsets = flow
            .lines
            .iter()
            .map(|line| {
                let Some(width) = width else {
                    return 0.0;
                };
                let free = (width - line.content_width).max(0.0);
                match line.align {
                    Align::Left => 0.0,
                    Align::Right => free,
                    Align::Center => free / 2.0,
                }
            })
            .collect();
        self.boxes = flow.boxes;
    }

    fn client_rects(&self, _surface: &Document, range: &TextRange) -> Vec<Rect> {
        let Some(boxes) = self.boxes.get(&range.node) else {
            return Vec::new();
        };
        let mut rects: Vec<(usize, Rect)> = Vec::new();
        for b in boxes
            .iter()
            .filter(|b| b.start >= range.start && b.end <= range.end)
        {
            let offset = self.offsets.get(b.line).copied().unwrap_or(0.0);
            let rect = Rect::new(
                offset + b.x,
                b.line as f32 * self.line_height,
                self.advance,
                self.line_height,
            );
            match rects.last_mut() {
                Some((line, last)) if *line == b.line => *last = last.union(&rect),
                _ => rects.push((b.line, rect)),
            }
        }
        rects.into_iter().map(|(_, rect)| rect).collect()
    }
}
