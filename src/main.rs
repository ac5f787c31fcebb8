use content::{ContentError, from_dom, parse_content};
use dom::Document;
use editor::{EditorError, EditorOptions, SetContentOptions, TextEditor, layout_from_editor};
use layout::{MonospaceMeasurer, TextLayout};
use log::info;
use std::fmt;
use std::process::ExitCode;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const DEFAULT_WIDTH: f32 = 320.0;

const USAGE: &str = "usage:
  textsurface layout <content.json> [width]
  textsurface roundtrip <content.json>";

#[derive(Debug)]
enum CliError {
    Usage(String),
    Io(std::io::Error),
    Content(ContentError),
    Editor(EditorError),
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(reason) => write!(f, "{reason}\n{USAGE}"),
            CliError::Io(err) => write!(f, "io: {err}"),
            CliError::Content(err) => write!(f, "{err}"),
            CliError::Editor(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "json: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<ContentError> for CliError {
    fn from(err: ContentError) -> Self {
        CliError::Content(err)
    }
}

impl From<EditorError> for CliError {
    fn from(err: EditorError) -> Self {
        CliError::Editor(err)
    }
}

impl From<dom::DomError> for CliError {
    fn from(err: dom::DomError) -> Self {
        CliError::Editor(EditorError::Dom(err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err)
    }
}

/// Loads the content into an editor whose host is `width` pixels wide and
/// prints the measured runs.
fn layout(path: &str, width: f32) -> Result<String, CliError> {
    let json = std::fs::read_to_string(path)?;
    let mut doc = Document::new();
    let host = doc.create_element("div");
    doc.set_style_property(host, "width", &format!("{width}px"))?;

    let options = EditorOptions {
        autofocus: false,
        autoselect: false,
        ..EditorOptions::default()
    };
    let mut editor = TextEditor::new(doc, host, options)?;
    editor.set_content_json(&json, SetContentOptions::default())?;

    let mut engine = TextLayout::new(MonospaceMeasurer::default())?;
    let positions = layout_from_editor(&editor, &mut engine)?;
    info!(target: "layout.scan", "{path}: {} runs at {width}px", positions.len());
    editor.dispose();
    Ok(serde_json::to_string_pretty(&positions)?)
}

/// Materializes the content and reads it back.
fn roundtrip(path: &str) -> Result<String, CliError> {
    let json = std::fs::read_to_string(path)?;
    let Some(root) = parse_content(&json)? else {
        return Ok("null".to_string());
    };
    let mut doc = Document::new();
    let element = content::to_dom(&mut doc, &root)?;
    let value = match from_dom(&doc, Some(element)) {
        Some(back) => serde_json::to_value(content::ContentNode::from(back))?,
        None => serde_json::Value::Null,
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

fn run(args: &[String]) -> Result<String, CliError> {
    match args {
        [command, path] if command == "roundtrip" => roundtrip(path),
        [command, path] if command == "layout" => layout(path, DEFAULT_WIDTH),
        [command, path, width] if command == "layout" => {
            let width: f32 = width
                .parse()
                .map_err(|_| CliError::Usage(format!("width `{width}` is not a number")))?;
            if !width.is_finite() || width <= 0.0 {
                return Err(CliError::Usage(format!("width `{width}` must be positive")));
            }
            layout(path, width)
        }
        _ => Err(CliError::Usage("unrecognized arguments".to_string())),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("textsurface: {err}");
            ExitCode::FAILURE
        }
    }
}
