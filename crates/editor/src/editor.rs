//! The editable surface: a host element holding one content root, the
//! selection inside it, and the plumbing from native events to commands and
//! change notifications.

mod edit;

use crate::clipboard::{self, ClipboardData};
use crate::commands::{CommandHandler, DefaultCommands, InputEvent, InputPhase};
use crate::error::EditorError;
use crate::events::{EventTarget, ListenerId, Notification};
use crate::locate::find_inline_from_selection;
use crate::notifier::ChangeNotifier;
use crate::selection::{Endpoint, Selection};
use content::{
    Content, EditorDefaults, Level, Root, StyleMap, StyleSource, attrs, create_inline_element,
    create_paragraph_element, create_root_element, from_dom, parse_content,
};
use css::Origin;
use dom::{Document, DomError, NodeKey};
use layout::{PositionData, RangeMeasurer, TextLayout};
use log::debug;
use serde::Deserialize;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EditorOptions {
    pub autofocus: bool,
    pub autoselect: bool,
    pub defaults: Option<EditorDefaults>,
    /// Debounce interval for change notifications, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            autofocus: true,
            autoselect: true,
            defaults: None,
            debounce_ms: ChangeNotifier::DEFAULT_INTERVAL.as_millis() as u64,
        }
    }
}

impl EditorOptions {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        serde_json::from_str(json).map_err(|err| EditorError::InvalidArgument(err.to_string()))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetContentOptions {
    pub select_all: bool,
}

/// Native events the host forwards to the surface.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    BeforeInput(InputEvent),
    Input(InputEvent),
    Paste(ClipboardData),
    Copy,
    Cut,
    Focus,
    Blur,
    KeyDown(String),
    KeyUp(String),
    KeyPress(String),
    SelectionChange(Selection),
}

/// What handling an event asks of the host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventResponse {
    /// The editor applied the edit itself; the host must not.
    pub default_prevented: bool,
    /// Payload to put on the system clipboard (copy and cut).
    pub clipboard: Option<ClipboardData>,
}

impl EventResponse {
    fn prevented(default_prevented: bool) -> Self {
        Self {
            default_prevented,
            clipboard: None,
        }
    }
}

pub struct TextEditor {
    document: Document,
    element: NodeKey,
    root: NodeKey,
    selection: Selection,
    defaults: StyleMap,
    events: Rc<EventTarget>,
    notifier: ChangeNotifier,
    handler: Rc<dyn CommandHandler>,
    focused: bool,
    tracking_selection: bool,
}

impl TextEditor {
    /// Turns `element` of `document` into an editor and fills it with an
    /// empty root.
    pub fn new(document: Document, element: NodeKey, options: EditorOptions) -> Result<Self, EditorError> {
        if !document.is_element(element) {
            return Err(EditorError::InvalidArgument(format!(
                "editor host {element} is not an element"
            )));
        }
        let events = EventTarget::new();
        let notifier = ChangeNotifier::with_interval(Rc::downgrade(&events), options.debounce())?;
        let defaults = options.defaults.clone().unwrap_or_default().resolve();

        let mut editor = Self {
            document,
            element,
            root: NodeKey::INVALID,
            selection: Selection::new(),
            defaults,
            events,
            notifier,
            handler: Rc::new(DefaultCommands),
            focused: false,
            tracking_selection: false,
        };
        editor.setup()?;
        if options.autofocus {
            editor.focus();
        }
        if options.autoselect {
            editor.select_all();
        }
        Ok(editor)
    }

    /// An editor on a fresh `div` of its own document.
    pub fn detached(options: EditorOptions) -> Result<Self, EditorError> {
        let mut document = Document::new();
        let element = document.create_element("div");
        Self::new(document, element, options)
    }

    pub fn with_handler(mut self, handler: Rc<dyn CommandHandler>) -> Self {
        self.handler = handler;
        self
    }

    fn setup(&mut self) -> Result<(), EditorError> {
        let doc = &mut self.document;
        let host = self.element;
        doc.set_attribute(host, "contenteditable", "true")?;
        doc.set_attribute(host, "spellcheck", "false")?;
        doc.set_attribute(host, "autocapitalize", "off")?;
        doc.set_attribute(host, "role", "textbox")?;
        doc.set_attribute(host, "aria-autocomplete", "none")?;
        doc.set_attribute(host, "aria-multiline", "true")?;
        doc.set_data(host, "editor", "true")?;

        self.root = self.create_root(None)?;
        self.document.append_child(host, self.root)?;
        Ok(())
    }

    fn create_root(&mut self, styles: Option<&StyleMap>) -> Result<NodeKey, EditorError> {
        let paragraph = self.create_paragraph("", None)?;
        let source = StyleSource::Defaults {
            defaults: &self.defaults,
            overrides: styles,
        };
        Ok(create_root_element(&mut self.document, &[paragraph], source)?)
    }

    /// A detached paragraph holding one inline with `data`.
    pub fn create_paragraph(&mut self, data: &str, styles: Option<&StyleMap>) -> Result<NodeKey, EditorError> {
        let inline = self.create_inline(data, None)?;
        let source = StyleSource::Defaults {
            defaults: &self.defaults,
            overrides: styles,
        };
        Ok(create_paragraph_element(&mut self.document, &[inline], source)?)
    }

    /// A detached inline holding `data`.
    pub fn create_inline(&mut self, data: &str, styles: Option<&StyleMap>) -> Result<NodeKey, EditorError> {
        let source = StyleSource::Defaults {
            defaults: &self.defaults,
            overrides: styles,
        };
        Ok(create_inline_element(&mut self.document, data, source)?)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn element(&self) -> NodeKey {
        self.element
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Moves the selection, as the host does on pointer or keyboard moves.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn defaults(&self) -> &StyleMap {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: &EditorDefaults) {
        self.defaults = defaults.resolve();
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn has_pending_changes(&self) -> bool {
        self.notifier.has_pending_changes()
    }

    /// When the next debounced change is due, if one is armed.
    pub fn change_deadline(&self) -> Option<Instant> {
        self.notifier.deadline()
    }

    /// Lets a due debounced change fire. Returns whether it fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.notifier.poll(now)
    }

    pub fn subscribe<F>(&self, kind: Notification, listener: F) -> ListenerId
    where
        F: Fn(Notification) + 'static,
    {
        self.events.subscribe(kind, listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn focus(&mut self) -> &mut Self {
        if !self.focused {
            self.focused = true;
            self.tracking_selection = true;
            debug!(target: "editor.input", "focus");
        }
        self
    }

    pub fn blur(&mut self) -> &mut Self {
        if self.focused {
            self.focused = false;
            self.tracking_selection = false;
            debug!(target: "editor.input", "blur");
            self.notifier.notify_immediately();
        }
        self
    }

    pub fn select_all(&mut self) -> &mut Self {
        self.selection.select_all_children(&self.document, self.element);
        self
    }

    pub fn get_text(&self) -> String {
        self.document.text_content(self.element)
    }

    pub fn has_text(&self) -> bool {
        !self.get_text().is_empty()
    }

    /// Replaces the whole content. Nothing changes when `root` is invalid.
    pub fn set_content(&mut self, root: &Root, options: SetContentOptions) -> Result<&mut Self, EditorError> {
        let element = content::to_dom(&mut self.document, root)?;
        self.replace_root(element, options)
    }

    /// [`TextEditor::set_content`] for the JSON wire form; `null` resets to
    /// an empty root.
    pub fn set_content_json(&mut self, json: &str, options: SetContentOptions) -> Result<&mut Self, EditorError> {
        let element = match parse_content(json)? {
            Some(root) => content::to_dom(&mut self.document, &root)?,
            None => self.create_root(None)?,
        };
        self.replace_root(element, options)
    }

    fn replace_root(&mut self, element: NodeKey, options: SetContentOptions) -> Result<&mut Self, EditorError> {
        self.document.replace_children(self.element, &[element])?;
        self.root = element;
        self.selection.retain_within(&self.document, self.element);
        debug!(target: "editor.input", "content replaced by {element}");
        if options.select_all {
            self.select_all();
        }
        Ok(self)
    }

    pub fn get_content(&self) -> Content {
        from_dom(&self.document, Some(self.root))
    }

    /// Style in effect at the caret: the anchor inline's resolved values
    /// over the editor defaults.
    pub fn current_style(&self) -> StyleMap {
        let mut style = self.defaults.clone();
        let Some(inline) = find_inline_from_selection(&self.document, &self.selection, Endpoint::Anchor) else {
            return style;
        };
        let computed = css::compute_style(&self.document, inline);
        for (property, value) in style.iter_mut() {
            if matches!(computed.origin(property), None | Some(Origin::Initial)) {
                continue;
            }
            let Some(resolved) = computed.get(property) else {
                continue;
            };
            *value = match attrs::lookup(Level::Inline, property).and_then(|a| a.unit) {
                Some(unit) => css::strip_unit(resolved, unit),
                None => resolved.to_string(),
            };
        }
        style
    }

    /// Feeds one native event through the surface.
    pub fn handle_event(&mut self, event: EditorEvent) -> Result<EventResponse, EditorError> {
        match event {
            EditorEvent::BeforeInput(input) => {
                let prevented = self.run_command(InputPhase::Before, &input)?;
                Ok(EventResponse::prevented(prevented))
            }
            EditorEvent::Input(input) => {
                if !input.command.is_recognized() {
                    debug!(target: "editor.input", "input {}: ignored", input.command);
                    return Ok(EventResponse::default());
                }
                let prevented = self.run_command(InputPhase::After, &input)?;
                self.notifier.notify_debounced();
                Ok(EventResponse::prevented(prevented))
            }
            EditorEvent::Paste(data) => {
                let pasted = clipboard::paste(self, &data)?;
                if pasted {
                    self.notifier.notify_debounced();
                }
                Ok(EventResponse::prevented(pasted))
            }
            EditorEvent::Copy => Ok(EventResponse {
                default_prevented: true,
                clipboard: clipboard::copy(self),
            }),
            EditorEvent::Cut => {
                let data = clipboard::cut(self)?;
                if data.is_some() {
                    self.notifier.notify_debounced();
                }
                Ok(EventResponse {
                    default_prevented: true,
                    clipboard: data,
                })
            }
            EditorEvent::Focus => {
                self.focus();
                Ok(EventResponse::default())
            }
            EditorEvent::Blur => {
                self.blur();
                Ok(EventResponse::default())
            }
            EditorEvent::KeyDown(key) | EditorEvent::KeyUp(key) | EditorEvent::KeyPress(key) => {
                debug!(target: "editor.input", "key {key}");
                Ok(EventResponse::default())
            }
            EditorEvent::SelectionChange(selection) => {
                self.on_selection_change(selection);
                Ok(EventResponse::default())
            }
        }
    }

    fn run_command(&mut self, phase: InputPhase, input: &InputEvent) -> Result<bool, EditorError> {
        if !input.command.is_recognized() {
            debug!(target: "editor.input", "{phase:?} {}: ignored", input.command);
            return Ok(false);
        }
        debug!(target: "editor.input", "{phase:?} {}", input.command);
        let handler = Rc::clone(&self.handler);
        handler.handle(self, phase, input)
    }

    fn on_selection_change(&mut self, selection: Selection) {
        if !self.tracking_selection {
            debug!(target: "editor.input", "selection change while blurred: ignored");
            return;
        }
        self.selection = selection;
        match self.selection.anchor() {
            Some(caret) if self.selection.is_collapsed() => {
                debug!(target: "editor.input", "caret at {}:{}", caret.node, caret.offset);
            }
            _ => debug!(
                target: "editor.input",
                "selection with {} ranges",
                self.selection.range_count()
            ),
        }
    }

    /// Flushes pending changes and releases the surface.
    pub fn dispose(mut self) {
        if self.notifier.has_pending_changes() {
            self.notifier.notify_immediately();
        }
        self.tracking_selection = false;
        debug!(target: "editor.input", "disposed editor on {}", self.element);
    }
}

/// Lays out the editor's live content.
pub fn layout_from_editor<M: RangeMeasurer>(
    editor: &TextEditor,
    layout: &mut TextLayout<M>,
) -> Result<Vec<PositionData>, DomError> {
    layout.layout_from_element(editor.document(), editor.root())
}
