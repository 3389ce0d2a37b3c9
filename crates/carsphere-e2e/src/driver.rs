//! Abstract browser driver trait.
//!
//! The waiter and the page layer never talk to a concrete browser; they go
//! through [`Driver`], which can be backed by the real CDP connection (the
//! `browser` feature) or by the scripted [`MockDriver`] used in unit and
//! scenario tests. Swapping implementations keeps every synchronization and
//! page contract testable without a chromium install.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::query::ElementQuery;
use crate::result::{HarnessError, HarnessResult};

/// Snapshot of one resolved DOM node.
///
/// Handles are only valid for the poll attempt that produced them; callers
/// re-resolve rather than hold on to them across renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    /// Backend-assigned identifier for follow-up interactions
    pub id: String,
    /// Lower-case tag name
    pub tag: String,
    /// Whether the node was visible when resolved
    pub visible: bool,
    /// Trimmed text content at resolve time
    pub text: String,
}

impl ElementHandle {
    /// Create a handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            visible: true,
            text: String::new(),
        }
    }
}

/// Identifier for one top-level browser window/tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowHandle {
    /// Backend window identifier
    pub id: String,
}

impl WindowHandle {
    /// Create a window handle
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Abstract driver over one browser instance.
///
/// Element lookups resolve fresh on every call; window switching is an
/// explicit operation that moves the single active-window pointer.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate the active window to a URL
    async fn navigate(&mut self, url: &str) -> HarnessResult<()>;

    /// URL of the active window
    async fn current_url(&self) -> HarnessResult<String>;

    /// Resolve a query against the live document of the active window
    async fn resolve(&self, query: &ElementQuery) -> HarnessResult<Vec<ElementHandle>>;

    /// Click an element
    async fn click(&self, element: &ElementHandle) -> HarnessResult<()>;

    /// Type text into an input element
    async fn fill(&self, element: &ElementHandle, text: &str) -> HarnessResult<()>;

    /// Attach a local file to a file-input element
    async fn attach_file(&self, element: &ElementHandle, path: &Path) -> HarnessResult<()>;

    /// Current text content of an element
    async fn text(&self, element: &ElementHandle) -> HarnessResult<String>;

    /// Current form value of an element
    async fn value(&self, element: &ElementHandle) -> HarnessResult<String>;

    /// An attribute of an element, `None` when absent
    async fn attribute(&self, element: &ElementHandle, name: &str)
        -> HarnessResult<Option<String>>;

    /// A computed CSS property of an element
    async fn css_value(&self, element: &ElementHandle, property: &str) -> HarnessResult<String>;

    /// All open windows, oldest first
    async fn windows(&self) -> HarnessResult<Vec<WindowHandle>>;

    /// Move the active-window pointer
    async fn switch_window(&mut self, window: &WindowHandle) -> HarnessResult<()>;

    /// Tear down the backend
    async fn close(&mut self) -> HarnessResult<()> {
        Ok(())
    }
}

// ============================================================================
// Scripted mock driver
// ============================================================================

/// An edit applied to the scripted DOM when an element is clicked
#[derive(Debug, Clone)]
pub enum DomEdit {
    /// Replace the text of the element at `index` under `query`
    SetText {
        /// Target query
        query: ElementQuery,
        /// Index within the match set
        index: usize,
        /// New text
        text: String,
    },
    /// Append an element to the match set of `query`
    Insert {
        /// Target query
        query: ElementQuery,
        /// Element to append
        element: MockElement,
    },
    /// Drop the last element of the match set of `query`
    RemoveLast {
        /// Target query
        query: ElementQuery,
    },
    /// Change the active window's URL
    SetUrl(String),
    /// Open a secondary window without activating it
    OpenWindow {
        /// URL of the new window
        url: String,
    },
}

/// One scripted element in the mock DOM
#[derive(Debug, Clone)]
pub struct MockElement {
    id: String,
    tag: String,
    visible: bool,
    text: String,
    value: String,
    attributes: HashMap<String, String>,
    css: HashMap<String, String>,
    appears_after: u32,
    value_after: Option<(u32, String)>,
    value_reads: u32,
}

impl MockElement {
    /// Create a visible element with empty text
    #[must_use]
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            visible: true,
            text: String::new(),
            value: String::new(),
            attributes: HashMap::new(),
            css: HashMap::new(),
            appears_after: 0,
            value_after: None,
            value_reads: 0,
        }
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Mark the element present but not visible
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Set the form value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set a computed CSS property
    #[must_use]
    pub fn with_css(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.css.insert(property.into(), value.into());
        self
    }

    /// Keep the element absent for the first `polls` resolve attempts
    #[must_use]
    pub const fn appearing_after(mut self, polls: u32) -> Self {
        self.appears_after = polls;
        self
    }

    /// Keep the form value empty for the first `reads` value reads, then
    /// return `value`
    #[must_use]
    pub fn with_value_after(mut self, reads: u32, value: impl Into<String>) -> Self {
        self.value_after = Some((reads, value.into()));
        self
    }

    /// The element id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    fn handle(&self) -> ElementHandle {
        ElementHandle {
            id: self.id.clone(),
            tag: self.tag.clone(),
            visible: self.visible,
            text: self.text.clone(),
        }
    }
}

#[derive(Debug)]
struct MockWindow {
    handle: WindowHandle,
    url: String,
}

#[derive(Debug)]
struct MockState {
    windows: Vec<MockWindow>,
    active: usize,
    elements: HashMap<ElementQuery, Vec<MockElement>>,
    resolve_counts: HashMap<ElementQuery, u32>,
    on_click: HashMap<String, Vec<DomEdit>>,
    history: Vec<String>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            windows: vec![MockWindow {
                handle: WindowHandle::new("w0"),
                url: "about:blank".to_string(),
            }],
            active: 0,
            elements: HashMap::new(),
            resolve_counts: HashMap::new(),
            on_click: HashMap::new(),
            history: Vec::new(),
        }
    }
}

/// Scripted in-memory driver for unit and scenario tests.
///
/// Clones share the same state, so a test can keep a handle for call-history
/// assertions after moving the driver into a session.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Create an empty mock with one blank window
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one element to the match set of `query`
    pub fn add_element(&self, query: &ElementQuery, element: MockElement) {
        let mut state = self.state.lock().unwrap();
        state
            .elements
            .entry(query.clone())
            .or_default()
            .push(element);
    }

    /// Add several elements to the match set of `query`
    pub fn add_elements(&self, query: &ElementQuery, elements: Vec<MockElement>) {
        let mut state = self.state.lock().unwrap();
        state
            .elements
            .entry(query.clone())
            .or_default()
            .extend(elements);
    }

    /// Script DOM edits applied when the element with `element_id` is clicked
    pub fn on_click(&self, element_id: &str, edits: Vec<DomEdit>) {
        let mut state = self.state.lock().unwrap();
        state
            .on_click
            .entry(element_id.to_string())
            .or_default()
            .extend(edits);
    }

    /// Recorded action history (navigate, click, fill, attach, switch)
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state.lock().unwrap().history.clone()
    }

    /// Whether any recorded action starts with `prefix`
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .history
            .iter()
            .any(|entry| entry.starts_with(prefix))
    }

    /// Number of resolve attempts made for `query`
    #[must_use]
    pub fn resolve_count(&self, query: &ElementQuery) -> u32 {
        self.state
            .lock()
            .unwrap()
            .resolve_counts
            .get(query)
            .copied()
            .unwrap_or(0)
    }

    fn apply_edit(state: &mut MockState, edit: DomEdit) {
        match edit {
            DomEdit::SetText { query, index, text } => {
                if let Some(set) = state.elements.get_mut(&query) {
                    if let Some(element) = set.get_mut(index) {
                        element.text = text;
                    }
                }
            }
            DomEdit::Insert { query, element } => {
                state.elements.entry(query).or_default().push(element);
            }
            DomEdit::RemoveLast { query } => {
                if let Some(set) = state.elements.get_mut(&query) {
                    let _ = set.pop();
                }
            }
            DomEdit::SetUrl(url) => {
                let active = state.active;
                if let Some(window) = state.windows.get_mut(active) {
                    window.url = url;
                }
            }
            DomEdit::OpenWindow { url } => {
                let id = format!("w{}", state.windows.len());
                state.windows.push(MockWindow {
                    handle: WindowHandle::new(id),
                    url,
                });
            }
        }
    }

    fn with_element<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut MockElement) -> T,
    ) -> HarnessResult<T> {
        let mut state = self.state.lock().unwrap();
        state
            .elements
            .values_mut()
            .flat_map(|set| set.iter_mut())
            .find(|element| element.id == id)
            .map(f)
            .ok_or_else(|| HarnessError::Page {
                message: format!("no scripted element with id '{id}'"),
            })
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn navigate(&mut self, url: &str) -> HarnessResult<()> {
        let mut state = self.state.lock().unwrap();
        state.history.push(format!("navigate:{url}"));
        let active = state.active;
        if let Some(window) = state.windows.get_mut(active) {
            window.url = url.to_string();
        }
        Ok(())
    }

    async fn current_url(&self) -> HarnessResult<String> {
        let state = self.state.lock().unwrap();
        Ok(state.windows[state.active].url.clone())
    }

    async fn resolve(&self, query: &ElementQuery) -> HarnessResult<Vec<ElementHandle>> {
        let mut state = self.state.lock().unwrap();
        let seen = {
            let count = state.resolve_counts.entry(query.clone()).or_insert(0);
            *count += 1;
            *count
        };
        Ok(state
            .elements
            .get(query)
            .map(|set| {
                set.iter()
                    .filter(|element| element.appears_after < seen)
                    .map(MockElement::handle)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn click(&self, element: &ElementHandle) -> HarnessResult<()> {
        let mut state = self.state.lock().unwrap();
        state.history.push(format!("click:{}", element.id));
        let edits = state.on_click.get(&element.id).cloned().unwrap_or_default();
        for edit in edits {
            Self::apply_edit(&mut state, edit);
        }
        Ok(())
    }

    async fn fill(&self, element: &ElementHandle, text: &str) -> HarnessResult<()> {
        {
            let mut state = self.state.lock().unwrap();
            state.history.push(format!("fill:{}:{text}", element.id));
        }
        self.with_element(&element.id, |scripted| {
            scripted.value = text.to_string();
        })
    }

    async fn attach_file(&self, element: &ElementHandle, path: &Path) -> HarnessResult<()> {
        {
            let mut state = self.state.lock().unwrap();
            state
                .history
                .push(format!("attach:{}:{}", element.id, path.display()));
        }
        self.with_element(&element.id, |scripted| {
            scripted.value = path.display().to_string();
        })
    }

    async fn text(&self, element: &ElementHandle) -> HarnessResult<String> {
        self.with_element(&element.id, |scripted| scripted.text.clone())
    }

    async fn value(&self, element: &ElementHandle) -> HarnessResult<String> {
        self.with_element(&element.id, |scripted| {
            if let Some((reads, ref value)) = scripted.value_after {
                scripted.value_reads += 1;
                if scripted.value_reads > reads {
                    value.clone()
                } else {
                    String::new()
                }
            } else {
                scripted.value.clone()
            }
        })
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> HarnessResult<Option<String>> {
        let name = name.to_string();
        self.with_element(&element.id, |scripted| {
            scripted.attributes.get(&name).cloned()
        })
    }

    async fn css_value(&self, element: &ElementHandle, property: &str) -> HarnessResult<String> {
        let property = property.to_string();
        self.with_element(&element.id, |scripted| {
            scripted.css.get(&property).cloned().unwrap_or_default()
        })
    }

    async fn windows(&self) -> HarnessResult<Vec<WindowHandle>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .windows
            .iter()
            .map(|window| window.handle.clone())
            .collect())
    }

    async fn switch_window(&mut self, window: &WindowHandle) -> HarnessResult<()> {
        let mut state = self.state.lock().unwrap();
        let index = state
            .windows
            .iter()
            .position(|candidate| candidate.handle == *window)
            .ok_or_else(|| HarnessError::Page {
                message: format!("no window with id '{}'", window.id),
            })?;
        state.active = index;
        state.history.push(format!("switch:{}", window.id));
        Ok(())
    }
}
