// Scripted in-memory driver for engine and flow tests
//
// Stands in for a live browser: a handful of windows, each holding flat
// node lists, plus scripted mutations ("text becomes X once Y is clicked",
// "a window opens once Y is clicked", "node exists only after 300ms").
// Matching is declarative - a node answers to the raw CSS/XPath strings it
// was tagged with - which is all the engine's polling logic needs to be
// exercised end to end.

use crate::driver::{DomElement, Driver};
use crate::error::{Error, Result};
use crate::locator::Locator;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One scripted DOM node.
#[derive(Debug, Clone)]
pub struct MockNode {
    id: String,
    text: String,
    selectors: Vec<String>,
    attrs: HashMap<String, String>,
    visible: bool,
    appears_after: Option<Duration>,
    revealed_by_hover_of: Option<String>,
    value: String,
}

impl MockNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            selectors: Vec::new(),
            attrs: HashMap::new(),
            visible: true,
            appears_after: None,
            revealed_by_hover_of: None,
            value: String::new(),
        }
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Tags the node as matching a raw CSS or XPath selector string.
    #[must_use]
    pub fn matches(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// The node exists in the tree only after `delay` from driver creation.
    #[must_use]
    pub fn appears_after(mut self, delay: Duration) -> Self {
        self.appears_after = Some(delay);
        self
    }

    /// The node is displayed only while the named node is hovered.
    #[must_use]
    pub fn revealed_by_hover_of(mut self, id: impl Into<String>) -> Self {
        self.revealed_by_hover_of = Some(id.into());
        self
    }
}

/// One scripted browser window.
#[derive(Debug, Clone)]
pub struct MockWindow {
    handle: String,
    title: String,
    url: String,
    nodes: Vec<MockNode>,
}

impl MockWindow {
    pub fn new(
        handle: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            handle: handle.into(),
            title: title.into(),
            url: url.into(),
            nodes: Vec::new(),
        }
    }

    #[must_use]
    pub fn node(mut self, node: MockNode) -> Self {
        self.nodes.push(node);
        self
    }
}

#[derive(Debug, Clone)]
enum Mutation {
    SetTextOnClick {
        clicked: String,
        node: String,
        text: String,
    },
    OpenWindowOnClick {
        clicked: String,
        window: MockWindow,
    },
}

#[derive(Debug)]
struct State {
    epoch: Instant,
    windows: Vec<MockWindow>,
    pending_windows: Vec<(Duration, MockWindow)>,
    active: usize,
    hovered: Option<String>,
    mutations: Vec<Mutation>,
    clicked: Vec<String>,
    committed: Vec<String>,
    quit_count: usize,
    refresh_count: usize,
    last_navigation: Option<String>,
}

/// Scripted driver. Cheap to clone; clones share the same state.
#[derive(Debug, Clone)]
pub struct ScriptedDriver {
    state: Arc<Mutex<State>>,
}

pub const MAIN_WINDOW: &str = "w-main";

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::with_page("", "")
    }

    pub fn with_page(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                epoch: Instant::now(),
                windows: vec![MockWindow::new(MAIN_WINDOW, title, url)],
                pending_windows: Vec::new(),
                active: 0,
                hovered: None,
                mutations: Vec::new(),
                clicked: Vec::new(),
                committed: Vec::new(),
                quit_count: 0,
                refresh_count: 0,
                last_navigation: None,
            })),
        }
    }

    /// Adds a node to the main window.
    pub fn add_node(&self, node: MockNode) {
        self.state.lock().windows[0].nodes.push(node);
    }

    /// Scripts a text change applied when the named node is clicked.
    pub fn set_text_on_click(
        &self,
        clicked: impl Into<String>,
        node: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.state.lock().mutations.push(Mutation::SetTextOnClick {
            clicked: clicked.into(),
            node: node.into(),
            text: text.into(),
        });
    }

    /// Scripts a window that opens when the named node is clicked.
    pub fn open_window_on_click(&self, clicked: impl Into<String>, window: MockWindow) {
        self.state
            .lock()
            .mutations
            .push(Mutation::OpenWindowOnClick {
                clicked: clicked.into(),
                window,
            });
    }

    /// Scripts a window that opens `delay` after driver creation.
    pub fn open_window_after(&self, delay: Duration, window: MockWindow) {
        self.state.lock().pending_windows.push((delay, window));
    }

    // Observation points for tests.

    pub fn quit_count(&self) -> usize {
        self.state.lock().quit_count
    }

    pub fn refresh_count(&self) -> usize {
        self.state.lock().refresh_count
    }

    pub fn clicked_ids(&self) -> Vec<String> {
        self.state.lock().clicked.clone()
    }

    pub fn committed_ids(&self) -> Vec<String> {
        self.state.lock().committed.clone()
    }

    pub fn last_navigation(&self) -> Option<String> {
        self.state.lock().last_navigation.clone()
    }

    /// Current typed value of an input node.
    pub fn input_value(&self, id: &str) -> Option<String> {
        let state = self.state.lock();
        state
            .windows
            .iter()
            .flat_map(|w| w.nodes.iter())
            .find(|n| n.id == id)
            .map(|n| n.value.clone())
    }

    fn promote_pending(state: &mut State) {
        let elapsed = state.epoch.elapsed();
        let mut i = 0;
        while i < state.pending_windows.len() {
            if state.pending_windows[i].0 <= elapsed {
                let (_, window) = state.pending_windows.remove(i);
                state.windows.push(window);
            } else {
                i += 1;
            }
        }
    }

    fn node_exists(state: &State, node: &MockNode) -> bool {
        match node.appears_after {
            Some(delay) => state.epoch.elapsed() >= delay,
            None => true,
        }
    }

    fn node_displayed(state: &State, node: &MockNode) -> bool {
        if !node.visible {
            return false;
        }
        match &node.revealed_by_hover_of {
            Some(anchor) => state.hovered.as_deref() == Some(anchor.as_str()),
            None => true,
        }
    }

    fn matches(node: &MockNode, locator: &Locator) -> bool {
        match locator {
            Locator::Text(text) => node.text.trim() == text,
            Locator::Css(s) | Locator::XPath(s) => node.selectors.iter().any(|sel| sel == s),
            Locator::Attr { name, value } => node.attrs.get(name) == Some(value),
        }
    }

    fn apply_click(state: &mut State, clicked: &str) {
        state.clicked.push(clicked.to_string());
        let mut i = 0;
        while i < state.mutations.len() {
            let fired = match &state.mutations[i] {
                Mutation::SetTextOnClick { clicked: c, .. } => c == clicked,
                Mutation::OpenWindowOnClick { clicked: c, .. } => c == clicked,
            };
            if fired {
                match state.mutations.remove(i) {
                    Mutation::SetTextOnClick { node, text, .. } => {
                        for window in &mut state.windows {
                            for n in &mut window.nodes {
                                if n.id == node {
                                    n.text = text.clone();
                                }
                            }
                        }
                    }
                    Mutation::OpenWindowOnClick { window, .. } => {
                        state.windows.push(window);
                    }
                }
            } else {
                i += 1;
            }
        }
    }
}

impl Default for ScriptedDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for ScriptedDriver {
    type Element = MockElement;

    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.last_navigation = Some(url.to_string());
        let active = state.active;
        state.windows[active].url = url.to_string();
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.refresh_count += 1;
        state.hovered = None;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let state = self.state.lock();
        Ok(state.windows[state.active].url.clone())
    }

    async fn title(&self) -> Result<String> {
        let state = self.state.lock();
        Ok(state.windows[state.active].title.clone())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>> {
        let state = self.state.lock();
        let window = &state.windows[state.active];
        Ok(window
            .nodes
            .iter()
            .filter(|node| Self::node_exists(&state, node) && Self::matches(node, locator))
            .map(|node| MockElement {
                id: node.id.clone(),
                driver: self.clone(),
            })
            .collect())
    }

    async fn window_handles(&self) -> Result<Vec<String>> {
        let mut state = self.state.lock();
        Self::promote_pending(&mut state);
        Ok(state.windows.iter().map(|w| w.handle.clone()).collect())
    }

    async fn current_window(&self) -> Result<String> {
        let state = self.state.lock();
        Ok(state.windows[state.active].handle.clone())
    }

    async fn switch_to_window(&self, handle: &str) -> Result<()> {
        let mut state = self.state.lock();
        Self::promote_pending(&mut state);
        match state.windows.iter().position(|w| w.handle == handle) {
            Some(index) => {
                state.active = index;
                state.hovered = None;
                Ok(())
            }
            None => Err(Error::Driver(format!("no such window: {}", handle))),
        }
    }

    async fn hover(&self, element: &Self::Element) -> Result<()> {
        self.state.lock().hovered = Some(element.id.clone());
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        self.state.lock().quit_count += 1;
        Ok(())
    }
}

/// Handle onto a scripted node.
#[derive(Debug, Clone)]
pub struct MockElement {
    id: String,
    driver: ScriptedDriver,
}

impl MockElement {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Runs `f` over the live node, or reports staleness if it is gone.
    fn with_node<T>(&self, f: impl FnOnce(&State, &MockNode) -> T) -> Result<T> {
        let state = self.driver.state.lock();
        state
            .windows
            .iter()
            .flat_map(|w| w.nodes.iter())
            .find(|n| n.id == self.id)
            .map(|node| f(&state, node))
            .ok_or_else(|| Error::Driver(format!("stale element reference: {}", self.id)))
    }

    fn with_node_mut<T>(&self, f: impl FnOnce(&mut MockNode) -> T) -> Result<T> {
        let mut state = self.driver.state.lock();
        state
            .windows
            .iter_mut()
            .flat_map(|w| w.nodes.iter_mut())
            .find(|n| n.id == self.id)
            .map(f)
            .ok_or_else(|| Error::Driver(format!("stale element reference: {}", self.id)))
    }
}

#[async_trait]
impl DomElement for MockElement {
    async fn click(&self) -> Result<()> {
        // Validate the node is still live before firing mutations.
        self.with_node(|_, _| ())?;
        ScriptedDriver::apply_click(&mut self.driver.state.lock(), &self.id);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.with_node_mut(|node| node.value.clear())
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        let text = text.to_string();
        self.with_node_mut(move |node| node.value.push_str(&text))
    }

    async fn tab_out(&self) -> Result<()> {
        self.driver.state.lock().committed.push(self.id.clone());
        Ok(())
    }

    async fn text(&self) -> Result<String> {
        self.with_node(|_, node| node.text.clone())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        self.with_node(|_, node| node.attrs.get(name).cloned())
    }

    async fn is_displayed(&self) -> Result<bool> {
        self.with_node(|state, node| ScriptedDriver::node_displayed(state, node))
    }

    async fn scroll_into_view(&self) -> Result<()> {
        self.with_node(|_, _| ())
    }
}
