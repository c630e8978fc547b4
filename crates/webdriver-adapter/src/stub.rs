//! Deterministic in-memory browser.
//!
//! Pages are declared as ordered lists of [`StubElement`]s keyed by URL. Queries
//! are answered by a matcher that mirrors the XPath compilation in
//! [`crate::query`], so behaviour under the stub tracks a real browser closely
//! enough for the locator, dispatcher and observer logic to be exercised.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;
use url::Url;
use waypoint_core_types::{ContextHandle, ElementId, Strategy};

use crate::driver::BrowserDriver;
use crate::error::{AdapterError, AdapterErrorKind};
use crate::query::{implicit_role, Query};

/// What happens when an element is activated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickBehavior {
    Nothing,
    /// Load this URL (relative to the page) in the same tab.
    Navigate(String),
    /// Open this URL in a new tab without moving focus.
    OpenTab(String),
    /// Open the first URL in a new tab and load the second in the same tab.
    OpenTabAndNavigate(String, String),
    /// Load this URL in place of the current history entry.
    Replace(String),
    /// Make these (hidden) elements visible.
    Reveal(Vec<String>),
}

/// Declarative element on a stub page.
#[derive(Clone, Debug)]
pub struct StubElement {
    key: String,
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    parent: Option<String>,
    hidden: bool,
    disabled: bool,
    obscured: bool,
    intercepts: u32,
    script_click_fails: bool,
    read_only: bool,
    invalid: bool,
    on_click: Option<ClickBehavior>,
    value: String,
    selected: bool,
}

impl StubElement {
    pub fn new(key: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            parent: None,
            hidden: false,
            disabled: false,
            obscured: false,
            intercepts: 0,
            script_click_fails: false,
            read_only: false,
            invalid: false,
            on_click: None,
            value: String::new(),
            selected: false,
        }
    }

    /// `<a href=..>text</a>`
    pub fn link(key: impl Into<String>, href: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(key, "a").attr("href", href).text(text)
    }

    /// `<input type=.. name=key id=key>`
    pub fn input(key: impl Into<String>, input_type: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone(), "input")
            .attr("type", input_type)
            .attr("name", key.clone())
            .attr("id", key)
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match name.as_str() {
            "value" => self.value = value.clone(),
            "checked" => self.selected = true,
            _ => {}
        }
        self.attributes.insert(name, value);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Nest this element inside the element with key `parent`.
    pub fn within(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Another element covers this one's centre point.
    pub fn obscured(mut self) -> Self {
        self.obscured = true;
        self
    }

    /// Fail the next `times` pointer clicks with "click intercepted".
    pub fn intercept(mut self, times: u32) -> Self {
        self.intercepts = times;
        self
    }

    pub fn script_click_fails(mut self) -> Self {
        self.script_click_fails = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Force native validation to fail.
    pub fn invalid(mut self) -> Self {
        self.invalid = true;
        self
    }

    pub fn on_click(mut self, behavior: ClickBehavior) -> Self {
        self.on_click = Some(behavior);
        self
    }

    fn implied_behavior(&self) -> ClickBehavior {
        if let Some(behavior) = &self.on_click {
            return behavior.clone();
        }
        if self.tag != "a" {
            return ClickBehavior::Nothing;
        }
        let Some(href) = self.attributes.get("href") else {
            return ClickBehavior::Nothing;
        };
        let lowered = href.trim().to_ascii_lowercase();
        if lowered.is_empty()
            || lowered.starts_with('#')
            || ["javascript:", "mailto:", "tel:"]
                .iter()
                .any(|scheme| lowered.starts_with(scheme))
        {
            return ClickBehavior::Nothing;
        }
        if self.attributes.get("target").map(String::as_str) == Some("_blank") {
            ClickBehavior::OpenTab(href.clone())
        } else {
            ClickBehavior::Navigate(href.clone())
        }
    }
}

#[derive(Debug)]
struct Tab {
    handle: ContextHandle,
    history: Vec<String>,
    epoch: u64,
    doc: Vec<StubElement>,
    blank_reads: u32,
}

impl Tab {
    fn url(&self) -> &str {
        self.history.last().map(String::as_str).unwrap_or("about:blank")
    }
}

#[derive(Debug, Default)]
struct State {
    pages: HashMap<String, Vec<StubElement>>,
    tabs: Vec<Tab>,
    current: Option<ContextHandle>,
    next_tab: u32,
    issued: HashMap<ElementId, (ContextHandle, u64, String)>,
    calls: Vec<String>,
    loading: HashSet<String>,
    query_failure: Option<AdapterError>,
}

impl State {
    fn load(&self, url: &str) -> Vec<StubElement> {
        self.pages.get(url).cloned().unwrap_or_default()
    }

    fn tab_mut(&mut self) -> Result<&mut Tab, AdapterError> {
        let current = self.current.clone().ok_or_else(no_context)?;
        self.tabs
            .iter_mut()
            .find(|tab| tab.handle == current)
            .ok_or_else(no_context)
    }

    fn tab(&self) -> Result<&Tab, AdapterError> {
        let current = self.current.as_ref().ok_or_else(no_context)?;
        self.tabs
            .iter()
            .find(|tab| &tab.handle == current)
            .ok_or_else(no_context)
    }

    fn open_tab(&mut self, url: String, blank_reads: u32) -> ContextHandle {
        self.next_tab += 1;
        let handle = ContextHandle(format!("tab-{}", self.next_tab));
        let doc = self.load(&url);
        self.tabs.push(Tab {
            handle: handle.clone(),
            history: vec![url],
            epoch: 0,
            doc,
            blank_reads,
        });
        handle
    }

    fn go(&mut self, url: String) -> Result<(), AdapterError> {
        let doc = self.load(&url);
        let tab = self.tab_mut()?;
        tab.history.push(url);
        tab.epoch += 1;
        tab.doc = doc;
        Ok(())
    }

    /// Index into the current tab's document for a live handle.
    fn locate(&self, id: &ElementId) -> Result<usize, AdapterError> {
        let (handle, epoch, key) = self.issued.get(id).ok_or_else(|| stale(id))?;
        let tab = self.tab()?;
        if &tab.handle != handle || tab.epoch != *epoch {
            return Err(stale(id));
        }
        tab.doc
            .iter()
            .position(|el| &el.key == key)
            .ok_or_else(|| stale(id))
    }

    fn issue(&mut self, key: &str) -> Result<ElementId, AdapterError> {
        let tab = self.tab()?;
        let entry = (tab.handle.clone(), tab.epoch, key.to_string());
        if let Some((id, _)) = self.issued.iter().find(|(_, v)| **v == entry) {
            return Ok(id.clone());
        }
        let id = ElementId::new();
        self.issued.insert(id.clone(), entry);
        Ok(id)
    }
}

fn no_context() -> AdapterError {
    AdapterError::new(AdapterErrorKind::NoSuchContext).with_hint("no current browsing context")
}

fn stale(id: &ElementId) -> AdapterError {
    AdapterError::new(AdapterErrorKind::StaleElement).with_hint(format!("element {}", id))
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_form_control(el: &StubElement) -> bool {
    matches!(el.tag.as_str(), "input" | "textarea" | "select")
}

/// Read-only view over one document used by the matcher.
struct Doc<'a> {
    elements: &'a [StubElement],
}

impl<'a> Doc<'a> {
    fn get(&self, key: &str) -> Option<&'a StubElement> {
        self.elements.iter().find(|el| el.key == key)
    }

    fn is_descendant(&self, el: &StubElement, ancestor: &str) -> bool {
        let mut parent = el.parent.as_deref();
        while let Some(key) = parent {
            if key == ancestor {
                return true;
            }
            parent = self.get(key).and_then(|p| p.parent.as_deref());
        }
        false
    }

    fn is_visible(&self, el: &StubElement) -> bool {
        if el.hidden || el.attributes.get("type").map(String::as_str) == Some("hidden") {
            return false;
        }
        match el.parent.as_deref().and_then(|key| self.get(key)) {
            Some(parent) => self.is_visible(parent),
            None => true,
        }
    }

    /// Own text plus the text of every descendant, normalized.
    fn string_value(&self, el: &StubElement) -> String {
        let mut parts = vec![el.text.clone()];
        parts.extend(
            self.elements
                .iter()
                .filter(|other| self.is_descendant(other, &el.key))
                .map(|other| other.text.clone()),
        );
        normalize(&parts.join(" "))
    }

    fn matches_role(&self, el: &StubElement, role: &str) -> bool {
        match el.attributes.get("role") {
            Some(explicit) => explicit == role,
            None => {
                implicit_role(
                    &el.tag,
                    el.attributes.get("type").map(String::as_str),
                    el.attributes.contains_key("href"),
                ) == Some(role)
            }
        }
    }

    fn matches_label(&self, index: usize, el: &StubElement, text: &str) -> bool {
        let labels: Vec<(usize, &StubElement)> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, l)| l.tag == "label" && self.string_value(l).contains(text))
            .collect();

        let by_for = el.attributes.get("id").is_some_and(|id| {
            labels
                .iter()
                .any(|(_, l)| l.attributes.get("for") == Some(id))
        });
        if by_for {
            return true;
        }
        if !is_form_control(el) {
            return el
                .attributes
                .get("aria-label")
                .is_some_and(|aria| aria.contains(text));
        }
        let nested = labels.iter().any(|(_, l)| self.is_descendant(el, &l.key));
        let following = labels.iter().any(|(label_index, _)| {
            self.elements
                .iter()
                .enumerate()
                .skip(label_index + 1)
                .find(|(_, candidate)| is_form_control(candidate))
                .map(|(i, _)| i)
                == Some(index)
        });
        let aria = el
            .attributes
            .get("aria-label")
            .is_some_and(|aria| aria.contains(text));
        nested || following || aria
    }

    fn matches(&self, index: usize, el: &StubElement, query: &Query) -> bool {
        match query {
            Query::Tag(tag) => el.tag == tag.to_ascii_lowercase(),
            Query::Strategy(Strategy::Attribute { name, value }) => {
                el.attributes.get(name) == Some(value)
            }
            Query::Strategy(Strategy::Role { role }) => self.matches_role(el, role),
            Query::Strategy(Strategy::LabelText { text }) => self.matches_label(index, el, text),
            Query::Strategy(Strategy::FreeText { text, tag }) => {
                let in_value = el
                    .attributes
                    .get("value")
                    .is_some_and(|value| value.contains(text.as_str()));
                match tag {
                    Some(tag) => el.tag == *tag && (self.string_value(el).contains(text.as_str()) || in_value),
                    None => normalize(&el.text).contains(text.as_str()) || in_value,
                }
            }
        }
    }
}

/// In-memory [`BrowserDriver`].
pub struct StubBrowser {
    state: Mutex<State>,
}

impl StubBrowser {
    /// A browser with one tab showing `start_url`.
    pub fn new(start_url: impl Into<String>) -> Self {
        let mut state = State::default();
        let handle = state.open_tab(start_url.into(), 0);
        state.current = Some(handle);
        Self {
            state: Mutex::new(state),
        }
    }

    /// Declare the elements of the page at `url`. Tabs already showing the
    /// URL pick up the new declaration immediately.
    pub fn page(self, url: impl Into<String>, elements: Vec<StubElement>) -> Self {
        {
            let mut state = self.state.lock();
            let url = url.into();
            for tab in state.tabs.iter_mut().filter(|tab| tab.url() == url) {
                tab.doc = elements.clone();
            }
            state.pages.insert(url, elements);
        }
        self
    }

    /// The page at `url` never reports a complete document.
    pub fn loading(self, url: impl Into<String>) -> Self {
        self.state.lock().loading.insert(url.into());
        self
    }

    /// Every later `find_all` fails with `error`.
    pub fn fail_queries(&self, error: AdapterError) {
        self.state.lock().query_failure = Some(error);
    }

    /// Every driver call so far, formatted `op` or `op:key`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.as_str() == op || call.starts_with(&format!("{}:", op)))
            .count()
    }

    pub fn tab_count(&self) -> usize {
        self.state.lock().tabs.len()
    }

    pub fn focused(&self) -> Option<ContextHandle> {
        self.state.lock().current.clone()
    }

    /// URL of the focused tab without consuming a pending `about:blank` read.
    pub fn url_now(&self) -> Option<String> {
        let state = self.state.lock();
        state.tab().ok().map(|tab| tab.url().to_string())
    }

    /// Current value of a form control in the focused tab.
    pub fn value_of(&self, key: &str) -> Option<String> {
        let state = self.state.lock();
        let tab = state.tab().ok()?;
        tab.doc.iter().find(|el| el.key == key).map(|el| el.value.clone())
    }

    pub fn is_checked(&self, key: &str) -> Option<bool> {
        let state = self.state.lock();
        let tab = state.tab().ok()?;
        tab.doc.iter().find(|el| el.key == key).map(|el| el.selected)
    }

    fn with_element<T>(
        &self,
        op: &str,
        id: &ElementId,
        f: impl FnOnce(&mut State, usize) -> Result<T, AdapterError>,
    ) -> Result<T, AdapterError> {
        let mut state = self.state.lock();
        let index = state.locate(id)?;
        let key = state.tab()?.doc[index].key.clone();
        debug!(op, key = %key, "stub call");
        state.calls.push(format!("{}:{}", op, key));
        f(&mut *state, index)
    }

    fn record(&self, state: &mut State, op: &str) {
        debug!(op, "stub call");
        state.calls.push(op.to_string());
    }

    fn activate(state: &mut State, index: usize) -> Result<(), AdapterError> {
        let tab = state.tab_mut()?;
        let base = tab.url().to_string();
        let target = &tab.doc[index];
        let input_type = if target.tag == "input" {
            target.attributes.get("type").cloned()
        } else {
            None
        };
        let group = target.attributes.get("name").cloned();
        match input_type.as_deref() {
            Some("checkbox") => tab.doc[index].selected = !tab.doc[index].selected,
            Some("radio") => {
                for other in tab.doc.iter_mut().filter(|other| {
                    other.attributes.get("type").map(String::as_str) == Some("radio")
                        && other.attributes.get("name") == group.as_ref()
                }) {
                    other.selected = false;
                }
                tab.doc[index].selected = true;
            }
            _ => {}
        }

        match tab.doc[index].implied_behavior() {
            ClickBehavior::Nothing => Ok(()),
            ClickBehavior::Navigate(target) => {
                let url = resolve_href(&base, &target);
                state.go(url)
            }
            ClickBehavior::OpenTab(target) => {
                let url = resolve_href(&base, &target);
                state.open_tab(url, 1);
                Ok(())
            }
            ClickBehavior::OpenTabAndNavigate(new_tab, same_tab) => {
                let opened = resolve_href(&base, &new_tab);
                let url = resolve_href(&base, &same_tab);
                state.open_tab(opened, 1);
                state.go(url)
            }
            ClickBehavior::Replace(target) => {
                let url = resolve_href(&base, &target);
                let doc = state.load(&url);
                let tab = state.tab_mut()?;
                tab.history.pop();
                tab.history.push(url);
                tab.epoch += 1;
                tab.doc = doc;
                Ok(())
            }
            ClickBehavior::Reveal(keys) => {
                for el in tab.doc.iter_mut().filter(|el| keys.contains(&el.key)) {
                    el.hidden = false;
                }
                Ok(())
            }
        }
    }
}

fn resolve_href(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[async_trait]
impl BrowserDriver for StubBrowser {
    async fn navigate(&self, url: &str) -> Result<(), AdapterError> {
        let mut state = self.state.lock();
        self.record(&mut state, &format!("navigate:{}", url));
        state.go(url.to_string())
    }

    async fn current_url(&self) -> Result<String, AdapterError> {
        let mut state = self.state.lock();
        let tab = state.tab_mut()?;
        if tab.blank_reads > 0 {
            tab.blank_reads -= 1;
            return Ok("about:blank".to_string());
        }
        Ok(tab.url().to_string())
    }

    async fn back(&self) -> Result<(), AdapterError> {
        let mut state = self.state.lock();
        self.record(&mut state, "back");
        let tab = state.tab_mut()?;
        if tab.history.len() < 2 {
            return Ok(());
        }
        tab.history.pop();
        tab.epoch += 1;
        let url = tab.url().to_string();
        let doc = state.load(&url);
        state.tab_mut()?.doc = doc;
        Ok(())
    }

    async fn find_all(
        &self,
        query: &Query,
        scope: Option<&ElementId>,
    ) -> Result<Vec<ElementId>, AdapterError> {
        let mut state = self.state.lock();
        self.record(&mut state, &format!("find_all:{}", query));
        if let Some(error) = &state.query_failure {
            return Err(error.clone());
        }
        query.to_xpath(scope.is_some())?;
        let scope_key = match scope {
            Some(id) => {
                let index = state.locate(id)?;
                Some(state.tab()?.doc[index].key.clone())
            }
            None => None,
        };
        let keys: Vec<String> = {
            let tab = state.tab()?;
            let doc = Doc { elements: &tab.doc };
            tab.doc
                .iter()
                .enumerate()
                .filter(|(_, el)| match &scope_key {
                    Some(scope) => doc.is_descendant(el, scope),
                    None => true,
                })
                .filter(|(index, el)| doc.matches(*index, el, query))
                .map(|(_, el)| el.key.clone())
                .collect()
        };
        keys.iter().map(|key| state.issue(key)).collect()
    }

    async fn is_visible(&self, el: &ElementId) -> Result<bool, AdapterError> {
        self.with_element("is_visible", el, |state, index| {
            let tab = state.tab()?;
            Ok(Doc { elements: &tab.doc }.is_visible(&tab.doc[index]))
        })
    }

    async fn is_enabled(&self, el: &ElementId) -> Result<bool, AdapterError> {
        self.with_element("is_enabled", el, |state, index| {
            Ok(!state.tab()?.doc[index].disabled)
        })
    }

    async fn is_selected(&self, el: &ElementId) -> Result<bool, AdapterError> {
        self.with_element("is_selected", el, |state, index| {
            Ok(state.tab()?.doc[index].selected)
        })
    }

    async fn scroll_into_view(&self, el: &ElementId) -> Result<(), AdapterError> {
        self.with_element("scroll", el, |_, _| Ok(()))
    }

    async fn click(&self, el: &ElementId) -> Result<(), AdapterError> {
        self.with_element("click", el, |state, index| {
            let tab = state.tab_mut()?;
            let visible = Doc { elements: &tab.doc }.is_visible(&tab.doc[index]);
            let target = &mut tab.doc[index];
            if !visible {
                return Err(AdapterError::new(AdapterErrorKind::NotInteractable)
                    .with_hint(format!("{} is not displayed", target.key)));
            }
            if target.intercepts > 0 {
                target.intercepts -= 1;
                return Err(AdapterError::new(AdapterErrorKind::ClickIntercepted)
                    .with_hint(format!("{} is covered by another element", target.key))
                    .retriable(true));
            }
            if target.disabled {
                return Ok(());
            }
            Self::activate(state, index)
        })
    }

    async fn js_click(&self, el: &ElementId) -> Result<(), AdapterError> {
        self.with_element("js_click", el, |state, index| {
            let target = &state.tab()?.doc[index];
            if target.script_click_fails {
                return Err(AdapterError::new(AdapterErrorKind::Internal)
                    .with_hint(format!("javascript error clicking {}", target.key)));
            }
            if target.disabled {
                return Ok(());
            }
            Self::activate(state, index)
        })
    }

    async fn clear(&self, el: &ElementId) -> Result<(), AdapterError> {
        self.with_element("clear", el, |state, index| {
            let target = &mut state.tab_mut()?.doc[index];
            if target.read_only || target.disabled {
                return Err(AdapterError::new(AdapterErrorKind::NotInteractable)
                    .with_hint(format!("{} is not editable", target.key)));
            }
            target.value.clear();
            Ok(())
        })
    }

    async fn send_keys(&self, el: &ElementId, text: &str) -> Result<(), AdapterError> {
        self.with_element("send_keys", el, |state, index| {
            let tab = state.tab_mut()?;
            let visible = Doc { elements: &tab.doc }.is_visible(&tab.doc[index]);
            let target = &mut tab.doc[index];
            if !visible || target.read_only || target.disabled {
                return Err(AdapterError::new(AdapterErrorKind::NotInteractable)
                    .with_hint(format!("{} is not editable", target.key)));
            }
            target.value.push_str(text);
            Ok(())
        })
    }

    async fn attribute(&self, el: &ElementId, name: &str) -> Result<Option<String>, AdapterError> {
        self.with_element("attribute", el, |state, index| {
            Ok(state.tab()?.doc[index].attributes.get(name).cloned())
        })
    }

    async fn property(&self, el: &ElementId, name: &str) -> Result<Option<String>, AdapterError> {
        self.with_element("property", el, |state, index| {
            let tab = state.tab()?;
            let target = &tab.doc[index];
            Ok(match name {
                "href" => target
                    .attributes
                    .get("href")
                    .map(|href| resolve_href(tab.url(), href)),
                "value" => Some(target.value.clone()),
                "checked" => Some(target.selected.to_string()),
                _ => target.attributes.get(name).cloned(),
            })
        })
    }

    async fn text(&self, el: &ElementId) -> Result<String, AdapterError> {
        self.with_element("text", el, |state, index| {
            let tab = state.tab()?;
            let doc = Doc { elements: &tab.doc };
            let target = &tab.doc[index];
            Ok(if doc.is_visible(target) {
                doc.string_value(target)
            } else {
                String::new()
            })
        })
    }

    async fn check_validity(&self, el: &ElementId) -> Result<bool, AdapterError> {
        self.with_element("check_validity", el, |state, index| {
            let target = &state.tab()?.doc[index];
            let required = target.attributes.contains_key("required");
            let email = target.attributes.get("type").map(String::as_str) == Some("email");
            Ok(!(target.invalid
                || (required && target.value.is_empty())
                || (email && !target.value.is_empty() && !target.value.contains('@'))))
        })
    }

    async fn is_obscured(&self, el: &ElementId) -> Result<bool, AdapterError> {
        self.with_element("is_obscured", el, |state, index| {
            Ok(state.tab()?.doc[index].obscured)
        })
    }

    async fn open_contexts(&self) -> Result<Vec<ContextHandle>, AdapterError> {
        let state = self.state.lock();
        Ok(state.tabs.iter().map(|tab| tab.handle.clone()).collect())
    }

    async fn current_context(&self) -> Result<ContextHandle, AdapterError> {
        self.state.lock().current.clone().ok_or_else(no_context)
    }

    async fn switch_to(&self, handle: &ContextHandle) -> Result<(), AdapterError> {
        let mut state = self.state.lock();
        self.record(&mut state, &format!("switch_to:{}", handle));
        if !state.tabs.iter().any(|tab| &tab.handle == handle) {
            return Err(AdapterError::new(AdapterErrorKind::NoSuchContext)
                .with_hint(format!("unknown handle {}", handle)));
        }
        state.current = Some(handle.clone());
        Ok(())
    }

    async fn close_current(&self) -> Result<(), AdapterError> {
        let mut state = self.state.lock();
        let current = state.current.take().ok_or_else(no_context)?;
        self.record(&mut state, &format!("close:{}", current));
        state.tabs.retain(|tab| tab.handle != current);
        Ok(())
    }

    async fn ready_state(&self) -> Result<String, AdapterError> {
        let state = self.state.lock();
        let tab = state.tab()?;
        if state.loading.contains(tab.url()) {
            return Ok("loading".to_string());
        }
        Ok("complete".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP: &str = "https://shop.example.com/";

    fn shop() -> StubBrowser {
        StubBrowser::new(SHOP).page(
            SHOP,
            vec![
                StubElement::new("form", "form"),
                StubElement::new("email-label", "label")
                    .attr("for", "email")
                    .text("Email address")
                    .within("form"),
                StubElement::input("email", "email").within("form"),
                StubElement::new("name-label", "label").text("Full name").within("form"),
                StubElement::input("name", "text").within("form"),
                StubElement::new("submit", "button")
                    .attr("type", "submit")
                    .text("Send")
                    .within("form"),
                StubElement::link("twitter", "https://twitter.com/foo", "Twitter")
                    .attr("target", "_blank"),
                StubElement::link("about", "/about", "About us"),
                StubElement::new("ghost", "button").text("Send").hidden(),
            ],
        )
    }

    async fn keys(browser: &StubBrowser, query: Query) -> Vec<String> {
        let ids = browser.find_all(&query, None).await.unwrap();
        let mut out = Vec::new();
        for id in ids {
            out.push(browser.attribute(&id, "id").await.unwrap().unwrap_or_default());
        }
        out
    }

    #[tokio::test]
    async fn label_strategies_find_controls() {
        let browser = shop();
        assert_eq!(
            keys(&browser, Strategy::label_text("Email").into()).await,
            vec!["email"]
        );
        assert_eq!(
            keys(&browser, Strategy::label_text("Full name").into()).await,
            vec!["name"]
        );
    }

    #[tokio::test]
    async fn role_and_text_follow_document_order() {
        let browser = shop();
        let buttons = browser
            .find_all(&Strategy::role("button").into(), None)
            .await
            .unwrap();
        assert_eq!(buttons.len(), 2);
        assert!(browser.is_visible(&buttons[0]).await.unwrap());
        assert!(!browser.is_visible(&buttons[1]).await.unwrap());

        let links = browser.find_all(&Query::Tag("a".into()), None).await.unwrap();
        assert_eq!(links.len(), 2);
        let href = browser.property(&links[1], "href").await.unwrap();
        assert_eq!(href.as_deref(), Some("https://shop.example.com/about"));
    }

    #[tokio::test]
    async fn scoped_queries_only_see_descendants() {
        let browser = shop();
        let form = browser
            .find_all(&Query::Tag("form".into()), None)
            .await
            .unwrap();
        let inside = browser
            .find_all(&Strategy::free_text("Send").into(), Some(&form[0]))
            .await
            .unwrap();
        assert_eq!(inside.len(), 1);
    }

    #[tokio::test]
    async fn new_tab_reads_blank_first() {
        let browser = shop();
        let link = browser
            .find_all(&Strategy::free_text("Twitter").into(), None)
            .await
            .unwrap();
        browser.click(&link[0]).await.unwrap();
        let handles = browser.open_contexts().await.unwrap();
        assert_eq!(handles.len(), 2);

        browser.switch_to(&handles[1]).await.unwrap();
        assert_eq!(browser.current_url().await.unwrap(), "about:blank");
        assert_eq!(browser.current_url().await.unwrap(), "https://twitter.com/foo");
    }

    #[tokio::test]
    async fn navigation_invalidates_handles() {
        let browser = shop();
        let about = browser
            .find_all(&Strategy::free_text("About").into(), None)
            .await
            .unwrap();
        browser.click(&about[0]).await.unwrap();
        assert_eq!(browser.url_now().as_deref(), Some("https://shop.example.com/about"));

        let err = browser.is_visible(&about[0]).await.unwrap_err();
        assert!(err.is_stale());

        browser.back().await.unwrap();
        assert_eq!(browser.current_url().await.unwrap(), SHOP);
    }

    #[tokio::test]
    async fn interception_and_validity() {
        let browser = StubBrowser::new(SHOP).page(
            SHOP,
            vec![
                StubElement::new("cta", "button").text("Buy").intercept(1),
                StubElement::input("mail", "email").attr("required", ""),
            ],
        );
        let cta = browser
            .find_all(&Strategy::free_text("Buy").into(), None)
            .await
            .unwrap();
        assert!(browser.click(&cta[0]).await.unwrap_err().is_intercepted());
        tokio_test::assert_ok!(browser.click(&cta[0]).await);

        let mail = browser
            .find_all(&Strategy::attribute("name", "mail").into(), None)
            .await
            .unwrap();
        assert!(!browser.check_validity(&mail[0]).await.unwrap());
        browser.send_keys(&mail[0], "not-an-email").await.unwrap();
        assert!(!browser.check_validity(&mail[0]).await.unwrap());
        browser.clear(&mail[0]).await.unwrap();
        browser.send_keys(&mail[0], "a@b.co").await.unwrap();
        assert!(browser.check_validity(&mail[0]).await.unwrap());
        assert_eq!(browser.value_of("mail").as_deref(), Some("a@b.co"));
    }
}
