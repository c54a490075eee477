use std::collections::{BTreeSet, VecDeque};

/// Logical keys a selection prompt reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
}

/// How a selection prompt was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Chosen(usize),
    Canceled,
}

/// Enable/disable-by-name registry gating which key bindings are live.
pub trait InputContexts {
    fn enable(&mut self, name: &str);
    fn disable(&mut self, name: &str);
    fn is_enabled(&self, name: &str) -> bool;
}

/// Plain set-backed [`InputContexts`].
#[derive(Debug, Clone, Default)]
pub struct ContextRegistry {
    enabled: BTreeSet<String>,
}

impl InputContexts for ContextRegistry {
    fn enable(&mut self, name: &str) {
        self.enabled.insert(name.to_string());
    }

    fn disable(&mut self, name: &str) {
        self.enabled.remove(name);
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }
}

/// Keys buffered by the host plus the state of the prompt consuming them.
#[derive(Debug, Clone, Default)]
pub struct PromptInput {
    keys: VecDeque<LogicalKey>,
    focused: usize,
    option_count: usize,
    columns: usize,
    cancelable: bool,
    last_selection: Option<Selection>,
}

impl PromptInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: LogicalKey) {
        self.keys.push_back(key);
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn last_selection(&self) -> Option<Selection> {
        self.last_selection
    }

    pub fn take_selection(&mut self) -> Option<Selection> {
        self.last_selection.take()
    }

    /// Resets focus for a new prompt. Keys pressed before the prompt opened
    /// are discarded.
    pub fn begin(&mut self, option_count: usize, columns: usize, cancelable: bool) {
        self.keys.clear();
        self.focused = 0;
        self.option_count = option_count;
        self.columns = columns.max(1);
        self.cancelable = cancelable;
        self.last_selection = None;
    }

    /// Consumes buffered keys until one resolves the prompt.
    pub fn process_keys(&mut self) -> Option<Selection> {
        while let Some(key) = self.keys.pop_front() {
            if let Some(selection) = self.apply(key) {
                self.last_selection = Some(selection);
                return Some(selection);
            }
        }
        None
    }

    fn apply(&mut self, key: LogicalKey) -> Option<Selection> {
        let columns = self.columns;
        let column = self.focused % columns;
        match key {
            LogicalKey::Left if column > 0 => self.focused -= 1,
            LogicalKey::Right if column + 1 < columns && self.focused + 1 < self.option_count => {
                self.focused += 1
            }
            LogicalKey::Up if self.focused >= columns => self.focused -= columns,
            LogicalKey::Down if self.focused + columns < self.option_count => self.focused += columns,
            LogicalKey::Confirm if self.option_count > 0 => return Some(Selection::Chosen(self.focused)),
            LogicalKey::Cancel if self.cancelable => return Some(Selection::Canceled),
            _ => {}
        }
        None
    }
}
