use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub use crate::actions::Action;
use crate::window::PanelKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Insert => "Insert".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Modifier+key table. Each combination maps to at most one action.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Alt+1..Alt+7 toggle the catalog panels in order, Alt+0 closes every
    /// panel, Ctrl+Q quits.
    pub fn default() -> Self {
        let mut kb = Self::new();
        for (idx, kind) in PanelKind::ALL.iter().enumerate() {
            let Some(digit) = char::from_digit(idx as u32 + 1, 10) else {
                break;
            };
            kb.add(
                Action::TogglePanel(*kind),
                KeyCombo::new(KeyCode::Char(digit), KeyModifiers::ALT),
            );
        }
        kb.add(
            Action::CloseAll,
            KeyCombo::new(KeyCode::Char('0'), KeyModifiers::ALT),
        );
        kb.add(
            Action::Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        kb
    }

    /// Binds `combo` to `action`, replacing whatever it was bound to before.
    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        for list in self.map.values_mut() {
            list.retain(|c| *c != combo);
        }
        self.map.retain(|_, list| !list.is_empty());
        self.map.entry(action).or_default().push(combo);
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        for (act, list) in &self.map {
            if list.iter().any(|c| c.matches(key)) {
                return Some(*act);
            }
        }
        None
    }

    /// Every binding, panels in catalog order first.
    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        let mut v: Vec<(Action, Vec<String>)> = self
            .map
            .iter()
            .map(|(act, list)| (*act, list.iter().map(|c| c.display()).collect()))
            .collect();
        v.sort_by_key(|(act, _)| match act {
            Action::TogglePanel(kind) => kind.catalog_index(),
            Action::CloseAll => PanelKind::ALL.len(),
            Action::Quit => PanelKind::ALL.len() + 1,
        });
        v
    }

    /// Return the first `KeyCombo` mapped to `action`, if any.
    pub fn first_combo(&self, action: Action) -> Option<KeyCombo> {
        self.map.get(&action).and_then(|list| list.first().cloned())
    }

    /// One line per action, for `--help`.
    pub fn help_text(&self) -> String {
        let entries = self.help_entries();
        let width = entries
            .iter()
            .map(|(_, combos)| combos.join(", ").chars().count())
            .max()
            .unwrap_or(0);
        let mut text = String::from("Keys:\n");
        for (action, combos) in entries {
            text.push_str(&format!("  {:<width$}  {action}\n", combos.join(", ")));
        }
        text
    }

    /// The short key summary shown in the status band.
    pub fn status_hint(&self) -> String {
        let toggle = |kind: Option<&PanelKind>| {
            kind.and_then(|k| self.first_combo(Action::TogglePanel(*k)))
        };
        let mut parts = Vec::new();
        match (toggle(PanelKind::ALL.first()), toggle(PanelKind::ALL.last())) {
            (Some(first), Some(last)) => parts.push(format!("{first}…{last} toggle")),
            (Some(only), None) | (None, Some(only)) => parts.push(format!("{only} toggle")),
            (None, None) => {}
        }
        if let Some(combo) = self.first_combo(Action::CloseAll) {
            parts.push(format!("{combo} close all"));
        }
        if let Some(combo) = self.first_combo(Action::Quit) {
            parts.push(format!("{combo} quit"));
        }
        parts.join(" · ")
    }
}
