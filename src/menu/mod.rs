//! Declarative menu tree and keyboard navigation over it.
//!
//! The tree is plain data deserialized from JSON; activating a leaf yields
//! its `(action, data)` pair for the command dispatcher. Nothing here knows
//! what an action does.

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_MENU_JSON: &str = include_str!("default_menu.json");

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("invalid menu definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("menu {0:?} has no items")]
    EmptyMenu(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MenuNode {
    Leaf {
        label: String,
        action: String,
        #[serde(default)]
        data: Option<String>,
    },
    Separator,
    Submenu {
        label: String,
        children: Vec<MenuNode>,
    },
}

impl MenuNode {
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Leaf { label, .. } | Self::Submenu { label, .. } => Some(label),
            Self::Separator => None,
        }
    }

    pub const fn is_selectable(&self) -> bool {
        !matches!(self, Self::Separator)
    }
}

/// A top-level menu shown in the bar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Menu {
    pub label: String,
    pub items: Vec<MenuNode>,
}

/// An activated leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuAction {
    pub action: String,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuBar {
    menus: Vec<Menu>,
}

impl MenuBar {
    /// Parse a menu bar from JSON.
    pub fn from_json(json: &str) -> Result<Self, MenuError> {
        let menus: Vec<Menu> = serde_json::from_str(json)?;
        if let Some(empty) = menus
            .iter()
            .find(|menu| !menu.items.iter().any(MenuNode::is_selectable))
        {
            return Err(MenuError::EmptyMenu(empty.label.clone()));
        }
        Ok(Self { menus })
    }

    /// The built-in menu bar.
    pub fn default_menu() -> Result<Self, MenuError> {
        Self::from_json(DEFAULT_MENU_JSON)
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    /// Every leaf in the tree, depth first.
    pub fn leaves(&self) -> Vec<MenuAction> {
        fn walk(nodes: &[MenuNode], out: &mut Vec<MenuAction>) {
            for node in nodes {
                match node {
                    MenuNode::Leaf { action, data, .. } => out.push(MenuAction {
                        action: action.clone(),
                        data: data.clone(),
                    }),
                    MenuNode::Submenu { children, .. } => walk(children, out),
                    MenuNode::Separator => {}
                }
            }
        }
        let mut out = Vec::new();
        for menu in &self.menus {
            walk(&menu.items, &mut out);
        }
        out
    }

    /// Index of the top menu whose label starts with `letter`.
    pub fn find_by_initial(&self, letter: char) -> Option<usize> {
        let letter = letter.to_ascii_lowercase();
        self.menus.iter().position(|menu| {
            menu.label
                .chars()
                .next()
                .is_some_and(|c| c.to_ascii_lowercase() == letter)
        })
    }

    /// Items of the list at `depth` along `cursor`'s path.
    pub fn level(&self, cursor: &MenuCursor, depth: usize) -> Option<&[MenuNode]> {
        let mut items = self.menus.get(cursor.top)?.items.as_slice();
        for &index in cursor.path.iter().take(depth) {
            match items.get(index)? {
                MenuNode::Submenu { children, .. } => items = children,
                _ => return None,
            }
        }
        Some(items)
    }
}

/// Keyboard position inside an open menu.
///
/// `path[0]` is the highlighted item of the top menu's dropdown; each
/// further entry is the highlighted item of an opened submenu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCursor {
    pub top: usize,
    pub path: Vec<usize>,
}

impl MenuCursor {
    /// Open the top menu at `top` with its first selectable item highlighted.
    pub fn open(bar: &MenuBar, top: usize) -> Self {
        let top = top.min(bar.menus.len().saturating_sub(1));
        let mut cursor = Self {
            top,
            path: vec![0],
        };
        cursor.path[0] = cursor.first_selectable(bar, 0);
        cursor
    }

    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    /// The node under the cursor.
    pub fn current<'a>(&self, bar: &'a MenuBar) -> Option<&'a MenuNode> {
        let depth = self.depth();
        bar.level(self, depth)?.get(self.path[depth])
    }

    pub fn move_down(&mut self, bar: &MenuBar) {
        self.step(bar, 1);
    }

    pub fn move_up(&mut self, bar: &MenuBar) {
        self.step(bar, -1);
    }

    /// Enter a submenu, or switch to the next top menu.
    pub fn move_right(&mut self, bar: &MenuBar) {
        if matches!(self.current(bar), Some(MenuNode::Submenu { .. })) {
            self.enter(bar);
        } else {
            let next = (self.top + 1) % bar.menus.len().max(1);
            *self = Self::open(bar, next);
        }
    }

    /// Leave a submenu, or switch to the previous top menu.
    pub fn move_left(&mut self, bar: &MenuBar) {
        if self.path.len() > 1 {
            self.path.pop();
        } else {
            let count = bar.menus.len().max(1);
            *self = Self::open(bar, (self.top + count - 1) % count);
        }
    }

    /// Activate the highlighted node: a leaf yields its action, a submenu
    /// opens.
    pub fn activate(&mut self, bar: &MenuBar) -> Option<MenuAction> {
        match self.current(bar)? {
            MenuNode::Leaf { action, data, .. } => Some(MenuAction {
                action: action.clone(),
                data: data.clone(),
            }),
            MenuNode::Submenu { .. } => {
                self.enter(bar);
                None
            }
            MenuNode::Separator => None,
        }
    }

    fn enter(&mut self, bar: &MenuBar) {
        self.path.push(0);
        let depth = self.depth();
        let first = self.first_selectable(bar, depth);
        self.path[depth] = first;
    }

    fn first_selectable(&self, bar: &MenuBar, depth: usize) -> usize {
        bar.level(self, depth)
            .and_then(|items| items.iter().position(MenuNode::is_selectable))
            .unwrap_or(0)
    }

    fn step(&mut self, bar: &MenuBar, delta: isize) {
        let depth = self.depth();
        let Some(items) = bar.level(self, depth) else {
            return;
        };
        let len = items.len();
        if len == 0 {
            return;
        }
        let mut index = self.path[depth];
        for _ in 0..len {
            index = (index + len).saturating_add_signed(delta) % len;
            if items[index].is_selectable() {
                self.path[depth] = index;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    fn bar() -> MenuBar {
        MenuBar::default_menu().unwrap()
    }

    fn label(cursor: &MenuCursor, bar: &MenuBar) -> String {
        cursor
            .current(bar)
            .and_then(MenuNode::label)
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_default_menu_top_labels() {
        let bar = bar();
        let labels: Vec<&str> = bar.menus().iter().map(|m| m.label.as_str()).collect();
        assert_eq!(
            labels,
            ["File", "Edit", "Actions", "Structure", "Forms", "Media", "Meta", "Help"]
        );
    }

    #[test]
    fn test_every_default_leaf_parses_as_command() {
        for leaf in bar().leaves() {
            let parsed = Command::parse(&leaf.action, leaf.data.as_deref());
            assert!(parsed.is_ok(), "{leaf:?} -> {parsed:?}");
        }
    }

    #[test]
    fn test_leaves_include_nested_definitions() {
        let leaves = bar().leaves();
        assert!(leaves.contains(&MenuAction {
            action: "insertTag".to_string(),
            data: Some("dd".to_string()),
        }));
    }

    #[test]
    fn test_from_json_rejects_unknown_kind() {
        let err = MenuBar::from_json(r#"[{"label":"X","items":[{"kind":"button"}]}]"#);
        assert!(matches!(err, Err(MenuError::Parse(_))));
    }

    #[test]
    fn test_from_json_rejects_empty_menu() {
        let err = MenuBar::from_json(r#"[{"label":"X","items":[{"kind":"separator"}]}]"#);
        assert!(matches!(err, Err(MenuError::EmptyMenu(label)) if label == "X"));
    }

    #[test]
    fn test_navigation_skips_separators() {
        let bar = bar();
        let mut cursor = MenuCursor::open(&bar, 0);
        for _ in 0..4 {
            cursor.move_down(&bar);
        }
        assert_eq!(label(&cursor, &bar), "Exit");
        cursor.move_down(&bar);
        assert_eq!(label(&cursor, &bar), "New");
        cursor.move_up(&bar);
        assert_eq!(label(&cursor, &bar), "Exit");
    }

    #[test]
    fn test_submenu_enter_activate_and_leave() {
        let bar = bar();
        let structure = bar.find_by_initial('s').unwrap();
        let mut cursor = MenuCursor::open(&bar, structure);
        cursor.move_up(&bar);
        assert_eq!(label(&cursor, &bar), "Definitions");

        assert_eq!(cursor.activate(&bar), None);
        assert_eq!(cursor.depth(), 1);
        cursor.move_down(&bar);
        assert_eq!(
            cursor.activate(&bar),
            Some(MenuAction {
                action: "insertTag".to_string(),
                data: Some("dt".to_string()),
            })
        );

        cursor.move_left(&bar);
        assert_eq!(cursor.depth(), 0);
        assert_eq!(label(&cursor, &bar), "Definitions");
    }

    #[test]
    fn test_left_right_cycle_top_menus() {
        let bar = bar();
        let mut cursor = MenuCursor::open(&bar, 0);
        cursor.move_left(&bar);
        assert_eq!(bar.menus()[cursor.top].label, "Help");
        cursor.move_right(&bar);
        assert_eq!(cursor.top, 0);
    }
}
