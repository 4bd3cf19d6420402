//! View-local UI state and the row model a front-end renders.
//!
//! # Design
//! Collapse flags, in-progress inline edits and pending input text live here,
//! never inside the domain [`Board`]. Replacing or patching the board does
//! not reset any of it; [`ViewState::prune`] only forgets entries whose ids
//! have disappeared.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::tree::{item_can_take_child, walk_list, Board, Location};
use crate::types::{Item, TodoList};

/// A field edited inline and committed when it loses focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditTarget {
    ListTitle(Uuid),
    ItemContent(Uuid),
}

/// An input box whose text becomes a new entity on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftTarget {
    NewList,
    /// New item directly under the list.
    NewItem(Uuid),
    /// New sub-item under the item.
    NewSubItem(Uuid),
}

/// Message surfaced to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    collapsed: HashSet<Uuid>,
    edits: HashMap<EditTarget, String>,
    drafts: HashMap<DraftTarget, String>,
    notice: Option<Notice>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    // --- collapse ---

    pub fn is_collapsed(&self, item_id: Uuid) -> bool {
        self.collapsed.contains(&item_id)
    }

    /// Flip the collapse flag and return the new state.
    pub fn toggle_collapsed(&mut self, item_id: Uuid) -> bool {
        if self.collapsed.remove(&item_id) {
            false
        } else {
            self.collapsed.insert(item_id);
            true
        }
    }

    // --- inline edits ---

    /// Start editing, seeding the field with the stored text.
    pub fn begin_edit(&mut self, target: EditTarget, stored: &str) {
        self.edits.insert(target, stored.to_string());
    }

    pub fn set_edit_text(&mut self, target: EditTarget, text: impl Into<String>) {
        self.edits.insert(target, text.into());
    }

    pub fn edit_text(&self, target: EditTarget) -> Option<&str> {
        self.edits.get(&target).map(String::as_str)
    }

    pub fn is_editing(&self, target: EditTarget) -> bool {
        self.edits.contains_key(&target)
    }

    /// End the edit. Returns the text to commit, or `None` when it is blank
    /// or equal to `stored`. The edit buffer is dropped either way.
    pub fn blur(&mut self, target: EditTarget, stored: &str) -> Option<String> {
        let text = self.edits.remove(&target)?;
        if text.trim().is_empty() || text == stored {
            return None;
        }
        Some(text)
    }

    /// Put an edit buffer back after a failed commit so the user keeps the text.
    pub(crate) fn restore_edit(&mut self, target: EditTarget, text: String) {
        self.edits.insert(target, text);
    }

    // --- drafts ---

    pub fn draft(&self, target: DraftTarget) -> &str {
        self.drafts.get(&target).map(String::as_str).unwrap_or("")
    }

    pub fn set_draft(&mut self, target: DraftTarget, text: impl Into<String>) {
        self.drafts.insert(target, text.into());
    }

    pub fn clear_draft(&mut self, target: DraftTarget) {
        self.drafts.remove(&target);
    }

    // --- notices ---

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Forget UI state attached to lists or items no longer on the board.
    pub fn prune(&mut self, board: &Board) {
        let items: HashSet<Uuid> = board.walk().iter().map(|v| v.item.id).collect();
        let alive_list = |id: &Uuid| board.list(*id).is_some();

        self.collapsed.retain(|id| items.contains(id));
        self.edits.retain(|target, _| match target {
            EditTarget::ListTitle(id) => alive_list(id),
            EditTarget::ItemContent(id) => items.contains(id),
        });
        self.drafts.retain(|target, _| match target {
            DraftTarget::NewList => true,
            DraftTarget::NewItem(id) => alive_list(id),
            DraftTarget::NewSubItem(id) => items.contains(id),
        });
    }
}

/// Actions a row offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub add_sub_item: bool,
    pub toggle: bool,
    pub delete: bool,
}

#[derive(Debug, Clone)]
pub enum Row<'a> {
    List {
        list: &'a TodoList,
        editing: Option<&'a str>,
    },
    Item {
        list_id: Uuid,
        location: Location,
        depth: usize,
        item: &'a Item,
        collapsed: bool,
        editing: Option<&'a str>,
        controls: Controls,
    },
}

/// Flatten the board into display rows: each list header followed by its
/// items in pre-order. Sub-items of collapsed items are omitted, and the
/// sub-item form is only offered on expanded items with spare capacity.
pub fn rows<'a>(board: &'a Board, view: &'a ViewState) -> Vec<Row<'a>> {
    let mut out = Vec::new();
    for list in board.lists().values() {
        out.push(Row::List {
            list,
            editing: view.edit_text(EditTarget::ListTitle(list.id)),
        });
        for visit in walk_list(list, |item| !view.is_collapsed(item.id)) {
            let collapsed = view.is_collapsed(visit.item.id);
            out.push(Row::Item {
                list_id: visit.list_id,
                location: visit.location,
                depth: visit.depth,
                item: visit.item,
                collapsed,
                editing: view.edit_text(EditTarget::ItemContent(visit.item.id)),
                controls: Controls {
                    add_sub_item: !collapsed && item_can_take_child(visit.depth, visit.item),
                    toggle: true,
                    delete: true,
                },
            });
        }
    }
    out
}
