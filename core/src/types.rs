//! Domain DTOs for the hierarchical todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any schema drift between the two crates. Field
//! names on the wire are camelCase (`subItems`, `parentType`, ...).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A to-do entry and its ordered sub-items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub content: String,
    #[serde(default)]
    pub sub_items: Vec<Item>,
}

impl Item {
    pub fn new(id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            sub_items: Vec::new(),
        }
    }

    /// Number of item levels in this subtree, counting `self` as 1.
    pub fn height(&self) -> usize {
        1 + self.sub_items.iter().map(Item::height).max().unwrap_or(0)
    }

    /// True if `id` names this item or any item below it.
    pub fn contains(&self, id: Uuid) -> bool {
        self.id == id || self.sub_items.iter().any(|sub| sub.contains(id))
    }
}

/// A user-named top-level container of items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoList {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl TodoList {
    pub fn new(id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            items: Vec::new(),
        }
    }
}

/// The full collection as returned by `GET /lists`, keyed by list id.
pub type Lists = BTreeMap<Uuid, TodoList>;

/// Kind of container an item is attached to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParentType {
    List,
    Item,
}

impl fmt::Display for ParentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentType::List => f.write_str("list"),
            ParentType::Item => f.write_str("item"),
        }
    }
}

/// Request payload for creating a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateList {
    pub title: String,
}

/// Request payload for renaming a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateList {
    pub title: String,
}

/// `PUT /lists/{id}` answers with the list header only, without items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListHeader {
    pub id: Uuid,
    pub title: String,
}

/// Request payload for creating an item under a list or another item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    pub parent_type: ParentType,
    pub parent_id: Uuid,
    pub content: String,
}

/// Request payload for editing an item's content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateItem {
    pub content: String,
}

/// `PUT /items/{id}` answers with the item header only, without sub-items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemHeader {
    pub id: Uuid,
    pub content: String,
}

/// Request payload for reparenting and/or reordering an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoveItem {
    pub item_id: Uuid,
    pub target_parent_type: ParentType,
    pub target_parent_id: Uuid,
    pub target_index: usize,
}
