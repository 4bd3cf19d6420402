//! Translation of a finished drag gesture into a move request.
//!
//! Droppable containers are lists; draggables are the list-level items. The
//! front-end reports where the item started and where it was dropped and
//! this module decides whether that amounts to a move at all.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{MoveItem, ParentType};

/// A slot inside a droppable container.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DragLocation {
    pub droppable_id: Uuid,
    pub index: usize,
}

/// Result of a drag gesture as reported by the front-end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DragResult {
    pub draggable_id: Uuid,
    pub source: DragLocation,
    /// `None` when the item was dropped outside every container.
    pub destination: Option<DragLocation>,
}

/// The move a drag gesture asks for, or `None` when it was cancelled or the
/// item was dropped back onto its own slot.
pub fn plan_move(drag: &DragResult) -> Option<MoveItem> {
    let destination = drag.destination?;
    if destination == drag.source {
        return None;
    }
    Some(MoveItem {
        item_id: drag.draggable_id,
        target_parent_type: ParentType::List,
        target_parent_id: destination.droppable_id,
        target_index: destination.index,
    })
}
