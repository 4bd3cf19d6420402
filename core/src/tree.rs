//! In-memory lists collection as a tagged tree with explicit move arithmetic.
//!
//! # Design
//! `Board` is the authoritative domain copy held by the application root.
//! Every mutation is keyed by id and either applies completely or leaves the
//! tree untouched. Nesting is bounded: an item at depth `MAX_DEPTH` takes no
//! sub-items and no item holds more than `MAX_CHILDREN` of them. Lists
//! themselves are depth 0 and accept any number of items.
//!
//! Index arithmetic for reordering lives in [`Board::move_item`] only: the
//! item is detached from its source parent first, then inserted at the
//! destination index clamped to the destination's length after the detach.

use uuid::Uuid;

use crate::error::TreeError;
use crate::types::{Item, Lists, ParentType, TodoList};

/// Deepest item level that may exist (list-level items are depth 1).
pub const MAX_DEPTH: usize = 3;

/// Maximum number of sub-items per item.
pub const MAX_CHILDREN: usize = 3;

/// The container an item hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    List(Uuid),
    Item(Uuid),
}

impl Parent {
    pub fn id(self) -> Uuid {
        match self {
            Parent::List(id) | Parent::Item(id) => id,
        }
    }

    pub fn parent_type(self) -> ParentType {
        match self {
            Parent::List(_) => ParentType::List,
            Parent::Item(_) => ParentType::Item,
        }
    }

    pub fn from_wire(parent_type: ParentType, id: Uuid) -> Self {
        match parent_type {
            ParentType::List => Parent::List(id),
            ParentType::Item => Parent::Item(id),
        }
    }
}

/// Position of an item inside its parent's ordered children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub parent: Parent,
    pub index: usize,
}

/// One step of a depth-aware traversal.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub list_id: Uuid,
    pub location: Location,
    /// 1 for items directly under the list.
    pub depth: usize,
    pub item: &'a Item,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    lists: Lists,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lists(lists: Lists) -> Self {
        Self { lists }
    }

    /// Swap in a freshly fetched collection, discarding the current one.
    pub fn replace(&mut self, lists: Lists) {
        self.lists = lists;
    }

    pub fn lists(&self) -> &Lists {
        &self.lists
    }

    pub fn list(&self, id: Uuid) -> Option<&TodoList> {
        self.lists.get(&id)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    // --- traversal ---

    /// Pre-order walk over every item of every list.
    pub fn walk(&self) -> Vec<Visit<'_>> {
        self.lists
            .values()
            .flat_map(|list| walk_list(list, |_| true))
            .collect()
    }

    pub fn visit(&self, id: Uuid) -> Option<Visit<'_>> {
        self.walk().into_iter().find(|v| v.item.id == id)
    }

    pub fn find_item(&self, id: Uuid) -> Option<&Item> {
        self.visit(id).map(|v| v.item)
    }

    pub fn locate(&self, id: Uuid) -> Option<Location> {
        self.visit(id).map(|v| v.location)
    }

    pub fn depth_of(&self, id: Uuid) -> Option<usize> {
        self.visit(id).map(|v| v.depth)
    }

    /// Whether `parent` may acquire one more child right now.
    pub fn can_add_child(&self, parent: Parent) -> bool {
        self.check_can_add_child(parent).is_ok()
    }

    pub fn check_can_add_child(&self, parent: Parent) -> Result<(), TreeError> {
        match parent {
            Parent::List(id) => self.list(id).map(|_| ()).ok_or(TreeError::ListNotFound(id)),
            Parent::Item(id) => {
                let visit = self.visit(id).ok_or(TreeError::ItemNotFound(id))?;
                check_item_capacity(visit.depth, visit.item)
            }
        }
    }

    // --- lists ---

    pub fn insert_list(&mut self, list: TodoList) {
        self.lists.insert(list.id, list);
    }

    pub fn remove_list(&mut self, id: Uuid) -> Option<TodoList> {
        self.lists.remove(&id)
    }

    pub fn rename_list(&mut self, id: Uuid, title: &str) -> Result<(), TreeError> {
        let list = self.lists.get_mut(&id).ok_or(TreeError::ListNotFound(id))?;
        list.title = title.to_string();
        Ok(())
    }

    // --- items ---

    /// Append `item` as the last child of `parent`, honoring the nesting limits.
    pub fn insert_item(&mut self, parent: Parent, item: Item) -> Result<Location, TreeError> {
        self.check_can_add_child(parent)?;
        let parent_depth = self.parent_depth(parent)?;
        if parent_depth + item.height() > MAX_DEPTH {
            return Err(TreeError::DepthLimit(parent.id()));
        }
        let children = self.children_mut(parent)?;
        children.push(item);
        Ok(Location {
            parent,
            index: children.len() - 1,
        })
    }

    pub fn update_content(&mut self, id: Uuid, content: &str) -> Result<(), TreeError> {
        let item = self.find_item_mut(id).ok_or(TreeError::ItemNotFound(id))?;
        item.content = content.to_string();
        Ok(())
    }

    /// Detach an item with its whole subtree. The returned location allows
    /// [`Board::restore_item`] to put it back.
    pub fn remove_item(&mut self, id: Uuid) -> Result<(Location, Item), TreeError> {
        let location = self.locate(id).ok_or(TreeError::ItemNotFound(id))?;
        let item = self.children_mut(location.parent)?.remove(location.index);
        Ok((location, item))
    }

    /// Re-insert a previously detached item. Limits are not checked: the
    /// item was valid where it came from.
    pub fn restore_item(&mut self, location: Location, item: Item) -> Result<(), TreeError> {
        let children = self.children_mut(location.parent)?;
        let index = location.index.min(children.len());
        children.insert(index, item);
        Ok(())
    }

    /// Reparent and/or reorder an item.
    ///
    /// `index` is the final position under `target`, counted after the item
    /// has left its source parent, so moving the first of `[A, B]` to index 1
    /// yields `[B, A]`. Out-of-range indices append.
    pub fn move_item(
        &mut self,
        id: Uuid,
        target: Parent,
        index: usize,
    ) -> Result<Location, TreeError> {
        let source = self.visit(id).ok_or(TreeError::ItemNotFound(id))?;
        let source_location = source.location;
        let height = source.item.height();

        match target {
            Parent::List(list_id) => {
                if self.list(list_id).is_none() {
                    return Err(TreeError::ListNotFound(list_id));
                }
            }
            Parent::Item(target_id) => {
                if source.item.contains(target_id) {
                    return Err(TreeError::Cycle(id));
                }
                let dest = self.visit(target_id).ok_or(TreeError::ItemNotFound(target_id))?;
                if dest.depth + height > MAX_DEPTH {
                    return Err(TreeError::DepthLimit(target_id));
                }
                if source_location.parent != target && dest.item.sub_items.len() >= MAX_CHILDREN {
                    return Err(TreeError::ChildLimit(target_id));
                }
            }
        }

        let (from, item) = self.remove_item(id)?;
        let children = match self.children_mut(target) {
            Ok(children) => children,
            Err(err) => {
                self.restore_item(from, item)?;
                return Err(err);
            }
        };
        let index = index.min(children.len());
        children.insert(index, item);
        tracing::trace!(item = %id, ?target, index, "item moved in local tree");
        Ok(Location {
            parent: target,
            index,
        })
    }

    fn parent_depth(&self, parent: Parent) -> Result<usize, TreeError> {
        match parent {
            Parent::List(_) => Ok(0),
            Parent::Item(id) => self.depth_of(id).ok_or(TreeError::ItemNotFound(id)),
        }
    }

    fn children_mut(&mut self, parent: Parent) -> Result<&mut Vec<Item>, TreeError> {
        match parent {
            Parent::List(id) => self
                .lists
                .get_mut(&id)
                .map(|list| &mut list.items)
                .ok_or(TreeError::ListNotFound(id)),
            Parent::Item(id) => self
                .find_item_mut(id)
                .map(|item| &mut item.sub_items)
                .ok_or(TreeError::ItemNotFound(id)),
        }
    }

    fn find_item_mut(&mut self, id: Uuid) -> Option<&mut Item> {
        self.lists
            .values_mut()
            .find_map(|list| find_in_mut(&mut list.items, id))
    }
}

/// Pre-order walk over one list. Sub-items of an item are visited only when
/// `descend(item)` returns true.
pub fn walk_list<'a>(list: &'a TodoList, descend: impl Fn(&Item) -> bool) -> Vec<Visit<'a>> {
    let mut out = Vec::new();
    let mut stack: Vec<(Location, usize, &'a Item)> = list
        .items
        .iter()
        .enumerate()
        .rev()
        .map(|(index, item)| {
            let location = Location {
                parent: Parent::List(list.id),
                index,
            };
            (location, 1, item)
        })
        .collect();

    while let Some((location, depth, item)) = stack.pop() {
        out.push(Visit {
            list_id: list.id,
            location,
            depth,
            item,
        });
        if descend(item) {
            for (index, sub) in item.sub_items.iter().enumerate().rev() {
                let location = Location {
                    parent: Parent::Item(item.id),
                    index,
                };
                stack.push((location, depth + 1, sub));
            }
        }
    }
    out
}

/// Fan-out and depth policy for a single item at `depth`.
pub fn item_can_take_child(depth: usize, item: &Item) -> bool {
    check_item_capacity(depth, item).is_ok()
}

/// `depth < MAX_DEPTH && children < MAX_CHILDREN`, reported as the violated limit.
fn check_item_capacity(depth: usize, item: &Item) -> Result<(), TreeError> {
    if depth >= MAX_DEPTH {
        return Err(TreeError::DepthLimit(item.id));
    }
    if item.sub_items.len() >= MAX_CHILDREN {
        return Err(TreeError::ChildLimit(item.id));
    }
    Ok(())
}

fn find_in_mut(items: &mut [Item], id: Uuid) -> Option<&mut Item> {
    for item in items.iter_mut() {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_in_mut(&mut item.sub_items, id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    /// List 100 with items [1, 2]; 1 has child 11 which has child 111.
    fn board() -> Board {
        let mut board = Board::new();
        board.insert_list(TodoList::new(id(100), "Groceries"));
        board.insert_item(Parent::List(id(100)), Item::new(id(1), "A")).unwrap();
        board.insert_item(Parent::List(id(100)), Item::new(id(2), "B")).unwrap();
        board.insert_item(Parent::Item(id(1)), Item::new(id(11), "A.1")).unwrap();
        board.insert_item(Parent::Item(id(11)), Item::new(id(111), "A.1.1")).unwrap();
        board
    }

    fn order(board: &Board, parent: Parent) -> Vec<Uuid> {
        let items = match parent {
            Parent::List(l) => &board.list(l).unwrap().items,
            Parent::Item(i) => &board.find_item(i).unwrap().sub_items,
        };
        items.iter().map(|item| item.id).collect()
    }

    #[test]
    fn walk_is_pre_order_with_depths() {
        let board = board();
        let seen: Vec<(Uuid, usize)> = board.walk().iter().map(|v| (v.item.id, v.depth)).collect();
        assert_eq!(
            seen,
            vec![(id(1), 1), (id(11), 2), (id(111), 3), (id(2), 1)]
        );
    }

    #[test]
    fn locate_reports_parent_and_index() {
        let board = board();
        assert_eq!(
            board.locate(id(2)),
            Some(Location {
                parent: Parent::List(id(100)),
                index: 1
            })
        );
        assert_eq!(board.depth_of(id(111)), Some(3));
        assert_eq!(board.locate(id(999)), None);
    }

    #[test]
    fn item_at_max_depth_cannot_take_children() {
        let board = board();
        assert!(!board.can_add_child(Parent::Item(id(111))));
        assert_eq!(
            board.check_can_add_child(Parent::Item(id(111))),
            Err(TreeError::DepthLimit(id(111)))
        );
    }

    #[test]
    fn item_with_three_children_cannot_take_more() {
        let mut board = board();
        board.insert_item(Parent::Item(id(2)), Item::new(id(21), "x")).unwrap();
        board.insert_item(Parent::Item(id(2)), Item::new(id(22), "y")).unwrap();
        assert!(board.can_add_child(Parent::Item(id(2))));
        board.insert_item(Parent::Item(id(2)), Item::new(id(23), "z")).unwrap();
        assert!(!board.can_add_child(Parent::Item(id(2))));
        let err = board
            .insert_item(Parent::Item(id(2)), Item::new(id(24), "w"))
            .unwrap_err();
        assert_eq!(err, TreeError::ChildLimit(id(2)));
        assert_eq!(board.find_item(id(2)).unwrap().sub_items.len(), 3);
    }

    #[test]
    fn lists_accept_any_number_of_items() {
        let mut board = board();
        for n in 0..10 {
            board
                .insert_item(Parent::List(id(100)), Item::new(id(500 + n), "more"))
                .unwrap();
        }
        assert!(board.can_add_child(Parent::List(id(100))));
        assert!(!board.can_add_child(Parent::List(id(404))));
    }

    #[test]
    fn move_first_to_index_one_swaps_order() {
        let mut board = board();
        let loc = board.move_item(id(1), Parent::List(id(100)), 1).unwrap();
        assert_eq!(loc.index, 1);
        assert_eq!(order(&board, Parent::List(id(100))), vec![id(2), id(1)]);
        // Subtree travels with the item.
        assert_eq!(board.depth_of(id(111)), Some(3));
    }

    #[test]
    fn move_clamps_out_of_range_index() {
        let mut board = board();
        board.move_item(id(2), Parent::List(id(100)), 0).unwrap();
        let loc = board.move_item(id(2), Parent::List(id(100)), 42).unwrap();
        assert_eq!(loc.index, 1);
        assert_eq!(order(&board, Parent::List(id(100))), vec![id(1), id(2)]);
    }

    #[test]
    fn move_across_lists_reparents() {
        let mut board = board();
        board.insert_list(TodoList::new(id(200), "Hardware"));
        board.move_item(id(1), Parent::List(id(200)), 0).unwrap();
        assert_eq!(order(&board, Parent::List(id(100))), vec![id(2)]);
        assert_eq!(order(&board, Parent::List(id(200))), vec![id(1)]);
        assert_eq!(board.visit(id(111)).unwrap().list_id, id(200));
    }

    #[test]
    fn move_into_own_descendant_is_a_cycle() {
        let mut board = board();
        let before = board.clone();
        assert_eq!(
            board.move_item(id(1), Parent::Item(id(111)), 0),
            Err(TreeError::Cycle(id(1)))
        );
        assert_eq!(board.move_item(id(1), Parent::Item(id(1)), 0), Err(TreeError::Cycle(id(1))));
        assert_eq!(board, before);
    }

    #[test]
    fn move_that_would_overflow_depth_is_rejected() {
        let mut board = board();
        let before = board.clone();
        // 1 has height 3; under 2 it would reach depth 4.
        assert_eq!(
            board.move_item(id(1), Parent::Item(id(2)), 0),
            Err(TreeError::DepthLimit(id(2)))
        );
        assert_eq!(board, before);
        // A leaf fits under 11 (depth 2).
        board.move_item(id(2), Parent::Item(id(11)), 0).unwrap();
        assert_eq!(board.depth_of(id(2)), Some(3));
    }

    #[test]
    fn move_into_full_item_is_rejected_but_reorder_inside_it_is_not() {
        let mut board = board();
        for n in 0..3 {
            board
                .insert_item(Parent::Item(id(2)), Item::new(id(20 + n), "c"))
                .unwrap();
        }
        board.insert_item(Parent::List(id(100)), Item::new(id(3), "C")).unwrap();
        assert_eq!(
            board.move_item(id(3), Parent::Item(id(2)), 0),
            Err(TreeError::ChildLimit(id(2)))
        );
        board.move_item(id(22), Parent::Item(id(2)), 0).unwrap();
        assert_eq!(order(&board, Parent::Item(id(2))), vec![id(22), id(20), id(21)]);
    }

    #[test]
    fn remove_and_restore_roundtrip_position() {
        let mut board = board();
        let before = board.clone();
        let (location, item) = board.remove_item(id(1)).unwrap();
        assert!(board.find_item(id(111)).is_none());
        board.restore_item(location, item).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn update_content_keeps_identity() {
        let mut board = board();
        board.update_content(id(11), "renamed").unwrap();
        let visit = board.visit(id(11)).unwrap();
        assert_eq!(visit.item.content, "renamed");
        assert_eq!(visit.location.index, 0);
        assert_eq!(
            board.update_content(id(999), "x"),
            Err(TreeError::ItemNotFound(id(999)))
        );
    }

    #[test]
    fn walk_list_skips_undescended_subtrees() {
        let board = board();
        let list = board.list(id(100)).unwrap();
        let seen: Vec<Uuid> = walk_list(list, |item| item.id != id(1))
            .iter()
            .map(|v| v.item.id)
            .collect();
        assert_eq!(seen, vec![id(1), id(2)]);
    }
}
