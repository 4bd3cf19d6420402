//! Application root: the single owner of the lists collection.
//!
//! # Design
//! `App` drives every user action through the same three steps: validate
//! against the local [`Board`], perform the round trip through the host's
//! [`Transport`], then fold the server-confirmed result back into the board.
//! With [`SyncPolicy::Reconcile`] the result is applied as a delta keyed by
//! id. [`SyncPolicy::Reload`] instead refetches the whole collection after
//! item creation, item deletion and moves.
//!
//! Depth, fan-out and cycle violations are refused before any request. An
//! id the local board does not know is left for the server to judge; if the
//! confirmed change then cannot be applied locally, the app reloads.
//!
//! Deletions are applied optimistically and restored if the server refuses
//! them. Every failure is returned to the caller and recorded as a
//! [`Notice`] for display.

use uuid::Uuid;

use crate::client::TodoClient;
use crate::drag::{plan_move, DragResult};
use crate::error::{ApiError, AppError, TreeError};
use crate::http::Transport;
use crate::tree::{Board, Parent};
use crate::types::{CreateItem, CreateList, Lists, MoveItem, TodoList, UpdateItem, UpdateList};
use crate::view::{rows, DraftTarget, EditTarget, Notice, Row, ViewState};

/// How local state catches up after a confirmed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPolicy {
    /// Apply the confirmed change to the in-memory tree.
    #[default]
    Reconcile,
    /// Refetch the full collection.
    Reload,
}

pub struct App<T> {
    client: TodoClient,
    transport: T,
    board: Board,
    view: ViewState,
    policy: SyncPolicy,
}

impl<T: Transport> App<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            client,
            transport,
            board: Board::new(),
            view: ViewState::new(),
            policy: SyncPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    pub fn rows(&self) -> Vec<Row<'_>> {
        rows(&self.board, &self.view)
    }

    /// Replace local state with the server's collection, unconditionally.
    pub fn load(&mut self) -> Result<(), AppError> {
        let result = self.reload();
        self.report("load lists", result)
    }

    // --- lists ---

    /// Create a list. A blank title issues no request and returns `Ok(None)`.
    pub fn create_list(&mut self, title: &str) -> Result<Option<Uuid>, AppError> {
        if title.trim().is_empty() {
            return Ok(None);
        }
        tracing::debug!(title, "creating list");
        let result = self.try_create_list(title);
        self.report("create list", result).map(Some)
    }

    /// Create a list from the pending "new list" input and clear it on success.
    pub fn submit_new_list(&mut self) -> Result<Option<Uuid>, AppError> {
        let title = self.view.draft(DraftTarget::NewList).to_string();
        let created = self.create_list(&title)?;
        if created.is_some() {
            self.view.clear_draft(DraftTarget::NewList);
        }
        Ok(created)
    }

    pub fn delete_list(&mut self, id: Uuid) -> Result<(), AppError> {
        tracing::debug!(list = %id, "deleting list");
        let result = self.try_delete_list(id);
        self.report("delete list", result)
    }

    /// Open the title editor seeded with the stored title.
    pub fn edit_list_title(&mut self, id: Uuid) -> Result<(), AppError> {
        let title = self.board.list(id).ok_or(TreeError::ListNotFound(id))?.title.clone();
        self.view.begin_edit(EditTarget::ListTitle(id), &title);
        Ok(())
    }

    /// Blur of the title editor. Returns whether an update was sent.
    pub fn commit_list_title(&mut self, id: Uuid) -> Result<bool, AppError> {
        let result = self.try_commit_list_title(id);
        self.report("rename list", result)
    }

    // --- items ---

    /// Create an item under the list from its pending input.
    pub fn add_item(&mut self, list_id: Uuid) -> Result<Option<Uuid>, AppError> {
        self.submit_item(Parent::List(list_id), DraftTarget::NewItem(list_id))
    }

    /// Create a sub-item under the item from its pending input.
    pub fn add_sub_item(&mut self, item_id: Uuid) -> Result<Option<Uuid>, AppError> {
        self.submit_item(Parent::Item(item_id), DraftTarget::NewSubItem(item_id))
    }

    pub fn edit_item_content(&mut self, id: Uuid) -> Result<(), AppError> {
        let content = self
            .board
            .find_item(id)
            .ok_or(TreeError::ItemNotFound(id))?
            .content
            .clone();
        self.view.begin_edit(EditTarget::ItemContent(id), &content);
        Ok(())
    }

    /// Blur of the content editor. Returns whether an update was sent.
    pub fn commit_item_content(&mut self, id: Uuid) -> Result<bool, AppError> {
        let result = self.try_commit_item_content(id);
        self.report("edit item", result)
    }

    pub fn delete_item(&mut self, id: Uuid) -> Result<(), AppError> {
        tracing::debug!(item = %id, "deleting item");
        let result = self.try_delete_item(id);
        self.report("delete item", result)
    }

    pub fn toggle_collapsed(&mut self, id: Uuid) -> bool {
        self.view.toggle_collapsed(id)
    }

    /// Interpret a finished drag. Returns whether a move was sent.
    pub fn on_drag_end(&mut self, drag: DragResult) -> Result<bool, AppError> {
        let Some(planned) = plan_move(&drag) else {
            tracing::debug!(item = %drag.draggable_id, "drag ended without a move");
            return Ok(false);
        };
        let result = self.try_move(planned);
        self.report("move item", result).map(|()| true)
    }

    // --- internals ---

    fn try_create_list(&mut self, title: &str) -> Result<Uuid, AppError> {
        let request = self.client.build_create_list(&CreateList {
            title: title.to_string(),
        })?;
        let list = self.client.parse_create_list(self.transport.execute(request)?)?;
        let id = list.id;
        self.board.insert_list(TodoList {
            items: Vec::new(),
            ..list
        });
        tracing::info!(list = %id, "list created");
        Ok(id)
    }

    fn try_delete_list(&mut self, id: Uuid) -> Result<(), AppError> {
        let removed = self.board.remove_list(id).ok_or(TreeError::ListNotFound(id))?;
        let request = self.client.build_delete_list(id);
        let outcome = self
            .transport
            .execute(request)
            .map_err(AppError::from)
            .and_then(|response| Ok(self.client.parse_delete_list(response)?));
        match outcome {
            Ok(()) | Err(AppError::Api(ApiError::NotFound)) => {
                self.view.prune(&self.board);
                tracing::info!(list = %id, "list deleted");
                Ok(())
            }
            Err(err) => {
                self.board.insert_list(removed);
                Err(err)
            }
        }
    }

    fn try_commit_list_title(&mut self, id: Uuid) -> Result<bool, AppError> {
        let target = EditTarget::ListTitle(id);
        let stored = self.board.list(id).ok_or(TreeError::ListNotFound(id))?.title.clone();
        let Some(title) = self.view.blur(target, &stored) else {
            return Ok(false);
        };
        let sent = self
            .client
            .build_update_list(id, &UpdateList {
                title: title.clone(),
            })
            .map_err(AppError::from)
            .and_then(|request| Ok(self.transport.execute(request)?))
            .and_then(|response| Ok(self.client.parse_update_list(response)?));
        match sent {
            Ok(header) => {
                self.board.rename_list(header.id, &header.title)?;
                tracing::info!(list = %id, "list renamed");
                Ok(true)
            }
            Err(err) => {
                self.view.restore_edit(target, title);
                Err(err)
            }
        }
    }

    fn submit_item(
        &mut self,
        parent: Parent,
        draft: DraftTarget,
    ) -> Result<Option<Uuid>, AppError> {
        let content = self.view.draft(draft).to_string();
        if content.trim().is_empty() {
            return Ok(None);
        }
        tracing::debug!(
            parent = %parent.id(),
            parent_type = %parent.parent_type(),
            "creating item"
        );
        let result = self.try_create_item(parent, content, draft);
        self.report("add item", result).map(Some)
    }

    fn try_create_item(
        &mut self,
        parent: Parent,
        content: String,
        draft: DraftTarget,
    ) -> Result<Uuid, AppError> {
        match self.board.check_can_add_child(parent) {
            Err(err) if err.is_limit() => return Err(err.into()),
            Err(err) => tracing::debug!(error = %err, "parent not in local tree"),
            Ok(()) => {}
        }
        let request = self.client.build_create_item(&CreateItem {
            parent_type: parent.parent_type(),
            parent_id: parent.id(),
            content,
        })?;
        let item = self.client.parse_create_item(self.transport.execute(request)?)?;
        let id = item.id;
        self.view.clear_draft(draft);
        match self.policy {
            SyncPolicy::Reload => self.reload()?,
            SyncPolicy::Reconcile => {
                if let Err(err) = self.board.insert_item(parent, item) {
                    tracing::warn!(
                        item = %id,
                        error = %err,
                        "created item does not fit local tree, reloading"
                    );
                    self.reload()?;
                }
            }
        }
        tracing::info!(item = %id, "item created");
        Ok(id)
    }

    fn try_commit_item_content(&mut self, id: Uuid) -> Result<bool, AppError> {
        let target = EditTarget::ItemContent(id);
        let stored = self
            .board
            .find_item(id)
            .ok_or(TreeError::ItemNotFound(id))?
            .content
            .clone();
        let Some(content) = self.view.blur(target, &stored) else {
            return Ok(false);
        };
        let sent = self
            .client
            .build_update_item(id, &UpdateItem {
                content: content.clone(),
            })
            .map_err(AppError::from)
            .and_then(|request| Ok(self.transport.execute(request)?))
            .and_then(|response| Ok(self.client.parse_update_item(response)?));
        match sent {
            Ok(header) => {
                self.board.update_content(header.id, &header.content)?;
                tracing::info!(item = %id, "item content updated");
                Ok(true)
            }
            Err(err) => {
                self.view.restore_edit(target, content);
                Err(err)
            }
        }
    }

    fn try_delete_item(&mut self, id: Uuid) -> Result<(), AppError> {
        let (location, removed) = self.board.remove_item(id)?;
        let request = self.client.build_delete_item(id);
        let outcome = self
            .transport
            .execute(request)
            .map_err(AppError::from)
            .and_then(|response| Ok(self.client.parse_delete_item(response)?));
        match outcome {
            Ok(()) | Err(AppError::Api(ApiError::NotFound)) => {
                tracing::info!(item = %id, "item deleted");
                if self.policy == SyncPolicy::Reload {
                    self.reload()?;
                } else {
                    self.view.prune(&self.board);
                }
                Ok(())
            }
            Err(err) => {
                self.board.restore_item(location, removed)?;
                Err(err)
            }
        }
    }

    fn try_move(&mut self, planned: MoveItem) -> Result<(), AppError> {
        let target = Parent::from_wire(planned.target_parent_type, planned.target_parent_id);
        let mut preview = self.board.clone();
        let preview = match preview.move_item(planned.item_id, target, planned.target_index) {
            Ok(_) => Some(preview),
            Err(err) if err.is_limit() => return Err(err.into()),
            Err(err) => {
                tracing::debug!(
                    item = %planned.item_id,
                    error = %err,
                    "move not checkable locally"
                );
                None
            }
        };

        tracing::debug!(
            item = %planned.item_id,
            target = %planned.target_parent_id,
            index = planned.target_index,
            "moving item"
        );
        let request = self.client.build_move_item(&planned)?;
        self.client.parse_move_item(self.transport.execute(request)?)?;

        match (self.policy, preview) {
            (SyncPolicy::Reconcile, Some(preview)) => self.board = preview,
            (SyncPolicy::Reconcile, None) => {
                tracing::warn!(item = %planned.item_id, "moved item not in local tree, reloading");
                self.reload()?;
            }
            (SyncPolicy::Reload, _) => self.reload()?,
        }
        tracing::info!(item = %planned.item_id, "item moved");
        Ok(())
    }

    fn reload(&mut self) -> Result<(), AppError> {
        let lists = self.fetch_lists()?;
        tracing::debug!(lists = lists.len(), "collection reloaded");
        self.board.replace(lists);
        self.view.prune(&self.board);
        Ok(())
    }

    fn fetch_lists(&self) -> Result<Lists, AppError> {
        let response = self.transport.execute(self.client.build_list_lists())?;
        Ok(self.client.parse_list_lists(response)?)
    }

    fn report<R>(&mut self, action: &str, result: Result<R, AppError>) -> Result<R, AppError> {
        match &result {
            Ok(_) => self.view.clear_notice(),
            Err(err) => {
                tracing::warn!(action, error = %err, "operation failed");
                self.view.set_notice(Notice::Error(format!("{action} failed: {err}")));
            }
        }
        result
    }
}
