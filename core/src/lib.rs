//! Client core for the hierarchical todo lists service.
//!
//! # Overview
//! Lists hold items, items hold sub-items, down to a fixed depth. This crate
//! owns the in-memory tree, the rules for changing it, the UI state a
//! front-end needs around it, and the request/response codec for the remote
//! store. It never touches the network: a host supplies a [`Transport`].
//!
//! # Design
//! - `TodoClient` is stateless; each remote action is a `build_*` /
//!   `parse_*` pair so the I/O boundary is explicit.
//! - `Board` is a tagged tree with depth-aware traversal; reordering and
//!   reparenting go through a single `move_item`.
//! - `ViewState` keeps collapse flags and in-progress text apart from the
//!   domain tree.
//! - `App` is the application root; it applies server-confirmed deltas or
//!   reloads, depending on its `SyncPolicy`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod client;
pub mod drag;
pub mod error;
pub mod http;
pub mod tree;
pub mod types;
pub mod view;

pub use app::{App, SyncPolicy};
pub use client::TodoClient;
pub use drag::{plan_move, DragLocation, DragResult};
pub use error::{ApiError, AppError, TransportError, TreeError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use tree::{Board, Location, Parent, MAX_CHILDREN, MAX_DEPTH};
pub use types::{
    CreateItem, CreateList, Item, ItemHeader, ListHeader, Lists, MoveItem, ParentType, TodoList,
    UpdateItem, UpdateList,
};
pub use view::{Controls, DraftTarget, EditTarget, Notice, Row, ViewState};
