use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Deepest item level the store accepts (items directly under a list are 1).
pub const MAX_DEPTH: usize = 3;
/// Maximum number of sub-items per item.
pub const MAX_CHILDREN: usize = 3;

// --- wire types ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub content: String,
    pub sub_items: Vec<Item>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct List {
    pub id: Uuid,
    pub title: String,
    pub items: Vec<Item>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListHeader {
    pub id: Uuid,
    pub title: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemHeader {
    pub id: Uuid,
    pub content: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParentType {
    List,
    Item,
}

#[derive(Deserialize)]
pub struct CreateList {
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateList {
    pub title: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    pub parent_type: ParentType,
    pub parent_id: Uuid,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
pub struct UpdateItem {
    pub content: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveItem {
    pub item_id: Uuid,
    pub target_parent_type: ParentType,
    pub target_parent_id: Uuid,
    pub target_index: Option<usize>,
}

// --- store ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParentRef {
    List(Uuid),
    Item(Uuid),
}

#[derive(Debug)]
struct ListRecord {
    title: String,
    items: Vec<Uuid>,
}

#[derive(Debug)]
struct ItemRecord {
    content: String,
    parent: ParentRef,
    children: Vec<Uuid>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StoreError {
    NotFound(&'static str),
    Conflict(&'static str),
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            StoreError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            StoreError::Conflict(why) => (StatusCode::CONFLICT, why.to_string()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Lists and items kept flat, with ordered child id vectors.
#[derive(Debug, Default)]
pub struct Store {
    lists: HashMap<Uuid, ListRecord>,
    items: HashMap<Uuid, ItemRecord>,
}

impl Store {
    pub fn snapshot(&self) -> BTreeMap<Uuid, List> {
        self.lists
            .iter()
            .map(|(id, record)| {
                let list = List {
                    id: *id,
                    title: record.title.clone(),
                    items: record.items.iter().map(|child| self.build_item(*child)).collect(),
                };
                (*id, list)
            })
            .collect()
    }

    pub fn create_list(&mut self, title: String) -> List {
        let id = Uuid::new_v4();
        self.lists.insert(
            id,
            ListRecord {
                title: title.clone(),
                items: Vec::new(),
            },
        );
        List {
            id,
            title,
            items: Vec::new(),
        }
    }

    pub fn rename_list(
        &mut self,
        id: Uuid,
        title: Option<String>,
    ) -> Result<ListHeader, StoreError> {
        let list = self.lists.get_mut(&id).ok_or(StoreError::NotFound("list"))?;
        if let Some(title) = title {
            list.title = title;
        }
        Ok(ListHeader {
            id,
            title: list.title.clone(),
        })
    }

    pub fn delete_list(&mut self, id: Uuid) -> Result<(), StoreError> {
        let list = self.lists.remove(&id).ok_or(StoreError::NotFound("list"))?;
        for child in list.items {
            self.drop_subtree(child);
        }
        Ok(())
    }

    pub fn create_item(&mut self, input: CreateItem) -> Result<Item, StoreError> {
        let parent = match input.parent_type {
            ParentType::List => {
                if !self.lists.contains_key(&input.parent_id) {
                    return Err(StoreError::NotFound("list"));
                }
                ParentRef::List(input.parent_id)
            }
            ParentType::Item => {
                let parent = self
                    .items
                    .get(&input.parent_id)
                    .ok_or(StoreError::NotFound("item"))?;
                if self.depth(input.parent_id) >= MAX_DEPTH {
                    return Err(StoreError::Conflict("maximum nesting depth reached"));
                }
                if parent.children.len() >= MAX_CHILDREN {
                    return Err(StoreError::Conflict("maximum number of sub-items reached"));
                }
                ParentRef::Item(input.parent_id)
            }
        };

        let id = Uuid::new_v4();
        self.items.insert(
            id,
            ItemRecord {
                content: input.content.clone(),
                parent,
                children: Vec::new(),
            },
        );
        self.children_mut(parent).push(id);
        Ok(Item {
            id,
            content: input.content,
            sub_items: Vec::new(),
        })
    }

    pub fn update_item(
        &mut self,
        id: Uuid,
        content: Option<String>,
    ) -> Result<ItemHeader, StoreError> {
        let item = self.items.get_mut(&id).ok_or(StoreError::NotFound("item"))?;
        if let Some(content) = content {
            item.content = content;
        }
        Ok(ItemHeader {
            id,
            content: item.content.clone(),
        })
    }

    pub fn delete_item(&mut self, id: Uuid) -> Result<(), StoreError> {
        let parent = self.items.get(&id).ok_or(StoreError::NotFound("item"))?.parent;
        self.children_mut(parent).retain(|child| *child != id);
        self.drop_subtree(id);
        Ok(())
    }

    /// Reparent and reorder. `target_index` is the final position after the
    /// item has left its old parent; missing or out-of-range appends.
    pub fn move_item(&mut self, input: MoveItem) -> Result<Item, StoreError> {
        let id = input.item_id;
        let source = self.items.get(&id).ok_or(StoreError::NotFound("item"))?.parent;
        let target = match input.target_parent_type {
            ParentType::List => {
                if !self.lists.contains_key(&input.target_parent_id) {
                    return Err(StoreError::NotFound("target list"));
                }
                ParentRef::List(input.target_parent_id)
            }
            ParentType::Item => {
                let target_id = input.target_parent_id;
                let target = self
                    .items
                    .get(&target_id)
                    .ok_or(StoreError::NotFound("target item"))?;
                if target_id == id || self.is_ancestor(id, target_id) {
                    return Err(StoreError::Conflict("cannot move an item into itself"));
                }
                if self.depth(target_id) + self.height(id) > MAX_DEPTH {
                    return Err(StoreError::Conflict("maximum nesting depth reached"));
                }
                if source != ParentRef::Item(target_id) && target.children.len() >= MAX_CHILDREN {
                    return Err(StoreError::Conflict("maximum number of sub-items reached"));
                }
                ParentRef::Item(target_id)
            }
        };

        self.children_mut(source).retain(|child| *child != id);
        let siblings = self.children_mut(target);
        let index = input.target_index.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(index, id);
        if let Some(item) = self.items.get_mut(&id) {
            item.parent = target;
        }
        Ok(self.build_item(id))
    }

    fn build_item(&self, id: Uuid) -> Item {
        match self.items.get(&id) {
            Some(record) => Item {
                id,
                content: record.content.clone(),
                sub_items: record.children.iter().map(|child| self.build_item(*child)).collect(),
            },
            None => Item {
                id,
                content: String::new(),
                sub_items: Vec::new(),
            },
        }
    }

    /// 1 for items directly under a list.
    fn depth(&self, id: Uuid) -> usize {
        let mut depth = 1;
        let mut current = self.items.get(&id).map(|item| item.parent);
        while let Some(ParentRef::Item(parent)) = current {
            depth += 1;
            current = self.items.get(&parent).map(|item| item.parent);
        }
        depth
    }

    fn height(&self, id: Uuid) -> usize {
        self.items
            .get(&id)
            .map(|item| 1 + item.children.iter().map(|c| self.height(*c)).max().unwrap_or(0))
            .unwrap_or(0)
    }

    fn is_ancestor(&self, ancestor: Uuid, id: Uuid) -> bool {
        let mut current = self.items.get(&id).map(|item| item.parent);
        while let Some(ParentRef::Item(parent)) = current {
            if parent == ancestor {
                return true;
            }
            current = self.items.get(&parent).map(|item| item.parent);
        }
        false
    }

    fn children_mut(&mut self, parent: ParentRef) -> &mut Vec<Uuid> {
        match parent {
            ParentRef::List(id) => &mut self.lists.entry(id).or_insert_with(orphan_list).items,
            ParentRef::Item(id) => &mut self.items.entry(id).or_insert_with(orphan_item).children,
        }
    }

    fn drop_subtree(&mut self, id: Uuid) {
        if let Some(item) = self.items.remove(&id) {
            for child in item.children {
                self.drop_subtree(child);
            }
        }
    }
}

// Parents are validated before `children_mut` is reached; these only keep
// the lookup total.
fn orphan_list() -> ListRecord {
    ListRecord {
        title: String::new(),
        items: Vec::new(),
    }
}

fn orphan_item() -> ItemRecord {
    ItemRecord {
        content: String::new(),
        parent: ParentRef::List(Uuid::nil()),
        children: Vec::new(),
    }
}

// --- http ---

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", get(index))
        .route("/api/lists", get(list_lists).post(create_list))
        .route("/api/lists/{id}", put(update_list).delete(delete_list))
        .route("/api/items", post(create_item))
        .route("/api/items/move", post(move_item))
        .route("/api/items/{id}", put(update_item).delete(delete_item))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "hierarchical todo store" }))
}

async fn list_lists(State(db): State<Db>) -> Json<BTreeMap<Uuid, List>> {
    Json(db.read().await.snapshot())
}

async fn create_list(
    State(db): State<Db>,
    Json(input): Json<CreateList>,
) -> (StatusCode, Json<List>) {
    let title = input.title.unwrap_or_else(|| "Untitled List".to_string());
    let list = db.write().await.create_list(title);
    tracing::info!(list = %list.id, "list created");
    (StatusCode::CREATED, Json(list))
}

async fn update_list(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateList>,
) -> Result<Json<ListHeader>, StoreError> {
    let header = db.write().await.rename_list(id, input.title)?;
    tracing::info!(list = %id, "list renamed");
    Ok(Json(header))
}

async fn delete_list(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, StoreError> {
    db.write().await.delete_list(id)?;
    tracing::info!(list = %id, "list deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn create_item(
    State(db): State<Db>,
    Json(input): Json<CreateItem>,
) -> Result<(StatusCode, Json<Item>), StoreError> {
    let item = db.write().await.create_item(input)?;
    tracing::info!(item = %item.id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateItem>,
) -> Result<Json<ItemHeader>, StoreError> {
    let header = db.write().await.update_item(id, input.content)?;
    tracing::info!(item = %id, "item updated");
    Ok(Json(header))
}

async fn delete_item(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, StoreError> {
    db.write().await.delete_item(id)?;
    tracing::info!(item = %id, "item deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn move_item(
    State(db): State<Db>,
    Json(input): Json<MoveItem>,
) -> Result<Json<Item>, StoreError> {
    let id = input.item_id;
    let item = db.write().await.move_item(input)?;
    tracing::info!(item = %id, "item moved");
    Ok(Json(item))
}
