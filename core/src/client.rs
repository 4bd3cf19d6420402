//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` (including the `/api` prefix) and
//! carries no mutable state between calls. Each remote action is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the round-trip.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CreateItem, CreateList, Item, ItemHeader, ListHeader, Lists, MoveItem, TodoList, UpdateItem,
    UpdateList,
};

/// Synchronous, stateless client for the hierarchical todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- lists ---

    pub fn build_list_lists(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/lists")
    }

    pub fn build_create_list(&self, input: &CreateList) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/lists", input)
    }

    pub fn build_update_list(&self, id: Uuid, input: &UpdateList) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/lists/{id}"), input)
    }

    pub fn build_delete_list(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/lists/{id}"))
    }

    pub fn parse_list_lists(&self, response: HttpResponse) -> Result<Lists, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_create_list(&self, response: HttpResponse) -> Result<TodoList, ApiError> {
        check_status(&response, &[201])?;
        decode(&response)
    }

    pub fn parse_update_list(&self, response: HttpResponse) -> Result<ListHeader, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_delete_list(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[204, 200])
    }

    // --- items ---

    pub fn build_create_item(&self, input: &CreateItem) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/items", input)
    }

    pub fn build_update_item(&self, id: Uuid, input: &UpdateItem) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/items/{id}"), input)
    }

    pub fn build_delete_item(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/items/{id}"))
    }

    pub fn build_move_item(&self, input: &MoveItem) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/items/move", input)
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        check_status(&response, &[201])?;
        decode(&response)
    }

    pub fn parse_update_item(&self, response: HttpResponse) -> Result<ItemHeader, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[204, 200])
    }

    /// Servers answer a move with either the moved item or a bare
    /// confirmation such as `{"message": "..."}`. The latter yields `None`.
    pub fn parse_move_item(&self, response: HttpResponse) -> Result<Option<Item>, ApiError> {
        check_status(&response, &[200])?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        let value: serde_json::Value = decode(&response)?;
        if value.get("id").is_none() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        409 => Err(ApiError::Conflict(response.body.clone())),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
