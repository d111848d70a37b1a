//! REST bindings for the frontend
//!
//! Thin fetch wrappers over the gallery API. Every request carries the
//! session cookie; a 401 sends the browser to the login page.

use pixelshelf_core::config::ClientConfig;
use pixelshelf_core::error::ApiError;
use pixelshelf_core::filters::encode_pairs;
use pixelshelf_core::models::{
    BatchDelete, BatchUpdate, ImageSummary, MessageResponse, PaginationEnvelope, Preset, PresetCreate, PresetUpdate,
    SmartFolder, SmartFolderCreate, SmartFolderUpdate,
};
use pixelshelf_core::params::SearchParams;
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, RequestMode, Response};

// ============ HTTP Fetch Helpers ============

fn js_error(value: JsValue) -> ApiError {
    ApiError::Network(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

fn redirect_to_login(config: &ClientConfig) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(&config.login_path);
    }
}

async fn send(config: &ClientConfig, method: &str, path: &str, body: Option<String>) -> Result<Response, ApiError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::SameOrigin);
    opts.set_credentials(RequestCredentials::Include);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let url = config.endpoint(path);
    tracing::debug!(method, url = %url, "fetch");
    let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;
    }

    let window = web_sys::window().ok_or_else(|| ApiError::Network("No window".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| {
            tracing::error!(url = %url, "fetch failed: {:?}", e);
            js_error(e)
        })?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;

    if !resp.ok() {
        let err = ApiError::from_status(resp.status());
        if err == ApiError::Unauthorized {
            redirect_to_login(config);
        }
        tracing::warn!(url = %url, status = resp.status(), "request rejected");
        return Err(err);
    }
    Ok(resp)
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let json = JsFuture::from(resp.json().map_err(js_error)?)
        .await
        .map_err(|e| ApiError::Decode(format!("{:?}", e)))?;
    serde_wasm_bindgen::from_value(json).map_err(|e| {
        tracing::error!("deserialization failed: {}", e);
        ApiError::Decode(e.to_string())
    })
}

fn to_body<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn http_get<T: DeserializeOwned>(config: &ClientConfig, path: &str) -> Result<T, ApiError> {
    read_json(send(config, "GET", path, None).await?).await
}

async fn http_post<T: DeserializeOwned, B: Serialize>(config: &ClientConfig, path: &str, body: &B) -> Result<T, ApiError> {
    read_json(send(config, "POST", path, Some(to_body(body)?)).await?).await
}

async fn http_put<T: DeserializeOwned, B: Serialize>(config: &ClientConfig, path: &str, body: &B) -> Result<T, ApiError> {
    read_json(send(config, "PUT", path, Some(to_body(body)?)).await?).await
}

async fn http_delete(config: &ClientConfig, path: &str) -> Result<(), ApiError> {
    send(config, "DELETE", path, None).await.map(|_| ())
}

// ============ Images ============

/// One page of the gallery listing for `params`
pub async fn list_images(config: &ClientConfig, params: &SearchParams) -> Result<PaginationEnvelope<ImageSummary>, ApiError> {
    let path = format!("/images?{}", encode_pairs(&params.to_api_pairs()));
    http_get(config, &path).await
}

// ============ Bulk Actions ============

pub async fn bulk_update(config: &ClientConfig, update: &BatchUpdate) -> Result<MessageResponse, ApiError> {
    http_post(config, "/bulk/update", update).await
}

/// Moves images to the trash unless `permanent` is set
pub async fn bulk_delete(config: &ClientConfig, delete: &BatchDelete) -> Result<MessageResponse, ApiError> {
    http_post(config, "/bulk/delete", delete).await
}

// ============ Search Presets ============

pub async fn list_presets(config: &ClientConfig) -> Result<Vec<Preset>, ApiError> {
    http_get(config, "/search-presets").await
}

pub async fn create_preset(config: &ClientConfig, preset: &PresetCreate) -> Result<Preset, ApiError> {
    http_post(config, "/search-presets", preset).await
}

pub async fn update_preset(config: &ClientConfig, id: Uuid, update: &PresetUpdate) -> Result<Preset, ApiError> {
    http_put(config, &format!("/search-presets/{}", id), update).await
}

pub async fn delete_preset(config: &ClientConfig, id: Uuid) -> Result<(), ApiError> {
    http_delete(config, &format!("/search-presets/{}", id)).await
}

// ============ Smart Folders ============

pub async fn list_smart_folders(config: &ClientConfig) -> Result<Vec<SmartFolder>, ApiError> {
    http_get(config, "/smart-folders").await
}

pub async fn create_smart_folder(config: &ClientConfig, folder: &SmartFolderCreate) -> Result<SmartFolder, ApiError> {
    http_post(config, "/smart-folders", folder).await
}

pub async fn update_smart_folder(
    config: &ClientConfig,
    id: Uuid,
    update: &SmartFolderUpdate,
) -> Result<SmartFolder, ApiError> {
    http_put(config, &format!("/smart-folders/{}", id), update).await
}

pub async fn delete_smart_folder(config: &ClientConfig, id: Uuid) -> Result<(), ApiError> {
    http_delete(config, &format!("/smart-folders/{}", id)).await
}

// ============ Tags ============

/// Tags matching `query`, or the most recently used ones when it is empty
pub async fn suggest_tags(config: &ClientConfig, query: &str, limit: Option<u32>) -> Result<Vec<String>, ApiError> {
    let mut pairs = vec![("limit", config.suggestion_limit(limit).to_string())];
    let query = query.trim();
    if !query.is_empty() {
        pairs.insert(0, ("q", query.to_string()));
    }
    http_get(config, &format!("/tags?{}", encode_pairs(&pairs))).await
}
