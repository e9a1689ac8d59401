//! Route handlers for the card API.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::response::{ApiError, Envelope};
use super::AppState;
use crate::card::{Card, CardPatch, NewCard};

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListParams {
    user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Health {
    status: &'static str,
}

pub(crate) async fn health() -> Json<Envelope<Health>> {
    Envelope::data(Health { status: "ok" })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Settings {
    debounce_ms: u64,
    default_owner: String,
}

pub(crate) async fn settings(State(state): State<AppState>) -> Json<Envelope<Settings>> {
    Envelope::data(Settings {
        debounce_ms: u64::try_from(state.debounce.as_millis()).unwrap_or(u64::MAX),
        default_owner: state.default_owner.clone(),
    })
}

pub(crate) async fn list_cards(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Envelope<Vec<Card>>>> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let owner = state.resolve_owner(params.user_id.as_deref());
    let cards = state.repo.list(&owner).await?;
    Ok(Envelope::data(cards))
}

pub(crate) async fn create_cards(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Vec<Card>>>)> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let Some(entries) = body.get("cards").and_then(Value::as_array) else {
        return Err(ApiError::bad_request("cards must be an array"));
    };

    let owner = match body.get("userId") {
        None | Some(Value::Null) => state.resolve_owner(None),
        Some(Value::String(user)) => state.resolve_owner(Some(user)),
        Some(_) => return Err(ApiError::bad_request("userId must be a string")),
    };

    let cards = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            NewCard::deserialize(entry)
                .map_err(|e| ApiError::bad_request(format!("card {index}: {e}")))
        })
        .collect::<ApiResult<Vec<_>>>()?;

    debug!("Creating {} cards for owner {}", cards.len(), owner);
    let created = state.repo.create(&owner, cards).await?;
    Ok((StatusCode::CREATED, Envelope::data(created)))
}

pub(crate) async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CardPatch>, JsonRejection>,
) -> ApiResult<Json<Envelope<Card>>> {
    let Json(patch) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let card = state.repo.update(&id, patch).await?;
    Ok(Envelope::data(card))
}

pub(crate) async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.repo.delete(&id).await?;
    Ok(Envelope::message("Card deleted"))
}
