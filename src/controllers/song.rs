use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::error;

use crate::db::Catalog;
use crate::models::song::{InsertedSong, SongCount, SongList, song_id_from_value};

/// Store failures become 500s with the store's own message in the body.
/// Acceptable for an internal service; a public deployment would redact.
fn store_failure(err: impl std::fmt::Display) -> Response {
    error!("store operation failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": err.to_string()})),
    )
        .into_response()
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"message": message}))).into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({"message": message}))).into_response()
}

pub async fn count_songs(State(catalog): State<Catalog>) -> Response {
    match catalog.store.count().await {
        Ok(count) => (StatusCode::OK, Json(SongCount { count })).into_response(),
        Err(err) => store_failure(err),
    }
}

pub async fn list_songs(State(catalog): State<Catalog>) -> Response {
    match catalog.store.find_all().await {
        Ok(songs) => (StatusCode::OK, Json(SongList { songs })).into_response(),
        Err(err) => store_failure(err),
    }
}

/// The id arrives as an untyped path segment here; anything that does not
/// parse as an integer is reported the same way as a missing document.
pub async fn get_song(State(catalog): State<Catalog>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return not_found("song with id not found");
    };

    match catalog.store.find_by_id(id).await {
        Ok(Some(song)) => (StatusCode::OK, Json(song)).into_response(),
        Ok(None) => not_found("song with id not found"),
        Err(err) => store_failure(err),
    }
}

pub async fn create_song(State(catalog): State<Catalog>, Json(mut song): Json<Value>) -> Response {
    let Some(id_field) = song.get("id") else {
        return bad_request("missing id field");
    };
    let Some(id) = song_id_from_value(id_field) else {
        return bad_request("id must be an integer");
    };

    // Check-then-insert: concurrent creators with the same id can both pass
    // the lookup. Real uniqueness would need a unique index in the store.
    match catalog.store.find_by_id(id).await {
        Ok(Some(_)) => {
            return (
                StatusCode::FOUND,
                Json(json!({"message": format!("song with id {id} already present")})),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(err) => return store_failure(err),
    }

    // The id may have arrived as a numeric string; store the parsed integer
    // so typed lookups always match.
    song["id"] = json!(id);

    match catalog.store.insert_one(song).await {
        Ok(inserted_id) => (
            StatusCode::CREATED,
            Json(InsertedSong { inserted_id }),
        )
            .into_response(),
        Err(err) => store_failure(err),
    }
}

/// Merge-style partial update: only the fields present in the body are
/// overwritten. On change, answers with the re-read stored document rather
/// than echoing the request.
pub async fn update_song(
    State(catalog): State<Catalog>,
    Path(id): Path<i64>,
    Json(changes): Json<Value>,
) -> Response {
    match catalog.store.find_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("song not found"),
        Err(err) => return store_failure(err),
    }

    let modified = match catalog.store.update_one(id, changes).await {
        Ok(modified) => modified,
        Err(err) => return store_failure(err),
    };
    if modified == 0 {
        return (
            StatusCode::OK,
            Json(json!({"message": "song found, but nothing updated"})),
        )
            .into_response();
    }

    match catalog.store.find_by_id(id).await {
        Ok(Some(song)) => (StatusCode::CREATED, Json(song)).into_response(),
        Ok(None) => not_found("song not found"),
        Err(err) => store_failure(err),
    }
}

pub async fn delete_song(State(catalog): State<Catalog>, Path(id): Path<i64>) -> Response {
    match catalog.store.delete_one(id).await {
        Ok(0) => not_found("song not found"),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => store_failure(err),
    }
}
