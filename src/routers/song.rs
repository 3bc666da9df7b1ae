use axum::{Router, routing::get};

use crate::controllers::song::{
    count_songs, create_song, delete_song, get_song, list_songs, update_song,
};
use crate::db::Catalog;

pub fn song_routes() -> Router<Catalog> {
    Router::new()
        .route("/count", get(count_songs))
        .route("/song", get(list_songs).post(create_song))
        .route("/song/{id}", get(get_song).put(update_song).delete(delete_song))
}
