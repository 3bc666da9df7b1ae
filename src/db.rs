use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::{Client, Collection};
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Backend(#[from] mongodb::error::Error),

    #[error("invalid document: {0}")]
    InvalidDocument(#[from] bson::ser::Error),

    #[error("{0}")]
    Unavailable(String),
}

/// The document store behind the catalog. Handlers only ever see this trait,
/// so tests can swap in an in-memory double.
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Total number of documents in the collection.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Every document, in store-native order.
    async fn find_all(&self) -> Result<Vec<Value>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Value>, StoreError>;

    /// Inserts a document and returns the store-generated id, already
    /// normalized to plain JSON.
    async fn insert_one(&self, song: Value) -> Result<Value, StoreError>;

    /// Merges `changes` into the document matching `id`; fields absent from
    /// `changes` are preserved. Returns the number of modified documents.
    async fn update_one(&self, id: i64, changes: Value) -> Result<u64, StoreError>;

    /// Returns the number of deleted documents.
    async fn delete_one(&self, id: i64) -> Result<u64, StoreError>;

    /// Drops the collection and loads `songs` in its place.
    async fn replace_all(&self, songs: Vec<Value>) -> Result<(), StoreError>;
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct Catalog {
    pub store: Arc<dyn SongStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        Self { store }
    }
}

/// Renders a BSON value as plain JSON. Extended types come out in their
/// relaxed extended-JSON form, e.g. object ids as `{"$oid": "..."}`.
pub fn to_plain_json(value: Bson) -> Value {
    value.into_relaxed_extjson()
}

fn to_document(value: &Value) -> Result<Document, StoreError> {
    Ok(bson::to_document(value)?)
}

/// MongoDB-backed implementation of [`SongStore`].
pub struct MongoSongStore {
    songs: Collection<Document>,
}

impl MongoSongStore {
    /// Builds a client for the store at `uri`. The driver connects lazily,
    /// so an unreachable server or bad credentials only surface on first use.
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let songs = client.database("songs").collection::<Document>("songs");
        Ok(Self { songs })
    }
}

#[async_trait]
impl SongStore for MongoSongStore {
    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.songs.count_documents(doc! {}).await?)
    }

    async fn find_all(&self) -> Result<Vec<Value>, StoreError> {
        let docs: Vec<Document> = self.songs.find(doc! {}).await?.try_collect().await?;
        Ok(docs
            .into_iter()
            .map(|song| to_plain_json(Bson::Document(song)))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Value>, StoreError> {
        let found = self.songs.find_one(doc! { "id": id }).await?;
        Ok(found.map(|song| to_plain_json(Bson::Document(song))))
    }

    async fn insert_one(&self, song: Value) -> Result<Value, StoreError> {
        let result = self.songs.insert_one(to_document(&song)?).await?;
        Ok(to_plain_json(result.inserted_id))
    }

    async fn update_one(&self, id: i64, changes: Value) -> Result<u64, StoreError> {
        let update = doc! { "$set": to_document(&changes)? };
        let result = self.songs.update_one(doc! { "id": id }, update).await?;
        Ok(result.modified_count)
    }

    async fn delete_one(&self, id: i64) -> Result<u64, StoreError> {
        let result = self.songs.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count)
    }

    async fn replace_all(&self, songs: Vec<Value>) -> Result<(), StoreError> {
        self.songs.drop().await?;
        let docs = songs
            .iter()
            .map(to_document)
            .collect::<Result<Vec<_>, _>>()?;
        if !docs.is_empty() {
            self.songs.insert_many(docs).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    #[test]
    fn object_ids_normalize_to_extended_json() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(
            to_plain_json(Bson::ObjectId(oid)),
            json!({"$oid": "507f1f77bcf86cd799439011"})
        );
    }

    #[test]
    fn plain_scalars_stay_plain() {
        let doc = doc! { "id": 2i64, "title": "B" };
        assert_eq!(
            to_plain_json(Bson::Document(doc)),
            json!({"id": 2, "title": "B"})
        );
    }
}
