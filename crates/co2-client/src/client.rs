use std::sync::Arc;

use bson::Document;

use crate::error::ClientError;
use crate::query::FindQuery;

/// Read access to the collections of one keyspace.
///
/// Implementations are shared across request handlers, so every method takes
/// `&self`. Calls block until the backend answers.
pub trait CollectionClient: Send + Sync {
    /// Every document of `collection` matching the query, across all pages.
    fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Document>, ClientError>;

    /// One arbitrary document matching the query.
    fn find_one(
        &self,
        collection: &str,
        query: &FindQuery,
    ) -> Result<Option<Document>, ClientError>;

    /// Names of the collections that exist in the keyspace.
    fn list_collections(&self) -> Result<Vec<String>, ClientError>;
}

impl<T: CollectionClient + ?Sized> CollectionClient for Arc<T> {
    fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Document>, ClientError> {
        (**self).find(collection, query)
    }

    fn find_one(
        &self,
        collection: &str,
        query: &FindQuery,
    ) -> Result<Option<Document>, ClientError> {
        (**self).find_one(collection, query)
    }

    fn list_collections(&self) -> Result<Vec<String>, ClientError> {
        (**self).list_collections()
    }
}

impl<T: CollectionClient + ?Sized> CollectionClient for Box<T> {
    fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Document>, ClientError> {
        (**self).find(collection, query)
    }

    fn find_one(
        &self,
        collection: &str,
        query: &FindQuery,
    ) -> Result<Option<Document>, ClientError> {
        (**self).find_one(collection, query)
    }

    fn list_collections(&self) -> Result<Vec<String>, ClientError> {
        (**self).list_collections()
    }
}
