use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use bson::Document;

use crate::client::CollectionClient;
use crate::codec::bson_to_json;
use crate::error::ClientError;
use crate::query::FindQuery;

/// In-process collections with Data API filter and projection semantics.
///
/// Equality filters compare values by their JSON form, so an `Int32(1)` seed
/// matches an `Int64(1)` filter the way the Data API sees them. Reading a
/// collection that was never created fails with `COLLECTION_NOT_EXIST`.
#[derive(Default)]
pub struct MemoryClient {
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
    outage: RwLock<Option<String>>,
    requests: AtomicUsize,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_collection(&self, name: &str) {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default();
    }

    pub fn insert_many(&self, collection: &str, docs: Vec<Document>) {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(collection.to_string())
            .or_default()
            .extend(docs);
    }

    /// Make every subsequent request fail with `ClientError::Unavailable`
    /// until called again with `None`.
    pub fn set_outage(&self, reason: Option<&str>) {
        *self.outage.write().unwrap_or_else(PoisonError::into_inner) =
            reason.map(str::to_string);
    }

    /// Number of requests served so far, failed ones included.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn begin_request(&self) -> Result<(), ClientError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self
            .outage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(reason) => Err(ClientError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn scan<F>(&self, collection: &str, query: &FindQuery, mut f: F) -> Result<(), ClientError>
    where
        F: FnMut(Document) -> bool,
    {
        self.begin_request()?;
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let docs = collections.get(collection).ok_or_else(|| {
            ClientError::server(
                "COLLECTION_NOT_EXIST",
                format!("Collection does not exist, collection name: {collection}"),
            )
        })?;
        for doc in docs.iter().filter(|doc| matches(doc, query.filter.as_ref())) {
            if !f(project(doc, query.projection.as_deref())) {
                break;
            }
        }
        Ok(())
    }
}

fn matches(doc: &Document, filter: Option<&Document>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    filter.iter().all(|(field, expected)| {
        doc.get(field)
            .is_some_and(|actual| bson_to_json(actual) == bson_to_json(expected))
    })
}

fn project(doc: &Document, fields: Option<&[String]>) -> Document {
    let Some(fields) = fields else {
        return doc.clone();
    };
    doc.iter()
        .filter(|(key, _)| key.as_str() == "_id" || fields.iter().any(|f| f == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

impl CollectionClient for MemoryClient {
    fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Document>, ClientError> {
        let mut out = Vec::new();
        self.scan(collection, query, |doc| {
            out.push(doc);
            true
        })?;
        Ok(out)
    }

    fn find_one(
        &self,
        collection: &str,
        query: &FindQuery,
    ) -> Result<Option<Document>, ClientError> {
        let mut out = None;
        self.scan(collection, query, |doc| {
            out = Some(doc);
            false
        })?;
        Ok(out)
    }

    fn list_collections(&self) -> Result<Vec<String>, ClientError> {
        self.begin_request()?;
        Ok(self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn seeded() -> MemoryClient {
        let client = MemoryClient::new();
        client.insert_many(
            "cidade",
            vec![
                doc! { "_id": "c-1", "nome": "Recife", "uf": "PE" },
                doc! { "_id": "c-2", "nome": "Olinda", "uf": "PE" },
                doc! { "_id": "c-3", "nome": "Santos", "uf": "SP" },
            ],
        );
        client
    }

    #[test]
    fn find_filters_by_equality() {
        let client = seeded();
        let docs = client.find("cidade", &FindQuery::eq("uf", "PE")).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn projection_keeps_id() {
        let client = seeded();
        let docs = client
            .find("cidade", &FindQuery::all().project(["nome"]))
            .unwrap();
        assert_eq!(docs[0], doc! { "_id": "c-1", "nome": "Recife" });
    }

    #[test]
    fn integer_width_does_not_affect_equality() {
        let client = MemoryClient::new();
        client.insert_many("estado", vec![doc! { "_id": 1_i32, "nome": "PE" }]);
        let docs = client.find("estado", &FindQuery::eq("_id", 1_i64)).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn missing_collection_is_a_server_error() {
        let client = MemoryClient::new();
        let err = client.find_one("nope", &FindQuery::all()).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Server { code: Some(ref c), .. } if c == "COLLECTION_NOT_EXIST"
        ));
    }

    #[test]
    fn outage_fails_requests_and_counts_them() {
        let client = seeded();
        client.set_outage(Some("connection refused"));
        assert!(matches!(
            client.find("cidade", &FindQuery::all()),
            Err(ClientError::Unavailable(_))
        ));
        client.set_outage(None);
        assert!(client.find("cidade", &FindQuery::all()).is_ok());
        assert_eq!(client.request_count(), 2);
    }
}
