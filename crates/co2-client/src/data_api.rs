use std::time::Duration;

use bson::Document;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use ureq::Agent;
use ureq::http::StatusCode;

use crate::client::CollectionClient;
use crate::codec::{document_from_json, document_to_json};
use crate::error::ClientError;
use crate::query::FindQuery;

const API_PATH: &str = "api/json/v1";

#[derive(Debug, Clone)]
pub struct DataApiConfig {
    pub endpoint: String,
    pub token: String,
    pub keyspace: String,
    pub timeout: Duration,
}

/// Blocking client for the Astra DB Data API (JSON over HTTPS).
///
/// One instance holds one connection pool (`ureq::Agent`) and is shared by
/// every caller for the lifetime of the process.
pub struct DataApiClient {
    agent: Agent,
    keyspace_url: String,
    token: String,
}

impl DataApiClient {
    pub fn new(config: &DataApiConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build();
        let keyspace_url = format!(
            "{}/{API_PATH}/{}",
            config.endpoint.trim_end_matches('/'),
            config.keyspace
        );
        Self {
            agent: Agent::new_with_config(agent_config),
            keyspace_url,
            token: config.token.clone(),
        }
    }

    pub fn keyspace_url(&self) -> &str {
        &self.keyspace_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.keyspace_url)
    }

    fn command(&self, url: &str, body: &Value) -> Result<CommandResponse, ClientError> {
        let mut response = self
            .agent
            .post(url)
            .header("Token", self.token.as_str())
            .send_json(body)?;
        let status = response.status();
        let text = response.body_mut().read_to_string()?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Auth(format!("{status}: {}", snippet(&text))));
        }
        if !status.is_success() {
            return Err(ClientError::Server {
                code: Some(status.as_u16().to_string()),
                message: snippet(&text).to_string(),
            });
        }

        let mut parsed: CommandResponse = serde_json::from_str(&text)?;
        if !parsed.errors.is_empty() {
            let err = parsed.errors.swap_remove(0);
            return Err(ClientError::Server {
                code: err.error_code,
                message: err.message,
            });
        }
        Ok(parsed)
    }

    fn find_page(
        &self,
        collection: &str,
        query: &FindQuery,
        page_state: Option<&str>,
    ) -> Result<ResponseData, ClientError> {
        let mut find = command_body(query);
        if let Some(state) = page_state {
            find.insert("options".into(), json!({ "pageState": state }));
        }
        let response = self.command(
            &self.collection_url(collection),
            &json!({ "find": Value::Object(find) }),
        )?;
        response
            .data
            .ok_or_else(|| ClientError::Serialization("find response without data".into()))
    }
}

impl CollectionClient for DataApiClient {
    fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Document>, ClientError> {
        let mut documents = Vec::new();
        let mut page_state: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let data = self.find_page(collection, query, page_state.as_deref())?;
            pages += 1;
            documents.extend(data.documents.into_iter().map(document_from_json));
            match data.next_page_state {
                Some(next) => page_state = Some(next),
                None => break,
            }
        }
        tracing::debug!(collection, pages, count = documents.len(), "find");
        Ok(documents)
    }

    fn find_one(
        &self,
        collection: &str,
        query: &FindQuery,
    ) -> Result<Option<Document>, ClientError> {
        let find_one = command_body(query);
        let response = self.command(
            &self.collection_url(collection),
            &json!({ "findOne": Value::Object(find_one) }),
        )?;
        let data = response
            .data
            .ok_or_else(|| ClientError::Serialization("findOne response without data".into()))?;
        Ok(data.document.map(document_from_json))
    }

    fn list_collections(&self) -> Result<Vec<String>, ClientError> {
        let response = self.command(&self.keyspace_url, &json!({ "findCollections": {} }))?;
        let status = response.status.ok_or_else(|| {
            ClientError::Serialization("findCollections response without status".into())
        })?;
        let listing: CollectionListing = serde_json::from_value(status)?;
        Ok(listing
            .collections
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(name) => Some(name),
                Value::Object(mut obj) => match obj.remove("name") {
                    Some(Value::String(name)) => Some(name),
                    _ => None,
                },
                _ => None,
            })
            .collect())
    }
}

fn command_body(query: &FindQuery) -> Map<String, Value> {
    let mut body = Map::new();
    let filter = query
        .filter
        .as_ref()
        .map(document_to_json)
        .unwrap_or_default();
    body.insert("filter".into(), Value::Object(filter));
    if let Some(fields) = &query.projection {
        let mut projection = Map::new();
        projection.insert("_id".into(), json!(1));
        for field in fields {
            projection.insert(field.clone(), json!(1));
        }
        body.insert("projection".into(), Value::Object(projection));
    }
    body
}

fn snippet(text: &str) -> &str {
    const MAX: usize = 200;
    if text.len() <= MAX {
        return text;
    }
    let mut end = MAX;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

// ── Wire types ──────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    data: Option<ResponseData>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    errors: Vec<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    #[serde(default)]
    documents: Vec<Map<String, Value>>,
    #[serde(default)]
    document: Option<Map<String, Value>>,
    #[serde(default)]
    next_page_state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CollectionListing {
    #[serde(default)]
    collections: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> DataApiConfig {
        DataApiConfig {
            endpoint: endpoint.into(),
            token: "AstraCS:test".into(),
            keyspace: "gestao_co2".into(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn keyspace_url_joins_without_double_slash() {
        let client = DataApiClient::new(&config("https://db-id-region.apps.astra.datastax.com/"));
        assert_eq!(
            client.keyspace_url(),
            "https://db-id-region.apps.astra.datastax.com/api/json/v1/gestao_co2"
        );
        assert_eq!(
            client.collection_url("cidade"),
            "https://db-id-region.apps.astra.datastax.com/api/json/v1/gestao_co2/cidade"
        );
    }

    #[test]
    fn command_body_projects_id_and_fields() {
        let body = command_body(&FindQuery::all().project(["nome"]));
        assert_eq!(body["filter"], json!({}));
        assert_eq!(body["projection"], json!({ "_id": 1, "nome": 1 }));
    }

    #[test]
    fn command_body_without_projection() {
        let body = command_body(&FindQuery::eq("id_estado", "sp"));
        assert_eq!(body["filter"], json!({ "id_estado": "sp" }));
        assert!(!body.contains_key("projection"));
    }

    #[test]
    fn null_page_state_deserializes_as_none() {
        let data: ResponseData =
            serde_json::from_value(json!({ "documents": [], "nextPageState": null })).unwrap();
        assert!(data.next_page_state.is_none());
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let long = "é".repeat(150);
        let cut = snippet(&long);
        assert!(cut.len() <= 200);
        assert!(cut.chars().all(|c| c == 'é'));
    }
}
