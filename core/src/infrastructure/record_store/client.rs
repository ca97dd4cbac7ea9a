use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::{
    domain::common::{RecordStoreConfig, entities::app_errors::CoreError},
    infrastructure::record_store::formula::Formula,
};

/// The store accepts at most this many records per create or delete request.
pub const WRITE_BATCH_SIZE: usize = 10;

pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Fields,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    records: Vec<Record>,
    offset: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewRecord {
    fields: Fields,
}

#[derive(Debug, Serialize)]
struct CreateRequest {
    records: Vec<NewRecord>,
    typecast: bool,
}

#[derive(Debug, Serialize)]
struct UpdateRequest {
    fields: Fields,
    typecast: bool,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    records: Vec<Record>,
}

/// JSON client for an Airtable-style REST record store.
#[derive(Debug, Clone)]
pub struct RecordStoreClient {
    base_url: String,
    base_id: String,
    api_key: String,
    client: Client,
}

impl RecordStoreClient {
    pub fn new(config: &RecordStoreConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            base_id: config.base_id.clone(),
            api_key: config.api_key.clone(),
            client: Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            self.base_id,
            urlencoding::encode(table)
        )
    }

    /// Lists every record matching `formula`, following pagination offsets.
    pub async fn list(
        &self,
        table: &str,
        formula: Option<&Formula>,
    ) -> Result<Vec<Record>, CoreError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut params = Vec::new();
            if let Some(formula) = formula {
                params.push(format!(
                    "filterByFormula={}",
                    urlencoding::encode(&formula.render())
                ));
            }
            if let Some(offset) = &offset {
                params.push(format!("offset={}", urlencoding::encode(offset)));
            }

            let url = if params.is_empty() {
                self.table_url(table)
            } else {
                format!("{}?{}", self.table_url(table), params.join("&"))
            };

            let page: ListResponse = self
                .send(
                    self.client.get(&url),
                    &format!("list {table}"),
                    CoreError::ExternalServiceError,
                )
                .await?;

            records.extend(page.records);
            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!(table, count = records.len(), "records listed");
        Ok(records)
    }

    pub async fn find(&self, table: &str, id: &str) -> Result<Option<Record>, CoreError> {
        let url = format!("{}/{}", self.table_url(table), urlencoding::encode(id));
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                error!("Record store request failed: {}", e);
                CoreError::ExternalServiceError(format!("find {table}/{id}: {e}"))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::parse(response, &format!("find {table}/{id}"), CoreError::ExternalServiceError)
            .await
            .map(Some)
    }

    /// Creates records in batches of [`WRITE_BATCH_SIZE`]. Earlier batches stay
    /// committed when a later one fails.
    pub async fn create(&self, table: &str, records: Vec<Fields>) -> Result<Vec<Record>, CoreError> {
        let mut created = Vec::with_capacity(records.len());

        for chunk in records.chunks(WRITE_BATCH_SIZE) {
            let body = CreateRequest {
                records: chunk
                    .iter()
                    .map(|fields| NewRecord {
                        fields: fields.clone(),
                    })
                    .collect(),
                typecast: true,
            };

            let response: RecordsResponse = self
                .send(
                    self.client.post(self.table_url(table)).json(&body),
                    &format!("create {table}"),
                    CoreError::ExternalWriteFailure,
                )
                .await?;
            created.extend(response.records);
        }

        Ok(created)
    }

    pub async fn update(&self, table: &str, id: &str, fields: Fields) -> Result<Record, CoreError> {
        let url = format!("{}/{}", self.table_url(table), urlencoding::encode(id));
        let body = UpdateRequest {
            fields,
            typecast: true,
        };

        self.send(
            self.client.patch(&url).json(&body),
            &format!("update {table}/{id}"),
            CoreError::ExternalWriteFailure,
        )
        .await
    }

    pub async fn delete(&self, table: &str, ids: &[String]) -> Result<(), CoreError> {
        for chunk in ids.chunks(WRITE_BATCH_SIZE) {
            let query = chunk
                .iter()
                .map(|id| format!("records[]={}", urlencoding::encode(id)))
                .collect::<Vec<_>>()
                .join("&");
            let url = format!("{}?{}", self.table_url(table), query);

            let _: Value = self
                .send(
                    self.client.delete(&url),
                    &format!("delete {table}"),
                    CoreError::ExternalWriteFailure,
                )
                .await?;
        }

        Ok(())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
        failure: fn(String) -> CoreError,
    ) -> Result<T, CoreError> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                error!("Record store request failed: {}", e);
                failure(format!("{action}: {e}"))
            })?;

        Self::parse(response, action, failure).await
    }

    async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
        action: &str,
        failure: fn(String) -> CoreError,
    ) -> Result<T, CoreError> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Record store error: {} - {}", status, error_text);
            return Err(failure(format!("{action} returned {status}: {error_text}")));
        }

        response.json().await.map_err(|e| {
            error!("Failed to parse record store response: {}", e);
            failure(format!("{action}: invalid response: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_encodes_table_name() {
        let client = RecordStoreClient::new(&RecordStoreConfig {
            base_url: "https://api.example.com/v0/".to_string(),
            base_id: "app123".to_string(),
            api_key: "key".to_string(),
        });
        assert_eq!(
            client.table_url("Order Lines"),
            "https://api.example.com/v0/app123/Order%20Lines"
        );
    }

    #[test]
    fn test_record_deserializes_without_fields() {
        let record: Record = serde_json::from_str(r#"{"id": "rec1"}"#).unwrap();
        assert_eq!(record.id, "rec1");
        assert!(record.fields.is_empty());
    }
}
