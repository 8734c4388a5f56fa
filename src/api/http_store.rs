//! Implements the `RecordStore` trait over HTTP against the deployed spreadsheet endpoint.

use crate::api::RecordStore;
use crate::error::StoreError;
use crate::model::RecordKind;
use crate::Result;
use anyhow::{bail, Context};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;
use url::Url;

/// The endpoint parses the body itself, so it is sent as plain text to avoid a CORS preflight on
/// the browser side of the same endpoint.
const BODY_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// The payload field the endpoint uses to pick the sheet a row is written to.
const KIND_FIELD: &str = "sheetType";

const SUCCESS: &str = "success";

pub(crate) struct HttpStore {
    url: Url,
    client: reqwest::Client,
}

impl HttpStore {
    pub(crate) fn new(url: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self { url, client })
    }

    fn list_url(&self, kind: RecordKind) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("type", &kind.to_string());
        url
    }
}

#[async_trait::async_trait]
impl RecordStore for HttpStore {
    async fn list(&mut self, kind: RecordKind) -> Result<Vec<Value>> {
        let url = self.list_url(kind);
        trace!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to request {kind} records"))?;

        let operation = format!("Listing {kind} records");
        check_status(response.status(), &operation)?;
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read the {kind} records response"))?;
        parse_envelope(&body, &operation)
    }

    async fn append(&mut self, kind: RecordKind, payload: Value) -> Result<()> {
        let body = tag_payload(kind, payload)?;
        trace!("POST {} {body}", self.url);
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, BODY_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to send the {kind} record"))?;

        let operation = format!("Saving the {kind} record");
        check_status(response.status(), &operation)?;
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read the {kind} save response"))?;
        let _ = parse_envelope(&body, &operation)?;
        Ok(())
    }
}

/// The JSON body every endpoint response is wrapped in.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Vec<Value>>,
}

fn check_status(status: reqwest::StatusCode, operation: &str) -> Result<()> {
    if !status.is_success() {
        bail!(StoreError::HttpStatus {
            operation: operation.to_string(),
            status,
        });
    }
    Ok(())
}

/// Returns the `data` of a success envelope, or a `StoreError::Rejected` carrying the endpoint's
/// message.
fn parse_envelope(body: &str, operation: &str) -> Result<Vec<Value>> {
    let envelope: Envelope = serde_json::from_str(body)
        .with_context(|| format!("{operation} returned an invalid JSON envelope"))?;
    if envelope.status != SUCCESS {
        bail!(StoreError::Rejected {
            operation: operation.to_string(),
            status: envelope.status,
            message: envelope.message.unwrap_or_else(|| "no message".to_string()),
        });
    }
    Ok(envelope.data.unwrap_or_default())
}

/// Serializes `payload` with the kind field added.
fn tag_payload(kind: RecordKind, payload: Value) -> Result<String> {
    let Value::Object(mut map) = payload else {
        bail!("A {kind} record must be a JSON object");
    };
    map.insert(KIND_FIELD.to_string(), Value::String(kind.to_string()));
    serde_json::to_string(&map).context("Unable to serialize the record")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_envelope_success() {
        let body = r#"{"status":"success","data":[{"key":"HIDDEN_GOALS","value":"[]"}]}"#;
        let data = parse_envelope(body, "Listing").unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["key"], "HIDDEN_GOALS");
    }

    #[test]
    fn test_parse_envelope_without_data() {
        assert!(parse_envelope(r#"{"status":"success"}"#, "Saving")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_envelope_failure() {
        let err = parse_envelope(
            r#"{"status":"error","message":"Sheet not found"}"#,
            "Listing config records",
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Sheet not found"));
        assert_eq!(
            err.downcast_ref::<StoreError>(),
            Some(&StoreError::Rejected {
                operation: "Listing config records".to_string(),
                status: "error".to_string(),
                message: "Sheet not found".to_string(),
            })
        );
    }

    #[test]
    fn test_http_status_is_distinct_from_rejection() {
        assert!(check_status(reqwest::StatusCode::OK, "Saving").is_ok());

        let err = check_status(reqwest::StatusCode::BAD_GATEWAY, "Saving the config record")
            .unwrap_err();
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::HttpStatus { operation, status }) => {
                assert_eq!(operation, "Saving the config record");
                assert_eq!(*status, reqwest::StatusCode::BAD_GATEWAY);
            }
            other => panic!("expected an HTTP status error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_envelope_garbage() {
        let err = parse_envelope("<html>Moved</html>", "Listing").unwrap_err();
        assert!(err.downcast_ref::<StoreError>().is_none());
    }

    #[test]
    fn test_tag_payload() {
        let body = tag_payload(RecordKind::Config, json!({"key": "K", "value": "{}"})).unwrap();
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["sheetType"], "config");
        assert_eq!(parsed["key"], "K");
        assert!(tag_payload(RecordKind::Config, json!([1, 2])).is_err());
    }

    #[test]
    fn test_list_url() {
        let store = HttpStore::new(Url::parse("https://script.example.com/exec?x=1").unwrap())
            .unwrap();
        assert_eq!(
            store.list_url(RecordKind::Investment).as_str(),
            "https://script.example.com/exec?x=1&type=investment"
        );
    }
}
