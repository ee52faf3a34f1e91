//! Inbound call as seen by the gateway.
//!
//! Transport-neutral: the HTTP layer fills it from an axum request, tests
//! build it directly.

use axum::http::Method;
use bytes::Bytes;
use serde_json::Value;
use url::form_urlencoded;

use crate::gateway::GatewayError;
use crate::upstream::url::PATH_PARAM;

/// One browser call to the gateway.
#[derive(Debug, Clone)]
pub struct InboundCall {
    pub method: Method,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl InboundCall {
    /// A bodyless call, e.g. `GET ?path=/v1/fleet`.
    pub fn new(method: Method, query: impl Into<String>) -> Self {
        Self {
            method,
            query: Some(query.into()),
            content_type: None,
            body: Bytes::new(),
        }
    }

    /// Attach a body with its declared content type.
    pub fn with_body(mut self, content_type: &str, body: impl Into<Bytes>) -> Self {
        self.content_type = Some(content_type.to_string());
        self.body = body.into();
        self
    }

    pub fn is_json(&self) -> bool {
        self.content_type_contains("application/json")
    }

    pub fn is_form(&self) -> bool {
        self.content_type_contains("application/x-www-form-urlencoded")
    }

    pub fn is_multipart(&self) -> bool {
        self.content_type_contains("multipart/form-data")
    }

    fn content_type_contains(&self, needle: &str) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains(needle))
            .unwrap_or(false)
    }

    /// Parse the body when it is non-empty and declared as JSON.
    pub fn json_body(&self) -> Result<Option<Value>, GatewayError> {
        if self.body.is_empty() || !self.is_json() {
            return Ok(None);
        }
        serde_json::from_slice(&self.body)
            .map(Some)
            .map_err(|_| GatewayError::InvalidJson)
    }

    /// The untrimmed target path. The query parameter wins; the JSON body
    /// field is only consulted for non-GET calls without one.
    pub fn target_path(&self, json: Option<&Value>) -> Option<String> {
        if let Some(path) = self.query_path() {
            return Some(path);
        }
        if self.method == Method::GET {
            return None;
        }
        json.and_then(|body| body.get(PATH_PARAM))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn query_path(&self) -> Option<String> {
        let query = self.query.as_deref()?;
        form_urlencoded::parse(query.as_bytes())
            .filter(|(key, _)| key == PATH_PARAM)
            .last()
            .map(|(_, value)| value.into_owned())
    }

    /// Form fields of a urlencoded or multipart body; empty for anything
    /// else. File parts of a multipart body are skipped.
    pub async fn form_fields(&self) -> Vec<(String, String)> {
        if self.is_form() {
            return form_urlencoded::parse(&self.body)
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect();
        }
        if self.is_multipart() {
            return match self.multipart_fields().await {
                Ok(fields) => fields,
                Err(e) => {
                    tracing::debug!(error = %e, "Unreadable multipart body");
                    Vec::new()
                }
            };
        }
        Vec::new()
    }

    async fn multipart_fields(&self) -> Result<Vec<(String, String)>, multer::Error> {
        let boundary = multer::parse_boundary(self.content_type.as_deref().unwrap_or_default())?;
        let body = self.body.clone();
        let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut fields = Vec::new();
        while let Some(field) = multipart.next_field().await? {
            if field.file_name().is_some() {
                continue;
            }
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            fields.push((name, field.text().await?));
        }
        Ok(fields)
    }
}
