use reqwest::{header, Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// What the gateway returned, parsed by content type.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid gateway URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("request to gateway failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned {status}: {message}")]
    Gateway { status: u16, message: String },
}

/// One call to make through the gateway.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub query: Vec<(String, String)>,
    /// Serialized as JSON. Ignored for GET.
    pub body: Option<Value>,
}

impl GatewayRequest {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Trip details shared by the availability and pricing lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripQuery {
    pub pickup: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub passengers: u32,
}

/// Client for the gateway endpoint (e.g. `https://site.example/api.php`).
pub struct GatewayClient {
    client: Client,
    endpoint: Url,
}

impl GatewayClient {
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::new(),
            endpoint: Url::parse(endpoint)?,
        })
    }

    /// URL for a target path; extra pairs follow `path`.
    pub fn url_for(&self, path: &str, query: &[(String, String)]) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            pairs.append_pair("path", path);
            pairs.extend_pairs(query);
        }
        url
    }

    /// Send a request through the gateway.
    ///
    /// Non-2xx answers become `ClientError::Gateway`, carrying the envelope's
    /// `error` message when there is one.
    pub async fn request(&self, path: &str, req: GatewayRequest) -> Result<Payload, ClientError> {
        let mut builder = self
            .client
            .request(req.method.clone(), self.url_for(path, &req.query))
            .header(header::ACCEPT, "application/json");

        if req.method != Method::GET {
            if let Some(body) = &req.body {
                builder = builder.json(body);
            }
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let is_json = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        let text = resp.text().await?;
        let payload = if is_json {
            serde_json::from_str(&text)
                .map(Payload::Json)
                .unwrap_or(Payload::Text(text))
        } else {
            Payload::Text(text)
        };

        if !status.is_success() {
            return Err(ClientError::Gateway {
                status: status.as_u16(),
                message: error_message(&payload),
            });
        }
        Ok(payload)
    }

    pub async fn fleet(&self) -> Result<Payload, ClientError> {
        self.request("/v1/fleet", GatewayRequest::get()).await
    }

    pub async fn available_vehicles(&self, trip: &TripQuery) -> Result<Payload, ClientError> {
        let body = serde_json::to_value(trip).unwrap_or(Value::Null);
        self.request("/v1/fleet/available", GatewayRequest::post(body)).await
    }

    pub async fn vehicle_pricing(
        &self,
        vehicle_id: &str,
        trip: &TripQuery,
    ) -> Result<Payload, ClientError> {
        let mut body = serde_json::to_value(trip).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut body {
            map.insert("vehicleId".to_string(), Value::String(vehicle_id.to_string()));
        }
        self.request("/v1/fleet/pricing", GatewayRequest::post(body)).await
    }

    pub async fn create_booking(&self, booking: Value) -> Result<Payload, ClientError> {
        self.request("/v1/bookings", GatewayRequest::post(booking)).await
    }

    pub async fn booking(&self, booking_id: &str) -> Result<Payload, ClientError> {
        self.request(&format!("/v1/bookings/{}", booking_id), GatewayRequest::get())
            .await
    }

    pub async fn cancel_booking(&self, booking_id: &str) -> Result<Payload, ClientError> {
        let req = GatewayRequest {
            method: Method::POST,
            query: Vec::new(),
            body: None,
        };
        self.request(&format!("/v1/bookings/{}/cancel", booking_id), req)
            .await
    }

    pub async fn test_connection(&self) -> Result<Payload, ClientError> {
        self.request("/v1/test-connection", GatewayRequest::get()).await
    }
}

fn error_message(payload: &Payload) -> String {
    payload
        .as_json()
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .unwrap_or("Request failed")
        .to_string()
}
