use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::fetch_error::FetchError;
use crate::models::{Cater, GalleryItem, Manufacturer, Product, SettingPair, Testimonial};
use crate::normalize;

const USER_AGENT: &str = "PharmaCatalog/0.2 (reqwest)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// The partner list backs both the home-page strip and the directory page;
// cache it so the two consumers share one upstream request.
const MANUFACTURER_CACHE_TTL: Duration = Duration::from_secs(600);

/// Transport boundary for the content API. Production uses reqwest; tests
/// swap in a scripted mock.
#[async_trait]
pub trait ContentTransport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, FetchError>;
}

pub struct HttpTransport {
    client: Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

#[async_trait]
impl ContentTransport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        if !resp.status().is_success() {
            return Err(FetchError::status(resp.status()));
        }

        resp.json::<Value>().await.map_err(FetchError::from_reqwest)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, FetchError> {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        if !resp.status().is_success() {
            return Err(FetchError::status(resp.status()));
        }

        resp.json::<Value>().await.map_err(FetchError::from_reqwest)
    }
}

/// Response wrapper used by every content endpoint. Some endpoints report
/// success via `success`, others via `status`; both are accepted.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    status: Option<bool>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiEnvelope {
    pub fn from_value(value: Value) -> Result<Self, FetchError> {
        serde_json::from_value(value)
            .map_err(|e| FetchError::contract(format!("malformed envelope: {}", e)))
    }

    pub fn is_ok(&self) -> bool {
        self.success.or(self.status).unwrap_or(false)
    }

    /// The record array, enforcing the shape contract: a truthy flag with a
    /// non-array `data` is a failure no matter what the flag says.
    pub fn into_records(self) -> Result<Vec<Value>, FetchError> {
        if !self.is_ok() {
            return Err(FetchError::api(self.message));
        }
        match self.data {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(FetchError::contract("envelope `data` is not an array")),
        }
    }
}

/// Server-side filter payload for the product search endpoint. Empty fields
/// are omitted from the request body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub product_name: String,
    pub company_name: String,
}

impl ProductQuery {
    pub fn body(&self) -> Value {
        let mut body = serde_json::Map::new();
        if !self.product_name.is_empty() {
            body.insert("p_name".to_string(), Value::from(self.product_name.clone()));
        }
        if !self.company_name.is_empty() {
            body.insert("m_name".to_string(), Value::from(self.company_name.clone()));
        }
        Value::Object(body)
    }
}

pub struct ContentApiClient {
    base_url: String,
    transport: Arc<dyn ContentTransport>,
    manufacturer_cache: Cache<String, Arc<Vec<Manufacturer>>>,
}

impl ContentApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(
        base_url: impl Into<String>,
        transport: Arc<dyn ContentTransport>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            manufacturer_cache: Cache::builder()
                .time_to_live(MANUFACTURER_CACHE_TTL)
                .build(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_records(&self, path: &str) -> Result<Vec<Value>, FetchError> {
        let raw = self.transport.get_json(&self.url(path)).await?;
        ApiEnvelope::from_value(raw)?.into_records()
    }

    /// Product search with optional name/company substring filters
    pub async fn search_products(&self, query: &ProductQuery) -> Result<Vec<Product>, FetchError> {
        let raw = self
            .transport
            .post_json(&self.url("/products"), &query.body())
            .await?;
        let records = ApiEnvelope::from_value(raw)?.into_records()?;
        Ok(normalize::products(records))
    }

    /// All partner manufacturers, shared through a read-through cache
    pub async fn manufacturers(&self) -> Result<Arc<Vec<Manufacturer>>, FetchError> {
        self.manufacturer_cache
            .try_get_with("all".to_string(), async {
                let records = self.get_records("/manufactures").await?;
                Ok(Arc::new(normalize::manufacturers(records)))
            })
            .await
            .map_err(|e: Arc<FetchError>| (*e).clone())
    }

    /// Products carried for a single manufacturer
    pub async fn manufacturer_products(&self, slug: &str) -> Result<Vec<Product>, FetchError> {
        let records = self
            .get_records(&format!("/manufactures/{}", slug))
            .await?;
        Ok(normalize::products(records))
    }

    pub async fn gallery_items(&self) -> Result<Vec<GalleryItem>, FetchError> {
        let records = self.get_records("/galleries").await?;
        Ok(normalize::gallery_items(records))
    }

    pub async fn testimonials(&self) -> Result<Vec<Testimonial>, FetchError> {
        let records = self.get_records("/testimonials").await?;
        Ok(normalize::testimonials(records))
    }

    pub async fn caters(&self) -> Result<Vec<Cater>, FetchError> {
        let records = self.get_records("/caters").await?;
        Ok(normalize::caters(records))
    }

    pub async fn setting_pairs(&self) -> Result<Vec<SettingPair>, FetchError> {
        let records = self.get_records("/settings").await?;
        Ok(normalize::setting_pairs(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch_error::FetchErrorKind;
    use serde_json::json;

    #[test]
    fn test_envelope_accepts_either_flag_name() {
        let env = ApiEnvelope::from_value(json!({"success": true, "data": []})).unwrap();
        assert!(env.is_ok());
        let env = ApiEnvelope::from_value(json!({"status": true, "data": []})).unwrap();
        assert!(env.is_ok());
        let env = ApiEnvelope::from_value(json!({"data": []})).unwrap();
        assert!(!env.is_ok());
    }

    #[test]
    fn test_envelope_false_flag_is_api_error_with_message() {
        let env =
            ApiEnvelope::from_value(json!({"success": false, "message": "maintenance"})).unwrap();
        let err = env.into_records().unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Api);
        assert_eq!(err.message, "maintenance");
    }

    #[test]
    fn test_envelope_non_array_data_is_contract_error() {
        let env = ApiEnvelope::from_value(json!({"success": true, "data": {"id": 1}})).unwrap();
        assert_eq!(
            env.into_records().unwrap_err().kind,
            FetchErrorKind::Contract
        );

        let env = ApiEnvelope::from_value(json!({"success": true, "data": null})).unwrap();
        assert_eq!(
            env.into_records().unwrap_err().kind,
            FetchErrorKind::Contract
        );
    }

    #[test]
    fn test_envelope_empty_array_is_success() {
        let env = ApiEnvelope::from_value(json!({"success": true, "data": []})).unwrap();
        assert_eq!(env.into_records().unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn test_non_object_body_is_contract_error() {
        let err = ApiEnvelope::from_value(json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Contract);
    }

    #[test]
    fn test_product_query_omits_empty_filters() {
        let query = ProductQuery::default();
        assert_eq!(query.body(), json!({}));

        let query = ProductQuery {
            product_name: "parac".to_string(),
            company_name: String::new(),
        };
        assert_eq!(query.body(), json!({"p_name": "parac"}));

        let query = ProductQuery {
            product_name: "parac".to_string(),
            company_name: "sun".to_string(),
        };
        assert_eq!(query.body(), json!({"p_name": "parac", "m_name": "sun"}));
    }
}
