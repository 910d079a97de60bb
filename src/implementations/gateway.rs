use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Method, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::errors::TaxonError;
use crate::errors::TaxonResult;
use crate::implementations::config::{ConfigError, GatewayConfig};
use crate::models::entity::{ItemType, PossibleValue, Property, PropertyId, TypeId};
use crate::models::report::{AiClassification, Classification, CompletenessReport};
use crate::traits::gateway::KnowledgeGateway;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Failed to parse service response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
}

impl From<GatewayError> for TaxonError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NetworkError(msg) => TaxonError::RemoteRequestError(msg),
            // The server's machine detail string, surfaced verbatim.
            GatewayError::HttpError { message, .. } => TaxonError::RemoteRequestError(message),
            GatewayError::ParseError(msg) => {
                TaxonError::RemoteRequestError(format!("malformed service response: {}", msg))
            }
            GatewayError::ConfigError(err) => TaxonError::SystemError(err.to_string()),
            GatewayError::SerdeError(err) => {
                TaxonError::RemoteRequestError(format!("malformed service response: {}", err))
            }
        }
    }
}

/// Error body shape of the knowledge service
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// One record of the property-values listing; the service returns at most
/// one per (type, property) pair
#[derive(Debug, Deserialize)]
struct PropertyValuesRecord {
    values: Vec<String>,
}

/// HTTP implementation of [`KnowledgeGateway`] against the REST/JSON
/// knowledge service.
///
/// The service base URL and timeout come from [`GatewayConfig`]; see its
/// `resolve` for the file/environment precedence. Path parameters are pushed
/// through the URL type so raw values (e.g. a possible value containing
/// spaces) are percent-encoded.
pub struct HttpKnowledgeGateway {
    config: GatewayConfig,
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpKnowledgeGateway {
    /// Create a gateway for the configured service
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            GatewayError::ConfigError(ConfigError::InvalidServiceUrl(format!(
                "{}: {}",
                config.base_url, e
            )))
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        info!("Knowledge gateway targeting {}", base_url);
        Ok(Self {
            config,
            http_client,
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                GatewayError::NetworkError("service URL cannot be a base".to_string())
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    async fn send_request(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, GatewayError> {
        debug!("{} {}", method, url);

        let mut request = self.http_client.request(method, url);
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            let msg = format!("Network error when calling knowledge service: {}", e);
            warn!("{}", msg);
            if e.is_timeout() {
                warn!("Request timed out");
            }
            if e.is_connect() {
                warn!("Connection error - check that the service is reachable");
            }
            GatewayError::NetworkError(msg)
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = Self::error_detail(response).await;
            warn!("Service error: HTTP {} - {}", status, message);
            return Err(GatewayError::HttpError { status, message });
        }

        Ok(response)
    }

    /// Extract the machine error detail from a non-2xx response: the JSON
    /// `detail` field when present, the raw body otherwise, the status text
    /// as a last resort.
    async fn error_detail(response: reqwest::Response) -> String {
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
        match response.text().await {
            Ok(body) if !body.is_empty() => match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => parsed.detail,
                Err(_) => body,
            },
            _ => status_text,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, GatewayError> {
        let url = self.endpoint(segments)?;
        let response = self.send_request(Method::GET, url, None).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl KnowledgeGateway for HttpKnowledgeGateway {
    async fn list_types(&self) -> TaxonResult<Vec<ItemType>> {
        let types: Vec<ItemType> = self.get_json(&["types"]).await?;
        debug!("Fetched {} types", types.len());
        Ok(types)
    }

    async fn create_type(&self, name: &str) -> TaxonResult<ItemType> {
        let url = self.endpoint(&["types"])?;
        let body = serde_json::json!({ "name": name });
        let response = self.send_request(Method::POST, url, Some(body)).await?;
        let created = response
            .json::<ItemType>()
            .await
            .map_err(|e| GatewayError::ParseError(e.to_string()))?;
        info!("Created type '{}' with id {}", created.name, created.id);
        Ok(created)
    }

    async fn delete_type(&self, type_id: TypeId) -> TaxonResult<()> {
        let url = self.endpoint(&["types", &type_id.to_string()])?;
        self.send_request(Method::DELETE, url, None).await?;
        info!("Deleted type {}", type_id);
        Ok(())
    }

    async fn list_properties(&self) -> TaxonResult<Vec<Property>> {
        let properties: Vec<Property> = self.get_json(&["properties"]).await?;
        debug!("Fetched {} properties", properties.len());
        Ok(properties)
    }

    async fn create_property(&self, name: &str) -> TaxonResult<Property> {
        let url = self.endpoint(&["properties"])?;
        let body = serde_json::json!({ "name": name });
        let response = self.send_request(Method::POST, url, Some(body)).await?;
        let created = response
            .json::<Property>()
            .await
            .map_err(|e| GatewayError::ParseError(e.to_string()))?;
        info!("Created property '{}' with id {}", created.name, created.id);
        Ok(created)
    }

    async fn delete_property(&self, property_id: PropertyId) -> TaxonResult<()> {
        let url = self.endpoint(&["properties", &property_id.to_string()])?;
        self.send_request(Method::DELETE, url, None).await?;
        info!("Deleted property {}", property_id);
        Ok(())
    }

    async fn list_possible_values(&self, property_name: &str) -> TaxonResult<Vec<PossibleValue>> {
        let values: Vec<PossibleValue> =
            self.get_json(&["possible-values", property_name]).await?;
        debug!(
            "Fetched {} possible values for '{}'",
            values.len(),
            property_name
        );
        Ok(values)
    }

    async fn create_possible_value(
        &self,
        property_name: &str,
        value: &str,
    ) -> TaxonResult<PossibleValue> {
        let url = self.endpoint(&["possible-values", property_name])?;
        let body = serde_json::json!({ "value": value });
        let response = self.send_request(Method::POST, url, Some(body)).await?;
        let created = response
            .json::<PossibleValue>()
            .await
            .map_err(|e| GatewayError::ParseError(e.to_string()))?;
        info!(
            "Created possible value '{}' for property '{}'",
            created.value, created.property_name
        );
        Ok(created)
    }

    async fn delete_possible_value(&self, property_name: &str, value: &str) -> TaxonResult<()> {
        let url = self.endpoint(&["possible-values", property_name, value])?;
        self.send_request(Method::DELETE, url, None).await?;
        info!(
            "Deleted possible value '{}' of property '{}'",
            value, property_name
        );
        Ok(())
    }

    async fn list_type_properties(&self, type_id: TypeId) -> TaxonResult<Vec<String>> {
        let names: Vec<String> = self
            .get_json(&["type-properties", &type_id.to_string()])
            .await?;
        debug!("Fetched {} properties for type {}", names.len(), type_id);
        Ok(names)
    }

    async fn assign_property(&self, type_id: TypeId, property_name: &str) -> TaxonResult<()> {
        let url = self.endpoint(&["type-properties", &type_id.to_string()])?;
        let body = serde_json::json!({ "property_name": property_name });
        self.send_request(Method::POST, url, Some(body)).await?;
        info!("Assigned property '{}' to type {}", property_name, type_id);
        Ok(())
    }

    async fn unassign_property(&self, type_id: TypeId, property_name: &str) -> TaxonResult<()> {
        let url = self.endpoint(&["type-properties", &type_id.to_string(), property_name])?;
        self.send_request(Method::DELETE, url, None).await?;
        info!(
            "Unassigned property '{}' from type {}",
            property_name, type_id
        );
        Ok(())
    }

    async fn list_property_values(
        &self,
        type_id: TypeId,
        property_id: PropertyId,
    ) -> TaxonResult<Vec<String>> {
        let records: Vec<PropertyValuesRecord> = self
            .get_json(&[
                "property-values",
                &type_id.to_string(),
                &property_id.to_string(),
            ])
            .await?;
        Ok(records
            .into_iter()
            .next()
            .map(|r| r.values)
            .unwrap_or_default())
    }

    async fn assign_values(
        &self,
        type_id: TypeId,
        property_id: PropertyId,
        values: &[String],
    ) -> TaxonResult<()> {
        let url = self.endpoint(&[
            "property-values",
            &type_id.to_string(),
            &property_id.to_string(),
        ])?;
        let body = serde_json::json!({ "values": values });
        self.send_request(Method::POST, url, Some(body)).await?;
        info!(
            "Assigned {} value(s) to type {} property {}",
            values.len(),
            type_id,
            property_id
        );
        Ok(())
    }

    async fn remove_value(
        &self,
        type_id: TypeId,
        property_id: PropertyId,
        value: &str,
    ) -> TaxonResult<()> {
        let url = self.endpoint(&[
            "property-values",
            &type_id.to_string(),
            &property_id.to_string(),
            value,
        ])?;
        self.send_request(Method::DELETE, url, None).await?;
        info!(
            "Removed value '{}' from type {} property {}",
            value, type_id, property_id
        );
        Ok(())
    }

    async fn check_completeness(&self) -> TaxonResult<CompletenessReport> {
        let report: CompletenessReport = self.get_json(&["completeness-check"]).await?;
        info!(
            "Completeness audit: {} incomplete type(s), {} empty propert(ies)",
            report.incomplete_types.len(),
            report.properties_without_values.len()
        );
        Ok(report)
    }

    async fn classify(&self, properties: &HashMap<String, String>) -> TaxonResult<Classification> {
        let url = self.endpoint(&["classify"])?;
        let body = serde_json::json!({ "properties": properties });
        let response = self.send_request(Method::POST, url, Some(body)).await?;
        let verdict = response
            .json::<Classification>()
            .await
            .map_err(|e| GatewayError::ParseError(e.to_string()))?;
        info!("Rule-based classifier verdict: {}", verdict.type_name);
        Ok(verdict)
    }

    async fn classify_ai(
        &self,
        properties: &HashMap<String, String>,
    ) -> TaxonResult<AiClassification> {
        let url = self.endpoint(&["classify-ai"])?;
        let body = serde_json::json!({ "properties": properties });
        let response = self.send_request(Method::POST, url, Some(body)).await?;
        let verdict = response
            .json::<AiClassification>()
            .await
            .map_err(|e| GatewayError::ParseError(e.to_string()))?;
        info!("Learned-model classifier verdict: {}", verdict.type_name);
        Ok(verdict)
    }
}
