use crate::adapters::http::{endpoint, execute_json};
use crate::domain::model::{ProfessionalFilter, ProfessionalRecord};
use crate::domain::ports::{ConfigProvider, ProfessionalDirectory};
use crate::utils::error::{LawMateError, QueryError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TABLE: &str = "legal_professionals";

/// 透過託管資料庫的 REST 介面（PostgREST 風格）讀取專業人士
#[derive(Debug, Clone)]
pub struct RestRegistry {
    client: Client,
    base_url: String,
    access_key: String,
    table: String,
    timeout: Option<Duration>,
}

impl RestRegistry {
    pub fn new(base_url: &str, access_key: &str) -> Result<Self> {
        validate_url("registry.url", base_url)?;
        validate_non_empty_string("registry.access_key", access_key)?;

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            table: DEFAULT_TABLE.to_string(),
            timeout: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let url = config
            .registry_url()
            .ok_or_else(|| LawMateError::MissingConfigError {
                field: "registry.url".to_string(),
            })?;
        let key = config
            .registry_key()
            .ok_or_else(|| LawMateError::MissingConfigError {
                field: "registry.access_key".to_string(),
            })?;

        let mut registry = Self::new(url, key)?.with_table(config.registry_table());
        registry.timeout = config.request_timeout();
        Ok(registry)
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn table_url(&self) -> String {
        endpoint(&self.base_url, &["rest", "v1", &self.table])
    }

    /// PostgREST 等值篩選參數
    fn query_params(filter: &ProfessionalFilter) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("service_slug", format!("eq.{}", filter.service.as_str())),
            ("verified", "eq.true".to_string()),
        ];
        if let Some(city) = &filter.city {
            params.push(("city", format!("eq.{}", city)));
        }
        params
    }
}

#[async_trait]
impl ProfessionalDirectory for RestRegistry {
    async fn query(
        &self,
        filter: &ProfessionalFilter,
    ) -> std::result::Result<Vec<ProfessionalRecord>, QueryError> {
        let url = self.table_url();
        tracing::debug!("Querying registry {} for service '{}'", url, filter.service);

        let request = self
            .client
            .get(&url)
            .query(&Self::query_params(filter))
            .header("apikey", &self.access_key)
            .bearer_auth(&self.access_key)
            .header("Accept", "application/json");

        let body = execute_json(request, self.timeout).await?;
        serde_json::from_value(body)
            .map_err(|e| QueryError::Upstream(format!("Unexpected registry payload: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_new_rejects_missing_key() {
        assert!(RestRegistry::new("https://db.example.co", "").is_err());
        assert!(RestRegistry::new("not a url", "key").is_err());
    }

    #[tokio::test]
    async fn test_query_sends_both_mandatory_filters() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/legal_professionals")
                .query_param("select", "*")
                .query_param("service_slug", "eq.divorce-law")
                .query_param("verified", "eq.true")
                .header("apikey", "anon-key")
                .header("authorization", "Bearer anon-key");
            then.status(200).json_body(serde_json::json!([
                {
                    "id": 3,
                    "name": "Adv. Kavya Menon",
                    "specialization": "Matrimonial disputes",
                    "experience_years": 9,
                    "city": "Kochi",
                    "service_slug": "divorce-law",
                    "verified": true
                }
            ]));
        });

        let registry = RestRegistry::new(&server.base_url(), "anon-key").unwrap();
        let records = registry
            .query(&ProfessionalFilter::for_service("divorce-law".into()))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Adv. Kavya Menon");
    }

    #[tokio::test]
    async fn test_query_adds_city_filter() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/legal_professionals")
                .query_param("service_slug", "eq.consultation")
                .query_param("verified", "eq.true")
                .query_param("city", "eq.Pune");
            then.status(200).json_body(serde_json::json!([]));
        });

        let registry = RestRegistry::new(&server.base_url(), "anon-key").unwrap();
        let filter = ProfessionalFilter::for_service("consultation".into()).with_city("Pune");
        let records = registry.query(&filter).await.unwrap();

        api_mock.assert();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_query_surfaces_registry_error_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/legal_professionals");
            then.status(401)
                .json_body(serde_json::json!({"message": "Invalid API key"}));
        });

        let registry = RestRegistry::new(&server.base_url(), "wrong").unwrap();
        let err = registry
            .query(&ProfessionalFilter::for_service("wills".into()))
            .await
            .unwrap_err();

        match err {
            QueryError::Upstream(message) => assert!(message.contains("Invalid API key")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
