use crate::core::commission::{CommissionRecord, RawCommission, normalize_commissions};
use crate::core::partner::{PartnerSafeRecord, RawPartnerSafe, normalize_partner_safes};
use crate::core::repository::PartnerRepository;
use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

const PARTNER_SAFES_ENDPOINT: &str = "partner-safes";
const BONUSES_ENDPOINT: &str = "bonuses";

/// Reads the ledger from the back-office REST API.
pub struct RestRepository {
    base_url: String,
    client: reqwest::Client,
}

/// List endpoints answer either with a bare array or with a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListResponse<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Plain(items) => items,
            ListResponse::Paged { results } => results,
        }
    }
}

impl RestRepository {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("sarraf/0.1")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(RestRepository {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[instrument(skip(self))]
    async fn fetch_list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>> {
        let url = format!("{}/{}/", self.base_url, endpoint);
        debug!("Requesting {}", url);

        let response = with_retry(|| async { self.client.get(&url).send().await }, 3, 500)
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text from {url}"))?;

        if !status.is_success() {
            bail!("Request to {url} failed with status {status}: '{response_text}'");
        }
        if response_text.trim().is_empty() {
            return Err(anyhow!("Received empty response from {}", url));
        }

        let list: ListResponse<T> = serde_json::from_str(&response_text).with_context(|| {
            format!("Failed to parse response from {url}. Response: '{response_text}'")
        })?;
        let items = list.into_items();
        debug!("Fetched {} items from {}", items.len(), url);
        Ok(items)
    }
}

#[async_trait]
impl PartnerRepository for RestRepository {
    async fn fetch_partner_safes(&self) -> Result<Vec<PartnerSafeRecord>> {
        let raw: Vec<RawPartnerSafe> = self.fetch_list(PARTNER_SAFES_ENDPOINT).await?;
        Ok(normalize_partner_safes(raw))
    }

    async fn fetch_commissions(&self) -> Result<Vec<CommissionRecord>> {
        let raw: Vec<RawCommission> = self.fetch_list(BONUSES_ENDPOINT).await?;
        Ok(normalize_commissions(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(url_path: &str, body: &str, status: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_fetch_partner_safes_plain_list() {
        let body = r#"[
            {"id": 1, "partner": {"name": "Office A"}, "safe_type": {"name": "Main Cash", "type": "physical"},
             "total_usd": "100.50", "total_iqd": 150000, "total_usdt": null},
            {"id": 2, "partner": {"name": "Office B"}, "safe_type": {"name": "Binance", "type": "crypto"},
             "total_usd": 0, "total_iqd": 0, "total_usdt": "-20"}
        ]"#;
        let mock_server = create_mock_server("/partner-safes/", body, 200).await;

        let repository = RestRepository::new(&mock_server.uri()).unwrap();
        let records = repository.fetch_partner_safes().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].partner_name, "Office A");
        assert_eq!(records[0].total_usd, "100.50".parse::<Decimal>().unwrap());
        assert_eq!(records[0].total_usdt, Decimal::ZERO);
        assert_eq!(records[1].safe_type_name, "Binance");
        assert_eq!(records[1].total_usdt, Decimal::from(-20));
    }

    #[tokio::test]
    async fn test_fetch_partner_safes_keeps_damaged_records() {
        let body = r#"[
            {"id": 1, "partner": {"name": "Office A"}, "safe_type": {"name": "Main Cash"},
             "total_usd": "100"},
            {"id": 2, "partner": null, "safe_type": {"name": "Main Cash"}, "total_usd": 50},
            {"partner": {"name": "Office C"}, "safe_type": null, "total_usd": 1}
        ]"#;
        let mock_server = create_mock_server("/partner-safes/", body, 200).await;

        let repository = RestRepository::new(&mock_server.uri()).unwrap();
        let records = repository.fetch_partner_safes().await.unwrap();
        let totals = crate::core::aggregate_by_safe_type(&records);

        assert_eq!(records.len(), 3);
        assert_eq!(totals["Main Cash"].usd, Decimal::from(150));
        assert_eq!(totals[""].usd, Decimal::from(1));
    }

    #[tokio::test]
    async fn test_fetch_commissions_paginated() {
        let body = r#"{"count": 1, "next": null, "results": [
            {"amount": "12.5", "currency": "USD", "created_at": "2026-10-19T09:30:00Z"}
        ]}"#;
        let mock_server = create_mock_server("/bonuses/", body, 200).await;

        let repository = RestRepository::new(&format!("{}/", mock_server.uri())).unwrap();
        let records = repository.fetch_commissions().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, "12.5".parse::<Decimal>().unwrap());
    }

    #[tokio::test]
    async fn test_error_status() {
        let mock_server = create_mock_server("/partner-safes/", "Server Error", 500).await;

        let repository = RestRepository::new(&mock_server.uri()).unwrap();
        let error = repository.fetch_partner_safes().await.unwrap_err();

        let message = error.to_string();
        assert!(message.contains("failed with status 500"), "{message}");
        assert!(message.contains("Server Error"), "{message}");
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let body = r#"{ "detail": "nope" }"#;
        let mock_server = create_mock_server("/partner-safes/", body, 200).await;

        let repository = RestRepository::new(&mock_server.uri()).unwrap();
        let error = repository.fetch_partner_safes().await.unwrap_err();

        let message = error.to_string();
        assert!(message.starts_with("Failed to parse response from"), "{message}");
        assert!(message.contains(r#"Response: '{ "detail": "nope" }'"#));
    }

    #[tokio::test]
    async fn test_empty_response() {
        let mock_server = create_mock_server("/bonuses/", "", 200).await;

        let repository = RestRepository::new(&mock_server.uri()).unwrap();
        let error = repository.fetch_commissions().await.unwrap_err();

        assert_eq!(
            error.to_string(),
            format!("Received empty response from {}/bonuses/", mock_server.uri())
        );
    }
}
