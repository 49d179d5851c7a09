// Supabase store client
//
// Thin reqwest wrapper over the PostgREST interface: filtered table reads via
// TableQuery, plus the constrained raw-query escape hatch. Read-only from this
// system's perspective.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::time::Duration;

use super::query::TableQuery;
use super::validate::validate_read_only;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, service_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to create HTTP client for the store")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }

    /// Start a filtered read against a named table.
    pub fn table(&self, name: &str) -> TableQuery {
        TableQuery::new(self.clone(), name)
    }

    /// Run a raw read statement through the `execute_readonly_query` RPC.
    ///
    /// The statement is validated first; anything that is not a plain SELECT
    /// is rejected before execution. Unlike filtered reads, faults on this
    /// path propagate to the caller.
    pub async fn execute_readonly(&self, sql: &str) -> Result<Vec<Value>> {
        validate_read_only(sql)?;

        let url = format!("{}/rest/v1/rpc/execute_readonly_query", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .json(&json!({ "query_text": sql }))
            .send()
            .await
            .context("failed to execute raw read query")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("raw read query failed with {}: {}", status, body);
        }

        let rows: Value = response
            .json()
            .await
            .context("failed to decode raw query result")?;

        match rows {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            other => Ok(vec![other]),
        }
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn request(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SupabaseClient::new("https://project.supabase.co", "key");
        assert!(client.is_ok());
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let client = SupabaseClient::new("https://project.supabase.co/", "key").unwrap();
        assert_eq!(
            client.rest_url("alunos"),
            "https://project.supabase.co/rest/v1/alunos"
        );
    }

    #[tokio::test]
    async fn test_mutating_statement_rejected_without_network() {
        // Unroutable base URL: a rejected statement must fail validation
        // before any request is attempted.
        let client = SupabaseClient::new("http://192.0.2.1", "key").unwrap();
        let err = client.execute_readonly("DELETE FROM alunos").await.unwrap_err();
        assert!(err.to_string().contains("SELECT"));
    }
}
