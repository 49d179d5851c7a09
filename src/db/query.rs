// Filtered-projection query builder
//
// Builds PostgREST read requests against a named table: projection (including
// embedded-resource joins), column filters, ordering and a result cap.
// Execution degrades to "no results" on store faults so a single failing read
// never takes down the surrounding tool call.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

use super::client::SupabaseClient;

/// Default result cap for filtered reads.
const DEFAULT_LIMIT: usize = 100;

/// Closed set of filter operators, rendered to PostgREST operator syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(Value),
    Neq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    /// Case-insensitive substring match; the needle is wrapped in wildcards.
    Ilike(String),
    In(Vec<Value>),
}

impl Filter {
    /// Equality on a string value.
    pub fn eq(value: impl Into<String>) -> Self {
        Filter::Eq(Value::String(value.into()))
    }

    /// Case-insensitive contains.
    pub fn contains(needle: impl Into<String>) -> Self {
        Filter::Ilike(needle.into())
    }

    fn render(&self) -> String {
        match self {
            Filter::Eq(v) => format!("eq.{}", literal(v)),
            Filter::Neq(v) => format!("neq.{}", literal(v)),
            Filter::Gt(v) => format!("gt.{}", literal(v)),
            Filter::Gte(v) => format!("gte.{}", literal(v)),
            Filter::Lt(v) => format!("lt.{}", literal(v)),
            Filter::Lte(v) => format!("lte.{}", literal(v)),
            Filter::Ilike(needle) => format!("ilike.*{}*", needle),
            Filter::In(values) => {
                let items: Vec<String> = values.iter().map(literal).collect();
                format!("in.({})", items.join(","))
            }
        }
    }
}

/// Render a JSON value as a PostgREST literal (strings unquoted).
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

impl OrderDirection {
    fn suffix(self) -> &'static str {
        match self {
            OrderDirection::Ascending => "asc",
            OrderDirection::Descending => "desc",
        }
    }
}

/// A pending read against one table.
#[derive(Debug, Clone)]
pub struct TableQuery {
    client: SupabaseClient,
    table: String,
    select: String,
    filters: Vec<(String, Filter)>,
    order: Option<(String, OrderDirection)>,
    limit: usize,
}

impl TableQuery {
    pub(crate) fn new(client: SupabaseClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            select: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Set the projection. Accepts embedded-resource joins, e.g.
    /// `*, professor:usuarios!turmas_professor_id_fkey(id, nome, email)`.
    pub fn select(mut self, projection: &str) -> Self {
        self.select = projection.to_string();
        self
    }

    pub fn filter(mut self, column: &str, filter: Filter) -> Self {
        self.filters.push((column.to_string(), filter));
        self
    }

    pub fn order(mut self, column: &str, direction: OrderDirection) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Render the query string parameters sent to the store.
    fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.select.clone())];
        for (column, filter) in &self.filters {
            params.push((column.clone(), filter.render()));
        }
        if let Some((column, direction)) = &self.order {
            params.push(("order".to_string(), format!("{}.{}", column, direction.suffix())));
        }
        params.push(("limit".to_string(), self.limit.to_string()));
        params
    }

    /// Execute the read, swallowing store faults.
    ///
    /// Returns the matched rows, or an empty vec on no match or on any
    /// execution fault. Faults are logged, not propagated.
    pub async fn fetch(self) -> Vec<Value> {
        let table = self.table.clone();
        match self.try_fetch().await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(table = %table, error = %e, "store read failed, returning no results");
                Vec::new()
            }
        }
    }

    /// Execute the read, propagating store faults to the caller.
    pub async fn try_fetch(self) -> Result<Vec<Value>> {
        let url = self.client.rest_url(&self.table);
        let response = self
            .client
            .request(&url)
            .query(&self.params())
            .send()
            .await
            .with_context(|| format!("failed to query table '{}'", self.table))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("store returned {} for table '{}': {}", status, self.table, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("failed to decode rows from table '{}'", self.table))
    }

    /// Execute as an exact-count query. Returns 0 on any fault.
    pub async fn count(self) -> u64 {
        match self.try_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(table = %self.table, error = %e, "count query failed, returning 0");
                0
            }
        }
    }

    async fn try_count(&self) -> Result<u64> {
        let url = self.client.rest_url(&self.table);
        let mut params = vec![("select".to_string(), "id".to_string())];
        for (column, filter) in &self.filters {
            params.push((column.clone(), filter.render()));
        }
        params.push(("limit".to_string(), "1".to_string()));

        let response = self
            .client
            .request(&url)
            .header("Prefer", "count=exact")
            .query(&params)
            .send()
            .await
            .with_context(|| format!("failed to count table '{}'", self.table))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("store returned {} counting table '{}'", status, self.table);
        }

        let range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .with_context(|| format!("missing Content-Range counting table '{}'", self.table))?;

        parse_content_range(range)
            .with_context(|| format!("unparseable Content-Range '{}' for table '{}'", range, self.table))
    }
}

/// Extract the total from a `Content-Range` header such as `0-24/3573`.
fn parse_content_range(range: &str) -> Option<u64> {
    let total = range.rsplit('/').next()?;
    total.parse().ok()
}
