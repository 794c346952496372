//! Row-level table access over `/rest/v1/{table}`.

use crate::{AuthClient, BackendClient, BackendResult, REST_PATH};

use std::fmt::Display;
use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

const SINGLE_OBJECT_ACCEPT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";
const RETURN_MINIMAL: &str = "return=minimal";

/// Entry point for table queries, authenticated as the current session
#[derive(Clone)]
pub struct Database {
    client: BackendClient,
    auth: Arc<AuthClient>,
}

impl Database {
    pub fn new(client: BackendClient, auth: Arc<AuthClient>) -> Self {
        Self { client, auth }
    }

    pub fn from(&self, table: &str) -> TableQuery {
        TableQuery {
            client: self.client.clone(),
            auth: Arc::clone(&self.auth),
            table: table.to_string(),
            operation: Operation::Select(String::from("*")),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            single: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Operation {
    Select(String),
    Insert(Value),
    Update(Value),
    Delete,
}

/// Builder for one request against a table.
///
/// Filters use the `column=op.value` query syntax, e.g. `id=eq.42`.
pub struct TableQuery {
    client: BackendClient,
    auth: Arc<AuthClient>,
    table: String,
    operation: Operation,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
    single: bool,
}

impl TableQuery {
    pub fn select(mut self, columns: &str) -> Self {
        self.operation = Operation::Select(columns.to_string());
        self
    }

    pub fn insert<T: Serialize>(mut self, row: &T) -> BackendResult<Self> {
        self.operation = Operation::Insert(serde_json::to_value(row)?);
        Ok(self)
    }

    pub fn update<T: Serialize>(mut self, changes: &T) -> BackendResult<Self> {
        self.operation = Operation::Update(serde_json::to_value(changes)?);
        Ok(self)
    }

    pub fn delete(mut self) -> Self {
        self.operation = Operation::Delete;
        self
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn neq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "neq", value)
    }

    pub fn gt(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gt", value)
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lt(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lt", value)
    }

    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lte", value)
    }

    /// `%` wildcards, case-sensitive
    pub fn like(self, column: &str, pattern: &str) -> Self {
        self.filter(column, "like", pattern)
    }

    pub fn ilike(self, column: &str, pattern: &str) -> Self {
        self.filter(column, "ilike", pattern)
    }

    /// `null`, `true` or `false`
    pub fn is(self, column: &str, value: &str) -> Self {
        self.filter(column, "is", value)
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{column}.{direction}"));
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }

    /// Expect exactly one row back as an object. Zero rows fail with
    /// `BackendError::NotFound`.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    fn filter(mut self, column: &str, op: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("{op}.{value}")));
        self
    }

    /// Query-string pairs this request will send
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Operation::Select(columns) = &self.operation {
            pairs.push((String::from("select"), columns.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            pairs.push((String::from("order"), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push((String::from("limit"), limit.to_string()));
        }

        pairs
    }

    /// Run the request and decode the rows (or the single row).
    ///
    /// Writes ask for the affected rows back.
    pub async fn execute<T: DeserializeOwned>(self) -> BackendResult<T> {
        let body = self.send(RETURN_REPRESENTATION).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Run the request, discarding any response body
    pub async fn execute_empty(self) -> BackendResult<()> {
        self.send(RETURN_MINIMAL).await?;
        Ok(())
    }

    async fn send(self, prefer: &str) -> BackendResult<Value> {
        let lookup = self.auth.current_session().await?;
        let access_token = lookup.session.as_ref().map(|s| s.access_token.as_str());

        let path = format!("{REST_PATH}/{}", self.table);
        let pairs = self.query_pairs();

        let method = match &self.operation {
            Operation::Select(_) => Method::GET,
            Operation::Insert(_) => Method::POST,
            Operation::Update(_) => Method::PATCH,
            Operation::Delete => Method::DELETE,
        };

        let mut req = self.client.request(method, &path, access_token).query(&pairs);

        req = match &self.operation {
            Operation::Select(_) => req,
            Operation::Insert(row) | Operation::Update(row) => {
                req.header("Prefer", prefer).json(row)
            }
            Operation::Delete => req.header("Prefer", prefer),
        };

        if self.single {
            req = req.header("Accept", SINGLE_OBJECT_ACCEPT);
        }

        log::debug!("{} {} {:?}", self.table, operation_name(&self.operation), pairs);
        self.client.execute(req).await
    }
}

fn operation_name(operation: &Operation) -> &'static str {
    match operation {
        Operation::Select(_) => "select",
        Operation::Insert(_) => "insert",
        Operation::Update(_) => "update",
        Operation::Delete => "delete",
    }
}
