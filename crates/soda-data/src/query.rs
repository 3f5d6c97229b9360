//! Fluent SoQL query builder.
//!
//! Builds the URL query-string clauses SODA understands (`$select`, `$where`,
//! `$order`, `$group`, `$having`, `$limit`, `$offset`, `$q`) through chainable
//! methods and serializes them into a string ready to be appended to a
//! resource URL.
//!
//! # Example
//!
//! ```rust
//! use soda_data::{OrderDirection, SoqlQuery};
//!
//! let query = SoqlQuery::new()
//!     .select(&["date_posted", "state", "sample_type"])
//!     .where_clause("state = 'AR'")
//!     .order("date_posted", OrderDirection::Descending)
//!     .limit(50)
//!     .unwrap();
//!
//! let query_string = query.to_query_string();
//! assert!(query_string.contains("$where=state%20%3D%20%27AR%27"));
//! ```

use std::fmt;
use std::str::FromStr;

use soda_client::{Error, ErrorKind, Result};

/// The `$select` clause key.
const SELECT_KEY: &str = "$select";
/// The `$where` clause key.
const WHERE_KEY: &str = "$where";
/// The `$order` clause key.
const ORDER_KEY: &str = "$order";
/// The `$group` clause key.
const GROUP_KEY: &str = "$group";
/// The `$having` clause key.
const HAVING_KEY: &str = "$having";
/// The `$limit` clause key.
const LIMIT_KEY: &str = "$limit";
/// The `$offset` clause key.
const OFFSET_KEY: &str = "$offset";
/// The full-text search (`$q`) clause key.
const SEARCH_KEY: &str = "$q";

/// Delimiter used to join multiple values within one clause.
const DELIMITER: &str = ",";

/// Default `$select` value: all columns.
const DEFAULT_SELECT: &str = "*";

/// Default `$order` value: the internal row identifier, ascending.
const DEFAULT_ORDER: &str = ":id ASC";

/// Maximum number of results a single query may request.
pub const MAX_LIMIT: u32 = 1000;

/// Sort direction for the `$order` clause.
///
/// Parsing a string into this enum is the validation boundary; anything other
/// than `ASC`/`DESC` (case-insensitive) fails with a validation error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderDirection {
    /// The token SODA expects in the `$order` clause.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Ascending => "ASC",
            OrderDirection::Descending => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(OrderDirection::Ascending),
            "DESC" => Ok(OrderDirection::Descending),
            other => Err(Error::new(ErrorKind::InvalidArgument(format!(
                "invalid sort order '{other}'; only ASC or DESC are supported"
            )))),
        }
    }
}

/// A SoQL query assembled through chainable clause setters.
///
/// Unset clauses are omitted from the serialized output, except `$select` and
/// `$order` which default to "all columns" and "internal row id, ascending".
/// Two queries with identical effective state serialize identically;
/// `PartialEq` compares that effective state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoqlQuery {
    select: Option<Vec<String>>,
    where_clause: Option<String>,
    having: Option<String>,
    order: Vec<String>,
    group: Vec<String>,
    offset: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
}

impl SoqlQuery {
    /// Create a query with all clauses at their defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select specific columns. Overwrites any previous select clause.
    ///
    /// An empty slice selects all columns, the same as never calling this.
    pub fn select(mut self, columns: &[impl AsRef<str>]) -> Self {
        if columns.is_empty() {
            // Same effective state as never selecting: all columns.
            self.select = None;
        } else {
            self.select = Some(columns.iter().map(|c| c.as_ref().to_string()).collect());
        }
        self
    }

    /// Select columns with optional aliases, preserving the given order.
    /// Overwrites any previous select clause.
    ///
    /// An entry `("b", Some("bAlias"))` renders as `b AS bAlias`
    /// (percent-encoded); `("a", None)` renders `a` verbatim.
    pub fn select_as(mut self, columns: &[(&str, Option<&str>)]) -> Self {
        let entries = columns
            .iter()
            .map(|(column, alias)| match alias {
                Some(alias) => {
                    urlencoding::encode(&format!("{} AS {}", column.trim(), alias.trim()))
                        .into_owned()
                }
                None => column.to_string(),
            })
            .collect();

        self.select = Some(entries);
        self
    }

    /// Filter rows with a raw SoQL predicate, e.g. `magnitude > 3.0 AND
    /// source = 'pr'`. Overwrites any previous where clause; combine multiple
    /// conditions with SoQL operators instead of repeated calls.
    ///
    /// The expression body is not escaped, only percent-encoded as a whole on
    /// serialization.
    pub fn where_clause(mut self, statement: impl AsRef<str>) -> Self {
        self.where_clause = Some(urlencoding::encode(statement.as_ref()).into_owned());
        self
    }

    /// Filter aggregated results, the SQL `HAVING` analog. Must be combined
    /// with [`group`](Self::group). Overwrites any previous having clause.
    pub fn having(mut self, statement: impl AsRef<str>) -> Self {
        self.having = Some(urlencoding::encode(statement.as_ref()).into_owned());
        self
    }

    /// Sort by a column. Repeated calls accumulate: each later call breaks
    /// ties left by the previous ones.
    ///
    /// Legacy (v1) backends only honor a single order clause server-side and
    /// reject multi-column ordering with a domain error; the client does not
    /// pre-validate that.
    pub fn order(mut self, column: impl AsRef<str>, direction: OrderDirection) -> Self {
        let entry = format!("{} {}", column.as_ref(), direction);
        self.order.push(urlencoding::encode(&entry).into_owned());
        self
    }

    /// Group results by a column. Repeated calls accumulate, serialized as a
    /// comma-joined list in call order. Use together with an aggregate
    /// [`select`](Self::select), e.g. `select(&["region", "MAX(magnitude)"])`.
    pub fn group(mut self, column: impl AsRef<str>) -> Self {
        self.group.push(column.as_ref().to_string());
        self
    }

    /// Limit the number of returned results.
    ///
    /// Zero is rejected with a validation error; values above [`MAX_LIMIT`]
    /// are clamped to it.
    pub fn limit(mut self, limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(Error::new(ErrorKind::InvalidArgument(
                "the limit must be a positive integer".to_string(),
            )));
        }

        self.limit = Some(limit.min(MAX_LIMIT));
        Ok(self)
    }

    /// Skip the first `offset` rows, indexed at 0. Page through a dataset by
    /// combining this with [`limit`](Self::limit).
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Search the entire dataset for a phrase, like a search engine rather
    /// than a structured predicate.
    pub fn full_text_search(mut self, needle: impl AsRef<str>) -> Self {
        self.search = Some(urlencoding::encode(needle.as_ref()).into_owned());
        self
    }

    /// Serialize into a query string ready to be appended to a resource URL.
    ///
    /// Clauses appear in a fixed canonical order (`$select`, `$order`,
    /// `$where`, `$having`, `$group`, `$offset`, `$limit`, `$q`) so that
    /// identical effective state always yields an identical string.
    pub fn to_query_string(&self) -> String {
        let mut clauses: Vec<String> = Vec::new();

        let select = match &self.select {
            Some(entries) => entries.join(DELIMITER),
            None => DEFAULT_SELECT.to_string(),
        };
        clauses.push(format!("{SELECT_KEY}={select}"));

        let order = if self.order.is_empty() {
            urlencoding::encode(DEFAULT_ORDER).into_owned()
        } else {
            self.order.join(DELIMITER)
        };
        clauses.push(format!("{ORDER_KEY}={order}"));

        if let Some(where_clause) = &self.where_clause {
            clauses.push(format!("{WHERE_KEY}={where_clause}"));
        }

        if let Some(having) = &self.having {
            clauses.push(format!("{HAVING_KEY}={having}"));
        }

        if !self.group.is_empty() {
            clauses.push(format!("{GROUP_KEY}={}", self.group.join(DELIMITER)));
        }

        if let Some(offset) = self.offset {
            clauses.push(format!("{OFFSET_KEY}={offset}"));
        }

        if let Some(limit) = self.limit {
            clauses.push(format!("{LIMIT_KEY}={limit}"));
        }

        if let Some(search) = &self.search {
            clauses.push(format!("{SEARCH_KEY}={search}"));
        }

        clauses.join("&")
    }
}

impl fmt::Display for SoqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
