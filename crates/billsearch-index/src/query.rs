//! Lexical query specification and SQL assembly
//!
//! A [`QuerySpec`] is an immutable value; [`build_query`] turns it into SQL
//! text plus bound parameters without touching a connection.

use billsearch_core::{SearchError, SearchResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Filterable columns of the bill table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Publisher,
    Date,
    MultipleParties,
    LegisType,
    BillType,
    Congress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Text,
    Integer,
    Bool,
    Date,
}

impl Column {
    fn sql(&self) -> &'static str {
        match self {
            Column::Publisher => "ft.publisher",
            Column::Date => "ft.date",
            Column::MultipleParties => "ft.multiple_parties",
            Column::LegisType => "ft.legis_type",
            Column::BillType => "ft.file_chamber",
            Column::Congress => "ft.file_congress",
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            Column::Publisher | Column::LegisType | Column::BillType => ValueKind::Text,
            Column::Date => ValueKind::Date,
            Column::MultipleParties => ValueKind::Bool,
            Column::Congress => ValueKind::Integer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    fn sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }
}

impl FromStr for Operator {
    type Err = SearchError;

    fn from_str(s: &str) -> SearchResult<Self> {
        match s {
            "=" => Ok(Operator::Eq),
            "<" => Ok(Operator::Lt),
            ">" => Ok(Operator::Gt),
            "<=" => Ok(Operator::Le),
            ">=" => Ok(Operator::Ge),
            other => Err(SearchError::invalid(format!("unrecognized operator {other:?}"))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    Date(NaiveDate),
}

impl FilterValue {
    fn kind(&self) -> ValueKind {
        match self {
            FilterValue::Text(_) => ValueKind::Text,
            FilterValue::Integer(_) => ValueKind::Integer,
            FilterValue::Bool(_) => ValueKind::Bool,
            FilterValue::Date(_) => ValueKind::Date,
        }
    }

    fn to_sql(&self) -> Value {
        match self {
            FilterValue::Text(s) => Value::Text(s.clone()),
            FilterValue::Integer(i) => Value::Integer(*i),
            FilterValue::Bool(b) => Value::Integer(i64::from(*b)),
            FilterValue::Date(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
        }
    }
}

fn check_kind(column: Column, value: &FilterValue) -> SearchResult<()> {
    if column.kind() != value.kind() {
        return Err(SearchError::invalid(format!(
            "value {value:?} has the wrong type for column {}",
            column.sql()
        )));
    }
    Ok(())
}

/// `column operator value`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    column: Column,
    operator: Operator,
    value: FilterValue,
}

impl Comparison {
    pub fn new(column: Column, operator: Operator, value: FilterValue) -> SearchResult<Self> {
        check_kind(column, &value)?;
        Ok(Self {
            column,
            operator,
            value,
        })
    }
}

/// `column IN (values...)`
#[derive(Debug, Clone, PartialEq)]
pub struct OneOf {
    column: Column,
    values: Vec<FilterValue>,
}

impl OneOf {
    pub fn new(column: Column, values: Vec<FilterValue>) -> SearchResult<Self> {
        if values.is_empty() {
            return Err(SearchError::invalid(format!(
                "one-of filter on {} needs at least one value",
                column.sql()
            )));
        }
        for value in &values {
            check_kind(column, value)?;
        }
        Ok(Self { column, values })
    }
}

/// Everything needed to run one lexical candidate query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    terms: Vec<String>,
    limit: Option<usize>,
    comparisons: Vec<Comparison>,
    one_of: Vec<OneOf>,
    exact_matches: Vec<String>,
    bill_type: Option<String>,
}

impl QuerySpec {
    /// Terms are de-duplicated, first occurrence wins
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let terms = terms
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| !t.is_empty() && seen.insert(t.clone()))
            .collect();
        Self {
            terms,
            ..Self::default()
        }
    }

    pub fn with_limit(self, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparisons.push(comparison);
        self
    }

    pub fn with_one_of(mut self, one_of: OneOf) -> Self {
        self.one_of.push(one_of);
        self
    }

    pub fn with_exact_match(mut self, substring: impl Into<String>) -> Self {
        self.exact_matches.push(substring.into());
        self
    }

    pub fn restricted_to_bill_type(self, bill_type: impl Into<String>) -> Self {
        Self {
            bill_type: Some(bill_type.into()),
            ..self
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// FTS5 expression matching any term
    pub fn match_expression(&self) -> String {
        self.terms
            .iter()
            .map(|t| format!("\"{}\"", t.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

/// SQL text and its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Assemble the candidate query for `spec`. Selects `(bill id, bm25 score)`
/// ordered best first.
pub fn build_query(spec: &QuerySpec) -> SearchResult<BuiltQuery> {
    if spec.is_empty() {
        return Err(SearchError::invalid("query has no searchable terms"));
    }

    let limit = match spec.limit {
        Some(n) => i64::try_from(n)
            .map_err(|_| SearchError::invalid(format!("limit {n} is out of range")))?,
        None => -1,
    };

    let mut params = vec![Value::Text(spec.match_expression()), Value::Integer(limit)];
    let mut conditions = Vec::new();

    for comparison in &spec.comparisons {
        conditions.push(format!(
            "{} {} ?",
            comparison.column.sql(),
            comparison.operator.sql()
        ));
        params.push(comparison.value.to_sql());
    }

    for one_of in &spec.one_of {
        let placeholders = vec!["?"; one_of.values.len()].join(", ");
        conditions.push(format!("{} IN ({placeholders})", one_of.column.sql()));
        params.extend(one_of.values.iter().map(FilterValue::to_sql));
    }

    for substring in &spec.exact_matches {
        conditions.push(
            "(bs.summary_text LIKE ? ESCAPE '\\' OR ft.text LIKE ? ESCAPE '\\' OR ft.title LIKE ? ESCAPE '\\')"
                .to_string(),
        );
        let pattern = format!("%{}%", escape_like(substring));
        for _ in 0..3 {
            params.push(Value::Text(pattern.clone()));
        }
    }

    if let Some(bill_type) = &spec.bill_type {
        conditions.push(format!("{} = ?", Column::BillType.sql()));
        params.push(Value::Text(bill_type.clone()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}\n", conditions.join("\n  AND "))
    };

    let sql = format!(
        "SELECT ft.id, lex.score
FROM full_texts ft
JOIN (
    SELECT rowid AS ft_id, bm25(congress_bm25) AS score
    FROM congress_bm25
    WHERE congress_bm25 MATCH ?
    ORDER BY score
    LIMIT ?
) AS lex ON ft.id = lex.ft_id
LEFT JOIN bill_summaries bs ON ft.summaries_match = bs.id
{where_clause}ORDER BY lex.score, ft.id
LIMIT ?"
    );
    params.push(Value::Integer(limit));

    Ok(BuiltQuery { sql, params })
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
