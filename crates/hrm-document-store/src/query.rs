//! Query value objects, evaluated once against a snapshot of a collection.
//!
//! Evaluation order is fixed: filter, then stable sort, then limit, then
//! column projection.

use crate::Record;
use serde_json::Value;
use std::cmp::Ordering;

/// Strict equality on one column. Filters in a query are ANDed.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// No type coercion: `1` does not match `"1"`, and a missing field never
    /// matches, not even `null`.
    pub fn matches(&self, record: &Record) -> bool {
        record.get(&self.column) == Some(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// Which fields a select returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Columns {
    #[default]
    All,
    Only(Vec<String>),
}

impl Columns {
    /// Parse `*` or a comma-separated field list. Blank entries are ignored;
    /// an empty list means all columns.
    pub fn parse(spec: &str) -> Self {
        let fields: Vec<String> = spec
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        if fields.is_empty() || fields.iter().any(|f| f == "*") {
            Self::All
        } else {
            Self::Only(fields)
        }
    }

    pub fn project(&self, record: Record) -> Record {
        match self {
            Self::All => record,
            Self::Only(fields) => {
                let mut projected = Record::new();
                for field in fields {
                    if let Some(value) = record.get(field) {
                        projected.insert(field.clone(), value.clone());
                    }
                }
                projected
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    pub columns: Columns,
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl QuerySpec {
    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    pub fn evaluate(&self, records: &[Record]) -> Vec<Record> {
        let mut rows: Vec<Record> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();

        if let Some(order) = &self.order {
            stable_sort_by(&mut rows, |a, b| {
                let ord = compare_values(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }

        rows.into_iter().map(|r| self.columns.project(r)).collect()
    }
}

/// Insertion sort that only moves an element past strictly greater ones.
///
/// `compare_values` is not a total order (a missing value equals both 1 and
/// 2), which `slice::sort_by` is allowed to panic on.
fn stable_sort_by<T>(items: &mut [T], mut compare: impl FnMut(&T, &T) -> Ordering) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Relational comparison used for ordering.
///
/// Numbers compare numerically, strings lexicographically, booleans with
/// `false < true`. Anything else (mixed types, nulls, missing fields, NaN)
/// compares equal, which leaves those rows in insertion order.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
