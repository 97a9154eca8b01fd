//! Minimal table query description shared by every database backend.
//!
//! The shape follows what the managed database's REST layer understands
//! (`column=op.value`, `order=column.desc`, `limit=n`) so the Supabase backend
//! can forward it verbatim, while the in-memory backend evaluates it row by row.

use std::cmp::Ordering;

use serde_json::Value;

/// A single column predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    Gte(String, Value),
    Lte(String, Value),
    Lt(String, Value),
    In(String, Vec<Value>),
}

impl Filter {
    fn column(&self) -> &str {
        match self {
            Filter::Eq(column, _)
            | Filter::Gte(column, _)
            | Filter::Lte(column, _)
            | Filter::Lt(column, _)
            | Filter::In(column, _) => column,
        }
    }

    /// Evaluate the predicate against a JSON row.
    pub fn matches(&self, row: &Value) -> bool {
        let Some(actual) = row.get(self.column()) else {
            return false;
        };
        match self {
            Filter::Eq(_, expected) => compare(actual, expected) == Some(Ordering::Equal),
            Filter::Gte(_, bound) => matches!(
                compare(actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Filter::Lte(_, bound) => {
                matches!(compare(actual, bound), Some(Ordering::Less | Ordering::Equal))
            }
            Filter::Lt(_, bound) => compare(actual, bound) == Some(Ordering::Less),
            Filter::In(_, candidates) => candidates
                .iter()
                .any(|candidate| compare(actual, candidate) == Some(Ordering::Equal)),
        }
    }

    fn to_param(&self) -> (String, String) {
        let (op, rendered) = match self {
            Filter::Eq(_, value) => ("eq", render(value)),
            Filter::Gte(_, value) => ("gte", render(value)),
            Filter::Lte(_, value) => ("lte", render(value)),
            Filter::Lt(_, value) => ("lt", render(value)),
            Filter::In(_, values) => {
                let list = values
                    .iter()
                    .map(|value| match value {
                        Value::String(text) => format!("\"{}\"", text.replace('"', "\\\"")),
                        other => render(other),
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                ("in", format!("({list})"))
            }
        };
        (self.column().to_string(), format!("{op}.{rendered}"))
    }
}

/// Sort order applied before the limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Description of a select (or the row set targeted by an update).
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub columns: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    /// Start a query against `table` selecting every column.
    pub fn table(name: &str) -> Self {
        Self {
            table: name.to_string(),
            columns: None,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Restrict the returned columns (`"id, email"`).
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    /// Keep rows whose `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    /// Keep rows whose `column` is at least `value`.
    pub fn gte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gte(column.to_string(), value.into()));
        self
    }

    /// Keep rows whose `column` is at most `value`.
    pub fn lte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lte(column.to_string(), value.into()));
        self
    }

    /// Keep rows whose `column` is below `value`.
    pub fn lt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lt(column.to_string(), value.into()));
        self
    }

    /// Keep rows whose `column` is one of `values`.
    pub fn in_list<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filters.push(Filter::In(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Sort by `column`; later calls break ties.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    /// Return at most `limit` rows.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when every filter accepts the row.
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|filter| filter.matches(row))
    }

    /// Sort `rows` according to [`Query::order`]; rows missing the column sort last.
    pub fn sort(&self, rows: &mut [Value]) {
        let Some(order) = &self.order else {
            return;
        };
        rows.sort_by(|left, right| {
            let ordering = match (left.get(&order.column), right.get(&order.column)) {
                (Some(a), Some(b)) => compare(a, b).unwrap_or(Ordering::Equal),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if order.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
    }

    /// Render the filters, ordering and limit as REST query parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![(
            "select".to_string(),
            self.columns
                .as_deref()
                .map(|columns| columns.replace(' ', ""))
                .unwrap_or_else(|| "*".to_string()),
        )];
        params.extend(self.filters.iter().map(Filter::to_param));
        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{direction}", order.column)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Compare two JSON scalars the way the database would: numbers numerically,
/// strings lexically (ISO-8601 timestamps therefore order correctly).
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_compare_numbers_and_timestamps() {
        let row = json!({"casino_id": "c1", "score": 42, "created_at": "2025-03-01T10:00:00Z"});

        assert!(Query::table("t").eq("casino_id", "c1").matches(&row));
        assert!(Query::table("t").eq("score", 42.0).matches(&row));
        assert!(Query::table("t").gte("score", 42).lte("score", 50).matches(&row));
        assert!(!Query::table("t").lt("score", 42).matches(&row));
        assert!(
            Query::table("t")
                .lt("created_at", "2025-04-01")
                .matches(&row)
        );
        assert!(Query::table("t").in_list("score", [1, 42]).matches(&row));
        assert!(!Query::table("t").eq("missing", "x").matches(&row));
    }

    #[test]
    fn sort_descending_puts_missing_columns_last() {
        let mut rows = vec![
            json!({"id": 1, "at": "2025-01-01"}),
            json!({"id": 2}),
            json!({"id": 3, "at": "2025-02-01"}),
        ];
        Query::table("t").order("at", false).sort(&mut rows);
        let ids: Vec<_> = rows.iter().map(|row| row["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn renders_rest_parameters() {
        let params = Query::table("behavioral_risk_profiles")
            .select("id, risk_score")
            .eq("player_id", "p-1")
            .in_list("principle_number", [1, 2])
            .order("analyzed_at", false)
            .limit(10)
            .to_params();

        assert_eq!(
            params,
            vec![
                ("select".to_string(), "id,risk_score".to_string()),
                ("player_id".to_string(), "eq.p-1".to_string()),
                ("principle_number".to_string(), "in.(1,2)".to_string()),
                ("order".to_string(), "analyzed_at.desc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }
}
