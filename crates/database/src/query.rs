//! Filtered, ordered record fetching over the finance collections.
//!
//! Column names are never taken from callers verbatim: each collection carries
//! a whitelist and anything outside it is rejected before SQL is built. Values
//! are always bound.

use crate::{Connection, Driver, RepositoryError};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Expenses,
    Income,
    MonthlyBudgets,
    Accounts,
    ExpenseCategories,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Expenses => "expenses",
            Collection::Income => "income",
            Collection::MonthlyBudgets => "monthly_budgets",
            Collection::Accounts => "accounts",
            Collection::ExpenseCategories => "expense_categories",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Collection::Expenses => &[
                "id", "user_id", "name", "amount", "expense_date", "notes", "category_id", "budget_id",
            ],
            Collection::Income => &[
                "id", "user_id", "name", "amount", "frequency", "income_date", "is_recurring",
            ],
            Collection::MonthlyBudgets => &[
                "id", "user_id", "name", "month", "year", "budgeted_amount", "category_id",
            ],
            Collection::Accounts => &[
                "id", "user_id", "name", "account_type", "balance", "is_active",
            ],
            Collection::ExpenseCategories => &["id", "user_id", "name", "icon", "color"],
        }
    }

    fn has_column(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

impl FilterOp {
    fn as_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => " = ",
            FilterOp::Gte => " >= ",
            FilterOp::Lte => " <= ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self { column, op: FilterOp::Eq, value: value.into() }
    }

    pub fn gte(column: &'static str, value: impl Into<Value>) -> Self {
        Self { column, op: FilterOp::Gte, value: value.into() }
    }

    pub fn lte(column: &'static str, value: impl Into<Value>) -> Self {
        Self { column, op: FilterOp::Lte, value: value.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuerySpec {
    collection: Collection,
    filters: Vec<Filter>,
    order_by: Option<(&'static str, Direction)>,
    limit: Option<u32>,
}

impl QuerySpec {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds the filter only when `value` is present.
    pub fn filter_opt<V: Into<Value>>(
        self,
        value: Option<V>,
        make: impl FnOnce(V) -> Filter,
    ) -> Self {
        match value {
            Some(v) => self.filter(make(v)),
            None => self,
        }
    }

    pub fn order_by(mut self, column: &'static str, direction: Direction) -> Self {
        self.order_by = Some((column, direction));
        self
    }

    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        let columns = self
            .filters
            .iter()
            .map(|f| f.column)
            .chain(self.order_by.map(|(c, _)| c));

        for column in columns {
            if !self.collection.has_column(column) {
                return Err(RepositoryError::InvalidQuery(format!(
                    "{}.{}",
                    self.collection.table(),
                    column
                )));
            }
        }
        Ok(())
    }

    pub fn build(&self) -> Result<QueryBuilder<'static, Driver>, RepositoryError> {
        self.validate()?;

        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM {}",
            self.collection.columns().join(", "),
            self.collection.table()
        ));

        for (i, filter) in self.filters.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            qb.push(filter.column).push(filter.op.as_sql());
            match &filter.value {
                Value::Int(v) => qb.push_bind(*v),
                Value::Text(v) => qb.push_bind(v.clone()),
                Value::Bool(v) => qb.push_bind(*v),
            };
        }

        if let Some((column, direction)) = self.order_by {
            qb.push(format!(" ORDER BY {} {}", column, direction.as_sql()));
            // Stable order for rows sharing the sort key
            if column != "id" {
                qb.push(", id ASC");
            }
        }

        if let Some(limit) = self.limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }

        Ok(qb)
    }

    pub async fn fetch_all<T>(&self, conn: &mut Connection) -> Result<Vec<T>, RepositoryError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut qb = self.build()?;
        let rows = qb.build_query_as::<T>().fetch_all(&mut *conn).await?;
        Ok(rows)
    }
}
