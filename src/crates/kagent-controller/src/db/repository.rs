//! Generic persistence over entity tables
//!
//! Every table shares `id`, `created_at` and `updated_at`; an [`Entity`]
//! describes the remaining writable columns. [`Repository`] then provides
//! list/get/create/update/delete filtered by equality [`Clause`]s.
//!
//! The free functions take any SQLite executor so the same statements can
//! run inside a transaction.

use std::fmt;
use std::marker::PhantomData;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{FromRow, QueryBuilder, SqliteExecutor};

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};

/// Columns every entity table carries
const BASE_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Current time as stored in `created_at`/`updated_at`
///
/// Fixed-width UTC with microseconds, so string order is time order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// A bindable column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
    Bool(bool),
    Json(Value),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "null"),
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Text(v) => write!(f, "{}", v),
            SqlValue::Bool(v) => write!(f, "{}", v),
            SqlValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        SqlValue::Text(v.clone())
    }
}

impl From<Value> for SqlValue {
    fn from(v: Value) -> Self {
        SqlValue::Json(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Equality filter `column = value` (`IS NULL` for [`SqlValue::Null`])
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub column: &'static str,
    pub value: SqlValue,
}

impl Clause {
    pub fn new(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    pub fn id(id: i64) -> Self {
        Self::new("id", id)
    }

    pub fn user(user_id: &str) -> Self {
        Self::new("user_id", user_id)
    }

    pub fn name(name: &str) -> Self {
        Self::new("name", name)
    }
}

fn describe(clauses: &[Clause]) -> String {
    clauses
        .iter()
        .map(|c| format!("{}={}", c.column, c.value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Row type stored in its own table
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static {
    /// Table name
    const TABLE: &'static str;

    /// Name used in error messages
    const KIND: &'static str;

    /// Writable columns, excluding `id`, `created_at` and `updated_at`
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;

    /// Values for [`Entity::COLUMNS`], in the same order
    fn values(&self) -> Vec<SqlValue>;

    fn has_column(column: &str) -> bool {
        BASE_COLUMNS.contains(&column) || Self::COLUMNS.contains(&column)
    }
}

/// Result ordering by creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    NewestFirst,
    OldestFirst,
}

impl Order {
    fn sql(self) -> &'static str {
        match self {
            Order::NewestFirst => " ORDER BY created_at DESC, id DESC",
            Order::OldestFirst => " ORDER BY created_at ASC, id ASC",
        }
    }
}

fn push_value(builder: &mut QueryBuilder<'static, Sqlite>, value: SqlValue) {
    match value {
        SqlValue::Null => {
            builder.push_bind(None::<String>);
        }
        SqlValue::Int(v) => {
            builder.push_bind(v);
        }
        SqlValue::Text(v) => {
            builder.push_bind(v);
        }
        SqlValue::Bool(v) => {
            builder.push_bind(v);
        }
        SqlValue::Json(v) => {
            builder.push_bind(sqlx::types::Json(v));
        }
    }
}

fn push_filters<T: Entity>(
    builder: &mut QueryBuilder<'static, Sqlite>,
    clauses: &[Clause],
) -> DbResult<()> {
    for (i, clause) in clauses.iter().enumerate() {
        if !T::has_column(clause.column) {
            return Err(DatabaseError::query_error(format!(
                "unknown column '{}' for {}",
                clause.column,
                T::TABLE
            )));
        }
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(clause.column);
        if clause.value == SqlValue::Null {
            builder.push(" IS NULL");
        } else {
            builder.push(" = ");
            push_value(builder, clause.value.clone());
        }
    }
    Ok(())
}

/// `SELECT` every row matching all clauses
pub async fn fetch_all<'e, T, E>(executor: E, order: Order, clauses: &[Clause]) -> DbResult<Vec<T>>
where
    T: Entity,
    E: SqliteExecutor<'e>,
{
    let mut builder = QueryBuilder::new(format!("SELECT * FROM {}", T::TABLE));
    push_filters::<T>(&mut builder, clauses)?;
    builder.push(order.sql());

    Ok(builder.build_query_as::<T>().fetch_all(executor).await?)
}

/// First row matching all clauses, or `NotFound`
pub async fn fetch_one<'e, T, E>(executor: E, clauses: &[Clause]) -> DbResult<T>
where
    T: Entity,
    E: SqliteExecutor<'e>,
{
    let mut builder = QueryBuilder::new(format!("SELECT * FROM {}", T::TABLE));
    push_filters::<T>(&mut builder, clauses)?;
    builder.push(Order::OldestFirst.sql());
    builder.push(" LIMIT 1");

    builder
        .build_query_as::<T>()
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| DatabaseError::not_found(format!("{} with {}", T::KIND, describe(clauses))))
}

/// Insert and return the stored row
pub async fn insert<'e, T, E>(executor: E, entity: &T) -> DbResult<T>
where
    T: Entity,
    E: SqliteExecutor<'e>,
{
    let values = entity.values();
    if values.len() != T::COLUMNS.len() {
        return Err(DatabaseError::query_error(format!(
            "{} produced {} values for {} columns",
            T::KIND,
            values.len(),
            T::COLUMNS.len()
        )));
    }

    let now = now_timestamp();
    let mut builder = QueryBuilder::new(format!("INSERT INTO {} (", T::TABLE));
    for column in T::COLUMNS {
        builder.push(*column);
        builder.push(", ");
    }
    builder.push("created_at, updated_at) VALUES (");
    for value in values {
        push_value(&mut builder, value);
        builder.push(", ");
    }
    builder.push_bind(now.clone());
    builder.push(", ");
    builder.push_bind(now);
    builder.push(") RETURNING *");

    Ok(builder.build_query_as::<T>().fetch_one(executor).await?)
}

/// Write every column of `entity` back to its row and refresh `updated_at`
pub async fn update_row<'e, T, E>(executor: E, entity: &T) -> DbResult<T>
where
    T: Entity,
    E: SqliteExecutor<'e>,
{
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", T::TABLE));
    for (column, value) in T::COLUMNS.iter().zip(entity.values()) {
        builder.push(*column);
        builder.push(" = ");
        push_value(&mut builder, value);
        builder.push(", ");
    }
    builder.push("updated_at = ");
    builder.push_bind(now_timestamp());
    builder.push(" WHERE id = ");
    builder.push_bind(entity.id());
    builder.push(" RETURNING *");

    builder
        .build_query_as::<T>()
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| DatabaseError::not_found(format!("{} with id={}", T::KIND, entity.id())))
}

/// Delete matching rows; zero matches is `NotFound`
pub async fn delete_where<'e, T, E>(executor: E, clauses: &[Clause]) -> DbResult<u64>
where
    T: Entity,
    E: SqliteExecutor<'e>,
{
    let affected = delete_matching::<T, E>(executor, clauses).await?;
    if affected == 0 {
        return Err(DatabaseError::not_found(format!(
            "{} with {}",
            T::KIND,
            describe(clauses)
        )));
    }
    Ok(affected)
}

/// Delete matching rows, returning how many went
pub async fn delete_matching<'e, T, E>(executor: E, clauses: &[Clause]) -> DbResult<u64>
where
    T: Entity,
    E: SqliteExecutor<'e>,
{
    if clauses.is_empty() {
        return Err(DatabaseError::query_error(format!(
            "refusing to delete from {} without a filter",
            T::TABLE
        )));
    }

    let mut builder = QueryBuilder::new(format!("DELETE FROM {}", T::TABLE));
    push_filters::<T>(&mut builder, clauses)?;

    Ok(builder.build().execute(executor).await?.rows_affected())
}

/// Typed access to one entity table
pub struct Repository<T> {
    pool: DatabasePool,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Matching rows, newest first
    pub async fn list(&self, clauses: &[Clause]) -> DbResult<Vec<T>> {
        fetch_all(&self.pool, Order::NewestFirst, clauses).await
    }

    pub async fn list_ordered(&self, order: Order, clauses: &[Clause]) -> DbResult<Vec<T>> {
        fetch_all(&self.pool, order, clauses).await
    }

    pub async fn get(&self, clauses: &[Clause]) -> DbResult<T> {
        fetch_one(&self.pool, clauses).await
    }

    pub async fn create(&self, entity: &T) -> DbResult<T> {
        insert(&self.pool, entity).await
    }

    pub async fn update(&self, entity: &T) -> DbResult<T> {
        update_row(&self.pool, entity).await
    }

    pub async fn delete(&self, clauses: &[Clause]) -> DbResult<u64> {
        delete_where::<T, _>(&self.pool, clauses).await
    }

    /// Look up a user's row by numeric id or, failing that, by name
    ///
    /// A numeric reference that matches no id is retried as a name, so
    /// entities named "42" stay reachable.
    pub async fn get_by_ref(&self, user_id: &str, reference: &str) -> DbResult<T> {
        if let Ok(id) = reference.parse::<i64>() {
            match self.get(&[Clause::id(id), Clause::user(user_id)]).await {
                Err(e) if e.is_not_found() && T::has_column("name") => {}
                other => return other,
            }
        } else if !T::has_column("name") {
            return Err(DatabaseError::not_found(format!(
                "{} with id={}",
                T::KIND,
                reference
            )));
        }

        self.get(&[Clause::name(reference), Clause::user(user_id)]).await
    }
}
