//! Row types for the Postgres repository.

use diesel::prelude::*;
use serde_json::Value;

use super::schema::{schema_counter, schemas};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = schemas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SchemaRow {
    pub id: i64,
    pub user_id: i64,
    pub document: Value,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = schema_counter)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CounterRow {
    pub singleton: bool,
    pub next_id: i64,
}
