//! Declarative table definitions for the user-domain tables.
//!
//! The production schema is owned elsewhere; these definitions mirror the
//! columns the repositories read and write so a local or test database can
//! be bootstrapped with [`Schema::create`].

use rusqlite::Connection;

/// Schema definition for the SQLite database
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }

    pub fn table(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Render every table and index as idempotent DDL.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        for table in &self.tables {
            sql.push_str(&table.create_sql());
            sql.push('\n');
            for index in &table.indexes {
                sql.push_str(&index.create_sql(&table.name));
                sql.push('\n');
            }
        }
        sql
    }

    pub fn create(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(&self.to_sql())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    /// Start a table with an `id INTEGER PRIMARY KEY` column.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: vec![ColumnDefinition::new("id", DataType::Integer)
                .constraint(ColumnConstraint::PrimaryKey)],
            indexes: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn index(mut self, columns: &[&str]) -> Self {
        let name = format!("idx_{}_{}", self.name, columns.join("_"));
        self.indexes.push(IndexDefinition {
            name,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            unique: false,
        });
        self
    }

    pub fn unique_index(mut self, columns: &[&str]) -> Self {
        let name = format!("uq_{}_{}", self.name, columns.join("_"));
        self.indexes.push(IndexDefinition {
            name,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            unique: true,
        });
        self
    }

    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| c.to_sql()).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name,
            columns.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
    pub default_value: Option<DefaultValue>,
}

impl ColumnDefinition {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            constraints: Vec::new(),
            default_value: None,
        }
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, DataType::Integer)
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, DataType::Text)
    }

    pub fn constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn not_null(self) -> Self {
        self.constraint(ColumnConstraint::NotNull)
    }

    pub fn with_default(mut self, value: DefaultValue) -> Self {
        self.default_value = Some(value);
        self
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.as_sql());
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(constraint.as_sql());
        }
        if let Some(default) = &self.default_value {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default.to_sql());
        }
        sql
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Text,
}

impl DataType {
    fn as_sql(&self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnConstraint {
    PrimaryKey,
    NotNull,
}

impl ColumnConstraint {
    fn as_sql(&self) -> &'static str {
        match self {
            ColumnConstraint::PrimaryKey => "PRIMARY KEY",
            ColumnConstraint::NotNull => "NOT NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Integer(i64),
    Text(String),
    Null,
    CurrentTimestamp,
}

impl DefaultValue {
    fn to_sql(&self) -> String {
        match self {
            DefaultValue::Integer(v) => v.to_string(),
            DefaultValue::Text(v) => format!("'{}'", v.replace('\'', "''")),
            DefaultValue::Null => "NULL".to_string(),
            DefaultValue::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl IndexDefinition {
    fn create_sql(&self, table: &str) -> String {
        format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {}({});",
            if self.unique { "UNIQUE " } else { "" },
            self.name,
            table,
            self.columns.join(", ")
        )
    }
}

fn int(name: &str) -> ColumnDefinition {
    ColumnDefinition::integer(name)
}

fn flag(name: &str) -> ColumnDefinition {
    ColumnDefinition::integer(name)
        .not_null()
        .with_default(DefaultValue::Integer(0))
}

fn text(name: &str) -> ColumnDefinition {
    ColumnDefinition::text(name)
}

fn created_at() -> ColumnDefinition {
    ColumnDefinition::text("created_at")
        .not_null()
        .with_default(DefaultValue::CurrentTimestamp)
}

fn quota_columns(
    table: TableDefinition,
    prefix: &str,
    column: fn(&str) -> ColumnDefinition,
) -> TableDefinition {
    ["brand", "ec", "ezec"].iter().fold(table, |t, kind| {
        let name = if prefix.is_empty() {
            format!("{kind}_quota")
        } else {
            format!("{prefix}_{kind}_quota")
        };
        t.column(column(&name))
    })
}

/// Grant quota columns stay NULL unless the grant carries a site quota.
fn optional_quota(name: &str) -> ColumnDefinition {
    int(name).with_default(DefaultValue::Null)
}

/// Every table the repositories touch.
pub fn user_domain_schema() -> Schema {
    let roles = quota_columns(
        TableDefinition::new("roles")
            .column(text("unique_name").not_null())
            .column(text("display_name"))
            .unique_index(&["unique_name"]),
        "",
        flag,
    );

    let user_permissions = ["original", "available", "used"].iter().fold(
        TableDefinition::new("user_permissions")
            .column(int("user_id").not_null())
            .column(int("permissions_id").not_null())
            .index(&["user_id", "permissions_id"]),
        |t, prefix| quota_columns(t, prefix, optional_quota),
    );

    Schema::new()
        .add_table(
            TableDefinition::new("users")
                .column(text("uuid").not_null())
                .column(text("email").not_null())
                .column(flag("provider_type"))
                .column(text("avatar"))
                .column(text("name"))
                .column(text("locale"))
                .column(created_at())
                .unique_index(&["uuid"]),
        )
        .add_table(roles)
        .add_table(
            TableDefinition::new("user_roles")
                .column(int("user_id").not_null())
                .column(int("role_id").not_null())
                .index(&["user_id"]),
        )
        .add_table(
            TableDefinition::new("permissions")
                .column(text("unique_name").not_null())
                .column(text("display_name"))
                .unique_index(&["unique_name"]),
        )
        .add_table(
            TableDefinition::new("role_permissions")
                .column(int("role_id").not_null())
                .column(int("permissions_id").not_null())
                .index(&["role_id"]),
        )
        .add_table(user_permissions)
        .add_table(
            TableDefinition::new("services")
                .column(text("unique_name"))
                .column(text("text").not_null().with_default(DefaultValue::Text("{}".into()))),
        )
        .add_table(
            TableDefinition::new("service_permissions")
                .column(int("service_id").not_null())
                .column(int("permissions_id").not_null())
                .index(&["service_id"]),
        )
        .add_table(
            TableDefinition::new("user_services")
                .column(int("user_id").not_null())
                .column(int("service_id").not_null())
                .column(text("activated_at"))
                .column(text("expire_at"))
                .column(flag("deactivate"))
                .column(flag("has_exceed"))
                .index(&["user_id"]),
        )
        .add_table(
            TableDefinition::new("crm_helpers")
                .column(int("user_id").not_null())
                .column(int("owner_id"))
                .column(created_at())
                .column(text("deleted_at"))
                .index(&["user_id"]),
        )
        .add_table(
            TableDefinition::new("helper_permissions")
                .column(int("helper_id").not_null())
                .column(int("permissions_id").not_null())
                .index(&["helper_id"]),
        )
        .add_table(
            TableDefinition::new("user_extra_crm")
                .column(int("user_id").not_null())
                .column(int("report_status"))
                .unique_index(&["user_id"]),
        )
        .add_table(
            TableDefinition::new("sites")
                .column(text("name"))
                .column(text("custom_domain"))
                .column(flag("is_subdomain"))
                .column(created_at())
                .column(text("deleted_at")),
        )
        .add_table(
            TableDefinition::new("user_sites")
                .column(int("user_id").not_null())
                .column(int("site_id").not_null())
                .index(&["user_id"])
                .index(&["site_id"]),
        )
        .add_table(
            TableDefinition::new("site_pro_services")
                .column(int("site_id").not_null())
                .column(int("pro_service_id").not_null())
                .column(text("expire_at"))
                .column(flag("deactivate"))
                .index(&["site_id"]),
        )
        .add_table(
            TableDefinition::new("pro_service_permissions")
                .column(int("pro_service_id").not_null())
                .column(int("permissions_id").not_null())
                .index(&["pro_service_id"]),
        )
        .add_table(
            TableDefinition::new("user_orders")
                .column(int("user_id").not_null())
                .column(text("platform"))
                .column(text("card_key"))
                .column(text("card_token"))
                .column(flag("status"))
                .column(flag("pay_status"))
                .column(created_at())
                .column(text("deleted_at"))
                .index(&["user_id"]),
        )
        .add_table(
            TableDefinition::new("user_order_items")
                .column(int("order_id").not_null())
                .column(text("service_unique_name"))
                .column(flag("frequency"))
                .column(flag("price"))
                .index(&["order_id"]),
        )
        .add_table(
            TableDefinition::new("user_order_periods")
                .column(int("order_id").not_null())
                .column(created_at())
                .column(text("deleted_at"))
                .index(&["order_id"]),
        )
        .add_table(
            TableDefinition::new("user_order_callbacks")
                .column(int("order_id").not_null())
                .column(text("payload"))
                .column(created_at())
                .index(&["order_id"]),
        )
        .add_table(
            TableDefinition::new("user_order_feedback")
                .column(int("order_id").not_null())
                .column(int("rating"))
                .column(text("content"))
                .column(created_at())
                .index(&["order_id"]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sql_renders_constraints_and_defaults() {
        let table = TableDefinition::new("user_services")
            .column(int("user_id").not_null())
            .column(flag("deactivate"));
        assert_eq!(
            table.create_sql(),
            "CREATE TABLE IF NOT EXISTS user_services (id INTEGER PRIMARY KEY, \
             user_id INTEGER NOT NULL, deactivate INTEGER NOT NULL DEFAULT 0);"
        );
    }

    #[test]
    fn test_grant_quota_columns_are_nullable() {
        let schema = user_domain_schema();
        let grants = schema.table("user_permissions").unwrap().create_sql();
        assert!(grants.contains("used_ezec_quota INTEGER DEFAULT NULL"));
        let roles = schema.table("roles").unwrap().create_sql();
        assert!(roles.contains("brand_quota INTEGER NOT NULL DEFAULT 0"));
    }

    #[test]
    fn test_user_domain_schema_covers_all_tables() {
        let schema = user_domain_schema();
        assert_eq!(schema.tables.len(), 21);
        let quota = schema.table("user_permissions").unwrap();
        assert!(quota
            .columns
            .iter()
            .any(|c| c.name == "available_ezec_quota"));
    }

    #[test]
    fn test_schema_creation_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = user_domain_schema();
        schema.create(&conn).unwrap();
        schema.create(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 21);
    }
}
