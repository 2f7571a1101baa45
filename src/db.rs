use crate::config::StoreConfig;
use crate::schema::Schema;
use crate::user_edit::UserEdit;
use crate::user_info::UserInfo;
use crate::user_order::UserOrder;
use crate::user_site::UserSite;
use crate::Result;
use rusqlite::{Connection, OptionalExtension, Params, Row};
use std::time::Duration;
use tracing::{debug, info};

/// Database handle shared by the repositories.
///
/// Repositories borrow the handle, so every read and write made through
/// them goes over the same connection.
pub struct Database {
    conn: Connection,
    config: StoreConfig,
}

impl Database {
    /// Open the database described by `config`, creating its schema if one
    /// is configured.
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        info!(path = %config.db_path, "opening user database");
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            Connection::open(&config.db_path)?
        };
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        conn.pragma_update(None, "foreign_keys", config.foreign_keys)?;

        let db = Self { conn, config };
        if let Some(schema) = &db.config.schema {
            db.initialize_schema(schema)?;
        }
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(StoreConfig::in_memory())
    }

    /// Wrap an already open connection, e.g. one shared with other code.
    pub fn from_connection(conn: Connection, config: StoreConfig) -> Self {
        Self { conn, config }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn initialize_schema(&self, schema: &Schema) -> Result<()> {
        debug!(tables = schema.tables.len(), "creating schema");
        schema.create(&self.conn)?;
        Ok(())
    }

    pub fn user_info(&self) -> UserInfo<'_> {
        UserInfo::new(self)
    }

    pub fn user_edit(&self) -> UserEdit<'_> {
        UserEdit::new(self)
    }

    pub fn user_order(&self) -> UserOrder<'_> {
        UserOrder::new(self)
    }

    pub fn user_site(&self) -> UserSite<'_> {
        UserSite::new(self)
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    pub(crate) fn query_all<T, P, F>(&self, sql: &str, params: P, f: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params, f)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    pub(crate) fn query_first<T, P, F>(&self, sql: &str, params: P, f: F) -> Result<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare_cached(sql)?;
        Ok(stmt.query_row(params, f).optional()?)
    }

    /// Run a write statement; true when at least one row changed.
    pub(crate) fn execute<P: Params>(&self, sql: &str, params: P) -> Result<bool> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        Ok(stmt.execute(params)? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::user_domain_schema;

    #[test]
    fn test_open_with_schema() {
        let db = Database::open(StoreConfig::in_memory().with_schema(user_domain_schema())).unwrap();
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_wrap_existing_connection() {
        let conn = Connection::open_in_memory().unwrap();
        user_domain_schema().create(&conn).unwrap();

        let db = Database::from_connection(conn, StoreConfig::in_memory());
        assert!(db.user_edit().set_role(1, 2).unwrap());
        assert_eq!(db.config().freeshop_service_id, 63);

        let conn = db.into_connection();
        let role_id: i64 = conn
            .query_row("SELECT role_id FROM user_roles WHERE user_id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(role_id, 2);
    }

    #[test]
    fn test_open_without_schema_is_empty() {
        let db = Database::open_in_memory().unwrap();
        let tables: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get(0))
            .unwrap();
        assert_eq!(tables, 0);
    }
}
