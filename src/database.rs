use crate::config::{
    DbConfig, ACQUIRE_TIMEOUT, CONNECT_TIMEOUT, POOL_MAX_CONNECTIONS, POOL_MIN_CONNECTIONS,
};
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlRow},
    FromRow, MySql, MySqlPool,
};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tokio::{sync::RwLock, time};
use tracing::{debug, error, info};

#[derive(Error, Debug)]
pub enum DbError {
    #[error("database pool is not connected")]
    NotConnected,
    #[error("database connection timed out after {0:?}")]
    Timeout(Duration),
    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
}

/// A bound query argument. Values are always sent as parameters, never
/// spliced into the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    Int(i64),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Param {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

/// Shared handle to the statistics store. Cloning is cheap; all clones see
/// the same pool once [`Database::connect`] has succeeded.
#[derive(Clone, Debug)]
pub struct Database {
    config: DbConfig,
    connect_timeout: Duration,
    pool: Arc<RwLock<Option<MySqlPool>>>,
}

impl Database {
    pub fn new(config: DbConfig) -> Self {
        Self {
            config,
            connect_timeout: CONNECT_TIMEOUT,
            pool: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[cfg(test)]
    pub async fn from_pool(pool: MySqlPool) -> Self {
        let db = Self::new(DbConfig::default());
        *db.pool.write().await = Some(pool);
        db
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.user)
            .password(&self.config.password)
            .database(&self.config.database)
            .charset("utf8mb4")
    }

    pub async fn connect(&self) -> Result<(), DbError> {
        let options = MySqlPoolOptions::new()
            .min_connections(POOL_MIN_CONNECTIONS)
            .max_connections(POOL_MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT);

        let pool = match time::timeout(
            self.connect_timeout,
            options.connect_with(self.connect_options()),
        )
        .await
        {
            Ok(result) => result.map_err(|e| {
                error!("Failed to connect to {}: {}", self.config.host, e);
                DbError::Store(e)
            })?,
            Err(_) => {
                error!("Database connection to {} timed out", self.config.host);
                return Err(DbError::Timeout(self.connect_timeout));
            }
        };

        *self.pool.write().await = Some(pool);
        info!(
            "connected to {}:{}/{}",
            self.config.host, self.config.port, self.config.database
        );
        Ok(())
    }

    pub async fn close(&self) {
        if let Some(pool) = self.pool.write().await.take() {
            pool.close().await;
        }
    }

    async fn pool(&self) -> Result<MySqlPool, DbError> {
        self.pool.read().await.clone().ok_or(DbError::NotConnected)
    }

    fn bind_all<'q, T>(
        sql: &'q str,
        params: &[Param],
    ) -> sqlx::query::QueryAs<'q, MySql, T, sqlx::mysql::MySqlArguments>
    where
        T: for<'r> FromRow<'r, MySqlRow>,
    {
        params
            .iter()
            .fold(sqlx::query_as::<MySql, T>(sql), |query, param| match param {
                Param::Text(value) => query.bind(value.clone()),
                Param::Int(value) => query.bind(*value),
            })
    }

    /// Runs `sql` and returns the first row, if any.
    pub async fn fetch_one<T>(&self, sql: &str, params: &[Param]) -> Result<Option<T>, DbError>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let pool = self.pool().await?;
        let row = Self::bind_all::<T>(sql, params)
            .fetch_optional(&pool)
            .await?;
        debug!("fetch_one matched {}", row.is_some());
        Ok(row)
    }

    /// Runs `sql` and returns every row in the order the store produced them.
    pub async fn fetch_all<T>(&self, sql: &str, params: &[Param]) -> Result<Vec<T>, DbError>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let pool = self.pool().await?;
        let rows = Self::bind_all::<T>(sql, params).fetch_all(&pool).await?;
        debug!("fetch_all returned {} rows", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, sqlx::FromRow)]
    struct One {
        #[allow(dead_code)]
        value: i64,
    }

    #[tokio::test]
    async fn fetch_before_connect_is_not_connected() {
        let db = Database::new(DbConfig::default());

        let one = db.fetch_one::<One>("SELECT 1 AS value", &[]).await;
        assert!(matches!(one, Err(DbError::NotConnected)));

        let all = db
            .fetch_all::<One>("SELECT ? AS value", &[Param::Int(1)])
            .await;
        assert!(matches!(all, Err(DbError::NotConnected)));
    }

    #[tokio::test]
    async fn close_without_pool_is_a_no_op() {
        let db = Database::new(DbConfig::default());
        db.close().await;
        assert!(matches!(db.pool().await, Err(DbError::NotConnected)));
    }

    #[tokio::test]
    async fn connect_gives_up_on_a_silent_server() {
        // Accepts the TCP connection but never sends the MySQL greeting.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = DbConfig {
            host: "127.0.0.1".into(),
            port,
            ..DbConfig::default()
        };
        let limit = Duration::from_millis(300);
        let db = Database::new(config).with_connect_timeout(limit);

        let result = time::timeout(Duration::from_secs(5), db.connect())
            .await
            .expect("connect should honour its own time limit");
        assert!(matches!(result, Err(DbError::Timeout(t)) if t == limit));
        assert!(matches!(db.pool().await, Err(DbError::NotConnected)));

        server.abort();
    }

    #[test]
    fn waiting_for_a_pooled_connection_is_not_time_limited() {
        assert!(ACQUIRE_TIMEOUT > CONNECT_TIMEOUT);
        assert!(ACQUIRE_TIMEOUT >= Duration::from_secs(60 * 60));
    }

    #[test]
    fn params_convert_from_plain_values() {
        assert_eq!(Param::from("Steve"), Param::Text("Steve".into()));
        assert_eq!(Param::from(20u32), Param::Int(20));
    }
}
