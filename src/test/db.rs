//! Postgres databases for tests
//!
//! Tests run against the server named by `TEST_DATABASE_URL` when it is set,
//! otherwise against a Postgres container shared by the whole test binary.
//! Every [`TestDb`] is a fresh database with the migrations applied. With
//! neither a URL nor a container runtime, [`TestDb::new`] returns `None` and
//! the calling test returns early.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::OnceCell;
use uuid::Uuid;

struct Server {
    options: PgConnectOptions,
    _container: Option<ContainerAsync<PostgresImage>>,
}

/// Started once and reused by every test in the binary.
static SERVER: OnceCell<Option<Server>> = OnceCell::const_new();

async fn start_server() -> Option<Server> {
    if let Ok(url) = std::env::var("TEST_DATABASE_URL") {
        let options = url.parse::<PgConnectOptions>().expect("TEST_DATABASE_URL is not a Postgres URL");
        return Some(Server { options, _container: None });
    }

    let container = match PostgresImage::default().start().await {
        Ok(container) => container,
        Err(error) => {
            eprintln!("Postgres tests skipped, no container runtime: {error}");
            return None;
        }
    };
    let host = container.get_host().await.expect("Failed to get container host");
    let port = container.get_host_port_ipv4(5432_u16).await.expect("Failed to get container port");
    let options = PgConnectOptions::new()
        .host(&host.to_string())
        .port(port)
        .username("postgres")
        .password("postgres")
        .database("postgres");
    Some(Server { options, _container: Some(container) })
}

#[derive(Debug, Clone)]
pub struct TestDb {
    pub pool: PgPool,
    pub name: String,
    admin: PgConnectOptions,
}

impl TestDb {
    /// Creates a uniquely named database and migrates it.
    pub async fn new() -> Option<Self> {
        let server = SERVER.get_or_init(start_server).await.as_ref()?;
        let name = format!("cart_test_{}", Uuid::now_v7().simple());

        let mut conn = PgConnection::connect_with(&server.options).await.expect("Failed to connect to postgres");
        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");
        conn.close().await.expect("Failed to close admin connection");

        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect_with(server.options.clone().database(&name))
            .await
            .expect("Failed to create pool for database");
        sqlx::migrate!("./migrations").run(&pool).await.expect("Failed to run migrations on database");

        Some(Self { pool, name, admin: server.options.clone() })
    }

    /// Closes the pool and drops the database.
    pub async fn cleanup(self) {
        self.pool.close().await;
        if let Ok(mut conn) = PgConnection::connect_with(&self.admin).await {
            let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{}\"", self.name)).execute(&mut conn).await;
            let _ = conn.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_is_migrated() {
        let Some(db) = TestDb::new().await else { return };
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'public' \
             AND table_name IN ('member', 'product', 'cart_item', 'coupon', 'member_coupon', 'orders', 'order_item')",
        )
        .fetch_one(&db.pool)
        .await
        .unwrap();
        assert_eq!(tables, 7);
        db.cleanup().await;
    }
}
