#![allow(dead_code, unused_macros)]

use std::env;

use actix_web::web;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use carepoint::auth::{Role, issue_token};
use carepoint::database::init_database;
use carepoint::services::{Actor, ConnectionRegistry};
use carepoint::{AppState, Config, MemoryStore, PgStore};

/// Builds an actix test service over a [`TestContext`].
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .app_data(actix_web::web::Data::new($ctx.config.clone()))
                .wrap(carepoint::middleware::RequestId)
                .configure(carepoint::routes::configure::<carepoint::MemoryStore>),
        )
        .await
    };
}

pub struct TestContext {
    pub store: MemoryStore,
    pub realtime: ConnectionRegistry,
    pub state: web::Data<AppState<MemoryStore>>,
    pub config: Config,
    pub admin_id: Uuid,
}

impl TestContext {
    /// Must be called from inside a tokio runtime.
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let realtime = ConnectionRegistry::new();
        let state = web::Data::new(AppState::new(store.clone(), realtime.clone()));

        Self {
            store,
            realtime,
            state,
            config: Config::test_config(),
            admin_id: Uuid::new_v4(),
        }
    }

    pub fn admin(&self) -> Actor {
        Actor::new(self.admin_id)
    }

    pub fn token(&self, user_id: Uuid, role: Role) -> String {
        issue_token(user_id, role, &self.config.jwt_secret, Duration::hours(1))
            .expect("token should sign")
    }

    pub fn bearer(&self, user_id: Uuid, role: Role) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token(user_id, role)))
    }

    pub fn admin_bearer(&self) -> (&'static str, String) {
        self.bearer(self.admin_id, Role::HrAdmin)
    }

    /// Waits until queued notifications and audit entries are stored.
    pub async fn settle(&self) {
        self.state.flush_effects().await;
    }
}

/// 2025-03-10 (a Monday) at `hour`:00 UTC.
pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
}

/// A migrated Postgres database named by `TEST_DATABASE_URL` (or
/// `DATABASE_URL`). Every row a test writes hangs off freshly inserted
/// clients and staff, so tests can share one database.
pub struct PgTestDb {
    pub pool: PgPool,
    pub store: PgStore,
}

impl PgTestDb {
    /// `None` when no database is configured; callers skip the test.
    pub async fn connect() -> Option<Self> {
        let url = env::var("TEST_DATABASE_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .ok()?;
        let pool = init_database(&url, 5)
            .await
            .expect("test database should accept connections and migrate");

        Some(Self {
            store: PgStore::new(pool.clone()),
            pool,
        })
    }

    pub async fn add_client(&self) -> Uuid {
        sqlx::query_scalar::<_, Uuid>("INSERT INTO clients (name) VALUES ($1) RETURNING id")
            .bind("Test Client")
            .fetch_one(&self.pool)
            .await
            .expect("client insert")
    }

    pub async fn add_staff(&self) -> Uuid {
        sqlx::query_scalar::<_, Uuid>("INSERT INTO staff (name) VALUES ($1) RETURNING id")
            .bind("Test Staff")
            .fetch_one(&self.pool)
            .await
            .expect("staff insert")
    }

    /// Must be called from inside a tokio runtime.
    pub fn state(&self) -> web::Data<AppState<PgStore>> {
        web::Data::new(AppState::new(self.store.clone(), ConnectionRegistry::new()))
    }
}

/// Connects to the test database or returns early from the test.
macro_rules! pg_or_skip {
    () => {
        match common::PgTestDb::connect().await {
            Some(db) => db,
            None => {
                eprintln!("TEST_DATABASE_URL not set; skipping Postgres test");
                return;
            }
        }
    };
}
