//! Shared fixtures for handler tests: in-memory database, scripted worker,
//! and a fully routed app built through the production router.

use crate::dispatch::WorkerForwarder;
use crate::server::{create_router, AppState};
use async_trait::async_trait;
use axum::Router;
use lib_auth::encode_jwt;
use lib_core::config::init_config;
use lib_core::error::{AppError, Result};
use lib_core::model::store::models::{Role, User, UserForCreate};
use lib_core::model::store::UserRepository;
use lib_core::{Config, DbPool};
use shared::WorkerForwardRequest;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Config used across all handler tests. Must stay identical between tests
/// because the global middleware config is initialized once per process.
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret-key-must-be-at-least-32-characters-long!".to_string(),
        jwt_expiration_hours: 24,
        worker_webhook_url: "http://worker.test/webhook".to_string(),
        worker_api_key: "test-worker-shared-secret".to_string(),
        worker_timeout_secs: 60,
        root_admin_password: "root-password".to_string(),
    }
}

/// Scripted worker forwarder: records forwards, fails on demand.
#[derive(Default)]
pub struct MockWorker {
    pub forwarded: Mutex<Vec<WorkerForwardRequest>>,
    fail_next: AtomicBool,
}

impl MockWorker {
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn forwarded_count(&self) -> usize {
        self.forwarded.lock().expect("mock lock poisoned").len()
    }
}

#[async_trait]
impl WorkerForwarder for MockWorker {
    async fn forward(&self, request: &WorkerForwardRequest) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::ServiceUnavailable(
                "Worker unreachable: scripted failure".to_string(),
            ));
        }
        self.forwarded
            .lock()
            .expect("mock lock poisoned")
            .push(request.clone());
        Ok(())
    }
}

/// Routed app plus the handles tests poke at.
pub struct TestApp {
    pub app: Router,
    pub pool: DbPool,
    pub worker: Arc<MockWorker>,
}

/// Build a test app over an in-memory database with the scripted worker.
pub async fn setup_test_app() -> TestApp {
    // First caller wins; every test uses the same values
    let _ = init_config(test_config());

    let pool = setup_test_db().await;
    let worker = Arc::new(MockWorker::default());

    let state = AppState {
        db: pool.clone(),
        config: test_config(),
        worker: worker.clone() as Arc<dyn WorkerForwarder>,
    };

    TestApp {
        app: create_router(state, vec![]),
        pool,
        worker,
    }
}

/// Create an in-memory database with the full schema applied.
pub async fn setup_test_db() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("Failed to enable foreign keys");

    sqlx::query(
        r#"
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            email TEXT UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('admin', 'user')),
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to create users table");

    sqlx::query(
        r#"
        CREATE TABLE chat_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL DEFAULT 'Unnamed Session',
            visibility BOOLEAN NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to create chat_sessions table");

    sqlx::query(
        r#"
        CREATE TABLE messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            chat_session_id INTEGER NOT NULL REFERENCES chat_sessions(id) ON DELETE CASCADE,
            sender TEXT NOT NULL CHECK (sender IN ('human', 'assistant')),
            text TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'completed' CHECK (status IN ('pending', 'completed', 'failed')),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to create messages table");

    pool
}

/// Create a user with a real password hash.
pub async fn seed_user(pool: &DbPool, name: &str, password: &str, role: Role) -> User {
    let password_hash = lib_auth::hash_password(password).expect("test password should hash");
    UserRepository::create(
        pool,
        UserForCreate {
            name: name.to_string(),
            email: None,
            password_hash,
            role,
        },
    )
    .await
    .expect("test user create should succeed")
}

/// Mint a bearer token for a seeded user.
pub fn token_for(user: &User) -> String {
    encode_jwt(
        user.id,
        user.name.clone(),
        user.role.to_string(),
        &test_config().jwt_secret,
        24,
    )
    .expect("test token should encode")
}
