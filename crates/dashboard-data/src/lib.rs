//! 대시보드 운영 도구의 Postgres / Redis 드라이버.
//!
//! `dashboard-core`의 `SchemaConnector`, `KeyValueStore` 트레이트를
//! sqlx와 redis 크레이트로 구현합니다.

pub mod storage;

pub use storage::{PgSchemaConnector, RedisSettings, RedisStore};
