//! 외부 저장소 드라이버.

pub mod postgres;
pub mod redis;

pub use self::postgres::{PgSchemaConnector, PgSchemaSession};
pub use self::redis::{RedisSettings, RedisStore};
