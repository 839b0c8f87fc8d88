//! Postgres 마이그레이션 드라이버.
//!
//! 풀 대신 단일 `PgConnection`을 사용합니다. 마이그레이션 1회 실행 동안만
//! 연결을 소유하고, 종료 시 명시적으로 닫습니다.
//!
//! 스크립트는 `sqlx::raw_sql`로 전송되므로 여러 문장을 한 번에 실행할 수 있습니다.
//! 단순 쿼리 프로토콜 특성상 명시적 트랜잭션이 없어도 Postgres가
//! 배치를 암묵적 트랜잭션으로 처리할 수 있습니다 (스크립트에 BEGIN/COMMIT이 없는 경우).

use async_trait::async_trait;
use dashboard_core::migration::{MigrationError, SchemaConnector, SchemaSession};
use sqlx::{Connection, Executor, PgConnection};
use tracing::{debug, instrument};

/// 테이블 존재 확인 쿼리
const TABLE_EXISTS_SQL: &str = "SELECT EXISTS (\
     SELECT 1 FROM information_schema.tables \
     WHERE table_schema = $1 AND table_name = $2\
 )";

/// Postgres 연결 생성기.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgSchemaConnector;

impl PgSchemaConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SchemaConnector for PgSchemaConnector {
    async fn connect(&self, database_url: &str) -> Result<Box<dyn SchemaSession>, MigrationError> {
        let conn = PgConnection::connect(database_url)
            .await
            .map_err(|e| MigrationError::Connection(e.to_string()))?;
        debug!("Postgres 연결 성공");
        Ok(Box::new(PgSchemaSession { conn }))
    }
}

/// Postgres 세션.
pub struct PgSchemaSession {
    conn: PgConnection,
}

/// sqlx 에러를 실행 에러로 변환 (DB 에러는 SQLSTATE 포함)
fn execution_error(err: sqlx::Error) -> MigrationError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => MigrationError::Execution(format!("{} (SQLSTATE {})", db_err.message(), code)),
            None => MigrationError::Execution(db_err.message().to_string()),
        },
        _ => MigrationError::Execution(err.to_string()),
    }
}

#[async_trait]
impl SchemaSession for PgSchemaSession {
    #[instrument(skip(self, sql), fields(bytes = sql.len()))]
    async fn execute_script(&mut self, sql: &str, transactional: bool) -> Result<(), MigrationError> {
        if transactional {
            let mut tx = self.conn.begin().await.map_err(execution_error)?;
            // 실패 시 tx가 drop되면서 롤백됨
            (&mut *tx)
                .execute(sqlx::raw_sql(sql))
                .await
                .map_err(execution_error)?;
            tx.commit().await.map_err(execution_error)?;
        } else {
            (&mut self.conn)
                .execute(sqlx::raw_sql(sql))
                .await
                .map_err(execution_error)?;
        }
        Ok(())
    }

    async fn table_exists(&mut self, schema: &str, table: &str) -> Result<bool, MigrationError> {
        sqlx::query_scalar::<_, bool>(TABLE_EXISTS_SQL)
            .bind(schema)
            .bind(table)
            .fetch_one(&mut self.conn)
            .await
            .map_err(|e| MigrationError::Probe {
                table: table.to_string(),
                message: e.to_string(),
            })
    }

    async fn close(self: Box<Self>) -> Result<(), MigrationError> {
        let PgSchemaSession { conn } = *self;
        conn.close()
            .await
            .map_err(|e| MigrationError::Close(e.to_string()))
    }
}
