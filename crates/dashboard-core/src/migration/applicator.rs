//! 단일 SQL 마이그레이션 적용기.
//!
//! # 동작 순서
//!
//! 1. 데이터베이스 URL 확인 (없으면 연결 시도 없이 중단)
//! 2. 마이그레이션 파일 전체 읽기
//! 3. 데이터베이스 연결
//! 4. 스크립트 전체를 하나의 배치로 실행 (실패해도 5단계 진행)
//! 5. 기대 테이블 존재 여부를 하나씩 확인
//! 6. 연결 종료 (연결된 경우 항상)

use std::path::PathBuf;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, warn};

use super::models::{
    ApplyReport, ExecuteStatus, MigrationError, TableCheck, TableStatus,
};
use super::{DEFAULT_MIGRATION_SCRIPT, DEFAULT_SCHEMA, EXPECTED_TABLES};
use crate::config::DatabaseSettings;

/// 데이터베이스 연결 생성기.
#[async_trait]
pub trait SchemaConnector: Send + Sync {
    /// 연결 URL로 새 세션을 엽니다.
    async fn connect(&self, database_url: &str) -> Result<Box<dyn SchemaSession>, MigrationError>;
}

/// 마이그레이션 1회 실행 동안 독점 사용하는 연결.
#[async_trait]
pub trait SchemaSession: Send {
    /// SQL 스크립트 전체를 하나의 배치로 실행합니다.
    ///
    /// `transactional`이면 명시적 트랜잭션 안에서 실행하고 실패 시 롤백합니다.
    async fn execute_script(&mut self, sql: &str, transactional: bool)
        -> Result<(), MigrationError>;

    /// 스키마 카탈로그에서 테이블 존재 여부를 조회합니다.
    async fn table_exists(&mut self, schema: &str, table: &str) -> Result<bool, MigrationError>;

    /// 연결을 종료합니다.
    async fn close(self: Box<Self>) -> Result<(), MigrationError>;
}

/// 적용 진행 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyEvent {
    /// 스크립트 로드 완료
    ScriptLoaded { path: PathBuf, bytes: usize },
    /// 연결 시도
    Connecting { masked_url: String },
    /// 연결 성공
    Connected,
    /// 실행 시작
    Executing { transactional: bool },
    /// 실행 성공
    Executed,
    /// 실행 실패
    ExecuteFailed { message: String },
    /// 테이블 확인 완료
    TableChecked(TableCheck),
    /// 연결 종료
    Closed,
    /// 연결 종료 실패
    CloseFailed { message: String },
}

/// 마이그레이션 계획.
#[derive(Debug, Clone)]
pub struct MigrationPlan {
    /// 데이터베이스 URL
    pub database_url: Option<SecretString>,
    /// 스크립트 경로
    pub script_path: PathBuf,
    /// 존재 확인할 테이블 (순서 유지)
    pub expected_tables: Vec<String>,
    /// 확인 대상 스키마
    pub schema: String,
    /// 명시적 트랜잭션 사용 여부
    pub transactional: bool,
}

impl Default for MigrationPlan {
    fn default() -> Self {
        Self {
            database_url: None,
            script_path: PathBuf::from(DEFAULT_MIGRATION_SCRIPT),
            expected_tables: EXPECTED_TABLES.iter().map(|t| t.to_string()).collect(),
            schema: DEFAULT_SCHEMA.to_string(),
            transactional: false,
        }
    }
}

impl From<&DatabaseSettings> for MigrationPlan {
    fn from(settings: &DatabaseSettings) -> Self {
        Self {
            database_url: settings.url.clone(),
            script_path: settings.migration_script.clone(),
            schema: settings.schema.clone(),
            transactional: settings.transactional,
            ..Default::default()
        }
    }
}

/// 마이그레이션 적용기.
pub struct MigrationApplicator<C> {
    connector: C,
    plan: MigrationPlan,
}

impl<C: SchemaConnector> MigrationApplicator<C> {
    /// 연결 생성기와 계획으로 적용기 생성
    pub fn new(connector: C, plan: MigrationPlan) -> Self {
        Self { connector, plan }
    }

    /// 이벤트 없이 적용
    pub async fn apply(&self) -> Result<ApplyReport, MigrationError> {
        self.apply_with(|_| {}).await
    }

    /// 마이그레이션을 적용하고 진행 이벤트를 콜백으로 전달합니다.
    ///
    /// 사전 조건/연결 실패는 `Err`로, 실행 실패는 보고서의 `execute`로 반환됩니다.
    pub async fn apply_with<F>(&self, mut on_event: F) -> Result<ApplyReport, MigrationError>
    where
        F: FnMut(ApplyEvent) + Send,
    {
        let database_url = self
            .plan
            .database_url
            .as_ref()
            .map(|url| url.expose_secret().trim())
            .filter(|url| !url.is_empty())
            .ok_or(MigrationError::MissingDatabaseUrl)?;

        let path = &self.plan.script_path;
        let sql = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| MigrationError::ScriptRead {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), bytes = sql.len(), "마이그레이션 파일 로드");
        on_event(ApplyEvent::ScriptLoaded {
            path: path.clone(),
            bytes: sql.len(),
        });

        on_event(ApplyEvent::Connecting {
            masked_url: crate::config::mask_database_url(database_url),
        });
        let mut session = self.connector.connect(database_url).await.map_err(|e| {
            error!("데이터베이스 연결 실패: {}", e);
            e
        })?;
        on_event(ApplyEvent::Connected);

        on_event(ApplyEvent::Executing {
            transactional: self.plan.transactional,
        });
        let execute = match session.execute_script(&sql, self.plan.transactional).await {
            Ok(()) => {
                info!(path = %path.display(), "마이그레이션 실행 완료");
                on_event(ApplyEvent::Executed);
                ExecuteStatus::Applied
            }
            Err(e) => {
                let message = match e {
                    MigrationError::Execution(msg) => msg,
                    other => other.to_string(),
                };
                error!("마이그레이션 실행 실패: {}", message);
                on_event(ApplyEvent::ExecuteFailed {
                    message: message.clone(),
                });
                ExecuteStatus::Failed(message)
            }
        };

        let mut tables = Vec::with_capacity(self.plan.expected_tables.len());
        for table in &self.plan.expected_tables {
            let status = match session.table_exists(&self.plan.schema, table).await {
                Ok(true) => TableStatus::Exists,
                Ok(false) => TableStatus::Missing,
                Err(e) => {
                    warn!(table = %table, "테이블 확인 실패: {}", e);
                    TableStatus::ProbeFailed(e.to_string())
                }
            };
            let check = TableCheck {
                table: table.clone(),
                status,
            };
            on_event(ApplyEvent::TableChecked(check.clone()));
            tables.push(check);
        }

        match session.close().await {
            Ok(()) => on_event(ApplyEvent::Closed),
            Err(e) => {
                warn!("연결 종료 실패: {}", e);
                on_event(ApplyEvent::CloseFailed {
                    message: e.to_string(),
                });
            }
        }

        Ok(ApplyReport {
            script_path: path.clone(),
            script_bytes: sql.len(),
            transactional: self.plan.transactional,
            execute,
            tables,
        })
    }
}
