//! 마이그레이션 적용 결과 모델.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// 실패 원인 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 사전 조건 누락 (환경변수, 파일)
    Precondition,
    /// 연결 실패 (호스트 도달 불가, 인증 거부)
    Connectivity,
    /// SQL 실행 실패
    Execution,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Precondition => write!(f, "PRECONDITION"),
            FailureKind::Connectivity => write!(f, "CONNECTIVITY"),
            FailureKind::Execution => write!(f, "EXECUTION"),
        }
    }
}

/// 마이그레이션 에러.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("DATABASE_URL 환경변수가 설정되지 않았습니다")]
    MissingDatabaseUrl,

    #[error("마이그레이션 파일을 읽을 수 없습니다 ({path}): {source}")]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("데이터베이스 연결 실패: {0}")]
    Connection(String),

    #[error("마이그레이션 실행 실패: {0}")]
    Execution(String),

    #[error("테이블 확인 실패 ({table}): {message}")]
    Probe { table: String, message: String },

    #[error("연결 종료 실패: {0}")]
    Close(String),
}

impl MigrationError {
    /// 에러 분류
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingDatabaseUrl | Self::ScriptRead { .. } => FailureKind::Precondition,
            Self::Connection(_) | Self::Close(_) => FailureKind::Connectivity,
            Self::Execution(_) | Self::Probe { .. } => FailureKind::Execution,
        }
    }
}

/// SQL 일괄 실행 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteStatus {
    /// 전체 스크립트 실행 성공
    Applied,
    /// 실행 실패 (DB 에러 메시지)
    Failed(String),
}

/// 개별 테이블 존재 여부
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    /// 존재함
    Exists,
    /// 존재하지 않음
    Missing,
    /// 조회 자체가 실패함
    ProbeFailed(String),
}

/// 테이블 확인 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCheck {
    /// 테이블명
    pub table: String,
    /// 확인 결과
    pub status: TableStatus,
}

impl TableCheck {
    /// 테이블 존재 여부
    pub fn exists(&self) -> bool {
        self.status == TableStatus::Exists
    }
}

/// 마이그레이션 적용 보고서.
///
/// 성공 여부는 실행 단계 결과만으로 결정됩니다.
/// 테이블 확인 결과는 보고용이며 `succeeded()`에 영향을 주지 않습니다.
#[derive(Debug, Clone)]
pub struct ApplyReport {
    /// 적용한 스크립트 경로
    pub script_path: PathBuf,
    /// 스크립트 크기 (바이트)
    pub script_bytes: usize,
    /// 명시적 트랜잭션 사용 여부
    pub transactional: bool,
    /// 실행 결과
    pub execute: ExecuteStatus,
    /// 테이블별 확인 결과 (기대 순서 유지)
    pub tables: Vec<TableCheck>,
}

impl ApplyReport {
    /// 실행 단계 성공 여부
    pub fn succeeded(&self) -> bool {
        self.execute == ExecuteStatus::Applied
    }

    /// 존재가 확인된 테이블 수
    pub fn existing_count(&self) -> usize {
        self.tables.iter().filter(|t| t.exists()).count()
    }

    /// 존재가 확인되지 않은 테이블 목록 (조회 실패 포함)
    pub fn missing_tables(&self) -> Vec<&str> {
        self.tables
            .iter()
            .filter(|t| !t.exists())
            .map(|t| t.table.as_str())
            .collect()
    }

    /// 실행 실패를 에러로 변환
    pub fn into_result(self) -> Result<Self, MigrationError> {
        match &self.execute {
            ExecuteStatus::Applied => Ok(self),
            ExecuteStatus::Failed(message) => Err(MigrationError::Execution(message.clone())),
        }
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "═══════════════════════════════════════════════════════════════")?;
        writeln!(f, "                    마이그레이션 적용 결과")?;
        writeln!(f, "═══════════════════════════════════════════════════════════════")?;
        writeln!(f, "  파일: {} ({} bytes)", self.script_path.display(), self.script_bytes)?;
        writeln!(
            f,
            "  트랜잭션: {}",
            if self.transactional { "명시적" } else { "드라이버 기본" }
        )?;
        match &self.execute {
            ExecuteStatus::Applied => writeln!(f, "  실행: ✅ 성공")?,
            ExecuteStatus::Failed(msg) => writeln!(f, "  실행: ❌ 실패 - {}", msg)?,
        }
        writeln!(
            f,
            "  테이블: {}/{} 존재",
            self.existing_count(),
            self.tables.len()
        )?;
        if !self.succeeded() && self.existing_count() > 0 {
            writeln!(f, "  ⚠️ 테이블 존재 여부는 현재 스키마 상태 기준 (이전 실행 결과 포함 가능)")?;
        }
        write!(f, "═══════════════════════════════════════════════════════════════")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(execute: ExecuteStatus, exists: &[bool]) -> ApplyReport {
        ApplyReport {
            script_path: PathBuf::from("migrations/001_initial_schema.sql"),
            script_bytes: 128,
            transactional: false,
            execute,
            tables: exists
                .iter()
                .enumerate()
                .map(|(i, e)| TableCheck {
                    table: format!("t{}", i + 1),
                    status: if *e {
                        TableStatus::Exists
                    } else {
                        TableStatus::Missing
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            MigrationError::MissingDatabaseUrl.kind(),
            FailureKind::Precondition
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        assert_eq!(
            MigrationError::ScriptRead {
                path: PathBuf::from("x.sql"),
                source: io
            }
            .kind(),
            FailureKind::Precondition
        );
        assert_eq!(
            MigrationError::Connection("refused".into()).kind(),
            FailureKind::Connectivity
        );
        assert_eq!(
            MigrationError::Execution("syntax".into()).kind(),
            FailureKind::Execution
        );
    }

    #[test]
    fn test_success_ignores_table_results() {
        let r = report(ExecuteStatus::Applied, &[true, false, false]);
        assert!(r.succeeded());
        assert_eq!(r.existing_count(), 1);
        assert_eq!(r.missing_tables(), vec!["t2", "t3"]);
    }

    #[test]
    fn test_into_result() {
        let ok = report(ExecuteStatus::Applied, &[true]);
        assert!(ok.into_result().is_ok());

        let failed = report(ExecuteStatus::Failed("duplicate".into()), &[true]);
        match failed.into_result() {
            Err(MigrationError::Execution(msg)) => assert_eq!(msg, "duplicate"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_display_flags_stale_tables() {
        let r = report(ExecuteStatus::Failed("boom".into()), &[true, false]);
        let text = r.to_string();
        assert!(text.contains("❌ 실패 - boom"));
        assert!(text.contains("1/2 존재"));
        assert!(text.contains("현재 스키마 상태"));
    }
}
