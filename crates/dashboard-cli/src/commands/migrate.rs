//! 마이그레이션 적용 CLI 명령어.
//!
//! # 사용법
//!
//! ```bash
//! # 기본 파일(migrations/001_initial_schema.sql)을 DATABASE_URL에 적용
//! dashboard migrate apply
//!
//! # 다른 파일 + 명시적 트랜잭션
//! dashboard migrate apply --file migrations/002_alerts.sql --transactional
//!
//! # 기대 테이블 목록
//! dashboard migrate tables
//! ```

use std::path::PathBuf;

use dashboard_core::config::DatabaseSettings;
use dashboard_core::migration::{
    ApplyEvent, MigrationApplicator, MigrationPlan, TableStatus, EXPECTED_TABLES,
};
use dashboard_data::PgSchemaConnector;
use secrecy::SecretString;

/// 마이그레이션 명령 설정
#[derive(Debug, Clone)]
pub struct MigrateConfig {
    /// 데이터베이스 설정 (환경변수 기반)
    pub database: DatabaseSettings,
    /// 적용할 파일 (지정 시 환경변수보다 우선)
    pub script: Option<PathBuf>,
    /// 데이터베이스 URL (지정 시 환경변수보다 우선)
    pub db_url: Option<String>,
    /// 스키마 (지정 시 환경변수보다 우선)
    pub schema: Option<String>,
    /// 명시적 트랜잭션 사용
    pub transactional: bool,
}

impl MigrateConfig {
    /// CLI 인자를 반영한 적용 계획
    pub fn plan(&self) -> MigrationPlan {
        let mut plan = MigrationPlan::from(&self.database);
        if let Some(script) = &self.script {
            plan.script_path = script.clone();
        }
        if let Some(url) = &self.db_url {
            plan.database_url = Some(SecretString::from(url.clone()));
        }
        if let Some(schema) = &self.schema {
            plan.schema = schema.clone();
        }
        plan.transactional = plan.transactional || self.transactional;
        plan
    }
}

/// 진행 이벤트를 출력 문자열로 변환
pub fn render_event(event: &ApplyEvent) -> String {
    match event {
        ApplyEvent::ScriptLoaded { path, bytes } => {
            format!("📄 마이그레이션 파일 로드: {} ({} bytes)", path.display(), bytes)
        }
        ApplyEvent::Connecting { masked_url } => {
            format!("🔌 데이터베이스 연결 중... {}", masked_url)
        }
        ApplyEvent::Connected => "✅ 연결 성공".to_string(),
        ApplyEvent::Executing { transactional } => format!(
            "⚙️  마이그레이션 실행 중... (트랜잭션: {})",
            if *transactional { "명시적" } else { "드라이버 기본" }
        ),
        ApplyEvent::Executed => "✅ 마이그레이션 실행 완료\n\n🔍 테이블 존재 확인".to_string(),
        ApplyEvent::ExecuteFailed { message } => format!(
            "❌ 마이그레이션 실행 실패: {}\n\n🔍 테이블 존재 확인 (실패 후 현재 상태)",
            message
        ),
        ApplyEvent::TableChecked(check) => match &check.status {
            TableStatus::Exists => format!("   ✅ {}", check.table),
            TableStatus::Missing => format!("   ❌ {} (없음)", check.table),
            TableStatus::ProbeFailed(msg) => format!("   ⚠️ {} (확인 실패: {})", check.table, msg),
        },
        ApplyEvent::Closed => "\n🔒 연결 종료".to_string(),
        ApplyEvent::CloseFailed { message } => format!("\n⚠️ 연결 종료 실패: {}", message),
    }
}

/// 마이그레이션 적용.
///
/// 실행 단계 성공 여부를 반환합니다. 테이블 확인 결과는 출력만 합니다.
pub async fn run_apply(config: &MigrateConfig) -> bool {
    println!("\n🚀 마이그레이션 적용 시작...\n");

    let applicator = MigrationApplicator::new(PgSchemaConnector::new(), config.plan());
    let result = applicator
        .apply_with(|event| println!("{}", render_event(&event)))
        .await;

    match result {
        Ok(report) => {
            println!("\n{}", report);
            if report.succeeded() {
                println!("\n✅ 마이그레이션 성공!");
                true
            } else {
                println!("\n❌ 마이그레이션 실패");
                false
            }
        }
        Err(e) => {
            println!("❌ [{}] {}", e.kind(), e);
            println!("\n❌ 마이그레이션 실패");
            false
        }
    }
}

/// 기대 테이블 목록 출력
pub fn print_expected_tables() {
    println!("\n📋 마이그레이션 후 확인하는 테이블 ({} 개)", EXPECTED_TABLES.len());
    for (i, table) in EXPECTED_TABLES.iter().enumerate() {
        println!("   {}. {}", i + 1, table);
    }
}
