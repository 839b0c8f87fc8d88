//! 대시보드 스키마 마이그레이션 적용 및 검증.
//!
//! SQL 파일 하나를 데이터베이스에 적용한 뒤 기대 테이블이
//! 모두 생성되었는지 카탈로그를 조회해 확인합니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use dashboard_core::migration::{MigrationApplicator, MigrationPlan};
//!
//! let applicator = MigrationApplicator::new(connector, MigrationPlan::default());
//! let report = applicator.apply().await?;
//! println!("{}", report);
//! ```

pub mod applicator;
pub mod models;

pub use applicator::{
    ApplyEvent, MigrationApplicator, MigrationPlan, SchemaConnector, SchemaSession,
};
pub use models::*;

/// 기본 마이그레이션 파일 경로
pub const DEFAULT_MIGRATION_SCRIPT: &str = "migrations/001_initial_schema.sql";

/// 기본 스키마
pub const DEFAULT_SCHEMA: &str = "public";

/// 마이그레이션 후 존재해야 하는 테이블 (생성 순서)
pub const EXPECTED_TABLES: [&str; 9] = [
    "users",
    "trading_accounts",
    "watchlists",
    "watchlist_items",
    "orders",
    "trades",
    "positions",
    "price_alerts",
    "portfolio_snapshots",
];
