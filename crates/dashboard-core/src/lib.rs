//! 트레이딩 대시보드 운영 도구 핵심 로직.
//!
//! # 모듈
//!
//! ```text
//! migration     // SQL 마이그레이션 적용 + 테이블 존재 확인
//! projection    // 예시용 연간 수익 시뮬레이션
//! env_check     // .env 자격 증명 / 필수 파일 점검
//! cache_check   // 키-값 캐시 round-trip 점검
//! config        // 환경변수 기반 설정
//! ```
//!
//! 네트워크 드라이버(Postgres, Redis)는 `dashboard-data` 크레이트가
//! 이 크레이트의 트레이트를 구현하여 제공합니다.

pub mod cache_check;
pub mod config;
pub mod env_check;
pub mod migration;
pub mod projection;

pub use cache_check::{CacheCheckError, KeyValueStore, RoundTripReport, RoundTripTest};
pub use config::{mask_database_url, ToolsConfig};
pub use env_check::{CredentialStatus, EnvCheckError, EnvCheckReport, EnvChecker};
pub use migration::{ApplyReport, MigrationApplicator, MigrationError, MigrationPlan};
