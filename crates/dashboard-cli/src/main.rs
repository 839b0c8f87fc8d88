//! 트레이딩 대시보드 운영 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 예상 수익 시뮬레이션 (전체 시나리오)
//! dashboard project
//!
//! # 로컬 설정 점검
//! dashboard check-config --strict
//!
//! # 초기 스키마 적용
//! dashboard migrate apply
//!
//! # Redis 연결 테스트
//! dashboard cache-test --host redis.internal --tls
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::{
    cache_test::{run_cache_test, CacheTestOverrides},
    check_config::run_check_config,
    migrate::{print_expected_tables, run_apply, MigrateConfig},
    project::{run_project, ProjectConfig},
};
use dashboard_core::{EnvChecker, ToolsConfig};
use dashboard_data::RedisSettings;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Trading dashboard tools - 스키마 적용, 설정 점검, 캐시 테스트, 수익 시뮬레이션", long_about = None)]
#[command(version)]
struct Cli {
    /// 로그 레벨 (RUST_LOG가 있으면 무시)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 예상 수익 시뮬레이션 (월 복리, 12개월)
    Project {
        /// 시작 자본 (기본: 1,000 / 5,000 / 10,000 / 50,000)
        #[arg(short, long)]
        capital: Option<String>,

        /// 시나리오 (conservative, moderate, aggressive 또는 보수적/중립/공격적)
        #[arg(short, long)]
        scenario: Option<String>,

        /// 월별 상세 표 출력
        #[arg(short, long, default_value = "false")]
        monthly: bool,

        /// 월 추가 납입금
        #[arg(long, default_value = "0")]
        contribution: String,
    },

    /// 로컬 설정 점검 (.env 자격 증명, 필수 파일)
    CheckConfig {
        /// 프로젝트 루트 (기본: DASHBOARD_ROOT 또는 현재 디렉토리)
        #[arg(long)]
        root: Option<PathBuf>,

        /// 환경 파일 (루트 기준 상대 경로)
        #[arg(long)]
        env_file: Option<PathBuf>,

        /// 문제가 있으면 실패 종료 코드 반환
        #[arg(long, default_value = "false")]
        strict: bool,
    },

    /// 스키마 마이그레이션
    Migrate {
        /// 액션 (apply, tables)
        #[arg(default_value = "apply")]
        action: String,

        /// 마이그레이션 파일 (기본: migrations/001_initial_schema.sql)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// 데이터베이스 URL (기본: DATABASE_URL 환경변수)
        #[arg(long)]
        db_url: Option<String>,

        /// 테이블 확인 스키마 (기본: public)
        #[arg(long)]
        schema: Option<String>,

        /// 명시적 트랜잭션으로 실행 (실패 시 전체 롤백)
        #[arg(long, default_value = "false")]
        transactional: bool,

        /// 실패 시 실패 종료 코드 반환
        #[arg(long, default_value = "false")]
        strict: bool,
    },

    /// Redis 연결 테스트 (PING, SET/GET/DEL)
    CacheTest {
        /// 전체 URL (redis:// 또는 rediss://)
        #[arg(long)]
        url: Option<String>,

        /// 호스트 (기본: REDIS_HOST 또는 localhost)
        #[arg(long)]
        host: Option<String>,

        /// 포트 (기본: REDIS_PORT 또는 6379)
        #[arg(long)]
        port: Option<u16>,

        /// ACL 사용자명
        #[arg(long)]
        username: Option<String>,

        /// 비밀번호 (기본: REDIS_PASSWORD)
        #[arg(long)]
        password: Option<String>,

        /// 데이터베이스 번호
        #[arg(long)]
        db: Option<i64>,

        /// TLS 사용
        #[arg(long, default_value = "false")]
        tls: bool,
    },
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "dashboard={lvl},dashboard_cli={lvl},dashboard_core={lvl},dashboard_data={lvl}",
            lvl = log_level
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (없어도 에러 안남)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = ToolsConfig::from_env();

    match cli.command {
        Commands::Project {
            capital,
            scenario,
            monthly,
            contribution,
        } => {
            let project_config = ProjectConfig::parse(
                capital.as_deref(),
                scenario.as_deref(),
                monthly,
                &contribution,
            )?;
            run_project(&project_config)?;
        }

        Commands::CheckConfig {
            root,
            env_file,
            strict,
        } => {
            let mut settings = config.checker;
            if let Some(root) = root {
                settings.root_dir = root;
            }
            if let Some(env_file) = env_file {
                settings.env_file = env_file;
            }

            let report = run_check_config(&EnvChecker::from(&settings))?;
            if strict && !report.is_ready() {
                return Err(format!(
                    "설정 점검 실패: {} 개 항목 확인 필요",
                    report.problem_count()
                )
                .into());
            }
        }

        Commands::Migrate {
            action,
            file,
            db_url,
            schema,
            transactional,
            strict,
        } => match action.as_str() {
            "apply" => {
                let migrate_config = MigrateConfig {
                    database: config.database,
                    script: file,
                    db_url,
                    schema,
                    transactional,
                };

                let succeeded = run_apply(&migrate_config).await;
                info!(succeeded, "migration apply finished");
                if !succeeded && strict {
                    return Err("마이그레이션 적용 실패".into());
                }
            }
            "tables" => print_expected_tables(),
            _ => {
                error!("Unknown migrate action: {}", action);
                println!("\n사용 가능한 액션:");
                println!("  apply  - 마이그레이션 파일 적용 후 테이블 확인");
                println!("  tables - 확인 대상 테이블 목록");
                return Err(format!("Unknown action: {}", action).into());
            }
        },

        Commands::CacheTest {
            url,
            host,
            port,
            username,
            password,
            db,
            tls,
        } => {
            let overrides = CacheTestOverrides {
                url,
                host,
                port,
                username,
                password,
                db,
                tls,
            };
            let settings = overrides.apply(RedisSettings::from_env());

            if let Err(e) = run_cache_test(&settings).await {
                error!(error = %e, "cache round trip failed");
                println!("\n❌ Redis 연결 테스트 실패: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
