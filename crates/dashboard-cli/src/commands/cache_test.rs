//! Redis 연결 점검 명령어.
//!
//! 실패 시 호출자가 비정상 종료 코드(1)로 프로세스를 끝냅니다.

use dashboard_core::cache_check::{CacheCheckError, RoundTripReport, RoundTripStep, RoundTripTest};
use dashboard_data::{RedisSettings, RedisStore};
use secrecy::SecretString;

/// CLI 인자 덮어쓰기
#[derive(Debug, Clone, Default)]
pub struct CacheTestOverrides {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub db: Option<i64>,
    pub tls: bool,
}

impl CacheTestOverrides {
    /// 환경변수 설정에 CLI 인자 반영
    pub fn apply(&self, mut settings: RedisSettings) -> RedisSettings {
        if let Some(url) = &self.url {
            settings.url = Some(SecretString::from(url.clone()));
        }
        if let Some(host) = &self.host {
            settings.host = host.clone();
            // 호스트를 직접 지정하면 REDIS_URL은 무시
            if self.url.is_none() {
                settings.url = None;
            }
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(username) = &self.username {
            settings.username = Some(username.clone());
        }
        if let Some(password) = &self.password {
            settings.password = Some(SecretString::from(password.clone()));
        }
        if let Some(db) = self.db {
            settings.db = db;
        }
        settings.tls = settings.tls || self.tls;
        settings
    }
}

fn step_line(step: RoundTripStep, detail: &str) -> String {
    match step {
        RoundTripStep::Ping => format!("   ✅ PING → {}", detail),
        RoundTripStep::Set => format!("   ✅ SET {}", detail),
        RoundTripStep::Get => format!("   ✅ GET → {} (일치)", detail),
        RoundTripStep::Delete => format!("   ✅ DEL → {} 개 삭제", detail),
        RoundTripStep::VerifyDeleted => "   ✅ GET → (없음) 삭제 확인".to_string(),
    }
}

/// Redis round-trip 점검 실행
pub async fn run_cache_test(settings: &RedisSettings) -> Result<RoundTripReport, CacheCheckError> {
    println!("\n🧪 Redis 연결 테스트\n");
    println!("🔌 연결 대상: {}", settings.describe());

    let mut store = RedisStore::connect(settings).await?;
    println!("✅ 연결 성공\n");

    let report = RoundTripTest::new()
        .run_with(&mut store, |step, detail| println!("{}", step_line(step, detail)))
        .await?;

    println!("\n✅ Redis 연결 테스트 성공!");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_overrides_apply() {
        let base = RedisSettings {
            url: Some(SecretString::from("redis://env-host:6379")),
            ..Default::default()
        };
        let overrides = CacheTestOverrides {
            host: Some("cli-host".to_string()),
            port: Some(6380),
            password: Some("pw".to_string()),
            tls: true,
            ..Default::default()
        };

        let settings = overrides.apply(base);
        assert!(settings.url.is_none());
        assert_eq!(settings.host, "cli-host");
        assert_eq!(settings.port, 6380);
        assert_eq!(
            settings.password.as_ref().map(|p| p.expose_secret().to_string()),
            Some("pw".to_string())
        );
        assert!(settings.tls);
    }

    #[test]
    fn test_step_line() {
        assert_eq!(step_line(RoundTripStep::Ping, "PONG"), "   ✅ PING → PONG");
        assert!(step_line(RoundTripStep::VerifyDeleted, "absent").contains("삭제 확인"));
    }

    #[tokio::test]
    async fn test_unreachable_redis_fails() {
        let settings = RedisSettings {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..Default::default()
        };
        let result = run_cache_test(&settings).await;
        assert!(matches!(result, Err(CacheCheckError::Connection(_))));
    }
}
