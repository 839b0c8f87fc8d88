//! 원격 키-값 캐시 연결 점검 (round-trip 테스트).
//!
//! PING → SET → GET(값 일치) → DEL → GET(없음) 순서로 실행합니다.
//! 테스트 키는 만료 시간을 두고 저장하므로 중간에 실패해도 영구히 남지 않습니다.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 점검용 고정 키
pub const TEST_KEY: &str = "dashboard:connectivity-test";

/// 점검 키 만료 시간
pub const TEST_KEY_TTL: Duration = Duration::from_secs(60);

/// 캐시 점검 에러.
#[derive(Debug, Error)]
pub enum CacheCheckError {
    #[error("캐시 연결 실패: {0}")]
    Connection(String),

    #[error("{step} 명령 실패: {message}")]
    Command { step: RoundTripStep, message: String },

    #[error("조회 값 불일치 (기대: {expected}, 실제: {actual:?})")]
    Mismatch {
        expected: String,
        actual: Option<String>,
    },

    #[error("삭제 후에도 키가 남아 있습니다: {key}")]
    Residual { key: String },
}

/// 최소 키-값 저장소 인터페이스.
#[async_trait]
pub trait KeyValueStore: Send {
    /// 서버 응답 확인 (PONG 문자열 반환)
    async fn ping(&mut self) -> Result<String, CacheCheckError>;
    /// 만료 시간과 함께 저장
    async fn set_ex(&mut self, key: &str, value: &str, ttl: Duration)
        -> Result<(), CacheCheckError>;
    /// 조회
    async fn get(&mut self, key: &str) -> Result<Option<String>, CacheCheckError>;
    /// 삭제된 키 개수 반환
    async fn del(&mut self, key: &str) -> Result<u64, CacheCheckError>;
}

/// round-trip 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTripStep {
    Ping,
    Set,
    Get,
    Delete,
    VerifyDeleted,
}

impl fmt::Display for RoundTripStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundTripStep::Ping => write!(f, "PING"),
            RoundTripStep::Set => write!(f, "SET"),
            RoundTripStep::Get => write!(f, "GET"),
            RoundTripStep::Delete => write!(f, "DEL"),
            RoundTripStep::VerifyDeleted => write!(f, "GET(삭제 확인)"),
        }
    }
}

/// round-trip 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripReport {
    /// PING 응답
    pub pong: String,
    /// 사용한 키
    pub key: String,
    /// 삭제된 키 수 (정상: 1)
    pub deleted: u64,
    /// 완료된 단계
    pub steps: Vec<RoundTripStep>,
}

/// round-trip 테스트 정의.
#[derive(Debug, Clone)]
pub struct RoundTripTest {
    pub key: String,
    pub value: String,
    pub ttl: Duration,
}

impl Default for RoundTripTest {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundTripTest {
    /// 고정 키와 매 실행마다 새로운 값으로 생성
    pub fn new() -> Self {
        Self {
            key: TEST_KEY.to_string(),
            value: format!("ok-{}", uuid::Uuid::new_v4()),
            ttl: TEST_KEY_TTL,
        }
    }

    /// 이벤트 없이 실행
    pub async fn run<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<RoundTripReport, CacheCheckError> {
        self.run_with(store, |_, _| {}).await
    }

    /// 단계마다 콜백 `(단계, 상세)`을 호출하며 실행.
    pub async fn run_with<S, F>(
        &self,
        store: &mut S,
        mut on_step: F,
    ) -> Result<RoundTripReport, CacheCheckError>
    where
        S: KeyValueStore + ?Sized,
        F: FnMut(RoundTripStep, &str) + Send,
    {
        let mut steps = Vec::with_capacity(5);

        let pong = store.ping().await?;
        debug!(pong = %pong, "PING 응답");
        on_step(RoundTripStep::Ping, &pong);
        steps.push(RoundTripStep::Ping);

        store.set_ex(&self.key, &self.value, self.ttl).await?;
        on_step(RoundTripStep::Set, &self.key);
        steps.push(RoundTripStep::Set);

        let fetched = store.get(&self.key).await?;
        if fetched.as_deref() != Some(self.value.as_str()) {
            // 실패해도 TTL이 지나면 만료됨
            if let Err(e) = store.del(&self.key).await {
                warn!(key = %self.key, "불일치 후 테스트 키 정리 실패: {}", e);
            }
            return Err(CacheCheckError::Mismatch {
                expected: self.value.clone(),
                actual: fetched,
            });
        }
        on_step(RoundTripStep::Get, &self.value);
        steps.push(RoundTripStep::Get);

        let deleted = store.del(&self.key).await?;
        on_step(RoundTripStep::Delete, &deleted.to_string());
        steps.push(RoundTripStep::Delete);

        if store.get(&self.key).await?.is_some() {
            return Err(CacheCheckError::Residual {
                key: self.key.clone(),
            });
        }
        on_step(RoundTripStep::VerifyDeleted, "absent");
        steps.push(RoundTripStep::VerifyDeleted);

        info!(key = %self.key, "캐시 round-trip 완료");
        Ok(RoundTripReport {
            pong,
            key: self.key.clone(),
            deleted,
            steps,
        })
    }
}
