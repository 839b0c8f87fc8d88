//! 수익 시뮬레이션 (예시용 연간 수익표).
//!
//! 고정된 월 수익률 시나리오와 시작 자본 목록으로
//! 12개월 복리 수익을 계산합니다. 외부 I/O 없이 순수 계산만 수행합니다.
//!
//! # 계산 방식
//!
//! ```text
//! 월 수익     = 기초 잔고 × 월 수익률
//! 기말 잔고   = 기초 잔고 + 월 수익 + 월 추가 납입
//! 연 수익률   = (최종 잔고 - 총 투입금) / 총 투입금 × 100
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

/// 연간 시뮬레이션 개월 수
pub const MONTHS_PER_YEAR: u32 = 12;

/// 기본 시작 자본 목록 (USD)
pub const DEFAULT_CAPITALS: [Decimal; 4] = [dec!(1000), dec!(5000), dec!(10000), dec!(50000)];

/// 시뮬레이션 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("금액이 너무 커서 계산할 수 없습니다 ({scenario}, {month}개월 차)")]
    Overflow { scenario: &'static str, month: u32 },
}

/// 수익률 시나리오.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// 시나리오 이름
    pub name: &'static str,
    /// 월 수익률 (%)
    pub monthly_return_pct: Decimal,
    /// 매월 추가 납입금
    pub monthly_contribution: Decimal,
}

impl Scenario {
    /// 추가 납입 없는 시나리오
    pub const fn new(name: &'static str, monthly_return_pct: Decimal) -> Self {
        Self {
            name,
            monthly_return_pct,
            monthly_contribution: Decimal::ZERO,
        }
    }

    /// 추가 납입금 설정
    pub fn with_contribution(mut self, amount: Decimal) -> Self {
        self.monthly_contribution = amount;
        self
    }

    /// 월 수익률 (소수)
    fn monthly_rate(&self) -> Decimal {
        self.monthly_return_pct / dec!(100)
    }

    /// 복리 기준 연 환산 수익률 (%)
    pub fn annualized_pct(&self) -> Decimal {
        annualized_rate(self.monthly_return_pct)
    }
}

/// 기본 시나리오 목록
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("보수적", dec!(1.0)),
        Scenario::new("중립", dec!(2.5)),
        Scenario::new("공격적", dec!(5.0)),
    ]
}

/// 이름으로 기본 시나리오 조회 (대소문자 무시, 영문 별칭 지원)
pub fn find_scenario(name: &str) -> Option<Scenario> {
    let key = match name.trim().to_lowercase().as_str() {
        "conservative" | "low" | "보수적" => "보수적",
        "moderate" | "mid" | "중립" => "중립",
        "aggressive" | "high" | "공격적" => "공격적",
        _ => return None,
    };
    default_scenarios().into_iter().find(|s| s.name == key)
}

/// 월 수익률(%)을 복리 연 수익률(%)로 환산.
pub fn annualized_rate(monthly_pct: Decimal) -> Decimal {
    let growth = (0..MONTHS_PER_YEAR).fold(Decimal::ONE, |acc, _| {
        acc * (Decimal::ONE + monthly_pct / dec!(100))
    });
    ((growth - Decimal::ONE) * dec!(100)).round_dp(2)
}

/// 월별 시뮬레이션 행
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRow {
    /// 개월 차 (1부터)
    pub month: u32,
    /// 기초 잔고
    pub opening: Decimal,
    /// 해당 월 수익
    pub profit: Decimal,
    /// 기말 잔고
    pub closing: Decimal,
    /// 누적 수익
    pub cumulative_profit: Decimal,
}

/// 연간 요약
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnualSummary {
    /// 시나리오 이름
    pub scenario: &'static str,
    /// 시작 자본
    pub initial_capital: Decimal,
    /// 최종 잔고
    pub final_balance: Decimal,
    /// 총 수익
    pub total_profit: Decimal,
    /// 총 투입금 (시작 자본 + 추가 납입)
    pub total_contributed: Decimal,
    /// 연 수익률 (%)
    pub annual_return_pct: Decimal,
    /// 월 평균 수익
    pub average_monthly_profit: Decimal,
}

/// 월별 복리 시뮬레이션.
///
/// 중간 계산은 반올림하지 않고 보관하며, 표시 단계에서만 반올림합니다.
/// Decimal 표현 범위를 넘으면 `Overflow`를 반환합니다.
pub fn project_months(
    capital: Decimal,
    scenario: &Scenario,
    months: u32,
) -> Result<Vec<MonthRow>, ProjectionError> {
    let rate = scenario.monthly_rate();
    let mut balance = capital;
    let mut cumulative = Decimal::ZERO;

    (1..=months)
        .map(|month| {
            let overflow = || ProjectionError::Overflow {
                scenario: scenario.name,
                month,
            };
            let opening = balance;
            let profit = opening.checked_mul(rate).ok_or_else(overflow)?;
            cumulative = cumulative.checked_add(profit).ok_or_else(overflow)?;
            balance = opening
                .checked_add(profit)
                .and_then(|b| b.checked_add(scenario.monthly_contribution))
                .ok_or_else(overflow)?;
            Ok(MonthRow {
                month,
                opening,
                profit,
                closing: balance,
                cumulative_profit: cumulative,
            })
        })
        .collect()
}

/// 12개월 연간 요약 계산
pub fn annual_summary(
    capital: Decimal,
    scenario: &Scenario,
) -> Result<AnnualSummary, ProjectionError> {
    let rows = project_months(capital, scenario, MONTHS_PER_YEAR)?;
    let overflow = || ProjectionError::Overflow {
        scenario: scenario.name,
        month: MONTHS_PER_YEAR,
    };
    let final_balance = rows.last().map(|r| r.closing).unwrap_or(capital);
    let total_contributed = scenario
        .monthly_contribution
        .checked_mul(Decimal::from(MONTHS_PER_YEAR))
        .and_then(|c| c.checked_add(capital))
        .ok_or_else(overflow)?;
    let total_profit = final_balance
        .checked_sub(total_contributed)
        .ok_or_else(overflow)?;

    let annual_return_pct = if total_contributed.is_zero() {
        Decimal::ZERO
    } else {
        total_profit
            .checked_div(total_contributed)
            .and_then(|r| r.checked_mul(dec!(100)))
            .ok_or_else(overflow)?
            .round_dp(2)
    };

    Ok(AnnualSummary {
        scenario: scenario.name,
        initial_capital: capital,
        final_balance: final_balance.round_dp(2),
        total_profit: total_profit.round_dp(2),
        total_contributed,
        annual_return_pct,
        average_monthly_profit: (total_profit / Decimal::from(MONTHS_PER_YEAR)).round_dp(2),
    })
}

/// 시나리오 × 시작 자본 전체 요약표
pub fn summary_table(
    capitals: &[Decimal],
    scenarios: &[Scenario],
) -> Result<Vec<AnnualSummary>, ProjectionError> {
    scenarios
        .iter()
        .flat_map(|s| capitals.iter().map(move |c| annual_summary(*c, s)))
        .collect()
}
