//! 수익 시뮬레이션 출력.
//!
//! # 사용법
//!
//! ```bash
//! # 전체 시나리오 × 기본 자본 요약표
//! dashboard project
//!
//! # 특정 자본/시나리오의 월별 표
//! dashboard project --capital 20000 --scenario moderate --monthly
//! ```

use dashboard_core::projection::{
    annual_summary, default_scenarios, find_scenario, project_months, summary_table,
    AnnualSummary, ProjectionError, Scenario, DEFAULT_CAPITALS, MONTHS_PER_YEAR,
};
use rust_decimal::Decimal;

/// 시뮬레이션 명령 설정
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    /// 시작 자본 (없으면 기본 목록)
    pub capital: Option<Decimal>,
    /// 시나리오 (없으면 전체)
    pub scenario: Option<Scenario>,
    /// 월별 표 출력
    pub monthly: bool,
    /// 월 추가 납입금
    pub contribution: Decimal,
}

impl ProjectConfig {
    /// CLI 문자열 인자로 설정 생성
    pub fn parse(
        capital: Option<&str>,
        scenario: Option<&str>,
        monthly: bool,
        contribution: &str,
    ) -> Result<Self, String> {
        let capital = capital
            .map(|c| parse_amount(c).ok_or_else(|| format!("Invalid capital: {}", c)))
            .transpose()?;
        let scenario = scenario
            .map(|s| {
                find_scenario(s).ok_or_else(|| {
                    format!(
                        "Invalid scenario: {}. Supported: conservative, moderate, aggressive",
                        s
                    )
                })
            })
            .transpose()?;
        let contribution = parse_amount(contribution)
            .ok_or_else(|| format!("Invalid contribution: {}", contribution))?;

        Ok(Self {
            capital,
            scenario,
            monthly,
            contribution,
        })
    }
}

/// 금액 파싱 (쉼표, 언더스코어 허용, 음수 불가)
fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();
    cleaned
        .trim()
        .parse::<Decimal>()
        .ok()
        .filter(|d| !d.is_sign_negative())
}

/// 천 단위 구분 기호가 있는 금액 문자열
pub fn format_money(amount: Decimal) -> String {
    let text = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}.{}", sign, grouped, frac_part)
}

fn print_summary_rows(rows: &[AnnualSummary]) {
    println!(
        "  {:<8} {:>14} {:>16} {:>14} {:>10}",
        "시나리오", "시작 자본", "1년 후 잔고", "총 수익", "연 수익률"
    );
    println!("───────────────────────────────────────────────────────────────────────");
    for row in rows {
        println!(
            "  {:<8} {:>14} {:>16} {:>14} {:>9}%",
            row.scenario,
            format_money(row.initial_capital),
            format_money(row.final_balance),
            format_money(row.total_profit),
            row.annual_return_pct
        );
    }
}

/// 시뮬레이션 실행 및 출력
pub fn run_project(config: &ProjectConfig) -> Result<(), ProjectionError> {
    let scenarios: Vec<Scenario> = match &config.scenario {
        Some(s) => vec![s.clone()],
        None => default_scenarios(),
    }
    .into_iter()
    .map(|s| s.with_contribution(config.contribution))
    .collect();

    println!("═══════════════════════════════════════════════════════════════════════");
    println!("                       예상 수익 시뮬레이션 (12개월)");
    println!("═══════════════════════════════════════════════════════════════════════");
    for s in &scenarios {
        println!(
            "  {}: 월 {}% (연 환산 {}%)",
            s.name,
            s.monthly_return_pct,
            s.annualized_pct()
        );
    }
    if !config.contribution.is_zero() {
        println!("  월 추가 납입: {}", format_money(config.contribution));
    }
    println!();

    if config.monthly {
        let capital = config.capital.unwrap_or(DEFAULT_CAPITALS[2]);
        for scenario in &scenarios {
            println!("📈 {} / 시작 자본 {}", scenario.name, format_money(capital));
            println!(
                "  {:>4} {:>16} {:>14} {:>16} {:>16}",
                "월", "기초 잔고", "월 수익", "기말 잔고", "누적 수익"
            );
            for row in project_months(capital, scenario, MONTHS_PER_YEAR)? {
                println!(
                    "  {:>4} {:>16} {:>14} {:>16} {:>16}",
                    row.month,
                    format_money(row.opening),
                    format_money(row.profit),
                    format_money(row.closing),
                    format_money(row.cumulative_profit)
                );
            }
            let summary = annual_summary(capital, scenario)?;
            println!(
                "  → 총 수익 {} ({}%), 월 평균 {}\n",
                format_money(summary.total_profit),
                summary.annual_return_pct,
                format_money(summary.average_monthly_profit)
            );
        }
    } else {
        let capitals: Vec<Decimal> = match config.capital {
            Some(c) => vec![c],
            None => DEFAULT_CAPITALS.to_vec(),
        };
        print_summary_rows(&summary_table(&capitals, &scenarios)?);
    }

    println!("\n⚠️  예시용 계산입니다. 실제 수익을 보장하지 않으며 투자 조언이 아닙니다.");
    Ok(())
}
