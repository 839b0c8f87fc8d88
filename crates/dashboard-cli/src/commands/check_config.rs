//! 로컬 설정 점검 명령어.

use dashboard_core::env_check::{CredentialStatus, EnvCheckError, EnvCheckReport, EnvChecker};

fn credential_line(key: &str, status: CredentialStatus) -> String {
    match status {
        CredentialStatus::Configured => format!("   ✅ {:<20} configured", key),
        CredentialStatus::Placeholder => {
            format!("   ⚠️ {:<20} placeholder (예시 값을 실제 값으로 교체하세요)", key)
        }
        CredentialStatus::Missing => format!("   ❌ {:<20} missing", key),
        CredentialStatus::Unreadable => format!("   ❌ {:<20} unreadable", key),
    }
}

/// 점검 보고서 출력
pub fn print_report(report: &EnvCheckReport) {
    println!("\n🔧 환경 설정 점검\n");

    if report.env_file_present {
        println!("📄 환경 파일: {} ✅", report.env_file.display());
    } else {
        println!("📄 환경 파일: {} ❌ (없음)", report.env_file.display());
    }
    if let Some(message) = &report.env_parse_error {
        println!("   ❌ 파싱 실패: {}", message);
    }

    println!("\n🔑 자격 증명");
    for check in &report.credentials {
        println!("{}", credential_line(&check.key, check.status));
    }

    println!("\n📁 필수 파일");
    for check in &report.paths {
        let mark = if check.exists { "✅" } else { "❌" };
        println!("   {} {}", mark, check.path.display());
    }

    if report.is_ready() {
        println!("\n✅ 모든 설정이 준비되었습니다.");
    } else {
        println!(
            "\n⚠️ 확인이 필요한 항목: {} 개 (.env.example 참고)",
            report.problem_count()
        );
    }
}

/// 설정 점검 실행
pub fn run_check_config(checker: &EnvChecker) -> Result<EnvCheckReport, EnvCheckError> {
    let report = checker.run()?;
    print_report(&report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_line() {
        assert!(credential_line("TRADING_API_KEY", CredentialStatus::Placeholder)
            .contains("placeholder"));
        assert!(credential_line("TRADING_API_KEY", CredentialStatus::Configured)
            .contains("configured"));
        assert!(credential_line("REDIS_PASSWORD", CredentialStatus::Missing).contains("missing"));
        assert!(credential_line("REDIS_PASSWORD", CredentialStatus::Unreadable)
            .contains("unreadable"));
    }

    #[test]
    fn test_malformed_env_file_still_reports() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "export FOO BAR\n").unwrap();

        let report = run_check_config(&EnvChecker::new(dir.path(), ".env")).unwrap();
        assert!(report.env_parse_error.is_some());
        assert_eq!(report.paths.len(), 4);
    }

    #[test]
    fn test_run_check_config_on_fixture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "TRADING_API_KEY=your_api_key_here\n",
        )
        .unwrap();

        let report = run_check_config(&EnvChecker::new(dir.path(), ".env")).unwrap();
        assert!(report.env_file_present);
        assert!(!report.is_ready());
    }
}
