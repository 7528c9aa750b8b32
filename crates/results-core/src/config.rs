//! 설정 관리.
//!
//! 결과 분석 파이프라인의 설정을 정의하고 로드합니다:
//! 포지션 결과 계산(부분 청산, 무시할 주문), 연속 손익 허용 오차,
//! 연속 손익 기반 리스크 테이블, SL/TP 레벨 탐색, 챌린지 규칙, 로깅.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalyticsError, AnalyticsResult};

/// 결과 분석 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// 포지션 결과 계산 설정
    #[serde(default)]
    pub outcome: OutcomeConfig,
    /// 연속 손익(streak) 설정
    #[serde(default)]
    pub streak: StreakConfig,
    /// 연속 손익 기반 리스크 테이블
    #[serde(default)]
    pub risk: RiskSchedule,
    /// SL/TP 레벨 탐색 설정
    #[serde(default)]
    pub levels: LevelSearchConfig,
    /// 챌린지 통과 규칙
    #[serde(default)]
    pub challenge: ChallengeRules,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 포지션 결과 계산 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutcomeConfig {
    /// 익절 주문마다 청산할 포지션 비율 (합계 1)
    #[serde(default = "default_partials")]
    pub partials: Vec<Decimal>,
    /// 체결되지 않은 것으로 간주할 주문 이름 (예: "SL")
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            partials: default_partials(),
            ignore: Vec::new(),
        }
    }
}

/// 연속 손익 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreakConfig {
    /// 본전으로 간주할 결과의 절대값 상한 (R 단위, 기본값: 0.1)
    #[serde(default = "default_streak_tolerance")]
    pub tolerance: Decimal,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            tolerance: default_streak_tolerance(),
        }
    }
}

/// 진입 시점의 연속 손익 값에 따른 리스크 배수 테이블.
///
/// 연속 길이(-2 = 2연패, 3 = 3연승)가 정확히 일치하는 항목만 적용되며,
/// 나머지는 `default`를 사용합니다.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RiskSchedule {
    /// 연속 길이별 리스크 배수
    #[serde(default)]
    pub levels: Vec<RiskLevel>,
    /// 테이블에 없는 연속 길이에 적용할 리스크 배수 (기본값: 1)
    #[serde(default = "default_risk")]
    pub default: Decimal,
}

/// 리스크 테이블의 한 항목.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RiskLevel {
    /// 부호 있는 연속 길이
    pub streak: i64,
    /// 리스크 배수
    pub risk: Decimal,
}

impl Default for RiskSchedule {
    fn default() -> Self {
        Self {
            levels: Vec::new(),
            default: default_risk(),
        }
    }
}

impl RiskSchedule {
    /// 새 리스크 테이블을 생성합니다.
    pub fn new(default: Decimal) -> Self {
        Self {
            levels: Vec::new(),
            default,
        }
    }

    /// 연속 길이에 대한 리스크 배수를 설정합니다. 기존 항목은 덮어씁니다.
    pub fn with_level(mut self, streak: i64, risk: Decimal) -> Self {
        match self.levels.iter_mut().find(|l| l.streak == streak) {
            Some(level) => level.risk = risk,
            None => self.levels.push(RiskLevel { streak, risk }),
        }
        self
    }

    /// 연속 길이에 해당하는 리스크 배수를 반환합니다.
    pub fn risk_for(&self, streak: i64) -> Decimal {
        self.levels
            .iter()
            .find(|l| l.streak == streak)
            .map(|l| l.risk)
            .unwrap_or(self.default)
    }

    /// 리스크 배수가 모두 0 이상인지 확인합니다.
    pub fn validate(&self) -> AnalyticsResult<()> {
        let negative = std::iter::once(self.default)
            .chain(self.levels.iter().map(|l| l.risk))
            .find(|r| *r < Decimal::ZERO);
        match negative {
            Some(risk) => Err(AnalyticsError::Config(format!(
                "risk multipliers must not be negative, got {}",
                risk
            ))),
            None => Ok(()),
        }
    }
}

/// SL/TP 레벨 탐색 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LevelSearchConfig {
    /// 손절 후보를 최악 가격 너머로 밀어낼 틱 크기 (기본값: 0.001)
    #[serde(default = "default_tick_size")]
    pub tick_size: Decimal,
    /// 교대 탐색 최대 반복 횟수 (기본값: 10)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for LevelSearchConfig {
    fn default() -> Self {
        Self {
            tick_size: default_tick_size(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// 프랍 트레이딩 챌린지 규칙.
///
/// 모든 한도는 초기 잔고 대비 퍼센트입니다.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChallengeRules {
    /// 목표 수익 (기본값: 10%)
    #[serde(default = "default_profit_target")]
    pub profit_target: Decimal,
    /// 최대 일일 손실 (기본값: 5%)
    #[serde(default = "default_max_daily_loss")]
    pub max_daily_loss: Decimal,
    /// 최대 총 손실 (기본값: 10%)
    #[serde(default = "default_max_total_loss")]
    pub max_total_loss: Decimal,
    /// 1R 당 계좌 리스크 (기본값: 1%)
    #[serde(default = "default_risk_per_trade")]
    pub risk_per_trade: Decimal,
    /// 챌린지 기간 (개월, 기본값: 1)
    #[serde(default = "default_period_months")]
    pub period_months: u32,
    /// 통과에 필요한 최소 거래일 수 (기본값: 0)
    #[serde(default)]
    pub min_trading_days: usize,
    /// 총 손실을 초기 잔고 대신 고점 기준으로 측정할지 여부 (기본값: false)
    #[serde(default)]
    pub trailing_drawdown: bool,
}

impl Default for ChallengeRules {
    fn default() -> Self {
        Self {
            profit_target: default_profit_target(),
            max_daily_loss: default_max_daily_loss(),
            max_total_loss: default_max_total_loss(),
            risk_per_trade: default_risk_per_trade(),
            period_months: default_period_months(),
            min_trading_days: 0,
            trailing_drawdown: false,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// 기본값 함수들
fn default_partials() -> Vec<Decimal> {
    vec![Decimal::ONE]
}

fn default_streak_tolerance() -> Decimal {
    dec!(0.1)
}

fn default_risk() -> Decimal {
    Decimal::ONE
}

fn default_tick_size() -> Decimal {
    dec!(0.001)
}

fn default_max_iterations() -> usize {
    10
}

fn default_profit_target() -> Decimal {
    dec!(10)
}

fn default_max_daily_loss() -> Decimal {
    dec!(5)
}

fn default_max_total_loss() -> Decimal {
    dec!(10)
}

fn default_risk_per_trade() -> Decimal {
    Decimal::ONE
}

fn default_period_months() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl OutcomeConfig {
    /// 부분 청산 비율을 검증합니다.
    pub fn validate(&self) -> AnalyticsResult<()> {
        validate_partials(&self.partials)
    }
}

/// 부분 청산 비율이 비어 있지 않고, 모두 양수이며, 합이 정확히 1인지 확인합니다.
pub fn validate_partials(partials: &[Decimal]) -> AnalyticsResult<()> {
    if partials.is_empty() {
        return Err(AnalyticsError::InvalidInput(
            "partials must not be empty".to_string(),
        ));
    }
    if let Some(bad) = partials.iter().find(|p| **p <= Decimal::ZERO) {
        return Err(AnalyticsError::InvalidInput(format!(
            "partial fraction must be positive, got {}",
            bad
        )));
    }
    let total: Decimal = partials.iter().sum();
    if total != Decimal::ONE {
        return Err(AnalyticsError::InvalidInput(format!(
            "partials must sum to 1, got {}",
            total
        )));
    }
    Ok(())
}

impl ChallengeRules {
    /// 규칙 값을 검증합니다.
    pub fn validate(&self) -> AnalyticsResult<()> {
        let positive = [
            ("profit_target", self.profit_target),
            ("max_daily_loss", self.max_daily_loss),
            ("max_total_loss", self.max_total_loss),
            ("risk_per_trade", self.risk_per_trade),
        ];
        for (name, value) in positive {
            if value <= Decimal::ZERO {
                return Err(AnalyticsError::Config(format!(
                    "challenge.{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.period_months == 0 {
            return Err(AnalyticsError::Config(
                "challenge.period_months must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl AnalysisConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `RESULTS__` 접두사와 `__` 구분자를 사용합니다
    /// (예: `RESULTS__CHALLENGE__PROFIT_TARGET=8`).
    pub fn load<P: AsRef<Path>>(path: P) -> AnalyticsResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("RESULTS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 로드합니다.
    pub fn from_toml_str(contents: &str) -> AnalyticsResult<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 전체를 검증합니다.
    pub fn validate(&self) -> AnalyticsResult<()> {
        self.outcome.validate()?;
        self.risk.validate()?;

        if self.streak.tolerance < Decimal::ZERO {
            return Err(AnalyticsError::Config(format!(
                "streak.tolerance must not be negative, got {}",
                self.streak.tolerance
            )));
        }
        if self.levels.tick_size < Decimal::ZERO {
            return Err(AnalyticsError::Config(format!(
                "levels.tick_size must not be negative, got {}",
                self.levels.tick_size
            )));
        }
        if self.levels.max_iterations == 0 {
            return Err(AnalyticsError::Config(
                "levels.max_iterations must be at least 1".to_string(),
            ));
        }
        self.challenge.validate()?;

        if self.logging.format.parse::<crate::logging::LogFormat>().is_err() {
            return Err(AnalyticsError::Config(format!(
                "unknown logging.format '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.outcome.partials, vec![Decimal::ONE]);
        assert_eq!(config.streak.tolerance, dec!(0.1));
        assert_eq!(config.challenge.profit_target, dec!(10));
        assert_eq!(config.challenge.max_daily_loss, dec!(5));
        assert_eq!(config.challenge.max_total_loss, dec!(10));
    }

    #[test]
    fn test_partials_validation() {
        assert!(validate_partials(&[dec!(0.6), dec!(0.4)]).is_ok());
        assert!(validate_partials(&[]).is_err());
        assert!(validate_partials(&[dec!(0.6), dec!(0.3)]).is_err());
        assert!(validate_partials(&[dec!(1.2), dec!(-0.2)]).is_err());
    }

    #[test]
    fn test_risk_schedule_lookup() {
        let schedule = RiskSchedule::new(Decimal::ONE)
            .with_level(-1, dec!(0.5))
            .with_level(1, dec!(2));

        assert_eq!(schedule.risk_for(-1), dec!(0.5));
        assert_eq!(schedule.risk_for(1), dec!(2));
        assert_eq!(schedule.risk_for(0), Decimal::ONE);
        assert_eq!(schedule.risk_for(-2), Decimal::ONE);
    }

    #[test]
    fn test_from_toml_str() {
        let toml = r#"
            [outcome]
            partials = [0.6, 0.4]
            ignore = ["SL"]

            [risk]
            default = 1
            levels = [
                { streak = -1, risk = 0.5 },
                { streak = 2, risk = 2 },
            ]

            [challenge]
            profit_target = 8
            min_trading_days = 4
        "#;

        let config = AnalysisConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.outcome.partials, vec![dec!(0.6), dec!(0.4)]);
        assert_eq!(config.outcome.ignore, vec!["SL".to_string()]);
        assert_eq!(config.risk.risk_for(-1), dec!(0.5));
        assert_eq!(config.risk.risk_for(2), dec!(2));
        assert_eq!(config.challenge.profit_target, dec!(8));
        assert_eq!(config.challenge.min_trading_days, 4);
        // 지정하지 않은 값은 기본값 유지
        assert_eq!(config.challenge.max_daily_loss, dec!(5));
        assert_eq!(config.streak.tolerance, dec!(0.1));
    }

    #[test]
    fn test_invalid_challenge_rules_rejected() {
        let toml = r#"
            [challenge]
            period_months = 0
        "#;
        let err = AnalysisConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, AnalyticsError::Config(_)));
    }
}
