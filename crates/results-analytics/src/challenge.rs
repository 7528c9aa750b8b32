//! 프랍 트레이딩 챌린지 통과 여부 시뮬레이션.
//!
//! 매월 1일 00:00 UTC에 새 챌린지를 시작했다고 가정하고, 각 기간 동안
//! 청산된 거래를 순서대로 적용해 통과/실패/미실패를 판정합니다.
//!
//! # 판정 규칙
//!
//! 손익은 `result × risk_per_trade` (%)로 계산합니다.
//!
//! 1. 당일 누적 손익이 `-max_daily_loss` 이하 → 실패
//! 2. 시작 잔고(또는 고점) 대비 손실이 `-max_total_loss` 이하 → 실패
//! 3. 누적 손익이 `profit_target` 이상이고 거래일 수를 채움 → 통과
//! 4. 기간 종료 시 손실 상태 → 실패, 그 외 → 미실패

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use results_core::{
    sorted_by_close, AnalyticsError, AnalyticsResult, ChallengeRules, Percentage, TradeRecord,
};

/// 챌린지 판정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeOutcome {
    /// 목표 수익 달성
    Passed,
    /// 손실 한도 초과 또는 손실로 종료
    Failed,
    /// 실패하지 않았지만 목표에 도달하지 못함
    NotFailed,
}

impl fmt::Display for ChallengeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeOutcome::Passed => write!(f, "passed"),
            ChallengeOutcome::Failed => write!(f, "failed"),
            ChallengeOutcome::NotFailed => write!(f, "not failed"),
        }
    }
}

/// 실패 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// 일일 손실 한도 초과
    DailyLoss,
    /// 전체 손실 한도 초과
    TotalLoss,
    /// 기간 종료 시 손실
    EndedInLoss,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::DailyLoss => write!(f, "max daily loss reached"),
            FailureReason::TotalLoss => write!(f, "max total loss reached"),
            FailureReason::EndedInLoss => write!(f, "ended in loss"),
        }
    }
}

/// 챌린지 시도 하나.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeAttempt {
    /// 시작 시각 (해당 월 1일 00:00 UTC)
    pub start: DateTime<Utc>,
    /// 종료 시각 (미포함)
    pub end: DateTime<Utc>,
    /// 판정 결과
    pub outcome: ChallengeOutcome,
    /// 실패 사유
    pub reason: Option<FailureReason>,
    /// 판정 시점의 누적 손익 (%)
    pub equity: Percentage,
    /// 판정 시점까지의 거래일 수
    pub trading_days: usize,
    /// 판정 시점까지 적용한 거래 수
    pub trades: usize,
}

/// 챌린지 시도들의 집계.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeReport {
    /// 전체 시도 수
    pub attempts: usize,
    /// 통과 수
    pub passed: usize,
    /// 실패 수
    pub failed: usize,
    /// 미실패 수
    pub not_failed: usize,
    /// 통과율 (%)
    pub pass_rate: Percentage,
    /// 실패율 (%)
    pub fail_rate: Percentage,
}

impl ChallengeReport {
    /// 시도 목록에서 집계를 계산합니다.
    pub fn from_attempts(attempts: &[ChallengeAttempt]) -> Self {
        let count = |outcome: ChallengeOutcome| {
            attempts.iter().filter(|a| a.outcome == outcome).count()
        };
        let passed = count(ChallengeOutcome::Passed);
        let failed = count(ChallengeOutcome::Failed);
        let not_failed = count(ChallengeOutcome::NotFailed);

        let rate = |n: usize| {
            if attempts.is_empty() {
                Decimal::ZERO
            } else {
                Decimal::from(n) / Decimal::from(attempts.len()) * Decimal::ONE_HUNDRED
            }
        };

        Self {
            attempts: attempts.len(),
            passed,
            failed,
            not_failed,
            pass_rate: rate(passed),
            fail_rate: rate(failed),
        }
    }
}

/// 해당 시각이 속한 달의 1일 00:00 UTC.
fn month_start(time: DateTime<Utc>) -> AnalyticsResult<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(time.year(), time.month(), 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| AnalyticsError::Data(format!("invalid month start for {}", time)))
}

fn add_months(time: DateTime<Utc>, months: u32) -> AnalyticsResult<DateTime<Utc>> {
    time.checked_add_months(Months::new(months))
        .ok_or_else(|| AnalyticsError::Data(format!("date overflow adding {} months", months)))
}

/// 한 기간의 챌린지를 판정합니다. `trades`는 청산 시각순이어야 합니다.
fn evaluate_window(
    trades: &[TradeRecord],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rules: &ChallengeRules,
) -> ChallengeAttempt {
    let mut equity = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut daily = Decimal::ZERO;
    let mut current_day: Option<NaiveDate> = None;
    let mut days = BTreeSet::new();
    let mut applied = 0;

    let attempt = |outcome: ChallengeOutcome,
                   reason: Option<FailureReason>,
                   equity: Decimal,
                   days: &BTreeSet<NaiveDate>,
                   applied: usize| ChallengeAttempt {
        start,
        end,
        outcome,
        reason,
        equity,
        trading_days: days.len(),
        trades: applied,
    };

    for trade in trades
        .iter()
        .filter(|t| t.closed_at >= start && t.closed_at < end)
    {
        let day = trade.close_date();
        if current_day != Some(day) {
            current_day = Some(day);
            daily = Decimal::ZERO;
        }
        days.insert(day);
        applied += 1;

        let pnl = trade.result * rules.risk_per_trade;
        equity += pnl;
        daily += pnl;
        peak = peak.max(equity);

        if daily <= -rules.max_daily_loss {
            return attempt(
                ChallengeOutcome::Failed,
                Some(FailureReason::DailyLoss),
                equity,
                &days,
                applied,
            );
        }

        let loss = if rules.trailing_drawdown {
            equity - peak
        } else {
            equity
        };
        if loss <= -rules.max_total_loss {
            return attempt(
                ChallengeOutcome::Failed,
                Some(FailureReason::TotalLoss),
                equity,
                &days,
                applied,
            );
        }

        if equity >= rules.profit_target && days.len() >= rules.min_trading_days {
            return attempt(ChallengeOutcome::Passed, None, equity, &days, applied);
        }
    }

    if equity < Decimal::ZERO {
        attempt(
            ChallengeOutcome::Failed,
            Some(FailureReason::EndedInLoss),
            equity,
            &days,
            applied,
        )
    } else {
        attempt(ChallengeOutcome::NotFailed, None, equity, &days, applied)
    }
}

/// 매월 시작하는 챌린지 시도를 판정합니다.
///
/// 첫 거래의 청산 월부터 시작하며, 마지막 청산 시각이 기간 종료 시각 이상인
/// (데이터가 기간 전체를 덮는) 기간만 평가합니다.
///
/// # Errors
///
/// 챌린지 규칙이 잘못되었으면 에러를 반환합니다.
pub fn challenge_pass(
    trades: &[TradeRecord],
    rules: &ChallengeRules,
) -> AnalyticsResult<Vec<ChallengeAttempt>> {
    rules.validate()?;
    let _span = results_core::analysis_span!("challenge_pass").entered();

    let sorted = sorted_by_close(trades);
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        debug!("No trades for challenge simulation");
        return Ok(Vec::new());
    };

    let mut attempts = Vec::new();
    let mut start = month_start(first.closed_at)?;
    loop {
        let end = add_months(start, rules.period_months)?;
        if last.closed_at < end {
            break;
        }
        attempts.push(evaluate_window(&sorted, start, end, rules));
        start = add_months(start, 1)?;
    }

    if attempts.is_empty() {
        warn!(
            first_close = %first.closed_at,
            last_close = %last.closed_at,
            period_months = rules.period_months,
            "Trades do not cover a full challenge period"
        );
    }

    let report = ChallengeReport::from_attempts(&attempts);
    info!(
        attempts = report.attempts,
        passed = report.passed,
        failed = report.failed,
        not_failed = report.not_failed,
        "Challenge simulation finished"
    );
    Ok(attempts)
}
