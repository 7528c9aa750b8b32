//! 거래 결과 테이블 요약 통계.
//!
//! 모든 금액은 R 배수입니다. 승/패 분류는 연속 손익 계산과 같은 허용 오차를 사용합니다.

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use results_core::{sorted_by_close, Percentage, RMultiple, TradeDirection, TradeRecord};

use crate::equity::max_drawdown;
use crate::streak::make_streaks_by_close;

/// 손실 없이 수익만 있을 때의 Profit Factor.
const UNBOUNDED_PROFIT_FACTOR: Decimal = dec!(999999);

/// 밀리초 단위 평균. 거래 수가 `i32` 범위를 넘어도 잘리지 않습니다.
fn average_duration(total: Duration, count: usize) -> Duration {
    match i64::try_from(count) {
        Ok(0) => Duration::zero(),
        Ok(count) => Duration::milliseconds(total.num_milliseconds() / count),
        Err(_) => Duration::zero(),
    }
}

/// 결과 요약.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// 총 거래 수
    pub total_trades: usize,
    /// 수익 거래 수
    pub wins: usize,
    /// 손실 거래 수
    pub losses: usize,
    /// 본전 거래 수
    pub breakevens: usize,
    /// 승률 (%, 본전 포함 전체 거래 기준)
    pub win_rate_pct: Percentage,
    /// 총 결과
    pub total_r: RMultiple,
    /// 거래당 평균 결과
    pub average_r: RMultiple,
    /// 평균 수익 (수익 거래만)
    pub avg_win: RMultiple,
    /// 평균 손실 (손실 거래만, 양수)
    pub avg_loss: RMultiple,
    /// 기대값 (승률×평균수익 - 패률×평균손실)
    pub expectancy: RMultiple,
    /// Profit Factor (총수익 / 총손실)
    pub profit_factor: Decimal,
    /// 최대 낙폭 (청산 순서 기준, 0 이하)
    pub max_drawdown: RMultiple,
    /// 최장 연승
    pub longest_win_streak: i64,
    /// 최장 연패 (양수)
    pub longest_loss_streak: i64,
    /// 평균 보유 기간
    pub avg_holding_period: Duration,
}

impl Default for ResultSummary {
    fn default() -> Self {
        Self {
            total_trades: 0,
            wins: 0,
            losses: 0,
            breakevens: 0,
            win_rate_pct: Decimal::ZERO,
            total_r: Decimal::ZERO,
            average_r: Decimal::ZERO,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            expectancy: Decimal::ZERO,
            profit_factor: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
            longest_win_streak: 0,
            longest_loss_streak: 0,
            avg_holding_period: Duration::zero(),
        }
    }
}

impl ResultSummary {
    /// 거래 결과 테이블에서 요약을 계산합니다.
    pub fn from_trades(trades: &[TradeRecord], tolerance: Decimal) -> Self {
        if trades.is_empty() {
            return Self::default();
        }

        let mut summary = Self {
            total_trades: trades.len(),
            ..Self::default()
        };
        let mut gross_profit = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;
        let mut holding = Duration::zero();

        for trade in trades {
            summary.total_r += trade.result;
            holding += trade.holding_duration();

            match trade.direction(tolerance) {
                TradeDirection::Win => {
                    summary.wins += 1;
                    gross_profit += trade.result;
                }
                TradeDirection::Loss => {
                    summary.losses += 1;
                    gross_loss += trade.result.abs();
                }
                TradeDirection::Breakeven => summary.breakevens += 1,
            }
        }

        let total = Decimal::from(summary.total_trades);
        summary.win_rate_pct = Decimal::from(summary.wins) / total * dec!(100);
        summary.average_r = summary.total_r / total;

        if summary.wins > 0 {
            summary.avg_win = gross_profit / Decimal::from(summary.wins);
        }
        if summary.losses > 0 {
            summary.avg_loss = gross_loss / Decimal::from(summary.losses);
        }

        let win_prob = Decimal::from(summary.wins) / total;
        let loss_prob = Decimal::from(summary.losses) / total;
        summary.expectancy = win_prob * summary.avg_win - loss_prob * summary.avg_loss;

        if gross_loss > Decimal::ZERO {
            summary.profit_factor = gross_profit / gross_loss;
        } else if gross_profit > Decimal::ZERO {
            summary.profit_factor = UNBOUNDED_PROFIT_FACTOR;
        }

        summary.max_drawdown = max_drawdown(&sorted_by_close(trades));

        let streaks = make_streaks_by_close(trades, tolerance);
        summary.longest_win_streak = streaks.iter().map(|p| p.streak).max().unwrap_or(0).max(0);
        summary.longest_loss_streak = -streaks.iter().map(|p| p.streak).min().unwrap_or(0).min(0);

        summary.avg_holding_period = average_duration(holding, summary.total_trades);
        summary
    }
}
