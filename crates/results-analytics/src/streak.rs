//! 연속 손익(streak) 계산.
//!
//! 연속 수익은 양수, 연속 손실은 음수로 표시합니다 (`+3` = 3연승, `-2` = 2연패).
//! 허용 오차 이내의 본전 거래는 진행 중인 연속 기록을 끊지 않고 한 칸 늘립니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use results_core::{RMultiple, TradeDirection, TradeRecord};

/// 청산 순서 기준 연속 손익.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakPoint {
    /// 원본 거래
    pub trade: TradeRecord,
    /// 이 거래 청산 직후의 연속 손익
    pub streak: i64,
    /// 다음 거래에서 연속 기록이 반전되는 마지막 거래인지 여부
    pub streak_max: bool,
}

/// 진입 시점에 알 수 있던 연속 손익.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenStreakPoint {
    /// 원본 거래
    pub trade: TradeRecord,
    /// 진입 시점의 연속 손익
    pub streak_at_open: i64,
}

/// 끝난 연속 기록 하나.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRun {
    /// 연속 기록이 끝난 거래의 청산 시각
    pub ended_at: DateTime<Utc>,
    /// 연속 기록 길이 (부호 포함)
    pub length: i64,
}

/// 결과 순서대로 연속 손익을 계산합니다.
///
/// 선행 본전 거래는 0으로 남습니다.
pub fn add_streak(results: &[RMultiple], tolerance: Decimal) -> Vec<i64> {
    let mut streak: i64 = 0;

    results
        .iter()
        .map(|result| {
            streak = match TradeDirection::classify(*result, tolerance) {
                TradeDirection::Win if streak > 0 => streak + 1,
                TradeDirection::Win => 1,
                TradeDirection::Loss if streak < 0 => streak - 1,
                TradeDirection::Loss => -1,
                TradeDirection::Breakeven => streak + streak.signum(),
            };
            streak
        })
        .collect()
}

/// 청산 시각순으로 연속 손익과 반전 지점을 계산합니다.
///
/// 마지막 연속 기록은 아직 끝나지 않았으므로 표시되지 않습니다.
pub fn make_streaks_by_close(trades: &[TradeRecord], tolerance: Decimal) -> Vec<StreakPoint> {
    let sorted = results_core::sorted_by_close(trades);
    let results: Vec<RMultiple> = sorted.iter().map(|t| t.result).collect();
    let streaks = add_streak(&results, tolerance);

    sorted
        .iter()
        .enumerate()
        .map(|(i, trade)| {
            let streak = streaks[i];
            let streak_max = streaks
                .get(i + 1)
                .is_some_and(|next| streak != 0 && next.signum() == -streak.signum());
            StreakPoint {
                trade: *trade,
                streak,
                streak_max,
            }
        })
        .collect()
}

/// 각 거래의 진입 시점에 확정되어 있던 연속 손익을 계산합니다.
///
/// 먼저 진입한 거래가 모두 청산되었을 때만 그중 가장 늦게 청산된 거래의
/// 연속 손익을 사용하고, 아직 열린 거래가 있으면 0입니다.
/// 결과는 진입 시각순입니다.
pub fn make_streaks_by_open(trades: &[TradeRecord], tolerance: Decimal) -> Vec<OpenStreakPoint> {
    // 청산 순서상의 위치와 연속 손익을 원래 인덱스에 매핑
    let mut by_close: Vec<usize> = (0..trades.len()).collect();
    by_close.sort_by_key(|&i| trades[i].closed_at);
    let results: Vec<RMultiple> = by_close.iter().map(|&i| trades[i].result).collect();
    let streaks = add_streak(&results, tolerance);

    let mut rank = vec![0usize; trades.len()];
    let mut streak_of = vec![0i64; trades.len()];
    for (position, &i) in by_close.iter().enumerate() {
        rank[i] = position;
        streak_of[i] = streaks[position];
    }

    let mut by_open: Vec<usize> = (0..trades.len()).collect();
    by_open.sort_by_key(|&i| trades[i].opened_at);

    let mut latest: Option<usize> = None;
    by_open
        .into_iter()
        .map(|i| {
            let trade = trades[i];
            let streak_at_open = match latest {
                Some(j) if trades[j].closed_at <= trade.opened_at => streak_of[j],
                _ => 0,
            };
            if latest.map_or(true, |j| rank[i] > rank[j]) {
                latest = Some(i);
            }
            OpenStreakPoint {
                trade,
                streak_at_open,
            }
        })
        .collect()
}

/// 끝난 연속 기록들을 청산 시각순으로 반환합니다.
pub fn get_streak_runs(trades: &[TradeRecord], tolerance: Decimal) -> Vec<StreakRun> {
    make_streaks_by_close(trades, tolerance)
        .into_iter()
        .filter(|p| p.streak_max)
        .map(|p| StreakRun {
            ended_at: p.trade.closed_at,
            length: p.streak,
        })
        .collect()
}
