//! 거래 일정 관련 계산.
//!
//! - 하루 최대 거래 수 제한 시뮬레이션
//! - 진입 시점에 동시에 열려 있던 거래 수

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use results_core::{sorted_by_open, TradeRecord};

/// 진입 시점의 동시 보유 거래 수.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTradesPoint {
    /// 원본 거래
    pub trade: TradeRecord,
    /// 이 거래를 포함해 진입 시점에 열려 있던 거래 수
    pub open_trades: usize,
}

/// 진입일(UTC)마다 처음 `max_per_day`개의 거래만 남깁니다.
///
/// 결과는 진입 시각순입니다.
pub fn reduce_daily_trades(trades: &[TradeRecord], max_per_day: usize) -> Vec<TradeRecord> {
    let mut current_day: Option<NaiveDate> = None;
    let mut taken = 0;

    let kept: Vec<TradeRecord> = sorted_by_open(trades)
        .into_iter()
        .filter(|trade| {
            let day = trade.open_date();
            if current_day != Some(day) {
                current_day = Some(day);
                taken = 0;
            }
            taken += 1;
            taken <= max_per_day
        })
        .collect();

    debug!(
        before = trades.len(),
        after = kept.len(),
        max_per_day,
        "Daily trades reduced"
    );
    kept
}

/// 각 거래의 진입 시점에 열려 있던 거래 수를 계산합니다.
///
/// 거래 자신은 항상 포함하고, 진입 시각이 같거나 이전이면서 청산 시각이
/// 그 진입 시각 이후인 다른 거래를 더합니다. 결과는 진입 시각순입니다.
pub fn add_open_trades(trades: &[TradeRecord]) -> Vec<OpenTradesPoint> {
    let sorted = sorted_by_open(trades);

    sorted
        .iter()
        .enumerate()
        .map(|(i, trade)| {
            let others = sorted
                .iter()
                .enumerate()
                .take_while(|(_, other)| other.opened_at <= trade.opened_at)
                .filter(|&(j, other)| j != i && other.closed_at > trade.opened_at)
                .count();
            OpenTradesPoint {
                trade: *trade,
                open_trades: others + 1,
            }
        })
        .collect()
}
