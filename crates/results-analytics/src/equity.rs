//! R 배수 기준 자산 곡선과 낙폭.
//!
//! 거래 결과를 테이블 순서대로 누적해 자산 곡선을 만들고,
//! 각 시점의 고점 대비 낙폭을 계산합니다. 고점은 0(시작 잔고)에서 시작하므로
//! 첫 거래부터 손실이 나면 그대로 낙폭이 됩니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use results_core::{RMultiple, TradeRecord};

/// 자산 곡선의 한 점.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    /// 원본 거래
    pub trade: TradeRecord,
    /// 누적 결과 (R)
    pub equity: RMultiple,
    /// 지금까지의 최고 누적 결과 (R, 0 이상)
    pub peak: RMultiple,
    /// 고점 대비 낙폭 (R, 0 이하)
    pub drawdown: RMultiple,
}

/// 테이블 순서대로 누적 결과와 낙폭을 계산합니다.
pub fn drawdown(trades: &[TradeRecord]) -> Vec<DrawdownPoint> {
    let mut equity = Decimal::ZERO;
    let mut peak = Decimal::ZERO;

    trades
        .iter()
        .map(|trade| {
            equity += trade.result;
            peak = peak.max(equity);
            DrawdownPoint {
                trade: *trade,
                equity,
                peak,
                drawdown: equity - peak,
            }
        })
        .collect()
}

/// 최대 낙폭 (R, 0 이하). 거래가 없으면 0.
pub fn max_drawdown(trades: &[TradeRecord]) -> RMultiple {
    drawdown(trades)
        .iter()
        .map(|p| p.drawdown)
        .min()
        .unwrap_or(Decimal::ZERO)
}
