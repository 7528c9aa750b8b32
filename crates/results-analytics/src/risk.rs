//! 연속 손익 기반 리스크 조절.
//!
//! 진입 시점에 확정되어 있던 연속 손익만 보고 리스크 배수를 정하므로
//! 아직 청산되지 않은 거래의 결과를 미리 보는 일이 없습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use results_core::{sorted_by_close, RiskSchedule, TradeRecord};

use crate::streak::make_streaks_by_open;

/// 리스크 배수가 정해진 거래.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskedTrade {
    /// 원본 거래 (결과는 리스크 1 기준)
    pub trade: TradeRecord,
    /// 진입 시점의 연속 손익
    pub streak_at_open: i64,
    /// 적용할 리스크 배수
    pub risk: Decimal,
}

impl RiskedTrade {
    /// 리스크를 반영한 결과.
    pub fn scaled_result(&self) -> Decimal {
        self.trade.result * self.risk
    }
}

/// 진입 시점의 연속 손익에 따라 거래마다 리스크 배수를 정합니다.
///
/// 결과는 진입 시각순입니다.
pub fn map_risk_to_streak(
    trades: &[TradeRecord],
    schedule: &RiskSchedule,
    tolerance: Decimal,
) -> Vec<RiskedTrade> {
    let risked: Vec<RiskedTrade> = make_streaks_by_open(trades, tolerance)
        .into_iter()
        .map(|point| RiskedTrade {
            trade: point.trade,
            streak_at_open: point.streak_at_open,
            risk: schedule.risk_for(point.streak_at_open),
        })
        .collect();

    debug!(
        trades = risked.len(),
        adjusted = risked.iter().filter(|t| t.risk != schedule.default).count(),
        "Risk mapped to streaks"
    );
    risked
}

/// 리스크를 반영한 결과 테이블을 청산 시각순으로 반환합니다.
pub fn result_by_close_given_risk(risked: &[RiskedTrade]) -> Vec<TradeRecord> {
    let scaled: Vec<TradeRecord> = risked
        .iter()
        .map(|t| t.trade.with_result(t.scaled_result()))
        .collect();
    sorted_by_close(&scaled)
}
