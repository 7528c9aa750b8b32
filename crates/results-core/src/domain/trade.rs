//! 거래 결과 테이블의 행.
//!
//! 포지션 기록에서 계산된 결과는 진입 시각, 청산 시각, R 배수 결과의
//! 세 값으로 정리되며, 이후의 모든 분석(연속 손익, 낙폭, 챌린지)은
//! 이 행들의 슬라이스를 입력으로 받습니다.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::RMultiple;

/// 거래 하나의 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// 진입 시각
    pub opened_at: DateTime<Utc>,
    /// 청산 시각
    pub closed_at: DateTime<Utc>,
    /// 결과 (R 배수)
    pub result: RMultiple,
}

/// 결과 부호에 따른 거래 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    /// 수익
    Win,
    /// 손실
    Loss,
    /// 본전 (허용 오차 이내)
    Breakeven,
}

impl TradeDirection {
    /// 허용 오차를 적용해 결과를 분류합니다.
    ///
    /// `|result| < tolerance`이거나 정확히 0이면 본전입니다.
    pub fn classify(result: RMultiple, tolerance: Decimal) -> Self {
        if result.abs() < tolerance || result.is_zero() {
            TradeDirection::Breakeven
        } else if result > Decimal::ZERO {
            TradeDirection::Win
        } else {
            TradeDirection::Loss
        }
    }
}

impl TradeRecord {
    /// 새 거래 결과를 생성합니다.
    pub fn new(opened_at: DateTime<Utc>, closed_at: DateTime<Utc>, result: RMultiple) -> Self {
        Self {
            opened_at,
            closed_at,
            result,
        }
    }

    /// 결과를 바꾼 복사본을 반환합니다.
    pub fn with_result(self, result: RMultiple) -> Self {
        Self { result, ..self }
    }

    /// 보유 기간을 반환합니다.
    pub fn holding_duration(&self) -> Duration {
        self.closed_at - self.opened_at
    }

    /// 청산일 (UTC 기준).
    pub fn close_date(&self) -> NaiveDate {
        self.closed_at.date_naive()
    }

    /// 진입일 (UTC 기준).
    pub fn open_date(&self) -> NaiveDate {
        self.opened_at.date_naive()
    }

    /// 허용 오차를 적용해 결과를 분류합니다.
    pub fn direction(&self, tolerance: Decimal) -> TradeDirection {
        TradeDirection::classify(self.result, tolerance)
    }
}

/// 청산 시각 기준으로 정렬한 복사본을 반환합니다 (같은 시각은 원래 순서 유지).
pub fn sorted_by_close(trades: &[TradeRecord]) -> Vec<TradeRecord> {
    let mut sorted = trades.to_vec();
    sorted.sort_by_key(|t| t.closed_at);
    sorted
}

/// 진입 시각 기준으로 정렬한 복사본을 반환합니다 (같은 시각은 원래 순서 유지).
pub fn sorted_by_open(trades: &[TradeRecord]) -> Vec<TradeRecord> {
    let mut sorted = trades.to_vec();
    sorted.sort_by_key(|t| t.opened_at);
    sorted
}
