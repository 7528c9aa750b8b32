//! 백테스트 포지션 기록.
//!
//! 이 모듈은 백테스터가 내보내는 포지션 단위 기록을 정의합니다:
//! - `PositionRecord` - 진입, 보호 주문, 종료 기준가, 진입 이후 가격 경로
//! - `PriceBar` - 레벨 탐색에 쓰이는 고가/저가 봉

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order::{Fill, OrderKind, ProtectiveOrder, Side};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::types::Price;

/// 진입 이후 가격 경로의 한 봉.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 봉 시각 (UTC)
    pub time: DateTime<Utc>,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
}

impl PriceBar {
    /// 새 봉을 생성합니다.
    pub fn new(time: DateTime<Utc>, high: Price, low: Price) -> Self {
        Self { time, high, low }
    }

    /// 이 방향에 가장 유리했던 가격 (롱: 고가, 숏: 저가).
    pub fn favorable(&self, side: Side) -> Price {
        match side {
            Side::Long => self.high,
            Side::Short => self.low,
        }
    }

    /// 이 방향에 가장 불리했던 가격 (롱: 저가, 숏: 고가).
    pub fn adverse(&self, side: Side) -> Price {
        match side {
            Side::Long => self.low,
            Side::Short => self.high,
        }
    }
}

/// 백테스트에서 나온 포지션 하나의 기록.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// 포지션 ID
    #[serde(default)]
    pub id: String,
    /// 거래 심볼
    #[serde(default)]
    pub symbol: String,
    /// 포지션 방향
    pub side: Side,
    /// 진입 가격/시각
    pub entry: Fill,
    /// 손절/익절 주문
    #[serde(default)]
    pub orders: Vec<ProtectiveOrder>,
    /// 포지션 종료 기준가 (보호 주문으로 청산되지 않으면 이 가격에 청산)
    pub end_of_position: Fill,
    /// 진입 이후 가격 경로 (시간순)
    #[serde(default)]
    pub bars: Vec<PriceBar>,
}

impl PositionRecord {
    /// 새 포지션 기록을 생성합니다.
    pub fn new(side: Side, entry: Fill, end_of_position: Fill) -> Self {
        Self {
            id: String::new(),
            symbol: String::new(),
            side,
            entry,
            orders: Vec::new(),
            end_of_position,
            bars: Vec::new(),
        }
    }

    /// ID를 설정합니다.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// 심볼을 설정합니다.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// 보호 주문을 추가합니다.
    pub fn with_order(mut self, order: ProtectiveOrder) -> Self {
        self.orders.push(order);
        self
    }

    /// 가격 경로를 설정합니다.
    pub fn with_bars(mut self, bars: Vec<PriceBar>) -> Self {
        self.bars = bars;
        self
    }

    /// 계획된 손절 주문을 반환합니다 (여러 개면 첫 번째).
    pub fn stop_loss(&self) -> Option<&ProtectiveOrder> {
        self.orders.iter().find(|o| o.kind == OrderKind::StopLoss)
    }

    /// 익절 주문들을 반환합니다 (기록 순서).
    pub fn take_profits(&self) -> impl Iterator<Item = &ProtectiveOrder> {
        self.orders.iter().filter(|o| o.kind == OrderKind::TakeProfit)
    }

    /// 초기 리스크 (진입가와 계획된 손절가의 거리)를 반환합니다.
    ///
    /// 손절 주문이 없거나 거리가 0이면 에러를 반환합니다.
    pub fn initial_risk(&self) -> AnalyticsResult<Price> {
        let stop = self.stop_loss().ok_or_else(|| {
            AnalyticsError::Position(format!("position '{}' has no stop-loss order", self.id))
        })?;
        let risk = (self.entry.price - stop.price).abs();
        if risk.is_zero() {
            return Err(AnalyticsError::Position(format!(
                "position '{}' has zero initial risk",
                self.id
            )));
        }
        Ok(risk)
    }

    /// 진입 시각부터 포지션 종료 시각까지(양 끝 포함)의 가격 경로를 반환합니다.
    pub fn bars_until_end(&self) -> impl Iterator<Item = &PriceBar> {
        let start = self.entry.time;
        let end = self.end_of_position.time;
        self.bars
            .iter()
            .filter(move |b| b.time >= start && b.time <= end)
    }
}
