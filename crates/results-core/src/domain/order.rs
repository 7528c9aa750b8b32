//! 포지션 방향과 보호 주문 타입.
//!
//! 이 모듈은 백테스트 결과 기록의 주문 관련 타입을 정의합니다:
//! - `Side` - 포지션 방향 (롱/숏)
//! - `OrderKind` - 보호 주문 유형 (손절/익절)
//! - `Fill` - 체결 또는 기준 가격/시각
//! - `ProtectiveOrder` - 포지션에 걸린 손절/익절 주문

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Price;

/// 포지션 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 롱 (매수 진입)
    Long,
    /// 숏 (매도 진입)
    Short,
}

impl Side {
    /// 진입가 대비 가격 이동을 포지션 방향 기준으로 반환합니다 (유리하면 양수).
    pub fn signed_move(&self, entry: Price, price: Price) -> Price {
        match self {
            Side::Long => price - entry,
            Side::Short => entry - price,
        }
    }

    /// `a`가 `b`보다 이 방향에 유리한 가격인지 확인합니다.
    pub fn is_more_favorable(&self, a: Price, b: Price) -> bool {
        match self {
            Side::Long => a > b,
            Side::Short => a < b,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
            Side::Short => write!(f, "SHORT"),
        }
    }
}

/// 보호 주문 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// 손절 주문 - 체결 시 남은 포지션 전체 청산
    StopLoss,
    /// 익절 주문 - 체결 시 부분 청산
    TakeProfit,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKind::StopLoss => write!(f, "STOP_LOSS"),
            OrderKind::TakeProfit => write!(f, "TAKE_PROFIT"),
        }
    }
}

/// 가격과 시각의 쌍 (체결, 진입, 포지션 종료 기준가).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// 가격
    pub price: Price,
    /// 시각 (UTC)
    pub time: DateTime<Utc>,
}

impl Fill {
    /// 새 체결 정보를 생성합니다.
    pub fn new(price: Price, time: DateTime<Utc>) -> Self {
        Self { price, time }
    }
}

/// 포지션에 걸린 손절/익절 주문.
///
/// 백테스터는 포지션이 이미 청산된 뒤에도 각 주문이 "만약 남아 있었다면"
/// 언제 체결되었을지를 `execution`에 기록합니다. 어떤 체결을 인정할지는
/// 분석하는 쪽에서 결정합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectiveOrder {
    /// 주문 이름 (예: "SL", "TP1"). 무시 목록은 이 이름으로 매칭됩니다.
    pub name: String,
    /// 주문 유형
    pub kind: OrderKind,
    /// 주문 가격
    pub price: Price,
    /// 체결 정보 (미체결이면 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<Fill>,
}

impl ProtectiveOrder {
    /// 미체결 손절 주문을 생성합니다.
    pub fn stop_loss(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            kind: OrderKind::StopLoss,
            price,
            execution: None,
        }
    }

    /// 미체결 익절 주문을 생성합니다.
    pub fn take_profit(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            kind: OrderKind::TakeProfit,
            price,
            execution: None,
        }
    }

    /// 체결 정보를 설정합니다.
    pub fn with_execution(mut self, price: Price, time: DateTime<Utc>) -> Self {
        self.execution = Some(Fill::new(price, time));
        self
    }

    /// 체결되었는지 확인합니다.
    pub fn is_executed(&self) -> bool {
        self.execution.is_some()
    }
}
