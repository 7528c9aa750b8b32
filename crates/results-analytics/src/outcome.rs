//! 포지션 결과 계산.
//!
//! 포지션 기록의 보호 주문 체결 내역을 시간순으로 따라가며
//! 부분 청산을 적용해 R 배수 결과를 계산합니다.
//!
//! # 청산 규칙
//!
//! - 익절 체결: 다음 부분 청산 비율만큼 체결가에 청산
//! - 손절 체결: 남은 포지션 전체를 체결가에 청산하고 종료
//! - 포지션 종료 시각 이후의 체결은 무시
//! - 남은 포지션은 포지션 종료 기준가에 청산

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use results_core::{
    validate_partials, AnalyticsError, AnalyticsResult, DecimalExt, Fill, OrderKind,
    PositionRecord, Price, ProtectiveOrder, RMultiple, TradeRecord,
};

/// 포지션 종료 기준가로 청산된 구간의 이름.
pub const END_OF_POSITION: &str = "EOP";

/// 청산 구간 하나.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitLeg {
    /// 청산을 일으킨 주문 이름 (종료 기준가면 "EOP")
    pub name: String,
    /// 청산한 포지션 비율
    pub fraction: Decimal,
    /// 청산 가격/시각
    pub fill: Fill,
    /// 이 구간의 R 배수 (비율 적용 전)
    pub r: RMultiple,
}

/// 포지션 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionOutcome {
    /// 마지막 청산 시각
    pub closed_at: DateTime<Utc>,
    /// 비율 가중 R 배수 결과
    pub result: RMultiple,
    /// 청산 구간 (시간순)
    pub exits: Vec<ExitLeg>,
}

/// 체결된 보호 주문을 체결 시각순으로 반환합니다.
///
/// `ignore`에 이름이 포함된 주문은 체결되지 않은 것으로 간주합니다.
pub fn get_executed_orders<'a, S: AsRef<str>>(
    position: &'a PositionRecord,
    ignore: &[S],
) -> Vec<&'a ProtectiveOrder> {
    let mut executed: Vec<&ProtectiveOrder> = position
        .orders
        .iter()
        .filter(|o| o.is_executed())
        .filter(|o| !ignore.iter().any(|name| name.as_ref() == o.name))
        .collect();
    executed.sort_by_key(|o| o.execution.map(|f| f.time));
    executed
}

/// 익절 가격을 가까운 것부터 반환합니다 (롱: 오름차순, 숏: 내림차순).
pub fn get_position_tps(position: &PositionRecord) -> Vec<Price> {
    let mut prices: Vec<Price> = position.take_profits().map(|o| o.price).collect();
    prices.sort_by(|a, b| {
        if position.side.is_more_favorable(*a, *b) {
            std::cmp::Ordering::Greater
        } else if position.side.is_more_favorable(*b, *a) {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Equal
        }
    });
    prices
}

/// 포지션의 청산 시각과 R 배수 결과를 계산합니다.
///
/// # Arguments
///
/// * `position` - 포지션 기록
/// * `partials` - 익절 체결마다 청산할 비율 (합계 1)
/// * `ignore` - 체결되지 않은 것으로 간주할 주문 이름
///
/// # Errors
///
/// 부분 청산 비율이 잘못되었거나, 손절 주문이 없거나, 초기 리스크가 0이면 에러를 반환합니다.
pub fn determine_position_result<S: AsRef<str>>(
    position: &PositionRecord,
    partials: &[Decimal],
    ignore: &[S],
) -> AnalyticsResult<PositionOutcome> {
    let _span =
        results_core::analysis_span!("determine_position_result", position.symbol, position.id)
            .entered();
    validate_partials(partials)?;
    let risk = position.initial_risk()?;

    let side = position.side;
    let entry = position.entry.price;
    let end = position.end_of_position;
    let r_at = |price: Price| side.signed_move(entry, price) / risk;

    let mut fractions = partials.iter().copied();
    let mut open_fraction = Decimal::ONE;
    let mut exits = Vec::new();

    for order in get_executed_orders(position, ignore) {
        let Some(fill) = order.execution else {
            continue;
        };
        // 시간순 정렬이므로 이후 체결도 모두 종료 이후
        if fill.time > end.time {
            break;
        }

        let fraction = match order.kind {
            OrderKind::TakeProfit => match fractions.next() {
                Some(fraction) => fraction,
                None => break,
            },
            OrderKind::StopLoss => open_fraction,
        };

        exits.push(ExitLeg {
            name: order.name.clone(),
            fraction,
            fill,
            r: r_at(fill.price),
        });
        open_fraction -= fraction;

        if order.kind == OrderKind::StopLoss || open_fraction <= Decimal::ZERO {
            open_fraction = Decimal::ZERO;
            break;
        }
    }

    if open_fraction > Decimal::ZERO {
        exits.push(ExitLeg {
            name: END_OF_POSITION.to_string(),
            fraction: open_fraction,
            fill: end,
            r: r_at(end.price),
        });
    }

    let result: RMultiple = exits.iter().map(|leg| leg.fraction * leg.r).sum();
    let closed_at = exits.last().map(|leg| leg.fill.time).ok_or_else(|| {
        AnalyticsError::Position(format!("position '{}' never closed", position.id))
    })?;

    debug!(
        position_id = %position.id,
        legs = exits.len(),
        result = %result.to_r_string(),
        "Position outcome determined"
    );

    Ok(PositionOutcome {
        closed_at,
        result,
        exits,
    })
}

/// 포지션 기록들로 거래 결과 테이블을 만듭니다.
///
/// 행 순서는 입력 순서를 따르며 진입 시각은 각 포지션의 진입 시각입니다.
pub fn make_results<S: AsRef<str>>(
    positions: &[PositionRecord],
    partials: &[Decimal],
    ignore: &[S],
) -> AnalyticsResult<Vec<TradeRecord>> {
    let _span = results_core::analysis_span!("make_results").entered();

    let trades = positions
        .iter()
        .map(|position| -> AnalyticsResult<TradeRecord> {
            let outcome = determine_position_result(position, partials, ignore)?;
            Ok(TradeRecord::new(
                position.entry.time,
                outcome.closed_at,
                outcome.result,
            ))
        })
        .collect::<AnalyticsResult<Vec<_>>>()?;

    debug!(positions = positions.len(), "Trade results built");
    Ok(trades)
}
