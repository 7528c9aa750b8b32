//! 사후 손절/익절 레벨 탐색.
//!
//! 진입 이후 가격 경로(`PriceBar`)를 보고 "이 포지션에 어떤 손절/익절을
//! 걸었어야 했는가"를 찾습니다.
//!
//! 봉 내부의 가격 순서는 알 수 없으므로 항상 불리한 쪽으로 가정합니다:
//! - 손절에 닿은 봉의 고가/저가는 유리한 움직임으로 인정하지 않습니다.
//! - 익절에 닿은 봉의 불리한 움직임은 손절 후보 계산에 포함합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use results_core::{LevelSearchConfig, PositionRecord, Price, PriceBar, Side};

use crate::outcome::get_position_tps;

/// 레벨 탐색 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestLevels {
    /// 손절 레벨
    pub stop_loss: Option<Price>,
    /// 익절 레벨
    pub take_profit: Option<Price>,
    /// 수행한 반복 횟수
    pub iterations: usize,
    /// 고정점에 도달했는지 여부
    pub converged: bool,
}

/// 봉이 손절 레벨에 닿았는지 확인합니다.
fn stop_touched(side: Side, bar: &PriceBar, level: Price) -> bool {
    match side {
        Side::Long => bar.low <= level,
        Side::Short => bar.high >= level,
    }
}

/// 봉이 익절 레벨에 닿았는지 확인합니다.
fn target_touched(side: Side, bar: &PriceBar, level: Price) -> bool {
    match side {
        Side::Long => bar.high >= level,
        Side::Short => bar.low <= level,
    }
}

/// 손절에 닿기 전(또는 포지션 종료까지) 도달한 가장 유리한 가격.
///
/// 진입가보다 유리하지 않으면 None.
fn favorable_before_stop(position: &PositionRecord, stop: Option<Price>) -> Option<Price> {
    let side = position.side;
    let best = position
        .bars_until_end()
        .take_while(|bar| stop.map_or(true, |level| !stop_touched(side, bar, level)))
        .map(|bar| bar.favorable(side))
        .reduce(|a, b| if side.is_more_favorable(b, a) { b } else { a })?;

    side.is_more_favorable(best, position.entry.price)
        .then_some(best)
}

/// 익절 레벨에 처음 닿는 봉까지(포함) 도달한 가장 불리한 가격을 한 틱 더 밀어낸 값.
///
/// 익절에 닿지 않거나 결과가 진입가의 불리한 쪽이 아니면 None.
fn adverse_until_target(position: &PositionRecord, target: Price, tick: Decimal) -> Option<Price> {
    let side = position.side;
    let bars: Vec<&PriceBar> = position.bars_until_end().collect();
    let hit = bars
        .iter()
        .position(|bar| target_touched(side, bar, target))?;

    let worst = bars[..=hit]
        .iter()
        .map(|bar| bar.adverse(side))
        .reduce(|a, b| if side.is_more_favorable(a, b) { b } else { a })?;

    let candidate = match side {
        Side::Long => worst - tick,
        Side::Short => worst + tick,
    };
    side.is_more_favorable(position.entry.price, candidate)
        .then_some(candidate)
}

/// 계획된 손절에 닿기 전까지 도달한 가장 유리한 가격을 익절 후보로 반환합니다.
///
/// 가격 경로가 없거나 진입가보다 유리한 가격에 도달하지 못했으면 None.
pub fn find_better_tp(position: &PositionRecord) -> Option<Price> {
    let stop = position.stop_loss().map(|o| o.price);
    favorable_before_stop(position, stop)
}

/// 가장 가까운 익절에 닿을 때까지 버틸 수 있었던 손절 후보를 반환합니다.
///
/// 손절을 무시했을 때 익절에 닿았다면, 그때까지의 최악 가격보다 `tick_size`
/// 만큼 바깥에 둔 손절은 체결되지 않습니다. 익절에 닿지 못했으면 None.
pub fn find_better_sl(position: &PositionRecord, tick_size: Decimal) -> Option<Price> {
    let target = get_position_tps(position).into_iter().next()?;
    adverse_until_target(position, target, tick_size)
}

/// 손절과 익절 후보를 번갈아 갱신해 서로 일관된 한 쌍을 찾습니다.
///
/// 시작 값이 없으면 계획된 손절 / 가장 가까운 익절에서 시작합니다.
/// 매 반복에서 현재 손절 기준으로 익절을, 그 익절 기준으로 손절을 다시
/// 계산하며, 갱신할 수 없는 쪽은 이전 값을 유지합니다.
pub fn find_best_parameters(
    position: &PositionRecord,
    start: (Option<Price>, Option<Price>),
    config: &LevelSearchConfig,
) -> BestLevels {
    let _span = results_core::analysis_span!("find_best_parameters", position.symbol).entered();
    let mut stop_loss = start.0.or_else(|| position.stop_loss().map(|o| o.price));
    let mut take_profit = start
        .1
        .or_else(|| get_position_tps(position).into_iter().next());

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        iterations += 1;

        let next_tp = favorable_before_stop(position, stop_loss).or(take_profit);
        let next_sl = next_tp
            .and_then(|target| adverse_until_target(position, target, config.tick_size))
            .or(stop_loss);

        if next_tp == take_profit && next_sl == stop_loss {
            converged = true;
            break;
        }
        take_profit = next_tp;
        stop_loss = next_sl;
    }

    debug!(
        position_id = %position.id,
        iterations,
        converged,
        stop_loss = ?stop_loss,
        take_profit = ?take_profit,
        "Level search finished"
    );

    BestLevels {
        stop_loss,
        take_profit,
        iterations,
        converged,
    }
}
