//! 연속 손익과 낙폭에 대한 속성 기반 테스트.
//!
//! 결과 값과 무관하게 항상 성립해야 하는 성질을 확인합니다:
//! - 연속 손익은 한 칸씩만 늘어나거나 ±1로 다시 시작함
//! - 끝난 연속 기록은 부호가 번갈아 나타남
//! - 겹치지 않는 거래의 진입 시점 연속 손익은 직전 거래의 값과 같음
//! - 낙폭은 항상 0 이하

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use results_analytics::{
    add_streak, drawdown, get_streak_runs, make_streaks_by_close, make_streaks_by_open,
};
use results_core::TradeRecord;
use rust_decimal::Decimal;

/// -3.00R ~ +3.00R 범위의 결과.
fn results_strategy() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((-300i64..=300).prop_map(|v| Decimal::new(v, 2)), 0..60)
}

fn tolerance_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=20).prop_map(|v| Decimal::new(v, 2))
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap()
}

/// 한 시간에 하나씩, 다음 진입 전에 청산되는 거래.
fn sequential_trades(results: &[Decimal]) -> Vec<TradeRecord> {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let open = start() + Duration::hours(i as i64);
            TradeRecord::new(open, open + Duration::minutes(45), *r)
        })
        .collect()
}

proptest! {
    /// 속성: 연속 손익은 같은 부호로 한 칸 늘어나거나 ±1로 다시 시작한다.
    #[test]
    fn streak_steps_are_unit(results in results_strategy(), tolerance in tolerance_strategy()) {
        let streaks = add_streak(&results, tolerance);
        prop_assert_eq!(streaks.len(), results.len());

        let mut previous = 0i64;
        for streak in &streaks {
            let continued = previous != 0 && *streak == previous + previous.signum();
            let restarted = streak.abs() == 1;
            let still_flat = previous == 0 && *streak == 0;
            prop_assert!(continued || restarted || still_flat,
                "invalid step {} -> {}", previous, streak);
            previous = *streak;
        }
    }

    /// 속성: 끝난 연속 기록은 부호가 번갈아 나오고 길이 합은 거래 수를 넘지 않는다.
    #[test]
    fn streak_runs_alternate(results in results_strategy(), tolerance in tolerance_strategy()) {
        let runs = get_streak_runs(&sequential_trades(&results), tolerance);

        for pair in runs.windows(2) {
            prop_assert_eq!(pair[0].length.signum(), -pair[1].length.signum());
        }
        let covered: i64 = runs.iter().map(|r| r.length.abs()).sum();
        prop_assert!(covered as usize <= results.len());
    }

    /// 속성: 거래가 겹치지 않으면 진입 시점 연속 손익은 직전 거래의 청산 후 값이다.
    #[test]
    fn streak_at_open_lags_by_one(results in results_strategy(), tolerance in tolerance_strategy()) {
        let trades = sequential_trades(&results);
        let by_close = make_streaks_by_close(&trades, tolerance);
        let by_open = make_streaks_by_open(&trades, tolerance);

        prop_assert_eq!(by_open.len(), by_close.len());
        if let Some(first) = by_open.first() {
            prop_assert_eq!(first.streak_at_open, 0);
        }
        for (i, point) in by_open.iter().enumerate().skip(1) {
            prop_assert_eq!(point.streak_at_open, by_close[i - 1].streak);
        }
    }

    /// 속성: 낙폭은 0 이하이고 고점은 감소하지 않는다.
    #[test]
    fn drawdown_never_positive(results in results_strategy()) {
        let points = drawdown(&sequential_trades(&results));

        let mut peak = Decimal::ZERO;
        for point in &points {
            prop_assert!(point.drawdown <= Decimal::ZERO);
            prop_assert!(point.peak >= peak);
            peak = point.peak;
        }
    }
}
