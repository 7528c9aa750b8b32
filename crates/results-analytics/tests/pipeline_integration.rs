//! 포지션 기록에서 챌린지 판정까지 이어지는 분석 파이프라인 통합 테스트.

mod common;

use anyhow::Result;
use results_analytics::{
    challenge_pass, get_executed_orders, make_results, map_risk_to_streak,
    result_by_close_given_risk, ChallengeOutcome, ChallengeReport, ResultSummary,
};
use results_core::{AnalysisConfig, DecimalExt, TradeRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::mock_positions;

const NO_IGNORE: [&str; 0] = [];

fn assert_close(actual: Decimal, expected: Decimal) {
    assert!(
        actual.approx_eq(expected, dec!(0.0000001)),
        "{} != {}",
        actual,
        expected
    );
}

#[test]
fn executed_orders_follow_ignore_list() {
    let positions = mock_positions();
    assert_eq!(get_executed_orders(&positions[1], &NO_IGNORE).len(), 3);
    assert_eq!(get_executed_orders(&positions[1], &["SL"]).len(), 2);
    assert_eq!(get_executed_orders(&positions[2], &NO_IGNORE).len(), 0);
}

#[test]
fn make_results_from_positions() -> Result<()> {
    let positions = mock_positions();
    let partials = [Decimal::ONE];

    let results = make_results(&positions, &partials, &NO_IGNORE)?;
    let ignoring_sl = make_results(&positions, &partials, &["SL"])?;
    assert_eq!(results.len(), 4);

    assert_close(results[0].result, dec!(-1));
    assert_close(ignoring_sl[1].result, dec!(0.1425) / dec!(0.137));
    assert_close(results[2].result, dec!(-0.0045) / dec!(0.122));
    assert_close(results[3].result, dec!(0.09) / dec!(0.135));

    // 손절을 무시하면 종료 기준가까지 보유
    assert_close(ignoring_sl[0].result, dec!(-0.118) / dec!(0.259));
    assert_eq!(ignoring_sl[0].closed_at, positions[0].end_of_position.time);
    assert_eq!(results[0].opened_at, positions[0].entry.time);
    Ok(())
}

#[test]
fn missing_stop_loss_is_a_position_error() {
    let mut positions = mock_positions();
    positions[2].orders.clear();

    let err = make_results(&positions, &[Decimal::ONE], &NO_IGNORE).unwrap_err();
    assert!(err.is_data_issue());
}

#[test]
fn config_driven_pipeline() -> Result<()> {
    let config = AnalysisConfig::from_toml_str(
        r#"
        [outcome]
        partials = [0.5, 0.5]
        ignore = ["SL"]

        [risk]
        default = 1
        levels = [{ streak = 1, risk = 2 }]

        [challenge]
        profit_target = 2
        "#,
    )?;

    let trades = make_results(
        &mock_positions(),
        &config.outcome.partials,
        &config.outcome.ignore,
    )?;
    let risked = map_risk_to_streak(&trades, &config.risk, config.streak.tolerance);
    assert_eq!(risked.len(), trades.len());

    let sized = result_by_close_given_risk(&risked);
    assert!(sized.windows(2).all(|w| w[0].closed_at <= w[1].closed_at));

    // 데이터가 한 달을 채우지 못하므로 챌린지 시도 없음
    let attempts = challenge_pass(&sized, &config.challenge)?;
    assert!(attempts.is_empty());

    let summary = ResultSummary::from_trades(&sized, config.streak.tolerance);
    assert_eq!(summary.total_trades, 4);
    Ok(())
}

#[test]
fn monthly_challenges_over_repeated_results() -> Result<()> {
    let config = AnalysisConfig::default();
    let trades = make_results(&mock_positions(), &config.outcome.partials, &["SL"])?;

    // 같은 네 개의 결과를 첫 진입 시각부터 하루 하나씩 100일 동안 반복
    let start = trades[0].opened_at;
    let repeated: Vec<TradeRecord> = (0..100)
        .map(|i| {
            let base = trades[i % trades.len()];
            let shift = chrono::Duration::days(i as i64) - (base.opened_at - start);
            TradeRecord::new(base.opened_at + shift, base.closed_at + shift, base.result)
        })
        .collect();

    let attempts = challenge_pass(&repeated, &config.challenge)?;
    assert!(!attempts.is_empty());
    assert!(attempts
        .iter()
        .all(|a| a.outcome != ChallengeOutcome::Failed || a.reason.is_some()));

    let report = ChallengeReport::from_attempts(&attempts);
    assert_eq!(
        report.passed + report.failed + report.not_failed,
        attempts.len()
    );
    Ok(())
}
