//! 백테스트 결과 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 포지션 기록에서 R 배수 결과 계산 (부분 청산 포함)
//! - 사후 손절/익절 레벨 탐색
//! - 자산 곡선과 낙폭
//! - 하루 거래 수 제한, 동시 보유 거래 수
//! - 연속 손익과 연속 손익 기반 리스크 조절
//! - 프랍 트레이딩 챌린지 통과 시뮬레이션
//! - 여러 시계열 테이블 병합
//!
//! # 파이프라인 예시
//!
//! ```ignore
//! let trades = make_results(&positions, &config.outcome.partials, &config.outcome.ignore)?;
//! let risked = map_risk_to_streak(&trades, &config.risk, config.streak.tolerance);
//! let sized = result_by_close_given_risk(&risked);
//! let attempts = challenge_pass(&sized, &config.challenge)?;
//! let report = ChallengeReport::from_attempts(&attempts);
//! ```

pub mod challenge;
pub mod equity;
pub mod levels;
pub mod merge;
pub mod outcome;
pub mod risk;
pub mod schedule;
pub mod streak;
pub mod summary;

pub use challenge::{
    challenge_pass, ChallengeAttempt, ChallengeOutcome, ChallengeReport, FailureReason,
};
pub use equity::{drawdown, max_drawdown, DrawdownPoint};
pub use levels::{find_best_parameters, find_better_sl, find_better_tp, BestLevels};
pub use merge::merge;
pub use outcome::{
    determine_position_result, get_executed_orders, get_position_tps, make_results, ExitLeg,
    PositionOutcome, END_OF_POSITION,
};
pub use risk::{map_risk_to_streak, result_by_close_given_risk, RiskedTrade};
pub use schedule::{add_open_trades, reduce_daily_trades, OpenTradesPoint};
pub use streak::{
    add_streak, get_streak_runs, make_streaks_by_close, make_streaks_by_open, OpenStreakPoint,
    StreakPoint, StreakRun,
};
pub use summary::ResultSummary;
