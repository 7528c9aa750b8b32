//! # Results Core
//!
//! 백테스트 결과 분석의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 분석 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 포지션 기록 (진입, 손절/익절 주문, 종료 기준가, 가격 경로)
//! - 거래 결과 테이블의 행
//! - 시간 인덱스 테이블
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
