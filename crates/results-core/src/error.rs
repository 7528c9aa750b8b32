//! 결과 분석의 에러 타입.
//!
//! 이 모듈은 백테스트 결과 분석 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 결과 분석 에러.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 포지션 기록 에러 (손절 주문 누락 등)
    #[error("포지션 에러: {0}")]
    Position(String),

    /// 데이터 에러 (빈 테이블, 정렬되지 않은 시계열 등)
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 결과 분석 작업을 위한 Result 타입.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl AnalyticsError {
    /// 입력 데이터 자체의 문제인지 확인합니다.
    ///
    /// 데이터 문제는 해당 레코드만 건너뛰고 나머지를 계속 처리할 수 있습니다.
    pub fn is_data_issue(&self) -> bool {
        matches!(
            self,
            AnalyticsError::Position(_) | AnalyticsError::Data(_)
        )
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        AnalyticsError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AnalyticsError {
    fn from(err: config::ConfigError) -> Self {
        AnalyticsError::Config(err.to_string())
    }
}
