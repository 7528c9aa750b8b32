//! 가격과 R 배수 계산을 위한 Decimal 유틸리티.

use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 초기 리스크 대비 결과 배수 (1R = 손절 시 손실 크기).
pub type RMultiple = Decimal;

/// 퍼센트 타입 (1 = 1%).
pub type Percentage = Decimal;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// R 배수 문자열로 변환합니다 (예: "+1.25R").
    fn to_r_string(&self) -> String;

    /// 허용 오차 이내로 같은지 확인합니다.
    fn approx_eq(&self, other: Decimal, epsilon: Decimal) -> bool;
}

impl DecimalExt for Decimal {
    fn to_r_string(&self) -> String {
        let rounded =
            self.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("{:.2}R", rounded)
        } else {
            format!("+{:.2}R", rounded.abs())
        }
    }

    fn approx_eq(&self, other: Decimal, epsilon: Decimal) -> bool {
        (*self - other).abs() <= epsilon
    }
}
