//! 백테스트 결과 분석을 위한 도메인 모델.

mod frame;
mod order;
mod position;
mod trade;

pub use frame::*;
pub use order::*;
pub use position::*;
pub use trade::*;
