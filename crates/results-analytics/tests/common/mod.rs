//! 통합 테스트 공용 포지션 기록.
//!
//! 백테스터가 내보내는 JSON 형식 그대로 작성한 네 개의 포지션입니다.
//! - 0: 롱, 손절 체결 (진입가 위로 올라간 적 없음)
//! - 1: 롱, 손절 체결 후 익절 두 개 체결 (가격 경로 포함)
//! - 2: 롱, 체결 없이 종료 기준가 청산
//! - 3: 숏, 익절 체결

#![allow(dead_code)]

use results_core::PositionRecord;
use serde_json::json;

pub fn mock_positions() -> Vec<PositionRecord> {
    let value = json!([
        {
            "id": "mock0",
            "symbol": "USDJPY",
            "side": "long",
            "entry": { "price": 135.8, "time": "2020-11-05T14:00:00Z" },
            "orders": [
                {
                    "name": "SL", "kind": "stop_loss", "price": 135.541,
                    "execution": { "price": 135.541, "time": "2020-11-05T15:10:00Z" }
                },
                { "name": "TP1", "kind": "take_profit", "price": 136.13 },
                { "name": "TP2", "kind": "take_profit", "price": 136.6 }
            ],
            "end_of_position": { "price": 135.682, "time": "2020-11-05T17:29:00Z" },
            "bars": [
                { "time": "2020-11-05T14:00:00Z", "high": 135.8, "low": 135.7 },
                { "time": "2020-11-05T14:30:00Z", "high": 135.78, "low": 135.62 },
                { "time": "2020-11-05T15:00:00Z", "high": 135.75, "low": 135.54 },
                { "time": "2020-11-05T15:30:00Z", "high": 135.7, "low": 135.6 },
                { "time": "2020-11-05T17:00:00Z", "high": 135.72, "low": 135.66 }
            ]
        },
        {
            "id": "mock1",
            "symbol": "USDJPY",
            "side": "long",
            "entry": { "price": 135.687, "time": "2020-11-06T10:00:00Z" },
            "orders": [
                {
                    "name": "SL", "kind": "stop_loss", "price": 135.55,
                    "execution": { "price": 135.55, "time": "2020-11-06T10:30:00Z" }
                },
                {
                    "name": "TP1", "kind": "take_profit", "price": 135.8295,
                    "execution": { "price": 135.8295, "time": "2020-11-06T11:00:00Z" }
                },
                {
                    "name": "TP2", "kind": "take_profit", "price": 135.9495,
                    "execution": { "price": 135.9495, "time": "2020-11-06T11:15:00Z" }
                }
            ],
            "end_of_position": { "price": 135.95, "time": "2020-11-06T12:00:00Z" },
            "bars": [
                { "time": "2020-11-06T10:00:00Z", "high": 135.7, "low": 135.6 },
                { "time": "2020-11-06T10:15:00Z", "high": 135.751, "low": 135.58 },
                { "time": "2020-11-06T10:30:00Z", "high": 135.74, "low": 135.515 },
                { "time": "2020-11-06T10:45:00Z", "high": 135.8, "low": 135.6 },
                { "time": "2020-11-06T11:00:00Z", "high": 135.85, "low": 135.7 },
                { "time": "2020-11-06T11:15:00Z", "high": 135.96, "low": 135.8 },
                { "time": "2020-11-06T11:30:00Z", "high": 136.047, "low": 135.9 },
                { "time": "2020-11-06T11:45:00Z", "high": 136.0, "low": 135.85 }
            ]
        },
        {
            "id": "mock2",
            "symbol": "EURJPY",
            "side": "long",
            "entry": { "price": 120.0, "time": "2020-11-09T08:00:00Z" },
            "orders": [
                { "name": "SL", "kind": "stop_loss", "price": 119.878 },
                { "name": "TP1", "kind": "take_profit", "price": 120.2 }
            ],
            "end_of_position": { "price": 119.9955, "time": "2020-11-09T13:00:00Z" }
        },
        {
            "id": "mock3",
            "symbol": "GBPJPY",
            "side": "short",
            "entry": { "price": 139.51, "time": "2020-11-10T09:00:00Z" },
            "orders": [
                { "name": "SL", "kind": "stop_loss", "price": 139.645 },
                {
                    "name": "TP1", "kind": "take_profit", "price": 139.42,
                    "execution": { "price": 139.42, "time": "2020-11-10T10:15:00Z" }
                },
                { "name": "TP2", "kind": "take_profit", "price": 139.375 },
                { "name": "TP3", "kind": "take_profit", "price": 139.25 }
            ],
            "end_of_position": { "price": 139.3, "time": "2020-11-10T20:00:00Z" }
        }
    ]);

    serde_json::from_value(value).expect("mock positions should deserialize")
}
