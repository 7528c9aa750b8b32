//! 여러 시간 인덱스 테이블 병합.
//!
//! 각 테이블의 시간 인덱스를 합집합으로 맞추고(outer join), 열 이름 뒤에
//! 테이블 키를 붙여 충돌을 피합니다 (`equity` + `"0"` → `equity_0`).

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use results_core::{AnalyticsError, AnalyticsResult, TimeFrame};

/// 병합된 열 이름을 만듭니다.
fn merged_name(column: &str, key: &str) -> String {
    format!("{}_{}", column, key)
}

/// 테이블들을 시간 인덱스 기준으로 병합합니다.
///
/// 모든 값이 비어 있는 행은 제거되므로 열이 하나도 없으면 결과는 빈 테이블입니다.
///
/// # Errors
///
/// 한 테이블 안에 같은 시각이 두 번 나오거나 병합된 열 이름이 겹치면 에러를 반환합니다.
pub fn merge(frames: &[(String, TimeFrame)]) -> AnalyticsResult<TimeFrame> {
    let times: BTreeSet<DateTime<Utc>> = frames
        .iter()
        .flat_map(|(_, frame)| frame.index().iter().copied())
        .collect();
    let times: Vec<DateTime<Utc>> = times.into_iter().collect();

    let mut merged: Vec<(String, Vec<Option<Decimal>>)> = Vec::new();
    for (key, frame) in frames {
        let mut rows: HashMap<DateTime<Utc>, usize> = HashMap::with_capacity(frame.len());
        for (row, time) in frame.index().iter().enumerate() {
            if rows.insert(*time, row).is_some() {
                return Err(AnalyticsError::Data(format!(
                    "frame '{}' has duplicate timestamp {}",
                    key, time
                )));
            }
        }

        for column in frame.columns() {
            let values = times
                .iter()
                .map(|time| {
                    rows.get(time)
                        .and_then(|&row| column.values.get(row).copied().flatten())
                })
                .collect();
            merged.push((merged_name(&column.name, key), values));
        }
    }

    let keep: Vec<usize> = (0..times.len())
        .filter(|&row| merged.iter().any(|(_, values)| values[row].is_some()))
        .collect();

    let mut result = TimeFrame::new(keep.iter().map(|&row| times[row]).collect());
    for (name, values) in merged {
        let values = keep.iter().map(|&row| values[row]).collect();
        result = result.with_optional_column(name, values)?;
    }

    debug!(
        frames = frames.len(),
        rows = result.len(),
        columns = result.columns().len(),
        "Frames merged"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn range(hours_step: i64, periods: i64) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
        (0..periods)
            .map(|i| start + Duration::hours(hours_step * i))
            .collect()
    }

    #[test]
    fn test_merge_without_columns_is_empty() {
        let merged = merge(&[
            ("0".to_string(), TimeFrame::new(range(1, 10))),
            ("1".to_string(), TimeFrame::new(range(2, 10))),
        ])
        .unwrap();
        assert_eq!(merged.len(), 0);
    }

    #[test]
    fn test_merge_outer_join() {
        let df0 = TimeFrame::new(range(1, 10))
            .with_column("col", vec![Decimal::ONE; 10])
            .unwrap();
        let df1 = TimeFrame::new(range(2, 10))
            .with_column("col", vec![Decimal::ONE; 10])
            .unwrap();

        let merged = merge(&[("0".to_string(), df0), ("1".to_string(), df1)]).unwrap();

        assert_eq!(merged.column_names(), vec!["col_0", "col_1"]);
        assert_eq!(merged.column_sum("col_0"), Some(dec!(10)));
        assert_eq!(merged.column_sum("col_1"), Some(dec!(10)));
        assert_eq!(merged.row_sum(0), dec!(2));
        // 0..9시 + 10..18시 짝수 시각
        assert_eq!(merged.len(), 15);
        assert_eq!(merged.value(1, "col_1"), None);
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let mut index = range(1, 3);
        index.push(index[0]);
        let frame = TimeFrame::new(index)
            .with_column("col", vec![Decimal::ONE; 4])
            .unwrap();

        let err = merge(&[("0".to_string(), frame)]).unwrap_err();
        assert!(err.is_data_issue());
    }

    #[test]
    fn test_rows_missing_in_every_frame_dropped() {
        let index = range(1, 3);
        let df0 = TimeFrame::new(index.clone())
            .with_optional_column("col", vec![Some(dec!(1)), None, Some(dec!(3))])
            .unwrap();
        let df1 = TimeFrame::new(index.clone())
            .with_optional_column("col", vec![Some(dec!(2)), None, None])
            .unwrap();

        let merged = merge(&[("0".to_string(), df0), ("1".to_string(), df1)]).unwrap();

        // 01:00은 두 테이블 모두 비어 있어 제거됨
        assert_eq!(merged.index(), &[index[0], index[2]]);
        assert_eq!(merged.value(1, "col_0"), Some(dec!(3)));
        assert_eq!(merged.value(1, "col_1"), None);
    }

    #[test]
    fn test_merge_deserialized_frame() {
        let frame: TimeFrame = serde_json::from_value(serde_json::json!({
            "index": ["2020-02-01T00:00:00Z", "2020-02-01T01:00:00Z"],
            "columns": [{ "name": "equity", "values": ["1.5", null] }]
        }))
        .unwrap();

        let merged = merge(&[("a".to_string(), frame)]).unwrap();
        assert_eq!(merged.column_names(), vec!["equity_a"]);
        assert_eq!(merged.len(), 1);

        let short = serde_json::from_value::<TimeFrame>(serde_json::json!({
            "index": ["2020-02-01T00:00:00Z", "2020-02-01T01:00:00Z"],
            "columns": [{ "name": "equity", "values": ["1.5"] }]
        }));
        assert!(short.is_err());
    }
}
