//! 시간 인덱스 기반 열 테이블.
//!
//! 여러 백테스트의 시계열(자산 곡선, 지표 등)을 한 시간축으로 합치기 위한
//! 최소한의 테이블입니다. 값이 없는 칸은 `None`으로 표현합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// 이름 있는 열.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// 열 이름
    pub name: String,
    /// 인덱스 순서의 값
    pub values: Vec<Option<Decimal>>,
}

/// 시간 인덱스와 열들로 구성된 테이블.
///
/// 역직렬화도 `with_optional_column`과 같은 검사(열 길이, 중복 이름)를 거칩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeFrame")]
pub struct TimeFrame {
    index: Vec<DateTime<Utc>>,
    columns: Vec<Column>,
}

/// 검증 전의 직렬화 형태.
#[derive(Deserialize)]
struct RawTimeFrame {
    index: Vec<DateTime<Utc>>,
    #[serde(default)]
    columns: Vec<Column>,
}

impl TryFrom<RawTimeFrame> for TimeFrame {
    type Error = AnalyticsError;

    fn try_from(raw: RawTimeFrame) -> AnalyticsResult<Self> {
        raw.columns
            .into_iter()
            .try_fold(TimeFrame::new(raw.index), |frame, column| {
                frame.with_optional_column(column.name, column.values)
            })
    }
}

impl TimeFrame {
    /// 열이 없는 테이블을 생성합니다.
    pub fn new(index: Vec<DateTime<Utc>>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// 모든 칸이 채워진 열을 추가합니다.
    pub fn with_column(
        self,
        name: impl Into<String>,
        values: Vec<Decimal>,
    ) -> AnalyticsResult<Self> {
        self.with_optional_column(name, values.into_iter().map(Some).collect())
    }

    /// 빈 칸을 허용하는 열을 추가합니다.
    ///
    /// 길이가 인덱스와 다르거나 같은 이름의 열이 이미 있으면 에러를 반환합니다.
    pub fn with_optional_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<Decimal>>,
    ) -> AnalyticsResult<Self> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(AnalyticsError::Data(format!(
                "column '{}' has {} values but the index has {} rows",
                name,
                values.len(),
                self.index.len()
            )));
        }
        if self.column(&name).is_some() {
            return Err(AnalyticsError::Data(format!("duplicate column '{}'", name)));
        }
        self.columns.push(Column { name, values });
        Ok(self)
    }

    /// 시간 인덱스를 반환합니다.
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// 모든 열을 반환합니다.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// 열 이름 목록을 반환합니다.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// 이름으로 열을 찾습니다.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// 행 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// 행이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 열의 값 합계 (빈 칸 제외). 열이 없으면 None.
    pub fn column_sum(&self, name: &str) -> Option<Decimal> {
        self.column(name)
            .map(|c| c.values.iter().flatten().copied().sum())
    }

    /// 행의 값 합계 (빈 칸 제외).
    pub fn row_sum(&self, row: usize) -> Decimal {
        self.columns
            .iter()
            .filter_map(|c| c.values.get(row).copied().flatten())
            .sum()
    }

    /// 특정 칸의 값을 반환합니다.
    pub fn value(&self, row: usize, column: &str) -> Option<Decimal> {
        self.column(column)
            .and_then(|c| c.values.get(row).copied().flatten())
    }
}
