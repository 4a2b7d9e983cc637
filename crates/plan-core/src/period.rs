//! 期間資料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PlanError, Result};

/// 單一計劃期間
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// 期間索引（從 0 開始）
    pub index: usize,

    /// 需求量
    pub demand: Decimal,

    /// 生產產能
    pub production_capacity: Decimal,

    /// 單位生產成本
    pub production_cost: Decimal,
}

impl Period {
    /// 創建新的期間
    pub fn new(
        index: usize,
        demand: Decimal,
        production_capacity: Decimal,
        production_cost: Decimal,
    ) -> Self {
        Self {
            index,
            demand,
            production_capacity,
            production_cost,
        }
    }

    /// 產能為零（該期不可生產）
    pub fn is_shut_down(&self) -> bool {
        self.production_capacity.is_zero()
    }
}

/// 計劃期間序列
///
/// 建立時即驗證：非空、索引從 0 連續遞增、產能非負。
/// 建立後不可變更。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningHorizon {
    periods: Vec<Period>,
}

impl PlanningHorizon {
    /// 創建並驗證期間序列
    pub fn new(periods: Vec<Period>) -> Result<Self> {
        if periods.is_empty() {
            return Err(PlanError::EmptyHorizon);
        }

        for (position, period) in periods.iter().enumerate() {
            if period.index != position {
                return Err(PlanError::NonContiguousPeriod {
                    position,
                    found: period.index,
                });
            }

            if period.production_capacity < Decimal::ZERO {
                return Err(PlanError::NegativeCapacity {
                    period: period.index,
                    capacity: period.production_capacity,
                });
            }

            // 負需求視為退貨/補回，不在此層拒絕
            if period.demand < Decimal::ZERO {
                tracing::debug!("期間 {} 需求為負值: {}", period.index, period.demand);
            }
        }

        Ok(Self { periods })
    }

    /// 以欄位向量建立（索引依序編號）
    pub fn from_columns(
        demands: &[Decimal],
        capacities: &[Decimal],
        costs: &[Decimal],
    ) -> Result<Self> {
        if demands.len() != capacities.len() || demands.len() != costs.len() {
            return Err(PlanError::MalformedInput(format!(
                "欄位長度不一致：需求 {}，產能 {}，成本 {}",
                demands.len(),
                capacities.len(),
                costs.len()
            )));
        }

        let periods = demands
            .iter()
            .zip(capacities)
            .zip(costs)
            .enumerate()
            .map(|(index, ((demand, capacity), cost))| {
                Period::new(index, *demand, *capacity, *cost)
            })
            .collect();

        Self::new(periods)
    }

    /// 從 JSON 陣列載入並驗證
    pub fn from_json_str(json: &str) -> Result<Self> {
        let periods: Vec<Period> = serde_json::from_str(json)?;
        Self::new(periods)
    }

    /// 期間數量
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// 驗證後必定非空
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// 所有期間
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// 依索引取得期間
    pub fn get(&self, index: usize) -> Option<&Period> {
        self.periods.get(index)
    }

    /// 第一期
    pub fn first(&self) -> &Period {
        &self.periods[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Period> {
        self.periods.iter()
    }

    /// 總需求
    pub fn total_demand(&self) -> Decimal {
        self.periods.iter().map(|p| p.demand).sum()
    }

    /// 總產能
    pub fn total_capacity(&self) -> Decimal {
        self.periods.iter().map(|p| p.production_capacity).sum()
    }
}

impl<'de> Deserialize<'de> for PlanningHorizon {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let periods = Vec::<Period>::deserialize(deserializer)?;
        PlanningHorizon::new(periods).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a PlanningHorizon {
    type Item = &'a Period;
    type IntoIter = std::slice::Iter<'a, Period>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn period(index: usize, demand: i64, capacity: i64, cost: i64) -> Period {
        Period::new(
            index,
            Decimal::from(demand),
            Decimal::from(capacity),
            Decimal::from(cost),
        )
    }

    #[test]
    fn test_create_horizon() {
        let horizon = PlanningHorizon::new(vec![
            period(0, 50, 100, 1),
            period(1, 50, 0, 1),
        ])
        .unwrap();

        assert_eq!(horizon.len(), 2);
        assert_eq!(horizon.first().demand, Decimal::from(50));
        assert_eq!(horizon.total_demand(), Decimal::from(100));
        assert_eq!(horizon.total_capacity(), Decimal::from(100));
        assert!(horizon.get(1).unwrap().is_shut_down());
        assert!(horizon.get(2).is_none());
    }

    #[test]
    fn test_empty_horizon_rejected() {
        let result = PlanningHorizon::new(Vec::new());
        assert!(matches!(result, Err(PlanError::EmptyHorizon)));
    }

    #[rstest]
    #[case(vec![1, 2])]
    #[case(vec![0, 2])]
    #[case(vec![0, 0])]
    #[case(vec![1, 0])]
    fn test_non_contiguous_rejected(#[case] indices: Vec<usize>) {
        let periods = indices
            .into_iter()
            .map(|index| period(index, 10, 10, 1))
            .collect();

        let result = PlanningHorizon::new(periods);
        assert!(matches!(result, Err(PlanError::NonContiguousPeriod { .. })));
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let result = PlanningHorizon::new(vec![period(0, 10, 10, 1), period(1, 10, -5, 1)]);

        match result {
            Err(PlanError::NegativeCapacity { period, capacity }) => {
                assert_eq!(period, 1);
                assert_eq!(capacity, Decimal::from(-5));
            }
            other => panic!("預期產能錯誤，實際為 {:?}", other),
        }
    }

    #[test]
    fn test_negative_demand_allowed() {
        let horizon = PlanningHorizon::new(vec![period(0, -20, 10, 1)]).unwrap();
        assert_eq!(horizon.total_demand(), Decimal::from(-20));
    }

    #[test]
    fn test_from_columns() {
        let horizon = PlanningHorizon::from_columns(
            &[Decimal::from(10), Decimal::from(20)],
            &[Decimal::from(30), Decimal::from(30)],
            &[Decimal::from(2), Decimal::from(3)],
        )
        .unwrap();

        assert_eq!(horizon.len(), 2);
        assert_eq!(horizon.get(1).unwrap().index, 1);
        assert_eq!(horizon.get(1).unwrap().production_cost, Decimal::from(3));
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let result = PlanningHorizon::from_columns(
            &[Decimal::from(10)],
            &[Decimal::from(30), Decimal::from(30)],
            &[Decimal::from(2)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"index": 0, "demand": "100", "production_capacity": "150", "production_cost": "2"},
            {"index": 1, "demand": "80", "production_capacity": "150", "production_cost": "2.5"}
        ]"#;

        let horizon = PlanningHorizon::from_json_str(json).unwrap();
        assert_eq!(horizon.len(), 2);
        assert_eq!(horizon.get(1).unwrap().production_cost, Decimal::new(25, 1));
    }

    #[test]
    fn test_from_json_validates() {
        let json = r#"[
            {"index": 1, "demand": "100", "production_capacity": "150", "production_cost": "2"}
        ]"#;

        assert!(PlanningHorizon::from_json_str(json).is_err());
    }
}
