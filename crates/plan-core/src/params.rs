//! 計劃純量參數

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PlanError, Result};

/// 單次優化的純量參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanParameters {
    /// 期初庫存
    pub initial_inventory: Decimal,

    /// 單位庫存持有成本（每單位每期，所有期間相同）
    pub holding_cost: Decimal,
}

impl PlanParameters {
    /// 創建並驗證參數
    pub fn new(initial_inventory: Decimal, holding_cost: Decimal) -> Result<Self> {
        let params = Self {
            initial_inventory,
            holding_cost,
        };
        params.validate()?;
        Ok(params)
    }

    /// 驗證參數
    pub fn validate(&self) -> Result<()> {
        if self.initial_inventory < Decimal::ZERO {
            return Err(PlanError::NegativeInitialInventory(self.initial_inventory));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_params() {
        let params = PlanParameters::new(Decimal::from(20), Decimal::from(1)).unwrap();
        assert_eq!(params.initial_inventory, Decimal::from(20));
        assert_eq!(params.holding_cost, Decimal::from(1));
    }

    #[test]
    fn test_negative_initial_inventory_rejected() {
        let result = PlanParameters::new(Decimal::from(-1), Decimal::from(1));
        assert!(matches!(result, Err(PlanError::NegativeInitialInventory(_))));
    }
}
