//! 目標函數：總持有成本 + 總生產成本（最小化）

use plan_core::numeric::to_f64;
use plan_core::{PlanParameters, PlanningHorizon};

use crate::expression::LinearExpr;
use crate::variables::VariableRegistry;

/// 目標函數
///
/// 兩個成本項分開保存，求解後可各自取值。
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    total_holding_cost: LinearExpr,
    total_production_cost: LinearExpr,
}

impl Objective {
    /// holding_cost × Σ I[p]
    pub fn total_holding_cost(&self) -> &LinearExpr {
        &self.total_holding_cost
    }

    /// Σ production_cost[p] × X[p]
    pub fn total_production_cost(&self) -> &LinearExpr {
        &self.total_production_cost
    }

    /// 完整目標運算式
    pub fn expression(&self) -> LinearExpr {
        self.total_holding_cost.clone() + self.total_production_cost.clone()
    }
}

/// 目標函數建構器
pub struct ObjectiveBuilder;

impl ObjectiveBuilder {
    /// 建立目標函數
    pub fn build(
        horizon: &PlanningHorizon,
        params: &PlanParameters,
        registry: &VariableRegistry,
    ) -> plan_core::Result<Objective> {
        let holding_cost = to_f64(params.holding_cost)?;

        let total_holding_cost = registry
            .inventory_vars()
            .iter()
            .map(|inventory| (*inventory, holding_cost))
            .collect();

        let total_production_cost = horizon
            .iter()
            .zip(registry.production_vars())
            .map(|(period, production)| Ok((*production, to_f64(period.production_cost)?)))
            .collect::<plan_core::Result<LinearExpr>>()?;

        Ok(Objective {
            total_holding_cost,
            total_production_cost,
        })
    }
}
