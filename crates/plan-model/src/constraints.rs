//! 庫存平衡與產能限制式

use plan_core::numeric::to_f64;
use plan_core::{PlanError, PlanParameters, PlanningHorizon};
use serde::{Deserialize, Serialize};

use crate::expression::{LinearExpr, VariableId};
use crate::variables::VariableRegistry;

/// 限制式方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    /// 等式 (=)
    Equal,
    /// 小於等於 (≤)
    LessEqual,
}

impl ConstraintSense {
    /// LP 格式中的符號
    pub fn symbol(&self) -> &'static str {
        match self {
            ConstraintSense::Equal => "=",
            ConstraintSense::LessEqual => "<=",
        }
    }
}

/// 限制式類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintFamily {
    /// 第一期庫存平衡：X[0] - I[0] = demand[0] - initial_inventory
    FirstPeriodBalance,
    /// 後續期間庫存平衡：I[p-1] + X[p] - I[p] = demand[p]
    InventoryBalance,
    /// 生產產能：X[p] <= capacity[p]
    ProductionCapacity,
}

impl ConstraintFamily {
    /// 是否屬於庫存平衡類
    pub fn is_balance(&self) -> bool {
        matches!(
            self,
            ConstraintFamily::FirstPeriodBalance | ConstraintFamily::InventoryBalance
        )
    }
}

/// 具名線性限制式：expression (sense) rhs
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// 限制式名稱（依期間索引命名）
    pub name: String,

    pub family: ConstraintFamily,

    /// 所屬期間
    pub period: usize,

    pub expression: LinearExpr,

    pub sense: ConstraintSense,

    /// 右側常數
    pub rhs: f64,
}

impl LinearConstraint {
    /// 鬆弛量：rhs - lhs
    ///
    /// 等式的鬆弛量在可行解中應為 0；`≤` 限制式應為非負。
    pub fn slack(&self, values: &[f64]) -> f64 {
        self.rhs - self.expression.evaluate(values)
    }

    /// 常數項移到右側後的右側值
    pub fn lp_rhs(&self) -> f64 {
        self.rhs - self.expression.constant()
    }

    /// 在容許誤差內是否成立
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let slack = self.slack(values);
        match self.sense {
            ConstraintSense::Equal => slack.abs() <= tolerance,
            ConstraintSense::LessEqual => slack >= -tolerance,
        }
    }
}

/// 模型的所有限制式
///
/// 第一期平衡式與後續平衡式分開保存；建立後不再增減。
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    first_period_balance: LinearConstraint,
    inventory_balance: Vec<LinearConstraint>,
    production_capacity: Vec<LinearConstraint>,
}

impl ConstraintSet {
    /// 第一期平衡式
    pub fn first_period_balance(&self) -> &LinearConstraint {
        &self.first_period_balance
    }

    /// 第 1..N-1 期平衡式
    pub fn inventory_balance(&self) -> &[LinearConstraint] {
        &self.inventory_balance
    }

    /// 產能限制式
    pub fn production_capacity(&self) -> &[LinearConstraint] {
        &self.production_capacity
    }

    /// 平衡類限制式數量（1 + 後續期數）
    pub fn balance_count(&self) -> usize {
        1 + self.inventory_balance.len()
    }

    /// 產能限制式數量
    pub fn capacity_count(&self) -> usize {
        self.production_capacity.len()
    }

    /// 限制式總數
    pub fn len(&self) -> usize {
        self.balance_count() + self.capacity_count()
    }

    /// 至少含第一期平衡式，永不為空
    pub fn is_empty(&self) -> bool {
        false
    }

    /// 依序走訪：第一期平衡式、後續平衡式、產能限制式
    pub fn iter(&self) -> impl Iterator<Item = &LinearConstraint> {
        std::iter::once(&self.first_period_balance)
            .chain(self.inventory_balance.iter())
            .chain(self.production_capacity.iter())
    }

    /// 依名稱查詢
    pub fn find(&self, name: &str) -> Option<&LinearConstraint> {
        self.iter().find(|constraint| constraint.name == name)
    }
}

/// 限制式建構器
pub struct ConstraintBuilder<'a> {
    horizon: &'a PlanningHorizon,
    params: &'a PlanParameters,
    registry: &'a VariableRegistry,
}

impl<'a> ConstraintBuilder<'a> {
    /// 創建新的限制式建構器
    pub fn new(
        horizon: &'a PlanningHorizon,
        params: &'a PlanParameters,
        registry: &'a VariableRegistry,
    ) -> Self {
        Self {
            horizon,
            params,
            registry,
        }
    }

    /// 建立所有庫存平衡與產能限制式
    pub fn build(&self) -> plan_core::Result<ConstraintSet> {
        let first_period_balance = self.first_period_balance()?;

        let inventory_balance = (1..self.horizon.len())
            .map(|period| self.inventory_balance(period))
            .collect::<plan_core::Result<Vec<_>>>()?;

        let production_capacity = (0..self.horizon.len())
            .map(|period| self.production_capacity(period))
            .collect::<plan_core::Result<Vec<_>>>()?;

        tracing::debug!(
            "建立限制式：平衡式 {} 條，產能限制式 {} 條",
            1 + inventory_balance.len(),
            production_capacity.len()
        );

        Ok(ConstraintSet {
            first_period_balance,
            inventory_balance,
            production_capacity,
        })
    }

    /// 第一期庫存平衡：X[0] - I[0] = demand[0] - initial_inventory
    ///
    /// 第一期沒有前期庫存變數，期初庫存移到右側常數。
    pub fn first_period_balance(&self) -> plan_core::Result<LinearConstraint> {
        let first = self.horizon.first();
        let production = self.production_var(0)?;
        let inventory = self.inventory_var(0)?;

        Ok(LinearConstraint {
            name: "inv_balance0".to_string(),
            family: ConstraintFamily::FirstPeriodBalance,
            period: 0,
            expression: LinearExpr::new()
                .with_term(production, 1.0)
                .with_term(inventory, -1.0),
            sense: ConstraintSense::Equal,
            rhs: to_f64(first.demand - self.params.initial_inventory)?,
        })
    }

    /// 第 p 期（p ≥ 1）庫存平衡：I[p-1] + X[p] - I[p] = demand[p]
    pub fn inventory_balance(&self, period: usize) -> plan_core::Result<LinearConstraint> {
        let Some(previous) = period.checked_sub(1) else {
            return Err(PlanError::MalformedInput(
                "第一期平衡式須由 first_period_balance 建立".to_string(),
            ));
        };

        let demand = self.period_data(period)?.demand;
        let previous_inventory = self.inventory_var(previous)?;
        let production = self.production_var(period)?;
        let inventory = self.inventory_var(period)?;

        Ok(LinearConstraint {
            name: format!("inv_balance{}", period),
            family: ConstraintFamily::InventoryBalance,
            period,
            expression: LinearExpr::new()
                .with_term(previous_inventory, 1.0)
                .with_term(production, 1.0)
                .with_term(inventory, -1.0),
            sense: ConstraintSense::Equal,
            rhs: to_f64(demand)?,
        })
    }

    /// 第 p 期產能：X[p] <= capacity[p]
    ///
    /// 產能為 0 時即強制該期不生產。
    pub fn production_capacity(&self, period: usize) -> plan_core::Result<LinearConstraint> {
        let capacity = self.period_data(period)?.production_capacity;
        let production = self.production_var(period)?;

        Ok(LinearConstraint {
            name: format!("prod_cap_month_{}", period),
            family: ConstraintFamily::ProductionCapacity,
            period,
            expression: LinearExpr::new().with_term(production, 1.0),
            sense: ConstraintSense::LessEqual,
            rhs: to_f64(capacity)?,
        })
    }

    fn period_data(&self, period: usize) -> plan_core::Result<&plan_core::Period> {
        self.horizon
            .get(period)
            .ok_or_else(|| PlanError::MalformedInput(format!("期間 {} 不存在", period)))
    }

    fn production_var(&self, period: usize) -> plan_core::Result<VariableId> {
        self.registry
            .production(period)
            .ok_or_else(|| PlanError::MalformedInput(format!("期間 {} 沒有生產量變數", period)))
    }

    fn inventory_var(&self, period: usize) -> plan_core::Result<VariableId> {
        self.registry
            .inventory(period)
            .ok_or_else(|| PlanError::MalformedInput(format!("期間 {} 沒有庫存變數", period)))
    }
}
