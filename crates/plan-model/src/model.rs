//! 生產計劃模型

use plan_core::{PlanError, PlanParameters, PlanningHorizon, SolveStatus};
use std::path::Path;

use crate::constraints::{ConstraintBuilder, ConstraintSet};
use crate::expression::{LinearExpr, VariableId};
use crate::objective::{Objective, ObjectiveBuilder};
use crate::variables::{DecisionVariable, VariableRegistry};

/// 求解器寫回的變數值
#[derive(Debug, Clone, PartialEq)]
struct SolvedValues {
    values: Vec<f64>,
    objective_value: f64,
}

/// 生產計劃線性規劃模型
///
/// 持有期間資料、決策變數、限制式與目標函數。
/// 決策變數在 `build` 中建立一次；求解狀態只能由 `not-solved` 轉為終止狀態一次。
#[derive(Debug, Clone)]
pub struct PlanningModel {
    name: String,
    horizon: PlanningHorizon,
    params: PlanParameters,
    variables: Vec<DecisionVariable>,
    registry: VariableRegistry,
    constraints: ConstraintSet,
    objective: Objective,
    status: SolveStatus,
    solution: Option<SolvedValues>,
}

impl PlanningModel {
    /// 建立模型：決策變數 → 限制式 → 目標函數
    pub fn build(
        name: impl Into<String>,
        horizon: PlanningHorizon,
        params: PlanParameters,
    ) -> plan_core::Result<Self> {
        let name = name.into();
        params.validate()?;

        tracing::info!("建立模型 {}：期間 {} 期", name, horizon.len());

        let (registry, variables) = VariableRegistry::create(&horizon);
        let constraints = ConstraintBuilder::new(&horizon, &params, &registry).build()?;
        let objective = ObjectiveBuilder::build(&horizon, &params, &registry)?;

        tracing::debug!(
            "模型 {} 建立完成：變數 {} 個，限制式 {} 條",
            name,
            variables.len(),
            constraints.len()
        );

        Ok(Self {
            name,
            horizon,
            params,
            variables,
            registry,
            constraints,
            objective,
            status: SolveStatus::NotSolved,
            solution: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn horizon(&self) -> &PlanningHorizon {
        &self.horizon
    }

    pub fn params(&self) -> &PlanParameters {
        &self.params
    }

    /// 所有決策變數（依 `VariableId` 排序）
    pub fn variables(&self) -> &[DecisionVariable] {
        &self.variables
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// 求解狀態
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// 寫回求解結果（只能一次）
    ///
    /// 狀態為 `optimal` 或 `feasible` 時必須附上每個變數的值。
    pub fn record_outcome(
        &mut self,
        status: SolveStatus,
        values: Option<Vec<f64>>,
    ) -> plan_core::Result<()> {
        if self.status.is_terminal() {
            return Err(PlanError::AlreadySolved(self.status));
        }
        if !status.is_terminal() {
            return Err(PlanError::SolverFailure(
                "求解結果不可為 not-solved".to_string(),
            ));
        }

        if status.has_solution() {
            let values = values.ok_or_else(|| {
                PlanError::SolverFailure(format!("狀態為 {} 但未取得變數值", status))
            })?;
            if values.len() != self.variables.len() {
                return Err(PlanError::SolverFailure(format!(
                    "變數值數量 {} 與模型變數數量 {} 不符",
                    values.len(),
                    self.variables.len()
                )));
            }

            let objective_value = self.objective.expression().evaluate(&values);
            self.solution = Some(SolvedValues {
                values,
                objective_value,
            });
        }

        self.status = status;
        Ok(())
    }

    /// 所有變數值（僅在有解時）
    pub fn values(&self) -> Option<&[f64]> {
        self.solution.as_ref().map(|solution| solution.values.as_slice())
    }

    /// 單一變數值
    pub fn value(&self, variable: VariableId) -> Option<f64> {
        self.values()
            .and_then(|values| values.get(variable.index()).copied())
    }

    /// 最優目標值（僅在狀態為 optimal 時）
    pub fn objective_value(&self) -> Option<f64> {
        match self.status {
            SolveStatus::Optimal => self.best_objective_value(),
            _ => None,
        }
    }

    /// 目前最佳目標值（optimal 或未證明最優的 feasible）
    pub fn best_objective_value(&self) -> Option<f64> {
        self.solution
            .as_ref()
            .map(|solution| solution.objective_value)
    }

    /// 運算式的 LP 格式文字（不含常數項）
    pub fn expression_text(&self, expr: &LinearExpr) -> String {
        crate::lp_format::expression(self, expr)
    }

    /// 輸出 LP 格式字串
    pub fn to_lp_string(&self) -> String {
        crate::lp_format::render(self)
    }

    /// 寫出 `.lp` 檔
    pub fn write_lp(&self, path: &Path) -> plan_core::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_lp_string())?;
        Ok(())
    }
}
