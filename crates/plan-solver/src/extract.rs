//! 求解結果擷取

use plan_core::numeric::{from_f64, SOLUTION_DECIMAL_PLACES};
use plan_core::{PlanError, ProductionRecord, SolveStatus};
use plan_model::{ConstraintFamily, LinearExpr, PlanningModel};
use rust_decimal::Decimal;
use serde::Serialize;

/// 成本拆解
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    /// 總庫存持有成本
    pub holding_cost: Decimal,

    /// 總生產成本
    pub production_cost: Decimal,

    pub total: Decimal,
}

/// 限制式鬆弛量（右側值 - 左側值）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintSlack {
    pub name: String,
    pub period: usize,
    pub family: ConstraintFamily,
    pub slack: Decimal,
}

impl ConstraintSlack {
    /// 產能限制式是否滿載
    pub fn is_binding(&self) -> bool {
        self.slack.is_zero()
    }
}

/// 結果擷取器
///
/// 只讀取模型，可重複呼叫。
pub struct ResultExtractor;

impl ResultExtractor {
    /// 擷取各期間的生產量與期末庫存
    ///
    /// 僅在狀態為 `optimal` 時可用，數值四捨五入至 9 位小數。
    pub fn extract(model: &PlanningModel) -> plan_core::Result<Vec<ProductionRecord>> {
        let values = Self::optimal_values(model)?;
        let registry = model.registry();

        let records = (0..registry.period_count())
            .map(|period| {
                let production = Self::variable_value(values, registry.production(period))?;
                let inventory = Self::variable_value(values, registry.inventory(period))?;
                Ok(ProductionRecord::new(period, production, inventory))
            })
            .collect::<plan_core::Result<Vec<_>>>()?;

        tracing::debug!("擷取 {} 筆生產記錄", records.len());
        Ok(records)
    }

    /// 依目標函數的兩部分計算成本
    pub fn cost_breakdown(model: &PlanningModel) -> plan_core::Result<CostBreakdown> {
        let values = Self::optimal_values(model)?;
        let objective = model.objective();

        let holding_cost = Self::rounded(objective.total_holding_cost(), values)?;
        let production_cost = Self::rounded(objective.total_production_cost(), values)?;

        Ok(CostBreakdown {
            holding_cost,
            production_cost,
            total: holding_cost + production_cost,
        })
    }

    /// 各限制式的鬆弛量（依限制式順序）
    pub fn constraint_slacks(model: &PlanningModel) -> plan_core::Result<Vec<ConstraintSlack>> {
        let values = Self::optimal_values(model)?;

        model
            .constraints()
            .iter()
            .map(|constraint| {
                Ok(ConstraintSlack {
                    name: constraint.name.clone(),
                    period: constraint.period,
                    family: constraint.family,
                    slack: from_f64(constraint.slack(values), SOLUTION_DECIMAL_PLACES)?,
                })
            })
            .collect()
    }

    fn optimal_values(model: &PlanningModel) -> plan_core::Result<&[f64]> {
        if model.status() != SolveStatus::Optimal {
            return Err(PlanError::NotOptimal(model.status()));
        }
        model
            .values()
            .ok_or(PlanError::NotOptimal(model.status()))
    }

    fn variable_value(
        values: &[f64],
        variable: Option<plan_model::VariableId>,
    ) -> plan_core::Result<Decimal> {
        let value = variable
            .and_then(|id| values.get(id.index()).copied())
            .ok_or_else(|| PlanError::MalformedInput("變數索引超出範圍".to_string()))?;
        from_f64(value, SOLUTION_DECIMAL_PLACES)
    }

    fn rounded(expression: &LinearExpr, values: &[f64]) -> plan_core::Result<Decimal> {
        from_f64(expression.evaluate(values), SOLUTION_DECIMAL_PLACES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SolveOrchestrator;
    use plan_core::{Period, PlanParameters, PlanningHorizon, SolverConfig};

    fn model(demands: &[i64], capacities: &[i64], costs: &[i64]) -> PlanningModel {
        let horizon = PlanningHorizon::new(
            (0..demands.len())
                .map(|p| {
                    Period::new(
                        p,
                        Decimal::from(demands[p]),
                        Decimal::from(capacities[p]),
                        Decimal::from(costs[p]),
                    )
                })
                .collect(),
        )
        .unwrap();
        let params = PlanParameters::new(Decimal::ZERO, Decimal::ONE).unwrap();
        PlanningModel::build("prod_planning", horizon, params).unwrap()
    }

    fn solved(demands: &[i64], capacities: &[i64], costs: &[i64]) -> PlanningModel {
        let mut model = model(demands, capacities, costs);
        SolveOrchestrator::new(SolverConfig::default().with_solver("microlp"))
            .unwrap()
            .optimize(&mut model)
            .unwrap();
        model
    }

    #[test]
    fn test_extract_records() {
        let model = solved(&[50, 50], &[100, 0], &[1, 1]);
        let records = ResultExtractor::extract(&model).unwrap();

        assert_eq!(
            records,
            vec![
                ProductionRecord::new(0, Decimal::from(100), Decimal::from(50)),
                ProductionRecord::new(1, Decimal::ZERO, Decimal::ZERO),
            ]
        );
    }

    #[test]
    fn test_extract_is_repeatable() {
        let model = solved(&[30, 20, 10], &[40, 40, 40], &[2, 3, 1]);

        let first = ResultExtractor::extract(&model).unwrap();
        let second = ResultExtractor::extract(&model).unwrap();
        assert_eq!(first, second);
        assert_eq!(model.status(), SolveStatus::Optimal);
    }

    #[test]
    fn test_extract_requires_optimal() {
        let unsolved = model(&[10], &[10], &[1]);
        assert!(matches!(
            ResultExtractor::extract(&unsolved),
            Err(PlanError::NotOptimal(SolveStatus::NotSolved))
        ));

        let infeasible = solved(&[100], &[50], &[1]);
        assert!(matches!(
            ResultExtractor::extract(&infeasible),
            Err(PlanError::NotOptimal(SolveStatus::Infeasible))
        ));
        assert!(ResultExtractor::cost_breakdown(&infeasible).is_err());
        assert!(ResultExtractor::constraint_slacks(&infeasible).is_err());
    }

    #[test]
    fn test_cost_breakdown() {
        let model = solved(&[50, 50], &[100, 0], &[1, 1]);
        let costs = ResultExtractor::cost_breakdown(&model).unwrap();

        assert_eq!(costs.holding_cost, Decimal::from(50));
        assert_eq!(costs.production_cost, Decimal::from(100));
        assert_eq!(costs.total, Decimal::from(150));
    }

    #[test]
    fn test_constraint_slacks() {
        let model = solved(&[50, 50], &[100, 30], &[1, 5]);
        let slacks = ResultExtractor::constraint_slacks(&model).unwrap();

        assert_eq!(slacks.len(), model.constraints().len());
        assert!(slacks
            .iter()
            .filter(|slack| slack.family.is_balance())
            .all(|slack| slack.slack.is_zero()));

        // 第 0 期生產 100 滿載；第 1 期不生產
        let cap0 = slacks.iter().find(|s| s.name == "prod_cap_month_0").unwrap();
        let cap1 = slacks.iter().find(|s| s.name == "prod_cap_month_1").unwrap();
        assert!(cap0.is_binding());
        assert_eq!(cap1.slack, Decimal::from(30));
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(32))]

        #[test]
        fn prop_cost_breakdown_matches_objective(
            periods in proptest::collection::vec((0i64..50, 50i64..100, 1i64..10), 1..6)
        ) {
            let demands: Vec<i64> = periods.iter().map(|p| p.0).collect();
            let capacities: Vec<i64> = periods.iter().map(|p| p.1).collect();
            let costs: Vec<i64> = periods.iter().map(|p| p.2).collect();
            let model = solved(&demands, &capacities, &costs);

            let costs = ResultExtractor::cost_breakdown(&model).unwrap();
            let objective = from_f64(model.objective_value().unwrap(), 9).unwrap();
            proptest::prop_assert!((costs.total - objective).abs() <= Decimal::new(1, 6));

            for record in ResultExtractor::extract(&model).unwrap() {
                proptest::prop_assert!(record.production >= Decimal::ZERO);
                proptest::prop_assert!(record.inventory >= Decimal::ZERO);
            }
        }
    }
}
