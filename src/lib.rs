//! # prodplan
//!
//! 多期生產計劃線性規劃：在產能限制下決定各期生產量與期末庫存，
//! 使總生產成本加總庫存持有成本最小。
//!
//! 流程：期間資料 → 決策變數 → 限制式與目標函數 → 求解 → 擷取結果
//!
//! ```no_run
//! use prodplan::{optimize, Period, PlanParameters, PlanningHorizon, SolverConfig};
//! use rust_decimal::Decimal;
//!
//! let horizon = PlanningHorizon::new(vec![
//!     Period::new(0, Decimal::from(50), Decimal::from(100), Decimal::ONE),
//!     Period::new(1, Decimal::from(50), Decimal::ZERO, Decimal::ONE),
//! ])?;
//! let params = PlanParameters::new(Decimal::ZERO, Decimal::ONE)?;
//!
//! let (_model, outcome) = optimize(horizon, params, SolverConfig::default())?;
//! for record in outcome.records.unwrap_or_default() {
//!     println!("{}: {} / {}", record.period, record.production, record.inventory);
//! }
//! # Ok::<(), prodplan::PlanError>(())
//! ```

pub use plan_core::{
    numeric, records_to_json, Period, PlanError, PlanParameters, PlanningHorizon,
    ProductionRecord, Result, SolveStatus, SolverConfig, SolverKind, UnknownSolverPolicy,
};
pub use plan_model::{ConstraintFamily, ConstraintSet, LinearConstraint, PlanningModel};
pub use plan_solver::{
    ConstraintSlack, CostBreakdown, ResultExtractor, SolveOrchestrator, SolveReport,
};

/// 一次完整求解的結果
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub report: SolveReport,

    /// 各期生產記錄（僅在最優時）
    pub records: Option<Vec<ProductionRecord>>,

    /// 成本拆解（僅在最優時）
    pub costs: Option<CostBreakdown>,
}

impl PlanOutcome {
    pub fn status(&self) -> SolveStatus {
        self.report.status
    }

    pub fn is_optimal(&self) -> bool {
        self.report.status == SolveStatus::Optimal
    }
}

/// 建立模型、求解並擷取結果
///
/// 不可行或無界時回傳 `Ok`，`records` 與 `costs` 為 `None`；
/// 求解器無法執行時回傳錯誤。
pub fn optimize(
    horizon: PlanningHorizon,
    params: PlanParameters,
    config: SolverConfig,
) -> Result<(PlanningModel, PlanOutcome)> {
    let orchestrator = SolveOrchestrator::new(config)?;
    let mut model = PlanningModel::build(orchestrator.config().model_name.clone(), horizon, params)?;

    let report = orchestrator.optimize(&mut model)?;

    let (records, costs) = if report.status == SolveStatus::Optimal {
        (
            Some(ResultExtractor::extract(&model)?),
            Some(ResultExtractor::cost_breakdown(&model)?),
        )
    } else {
        (None, None)
    };

    Ok((
        model,
        PlanOutcome {
            report,
            records,
            costs,
        },
    ))
}
