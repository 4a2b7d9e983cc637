//! 求解流程控制

use plan_core::{PlanError, SolveStatus, SolverConfig, SolverKind};
use plan_model::PlanningModel;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::backend::{backend_for, BackendOutcome, SolveSettings, SolverBackend};

/// 單次求解的摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveReport {
    pub model_name: String,
    pub solver: SolverKind,
    pub status: SolveStatus,

    /// 目標值（僅在狀態為 optimal 時）
    pub objective_value: Option<f64>,

    /// 求解耗時
    #[serde(serialize_with = "serialize_seconds")]
    pub elapsed: Duration,
}

fn serialize_seconds<S: serde::Serializer>(
    elapsed: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// 求解日誌檔內容
#[derive(Debug, Serialize)]
struct RunLog<'a> {
    #[serde(flatten)]
    report: &'a SolveReport,
    mip_gap: Option<f64>,
    time_limit: Option<f64>,
    variable_count: usize,
    constraint_count: usize,
    periods: Vec<PeriodLine>,
}

#[derive(Debug, Serialize)]
struct PeriodLine {
    period: usize,
    production: f64,
    inventory: f64,
}

/// 求解協調器
///
/// 選擇引擎、套用設定、執行求解並將狀態寫回模型。
#[derive(Debug, Clone)]
pub struct SolveOrchestrator {
    config: SolverConfig,
}

impl SolveOrchestrator {
    /// 建立協調器（驗證設定）
    pub fn new(config: SolverConfig) -> plan_core::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// 依設定選擇求解引擎
    ///
    /// 未知名稱依 `unknown_solver` 策略處理（改用 CBC 或回報錯誤）。
    pub fn select_backend(&self) -> plan_core::Result<Box<dyn SolverBackend>> {
        let kind = self.config.resolve_solver()?;
        Ok(backend_for(kind, SolveSettings::from(&self.config)))
    }

    /// 求解模型
    ///
    /// 模型只能求解一次；已求解的模型回傳 `AlreadySolved`。
    pub fn optimize(&self, model: &mut PlanningModel) -> plan_core::Result<SolveReport> {
        let backend = self.select_backend()?;
        self.optimize_with(model, backend.as_ref())
    }

    /// 使用指定引擎求解模型
    pub fn optimize_with(
        &self,
        model: &mut PlanningModel,
        backend: &dyn SolverBackend,
    ) -> plan_core::Result<SolveReport> {
        if model.status().is_terminal() {
            return Err(PlanError::AlreadySolved(model.status()));
        }

        if self.config.write_lp {
            let path = self.config.lp_path(model.name());
            model.write_lp(&path)?;
            tracing::info!("LP 檔已寫出：{}", path.display());
        }

        tracing::info!(
            "開始求解模型 {}（求解器：{}）",
            model.name(),
            backend.kind()
        );

        let started = Instant::now();
        let outcome = backend.solve(model);
        let elapsed = started.elapsed();

        let BackendOutcome { status, values } = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!("求解器執行失敗：{}", err);
                model.record_outcome(SolveStatus::Error, None)?;
                return Err(err);
            }
        };

        model.record_outcome(status, values)?;

        let report = SolveReport {
            model_name: model.name().to_string(),
            solver: backend.kind(),
            status,
            objective_value: model.objective_value(),
            elapsed,
        };

        self.log_outcome(model, &report);

        if self.config.write_log {
            self.write_run_log(model, &report)?;
        }

        Ok(report)
    }

    fn log_outcome(&self, model: &PlanningModel, report: &SolveReport) {
        match report.status {
            SolveStatus::Optimal => {
                if let Some(value) = report.objective_value {
                    tracing::info!("最優解，目標值 ${:.2}", value);
                }
            }
            SolveStatus::Feasible => {
                if let Some(value) = model.best_objective_value() {
                    tracing::info!("可行解（未證明最優），目標值 ${:.2}", value);
                }
            }
            SolveStatus::Infeasible => {
                tracing::warn!("模型 {} 無可行解", model.name());
            }
            SolveStatus::Unbounded => {
                tracing::warn!("模型 {} 目標值無下界", model.name());
            }
            SolveStatus::NotSolved | SolveStatus::Error => {
                tracing::error!("模型 {} 求解失敗：{}", model.name(), report.status);
            }
        }

        for line in period_lines(model) {
            if self.config.display_log {
                tracing::info!(
                    "期間 {}：生產 {:.2}，庫存 {:.2}",
                    line.period,
                    line.production,
                    line.inventory
                );
            } else {
                tracing::debug!(
                    "期間 {}：生產 {:.2}，庫存 {:.2}",
                    line.period,
                    line.production,
                    line.inventory
                );
            }
        }

        tracing::debug!("求解耗時 {:?}", report.elapsed);
    }

    fn write_run_log(&self, model: &PlanningModel, report: &SolveReport) -> plan_core::Result<()> {
        let path = self.config.log_path(model.name());
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let log = RunLog {
            report,
            mip_gap: self.config.effective_mip_gap(),
            time_limit: self.config.time_limit,
            variable_count: model.variables().len(),
            constraint_count: model.constraints().len(),
            periods: period_lines(model),
        };

        std::fs::write(&path, serde_json::to_string_pretty(&log)?)?;
        tracing::info!("求解日誌已寫出：{}", path.display());
        Ok(())
    }
}

/// 各期間的變數值（無解時為空）
fn period_lines(model: &PlanningModel) -> Vec<PeriodLine> {
    let registry = model.registry();
    (0..registry.period_count())
        .filter_map(|period| {
            let production = model.value(registry.production(period)?)?;
            let inventory = model.value(registry.inventory(period)?)?;
            Some(PeriodLine {
                period,
                production,
                inventory,
            })
        })
        .collect()
}
