//! 求解引擎實作
//!
//! - `microlp`：行程內純 Rust 引擎（good_lp）
//! - `cbc` / `gurobi` / `cplex` / `glpk`：呼叫外部執行檔（lp-solvers），
//!   直接讀取執行檔回報的狀態，停在時間上限的解回報為 `feasible`

use std::cmp::Ordering;

use good_lp::solvers::{ResolutionError, Solution as _, SolverModel};
use good_lp::{variable, Expression, ProblemVariables, Variable};
use lp_solvers::lp_format::{Constraint, LpObjective};
use lp_solvers::problem::{Problem, StrExpression, Variable as LpVariable};
use lp_solvers::solvers::{
    CbcSolver, Cplex, GlpkSolver, GurobiSolver, SolverTrait, Status, WithMaxSeconds, WithMipGap,
};
use plan_core::{PlanError, SolveStatus, SolverKind};
use plan_model::{ConstraintSense, LinearExpr, PlanningModel};

use crate::backend::{BackendOutcome, SolveSettings, SolverBackend};

/// 以 microlp 在行程內求解
fn solve_in_process(model: &PlanningModel) -> plan_core::Result<BackendOutcome> {
    let mut problem_variables = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .variables()
        .iter()
        .map(|decision| {
            let mut definition = variable()
                .min(decision.lower_bound)
                .name(decision.name.clone());
            if let Some(upper) = decision.upper_bound {
                definition = definition.max(upper);
            }
            problem_variables.add(definition)
        })
        .collect();

    let objective = to_expression(&model.objective().expression(), &handles);
    let mut problem = problem_variables
        .minimise(objective)
        .using(good_lp::solvers::microlp::microlp);

    for constraint in model.constraints().iter() {
        let lhs = to_expression(&constraint.expression, &handles);
        let lp_constraint = match constraint.sense {
            ConstraintSense::Equal => good_lp::constraint::eq(lhs, constraint.rhs),
            ConstraintSense::LessEqual => good_lp::constraint::leq(lhs, constraint.rhs),
        };
        problem.add_constraint(lp_constraint);
    }

    match problem.solve() {
        Ok(solution) => {
            let values = handles.iter().map(|handle| solution.value(*handle)).collect();
            Ok(BackendOutcome::solved(values))
        }
        Err(ResolutionError::Infeasible) => {
            Ok(BackendOutcome::without_solution(SolveStatus::Infeasible))
        }
        Err(ResolutionError::Unbounded) => {
            Ok(BackendOutcome::without_solution(SolveStatus::Unbounded))
        }
        Err(err) => Err(PlanError::SolverFailure(err.to_string())),
    }
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut expression = Expression::from_other_affine(expr.constant());
    for term in expr.terms() {
        if let Some(handle) = handles.get(term.variable.index()) {
            expression += term.coefficient * *handle;
        }
    }
    expression
}

/// 將模型轉為 lp-solvers 問題（變數名稱與 `.lp` 檔相同）
fn lp_problem(model: &PlanningModel) -> Problem {
    let variables = model
        .variables()
        .iter()
        .map(|decision| LpVariable {
            name: decision.name.clone(),
            is_integer: false,
            lower_bound: decision.lower_bound,
            upper_bound: decision.upper_bound.unwrap_or(f64::INFINITY),
        })
        .collect();

    let constraints = model
        .constraints()
        .iter()
        .map(|constraint| Constraint {
            lhs: StrExpression(model.expression_text(&constraint.expression)),
            operator: match constraint.sense {
                ConstraintSense::Equal => Ordering::Equal,
                ConstraintSense::LessEqual => Ordering::Less,
            },
            rhs: constraint.lp_rhs(),
        })
        .collect();

    Problem {
        name: model.name().to_string(),
        sense: LpObjective::Minimize,
        objective: StrExpression(model.expression_text(&model.objective().expression())),
        variables,
        constraints,
    }
}

/// 呼叫外部求解器執行檔
fn solve_external<T: SolverTrait>(
    model: &PlanningModel,
    solver: &T,
) -> plan_core::Result<BackendOutcome> {
    let problem = lp_problem(model);
    let solution = solver.run(&problem).map_err(PlanError::SolverFailure)?;
    outcome_from(model, solution)
}

/// 執行檔回報的狀態與變數值轉為求解結果
///
/// 停在時間上限或其他中途停止（`TimeLimit`、`SubOptimal`）只算可行解；
/// 達到設定的 MIP 間隙視為最優。
fn outcome_from(
    model: &PlanningModel,
    solution: lp_solvers::solvers::Solution,
) -> plan_core::Result<BackendOutcome> {
    let status = match solution.status {
        Status::Optimal | Status::MipGap => SolveStatus::Optimal,
        Status::TimeLimit | Status::SubOptimal => SolveStatus::Feasible,
        Status::Infeasible => return Ok(BackendOutcome::without_solution(SolveStatus::Infeasible)),
        Status::Unbounded => return Ok(BackendOutcome::without_solution(SolveStatus::Unbounded)),
        Status::NotSolved => {
            return Err(PlanError::SolverFailure("求解器未能求解模型".to_string()))
        }
    };

    // 未輸出的變數值為 0
    let values = model
        .variables()
        .iter()
        .map(|decision| {
            solution
                .results
                .get(&decision.name)
                .map(|value| f64::from(*value))
                .unwrap_or(0.0)
        })
        .collect();

    Ok(BackendOutcome::new(status, Some(values)))
}

/// 時間上限轉為外部求解器接受的整數秒（至少 1 秒）
fn whole_seconds(seconds: f64) -> u32 {
    seconds.ceil().clamp(1.0, u32::MAX as f64) as u32
}

fn mip_gap(gap: f64) -> f32 {
    gap as f32
}

/// 內建 microlp 引擎（不支援時間上限與 MIP 間隙）
pub struct MicrolpBackend {
    settings: SolveSettings,
}

impl MicrolpBackend {
    pub fn new(settings: SolveSettings) -> Self {
        Self { settings }
    }
}

impl SolverBackend for MicrolpBackend {
    fn kind(&self) -> SolverKind {
        SolverKind::Microlp
    }

    fn solve(&self, model: &PlanningModel) -> plan_core::Result<BackendOutcome> {
        if self.settings.time_limit.is_some() {
            tracing::warn!("求解器 {} 不支援時間上限設定，已忽略", self.kind());
        }
        if self.settings.mip_gap.is_some() {
            tracing::warn!("求解器 {} 不支援 MIP 間隙設定，已忽略", self.kind());
        }
        solve_in_process(model)
    }
}

/// COIN-OR CBC（外部執行檔 `cbc`）
pub struct CbcBackend {
    settings: SolveSettings,
}

impl CbcBackend {
    pub fn new(settings: SolveSettings) -> Self {
        Self { settings }
    }

    fn configure(&self) -> plan_core::Result<CbcSolver> {
        let mut solver = CbcSolver::new();
        if let Some(seconds) = self.settings.time_limit {
            solver = solver.with_max_seconds(whole_seconds(seconds));
        }
        if let Some(gap) = self.settings.mip_gap {
            solver = solver
                .with_mip_gap(mip_gap(gap))
                .map_err(PlanError::InvalidSolverConfig)?;
        }
        Ok(solver)
    }
}

impl SolverBackend for CbcBackend {
    fn kind(&self) -> SolverKind {
        SolverKind::Cbc
    }

    fn solve(&self, model: &PlanningModel) -> plan_core::Result<BackendOutcome> {
        solve_external(model, &self.configure()?)
    }
}

/// Gurobi（外部執行檔 `gurobi_cl`）
pub struct GurobiBackend {
    settings: SolveSettings,
}

impl GurobiBackend {
    pub fn new(settings: SolveSettings) -> Self {
        Self { settings }
    }

    fn configure(&self) -> plan_core::Result<GurobiSolver> {
        let mut solver = GurobiSolver::new();
        if let Some(seconds) = self.settings.time_limit {
            solver = solver.with_max_seconds(whole_seconds(seconds));
        }
        if let Some(gap) = self.settings.mip_gap {
            solver = solver
                .with_mip_gap(mip_gap(gap))
                .map_err(PlanError::InvalidSolverConfig)?;
        }
        Ok(solver)
    }
}

impl SolverBackend for GurobiBackend {
    fn kind(&self) -> SolverKind {
        SolverKind::Gurobi
    }

    fn solve(&self, model: &PlanningModel) -> plan_core::Result<BackendOutcome> {
        solve_external(model, &self.configure()?)
    }
}

/// IBM CPLEX（外部執行檔 `cplex`，只接受 MIP 間隙）
pub struct CplexBackend {
    settings: SolveSettings,
}

impl CplexBackend {
    pub fn new(settings: SolveSettings) -> Self {
        Self { settings }
    }

    fn configure(&self) -> plan_core::Result<Cplex> {
        let mut solver = Cplex::default();
        if self.settings.time_limit.is_some() {
            tracing::warn!("求解器 {} 不支援時間上限設定，已忽略", SolverKind::Cplex);
        }
        if let Some(gap) = self.settings.mip_gap {
            solver = solver
                .with_mip_gap(mip_gap(gap))
                .map_err(PlanError::InvalidSolverConfig)?;
        }
        Ok(solver)
    }
}

impl SolverBackend for CplexBackend {
    fn kind(&self) -> SolverKind {
        SolverKind::Cplex
    }

    fn solve(&self, model: &PlanningModel) -> plan_core::Result<BackendOutcome> {
        solve_external(model, &self.configure()?)
    }
}

/// GNU GLPK（外部執行檔 `glpsol`）
pub struct GlpkBackend {
    settings: SolveSettings,
}

impl GlpkBackend {
    pub fn new(settings: SolveSettings) -> Self {
        Self { settings }
    }

    fn configure(&self) -> plan_core::Result<GlpkSolver> {
        let mut solver = GlpkSolver::new();
        if let Some(seconds) = self.settings.time_limit {
            solver = solver.with_max_seconds(whole_seconds(seconds));
        }
        if let Some(gap) = self.settings.mip_gap {
            solver = solver
                .with_mip_gap(mip_gap(gap))
                .map_err(PlanError::InvalidSolverConfig)?;
        }
        Ok(solver)
    }
}

impl SolverBackend for GlpkBackend {
    fn kind(&self) -> SolverKind {
        SolverKind::Glpk
    }

    fn solve(&self, model: &PlanningModel) -> plan_core::Result<BackendOutcome> {
        solve_external(model, &self.configure()?)
    }
}
