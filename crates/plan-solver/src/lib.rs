//! # Plan Solver
//!
//! 生產計劃模型的求解流程
//!
//! ## 功能
//! - 求解引擎選擇（CBC、Gurobi、CPLEX、GLPK、內建 microlp）
//! - MIP 間隙與時間上限設定
//! - LP 檔與求解日誌輸出
//! - 最優解擷取（生產量、期末庫存、成本拆解、鬆弛量）

pub mod backend;
pub mod engines;
pub mod extract;
pub mod orchestrator;

pub use backend::{backend_for, BackendOutcome, SolveSettings, SolverBackend};
pub use extract::{ConstraintSlack, CostBreakdown, ResultExtractor};
pub use orchestrator::{SolveOrchestrator, SolveReport};
