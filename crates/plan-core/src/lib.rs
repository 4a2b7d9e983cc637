//! # Plan Core
//!
//! 生產計劃的核心資料模型與類型定義

pub mod config;
pub mod numeric;
pub mod params;
pub mod period;
pub mod record;
pub mod status;

// Re-export 主要類型
pub use config::{SolverConfig, SolverKind, UnknownSolverPolicy};
pub use params::PlanParameters;
pub use period::{Period, PlanningHorizon};
pub use record::{records_to_json, ProductionRecord};
pub use status::SolveStatus;

/// 生產計劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("期間資料為空")]
    EmptyHorizon,

    #[error("期間索引不連續：第 {position} 筆的期間索引為 {found}")]
    NonContiguousPeriod { position: usize, found: usize },

    #[error("期間 {period} 的產能為負值: {capacity}")]
    NegativeCapacity {
        period: usize,
        capacity: rust_decimal::Decimal,
    },

    #[error("輸入資料格式錯誤: {0}")]
    MalformedInput(String),

    #[error("期初庫存為負值: {0}")]
    NegativeInitialInventory(rust_decimal::Decimal),

    #[error("未知的求解器: {0}")]
    UnknownSolver(String),

    #[error("求解器設定錯誤: {0}")]
    InvalidSolverConfig(String),

    #[error("求解器執行失敗: {0}")]
    SolverFailure(String),

    #[error("模型已求解（狀態: {0}），不可重複求解")]
    AlreadySolved(SolveStatus),

    #[error("模型未取得最優解（狀態: {0}）")]
    NotOptimal(SolveStatus),

    #[error("數值轉換錯誤: {0}")]
    NumericConversion(String),

    #[error("檔案讀寫錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析錯誤: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
