//! 求解器後端介面

use plan_core::{SolveStatus, SolverConfig, SolverKind};
use plan_model::PlanningModel;

use crate::engines::{CbcBackend, CplexBackend, GlpkBackend, GurobiBackend, MicrolpBackend};

/// 傳給求解引擎的數值設定
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolveSettings {
    /// MIP 間隙（None 表示不限制）
    pub mip_gap: Option<f64>,

    /// 時間上限（秒）
    pub time_limit: Option<f64>,
}

impl From<&SolverConfig> for SolveSettings {
    fn from(config: &SolverConfig) -> Self {
        Self {
            mip_gap: config.effective_mip_gap(),
            time_limit: config.time_limit,
        }
    }
}

/// 求解引擎回報的結果
#[derive(Debug, Clone, PartialEq)]
pub struct BackendOutcome {
    pub status: SolveStatus,

    /// 依 `VariableId` 排序的變數值（僅在有解時）
    pub values: Option<Vec<f64>>,
}

impl BackendOutcome {
    pub fn new(status: SolveStatus, values: Option<Vec<f64>>) -> Self {
        Self { status, values }
    }

    /// 求得最優解
    pub fn solved(values: Vec<f64>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values: Some(values),
        }
    }

    /// 無解（不可行或無界）
    pub fn without_solution(status: SolveStatus) -> Self {
        Self {
            status,
            values: None,
        }
    }
}

/// 求解引擎：設定、求解、回報狀態
///
/// 每個引擎一個實作；設定於建構時傳入。
pub trait SolverBackend {
    /// 引擎種類
    fn kind(&self) -> SolverKind;

    /// 求解模型
    ///
    /// 不可行與無界以狀態回報；引擎本身無法執行時回傳錯誤。
    fn solve(&self, model: &PlanningModel) -> plan_core::Result<BackendOutcome>;
}

/// 依種類建立求解引擎
pub fn backend_for(kind: SolverKind, settings: SolveSettings) -> Box<dyn SolverBackend> {
    match kind {
        SolverKind::Cbc => Box::new(CbcBackend::new(settings)),
        SolverKind::Gurobi => Box::new(GurobiBackend::new(settings)),
        SolverKind::Cplex => Box::new(CplexBackend::new(settings)),
        SolverKind::Glpk => Box::new(GlpkBackend::new(settings)),
        SolverKind::Microlp => Box::new(MicrolpBackend::new(settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_for_every_kind() {
        for kind in SolverKind::ALL {
            let backend = backend_for(kind, SolveSettings::default());
            assert_eq!(backend.kind(), kind);
        }
    }

    #[test]
    fn test_settings_from_config() {
        let config = SolverConfig::default()
            .with_mip_gap(0.0)
            .with_time_limit(15.0);

        let settings = SolveSettings::from(&config);
        assert_eq!(settings.mip_gap, None);
        assert_eq!(settings.time_limit, Some(15.0));
    }
}
