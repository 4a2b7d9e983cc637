//! 求解器配置模型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{PlanError, Result};

/// 預設模型名稱（同時作為 `.lp` 與 `.log` 檔名）
pub const DEFAULT_MODEL_NAME: &str = "prod_planning";

/// 求解引擎
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// COIN-OR CBC（預設）
    #[default]
    Cbc,
    /// Gurobi
    Gurobi,
    /// IBM CPLEX
    Cplex,
    /// GNU GLPK
    Glpk,
    /// 內建純 Rust 單純形法引擎（不需外部執行檔）
    Microlp,
}

impl SolverKind {
    /// 所有支援的求解引擎
    pub const ALL: [SolverKind; 5] = [
        SolverKind::Cbc,
        SolverKind::Gurobi,
        SolverKind::Cplex,
        SolverKind::Glpk,
        SolverKind::Microlp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SolverKind::Cbc => "cbc",
            SolverKind::Gurobi => "gurobi",
            SolverKind::Cplex => "cplex",
            SolverKind::Glpk => "glpk",
            SolverKind::Microlp => "microlp",
        }
    }

    /// 是否需要外部執行檔
    pub fn is_external(&self) -> bool {
        !matches!(self, SolverKind::Microlp)
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolverKind {
    type Err = PlanError;

    fn from_str(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        SolverKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| PlanError::UnknownSolver(name.to_string()))
    }
}

/// 未知求解器名稱的處理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownSolverPolicy {
    /// 記錄警告並改用預設引擎（CBC）
    #[default]
    Fallback,
    /// 直接回報錯誤
    Reject,
}

/// 求解器配置
///
/// 每次優化各自持有一份，傳入求解協調器；不使用全域狀態。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// 模型名稱（由 `prodplan::optimize` 建立模型時使用）
    pub model_name: String,

    /// 求解器名稱（cbc / gurobi / cplex / glpk / microlp）
    #[serde(rename = "solver")]
    pub solver_name: String,

    /// MIP 間隙（None 或 0 表示不限制）
    pub mip_gap: Option<f64>,

    /// 時間上限（秒，None 表示不限制）
    pub time_limit: Option<f64>,

    /// 求解前輸出 `.lp` 檔
    pub write_lp: bool,

    /// 保留求解紀錄檔
    pub write_log: bool,

    /// 在主控台顯示求解明細
    pub display_log: bool,

    /// `.lp` 與紀錄檔輸出目錄
    pub output_dir: PathBuf,

    /// 未知求解器名稱的處理策略
    pub unknown_solver: UnknownSolverPolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            solver_name: SolverKind::default().as_str().to_string(),
            mip_gap: None,
            time_limit: None,
            write_lp: false,
            write_log: false,
            display_log: false,
            output_dir: PathBuf::from("."),
            unknown_solver: UnknownSolverPolicy::Fallback,
        }
    }
}

impl SolverConfig {
    /// 創建新的求解器配置
    pub fn new(model_name: String) -> Self {
        Self {
            model_name,
            ..Self::default()
        }
    }

    /// 從 JSON 載入並驗證
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置求解器
    pub fn with_solver(mut self, solver_name: impl Into<String>) -> Self {
        self.solver_name = solver_name.into();
        self
    }

    /// 建構器模式：設置 MIP 間隙
    pub fn with_mip_gap(mut self, mip_gap: f64) -> Self {
        self.mip_gap = Some(mip_gap);
        self
    }

    /// 建構器模式：設置時間上限（秒）
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// 建構器模式：設置是否輸出 `.lp` 檔
    pub fn with_write_lp(mut self, write_lp: bool) -> Self {
        self.write_lp = write_lp;
        self
    }

    /// 建構器模式：設置是否保留紀錄檔
    pub fn with_write_log(mut self, write_log: bool) -> Self {
        self.write_log = write_log;
        self
    }

    /// 建構器模式：設置是否顯示求解明細
    pub fn with_display_log(mut self, display_log: bool) -> Self {
        self.display_log = display_log;
        self
    }

    /// 建構器模式：設置輸出目錄
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// 建構器模式：設置未知求解器處理策略
    ///
    /// # 範例
    /// ```
    /// # use plan_core::{SolverConfig, UnknownSolverPolicy};
    /// let config = SolverConfig::default()
    ///     .with_solver("gurobii")
    ///     .with_unknown_solver_policy(UnknownSolverPolicy::Reject);
    /// assert!(config.resolve_solver().is_err());
    /// ```
    pub fn with_unknown_solver_policy(mut self, policy: UnknownSolverPolicy) -> Self {
        self.unknown_solver = policy;
        self
    }

    /// 驗證數值設定
    pub fn validate(&self) -> Result<()> {
        if self.model_name.trim().is_empty() {
            return Err(PlanError::InvalidSolverConfig("模型名稱不可為空".to_string()));
        }

        if let Some(gap) = self.mip_gap {
            if !gap.is_finite() || gap < 0.0 {
                return Err(PlanError::InvalidSolverConfig(format!(
                    "MIP 間隙必須為非負數: {}",
                    gap
                )));
            }
        }

        if let Some(seconds) = self.time_limit {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(PlanError::InvalidSolverConfig(format!(
                    "時間上限必須為正數: {}",
                    seconds
                )));
            }
        }

        Ok(())
    }

    /// 有效的 MIP 間隙（0 視為不限制）
    pub fn effective_mip_gap(&self) -> Option<f64> {
        self.mip_gap.filter(|gap| *gap > 0.0)
    }

    /// 解析求解器名稱
    ///
    /// 名稱無法辨識時依 `unknown_solver` 策略處理：
    /// `Fallback` 記錄警告並改用 CBC，`Reject` 回報錯誤。
    pub fn resolve_solver(&self) -> Result<SolverKind> {
        match self.solver_name.parse::<SolverKind>() {
            Ok(kind) => Ok(kind),
            Err(err) => match self.unknown_solver {
                UnknownSolverPolicy::Fallback => {
                    let fallback = SolverKind::default();
                    tracing::warn!(
                        "無法辨識求解器 '{}'，改用預設求解器 {}",
                        self.solver_name,
                        fallback
                    );
                    Ok(fallback)
                }
                UnknownSolverPolicy::Reject => Err(err),
            },
        }
    }

    /// `<output_dir>/<model_name>.lp`
    pub fn lp_path(&self, model_name: &str) -> PathBuf {
        self.artifact_path(model_name, "lp")
    }

    /// `<output_dir>/<model_name>.log`
    pub fn log_path(&self, model_name: &str) -> PathBuf {
        self.artifact_path(model_name, "log")
    }

    fn artifact_path(&self, model_name: &str, extension: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", model_name, extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();

        assert_eq!(config.model_name, "prod_planning");
        assert_eq!(config.solver_name, "cbc");
        assert_eq!(config.effective_mip_gap(), None);
        assert_eq!(config.time_limit, None);
        assert!(!config.write_lp);
        assert_eq!(config.resolve_solver().unwrap(), SolverKind::Cbc);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SolverConfig::new("plant_a".to_string())
            .with_solver("glpk")
            .with_mip_gap(0.01)
            .with_time_limit(30.0)
            .with_write_lp(true)
            .with_write_log(true)
            .with_display_log(true)
            .with_output_dir("/tmp/plans");

        assert_eq!(config.resolve_solver().unwrap(), SolverKind::Glpk);
        assert_eq!(config.effective_mip_gap(), Some(0.01));
        assert_eq!(config.time_limit, Some(30.0));
        assert_eq!(
            config.lp_path(&config.model_name),
            PathBuf::from("/tmp/plans/plant_a.lp")
        );
        assert_eq!(
            config.log_path(&config.model_name),
            PathBuf::from("/tmp/plans/plant_a.log")
        );
    }

    #[rstest]
    #[case("cbc", SolverKind::Cbc)]
    #[case("gurobi", SolverKind::Gurobi)]
    #[case("CPLEX", SolverKind::Cplex)]
    #[case(" glpk ", SolverKind::Glpk)]
    #[case("microlp", SolverKind::Microlp)]
    fn test_parse_solver_kind(#[case] name: &str, #[case] expected: SolverKind) {
        assert_eq!(name.parse::<SolverKind>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_solver_fallback() {
        let config = SolverConfig::default().with_solver("gurobii");
        assert_eq!(config.resolve_solver().unwrap(), SolverKind::Cbc);
    }

    #[test]
    fn test_unknown_solver_reject() {
        let config = SolverConfig::default()
            .with_solver("gurobii")
            .with_unknown_solver_policy(UnknownSolverPolicy::Reject);

        match config.resolve_solver() {
            Err(PlanError::UnknownSolver(name)) => assert_eq!(name, "gurobii"),
            other => panic!("預期未知求解器錯誤，實際為 {:?}", other),
        }
    }

    #[test]
    fn test_zero_mip_gap_means_unlimited() {
        let config = SolverConfig::default().with_mip_gap(0.0);
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_mip_gap(), None);
    }

    #[rstest]
    #[case(SolverConfig::default().with_mip_gap(-0.1))]
    #[case(SolverConfig::default().with_mip_gap(f64::NAN))]
    #[case(SolverConfig::default().with_time_limit(0.0))]
    #[case(SolverConfig::default().with_time_limit(-5.0))]
    #[case(SolverConfig::new("  ".to_string()))]
    fn test_invalid_config(#[case] config: SolverConfig) {
        assert!(matches!(
            config.validate(),
            Err(PlanError::InvalidSolverConfig(_))
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "solver": "gurobi",
            "mip_gap": 0.05,
            "time_limit": 120,
            "write_lp": true,
            "unknown_solver": "reject"
        }"#;

        let config = SolverConfig::from_json_str(json).unwrap();
        assert_eq!(config.model_name, "prod_planning");
        assert_eq!(config.resolve_solver().unwrap(), SolverKind::Gurobi);
        assert_eq!(config.time_limit, Some(120.0));
        assert!(config.write_lp);
        assert!(!config.write_log);
        assert_eq!(config.unknown_solver, UnknownSolverPolicy::Reject);
    }

    #[test]
    fn test_from_json_validates() {
        let json = r#"{ "time_limit": -1 }"#;
        assert!(SolverConfig::from_json_str(json).is_err());
    }
}
