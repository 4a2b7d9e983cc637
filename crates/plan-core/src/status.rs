//! 求解狀態

use serde::{Deserialize, Serialize};
use std::fmt;

/// 模型求解狀態
///
/// 由求解協調器設定一次，之後不再變更。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolveStatus {
    /// 尚未求解
    NotSolved,
    /// 最優解
    Optimal,
    /// 可行解，但未證明最優（例如達到時間上限）
    Feasible,
    /// 不可行
    Infeasible,
    /// 無界
    Unbounded,
    /// 求解器錯誤
    Error,
}

impl SolveStatus {
    /// 是否為終止狀態
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SolveStatus::NotSolved)
    }

    /// 是否帶有可讀取的變數值
    pub fn has_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::NotSolved => "not-solved",
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::Error => "error",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!SolveStatus::NotSolved.is_terminal());
        assert!(SolveStatus::Optimal.is_terminal());
        assert!(SolveStatus::Infeasible.is_terminal());
        assert!(SolveStatus::Error.is_terminal());
    }

    #[test]
    fn test_has_solution() {
        assert!(SolveStatus::Optimal.has_solution());
        assert!(SolveStatus::Feasible.has_solution());
        assert!(!SolveStatus::Unbounded.has_solution());
        assert!(!SolveStatus::NotSolved.has_solution());
    }

    #[test]
    fn test_display() {
        assert_eq!(SolveStatus::NotSolved.to_string(), "not-solved");
        assert_eq!(SolveStatus::Infeasible.to_string(), "infeasible");
    }
}
