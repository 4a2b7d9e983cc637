//! 決策變數登錄

use plan_core::PlanningHorizon;

use crate::expression::VariableId;

/// 決策變數種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// 生產量 X[p]
    Production,
    /// 期末庫存 I[p]
    Inventory,
}

impl VariableKind {
    /// 變數名稱前綴
    pub fn prefix(&self) -> &'static str {
        match self {
            VariableKind::Production => "X",
            VariableKind::Inventory => "I",
        }
    }
}

/// 決策變數（非負連續變數）
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionVariable {
    pub id: VariableId,

    /// 變數名稱，例如 `X_0`、`I_3`
    pub name: String,

    pub kind: VariableKind,

    /// 所屬期間
    pub period: usize,

    /// 下界
    pub lower_bound: f64,

    /// 上界（None 表示無上界）
    pub upper_bound: Option<f64>,
}

impl DecisionVariable {
    fn new(id: VariableId, kind: VariableKind, period: usize) -> Self {
        Self {
            id,
            name: format!("{}_{}", kind.prefix(), period),
            kind,
            period,
            lower_bound: 0.0,
            upper_bound: None,
        }
    }
}

/// 期間索引 → 決策變數 的對照
///
/// 以固定長度陣列保存，索引即期間編號。
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRegistry {
    production: Vec<VariableId>,
    inventory: Vec<VariableId>,
}

impl VariableRegistry {
    /// 為每一期建立一個生產量變數與一個庫存變數
    ///
    /// 變數排列順序為 `X_0..X_{N-1}`，接著 `I_0..I_{N-1}`。
    pub fn create(horizon: &PlanningHorizon) -> (Self, Vec<DecisionVariable>) {
        let period_count = horizon.len();
        let mut variables = Vec::with_capacity(period_count * 2);

        let mut register = |kind: VariableKind| -> Vec<VariableId> {
            horizon
                .iter()
                .map(|period| {
                    let id = VariableId::new(variables.len());
                    variables.push(DecisionVariable::new(id, kind, period.index));
                    id
                })
                .collect()
        };

        let production = register(VariableKind::Production);
        let inventory = register(VariableKind::Inventory);

        tracing::debug!("建立決策變數 {} 個", variables.len());

        (
            Self {
                production,
                inventory,
            },
            variables,
        )
    }

    /// 涵蓋的期間數
    pub fn period_count(&self) -> usize {
        self.production.len()
    }

    /// 第 p 期生產量變數
    pub fn production(&self, period: usize) -> Option<VariableId> {
        self.production.get(period).copied()
    }

    /// 第 p 期庫存變數
    pub fn inventory(&self, period: usize) -> Option<VariableId> {
        self.inventory.get(period).copied()
    }

    /// 所有生產量變數（依期間排序）
    pub fn production_vars(&self) -> &[VariableId] {
        &self.production
    }

    /// 所有庫存變數（依期間排序）
    pub fn inventory_vars(&self) -> &[VariableId] {
        &self.inventory
    }
}
