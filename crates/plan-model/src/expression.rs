//! 線性運算式

use std::ops::Add;

/// 決策變數識別碼（模型內變數陣列的索引）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(usize);

impl VariableId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// 在模型變數陣列中的位置
    pub fn index(&self) -> usize {
        self.0
    }
}

/// 係數 × 變數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTerm {
    pub variable: VariableId,
    pub coefficient: f64,
}

/// 線性運算式：Σ 係數 × 變數 + 常數
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearExpr {
    terms: Vec<LinearTerm>,
    constant: f64,
}

impl LinearExpr {
    /// 創建空運算式
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：加入一項
    pub fn with_term(mut self, variable: VariableId, coefficient: f64) -> Self {
        self.add_term(variable, coefficient);
        self
    }

    /// 加入一項
    pub fn add_term(&mut self, variable: VariableId, coefficient: f64) {
        self.terms.push(LinearTerm {
            variable,
            coefficient,
        });
    }

    /// 所有項（依加入順序）
    pub fn terms(&self) -> &[LinearTerm] {
        &self.terms
    }

    /// 常數項
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// 某變數的合計係數
    pub fn coefficient(&self, variable: VariableId) -> f64 {
        self.terms
            .iter()
            .filter(|term| term.variable == variable)
            .map(|term| term.coefficient)
            .sum()
    }

    /// 以變數值代入求值
    ///
    /// `values` 以 `VariableId::index()` 為索引；缺少的變數視為 0。
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms.iter().fold(self.constant, |acc, term| {
            acc + term.coefficient * values.get(term.variable.index()).copied().unwrap_or(0.0)
        })
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
        self
    }
}

impl FromIterator<(VariableId, f64)> for LinearExpr {
    fn from_iter<T: IntoIterator<Item = (VariableId, f64)>>(iter: T) -> Self {
        let mut expr = LinearExpr::new();
        for (variable, coefficient) in iter {
            expr.add_term(variable, coefficient);
        }
        expr
    }
}
