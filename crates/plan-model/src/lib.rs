//! # Plan Model
//!
//! 生產計劃線性規劃建模：決策變數、限制式、目標函數

pub mod constraints;
pub mod expression;
mod lp_format;
pub mod model;
pub mod objective;
pub mod variables;

// Re-export 主要類型
pub use constraints::{
    ConstraintBuilder, ConstraintFamily, ConstraintSense, ConstraintSet, LinearConstraint,
};
pub use expression::{LinearExpr, LinearTerm, VariableId};
pub use model::PlanningModel;
pub use objective::{Objective, ObjectiveBuilder};
pub use variables::{DecisionVariable, VariableKind, VariableRegistry};
