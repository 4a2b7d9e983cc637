//! Decimal 與 f64 之間的轉換
//!
//! 輸入與輸出的數量、成本使用 Decimal；只有送入求解器時才轉為 f64。

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::{PlanError, Result};

/// 求解結果轉回 Decimal 時保留的小數位數
pub const SOLUTION_DECIMAL_PLACES: u32 = 9;

/// Decimal 轉 f64
pub fn to_f64(value: Decimal) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| PlanError::NumericConversion(format!("無法將 {} 轉為 f64", value)))
}

/// f64 轉 Decimal，並四捨五入到指定小數位
///
/// 四捨五入後為零的值一律回傳正零，避免輸出 `-0`。
pub fn from_f64(value: f64, decimal_places: u32) -> Result<Decimal> {
    let decimal = Decimal::from_f64(value)
        .ok_or_else(|| PlanError::NumericConversion(format!("無法將 {} 轉為 Decimal", value)))?
        .round_dp(decimal_places);

    if decimal.is_zero() {
        Ok(Decimal::ZERO)
    } else {
        Ok(decimal.normalize())
    }
}
