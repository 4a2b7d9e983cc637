//! 輸出紀錄模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Result;

/// 單期生產計劃結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// 期間索引
    pub period: usize,

    /// 生產量
    pub production: Decimal,

    /// 期末庫存
    pub inventory: Decimal,
}

impl ProductionRecord {
    /// 創建新的結果紀錄
    pub fn new(period: usize, production: Decimal, inventory: Decimal) -> Self {
        Self {
            period,
            production,
            inventory,
        }
    }

    /// 該期是否有生產
    pub fn has_production(&self) -> bool {
        self.production > Decimal::ZERO
    }
}

/// 將結果紀錄轉為 JSON（供輸出協作者寫檔）
pub fn records_to_json(records: &[ProductionRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_record() {
        let record = ProductionRecord::new(0, Decimal::from(100), Decimal::from(50));

        assert_eq!(record.period, 0);
        assert!(record.has_production());
        assert!(!ProductionRecord::new(1, Decimal::ZERO, Decimal::ZERO).has_production());
    }

    #[test]
    fn test_records_to_json_keeps_order() {
        let records = vec![
            ProductionRecord::new(0, Decimal::from(100), Decimal::from(50)),
            ProductionRecord::new(1, Decimal::ZERO, Decimal::ZERO),
        ];

        let json = records_to_json(&records).unwrap();
        let parsed: Vec<ProductionRecord> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, records);
        assert!(json.find("\"period\": 0").unwrap() < json.find("\"period\": 1").unwrap());
    }
}
