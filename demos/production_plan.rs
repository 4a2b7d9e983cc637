//! 生產計劃範例
//!
//! ```bash
//! RUST_LOG=info cargo run --example production_plan
//! ```

use anyhow::Context;
use prodplan::{optimize, records_to_json, PlanningHorizon, PlanParameters, SolverConfig};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

const PERIODS: &str = r#"[
    { "index": 0, "demand": "120", "production_capacity": "250", "production_cost": "10" },
    { "index": 1, "demand": "180", "production_capacity": "200", "production_cost": "12" },
    { "index": 2, "demand": "160", "production_capacity": "150", "production_cost": "8" },
    { "index": 3, "demand": "90",  "production_capacity": "0",   "production_cost": "9" }
]"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let horizon = PlanningHorizon::from_json_str(PERIODS).context("讀取期間資料失敗")?;
    let params = PlanParameters::new(Decimal::from(20), Decimal::new(15, 1))?;

    let config = SolverConfig::new("demo_planning".to_string())
        .with_solver("microlp")
        .with_display_log(true);

    let (_model, outcome) = optimize(horizon, params, config)?;
    println!("狀態：{}", outcome.status());

    if let Some(records) = &outcome.records {
        println!("{}", records_to_json(records)?);
    }
    if let Some(costs) = &outcome.costs {
        println!(
            "庫存成本 {}，生產成本 {}，總成本 {}",
            costs.holding_cost, costs.production_cost, costs.total
        );
    }

    Ok(())
}
