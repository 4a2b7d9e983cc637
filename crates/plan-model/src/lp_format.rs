//! LP 文字格式輸出（CPLEX LP 格式，僅供診斷）

use std::fmt::Write;

use crate::expression::LinearExpr;
use crate::model::PlanningModel;

/// 將模型轉為 LP 格式
pub(crate) fn render(model: &PlanningModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\\* {} *\\", model.name());
    out.push_str("Minimize\n");
    let _ = writeln!(out, "OBJ: {}", expression(model, &model.objective().expression()));

    out.push_str("Subject To\n");
    for constraint in model.constraints().iter() {
        let _ = writeln!(
            out,
            "{}: {} {} {}",
            constraint.name,
            expression(model, &constraint.expression),
            constraint.sense.symbol(),
            number(constraint.lp_rhs())
        );
    }

    out.push_str("Bounds\n");
    for variable in model.variables() {
        match variable.upper_bound {
            Some(upper) => {
                let _ = writeln!(
                    out,
                    "{} <= {} <= {}",
                    number(variable.lower_bound),
                    variable.name,
                    number(upper)
                );
            }
            None => {
                let _ = writeln!(out, "{} >= {}", variable.name, number(variable.lower_bound));
            }
        }
    }

    out.push_str("End\n");
    out
}

/// 運算式的變數部分（常數項由呼叫端移到右側）
pub(crate) fn expression(model: &PlanningModel, expr: &LinearExpr) -> String {
    let mut out = String::new();

    for (position, term) in expr.terms().iter().enumerate() {
        let name = model
            .variables()
            .get(term.variable.index())
            .map(|variable| variable.name.as_str())
            .unwrap_or("?");

        let magnitude = term.coefficient.abs();
        let sign = if term.coefficient < 0.0 { "-" } else { "+" };

        if position == 0 {
            if term.coefficient < 0.0 {
                out.push_str("- ");
            }
        } else {
            let _ = write!(out, " {} ", sign);
        }

        if magnitude == 1.0 {
            out.push_str(name);
        } else {
            let _ = write!(out, "{} {}", number(magnitude), name);
        }
    }

    if out.is_empty() {
        out.push('0');
    }
    out
}

fn number(value: f64) -> String {
    if value == 0.0 {
        // 避免輸出 -0
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use plan_core::{Period, PlanParameters, PlanningHorizon};
    use rust_decimal::Decimal;

    use crate::model::PlanningModel;

    fn model() -> PlanningModel {
        let horizon = PlanningHorizon::new(vec![
            Period::new(0, Decimal::from(50), Decimal::from(100), Decimal::from(2)),
            Period::new(1, Decimal::from(50), Decimal::ZERO, Decimal::new(15, 1)),
        ])
        .unwrap();
        let params = PlanParameters::new(Decimal::from(10), Decimal::ONE).unwrap();

        PlanningModel::build("prod_planning", horizon, params).unwrap()
    }

    #[test]
    fn test_render_sections() {
        let lp = model().to_lp_string();

        assert!(lp.starts_with("\\* prod_planning *\\\n"));
        assert!(lp.contains("Minimize\nOBJ: I_0 + I_1 + 2 X_0 + 1.5 X_1\n"));
        assert!(lp.contains("Subject To\n"));
        assert!(lp.contains("inv_balance0: X_0 - I_0 = 40\n"));
        assert!(lp.contains("inv_balance1: I_0 + X_1 - I_1 = 50\n"));
        assert!(lp.contains("prod_cap_month_0: X_0 <= 100\n"));
        assert!(lp.contains("prod_cap_month_1: X_1 <= 0\n"));
        assert!(lp.contains("Bounds\nX_0 >= 0\n"));
        assert!(lp.ends_with("End\n"));
    }

    #[test]
    fn test_constraint_order() {
        let lp = model().to_lp_string();

        let first = lp.find("inv_balance0").unwrap();
        let recurring = lp.find("inv_balance1").unwrap();
        let capacity = lp.find("prod_cap_month_0").unwrap();
        assert!(first < recurring && recurring < capacity);
    }

    #[test]
    fn test_write_lp_file() {
        let dir = std::env::temp_dir().join(format!("plan-model-lp-{}", std::process::id()));
        let path = dir.join("prod_planning.lp");

        let model = model();
        model.write_lp(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, model.to_lp_string());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
