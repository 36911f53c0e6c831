//! End-to-end plans: JSON in, projections out.
use networth_core::curve::{repeat, shift, Curve, Schedule};
use networth_core::kernel::{monthly_payment, InflationAdjustment, LoanTerms, DAYS_PER_MONTH};
use networth_core::store::EnvelopeSet;
use networth_core::{compile, project, validate, Plan, Schema, SimulationConfig};
use rstest::rstest;
use serde_json::json;
use std::io::Write;

fn plan(value: serde_json::Value) -> Plan {
    serde_json::from_value(value).unwrap()
}

fn params(map: serde_json::Value) -> serde_json::Value {
    let list: Vec<_> = map
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, v)| json!({"type": k, "value": v}))
        .collect();
    json!(list)
}

fn event(id: i64, ty: &str, p: serde_json::Value, updates: Vec<serde_json::Value>) -> serde_json::Value {
    json!({"id": id, "type": ty, "parameters": params(p), "updating_events": updates})
}

fn balance(set: &EnvelopeSet, name: &str, t: f64) -> f64 {
    set.id(name).map(|id| set.balance_at(id, t)).unwrap_or(0.0)
}

fn job(raise: Option<(f64, f64)>) -> serde_json::Value {
    let updates = raise
        .map(|(day, salary)| vec![event(11, "get_a_raise", json!({"start_time": day, "salary": salary}), vec![])])
        .unwrap_or_default();
    event(1, "get_job", json!({
        "start_time": 0, "end_time": 3650, "salary": 52000, "pay_period": 26,
        "federal_income_tax": 0, "state_income_tax": 0, "social_security_tax": 0,
        "medicare_tax": 0, "401k_contribution": 0, "to_key": "cash"
    }), updates)
}

fn house(updates: Vec<serde_json::Value>) -> serde_json::Value {
    event(2, "buy_house", json!({
        "start_time": 0, "home_value": 300000, "downpayment": 60000, "loan_rate": 0.04,
        "loan_term_years": 30, "appreciation_rate": 0.03, "from_key": "cash", "to_key": "house"
    }), updates)
}

#[test]
fn test_gift_and_purchase_on_grid() {
    let p = plan(json!({"events": [
        event(1, "gift", json!({"start_time": 365, "money": 10, "to_key": "cash"}), vec![]),
        event(2, "purchase", json!({"start_time": 730, "money": 5, "from_key": "cash"}), vec![]),
    ]}));
    let config = SimulationConfig { start_day: 0.0, end_day: 1095.0, step_days: 365.0, inflation: None };
    let (projection, report) = project(&p, &config).unwrap();

    assert!(report.is_clean());
    assert_eq!(projection.days, vec![0.0, 365.0, 730.0]);
    assert_eq!(projection.get("cash").unwrap(), &[0.0, 10.0, 5.0]);
    assert_eq!(projection.total(), vec![0.0, 10.0, 5.0]);
}

#[test]
fn test_standard_mortgage() {
    let payment = monthly_payment(240_000.0, 0.04, 30.0).unwrap();
    assert!((payment - 1145.80).abs() < 0.01);

    let loan = LoanTerms::new(240_000.0, 0.04, 30.0).unwrap();
    assert_eq!(loan.principal_paid_through(0), 0.0);
    assert!((loan.principal_paid_through(360) - 240_000.0).abs() < 1e-6);
    assert!(loan.remaining_balance(360).abs() < 1e-6);
}

#[test]
fn test_raise_only_affects_later_paychecks() {
    let (set, report) = compile(&plan(json!({"events": [job(Some((1095.0, 78000.0)))]})));
    assert!(report.is_clean());

    let schedule = Schedule::new(0.0, 3650.0, 365.0 / 26.0).unwrap();
    for t in [500.0, 1094.0, 1095.0, 2000.0, 3650.0] {
        let expected: f64 = schedule
            .occurrences()
            .take_while(|&ti| ti <= t)
            .map(|ti| if ti >= 1095.0 { 3000.0 } else { 2000.0 })
            .sum();
        assert!((balance(&set, "cash", t) - expected).abs() < 1e-6, "day {}", t);
    }
}

#[test]
fn test_house_sale_zeroes_equity_and_pays_out() {
    let sale = event(21, "sell_house", json!({"start_time": 1000, "to_key": "cash"}), vec![]);
    let (set, report) = compile(&plan(json!({"events": [house(vec![sale])]})));
    assert!(report.is_clean(), "{:?}", report.failures);

    let equity_before = balance(&set, "house", 999.0);
    assert!(equity_before > 60_000.0);
    for t in [1000.0, 1500.0, 5000.0, 20000.0] {
        assert_eq!(balance(&set, "house", t), 0.0);
    }

    // No loan payment falls in (999, 1010]: day 1003.75 is after the sale.
    let jump = balance(&set, "cash", 1010.0) - balance(&set, "cash", 999.0);
    assert!((jump - equity_before).abs() < 1e-6);
    let cash_later = balance(&set, "cash", 3000.0);
    assert!((cash_later - balance(&set, "cash", 1010.0)).abs() < 1e-6);
}

#[test]
fn test_correction_persists() {
    let p = plan(json!({"events": [
        event(1, "gift", json!({"start_time": 0, "money": 120, "to_key": "cash"}), vec![]),
        event(2, "manual_correction", json!({"start_time": 100, "amount": 500, "to_key": "cash"}), vec![]),
    ]}));
    let (set, report) = compile(&p);
    assert!(report.warnings.is_empty());
    assert_eq!(balance(&set, "cash", 99.0), 120.0);
    assert_eq!(balance(&set, "cash", 100.0), 500.0);
    assert_eq!(balance(&set, "cash", 4000.0), 500.0);
}

#[test]
fn test_inflation_round_trip() {
    let adj = InflationAdjustment::new(365.0, 0.03).unwrap();
    let config = SimulationConfig { end_day: 3650.0, ..Default::default() }.with_inflation(0.03, Some(365.0));
    let p = plan(json!({"events": [job(None)]}));

    let (nominal, _) = project(&p, &SimulationConfig { end_day: 3650.0, ..Default::default() }).unwrap();
    let (real, _) = project(&p, &config).unwrap();

    let mut restored = real.get("cash").unwrap().to_vec();
    adj.revert(&real.days, &mut restored);
    for (a, b) in restored.iter().zip(nominal.get("cash").unwrap()) {
        assert!((a - b).abs() < 1e-6 * b.abs().max(1.0));
    }
}

#[test]
fn test_every_entry_is_causal() {
    let p = plan(json!({"events": [
        event(1, "gift", json!({"start_time": 10, "money": 1000, "to_key": "cash"}), vec![]),
        job(Some((400.0, 60000.0))),
        house(vec![
            event(22, "new_appraisal", json!({"start_time": 700, "appraised_value": 320000}), vec![]),
            event(23, "extra_mortgage_payment", json!({"start_time": 800, "amount": 5000}), vec![]),
            event(24, "sell_house", json!({"start_time": 2500, "to_key": "cash"}), vec![]),
        ]),
        event(3, "invest_money", json!({
            "start_time": 50, "amount": 2000, "expected_return": 0.06, "from_key": "cash", "to_key": "portfolio"
        }), vec![event(31, "recurring_contribution", json!({"start_time": 100, "end_time": 1000, "amount": 100}), vec![])]),
        event(4, "buy_groceries", json!({
            "start_time": 5, "end_days": 365, "monthly_amount": 400, "from_key": "cash"
        }), vec![event(41, "update_amount", json!({"start_time": 200, "new_amount": 450}), vec![])]),
        event(5, "buy_health_insurance", json!({
            "start_time": 0, "end_time": 1000, "monthly_premium": 300, "deductible": 500,
            "coverage_percentage": 0.8, "from_key": "cash"
        }), vec![event(51, "medical_expense", json!({"start_time": 300, "total_cost": 3000}), vec![])]),
        event(6, "manual_correction", json!({"start_time": 1200, "amount": 50000, "to_key": "cash"}), vec![]),
        event(7, "pass_away", json!({"start_time": 6000}), vec![]),
    ]}));
    let (set, report) = compile(&p);
    assert!(report.is_clean(), "{:?}", report.failures);

    for id in set.ids() {
        for entry in set.entries(id) {
            assert_eq!(entry.curve.eval(entry.active_from - 1e-6), 0.0, "{} {}", set.name(id), entry.label);
        }
    }
    assert!(set.total_at(6000.0).abs() < 1e-6);
    assert!(set.total_at(5999.0).abs() > 1.0);
}

#[rstest]
#[case(0.0, 3650.0, 365.0)]
#[case(10.0, 400.0, 365.0 / 26.0)]
#[case(0.0, 360.0, 30.0)]
fn test_repeat_equals_shift_sum(#[case] start: f64, #[case] end: f64, #[case] interval: f64) {
    let f = || Curve::new(|t| 100.0 + t);
    let schedule = Schedule::new(start, end, interval).unwrap();
    let repeated = repeat(f(), &schedule);
    let manual = Curve::sum(schedule.occurrences().map(|ti| shift(f(), ti)).collect());
    for k in 0..200 {
        let t = start - 5.0 + k as f64 * (end - start + 10.0) / 199.0;
        assert!((repeated.eval(t) - manual.eval(t)).abs() < 1e-9, "t = {}", t);
    }
    assert!(repeated.eval(end) != 0.0);
}

#[test]
fn test_plan_file_validates_and_projects() {
    let doc = json!({
        "current_time_days": 365,
        "envelopes": ["cash", "savings"],
        "events": [
            event(1, "gift", json!({"start_time": 30, "money": 250, "to_key": "cash"}), vec![]),
            event(2, "high_yield_savings_account", json!({
                "start_time": 60, "amount": 100, "interest_rate": 0.04, "from_key": "cash", "to_key": "savings"
            }), vec![]),
        ]
    });
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", doc).unwrap();

    let p = Plan::from_path(file.path()).unwrap();
    assert!(validate(&p, &Schema::builtin()).is_empty());

    let config = SimulationConfig::default().with_inflation(0.02, None);
    let (projection, report) = project(&p, &config).unwrap();
    assert!(report.is_clean());
    assert_eq!(projection.names, vec!["cash", "savings"]);

    // Values at the plan's current day are in today's money.
    let i = projection.index_at(365.0).unwrap();
    let savings = projection.get("savings").unwrap()[i];
    assert!(savings > 100.0 && savings < 105.0);

    let json = projection.to_json();
    assert_eq!(json["days"].as_array().unwrap().len(), projection.len());
    assert!(json["envelopes"]["cash"].is_array());
}

#[test]
fn test_payment_dates_follow_purchase() {
    let (set, _) = compile(&plan(json!({"events": [house(vec![])]})));
    let payment = monthly_payment(240_000.0, 0.04, 30.0).unwrap();
    let before_first = balance(&set, "cash", DAYS_PER_MONTH - 0.5);
    let after_first = balance(&set, "cash", DAYS_PER_MONTH);
    assert_eq!(before_first, -60_000.0);
    assert!((after_first - before_first + payment).abs() < 1e-6);
}
