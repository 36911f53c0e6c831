//! model.rs
//! Typed events. Records are converted here, at the JSON boundary, so the
//! compiler only ever sees complete, well-typed parameters.

use super::catalog::{self, ROUTING_KEYS};
use super::error::EventError;
use super::record::EventRecord;
use crate::curve::Day;
use crate::kernel::{SalaryParams, DAYS_PER_MONTH, DAYS_PER_YEAR};
use crate::params::{Amend, ParamValue, ParameterSet};
use crate::store::EventId;

/// Default annual depreciation for cars.
pub const DEFAULT_CAR_DEPRECIATION: f64 = 0.15;

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub description: String,
    pub kind: EventKind,
}

/// One-off movement of money on `day`. Direction depends on the event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub day: Day,
    pub amount: f64,
    pub envelope: String,
}

/// Fixed amount every `interval` days from `start` through `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Recurring {
    pub start: Day,
    pub end: Day,
    pub interval: Day,
    pub amount: f64,
    pub envelope: String,
}

/// Monthly outflow whose amount can change from a given day on.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub start: Day,
    pub end: Day,
    pub amount: f64,
    pub from_key: String,
    /// (day, new amount)
    pub changes: Vec<(Day, f64)>,
}

/// Money moved out of one envelope into a growing balance in another.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthDeposit {
    pub day: Day,
    pub amount: f64,
    pub annual_rate: f64,
    pub from_key: String,
    pub to_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub start: Day,
    pub end: Day,
    pub salary: SalaryParams,
    pub to_key: String,
    pub retirement_key: Option<String>,
    pub updates: Vec<JobUpdate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobUpdate {
    Raise { day: Day, salary: f64 },
    RetirementRate { day: Day, rate: f64 },
    Bonus(Transfer),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Business {
    pub investment: Transfer,
    pub updates: Vec<BusinessUpdate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BusinessUpdate {
    Income(Recurring),
    Loss(Transfer),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Withdrawal {
    pub schedule: Recurring,
    pub to_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    House,
    Car,
}

/// A loan-financed asset (house or car).
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPurchase {
    pub kind: AssetKind,
    pub day: Day,
    pub value: f64,
    pub downpayment: f64,
    pub loan_rate: f64,
    pub loan_years: f64,
    /// Signed: positive appreciates, negative depreciates.
    pub annual_growth: f64,
    pub from_key: String,
    pub to_key: String,
    pub updates: Vec<AssetUpdate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetUpdate {
    Appraisal { day: Day, value: f64 },
    Prepayment(Transfer),
    Expense(Transfer),
    LatePayment(Transfer),
    GrowthChange { day: Day, annual_growth: f64 },
    Sale { day: Day, sale_price: Option<f64>, to_key: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Investment {
    pub deposit: GrowthDeposit,
    pub updates: Vec<InvestmentUpdate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvestmentUpdate {
    Dividend(Transfer),
    /// Each contribution grows at the parent's rate in `to_key`.
    Contribution { schedule: Recurring, to_key: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub day: Day,
    pub cost: f64,
    pub from_key: String,
    pub to_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insurance {
    pub premiums: Subscription,
    pub deductible: f64,
    pub coverage: f64,
    pub claims: Vec<Claim>,
}

impl Insurance {
    /// Insurer's share of a claim: coverage applied above the deductible.
    pub fn payout(&self, cost: f64) -> f64 {
        (cost - self.deductible).max(0.0) * self.coverage
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Taxes {
    pub payment: Transfer,
    pub refunds: Vec<Transfer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kid {
    pub initial_costs: Transfer,
    pub updates: Vec<KidUpdate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KidUpdate {
    Childcare(Recurring),
    CollegeFund { initial: Transfer, monthly: Recurring, to_key: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Divorce {
    pub day: Day,
    pub settlement: f64,
    pub attorney_fees: f64,
    pub from_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Gift(Transfer),
    Purchase(Transfer),
    Job(Job),
    Business(Business),
    Retirement(Withdrawal),
    Asset(AssetPurchase),
    Investment(Investment),
    Savings(GrowthDeposit),
    Groceries(Subscription),
    HealthInsurance(Insurance),
    LifeInsurance(Subscription),
    HomeInsurance(Insurance),
    GovernmentAid(Recurring),
    Taxes(Taxes),
    Kid(Kid),
    Marriage(Transfer),
    Divorce(Divorce),
    PassAway { day: Day },
    Correction { day: Day, actual: f64, envelope: String },
}

/// Typed read access to one record's parameters.
pub struct Params<'a> {
    event_id: &'a EventId,
    set: ParameterSet,
    /// Keys copied from the parent event rather than given by the record.
    inherited: Vec<String>,
}

impl<'a> Params<'a> {
    pub fn new(event_id: &'a EventId, set: ParameterSet) -> Self {
        Self { event_id, set, inherited: Vec::new() }
    }

    pub fn set(&self) -> &ParameterSet {
        &self.set
    }

    fn missing(&self, key: &str) -> EventError {
        EventError::MissingParameter { event_id: self.event_id.clone(), parameter: key.to_string() }
    }

    fn invalid(&self, key: &str, reason: impl Into<String>) -> EventError {
        EventError::InvalidParameter {
            event_id: self.event_id.clone(),
            parameter: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn opt_number(&self, key: &str) -> Result<Option<f64>, EventError> {
        let Some(value) = self.set.get(key) else {
            return Ok(None);
        };
        let n = value
            .as_number()
            .ok_or_else(|| self.invalid(key, format!("expected a number, got {}", value.kind())))?;
        if !n.is_finite() {
            return Err(self.invalid(key, "not a finite number"));
        }
        Ok(Some(n))
    }

    pub fn number(&self, key: &str) -> Result<f64, EventError> {
        self.opt_number(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn non_negative(&self, key: &str) -> Result<f64, EventError> {
        let n = self.number(key)?;
        if n < 0.0 {
            return Err(self.invalid(key, format!("must not be negative, got {}", n)));
        }
        Ok(n)
    }

    /// A rate in `[0, 1]`.
    pub fn fraction(&self, key: &str) -> Result<f64, EventError> {
        let n = self.number(key)?;
        if !(0.0..=1.0).contains(&n) {
            return Err(self.invalid(key, format!("must be between 0 and 1, got {}", n)));
        }
        Ok(n)
    }

    pub fn day(&self, key: &str) -> Result<Day, EventError> {
        self.number(key)
    }

    /// An envelope name.
    pub fn key(&self, key: &str) -> Result<String, EventError> {
        match self.set.get(key) {
            None => Err(self.missing(key)),
            Some(ParamValue::Text(s)) if !s.trim().is_empty() => Ok(s.clone()),
            Some(other) => Err(self.invalid(key, format!("expected an envelope name, got {}", other.kind()))),
        }
    }

    pub fn opt_key(&self, key: &str) -> Result<Option<String>, EventError> {
        if self.set.contains(key) { self.key(key).map(Some) } else { Ok(None) }
    }

    /// Like [`Params::key`], but rejects a value inherited from the parent.
    pub fn own_key(&self, key: &str) -> Result<String, EventError> {
        if self.inherited.iter().any(|k| k == key) {
            return Err(self.missing(key));
        }
        self.key(key)
    }

    pub fn transfer(&self, amount_key: &str, envelope_key: &str) -> Result<Transfer, EventError> {
        Ok(Transfer {
            day: self.day("start_time")?,
            amount: self.number(amount_key)?,
            envelope: self.key(envelope_key)?,
        })
    }

    pub fn recurring(&self, end: Day, interval: Day, amount_key: &str, envelope_key: &str) -> Result<Recurring, EventError> {
        Ok(Recurring {
            start: self.day("start_time")?,
            end,
            interval,
            amount: self.number(amount_key)?,
            envelope: self.key(envelope_key)?,
        })
    }

    /// Monthly recurrence ending `end_days` after the start.
    pub fn monthly_for(&self, amount_key: &str, envelope_key: &str) -> Result<Recurring, EventError> {
        let start = self.day("start_time")?;
        self.recurring(start + self.number("end_days")?, DAYS_PER_MONTH, amount_key, envelope_key)
    }
}

/// Converts every updating event of `record`. `convert` returns `Ok(None)` for
/// update types it does not know.
fn collect_updates<T>(
    record: &EventRecord,
    parent: &ParameterSet,
    mut convert: impl FnMut(&str, &Params<'_>) -> Result<Option<T>, EventError>,
) -> Result<Vec<T>, EventError> {
    let routing = parent.subset(ROUTING_KEYS);
    record
        .updating_events
        .iter()
        .map(|u| {
            let own = u.parameter_set()?;
            let inherited = routing.keys().filter(|k| !own.contains(k)).map(String::from).collect();
            let mut set = routing.clone();
            set.amend(&own);

            let params = Params { event_id: &u.id, set, inherited };
            convert(&u.event_type, &params)?.ok_or_else(|| EventError::UnknownUpdateType {
                event_id: record.id.clone(),
                event_type: record.event_type.clone(),
                update_type: u.event_type.clone(),
            })
        })
        .collect()
}

impl Event {
    pub fn from_record(record: &EventRecord) -> Result<Self, EventError> {
        if catalog::lookup(&record.event_type).is_none() {
            return Err(EventError::UnknownEventType {
                event_id: record.id.clone(),
                event_type: record.event_type.clone(),
            });
        }
        let p = Params::new(&record.id, record.parameter_set()?);
        let kind = convert(record, &p)?;
        Ok(Event { id: record.id.clone(), description: record.description.clone(), kind })
    }
}

fn convert(record: &EventRecord, p: &Params<'_>) -> Result<EventKind, EventError> {
    let kind = match record.event_type.as_str() {
        "gift" => EventKind::Gift(p.transfer("money", "to_key")?),
        "purchase" => EventKind::Purchase(p.transfer("money", "from_key")?),
        "marriage" => EventKind::Marriage(p.transfer("cost", "from_key")?),

        "get_job" => {
            let salary = SalaryParams {
                salary: p.number("salary")?,
                periods: p.number("pay_period")?,
                federal_rate: p.fraction("federal_income_tax")?,
                state_rate: p.fraction("state_income_tax")?,
                social_security_rate: p.fraction("social_security_tax")?,
                medicare_rate: p.fraction("medicare_tax")?,
                retirement_rate: p.fraction("401k_contribution")?,
            };
            let updates = collect_updates(record, p.set(), |ty, u| {
                Ok(Some(match ty {
                    "get_a_raise" => JobUpdate::Raise { day: u.day("start_time")?, salary: u.number("salary")? },
                    "change_401k_contribution" => JobUpdate::RetirementRate {
                        day: u.day("start_time")?,
                        rate: u.fraction("401k_contribution")?,
                    },
                    "get_a_bonus" => JobUpdate::Bonus(u.transfer("bonus", "to_key")?),
                    _ => return Ok(None),
                }))
            })?;
            EventKind::Job(Job {
                start: p.day("start_time")?,
                end: p.day("end_time")?,
                salary,
                to_key: p.key("to_key")?,
                retirement_key: p.opt_key("retirement_key")?,
                updates,
            })
        }

        "start_business" => {
            let updates = collect_updates(record, p.set(), |ty, u| {
                Ok(Some(match ty {
                    "business_income" => {
                        BusinessUpdate::Income(u.recurring(u.day("end_time")?, DAYS_PER_MONTH, "monthly_income", "to_key")?)
                    }
                    "business_loss" => BusinessUpdate::Loss(u.transfer("loss_amount", "from_key")?),
                    _ => return Ok(None),
                }))
            })?;
            EventKind::Business(Business { investment: p.transfer("initial_investment", "from_key")?, updates })
        }

        "retirement" => EventKind::Retirement(Withdrawal {
            schedule: p.recurring(p.day("end_time")?, p.number("frequency_days")?, "amount", "from_key")?,
            to_key: p.key("to_key")?,
        }),

        "buy_house" => EventKind::Asset(AssetPurchase {
            kind: AssetKind::House,
            day: p.day("start_time")?,
            value: p.non_negative("home_value")?,
            downpayment: p.non_negative("downpayment")?,
            loan_rate: p.number("loan_rate")?,
            loan_years: p.number("loan_term_years")?,
            annual_growth: p.number("appreciation_rate")?,
            from_key: p.key("from_key")?,
            to_key: p.key("to_key")?,
            updates: collect_updates(record, p.set(), |ty, u| {
                Ok(Some(match ty {
                    "new_appraisal" => AssetUpdate::Appraisal {
                        day: u.day("start_time")?,
                        value: u.non_negative("appraised_value")?,
                    },
                    "extra_mortgage_payment" => AssetUpdate::Prepayment(u.transfer("amount", "from_key")?),
                    "late_payment" => AssetUpdate::LatePayment(u.transfer("amount", "from_key")?),
                    "sell_house" => asset_sale(u)?,
                    _ => return Ok(None),
                }))
            })?,
        }),

        "buy_car" => EventKind::Asset(AssetPurchase {
            kind: AssetKind::Car,
            day: p.day("start_time")?,
            value: p.non_negative("car_value")?,
            downpayment: p.non_negative("downpayment")?,
            loan_rate: p.number("loan_rate")?,
            loan_years: p.number("loan_term_years")?,
            annual_growth: -p.opt_number("depreciation_rate")?.unwrap_or(DEFAULT_CAR_DEPRECIATION),
            from_key: p.key("from_key")?,
            to_key: p.key("to_key")?,
            updates: collect_updates(record, p.set(), |ty, u| {
                Ok(Some(match ty {
                    "pay_loan_early" => AssetUpdate::Prepayment(u.transfer("amount", "from_key")?),
                    "car_repair" => AssetUpdate::Expense(u.transfer("cost", "from_key")?),
                    "adjust_depreciation" => AssetUpdate::GrowthChange {
                        day: u.day("start_time")?,
                        annual_growth: -u.number("depreciation_rate")?,
                    },
                    "sell_car" => asset_sale(u)?,
                    _ => return Ok(None),
                }))
            })?,
        }),

        "invest_money" => EventKind::Investment(Investment {
            deposit: growth_deposit(p, "expected_return")?,
            updates: collect_updates(record, p.set(), |ty, u| {
                Ok(Some(match ty {
                    "dividend_payout" => InvestmentUpdate::Dividend(u.transfer("amount", "to_key")?),
                    "recurring_contribution" => InvestmentUpdate::Contribution {
                        schedule: u.recurring(u.day("end_time")?, DAYS_PER_MONTH, "amount", "from_key")?,
                        to_key: u.key("to_key")?,
                    },
                    _ => return Ok(None),
                }))
            })?,
        }),

        "high_yield_savings_account" => EventKind::Savings(growth_deposit(p, "interest_rate")?),

        "buy_groceries" => {
            let changes = collect_updates(record, p.set(), |ty, u| {
                Ok(match ty {
                    "update_amount" => Some((u.day("start_time")?, u.number("new_amount")?)),
                    _ => None,
                })
            })?;
            let monthly = p.monthly_for("monthly_amount", "from_key")?;
            EventKind::Groceries(Subscription {
                start: monthly.start,
                end: monthly.end,
                amount: monthly.amount,
                from_key: monthly.envelope,
                changes,
            })
        }

        "buy_life_insurance" => {
            let start = p.day("start_time")?;
            let changes = collect_updates(record, p.set(), |ty, u| {
                Ok(match ty {
                    "increase_coverage" => Some((u.day("start_time")?, u.number("new_monthly_premium")?)),
                    _ => None,
                })
            })?;
            EventKind::LifeInsurance(Subscription {
                start,
                end: start + p.number("term_years")? * DAYS_PER_YEAR,
                amount: p.number("monthly_premium")?,
                from_key: p.key("from_key")?,
                changes,
            })
        }

        "buy_health_insurance" => EventKind::HealthInsurance(insurance(record, p, &["medical_expense"], "total_cost")?),
        "buy_home_insurance" => EventKind::HomeInsurance(insurance(
            record,
            p,
            &["tornado_damage", "house_fire", "flood_damage"],
            "damage_cost",
        )?),

        "receive_government_aid" => {
            let start = p.day("start_time")?;
            EventKind::GovernmentAid(p.recurring(start + p.number("end_days")?, p.number("frequency_days")?, "amount", "to_key")?)
        }

        "pay_taxes" => EventKind::Taxes(Taxes {
            payment: p.transfer("total_tax_due", "from_key")?,
            refunds: collect_updates(record, p.set(), |ty, u| {
                Ok(match ty {
                    "receive_tax_refund" => Some(u.transfer("amount", "to_key")?),
                    _ => None,
                })
            })?,
        }),

        "have_kid" => EventKind::Kid(Kid {
            initial_costs: p.transfer("initial_costs", "from_key")?,
            updates: collect_updates(record, p.set(), |ty, u| {
                Ok(Some(match ty {
                    "childcare_costs" => KidUpdate::Childcare(u.monthly_for("monthly_cost", "from_key")?),
                    "college_fund" => KidUpdate::CollegeFund {
                        initial: u.transfer("initial_contribution", "from_key")?,
                        monthly: u.monthly_for("monthly_contribution", "from_key")?,
                        to_key: u.own_key("to_key")?,
                    },
                    _ => return Ok(None),
                }))
            })?,
        }),

        "divorce" => EventKind::Divorce(Divorce {
            day: p.day("start_time")?,
            settlement: p.number("settlement_amount")?,
            attorney_fees: p.number("attorney_fees")?,
            from_key: p.key("from_key")?,
        }),

        "pass_away" => EventKind::PassAway { day: p.day("start_time")? },

        "manual_correction" => EventKind::Correction {
            day: p.day("start_time")?,
            actual: p.number("amount")?,
            envelope: p.key("to_key")?,
        },

        other => {
            return Err(EventError::UnknownEventType { event_id: record.id.clone(), event_type: other.to_string() })
        }
    };
    Ok(kind)
}

fn asset_sale(u: &Params<'_>) -> Result<AssetUpdate, EventError> {
    Ok(AssetUpdate::Sale {
        day: u.day("start_time")?,
        sale_price: u.opt_number("sale_price")?,
        to_key: u.own_key("to_key")?,
    })
}

fn growth_deposit(p: &Params<'_>, rate_key: &str) -> Result<GrowthDeposit, EventError> {
    Ok(GrowthDeposit {
        day: p.day("start_time")?,
        amount: p.number("amount")?,
        annual_rate: p.number(rate_key)?,
        from_key: p.key("from_key")?,
        to_key: p.key("to_key")?,
    })
}

/// Premiums plus claims. Every update type in `claim_types` is a claim whose
/// cost is read from `cost_key`.
fn insurance(
    record: &EventRecord,
    p: &Params<'_>,
    claim_types: &[&str],
    cost_key: &str,
) -> Result<Insurance, EventError> {
    let from_key = p.key("from_key")?;
    let claims = collect_updates(record, p.set(), |ty, u| {
        if !claim_types.contains(&ty) {
            return Ok(None);
        }
        let from_key = u.key("from_key")?;
        Ok(Some(Claim {
            day: u.day("start_time")?,
            cost: u.non_negative(cost_key)?,
            to_key: u.opt_key("to_key")?.unwrap_or_else(|| from_key.clone()),
            from_key,
        }))
    })?;

    let start = p.day("start_time")?;
    Ok(Insurance {
        premiums: Subscription {
            start,
            end: p.day("end_time")?,
            amount: p.number("monthly_premium")?,
            from_key,
            changes: Vec::new(),
        },
        deductible: p.non_negative("deductible")?,
        coverage: p.fraction("coverage_percentage")?,
        claims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::record::ParameterRecord;
    use serde_json::json;

    fn record(id: i64, ty: &str, params: serde_json::Value, updates: Vec<EventRecord>) -> EventRecord {
        let parameters = params
            .as_object()
            .map(|m| {
                m.iter()
                    .enumerate()
                    .map(|(i, (k, v))| ParameterRecord { id: Some(EventId::Number(i as i64)), param_type: k.clone(), value: v.clone() })
                    .collect()
            })
            .unwrap_or_default();
        EventRecord { id: EventId::Number(id), event_type: ty.into(), description: String::new(), parameters, updating_events: updates }
    }

    fn job(updates: Vec<EventRecord>) -> EventRecord {
        record(1, "get_job", json!({
            "start_time": 0, "end_time": 3650, "salary": 78000, "pay_period": 26,
            "federal_income_tax": 0.12, "state_income_tax": 0.05, "social_security_tax": 0.062,
            "medicare_tax": 0.0145, "401k_contribution": 0.06, "to_key": "cash"
        }), updates)
    }

    #[test]
    fn test_job_with_updates() {
        let event = Event::from_record(&job(vec![
            record(2, "get_a_raise", json!({"start_time": 1095, "salary": 91000}), vec![]),
            record(3, "get_a_bonus", json!({"start_time": 400, "bonus": 5000}), vec![]),
        ]))
        .unwrap();

        let EventKind::Job(job) = event.kind else { panic!("expected a job") };
        assert_eq!(job.salary.periods, 26.0);
        assert_eq!(job.retirement_key, None);
        assert_eq!(job.updates[0], JobUpdate::Raise { day: 1095.0, salary: 91_000.0 });
        // Bonus inherits the job's envelope.
        assert_eq!(job.updates[1], JobUpdate::Bonus(Transfer { day: 400.0, amount: 5000.0, envelope: "cash".into() }));
    }

    #[test]
    fn test_unknown_event_type() {
        let err = Event::from_record(&record(9, "buy_spaceship", json!({}), vec![])).unwrap_err();
        assert!(matches!(err, EventError::UnknownEventType { .. }));
    }

    #[test]
    fn test_unknown_update_type_names_parent() {
        let err = Event::from_record(&job(vec![record(2, "sell_house", json!({"start_time": 5}), vec![])])).unwrap_err();
        match err {
            EventError::UnknownUpdateType { event_id, update_type, .. } => {
                assert_eq!(event_id, EventId::Number(1));
                assert_eq!(update_type, "sell_house");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_parameter_names_key() {
        let err = Event::from_record(&record(4, "gift", json!({"start_time": 1, "to_key": "cash"}), vec![])).unwrap_err();
        assert_eq!(err, EventError::MissingParameter { event_id: EventId::Number(4), parameter: "money".into() });
    }

    #[test]
    fn test_invalid_fraction() {
        let mut r = job(vec![]);
        for p in &mut r.parameters {
            if p.param_type == "federal_income_tax" {
                p.value = json!(12);
            }
        }
        assert!(matches!(Event::from_record(&r), Err(EventError::InvalidParameter { .. })));
    }

    #[test]
    fn test_sale_requires_its_own_destination() {
        let house = |sale: serde_json::Value| {
            record(5, "buy_house", json!({
                "start_time": 0, "home_value": 300000, "downpayment": 60000, "loan_rate": 0.04,
                "loan_term_years": 30, "appreciation_rate": 0.03, "from_key": "cash", "to_key": "house"
            }), vec![record(6, "sell_house", sale, vec![])])
        };
        let err = Event::from_record(&house(json!({"start_time": 100}))).unwrap_err();
        assert!(matches!(err, EventError::MissingParameter { ref parameter, .. } if parameter == "to_key"));

        let ok = Event::from_record(&house(json!({"start_time": 100, "to_key": "cash"}))).unwrap();
        let EventKind::Asset(a) = ok.kind else { panic!("expected an asset") };
        assert_eq!(a.updates[0], AssetUpdate::Sale { day: 100.0, sale_price: None, to_key: "cash".into() });
    }

    #[test]
    fn test_car_default_depreciation() {
        let car = record(7, "buy_car", json!({
            "start_time": 0, "car_value": 30000, "downpayment": 5000, "loan_rate": 0.05,
            "loan_term_years": 5, "from_key": "cash", "to_key": "car"
        }), vec![]);
        let EventKind::Asset(a) = Event::from_record(&car).unwrap().kind else { panic!("expected an asset") };
        assert_eq!(a.kind, AssetKind::Car);
        assert_eq!(a.annual_growth, -DEFAULT_CAR_DEPRECIATION);
    }

    #[test]
    fn test_home_insurance_claims_default_to_payer() {
        let r = record(8, "buy_home_insurance", json!({
            "start_time": 0, "end_time": 3650, "monthly_premium": 100, "deductible": 1000,
            "coverage_percentage": 0.8, "from_key": "cash"
        }), vec![
            record(9, "house_fire", json!({"start_time": 500, "damage_cost": 11000}), vec![]),
            record(10, "flood_damage", json!({"start_time": 700, "damage_cost": 500}), vec![]),
        ]);
        let EventKind::HomeInsurance(ins) = Event::from_record(&r).unwrap().kind else { panic!("expected insurance") };
        assert_eq!(ins.claims.len(), 2);
        assert_eq!(ins.claims[0].to_key, "cash");
        assert!((ins.payout(11_000.0) - 8000.0).abs() < 1e-9);
        assert_eq!(ins.payout(500.0), 0.0);
    }
}
