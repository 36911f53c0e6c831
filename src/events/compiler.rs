//! compiler.rs
//! Lowers typed events into curves and appends them to envelopes.
//!
//! Each event is lowered against the envelope set as committed so far into a
//! list of staged postings. Only when the whole event lowers successfully are
//! its postings committed, so a failing event contributes nothing.

use super::error::EventError;
use super::model::*;
use super::record::{EventRecord, Plan};
use crate::curve::{delta_correction, repeat, shift, switch, try_repeat_with, Curve, Day, Schedule};
use crate::kernel::{
    self, AssetValuation, Equity, KernelError, LoanTerms, SalaryPatch, ValuationPatch, DAYS_PER_MONTH,
};
use crate::params::{self, ParamFn};
use crate::store::{EnvelopeEntry, EnvelopeSet, EventId};
use std::fmt;
use tracing::{debug, warn};

/// A curve waiting to be appended to an envelope.
#[derive(Debug, Clone)]
pub struct Posting {
    pub envelope: String,
    pub entry: EnvelopeEntry,
    /// Set for delta corrections: the day the envelope is reconciled.
    pub correction_at: Option<Day>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompileWarning {
    /// A curve active before an existing correction was appended to the
    /// corrected envelope, so the correction no longer hits its target.
    PostedBeforeCorrection {
        event_id: EventId,
        envelope: String,
        active_from: Day,
        corrected_at: Day,
    },
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileWarning::PostedBeforeCorrection { event_id, envelope, active_from, corrected_at } => write!(
                f,
                "Event {} posts to '{}' from day {} but '{}' was corrected at day {}",
                event_id, envelope, active_from, envelope, corrected_at
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    pub compiled: usize,
    pub postings: usize,
    pub failures: Vec<EventError>,
    pub warnings: Vec<CompileWarning>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Treats any failed event as fatal.
    pub fn into_result(self) -> Result<Self, Vec<EventError>> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(self.failures)
        }
    }
}

#[derive(Debug, Default)]
pub struct Compiler {
    set: EnvelopeSet,
    report: CompileReport,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_envelopes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { set: EnvelopeSet::with_names(names), report: CompileReport::default() }
    }

    pub fn envelopes(&self) -> &EnvelopeSet {
        &self.set
    }

    /// Converts and compiles one record. Failures are recorded, not returned.
    pub fn compile_record(&mut self, record: &EventRecord) {
        let result = Event::from_record(record).and_then(|event| self.compile_event(&event));
        if let Err(e) = result {
            warn!(event_id = %e.event_id(), error = %e, "event skipped");
            self.report.failures.push(e);
        }
    }

    /// Lowers and commits one event; returns the number of postings.
    pub fn compile_event(&mut self, event: &Event) -> Result<usize, EventError> {
        let postings = lower(event, &self.set)?;
        let count = postings.len();
        for posting in postings {
            self.commit(&event.id, posting);
        }
        self.report.compiled += 1;
        self.report.postings += count;
        debug!(event_id = %event.id, postings = count, "event compiled");
        Ok(count)
    }

    fn commit(&mut self, event_id: &EventId, posting: Posting) {
        let id = self.set.ensure(&posting.envelope);
        if let Some(corrected_at) = self.set.correction_day(id) {
            if posting.entry.active_from < corrected_at {
                let warning = CompileWarning::PostedBeforeCorrection {
                    event_id: event_id.clone(),
                    envelope: posting.envelope.clone(),
                    active_from: posting.entry.active_from,
                    corrected_at,
                };
                warn!(event_id = %event_id, "{}", warning);
                self.report.warnings.push(warning);
            }
        }
        self.set.append(&posting.envelope, posting.entry);
        if let Some(day) = posting.correction_at {
            self.set.mark_correction(id, day);
        }
    }

    pub fn finish(self) -> (EnvelopeSet, CompileReport) {
        (self.set, self.report)
    }
}

/// Compiles every event of the plan in declaration order.
pub fn compile(plan: &Plan) -> (EnvelopeSet, CompileReport) {
    let mut compiler = Compiler::with_envelopes(&plan.envelopes);
    for record in &plan.events {
        compiler.compile_record(record);
    }
    compiler.finish()
}

/// Postings under construction for one event.
struct Stage<'a> {
    id: &'a EventId,
    postings: Vec<Posting>,
}

impl<'a> Stage<'a> {
    fn new(id: &'a EventId) -> Self {
        Self { id, postings: Vec::new() }
    }

    fn kernel(&self, parameter: &'static str) -> impl FnOnce(KernelError) -> EventError + 'a {
        EventError::kernel(self.id, parameter)
    }

    fn post(&mut self, envelope: &str, label: &str, active_from: Day, curve: Curve) {
        self.postings.push(Posting {
            envelope: envelope.to_string(),
            entry: EnvelopeEntry { source: self.id.clone(), label: label.to_string(), active_from, curve },
            correction_at: None,
        });
    }

    fn inflow(&mut self, t: &Transfer, label: &str) -> Result<(), EventError> {
        let f = kernel::inflow(t.amount).map_err(self.kernel("amount"))?;
        self.post(&t.envelope, label, t.day, shift(f, t.day));
        Ok(())
    }

    fn outflow(&mut self, t: &Transfer, label: &str) -> Result<(), EventError> {
        let f = kernel::outflow(t.amount).map_err(self.kernel("amount"))?;
        self.post(&t.envelope, label, t.day, shift(f, t.day));
        Ok(())
    }

    fn schedule(&self, r: &Recurring) -> Result<Schedule, EventError> {
        Schedule::new(r.start, r.end, r.interval).map_err(self.kernel("frequency_days"))
    }

    fn recurring_inflow(&mut self, r: &Recurring, envelope: &str, label: &str) -> Result<(), EventError> {
        let f = kernel::inflow(r.amount).map_err(self.kernel("amount"))?;
        let schedule = self.schedule(r)?;
        self.post(envelope, label, r.start, repeat(f, &schedule));
        Ok(())
    }

    fn recurring_outflow(&mut self, r: &Recurring, label: &str) -> Result<(), EventError> {
        let f = kernel::outflow(r.amount).map_err(self.kernel("amount"))?;
        let schedule = self.schedule(r)?;
        self.post(&r.envelope, label, r.start, repeat(f, &schedule));
        Ok(())
    }

    /// Monthly outflow; each occurrence freezes the amount in force that day.
    fn subscription(&mut self, s: &Subscription, label: &str) -> Result<(), EventError> {
        let mut amount = params::constant(s.amount);
        for &(day, new_amount) in &s.changes {
            amount.amend_at(new_amount, day);
        }
        let schedule = Schedule::new(s.start, s.end, DAYS_PER_MONTH).map_err(self.kernel("end_time"))?;
        let curve = try_repeat_with(&schedule, |ti| kernel::outflow(amount.at(ti))).map_err(self.kernel("amount"))?;
        self.post(&s.from_key, label, s.start, curve);
        Ok(())
    }

    /// Moves `amount` out of `from_key` and grows it in `to_key`.
    fn growth_deposit(&mut self, d: &GrowthDeposit, label: &str) -> Result<(), EventError> {
        self.outflow(&Transfer { day: d.day, amount: d.amount, envelope: d.from_key.clone() }, "deposit")?;
        let growth = kernel::compound(d.amount, d.annual_rate).map_err(self.kernel("rate"))?;
        self.post(&d.to_key, label, d.day, shift(growth, d.day));
        Ok(())
    }
}

fn lower(event: &Event, set: &EnvelopeSet) -> Result<Vec<Posting>, EventError> {
    let mut stage = Stage::new(&event.id);

    match &event.kind {
        EventKind::Gift(t) => stage.inflow(t, "gift")?,
        EventKind::Purchase(t) => stage.outflow(t, "purchase")?,
        EventKind::Marriage(t) => stage.outflow(t, "wedding")?,
        EventKind::Divorce(d) => {
            let from = |amount| Transfer { day: d.day, amount, envelope: d.from_key.clone() };
            stage.outflow(&from(d.settlement), "settlement")?;
            stage.outflow(&from(d.attorney_fees), "attorney fees")?;
        }

        EventKind::Job(job) => lower_job(&mut stage, job)?,
        EventKind::Asset(asset) => lower_asset(&mut stage, asset)?,

        EventKind::Business(b) => {
            stage.outflow(&b.investment, "business investment")?;
            for u in &b.updates {
                match u {
                    BusinessUpdate::Income(r) => stage.recurring_inflow(r, &r.envelope, "business income")?,
                    BusinessUpdate::Loss(t) => stage.outflow(t, "business loss")?,
                }
            }
        }

        EventKind::Retirement(w) => {
            stage.recurring_outflow(&w.schedule, "retirement withdrawal")?;
            stage.recurring_inflow(&w.schedule, &w.to_key, "retirement income")?;
        }

        EventKind::Investment(inv) => {
            stage.growth_deposit(&inv.deposit, "investment")?;
            for u in &inv.updates {
                match u {
                    InvestmentUpdate::Dividend(t) => stage.inflow(t, "dividend")?,
                    InvestmentUpdate::Contribution { schedule, to_key } => {
                        stage.recurring_outflow(schedule, "contribution")?;
                        let growth = kernel::compound(schedule.amount, inv.deposit.annual_rate)
                            .map_err(stage.kernel("expected_return"))?;
                        let occurrences = stage.schedule(schedule)?;
                        stage.post(to_key, "contribution growth", schedule.start, repeat(growth, &occurrences));
                    }
                }
            }
        }

        EventKind::Savings(d) => stage.growth_deposit(d, "savings")?,
        EventKind::Groceries(s) => stage.subscription(s, "groceries")?,
        EventKind::LifeInsurance(s) => stage.subscription(s, "life insurance premium")?,

        EventKind::HealthInsurance(ins) | EventKind::HomeInsurance(ins) => {
            stage.subscription(&ins.premiums, "insurance premium")?;
            for claim in &ins.claims {
                let cost = Transfer { day: claim.day, amount: claim.cost, envelope: claim.from_key.clone() };
                stage.outflow(&cost, "claim cost")?;
                let payout = ins.payout(claim.cost);
                if payout > 0.0 {
                    let payout = Transfer { day: claim.day, amount: payout, envelope: claim.to_key.clone() };
                    stage.inflow(&payout, "insurance payout")?;
                }
            }
        }

        EventKind::GovernmentAid(r) => stage.recurring_inflow(r, &r.envelope, "government aid")?,

        EventKind::Taxes(taxes) => {
            stage.outflow(&taxes.payment, "taxes")?;
            for refund in &taxes.refunds {
                stage.inflow(refund, "tax refund")?;
            }
        }

        EventKind::Kid(kid) => {
            stage.outflow(&kid.initial_costs, "child initial costs")?;
            for u in &kid.updates {
                match u {
                    KidUpdate::Childcare(r) => stage.recurring_outflow(r, "childcare")?,
                    KidUpdate::CollegeFund { initial, monthly, to_key } => {
                        stage.outflow(initial, "college fund contribution")?;
                        stage.inflow(&Transfer { envelope: to_key.clone(), ..initial.clone() }, "college fund")?;
                        stage.recurring_outflow(monthly, "college fund contribution")?;
                        stage.recurring_inflow(monthly, to_key, "college fund")?;
                    }
                }
            }
        }

        EventKind::PassAway { day } => {
            // Offset each envelope's balance to 0 from `day` on.
            for id in set.ids() {
                if set.entries(id).is_empty() {
                    continue;
                }
                let balance = Curve::sum(set.snapshot(id));
                stage.post(set.name(id), "estate closure", *day, switch(*day, Curve::zero(), balance.negated()));
            }
        }

        EventKind::Correction { day, actual, envelope } => {
            let prior = set.id(envelope).map(|id| set.snapshot(id)).unwrap_or_default();
            stage.post(envelope, "correction", *day, delta_correction(&prior, *day, *actual));
            if let Some(p) = stage.postings.last_mut() {
                p.correction_at = Some(*day);
            }
        }
    }

    Ok(stage.postings)
}

fn lower_job(stage: &mut Stage<'_>, job: &Job) -> Result<(), EventError> {
    job.salary.check().map_err(stage.kernel("salary"))?;

    let mut theta: ParamFn<kernel::SalaryParams> = params::constant(job.salary.clone());
    for u in &job.updates {
        match u {
            JobUpdate::Raise { day, salary } => {
                theta.amend_at(SalaryPatch { salary: Some(*salary), ..Default::default() }, *day)
            }
            JobUpdate::RetirementRate { day, rate } => {
                theta.amend_at(SalaryPatch { retirement_rate: Some(*rate), ..Default::default() }, *day)
            }
            JobUpdate::Bonus(t) => stage.inflow(t, "bonus")?,
        }
    }

    let schedule = Schedule::new(job.start, job.end, job.salary.interval_days()).map_err(stage.kernel("pay_period"))?;
    let pay = try_repeat_with(&schedule, |ti| kernel::net_paycheck(&theta.at(ti))).map_err(stage.kernel("salary"))?;
    stage.post(&job.to_key, "paycheck", job.start, pay);

    if let Some(key) = &job.retirement_key {
        let deposits = try_repeat_with(&schedule, |ti| kernel::inflow(theta.at(ti).retirement_deposit()))
            .map_err(stage.kernel("401k_contribution"))?;
        stage.post(key, "401k deposit", job.start, deposits);
    }
    Ok(())
}

fn lower_asset(stage: &mut Stage<'_>, a: &AssetPurchase) -> Result<(), EventError> {
    let loan = LoanTerms::new(a.value - a.downpayment, a.loan_rate, a.loan_years).map_err(|source| {
        let parameter = match source {
            KernelError::NonPositiveTerm { .. } => "loan_term_years",
            KernelError::NegativePrincipal { .. } => "downpayment",
            _ => "loan_rate",
        };
        EventError::Kernel { event_id: stage.id.clone(), parameter, source }
    })?;
    let (valuation, growth_key) = match a.kind {
        AssetKind::House => (AssetValuation::appreciating(a.value, a.annual_growth, a.day), "appreciation_rate"),
        AssetKind::Car => (AssetValuation::depreciating(a.value, -a.annual_growth, a.day), "depreciation_rate"),
    };
    let valuation = valuation.map_err(stage.kernel(growth_key))?;
    let mut equity = Equity::new(a.day, params::constant(valuation), loan);

    stage.outflow(&Transfer { day: a.day, amount: a.downpayment, envelope: a.from_key.clone() }, "downpayment")?;

    // (day, sale price, destination)
    let mut sale: Option<(Day, Option<f64>, &str)> = None;
    for u in &a.updates {
        match u {
            AssetUpdate::Appraisal { day, value } => {
                equity.valuation_mut().amend_at(ValuationPatch::Appraisal { value: *value, at: *day }, *day)
            }
            AssetUpdate::GrowthChange { day, annual_growth } => equity
                .valuation_mut()
                .amend_at(ValuationPatch::RateChange { annual_growth: *annual_growth, at: *day }, *day),
            AssetUpdate::Prepayment(t) => {
                equity.add_prepayment(t.day, t.amount).map_err(stage.kernel("amount"))?;
                stage.outflow(t, "loan prepayment")?;
            }
            AssetUpdate::Expense(t) => stage.outflow(t, "repair")?,
            AssetUpdate::LatePayment(t) => stage.outflow(t, "late payment")?,
            AssetUpdate::Sale { day, sale_price, to_key } => {
                if *day < a.day {
                    return Err(EventError::SaleBeforePurchase {
                        event_id: stage.id.clone(),
                        sale_day: *day,
                        purchase_day: a.day,
                    });
                }
                if sale.is_some() {
                    return Err(EventError::InvalidParameter {
                        event_id: stage.id.clone(),
                        parameter: "start_time".into(),
                        reason: "asset is sold more than once".into(),
                    });
                }
                sale = Some((*day, *sale_price, to_key.as_str()));
            }
        }
    }

    let mut payments = Schedule::with_count(a.day + DAYS_PER_MONTH, DAYS_PER_MONTH, equity.payments_due())
        .map_err(stage.kernel("loan_term_years"))?;

    if let Some((day, price, to_key)) = sale {
        // The loan is settled out of the proceeds.
        if let Some(late) = a.updates.iter().find_map(|u| match u {
            AssetUpdate::Prepayment(t) if t.day >= day => Some(t.day),
            _ => None,
        }) {
            return Err(EventError::InvalidParameter {
                event_id: stage.id.clone(),
                parameter: "start_time".into(),
                reason: format!("loan prepayment at day {} is on or after the sale at day {}", late, day),
            });
        }

        // Equity the day before the sale, never earlier than the purchase.
        let before = (day - 1.0).max(a.day);
        let proceeds = match price {
            Some(price) => price - equity.loan_balance(before),
            None => equity.at(before),
        };
        equity.valuation_mut().amend_at(ValuationPatch::Sold, day);
        payments = payments.truncated_before(day);
        stage.inflow(&Transfer { day, amount: proceeds, envelope: to_key.to_string() }, "sale proceeds")?;
    }

    let payment = kernel::outflow(loan.monthly_payment()).map_err(stage.kernel("loan_rate"))?;
    stage.post(&a.from_key, "loan payment", payments.start(), repeat(payment, &payments));
    stage.post(&a.to_key, "equity", a.day, equity.into_curve());
    Ok(())
}
