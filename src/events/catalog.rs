//! catalog.rs
//! Built-in event types with their parameter lists.
//!
//! This is the single source for both the compiler's dispatch and the
//! built-in validation schema.

#[derive(Debug, Clone, Copy)]
pub struct UpdateSpec {
    pub update_type: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct EventSpec {
    pub event_type: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub updates: &'static [UpdateSpec],
}

/// Updating events may name their own routing envelopes; when absent they
/// inherit the parent's.
pub const ROUTING_KEYS: &[&str] = &["from_key", "to_key"];

const fn update(
    update_type: &'static str,
    required: &'static [&'static str],
) -> UpdateSpec {
    UpdateSpec { update_type, required, optional: ROUTING_KEYS }
}

const fn update_opt(
    update_type: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
) -> UpdateSpec {
    UpdateSpec { update_type, required, optional }
}

const fn event(
    event_type: &'static str,
    required: &'static [&'static str],
    updates: &'static [UpdateSpec],
) -> EventSpec {
    EventSpec { event_type, required, optional: &[], updates }
}

pub const CATALOG: &[EventSpec] = &[
    event("gift", &["start_time", "money", "to_key"], &[]),
    event("purchase", &["start_time", "money", "from_key"], &[]),
    EventSpec {
        event_type: "get_job",
        required: &[
            "start_time", "end_time", "salary", "pay_period", "federal_income_tax", "state_income_tax",
            "social_security_tax", "medicare_tax", "401k_contribution", "to_key",
        ],
        optional: &["retirement_key"],
        updates: &[
            update("get_a_raise", &["start_time", "salary"]),
            update("change_401k_contribution", &["start_time", "401k_contribution"]),
            update("get_a_bonus", &["start_time", "bonus"]),
        ],
    },
    event("start_business", &["start_time", "initial_investment", "from_key"], &[
        update("business_income", &["start_time", "end_time", "monthly_income"]),
        update("business_loss", &["start_time", "loss_amount"]),
    ]),
    event("retirement", &["start_time", "end_time", "frequency_days", "amount", "from_key", "to_key"], &[]),
    event("buy_house", &[
        "start_time", "home_value", "downpayment", "loan_rate", "loan_term_years", "appreciation_rate",
        "from_key", "to_key",
    ], &[
        update("new_appraisal", &["start_time", "appraised_value"]),
        update("extra_mortgage_payment", &["start_time", "amount"]),
        update("late_payment", &["start_time", "amount"]),
        update_opt("sell_house", &["start_time", "to_key"], &["from_key", "sale_price"]),
    ]),
    EventSpec {
        event_type: "buy_car",
        required: &["start_time", "car_value", "downpayment", "loan_rate", "loan_term_years", "from_key", "to_key"],
        optional: &["depreciation_rate"],
        updates: &[
            update("pay_loan_early", &["start_time", "amount"]),
            update("car_repair", &["start_time", "cost"]),
            update("adjust_depreciation", &["start_time", "depreciation_rate"]),
            update_opt("sell_car", &["start_time", "to_key"], &["from_key", "sale_price"]),
        ],
    },
    event("invest_money", &["start_time", "amount", "expected_return", "from_key", "to_key"], &[
        update("dividend_payout", &["start_time", "amount"]),
        update("recurring_contribution", &["start_time", "end_time", "amount"]),
    ]),
    event("high_yield_savings_account", &["start_time", "amount", "interest_rate", "from_key", "to_key"], &[]),
    event("buy_groceries", &["start_time", "end_days", "monthly_amount", "from_key"], &[
        update("update_amount", &["start_time", "new_amount"]),
    ]),
    event("buy_health_insurance", &[
        "start_time", "end_time", "monthly_premium", "deductible", "coverage_percentage", "from_key",
    ], &[
        update("medical_expense", &["start_time", "total_cost"]),
    ]),
    event("buy_life_insurance", &["start_time", "term_years", "monthly_premium", "from_key"], &[
        update("increase_coverage", &["start_time", "new_monthly_premium"]),
    ]),
    event("buy_home_insurance", &[
        "start_time", "end_time", "monthly_premium", "deductible", "coverage_percentage", "from_key",
    ], &[
        update("tornado_damage", &["start_time", "damage_cost"]),
        update("house_fire", &["start_time", "damage_cost"]),
        update("flood_damage", &["start_time", "damage_cost"]),
    ]),
    event("receive_government_aid", &["start_time", "end_days", "frequency_days", "amount", "to_key"], &[]),
    event("pay_taxes", &["start_time", "total_tax_due", "from_key"], &[
        update("receive_tax_refund", &["start_time", "amount"]),
    ]),
    event("have_kid", &["start_time", "initial_costs", "from_key"], &[
        update("childcare_costs", &["start_time", "end_days", "monthly_cost"]),
        update_opt(
            "college_fund",
            &["start_time", "end_days", "initial_contribution", "monthly_contribution", "to_key"],
            &["from_key"],
        ),
    ]),
    event("marriage", &["start_time", "cost", "from_key"], &[]),
    event("divorce", &["start_time", "settlement_amount", "attorney_fees", "from_key"], &[]),
    event("pass_away", &["start_time"], &[]),
    event("manual_correction", &["start_time", "amount", "to_key"], &[]),
];

pub fn lookup(event_type: &str) -> Option<&'static EventSpec> {
    CATALOG.iter().find(|s| s.event_type == event_type)
}

impl EventSpec {
    pub fn update(&self, update_type: &str) -> Option<&'static UpdateSpec> {
        self.updates.iter().find(|u| u.update_type == update_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_types_are_unique() {
        let mut seen = HashSet::new();
        for spec in CATALOG {
            assert!(seen.insert(spec.event_type), "duplicate {}", spec.event_type);
            let mut updates = HashSet::new();
            for u in spec.updates {
                assert!(updates.insert(u.update_type), "duplicate {}", u.update_type);
            }
        }
    }

    #[test]
    fn test_every_type_is_dated() {
        for spec in CATALOG {
            assert!(spec.required.contains(&"start_time"), "{}", spec.event_type);
            for u in spec.updates {
                assert!(u.required.contains(&"start_time"), "{}", u.update_type);
            }
        }
    }

    #[test]
    fn test_lookup() {
        let job = lookup("get_job").unwrap();
        assert!(job.update("get_a_raise").is_some());
        assert!(job.update("sell_house").is_none());
        assert!(lookup("buy_spaceship").is_none());
    }
}
