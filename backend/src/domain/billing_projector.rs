//! Billing projection for the subscription dashboard.
//!
//! Given subscription records and a reference "now", this module derives each
//! subscription's next billing date and the number of days until it, orders
//! the list by urgency, and aggregates per-currency totals. Everything here is
//! pure: no I/O, no shared state, identical inputs give identical outputs.
//!
//! ## Date rules
//!
//! - The next billing date is the last billing date advanced by exactly one
//!   period. There is no catch-up: a subscription whose next date has already
//!   passed gets a negative day count instead of rolling forward again.
//! - Month and year advances clamp to the last valid day of the target month,
//!   so Jan 31 + 1 month is Feb 28 (Feb 29 in leap years) and Feb 29 + 1 year
//!   is Feb 28.
//! - "Now" is evaluated in UTC; billing dates are midnight UTC.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use shared::{BillingFrequency, Currency};
use std::collections::BTreeMap;

use crate::domain::models::subscription::{
    InvalidRecord, ProjectedSubscription, Subscription, SubscriptionRecord,
};

/// A subscription is due soon when at most this many days remain
pub const DUE_SOON_THRESHOLD_DAYS: i64 = 5;

/// Advance a last billing date by one billing period
pub fn project_next_billing_date(last_billing_date: NaiveDate, billing_frequency: BillingFrequency) -> NaiveDate {
    let months = match billing_frequency {
        BillingFrequency::Monthly => Months::new(1),
        BillingFrequency::Yearly => Months::new(12),
    };
    // Saturates at the end of the representable calendar.
    last_billing_date
        .checked_add_months(months)
        .unwrap_or(NaiveDate::MAX)
}

/// Whole days from `now` until midnight UTC of `target_date`, rounded up.
///
/// Positive means the date is in the future; zero or negative means due today
/// or overdue.
pub fn days_until(target_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    // target is at midnight, so (target - now) = whole days - a fraction of a
    // day in [0, 1); its ceiling is the whole-day difference between the dates.
    target_date.signed_duration_since(now.date_naive()).num_days()
}

/// Convert a day count back into a calendar date relative to `now`
pub fn reanchor_by_days(days_remaining: i64, now: DateTime<Utc>) -> NaiveDate {
    now.date_naive() + Duration::days(days_remaining)
}

/// Project a single subscription against `now`
pub fn project_subscription(subscription: &Subscription, now: DateTime<Utc>) -> ProjectedSubscription {
    let next_billing_date =
        project_next_billing_date(subscription.last_billing_date, subscription.billing_frequency);
    let days_remaining = days_until(next_billing_date, now);
    let display_date = reanchor_by_days(days_remaining, now);

    ProjectedSubscription {
        subscription: subscription.clone(),
        next_billing_date,
        days_remaining,
        display_date,
    }
}

/// Project every subscription and order the result by display date, soonest
/// first. Subscriptions with the same date keep their input order.
pub fn project(subscriptions: &[Subscription], now: DateTime<Utc>) -> Vec<ProjectedSubscription> {
    let mut projected: Vec<ProjectedSubscription> = subscriptions
        .iter()
        .map(|subscription| project_subscription(subscription, now))
        .collect();

    // sort_by_key is stable
    projected.sort_by_key(|p| p.display_date);
    projected
}

/// Count and per-currency totals for a set of subscriptions
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionSummary {
    pub count_total: usize,
    pub totals_by_currency: BTreeMap<Currency, f64>,
}

pub fn summarize(subscriptions: &[Subscription]) -> SubscriptionSummary {
    let mut totals_by_currency = BTreeMap::new();
    for subscription in subscriptions {
        *totals_by_currency.entry(subscription.currency).or_insert(0.0) += subscription.billing_amount;
    }

    SubscriptionSummary {
        count_total: subscriptions.len(),
        totals_by_currency,
    }
}

impl ProjectedSubscription {
    pub fn is_due_soon(&self) -> bool {
        self.days_remaining <= DUE_SOON_THRESHOLD_DAYS
    }
}

/// Outcome of projecting raw stored rows: the rows that could be projected
/// plus one `InvalidRecord` per row that could not.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionReport {
    pub accepted: Vec<Subscription>,
    pub projected: Vec<ProjectedSubscription>,
    pub rejected: Vec<InvalidRecord>,
}

impl ProjectionReport {
    /// Whole-batch policy: fail on the first rejected row
    pub fn into_strict(self) -> Result<Vec<ProjectedSubscription>, InvalidRecord> {
        match self.rejected.into_iter().next() {
            Some(invalid) => Err(invalid),
            None => Ok(self.projected),
        }
    }
}

/// Convert raw rows, skip the invalid ones and project the rest
pub fn project_records(records: Vec<SubscriptionRecord>, now: DateTime<Utc>) -> ProjectionReport {
    let mut accepted = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        match Subscription::try_from(record) {
            Ok(subscription) => accepted.push(subscription),
            Err(invalid) => rejected.push(invalid),
        }
    }

    let projected = project(&accepted, now);
    ProjectionReport {
        accepted,
        projected,
        rejected,
    }
}

/// Everything the dashboard view renders
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub subscriptions: Vec<ProjectedSubscription>,
    pub summary: SubscriptionSummary,
    pub rejected: Vec<InvalidRecord>,
}

pub fn build_dashboard(records: Vec<SubscriptionRecord>, now: DateTime<Utc>) -> Dashboard {
    let report = project_records(records, now);
    let summary = summarize(&report.accepted);

    Dashboard {
        as_of: now.date_naive(),
        subscriptions: report.projected,
        summary,
        rejected: report.rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::subscription::InvalidRecordReason;
    use chrono::{Datelike, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at_midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn subscription(id: &str, last: NaiveDate, frequency: BillingFrequency, currency: Currency, amount: f64) -> Subscription {
        Subscription {
            id: id.to_string(),
            service_name: format!("Service {}", id),
            billing_amount: amount,
            currency,
            billing_frequency: frequency,
            last_billing_date: last,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn record(id: &str, last: &str, frequency: &str) -> SubscriptionRecord {
        SubscriptionRecord {
            id: id.to_string(),
            service_name: "Spotify".to_string(),
            billing_amount: "5".to_string(),
            currency: "USD".to_string(),
            billing_frequency: frequency.to_string(),
            last_billing_date: last.to_string(),
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_monthly_advances_month_with_december_rollover() {
        for month in 1..=11 {
            let next = project_next_billing_date(date(2024, month, 15), BillingFrequency::Monthly);
            assert_eq!(next, date(2024, month + 1, 15));
        }
        assert_eq!(
            project_next_billing_date(date(2024, 12, 15), BillingFrequency::Monthly),
            date(2025, 1, 15)
        );
    }

    #[test]
    fn test_monthly_clamps_to_end_of_month() {
        assert_eq!(project_next_billing_date(date(2024, 1, 31), BillingFrequency::Monthly), date(2024, 2, 29));
        assert_eq!(project_next_billing_date(date(2023, 1, 31), BillingFrequency::Monthly), date(2023, 2, 28));
        assert_eq!(project_next_billing_date(date(2024, 3, 31), BillingFrequency::Monthly), date(2024, 4, 30));
    }

    #[test]
    fn test_yearly_changes_only_the_year() {
        let next = project_next_billing_date(date(2024, 7, 9), BillingFrequency::Yearly);
        assert_eq!((next.year(), next.month(), next.day()), (2025, 7, 9));

        let next = project_next_billing_date(date(2023, 12, 31), BillingFrequency::Yearly);
        assert_eq!(next, date(2024, 12, 31));
    }

    #[test]
    fn test_yearly_leap_day_clamps_to_feb_28() {
        assert_eq!(project_next_billing_date(date(2024, 2, 29), BillingFrequency::Yearly), date(2025, 2, 28));
    }

    #[test]
    fn test_days_until_rounds_partial_days_up() {
        let target = date(2024, 2, 15);
        assert_eq!(days_until(target, at_midnight(2024, 2, 12)), 3);
        assert_eq!(days_until(target, Utc.with_ymd_and_hms(2024, 2, 12, 18, 30, 0).unwrap()), 3);
        assert_eq!(days_until(target, Utc.with_ymd_and_hms(2024, 2, 14, 23, 59, 59).unwrap()), 1);
        assert_eq!(days_until(target, at_midnight(2024, 2, 15)), 0);
        assert_eq!(days_until(target, Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap()), 0);
        assert_eq!(days_until(target, at_midnight(2024, 2, 20)), -5);
    }

    #[test]
    fn test_reanchor_inverts_days_until() {
        let now = at_midnight(2024, 2, 12);
        for days in [-40, -1, 0, 1, 3, 365] {
            assert_eq!(days_until(reanchor_by_days(days, now), now), days);
        }

        let afternoon = Utc.with_ymd_and_hms(2024, 2, 12, 15, 0, 0).unwrap();
        assert_eq!(reanchor_by_days(3, afternoon), date(2024, 2, 15));
    }

    #[test]
    fn test_display_date_matches_next_billing_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 45, 0).unwrap();
        let subs = vec![
            subscription("a", date(2024, 2, 10), BillingFrequency::Monthly, Currency::Usd, 1.0),
            subscription("b", date(2023, 1, 31), BillingFrequency::Yearly, Currency::Usd, 1.0),
            subscription("c", date(2024, 1, 1), BillingFrequency::Monthly, Currency::Usd, 1.0),
        ];

        for p in project(&subs, now) {
            assert_eq!(p.display_date, p.next_billing_date);
            assert_eq!(days_until(p.display_date, now), p.days_remaining);
        }
    }

    #[test]
    fn test_single_record_scenario() {
        let subs = vec![subscription("usd-10", date(2024, 1, 15), BillingFrequency::Monthly, Currency::Usd, 10.0)];
        let now = at_midnight(2024, 2, 12);

        let projected = project(&subs, now);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].next_billing_date, date(2024, 2, 15));
        assert_eq!(projected[0].days_remaining, 3);
        assert!(projected[0].is_due_soon());

        let summary = summarize(&subs);
        assert_eq!(summary.count_total, 1);
        assert_eq!(summary.totals_by_currency.len(), 1);
        assert_eq!(summary.totals_by_currency[&Currency::Usd], 10.0);
    }

    #[test]
    fn test_due_soon_threshold_is_inclusive() {
        let now = at_midnight(2024, 2, 1);
        let five = subscription("five", date(2024, 1, 6), BillingFrequency::Monthly, Currency::Usd, 1.0);
        let six = subscription("six", date(2024, 1, 7), BillingFrequency::Monthly, Currency::Usd, 1.0);
        let overdue = subscription("late", date(2023, 12, 31), BillingFrequency::Monthly, Currency::Usd, 1.0);

        assert!(project_subscription(&five, now).is_due_soon());
        assert!(!project_subscription(&six, now).is_due_soon());

        let late = project_subscription(&overdue, now);
        assert_eq!(late.days_remaining, -1);
        assert!(late.is_due_soon());
    }

    #[test]
    fn test_project_orders_by_date_ascending() {
        let now = at_midnight(2024, 6, 1);
        let subs = vec![
            subscription("yearly", date(2023, 12, 1), BillingFrequency::Yearly, Currency::Ngn, 1.0),
            subscription("soon", date(2024, 5, 3), BillingFrequency::Monthly, Currency::Usd, 1.0),
            subscription("overdue", date(2024, 4, 20), BillingFrequency::Monthly, Currency::Usd, 1.0),
            subscription("later", date(2024, 5, 28), BillingFrequency::Monthly, Currency::Ngn, 1.0),
        ];

        let ids: Vec<String> = project(&subs, now).into_iter().map(|p| p.subscription.id).collect();
        assert_eq!(ids, vec!["overdue", "soon", "later", "yearly"]);
    }

    #[test]
    fn test_project_keeps_input_order_for_equal_dates() {
        let now = at_midnight(2024, 2, 1);
        // Both land on 2024-02-29: one by clamping, one directly.
        let first = subscription("first", date(2024, 1, 31), BillingFrequency::Monthly, Currency::Usd, 1.0);
        let second = subscription("second", date(2024, 1, 29), BillingFrequency::Monthly, Currency::Usd, 1.0);
        let early = subscription("early", date(2024, 1, 10), BillingFrequency::Monthly, Currency::Usd, 1.0);

        let forward = project(&[first.clone(), early.clone(), second.clone()], now);
        let ids: Vec<&str> = forward.iter().map(|p| p.subscription.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "first", "second"]);

        let reversed = project(&[second, early, first], now);
        let ids: Vec<&str> = reversed.iter().map(|p| p.subscription.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "second", "first"]);
    }

    #[test]
    fn test_project_is_idempotent_and_does_not_mutate_input() {
        let now = Utc.with_ymd_and_hms(2024, 8, 17, 11, 0, 0).unwrap();
        let subs = vec![
            subscription("a", date(2024, 8, 1), BillingFrequency::Monthly, Currency::Usd, 9.99),
            subscription("b", date(2024, 7, 20), BillingFrequency::Monthly, Currency::Ngn, 2200.0),
        ];
        let before = subs.clone();

        let first = project(&subs, now);
        let second = project(&subs, now);
        assert_eq!(first, second);
        assert_eq!(subs, before);
    }

    #[test]
    fn test_project_empty_input() {
        assert!(project(&[], at_midnight(2024, 1, 1)).is_empty());
        let summary = summarize(&[]);
        assert_eq!(summary.count_total, 0);
        assert!(summary.totals_by_currency.is_empty());
    }

    #[test]
    fn test_summarize_groups_by_currency_without_zero_entries() {
        let subs = vec![
            subscription("a", date(2024, 1, 1), BillingFrequency::Monthly, Currency::Ngn, 2200.0),
            subscription("b", date(2024, 1, 1), BillingFrequency::Yearly, Currency::Ngn, 5200.0),
            subscription("c", date(2024, 1, 1), BillingFrequency::Monthly, Currency::Ngn, 0.0),
        ];

        let summary = summarize(&subs);
        assert_eq!(summary.count_total, 3);
        assert_eq!(summary.totals_by_currency.get(&Currency::Ngn), Some(&7400.0));
        assert!(!summary.totals_by_currency.contains_key(&Currency::Usd));
    }

    #[test]
    fn test_project_records_skips_and_reports_invalid_rows() {
        let now = at_midnight(2024, 2, 12);
        let records = vec![
            record("good-1", "2024-01-20", "Monthly"),
            record("bad-date", "not-a-date", "Monthly"),
            record("bad-frequency", "2024-01-15", "Weekly"),
            record("good-2", "2024-01-15", "monthly"),
        ];

        let report = project_records(records, now);

        let ids: Vec<&str> = report.projected.iter().map(|p| p.subscription.id.as_str()).collect();
        assert_eq!(ids, vec!["good-2", "good-1"]);
        assert_eq!(report.accepted.len(), 2);

        let rejected: Vec<&str> = report.rejected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(rejected, vec!["bad-date", "bad-frequency"]);
        assert_eq!(
            report.rejected[1].reason,
            InvalidRecordReason::UnknownFrequency("Weekly".to_string())
        );
    }

    #[test]
    fn test_strict_policy_fails_on_first_invalid_row() {
        let now = at_midnight(2024, 2, 12);

        let clean = project_records(vec![record("ok", "2024-01-15", "Monthly")], now);
        assert_eq!(clean.into_strict().unwrap().len(), 1);

        let dirty = project_records(
            vec![
                record("ok", "2024-01-15", "Monthly"),
                record("broken", "2024-13-40", "Monthly"),
            ],
            now,
        );
        assert_eq!(dirty.into_strict().unwrap_err().id, "broken");
    }

    #[test]
    fn test_build_dashboard_summarizes_only_accepted_rows() {
        let now = at_midnight(2024, 2, 12);
        let dashboard = build_dashboard(
            vec![
                record("ok", "2024-01-15", "Monthly"),
                record("broken", "yesterday", "Monthly"),
            ],
            now,
        );

        assert_eq!(dashboard.as_of, date(2024, 2, 12));
        assert_eq!(dashboard.subscriptions.len(), 1);
        assert_eq!(dashboard.summary.count_total, 1);
        assert_eq!(dashboard.summary.totals_by_currency[&Currency::Usd], 5.0);
        assert_eq!(dashboard.rejected.len(), 1);
    }
}
