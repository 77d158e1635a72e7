//! Pure aggregation functions over expense records and family data.
//!
//! Everything here is deterministic and total: degenerate input (empty
//! lists, zero goals, non-finite amounts) yields a defined result, never a
//! panic.

use crate::core::family::FamilyMember;
use crate::core::record::{Category, ExpenseRecord, MonthKey};
use std::collections::HashMap;

/// Aggregated view of one month's spending.
#[derive(Debug, Clone)]
pub struct MonthSummary {
    pub month: MonthKey,
    pub total: f64,
    pub by_category: HashMap<Category, f64>,
}

/// An advisory area where spending could be trimmed, with the estimated
/// monthly impact of doing so.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsArea {
    pub name: &'static str,
    pub percent: u32,
    pub impact: f64,
}

/// A human-readable saving suggestion carrying the same impact estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub label: &'static str,
    pub impact: f64,
}

const SAVINGS_HEURISTICS: [(&str, &str, f64); 3] = [
    ("Transport", "Cut transport spending by 10%", 0.10),
    ("Dining out", "Trim meals out by 15%", 0.15),
    ("Subscriptions", "Review subscriptions for a 5% saving", 0.05),
];

/// Sum of amounts for records in the target month; `0` when none match.
pub fn total_for_month(records: &[ExpenseRecord], month: MonthKey) -> f64 {
    records
        .iter()
        .filter(|r| r.month_key == month)
        .map(|r| r.amount)
        .sum()
}

/// Per-category sums restricted to the target month. Categories with no
/// matching records are omitted, not zero-filled.
pub fn totals_by_category(records: &[ExpenseRecord], month: MonthKey) -> HashMap<Category, f64> {
    let mut totals = HashMap::new();
    for record in records.iter().filter(|r| r.month_key == month) {
        *totals.entry(record.category).or_insert(0.0) += record.amount;
    }
    totals
}

/// The `n` records with the greatest creation time, newest first. Ties keep
/// their input order; fewer than `n` records yields the whole list.
pub fn most_recent(records: &[ExpenseRecord], n: usize) -> Vec<ExpenseRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(n);
    sorted
}

/// Whole-percent of the goal still unspent, floored at zero. A goal of
/// zero or less always yields `0`.
pub fn percent_remaining(goal: f64, spent: f64) -> u32 {
    if !(goal > 0.0) {
        return 0;
    }
    ((goal - spent) / goal * 100.0).round().max(0.0) as u32
}

/// `spent / goal` clamped to `[0, 1]`; non-finite ratios (division by
/// zero) collapse to `0`.
pub fn clamp_ratio(spent: f64, goal: f64) -> f64 {
    let ratio = spent / goal;
    if !ratio.is_finite() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

/// The member with the greatest self-reported spend; ties resolve to the
/// first occurrence.
pub fn top_spender(members: &[FamilyMember]) -> Option<&FamilyMember> {
    members.iter().reduce(|best, candidate| {
        if candidate.self_reported_spend > best.self_reported_spend {
            candidate
        } else {
            best
        }
    })
}

/// Sum of all self-reported spends.
pub fn family_total(members: &[FamilyMember]) -> f64 {
    members.iter().map(|m| m.self_reported_spend).sum()
}

/// Advisory trim areas for the given month total. Impacts are rounded to
/// whole currency units; a negative total counts as zero.
pub fn savings_areas(month_total: f64) -> Vec<SavingsArea> {
    let base = month_total.max(0.0);
    SAVINGS_HEURISTICS
        .iter()
        .map(|&(name, _, pct)| SavingsArea {
            name,
            percent: (pct * 100.0).round() as u32,
            impact: (base * pct).round(),
        })
        .collect()
}

/// Suggestion lines for the given month total, same impact estimates as
/// [`savings_areas`].
pub fn spending_suggestions(month_total: f64) -> Vec<Suggestion> {
    let base = month_total.max(0.0);
    SAVINGS_HEURISTICS
        .iter()
        .map(|&(_, label, pct)| Suggestion {
            label,
            impact: (base * pct).round(),
        })
        .collect()
}

/// Total and per-category breakdown for one month in a single pass.
pub fn month_summary(records: &[ExpenseRecord], month: MonthKey) -> MonthSummary {
    let by_category = totals_by_category(records, month);
    MonthSummary {
        month,
        total: by_category.values().sum(),
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::family::RelationKind;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, amount: f64, category: Category, month: &str) -> ExpenseRecord {
        let month_key: MonthKey = month.parse().unwrap();
        ExpenseRecord {
            id: id.to_string(),
            owner: "user-1".to_string(),
            description: format!("Expense {id}"),
            amount,
            category,
            created_at: Utc
                .with_ymd_and_hms(month_key.year, month_key.month, 10, 12, 0, 0)
                .unwrap(),
            month_key,
        }
    }

    fn member(name: &str, spend: f64) -> FamilyMember {
        FamilyMember {
            id: name.to_lowercase(),
            name: name.to_string(),
            relation: RelationKind::Other("Relative".to_string()),
            self_reported_spend: spend,
        }
    }

    fn mixed_month_records() -> Vec<ExpenseRecord> {
        vec![
            record("a", 50.0, Category::Food, "2024-05"),
            record("b", 30.0, Category::Food, "2024-05"),
            record("c", 20.0, Category::Transport, "2024-04"),
        ]
    }

    #[test]
    fn test_total_for_month_sums_matching_records() {
        let records = mixed_month_records();
        let may: MonthKey = "2024-05".parse().unwrap();
        assert_eq!(total_for_month(&records, may), 80.0);
    }

    #[test]
    fn test_total_for_month_is_zero_without_matches() {
        let records = mixed_month_records();
        let june: MonthKey = "2024-06".parse().unwrap();
        assert_eq!(total_for_month(&records, june), 0.0);
        assert_eq!(total_for_month(&[], june), 0.0);
    }

    #[test]
    fn test_totals_by_category_omits_other_months() {
        let records = mixed_month_records();
        let may: MonthKey = "2024-05".parse().unwrap();
        let totals = totals_by_category(&records, may);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[&Category::Food], 80.0);
        assert!(!totals.contains_key(&Category::Transport));
    }

    #[test]
    fn test_category_totals_sum_to_month_total() {
        let records = vec![
            record("a", 12.5, Category::Food, "2024-05"),
            record("b", 7.5, Category::Transport, "2024-05"),
            record("c", 30.0, Category::Housing, "2024-05"),
            record("d", 99.0, Category::Food, "2024-06"),
        ];
        let may: MonthKey = "2024-05".parse().unwrap();
        let by_category = totals_by_category(&records, may);
        let category_sum: f64 = by_category.values().sum();
        assert_eq!(category_sum, total_for_month(&records, may));
    }

    #[test]
    fn test_most_recent_orders_newest_first() {
        let mut records = mixed_month_records();
        records[0].created_at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        records[1].created_at = Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap();
        records[2].created_at = Utc.with_ymd_and_hms(2024, 4, 30, 0, 0, 0).unwrap();

        let recent = most_recent(&records, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "b");
        assert_eq!(recent[1].id, "a");
    }

    #[test]
    fn test_most_recent_keeps_input_order_on_ties() {
        let at = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let mut first = record("first", 1.0, Category::Food, "2024-05");
        let mut second = record("second", 2.0, Category::Food, "2024-05");
        first.created_at = at;
        second.created_at = at;

        let recent = most_recent(&[first, second], 5);
        assert_eq!(recent[0].id, "first");
        assert_eq!(recent[1].id, "second");
    }

    #[test]
    fn test_most_recent_of_empty_list_is_empty() {
        assert!(most_recent(&[], 5).is_empty());
    }

    #[test]
    fn test_percent_remaining_zero_goal_is_zero() {
        assert_eq!(percent_remaining(0.0, 0.0), 0);
        assert_eq!(percent_remaining(0.0, 500.0), 0);
        assert_eq!(percent_remaining(-100.0, 50.0), 0);
    }

    #[test]
    fn test_percent_remaining_rounds_and_floors() {
        assert_eq!(percent_remaining(1000.0, 250.0), 75);
        assert_eq!(percent_remaining(300.0, 100.0), 67);
        // Overspending floors at zero rather than going negative.
        assert_eq!(percent_remaining(100.0, 150.0), 0);
        // A refund-heavy month can sit above 100.
        assert_eq!(percent_remaining(100.0, -50.0), 150);
    }

    #[test]
    fn test_clamp_ratio_handles_division_by_zero() {
        assert_eq!(clamp_ratio(100.0, 0.0), 0.0);
        assert_eq!(clamp_ratio(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_clamp_ratio_bounds() {
        assert_eq!(clamp_ratio(50.0, 100.0), 0.5);
        assert_eq!(clamp_ratio(150.0, 100.0), 1.0);
        assert_eq!(clamp_ratio(-50.0, 100.0), 0.0);
    }

    #[test]
    fn test_top_spender_prefers_first_on_ties() {
        let members = vec![member("Ana", 120.0), member("Bruno", 120.0)];
        assert_eq!(top_spender(&members).unwrap().name, "Ana");
    }

    #[test]
    fn test_top_spender_of_empty_family_is_none() {
        assert!(top_spender(&[]).is_none());
    }

    #[test]
    fn test_family_total_sums_spends() {
        let members = vec![member("Ana", 120.0), member("Bruno", 80.5)];
        assert_eq!(family_total(&members), 200.5);
        assert_eq!(family_total(&[]), 0.0);
    }

    #[test]
    fn test_suggestion_impacts_round_from_positive_base() {
        let suggestions = spending_suggestions(1234.0);
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].impact, 123.0);
        assert_eq!(suggestions[1].impact, 185.0);
        assert_eq!(suggestions[2].impact, 62.0);
    }

    #[test]
    fn test_suggestions_treat_negative_total_as_zero() {
        for suggestion in spending_suggestions(-500.0) {
            assert_eq!(suggestion.impact, 0.0);
        }
    }

    #[test]
    fn test_savings_areas_match_suggestion_impacts() {
        let areas = savings_areas(1000.0);
        let suggestions = spending_suggestions(1000.0);
        assert_eq!(areas.len(), suggestions.len());
        for (area, suggestion) in areas.iter().zip(&suggestions) {
            assert_eq!(area.impact, suggestion.impact);
        }
        assert_eq!(areas[0].name, "Transport");
        assert_eq!(areas[0].percent, 10);
    }

    #[test]
    fn test_month_summary_combines_total_and_breakdown() {
        let records = mixed_month_records();
        let may: MonthKey = "2024-05".parse().unwrap();
        let summary = month_summary(&records, may);
        assert_eq!(summary.total, 80.0);
        assert_eq!(summary.by_category[&Category::Food], 80.0);
        assert_eq!(summary.month, may);
    }
}
