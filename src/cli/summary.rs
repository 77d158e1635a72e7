use super::ui;
use crate::core::analytics::{self, MonthSummary};
use crate::core::family::FamilyMember;
use crate::core::record::{Category, MonthKey};
use crate::store::ExpenseStore;
use crate::store::family::FamilyStore;
use crate::store::profiles::UserProfile;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

const PROGRESS_WIDTH: usize = 30;

/// Displays the month dashboard: goal standing, category breakdown,
/// family spending and the newest records.
pub fn run(
    expenses: &ExpenseStore,
    family: &FamilyStore,
    profile: Option<&UserProfile>,
    month: Option<MonthKey>,
    currency: &str,
) -> Result<()> {
    let snapshot = expenses.snapshot();
    if !snapshot.live {
        println!(
            "{}",
            ui::style_text("Sync pending; totals may lag behind.", ui::StyleType::Subtle)
        );
    }

    let month = month.unwrap_or_else(MonthKey::current);
    let summary = analytics::month_summary(&snapshot.records, month);
    let monthly_goal = profile.map_or(0.0, |p| p.monthly_goal);

    println!("{}", goal_card(&summary, monthly_goal, currency));

    if !summary.by_category.is_empty() {
        println!("{}", category_table(&summary, currency));
    }

    let members = family.members()?;
    if !members.is_empty() {
        ui::print_separator();
        println!("{}", family_section(&members, currency));
    }

    let recent = analytics::most_recent(&snapshot.records, 5);
    if !recent.is_empty() {
        ui::print_separator();
        println!("{}", ui::style_text("Recent expenses", ui::StyleType::Title));
        println!("{}", super::expenses::recent_table(&recent, currency));
    }

    if profile.is_none() {
        println!(
            "{}",
            ui::style_text(
                "Not signed in. Expenses need an account: famfin register <username> ...",
                ui::StyleType::Subtle
            )
        );
    }

    Ok(())
}

fn goal_card(summary: &MonthSummary, monthly_goal: f64, currency: &str) -> String {
    let mut out = format!(
        "Month {}\n",
        ui::style_text(&summary.month.to_string(), ui::StyleType::Title)
    );
    out.push_str(&format!(
        "Spent: {}",
        ui::style_text(
            &ui::format_amount(summary.total, currency),
            ui::StyleType::TotalValue
        )
    ));

    if monthly_goal > 0.0 {
        let remaining = analytics::percent_remaining(monthly_goal, summary.total);
        let ratio = analytics::clamp_ratio(summary.total, monthly_goal);
        out.push_str(&format!(
            " of {} ({remaining}% left)\n",
            ui::format_amount(monthly_goal, currency)
        ));
        out.push_str(&progress_bar(ratio));
    } else {
        out.push('\n');
        out.push_str(&ui::style_text(
            "No monthly goal set. Try: famfin goal --monthly 1500",
            ui::StyleType::Subtle,
        ));
    }
    out
}

// `ratio` is already clamped to [0, 1] by the caller.
fn progress_bar(ratio: f64) -> String {
    let filled = (ratio * PROGRESS_WIDTH as f64).round() as usize;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(PROGRESS_WIDTH - filled))
}

fn category_table(summary: &MonthSummary, currency: &str) -> String {
    let mut rows: Vec<(Category, f64)> = summary
        .by_category
        .iter()
        .map(|(category, spent)| (*category, *spent))
        .collect();
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell(&format!("Spent ({currency})")),
        ui::header_cell("Share"),
    ]);

    for (category, spent) in rows {
        let share = if summary.total > 0.0 {
            spent / summary.total * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            ui::category_cell(category),
            ui::amount_cell(spent),
            Cell::new(format!("{share:.0}%")).set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

fn family_section(members: &[FamilyMember], currency: &str) -> String {
    let total = analytics::family_total(members);
    let mut out = format!("{}\n", ui::style_text("Family", ui::StyleType::Title));
    out.push_str(&format!(
        "Reported spend: {}",
        ui::format_amount(total, currency)
    ));
    if let Some(top) = analytics::top_spender(members) {
        out.push_str(&format!(
            "\nTop spender: {} ({})",
            top.name,
            ui::format_amount(top.self_reported_spend, currency)
        ));
    }
    out
}
