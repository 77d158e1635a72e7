use super::ui;
use crate::SnapshotCommand;
use crate::core::analytics;
use crate::core::family::SavedSnapshot;
use crate::core::record::MonthKey;
use crate::store::ExpenseStore;
use crate::store::family::FamilyStore;
use crate::store::profiles::UserProfile;
use anyhow::Result;
use comfy_table::Cell;

pub fn run(
    family: &FamilyStore,
    expenses: &ExpenseStore,
    profile: Option<&UserProfile>,
    command: SnapshotCommand,
    currency: &str,
) -> Result<()> {
    match command {
        SnapshotCommand::Save => {
            let snapshot = expenses.snapshot();
            let month_total =
                analytics::total_for_month(&snapshot.records, MonthKey::current());
            let monthly_goal = profile.map_or(0.0, |p| p.monthly_goal);

            let saved = family.save_snapshot(month_total, monthly_goal)?;
            println!(
                "Saved snapshot {}: {} this month, {} member(s).",
                saved.id,
                ui::format_amount(saved.month_total, currency),
                saved.family.len()
            );
        }
        SnapshotCommand::List => {
            let snapshots = family.snapshots()?;
            if snapshots.is_empty() {
                println!("No snapshots saved yet. Try: famfin snapshot save");
                return Ok(());
            }
            println!("{}", snapshots_table(&snapshots, currency));
        }
    }
    Ok(())
}

fn snapshots_table(snapshots: &[SavedSnapshot], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Saved at"),
        ui::header_cell(&format!("Month total ({currency})")),
        ui::header_cell(&format!("Goal ({currency})")),
        ui::header_cell("Members"),
    ]);

    for snapshot in snapshots {
        table.add_row(vec![
            Cell::new(snapshot.saved_at.format("%Y-%m-%d %H:%M").to_string()),
            ui::amount_cell(snapshot.month_total),
            ui::amount_cell(snapshot.monthly_goal),
            Cell::new(snapshot.family.len().to_string()),
        ]);
    }

    table.to_string()
}
