use super::ui;
use crate::core::analytics::{self, SavingsArea, Suggestion};
use crate::core::record::MonthKey;
use crate::store::ExpenseStore;
use anyhow::Result;
use comfy_table::Cell;

/// Shows where this month's spending could be trimmed and by how much.
pub fn run(expenses: &ExpenseStore, currency: &str) -> Result<()> {
    let snapshot = expenses.snapshot();
    let month = MonthKey::current();
    let total = analytics::total_for_month(&snapshot.records, month);

    println!(
        "Based on {} spending of {}",
        month,
        ui::style_text(&ui::format_amount(total, currency), ui::StyleType::TotalValue)
    );
    if total <= 0.0 {
        println!(
            "{}",
            ui::style_text(
                "Nothing recorded this month; impacts below are zero.",
                ui::StyleType::Subtle
            )
        );
    }

    let areas = analytics::savings_areas(total);
    let suggestions = analytics::spending_suggestions(total);
    println!("{}", suggestions_table(&areas, &suggestions, currency));
    Ok(())
}

fn suggestions_table(areas: &[SavingsArea], suggestions: &[Suggestion], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Area"),
        ui::header_cell("Cut"),
        ui::header_cell("Suggestion"),
        ui::header_cell(&format!("Impact ({currency})")),
    ]);

    for (area, suggestion) in areas.iter().zip(suggestions) {
        table.add_row(vec![
            Cell::new(area.name),
            Cell::new(format!("{}%", area.percent)),
            Cell::new(suggestion.label),
            ui::amount_cell(area.impact),
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::documents::{DocumentStore, ExpensePaths};
    use crate::providers::memory::MemoryDocumentStore;
    use std::sync::Arc;

    #[test]
    fn test_suggestions_table_pairs_areas_with_labels() {
        let areas = analytics::savings_areas(1000.0);
        let suggestions = analytics::spending_suggestions(1000.0);
        let rendered = suggestions_table(&areas, &suggestions, "USD");

        assert!(rendered.contains("Transport"));
        assert!(rendered.contains("10%"));
        assert!(rendered.contains("Cut transport spending by 10%"));
        assert!(rendered.contains("100.00"));
        assert!(rendered.contains("Dining out"));
        assert!(rendered.contains("150.00"));
        assert!(rendered.contains("Subscriptions"));
        assert!(rendered.contains("50.00"));
    }

    #[tokio::test]
    async fn test_run_on_an_empty_store() {
        let documents = Arc::new(MemoryDocumentStore::new()) as Arc<dyn DocumentStore>;
        let store = ExpenseStore::new(documents, ExpensePaths::new("test-app"));
        run(&store, "USD").unwrap();
    }
}
