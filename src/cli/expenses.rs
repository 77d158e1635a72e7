use super::ui;
use crate::core::analytics;
use crate::core::record::{Category, ExpenseRecord, NewExpense};
use crate::store::ExpenseStore;
use anyhow::Result;
use comfy_table::Cell;

/// Records an expense. An omitted description makes this a quick entry
/// with the stock description and the fallback category.
pub async fn add(
    store: &ExpenseStore,
    amount: f64,
    description: Option<String>,
    category: Option<Category>,
) -> Result<()> {
    let mut draft = match description {
        Some(description) => NewExpense::new(description, amount, Category::default()),
        None => NewExpense::quick(amount),
    };
    if let Some(category) = category {
        draft.category = category;
    }

    let category = draft.category;
    let id = store.add(draft).await?;
    println!(
        "Recorded {} under {category} ({id}).",
        ui::style_text(&format!("{amount:.2}"), ui::StyleType::TotalValue)
    );
    Ok(())
}

pub async fn remove(store: &ExpenseStore, id: &str) -> Result<()> {
    store.delete(id).await?;
    println!("Removal of {id} accepted; the list updates on the next sync.");
    Ok(())
}

/// Shows the `limit` newest expenses.
pub fn recent(store: &ExpenseStore, limit: usize, currency: &str) -> Result<()> {
    let snapshot = store.snapshot();
    if !snapshot.live {
        println!(
            "{}",
            ui::style_text("Sync pending; showing the last known list.", ui::StyleType::Subtle)
        );
    }

    let records = analytics::most_recent(&snapshot.records, limit);
    if records.is_empty() {
        println!("No expenses recorded yet. Try: famfin add 12.50 -d \"Groceries\" -c food");
        return Ok(());
    }
    println!("{}", recent_table(&records, currency));
    Ok(())
}

pub(crate) fn recent_table(records: &[ExpenseRecord], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Description"),
        ui::header_cell("Category"),
        ui::header_cell(&format!("Amount ({currency})")),
        ui::header_cell("Id"),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.created_at.format("%Y-%m-%d").to_string()),
            Cell::new(&record.description),
            ui::category_cell(record.category),
            ui::amount_cell(record.amount),
            Cell::new(&record.id),
        ]);
    }

    table.to_string()
}
