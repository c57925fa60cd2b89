//! Transaction display formatting
//!
//! Amounts are shown to the cent here, unlike the whole-unit budget cards.

use std::collections::HashMap;

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{Category, CategoryId, Transaction};
use crate::services::{CategoryTotal, TransactionPage, TransactionStats};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "ID")]
    id: String,
}

fn signed(txn: &Transaction) -> String {
    if txn.is_income() {
        format!("+{}", txn.amount)
    } else {
        format!("-{}", txn.amount)
    }
}

fn category_name(categories: &HashMap<CategoryId, Category>, id: CategoryId) -> String {
    categories
        .get(&id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Format one page of transactions as a table
pub fn format_transaction_list(
    page: &TransactionPage,
    categories: &HashMap<CategoryId, Category>,
    offset: usize,
) -> String {
    if page.items.is_empty() {
        return if page.total == 0 {
            "No transactions found.\n\nRecord one with 'budget transaction add'.".to_string()
        } else {
            format!("No transactions on this page ({} in total).", page.total)
        };
    }

    let rows = page.items.iter().map(|t| TransactionRow {
        date: t.date.to_string(),
        category: category_name(categories, t.category_id),
        amount: signed(t),
        description: t.description.clone(),
        id: t.id.to_string(),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .modify(Columns::single(2), Alignment::right());

    let first = offset + 1;
    let last = offset + page.items.len();
    format!("{}\nShowing {}-{} of {}", table, first, last, page.total)
}

/// Format a single transaction
pub fn format_transaction_details(txn: &Transaction, category: Option<&Category>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("  Date:      {}\n", txn.date));
    output.push_str(&format!("  Amount:    {}\n", signed(txn)));
    output.push_str(&format!(
        "  Category:  {} ({})\n",
        category.map_or_else(|| txn.category_id.to_string(), |c| c.name.clone()),
        txn.kind
    ));
    if !txn.description.is_empty() {
        output.push_str(&format!("  Notes:     {}\n", txn.description));
    }
    output.push_str(&format!(
        "  Recorded:  {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

fn push_breakdown(output: &mut String, title: &str, rows: &[CategoryTotal]) {
    output.push_str(&format!("\n{}\n", title));
    if rows.is_empty() {
        output.push_str("  (none)\n");
        return;
    }

    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);
    for row in rows {
        output.push_str(&format!(
            "  {:<width$}  {:>12}  {:>4}  {:>6.2}%\n",
            row.name,
            row.amount.to_string(),
            row.count,
            row.percentage,
            width = name_width
        ));
    }
}

/// Format income and expense statistics
pub fn format_transaction_stats(stats: &TransactionStats) -> String {
    let mut output = String::new();

    let period = match (stats.start_date, stats.end_date) {
        (Some(start), Some(end)) => format!("{} to {}", start, end),
        (Some(start), None) => format!("from {}", start),
        (None, Some(end)) => format!("up to {}", end),
        (None, None) => "all time".to_string(),
    };
    output.push_str(&format!("Transaction Report: {}\n", period));
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!("  Income:        {}\n", stats.total_income));
    output.push_str(&format!("  Expense:       {}\n", stats.total_expense));
    output.push_str(&format!("  Balance:       {}\n", stats.balance));
    output.push_str(&format!("  Transactions:  {}\n", stats.transaction_count));

    push_breakdown(&mut output, "Income by category", &stats.income_breakdown);
    push_breakdown(&mut output, "Expense by category", &stats.expense_breakdown);

    output
}
