//! Category display formatting

use crate::models::{Category, CategoryKind};

/// Format categories split into income and expense sections
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'budget init' to create default categories."
            .to_string();
    }

    let name_width = categories
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    for (title, kind) in [
        ("Income", CategoryKind::Income),
        ("Expenses", CategoryKind::Expense),
    ] {
        let section: Vec<_> = categories.iter().filter(|c| c.kind == kind).collect();
        if section.is_empty() {
            continue;
        }

        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&format!("{}\n", title));

        for (i, category) in section.iter().enumerate() {
            let prefix = if i == section.len() - 1 { "└── " } else { "├── " };
            let color = category.color.as_deref().unwrap_or("");
            output.push_str(&format!(
                "  {}{:<width$}  {:<7}  {}\n",
                prefix,
                category.name,
                color,
                category.id,
                width = name_width
            ));
        }
    }

    output
}

/// Format category details
pub fn format_category_details(category: &Category) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:       {}\n", category.id));
    output.push_str(&format!("  Kind:     {}\n", category.kind));
    if let Some(color) = &category.color {
        output.push_str(&format!("  Color:    {}\n", color));
    }
    output.push_str(&format!(
        "  Created:  {}\n",
        category.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
