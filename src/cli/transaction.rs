//! Transaction CLI commands

use std::collections::HashMap;

use chrono::Local;
use clap::{Subcommand, ValueEnum};

use crate::display::transaction::{format_transaction_details, format_transaction_list};
use crate::error::PlannerResult;
use crate::services::{
    CategoryService, CreateTransactionInput, TransactionFilter, TransactionService,
    TransactionSort, TransactionUpdate,
};
use crate::storage::Storage;

use super::budget::parse_date;
use super::category::KindArg;
use super::savings::parse_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Date,
    Amount,
}

impl From<SortArg> for TransactionSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Date => TransactionSort::Date,
            SortArg::Amount => TransactionSort::Amount,
        }
    }
}

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record an income or expense
    Add {
        /// Category name or ID; its kind decides income or expense
        category: String,
        /// Positive amount (e.g., "12.50")
        amount: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only one category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
        /// Only income or only expense
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
        /// Field to sort by
        #[arg(short, long, value_enum, default_value = "date")]
        sort: SortArg,
        /// Oldest or smallest first
        #[arg(long)]
        asc: bool,
        /// Rows per page
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Rows to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Show one transaction
    Show {
        /// Transaction ID, full or as listed
        id: String,
    },

    /// Change fields of a transaction
    Edit {
        /// Transaction ID, full or as listed
        id: String,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        /// Move to another category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID, full or as listed
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    cmd: TransactionCommands,
) -> PlannerResult<()> {
    let service = TransactionService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        TransactionCommands::Add {
            category,
            amount,
            date,
            description,
        } => {
            let category = categories.require(&category)?;
            let date = match date {
                Some(s) => parse_date(&s)?,
                None => Local::now().date_naive(),
            };
            let txn = service.create(CreateTransactionInput {
                date,
                amount: parse_amount("amount", &amount)?,
                category_id: category.id,
                description,
            })?;
            println!("Recorded {} of {} in {}", txn.kind, txn.amount, category.name);
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            from,
            to,
            category,
            kind,
            sort,
            asc,
            limit,
            offset,
        } => {
            let mut filter = TransactionFilter::new()
                .date_range(
                    from.as_deref().map(parse_date).transpose()?,
                    to.as_deref().map(parse_date).transpose()?,
                )
                .sort_by(sort.into(), asc)
                .page(limit, offset);
            if let Some(category) = category {
                filter = filter.category(categories.require(&category)?.id);
            }
            if let Some(kind) = kind {
                filter = filter.kind(kind.into());
            }

            let page = service.list(&filter)?;
            let names: HashMap<_, _> = categories
                .list()?
                .into_iter()
                .map(|c| (c.id, c))
                .collect();
            println!("{}", format_transaction_list(&page, &names, offset));
        }

        TransactionCommands::Show { id } => {
            let txn = service.require(&id)?;
            let category = categories.get(txn.category_id)?;
            print!("{}", format_transaction_details(&txn, category.as_ref()));
        }

        TransactionCommands::Edit {
            id,
            amount,
            date,
            category,
            description,
        } => {
            let txn = service.require(&id)?;
            let update = TransactionUpdate {
                date: date.as_deref().map(parse_date).transpose()?,
                amount: amount
                    .as_deref()
                    .map(|a| parse_amount("amount", a))
                    .transpose()?,
                category_id: match category {
                    Some(c) => Some(categories.require(&c)?.id),
                    None => None,
                },
                description,
            };
            let updated = service.update(txn.id, update)?;
            println!("Updated transaction {}", updated.id);
        }

        TransactionCommands::Delete { id } => {
            let txn = service.require(&id)?;
            let deleted = service.delete(txn.id)?;
            println!("Deleted transaction {} ({})", deleted.id, deleted);
        }
    }

    Ok(())
}
