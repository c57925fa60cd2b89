//! Category CLI commands

use clap::{Subcommand, ValueEnum};

use crate::display::category::{format_category_details, format_category_list};
use crate::error::PlannerResult;
use crate::models::CategoryKind;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category kind as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for CategoryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => CategoryKind::Income,
            KindArg::Expense => CategoryKind::Expense,
        }
    }
}

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only show one kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Income or expense
        #[arg(short, long, value_enum, default_value = "expense")]
        kind: KindArg,
        /// Display color (#rrggbb)
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Delete a category no budget or transaction uses
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> PlannerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind } => {
            let categories = match kind {
                Some(kind) => service.list_by_kind(kind.into())?,
                None => service.list()?,
            };
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Create { name, kind, color } => {
            let category = service.create(&name, kind.into(), color.as_deref())?;
            println!("Created {} category: {}", category.kind, category.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let category = service.require(&category)?;
            print!("{}", format_category_details(&category));
        }

        CategoryCommands::Delete { category } => {
            let category = service.require(&category)?;
            let deleted = service.delete(category.id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
