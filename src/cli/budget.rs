//! Budget CLI commands
//!
//! Every command that changes allocations goes through the same path as the
//! interactive editor: open a [`BudgetForm`], drive an
//! [`AllocationCalculator`] against it, apply the reported changes, save.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Subcommand, ValueEnum};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::allocation::{AllocationCalculator, AllocationChange};
use crate::config::settings::Settings;
use crate::display::budget::{format_budget_details, format_budget_list, format_calculator};
use crate::error::{PlannerError, PlannerResult};
use crate::export::{export_budget, ExportFormat};
use crate::form::{BudgetForm, FormStep};
use crate::models::{Budget, CategoryId, CategoryKind, Money};
use crate::services::{BudgetService, CategoryService};
use crate::storage::Storage;

/// Export format as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
    Yaml,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Yaml => ExportFormat::Yaml,
        }
    }
}

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// List budgets
    List {
        /// Only budgets whose period includes today
        #[arg(long)]
        active: bool,
    },

    /// Show a budget with its allocation summary
    Show {
        /// Budget name or ID
        budget: String,
    },

    /// Create a new budget
    Create {
        /// Budget name
        name: String,
        /// Total amount to allocate (e.g., "50000")
        #[arg(short, long)]
        total: String,
        /// Start date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD), defaults to the configured period length
        #[arg(long)]
        end: Option<String>,
        /// Income category funding the budget (repeatable)
        #[arg(short, long = "income", required = true)]
        incomes: Vec<String>,
        /// Expense category to allocate to (repeatable)
        #[arg(short, long = "expense", required = true)]
        expenses: Vec<String>,
        /// Free-form notes
        #[arg(short, long)]
        description: Option<String>,
        /// Split the total evenly across the expenses before saving
        #[arg(long)]
        auto: bool,
    },

    /// Delete a budget
    Delete {
        /// Budget name or ID
        budget: String,
    },

    /// Set a category's allocation to an exact amount
    Set {
        /// Budget name or ID
        budget: String,
        /// Expense category name or ID
        category: String,
        /// Amount (e.g., "5000" or "5000.50")
        amount: String,
    },

    /// Step a category's allocation up or down by the configured increment
    Adjust {
        /// Budget name or ID
        budget: String,
        /// Expense category name or ID
        category: String,
        /// Step down instead of up
        #[arg(long)]
        down: bool,
        /// Number of steps
        #[arg(short = 'n', long, default_value = "1")]
        times: u32,
    },

    /// Set a category's allocation as a percentage of the total
    Percent {
        /// Budget name or ID
        budget: String,
        /// Expense category name or ID
        category: String,
        /// Percentage between 0 and 100
        percentage: f64,
    },

    /// Split the total evenly across all expense categories
    Auto {
        /// Budget name or ID
        budget: String,
    },

    /// Replace the budget's expense categories
    Select {
        /// Budget name or ID
        budget: String,
        /// Expense categories to keep or add
        #[arg(required = true)]
        categories: Vec<String>,
    },

    /// Export a budget's allocation breakdown
    Export {
        /// Budget name or ID
        budget: String,
        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: FormatArg,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Edit allocations interactively
    Edit {
        /// Budget name or ID
        budget: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    runtime: &Handle,
    cmd: BudgetCommands,
) -> PlannerResult<()> {
    let service = BudgetService::new(storage);
    let currency = settings.currency_format();

    match cmd {
        BudgetCommands::List { active } => {
            let budgets = if active {
                service.active_on(Local::now().date_naive())?
            } else {
                service.list()?
            };
            println!("{}", format_budget_list(&budgets, &currency));
        }

        BudgetCommands::Show { budget } => {
            let budget = service.require(&budget)?;
            let summary = service.summary(&budget)?;
            print!("{}", format_budget_details(&summary, &currency));
        }

        BudgetCommands::Create {
            name,
            total,
            start,
            end,
            incomes,
            expenses,
            description,
            auto,
        } => {
            let categories = CategoryService::new(storage);
            let start = match start {
                Some(s) => parse_date(&s)?,
                None => Local::now().date_naive(),
            };

            let mut form = BudgetForm::for_period(start, settings.default_period_days);
            if let Some(end) = end {
                form.end_date = Some(parse_date(&end)?);
            }
            form.name = name;
            form.description = description.unwrap_or_default();
            form.total_amount = total;
            form.income_categories = categories
                .resolve_all(&incomes, CategoryKind::Income)?
                .into_iter()
                .map(|c| c.id)
                .collect();

            walk_to_allocation(&mut form)?;
            form.select_expense_categories(categories.resolve_all(&expenses, CategoryKind::Expense)?);
            walk_to_allocation(&mut form)?;

            let mut session = EditSession::new(form, settings, runtime);
            if auto {
                session.auto_allocate(runtime)?;
            }

            let budget = session.save(&service)?;
            println!("Created budget: {}", budget.name);
            println!("  ID: {}", budget.id);
            print_calculator(&service, &budget, settings)?;
        }

        BudgetCommands::Delete { budget } => {
            let budget = service.require(&budget)?;
            let deleted = service.delete(budget.id)?;
            println!("Deleted budget: {}", deleted.name);
        }

        BudgetCommands::Set {
            budget,
            category,
            amount,
        } => {
            let mut session = EditSession::open(&service, &budget, settings, runtime)?;
            let category_id = session.selected_category(&category)?;
            session.calculator.set_amount(category_id, &amount);
            session.apply_pending();
            finish(session, &service, settings)?;
        }

        BudgetCommands::Adjust {
            budget,
            category,
            down,
            times,
        } => {
            let mut session = EditSession::open(&service, &budget, settings, runtime)?;
            let category_id = session.selected_category(&category)?;
            for _ in 0..times {
                let props = session.form.props();
                let change = if down {
                    session.calculator.decrement(&props, category_id)
                } else {
                    session.calculator.increment(&props, category_id)
                };
                if change.is_none() {
                    break;
                }
                session.apply_pending();
            }
            finish(session, &service, settings)?;
        }

        BudgetCommands::Percent {
            budget,
            category,
            percentage,
        } => {
            let mut session = EditSession::open(&service, &budget, settings, runtime)?;
            let category_id = session.selected_category(&category)?;
            let props = session.form.props();
            session
                .calculator
                .set_percentage(&props, category_id, percentage);
            session.apply_pending();
            finish(session, &service, settings)?;
        }

        BudgetCommands::Auto { budget } => {
            let mut session = EditSession::open(&service, &budget, settings, runtime)?;
            session.auto_allocate(runtime)?;
            finish(session, &service, settings)?;
        }

        BudgetCommands::Select { budget, categories } => {
            let category_service = CategoryService::new(storage);
            let selected = category_service.resolve_all(&categories, CategoryKind::Expense)?;
            let mut session = EditSession::open(&service, &budget, settings, runtime)?;
            session.form.select_expense_categories(selected);
            finish(session, &service, settings)?;
        }

        BudgetCommands::Export {
            budget,
            format,
            output,
        } => {
            let budget = service.require(&budget)?;
            let summary = service.summary(&budget)?;

            match output {
                Some(path) => {
                    let file = File::create(&path).map_err(|e| {
                        PlannerError::Export(format!("Failed to create {}: {}", path.display(), e))
                    })?;
                    let mut writer = BufWriter::new(file);
                    export_budget(&summary, format.into(), &mut writer)?;
                    writer
                        .flush()
                        .map_err(|e| PlannerError::Export(e.to_string()))?;
                    println!("Exported '{}' to {}", budget.name, path.display());
                }
                None => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    export_budget(&summary, format.into(), &mut handle)?;
                }
            }
        }

        BudgetCommands::Edit { budget } => {
            let budget = service.require(&budget)?;
            let form = service.open_form(&budget)?;
            if let Some(saved) = crate::tui::run_calculator(storage, settings, runtime, form)? {
                println!("Saved budget: {}", saved.name);
            } else {
                println!("Edit cancelled.");
            }
        }
    }

    Ok(())
}

/// One CLI edit: a form, a calculator reporting into a channel, and the
/// receiving end that the form drains
struct EditSession {
    form: BudgetForm,
    calculator: AllocationCalculator,
    changes: UnboundedReceiver<AllocationChange>,
}

impl EditSession {
    fn new(form: BudgetForm, settings: &Settings, runtime: &Handle) -> Self {
        let (tx, changes) = unbounded_channel();
        let calculator =
            AllocationCalculator::new(runtime.clone(), tx, settings.calculator_settings());
        Self {
            form,
            calculator,
            changes,
        }
    }

    fn open(
        service: &BudgetService<'_>,
        identifier: &str,
        settings: &Settings,
        runtime: &Handle,
    ) -> PlannerResult<Self> {
        let budget = service.require(identifier)?;
        let mut form = service.open_form(&budget)?;
        form.go_to(FormStep::Allocation);
        Ok(Self::new(form, settings, runtime))
    }

    /// Resolve an expense category among the ones this budget allocates to
    fn selected_category(&self, identifier: &str) -> PlannerResult<CategoryId> {
        let wanted = identifier.trim().to_lowercase();
        let parsed = identifier.trim().parse::<CategoryId>().ok();

        self.form
            .expense_categories()
            .iter()
            .find(|c| c.name.to_lowercase() == wanted || Some(c.id) == parsed)
            .map(|c| c.id)
            .ok_or_else(|| {
                PlannerError::Validation(format!(
                    "'{}' is not an expense category of budget '{}'",
                    identifier, self.form.name
                ))
            })
    }

    /// Apply every change the calculator has reported so far
    fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(change) = self.changes.try_recv() {
            if self.form.apply_change(change) {
                applied += 1;
            }
        }
        applied
    }

    /// Run an auto-allocation to completion and apply its writes
    fn auto_allocate(&mut self, runtime: &Handle) -> PlannerResult<()> {
        let props = self.form.props();
        match self.calculator.auto_allocate(&props) {
            Some(task) => {
                println!("Auto-allocating...");
                runtime
                    .block_on(task)
                    .map_err(|e| PlannerError::Runtime(e.to_string()))?;
                self.apply_pending();
                Ok(())
            }
            None if self.form.expense_categories().is_empty() => Err(PlannerError::Budget(
                "No expense categories to allocate to".into(),
            )),
            None => Err(PlannerError::Budget(format!(
                "Nothing to allocate: total is {}",
                Money::parse_lenient(&self.form.total_amount)
            ))),
        }
    }

    fn save(mut self, service: &BudgetService<'_>) -> PlannerResult<Budget> {
        self.apply_pending();
        self.calculator.dispose();
        service.save_form(&self.form)
    }
}

/// Save an edit session and print the resulting calculator
fn finish(session: EditSession, service: &BudgetService<'_>, settings: &Settings) -> PlannerResult<()> {
    let budget = session.save(service)?;
    println!("Updated budget: {}", budget.name);
    print_calculator(service, &budget, settings)
}

fn print_calculator(
    service: &BudgetService<'_>,
    budget: &Budget,
    settings: &Settings,
) -> PlannerResult<()> {
    let summary = service.summary(budget)?;
    println!();
    print!(
        "{}",
        format_calculator(&summary.view, &settings.currency_format())
    );
    Ok(())
}

/// Advance the wizard as far as the allocation step, stopping at the first
/// incomplete step
fn walk_to_allocation(form: &mut BudgetForm) -> PlannerResult<()> {
    while form.step() < FormStep::Allocation {
        if !form.is_step_valid(form.step()) {
            break;
        }
        form.next()?;
    }
    if form.step() < FormStep::Expenses {
        return Err(PlannerError::Validation(format!(
            "Step '{}' is incomplete",
            form.step()
        )));
    }
    Ok(())
}

pub(crate) fn parse_date(s: &str) -> PlannerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PlannerError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_date("03/01/2025").unwrap_err().is_validation());
    }

    #[test]
    fn test_walk_to_allocation() {
        let mut form = BudgetForm::for_period(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 30);
        assert!(walk_to_allocation(&mut form).is_err());

        form.name = "March".into();
        form.total_amount = "1000".into();
        form.income_categories.push(CategoryId::new());
        walk_to_allocation(&mut form).unwrap();
        assert_eq!(form.step(), FormStep::Expenses);

        form.select_expense_categories(vec![crate::models::Category::expense("Food")]);
        walk_to_allocation(&mut form).unwrap();
        assert_eq!(form.step(), FormStep::Allocation);
    }
}
