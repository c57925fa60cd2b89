//! Wizard steps

use std::fmt;

/// Steps of the budget form, in order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormStep {
    #[default]
    Info,
    Incomes,
    Expenses,
    Allocation,
}

impl FormStep {
    pub const ALL: [FormStep; 4] = [
        FormStep::Info,
        FormStep::Incomes,
        FormStep::Expenses,
        FormStep::Allocation,
    ];

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Info => Some(Self::Incomes),
            Self::Incomes => Some(Self::Expenses),
            Self::Expenses => Some(Self::Allocation),
            Self::Allocation => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Info => None,
            Self::Incomes => Some(Self::Info),
            Self::Expenses => Some(Self::Incomes),
            Self::Allocation => Some(Self::Expenses),
        }
    }

    /// Zero-based position in the wizard
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Info => "Basic information",
            Self::Incomes => "Income sources",
            Self::Expenses => "Expense categories",
            Self::Allocation => "Allocation",
        }
    }
}

impl fmt::Display for FormStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        let mut step = FormStep::Info;
        let mut visited = vec![step];
        while let Some(next) = step.next() {
            step = next;
            visited.push(step);
        }
        assert_eq!(visited, FormStep::ALL);
        assert!(step.is_last());
        assert_eq!(step.previous(), Some(FormStep::Expenses));
        assert_eq!(FormStep::Info.previous(), None);
        assert_eq!(FormStep::Expenses.index(), 2);
    }
}
