use std::fmt;

use chrono::NaiveDate;

/// Closed set of spending categories. Anything the classifier cannot place
/// lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Food,
    Clothing,
    Entertainment,
    Transport,
    Home,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Clothing,
        Category::Entertainment,
        Category::Transport,
        Category::Home,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Clothing => "Clothing",
            Category::Entertainment => "Entertainment",
            Category::Transport => "Transport",
            Category::Home => "Home",
            Category::Other => "Other",
        }
    }

    /// Exact-name lookup. Returns `None` for anything that is not one of the
    /// enumerated names.
    pub fn parse(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Unknown labels become `Other`.
    pub fn coerce(label: &str) -> Category {
        Category::parse(label.trim()).unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted expense. Never updated once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub category: String,
    pub amount: i64,
    pub date: NaiveDate,
}

/// One (category, amount) pair as returned by ledger scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub category: String,
    pub amount: i64,
}

impl Entry {
    pub fn new(category: impl Into<String>, amount: i64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}
