use crate::error::Result;
use crate::fmt::money;
use crate::ledger::Ledger;
use crate::models::Entry;

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    All,
    Week,
    Month,
}

impl Window {
    pub fn days_back(self) -> Option<u32> {
        match self {
            Window::All => None,
            Window::Week => Some(7),
            Window::Month => Some(30),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Window::All => "📊 Все расходы",
            Window::Week => "📅 Расходы за неделю",
            Window::Month => "🗓 Расходы за месяц",
        }
    }
}

pub fn load(ledger: &dyn Ledger, window: Window) -> Result<Vec<Entry>> {
    match window.days_back() {
        None => ledger.scan_all(),
        Some(days) => ledger.scan_since(days),
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: i64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// In first-seen order.
    pub categories: Vec<CategoryTotal>,
    pub total: i64,
    pub count: usize,
}

impl Aggregate {
    /// Percentage of the grand total, 0.0 when the total is zero.
    pub fn share(&self, item: &CategoryTotal) -> f64 {
        if self.total != 0 {
            item.total as f64 / self.total as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Per-category totals plus a grand total. `None` when there is nothing to
/// aggregate, which callers report as "no expenses yet". Sums saturate at
/// `i64::MAX` rather than wrapping.
pub fn aggregate(entries: &[Entry]) -> Option<Aggregate> {
    if entries.is_empty() {
        return None;
    }

    let mut categories: Vec<CategoryTotal> = Vec::new();
    for entry in entries {
        match categories.iter_mut().find(|c| c.category == entry.category) {
            Some(item) => {
                item.total = item.total.saturating_add(entry.amount);
                item.count += 1;
            }
            None => categories.push(CategoryTotal {
                category: entry.category.clone(),
                total: entry.amount,
                count: 1,
            }),
        }
    }

    let total = categories
        .iter()
        .fold(0i64, |acc, c| acc.saturating_add(c.total));
    Some(Aggregate {
        categories,
        total,
        count: entries.len(),
    })
}

/// Average expense times thirty, truncated.
pub fn average_forecast(agg: &Aggregate) -> i64 {
    let avg = agg.total as f64 / agg.count as f64;
    (avg * 30.0) as i64
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// One "category: total" line per category, then the grand total.
pub fn render_lines(agg: &Aggregate, currency: &str, with_shares: bool) -> String {
    let mut out = String::new();
    for item in &agg.categories {
        out.push_str(&format!("{}: {}", item.category, money(item.total, currency)));
        if with_shares {
            out.push_str(&format!(" ({:.1}%)", agg.share(item)));
        }
        out.push('\n');
    }
    out.push_str(&format!("Итого: {}", money(agg.total, currency)));
    out
}

pub fn render_report(agg: &Aggregate, window: Window, currency: &str) -> String {
    let with_shares = window != Window::All;
    format!("{}:\n{}", window.title(), render_lines(agg, currency, with_shares))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    fn entries(pairs: &[(&str, i64)]) -> Vec<Entry> {
        pairs.iter().map(|(c, a)| Entry::new(*c, *a)).collect()
    }

    #[test]
    fn test_empty_input_is_no_data() {
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn test_zero_amounts_are_still_data() {
        let agg = aggregate(&entries(&[("Food", 0)])).unwrap();
        assert_eq!(agg.total, 0);
        assert_eq!(agg.count, 1);
        assert_eq!(agg.share(&agg.categories[0]), 0.0);
    }

    #[test]
    fn test_totals_in_first_seen_order() {
        let agg = aggregate(&entries(&[
            ("Transport", 1500),
            ("Food", 3000),
            ("Transport", 500),
        ]))
        .unwrap();
        let names: Vec<&str> = agg.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Transport", "Food"]);
        assert_eq!(agg.categories[0].total, 2000);
        assert_eq!(agg.categories[0].count, 2);
        assert_eq!(agg.total, 5000);
        assert_eq!(agg.count, 3);
    }

    #[test]
    fn test_totals_independent_of_order() {
        let base = [("Food", 300), ("Home", 1200), ("Food", 50), ("Other", 7)];
        let reference = aggregate(&entries(&base)).unwrap();
        let mut expected: Vec<(String, i64)> = reference
            .categories
            .iter()
            .map(|c| (c.category.clone(), c.total))
            .collect();
        expected.sort();

        let orders = [[0, 1, 2, 3], [3, 2, 1, 0], [1, 3, 0, 2], [2, 0, 3, 1]];
        for order in orders {
            let shuffled: Vec<(&str, i64)> = order.iter().map(|&i| base[i]).collect();
            let agg = aggregate(&entries(&shuffled)).unwrap();
            let mut got: Vec<(String, i64)> = agg
                .categories
                .iter()
                .map(|c| (c.category.clone(), c.total))
                .collect();
            got.sort();
            assert_eq!(got, expected);
            assert_eq!(agg.total, reference.total);
        }
    }

    #[test]
    fn test_same_category_totals_saturate() {
        let agg = aggregate(&entries(&[("Transport", i64::MAX), ("Transport", i64::MAX)])).unwrap();
        assert_eq!(agg.categories[0].total, i64::MAX);
        assert_eq!(agg.total, i64::MAX);
        assert_eq!(agg.count, 2);
    }

    #[test]
    fn test_grand_total_saturates_across_categories() {
        let agg = aggregate(&entries(&[("Home", i64::MAX), ("Food", 1)])).unwrap();
        assert_eq!(agg.categories[0].total, i64::MAX);
        assert_eq!(agg.categories[1].total, 1);
        assert_eq!(agg.total, i64::MAX);
        assert!(agg.share(&agg.categories[0]) > 99.9);
    }

    #[test]
    fn test_render_stats_report() {
        let agg = aggregate(&entries(&[("Food", 3000), ("Transport", 1500)])).unwrap();
        let text = render_report(&agg, Window::All, "₸");
        assert_eq!(
            text,
            "📊 Все расходы:\nFood: 3000₸\nTransport: 1500₸\nИтого: 4500₸"
        );
    }

    #[test]
    fn test_render_windowed_report_with_shares() {
        let agg = aggregate(&entries(&[("Food", 300), ("Food", 300), ("Food", 300)])).unwrap();
        let text = render_report(&agg, Window::Week, "₸");
        assert!(text.starts_with("📅 Расходы за неделю:"));
        assert!(text.contains("Food: 900₸ (100.0%)"));
        assert!(text.ends_with("Итого: 900₸"));
    }

    #[test]
    fn test_average_forecast_truncates() {
        let agg = aggregate(&entries(&[("Food", 100), ("Food", 200), ("Home", 300)])).unwrap();
        assert_eq!(average_forecast(&agg), 6000);
        // 1 / 4 * 30 = 7.5
        let agg = aggregate(&entries(&[("Food", 1), ("Food", 0), ("Food", 0), ("Other", 0)])).unwrap();
        assert_eq!(average_forecast(&agg), 7);
    }

    #[test]
    fn test_load_uses_window() {
        let ledger = MemoryLedger::new();
        let today = crate::ledger::today();
        ledger.append_on("Food", 1, today - chrono::Duration::days(20)).unwrap();
        ledger.append_on("Food", 2, today - chrono::Duration::days(40)).unwrap();
        ledger.append_on("Food", 3, today).unwrap();
        assert_eq!(load(&ledger, Window::All).unwrap().len(), 3);
        assert_eq!(load(&ledger, Window::Month).unwrap().len(), 2);
        assert_eq!(load(&ledger, Window::Week).unwrap().len(), 1);
    }
}
