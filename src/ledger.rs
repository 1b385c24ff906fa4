use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{Duration, Local, NaiveDate};
use rusqlite::backup::Backup;
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::{AppError, Result};
use crate::models::{Category, Entry, Transaction};

const DATE_FMT: &str = "%Y-%m-%d";

/// Append-only store of categorized expenses.
///
/// Every method is one atomic operation; implementations serialize them
/// internally so callers can share a ledger across tasks.
pub trait Ledger: Send + Sync {
    /// Record an expense dated today. Returns the new id.
    fn append(&self, category: &str, amount: i64) -> Result<i64>;

    /// Every recorded expense in insertion order.
    fn scan_all(&self) -> Result<Vec<Entry>>;

    /// Expenses dated on or after `today - days_back`.
    fn scan_since(&self, days_back: u32) -> Result<Vec<Entry>>;

    /// Delete everything. Returns the number of removed rows.
    fn clear(&self) -> Result<usize>;
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn cutoff(days_back: u32) -> NaiveDate {
    today() - Duration::days(i64::from(days_back))
}

/// Category label as read back from disk. Missing or unknown labels from
/// older rows report as `Other`.
fn stored_category(label: Option<String>) -> String {
    Category::coerce(label.as_deref().unwrap_or_default())
        .as_str()
        .to_string()
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = get_connection(db_path)?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Other("ledger lock poisoned".into()))
    }

    pub fn append_on(&self, category: &str, amount: i64, date: NaiveDate) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO expenses (category, amount, date) VALUES (?1, ?2, ?3)",
            rusqlite::params![category, amount, date.format(DATE_FMT).to_string()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let n = conn.query_row("SELECT count(*) FROM expenses", [], |r| r.get(0))?;
        Ok(n)
    }

    /// Copy the whole ledger into a fresh SQLite file at `dest` using the
    /// online backup API, so appends may continue while it runs.
    pub fn backup_to(&self, dest: &Path) -> Result<()> {
        let conn = self.lock()?;
        let mut dest_conn = Connection::open(dest)?;
        let backup = Backup::new(&conn, &mut dest_conn)?;
        backup.run_to_completion(100, std::time::Duration::from_millis(10), None)?;
        Ok(())
    }

    /// Most recent expenses, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<Transaction>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, category, amount, date FROM expenses ORDER BY id DESC LIMIT ?1",
        )?;
        let raw: Vec<(i64, Option<String>, i64, String)> = stmt
            .query_map([limit as i64], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        raw.into_iter()
            .map(|(id, category, amount, date)| {
                let date = NaiveDate::parse_from_str(&date, DATE_FMT)
                    .map_err(|e| AppError::Other(format!("bad date '{date}' in row {id}: {e}")))?;
                Ok(Transaction {
                    id,
                    category: stored_category(category),
                    amount,
                    date,
                })
            })
            .collect()
    }

    fn query_entries(&self, sql: &str, params: &[&dyn rusqlite::types::ToSql]) -> Result<Vec<Entry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(Entry {
                category: stored_category(row.get(0)?),
                amount: row.get::<_, Option<i64>>(1)?.unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

impl Ledger for SqliteLedger {
    fn append(&self, category: &str, amount: i64) -> Result<i64> {
        self.append_on(category, amount, today())
    }

    fn scan_all(&self) -> Result<Vec<Entry>> {
        self.query_entries("SELECT category, amount FROM expenses ORDER BY id", &[])
    }

    fn scan_since(&self, days_back: u32) -> Result<Vec<Entry>> {
        let since = cutoff(days_back).format(DATE_FMT).to_string();
        self.query_entries(
            "SELECT category, amount FROM expenses WHERE date >= ?1 ORDER BY id",
            &[&since as &dyn rusqlite::types::ToSql],
        )
    }

    fn clear(&self) -> Result<usize> {
        let conn = self.lock()?;
        Ok(conn.execute("DELETE FROM expenses", [])?)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Ledger that lives only as long as the process. Used by tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryLedger {
    inner: Mutex<MemoryInner>,
}

#[cfg(test)]
#[derive(Default)]
struct MemoryInner {
    next_id: i64,
    rows: Vec<Transaction>,
}

#[cfg(test)]
impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::Other("ledger lock poisoned".into()))
    }

    pub fn append_on(&self, category: &str, amount: i64, date: NaiveDate) -> Result<i64> {
        let mut inner = self.lock()?;
        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.push(Transaction {
            id,
            category: category.to_string(),
            amount,
            date,
        });
        Ok(id)
    }

    fn entries_where(&self, keep: impl Fn(&Transaction) -> bool) -> Result<Vec<Entry>> {
        let inner = self.lock()?;
        Ok(inner
            .rows
            .iter()
            .filter(|t| keep(t))
            .map(|t| Entry::new(t.category.clone(), t.amount))
            .collect())
    }
}

#[cfg(test)]
impl Ledger for MemoryLedger {
    fn append(&self, category: &str, amount: i64) -> Result<i64> {
        self.append_on(category, amount, today())
    }

    fn scan_all(&self) -> Result<Vec<Entry>> {
        self.entries_where(|_| true)
    }

    fn scan_since(&self, days_back: u32) -> Result<Vec<Entry>> {
        let since = cutoff(days_back);
        self.entries_where(|t| t.date >= since)
    }

    fn clear(&self) -> Result<usize> {
        let mut inner = self.lock()?;
        let n = inner.rows.len();
        inner.rows.clear();
        Ok(n)
    }
}
