use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const DB_FILE: &str = "expenses.db";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT,
    amount INTEGER,
    date TEXT
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_expenses_table() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(tables, vec!["expenses".to_string()]);
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_schema_columns() {
        let (_dir, conn) = test_db();
        let cols: Vec<(String, String)> = conn
            .prepare("PRAGMA table_info(expenses)")
            .unwrap()
            .query_map([], |row| Ok((row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        let expected = [
            ("id", "INTEGER"),
            ("category", "TEXT"),
            ("amount", "INTEGER"),
            ("date", "TEXT"),
        ];
        assert_eq!(cols.len(), expected.len());
        for ((name, ty), (en, et)) in cols.iter().zip(expected) {
            assert_eq!(name, en);
            assert_eq!(ty, et);
        }
    }

    #[test]
    fn test_autoincrement_ids_are_not_reused() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO expenses (category, amount, date) VALUES ('Food', 100, '2025-01-01')",
            [],
        )
        .unwrap();
        let first = conn.last_insert_rowid();
        conn.execute("DELETE FROM expenses", []).unwrap();
        conn.execute(
            "INSERT INTO expenses (category, amount, date) VALUES ('Food', 100, '2025-01-01')",
            [],
        )
        .unwrap();
        assert!(conn.last_insert_rowid() > first);
    }
}
