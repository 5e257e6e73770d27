// Read-only access to the reference player database (SQLite).

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags};
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("failed to open player database {path}: {source}")]
    Open {
        path: String,
        source: rusqlite::Error,
    },

    #[error("player search for \"{filter}\" failed: {source}")]
    Query {
        filter: String,
        source: rusqlite::Error,
    },
}

// ---------------------------------------------------------------------------
// PlayerRecord
// ---------------------------------------------------------------------------

/// One row of the `players` table. Numeric columns may be NULL in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub age: Option<f64>,
    /// Domestic competition of the player's current club (e.g. `GB1`).
    pub competition_id: Option<String>,
    pub market_value_in_eur: Option<f64>,
    pub goals_weighted: Option<f64>,
    pub assists_weighted: Option<f64>,
    pub minutes_played: Option<f64>,
}

impl PlayerRecord {
    /// Record with only a name set; convenient for building fixtures.
    pub fn named(name: impl Into<String>) -> Self {
        PlayerRecord {
            name: name.into(),
            age: None,
            competition_id: None,
            market_value_in_eur: None,
            goals_weighted: None,
            assists_weighted: None,
            minutes_played: None,
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerDatabase
// ---------------------------------------------------------------------------

/// Handle to the reference database.
///
/// Holds only the path: each query opens its own read-only connection and
/// drops it when the query returns, on success or error.
#[derive(Debug, Clone)]
pub struct PlayerDatabase {
    path: PathBuf,
}

impl PlayerDatabase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PlayerDatabase { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, DataAccessError> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| DataAccessError::Open {
            path: self.path.display().to_string(),
            source: e,
        })
    }

    /// Players whose name contains `filter` (case-insensitive for ASCII),
    /// in table order, at most `limit` rows.
    ///
    /// The filter is bound as a parameter and its LIKE wildcards are
    /// escaped, so it always matches literally.
    pub fn search_players(
        &self,
        filter: &str,
        limit: usize,
    ) -> Result<Vec<PlayerRecord>, DataAccessError> {
        let conn = self.connect()?;
        let query_err = |e| DataAccessError::Query {
            filter: filter.to_string(),
            source: e,
        };

        let mut stmt = conn
            .prepare(
                "SELECT name, age, current_club_domestic_competition_id, market_value_in_eur,
                        goals_weighted, assists_weighted, minutes_played
                 FROM players
                 WHERE name LIKE '%' || ?1 || '%' ESCAPE '\\'
                 LIMIT ?2",
            )
            .map_err(query_err)?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let players = stmt
            .query_map(params![escape_like(filter), limit], |row| {
                let name: Option<String> = row.get(0)?;
                Ok(PlayerRecord {
                    name: name.unwrap_or_default(),
                    age: row.get(1)?,
                    competition_id: row.get(2)?,
                    market_value_in_eur: row.get(3)?,
                    goals_weighted: row.get(4)?,
                    assists_weighted: row.get(5)?,
                    minutes_played: row.get(6)?,
                })
            })
            .map_err(query_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_err)?;

        debug!(filter, rows = players.len(), "player search complete");
        Ok(players)
    }
}

/// Escape `\`, `%` and `_` for a LIKE pattern using `\` as the escape char.
fn escape_like(filter: &str) -> String {
    let mut out = String::with_capacity(filter.len());
    for c in filter.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a fresh database file under the temp dir with a few players.
    fn fixture_db(name: &str) -> PlayerDatabase {
        let path = std::env::temp_dir().join(format!("scoutval_db_{name}.db"));
        let _ = std::fs::remove_file(&path);
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE players (
                name TEXT,
                age REAL,
                current_club_domestic_competition_id TEXT,
                market_value_in_eur REAL,
                goals_weighted REAL,
                assists_weighted REAL,
                minutes_played INTEGER,
                position TEXT
             );
             INSERT INTO players VALUES ('Bukayo Saka', 22, 'GB1', 140000000, 16, 9, 2900, 'Attack');
             INSERT INTO players VALUES ('Mohamed Salah', 31, 'GB1', 55000000, 18, 10, 2800, 'Attack');
             INSERT INTO players VALUES ('Jadon Sancho', 24, 'L1', NULL, 2.4, 3.2, NULL, 'Attack');
             INSERT INTO players VALUES ('Player_100%', 27, 'NL1', 1000000, 1.26, 0.63, 1200, 'Midfield');
             INSERT INTO players VALUES ('Player 1000', 28, 'NL1', 900000, 0.63, 0.0, 800, 'Midfield');",
        )
        .unwrap();
        PlayerDatabase::new(path)
    }

    #[test]
    fn search_matches_substring_case_insensitively() {
        let db = fixture_db("substring");
        let players = db.search_players("sa", 10).unwrap();
        let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bukayo Saka", "Mohamed Salah", "Jadon Sancho"]);
    }

    #[test]
    fn search_respects_limit() {
        let db = fixture_db("limit");
        let players = db.search_players("a", 2).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "Bukayo Saka");
    }

    #[test]
    fn search_maps_columns_and_nulls() {
        let db = fixture_db("columns");
        let players = db.search_players("Sancho", 5).unwrap();
        assert_eq!(players.len(), 1);
        let p = &players[0];
        assert_eq!(p.age, Some(24.0));
        assert_eq!(p.competition_id.as_deref(), Some("L1"));
        assert_eq!(p.market_value_in_eur, None);
        assert_eq!(p.goals_weighted, Some(2.4));
        assert_eq!(p.minutes_played, None);

        let saka = &db.search_players("Saka", 5).unwrap()[0];
        // Integer column values read as f64.
        assert_eq!(saka.market_value_in_eur, Some(140_000_000.0));
        assert_eq!(saka.minutes_played, Some(2900.0));
    }

    #[test]
    fn wildcards_in_filter_match_literally() {
        let db = fixture_db("wildcards");
        let percent = db.search_players("100%", 10).unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].name, "Player_100%");

        let underscore = db.search_players("_", 10).unwrap();
        assert_eq!(underscore.len(), 1);
        assert_eq!(underscore[0].name, "Player_100%");
    }

    #[test]
    fn quote_in_filter_is_data_not_sql() {
        let db = fixture_db("injection");
        let players = db
            .search_players("' OR '1'='1", 10)
            .expect("quoted filter should not break the query");
        assert!(players.is_empty());
    }

    #[test]
    fn no_match_returns_empty() {
        let db = fixture_db("nomatch");
        assert!(db.search_players("Zidane", 10).unwrap().is_empty());
    }

    #[test]
    fn missing_database_file_is_open_error() {
        let path = std::env::temp_dir().join("scoutval_db_does_not_exist.db");
        let _ = std::fs::remove_file(&path);
        let db = PlayerDatabase::new(&path);
        let err = db.search_players("a", 5).unwrap_err();
        assert!(matches!(err, DataAccessError::Open { .. }), "got {err}");
    }

    #[test]
    fn missing_table_is_query_error_with_filter() {
        let path = std::env::temp_dir().join("scoutval_db_no_table.db");
        let _ = std::fs::remove_file(&path);
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE other (x INTEGER);")
            .unwrap();
        let db = PlayerDatabase::new(&path);
        let err = db.search_players("Messi", 5).unwrap_err();
        match &err {
            DataAccessError::Query { filter, .. } => assert_eq!(filter, "Messi"),
            other => panic!("expected Query error, got {other}"),
        }
        // The failed query released its connection; the file can be removed
        // and recreated.
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn repeated_queries_do_not_hold_connections() {
        let db = fixture_db("repeat");
        for _ in 0..50 {
            db.search_players("Salah", 1).unwrap();
        }
        // A writer can still take an exclusive lock afterwards.
        let conn = Connection::open(db.path()).unwrap();
        conn.execute_batch("BEGIN EXCLUSIVE; DELETE FROM players; COMMIT;")
            .unwrap();
        assert!(db.search_players("Salah", 1).unwrap().is_empty());
    }

    #[test]
    fn escape_like_escapes_special_chars() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }
}
