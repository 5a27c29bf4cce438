//! SQLite-backed gallery implementation.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{Cat, CatWithLikes, GalleryError, GalleryStats, GalleryStore, NewCat};

/// SQLite-backed gallery.
pub struct SqliteGallery {
    conn: Mutex<Connection>,
}

impl SqliteGallery {
    /// Create a new SQLite gallery, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, GalleryError> {
        let conn = Connection::open(path).map_err(|e| GalleryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite gallery (useful for testing).
    pub fn in_memory() -> Result<Self, GalleryError> {
        let conn =
            Connection::open_in_memory().map_err(|e| GalleryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), GalleryError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- Persisted cat images (one row per unique external id)
            CREATE TABLE IF NOT EXISTS cats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                api_id TEXT NOT NULL UNIQUE,
                image_url TEXT NOT NULL,
                width INTEGER NOT NULL,
                height INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_cats_created_at ON cats(created_at);

            -- Per-user likes (the relation is the sole source of truth)
            CREATE TABLE IF NOT EXISTS cat_likes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cat_id INTEGER NOT NULL REFERENCES cats(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(cat_id, user_id)
            );

            CREATE INDEX IF NOT EXISTS idx_cat_likes_cat ON cat_likes(cat_id);
            CREATE INDEX IF NOT EXISTS idx_cat_likes_user ON cat_likes(user_id);
            "#,
        )
        .map_err(|e| GalleryError::Database(e.to_string()))?;

        Ok(())
    }

    /// Convert a row to Cat.
    fn row_to_cat(row: &rusqlite::Row) -> rusqlite::Result<Cat> {
        let created_at_str: String = row.get(5)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Cat {
            id: row.get(0)?,
            api_id: row.get(1)?,
            image_url: row.get(2)?,
            width: row.get(3)?,
            height: row.get(4)?,
            created_at,
        })
    }

    /// Convert a row from the aggregated like join to CatWithLikes.
    fn row_to_cat_with_likes(row: &rusqlite::Row) -> rusqlite::Result<CatWithLikes> {
        let liked: i64 = row.get(6)?;
        Ok(CatWithLikes {
            id: row.get(0)?,
            api_id: row.get(1)?,
            image_url: row.get(2)?,
            width: row.get(3)?,
            height: row.get(4)?,
            like_count: row.get(5)?,
            liked_by_user: liked != 0,
        })
    }

    /// Build an IN (...) placeholder list of the given length.
    fn placeholders(count: usize) -> String {
        vec!["?"; count].join(", ")
    }
}

impl GalleryStore for SqliteGallery {
    fn existing_api_ids(&self, api_ids: &[String]) -> Result<HashSet<String>, GalleryError> {
        if api_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT api_id FROM cats WHERE api_id IN ({})",
            Self::placeholders(api_ids.len())
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| GalleryError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(rusqlite::params_from_iter(api_ids), |row| {
                row.get::<_, String>(0)
            })
            .map_err(|e| GalleryError::Database(e.to_string()))?;

        let mut existing = HashSet::new();
        for row in rows {
            existing.insert(row.map_err(|e| GalleryError::Database(e.to_string()))?);
        }
        Ok(existing)
    }

    fn insert_missing(&self, cats: &[NewCat]) -> Result<u32, GalleryError> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();
        let mut new_count = 0;

        for cat in cats {
            // Skip records without an external id
            if cat.api_id.is_empty() {
                continue;
            }

            // Ignore-on-conflict keeps overlapping concurrent batches from
            // erroring or duplicating
            let inserted = conn
                .execute(
                    "INSERT INTO cats (api_id, image_url, width, height, created_at)
                     VALUES (?, ?, ?, ?, ?)
                     ON CONFLICT(api_id) DO NOTHING",
                    params![
                        &cat.api_id,
                        &cat.image_url,
                        cat.width as i64,
                        cat.height as i64,
                        &now_str,
                    ],
                )
                .map_err(|e| GalleryError::Database(e.to_string()))?;

            new_count += inserted as u32;
        }

        Ok(new_count)
    }

    fn resolve(&self, api_id: &str) -> Result<Option<Cat>, GalleryError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT id, api_id, image_url, width, height, created_at
             FROM cats WHERE api_id = ?",
            params![api_id],
            Self::row_to_cat,
        );

        match result {
            Ok(cat) => Ok(Some(cat)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(GalleryError::Database(e.to_string())),
        }
    }

    fn toggle_like(&self, cat_id: i64, user_id: &str) -> Result<bool, GalleryError> {
        let conn = self.conn.lock().unwrap();

        let deleted = conn
            .execute(
                "DELETE FROM cat_likes WHERE cat_id = ? AND user_id = ?",
                params![cat_id, user_id],
            )
            .map_err(|e| GalleryError::Database(e.to_string()))?;

        if deleted > 0 {
            return Ok(false);
        }

        // The unique (cat_id, user_id) constraint makes a racing duplicate
        // insert a no-op instead of an error
        conn.execute(
            "INSERT OR IGNORE INTO cat_likes (cat_id, user_id, created_at) VALUES (?, ?, ?)",
            params![cat_id, user_id, Utc::now().to_rfc3339()],
        )
        .map_err(|e| GalleryError::Database(e.to_string()))?;

        Ok(true)
    }

    fn like_count(&self, cat_id: i64) -> Result<u64, GalleryError> {
        let conn = self.conn.lock().unwrap();

        let count: u64 = conn
            .query_row(
                "SELECT COUNT(*) FROM cat_likes WHERE cat_id = ?",
                params![cat_id],
                |row| row.get(0),
            )
            .map_err(|e| GalleryError::Database(e.to_string()))?;

        Ok(count)
    }

    fn is_liked_by(&self, cat_id: i64, user_id: &str) -> Result<bool, GalleryError> {
        let conn = self.conn.lock().unwrap();

        let liked: bool = conn
            .query_row(
                "SELECT 1 FROM cat_likes WHERE cat_id = ? AND user_id = ?",
                params![cat_id, user_id],
                |_| Ok(true),
            )
            .unwrap_or(false);

        Ok(liked)
    }

    fn with_likes(
        &self,
        api_ids: &[String],
        user_id: Option<&str>,
    ) -> Result<Vec<CatWithLikes>, GalleryError> {
        if api_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock().unwrap();

        // A NULL user parameter never matches, so the liked flag computes
        // to 0 for anonymous queries
        let sql = format!(
            "SELECT c.id, c.api_id, c.image_url, c.width, c.height,
                    COUNT(l.id),
                    COALESCE(MAX(CASE WHEN l.user_id = ? THEN 1 ELSE 0 END), 0)
             FROM cats c
             LEFT JOIN cat_likes l ON l.cat_id = c.id
             WHERE c.api_id IN ({})
             GROUP BY c.id
             ORDER BY c.id ASC",
            Self::placeholders(api_ids.len())
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| GalleryError::Database(e.to_string()))?;

        let mut sql_params: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(user_id.map(|u| u.to_string()))];
        for api_id in api_ids {
            sql_params.push(Box::new(api_id.clone()));
        }
        let param_refs: Vec<&dyn rusqlite::ToSql> = sql_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_cat_with_likes)
            .map_err(|e| GalleryError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| GalleryError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    fn top_liked(
        &self,
        limit: u32,
        user_id: Option<&str>,
    ) -> Result<Vec<CatWithLikes>, GalleryError> {
        let conn = self.conn.lock().unwrap();

        // Inner join drops cats without likes; internal id breaks ties so
        // the ranking is stable across calls
        let mut stmt = conn
            .prepare(
                "SELECT c.id, c.api_id, c.image_url, c.width, c.height,
                        COUNT(l.id) AS like_count,
                        COALESCE(MAX(CASE WHEN l.user_id = ?1 THEN 1 ELSE 0 END), 0)
                 FROM cats c
                 JOIN cat_likes l ON l.cat_id = c.id
                 GROUP BY c.id
                 ORDER BY like_count DESC, c.id ASC
                 LIMIT ?2",
            )
            .map_err(|e| GalleryError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(
                params![user_id.map(|u| u.to_string()), limit as i64],
                Self::row_to_cat_with_likes,
            )
            .map_err(|e| GalleryError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| GalleryError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    fn stats(&self) -> Result<GalleryStats, GalleryError> {
        let conn = self.conn.lock().unwrap();

        let total_cats: u64 = conn
            .query_row("SELECT COUNT(*) FROM cats", [], |row| row.get(0))
            .map_err(|e| GalleryError::Database(e.to_string()))?;

        let total_likes: u64 = conn
            .query_row("SELECT COUNT(*) FROM cat_likes", [], |row| row.get(0))
            .map_err(|e| GalleryError::Database(e.to_string()))?;

        let distinct_likers: u64 = conn
            .query_row("SELECT COUNT(DISTINCT user_id) FROM cat_likes", [], |row| {
                row.get(0)
            })
            .map_err(|e| GalleryError::Database(e.to_string()))?;

        let oldest_entry: Option<DateTime<Utc>> = conn
            .query_row("SELECT MIN(created_at) FROM cats", [], |row| {
                let s: Option<String> = row.get(0)?;
                Ok(s)
            })
            .map_err(|e| GalleryError::Database(e.to_string()))?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let newest_entry: Option<DateTime<Utc>> = conn
            .query_row("SELECT MAX(created_at) FROM cats", [], |row| {
                let s: Option<String> = row.get(0)?;
                Ok(s)
            })
            .map_err(|e| GalleryError::Database(e.to_string()))?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(GalleryStats {
            total_cats,
            total_likes,
            distinct_likers,
            oldest_entry,
            newest_entry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_gallery() -> SqliteGallery {
        SqliteGallery::in_memory().unwrap()
    }

    fn new_cat(api_id: &str) -> NewCat {
        NewCat {
            api_id: api_id.to_string(),
            image_url: format!("https://cdn.example/{}.jpg", api_id),
            width: 640,
            height: 480,
        }
    }

    fn ingest(gallery: &SqliteGallery, api_ids: &[&str]) {
        let cats: Vec<NewCat> = api_ids.iter().map(|id| new_cat(id)).collect();
        gallery.insert_missing(&cats).unwrap();
    }

    #[test]
    fn test_insert_new_cat() {
        let gallery = create_test_gallery();

        let new_count = gallery.insert_missing(&[new_cat("a1")]).unwrap();
        assert_eq!(new_count, 1);

        let cat = gallery.resolve("a1").unwrap().unwrap();
        assert_eq!(cat.api_id, "a1");
        assert_eq!(cat.image_url, "https://cdn.example/a1.jpg");
        assert_eq!(cat.width, 640);
        assert_eq!(cat.height, 480);
    }

    #[test]
    fn test_insert_duplicate_is_ignored() {
        let gallery = create_test_gallery();

        let new_count = gallery.insert_missing(&[new_cat("a1")]).unwrap();
        assert_eq!(new_count, 1);

        // Same batch again - no new rows, no error
        let new_count = gallery.insert_missing(&[new_cat("a1")]).unwrap();
        assert_eq!(new_count, 0);

        let stats = gallery.stats().unwrap();
        assert_eq!(stats.total_cats, 1);
    }

    #[test]
    fn test_insert_overlapping_batch() {
        let gallery = create_test_gallery();

        gallery.insert_missing(&[new_cat("a1"), new_cat("a2")]).unwrap();
        let new_count = gallery
            .insert_missing(&[new_cat("a2"), new_cat("a3")])
            .unwrap();

        assert_eq!(new_count, 1);
        assert_eq!(gallery.stats().unwrap().total_cats, 3);
    }

    #[test]
    fn test_insert_skips_empty_api_id() {
        let gallery = create_test_gallery();

        let new_count = gallery.insert_missing(&[new_cat("")]).unwrap();
        assert_eq!(new_count, 0);
        assert_eq!(gallery.stats().unwrap().total_cats, 0);
    }

    #[test]
    fn test_internal_id_is_stable() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["a1"]);

        let first = gallery.resolve("a1").unwrap().unwrap();
        gallery.insert_missing(&[new_cat("a1")]).unwrap();
        let second = gallery.resolve("a1").unwrap().unwrap();

        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_existing_api_ids() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["a1", "a2"]);

        let existing = gallery
            .existing_api_ids(&[
                "a1".to_string(),
                "a2".to_string(),
                "unknown".to_string(),
            ])
            .unwrap();

        assert_eq!(existing.len(), 2);
        assert!(existing.contains("a1"));
        assert!(existing.contains("a2"));
        assert!(!existing.contains("unknown"));
    }

    #[test]
    fn test_existing_api_ids_empty_input() {
        let gallery = create_test_gallery();
        let existing = gallery.existing_api_ids(&[]).unwrap();
        assert!(existing.is_empty());
    }

    #[test]
    fn test_resolve_unknown() {
        let gallery = create_test_gallery();
        assert!(gallery.resolve("nope").unwrap().is_none());
    }

    #[test]
    fn test_toggle_like_on_then_off() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["a1"]);
        let cat = gallery.resolve("a1").unwrap().unwrap();

        let liked = gallery.toggle_like(cat.id, "user-1").unwrap();
        assert!(liked);
        assert_eq!(gallery.like_count(cat.id).unwrap(), 1);
        assert!(gallery.is_liked_by(cat.id, "user-1").unwrap());

        let liked = gallery.toggle_like(cat.id, "user-1").unwrap();
        assert!(!liked);
        assert_eq!(gallery.like_count(cat.id).unwrap(), 0);
        assert!(!gallery.is_liked_by(cat.id, "user-1").unwrap());
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["a1"]);
        let cat = gallery.resolve("a1").unwrap().unwrap();

        for _ in 0..4 {
            gallery.toggle_like(cat.id, "user-1").unwrap();
        }

        // Even number of toggles: back to not liked, no residual row
        assert_eq!(gallery.like_count(cat.id).unwrap(), 0);
        assert_eq!(gallery.stats().unwrap().total_likes, 0);
    }

    #[test]
    fn test_two_users_like_same_cat() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["a1"]);
        let cat = gallery.resolve("a1").unwrap().unwrap();

        assert!(gallery.toggle_like(cat.id, "user-1").unwrap());
        assert!(gallery.toggle_like(cat.id, "user-2").unwrap());

        assert_eq!(gallery.like_count(cat.id).unwrap(), 2);
        assert!(gallery.is_liked_by(cat.id, "user-1").unwrap());
        assert!(gallery.is_liked_by(cat.id, "user-2").unwrap());
    }

    #[test]
    fn test_like_count_is_derived_from_relation() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["a1"]);
        let cat = gallery.resolve("a1").unwrap().unwrap();

        for user in ["u1", "u2", "u3"] {
            gallery.toggle_like(cat.id, user).unwrap();
        }
        gallery.toggle_like(cat.id, "u2").unwrap(); // u2 unlikes

        assert_eq!(gallery.like_count(cat.id).unwrap(), 2);
        assert_eq!(gallery.stats().unwrap().total_likes, 2);
    }

    #[test]
    fn test_with_likes_drops_unknown_ids() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["a1"]);

        let results = gallery
            .with_likes(&["a1".to_string(), "unknown".to_string()], None)
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].api_id, "a1");
        assert_eq!(results[0].like_count, 0);
        assert!(!results[0].liked_by_user);
    }

    #[test]
    fn test_with_likes_anonymous_never_liked() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["a1"]);
        let cat = gallery.resolve("a1").unwrap().unwrap();
        gallery.toggle_like(cat.id, "user-1").unwrap();

        let results = gallery.with_likes(&["a1".to_string()], None).unwrap();

        assert_eq!(results[0].like_count, 1);
        assert!(!results[0].liked_by_user);
    }

    #[test]
    fn test_with_likes_per_user_flag() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["a1", "a2"]);
        let a1 = gallery.resolve("a1").unwrap().unwrap();
        gallery.toggle_like(a1.id, "user-1").unwrap();
        gallery.toggle_like(a1.id, "user-2").unwrap();

        let ids = vec!["a1".to_string(), "a2".to_string()];

        let results = gallery.with_likes(&ids, Some("user-1")).unwrap();
        assert_eq!(results.len(), 2);

        let a1_entry = results.iter().find(|c| c.api_id == "a1").unwrap();
        assert_eq!(a1_entry.like_count, 2);
        assert!(a1_entry.liked_by_user);
        assert_eq!(a1_entry.id, a1.id);

        let a2_entry = results.iter().find(|c| c.api_id == "a2").unwrap();
        assert_eq!(a2_entry.like_count, 0);
        assert!(!a2_entry.liked_by_user);

        let results = gallery.with_likes(&ids, Some("user-3")).unwrap();
        let a1_entry = results.iter().find(|c| c.api_id == "a1").unwrap();
        assert!(!a1_entry.liked_by_user);
    }

    #[test]
    fn test_with_likes_empty_input() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["a1"]);
        let results = gallery.with_likes(&[], Some("user-1")).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_top_liked_ordering() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["x", "y", "z"]);
        let x = gallery.resolve("x").unwrap().unwrap();
        let y = gallery.resolve("y").unwrap().unwrap();

        gallery.toggle_like(x.id, "u1").unwrap();
        gallery.toggle_like(x.id, "u2").unwrap();
        gallery.toggle_like(y.id, "u1").unwrap();

        let results = gallery.top_liked(10, None).unwrap();

        assert_eq!(results.len(), 2); // z has no likes
        assert_eq!(results[0].api_id, "x");
        assert_eq!(results[0].like_count, 2);
        assert_eq!(results[1].api_id, "y");
        assert_eq!(results[1].like_count, 1);
    }

    #[test]
    fn test_top_liked_tie_break_by_internal_id() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["first", "second"]);
        let first = gallery.resolve("first").unwrap().unwrap();
        let second = gallery.resolve("second").unwrap().unwrap();

        gallery.toggle_like(first.id, "u1").unwrap();
        gallery.toggle_like(second.id, "u1").unwrap();

        let results = gallery.top_liked(10, None).unwrap();

        // Equal counts: ingestion order wins
        assert_eq!(results[0].api_id, "first");
        assert_eq!(results[1].api_id, "second");
    }

    #[test]
    fn test_top_liked_respects_limit() {
        let gallery = create_test_gallery();
        for i in 0..5 {
            let api_id = format!("cat{}", i);
            ingest(&gallery, &[api_id.as_str()]);
            let cat = gallery.resolve(&api_id).unwrap().unwrap();
            gallery.toggle_like(cat.id, "u1").unwrap();
        }

        let results = gallery.top_liked(3, None).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_top_liked_carries_user_flag() {
        let gallery = create_test_gallery();
        ingest(&gallery, &["a1"]);
        let cat = gallery.resolve("a1").unwrap().unwrap();
        gallery.toggle_like(cat.id, "u1").unwrap();

        let results = gallery.top_liked(10, Some("u1")).unwrap();
        assert!(results[0].liked_by_user);

        let results = gallery.top_liked(10, Some("u2")).unwrap();
        assert!(!results[0].liked_by_user);
    }

    #[test]
    fn test_top_liked_empty_gallery() {
        let gallery = create_test_gallery();
        let results = gallery.top_liked(10, None).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_stats() {
        let gallery = create_test_gallery();

        // Empty gallery
        let stats = gallery.stats().unwrap();
        assert_eq!(stats.total_cats, 0);
        assert_eq!(stats.total_likes, 0);
        assert_eq!(stats.distinct_likers, 0);
        assert!(stats.oldest_entry.is_none());

        ingest(&gallery, &["a1", "a2"]);
        let a1 = gallery.resolve("a1").unwrap().unwrap();
        let a2 = gallery.resolve("a2").unwrap().unwrap();
        gallery.toggle_like(a1.id, "u1").unwrap();
        gallery.toggle_like(a2.id, "u1").unwrap();
        gallery.toggle_like(a1.id, "u2").unwrap();

        let stats = gallery.stats().unwrap();
        assert_eq!(stats.total_cats, 2);
        assert_eq!(stats.total_likes, 3);
        assert_eq!(stats.distinct_likers, 2);
        assert!(stats.oldest_entry.is_some());
        assert!(stats.newest_entry.is_some());
    }
}
