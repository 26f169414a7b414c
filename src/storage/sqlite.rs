//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the MovieStorage trait.

use crate::crawler::MoviePage;
use crate::storage::schema::{initialize_schema, recreate_schema};
use crate::storage::traits::{MovieStorage, StorageResult};
use crate::storage::{ActorRecord, MovieRecord};
use crate::text::normalize;
use chrono::Utc;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

const SCRAPED_AT_KEY: &str = "scraped_at";

/// SQLite storage backend
pub struct SqliteMovieStore {
    conn: Connection,
}

impl SqliteMovieStore {
    /// Opens or creates a database file for writing
    ///
    /// Missing parent directories are created and the schema is initialized
    /// if absent.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Opens an existing database without write access
    ///
    /// A missing file is not an error: the web view starts with an empty
    /// in-memory store instead.
    pub fn open_read_only(path: &Path) -> StorageResult<Self> {
        if !path.exists() {
            tracing::warn!(
                "Database {} not found, serving an empty store",
                path.display()
            );
            return Self::open_in_memory();
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Creates an empty in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count(&self, table: &str) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }
}

fn movie_from_row(row: &Row<'_>) -> rusqlite::Result<MovieRecord> {
    Ok(MovieRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        title: row.get(2)?,
    })
}

fn actor_from_row(row: &Row<'_>) -> rusqlite::Result<ActorRecord> {
    Ok(ActorRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
    })
}

/// Builds a `LIKE` pattern matching `query` as a literal substring of a
/// normalized column. `\` is the escape character.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::from("%");
    for c in normalize(query).chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl MovieStorage for SqliteMovieStore {
    // ===== Bulk Write =====

    fn replace_all(&mut self, movies: &[MoviePage]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        recreate_schema(&tx)?;

        let mut actor_appearances = 0usize;
        {
            let mut insert_movie = tx.prepare(
                "INSERT INTO movies (url, title, title_normalized) VALUES (?1, ?2, ?3)",
            )?;
            let mut insert_actor = tx.prepare(
                "INSERT INTO actors (name, url, name_normalized) VALUES (?1, ?2, ?3)",
            )?;
            let mut link_actor = tx.prepare(
                "INSERT OR IGNORE INTO movie_actors (movie_id, actor_id, position)
                 VALUES (?1, ?2, ?3)",
            )?;

            let mut movie_ids: HashMap<&str, i64> = HashMap::new();
            let mut actor_ids: HashMap<&str, i64> = HashMap::new();

            for movie in movies {
                if movie_ids.contains_key(movie.url.as_str()) {
                    tracing::debug!("Skipping repeated movie link {}", movie.url);
                    continue;
                }

                let movie_id =
                    insert_movie.insert(params![movie.url, movie.title, normalize(&movie.title)])?;
                movie_ids.insert(&movie.url, movie_id);

                for (position, actor) in movie.actors.iter().enumerate() {
                    let actor_id = match actor_ids.get(actor.url.as_str()) {
                        Some(&id) => id,
                        None => {
                            let id = insert_actor.insert(params![
                                actor.name,
                                actor.url,
                                normalize(&actor.name)
                            ])?;
                            actor_ids.insert(&actor.url, id);
                            id
                        }
                    };
                    actor_appearances +=
                        link_actor.execute(params![movie_id, actor_id, position as i64])?;
                }
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO scrape_metadata (key, value) VALUES (?1, ?2)",
            params![SCRAPED_AT_KEY, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        tracing::info!(
            "Replaced store contents: {} movies, {} cast links",
            movies.len(),
            actor_appearances
        );
        Ok(())
    }

    // ===== Search =====

    fn search_movies(&self, query: &str) -> StorageResult<Vec<MovieRecord>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, url, title FROM movies
             WHERE title_normalized LIKE ?1 ESCAPE '\\'
             ORDER BY id",
        )?;
        let movies = stmt
            .query_map(params![like_pattern(query)], movie_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(movies)
    }

    fn search_actors(&self, query: &str) -> StorageResult<Vec<ActorRecord>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, name, url FROM actors
             WHERE name_normalized LIKE ?1 ESCAPE '\\'
             ORDER BY id",
        )?;
        let actors = stmt
            .query_map(params![like_pattern(query)], actor_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(actors)
    }

    // ===== Lookup =====

    fn get_movie(&self, movie_id: i64) -> StorageResult<Option<MovieRecord>> {
        let movie = self
            .conn
            .query_row(
                "SELECT id, url, title FROM movies WHERE id = ?1",
                params![movie_id],
                movie_from_row,
            )
            .optional()?;
        Ok(movie)
    }

    fn get_actors_for_movie(&self, movie_id: i64) -> StorageResult<Vec<ActorRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.name, a.url FROM actors a
             JOIN movie_actors ma ON ma.actor_id = a.id
             WHERE ma.movie_id = ?1
             ORDER BY ma.position",
        )?;
        let actors = stmt
            .query_map(params![movie_id], actor_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(actors)
    }

    fn get_actor(&self, actor_id: i64) -> StorageResult<Option<ActorRecord>> {
        let actor = self
            .conn
            .query_row(
                "SELECT id, name, url FROM actors WHERE id = ?1",
                params![actor_id],
                actor_from_row,
            )
            .optional()?;
        Ok(actor)
    }

    fn get_movies_for_actor(&self, actor_id: i64) -> StorageResult<Vec<MovieRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.url, m.title FROM movies m
             JOIN movie_actors ma ON ma.movie_id = m.id
             WHERE ma.actor_id = ?1
             ORDER BY m.id",
        )?;
        let movies = stmt
            .query_map(params![actor_id], movie_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(movies)
    }

    // ===== Statistics =====

    fn count_movies(&self) -> StorageResult<u64> {
        self.count("movies")
    }

    fn count_actors(&self) -> StorageResult<u64> {
        self.count("actors")
    }

    fn scraped_at(&self) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM scrape_metadata WHERE key = ?1",
                params![SCRAPED_AT_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}
