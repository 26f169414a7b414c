//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Top-Reel database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Scraped movies, one row per movie link
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    title_normalized TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_movies_title_normalized ON movies(title_normalized);

-- Actors, shared across movies by their profile URL
CREATE TABLE IF NOT EXISTS actors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    name_normalized TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_actors_name_normalized ON actors(name_normalized);

-- Cast membership, position is the order on the movie page
CREATE TABLE IF NOT EXISTS movie_actors (
    movie_id INTEGER NOT NULL REFERENCES movies(id),
    actor_id INTEGER NOT NULL REFERENCES actors(id),
    position INTEGER NOT NULL,
    PRIMARY KEY (movie_id, actor_id)
);

CREATE INDEX IF NOT EXISTS idx_movie_actors_actor ON movie_actors(actor_id);

-- Facts about the last successful scrape
CREATE TABLE IF NOT EXISTS scrape_metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Drops every table owned by this schema, children first
pub const DROP_SQL: &str = r#"
DROP TABLE IF EXISTS movie_actors;
DROP TABLE IF EXISTS movies;
DROP TABLE IF EXISTS actors;
DROP TABLE IF EXISTS scrape_metadata;
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Drops and recreates the schema, leaving empty tables
pub fn recreate_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(DROP_SQL)?;
    initialize_schema(conn)
}
