//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full scrape-and-save cycle end-to-end.

use std::path::Path;
use tempfile::TempDir;
use top_reel::config::{Config, OutputConfig, ScraperConfig, ServerConfig};
use top_reel::crawler::{parse_top_pages, scrape_and_save, NoopProgress, Scraper};
use top_reel::storage::{MovieStorage, SqliteMovieStore};
use top_reel::{ConfigError, ReelError, TransportError};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing every URL at the mock server
fn create_test_config(base_url: &str, db_path: &Path) -> Config {
    Config {
        scraper: ScraperConfig {
            max_connections: 4,
            site_base_url: base_url.to_string(),
            top_list_urls: (1..=3).map(|n| format!("{}/top/{}", base_url, n)).collect(),
            request_timeout_secs: 5,
        },
        output: OutputConfig {
            database_path: db_path.to_string_lossy().into_owned(),
        },
        server: ServerConfig::default(),
    }
}

fn top_page(links: &[&str]) -> String {
    let items: String = links
        .iter()
        .map(|l| format!(r#"<h3><a class="film-title-name" href="{}">x</a></h3>"#, l))
        .collect();
    format!(
        r#"<html><body><div class="tab-content">{}</div></body></html>"#,
        items
    )
}

fn movie_page(title: &str, cast: &[(&str, &str)]) -> String {
    let anchors: String = cast
        .iter()
        .map(|(name, url)| format!(r#"<a href="{}">{}</a>, "#, url, name))
        .collect();
    format!(
        r##"<html><body><h1>{}</h1><div id="creators">
        <div><h4>Režie:</h4><a href="/tvurce/1-director/">Director</a></div>
        <div><h4>Hrají:</h4>{}<a class="more" href="#">více</a></div>
        </div></body></html>"##,
        title, anchors
    )
}

async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts three ranking pages with two movies each
async fn mount_catalog(server: &MockServer, replaced: Option<(&str, ResponseTemplate)>) {
    let pages = [
        ["/film/1-kmotr/", "/film/2-pelisky/"],
        ["/film/3-sedm/", "/film/4-zelena-mile/"],
        ["/film/5-forrest-gump/", "/film/6-obecna-skola/"],
    ];
    for (n, links) in pages.iter().enumerate() {
        mount_page(server, &format!("/top/{}", n + 1), 200, top_page(links)).await;
    }

    let titles = ["Kmotr", "Pelíšky", "Sedm", "Zelená míle", "Forrest Gump", "Obecná škola"];
    for (link, title) in pages.iter().flatten().zip(titles) {
        if let Some((replaced_link, response)) = &replaced {
            if link == replaced_link {
                Mock::given(method("GET"))
                    .and(path(*link))
                    .respond_with(response.clone())
                    .mount(server)
                    .await;
                continue;
            }
        }
        let cast = [
            ("Tom Hanks", "/tvurce/54-tom-hanks/"),
            ("Lead Actor", "/tvurce/99-lead/"),
        ];
        mount_page(server, link, 200, movie_page(title, &cast)).await;
    }
}

#[tokio::test]
async fn test_scrape_and_save_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, None).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("movies.db");
    let config = create_test_config(&mock_server.uri(), &db_path);

    let summary = scrape_and_save(&config, &NoopProgress).await.unwrap();

    assert_eq!(summary.movies, 6);
    assert_eq!(summary.actor_appearances, 12);

    let store = SqliteMovieStore::open(&db_path).unwrap();
    assert_eq!(store.count_movies().unwrap(), 6);
    // Shared actors collapse to one row each
    assert_eq!(store.count_actors().unwrap(), 2);
    assert!(store.scraped_at().unwrap().is_some());

    let found = store.search_movies("pelisky").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Pelíšky");
    assert_eq!(found[0].url, "/film/2-pelisky/");

    let cast = store.get_actors_for_movie(found[0].id).unwrap();
    let names: Vec<&str> = cast.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Tom Hanks", "Lead Actor"]);
}

#[tokio::test]
async fn test_stored_movies_follow_ranking_order() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, None).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("movies.db");
    let config = create_test_config(&mock_server.uri(), &db_path);

    scrape_and_save(&config, &NoopProgress).await.unwrap();

    let store = SqliteMovieStore::open(&db_path).unwrap();
    let hanks = &store.search_actors("hanks").unwrap()[0];
    let urls: Vec<String> = store
        .get_movies_for_actor(hanks.id)
        .unwrap()
        .into_iter()
        .map(|m| m.url)
        .collect();

    assert_eq!(
        urls,
        vec![
            "/film/1-kmotr/",
            "/film/2-pelisky/",
            "/film/3-sedm/",
            "/film/4-zelena-mile/",
            "/film/5-forrest-gump/",
            "/film/6-obecna-skola/",
        ]
    );
}

#[tokio::test]
async fn test_failed_scrape_leaves_database_intact() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("movies.db");

    let good_server = MockServer::start().await;
    mount_catalog(&good_server, None).await;
    let config = create_test_config(&good_server.uri(), &db_path);
    scrape_and_save(&config, &NoopProgress).await.unwrap();
    let scraped_at = SqliteMovieStore::open(&db_path).unwrap().scraped_at().unwrap();

    let bad_server = MockServer::start().await;
    mount_catalog(
        &bad_server,
        Some(("/film/4-zelena-mile/", ResponseTemplate::new(500))),
    )
    .await;
    let config = create_test_config(&bad_server.uri(), &db_path);
    let result = scrape_and_save(&config, &NoopProgress).await;

    assert!(result.is_err());

    let store = SqliteMovieStore::open(&db_path).unwrap();
    assert_eq!(store.count_movies().unwrap(), 6);
    assert_eq!(store.count_actors().unwrap(), 2);
    assert_eq!(store.scraped_at().unwrap(), scraped_at);
}

#[tokio::test]
async fn test_http_error_names_failing_url() {
    let mock_server = MockServer::start().await;
    mount_catalog(
        &mock_server,
        Some(("/film/5-forrest-gump/", ResponseTemplate::new(404))),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("movies.db");
    let config = create_test_config(&mock_server.uri(), &db_path);

    let err = scrape_and_save(&config, &NoopProgress).await.unwrap_err();

    match &err {
        ReelError::Transport { url, source } => {
            assert!(url.ends_with("/film/5-forrest-gump/"), "url was {}", url);
            assert!(matches!(source, TransportError::Status(404)));
        }
        other => panic!("expected transport error, got {:?}", other),
    }
    assert!(err.url().is_some());
    assert!(!db_path.exists());
}

#[tokio::test]
async fn test_unparseable_movie_aborts_scrape() {
    let mock_server = MockServer::start().await;
    // A page without the creators section
    let broken = ResponseTemplate::new(200).set_body_string("<html><body><h1>Sedm</h1></body></html>");
    mount_catalog(&mock_server, Some(("/film/3-sedm/", broken))).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("movies.db");
    let config = create_test_config(&mock_server.uri(), &db_path);

    let err = scrape_and_save(&config, &NoopProgress).await.unwrap_err();

    match err {
        ReelError::Parse { url, source } => {
            assert!(url.ends_with("/film/3-sedm/"));
            assert!(source.to_string().contains("missing creators"));
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_top_page_aborts_before_movies() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/top/1", 200, top_page(&["/film/1-kmotr/"])).await;
    mount_page(&mock_server, "/top/2", 503, String::new()).await;
    mount_page(&mock_server, "/top/3", 200, top_page(&["/film/3-sedm/"])).await;
    Mock::given(method("GET"))
        .and(path_regex("^/film/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(movie_page("x", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("movies.db"));

    let err = scrape_and_save(&config, &NoopProgress).await.unwrap_err();

    assert!(err.url().is_some_and(|u| u.ends_with("/top/2")));
}

#[tokio::test]
async fn test_fixture_ranking_over_http() {
    let mock_server = MockServer::start().await;
    let top = include_str!("../fixtures/top_page.html");
    let movie = include_str!("../fixtures/movie_page.html");
    for n in 1..=3 {
        mount_page(&mock_server, &format!("/top/{}", n), 200, top.to_string()).await;
    }
    Mock::given(method("GET"))
        .and(path_regex("^/film/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(movie))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("movies.db");
    let config = create_test_config(&mock_server.uri(), &db_path);

    let summary = scrape_and_save(&config, &NoopProgress).await.unwrap();

    // The same 99 links appear on every ranking page
    assert_eq!(summary.movies, 297);
    let store = SqliteMovieStore::open(&db_path).unwrap();
    assert_eq!(store.count_movies().unwrap(), 99);
    assert_eq!(store.count_actors().unwrap(), 32);
}

#[tokio::test]
async fn test_top_pages_over_http_build_ordered_work_list() {
    let mock_server = MockServer::start().await;
    let top = include_str!("../fixtures/top_page.html");
    for n in 1..=3 {
        Mock::given(method("GET"))
            .and(path(format!("/top/{}", n)))
            .respond_with(ResponseTemplate::new(200).set_body_string(top))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("movies.db"));
    let scraper = Scraper::from_config(config.scraper).unwrap();

    let pages = scraper.fetch_top_pages().await.unwrap();
    let links = parse_top_pages(&pages);

    assert_eq!(links.len(), 297);
    for chunk in links.chunks(99) {
        assert_eq!(chunk[0], "/film/2294-vykoupeni-z-veznice-shawshank/prehled/");
        assert_eq!(chunk[98], "/film/22205-princezna-mononoke/prehled/");
    }
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_fetching() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("movies.db");
    let mut config = create_test_config(&mock_server.uri(), &db_path);
    config.scraper.max_connections = 0;

    let result = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        scrape_and_save(&config, &NoopProgress),
    )
    .await
    .expect("an invalid config must not hang the scrape");

    assert!(matches!(
        result,
        Err(ReelError::Config(ConfigError::Validation(_)))
    ));
    assert!(!db_path.exists());
}

#[tokio::test]
async fn test_malformed_movie_link_names_the_link() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/top/1", 200, top_page(&["/film/1-kmotr/"])).await;
    mount_page(&mock_server, "/top/2", 200, top_page(&["http://[bad"])).await;
    mount_page(&mock_server, "/top/3", 200, top_page(&[])).await;
    mount_page(
        &mock_server,
        "/film/1-kmotr/",
        200,
        movie_page("Kmotr", &[("Al Pacino", "/tvurce/9/")]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("movies.db");
    let config = create_test_config(&mock_server.uri(), &db_path);

    let err = scrape_and_save(&config, &NoopProgress).await.unwrap_err();

    assert!(matches!(err, ReelError::InvalidLink { .. }));
    assert_eq!(err.url(), Some("http://[bad"));
    assert!(!db_path.exists());
}
