//! Integration tests for the harvester
//!
//! These tests use wiremock to stand up mock sites and run the full
//! load -> expand -> fetch -> extract -> checkpoint cycle end-to-end.

use contact_harvest::config::{load_config, Config};
use contact_harvest::harvest::{load_candidates, run_harvest};
use contact_harvest::output::{read_csv_rows, read_sqlite_rows, SqliteCheckpoint};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROUTES: &[&str] = &["/contact", "/about"];

/// Writes input lists and a TOML config into `dir`, then loads it
fn write_config(dir: &TempDir, origins: &[String], extra: &str, format: &str) -> Config {
    let origins_path = dir.path().join("origins.csv");
    let routes_path = dir.path().join("routes.csv");
    let config_path = dir.path().join("harvest.toml");

    let mut origins_csv = String::from("Name,URL\n");
    for origin in origins {
        origins_csv.push_str(&format!("site,{}\n", origin));
    }
    std::fs::write(&origins_path, origins_csv).unwrap();
    std::fs::write(&routes_path, format!("Route\n{}\n", ROUTES.join("\n"))).unwrap();

    let toml = format!(
        r#"
[harvest]
max-workers = 4
{extra}

[http]
request-timeout-secs = 1
user-agent = "HarvestTest/1.0"

[input]
origins-path = "{origins}"
routes-path = "{routes}"

[output]
checkpoint-path = "{checkpoint}"
format = "{format}"
"#,
        extra = extra,
        origins = origins_path.display(),
        routes = routes_path.display(),
        checkpoint = checkpoint_path(dir, format).display(),
        format = format,
    );
    std::fs::write(&config_path, toml).unwrap();

    load_config(&config_path).unwrap()
}

fn checkpoint_path(dir: &TempDir, format: &str) -> PathBuf {
    match format {
        "sqlite" => dir.path().join("out/emails.db"),
        _ => dir.path().join("out/emails.csv"),
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

/// Mounts a site with addresses on the root and contact pages
async fn mount_contact_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="mailto:Info@Example.com?subject=Hi">Mail us</a>
               <p>Sales: sales@example.com</p>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html("<p>Support: support@example.com</p>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>We make things.</p>"))
        .mount(server)
        .await;
}

fn emails(list: &[&str]) -> Vec<String> {
    list.iter().map(|e| e.to_string()).collect()
}

#[tokio::test]
async fn test_harvest_single_origin() {
    let server = MockServer::start().await;
    mount_contact_site(&server).await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[server.uri()], "", "csv");

    let report = run_harvest(&config).await.unwrap();
    assert_eq!(report.total_candidates, 3);
    assert_eq!(report.counts.harvested, 2);
    assert_eq!(report.counts.empty, 1);

    let rows = read_csv_rows(&checkpoint_path(&dir, "csv")).unwrap();
    assert_eq!(
        rows,
        vec![(
            server.uri(),
            emails(&["Info@Example.com", "sales@example.com", "support@example.com"])
        )]
    );
}

#[tokio::test]
async fn test_request_headers() {
    let server = MockServer::start().await;

    // Only requests carrying the configured identity get the page
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "HarvestTest/1.0"))
        .and(header("accept", "text/html"))
        .respond_with(html("<p>agent@example.com</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[server.uri()], "", "csv");

    let report = run_harvest(&config).await.unwrap();
    assert_eq!(report.counts.harvested, 1);

    let rows = read_csv_rows(&checkpoint_path(&dir, "csv")).unwrap();
    assert_eq!(rows, vec![(server.uri(), emails(&["agent@example.com"]))]);
}

#[tokio::test]
async fn test_failed_pages_contribute_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>hello@example.com</p>"))
        .mount(&server)
        .await;

    // 404 page that would otherwise yield an address
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("<p>hidden@example.com</p>"),
        )
        .mount(&server)
        .await;

    // Slower than the 1 second request timeout
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>slow@example.com</p>").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[server.uri()], "", "csv");

    let report = run_harvest(&config).await.unwrap();
    assert_eq!(report.counts.harvested, 1);
    assert_eq!(report.counts.non_success, 1);
    assert_eq!(report.counts.network_failures, 1);

    let rows = read_csv_rows(&checkpoint_path(&dir, "csv")).unwrap();
    assert_eq!(rows, vec![(server.uri(), emails(&["hello@example.com"]))]);
}

#[tokio::test]
async fn test_unreachable_origin_keeps_run_going() {
    let server = MockServer::start().await;
    mount_contact_site(&server).await;

    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &["http://127.0.0.1:9".to_string(), server.uri()],
        "batch-size = 2",
        "csv",
    );

    let report = run_harvest(&config).await.unwrap();
    assert_eq!(report.batches, 3);
    assert_eq!(report.counts.network_failures, 3);

    let rows = read_csv_rows(&checkpoint_path(&dir, "csv")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, server.uri());
}

#[tokio::test]
async fn test_duplicate_urls_requested_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>once@example.com</p>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html(""))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(""))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let origins = vec![server.uri(), format!("{}/", server.uri())];
    let config = write_config(&dir, &origins, "batch-size = 1", "csv");

    run_harvest(&config).await.unwrap();

    // First spelling owns the URLs
    let rows = read_csv_rows(&checkpoint_path(&dir, "csv")).unwrap();
    assert_eq!(rows, vec![(server.uri(), emails(&["once@example.com"]))]);
}

#[tokio::test]
async fn test_batch_size_does_not_change_checkpoint() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    mount_contact_site(&first).await;
    Mock::given(method("GET"))
        .respond_with(html("<p>desk@acme.org</p>"))
        .mount(&second)
        .await;

    let origins = vec![first.uri(), second.uri()];
    let mut snapshots = Vec::new();

    for extra in ["batch-size = 1", "batch-size = 4", "batch-size = 1000"] {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, &origins, extra, "csv");
        run_harvest(&config).await.unwrap();
        snapshots.push(std::fs::read(checkpoint_path(&dir, "csv")).unwrap());
    }

    assert!(snapshots.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn test_redirects_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", "/contact-us"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact-us"))
        .respond_with(html("<p>moved@example.com</p>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[server.uri()], "", "csv");

    run_harvest(&config).await.unwrap();

    let rows = read_csv_rows(&checkpoint_path(&dir, "csv")).unwrap();
    assert_eq!(rows, vec![(server.uri(), emails(&["moved@example.com"]))]);
}

#[tokio::test]
async fn test_sqlite_checkpoint() {
    let server = MockServer::start().await;
    mount_contact_site(&server).await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[server.uri()], "batch-size = 2", "sqlite");

    run_harvest(&config).await.unwrap();

    let db_path = checkpoint_path(&dir, "sqlite");
    let rows = read_sqlite_rows(&db_path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1.len(), 3);

    let checkpoint = SqliteCheckpoint::open(&db_path).unwrap();
    assert_eq!(checkpoint.checkpoint_count().unwrap(), 2);
}

#[tokio::test]
async fn test_previous_checkpoint_replaced() {
    let server = MockServer::start().await;
    mount_contact_site(&server).await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[server.uri()], "", "csv");
    let checkpoint = checkpoint_path(&dir, "csv");
    std::fs::create_dir_all(checkpoint.parent().unwrap()).unwrap();
    std::fs::write(&checkpoint, "URL,Emails\nstale.com,old@stale.com\n").unwrap();

    run_harvest(&config).await.unwrap();

    let rows = read_csv_rows(&checkpoint).unwrap();
    assert!(rows.iter().all(|(origin, _)| origin != "stale.com"));
}

#[tokio::test]
async fn test_empty_origin_list() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[], "", "csv");

    assert!(load_candidates(&config).unwrap().is_empty());

    let report = run_harvest(&config).await.unwrap();
    assert_eq!(report.batches, 0);

    let checkpoint = checkpoint_path(&dir, "csv");
    assert!(Path::new(&checkpoint).exists());
    assert!(read_csv_rows(&checkpoint).unwrap().is_empty());
}
