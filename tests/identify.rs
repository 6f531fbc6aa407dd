//! End-to-end tests over a mock HTTP server
//!
//! These exercise the full identify / download_cover paths: fetch, JSON-LD
//! plus markup extraction, search-result matching, cover caching, and the
//! degrade-to-nothing failure behavior.

use livelib_source::{
    Abort, CoverUrlCache, LivelibSource, MemoryCoverCache, Query, SourceConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Configuration pointing at the mock server, with a zero-delay rate gate
fn test_config(server: &MockServer) -> SourceConfig {
    SourceConfig {
        base_url: server.uri(),
        min_request_interval_ms: 0,
        request_timeout_secs: 2,
        ..SourceConfig::default()
    }
}

fn timeout() -> Duration {
    Duration::from_secs(2)
}

/// A complete detail page: JSON-LD block plus markup-only fields
fn detail_page(server_uri: &str) -> String {
    format!(
        r#"<html><head>
        <script type="application/ld+json">
        {{"@type":"Book",
          "name":"Ангел пролетел",
          "author":{{"name":"Татьяна Устинова"}},
          "isbn":"978-5-699-12014-9",
          "publisher":{{"name":"Эксмо"}},
          "genre":["детектив","современная проза"],
          "description":"Остросюжетный роман.",
          "aggregateRating":{{"ratingValue":4.2}},
          "image":"{server_uri}/covers/12345.jpg"}}
        </script>
        </head><body>
        <h1>Ангел пролетел</h1>
        <div><a href="/series/10">Первая среди лучших</a> #3 в серии</div>
        <span>Год издания</span><span>2002</span>
        </body></html>"#
    )
}

#[tokio::test]
async fn identify_by_id_extracts_full_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/12345"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;

    let source = LivelibSource::new(test_config(&server)).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let query = Query {
        livelib_id: Some("12345".to_string()),
        ..Query::default()
    };
    source.identify(&query, timeout(), &tx, &Abort::new()).await;
    drop(tx);

    let record = rx.recv().await.expect("one record");
    assert_eq!(record.title, "Ангел пролетел");
    assert_eq!(record.authors, vec!["Татьяна Устинова"]);
    assert_eq!(record.livelib_id.as_deref(), Some("12345"));
    assert_eq!(record.isbn.as_deref(), Some("978-5-699-12014-9"));
    assert_eq!(record.publisher.as_deref(), Some("Эксмо"));
    assert_eq!(record.tags, vec!["детектив", "современная проза"]);
    assert_eq!(record.description.as_deref(), Some("Остросюжетный роман."));
    assert_eq!(record.rating, Some(8.4));
    assert_eq!(record.series.as_deref(), Some("Первая среди лучших"));
    assert_eq!(record.series_index, Some(3));
    assert_eq!(
        record.pubdate.map(|d| d.to_string()).as_deref(),
        Some("2002-01-01")
    );
    assert_eq!(
        record.cover_url.as_deref(),
        Some(format!("{}/covers/12345.jpg", server.uri()).as_str())
    );

    // At most one record per identify call
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn identify_via_search_picks_matching_candidate() {
    let server = MockServer::start().await;

    let search_page = r#"<html><body>
        <div><a href="/book/111">Другая книга</a> Кто-то Другой</div>
        <div><a href="/book/777">Ангел пролетел</a> Татьяна Устинова</div>
    </body></html>"#;

    Mock::given(method("GET"))
        .and(path_regex("^/find/books/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/book/777"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;

    let source = LivelibSource::new(test_config(&server)).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let query = Query {
        title: Some("Ангел пролетел".to_string()),
        authors: vec!["Татьяна Устинова".to_string()],
        ..Query::default()
    };
    source.identify(&query, timeout(), &tx, &Abort::new()).await;
    drop(tx);

    let record = rx.recv().await.expect("one record");
    assert_eq!(record.title, "Ангел пролетел");
    assert_eq!(record.livelib_id.as_deref(), Some("777"));
}

#[tokio::test]
async fn identify_timeout_emits_nothing() {
    // Scenario E: the detail page hangs past the caller's timeout
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let source = LivelibSource::new(test_config(&server)).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let query = Query {
        livelib_id: Some("1".to_string()),
        ..Query::default()
    };
    source
        .identify(&query, Duration::from_millis(200), &tx, &Abort::new())
        .await;
    drop(tx);

    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn identify_http_error_emits_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = LivelibSource::new(test_config(&server)).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let query = Query {
        livelib_id: Some("404".to_string()),
        ..Query::default()
    };
    source.identify(&query, timeout(), &tx, &Abort::new()).await;
    drop(tx);

    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn identify_aborted_before_start_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/12345"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(&server.uri())))
        .expect(0)
        .mount(&server)
        .await;

    let source = LivelibSource::new(test_config(&server)).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let abort = Abort::new();
    abort.set();

    let query = Query {
        livelib_id: Some("12345".to_string()),
        ..Query::default()
    };
    source.identify(&query, timeout(), &tx, &abort).await;
    drop(tx);

    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn identify_populates_cover_cache_for_later_download() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/12345"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/covers/12345.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(MemoryCoverCache::new());
    let source = LivelibSource::with_cache(test_config(&server), cache.clone()).unwrap();

    let query = Query {
        livelib_id: Some("12345".to_string()),
        ..Query::default()
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    source.identify(&query, timeout(), &tx, &Abort::new()).await;
    drop(tx);
    rx.recv().await.expect("identify record");

    assert_eq!(
        cache.get("livelib:12345"),
        Some(format!("{}/covers/12345.jpg", server.uri()))
    );

    // The cached URL means the book page is NOT fetched again (expect(1))
    let (tx, mut rx) = mpsc::unbounded_channel();
    source
        .download_cover(&query, timeout(), &tx, &Abort::new())
        .await;
    drop(tx);

    let cover = rx.recv().await.expect("one cover");
    assert_eq!(cover.source, "Livelib.ru");
    assert_eq!(cover.bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);
}

#[tokio::test]
async fn download_cover_refetches_page_on_cold_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/12345"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/covers/12345.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .expect(1)
        .mount(&server)
        .await;

    let source = LivelibSource::new(test_config(&server)).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let query = Query {
        livelib_id: Some("12345".to_string()),
        ..Query::default()
    };
    source
        .download_cover(&query, timeout(), &tx, &Abort::new())
        .await;
    drop(tx);

    let cover = rx.recv().await.expect("one cover");
    assert_eq!(cover.bytes, vec![1, 2, 3]);
}

#[tokio::test]
async fn search_with_no_results_emits_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/find/books/.+$"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Ничего не найдено</body></html>"),
        )
        .mount(&server)
        .await;

    let source = LivelibSource::new(test_config(&server)).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let query = Query {
        title: Some("Несуществующая книга".to_string()),
        ..Query::default()
    };
    source.identify(&query, timeout(), &tx, &Abort::new()).await;
    drop(tx);

    assert!(rx.recv().await.is_none());
}
