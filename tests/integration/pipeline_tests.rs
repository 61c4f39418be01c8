//! Integration tests for the search pipeline
//!
//! These tests use wiremock as the proxy every request is routed through, so the
//! platform host in the configuration is never contacted directly.

use hub_sift::config::{parse_config, HttpConfig, ScraperConfig, SearchConfig};
use hub_sift::crawler::{fetch_links, FetchResult, HttpFetcher, PageFetcher, Pipeline, ProxyPool};
use hub_sift::{LanguageStats, ResourceRecord, ResourceType, ScrapeError, SearchOutcome, SearchRequest};
use std::collections::HashMap;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GITHUB_REPOSITORY_INFORMATION: &str = r##"<ul class="list-style-none">
    <li class="d-inline">
        <a class="d-inline-flex flex-items-center flex-nowrap Link--secondary no-underline text-small mr-3" data-ga-click="Repository, language stats search click, location:repo overview" href="/atuldjadhav/DropBox-Cloud-Storage/search?l=css">
          <svg aria-hidden="true" class="octicon octicon-dot-fill mr-2" data-view-component="true" height="16" style="color:#563d7c;" version="1.1" viewBox="0 0 16 16" width="16">
    <path d="M8 4a4 4 0 1 1 0 8 4 4 0 0 1 0-8Z"></path>
</svg>
          <span class="color-fg-default text-bold mr-1">CSS</span>
          <span>52.0%</span>
        </a>
    </li>
    <li class="d-inline">
        <a class="d-inline-flex flex-items-center flex-nowrap Link--secondary no-underline text-small mr-3" data-ga-click="Repository, language stats search click, location:repo overview" href="/atuldjadhav/DropBox-Cloud-Storage/search?l=javascript">
          <svg aria-hidden="true" class="octicon octicon-dot-fill mr-2" data-view-component="true" height="16" style="color:#f1e05a;" version="1.1" viewBox="0 0 16 16" width="16">
    <path d="M8 4a4 4 0 1 1 0 8 4 4 0 0 1 0-8Z"></path>
</svg>
          <span class="color-fg-default text-bold mr-1">JavaScript</span>
          <span>47.2%</span>
        </a>
    </li>
    <li class="d-inline">
        <a class="d-inline-flex flex-items-center flex-nowrap Link--secondary no-underline text-small mr-3" data-ga-click="Repository, language stats search click, location:repo overview" href="/atuldjadhav/DropBox-Cloud-Storage/search?l=html">
          <svg aria-hidden="true" class="octicon octicon-dot-fill mr-2" data-view-component="true" height="16" style="color:#e34c26;" version="1.1" viewBox="0 0 16 16" width="16">
    <path d="M8 4a4 4 0 1 1 0 8 4 4 0 0 1 0-8Z"></path>
</svg>
          <span class="color-fg-default text-bold mr-1">HTML</span>
          <span>0.8%</span>
        </a>
    </li>
</ul>"##;

const GITHUB_REPOSITORY_LIST: &str = r##"<body>{"payload": {"results": [{"id": "55005225", "archived": false, "color": "#563d7c", "followers": 0, "has_funding_file": false, "hl_name": "atuldjadhav/DropBox-Cloud-Storage", "hl_trunc_description": "Technologies:- Openstack NOVA, NEUTRON, SWIFT, CINDER API's, JAVA, JAX-RS, MAVEN, JSON, HTML5, CSS, JAVASCRIPT, ANGULARJS", "language": "CSS", "mirror": false, "owned_by_organization": false, "public": true, "repo": {"repository": {"id": 55005225, "name": "DropBox-Cloud-Storage", "owner_id": 17938694, "owner_login": "atuldjadhav", "updated_at": "2016-03-29T19:40:33.966Z", "has_issues": true}}, "sponsorable": false, "topics": [], "type": "Public", "help_wanted_issues_count": 0, "good_first_issue_issues_count": 0, "starred_by_current_user": false}]}}</body>"##;

const ISSUE_LIST: &str = r#"<body>{"payload": {"results": [{"repo": {"repository": {"name": "myrepo", "owner_login": "myuser"}}, "number": 42, "hl_title": "MyTitle"}]}}</body>"#;

/// Host that must never be resolved; everything goes through the mock proxy
const UNREACHABLE_BASE: &str = "http://github.com";

fn expected_language_stats() -> LanguageStats {
    [("CSS", 52.0), ("JavaScript", 47.2), ("HTML", 0.8)]
        .into_iter()
        .collect()
}

/// Creates a configuration that routes every request through `proxy`
fn create_test_config(resource_type: &str, proxy: String) -> ScraperConfig {
    ScraperConfig {
        search: SearchConfig {
            keywords: vec!["openstack".to_string(), "nova".to_string(), "css".to_string()],
            resource_type: resource_type.to_string(),
            proxies: vec![proxy],
        },
        http: HttpConfig {
            base_url: UNREACHABLE_BASE.to_string(),
            timeout_secs: 10,
            max_concurrent_fetches: 4,
            user_agent: "TestBot/1.0".to_string(),
        },
    }
}

fn fetcher_through(mock_server: &MockServer) -> HttpFetcher {
    let config = create_test_config("Repositories", mock_server.address().to_string());
    let proxies = ProxyPool::new(config.search.proxies.clone()).expect("Failed to build pool");
    HttpFetcher::new(&config.http, &proxies).expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_fetch_success_returns_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Mock HTML Content"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_through(&mock_server);
    let result = fetcher.fetch("path").await;

    assert_eq!(result.into_body(), Some(b"Mock HTML Content".to_vec()));
}

#[tokio::test]
async fn test_fetch_non_200_returns_no_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Mock HTML Content"))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_through(&mock_server);
    let result = fetcher.fetch("path").await;

    assert!(matches!(result, FetchResult::HttpError { status_code: 500 }));
}

#[tokio::test]
async fn test_fetch_other_success_codes_are_not_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_through(&mock_server);
    assert!(fetcher.fetch("path").await.into_body().is_none());
}

#[tokio::test]
async fn test_unreachable_proxy_is_network_error() {
    // Bind and immediately release a port so nothing listens on it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        listener.local_addr().expect("No local addr").port()
    };

    let config = create_test_config("Issues", format!("127.0.0.1:{}", port));
    let proxies = ProxyPool::new(config.search.proxies.clone()).expect("Failed to build pool");
    let fetcher = HttpFetcher::new(&config.http, &proxies).expect("Failed to build fetcher");

    let result = fetcher.fetch("path").await;
    assert!(matches!(result, FetchResult::NetworkError { .. }));
}

#[tokio::test]
async fn test_repository_search_through_proxy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GITHUB_REPOSITORY_LIST))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/atuldjadhav/DropBox-Cloud-Storage"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GITHUB_REPOSITORY_INFORMATION))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config("Repositories", mock_server.address().to_string());
    let outcome = fetch_links(&config).await;

    let records = match outcome {
        SearchOutcome::Matches(records) => records,
        other => panic!("Expected matches, got {:?}", other),
    };

    assert_eq!(records.len(), 1);
    match &records[0] {
        ResourceRecord::Repository { link, extra } => {
            assert_eq!(link, "http://github.com/atuldjadhav/DropBox-Cloud-Storage");
            assert_eq!(extra.owner, "atuldjadhav");
            assert_eq!(extra.language_stats, expected_language_stats());
        }
        other => panic!("Expected a repository record, got {:?}", other),
    }
}

#[tokio::test]
async fn test_issue_search_from_config_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ISSUE_LIST))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config_content = format!(
        r#"
[search]
keywords = ["openstack", "nova"]
type = "Issues"
proxies = ["{}"]

[http]
base-url = "{}"
timeout-secs = 10
"#,
        mock_server.address(),
        UNREACHABLE_BASE
    );

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(config_content.as_bytes())
        .expect("Failed to write config");
    let config = hub_sift::config::load_config(file.path()).expect("Failed to load config");

    let records = fetch_links(&config).await.into_records();
    assert_eq!(
        records,
        vec![ResourceRecord::Link {
            url: "http://github.com/myuser/myrepo/issues/42".to_string()
        }]
    );
}

#[tokio::test]
async fn test_failed_search_page_skips_secondary_fetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    // Should never be called
    Mock::given(method("GET"))
        .and(path("/atuldjadhav/DropBox-Cloud-Storage"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GITHUB_REPOSITORY_INFORMATION))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config("Repositories", mock_server.address().to_string());
    let outcome = fetch_links(&config).await;

    assert!(matches!(
        outcome.error(),
        Some(ScrapeError::Fetch { reason, .. }) if reason == "HTTP 503"
    ));
    assert!(outcome.into_records().is_empty());
}

#[tokio::test]
async fn test_payload_without_results_is_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<body>{"test": "Mock HTML Content"}</body>"#),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config("Repositories", mock_server.address().to_string());
    let outcome = fetch_links(&config).await;

    assert!(matches!(outcome.error(), Some(ScrapeError::MissingResults)));
    assert!(outcome.records().is_empty());
}

#[tokio::test]
async fn test_empty_proxy_list_fails_before_any_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config("Issues", mock_server.address().to_string());
    config.search.proxies.clear();

    let outcome = fetch_links(&config).await;
    assert!(matches!(outcome.error(), Some(ScrapeError::EmptyProxyPool)));
}

/// Serves fixed pages by path, standing in for the platform
struct FixturePages(HashMap<&'static str, &'static str>);

impl PageFetcher for FixturePages {
    async fn fetch(&self, path: &str) -> FetchResult {
        match self.0.get(path) {
            Some(body) => FetchResult::Success {
                body: body.as_bytes().to_vec(),
            },
            None => FetchResult::HttpError { status_code: 404 },
        }
    }
}

#[tokio::test]
async fn test_repository_search_against_github_base() {
    let pages = FixturePages(HashMap::from([
        (
            "search?q=openstack+nova+css&type=Repositories",
            GITHUB_REPOSITORY_LIST,
        ),
        (
            "atuldjadhav/DropBox-Cloud-Storage",
            GITHUB_REPOSITORY_INFORMATION,
        ),
    ]));

    let config = parse_config("[search]\ntype = \"Repositories\"\n").expect("Failed to parse");
    let request = SearchRequest::new(
        ["openstack", "nova", "css"],
        ResourceType::Repositories,
        ["194.126.37.94:8080", "13.78.125.167:8080"],
    )
    .expect("Failed to build request");

    let records = Pipeline::new(pages, &config.http)
        .run(&request)
        .await
        .expect("Search failed");

    let json = serde_json::to_value(&records).expect("Failed to serialize");
    assert_eq!(
        json,
        serde_json::json!([{
            "link": "https://github.com/atuldjadhav/DropBox-Cloud-Storage",
            "extra": {
                "owner": "atuldjadhav",
                "language_stats": {"CSS": 52.0, "JavaScript": 47.2, "HTML": 0.8}
            }
        }])
    );
}
