//! End-to-end pipeline runs against mock HTTP servers.

use std::time::Duration;

use openai_client::OpenAIClient;
use serde_json::json;
use web_summarizer::testing::{summary_json, MockGenerator};
use web_summarizer::{
    Category, Config, ErrorCode, FetchConfig, HttpFetcher, Pipeline, SummaryOptions,
    SummaryRequest,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROSE: &str = "The city council approved a plan to expand broadband access to rural \
    neighborhoods. Officials said the first phase begins next spring and will reach four \
    thousand homes. Residents have waited years for reliable service. ";

fn article_html() -> String {
    let body = PROSE.repeat(4);
    format!(
        "<html><head><title>Broadband Plan</title></head><body>\
         <nav><a href='/'>Home</a><a href='/news'>News</a></nav>\
         <article><p>{}</p></article>\
         <footer>Contact us</footer></body></html>",
        body.trim()
    )
}

async fn serve_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html, "text/html; charset=UTF-8"),
        )
        .mount(server)
        .await;
}

fn pipeline(generator: MockGenerator) -> Pipeline<HttpFetcher, MockGenerator> {
    let config = Config {
        fetch: FetchConfig {
            timeout: Duration::from_secs(2),
            ..FetchConfig::default()
        },
        ..Config::default()
    };
    let fetcher = HttpFetcher::new(&config.fetch).unwrap();
    Pipeline::new(&config, fetcher, generator)
}

#[tokio::test]
async fn test_article_summarized_end_to_end() {
    let server = MockServer::start().await;
    serve_page(&server, "/story", article_html()).await;

    let pipeline = pipeline(MockGenerator::new().with_reply(summary_json("Technology", 4), 210));
    let url = format!("{}/story", server.uri());
    let response = pipeline.run(SummaryRequest::new(&url)).await;

    assert!(response.is_success(), "{:?}", response.error());
    let data = response.data().unwrap();
    assert_eq!(data.url, url);
    assert_eq!(data.title, "Broadband Plan");
    assert_eq!(data.key_points.len(), 4);
    assert_eq!(data.category, Category::Technology);
    assert_eq!(data.metadata.tokens_used, 210);
    assert!(data.metadata.content_length >= 600);

    let prompt = &pipeline.generator().calls()[0].messages[1].content;
    assert!(prompt.contains("broadband access"));
    assert!(!prompt.contains("Contact us"));

    let wire = serde_json::to_value(&response).unwrap();
    assert_eq!(wire["success"], true);
    assert!(wire["error"].is_null());
    assert_eq!(wire["data"]["metadata"]["extraction_method"], "readability");
}

#[tokio::test]
async fn test_missing_page_reports_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let pipeline = pipeline(MockGenerator::new());
    let response = pipeline
        .run(SummaryRequest::new(format!("{}/gone", server.uri())))
        .await;

    assert!(!response.is_success());
    assert_eq!(response.error_code(), Some(ErrorCode::NotFound));

    let wire = serde_json::to_value(&response).unwrap();
    assert_eq!(wire["success"], false);
    assert!(wire["data"].is_null());
    assert_eq!(wire["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_excess_key_points_are_trimmed() {
    let server = MockServer::start().await;
    serve_page(&server, "/story", article_html()).await;

    let pipeline = pipeline(MockGenerator::new().with_reply(summary_json("Politics", 7), 90));
    let request = SummaryRequest::new(format!("{}/story", server.uri()))
        .with_options(SummaryOptions::default().with_key_points(5));
    let response = pipeline.run(request).await;

    assert_eq!(response.data().unwrap().key_points.len(), 5);
}

#[tokio::test]
async fn test_missing_summary_after_repair_fails() {
    let server = MockServer::start().await;
    serve_page(&server, "/story", article_html()).await;

    let broken = json!({"key_points": ["one"], "category": "Other"}).to_string();
    let pipeline = pipeline(MockGenerator::new().with_reply(broken, 30));
    let response = pipeline
        .run(SummaryRequest::new(format!("{}/story", server.uri())))
        .await;

    assert_eq!(response.error_code(), Some(ErrorCode::SummarizationFailed));
    assert_eq!(pipeline.generator().calls().len(), 2);
}

#[tokio::test]
async fn test_openai_backend_end_to_end() {
    let pages = MockServer::start().await;
    serve_page(&pages, "/story", article_html()).await;

    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Broadband Plan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {"role": "assistant", "content": summary_json("Politics", 3)},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 400, "completion_tokens": 60, "total_tokens": 460}
        })))
        .mount(&api)
        .await;

    let config = Config::default();
    let fetcher = HttpFetcher::new(&config.fetch).unwrap();
    let generator = OpenAIClient::new("sk-test").with_base_url(api.uri());
    let pipeline = Pipeline::new(&config, fetcher, generator);

    let request = SummaryRequest::new(format!("{}/story", pages.uri()))
        .with_options(SummaryOptions::default().with_key_points(3));
    let response = pipeline.run(request).await;

    let data = response.data().expect("successful response");
    assert_eq!(data.category, Category::Politics);
    assert_eq!(data.key_points.len(), 3);
    assert_eq!(data.metadata.tokens_used, 460);
}

#[tokio::test]
async fn test_openai_auth_failure_is_api_error() {
    let pages = MockServer::start().await;
    serve_page(&pages, "/story", article_html()).await;

    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided"}
        })))
        .mount(&api)
        .await;

    let config = Config::default();
    let fetcher = HttpFetcher::new(&config.fetch).unwrap();
    let generator = OpenAIClient::new("sk-bad").with_base_url(api.uri());
    let pipeline = Pipeline::new(&config, fetcher, generator);

    let response = pipeline
        .run(SummaryRequest::new(format!("{}/story", pages.uri())))
        .await;
    assert_eq!(response.error_code(), Some(ErrorCode::AiApiError));
}
