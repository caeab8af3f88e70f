use tweetsheet_sheets::SheetSource;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CSV_BODY: &str = "\"Tweet\",\"Hashtag\"\n\"Big news today\",\"#tech\"\n\"Rainy weather\",\"#weather\"\n";

#[tokio::test]
async fn fetches_rows_from_gviz_export() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/abc123/gviz/tq"))
        .and(query_param("tqx", "out:csv"))
        .and(query_param("sheet", "My Tab"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CSV_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let source = SheetSource::with_base_url(&server.uri()).unwrap();
    let rows = source.fetch_rows("abc123", "My Tab").await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].content, "Big news today");
    assert_eq!(rows[1].tag, "#weather");
}

#[tokio::test]
async fn fetch_failure_surfaces_as_sheet_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let source = SheetSource::with_base_url(&server.uri()).unwrap();
    let err = source.fetch_rows("nope", "Tab").await.unwrap_err();

    assert!(err.to_string().contains("Sheet"));
}

#[tokio::test]
async fn empty_sheet_returns_no_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Tweet,Hashtag\n"))
        .mount(&server)
        .await;

    let source = SheetSource::with_base_url(&server.uri()).unwrap();
    let rows = source.fetch_rows("abc123", "Tab").await.unwrap();
    assert!(rows.is_empty());
}
