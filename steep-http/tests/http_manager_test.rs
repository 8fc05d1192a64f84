use steep_http::{HttpClient, HttpError, HttpManager, HttpMethod};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_cookies_survive_between_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webui/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=abc123; Path=/")
                .set_body_string("<html>login</html>"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/webui/cart"))
        .and(header("cookie", "JSESSIONID=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("cart"))
        .mount(&server)
        .await;

    let manager = HttpManager::new().unwrap();
    manager
        .get(&format!("{}/webui/login", server.uri()))
        .await
        .unwrap();
    let cart = manager
        .get(&format!("{}/webui/cart", server.uri()))
        .await
        .unwrap();

    assert_eq!(cart.status, 200);
    assert_eq!(cart.body, "cart");
}

#[tokio::test]
async fn test_post_form_is_url_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webui/loginAction"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=user1"))
        .and(body_string_contains("_csrf=tok%2Fen"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<a>Logout</a>"))
        .mount(&server)
        .await;

    let manager = HttpManager::new().unwrap();
    let form = vec![
        ("username".to_string(), "user1".to_string()),
        ("_csrf".to_string(), "tok/en".to_string()),
    ];
    let page = manager
        .post_form(&format!("{}/webui/loginAction", server.uri()), &form)
        .await
        .unwrap();

    assert_eq!(page.method, HttpMethod::Post);
    assert!(page.is_success());
    assert!(page.body.contains("Logout"));
}

#[tokio::test]
async fn test_redirect_reports_final_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/new", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;

    let manager = HttpManager::new().unwrap();
    let page = manager
        .fetch(HttpMethod::Get, &format!("{}/old", server.uri()), None)
        .await
        .unwrap();

    assert_eq!(page.status, 200);
    assert!(page.url.ends_with("/new"));
}

#[tokio::test]
async fn test_reset_database_requires_200() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ok/services/rest/persistence/reset"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/broken/services/rest/persistence/reset"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let manager = HttpManager::new().unwrap();
    manager
        .reset_database(&format!("{}/ok/services/rest/persistence/reset", server.uri()))
        .await
        .unwrap();

    let err = manager
        .reset_database(&format!("{}/broken/services/rest/persistence/reset", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::UnexpectedStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_invalid_url() {
    let manager = HttpManager::new().unwrap();
    let err = manager.get("not a url").await.unwrap_err();
    assert!(matches!(err, HttpError::InvalidUrl(_)));
}
