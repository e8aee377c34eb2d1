//! E2E tests for secret submission and the aggregate listing

mod common;

use common::{TestServer, location, no_redirect_client};

#[tokio::test]
async fn test_secrets_page_is_public() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_submit_requires_authentication() {
    let server = TestServer::new().await;
    let client = no_redirect_client();

    // The form page redirects anonymous visitors to the login page
    let response = client
        .get(server.url("/submit"))
        .send()
        .await
        .expect("request succeeds");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    // So does an anonymous POST, without mutating anything
    let response = client
        .post(server.url("/submit"))
        .form(&[("secret", "sneaky anonymous secret")])
        .send()
        .await
        .expect("request succeeds");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    let body = server
        .client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("response body");
    assert!(!body.contains("sneaky anonymous secret"));
}

#[tokio::test]
async fn test_submitted_secret_appears_in_listing() {
    let server = TestServer::new().await;
    let client = no_redirect_client();

    let session = server.register("alice", "a fine password").await;

    let response = client
        .post(server.url("/submit"))
        .header(reqwest::header::COOKIE, &session)
        .form(&[("secret", "I sing in the shower")])
        .send()
        .await
        .expect("request succeeds");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/secrets");

    let body = server
        .client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("response body");
    assert!(body.contains("I sing in the shower"));
}

#[tokio::test]
async fn test_second_submission_overwrites_first() {
    let server = TestServer::new().await;
    let client = no_redirect_client();

    let session = server.register("bob", "a fine password").await;

    for secret in ["the first secret", "the second secret"] {
        client
            .post(server.url("/submit"))
            .header(reqwest::header::COOKIE, &session)
            .form(&[("secret", secret)])
            .send()
            .await
            .expect("request succeeds");
    }

    let body = server
        .client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("response body");
    assert!(body.contains("the second secret"));
    assert!(!body.contains("the first secret"));
}

#[tokio::test]
async fn test_accounts_without_secret_are_not_listed() {
    let server = TestServer::new().await;
    let client = no_redirect_client();

    let with_secret = server.register("carol", "a fine password").await;
    let _without_secret = server.register("dave", "another password").await;

    client
        .post(server.url("/submit"))
        .header(reqwest::header::COOKIE, &with_secret)
        .form(&[("secret", "only carol shared")])
        .send()
        .await
        .expect("request succeeds");

    let body = server
        .client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("response body");

    assert_eq!(body.matches("<li>").count(), 1);
    assert!(body.contains("only carol shared"));
}

#[tokio::test]
async fn test_secret_text_is_escaped_in_listing() {
    let server = TestServer::new().await;
    let client = no_redirect_client();

    let session = server.register("eve", "a fine password").await;

    client
        .post(server.url("/submit"))
        .header(reqwest::header::COOKIE, &session)
        .form(&[("secret", "<script>alert(1)</script>")])
        .send()
        .await
        .expect("request succeeds");

    let body = server
        .client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("response body");

    assert!(!body.contains("<script>alert(1)</script>"));
    assert!(body.contains("&lt;script&gt;"));
}
