use fbsocial_graph::{
    ApiFailure, FacebookClient, FailureCategory, GraphConfig, GraphError, ImageType, UserProfile,
};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCESS_TOKEN: &str = "someAccessToken";

fn authorized_client(server: &MockServer) -> FacebookClient {
    let config = GraphConfig::anonymous()
        .with_api_base(server.uri())
        .with_access_token(ACCESS_TOKEN);
    FacebookClient::new(config).unwrap()
}

fn anonymous_client(server: &MockServer) -> FacebookClient {
    FacebookClient::new(GraphConfig::anonymous().with_api_base(server.uri())).unwrap()
}

fn json_response(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), "application/json")
}

fn expect_failure<T: std::fmt::Debug>(result: Result<T, GraphError>) -> ApiFailure {
    match result {
        Err(GraphError::Api(failure)) => failure,
        other => panic!("expected an API failure, got {:?}", other),
    }
}

#[tokio::test]
async fn insufficient_privileges() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/193482154020832/declined"))
        .and(header("Authorization", "OAuth someAccessToken"))
        .respond_with(json_response(
            403,
            include_str!("fixtures/error-insufficient-privilege.json"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let failure = expect_failure(client.decline_invitation("193482154020832").await);

    assert_eq!(failure.category(), FailureCategory::InsufficientPermission);
    assert_eq!(
        failure.message(),
        "The operation requires 'rsvp_event' permission."
    );
    assert_eq!(failure.required_permission(), Some("rsvp_event"));
}

#[tokio::test]
async fn not_a_friend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/119297590579/members/100001387295207"))
        .and(header("Authorization", "OAuth someAccessToken"))
        .respond_with(json_response(
            500,
            include_str!("fixtures/error-not-a-friend.json"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let failure = expect_failure(
        client
            .add_to_friend_list("119297590579", "100001387295207")
            .await,
    );

    assert_eq!(
        failure,
        ApiFailure::NotAFriend {
            message: "The member must be a friend of the current user.".to_string()
        }
    );
}

#[tokio::test]
async fn unknown_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/boguspath"))
        .and(header("Authorization", "OAuth someAccessToken"))
        .respond_with(json_response(
            400,
            include_str!("fixtures/error-unknown-path.json"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let failure =
        expect_failure(client.fetch_connections::<String>("me", "boguspath").await);

    assert_eq!(
        failure,
        ApiFailure::ResourceNotFound {
            message: "Unknown path components: /boguspath".to_string()
        }
    );
}

#[tokio::test]
async fn not_the_owner() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1234567890"))
        .and(header("Authorization", "OAuth someAccessToken"))
        .and(body_string("method=delete"))
        .respond_with(json_response(
            500,
            include_str!("fixtures/error-not-the-owner.json"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let failure = expect_failure(client.delete_friend_list("1234567890").await);

    assert_eq!(
        failure,
        ApiFailure::ResourceOwnership {
            message: "User must be an owner of the friendlist".to_string()
        }
    );
}

#[tokio::test]
async fn unknown_alias_on_http_200() {
    // The Graph API answers this one with 200 OK
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dummyalias"))
        .and(header("Authorization", "OAuth someAccessToken"))
        .respond_with(json_response(
            200,
            include_str!("fixtures/error-unknown-alias.json"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let failure = expect_failure(client.fetch_object::<UserProfile>("dummyalias").await);

    assert_eq!(
        failure,
        ApiFailure::ResourceNotFound {
            message: "(#803) Some of the aliases you requested do not exist: dummyalias"
                .to_string()
        }
    );
}

#[tokio::test]
async fn current_user_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(json_response(
            400,
            include_str!("fixtures/error-current-user-no-token.json"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let failure = expect_failure(client.user_profile().await);

    assert_eq!(failure.category(), FailureCategory::MissingAuthorization);
    assert!(failure.requires_reauthorization());
}

#[tokio::test]
async fn html_error_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/123456/picture"))
        .and(query_param("type", "normal"))
        .respond_with(
            ResponseTemplate::new(400).set_body_raw(
                include_str!("fixtures/error-not-json.html").as_bytes().to_vec(),
                "text/html",
            ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let failure = expect_failure(client.user_profile_image("123456", ImageType::Normal).await);

    match failure {
        ApiFailure::Uncategorized { status, body, .. } => {
            assert_eq!(status, 400);
            assert!(body.contains("Sorry, something went wrong."));
        }
        other => panic!("expected Uncategorized, got {:?}", other),
    }
}

async fn current_user_failure(fixture: &str) -> ApiFailure {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(json_response(400, fixture))
        .expect(1)
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    expect_failure(client.user_profile().await)
}

#[tokio::test]
async fn token_invalid_token_expired() {
    let failure = current_user_failure(include_str!("fixtures/error-expired-token.json")).await;
    assert_eq!(failure.category(), FailureCategory::ExpiredAuthorization);
}

#[tokio::test]
async fn token_invalid_password_changed() {
    let failure =
        current_user_failure(include_str!("fixtures/error-invalid-token-password.json")).await;
    assert_eq!(failure.category(), FailureCategory::RevokedAuthorization);
}

#[tokio::test]
async fn token_invalid_application_deauthorized() {
    let failure =
        current_user_failure(include_str!("fixtures/error-invalid-token-deauth.json")).await;
    assert_eq!(failure.category(), FailureCategory::RevokedAuthorization);
}

#[tokio::test]
async fn token_invalid_signed_out() {
    let failure =
        current_user_failure(include_str!("fixtures/error-invalid-token-signout.json")).await;
    assert_eq!(failure.category(), FailureCategory::RevokedAuthorization);
}
