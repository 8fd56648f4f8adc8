// tests/api_tests.rs

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri, header},
    response::IntoResponse,
    routing::{get, post},
};
use community_feed::{
    ClientError, FeedApi, HttpFeedApi,
    config::{Config, LikeRoute},
    models::{CommentPath, EntityId},
    views::{FeedController, FeedState, LeaderboardPanel, Mutation, Notifier, PostCard, render_text},
};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// What the mock API serves and what it has seen.
struct Mock {
    feed: Value,
    feed_status: StatusCode,
    leaderboard: Value,
    leaderboard_status: StatusCode,
    write_status: StatusCode,
    write_body: String,
    requests: Vec<(String, Option<Value>)>,
}

impl Default for Mock {
    fn default() -> Self {
        Self {
            feed: json!([]),
            feed_status: StatusCode::OK,
            leaderboard: json!([]),
            leaderboard_status: StatusCode::OK,
            write_status: StatusCode::OK,
            write_body: r#"{"liked": true}"#.to_string(),
            requests: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<Mock>>;

fn json_response(status: StatusCode, body: String) -> impl IntoResponse {
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

fn record(state: &Shared, method: &str, uri: &Uri, body: &Bytes) {
    let parsed = serde_json::from_slice::<Value>(body).ok();
    state
        .lock()
        .unwrap()
        .requests
        .push((format!("{} {}", method, uri.path()), parsed));
}

async fn feed(State(state): State<Shared>, uri: Uri) -> impl IntoResponse {
    record(&state, "GET", &uri, &Bytes::new());
    let mock = state.lock().unwrap();
    json_response(mock.feed_status, mock.feed.to_string())
}

async fn leaderboard(State(state): State<Shared>, uri: Uri) -> impl IntoResponse {
    record(&state, "GET", &uri, &Bytes::new());
    let mock = state.lock().unwrap();
    json_response(mock.leaderboard_status, mock.leaderboard.to_string())
}

async fn write(State(state): State<Shared>, uri: Uri, body: Bytes) -> impl IntoResponse {
    record(&state, "POST", &uri, &body);
    let mut mock = state.lock().unwrap();
    if mock.write_status.is_success() && uri.path().contains("like/post") {
        // The server of record counts the like
        if let Some(likes) = mock.feed.get_mut(0).and_then(|p| p.get_mut("likes")) {
            *likes = json!(likes.as_u64().unwrap_or(0) + 1);
        }
    }
    json_response(mock.write_status, mock.write_body.clone())
}

/// Spawns the mock API on a random port and returns its base URL and state.
async fn spawn_mock(mock: Mock) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(mock));

    let app = Router::new()
        .route("/api/feed/", get(feed))
        .route("/api/leaderboard/", get(leaderboard))
        .route("/api/like/post/{id}/", post(write))
        .route("/api/posts/{id}/like/", post(write))
        .route("/api/like/comment/{id}/", post(write))
        .route("/api/posts/{id}/comments/", post(write))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{}/api", port), state)
}

fn client(base: &str) -> Arc<HttpFeedApi> {
    Arc::new(HttpFeedApi::new(&Config::for_base_url(base).unwrap()))
}

fn requests(state: &Shared) -> Vec<(String, Option<Value>)> {
    state.lock().unwrap().requests.clone()
}

#[derive(Default)]
struct Alerts(Mutex<Vec<String>>);

impl Notifier for Alerts {
    fn alert(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

#[tokio::test]
async fn like_post_then_reload_shows_server_count() {
    // Arrange
    let (base, state) = spawn_mock(Mock {
        feed: json!([{"id": 1, "content": "hi", "author": "alice", "likes": 0, "comments": []}]),
        ..Mock::default()
    })
    .await;
    let alerts = Arc::new(Alerts::default());
    let mut feed = FeedController::new(client(&base), alerts.clone(), CancellationToken::new());

    // Act
    feed.load().await;

    // Assert
    assert_eq!(feed.state(), FeedState::Loaded(1));
    let card = &feed.posts()[0];
    assert_eq!(card.post().author.display_name, "alice");
    assert_eq!(card.likes(), 0);
    assert_eq!(card.comments().len(), 0);
    let screen = render_text(&feed.render());
    assert!(screen.contains("[Like] 0 likes  [Comments (0)]"));

    // Act: like
    assert_eq!(feed.like_post(0).await, Mutation::Mutated);

    // Assert
    let seen: Vec<String> = requests(&state).into_iter().map(|(r, _)| r).collect();
    assert_eq!(
        seen,
        ["GET /api/feed/", "POST /api/like/post/1/", "GET /api/feed/"]
    );
    assert_eq!(feed.posts()[0].likes(), 1);
    assert!(alerts.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_reply_shows_server_error_and_keeps_draft() {
    // Arrange
    let (base, state) = spawn_mock(Mock {
        feed: json!([{
            "id": 3,
            "author": {"id": 1, "username": "bob"},
            "content": "post",
            "comments": [{"id": 7, "author": {"id": 2, "username": "cy"}, "content": "nice", "replies": []}]
        }]),
        write_status: StatusCode::BAD_REQUEST,
        write_body: r#"{"error": "too long"}"#.to_string(),
        ..Mock::default()
    })
    .await;
    let alerts = Arc::new(Alerts::default());
    let mut feed = FeedController::new(client(&base), alerts.clone(), CancellationToken::new());
    feed.load().await;

    let path = CommentPath::root(0);
    let node = feed.post_mut(0).and_then(|c| c.comment_mut(&path)).unwrap();
    node.toggle_reply();
    node.set_draft("thanks");

    // Act
    assert_eq!(feed.reply(0, &path).await, Mutation::Unchanged);

    // Assert
    let reqs = requests(&state);
    assert_eq!(reqs.len(), 2, "no reload after a failed write");
    assert_eq!(reqs[1].0, "POST /api/posts/3/comments/");
    assert_eq!(reqs[1].1, Some(json!({"content": "thanks", "parent_id": 7})));

    assert_eq!(*alerts.0.lock().unwrap(), vec!["too long".to_string()]);
    let node = &feed.posts()[0].comments()[0];
    assert_eq!(node.draft(), "thanks");
    assert!(node.is_reply_open());
}

#[tokio::test]
async fn root_comment_sends_null_parent() {
    let (base, state) = spawn_mock(Mock {
        feed: json!([{"id": 3}]),
        ..Mock::default()
    })
    .await;
    let api = client(&base);

    api.create_comment(&EntityId::Int(3), " hello ", None).await.unwrap();

    let reqs = requests(&state);
    assert_eq!(reqs[0].0, "POST /api/posts/3/comments/");
    assert_eq!(reqs[0].1, Some(json!({"content": "hello", "parent_id": null})));
}

#[tokio::test]
async fn blank_comment_is_refused_before_sending() {
    let (base, state) = spawn_mock(Mock::default()).await;
    let api = client(&base);

    let err = api.create_comment(&EntityId::Int(3), "   ", None).await.unwrap_err();

    assert!(matches!(err, ClientError::Invalid(_)));
    assert!(requests(&state).is_empty());
}

#[tokio::test]
async fn leaderboard_error_object_is_no_activity() {
    let (base, _state) = spawn_mock(Mock {
        leaderboard: json!({"error": "aggregation failed"}),
        ..Mock::default()
    })
    .await;
    let mut panel = LeaderboardPanel::new(client(&base), CancellationToken::new());

    panel.load().await;

    assert!(panel.rows().is_empty());
    assert_eq!(panel.render()[0].text, "No activity in last 24 hours");
}

#[tokio::test]
async fn leaderboard_truncates_server_rows() {
    let rows: Vec<Value> = (1..=7)
        .map(|i| json!({"owner_id": i, "owner_username": format!("user{}", i), "total_karma": 50 - i}))
        .collect();
    let (base, _state) = spawn_mock(Mock {
        leaderboard: json!(rows),
        ..Mock::default()
    })
    .await;
    let mut panel = LeaderboardPanel::new(client(&base), CancellationToken::new());

    panel.load().await;

    let names: Vec<_> = panel.rows().iter().map(|r| r.display_name.clone()).collect();
    assert_eq!(names, ["user1", "user2", "user3", "user4", "user5"]);
}

#[tokio::test]
async fn feed_http_failure_is_static_network_error() {
    let (base, _state) = spawn_mock(Mock {
        feed_status: StatusCode::INTERNAL_SERVER_ERROR,
        feed: json!({"error": "db down"}),
        ..Mock::default()
    })
    .await;

    let err = client(&base).fetch_feed().await.unwrap_err();
    assert_eq!(err, ClientError::Network("Failed to fetch feed".to_string()));

    let mut feed = FeedController::new(client(&base), Arc::new(Alerts::default()), CancellationToken::new());
    feed.load().await;
    assert_eq!(feed.state(), FeedState::Empty);
}

#[tokio::test]
async fn unparsable_error_body_falls_back_to_generic_message() {
    let (base, _state) = spawn_mock(Mock {
        write_status: StatusCode::BAD_GATEWAY,
        write_body: "<html>upstream died</html>".to_string(),
        ..Mock::default()
    })
    .await;

    let err = client(&base).like_comment(&EntityId::Int(4)).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::Rejected {
            status: 502,
            message: "Failed to like comment".to_string(),
        }
    );
}

#[tokio::test]
async fn legacy_like_route_is_used_when_configured() {
    let (base, state) = spawn_mock(Mock::default()).await;
    let mut config = Config::for_base_url(&base).unwrap();
    config.like_route = LikeRoute::Legacy;
    let api = HttpFeedApi::new(&config);

    api.like_post(&EntityId::Int(9)).await.unwrap();

    assert_eq!(requests(&state)[0].0, "POST /api/posts/9/like/");
}

#[tokio::test]
async fn unreachable_server() {
    // Grab a free port, then close it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let api = client(&format!("http://127.0.0.1:{}/api", port));

    assert_eq!(
        api.fetch_leaderboard().await.unwrap_err(),
        ClientError::Network("Failed to fetch leaderboard".to_string())
    );
    assert!(matches!(
        api.like_post(&EntityId::Int(1)).await.unwrap_err(),
        ClientError::Transport(_)
    ));
}

/// Post 1 with a single reply chain `depth` comments long, then post 2.
fn feed_with_reply_chain(depth: usize) -> Value {
    let mut chain = json!({"id": depth - 1, "author": "bob", "content": format!("level {}", depth - 1)});
    for level in (0..depth - 1).rev() {
        chain = json!({
            "id": level, "author": "bob", "content": format!("level {}", level),
            "replies": [chain]
        });
    }
    json!([
        {"id": 1, "author": "alice", "content": "deep thread", "comments": [chain]},
        {"id": 2, "author": "carol", "content": "next post", "comments": []}
    ])
}

fn chain_len(card: &PostCard) -> usize {
    let mut len = 0;
    let mut level = card.comments();
    while let Some(node) = level.first() {
        len += 1;
        level = node.replies();
    }
    len
}

#[tokio::test]
async fn thread_past_default_json_depth_keeps_the_feed() {
    let (base, _state) = spawn_mock(Mock {
        feed: feed_with_reply_chain(70),
        ..Mock::default()
    })
    .await;
    let mut feed = FeedController::new(client(&base), Arc::new(Alerts::default()), CancellationToken::new());

    feed.load().await;

    assert_eq!(feed.state(), FeedState::Loaded(2));
    assert_eq!(chain_len(&feed.posts()[0]), 70);
    assert_eq!(feed.posts()[1].post().content, "next post");
    let text = render_text(&feed.render());
    assert!(text.contains("level 69"));
}

#[tokio::test]
async fn overly_deep_thread_loses_only_its_deepest_replies() {
    let (base, _state) = spawn_mock(Mock {
        feed: feed_with_reply_chain(200),
        ..Mock::default()
    })
    .await;
    let mut feed = FeedController::new(client(&base), Arc::new(Alerts::default()), CancellationToken::new());

    feed.load().await;

    assert_eq!(feed.state(), FeedState::Loaded(2));
    assert_eq!(chain_len(&feed.posts()[0]), 127);
    assert_eq!(feed.posts()[1].post().content, "next post");
}
