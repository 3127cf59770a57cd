use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use classificados::{models::listing::ListingStatus, test_utils::test_helpers};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

struct Reply {
    status: StatusCode,
    body: Value,
    cookie: Option<String>,
    headers: axum::http::HeaderMap,
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let cookie = headers
        .get_all(header::SET_COOKIE)
        .iter()
        .last()
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    Reply {
        status,
        body,
        cookie,
        headers,
    }
}

async fn setup() -> (Router, SqlitePool) {
    let pool = test_helpers::create_test_db().await.unwrap();
    let app = test_helpers::create_test_app(pool.clone()).await.unwrap();
    (app, pool)
}

async fn login_user(app: &Router, email: &str, password: &str) -> String {
    let reply = send(
        app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": email, "senha": password })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
    reply.cookie.expect("login to issue a session cookie")
}

async fn login_admin(app: &Router, pool: &SqlitePool) -> String {
    test_helpers::insert_test_admin(pool, "admin", "admin12345")
        .await
        .unwrap();
    let reply = send(
        app,
        Method::POST,
        "/api/admin/login",
        Some(json!({ "usuario": "admin", "senha": "admin12345" })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "admin login failed: {}", reply.body);
    assert_eq!(reply.body["usuario"], "admin");
    reply.cookie.expect("admin login to issue a session cookie")
}

async fn create_listing(app: &Router, cookie: &str, title: &str) -> i64 {
    let reply = send(
        app,
        Method::POST,
        "/api/anuncios/create",
        Some(json!({
            "titulo": title,
            "descricao": "Em ótimo estado",
            "valor": "1250,50",
            "foto1": "https://img.exemplo.com/a.jpg",
            "status": "ativo",
            "userId": 999
        })),
        Some(cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "create failed: {}", reply.body);
    reply.body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn register_returns_public_user_and_rejects_duplicates() {
    let (app, _pool) = setup().await;

    let reply = send(
        &app,
        Method::POST,
        "/api/auth/register",
        Some(json!({ "nome": "Maria", "email": "maria@exemplo.com", "senha": "senha12345" })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["nome"], "Maria");
    assert_eq!(reply.body["email"], "maria@exemplo.com");
    assert!(reply.body.get("senha").is_none());
    assert!(reply.body.get("password_hash").is_none());
    assert!(reply.body["criadoEm"].is_string());

    let duplicate = send(
        &app,
        Method::POST,
        "/api/auth/register",
        Some(json!({ "nome": "Maria 2", "email": "MARIA@exemplo.com", "senha": "outra12345" })),
        None,
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.body["error"], "Email já cadastrado");

    let missing = send(
        &app,
        Method::POST,
        "/api/auth/register",
        Some(json!({ "email": "x@exemplo.com" })),
        None,
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert!(missing.body["error"].is_string());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (app, _pool) = setup().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_checks_credentials_and_starts_a_session() {
    let (app, pool) = setup().await;
    test_helpers::insert_test_user(&pool, "Ana", "ana@exemplo.com", "senha12345")
        .await
        .unwrap();

    let wrong = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "ana@exemplo.com", "senha": "errada123" })),
        None,
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert!(wrong.body["error"].is_string());

    let unknown = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "ninguem@exemplo.com", "senha": "senha12345" })),
        None,
    )
    .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body["error"], wrong.body["error"]);

    let missing = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "ana@exemplo.com" })),
        None,
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let cookie = login_user(&app, "ANA@exemplo.com", "senha12345").await;
    let me = send(&app, Method::GET, "/api/auth/me", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], "ana@exemplo.com");
    assert_eq!(me.body["nome"], "Ana");

    let logout = send(&app, Method::POST, "/api/auth/logout", None, Some(&cookie)).await;
    assert_eq!(logout.status, StatusCode::OK);

    let after = send(&app, Method::GET, "/api/auth/me", None, Some(&cookie)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let (app, _pool) = setup().await;

    let me = send(&app, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let create = send(
        &app,
        Method::POST,
        "/api/anuncios/create",
        Some(json!({ "titulo": "x", "descricao": "y", "valor": 1 })),
        None,
    )
    .await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);

    for uri in ["/api/admin/me", "/api/admin/anuncios", "/api/admin/users", "/api/admin/dashboard"] {
        let reply = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn user_session_does_not_open_admin_routes() {
    let (app, pool) = setup().await;
    test_helpers::insert_test_user(&pool, "Ana", "ana@exemplo.com", "senha12345")
        .await
        .unwrap();
    let cookie = login_user(&app, "ana@exemplo.com", "senha12345").await;

    let reply = send(&app, Method::GET, "/api/admin/users", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(
        &app,
        Method::PUT,
        "/api/admin/anuncios",
        Some(json!({ "id": 1, "status": "ativo" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn new_listings_stay_hidden_until_an_admin_activates_them() {
    let (app, pool) = setup().await;
    let owner_id = test_helpers::insert_test_user(&pool, "Ana", "ana@exemplo.com", "senha12345")
        .await
        .unwrap();
    let owner = login_user(&app, "ana@exemplo.com", "senha12345").await;

    let id = create_listing(&app, &owner, "Bicicleta").await;

    let created = send(&app, Method::GET, &format!("/api/anuncios/{id}"), None, Some(&owner)).await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["status"], "inativo");
    assert_eq!(created.body["userId"], owner_id);
    assert_eq!(created.body["valor"], 1250.5);
    assert_eq!(created.body["user"]["nome"], "Ana");

    let public = send(&app, Method::GET, "/api/anuncios/list", None, None).await;
    assert_eq!(public.status, StatusCode::OK);
    assert_eq!(public.body.as_array().unwrap().len(), 0);

    let anonymous = send(&app, Method::GET, &format!("/api/anuncios/{id}"), None, None).await;
    assert_eq!(anonymous.status, StatusCode::NOT_FOUND);

    let mine = send(&app, Method::GET, "/api/anuncios/mine", None, Some(&owner)).await;
    assert_eq!(mine.body.as_array().unwrap().len(), 1);

    // Owner cannot publish a listing that was never approved.
    let self_publish = send(
        &app,
        Method::PUT,
        "/api/anuncios/update",
        Some(json!({ "id": id, "status": "ativo" })),
        Some(&owner),
    )
    .await;
    assert_eq!(self_publish.status, StatusCode::FORBIDDEN);

    let admin = login_admin(&app, &pool).await;
    for _ in 0..2 {
        let moderated = send(
            &app,
            Method::PUT,
            "/api/admin/anuncios",
            Some(json!({ "id": id, "status": "ativo" })),
            Some(&admin),
        )
        .await;
        assert_eq!(moderated.status, StatusCode::OK);
        assert_eq!(moderated.body["status"], "ativo");
    }

    let public = send(&app, Method::GET, "/api/anuncios/list", None, None).await;
    let listed = public.body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["titulo"], "Bicicleta");
    assert_eq!(listed[0]["user"]["email"], "ana@exemplo.com");

    // Once approved, the owner may hide and republish it.
    for status in ["inativo", "ativo"] {
        let toggled = send(
            &app,
            Method::PUT,
            "/api/anuncios/update",
            Some(json!({ "id": id, "status": status })),
            Some(&owner),
        )
        .await;
        assert_eq!(toggled.status, StatusCode::OK, "{}", toggled.body);
        assert_eq!(toggled.body["status"], status);
    }
}

#[tokio::test]
async fn public_list_filters_and_guards_inactive_listings() {
    let (app, pool) = setup().await;
    let ana = test_helpers::insert_test_user(&pool, "Ana", "ana@exemplo.com", "senha12345")
        .await
        .unwrap();
    let bia = test_helpers::insert_test_user(&pool, "Bia", "bia@exemplo.com", "senha12345")
        .await
        .unwrap();
    test_helpers::create_test_listing(&pool, ana, "Bicicleta aro 29", ListingStatus::Ativo)
        .await
        .unwrap();
    test_helpers::create_test_listing(&pool, ana, "Geladeira", ListingStatus::Inativo)
        .await
        .unwrap();
    test_helpers::create_test_listing(&pool, bia, "Bicicleta infantil", ListingStatus::Ativo)
        .await
        .unwrap();

    let all = send(&app, Method::GET, "/api/anuncios/list", None, None).await;
    let all = all.body.as_array().unwrap().clone();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|l| l["status"] == "ativo"));

    let search = send(&app, Method::GET, "/api/anuncios/list?search=INFANTIL", None, None).await;
    assert_eq!(search.body.as_array().unwrap().len(), 1);

    let by_user = send(
        &app,
        Method::GET,
        &format!("/api/anuncios/list?userId={ana}"),
        None,
        None,
    )
    .await;
    assert_eq!(by_user.body.as_array().unwrap().len(), 1);

    let inactive = format!("/api/anuncios/list?userId={ana}&status=inativo");
    let anonymous = send(&app, Method::GET, &inactive, None, None).await;
    assert_eq!(anonymous.status, StatusCode::FORBIDDEN);

    let bia_cookie = login_user(&app, "bia@exemplo.com", "senha12345").await;
    let stranger = send(&app, Method::GET, &inactive, None, Some(&bia_cookie)).await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let ana_cookie = login_user(&app, "ana@exemplo.com", "senha12345").await;
    let own = send(&app, Method::GET, &inactive, None, Some(&ana_cookie)).await;
    assert_eq!(own.status, StatusCode::OK);
    let own = own.body.as_array().unwrap().clone();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["titulo"], "Geladeira");

    let bogus = send(&app, Method::GET, "/api/anuncios/list?status=talvez", None, None).await;
    assert_eq!(bogus.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_owner_may_change_or_delete_a_listing() {
    let (app, pool) = setup().await;
    test_helpers::insert_test_user(&pool, "Ana", "ana@exemplo.com", "senha12345")
        .await
        .unwrap();
    test_helpers::insert_test_user(&pool, "Bia", "bia@exemplo.com", "senha12345")
        .await
        .unwrap();
    let ana = login_user(&app, "ana@exemplo.com", "senha12345").await;
    let bia = login_user(&app, "bia@exemplo.com", "senha12345").await;

    let id = create_listing(&app, &ana, "Sofá").await;

    let hijack = send(
        &app,
        Method::PUT,
        "/api/anuncios/update",
        Some(json!({ "id": id, "titulo": "Meu agora" })),
        Some(&bia),
    )
    .await;
    assert_eq!(hijack.status, StatusCode::FORBIDDEN);

    let delete = send(
        &app,
        Method::DELETE,
        &format!("/api/anuncios/delete?id={id}"),
        None,
        Some(&bia),
    )
    .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let edit = send(
        &app,
        Method::PUT,
        "/api/anuncios/update",
        Some(json!({ "id": id, "titulo": "Sofá retrátil", "foto1": null })),
        Some(&ana),
    )
    .await;
    assert_eq!(edit.status, StatusCode::OK);
    assert_eq!(edit.body["titulo"], "Sofá retrátil");
    assert_eq!(edit.body["descricao"], "Em ótimo estado");
    assert!(edit.body["foto1"].is_null());

    let no_id = send(&app, Method::DELETE, "/api/anuncios/delete", None, Some(&ana)).await;
    assert_eq!(no_id.status, StatusCode::BAD_REQUEST);

    let gone = send(
        &app,
        Method::DELETE,
        &format!("/api/anuncios/delete?id={id}"),
        None,
        Some(&ana),
    )
    .await;
    assert_eq!(gone.status, StatusCode::OK);

    let again = send(
        &app,
        Method::DELETE,
        &format!("/api/anuncios/delete?id={id}"),
        None,
        Some(&ana),
    )
    .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_listing_validates_required_fields() {
    let (app, pool) = setup().await;
    test_helpers::insert_test_user(&pool, "Ana", "ana@exemplo.com", "senha12345")
        .await
        .unwrap();
    let cookie = login_user(&app, "ana@exemplo.com", "senha12345").await;

    let missing = send(
        &app,
        Method::POST,
        "/api/anuncios/create",
        Some(json!({ "titulo": "Mesa", "valor": 10 })),
        Some(&cookie),
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let bad_price = send(
        &app,
        Method::POST,
        "/api/anuncios/create",
        Some(json!({ "titulo": "Mesa", "descricao": "Madeira", "valor": "barato" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(bad_price.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_deletes_users_with_their_listings() {
    let (app, pool) = setup().await;
    let ana = test_helpers::insert_test_user(&pool, "Ana", "ana@exemplo.com", "senha12345")
        .await
        .unwrap();
    let bia = test_helpers::insert_test_user(&pool, "Bia", "bia@exemplo.com", "senha12345")
        .await
        .unwrap();
    test_helpers::create_test_listing(&pool, ana, "A", ListingStatus::Ativo)
        .await
        .unwrap();
    test_helpers::create_test_listing(&pool, ana, "B", ListingStatus::Inativo)
        .await
        .unwrap();
    test_helpers::create_test_listing(&pool, bia, "C", ListingStatus::Inativo)
        .await
        .unwrap();

    let admin = login_admin(&app, &pool).await;

    let dashboard = send(&app, Method::GET, "/api/admin/dashboard", None, Some(&admin)).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert_eq!(dashboard.body["totalUsuarios"], 2);
    assert_eq!(dashboard.body["totalAnuncios"], 3);
    assert_eq!(dashboard.body["anunciosPendentes"], 2);
    assert_eq!(dashboard.body["anunciosRecentes"].as_array().unwrap().len(), 3);

    let users = send(&app, Method::GET, "/api/admin/users", None, Some(&admin)).await;
    let users = users.body.as_array().unwrap().clone();
    let ana_row = users.iter().find(|u| u["id"] == ana).unwrap();
    assert_eq!(ana_row["_count"]["anuncios"], 2);

    let all = send(&app, Method::GET, "/api/admin/anuncios", None, Some(&admin)).await;
    assert_eq!(all.body.as_array().unwrap().len(), 3);

    let missing_id = send(&app, Method::DELETE, "/api/admin/users", None, Some(&admin)).await;
    assert_eq!(missing_id.status, StatusCode::BAD_REQUEST);

    let deleted = send(
        &app,
        Method::DELETE,
        &format!("/api/admin/users?id={ana}"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE user_id = ?")
        .bind(ana)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    let unknown = send(
        &app,
        Method::DELETE,
        &format!("/api/admin/users?id={ana}"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_login_rejects_bad_credentials() {
    let (app, pool) = setup().await;
    test_helpers::insert_test_admin(&pool, "admin", "admin12345")
        .await
        .unwrap();

    let wrong = send(
        &app,
        Method::POST,
        "/api/admin/login",
        Some(json!({ "usuario": "admin", "senha": "nope12345" })),
        None,
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let missing = send(
        &app,
        Method::POST,
        "/api/admin/login",
        Some(json!({ "usuario": "admin" })),
        None,
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn moderation_validates_status_and_id() {
    let (app, pool) = setup().await;
    let admin = login_admin(&app, &pool).await;

    let bad_status = send(
        &app,
        Method::PUT,
        "/api/admin/anuncios",
        Some(json!({ "id": 1, "status": "publicado" })),
        Some(&admin),
    )
    .await;
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);

    let missing = send(
        &app,
        Method::PUT,
        "/api/admin/anuncios",
        Some(json!({ "id": 4242, "status": "ativo" })),
        Some(&admin),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_database_and_security_headers() {
    let (app, _pool) = setup().await;

    let reply = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "healthy");
    assert_eq!(reply.body["database"], "connected");
    assert_eq!(reply.headers["x-frame-options"], "DENY");
    assert_eq!(reply.headers["x-content-type-options"], "nosniff");
    assert!(reply.headers.contains_key("referrer-policy"));
}
