//! HTTP-level tests for the agenda and its entry actions.

mod common;

use axum::http::StatusCode;
use common::{
    agenda, body_json, create_client, get_with_cookie, login, post_empty_with_cookie,
    post_json_with_cookie, PUBLIC_URL,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Signed-in app with Ana, Bruno, and Carla waiting in that order.
async fn app_with_queue() -> (common::TestApp, String) {
    let app = common::build_test_app().await;
    let cookie = login(app.router.clone()).await;
    for (name, number) in [("Ana", "11911110000"), ("Bruno", ""), ("Carla", "11933330000")] {
        create_client(app.router.clone(), &cookie, name, number, true).await;
    }
    (app, cookie)
}

fn names(agenda: &serde_json::Value) -> Vec<String> {
    agenda["data"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect()
}

async fn notice_messages(app: &common::TestApp) -> Vec<String> {
    app.notifications
        .pending("provider:1")
        .await
        .into_iter()
        .map(|n| n.message)
        .collect()
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn agenda_lists_waiting_entries_front_first() {
    let (app, cookie) = app_with_queue().await;
    let json = agenda(app.router, &cookie).await;

    assert_eq!(names(&json), vec!["Ana", "Bruno", "Carla"]);
    assert_eq!(json["data"]["totalWaiting"], 3);
    assert_eq!(json["data"]["selected"], json["data"]["entries"][0]["entryId"]);
    assert_eq!(json["data"]["entries"][0]["order"], 1);
}

#[tokio::test]
async fn cards_carry_a_reminder_link_only_when_the_client_has_a_number() {
    let (app, cookie) = app_with_queue().await;
    let json = agenda(app.router, &cookie).await;
    let entries = &json["data"]["entries"];

    let ana = entries[0]["reminderLink"].as_str().unwrap();
    assert!(ana.starts_with("https://wa.me/5511911110000?text="));
    assert!(entries[1]["reminderLink"].is_null());
}

#[tokio::test]
async fn empty_agenda_has_nothing_selected() {
    let app = common::build_test_app().await;
    let cookie = login(app.router.clone()).await;
    let json = agenda(app.router, &cookie).await;

    assert_eq!(json["data"]["totalWaiting"], 0);
    assert!(json["data"]["selected"].is_null());
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

#[tokio::test]
async fn moving_down_swaps_with_the_next_client() {
    let (app, cookie) = app_with_queue().await;
    let ana = agenda(app.router.clone(), &cookie).await["data"]["entries"][0]["entryId"].clone();

    let response = post_json_with_cookie(
        app.router.clone(),
        &format!("/agenda/entries/{ana}/order"),
        &cookie,
        serde_json::json!({ "direction": "DOWN" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Ordem alterada com sucesso! Atualizando a fila...");
    assert_eq!(json["data"]["reloadAfterMs"], 2000);

    let json = agenda(app.router, &cookie).await;
    assert_eq!(names(&json), vec!["Bruno", "Ana", "Carla"]);
}

#[tokio::test]
async fn moving_the_first_client_up_is_refused_and_changes_nothing() {
    let (app, cookie) = app_with_queue().await;
    let ana = agenda(app.router.clone(), &cookie).await["data"]["entries"][0]["entryId"].clone();

    let response = post_json_with_cookie(
        app.router.clone(),
        &format!("/agenda/entries/{ana}/order"),
        &cookie,
        serde_json::json!({ "direction": "UP" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Cliente já é o primeiro da fila.");

    let json = agenda(app.router.clone(), &cookie).await;
    assert_eq!(names(&json), vec!["Ana", "Bruno", "Carla"]);
    assert!(notice_messages(&app)
        .await
        .contains(&"Cliente já é o primeiro da fila.".to_string()));
}

#[tokio::test]
async fn moving_the_last_client_down_is_refused() {
    let (app, cookie) = app_with_queue().await;
    let carla = agenda(app.router.clone(), &cookie).await["data"]["entries"][2]["entryId"].clone();

    let response = post_json_with_cookie(
        app.router,
        &format!("/agenda/entries/{carla}/order"),
        &cookie,
        serde_json::json!({ "direction": "DOWN" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Complete / cancel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zero_price_is_rejected_and_entry_stays_waiting() {
    let (app, cookie) = app_with_queue().await;
    let ana = agenda(app.router.clone(), &cookie).await["data"]["entries"][0]["entryId"].clone();

    let response = post_json_with_cookie(
        app.router.clone(),
        &format!("/agenda/entries/{ana}/complete"),
        &cookie,
        serde_json::json!({ "price": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Por favor, informe o valor do atendimento.");

    let json = agenda(app.router, &cookie).await;
    assert_eq!(json["data"]["totalWaiting"], 3);
}

#[tokio::test]
async fn missing_price_is_rejected_even_for_an_unknown_entry() {
    let (app, cookie) = app_with_queue().await;

    let response = post_json_with_cookie(
        app.router,
        "/agenda/entries/999/complete",
        &cookie,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn completing_the_front_entry_moves_everyone_up() {
    let (app, cookie) = app_with_queue().await;
    let ana = agenda(app.router.clone(), &cookie).await["data"]["entries"][0]["entryId"].clone();

    let response = post_json_with_cookie(
        app.router.clone(),
        &format!("/agenda/entries/{ana}/complete"),
        &cookie,
        serde_json::json!({ "price": 45.5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Atendimento concluido com sucesso! Atualizando a fila...");

    let json = agenda(app.router, &cookie).await;
    assert_eq!(names(&json), vec!["Bruno", "Carla"]);
    assert_eq!(json["data"]["entries"][0]["order"], 1);
    assert_eq!(json["data"]["entries"][1]["order"], 2);
}

#[tokio::test]
async fn cancelling_a_completed_entry_is_a_conflict() {
    let (app, cookie) = app_with_queue().await;
    let ana = agenda(app.router.clone(), &cookie).await["data"]["entries"][0]["entryId"].clone();

    post_json_with_cookie(
        app.router.clone(),
        &format!("/agenda/entries/{ana}/complete"),
        &cookie,
        serde_json::json!({ "price": 30 }),
    )
    .await;

    let response = post_empty_with_cookie(
        app.router,
        &format!("/agenda/entries/{ana}/cancel"),
        &cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn cancelling_removes_the_entry_from_the_agenda() {
    let (app, cookie) = app_with_queue().await;
    let bruno = agenda(app.router.clone(), &cookie).await["data"]["entries"][1]["entryId"].clone();

    let response = post_empty_with_cookie(
        app.router.clone(),
        &format!("/agenda/entries/{bruno}/cancel"),
        &cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(notice_messages(&app)
        .await
        .contains(&"Atendimento cancelado com sucesso! Atualizando a fila...".to_string()));

    let json = agenda(app.router, &cookie).await;
    assert_eq!(names(&json), vec!["Ana", "Carla"]);
}

#[tokio::test]
async fn unknown_entry_is_not_found() {
    let (app, cookie) = app_with_queue().await;
    let response = post_empty_with_cookie(app.router, "/agenda/entries/999/cancel", &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Share link
// ---------------------------------------------------------------------------

#[tokio::test]
async fn share_link_points_at_the_public_queue_page() {
    let app = common::build_test_app().await;
    let cookie = login(app.router.clone()).await;

    let response = get_with_cookie(app.router.clone(), "/agenda/link", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["link"], format!("{PUBLIC_URL}/fila/11977776666"));
    assert!(notice_messages(&app)
        .await
        .contains(&"Link copiado para a área de transferência.".to_string()));
}
