//! Integration tests for typed endpoint helpers over a scripted transport.

mod common;

use serde_json::json;

use common::{authed_client, client, ok_json, status, MockTransport};
use cs_api::endpoints::ads::AdRotation;
use cs_api::endpoints::auth::Registration;
use cs_api::endpoints::cards::NewCard;
use cs_api::session;
use cs_api::FilePart;
use cs_core::constants::keys;
use cs_core::error::CsError;
use cs_store::KeyValueStore;

// ---- auth ----

#[tokio::test]
async fn login_stores_token_and_user() {
    let transport = MockTransport::new(vec![ok_json(json!({
        "success": true,
        "data": {
            "token": "jwt-abc",
            "user": { "_id": "u7", "name": "Ada", "phone": "+15550007" }
        }
    }))]);
    let (api, store) = client(transport.clone());

    let auth = api.login("+15550007", "secret").await.unwrap();

    assert_eq!(auth.token, "jwt-abc");
    assert_eq!(store.get(keys::AUTH_TOKEN).unwrap().as_deref(), Some("jwt-abc"));
    assert_eq!(store.get(keys::USER_ID).unwrap().as_deref(), Some("u7"));

    let req = &transport.requests()[0];
    assert!(req.url.ends_with("/api/auth/login"));
    match req.body.as_ref() {
        Some(cs_api::RequestBody::Json(body)) => {
            assert_eq!(body["phone"], "+15550007");
            assert!(body.get("email").is_none());
        }
        other => panic!("unexpected body {other:?}"),
    }
}

#[tokio::test]
async fn login_with_email_sends_email_field() {
    let transport = MockTransport::new(vec![ok_json(json!({"token": "t"}))]);
    let (api, _) = client(transport.clone());

    api.login("ada@example.com", "pw").await.unwrap();

    match transport.requests()[0].body.as_ref() {
        Some(cs_api::RequestBody::Json(body)) => assert_eq!(body["email"], "ada@example.com"),
        other => panic!("unexpected body {other:?}"),
    }
}

#[tokio::test]
async fn rejected_login_keeps_store_clean() {
    let transport = MockTransport::new(vec![status(401, r#"{"message":"Invalid credentials"}"#)]);
    let (api, store) = client(transport.clone());

    let err = api.login("+1555", "wrong").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!session::is_logged_in(store.as_ref()).unwrap());
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn login_then_next_call_carries_the_new_token() {
    let transport = MockTransport::new(vec![
        ok_json(json!({"token": "jwt-1", "user": {"id": 1}})),
        ok_json(json!({"user": {"_id": "1", "name": "Ada", "credits": 10}})),
    ]);
    let (api, _) = client(transport.clone());

    api.login("+1555", "pw").await.unwrap();
    let profile = api.profile().await.unwrap();

    assert_eq!(profile.name.as_deref(), Some("Ada"));
    assert_eq!(profile.credits, Some(10.0));
    assert_eq!(
        transport.requests()[1].header("authorization"),
        Some("Bearer jwt-1")
    );
}

#[tokio::test]
async fn register_stores_the_session() {
    let transport = MockTransport::new(vec![ok_json(json!({
        "success": true,
        "data": {"token": "jwt-new", "user": {"_id": "u9", "name": "Grace", "phone": "+15550009"}}
    }))]);
    let (api, store) = client(transport.clone());

    let registration = Registration {
        name: "Grace".into(),
        phone: "+15550009".into(),
        email: None,
        password: "pw".into(),
        referral_code: Some("ADA1".into()),
    };
    let auth = api.register(&registration).await.unwrap();

    assert_eq!(auth.token, "jwt-new");
    assert!(session::is_logged_in(store.as_ref()).unwrap());
    assert_eq!(store.get(keys::USER_ID).unwrap().as_deref(), Some("u9"));
    assert_eq!(store.get(keys::USER_NAME).unwrap().as_deref(), Some("Grace"));

    let req = &transport.requests()[0];
    assert_eq!(req.method, reqwest::Method::POST);
    assert!(req.url.ends_with("/api/auth/register"));
    match req.body.as_ref() {
        Some(cs_api::RequestBody::Json(body)) => {
            assert_eq!(body["referralCode"], "ADA1");
            assert!(body.get("email").is_none());
        }
        other => panic!("unexpected body {other:?}"),
    }
}

#[tokio::test]
async fn update_profile_puts_changes() {
    let transport = MockTransport::new(vec![ok_json(json!({
        "success": true,
        "data": {"_id": "u7", "id": "u7", "name": "Ada L.", "credits": "12.5"}
    }))]);
    let (api, _) = authed_client(transport.clone(), "tok");

    let profile = api.update_profile(&json!({"name": "Ada L."})).await.unwrap();

    assert_eq!(profile.name.as_deref(), Some("Ada L."));
    assert_eq!(profile.credits, Some(12.5));
    let req = &transport.requests()[0];
    assert_eq!(req.method, reqwest::Method::PUT);
    assert!(req.url.ends_with("/api/auth/profile"));
    assert_eq!(req.header("authorization"), Some("Bearer tok"));
}

#[tokio::test]
async fn logout_drops_session_and_later_calls_are_anonymous() {
    let transport = MockTransport::new(vec![ok_json(json!({}))]);
    let (api, store) = authed_client(transport.clone(), "tok");
    store.set(keys::USER_NAME, "Ada").unwrap();

    api.logout().unwrap();
    api.get("/ads/active").await.unwrap();

    assert!(store.get(keys::USER_NAME).unwrap().is_none());
    assert!(transport.requests()[0].header("authorization").is_none());
}

// ---- cards ----

#[tokio::test]
async fn list_cards_accepts_wrapped_and_bare_arrays() {
    let transport = MockTransport::new(vec![
        ok_json(json!({"success": true, "data": [{"_id": "c1", "name": "Ada"}]})),
        ok_json(json!([{"id": 2, "company": "Acme"}])),
        ok_json(json!({"success": true, "cards": null})),
    ]);
    let (api, _) = authed_client(transport, "tok");

    let wrapped = api.list_cards().await.unwrap();
    assert_eq!(wrapped[0].id.as_deref(), Some("c1"));

    let bare = api.list_cards().await.unwrap();
    assert_eq!(bare[0].display_name(), "Acme");

    assert!(api.list_cards().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_cards_tolerates_both_id_spellings() {
    let transport = MockTransport::new(vec![ok_json(json!({
        "data": [{"_id": "c1", "id": "c1", "name": "Ada"}]
    }))]);
    let (api, _) = authed_client(transport, "tok");

    let cards = api.list_cards().await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id.as_deref(), Some("c1"));
}

#[tokio::test]
async fn update_card_puts_to_the_encoded_id() {
    let transport = MockTransport::new(vec![ok_json(json!({"card": {"_id": "a/b", "title": "CTO"}}))]);
    let (api, _) = authed_client(transport.clone(), "tok");

    let card = api.update_card("a/b", &json!({"title": "CTO"})).await.unwrap();

    assert_eq!(card.title.as_deref(), Some("CTO"));
    let req = &transport.requests()[0];
    assert_eq!(req.method, reqwest::Method::PUT);
    assert!(req.url.ends_with("/api/cards/a%2Fb"), "url was {}", req.url);
    assert_eq!(req.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn delete_card_escapes_query_characters() {
    let transport = MockTransport::new(vec![ok_json(json!({"success": true}))]);
    let (api, _) = authed_client(transport.clone(), "tok");

    api.delete_card("c1?force=true").await.unwrap();

    let req = &transport.requests()[0];
    assert_eq!(req.method, reqwest::Method::DELETE);
    assert!(req.url.ends_with("/api/cards/c1%3Fforce%3Dtrue"), "url was {}", req.url);
}

#[tokio::test]
async fn card_image_upload_is_multipart() {
    let transport = MockTransport::new(vec![ok_json(json!({"card": {"_id": "c9", "name": "Ada"}}))]);
    let (api, _) = authed_client(transport.clone(), "tok");

    let card = NewCard {
        name: "Ada".into(),
        company: Some("Engines".into()),
        ..NewCard::default()
    };
    let created = api
        .create_card_with_image(&card, FilePart::new("ada.jpg", None, vec![0xff, 0xd8]))
        .await
        .unwrap();

    assert_eq!(created.id.as_deref(), Some("c9"));
    let req = &transport.requests()[0];
    assert!(req.header("content-type").is_none());
    match req.body.as_ref() {
        Some(cs_api::RequestBody::Multipart(form)) => {
            assert_eq!(form.field_names(), vec!["name", "company", "image"]);
            assert_eq!(form.text_value("company"), Some("Engines"));
        }
        other => panic!("unexpected body {other:?}"),
    }
}

#[tokio::test]
async fn contacts_feed_passes_page() {
    let transport = MockTransport::new(vec![ok_json(json!({"feed": []}))]);
    let (api, _) = authed_client(transport.clone(), "tok");

    api.contacts_feed(Some(3)).await.unwrap();
    assert!(transport.requests()[0].url.ends_with("/cards/feed/contacts?page=3"));
}

// ---- credits ----

#[tokio::test]
async fn credit_balance_reads_every_shape() {
    let transport = MockTransport::new(vec![
        ok_json(json!({"success": true, "credits": 450})),
        ok_json(json!({"success": true, "data": {"balance": 90}})),
        ok_json(json!({"success": true, "credits": 450.5})),
        ok_json(json!({"success": true, "credits": "75"})),
        ok_json(json!({"success": true})),
    ]);
    let (api, _) = authed_client(transport, "tok");

    assert_eq!(api.credit_balance().await.unwrap().credits, Some(450.0));
    assert_eq!(api.credit_balance().await.unwrap().credits, Some(90.0));
    assert_eq!(api.credit_balance().await.unwrap().credits, Some(450.5));
    assert_eq!(api.credit_balance().await.unwrap().credits, Some(75.0));
    assert_eq!(api.credit_balance().await.unwrap().credits, None);
}

#[tokio::test]
async fn credit_history_tolerates_rows_without_amount() {
    let transport = MockTransport::new(vec![ok_json(json!({
        "data": [
            {"_id": "t1", "type": "bonus"},
            {"_id": "t2", "id": "t2", "type": "transfer", "amount": -25}
        ]
    }))]);
    let (api, _) = authed_client(transport, "tok");

    let history = api.credit_history().await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id.as_deref(), Some("t1"));
    assert_eq!(history[0].amount, None);
    assert_eq!(history[1].amount, Some(-25.0));
}

#[tokio::test]
async fn non_positive_transfer_never_hits_the_network() {
    let transport = MockTransport::new(vec![ok_json(json!({}))]);
    let (api, _) = authed_client(transport.clone(), "tok");

    let err = api.transfer_credits("+1555", 0, None).await.unwrap_err();

    assert!(matches!(err, CsError::InvalidRequest(_)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn transfer_reports_new_balance() {
    let transport = MockTransport::new(vec![ok_json(json!({
        "success": true,
        "data": {"newBalance": 400, "message": "Sent"}
    }))]);
    let (api, _) = authed_client(transport.clone(), "tok");

    let receipt = api.transfer_credits("+1555", 50, Some("lunch")).await.unwrap();

    assert_eq!(receipt.new_balance, Some(400.0));
    match transport.requests()[0].body.as_ref() {
        Some(cs_api::RequestBody::Json(body)) => {
            assert_eq!(body["amount"], 50);
            assert_eq!(body["note"], "lunch");
        }
        other => panic!("unexpected body {other:?}"),
    }
}

// ---- notifications ----

#[tokio::test]
async fn push_token_is_registered_once() {
    let transport = MockTransport::new(vec![ok_json(json!({"success": true}))]);
    let (api, store) = authed_client(transport.clone(), "tok");

    assert!(api.register_push_token("ExponentPushToken[a]", Some("proj")).await.unwrap());
    assert!(!api.register_push_token("ExponentPushToken[a]", Some("proj")).await.unwrap());
    assert!(api.register_push_token("ExponentPushToken[b]", None).await.unwrap());

    assert_eq!(transport.call_count(), 2);
    assert_eq!(
        store.get(keys::PUSH_TOKEN).unwrap().as_deref(),
        Some("ExponentPushToken[b]")
    );
}

#[tokio::test]
async fn failed_push_registration_is_not_remembered() {
    let transport = MockTransport::new(vec![status(400, r#"{"message":"bad token"}"#)]);
    let (api, store) = authed_client(transport, "tok");

    api.register_push_token("nope", None).await.unwrap_err();
    assert!(store.get(keys::PUSH_TOKEN).unwrap().is_none());
}

#[tokio::test]
async fn mark_notification_read_patches_the_encoded_id() {
    let transport = MockTransport::new(vec![ok_json(json!({"success": true}))]);
    let (api, _) = authed_client(transport.clone(), "tok");

    api.mark_notification_read("n 1").await.unwrap();

    let req = &transport.requests()[0];
    assert_eq!(req.method, reqwest::Method::PATCH);
    assert!(req.url.ends_with("/api/notifications/n%201/read"), "url was {}", req.url);
    match req.body.as_ref() {
        Some(cs_api::RequestBody::Json(body)) => assert_eq!(body["read"], true),
        other => panic!("unexpected body {other:?}"),
    }
}

#[tokio::test]
async fn notifications_with_null_read_flag_are_unread() {
    let transport = MockTransport::new(vec![ok_json(json!({"notifications": [
        {"_id": "n1", "title": "Hi", "read": null},
        {"_id": "n2", "title": "Yo", "isRead": 1}
    ]}))]);
    let (api, _) = authed_client(transport, "tok");

    let inbox = api.notifications().await.unwrap();
    assert!(!inbox[0].is_read());
    assert!(inbox[1].is_read());
}

// ---- ads ----

#[tokio::test]
async fn ad_rotation_resumes_from_stored_index() {
    let transport = MockTransport::new(vec![ok_json(json!({"ads": [
        {"_id": "a1"}, {"_id": "a2"}, {"_id": "a3"}
    ]}))]);
    let (api, store) = client(transport);
    store.set(keys::LAST_AD_INDEX, "2").unwrap();

    let ads = api.active_ads().await.unwrap();
    let rotation = AdRotation::new(store.as_ref());

    assert_eq!(rotation.resume_index(ads.len()).unwrap(), 2);
    assert_eq!(rotation.advance(ads.len()).unwrap(), 0);
}
