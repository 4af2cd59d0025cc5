mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_task_returns_owned_record() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, token) = common::fresh_user("alice");

    let res = client
        .post(format!("{}/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"title": "buy milk", "description": "", "completed": false}))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);

    let task = &body["data"];
    assert!(task["id"].is_string());
    assert_eq!(task["title"], "buy milk");
    assert_eq!(task["description"], "");
    assert_eq!(task["completed"], false);
    assert_eq!(task["owner"], "alice");
    assert_eq!(task["created_at"], task["updated_at"]);
    Ok(())
}

#[tokio::test]
async fn list_and_retrieve_round_trip() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, token) = common::fresh_user("alice");

    let created = client
        .post(format!("{}/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"title": "water plants"}))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let list = client
        .get(format!("{}/tasks", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let tasks = list["data"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], id.as_str());

    let res = client
        .get(format!("{}/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["title"], "water plants");
    Ok(())
}

#[tokio::test]
async fn patch_updates_supplied_fields_only() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, token) = common::fresh_user("alice");

    let created = client
        .post(format!("{}/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"title": "buy milk"}))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let created_at = common::timestamp(&created["data"]["created_at"]);

    let res = client
        .patch(format!("{}/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({"completed": true}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    let task = &body["data"];
    assert_eq!(task["completed"], true);
    assert_eq!(task["title"], "buy milk");

    let updated_at = common::timestamp(&task["updated_at"]);
    assert!(updated_at > created_at);
    Ok(())
}

#[tokio::test]
async fn updated_at_never_decreases_across_updates() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, token) = common::fresh_user("alice");

    let created = client
        .post(format!("{}/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"title": "tick"}))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let mut last = common::timestamp(&created["data"]["updated_at"]);

    for completed in [true, false, true] {
        let body = client
            .patch(format!("{}/tasks/{}", server.base_url, id))
            .bearer_auth(&token)
            .json(&json!({ "completed": completed }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;
        let updated_at = common::timestamp(&body["data"]["updated_at"]);
        assert!(updated_at > last);
        last = updated_at;
    }
    Ok(())
}

#[tokio::test]
async fn put_replaces_whole_task() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, token) = common::fresh_user("alice");

    let created = client
        .post(format!("{}/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"title": "old", "description": "details", "completed": true}))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let res = client
        .put(format!("{}/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({"title": "new"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    let task = &body["data"];
    assert_eq!(task["title"], "new");
    // omitted writable fields reset to their defaults on full replace
    assert_eq!(task["description"], "");
    assert_eq!(task["completed"], false);
    Ok(())
}

#[tokio::test]
async fn delete_task_then_gone() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, token) = common::fresh_user("alice");

    let created = client
        .post(format!("{}/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"title": "ephemeral"}))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let res = client
        .delete(format!("{}/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn me_returns_profile_with_task_ids() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (user_id, token) = common::fresh_user("carol");

    let mut ids = Vec::new();
    for title in ["first", "second"] {
        let created = client
            .post(format!("{}/tasks", server.base_url))
            .bearer_auth(&token)
            .json(&json!({ "title": title }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;
        ids.push(created["data"]["id"].as_str().unwrap().to_string());
    }

    let res = client
        .get(format!("{}/api/me", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    let profile = &body["data"];
    assert_eq!(profile["id"], user_id.to_string());
    assert_eq!(profile["username"], "carol");

    let task_ids: Vec<&str> = profile["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(task_ids.len(), 2);
    for id in &ids {
        assert!(task_ids.contains(&id.as_str()));
    }
    Ok(())
}
