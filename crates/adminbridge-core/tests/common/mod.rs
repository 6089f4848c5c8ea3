#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use adminbridge_core::{
    AdminBridge, ClientConfig, Navigator, PromptOutcome, ReauthPrompt,
};
use adminbridge_storage::MemorySessionStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::Notify;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn disable_system_proxy_for_tests() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        // Safety: set once for the process before any HTTP clients are built.
        unsafe {
            std::env::set_var("ADMINBRIDGE_DISABLE_SYSTEM_PROXY", "1");
        }
    });
}

/// Prompt that records how often it was shown and answers once released.
pub struct ScriptedPrompt {
    pub shown: AtomicUsize,
    pub release: Notify,
    outcome: PromptOutcome,
    hold: bool,
}

impl ScriptedPrompt {
    /// Answers only after `release` is notified.
    pub fn held(outcome: PromptOutcome) -> Arc<Self> {
        Arc::new(Self {
            shown: AtomicUsize::new(0),
            release: Notify::new(),
            outcome,
            hold: true,
        })
    }

    /// Answers immediately.
    pub fn immediate(outcome: PromptOutcome) -> Arc<Self> {
        Arc::new(Self {
            shown: AtomicUsize::new(0),
            release: Notify::new(),
            outcome,
            hold: false,
        })
    }

    pub fn count(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReauthPrompt for ScriptedPrompt {
    async fn confirm(&self, _message: &str) -> PromptOutcome {
        self.shown.fetch_add(1, Ordering::SeqCst);
        if self.hold {
            self.release.notified().await;
        }
        self.outcome
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub targets: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &str) {
        self.targets.lock().push(target.to_string());
    }
}

pub struct Harness {
    pub bridge: AdminBridge,
    pub store: Arc<MemorySessionStore>,
    pub prompt: Arc<ScriptedPrompt>,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn harness(base_url: &str, prompt: Arc<ScriptedPrompt>) -> Harness {
    disable_system_proxy_for_tests();
    let store = Arc::new(MemorySessionStore::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let bridge = AdminBridge::new(
        ClientConfig::new(base_url),
        store.clone(),
        prompt.clone(),
        navigator.clone(),
    )
    .unwrap();

    Harness {
        bridge,
        store,
        prompt,
        navigator,
    }
}

pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": 200, "message": "ok", "data": data }))
}

pub fn legacy_ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "msg": "success", "data": data }))
}

pub fn user_info() -> Value {
    json!({
        "id": 1,
        "username": "admin",
        "nickname": "Administrator",
        "avatar": "/static/avatar/1.png",
        "user_type": 1,
        "roles": ["admin"],
        "permissions": ["system:user:add", "system:user:edit"],
        "last_login_time": "2026-10-18 09:30:00"
    })
}

pub fn menus() -> Value {
    json!([
        {
            "path": "/system",
            "name": "system",
            "component": "Layout",
            "redirect": null,
            "meta": { "title": "System", "icon": "setting", "roles": [] },
            "children": [
                {
                    "path": "/system/user",
                    "name": "system-user",
                    "component": "system/user/index",
                    "meta": { "title": "Users", "roles": ["admin"] },
                    "children": []
                }
            ]
        }
    ])
}

/// Mount login, userinfo and menus so that `login` succeeds.
pub async fn mount_login_flow(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/system/auth/login"))
        .respond_with(ok(json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": 1800,
            "refresh_token": format!("{}-refresh", token)
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/system/auth/userinfo"))
        .respond_with(legacy_ok(user_info()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/system/auth/menus"))
        .respond_with(ok(menus()))
        .mount(server)
        .await;
}
