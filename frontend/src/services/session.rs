//! Session cache: the authenticated identity derived from the persisted
//! token, with login/logout as the only mutators.
//!
//! The state machine is two states, logged-out and logged-in. A malformed or
//! expired token never surfaces as an error — it degrades to logged-out, so
//! ambiguous credentials cannot grant access.

use gloo::storage::{LocalStorage, Storage};
use shared::token::{self, AccessLevel};
use std::rc::Rc;
use yew::prelude::*;

use crate::services::logging::Logger;

const COMPONENT: &str = "session";

/// Local-storage key the token is persisted under.
pub const TOKEN_STORAGE_KEY: &str = "token";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub token: Option<String>,
    pub level: Option<AccessLevel>,
    pub user_id: Option<String>,
}

impl AuthState {
    pub fn logged_out() -> Self {
        Self::default()
    }

    /// Derive a logged-in state from a token, given the current time in
    /// seconds since the epoch. `None` when the token is unusable.
    pub fn from_token(token_str: &str, now_secs: i64) -> Option<Self> {
        let claims = token::validate(token_str, now_secs).ok()?;
        Some(Self {
            token: Some(token_str.to_string()),
            level: Some(claims.level),
            user_id: Some(claims.user_id),
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Single capability check gating admin-only actions.
    pub fn can_administer(&self) -> bool {
        self.level.map(AccessLevel::is_admin).unwrap_or(false)
    }
}

/// What initialization decided about the persisted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDisposition {
    /// No token was stored.
    Absent,
    /// Stored token is still valid and was adopted.
    Keep,
    /// Stored token is malformed or expired and must be removed.
    Discard,
}

/// Initialization over whatever was persisted. Pure so the fail-closed
/// behavior is testable without a browser.
pub fn resolve_initial(stored: Option<String>, now_secs: i64) -> (AuthState, TokenDisposition) {
    match stored {
        None => (AuthState::logged_out(), TokenDisposition::Absent),
        Some(token_str) => match AuthState::from_token(&token_str, now_secs) {
            Some(state) => (state, TokenDisposition::Keep),
            None => (AuthState::logged_out(), TokenDisposition::Discard),
        },
    }
}

pub fn now_secs() -> i64 {
    (js_sys::Date::now() / 1000.0) as i64
}

fn stored_token() -> Option<String> {
    LocalStorage::get(TOKEN_STORAGE_KEY).ok()
}

fn persist_token(token_str: &str) {
    if let Err(e) = LocalStorage::set(TOKEN_STORAGE_KEY, token_str) {
        Logger::warn(COMPONENT, &format!("failed to persist token: {e}"));
    }
}

fn clear_token() {
    LocalStorage::delete(TOKEN_STORAGE_KEY);
}

/// Read the persisted token and derive the starting state, discarding a
/// stale token as a side effect.
pub fn load_initial_state() -> AuthState {
    let (state, disposition) = resolve_initial(stored_token(), now_secs());
    if disposition == TokenDisposition::Discard {
        Logger::info(COMPONENT, "discarding stale persisted token");
        clear_token();
    }
    state
}

pub enum AuthAction {
    /// Adopt a freshly issued token. Invalid tokens silently produce the
    /// logged-out state; this action never fails.
    Login(String),
    Logout,
}

impl Reducible for AuthState {
    type Action = AuthAction;

    fn reduce(self: Rc<Self>, action: AuthAction) -> Rc<Self> {
        match action {
            AuthAction::Login(token_str) => match AuthState::from_token(&token_str, now_secs()) {
                Some(next) => {
                    persist_token(&token_str);
                    Rc::new(next)
                }
                None => {
                    clear_token();
                    Rc::new(AuthState::logged_out())
                }
            },
            AuthAction::Logout => {
                clear_token();
                Rc::new(AuthState::logged_out())
            }
        }
    }
}

/// Handle provided app-wide through a `ContextProvider`; every view reads
/// identity and dispatches transitions through this, never touching the
/// persisted token directly.
pub type AuthHandle = UseReducerHandle<AuthState>;

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn token_with(payload: serde_json::Value) -> String {
        format!("header.{}.signature", URL_SAFE_NO_PAD.encode(payload.to_string()))
    }

    #[wasm_bindgen_test]
    fn test_from_token_valid() {
        let token_str = token_with(serde_json::json!({
            "userId": 42,
            "level": "ADMIN",
            "exp": 2_000_000_000i64,
        }));

        let state = AuthState::from_token(&token_str, 1_000_000_000).unwrap();
        assert_eq!(state.user_id.as_deref(), Some("42"));
        assert_eq!(state.level, Some(AccessLevel::Admin));
        assert_eq!(state.token.as_deref(), Some(token_str.as_str()));
        assert!(state.is_logged_in());
        assert!(state.can_administer());
    }

    #[wasm_bindgen_test]
    fn test_from_token_staff_cannot_administer() {
        let token_str = token_with(serde_json::json!({
            "userId": "7",
            "level": "STAFF",
            "exp": 2_000_000_000i64,
        }));

        let state = AuthState::from_token(&token_str, 1_000_000_000).unwrap();
        assert!(state.is_logged_in());
        assert!(!state.can_administer());
    }

    #[wasm_bindgen_test]
    fn test_resolve_initial_absent() {
        let (state, disposition) = resolve_initial(None, 1_000);
        assert!(!state.is_logged_in());
        assert_eq!(disposition, TokenDisposition::Absent);
    }

    #[wasm_bindgen_test]
    fn test_resolve_initial_expired_token_is_discarded() {
        let token_str = token_with(serde_json::json!({
            "userId": "7",
            "level": "STAFF",
            "exp": 1_000i64,
        }));

        let (state, disposition) = resolve_initial(Some(token_str), 2_000);
        assert!(!state.is_logged_in());
        assert_eq!(state, AuthState::logged_out());
        assert_eq!(disposition, TokenDisposition::Discard);
    }

    #[wasm_bindgen_test]
    fn test_resolve_initial_missing_claims_discarded() {
        // No userId claim.
        let token_str = token_with(serde_json::json!({
            "level": "ADMIN",
            "exp": 2_000_000_000i64,
        }));
        let (state, disposition) = resolve_initial(Some(token_str), 1_000);
        assert!(!state.is_logged_in());
        assert_eq!(disposition, TokenDisposition::Discard);

        // No level claim.
        let token_str = token_with(serde_json::json!({
            "userId": "7",
            "exp": 2_000_000_000i64,
        }));
        let (_, disposition) = resolve_initial(Some(token_str), 1_000);
        assert_eq!(disposition, TokenDisposition::Discard);
    }

    #[wasm_bindgen_test]
    fn test_resolve_initial_valid_token_kept() {
        let token_str = token_with(serde_json::json!({
            "userId": "7",
            "level": "STAFF",
            "exp": 2_000_000_000i64,
        }));

        let (state, disposition) = resolve_initial(Some(token_str), 1_000_000_000);
        assert!(state.is_logged_in());
        assert_eq!(disposition, TokenDisposition::Keep);
    }

    #[wasm_bindgen_test]
    fn test_garbage_token_discarded() {
        let (state, disposition) = resolve_initial(Some("not a jwt".to_string()), 1_000);
        assert!(!state.is_logged_in());
        assert_eq!(disposition, TokenDisposition::Discard);
    }
}
