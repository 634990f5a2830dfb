use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;
use crate::services::session::{AuthAction, AuthHandle};

const COMPONENT: &str = "points";

/// Hard per-child ceiling on points awarded in one session, checked before
/// any request is sent. A UX throttle, not a server-side guarantee.
pub const SESSION_POINT_CAP: u32 = 4;

/// How long the "just added" marker stays on a card.
const ANIMATION_MS: u32 = 800;

/// Client-local overlay of points added this session, keyed by child id.
/// Counts here are a hint for immediate feedback, never authoritative —
/// the server-computed totals replace them on the next reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointLedger {
    counts: HashMap<i64, u32>,
}

impl PointLedger {
    pub fn count(&self, child_id: i64) -> u32 {
        self.counts.get(&child_id).copied().unwrap_or(0)
    }

    pub fn is_at_cap(&self, child_id: i64) -> bool {
        self.count(child_id) >= SESSION_POINT_CAP
    }

    /// Optimistically count one point. Returns `false` (leaving the ledger
    /// untouched) at the session ceiling; no request may be sent then.
    pub fn stage_add(&mut self, child_id: i64) -> bool {
        let current = self.count(child_id);
        if current >= SESSION_POINT_CAP {
            return false;
        }
        self.counts.insert(child_id, current + 1);
        true
    }

    /// Undo a staged add after the backend rejected it, flooring at zero.
    pub fn revert_add(&mut self, child_id: i64) {
        let current = self.count(child_id);
        self.counts.insert(child_id, current.saturating_sub(1));
    }

    /// Optimistically uncount one point. Returns `false` at zero; no
    /// request may be sent then.
    pub fn stage_remove(&mut self, child_id: i64) -> bool {
        let current = self.count(child_id);
        if current == 0 {
            return false;
        }
        self.counts.insert(child_id, current - 1);
        true
    }

    /// Undo a staged remove after the backend rejected it.
    pub fn revert_remove(&mut self, child_id: i64) {
        let current = self.count(child_id);
        self.counts.insert(child_id, current + 1);
    }

    /// Adopt the server-known session count for a child the session has not
    /// touched yet. Returns whether anything changed.
    pub fn seed(&mut self, child_id: i64, count: u32) -> bool {
        if self.counts.contains_key(&child_id) {
            return false;
        }
        self.counts.insert(child_id, count);
        true
    }
}

#[derive(Clone, PartialEq)]
pub struct PointsState {
    /// Render snapshot of the overlay.
    pub ledger: PointLedger,
    /// Children currently showing the "just added" animation.
    pub animating: HashSet<i64>,
    /// Message from the last failed mutation, until dismissed.
    pub error: Option<String>,
    /// Increments after every acknowledged mutation so list views can
    /// refresh authoritative totals.
    pub reload_tick: u32,
}

#[derive(Clone, PartialEq)]
pub struct PointsActions {
    pub add_point: Callback<i64>,
    pub remove_point: Callback<i64>,
    /// `(child_id, server_known_count)` — fills the overlay for a child the
    /// session has not touched yet.
    pub seed_points: Callback<(i64, u32)>,
    pub dismiss_error: Callback<()>,
}

#[derive(Clone, PartialEq)]
pub struct UsePointsResult {
    pub state: PointsState,
    pub actions: PointsActions,
}

/// One reconcile path for both mutations: the optimistic change is already
/// applied; on failure the inverse runs and the message is surfaced.
async fn reconcile<Fut>(
    request: Fut,
    child_id: i64,
    revert: fn(&mut PointLedger, i64),
    ledger: Rc<RefCell<PointLedger>>,
    snapshot: UseStateHandle<PointLedger>,
    error: UseStateHandle<Option<String>>,
    tick_ref: Rc<RefCell<u32>>,
    tick: UseStateHandle<u32>,
) where
    Fut: Future<Output = Result<(), String>>,
{
    match request.await {
        Ok(()) => {
            // The optimistic value already matches; nudge list views to pull
            // the authoritative totals.
            let mut counter = tick_ref.borrow_mut();
            *counter += 1;
            tick.set(*counter);
        }
        Err(message) => {
            {
                let mut guard = ledger.borrow_mut();
                revert(&mut guard, child_id);
            }
            snapshot.set(ledger.borrow().clone());
            Logger::error(
                COMPONENT,
                &format!("point mutation for child {child_id} failed: {message}"),
            );
            error.set(Some(message));
        }
    }
}

#[hook]
pub fn use_points(api_client: &ApiClient, auth: &AuthHandle) -> UsePointsResult {
    // The RefCell copy is the source of truth for ceiling/floor decisions:
    // rapid clicks observe the latest count even before the next render.
    let ledger = use_mut_ref(PointLedger::default);
    let snapshot = use_state(PointLedger::default);

    let marks_ref = use_mut_ref(HashSet::<i64>::new);
    let marks = use_state(HashSet::<i64>::new);

    let error = use_state(|| Option::<String>::None);

    let tick_ref = use_mut_ref(|| 0u32);
    let tick = use_state(|| 0u32);

    let add_point = {
        let api_client = api_client.clone();
        let ledger = ledger.clone();
        let snapshot = snapshot.clone();
        let marks_ref = marks_ref.clone();
        let marks = marks.clone();
        let error = error.clone();
        let tick_ref = tick_ref.clone();
        let tick = tick.clone();

        use_callback(auth.clone(), move |child_id: i64, auth| {
            let Some(user_id) = auth.user_id.clone() else {
                Logger::error(COMPONENT, "no usable user id in session, forcing logout");
                auth.dispatch(AuthAction::Logout);
                return;
            };

            if !ledger.borrow_mut().stage_add(child_id) {
                // Session ceiling reached: no mutation, no request.
                return;
            }
            snapshot.set(ledger.borrow().clone());

            marks_ref.borrow_mut().insert(child_id);
            marks.set(marks_ref.borrow().clone());
            {
                let marks_ref = marks_ref.clone();
                let marks = marks.clone();
                spawn_local(async move {
                    TimeoutFuture::new(ANIMATION_MS).await;
                    marks_ref.borrow_mut().remove(&child_id);
                    marks.set(marks_ref.borrow().clone());
                });
            }

            let api_client = api_client.clone();
            let request = async move { api_client.add_point(child_id, &user_id).await };
            spawn_local(reconcile(
                request,
                child_id,
                PointLedger::revert_add,
                ledger.clone(),
                snapshot.clone(),
                error.clone(),
                tick_ref.clone(),
                tick.clone(),
            ));
        })
    };

    let remove_point = {
        let api_client = api_client.clone();
        let ledger = ledger.clone();
        let snapshot = snapshot.clone();
        let error = error.clone();
        let tick_ref = tick_ref.clone();
        let tick = tick.clone();

        use_callback((), move |child_id: i64, _| {
            if !ledger.borrow_mut().stage_remove(child_id) {
                // Nothing added this session: no mutation, no request.
                return;
            }
            snapshot.set(ledger.borrow().clone());

            let api_client = api_client.clone();
            let request = async move { api_client.delete_point(child_id).await };
            spawn_local(reconcile(
                request,
                child_id,
                PointLedger::revert_remove,
                ledger.clone(),
                snapshot.clone(),
                error.clone(),
                tick_ref.clone(),
                tick.clone(),
            ));
        })
    };

    let seed_points = {
        let ledger = ledger.clone();
        let snapshot = snapshot.clone();

        use_callback((), move |(child_id, count): (i64, u32), _| {
            if ledger.borrow_mut().seed(child_id, count) {
                snapshot.set(ledger.borrow().clone());
            }
        })
    };

    let dismiss_error = {
        let error = error.clone();
        use_callback((), move |_, _| error.set(None))
    };

    let state = PointsState {
        ledger: (*snapshot).clone(),
        animating: (*marks).clone(),
        error: (*error).clone(),
        reload_tick: *tick,
    };

    let actions = PointsActions {
        add_point,
        remove_point,
        seed_points,
        dismiss_error,
    };

    UsePointsResult { state, actions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_add_stops_at_session_cap() {
        let mut ledger = PointLedger::default();
        for _ in 0..SESSION_POINT_CAP {
            assert!(ledger.stage_add(1));
        }
        assert_eq!(ledger.count(1), SESSION_POINT_CAP);

        // At the ceiling the stage is refused and the count is unchanged,
        // so the caller never issues a request.
        assert!(!ledger.stage_add(1));
        assert_eq!(ledger.count(1), SESSION_POINT_CAP);
        assert!(ledger.is_at_cap(1));
    }

    #[wasm_bindgen_test]
    fn test_rapid_clicks_near_cap() {
        let mut ledger = PointLedger::default();
        ledger.seed(1, 3);

        // Three quick clicks while earlier requests are still in flight:
        // only the first may stage, the count never exceeds the cap.
        let staged: Vec<bool> = (0..3).map(|_| ledger.stage_add(1)).collect();
        assert_eq!(staged, vec![true, false, false]);
        assert_eq!(ledger.count(1), SESSION_POINT_CAP);
    }

    #[wasm_bindgen_test]
    fn test_remove_refused_at_zero() {
        let mut ledger = PointLedger::default();
        assert!(!ledger.stage_remove(1));
        assert_eq!(ledger.count(1), 0);
    }

    #[wasm_bindgen_test]
    fn test_failed_add_reverts_to_previous_count() {
        let mut ledger = PointLedger::default();
        ledger.seed(1, 2);

        assert!(ledger.stage_add(1));
        assert_eq!(ledger.count(1), 3);
        ledger.revert_add(1);
        assert_eq!(ledger.count(1), 2);
    }

    #[wasm_bindgen_test]
    fn test_revert_add_floors_at_zero() {
        let mut ledger = PointLedger::default();
        ledger.revert_add(1);
        assert_eq!(ledger.count(1), 0);
    }

    #[wasm_bindgen_test]
    fn test_failed_remove_restores_count() {
        let mut ledger = PointLedger::default();
        ledger.seed(1, 4);

        assert!(ledger.stage_remove(1));
        assert_eq!(ledger.count(1), 3);
        ledger.revert_remove(1);
        assert_eq!(ledger.count(1), 4);
    }

    #[wasm_bindgen_test]
    fn test_seed_only_fills_untouched_children() {
        let mut ledger = PointLedger::default();
        assert!(ledger.seed(1, 2));
        assert!(!ledger.seed(1, 0));
        assert_eq!(ledger.count(1), 2);

        ledger.stage_add(2);
        assert!(!ledger.seed(2, 5));
        assert_eq!(ledger.count(2), 1);
    }

    #[wasm_bindgen_test]
    fn test_independent_children() {
        let mut ledger = PointLedger::default();
        assert!(ledger.stage_add(1));
        assert!(ledger.stage_add(2));
        assert_eq!(ledger.count(1), 1);
        assert_eq!(ledger.count(2), 1);

        ledger.revert_add(2);
        assert_eq!(ledger.count(1), 1);
        assert_eq!(ledger.count(2), 0);
    }
}
