use std::cell::RefCell;
use std::rc::Rc;

use shared::{Child, ChildPage};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

const COMPONENT: &str = "children";

/// Page size requested from the paginated listing.
pub const PAGE_SIZE: u32 = 10;

/// An age window ("sala") partitioning the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBand {
    pub min: u32,
    pub max: u32,
}

impl AgeBand {
    pub fn label(&self) -> String {
        format!("{}-{}", self.min, self.max)
    }
}

/// The three fixed salas of the home screen.
pub const SALAS: [AgeBand; 3] = [
    AgeBand { min: 3, max: 5 },
    AgeBand { min: 6, max: 8 },
    AgeBand { min: 9, max: 11 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Result set replaces whatever is displayed (reload, search).
    Replace,
    /// Result set appends to the displayed rows (load more).
    Append,
}

/// Everything one fetch needs; produced by the pager while it holds the
/// single in-flight slot.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    pub skip: u32,
    pub take: u32,
    pub search: Option<String>,
    pub mode: FetchMode,
}

/// Pagination state machine for the filtered child listing. `begin_*`
/// claims the single in-flight slot (the mutual-exclusion guard — at most
/// one outstanding fetch, so responses apply in request order);
/// `complete`/`fail` release it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildPager {
    skip: u32,
    take: u32,
    has_next: bool,
    in_flight: bool,
    search: String,
}

impl Default for ChildPager {
    fn default() -> Self {
        Self {
            skip: 0,
            take: PAGE_SIZE,
            has_next: true,
            in_flight: false,
            search: String::new(),
        }
    }
}

impl ChildPager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next
    }

    pub fn is_searching(&self) -> bool {
        !self.search.trim().is_empty()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    fn search_param(&self) -> Option<String> {
        if self.is_searching() {
            Some(self.search.trim().to_string())
        } else {
            None
        }
    }

    /// Reset to page one and claim the slot. `None` while a fetch is
    /// already outstanding.
    pub fn begin_reload(&mut self) -> Option<FetchPlan> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        self.skip = 0;
        self.has_next = true;
        Some(FetchPlan {
            skip: 0,
            take: self.take,
            search: self.search_param(),
            mode: FetchMode::Replace,
        })
    }

    /// Claim the slot for the next page. `None` while a fetch is
    /// outstanding, when no further page is known, or while a search is
    /// active (search replaces, never appends).
    pub fn begin_load_more(&mut self) -> Option<FetchPlan> {
        if self.in_flight || !self.has_next || self.is_searching() {
            return None;
        }
        self.in_flight = true;
        Some(FetchPlan {
            skip: self.skip,
            take: self.take,
            search: None,
            mode: FetchMode::Append,
        })
    }

    /// Apply a successful page: release the slot and advance the cursor
    /// from the server-reported skip. While searching, pagination is pinned
    /// off.
    pub fn complete(&mut self, page: &ChildPage) {
        self.in_flight = false;
        if self.is_searching() {
            self.skip = 0;
            self.has_next = false;
        } else {
            self.skip = page.current_skip + self.take;
            self.has_next = page.has_next_page;
        }
    }

    /// Release the slot after a failed fetch. A failed reload resets to the
    /// clean retryable baseline; a failed load-more leaves the cursor and
    /// the already-displayed rows alone.
    pub fn fail(&mut self, mode: FetchMode) {
        self.in_flight = false;
        if mode == FetchMode::Replace {
            self.skip = 0;
            self.has_next = true;
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct ChildrenState {
    pub children: Vec<Child>,
    pub loading: bool,
    pub has_next_page: bool,
    pub search_term: String,
}

#[derive(Clone, PartialEq)]
pub struct ChildrenActions {
    pub reload: Callback<()>,
    pub load_more: Callback<()>,
    pub set_search_term: Callback<String>,
}

#[derive(Clone, PartialEq)]
pub struct UseChildrenResult {
    pub state: ChildrenState,
    pub actions: ChildrenActions,
}

async fn run_fetch(
    api_client: ApiClient,
    band: AgeBand,
    plan: FetchPlan,
    pager: Rc<RefCell<ChildPager>>,
    children: UseStateHandle<Vec<Child>>,
    has_next: UseStateHandle<bool>,
    loading: UseStateHandle<bool>,
) {
    loading.set(true);

    let result = api_client
        .children_by_age(band.min, band.max, plan.skip, plan.take, plan.search.as_deref())
        .await;

    match result {
        Ok(page) => {
            let rows = match plan.mode {
                FetchMode::Replace => page.data.clone(),
                FetchMode::Append => {
                    let mut all = (*children).clone();
                    all.extend(page.data.iter().cloned());
                    all
                }
            };
            pager.borrow_mut().complete(&page);
            children.set(rows);
        }
        Err(message) => {
            Logger::error(COMPONENT, &format!("failed to fetch children: {message}"));
            pager.borrow_mut().fail(plan.mode);
            if plan.mode == FetchMode::Replace {
                children.set(Vec::new());
            }
        }
    }

    has_next.set(pager.borrow().has_next_page());
    loading.set(false);
}

#[hook]
pub fn use_children(api_client: &ApiClient, band: AgeBand) -> UseChildrenResult {
    let pager = use_mut_ref(ChildPager::new);
    let children = use_state(Vec::<Child>::new);
    let loading = use_state(|| false);
    let has_next = use_state(|| true);
    let search_term = use_state(String::new);

    let reload = {
        let api_client = api_client.clone();
        let pager = pager.clone();
        let children = children.clone();
        let has_next = has_next.clone();
        let loading = loading.clone();

        use_callback(band, move |_, band| {
            let Some(plan) = pager.borrow_mut().begin_reload() else {
                return;
            };
            // Replace semantics: the stale rows go away before page one lands.
            children.set(Vec::new());
            spawn_local(run_fetch(
                api_client.clone(),
                *band,
                plan,
                pager.clone(),
                children.clone(),
                has_next.clone(),
                loading.clone(),
            ));
        })
    };

    let load_more = {
        let api_client = api_client.clone();
        let pager = pager.clone();
        let children = children.clone();
        let has_next = has_next.clone();
        let loading = loading.clone();

        use_callback(band, move |_, band| {
            let Some(plan) = pager.borrow_mut().begin_load_more() else {
                return;
            };
            spawn_local(run_fetch(
                api_client.clone(),
                *band,
                plan,
                pager.clone(),
                children.clone(),
                has_next.clone(),
                loading.clone(),
            ));
        })
    };

    let set_search_term = {
        let pager = pager.clone();
        let search_term = search_term.clone();

        use_callback((), move |term: String, _| {
            pager.borrow_mut().set_search(term.clone());
            search_term.set(term);
        })
    };

    // First render and every sala change start from page one.
    {
        let reload = reload.clone();
        use_effect_with(band, move |_| {
            reload.emit(());
            || ()
        });
    }

    let state = ChildrenState {
        children: (*children).clone(),
        loading: *loading,
        has_next_page: *has_next,
        search_term: (*search_term).clone(),
    };

    let actions = ChildrenActions {
        reload,
        load_more,
        set_search_term,
    };

    UseChildrenResult { state, actions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn page(current_skip: u32, has_next_page: bool) -> ChildPage {
        ChildPage {
            total: 50,
            page_size: PAGE_SIZE,
            current_skip,
            has_next_page,
            data: Vec::new(),
        }
    }

    #[wasm_bindgen_test]
    fn test_load_more_refused_while_in_flight() {
        let mut pager = ChildPager::new();

        let first = pager.begin_load_more();
        assert!(first.is_some());

        // The slot is taken: neither a second load-more nor a reload may
        // start until the first resolves.
        assert!(pager.begin_load_more().is_none());
        assert!(pager.begin_reload().is_none());

        pager.complete(&page(0, true));
        assert!(pager.begin_load_more().is_some());
    }

    #[wasm_bindgen_test]
    fn test_cursor_advances_from_server_reported_skip() {
        let mut pager = ChildPager::new();

        let plan = pager.begin_load_more().unwrap();
        assert_eq!(plan.skip, 0);
        assert_eq!(plan.mode, FetchMode::Append);

        pager.complete(&page(0, true));
        let plan = pager.begin_load_more().unwrap();
        assert_eq!(plan.skip, PAGE_SIZE);

        pager.complete(&page(PAGE_SIZE, false));
        assert!(!pager.has_next_page());
        assert!(pager.begin_load_more().is_none());
    }

    #[wasm_bindgen_test]
    fn test_search_reload_replaces_and_disables_pagination() {
        let mut pager = ChildPager::new();
        pager.set_search("ana");

        let plan = pager.begin_reload().unwrap();
        assert_eq!(plan.mode, FetchMode::Replace);
        assert_eq!(plan.search.as_deref(), Some("ana"));

        // Even if the server claims more pages, searching pins them off.
        pager.complete(&page(0, true));
        assert!(!pager.has_next_page());
        assert!(pager.begin_load_more().is_none());
    }

    #[wasm_bindgen_test]
    fn test_blank_search_is_no_filter() {
        let mut pager = ChildPager::new();
        pager.set_search("   ");
        assert!(!pager.is_searching());
        let plan = pager.begin_reload().unwrap();
        assert_eq!(plan.search, None);
    }

    #[wasm_bindgen_test]
    fn test_failed_reload_resets_to_retryable_state() {
        let mut pager = ChildPager::new();
        pager.begin_load_more();
        pager.complete(&page(0, true));

        let plan = pager.begin_reload().unwrap();
        pager.fail(plan.mode);

        // Back to the clean baseline: retry possible, cursor at zero.
        assert!(pager.has_next_page());
        let plan = pager.begin_reload().unwrap();
        assert_eq!(plan.skip, 0);
    }

    #[wasm_bindgen_test]
    fn test_failed_load_more_keeps_cursor() {
        let mut pager = ChildPager::new();
        pager.begin_load_more();
        pager.complete(&page(0, true));

        let plan = pager.begin_load_more().unwrap();
        assert_eq!(plan.skip, PAGE_SIZE);
        pager.fail(plan.mode);

        // Cursor untouched; the same page can be requested again.
        let plan = pager.begin_load_more().unwrap();
        assert_eq!(plan.skip, PAGE_SIZE);
    }

    #[wasm_bindgen_test]
    fn test_reload_resets_cursor() {
        let mut pager = ChildPager::new();
        pager.begin_load_more();
        pager.complete(&page(0, true));
        pager.begin_load_more();
        pager.complete(&page(PAGE_SIZE, true));

        let plan = pager.begin_reload().unwrap();
        assert_eq!(plan.skip, 0);
        pager.complete(&page(0, true));
        assert_eq!(pager.begin_load_more().unwrap().skip, PAGE_SIZE);
    }
}
