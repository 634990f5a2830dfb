use shared::DeleteChildrenRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, MouseEvent};
use yew::prelude::*;

use crate::components::child_card::ChildCard;
use crate::components::response_modal::{ModalStatus, ResponseModal};
use crate::hooks::use_children::{use_children, AgeBand};
use crate::hooks::use_points::UsePointsResult;
use crate::services::api::ApiClient;
use crate::services::session::AuthHandle;

/// Debounce between a search keystroke and the reload it triggers.
const SEARCH_DEBOUNCE_MS: u32 = 500;

#[derive(Properties, PartialEq)]
pub struct ClassPageProps {
    pub band: AgeBand,
    pub api_client: ApiClient,
    pub points: UsePointsResult,
}

/// Roster of one sala: search, child cards, incremental pagination.
#[function_component(ClassPage)]
pub fn class_page(props: &ClassPageProps) -> Html {
    let auth = use_context::<AuthHandle>().expect("ClassPage rendered outside the auth context");
    let children = use_children(&props.api_client, props.band);

    // Outcome modal for roster mutations (delete).
    let modal = use_state(|| Option::<(ModalStatus, String)>::None);

    // Acknowledged point mutations bump the tick; pull fresh authoritative
    // totals so the overlay never drifts far from the server.
    {
        let reload = children.actions.reload.clone();
        use_effect_with(props.points.state.reload_tick, move |tick| {
            if *tick > 0 {
                reload.emit(());
            }
            || ()
        });
    }

    let on_search_input = {
        let set_search_term = children.actions.set_search_term.clone();
        let reload = children.actions.reload.clone();

        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            set_search_term.emit(input.value());

            let reload = reload.clone();
            spawn_local(async move {
                gloo::timers::future::TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
                reload.emit(());
            });
        })
    };

    let on_load_more = {
        let load_more = children.actions.load_more.clone();
        Callback::from(move |_: MouseEvent| load_more.emit(()))
    };

    let on_delete = {
        let api_client = props.api_client.clone();
        let reload = children.actions.reload.clone();
        let modal = modal.clone();

        Callback::from(move |child_id: i64| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message("Are you sure you want to delete this child?")
                        .ok()
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let api_client = api_client.clone();
            let reload = reload.clone();
            let modal = modal.clone();

            spawn_local(async move {
                let request = DeleteChildrenRequest {
                    ids: vec![child_id],
                };
                match api_client.delete_children(&request).await {
                    Ok(()) => {
                        modal.set(Some((
                            ModalStatus::Success,
                            "Child deleted successfully.".to_string(),
                        )));
                        reload.emit(());
                    }
                    Err(message) => {
                        modal.set(Some((
                            ModalStatus::Error,
                            format!("Failed to delete child: {message}"),
                        )));
                    }
                }
            });
        })
    };

    let editor_user_id = auth
        .user_id
        .as_deref()
        .and_then(|id| id.parse::<i64>().ok())
        .unwrap_or(0);

    let on_changed = {
        let reload = children.actions.reload.clone();
        Callback::from(move |_| reload.emit(()))
    };

    html! {
        <div class="class-page">
            <header class="class-page-header">
                <h2 class="class-title">{format!("Ages {}", props.band.label())}</h2>
                <input
                    class="class-search"
                    type="search"
                    placeholder="Search"
                    value={children.state.search_term.clone()}
                    oninput={on_search_input}
                />
            </header>

            <div class="child-card-list">
                {for children.state.children.iter().map(|child| {
                    html! {
                        <ChildCard
                            key={child.id}
                            child={child.clone()}
                            api_client={props.api_client.clone()}
                            points={props.points.clone()}
                            can_administer={auth.can_administer()}
                            editor_user_id={editor_user_id}
                            on_delete={on_delete.clone()}
                            on_changed={on_changed.clone()}
                        />
                    }
                })}
            </div>

            {if children.state.loading {
                html! { <div class="loading">{"Loading..."}</div> }
            } else if children.state.children.is_empty() {
                html! { <div class="class-empty">{"No children in this sala."}</div> }
            } else {
                html! {}
            }}

            {if children.state.has_next_page && !children.state.loading {
                html! {
                    <button class="btn btn-secondary load-more" onclick={on_load_more}>
                        {"Load more"}
                    </button>
                }
            } else {
                html! {}
            }}

            // Point-mutation failures surface here with the backend's message.
            {if let Some(message) = props.points.state.error.clone() {
                html! {
                    <ResponseModal
                        is_open=true
                        status={ModalStatus::Error}
                        message={message}
                        on_close={
                            let dismiss = props.points.actions.dismiss_error.clone();
                            Callback::from(move |_| dismiss.emit(()))
                        }
                    />
                }
            } else {
                html! {}
            }}

            {if let Some((status, message)) = (*modal).clone() {
                html! {
                    <ResponseModal
                        is_open=true
                        status={status}
                        message={message}
                        on_close={
                            let modal = modal.clone();
                            Callback::from(move |_| modal.set(None))
                        }
                    />
                }
            } else {
                html! {}
            }}
        </div>
    }
}
