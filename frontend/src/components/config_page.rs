use shared::Child;
use wasm_bindgen_futures::spawn_local;
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::components::create_child_modal::CreateChildModal;
use crate::components::response_modal::{ModalStatus, ResponseModal};
use crate::services::api::ApiClient;
use crate::services::logging::Logger;
use crate::services::session::AuthHandle;

const COMPONENT: &str = "config";

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[derive(Properties, PartialEq)]
pub struct ConfigPageProps {
    pub api_client: ApiClient,
}

/// Settings screen: roster overview, child creation, and the admin-only
/// danger zone (point reset, table adjust).
#[function_component(ConfigPage)]
pub fn config_page(props: &ConfigPageProps) -> Html {
    let auth = use_context::<AuthHandle>().expect("ConfigPage rendered outside the auth context");

    let children = use_state(Vec::<Child>::new);
    let create_open = use_state(|| false);
    let modal = use_state(|| Option::<(ModalStatus, String)>::None);

    let fetch_children = {
        let api_client = props.api_client.clone();
        let children = children.clone();

        use_callback((), move |_, _| {
            let api_client = api_client.clone();
            let children = children.clone();

            spawn_local(async move {
                match api_client.all_children().await {
                    Ok(mut list) => {
                        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
                        children.set(list);
                    }
                    Err(e) => {
                        Logger::error(COMPONENT, &format!("failed to fetch children: {e}"));
                    }
                }
            });
        })
    };

    {
        let fetch_children = fetch_children.clone();
        use_effect_with((), move |_| {
            fetch_children.emit(());
            || ()
        });
    }

    let on_create_success = {
        let create_open = create_open.clone();
        let fetch_children = fetch_children.clone();
        let modal = modal.clone();

        Callback::from(move |_| {
            create_open.set(false);
            modal.set(Some((
                ModalStatus::Success,
                "Child created successfully.".to_string(),
            )));
            fetch_children.emit(());
        })
    };

    let on_reset_points = {
        let api_client = props.api_client.clone();
        let modal = modal.clone();
        let fetch_children = fetch_children.clone();

        Callback::from(move |_: MouseEvent| {
            if !confirm("Reset every child's points?") {
                return;
            }

            let api_client = api_client.clone();
            let modal = modal.clone();
            let fetch_children = fetch_children.clone();

            spawn_local(async move {
                match api_client.reset_all_points().await {
                    Ok(()) => {
                        modal.set(Some((ModalStatus::Success, "Points reset.".to_string())));
                        fetch_children.emit(());
                    }
                    Err(message) => {
                        modal.set(Some((
                            ModalStatus::Error,
                            format!("Failed to reset points: {message}"),
                        )));
                    }
                }
            });
        })
    };

    let on_adjust_tables = {
        let api_client = props.api_client.clone();
        let modal = modal.clone();

        Callback::from(move |_: MouseEvent| {
            if !confirm("Run the table adjustment?") {
                return;
            }

            let api_client = api_client.clone();
            let modal = modal.clone();

            spawn_local(async move {
                match api_client.adjust_tables().await {
                    Ok(()) => {
                        modal.set(Some((
                            ModalStatus::Success,
                            "Table adjustment finished.".to_string(),
                        )));
                    }
                    Err(message) => {
                        modal.set(Some((
                            ModalStatus::Error,
                            format!("Table adjustment failed: {message}"),
                        )));
                    }
                }
            });
        })
    };

    html! {
        <div class="config-page">
            <h2 class="config-title">{"Settings"}</h2>

            <section class="config-section">
                <header class="config-section-header">
                    <h3>{"Roster"}</h3>
                    <button
                        class="btn btn-primary"
                        onclick={
                            let create_open = create_open.clone();
                            Callback::from(move |_: MouseEvent| create_open.set(true))
                        }
                    >
                        {"New child"}
                    </button>
                </header>

                <table class="roster-table">
                    <thead>
                        <tr>
                            <th>{"Name"}</th>
                            <th>{"Age"}</th>
                            <th>{"Points"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {for children.iter().map(|child| {
                            html! {
                                <tr key={child.id}>
                                    <td>{&child.name}</td>
                                    <td>{child.age.clone().unwrap_or_else(|| "-".to_string())}</td>
                                    <td>{child.display_total()}</td>
                                </tr>
                            }
                        })}
                    </tbody>
                </table>
            </section>

            {if auth.can_administer() {
                html! {
                    <section class="config-section danger-zone">
                        <h3>{"Danger zone"}</h3>
                        <button class="btn btn-danger" onclick={on_adjust_tables}>
                            {"Adjust tables"}
                        </button>
                        <button class="btn btn-danger" onclick={on_reset_points}>
                            {"Reset all points"}
                        </button>
                    </section>
                }
            } else {
                html! {}
            }}

            <CreateChildModal
                api_client={props.api_client.clone()}
                is_open={*create_open}
                on_success={on_create_success}
                on_close={
                    let create_open = create_open.clone();
                    Callback::from(move |_| create_open.set(false))
                }
            />

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
