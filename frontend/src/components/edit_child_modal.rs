use shared::{Child, UpdateChildRequest};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, MouseEvent};
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::dates;

#[derive(Properties, PartialEq)]
pub struct EditChildModalProps {
    pub child: Child,
    pub api_client: ApiClient,
    pub editor_user_id: i64,
    pub is_open: bool,
    pub on_close: Callback<()>,
    pub on_saved: Callback<()>,
}

/// Admin edit of a child: name, birth date and the desired point total.
/// The backend recreates the point rows to match the submitted total.
#[function_component(EditChildModal)]
pub fn edit_child_modal(props: &EditChildModalProps) -> Html {
    let name = use_state(String::new);
    let birth_date = use_state(String::new);
    let total = use_state(String::new);
    let saving = use_state(|| false);
    let error_message = use_state(|| Option::<String>::None);

    // Populate the form from the current record each time the modal opens.
    {
        let name = name.clone();
        let birth_date = birth_date.clone();
        let total = total.clone();
        let saving = saving.clone();
        let error_message = error_message.clone();
        let child = props.child.clone();

        use_effect_with(props.is_open, move |is_open| {
            if *is_open {
                name.set(child.name.clone());
                birth_date.set(
                    child
                        .birth_date
                        .as_deref()
                        .map(dates::normalize_date_input)
                        .unwrap_or_default(),
                );
                total.set(child.display_total().to_string());
                saving.set(false);
                error_message.set(None);
            }
            || ()
        });
    }

    let on_name_change = {
        let name = name.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            name.set(input.value());
        })
    };

    let on_birth_date_change = {
        let birth_date = birth_date.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            birth_date.set(input.value());
        })
    };

    let on_total_change = {
        let total = total.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            total.set(input.value());
        })
    };

    let on_submit = {
        let api_client = props.api_client.clone();
        let child_id = props.child.id;
        let editor_user_id = props.editor_user_id;
        let name = name.clone();
        let birth_date = birth_date.clone();
        let total = total.clone();
        let saving = saving.clone();
        let error_message = error_message.clone();
        let on_saved = props.on_saved.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let trimmed_name = (*name).trim().to_string();
            if trimmed_name.is_empty() {
                error_message.set(Some("Please enter the child's name".to_string()));
                return;
            }
            let desired_total = (*total).trim().parse::<u32>().unwrap_or(0);

            saving.set(true);
            error_message.set(None);

            let api_client = api_client.clone();
            let birth_date = birth_date.clone();
            let saving = saving.clone();
            let error_message = error_message.clone();
            let on_saved = on_saved.clone();
            let on_close = on_close.clone();

            spawn_local(async move {
                let request = UpdateChildRequest::with_total(
                    trimmed_name,
                    (*birth_date).clone(),
                    editor_user_id,
                    desired_total,
                );

                match api_client.update_child(child_id, &request).await {
                    Ok(()) => {
                        saving.set(false);
                        on_saved.emit(());
                        on_close.emit(());
                    }
                    Err(message) => {
                        saving.set(false);
                        error_message.set(Some(message));
                    }
                }
            });
        })
    };

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(());
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            on_close.emit(());
        })
    };

    if !props.is_open {
        return html! {};
    }

    html! {
        <div class="edit-child-modal-backdrop" onclick={on_backdrop_click}>
            <div class="edit-child-modal" onclick={on_modal_click}>
                <h3 class="edit-child-title">{"Edit Child"}</h3>

                {if let Some(message) = (*error_message).clone() {
                    html! { <div class="form-message error">{message}</div> }
                } else {
                    html! {}
                }}

                <form class="edit-child-form" onsubmit={on_submit}>
                    <div class="form-group">
                        <label for="edit-child-name">{"Name"}</label>
                        <input
                            id="edit-child-name"
                            type="text"
                            value={(*name).clone()}
                            onchange={on_name_change}
                            disabled={*saving}
                        />
                    </div>

                    <div class="form-group">
                        <label for="edit-child-birthdate">{"Birth date"}</label>
                        <input
                            id="edit-child-birthdate"
                            type="date"
                            value={(*birth_date).clone()}
                            onchange={on_birth_date_change}
                            disabled={*saving}
                        />
                    </div>

                    <div class="form-group">
                        <label for="edit-child-points">{"Points (total)"}</label>
                        <input
                            id="edit-child-points"
                            type="number"
                            min="0"
                            step="1"
                            value={(*total).clone()}
                            onchange={on_total_change}
                            disabled={*saving}
                        />
                        <span class="form-hint">
                            {"Saving rewrites the stored points to match this total."}
                        </span>
                    </div>

                    <div class="edit-child-buttons">
                        <button type="button" class="btn btn-secondary" onclick={on_cancel} disabled={*saving}>
                            {"Cancel"}
                        </button>
                        <button type="submit" class="btn btn-primary" disabled={*saving}>
                            {if *saving { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
