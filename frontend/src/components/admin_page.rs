use std::collections::HashSet;

use shared::StaffUser;
use web_sys::{HtmlInputElement, HtmlSelectElement, MouseEvent};
use yew::prelude::*;

use crate::hooks::use_staff::use_staff;
use crate::services::api::ApiClient;
use crate::services::dates;

/// Case- and accent-insensitive fold for matching Portuguese names.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn matches_search(user: &StaffUser, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    let needle = normalize(term.trim());
    normalize(&user.username).contains(&needle) || user.id.to_string().contains(needle.as_str())
}

#[derive(Properties, PartialEq)]
pub struct AdminPageProps {
    pub api_client: ApiClient,
}

/// Presence administration: pick a day, pick staff members, record or drop
/// presence entries.
#[function_component(AdminPage)]
pub fn admin_page(props: &AdminPageProps) -> Html {
    let staff = use_staff(&props.api_client);

    let search_term = use_state(String::new);
    let selected = use_state(Vec::<i64>::new);
    let date = use_state(dates::current_date_input);
    let expanded = use_state(HashSet::<i64>::new);

    let on_search_input = {
        let search_term = search_term.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search_term.set(input.value());
        })
    };

    let on_date_change = {
        let date = date.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            date.set(input.value());
        })
    };

    let on_select_user = {
        let selected = selected.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(user_id) = select.value().parse::<i64>() {
                let mut ids = (*selected).clone();
                if !ids.contains(&user_id) {
                    ids.push(user_id);
                    selected.set(ids);
                }
            }
        })
    };

    let on_unselect_user = {
        let selected = selected.clone();
        Callback::from(move |user_id: i64| {
            let ids: Vec<i64> = selected.iter().copied().filter(|id| *id != user_id).collect();
            selected.set(ids);
        })
    };

    let on_save = {
        let add_presence = staff.actions.add_presence.clone();
        let selected = selected.clone();
        let date = date.clone();

        Callback::from(move |_: MouseEvent| {
            if selected.is_empty() || date.is_empty() {
                return;
            }
            add_presence.emit(((*selected).clone(), (*date).clone()));
            selected.set(Vec::new());
        })
    };

    let on_toggle_user = {
        let expanded = expanded.clone();
        Callback::from(move |user_id: i64| {
            let mut open = (*expanded).clone();
            if !open.remove(&user_id) {
                open.insert(user_id);
            }
            expanded.set(open);
        })
    };

    let visible: Vec<StaffUser> = staff
        .state
        .users
        .iter()
        .filter(|user| matches_search(user, &search_term))
        .cloned()
        .collect();

    html! {
        <div class="admin-page">
            <h2 class="admin-title">{"Presence Administration"}</h2>

            <section class="presence-form">
                <input
                    class="admin-search"
                    type="search"
                    placeholder="Search staff"
                    value={(*search_term).clone()}
                    oninput={on_search_input}
                />

                <input
                    class="presence-date"
                    type="date"
                    max={dates::current_date_input()}
                    value={(*date).clone()}
                    onchange={on_date_change}
                />

                <select class="presence-user-select" onchange={on_select_user}>
                    <option value="" selected=true disabled=true>{"Add staff member..."}</option>
                    {for staff.state.users.iter().map(|user| {
                        html! {
                            <option value={user.id.to_string()}>{&user.username}</option>
                        }
                    })}
                </select>

                <div class="presence-selected">
                    {for selected.iter().map(|user_id| {
                        let user_id = *user_id;
                        let username = staff
                            .state
                            .users
                            .iter()
                            .find(|u| u.id == user_id)
                            .map(|u| u.username.clone())
                            .unwrap_or_else(|| user_id.to_string());
                        let on_unselect_user = on_unselect_user.clone();
                        html! {
                            <span class="presence-chip">
                                {username}
                                <button
                                    class="presence-chip-remove"
                                    onclick={Callback::from(move |_: MouseEvent| on_unselect_user.emit(user_id))}
                                >{"×"}</button>
                            </span>
                        }
                    })}
                </div>

                <button
                    class="btn btn-primary"
                    onclick={on_save}
                    disabled={selected.is_empty() || date.is_empty()}
                >
                    {"Record presence"}
                </button>
            </section>

            {if staff.state.loading {
                html! { <div class="loading">{"Loading staff..."}</div> }
            } else {
                html! {}
            }}

            <section class="staff-list">
                {for visible.iter().map(|user| {
                    let user_id = user.id;
                    let is_open = expanded.contains(&user_id);
                    let on_toggle_user = on_toggle_user.clone();
                    let remove_presence = staff.actions.remove_presence.clone();

                    html! {
                        <article class="staff-entry" key={user_id}>
                            <header class="staff-entry-header">
                                <span class="staff-name">{&user.username}</span>
                                <span class="staff-presence-count">
                                    {format!("{} days", user.presence.len())}
                                </span>
                                <button
                                    class="staff-toggle"
                                    onclick={Callback::from(move |_: MouseEvent| on_toggle_user.emit(user_id))}
                                >
                                    {if is_open { "▲" } else { "▼" }}
                                </button>
                            </header>

                            {if is_open {
                                html! {
                                    <ul class="presence-records">
                                        {for user.presence.iter().map(|record| {
                                            let record_id = record.id;
                                            let remove_presence = remove_presence.clone();
                                            html! {
                                                <li class="presence-record" key={record_id}>
                                                    <span>{dates::format_record_date(&record.created_at)}</span>
                                                    <button
                                                        class="presence-record-remove"
                                                        onclick={Callback::from(move |_: MouseEvent| {
                                                            remove_presence.emit((user_id, record_id))
                                                        })}
                                                    >{"Remove"}</button>
                                                </li>
                                            }
                                        })}
                                    </ul>
                                }
                            } else {
                                html! {}
                            }}
                        </article>
                    }
                })}
            </section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn user(id: i64, username: &str) -> StaffUser {
        StaffUser {
            id,
            username: username.to_string(),
            position: None,
            avatar_url: None,
            presence: Vec::new(),
        }
    }

    #[wasm_bindgen_test]
    fn test_normalize_strips_accents() {
        assert_eq!(normalize("João Conceição"), "joao conceicao");
        assert_eq!(normalize("ANDRÉ"), "andre");
    }

    #[wasm_bindgen_test]
    fn test_matches_search_accent_insensitive() {
        let u = user(12, "João");
        assert!(matches_search(&u, "joao"));
        assert!(matches_search(&u, "JOÃ"));
        assert!(matches_search(&u, "12"));
        assert!(!matches_search(&u, "maria"));
        assert!(matches_search(&u, "   "));
    }
}
