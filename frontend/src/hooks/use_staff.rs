use shared::{AddPresenceRequest, PresenceRecord, StaffUser};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::dates;
use crate::services::logging::Logger;

const COMPONENT: &str = "staff";

#[derive(Clone, PartialEq)]
pub struct StaffState {
    pub users: Vec<StaffUser>,
    pub loading: bool,
}

#[derive(Clone, PartialEq)]
pub struct StaffActions {
    pub refresh: Callback<()>,
    /// `(user_ids, date_input)` — record presence for every selected staff
    /// member on the given YYYY-MM-DD day.
    pub add_presence: Callback<(Vec<i64>, String)>,
    /// `(user_id, presence_id)` — drop one presence record.
    pub remove_presence: Callback<(i64, i64)>,
}

#[derive(Clone, PartialEq)]
pub struct UseStaffResult {
    pub state: StaffState,
    pub actions: StaffActions,
}

#[hook]
pub fn use_staff(api_client: &ApiClient) -> UseStaffResult {
    let users = use_state(Vec::<StaffUser>::new);
    let loading = use_state(|| false);

    let refresh = {
        let api_client = api_client.clone();
        let users = users.clone();
        let loading = loading.clone();

        use_callback((), move |_, _| {
            let api_client = api_client.clone();
            let users = users.clone();
            let loading = loading.clone();

            spawn_local(async move {
                loading.set(true);
                match api_client.list_users().await {
                    Ok(list) => users.set(list),
                    Err(e) => {
                        Logger::error(COMPONENT, &format!("failed to fetch staff list: {e}"));
                    }
                }
                loading.set(false);
            });
        })
    };

    let add_presence = {
        let api_client = api_client.clone();
        let users = users.clone();

        use_callback((), move |(user_ids, date): (Vec<i64>, String), _| {
            let Some(created_at) = dates::date_input_to_iso_midnight(&date) else {
                Logger::warn(COMPONENT, &format!("ignoring invalid presence date {date:?}"));
                return;
            };
            if user_ids.is_empty() {
                return;
            }

            let api_client = api_client.clone();
            let users = users.clone();

            spawn_local(async move {
                let request = AddPresenceRequest {
                    created_at: created_at.clone(),
                };
                let mut updated = (*users).clone();

                for user_id in user_ids {
                    match api_client.add_presence(user_id, &request).await {
                        Ok(response) => {
                            if let Some(user) = updated.iter_mut().find(|u| u.id == user_id) {
                                user.presence.push(PresenceRecord {
                                    id: response.id,
                                    created_at: created_at.clone(),
                                });
                            }
                        }
                        Err(e) => {
                            // One rejected user must not stop the rest.
                            Logger::error(
                                COMPONENT,
                                &format!("failed to add presence for user {user_id}: {e}"),
                            );
                        }
                    }
                }

                users.set(updated);
            });
        })
    };

    let remove_presence = {
        let api_client = api_client.clone();
        let users = users.clone();

        use_callback((), move |(user_id, presence_id): (i64, i64), _| {
            let api_client = api_client.clone();
            let users = users.clone();

            spawn_local(async move {
                match api_client.remove_presence(presence_id).await {
                    Ok(()) => {
                        let mut updated = (*users).clone();
                        if let Some(user) = updated.iter_mut().find(|u| u.id == user_id) {
                            user.presence.retain(|p| p.id != presence_id);
                        }
                        users.set(updated);
                    }
                    Err(e) => {
                        Logger::error(
                            COMPONENT,
                            &format!("failed to remove presence {presence_id}: {e}"),
                        );
                    }
                }
            });
        })
    };

    // Roster loads once on mount.
    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    let state = StaffState {
        users: (*users).clone(),
        loading: *loading,
    };

    let actions = StaffActions {
        refresh,
        add_presence,
        remove_presence,
    };

    UseStaffResult { state, actions }
}
