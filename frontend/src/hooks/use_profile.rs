use gloo::timers::future::TimeoutFuture;
use shared::StaffUser;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;
use crate::services::session::AuthHandle;

const COMPONENT: &str = "profile";

#[derive(Clone, PartialEq)]
pub struct ProfileState {
    pub user: Option<StaffUser>,
    pub loading: bool,
    pub saving: bool,
    pub error: Option<String>,
    pub saved: bool,
}

/// Editable profile fields; the avatar file itself is picked outside this
/// hook and not handled here.
#[derive(Clone, PartialEq)]
pub struct ProfileUpdate {
    pub username: String,
    pub password: Option<String>,
}

#[derive(Clone, PartialEq)]
pub struct ProfileActions {
    pub refresh: Callback<()>,
    pub save: Callback<ProfileUpdate>,
}

#[derive(Clone, PartialEq)]
pub struct UseProfileResult {
    pub state: ProfileState,
    pub actions: ProfileActions,
}

#[hook]
pub fn use_profile(api_client: &ApiClient, auth: &AuthHandle) -> UseProfileResult {
    let user = use_state(|| Option::<StaffUser>::None);
    let loading = use_state(|| false);
    let saving = use_state(|| false);
    let error = use_state(|| Option::<String>::None);
    let saved = use_state(|| false);

    let refresh = {
        let api_client = api_client.clone();
        let user = user.clone();
        let loading = loading.clone();

        use_callback(auth.clone(), move |_, auth| {
            let Some(token) = auth.token.clone() else {
                return;
            };
            let api_client = api_client.clone();
            let user = user.clone();
            let loading = loading.clone();

            spawn_local(async move {
                loading.set(true);
                match api_client.user_by_token(&token).await {
                    Ok(profile) => user.set(Some(profile)),
                    Err(e) => {
                        Logger::error(COMPONENT, &format!("failed to fetch profile: {e}"));
                    }
                }
                loading.set(false);
            });
        })
    };

    let save = {
        let api_client = api_client.clone();
        let user = user.clone();
        let saving = saving.clone();
        let error = error.clone();
        let saved = saved.clone();
        let refresh = refresh.clone();

        use_callback((), move |update: ProfileUpdate, _| {
            let Some(user_id) = user.as_ref().map(|u| u.id) else {
                return;
            };
            if *saving {
                return;
            }

            let api_client = api_client.clone();
            let saving = saving.clone();
            let error = error.clone();
            let saved = saved.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                saving.set(true);
                error.set(None);
                saved.set(false);

                let form = match web_sys::FormData::new() {
                    Ok(form) => form,
                    Err(_) => {
                        error.set(Some("Failed to build form data".to_string()));
                        saving.set(false);
                        return;
                    }
                };
                let _ = form.append_with_str("username", &update.username);
                if let Some(password) = update.password.as_deref() {
                    let _ = form.append_with_str("password", password);
                }

                match api_client.update_user(user_id, &form).await {
                    Ok(()) => {
                        saved.set(true);
                        refresh.emit(());

                        let saved_clear = saved.clone();
                        spawn_local(async move {
                            TimeoutFuture::new(3000).await;
                            saved_clear.set(false);
                        });
                    }
                    Err(message) => {
                        error.set(Some(message));
                    }
                }

                saving.set(false);
            });
        })
    };

    // Profile loads once the hook mounts with a live session.
    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    let state = ProfileState {
        user: (*user).clone(),
        loading: *loading,
        saving: *saving,
        error: (*error).clone(),
        saved: *saved,
    };

    let actions = ProfileActions { refresh, save };

    UseProfileResult { state, actions }
}
