use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_profile::{use_profile, ProfileUpdate};
use crate::services::api::ApiClient;
use crate::services::session::AuthHandle;

#[derive(Properties, PartialEq)]
pub struct ProfilePageProps {
    pub api_client: ApiClient,
}

/// Signed-in staff member's own profile: view, rename, change password.
#[function_component(ProfilePage)]
pub fn profile_page(props: &ProfilePageProps) -> Html {
    let auth = use_context::<AuthHandle>().expect("ProfilePage rendered outside the auth context");
    let profile = use_profile(&props.api_client, &auth);

    let username = use_state(String::new);
    let password = use_state(String::new);

    // Sync the form when the profile arrives or is refreshed.
    {
        let username = username.clone();
        use_effect_with(profile.state.user.clone(), move |user| {
            if let Some(user) = user {
                username.set(user.username.clone());
            }
            || ()
        });
    }

    let on_username_change = {
        let username = username.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            username.set(input.value());
        })
    };

    let on_password_change = {
        let password = password.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let save = profile.actions.save.clone();
        let username = username.clone();
        let password = password.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let new_password = (*password).trim().to_string();
            save.emit(ProfileUpdate {
                username: (*username).trim().to_string(),
                password: (!new_password.is_empty()).then_some(new_password),
            });
            password.set(String::new());
        })
    };

    html! {
        <div class="profile-page">
            <h2 class="profile-title">{"My Profile"}</h2>

            {if profile.state.loading {
                html! { <div class="loading">{"Loading profile..."}</div> }
            } else if let Some(user) = profile.state.user.clone() {
                html! {
                    <div class="profile-card">
                        {if let Some(avatar_url) = user.avatar_url.clone() {
                            html! { <img class="profile-avatar" src={avatar_url} alt={user.username.clone()} /> }
                        } else {
                            html! { <div class="profile-avatar placeholder" /> }
                        }}

                        <dl class="profile-details">
                            <dt>{"Username"}</dt>
                            <dd>{&user.username}</dd>
                            <dt>{"Position"}</dt>
                            <dd>{user.position.clone().unwrap_or_else(|| "-".to_string())}</dd>
                        </dl>

                        {if profile.state.saved {
                            html! { <div class="form-message success">{"Profile updated."}</div> }
                        } else {
                            html! {}
                        }}

                        {if let Some(message) = profile.state.error.clone() {
                            html! { <div class="form-message error">{message}</div> }
                        } else {
                            html! {}
                        }}

                        <form class="profile-form" onsubmit={on_submit}>
                            <div class="form-group">
                                <label for="profile-username">{"Username"}</label>
                                <input
                                    id="profile-username"
                                    type="text"
                                    value={(*username).clone()}
                                    onchange={on_username_change}
                                    disabled={profile.state.saving}
                                />
                            </div>

                            <div class="form-group">
                                <label for="profile-password">{"New password (optional)"}</label>
                                <input
                                    id="profile-password"
                                    type="password"
                                    value={(*password).clone()}
                                    onchange={on_password_change}
                                    disabled={profile.state.saving}
                                />
                            </div>

                            <button type="submit" class="btn btn-primary" disabled={profile.state.saving}>
                                {if profile.state.saving { "Saving..." } else { "Save" }}
                            </button>
                        </form>
                    </div>
                }
            } else {
                html! { <div class="profile-empty">{"Profile unavailable."}</div> }
            }}
        </div>
    }
}
