use shared::LoginRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;
use crate::services::session::{AuthAction, AuthHandle};

const COMPONENT: &str = "login";

#[derive(Properties, PartialEq)]
pub struct LoginPageProps {
    pub api_client: ApiClient,
}

#[function_component(LoginPage)]
pub fn login_page(props: &LoginPageProps) -> Html {
    let auth = use_context::<AuthHandle>().expect("LoginPage rendered outside the auth context");

    let username = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| Option::<String>::None);
    let submitting = use_state(|| false);

    // Server reachability indicator next to the logo.
    let server_ok = use_state(|| Option::<bool>::None);
    let checking = use_state(|| false);

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

    let verify_server = {
        let api_client = props.api_client.clone();
        let server_ok = server_ok.clone();
        let checking = checking.clone();

        Callback::from(move |_: MouseEvent| {
            let api_client = api_client.clone();
            let server_ok = server_ok.clone();
            let checking = checking.clone();

            spawn_local(async move {
                checking.set(true);
                match api_client.health_check().await {
                    Ok(has_children) => server_ok.set(Some(has_children)),
                    Err(e) => {
                        Logger::error(COMPONENT, &format!("server check failed: {e}"));
                        server_ok.set(Some(false));
                    }
                }
                checking.set(false);
            });
        })
    };

    let on_submit = {
        let api_client = props.api_client.clone();
        let auth = auth.clone();
        let username = username.clone();
        let password = password.clone();
        let error = error.clone();
        let submitting = submitting.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let api_client = api_client.clone();
            let auth = auth.clone();
            let username = username.clone();
            let password = password.clone();
            let error = error.clone();
            let submitting = submitting.clone();

            spawn_local(async move {
                error.set(None);
                submitting.set(true);

                let request = LoginRequest {
                    username: (*username).clone(),
                    password: (*password).clone(),
                };

                match api_client.login(&request).await {
                    Ok(response) => {
                        // Identity is derived from the token claims; the
                        // reducer degrades an unusable token to logged-out.
                        auth.dispatch(AuthAction::Login(response.token));
                    }
                    Err(e) => {
                        Logger::error(COMPONENT, &format!("login failed: {e}"));
                        error.set(Some("Login failed. Please try again.".to_string()));
                    }
                }

                submitting.set(false);
            });
        })
    };

    html! {
        <div class="login-page">
            <header class="login-header">
                <h1>{"Kids Points"}</h1>
                <button class="server-check" onclick={verify_server} disabled={*checking}>
                    {if *checking {
                        html! { <span class="spinner" /> }
                    } else {
                        match *server_ok {
                            Some(true) => html! { <span class="server-status ok">{"Server OK"}</span> },
                            Some(false) => html! { <span class="server-status down">{"Server unavailable"}</span> },
                            None => html! { <span class="server-status">{"Check server"}</span> },
                        }
                    }}
                </button>
            </header>

            <form class="login-form" onsubmit={on_submit}>
                {if let Some(message) = (*error).clone() {
                    html! { <div class="form-message error">{message}</div> }
                } else {
                    html! {}
                }}

                <div class="form-group">
                    <label for="login-username">{"Name"}</label>
                    <input
                        id="login-username"
                        type="text"
                        value={(*username).clone()}
                        onchange={on_username_change}
                        disabled={*submitting}
                    />
                </div>

                <div class="form-group">
                    <label for="login-password">{"Password"}</label>
                    <input
                        id="login-password"
                        type="password"
                        value={(*password).clone()}
                        onchange={on_password_change}
                        disabled={*submitting}
                    />
                </div>

                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    {if *submitting { "Signing in..." } else { "Login" }}
                </button>
            </form>
        </div>
    }
}
