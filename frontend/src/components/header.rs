use web_sys::MouseEvent;
use yew::prelude::*;

use crate::services::session::{AuthAction, AuthHandle};
use crate::View;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub current_view: View,
    pub on_navigate: Callback<View>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let auth = use_context::<AuthHandle>().expect("Header rendered outside the auth context");

    let nav_button = |label: &str, target: View| -> Html {
        let on_navigate = props.on_navigate.clone();
        let active = matches!(
            (props.current_view, target),
            (View::Home, View::Home)
                | (View::Sala(_), View::Sala(_))
                | (View::Admin, View::Admin)
                | (View::Config, View::Config)
                | (View::Profile, View::Profile)
        );
        let class = if active { "nav-link active" } else { "nav-link" };
        html! {
            <button class={class} onclick={Callback::from(move |_: MouseEvent| on_navigate.emit(target))}>
                {label.to_string()}
            </button>
        }
    };

    let on_logout = {
        let auth = auth.clone();
        Callback::from(move |_: MouseEvent| auth.dispatch(AuthAction::Logout))
    };

    html! {
        <header class="app-header">
            <h1 class="app-title">{"Kids Points"}</h1>
            <nav class="app-nav">
                {nav_button("Home", View::Home)}
                {if auth.can_administer() {
                    nav_button("Presence", View::Admin)
                } else {
                    html! {}
                }}
                {nav_button("Settings", View::Config)}
                {nav_button("Profile", View::Profile)}
            </nav>
            <button class="btn btn-secondary logout" onclick={on_logout}>{"Logout"}</button>
        </header>
    }
}
