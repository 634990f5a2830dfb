use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::admin_page::AdminPage;
use components::class_page::ClassPage;
use components::config_page::ConfigPage;
use components::header::Header;
use components::home_page::HomePage;
use components::login_page::LoginPage;
use components::profile_page::ProfilePage;
use hooks::use_children::AgeBand;
use hooks::use_points::use_points;
use services::api::ApiClient;
use services::session::{load_initial_state, now_secs, AuthAction, AuthHandle};
use shared::token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Sala(AgeBand),
    Admin,
    Config,
    Profile,
}

#[function_component(App)]
fn app() -> Html {
    let api_client = ApiClient::new();
    let auth: AuthHandle = use_reducer(load_initial_state);
    let view = use_state(|| View::Home);

    // The point overlay lives at the app root so it spans sala switches
    // within one session.
    let points = use_points(&api_client, &auth);

    // Revalidate once on mount: a token that expired between sessions must
    // not keep the app logged in.
    {
        let auth = auth.clone();
        use_effect_with((), move |_| {
            if let Some(token_str) = auth.token.clone() {
                if token::validate(&token_str, now_secs()).is_err() {
                    auth.dispatch(AuthAction::Logout);
                }
            }
            || ()
        });
    }

    let on_navigate = {
        let view = view.clone();
        Callback::from(move |target: View| view.set(target))
    };

    let on_open_sala = {
        let view = view.clone();
        Callback::from(move |band: AgeBand| view.set(View::Sala(band)))
    };

    html! {
        <ContextProvider<AuthHandle> context={auth.clone()}>
            {if !auth.is_logged_in() {
                html! { <LoginPage api_client={api_client.clone()} /> }
            } else {
                html! {
                    <>
                        <Header current_view={*view} on_navigate={on_navigate.clone()} />
                        <main class="app-main">
                            {match *view {
                                View::Home => html! {
                                    <HomePage on_open_sala={on_open_sala.clone()} />
                                },
                                View::Sala(band) => html! {
                                    <ClassPage
                                        band={band}
                                        api_client={api_client.clone()}
                                        points={points.clone()}
                                    />
                                },
                                View::Admin => {
                                    // Capability-gated; a non-admin ends up home.
                                    if auth.can_administer() {
                                        html! { <AdminPage api_client={api_client.clone()} /> }
                                    } else {
                                        html! { <HomePage on_open_sala={on_open_sala.clone()} /> }
                                    }
                                }
                                View::Config => html! {
                                    <ConfigPage api_client={api_client.clone()} />
                                },
                                View::Profile => html! {
                                    <ProfilePage api_client={api_client.clone()} />
                                },
                            }}
                        </main>
                    </>
                }
            }}
        </ContextProvider<AuthHandle>>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
