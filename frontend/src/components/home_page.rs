use yew::prelude::*;

use crate::hooks::use_children::{AgeBand, SALAS};

#[derive(Properties, PartialEq)]
pub struct HomePageProps {
    pub on_open_sala: Callback<AgeBand>,
}

/// Landing screen: one tile per sala (age band).
#[function_component(HomePage)]
pub fn home_page(props: &HomePageProps) -> Html {
    html! {
        <div class="home-page">
            <h1 class="home-title">{"Children Administration"}</h1>
            <div class="sala-grid">
                {for SALAS.iter().map(|band| {
                    let on_open_sala = props.on_open_sala.clone();
                    let band = *band;
                    let onclick = Callback::from(move |_: MouseEvent| on_open_sala.emit(band));
                    html! {
                        <button class={format!("sala-tile sala-{}", band.label())} {onclick}>
                            {format!("Ages {}", band.label())}
                        </button>
                    }
                })}
            </div>
        </div>
    }
}
