use shared::Child;
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::components::edit_child_modal::EditChildModal;
use crate::components::points_chart_modal::PointsChartModal;
use crate::hooks::use_points::UsePointsResult;
use crate::services::api::ApiClient;
use crate::services::dates;

#[derive(Properties, PartialEq)]
pub struct ChildCardProps {
    pub child: Child,
    pub api_client: ApiClient,
    pub points: UsePointsResult,
    pub can_administer: bool,
    /// Staff member recorded against edits, from the session claims.
    pub editor_user_id: i64,
    pub on_delete: Callback<i64>,
    /// Fired after an edit is accepted so the roster can refresh.
    pub on_changed: Callback<()>,
}

#[function_component(ChildCard)]
pub fn child_card(props: &ChildCardProps) -> Html {
    let child = &props.child;
    let menu_open = use_state(|| false);
    let edit_open = use_state(|| false);
    let chart_open = use_state(|| false);

    // Adopt the server-known session count the first time this child shows
    // up; children the session already touched keep their overlay.
    {
        let seed_points = props.points.actions.seed_points.clone();
        let seed = (child.id, child.points_added.unwrap_or(0));
        use_effect_with(child.id, move |_| {
            seed_points.emit(seed);
            || ()
        });
    }

    let overlay = props.points.state.ledger.count(child.id);
    let at_cap = props.points.state.ledger.is_at_cap(child.id);
    let animating = props.points.state.animating.contains(&child.id);

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(!*menu_open))
    };

    let on_add = {
        let add_point = props.points.actions.add_point.clone();
        let child_id = child.id;
        Callback::from(move |_: MouseEvent| add_point.emit(child_id))
    };

    let on_remove = {
        let remove_point = props.points.actions.remove_point.clone();
        let child_id = child.id;
        Callback::from(move |_: MouseEvent| remove_point.emit(child_id))
    };

    let open_edit = {
        let edit_open = edit_open.clone();
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| {
            edit_open.set(true);
            menu_open.set(false);
        })
    };

    let open_chart = {
        let chart_open = chart_open.clone();
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| {
            chart_open.set(true);
            menu_open.set(false);
        })
    };

    let on_delete_click = {
        let on_delete = props.on_delete.clone();
        let menu_open = menu_open.clone();
        let child_id = child.id;
        Callback::from(move |_: MouseEvent| {
            on_delete.emit(child_id);
            menu_open.set(false);
        })
    };

    let age_label = child
        .age
        .clone()
        .or_else(|| {
            child
                .birth_date
                .as_deref()
                .and_then(|born| dates::age_years(born, dates::today()))
                .map(|years| years.to_string())
        })
        .map(|years| format!("{years} years"))
        .unwrap_or_default();

    let avatar_url = child
        .avatar
        .as_deref()
        .map(|path| props.api_client.asset_url(path));

    html! {
        <section class="child-card">
            {if let Some(url) = avatar_url {
                html! { <img class="child-avatar" src={url} alt={child.name.clone()} /> }
            } else {
                html! { <div class="child-avatar placeholder" /> }
            }}

            <div class="child-card-body">
                <header class="child-card-header">
                    <h2 class="child-name">{&child.name}</h2>
                    <span class="child-age">{age_label}</span>
                    {if props.can_administer {
                        html! {
                            <div class="child-menu">
                                <button class="child-menu-toggle" onclick={toggle_menu} aria-label="Menu">{"⋮"}</button>
                                {if *menu_open {
                                    html! {
                                        <div class="child-menu-items">
                                            <button onclick={open_edit}>{"Edit"}</button>
                                            <button onclick={on_delete_click}>{"Delete"}</button>
                                            <button onclick={open_chart}>{"Points history"}</button>
                                        </div>
                                    }
                                } else {
                                    html! {}
                                }}
                            </div>
                        }
                    } else {
                        html! {}
                    }}
                </header>

                <footer class="child-card-footer">
                    <span class="child-total">{format!("Points: {}", child.display_total())}</span>
                    <div class="point-buttons">
                        <button class="btn point-add" onclick={on_add} disabled={at_cap}>
                            {"+1 Point"}
                        </button>
                        <button class="btn point-remove" onclick={on_remove} disabled={overlay == 0}>
                            {"-1 Point"}
                        </button>
                    </div>
                </footer>

                <div class="point-chips">
                    {for (0..overlay).map(|_| {
                        let chip_class = if animating { "point-chip just-added" } else { "point-chip" };
                        html! { <span class={chip_class}>{"+1"}</span> }
                    })}
                </div>
            </div>

            <EditChildModal
                child={child.clone()}
                api_client={props.api_client.clone()}
                editor_user_id={props.editor_user_id}
                is_open={*edit_open}
                on_close={
                    let edit_open = edit_open.clone();
                    Callback::from(move |_| edit_open.set(false))
                }
                on_saved={props.on_changed.clone()}
            />

            <PointsChartModal
                child={child.clone()}
                api_client={props.api_client.clone()}
                is_open={*chart_open}
                on_close={
                    let chart_open = chart_open.clone();
                    Callback::from(move |_| chart_open.set(false))
                }
            />
        </section>
    }
}
