use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use shared::{monthly_point_counts, Child, MonthlyCount};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlCanvasElement, MouseEvent};
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

const COMPONENT: &str = "points-chart";

#[derive(Properties, PartialEq)]
pub struct PointsChartModalProps {
    pub child: Child,
    pub api_client: ApiClient,
    pub is_open: bool,
    pub on_close: Callback<()>,
}

/// Modal wrapper: fetches the point history when opened and hands the
/// month buckets to the canvas component below.
#[function_component(PointsChartModal)]
pub fn points_chart_modal(props: &PointsChartModalProps) -> Html {
    let counts = use_state(Vec::<MonthlyCount>::new);
    let loading = use_state(|| false);

    {
        let api_client = props.api_client.clone();
        let child_id = props.child.id;
        let counts = counts.clone();
        let loading = loading.clone();

        use_effect_with((props.is_open, child_id), move |(is_open, child_id)| {
            if *is_open {
                let api_client = api_client.clone();
                let child_id = *child_id;
                let counts = counts.clone();
                let loading = loading.clone();

                spawn_local(async move {
                    loading.set(true);
                    match api_client.class_points(child_id).await {
                        Ok(response) => counts.set(monthly_point_counts(&response.points)),
                        Err(e) => {
                            Logger::error(
                                COMPONENT,
                                &format!("failed to fetch points for {child_id}: {e}"),
                            );
                            counts.set(Vec::new());
                        }
                    }
                    loading.set(false);
                });
            }
            || ()
        });
    }

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

    if !props.is_open {
        return html! {};
    }

    html! {
        <div class="points-chart-backdrop" onclick={on_backdrop_click}>
            <div class="points-chart-modal" onclick={on_modal_click}>
                <h3 class="points-chart-title">{format!("Points per month — {}", props.child.name)}</h3>
                {if *loading {
                    html! { <div class="loading">{"Loading history..."}</div> }
                } else if counts.is_empty() {
                    html! { <div class="points-chart-empty">{"No points recorded yet."}</div> }
                } else {
                    html! { <MonthlyPointsChart counts={(*counts).clone()} /> }
                }}
                <button class="btn btn-secondary" onclick={
                    let on_close = props.on_close.clone();
                    Callback::from(move |_: MouseEvent| on_close.emit(()))
                }>{"Close"}</button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct MonthlyPointsChartProps {
    pub counts: Vec<MonthlyCount>,
}

/// Canvas-backed chart; a struct component so drawing can run after every
/// render once the canvas element exists.
pub struct MonthlyPointsChart {
    canvas_ref: NodeRef,
}

impl Component for MonthlyPointsChart {
    type Message = ();
    type Properties = MonthlyPointsChartProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            canvas_ref: NodeRef::default(),
        }
    }

    fn changed(&mut self, _ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        true
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        self.draw_chart(&ctx.props().counts);
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <canvas
                ref={self.canvas_ref.clone()}
                class="points-chart-canvas"
                width="560"
                height="320"
            />
        }
    }
}

impl MonthlyPointsChart {
    fn draw_chart(&self, counts: &[MonthlyCount]) {
        let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() else {
            return;
        };
        let Some(backend) = CanvasBackend::with_canvas_object(canvas) else {
            return;
        };
        if let Err(e) = draw_monthly_series(backend, counts) {
            Logger::error(COMPONENT, &format!("failed to draw chart: {e}"));
        }
    }
}

fn draw_monthly_series(
    backend: CanvasBackend,
    counts: &[MonthlyCount],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;

    if counts.is_empty() {
        root.present()?;
        return Ok(());
    }

    let y_max = counts.iter().map(|c| c.count).max().unwrap_or(1).max(1);
    let labels: Vec<String> = counts.iter().map(MonthlyCount::label).collect();

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(36)
        .build_cartesian_2d(0i32..counts.len() as i32, 0u32..y_max + 1)?;

    chart
        .configure_mesh()
        .x_labels(counts.len())
        .x_label_formatter(&|i| {
            usize::try_from(*i)
                .ok()
                .and_then(|i| labels.get(i).cloned())
                .unwrap_or_default()
        })
        .y_desc("points")
        .draw()?;

    chart.draw_series(LineSeries::new(
        counts
            .iter()
            .enumerate()
            .map(|(i, c)| (i as i32, c.count)),
        &BLUE,
    ))?;

    chart.draw_series(
        counts
            .iter()
            .enumerate()
            .map(|(i, c)| Circle::new((i as i32, c.count), 3, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}
