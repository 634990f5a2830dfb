use web_sys::MouseEvent;
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ModalStatus {
    Success,
    Error,
}

/// Transient outcome modal for mutations: green for accepted, red carrying
/// the server-provided message for rejected.
#[derive(Properties, PartialEq)]
pub struct ResponseModalProps {
    pub is_open: bool,
    pub status: ModalStatus,
    pub message: String,
    pub on_close: Callback<()>,
}

#[function_component(ResponseModal)]
pub fn response_modal(props: &ResponseModalProps) -> Html {
    if !props.is_open {
        return html! {};
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

    let on_close_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            on_close.emit(());
        })
    };

    let (status_class, title) = match props.status {
        ModalStatus::Success => ("response-modal success", "Success"),
        ModalStatus::Error => ("response-modal error", "Error"),
    };

    html! {
        <div class="response-modal-backdrop" onclick={on_backdrop_click}>
            <div class={status_class} onclick={on_modal_click}>
                <h3 class="response-modal-title">{title}</h3>
                <p class="response-modal-message">{&props.message}</p>
                <button class="btn btn-secondary" onclick={on_close_click}>{"Close"}</button>
            </div>
        </div>
    }
}
