// File: src/components/status.rs
use dioxus::prelude::*;

use crate::components::pico::Button;
use crate::components::pico::Card;

/// Shown while the session check has not produced a destination yet.
#[component]
pub fn LoadingIndicator(label: String) -> Element {
    rsx! {
        div {
            class: "spinner-container",
            "aria-busy": "true",
            progress {}
            p { "{label}" }
        }
    }
}

#[derive(PartialEq, Clone, Props)]
pub struct ErrorNoticeProps {
    message: String,
    on_retry: EventHandler<MouseEvent>,
}

/// The error surface: a message and a retry action in place of the iframe.
#[component]
pub fn ErrorNotice(props: ErrorNoticeProps) -> Element {
    rsx! {
        Card {
            div {
                class: "error-container",
                role: "alert",
                p { "{props.message}" }
                Button {
                    on_click: move |evt| props.on_retry.call(evt),
                    "Retry"
                }
            }
        }
    }
}
