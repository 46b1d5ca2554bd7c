use dioxus::prelude::*;

pub const AI_PAGE_URL: &str = "https://saliaa.lovable.app";

/// The AI assistant page; a plain embed with no session hand-off.
#[component]
pub fn AiScreen() -> Element {
    rsx! {
        div {
            class: "trader-container",
            iframe {
                class: "trader-iframe",
                src: AI_PAGE_URL,
                title: "AiPage",
                "loading": "lazy",
            }
        }
    }
}
