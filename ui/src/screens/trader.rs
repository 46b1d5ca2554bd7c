//=============================================================================
// File: src/screens/trader.rs
//=============================================================================
use dioxus::prelude::*;
use session::SyncConfig;
use session::SyncStatus;

use crate::components::status::ErrorNotice;
use crate::components::status::LoadingIndicator;
use crate::hooks::use_session_sync;

const IFRAME_TITLE: &str = "DTrader Trading Platform";
const IFRAME_SANDBOX: &str = "allow-same-origin allow-scripts allow-popups allow-forms";
const IFRAME_ALLOW: &str = "clipboard-read; clipboard-write";

/// Embeds DTrader, logged into whichever account the host page has active.
#[component]
pub fn TraderScreen(config: SyncConfig) -> Element {
    let sync = use_session_sync(config);
    let state = sync.state();
    let state = state.read();

    match &state.status {
        SyncStatus::Loading => rsx! {
            LoadingIndicator { label: "Loading DTrader..." }
        },
        SyncStatus::Error(e) => rsx! {
            ErrorNotice {
                message: e.user_message().to_string(),
                on_retry: move |_| sync.retry(),
            }
        },
        SyncStatus::Ready(url) => {
            let advisory = state.advisory.as_ref().map(|a| a.user_message());
            rsx! {
                div {
                    class: "trader-container",
                    if let Some(advisory) = advisory {
                        small {
                            class: "advisory",
                            role: "status",
                            "{advisory}"
                        }
                    }
                    iframe {
                        class: "trader-iframe",
                        src: "{url}",
                        title: IFRAME_TITLE,
                        "sandbox": IFRAME_SANDBOX,
                        "allow": IFRAME_ALLOW,
                        "loading": "eager",
                    }
                }
            }
        }
    }
}
