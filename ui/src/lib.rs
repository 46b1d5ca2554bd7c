// The client-side Dioxus application logic.

use dioxus::prelude::*;

pub mod compat;
mod components;
pub mod hooks;
mod screens;

use components::pico::Container;
use screens::ai::AiScreen;
use screens::trader::TraderScreen;
use session::SyncConfig;

/// Enum to represent the different screens in our application.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
enum Screen {
    #[default]
    Trader,
    Ai,
}

impl Screen {
    /// Helper to get the display name for each screen.
    fn name(&self) -> &'static str {
        match self {
            Screen::Trader => "Trader",
            Screen::Ai => "AI",
        }
    }

    /// DOM id of the screen's tab, stable for the host page's deep links.
    fn tab_id(&self) -> &'static str {
        match self {
            Screen::Trader => "id-trader",
            Screen::Ai => "id-ai",
        }
    }
}

/// A list of all available screens for easy iteration.
const ALL_SCREENS: [Screen; 2] = [Screen::Trader, Screen::Ai];

/// The navigation tabs component.
#[component]
fn Tabs(mut active_screen: Signal<Screen>) -> Element {
    rsx! {
        nav {
            class: "tab-menu",
            ul {
                for screen in ALL_SCREENS {
                    li {
                        a {
                            id: screen.tab_id(),
                            href: "#",
                            class: {
                                if active_screen() == screen { "active-tab" } else { "" }
                            },
                            "aria-current": {
                                if active_screen() == screen { "page" } else { "false" }
                            },
                            onclick: move |event| {
                                event.prevent_default();
                                active_screen.set(screen);
                            },
                            "{screen.name()}"
                        }
                    }
                }
            }
        }
    }
}

//=============================================================================
// MAIN APPLICATION COMPONENT (Client-side)
//=============================================================================

#[allow(non_snake_case)]
pub fn App() -> Element {
    let responsive_css = r#"
    * { box-sizing: border-box; }

    html, body {
        height: 100%;
        width: 100%;
        margin: 0;
        padding: 0;
        overflow: hidden;
    }

    .app-main-container {
        position: fixed;
        top: 0; left: 0; right: 0; bottom: 0;
        padding: 10px;
        display: flex;
        flex-direction: column;
        overflow: hidden;
    }

    .app-main-container > main {
        flex: 1;
        display: flex;
        flex-direction: column;
        min-height: 0;
        margin: 0 !important;
        max-width: 100% !important;
    }

    .tab-menu a.active-tab {
        color: var(--pico-primary) !important;
        text-decoration: none;
        border-bottom: 3px solid var(--pico-primary);
    }

    .tab-menu a:not(.active-tab) {
        color: var(--pico-muted-color);
        border-bottom: 3px solid transparent;
    }

    .content {
        flex: 1;
        display: flex;
        flex-direction: column;
        min-height: 0;
    }

    .trader-container {
        flex: 1;
        display: flex;
        flex-direction: column;
        min-height: 0;
    }

    .trader-iframe {
        flex: 1;
        width: 100%;
        border: none;
    }

    .spinner-container, .error-container {
        display: flex;
        flex-direction: column;
        align-items: center;
        justify-content: center;
        padding: 2rem;
        text-align: center;
    }

    .advisory { color: var(--pico-del-color); padding: 0 0 0.5rem 0; }
"#;

    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Stylesheet {
            href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.cyan.min.css",
        }
        style {
            "{responsive_css}"
        }
        AppBody {}
    }
}

#[component]
fn AppBody() -> Element {
    let config = use_hook(SyncConfig::from_env);

    if let Err(e) = config.validate() {
        dioxus_logger::tracing::error!("invalid dtrader config: {}", e);
        return rsx! {
            p {
                "An error occurred: {e}"
            }
        };
    }

    rsx! {
        LoadedApp { config }
    }
}

/// Holds the navigation and the active screen once config is known.
#[component]
fn LoadedApp(config: SyncConfig) -> Element {
    let active_screen = use_signal(Screen::default);

    rsx! {
        div {
            class: "app-main-container",
            Container {
                header {
                    nav {
                        ul {
                            li {
                                Tabs {
                                    active_screen,
                                }
                            }
                        }
                    }
                }
                div {
                    class: "content",
                    match active_screen() {
                        Screen::Trader => rsx! {
                            TraderScreen {
                                config: config.clone(),
                            }
                        },
                        Screen::Ai => rsx! {
                            AiScreen {}
                        },
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_have_unique_ids() {
        let ids: Vec<_> = ALL_SCREENS.iter().map(Screen::tab_id).collect();
        assert_eq!(ids, ["id-trader", "id-ai"]);
        assert_eq!(Screen::default(), Screen::Trader);
        assert_eq!(Screen::Ai.name(), "AI");
    }
}
