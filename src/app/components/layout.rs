//! Layout component wrapping every console page with Pico CSS and the
//! sidebar.

use dioxus::prelude::*;

use super::nav::Nav;

/// CSS styles for the console (extends Pico CSS).
const CUSTOM_STYLES: &str = r#"
:root { --pico-font-size: 15px; }
.status-ok { color: var(--pico-ins-color); }
.status-err { color: var(--pico-del-color); }
.status-disabled { color: var(--pico-muted-color); }
.console { display: grid; grid-template-columns: 220px 1fr; min-height: 100vh; }
.sidebar { padding: 1.5rem 1rem; border-right: 1px solid var(--pico-muted-border-color); display: flex; flex-direction: column; gap: 0.25rem; }
.sidebar a { display: block; padding: 0.5rem 0.75rem; border-radius: var(--pico-border-radius); text-decoration: none; }
.sidebar a.active { background: var(--pico-primary-background); color: var(--pico-primary-inverse); }
.sidebar .session { margin-top: auto; }
.page { padding: 1.5rem 2rem; }
.page-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1rem; }
.stat-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 1rem; }
.stat-grid article { margin: 0; text-align: center; }
.stat-grid strong { display: block; font-size: 2rem; }
.row-actions { display: flex; gap: 0.5rem; }
.row-actions button { margin: 0; padding: 0.25rem 0.75rem; }
.avatar { width: 40px; height: 40px; border-radius: 50%; object-fit: cover; }
.image-preview { max-width: 120px; border-radius: var(--pico-border-radius); display: block; margin-bottom: 0.5rem; }
.modal-overlay { position: fixed; inset: 0; background: rgba(0,0,0,.6); display: flex; align-items: center; justify-content: center; z-index: 50; }
.modal-body { max-width: 640px; width: 100%; max-height: 90vh; overflow-y: auto; margin: 1rem; }
.modal-header { display: flex; justify-content: space-between; align-items: center; }
small { color: var(--pico-muted-color); }
"#;

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Page title (shown in browser tab)
    pub title: String,
    /// Active navigation item ID
    pub nav_active: String,
    /// Page content
    pub children: Element,
}

/// Main layout component wrapping all console pages.
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    let version = env!("CARGO_PKG_VERSION");
    let full_title = format!("{} - OSCode Admin", props.title);

    rsx! {
        // Head elements - Dioxus hoists these to the real <head>
        document::Title { "{full_title}" }
        document::Link { rel: "stylesheet", href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css" }
        document::Style { {CUSTOM_STYLES} }

        div { class: "console",
            Nav { active: props.nav_active.clone() }
            main { class: "page",
                {props.children}
                footer {
                    small { "OSCode Admin v{version}" }
                }
            }
        }
    }
}
