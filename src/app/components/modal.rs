//! Modal dialog. Clicking the overlay or the close button both call
//! `on_close`; clicks inside the body stay inside.

use dioxus::prelude::*;

#[component]
pub fn Modal(title: String, on_close: EventHandler<()>, children: Element) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| on_close.call(()),

            article {
                class: "modal-body",
                onclick: move |e| e.stop_propagation(),

                header { class: "modal-header",
                    h3 { style: "margin:0;", "{title}" }
                    button {
                        class: "secondary outline",
                        aria_label: "Close",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }

                {children}
            }
        }
    }
}
