//! Login screen.

use dioxus::prelude::*;

use crate::app::ConsoleServices;
use crate::session::AuthState;

#[component]
pub fn Login() -> Element {
    let services = use_context::<ConsoleServices>();
    let mut auth = use_context::<Signal<AuthState>>();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut show_password = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let on_submit = move |e: FormEvent| {
        e.prevent_default();
        if submitting() {
            return;
        }
        submitting.set(true);
        error.set(None);

        let services = services.clone();
        spawn(async move {
            let ctx = services.call_context();
            match services
                .sessions
                .login(&username(), &password(), &ctx)
                .await
            {
                Ok(_) => auth.set(services.sessions.state()),
                Err(e) => {
                    error.set(Some(e.user_message()));
                    submitting.set(false);
                }
            }
        });
    };

    rsx! {
        document::Title { "Login - OSCode Admin" }
        document::Link { rel: "stylesheet", href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css" }

        main { class: "container", style: "max-width:420px;margin-top:10vh;",
            article {
                header {
                    h2 { style: "margin:0;", "OSCode Admin" }
                    small { "Sign in to manage the community site" }
                }

                form { onsubmit: on_submit,
                    label { r#for: "username", "Username" }
                    input {
                        id: "username",
                        r#type: "text",
                        autocomplete: "username",
                        required: true,
                        value: "{username}",
                        oninput: move |e| username.set(e.value()),
                    }

                    label { r#for: "password", "Password" }
                    fieldset { role: "group",
                        input {
                            id: "password",
                            r#type: if show_password() { "text" } else { "password" },
                            autocomplete: "current-password",
                            required: true,
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                        }
                        button {
                            r#type: "button",
                            class: "secondary outline",
                            aria_label: if show_password() { "Hide password" } else { "Show password" },
                            onclick: move |_| show_password.toggle(),
                            if show_password() { "Hide" } else { "Show" }
                        }
                    }

                    if let Some(err) = error() {
                        p { class: "status-err", "{err}" }
                    }

                    button {
                        r#type: "submit",
                        disabled: submitting(),
                        aria_busy: if submitting() { "true" } else { "false" },
                        if submitting() { "Signing in..." } else { "Sign in" }
                    }
                }
            }
        }
    }
}
