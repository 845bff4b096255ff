//! OSCode operator console.
//!
//! Fullstack: with the default `server` feature this binary serves the
//! console (server-rendered shell plus the hydrating client that `dx build`
//! produces with `--features web`). In the browser build the same `main`
//! mounts the client.

fn main() {
    #[cfg(all(feature = "server", not(target_arch = "wasm32")))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "oscode_admin=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    dioxus::launch(oscode_admin::app::App);
}
