use dioxus::prelude::*;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::context::AppContext;
use crate::scripts::{intercept_links, next_intercepted_link};
use crate::views::{LanguagePicker, NavBar, Revision, SessionBar};

/// Persistent page shell around the swapped content region.
#[component]
pub fn Shell() -> Element {
    let ctx = use_context::<AppContext>();
    let revision = use_context_provider(Revision::new);

    let events_ctx = ctx.clone();
    use_future(move || {
        let mut events = events_ctx.events().subscribe();
        async move {
            loop {
                match events.recv().await {
                    Ok(_) | Err(RecvError::Lagged(_)) => revision.bump(),
                    Err(RecvError::Closed) => break,
                }
            }
        }
    });

    let links_ctx = ctx.clone();
    use_future(move || {
        let navigator = links_ctx.navigator();
        async move {
            let mut listener = intercept_links();
            while let Some(href) = next_intercepted_link(&mut listener).await {
                let navigator = navigator.clone();
                spawn(async move {
                    match navigator.follow_link(&href).await {
                        Ok(Some(outcome)) => debug!(%href, ?outcome, "followed link"),
                        Ok(None) => debug!(%href, "link left to the webview"),
                        Err(err) => debug!(%href, error = %err, "link navigation failed"),
                    }
                });
            }
        }
    });

    revision.track();
    let snapshot = ctx.document().snapshot();
    let title = if snapshot.title.is_empty() {
        ctx.navigator()
            .current_page_name()
            .map_or_else(String::new, |page| ctx.tr(page.as_str()))
    } else {
        snapshot.title.clone()
    };
    let admin_rule = snapshot.session.admin_rule;

    rsx! {
        document::Title { "{title}" }
        style { id: "admin-visibility", "{admin_rule}" }

        div { class: "shell",
            header { class: "shell-header",
                h1 { class: "current-page-title", "{title}" }
                SessionBar {}
                LanguagePicker {}
            }
            NavBar {}
            main {
                id: "content",
                class: "content",
                dangerous_inner_html: "{snapshot.content}",
            }
        }
    }
}
