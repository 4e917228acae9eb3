use std::sync::Arc;

use dioxus::prelude::*;
use qshell_core::model::{HistoryEntry, PageName};
use services::PageNavigator;
use tracing::debug;

use crate::context::AppContext;
use crate::views::Revision;

fn go_to(navigator: Arc<PageNavigator>, page: PageName) {
    spawn(async move {
        if let Err(err) = navigator.load_page(&page).await {
            debug!(error = %err, "navigation failed");
        }
    });
}

fn pop_to(navigator: Arc<PageNavigator>, entry: HistoryEntry, revision: Revision) {
    spawn(async move {
        if let Err(err) = navigator.handle_pop(&entry).await {
            debug!(error = %err, "history navigation failed");
        }
        revision.bump();
    });
}

#[component]
pub fn NavBar() -> Element {
    let ctx = use_context::<AppContext>();
    use_context::<Revision>().track();
    let current = ctx.navigator().current_page_name();

    rsx! {
        nav { class: "shell-nav",
            HistoryControls {}
            ul {
                for page in ctx.navigation().iter().cloned() {
                    NavLink {
                        key: "{page}",
                        current: current.as_ref() == Some(&page),
                        page,
                    }
                }
            }
        }
    }
}

#[component]
fn NavLink(page: PageName, current: bool) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = ctx.navigator();
    let target = page.clone();
    let class = if current { "nav-link current" } else { "nav-link" };
    let href = page.url_path();
    let label = ctx.tr(page.as_str());

    rsx! {
        li {
            a {
                class: "{class}",
                href: "{href}",
                onclick: move |evt: MouseEvent| {
                    evt.prevent_default();
                    go_to(Arc::clone(&navigator), target.clone());
                },
                "{label}"
            }
        }
    }
}

/// Back/forward buttons over the session history.
#[component]
pub fn HistoryControls() -> Element {
    let ctx = use_context::<AppContext>();
    let revision = use_context::<Revision>();
    revision.track();
    let history = ctx.history();
    let (can_back, can_forward) = (history.can_go_back(), history.can_go_forward());

    let (back_history, back_navigator) = (ctx.history(), ctx.navigator());
    let on_back = move |_| {
        if let Some(entry) = back_history.back() {
            pop_to(Arc::clone(&back_navigator), entry, revision);
        }
    };
    let (forward_history, forward_navigator) = (ctx.history(), ctx.navigator());
    let on_forward = move |_| {
        if let Some(entry) = forward_history.forward() {
            pop_to(Arc::clone(&forward_navigator), entry, revision);
        }
    };
    let back_label = ctx.tr("Back");
    let forward_label = ctx.tr("Forward");

    rsx! {
        div { class: "history-controls",
            button { disabled: !can_back, onclick: on_back, "{back_label}" }
            button { disabled: !can_forward, onclick: on_forward, "{forward_label}" }
        }
    }
}
