use dioxus::document::{Eval, eval};

/// Delegated click listener for links marked with `data-page`.
///
/// Listening on `document` covers links of every fragment swapped in later;
/// listeners never need to be re-attached or removed.
const LINK_INTERCEPT_SCRIPT: &str = r#"
    document.addEventListener("click", (event) => {
        if (event.defaultPrevented || event.button !== 0) { return; }
        if (event.metaKey || event.ctrlKey || event.shiftKey || event.altKey) { return; }
        const link = event.target.closest("a[data-page]");
        if (!link) { return; }
        event.preventDefault();
        dioxus.send(link.getAttribute("href") || "");
    });
"#;

/// Start intercepting relative links. Clicked hrefs arrive through
/// [`next_intercepted_link`].
#[must_use]
pub fn intercept_links() -> Eval {
    eval(LINK_INTERCEPT_SCRIPT)
}

/// Wait for the next intercepted link; `None` once the channel is gone.
pub async fn next_intercepted_link(listener: &mut Eval) -> Option<String> {
    listener.recv::<String>().await.ok()
}
