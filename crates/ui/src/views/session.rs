use std::sync::Arc;

use dioxus::prelude::*;
use tracing::warn;

use crate::context::AppContext;
use crate::views::Revision;

/// Login form, username and logout button; visibility follows the session
/// view computed by the auth session.
#[component]
pub fn SessionBar() -> Element {
    let ctx = use_context::<AppContext>();
    use_context::<Revision>().track();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut failed = use_signal(|| false);

    let auth = ctx.auth();
    let on_login = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = Arc::clone(&auth);
        let (user, secret) = (username(), password());
        spawn(async move {
            match auth.login(&user, &secret).await {
                Ok(_) => {
                    failed.set(false);
                    password.set(String::new());
                }
                Err(err) => {
                    warn!(error = %err, "login failed");
                    failed.set(true);
                }
            }
        });
    };

    let auth = ctx.auth();
    let on_logout = move |_| {
        let auth = Arc::clone(&auth);
        spawn(async move { auth.logout().await });
    };

    let view = ctx.document().session_view();
    let name = view.username.clone().unwrap_or_default();
    let user_label = ctx.tr("Username");
    let password_label = ctx.tr("Password");
    let login_label = ctx.tr("Log in");
    let logout_label = ctx.tr("Log out");
    let error_label = ctx.tr("Login failed");

    rsx! {
        div { class: "session",
            form {
                class: "login-only",
                hidden: !view.login_visible,
                onsubmit: on_login,
                input {
                    r#type: "text",
                    name: "username",
                    placeholder: "{user_label}",
                    value: "{username}",
                    oninput: move |evt| username.set(evt.value()),
                }
                input {
                    r#type: "password",
                    name: "password",
                    placeholder: "{password_label}",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                button { r#type: "submit", "{login_label}" }
                if failed() {
                    p { class: "login-error", "{error_label}" }
                }
            }
            span { class: "username", hidden: !view.username_visible, "{name}" }
            button {
                class: "logout-only",
                hidden: !view.logout_visible,
                onclick: on_logout,
                "{logout_label}"
            }
        }
    }
}
