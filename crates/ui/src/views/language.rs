use std::sync::Arc;

use dioxus::prelude::*;
use qshell_core::model::LanguageCode;
use tracing::warn;

use crate::context::AppContext;
use crate::views::Revision;

#[component]
pub fn LanguagePicker() -> Element {
    let ctx = use_context::<AppContext>();
    let revision = use_context::<Revision>();
    revision.track();

    let translations = ctx.translations();
    let on_change = move |evt: FormEvent| {
        let language = match LanguageCode::new(evt.value()) {
            Ok(language) => language,
            Err(err) => {
                warn!(error = %err, "ignoring invalid language selection");
                return;
            }
        };
        let translations = Arc::clone(&translations);
        spawn(async move {
            if let Err(err) = translations.set_current_language(&language).await {
                warn!(error = %err, "failed to switch language");
            }
            // Cached tables load without a signal; refresh regardless.
            revision.bump();
        });
    };

    let current = ctx.translations().language();
    let label = ctx.tr("Language");

    rsx! {
        label { class: "language-picker",
            span { "{label}" }
            select { onchange: on_change,
                for language in ctx.languages().iter().cloned() {
                    option {
                        key: "{language}",
                        value: "{language}",
                        selected: language == current,
                        "{language}"
                    }
                }
            }
        }
    }
}
