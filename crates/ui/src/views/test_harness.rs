use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use qshell_core::model::PageName;
use qshell_core::time::fixed_clock;
use reqwest::{Client, StatusCode};
use services::error::FetchError;
use services::{AppServices, AssetFetcher, ShellConfig};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::Shell;

/// Serves page fragments from memory.
pub struct StaticAssets {
    files: HashMap<String, String>,
}

impl StaticAssets {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            files: pages
                .iter()
                .map(|(name, html)| (format!("content/{name}.html"), (*html).to_owned()))
                .collect(),
        }
    }
}

#[async_trait]
impl AssetFetcher for StaticAssets {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.files.get(path).cloned().ok_or_else(|| FetchError::Status {
            url: path.to_owned(),
            status: StatusCode::NOT_FOUND,
        })
    }

    async fn exists(&self, path: &str) -> Result<bool, FetchError> {
        Ok(self.files.contains_key(path))
    }
}

#[derive(Props, Clone)]
struct ShellHarnessProps {
    app: Arc<AppServices>,
}

impl PartialEq for ShellHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ShellRoot(props: ShellHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { Shell {} }
}

pub struct ShellHarness {
    pub dom: VirtualDom,
    pub services: Arc<AppServices>,
    pub storage: Storage,
}

impl ShellHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_shell_harness(pages: &[(&str, &str)], navigation: &[&str]) -> ShellHarness {
    let config = ShellConfig::new()
        .expect("default config")
        .with_navigation(
            navigation
                .iter()
                .map(|name| PageName::new(*name).expect("page name"))
                .collect(),
        );
    let storage = Storage::in_memory();
    let services = Arc::new(
        AppServices::with_assets(
            config,
            storage.clone(),
            fixed_clock(),
            Client::new(),
            Arc::new(StaticAssets::new(pages)),
        )
        .expect("app services"),
    );
    let dom = VirtualDom::new_with_props(
        ShellRoot,
        ShellHarnessProps {
            app: Arc::clone(&services),
        },
    );
    ShellHarness {
        dom,
        services,
        storage,
    }
}
