mod language;
mod navigation;
mod session;
mod shell;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use language::LanguagePicker;
pub use navigation::{HistoryControls, NavBar};
pub use session::SessionBar;
pub use shell::Shell;
pub use state::Revision;
