pub mod edit;
pub mod init;
pub mod list;
pub mod new;
pub mod show;

pub use edit::{edit, EditArgs};
pub use init::{init, InitArgs};
pub use list::list;
pub use new::{new, NewArgs};
pub use show::{show, ShowArgs};

use crate::config::Config;
use anyhow::Result;
use journal_editor::HttpPostStore;
use std::path::Path;

/// Load config and build a client for the configured server
pub(crate) fn connect(cwd: &Path) -> Result<(Config, HttpPostStore)> {
    let config = Config::load(cwd)?;
    let store = HttpPostStore::new(config.server_url.clone(), config.timeout())?;
    Ok((config, store))
}
