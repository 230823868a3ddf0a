use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};
use crate::console::Console;
use crate::dispatch::Dispatcher;
use crate::feedback::TerminalFeedback;
use crate::session::storage::FileStorage;
use crate::session::SessionStore;

use super::RestClient;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_server")]
    pub server: String,

    #[serde(default = "ClientConfig::default_session_dir")]
    pub session_dir: String,

    #[serde(default = "ClientConfig::default_success_hide_secs")]
    pub success_hide_secs: u64,

    #[serde(default)]
    pub accept_invalid_certs: bool,
}

pub type TerminalConsole = Console<FileStorage, TerminalFeedback>;

impl CommonConfig for ClientConfig {
    fn default() -> Self {
        Self {
            server: Self::default_server(),
            session_dir: Self::default_session_dir(),
            success_hide_secs: Self::default_success_hide_secs(),
            accept_invalid_certs: false,
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        self.server = expandenv("server", &self.server)?;
        if self.server.is_empty() {
            bail!("server cannot be empty");
        }

        self.session_dir = expandenv("session_dir", &self.session_dir)?;
        if self.session_dir.is_empty() {
            let path = ps.data_path.join("session");
            self.session_dir = format!("{}", path.display());
        }

        if self.success_hide_secs == 0 {
            bail!("success_hide_secs must be greater than 0");
        }

        Ok(())
    }
}

impl ClientConfig {
    pub fn default_server() -> String {
        String::from("http://localhost:8080")
    }

    pub fn default_session_dir() -> String {
        String::new()
    }

    pub fn default_success_hide_secs() -> u64 {
        5
    }

    /// Builds a console over the stored session, printing feedback to the
    /// terminal. The start-up session check runs while building.
    pub fn build_console(&self) -> Result<TerminalConsole> {
        let client =
            RestClient::new(&self.server, self.accept_invalid_certs).context("build client")?;
        let storage = FileStorage::new(&self.session_dir)?;
        let feedback = TerminalFeedback::new(Duration::from_secs(self.success_hide_secs));

        let dispatcher = Dispatcher::new(client, SessionStore::open(storage), feedback);
        Ok(Console::new(dispatcher))
    }
}
