use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use registrar::client::config::ClientConfig;
use registrar::config::ConfigArgs;
use registrar::dispatch::UiState;

use super::{Reported, RunCommand};

/// Show the logged in user and the server in use.
#[derive(Args)]
pub struct WhoamiArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for WhoamiArgs {
    async fn run(&self) -> Result<()> {
        let cfg: ClientConfig = self.config.load("client")?;
        let console = cfg.build_console()?;

        let session = match console.dispatcher().session().current() {
            Some(session) if console.state() == UiState::LoggedIn => session,
            _ => {
                eprintln!("Not logged in");
                return Err(Reported.into());
            }
        };

        println!("User:   {} (id {})", session.username(), session.user_id());
        println!("Server: {}", console.dispatcher().client().url());
        Ok(())
    }
}
