use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use log::info;
use registrar::client::config::ClientConfig;
use registrar::config::ConfigArgs;

use super::{confirm, RunCommand};

/// Forget the stored session.
#[derive(Args)]
pub struct LogoutArgs {
    /// Do not ask for confirmation.
    #[arg(long, short)]
    pub yes: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for LogoutArgs {
    async fn run(&self) -> Result<()> {
        let cfg: ClientConfig = self.config.load("client")?;
        let mut console = cfg.build_console()?;

        let confirmed = confirm("Do you really want to log out?", self.yes)?;
        if !console.logout(confirmed) {
            info!("Logout cancelled");
        }
        Ok(())
    }
}
