use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use log::info;
use registrar::api::entity::Entity;
use registrar::client::config::ClientConfig;
use registrar::config::ConfigArgs;
use registrar::dispatch::UiState;

use super::{confirm, Reported, RunCommand};

/// Delete a record.
#[derive(Args)]
pub struct DeleteArgs {
    /// The entity of the record.
    pub entity: Entity,

    /// The id of the record.
    pub id: u64,

    /// Do not ask for confirmation.
    #[arg(long, short)]
    pub yes: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for DeleteArgs {
    async fn run(&self) -> Result<()> {
        let cfg: ClientConfig = self.config.load("client")?;
        let mut console = cfg.build_console()?;
        if console.state() == UiState::LoggedOut {
            // Reports the login requirement without asking first.
            console.delete(self.entity, self.id, true).await;
            return Err(Reported.into());
        }

        let question = format!(
            "Do you really want to delete {} {}?",
            self.entity.singular().to_lowercase(),
            self.id
        );
        if !confirm(&question, self.yes)? {
            info!("Delete cancelled");
            return Ok(());
        }

        if !console.delete(self.entity, self.id, true).await {
            return Err(Reported.into());
        }
        Ok(())
    }
}
