use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use registrar::api::entity::Entity;
use registrar::client::config::ClientConfig;
use registrar::config::ConfigArgs;

use super::{PayloadArgs, Reported, RunCommand};

/// Replace a record with a JSON object.
#[derive(Args)]
pub struct UpdateArgs {
    /// The entity of the record.
    pub entity: Entity,

    /// The id of the record.
    pub id: u64,

    #[command(flatten)]
    pub payload: PayloadArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for UpdateArgs {
    async fn run(&self) -> Result<()> {
        let payload = self.payload.read()?;
        let cfg: ClientConfig = self.config.load("client")?;
        let mut console = cfg.build_console()?;

        if !console.update(self.entity, self.id, &payload).await {
            return Err(Reported.into());
        }
        Ok(())
    }
}
