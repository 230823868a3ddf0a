use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use registrar::api::entity::{record_id, Entity};
use registrar::client::config::ClientConfig;
use registrar::config::ConfigArgs;

use super::{PayloadArgs, Reported, RunCommand};

/// Create a record from a JSON object.
#[derive(Args)]
pub struct CreateArgs {
    /// The entity of the new record.
    pub entity: Entity,

    #[command(flatten)]
    pub payload: PayloadArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for CreateArgs {
    async fn run(&self) -> Result<()> {
        let payload = self.payload.read()?;
        let cfg: ClientConfig = self.config.load("client")?;
        let mut console = cfg.build_console()?;

        let created = match console.create(self.entity, &payload).await {
            Some(created) => created,
            None => return Err(Reported.into()),
        };
        if let Some(id) = record_id(&created) {
            println!("{id}");
        }
        Ok(())
    }
}
