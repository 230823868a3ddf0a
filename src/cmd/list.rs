use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use registrar::api::entity::Entity;
use registrar::client::config::ClientConfig;
use registrar::config::ConfigArgs;
use registrar::display::{display_records, DisplayStyle};

use super::{Reported, RunCommand};

/// List the records of an entity.
#[derive(Args)]
pub struct ListArgs {
    /// The entity to list.
    pub entity: Entity,

    /// The output style.
    #[arg(long, short, default_value = "table")]
    pub output: DisplayStyle,

    /// Omit the title, header and record count.
    #[arg(long)]
    pub headless: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for ListArgs {
    async fn run(&self) -> Result<()> {
        let cfg: ClientConfig = self.config.load("client")?;
        let mut console = cfg.build_console()?;

        let records = match console.load(self.entity).await {
            Some(records) => records,
            None => return Err(Reported.into()),
        };
        display_records(self.entity, records, self.output, self.headless)
    }
}
