use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use registrar::client::config::ClientConfig;
use registrar::config::ConfigArgs;
use registrar::display::pretty_json;

use super::RunCommand;

/// Display the client configuration in use, in JSON format.
#[derive(Args)]
pub struct ShowConfigArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for ShowConfigArgs {
    async fn run(&self) -> Result<()> {
        let cfg: ClientConfig = self.config.load("client")?;
        pretty_json(cfg)
    }
}
