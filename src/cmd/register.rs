use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use registrar::client::config::ClientConfig;
use registrar::config::ConfigArgs;

use super::{read_password, Reported, RunCommand};

/// Create a user account. Works without logging in.
#[derive(Args)]
pub struct RegisterArgs {
    /// The user name of the new account.
    pub username: String,

    /// The email of the new account.
    pub email: String,

    /// The password, prompted for when omitted.
    #[arg(long, short)]
    pub password: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for RegisterArgs {
    async fn run(&self) -> Result<()> {
        let cfg: ClientConfig = self.config.load("client")?;
        let password = read_password(&self.password)?;

        let mut console = cfg.build_console()?;
        if !console
            .register(&self.username, &password, &self.email)
            .await
        {
            return Err(Reported.into());
        }
        Ok(())
    }
}
