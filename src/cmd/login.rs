use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use registrar::api::entity::Entity;
use registrar::client::config::ClientConfig;
use registrar::config::ConfigArgs;
use registrar::display::{display_records, DisplayStyle};

use super::{read_password, Reported, RunCommand};

/// Log in and store the session, then show the student list.
#[derive(Args)]
pub struct LoginArgs {
    /// The user name to log in with.
    pub username: String,

    /// The password, prompted for when omitted.
    #[arg(long, short)]
    pub password: Option<String>,

    /// Do not show the student list after logging in.
    #[arg(long, short)]
    pub quiet: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for LoginArgs {
    async fn run(&self) -> Result<()> {
        let cfg: ClientConfig = self.config.load("client")?;
        let password = read_password(&self.password)?;

        let mut console = cfg.build_console()?;
        if !console.login(&self.username, &password).await {
            return Err(Reported.into());
        }

        if !self.quiet && console.entity() == Some(Entity::Student) {
            display_records(
                Entity::Student,
                console.records(),
                DisplayStyle::Table,
                false,
            )?;
        }
        Ok(())
    }
}
