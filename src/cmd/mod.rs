mod config;
mod create;
mod delete;
mod list;
mod login;
mod logout;
mod register;
mod update;
mod whoami;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use console::Term;
use serde_json::Value;
use thiserror::Error;

/// A command failed and the reason was already shown to the user.
#[derive(Error, Debug)]
#[error("command failed")]
pub struct Reported;

#[async_trait]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct App {
    /// Log level, one of `off`, `error`, `warn`, `info` or `debug`.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Config(config::ShowConfigArgs),
    Create(create::CreateArgs),
    Delete(delete::DeleteArgs),
    List(list::ListArgs),
    Login(login::LoginArgs),
    Logout(logout::LogoutArgs),
    Register(register::RegisterArgs),
    Update(update::UpdateArgs),
    Whoami(whoami::WhoamiArgs),
}

#[async_trait]
impl RunCommand for App {
    async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Config(args) => args.run().await,
            Commands::Create(args) => args.run().await,
            Commands::Delete(args) => args.run().await,
            Commands::List(args) => args.run().await,
            Commands::Login(args) => args.run().await,
            Commands::Logout(args) => args.run().await,
            Commands::Register(args) => args.run().await,
            Commands::Update(args) => args.run().await,
            Commands::Whoami(args) => args.run().await,
        }
    }
}

/// The json body of a create or update request.
#[derive(Args, Debug, Clone)]
pub struct PayloadArgs {
    /// Inline json record.
    #[arg(long, short, conflicts_with = "file")]
    pub data: Option<String>,

    /// Read the json record from this file. When neither `--data` nor `--file`
    /// is given, the record is read from stdin.
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

impl PayloadArgs {
    pub fn read(&self) -> Result<Value> {
        let text = if let Some(ref data) = self.data {
            data.clone()
        } else if let Some(ref path) = self.file {
            fs::read_to_string(path)
                .with_context(|| format!("read payload file: {}", path.display()))?
        } else {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("read payload from stdin")?;
            text
        };

        let value: Value = serde_json::from_str(&text).context("parse payload json")?;
        if !value.is_object() {
            bail!("payload must be a json object");
        }
        Ok(value)
    }
}

/// Asks a yes/no question on the terminal, `assume_yes` skips the question.
pub fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let term = Term::stderr();
    term.write_str(&format!("{question} [y/N] "))
        .context("write confirmation prompt")?;
    let answer = term.read_line().context("read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

/// Returns `password`, or asks for it without echo.
pub fn read_password(password: &Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password.clone());
    }
    let term = Term::stderr();
    term.write_str("Password: ").context("write password prompt")?;
    let password = term.read_secure_line().context("read password")?;
    if password.is_empty() {
        bail!("password cannot be empty");
    }
    Ok(password)
}
