use clap::Subcommand;
use serde_json::json;

use crate::auth::{Principal, TokenService};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue an access token for a user")]
    Issue {
        #[arg(long, help = "User id")]
        id: String,
        #[arg(long, help = "User email")]
        email: String,
    },

    #[command(about = "Verify a token and print the principal it carries")]
    Verify {
        #[arg(help = "Access token")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let tokens = TokenService::from_config(&config.security)?;

    match cmd {
        TokenCommands::Issue { id, email } => {
            let token = tokens.issue(&Principal::new(id, email))?;
            match output_format {
                OutputFormat::Json => output_success(&output_format, "Token issued", Some(json!({ "token": token }))),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
        TokenCommands::Verify { token } => match tokens.verify(&token) {
            Ok(principal) => output_success(
                &output_format,
                &format!("Token valid for {} ({})", principal.email, principal.id),
                Some(json!({ "id": principal.id, "email": principal.email })),
            ),
            Err(e) => {
                output_error(&output_format, &e.to_string(), Some("TOKEN_INVALID"))?;
                anyhow::bail!("token rejected")
            }
        },
    }
}
