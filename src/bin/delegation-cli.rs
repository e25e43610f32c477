use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "delegation-cli")]
#[command(about = "Inspection CLI for the token-delegation API", long_about = None)]
struct Cli {
    /// Base URL of a running service.
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    /// Mount prefix the API is served under.
    #[arg(short, long, default_value = "/v3")]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the home document describing the API surface
    Home,
    /// List access tokens delegated by a user
    Tokens { user_id: String },
    /// Show one access token
    Token { user_id: String, token_id: String },
    /// List roles delegated through an access token
    Roles { user_id: String, token_id: String },
    /// Show one delegated role
    Role {
        user_id: String,
        token_id: String,
        role_id: String,
    },
    /// Revoke an access token
    Revoke { user_id: String, token_id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = |path: String| format!("{}{}{}", cli.url, cli.prefix, path);

    match cli.command {
        Commands::Home => {
            let res = client.get(format!("{}/", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Tokens { user_id } => {
            let res = client
                .get(api(format!("/users/{user_id}/OS-OAUTH1/access_tokens")))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Token { user_id, token_id } => {
            let res = client
                .get(api(format!(
                    "/users/{user_id}/OS-OAUTH1/access_tokens/{token_id}"
                )))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Roles { user_id, token_id } => {
            let res = client
                .get(api(format!(
                    "/users/{user_id}/OS-OAUTH1/access_tokens/{token_id}/roles"
                )))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Role {
            user_id,
            token_id,
            role_id,
        } => {
            let res = client
                .get(api(format!(
                    "/users/{user_id}/OS-OAUTH1/access_tokens/{token_id}/roles/{role_id}"
                )))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Revoke { user_id, token_id } => {
            let res = client
                .delete(api(format!(
                    "/users/{user_id}/OS-OAUTH1/access_tokens/{token_id}"
                )))
                .send()
                .await?;
            let status = res.status();
            if status.is_success() {
                println!("Revoked ({})", status);
            } else {
                eprintln!("Error: API returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text);
                }
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
