/*!
gslt: print a Steam game server login token for a memo, creating or renewing it when needed.

Run:
  gslt 730 eu-1

Env (optional):
  GSLT_APIKEY_FILE  path of the API key file (default: APIKEY)
  GSLT_BASE_URL     IGameServersService base URL
  RUST_LOG          log filter, logs go to stderr (default: warn)

Exit status: 0 on success, 1 when the API key file is missing, non-zero on any other failure.
*/

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gslt_rs::config::Config;
use gslt_rs::validate::parse_appid;
use gslt_rs::{CredentialError, GameServersClient, get_or_create_token, load_api_key};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gslt", version, about, allow_negative_numbers = true)]
struct Cli {
    /// AppID of the game (not the server)
    #[arg(value_parser = appid_arg)]
    appid: u32,
    /// Memo identifying the server registration
    memo: String,
}

fn appid_arg(s: &str) -> std::result::Result<u32, String> {
    parse_appid(s).map_err(|e| e.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let status = run(cli, Config::from_env(), &mut std::io::stdout().lock()).await?;
    Ok(ExitCode::from(status))
}

/// Load the key, get or create the token and write it to `out` as one line.
///
/// Returns the process exit status; 1 when the key file is missing.
async fn run(cli: Cli, config: Config, out: &mut impl Write) -> Result<u8> {
    let api_key = match load_api_key(&config.apikey_file) {
        Ok(key) => key,
        Err(CredentialError::NotFound { path }) => {
            eprintln!("APIKEY file not found: {}", path.display());
            return Ok(1);
        }
        Err(e) => return Err(e).context("failed to load API key"),
    };

    if !config.uses_default_base_url() {
        warn!(base_url = %config.base_url, "sending the API key to a non-default base url");
    }

    let client = GameServersClient::with_base_url(api_key, &config.base_url)
        .context("failed to build IGameServersService client")?;
    let token = get_or_create_token(&client, cli.appid, &cli.memo)
        .await
        .with_context(|| format!("failed to get a login token for memo {:?}", cli.memo))?;

    writeln!(out, "{token}").context("failed to write token")?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_positionals() {
        let cli = Cli::try_parse_from(["gslt", "730", "eu-1"]).unwrap();
        assert_eq!(cli.appid, 730);
        assert_eq!(cli.memo, "eu-1");
    }

    #[test]
    fn appid_bounds() {
        assert!(Cli::try_parse_from(["gslt", "0", "m"]).is_ok());
        assert!(Cli::try_parse_from(["gslt", "4294967295", "m"]).is_ok());
        assert!(Cli::try_parse_from(["gslt", "4294967296", "m"]).is_err());
        assert!(Cli::try_parse_from(["gslt", "-1", "m"]).is_err());
    }

    #[test]
    fn both_arguments_required() {
        assert!(Cli::try_parse_from(["gslt", "730"]).is_err());
        assert!(Cli::try_parse_from(["gslt"]).is_err());
        assert!(Cli::try_parse_from(["gslt", "730", "m", "extra"]).is_err());
    }

    fn cli(memo: &str) -> Cli {
        Cli {
            appid: 730,
            memo: memo.to_string(),
        }
    }

    /// Serve a GetAccountList holding one valid "alpha" registration.
    async fn spawn_account_list() -> String {
        use axum::{Json, Router, routing::get};

        let app = Router::new().route(
            "/IGameServersService/GetAccountList/v1",
            get(|| async {
                Json(serde_json::json!({"response": {"servers": [
                    {"memo": "alpha", "is_expired": false, "login_token": "TOK1", "steamid": "1"}
                ]}}))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        format!("http://{addr}/IGameServersService/")
    }

    #[tokio::test]
    async fn missing_key_file_exits_with_one() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            apikey_file: dir.path().join("APIKEY"),
            // Nothing listens here; reaching the network would fail the run.
            base_url: "http://127.0.0.1:9/IGameServersService/".to_string(),
        };

        let mut out = Vec::new();
        let status = run(cli("alpha"), config, &mut out).await.unwrap();
        assert_eq!(status, 1);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn prints_exactly_one_token_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let apikey_file = dir.path().join("APIKEY");
        std::fs::write(&apikey_file, "TESTKEY\n").unwrap();
        let config = Config {
            apikey_file,
            base_url: spawn_account_list().await,
        };

        let mut out = Vec::new();
        let status = run(cli("alpha"), config, &mut out).await.unwrap();
        assert_eq!(status, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "TOK1\n");
    }

    #[tokio::test]
    async fn network_failure_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let apikey_file = dir.path().join("APIKEY");
        std::fs::write(&apikey_file, "TESTKEY\n").unwrap();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = Config {
            apikey_file,
            base_url: format!("http://{addr}/IGameServersService/"),
        };

        let mut out = Vec::new();
        let err = run(cli("alpha"), config, &mut out).await.unwrap_err();
        assert!(!format!("{err:?}").contains("TESTKEY"));
        assert!(out.is_empty());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
