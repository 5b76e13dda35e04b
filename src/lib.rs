#![doc = r#"
gslt-rs

Client for the Steam `IGameServersService` web API, which manages game
server login tokens (GSLT).

Items are exposed at the crate root; the submodules hold the wire types.

Included:
- client: `GameServersClient`, query-string encoding and the unified `Error`.
- account: GetAccountList / CreateAccount / ResetLoginToken / QueryLoginToken.
- handler: get-or-create a token for a memo.
- credential: API key file loading.
- config: environment overrides for the binary.

Quick usage:

```ignore
use gslt_rs::{GameServersClient, get_or_create_token, load_api_key};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = GameServersClient::new(load_api_key("APIKEY")?)?;
    let token = get_or_create_token(&client, 730, "eu-1").await?;
    println!("{token}");
    Ok(())
}
```
"#]

pub mod account;
pub mod client;
pub mod config;
pub mod credential;
pub mod handler;
pub mod validate;

pub use client::*;
pub use credential::{ApiKey, CredentialError, load_api_key};
pub use handler::{GameServersApi, get_or_create_token};
