//! Get-or-create a login token for a memo.
//!
//! The memo acts as the lookup key among the account's registrations:
//! 1) list registrations
//! 2) first entry (in server order) whose memo matches exactly
//! 3) expired -> reset it and return the new token
//! 4) still valid -> return its token, nothing is mutated
//! 5) no match -> create one for the appid and return its token
//!
//! At most one mutating call (reset or create) per invocation.

use tracing::info;

use crate::account::{ApiResponse, IssuedToken, Registration, TokenStatus};
use crate::{GameServersClient, Result};

/// The calls the handler needs; `GameServersClient` is the HTTP implementation.
#[async_trait::async_trait]
pub trait GameServersApi: Send + Sync {
    async fn list_registrations(&self) -> Result<Vec<Registration>>;
    async fn create_registration(&self, appid: u32, memo: &str)
    -> Result<ApiResponse<IssuedToken>>;
    async fn reset_token(&self, steamid: u64) -> Result<ApiResponse<IssuedToken>>;
    async fn query_token(&self, login_token: &str) -> Result<ApiResponse<TokenStatus>>;
}

#[async_trait::async_trait]
impl GameServersApi for GameServersClient {
    async fn list_registrations(&self) -> Result<Vec<Registration>> {
        GameServersClient::list_registrations(self).await
    }

    async fn create_registration(
        &self,
        appid: u32,
        memo: &str,
    ) -> Result<ApiResponse<IssuedToken>> {
        GameServersClient::create_registration(self, appid, memo).await
    }

    async fn reset_token(&self, steamid: u64) -> Result<ApiResponse<IssuedToken>> {
        GameServersClient::reset_token(self, steamid).await
    }

    async fn query_token(&self, login_token: &str) -> Result<ApiResponse<TokenStatus>> {
        GameServersClient::query_token(self, login_token).await
    }
}

/// Return a usable login token for `memo`, creating or renewing one as needed.
pub async fn get_or_create_token<A>(api: &A, appid: u32, memo: &str) -> Result<String>
where
    A: GameServersApi + ?Sized,
{
    let servers = api.list_registrations().await?;

    match servers.into_iter().find(|s| s.memo == memo) {
        Some(server) if server.is_expired => {
            info!(steamid = server.steamid, memo, "token expired, resetting");
            let resp = api.reset_token(server.steamid).await?;
            Ok(resp.response.login_token)
        }
        Some(server) => {
            info!(steamid = server.steamid, memo, "reusing existing token");
            Ok(server.login_token)
        }
        None => {
            info!(appid, memo, "no registration for memo, creating one");
            let resp = api.create_registration(appid, memo).await?;
            Ok(resp.response.login_token)
        }
    }
}
