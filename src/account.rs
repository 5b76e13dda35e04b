//! Game server account (login token) APIs
//!
//! Endpoints (relative to the client's base URL):
//! - GET  GetAccountList/v1     -> every registration on the account
//! - POST CreateAccount/v1      {"appid": u32, "memo": string}
//! - POST ResetLoginToken/v1    {"steamid": u64}
//! - GET  QueryLoginToken/v1    {"login_token": string}
//!
//! GetAccountList response example:
//! {
//!   "response": {
//!     "servers": [
//!       {
//!         "steamid": "85568392920040000",
//!         "appid": 730,
//!         "login_token": "0123456789ABCDEF0123456789ABCDEF",
//!         "memo": "eu-1",
//!         "is_deleted": false,
//!         "is_expired": false,
//!         "rt_last_logon": 1700000000
//!       }
//!     ],
//!     "is_banned": false,
//!     "expires": 0,
//!     "actor": "76561197960287930",
//!     "last_action_time": 1700000000
//!   }
//! }
//!
//! Field notes:
//! - steamid is a 64-bit value sent as a decimal string; plain numbers are accepted too.
//! - servers is omitted by the service when the account has no registrations.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::{GameServersClient, Result};

const GET_ACCOUNT_LIST: &str = "GetAccountList/v1";
const CREATE_ACCOUNT: &str = "CreateAccount/v1";
const RESET_LOGIN_TOKEN: &str = "ResetLoginToken/v1";
const QUERY_LOGIN_TOKEN: &str = "QueryLoginToken/v1";

/// `{"response": ...}` envelope shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub response: T,
}

/// Response body of GetAccountList; account-level fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountList {
    #[serde(default)]
    pub servers: Vec<Registration>,
}

/// One registered game server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Registration {
    #[serde(deserialize_with = "wire_u64::required")]
    pub steamid: u64,
    #[serde(default)]
    pub appid: Option<u32>,
    pub memo: String,
    pub is_expired: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub login_token: String,
    /// Unix time of the last logon with this token (0 when never used)
    #[serde(default)]
    pub rt_last_logon: u64,
}

/// Request for CreateAccount
#[derive(Debug, Clone, Serialize)]
pub struct CreateAccountRequest<'a> {
    pub appid: u32,
    pub memo: &'a str,
}

/// Token returned by CreateAccount and ResetLoginToken.
///
/// ResetLoginToken only returns `login_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuedToken {
    pub login_token: String,
    #[serde(default, deserialize_with = "wire_u64::optional")]
    pub steamid: Option<u64>,
}

/// Response body of QueryLoginToken
#[derive(Debug, Clone, Deserialize)]
pub struct TokenStatus {
    #[serde(default, deserialize_with = "wire_u64::optional")]
    pub steamid: Option<u64>,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub expires: u64,
}

impl GameServersClient {
    /// Call GetAccountList and return `response.servers`, in server order.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_registrations(&self) -> Result<Vec<Registration>> {
        let resp: ApiResponse<AccountList> = self.get(GET_ACCOUNT_LIST, &json!({})).await?;
        debug!(count = resp.response.servers.len(), "registrations listed");
        Ok(resp.response.servers)
    }

    /// Call CreateAccount to register a new game server for `appid`.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_registration(
        &self,
        appid: u32,
        memo: &str,
    ) -> Result<ApiResponse<IssuedToken>> {
        self.post(CREATE_ACCOUNT, &CreateAccountRequest { appid, memo })
            .await
    }

    /// Call ResetLoginToken to issue a new token for `steamid`.
    #[instrument(level = "debug", skip(self))]
    pub async fn reset_token(&self, steamid: u64) -> Result<ApiResponse<IssuedToken>> {
        self.post(RESET_LOGIN_TOKEN, &json!({ "steamid": steamid }))
            .await
    }

    /// Call QueryLoginToken for the status of `login_token`.
    #[instrument(level = "debug", skip(self, login_token))]
    pub async fn query_token(&self, login_token: &str) -> Result<ApiResponse<TokenStatus>> {
        self.get(QUERY_LOGIN_TOKEN, &json!({ "login_token": login_token }))
            .await
    }
}

/// steamid values arrive as decimal strings (sometimes as numbers).
mod wire_u64 {
    use super::*;
    use crate::validate::parse_steamid;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    fn convert<E: serde::de::Error>(repr: Repr) -> std::result::Result<u64, E> {
        match repr {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => parse_steamid(&s).map_err(E::custom),
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
        convert(Repr::deserialize(d)?)
    }

    pub fn optional<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<u64>, D::Error> {
        Option::<Repr>::deserialize(d)?.map(convert).transpose()
    }
}
