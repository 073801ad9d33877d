use aws_sdk_waf::Client;
use strato_core::{BoxFuture, RemoteError};
use strato_retry::TokenSource;

use crate::error::classify;

/// Change tokens for the classic WAF control plane, fetched per attempt via
/// `GetChangeToken`.
#[derive(Clone)]
pub struct WafChangeTokens {
    client: Client,
}

impl WafChangeTokens {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl TokenSource for WafChangeTokens {
    fn change_token(&self) -> BoxFuture<'_, Result<String, RemoteError>> {
        Box::pin(async {
            let out = self
                .client
                .get_change_token()
                .send()
                .await
                .map_err(|err| classify("waf:GetChangeToken", err))?;
            out.change_token().map(str::to_string).ok_or_else(|| {
                RemoteError::other("waf:GetChangeToken", "response carried no token")
            })
        })
    }
}
