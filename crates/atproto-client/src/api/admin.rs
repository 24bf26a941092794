//! `com.atproto.admin.*` endpoints
//!
//! These need an administrator session on the PDS.

use crate::agent::AtpAgent;
use crate::lexicon::com_atproto::admin::{AccountView, UpdateAccountEmailInput};
use crate::xrpc::{HttpTransport, XrpcRequest};
use crate::Result;

const GET_ACCOUNT_INFO: &str = "com.atproto.admin.getAccountInfo";
const UPDATE_ACCOUNT_EMAIL: &str = "com.atproto.admin.updateAccountEmail";

impl<T: HttpTransport> AtpAgent<T> {
    /// Administrative view of an account
    pub async fn get_account_info(&self, did: impl Into<String>) -> Result<AccountView> {
        self.query(XrpcRequest::query(GET_ACCOUNT_INFO).param("did", did))
            .await
    }

    /// Change the email address of an account
    pub async fn update_account_email(
        &self,
        account: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<()> {
        let input = UpdateAccountEmailInput {
            account: account.into(),
            email: email.into(),
        };
        self.procedure_without_output(XrpcRequest::procedure(UPDATE_ACCOUNT_EMAIL).json_body(&input)?)
            .await
    }
}
