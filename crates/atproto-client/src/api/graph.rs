//! `app.bsky.graph.*` endpoints

use crate::agent::AtpAgent;
use crate::lexicon::app_bsky::graph::{GetFollowersOutput, GetFollowsOutput, GetListsOutput};
use crate::xrpc::{AuthRequirement, HttpTransport, LimitRange, XrpcRequest};
use crate::Result;

const GET_FOLLOWS: &str = "app.bsky.graph.getFollows";
const GET_FOLLOWERS: &str = "app.bsky.graph.getFollowers";
const GET_LISTS: &str = "app.bsky.graph.getLists";

impl<T: HttpTransport> AtpAgent<T> {
    /// Accounts followed by `actor` (handle or DID)
    ///
    /// Works without a session. `limit` is clamped to 1..=100.
    pub async fn get_follows(
        &self,
        actor: impl Into<String>,
        limit: Option<u32>,
        cursor: Option<String>,
    ) -> Result<GetFollowsOutput> {
        let request = XrpcRequest::query(GET_FOLLOWS)
            .auth(AuthRequirement::Optional)
            .param("actor", actor)
            .limit(limit, LimitRange::STANDARD)
            .param_opt("cursor", cursor);
        self.query(request).await
    }

    /// Accounts following `actor`
    ///
    /// `limit` is clamped to 1..=100.
    pub async fn get_followers(
        &self,
        actor: impl Into<String>,
        limit: Option<u32>,
        cursor: Option<String>,
    ) -> Result<GetFollowersOutput> {
        let request = XrpcRequest::query(GET_FOLLOWERS)
            .param("actor", actor)
            .limit(limit, LimitRange::STANDARD)
            .param_opt("cursor", cursor);
        self.query(request).await
    }

    /// Lists created by `actor`
    ///
    /// `limit` is clamped to 1..=100.
    pub async fn get_lists(
        &self,
        actor: impl Into<String>,
        limit: Option<u32>,
        cursor: Option<String>,
    ) -> Result<GetListsOutput> {
        let request = XrpcRequest::query(GET_LISTS)
            .param("actor", actor)
            .limit(limit, LimitRange::STANDARD)
            .param_opt("cursor", cursor);
        self.query(request).await
    }
}
