use async_trait::async_trait;

use crate::abort::AbortSignal;
use crate::error::Result;
use crate::types::{NewUser, User, UserId};

/// Remote user collection. Every call honours the caller's abort signal.
#[async_trait]
pub trait UserApi {
    async fn list(&self, signal: &AbortSignal) -> Result<Vec<User>>;

    async fn create(&self, user: &NewUser, signal: &AbortSignal) -> Result<User>;

    async fn delete(&self, id: UserId, signal: &AbortSignal) -> Result<()>;
}
