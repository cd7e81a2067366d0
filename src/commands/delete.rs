use crate::client::UsersClient;
use crate::error::Result;
use crate::types::UserId;

pub async fn run(client: UsersClient, id: UserId) -> Result<()> {
    let view = super::open_view(client);
    if let Err(err) = view.load().await {
        return super::finish(&view, Err(err));
    }

    let deleted = view.delete(id).await;
    if deleted.is_ok() {
        super::notify(&format!("Deleted user {id}"));
    }
    super::finish(&view, deleted)
}
