use crate::client::UsersClient;
use crate::error::Result;

pub async fn run(client: UsersClient) -> Result<()> {
    let view = super::open_view(client);
    let loaded = view.load().await;
    super::finish(&view, loaded)
}
