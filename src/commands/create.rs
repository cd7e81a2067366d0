use crate::cli::CreateArgs;
use crate::client::UsersClient;
use crate::error::{Result, UsersError};
use crate::validation::UserForm;

pub async fn run(client: UsersClient, args: CreateArgs) -> Result<()> {
    let form = UserForm::from(args);
    // Reject bad input before fetching anything.
    form.validate().map_err(UsersError::Invalid)?;

    let view = super::open_view(client);
    if let Err(err) = view.load().await {
        return super::finish(&view, Err(err));
    }

    let created = view.create(&form).await;
    if let Ok(user) = &created {
        super::notify(&format!("Created user {} - {}", user.id, user.name));
    }
    super::finish(&view, created.map(|_| ()))
}
