pub mod create;
pub mod delete;
pub mod init;
pub mod list;
pub mod shell;

use tracing::debug;

use crate::cli::OutputFormat;
use crate::client::UsersClient;
use crate::error::Result;
use crate::output;
use crate::store::UserList;

/// Build a view over `client` that tears itself down on Ctrl-C.
pub fn open_view(client: UsersClient) -> UserList<UsersClient> {
    let view = UserList::new(client);
    output::spawn_loading_indicator(view.subscribe());

    let abort = view.abort_controller();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received");
            abort.abort();
        }
    });

    view
}

/// Tear the view down and render what is left of it.
pub fn finish<T>(view: &UserList<UsersClient>, result: Result<T>) -> Result<T> {
    view.teardown();
    match output::format() {
        OutputFormat::Json => output::render_view(&view.snapshot()),
        // the error line is printed by main
        _ => {
            let users = view.users();
            if result.is_ok() || !users.is_empty() {
                output::print_users(&users);
            }
        }
    }
    result
}

/// Status line for table and compact output; JSON carries state only.
pub fn notify(message: &str) {
    if output::format() != OutputFormat::Json {
        output::print_message(message);
    }
}
