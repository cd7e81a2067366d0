use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tokio::sync::watch;

use crate::cli::OutputFormat;
use crate::store::ViewState;
use crate::types::User;
use crate::validation::FormErrors;

static FORMAT: AtomicU8 = AtomicU8::new(0);
static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_format(format: OutputFormat) {
    let raw = match format {
        OutputFormat::Table => 0,
        OutputFormat::Json => 1,
        OutputFormat::Compact => 2,
    };
    FORMAT.store(raw, Ordering::Relaxed);
}

pub fn format() -> OutputFormat {
    match FORMAT.load(Ordering::Relaxed) {
        1 => OutputFormat::Json,
        2 => OutputFormat::Compact,
        _ => OutputFormat::Table,
    }
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: id_label(user),
            name: truncate(&user.name, 30),
            email: user.email.clone(),
            address: user
                .address
                .as_ref()
                .map(|a| truncate(&a.one_line(), 50))
                .unwrap_or_default(),
            phone: user.phone.clone(),
        }
    }
}

fn id_label(user: &User) -> String {
    if user.is_pending() {
        "saving…".yellow().to_string()
    } else {
        user.id.to_string()
    }
}

/// One line per user, in the order name, email, address, phone.
pub fn compact_line(user: &User) -> String {
    let mut parts = vec![id_label(user), user.name.clone(), user.email.clone()];
    if let Some(address) = &user.address {
        parts.push(address.one_line());
    }
    parts.push(user.phone.clone());
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

pub fn print_users(users: &[User]) {
    match format() {
        OutputFormat::Json => print_json(users),
        OutputFormat::Compact => {
            for user in users {
                println!("{}", compact_line(user));
            }
        }
        OutputFormat::Table => {
            if users.is_empty() {
                println!("{}", "No users".bright_black());
                return;
            }
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{table}");
        }
    }
}

/// Render the whole view: error line, then the list.
pub fn render_view(state: &ViewState) {
    if let OutputFormat::Json = format() {
        print_json(state);
        return;
    }

    if let Some(error) = &state.error {
        println!("{}", error.red());
    }
    print_users(&state.users);
}

/// Print a message (skipped when quiet, wrapped in an object for JSON)
pub fn print_message(message: &str) {
    if is_quiet() {
        return;
    }
    match format() {
        OutputFormat::Json => print_json(&serde_json::json!({ "message": message })),
        _ => println!("{message}"),
    }
}

pub fn print_form_errors(errors: &FormErrors) {
    if let OutputFormat::Json = format() {
        print_json(&serde_json::json!({ "errors": errors }));
        return;
    }
    for error in errors.iter() {
        eprintln!("  {} {}", format!("{}:", error.field).red().bold(), error.message);
    }
}

/// Print a loading line each time the view starts a fetch, until the view closes.
pub fn spawn_loading_indicator(mut state: watch::Receiver<ViewState>) {
    if is_quiet() || matches!(format(), OutputFormat::Json) {
        return;
    }
    tokio::spawn(async move {
        loop {
            if state.wait_for(|s| s.loading).await.is_err() {
                break;
            }
            eprintln!("{}", "Loading users…".bright_black());
            if state.wait_for(|s| !s.loading).await.is_err() {
                break;
            }
        }
    });
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
