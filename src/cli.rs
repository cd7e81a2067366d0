use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::types::UserId;
use crate::validation::UserForm;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Compact,
}

#[derive(Parser)]
#[command(name = "users")]
#[command(about = "List, create and delete users on a placeholder REST API", version)]
#[command(after_help = "EXAMPLES:
    users list                         List all users
    users delete 3                     Delete user 3
    users create -n \"Ada\" -e ada@example.com -p 555-0100
    users shell                        Start an interactive session")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json, compact)
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Suppress success messages and the loading indicator
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show debug logs and detailed error information
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Users collection URL (overrides config and USERS_API_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

impl Cli {
    /// Get the effective output format, considering --json flag
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List users
    #[command(
        alias = "ls",
        after_help = "EXAMPLES:
    users list
    users list --format compact"
    )]
    List,
    /// Delete a user (removed locally first, restored if the server refuses)
    #[command(
        alias = "rm",
        after_help = "EXAMPLES:
    users delete 3"
    )]
    Delete {
        /// User ID
        id: UserId,
    },
    /// Create a user (shown as pending until the server confirms it)
    #[command(
        alias = "add",
        after_help = "EXAMPLES:
    users create -n \"Ada Lovelace\" -e ada@example.com -p 555-0100
    users create -n \"Ada\" -e ada@example.com -p 555-0100 --street \"Main St\" --city London"
    )]
    Create(CreateArgs),
    /// Start an interactive session over a single loaded list
    #[command(after_help = "EXAMPLES:
    users shell")]
    Shell,
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    users completions bash > ~/.bash_completion.d/users
    users completions zsh > ~/.zfunc/_users
    users completions fish > ~/.config/fish/completions/users.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    users init")]
    Init,
}

#[derive(Args, Clone)]
pub struct CreateArgs {
    /// Full name (at least 3 characters)
    #[arg(long, short)]
    pub name: String,

    /// Email address
    #[arg(long, short)]
    pub email: String,

    /// Phone number (digits, optionally with + - . ( ) and spaces)
    #[arg(long, short)]
    pub phone: String,

    /// Street
    #[arg(long)]
    pub street: Option<String>,

    /// Suite or apartment
    #[arg(long)]
    pub suite: Option<String>,

    /// City
    #[arg(long)]
    pub city: Option<String>,

    /// Zipcode
    #[arg(long)]
    pub zipcode: Option<String>,
}

impl From<CreateArgs> for UserForm {
    fn from(args: CreateArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            phone: args.phone,
            street: args.street,
            suite: args.suite,
            city: args.city,
            zipcode: args.zipcode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_json_flag_overrides_format() {
        let cli = Cli::parse_from(["users", "list", "--json"]);
        assert_eq!(cli.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_create_args_become_form() {
        let cli = Cli::parse_from([
            "users", "add", "-n", "Ada", "-e", "ada@example.com", "-p", "555-0100", "--city",
            "London",
        ]);
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        let form = UserForm::from(args);
        assert_eq!(form.name, "Ada");
        assert_eq!(form.city.as_deref(), Some("London"));
        assert!(form.street.is_none());
    }

    #[test]
    fn test_delete_parses_id() {
        let cli = Cli::parse_from(["users", "rm", "7"]);
        assert!(matches!(cli.command, Commands::Delete { id: 7 }));
    }
}
