//! Interactive session over one mounted view.
//!
//! The list is fetched once on start. Deletes and creates are applied to it
//! optimistically and the view is re-rendered after every command. `quit`,
//! end of input, or Ctrl-C tears the view down and cancels whatever request
//! is still running.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::abort::AbortSignal;
use crate::client::UsersClient;
use crate::error::{Result, UsersError};
use crate::output;
use crate::types::UserId;
use crate::validation::UserForm;

const HELP: &str = "Commands:
  list | ls             Show the current list
  reload                Fetch the list again
  delete <id> | rm <id> Delete a user
  create | add          Create a user (prompts for fields)
  help                  Show this help
  quit | exit           Leave the session";

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    List,
    Reload,
    Delete(UserId),
    Create,
    Help,
    Quit,
    Empty,
}

fn parse_command(line: &str) -> std::result::Result<ShellCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ShellCommand::Empty);
    };

    let command = match verb.to_lowercase().as_str() {
        "list" | "ls" => ShellCommand::List,
        "reload" => ShellCommand::Reload,
        "delete" | "rm" => {
            let id = words
                .next()
                .ok_or_else(|| format!("usage: {verb} <id>"))?;
            let id = id
                .parse::<UserId>()
                .map_err(|_| format!("not a user id: {id}"))?;
            ShellCommand::Delete(id)
        }
        "create" | "add" => ShellCommand::Create,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };

    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument: {extra}"));
    }
    Ok(command)
}

/// Read stdin on a plain thread. A read blocked in the kernel cannot be
/// cancelled, so the thread is detached and never joined; the process exits
/// without waiting for it.
fn stdin_lines() -> mpsc::Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

struct Prompt {
    lines: mpsc::Receiver<io::Result<String>>,
    signal: AbortSignal,
}

impl Prompt {
    /// Read one line; `None` at end of input.
    async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        io::stdout().flush()?;
        self.next_line().await
    }

    async fn next_line(&mut self) -> Result<Option<String>> {
        tokio::select! {
            biased;
            _ = self.signal.aborted() => Err(UsersError::Cancelled),
            line = self.lines.recv() => Ok(line.transpose()?),
        }
    }

    async fn ask_optional(&mut self, label: &str) -> Result<Option<String>> {
        Ok(self
            .ask(label)
            .await?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    async fn read_form(&mut self) -> Result<Option<UserForm>> {
        let Some(name) = self.ask("  Name: ").await? else {
            return Ok(None);
        };
        let Some(email) = self.ask("  Email: ").await? else {
            return Ok(None);
        };
        let Some(phone) = self.ask("  Phone: ").await? else {
            return Ok(None);
        };
        let street = self.ask_optional("  Street (optional): ").await?;
        let suite = self.ask_optional("  Suite (optional): ").await?;
        let city = self.ask_optional("  City (optional): ").await?;
        let zipcode = self.ask_optional("  Zipcode (optional): ").await?;

        Ok(Some(UserForm {
            name,
            email,
            phone,
            street,
            suite,
            city,
            zipcode,
        }))
    }
}

pub async fn run(client: UsersClient) -> Result<()> {
    let view = super::open_view(client);
    let mut prompt = Prompt {
        lines: stdin_lines(),
        signal: view.abort_controller().signal(),
    };

    let _ = view.load().await;
    output::render_view(&view.snapshot());
    if !output::is_quiet() {
        println!("{}", "Type 'help' for commands.".bright_black());
    }

    loop {
        let line = match prompt.ask("users> ").await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) if err.is_cancelled() => {
                println!();
                break;
            }
            Err(err) => return Err(err),
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", message.red());
                continue;
            }
        };
        debug!(?command, "shell command");

        match command {
            ShellCommand::Empty => {}
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => break,
            ShellCommand::List => output::render_view(&view.snapshot()),
            ShellCommand::Reload => {
                let _ = view.load().await;
                output::render_view(&view.snapshot());
            }
            ShellCommand::Delete(id) => match view.delete(id).await {
                Ok(()) => {
                    super::notify(&format!("Deleted user {id}"));
                    output::render_view(&view.snapshot());
                }
                Err(UsersError::Cancelled) => break,
                Err(err @ (UsersError::UserNotFound(_) | UsersError::Pending(_))) => {
                    eprintln!("{}", err.to_string().red());
                }
                // the view carries the error line
                Err(_) => output::render_view(&view.snapshot()),
            },
            ShellCommand::Create => {
                let form = match prompt.read_form().await {
                    Ok(Some(form)) => form,
                    Ok(None) => break,
                    Err(err) if err.is_cancelled() => break,
                    Err(err) => return Err(err),
                };
                match view.create(&form).await {
                    Ok(user) => {
                        super::notify(&format!("Created user {} - {}", user.id, user.name));
                        output::render_view(&view.snapshot());
                    }
                    Err(UsersError::Invalid(errors)) => output::print_form_errors(&errors),
                    Err(UsersError::Cancelled) => break,
                    Err(_) => output::render_view(&view.snapshot()),
                }
            }
        }
    }

    view.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abort::AbortController;

    fn prompt(controller: &AbortController) -> (mpsc::Sender<io::Result<String>>, Prompt) {
        let (tx, rx) = mpsc::channel(1);
        let prompt = Prompt {
            lines: rx,
            signal: controller.signal(),
        };
        (tx, prompt)
    }

    #[tokio::test]
    async fn test_prompt_reads_lines_until_end_of_input() {
        let controller = AbortController::new();
        let (tx, mut prompt) = prompt(&controller);

        tx.send(Ok("list".to_string())).await.unwrap();
        assert_eq!(prompt.next_line().await.unwrap().as_deref(), Some("list"));

        drop(tx);
        assert_eq!(prompt.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_teardown_interrupts_pending_read() {
        let controller = AbortController::new();
        // sender stays open: the read would otherwise wait forever
        let (_tx, mut prompt) = prompt(&controller);

        let interrupt = async { controller.abort() };
        let (line, ()) = tokio::join!(prompt.next_line(), interrupt);

        assert!(line.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_read_error_is_reported() {
        let controller = AbortController::new();
        let (tx, mut prompt) = prompt(&controller);

        tx.send(Err(io::Error::other("stdin closed badly"))).await.unwrap();
        assert!(matches!(prompt.next_line().await, Err(UsersError::Io(_))));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("list"), Ok(ShellCommand::List));
        assert_eq!(parse_command("  LS "), Ok(ShellCommand::List));
        assert_eq!(parse_command("reload"), Ok(ShellCommand::Reload));
        assert_eq!(parse_command("add"), Ok(ShellCommand::Create));
        assert_eq!(parse_command("exit"), Ok(ShellCommand::Quit));
        assert_eq!(parse_command(""), Ok(ShellCommand::Empty));
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(parse_command("delete 4"), Ok(ShellCommand::Delete(4)));
        assert_eq!(parse_command("rm 10"), Ok(ShellCommand::Delete(10)));
        assert_eq!(parse_command("rm"), Err("usage: rm <id>".to_string()));
        assert_eq!(
            parse_command("delete four"),
            Err("not a user id: four".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_extra_arguments() {
        assert_eq!(
            parse_command("list all"),
            Err("unexpected argument: all".to_string())
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(parse_command("frobnicate").unwrap_err().contains("unknown command"));
    }
}
