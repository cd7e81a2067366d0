use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::client::DEFAULT_BASE_URL;
use crate::config::Config;
use crate::error::{Result, UsersError};

fn read_answer(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn render_config(base_url: &str, timeout_secs: Option<u64>) -> String {
    let mut content = format!("base_url = {}\n", toml_string(base_url));
    if let Some(secs) = timeout_secs {
        content.push_str(&format!("timeout_secs = {secs}\n"));
    }
    content
}

fn toml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn write_config(path: &Path, content: &str) -> Result<()> {
    let io_err = |e| UsersError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, content).map_err(io_err)
}

pub fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = read_answer(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Users CLI Configuration");
    println!("=======================\n");

    let base_url = read_answer(&format!("Users collection URL [{DEFAULT_BASE_URL}]: "))?;
    let base_url = if base_url.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        url::Url::parse(&base_url).map_err(|_| UsersError::InvalidUrl(base_url.clone()))?;
        base_url
    };

    let timeout = read_answer("Request timeout in seconds [30]: ")?;
    let timeout_secs = if timeout.is_empty() {
        None
    } else {
        Some(timeout.parse::<u64>().map_err(|_| UsersError::InvalidValue {
            name: "timeout_secs",
            value: timeout,
        })?)
    };

    write_config(&config_path, &render_config(&base_url, timeout_secs))?;

    println!("\nConfig saved to {}", config_path.display());
    Ok(())
}
