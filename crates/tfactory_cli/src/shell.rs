//! Interactive terminal driver for the app view.
//!
//! Each input line is one user action. After every action pending history
//! and auth changes are applied, then the page is printed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tfactory_core::{App, MemoryHistory, NoteDraft};
use tokio::io::{stdin, AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  go <path>            navigate (/, /about, /notes, /settings)
  back | forward       move through history
  add <title> | <body> add a note
  rm <id>              delete a note
  reload               reload notes
  email <address>      set the sign-in email
  password <secret>    set the sign-in password
  magic                send a magic link
  login                sign in with password
  logout               sign out
  show                 print the page
  help                 print this help
  quit                 exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Go(String),
    Back,
    Forward,
    Add(NoteDraft),
    Remove(String),
    Reload,
    Email(String),
    Password(String),
    Magic,
    Login,
    Logout,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Unknown(String),
    MissingArgument(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(word) => write!(f, "unknown command `{word}`; try `help`"),
            Self::MissingArgument(command) => write!(f, "`{command}` needs an argument"),
        }
    }
}

impl Error for ParseError {}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let required = |command: &'static str| {
        if rest.is_empty() {
            Err(ParseError::MissingArgument(command))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word {
        "go" => ShellCommand::Go(required("go")?),
        "back" => ShellCommand::Back,
        "forward" => ShellCommand::Forward,
        "add" => {
            let (title, body) = rest.split_once('|').unwrap_or((rest, ""));
            ShellCommand::Add(NoteDraft::new(title.trim(), body.trim()))
        }
        "rm" => ShellCommand::Remove(required("rm")?),
        "reload" => ShellCommand::Reload,
        "email" => ShellCommand::Email(required("email")?),
        "password" => ShellCommand::Password(required("password")?),
        "magic" => ShellCommand::Magic,
        "login" => ShellCommand::Login,
        "logout" => ShellCommand::Logout,
        "show" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Runs the read-eval-print loop until `quit` or end of input.
pub async fn run(mut app: App, history: Arc<MemoryHistory>) -> std::io::Result<()> {
    println!("{}\n", app.page());
    println!("type `help` for commands");

    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }
        if command == ShellCommand::Help {
            println!("{HELP}");
            continue;
        }

        apply(&mut app, &history, command).await;
        app.sync_auth().await;
        app.follow_history().await;
        println!("\n{}\n", app.page());
    }
    Ok(())
}

async fn apply(app: &mut App, history: &MemoryHistory, command: ShellCommand) {
    match command {
        ShellCommand::Go(path) => {
            app.go(&path).await;
        }
        ShellCommand::Back => {
            if !history.back() {
                println!("no earlier entry");
            }
        }
        ShellCommand::Forward => {
            if !history.forward() {
                println!("no later entry");
            }
        }
        ShellCommand::Add(draft) => {
            app.set_note_title(draft.title);
            app.set_note_body(draft.body);
            app.submit_note().await;
        }
        ShellCommand::Remove(id) => {
            app.delete_note(&id).await;
        }
        ShellCommand::Reload => {
            app.load_notes().await;
        }
        ShellCommand::Email(email) => app.set_email(email),
        ShellCommand::Password(password) => app.set_password(password),
        ShellCommand::Magic => {
            if !app.send_magic_link().await && app.auth().error.is_none() {
                println!("magic link unavailable (gateway or email missing)");
            }
        }
        ShellCommand::Login => {
            if !app.sign_in_with_password().await && app.auth().error.is_none() {
                println!("password sign-in unavailable (gateway, email or password missing)");
            }
        }
        ShellCommand::Logout => {
            if !app.sign_out().await && app.auth().error.is_none() {
                println!("not signed in");
            }
        }
        ShellCommand::Show | ShellCommand::Help | ShellCommand::Quit => {}
    }
}
