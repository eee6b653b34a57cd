//! Interactive dashboard: one command per line, screen redrawn after each.
#![deny(clippy::all, clippy::pedantic)]

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use postdesk::application::controller::DashboardController;
use postdesk::application::state::Screen;

use crate::args::PostFieldArgs;
use crate::client::{CliError, Credentials, Ctx};
use crate::io::{load_optional_image, merge_fields};
use crate::print::print_screen;

pub const HELP: &str = "\
commands:
  login <email>      sign in; the password is read from the next line and
                     is echoed, so pipe it in or start the shell with
                     --email and --password-file instead
  logout             sign out and clear the cache
  refresh            reload posts
  add                open the editor for a new post
  edit <id>          open the editor for an existing post
  save [--post-id ID] [--platform NAME] [--country CODE]
       [--status available|on-hold|sold] [--image PATH]
                     submit the open editor
  delete <id>        ask to delete a post
  confirm            delete the post awaiting confirmation
  cancel | close     close the open dialog
  help               show this text
  quit | exit        leave the shell";

#[derive(Parser, Debug)]
#[command(multicall = true, disable_help_subcommand = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Login { email: String },
    Logout,
    Refresh,
    Add,
    Edit { id: i64 },
    Save(PostFieldArgs),
    #[command(alias = "close")]
    Cancel,
    Delete { id: i64 },
    Confirm,
    Help,
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let words = split_words(line)?;
    if words.is_empty() {
        return Ok(None);
    }
    ShellLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(|err| err.to_string().trim_end().to_string())
}

/// Split on whitespace, keeping quoted runs (single or double) together.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if let Some(open) = quote {
        return Err(format!("unterminated {open} quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

pub async fn run(ctx: &Ctx, credentials: Option<Credentials>) -> Result<(), CliError> {
    let mut controller = ctx.controller();
    let mut events = ctx.identity.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    controller.start().await;
    if let Some(credentials) = credentials {
        if controller.state().screen != Screen::Dashboard {
            controller
                .login(&credentials.email, &credentials.password)
                .await;
        }
    }
    draw(&mut controller)?;

    let mut events_open = true;
    loop {
        tokio::select! {
            biased;

            event = events.recv(), if events_open => match event {
                Ok(event) => {
                    let before = controller.state().clone();
                    controller.handle_auth_event(event).await;
                    if *controller.state() != before {
                        draw(&mut controller)?;
                    }
                }
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "auth events lagged"),
                Err(RecvError::Closed) => events_open = false,
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if run_line(&mut controller, &line, &mut lines).await? == Flow::Quit {
                    break;
                }
            }
        }
    }
    Ok(())
}

pub async fn run_line<R>(
    controller: &mut DashboardController,
    line: &str,
    lines: &mut Lines<R>,
) -> Result<Flow, CliError>
where
    R: AsyncBufRead + Unpin,
{
    let command = match parse_line(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(Flow::Continue),
        Err(message) => {
            println!("{message}");
            return Ok(Flow::Continue);
        }
    };

    let flow = dispatch(controller, command, lines).await?;
    if flow == Flow::Continue {
        draw(controller)?;
    }
    Ok(flow)
}

async fn dispatch<R>(
    controller: &mut DashboardController,
    command: ShellCommand,
    lines: &mut Lines<R>,
) -> Result<Flow, CliError>
where
    R: AsyncBufRead + Unpin,
{
    debug!(?command, "shell command");
    match command {
        ShellCommand::Login { email } => {
            eprint!("Password: ");
            let Some(password) = lines.next_line().await? else {
                return Ok(Flow::Quit);
            };
            controller.login(&email, password.trim_end()).await;
        }
        ShellCommand::Logout => controller.logout().await,
        ShellCommand::Refresh => controller.refresh().await,
        ShellCommand::Add => controller.open_create(),
        ShellCommand::Edit { id } => controller.open_edit(id),
        ShellCommand::Save(fields) => save(controller, &fields).await,
        ShellCommand::Cancel => controller.dismiss(),
        ShellCommand::Delete { id } => controller.open_delete(id),
        ShellCommand::Confirm => controller.confirm_delete().await,
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

async fn save(controller: &mut DashboardController, fields: &PostFieldArgs) {
    let Some(editor) = controller.state().editor() else {
        println!("no editor is open; use `add` or `edit <id>` first");
        return;
    };
    let form = merge_fields(editor.form.clone(), fields);

    let image = match load_optional_image(fields.image.as_deref()).await {
        Ok(image) => image,
        Err(CliError::Domain(err)) => {
            controller.reject_submission(&err);
            return;
        }
        Err(err) => {
            warn!(error = %err, "failed to read image");
            println!("{err}");
            return;
        }
    };
    controller.submit_post(form, image).await;
}

/// Print the current screen, then clear the one-shot alert it showed.
fn draw(controller: &mut DashboardController) -> Result<(), CliError> {
    print_screen(controller.state())?;
    controller.take_alert();
    Ok(())
}
