#![deny(clippy::all, clippy::pedantic)]

use postdesk::application::controller::DashboardController;
use postdesk::application::state::Screen;
use postdesk::domain::forms::PostForm;

use crate::args::{PostFieldArgs, PostsCmd};
use crate::client::{CliError, Credentials, Ctx};
use crate::handlers::{ensure_loaded, signed_in};
use crate::io::{load_optional_image, merge_fields};
use crate::print::{print_json, print_screen};

/// Checks that need no network, run before signing in.
pub fn preflight(cmd: &PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::Delete { id, yes: false } => Err(CliError::InvalidInput(format!(
            "refusing to delete post {id} without --yes"
        ))),
        _ => Ok(()),
    }
}

pub async fn handle(
    ctx: &Ctx,
    credentials: &Credentials,
    cmd: &PostsCmd,
) -> Result<(), CliError> {
    preflight(cmd)?;
    let mut controller = signed_in(ctx, credentials).await?;

    match cmd {
        PostsCmd::List { json } => list(&controller, *json),
        PostsCmd::Stats => {
            stats(&controller);
            Ok(())
        }
        PostsCmd::Create { fields } => create(&mut controller, fields).await,
        PostsCmd::Update { id, fields } => update(&mut controller, *id, fields).await,
        PostsCmd::Delete { id, .. } => delete(&mut controller, *id).await,
    }
}

fn list(controller: &DashboardController, json: bool) -> Result<(), CliError> {
    if json {
        print_json(&controller.state().posts)
    } else {
        print_screen(controller.state())
    }
}

fn stats(controller: &DashboardController) {
    let stats = &controller.state().stats;
    println!("Total posts: {}", stats.total);
    println!("Available: {}", stats.available);
    println!("On Hold: {}", stats.on_hold);
    println!("Sold: {}", stats.sold);
    if stats.other > 0 {
        println!("Other: {}", stats.other);
    }
}

async fn create(
    controller: &mut DashboardController,
    fields: &PostFieldArgs,
) -> Result<(), CliError> {
    let image = load_optional_image(fields.image.as_deref()).await?;
    controller.open_create();
    let form = merge_fields(PostForm::default(), fields);
    controller.submit_post(form, image).await;
    finish(controller, "saved")
}

async fn update(
    controller: &mut DashboardController,
    id: i64,
    fields: &PostFieldArgs,
) -> Result<(), CliError> {
    let image = load_optional_image(fields.image.as_deref()).await?;
    controller.open_edit(id);
    fail_on_alert(controller)?;
    let current = controller
        .state()
        .editor()
        .map(|editor| editor.form.clone())
        .unwrap_or_default();
    controller.submit_post(merge_fields(current, fields), image).await;
    finish(controller, "saved")
}

async fn delete(controller: &mut DashboardController, id: i64) -> Result<(), CliError> {
    controller.open_delete(id);
    fail_on_alert(controller)?;
    controller.confirm_delete().await;
    finish(controller, "deleted")
}

fn fail_on_alert(controller: &mut DashboardController) -> Result<(), CliError> {
    match controller.take_alert() {
        Some(alert) => Err(CliError::Request(alert)),
        None => Ok(()),
    }
}

/// A mutation succeeded only when no alert was raised, the session held and
/// the follow-up refresh loaded.
fn finish(controller: &mut DashboardController, verb: &str) -> Result<(), CliError> {
    fail_on_alert(controller)?;
    if controller.state().screen != Screen::Dashboard {
        return Err(CliError::SignIn("session ended during the request".to_string()));
    }
    ensure_loaded(controller)?;
    println!("{verb}; {} posts now listed", controller.state().stats.total);
    Ok(())
}
