#![deny(clippy::all, clippy::pedantic)]

use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx) -> Result<(), CliError> {
    let health = ctx.api.health().await?;
    print_json(&health)
}
