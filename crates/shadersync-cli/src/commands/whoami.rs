use super::Context;
use anyhow::Result;
use colored::Colorize;
use shadersync_core::store::DocumentStore;

pub async fn run(context: &Context) -> Result<()> {
    match context.store.authenticated_user().await? {
        Some(login) => println!("Logged in as {}", login.cyan()),
        None => println!("{}", "Not logged in".yellow()),
    }
    Ok(())
}
