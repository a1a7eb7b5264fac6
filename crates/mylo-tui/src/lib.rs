//! Full-screen login/register/home front-end for mylo.

pub mod common;
pub mod effects;
pub mod events;
pub mod navigation;
pub mod render;
pub mod runtime;
pub mod screens;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
use mylo_core::clients::Clients;
pub use runtime::TuiRuntime;

/// Runs the interactive app until the user quits.
///
/// # Errors
/// Returns an error if stdout is not a terminal or terminal I/O fails.
pub async fn run(clients: Clients) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!("mylo needs an interactive terminal.");
    }

    let mut runtime = TuiRuntime::new(clients)?;
    runtime.run()
}
