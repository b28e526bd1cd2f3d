/// Interactive menu loop
use anyhow::{Context, Result};
use inquire::{InquireError, Select};
use std::fmt;
use tracing::{error, info};

use crate::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Start,
    Stop,
    Status,
    DryRunStart,
    DryRunStop,
    Exit,
}

const ACTIONS: [MenuAction; 6] = [
    MenuAction::Start,
    MenuAction::Stop,
    MenuAction::Status,
    MenuAction::DryRunStart,
    MenuAction::DryRunStop,
    MenuAction::Exit,
];

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::Start => "Start all resources",
            MenuAction::Stop => "Stop all resources",
            MenuAction::Status => "Show pod status",
            MenuAction::DryRunStart => "Start all resources (dry-run)",
            MenuAction::DryRunStop => "Stop all resources (dry-run)",
            MenuAction::Exit => "Exit",
        };
        f.write_str(label)
    }
}

/// ESC and Ctrl-C both leave the menu; other prompt errors are fatal
fn selection(answer: Result<Option<MenuAction>, InquireError>) -> Result<Option<MenuAction>> {
    match answer {
        Ok(action) => Ok(action),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Failed to read menu selection"),
    }
}

/// Prompt until the user picks Exit or cancels. Failed actions are logged and
/// the menu is shown again.
pub async fn run(app: &App) -> Result<()> {
    loop {
        let answer = Select::new("Choose an option:", ACTIONS.to_vec())
            .with_page_size(ACTIONS.len())
            .without_filtering()
            .with_help_message("↑↓ to move, ENTER to select, ESC to quit")
            .prompt_skippable();
        let Some(action) = selection(answer)? else {
            break;
        };

        let result = match action {
            MenuAction::Start => app.start(false).await,
            MenuAction::Stop => app.stop(false).await,
            MenuAction::Status => app.show_status().await,
            MenuAction::DryRunStart => app.start(true).await,
            MenuAction::DryRunStop => app.stop(true).await,
            MenuAction::Exit => break,
        };

        if let Err(e) = result {
            error!("{:#}", e);
        }
    }

    info!("Bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_offers_every_action_once_with_exit_last() {
        assert_eq!(ACTIONS.last(), Some(&MenuAction::Exit));
        let labels: Vec<String> = ACTIONS.iter().map(|a| a.to_string()).collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(labels.len(), unique.len());
        assert!(labels[3].contains("dry-run"));
        assert!(labels[4].contains("dry-run"));
    }

    #[test]
    fn test_cancel_and_interrupt_leave_the_menu() {
        assert_eq!(
            selection(Ok(Some(MenuAction::Status))).unwrap(),
            Some(MenuAction::Status)
        );
        assert_eq!(selection(Ok(None)).unwrap(), None);
        assert_eq!(
            selection(Err(InquireError::OperationCanceled)).unwrap(),
            None
        );
        assert_eq!(
            selection(Err(InquireError::OperationInterrupted)).unwrap(),
            None
        );
        assert!(selection(Err(InquireError::NotTTY)).is_err());
    }
}
