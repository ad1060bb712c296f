//! Special commands parser for interactive chat mode
//!
//! Special commands control the planning session instead of being sent to the
//! model as a refinement request. Commands are prefixed with `/` and are
//! case-insensitive; `exit` and `quit` also work without the slash.

use thiserror::Error;

/// Highest numbered suggestion a user can pick
pub const MAX_SUGGESTION_SHORTCUT: usize = 4;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// A numbered suggestion outside the range that can be offered
    #[error("There is no suggestion {0}; pick 1 to {max}", max = MAX_SUGGESTION_SHORTCUT)]
    SuggestionOutOfRange(usize),
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Display help information
    Help,

    /// Print the active flow as a timeline
    ShowFlow,

    /// Print the active flow as JSON
    ShowFlowJson,

    /// Show session id, provider, model and conversation size
    ShowStatus,

    /// Reset the conversation, keeping the flow
    ClearChat,

    /// Drop the flow and ask for a new vibe
    StartOver,

    /// Send the Nth suggested action (1-based)
    Suggestion(usize),

    /// Exit the interactive session
    Exit,

    /// Not a special command; send the input as a chat message
    None,
}

/// Parse user input into a special command
///
/// # Arguments
///
/// * `input` - Raw line entered by the user
///
/// # Returns
///
/// `SpecialCommand::None` when the input is a regular chat message
///
/// # Errors
///
/// Returns `CommandError` for unknown commands or bad arguments
///
/// # Examples
///
/// ```
/// use kelp::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/2").unwrap(), SpecialCommand::Suggestion(2));
/// assert_eq!(parse_special_command("make it cheaper").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/teleport").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/flow" => Ok(SpecialCommand::ShowFlow),
        "/flow json" | "/json" => Ok(SpecialCommand::ShowFlowJson),
        input if input.starts_with("/flow ") => Err(CommandError::UnsupportedArgument {
            command: "/flow".to_string(),
            arg: input[6..].trim().to_string(),
        }),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/clear" => Ok(SpecialCommand::ClearChat),
        "/restart" | "/start-over" => Ok(SpecialCommand::StartOver),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),
        input => {
            let number = &input[1..];
            match number.parse::<usize>() {
                Ok(n) if (1..=MAX_SUGGESTION_SHORTCUT).contains(&n) => {
                    Ok(SpecialCommand::Suggestion(n))
                }
                Ok(n) => Err(CommandError::SuggestionOutOfRange(n)),
                Err(_) => Err(CommandError::UnknownCommand(trimmed.to_string())),
            }
        }
    }
}

/// Print the list of special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Kelp Chat
==============================

YOUR FLOW:
  /flow           - Show the current plan as a timeline
  /flow json      - Show the current plan as JSON (also /json)
  /1 .. /4        - Send one of the suggested follow-ups

SESSION:
  /status         - Show session, provider and conversation details
  /clear          - Clear the chat but keep the plan
  /restart        - Drop the plan and describe a new vibe
  /help           - Show this help message
  /exit           - Leave Kelp (also: exit, quit)

Anything else you type is sent to Kelp as a request about your plan,
for example "make it cheaper" or "is the second place romantic?".
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regular_message() {
        assert_eq!(
            parse_special_command("swap the first stop").unwrap(),
            SpecialCommand::None
        );
    }

    #[test]
    fn test_parse_help_variants() {
        assert_eq!(parse_special_command("/help").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("/?").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("  /HELP ").unwrap(), SpecialCommand::Help);
    }

    #[test]
    fn test_parse_flow_commands() {
        assert_eq!(parse_special_command("/flow").unwrap(), SpecialCommand::ShowFlow);
        assert_eq!(
            parse_special_command("/flow json").unwrap(),
            SpecialCommand::ShowFlowJson
        );
        assert_eq!(parse_special_command("/json").unwrap(), SpecialCommand::ShowFlowJson);
        assert_eq!(
            parse_special_command("/flow yaml").unwrap_err(),
            CommandError::UnsupportedArgument {
                command: "/flow".to_string(),
                arg: "yaml".to_string()
            }
        );
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse_special_command("/clear").unwrap(), SpecialCommand::ClearChat);
        assert_eq!(parse_special_command("/restart").unwrap(), SpecialCommand::StartOver);
        assert_eq!(parse_special_command("/status").unwrap(), SpecialCommand::ShowStatus);
    }

    #[test]
    fn test_parse_exit_variants() {
        for input in ["/exit", "/quit", "exit", "QUIT"] {
            assert_eq!(parse_special_command(input).unwrap(), SpecialCommand::Exit);
        }
    }

    #[test]
    fn test_parse_suggestion_shortcuts() {
        assert_eq!(parse_special_command("/1").unwrap(), SpecialCommand::Suggestion(1));
        assert_eq!(parse_special_command("/4").unwrap(), SpecialCommand::Suggestion(4));
        assert_eq!(
            parse_special_command("/5").unwrap_err(),
            CommandError::SuggestionOutOfRange(5)
        );
        assert_eq!(
            parse_special_command("/0").unwrap_err(),
            CommandError::SuggestionOutOfRange(0)
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = parse_special_command("/teleport").unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("/teleport".to_string()));
        assert!(err.to_string().contains("/help"));
    }
}
