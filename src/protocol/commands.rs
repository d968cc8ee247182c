//! Module `commands`
//!
//! Parses raw client lines into the `Command` enum. Verbs are
//! case-insensitive; arguments are separated by whitespace and the trailing
//! content argument of CREATE/WRITE/APPEND keeps its inner spaces.

/// A command parsed from one client line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Pwd,
    Whoami,
    Journal,
    Save,
    Load,
    Crash,
    User(String),
    Cd(String),
    Ls(Option<String>),
    Mkdir(String),
    Exists(String),
    Stat(String),
    Read(String),
    Delete(String),
    Create { path: String, content: String },
    Write { path: String, content: String },
    Append { path: String, content: String },
    Chmod {
        path: String,
        user: String,
        permission: String,
    },
    Unknown(String),
}

/// Outcome status of executing a command.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Status plus the reply to send back, if any.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

/// Splits off the first whitespace-delimited word.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(index) => (&input[..index], input[index..].trim_start()),
        None => (input, ""),
    }
}

/// Parses a raw line into a `Command`. A known verb with missing arguments
/// parses as `Unknown`.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim_end_matches(['\r', '\n']).trim();
    let (verb, rest) = split_word(trimmed);
    let verb = verb.to_ascii_uppercase();
    let arg = rest.trim();

    match verb.as_str() {
        "QUIT" | "EXIT" => Command::Quit,
        "HELP" => Command::Help,
        "PWD" => Command::Pwd,
        "WHOAMI" => Command::Whoami,
        "JOURNAL" => Command::Journal,
        "SAVE" => Command::Save,
        "LOAD" => Command::Load,
        "CRASH" => Command::Crash,
        "LS" | "LIST" => Command::Ls((!arg.is_empty()).then(|| arg.to_string())),
        "USER" if !arg.is_empty() => Command::User(arg.to_string()),
        "CD" if !arg.is_empty() => Command::Cd(arg.to_string()),
        "MKDIR" if !arg.is_empty() => Command::Mkdir(arg.to_string()),
        "EXISTS" if !arg.is_empty() => Command::Exists(arg.to_string()),
        "STAT" if !arg.is_empty() => Command::Stat(arg.to_string()),
        "READ" if !arg.is_empty() => Command::Read(arg.to_string()),
        "DELETE" | "DEL" if !arg.is_empty() => Command::Delete(arg.to_string()),
        "CREATE" | "WRITE" | "APPEND" if !arg.is_empty() => {
            let (path, content) = split_word(rest);
            let path = path.to_string();
            let content = content.to_string();
            match verb.as_str() {
                "CREATE" => Command::Create { path, content },
                "WRITE" => Command::Write { path, content },
                _ => Command::Append { path, content },
            }
        }
        "CHMOD" => {
            let parts: Vec<&str> = arg.split_whitespace().collect();
            match parts.as_slice() {
                [path, user, permission] => Command::Chmod {
                    path: path.to_string(),
                    user: user.to_string(),
                    permission: permission.to_string(),
                },
                _ => Command::Unknown(trimmed.to_string()),
            }
        }
        _ => Command::Unknown(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_command("QUIT"), Command::Quit);
        assert_eq!(parse_command("exit"), Command::Quit);
        assert_eq!(parse_command("pwd\r\n"), Command::Pwd);
        assert_eq!(parse_command("LS"), Command::Ls(None));
        assert_eq!(parse_command("crash"), Command::Crash);
    }

    #[test]
    fn test_parse_commands_with_args() {
        assert_eq!(parse_command("cd /a/b"), Command::Cd("/a/b".to_string()));
        assert_eq!(
            parse_command("ls docs"),
            Command::Ls(Some("docs".to_string()))
        );
        assert_eq!(
            parse_command("USER  bob  "),
            Command::User("bob".to_string())
        );
        assert_eq!(
            parse_command("chmod /a bob rw"),
            Command::Chmod {
                path: "/a".to_string(),
                user: "bob".to_string(),
                permission: "rw".to_string(),
            }
        );
    }

    #[test]
    fn test_content_keeps_inner_spaces() {
        assert_eq!(
            parse_command("WRITE /a.txt hello   big world"),
            Command::Write {
                path: "/a.txt".to_string(),
                content: "hello   big world".to_string(),
            }
        );
        assert_eq!(
            parse_command("create notes"),
            Command::Create {
                path: "notes".to_string(),
                content: String::new(),
            }
        );
    }

    #[test]
    fn test_missing_arguments_are_unknown() {
        assert_eq!(parse_command("CD"), Command::Unknown("CD".to_string()));
        assert_eq!(
            parse_command("chmod /a bob"),
            Command::Unknown("chmod /a bob".to_string())
        );
        assert_eq!(parse_command(""), Command::Unknown(String::new()));
        assert_eq!(
            parse_command("FOO bar"),
            Command::Unknown("FOO bar".to_string())
        );
    }
}
