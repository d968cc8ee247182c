//! Command handlers
//!
//! One handler per command. Each runs against the session's state and the
//! shared file system and turns the outcome into a `CommandResult`; errors
//! become failure replies, never panics.

use log::{info, warn};

use crate::client::Session;
use crate::error::FsError;
use crate::error::handlers::error_to_status_code;
use crate::fs::FileSystem;
use crate::protocol::responses::{
    FILE_ACTION_OK, GOODBYE, HELP, LISTING, OK, PATH_CREATED, STATUS, SYNTAX_ERROR,
    format_multiline, format_response,
};
use crate::protocol::{Command, CommandResult, CommandStatus};

const HELP_LINES: &[&str] = &[
    "USER <name>                 switch the active user",
    "WHOAMI                      show the active user",
    "PWD                         show the current directory",
    "CD <path>                   change directory (.. for parent)",
    "LS [path]                   list a directory",
    "MKDIR <path>                create a directory and its parents",
    "CREATE <path> [content]     create a file",
    "READ <path>                 show file content",
    "WRITE <path> <content>      replace file content",
    "APPEND <path> <content>     append a line to a file",
    "DELETE <path>               delete a file",
    "CHMOD <path> <user> <perm>  set permission (none, r, w, rw); admin only",
    "STAT <path>                 show a file's permissions",
    "EXISTS <path>               check whether a directory exists",
    "JOURNAL                     show the journal",
    "SAVE                        rewrite the durable journal",
    "LOAD                        reload the journal from its store",
    "CRASH                       simulate a crash and recover from the journal",
    "QUIT                        close the session",
];

/// Dispatches a parsed command to its handler.
pub fn handle_command(
    session: &mut Session,
    fs: &mut FileSystem,
    command: &Command,
) -> CommandResult {
    match command {
        Command::Quit => handle_cmd_quit(session),
        Command::Help => success(format_multiline(HELP, HELP_LINES, "End of help")),
        Command::Pwd => success(format_response(PATH_CREATED, session.current_path())),
        Command::Whoami => success(format_response(OK, session.user())),
        Command::User(name) => handle_cmd_user(session, name),
        Command::Cd(path) => handle_cmd_cd(session, fs, path),
        Command::Ls(path) => handle_cmd_ls(session, fs, path.as_deref()),
        Command::Mkdir(path) => {
            let target = session.resolve(path);
            reply(
                fs.create_directory(&target, session.user()),
                PATH_CREATED,
                format!("Directory {} created", target),
            )
        }
        Command::Exists(path) => {
            let target = session.resolve(path);
            let answer = if fs.directory_exists(&target) { "yes" } else { "no" };
            success(format_response(STATUS, &format!("{} {}", target, answer)))
        }
        Command::Stat(path) => handle_cmd_stat(session, fs, path),
        Command::Create { path, content } => {
            let target = session.resolve(path);
            reply(
                fs.create_file(&target, content, session.user()),
                FILE_ACTION_OK,
                format!("File {} created", target),
            )
        }
        Command::Read(path) => handle_cmd_read(session, fs, path),
        Command::Write { path, content } => {
            let target = session.resolve(path);
            reply(
                fs.write_file(&target, content, session.user()),
                FILE_ACTION_OK,
                format!("File {} updated", target),
            )
        }
        Command::Append { path, content } => {
            let target = session.resolve(path);
            reply(
                fs.append_to_file(&target, content, session.user()),
                FILE_ACTION_OK,
                format!("Content appended to {}", target),
            )
        }
        Command::Delete(path) => {
            let target = session.resolve(path);
            reply(
                fs.delete_file(&target, session.user()),
                FILE_ACTION_OK,
                format!("File {} deleted", target),
            )
        }
        Command::Chmod {
            path,
            user,
            permission,
        } => {
            let target = session.resolve(path);
            match fs.set_file_permission(&target, user, permission, session.user()) {
                Ok(level) => success(format_response(
                    OK,
                    &format!("Permission '{}' granted to '{}' on {}", level, user, target),
                )),
                Err(e) => failure(&e),
            }
        }
        Command::Journal => handle_cmd_journal(fs),
        Command::Save => match fs.save_journal() {
            Ok(count) => success(format_response(
                OK,
                &format!("Journal saved ({} entries)", count),
            )),
            Err(e) => failure(&e),
        },
        Command::Load => match fs.load_journal() {
            Ok(count) => success(format_response(
                OK,
                &format!("Journal loaded ({} entries)", count),
            )),
            Err(e) => failure(&e),
        },
        Command::Crash => {
            let report = fs.simulate_crash_and_recovery();
            // The current directory may not have survived recovery
            if !fs.directory_exists(session.current_path()) {
                session.set_current_path("/".to_string());
            }
            success(format_response(OK, &format!("Recovered from crash: {}", report)))
        }
        Command::Unknown(raw) => {
            warn!("Unknown command: {:?}", raw);
            CommandResult {
                status: CommandStatus::Failure("Unknown command".into()),
                message: Some(format_response(
                    SYNTAX_ERROR,
                    "Unknown command or missing arguments. Type HELP",
                )),
            }
        }
    }
}

fn success(message: String) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(message),
    }
}

fn failure(err: &FsError) -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure(err.to_string()),
        message: Some(format_response(error_to_status_code(err), &err.to_string())),
    }
}

fn reply(result: Result<(), FsError>, code: u16, text: String) -> CommandResult {
    match result {
        Ok(()) => success(format_response(code, &text)),
        Err(e) => failure(&e),
    }
}

/// Handles QUIT: signals the connection to close.
fn handle_cmd_quit(session: &Session) -> CommandResult {
    info!("User '{}' ended the session", session.user());
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(GOODBYE, "Goodbye")),
    }
}

/// Handles USER: any non-empty name is accepted, there is no password.
fn handle_cmd_user(session: &mut Session, name: &str) -> CommandResult {
    session.set_user(name.to_string());
    success(format_response(OK, &format!("User changed to '{}'", name)))
}

fn handle_cmd_cd(session: &mut Session, fs: &FileSystem, path: &str) -> CommandResult {
    let target = session.resolve(path);
    if fs.directory_exists(&target) {
        session.set_current_path(target.clone());
        success(format_response(FILE_ACTION_OK, &format!("Directory changed to {}", target)))
    } else {
        failure(&FsError::NotFound(target))
    }
}

fn handle_cmd_ls(session: &Session, fs: &FileSystem, path: Option<&str>) -> CommandResult {
    let target = match path {
        Some(p) => session.resolve(p),
        None => session.current_path().to_string(),
    };
    match fs.list_directory(&target) {
        Ok(entries) => {
            let lines: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
            success(format_multiline(
                LISTING,
                &lines,
                &format!("{} entries in {}", lines.len(), target),
            ))
        }
        Err(e) => failure(&e),
    }
}

fn handle_cmd_read(session: &Session, fs: &mut FileSystem, path: &str) -> CommandResult {
    let target = session.resolve(path);
    match fs.read_file(&target, session.user()) {
        Ok(content) => {
            let lines: Vec<&str> = content.lines().collect();
            success(format_multiline(
                FILE_ACTION_OK,
                &lines,
                &format!("End of {}", target),
            ))
        }
        Err(e) => failure(&e),
    }
}

fn handle_cmd_stat(session: &Session, fs: &FileSystem, path: &str) -> CommandResult {
    let target = session.resolve(path);
    match fs.file_acl(&target, session.user()) {
        Ok(acl) => success(format_response(STATUS, &format!("{} [{}]", target, acl))),
        Err(e) => failure(&e),
    }
}

fn handle_cmd_journal(fs: &FileSystem) -> CommandResult {
    let lines: Vec<String> = fs
        .journal_entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| format!("{}. {}", index + 1, entry))
        .collect();
    let footer = if lines.is_empty() {
        "The journal is empty".to_string()
    } else {
        format!("{} journal entries", lines.len())
    };
    success(format_multiline(STATUS, &lines, &footer))
}
