// Operator commands read from stdin
use crate::domain::activity::LogLevel;
use crate::presentation::app_state::AppState;
use std::io::BufRead;
use tokio::sync::mpsc;

const HELP: &str = "Commands: logs | latest | get <file> | restart | stop | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListLogs,
    DownloadLatest,
    Download(String),
    Restart,
    Stop,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "logs" => Command::ListLogs,
        "latest" => Command::DownloadLatest,
        "get" => Command::Download(rest.to_string()),
        "restart" => Command::Restart,
        "stop" => Command::Stop,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Forward stdin lines from a detached thread. A pending read must not
/// block runtime shutdown.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run commands until `quit` or end of input. Returns true when the
/// operator asked to quit.
pub async fn run_commands(state: &AppState, mut lines: mpsc::Receiver<String>) -> bool {
    while let Some(line) = lines.recv().await {
        match parse_command(&line) {
            Command::ListLogs => {
                state.log_archive.show_log_files().await;
            }
            Command::DownloadLatest => state.log_archive.download_latest_csv(),
            Command::Download(filename) => state.log_archive.download_log(&filename),
            Command::Restart => {
                state.poller.start_polling();
                state.presenter.log("Polling restarted", LogLevel::Info);
            }
            Command::Stop => {
                state.poller.stop_polling();
                state.presenter.log("Polling stopped", LogLevel::Info);
            }
            Command::Help => state.presenter.log(HELP, LogLevel::Info),
            Command::Quit => return true,
            Command::Empty => {}
            Command::Unknown(input) => state
                .presenter
                .log(&format!("Unknown command: {}", input), LogLevel::Err),
        }
    }

    false
}
