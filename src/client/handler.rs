use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::client::Session;
use crate::config::StartupConfig;
use crate::fs::FileSystem;
use crate::protocol::responses::{SYNTAX_ERROR, format_response};
use crate::protocol::{CommandStatus, handle_command, parse_command};

/// Serves one client connection until it quits or disconnects.
///
/// - Reads one command per line.
/// - Holds the file system lock for the whole of each command, so commands
///   from different sessions never interleave.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    fs: Arc<Mutex<FileSystem>>,
    config: Arc<StartupConfig>,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();
    let mut session = Session::new(&config.default_user);

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(_) => {
                // Enforce command length limit
                if line.len() > config.max_command_length {
                    write_half
                        .write_all(format_response(SYNTAX_ERROR, "Command too long").as_bytes())
                        .await?;
                    continue;
                }

                let command = parse_command(&line);
                info!(
                    "Received from {} as '{}': {:?}",
                    client_addr,
                    session.user(),
                    command
                );

                let result = {
                    let mut fs = fs.lock().await;
                    handle_command(&mut session, &mut fs, &command)
                };

                if let Some(msg) = result.message {
                    write_half.write_all(msg.as_bytes()).await?;
                    write_half.flush().await?;
                }
                if result.status == CommandStatus::CloseConnection {
                    info!("Client {} requested to quit", client_addr);
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                return Err(e);
            }
        }
    }

    Ok(())
}
