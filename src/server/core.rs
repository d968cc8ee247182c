use log::{error, info, warn};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::client::handle_client;
use crate::config::StartupConfig;
use crate::fs::FileSystem;
use crate::protocol::responses::{READY, TOO_MANY_SESSIONS, format_response};

/// TCP front of a single file system instance.
///
/// The file system sits behind one exclusive lock; every command takes it
/// for its full duration, so at most one operation is in flight.
pub struct Server {
    sessions: Arc<Mutex<HashSet<SocketAddr>>>,
    fs: Arc<Mutex<FileSystem>>,
    listener: TcpListener,
    config: Arc<StartupConfig>,
}

impl Server {
    pub async fn bind(config: StartupConfig, fs: FileSystem) -> std::io::Result<Self> {
        let socket = config.control_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e);
            }
        };
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            sessions: Arc::new(Mutex::new(HashSet::new())),
            fs: Arc::new(Mutex::new(fs)),
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle on the shared file system, e.g. for inspection in tests.
    pub fn file_system(&self) -> Arc<Mutex<FileSystem>> {
        Arc::clone(&self.fs)
    }

    pub async fn run(self) {
        info!(
            "Starting journal-fs on {} (max {} sessions)",
            self.config.control_socket(),
            self.config.max_sessions
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let sessions = Arc::clone(&self.sessions);
                    let fs = Arc::clone(&self.fs);
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) = handle_new_client(stream, addr, sessions, fs, config).await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Admits a client if a session slot is free, greets it and serves it.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    sessions: Arc<Mutex<HashSet<SocketAddr>>>,
    fs: Arc<Mutex<FileSystem>>,
    config: Arc<StartupConfig>,
) -> std::io::Result<()> {
    {
        let mut active = sessions.lock().await;
        if active.len() >= config.max_sessions {
            warn!("Rejecting {}: {} sessions active", client_addr, active.len());
            stream
                .write_all(format_response(TOO_MANY_SESSIONS, "Too many sessions").as_bytes())
                .await?;
            return Ok(());
        }
        active.insert(client_addr);
        info!(
            "Session opened for {} ({}/{} sessions)",
            client_addr,
            active.len(),
            config.max_sessions
        );
    }

    let greeting = format_response(READY, "journal-fs ready");
    let result = match stream.write_all(greeting.as_bytes()).await {
        Ok(()) => handle_client(stream, client_addr, fs, config).await,
        Err(e) => Err(e),
    };

    sessions.lock().await.remove(&client_addr);
    info!("Client {} disconnected", client_addr);
    result
}
