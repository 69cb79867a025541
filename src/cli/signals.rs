//! Shutdown signals for the interactive session

use colored::Colorize;
use tokio::sync::mpsc;
use tracing::info;

/// Delivers one message per SIGINT/SIGTERM (Ctrl+C elsewhere)
pub struct ShutdownSignal {
    receiver: mpsc::Receiver<&'static str>,
}

impl ShutdownSignal {
    /// Start listening for shutdown signals
    #[cfg(unix)]
    pub fn new() -> Result<Self, std::io::Error> {
        use tokio::signal::unix::{signal, SignalKind};

        let (tx, rx) = mpsc::channel(4);

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            while sigint.recv().await.is_some() {
                if tx_int.send("SIGINT").await.is_err() {
                    break;
                }
            }
        });

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            while sigterm.recv().await.is_some() {
                if tx.send("SIGTERM").await.is_err() {
                    break;
                }
            }
        });

        Ok(Self { receiver: rx })
    }

    #[cfg(not(unix))]
    pub fn new() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send("Ctrl+C").await.is_err() {
                    break;
                }
            }
        });
        Ok(Self { receiver: rx })
    }

    /// Wait for the next signal; `None` once listening has stopped
    pub async fn recv(&mut self) -> Option<&'static str> {
        let name = self.receiver.recv().await?;
        info!(signal = name, "Shutdown requested");
        eprintln!("{} Received {} (shutdown)", "↓".cyan(), name);
        Some(name)
    }
}
