//! Line-oriented command console over any async reader/writer pair.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use super::{Command, PlantController, Snapshot};

/// Read commands until EOF, applying each and writing a one-line reply.
pub async fn run_console<R, W>(
    controller: Arc<PlantController>,
    reader: R,
    mut writer: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match line.parse::<Command>() {
            Ok(command) => {
                debug!(?command, "console command");
                render(&controller.apply(command))
            }
            Err(e) => {
                warn!(error = %e, "console command rejected");
                format!("error: {e}")
            }
        };
        writer.write_all(reply.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Human-readable one-liner for a snapshot.
pub fn render(snapshot: &Snapshot) -> String {
    let s = &snapshot.state;
    format!(
        "{} {} | moisture {}% humidity {}% temp {}°C light {} lux | t={}s{}",
        snapshot.mood.emoji(),
        snapshot.mood.label(),
        s.moisture,
        s.humidity,
        s.temperature,
        s.light_exposure,
        s.sim_time_seconds,
        if s.is_sleeping { " (sleeping)" } else { "" },
    )
}
