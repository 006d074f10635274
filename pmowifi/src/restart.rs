//! Device restart after provisioning.

use std::{process::Command, time::Duration};
use tracing::{error, info};

/// Restarts the device. Never expected to return on real hardware.
pub trait Restarter: Send + Sync {
    fn restart(&self);
}

/// Restarts the host process: re-executes the current binary with the same
/// arguments.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRestarter;

impl Restarter for ProcessRestarter {
    fn restart(&self) {
        info!("Restarting");
        let exe = match std::env::current_exe() {
            Ok(exe) => exe,
            Err(e) => {
                error!(error=%e, "Cannot locate current executable");
                std::process::exit(1);
            }
        };
        let mut command = Command::new(&exe);
        command.args(std::env::args().skip(1));

        // exec remplace le processus : les sockets (CLOEXEC) sont libérées
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            let e = command.exec();
            error!(exe=%exe.display(), error=%e, "Failed to re-execute");
            std::process::exit(1);
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = command.spawn() {
                error!(exe=%exe.display(), error=%e, "Failed to spawn new process");
            }
            std::process::exit(0);
        }
    }
}

/// Calls `restarter.restart()` after `delay`, on a background task.
pub fn schedule_restart<R>(restarter: std::sync::Arc<R>, delay: Duration)
where
    R: Restarter + ?Sized + 'static,
{
    info!(?delay, "Restart scheduled");
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        restarter.restart();
    });
}
