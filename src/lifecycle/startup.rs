//! Startup helpers.
//!
//! # Responsibilities
//! - Compute the URL the browser should open
//! - Launch the platform's default browser

use std::io;
use std::net::SocketAddr;
use std::process::{Command, Stdio};

/// URL of `page` on the bound listener.
///
/// Unspecified bind addresses (`0.0.0.0`, `::`) are replaced by `localhost`.
pub fn browser_url(addr: SocketAddr, page: &str) -> String {
    let host = if addr.ip().is_unspecified() {
        "localhost".to_string()
    } else if addr.is_ipv6() {
        format!("[{}]", addr.ip())
    } else {
        addr.ip().to_string()
    };
    let page = if page.starts_with('/') {
        page.to_string()
    } else {
        format!("/{page}")
    };
    format!("http://{host}:{}{page}", addr.port())
}

fn browser_command(url: &str) -> Command {
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Launch the default browser at `url` without waiting for it.
pub fn open_browser(url: &str) -> io::Result<()> {
    browser_command(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    tracing::info!(url = %url, "Opened browser");
    Ok(())
}
