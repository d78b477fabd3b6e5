use anyhow::{Result, anyhow};

#[cfg(target_os = "linux")]
use std::process::{Command, Stdio};

#[cfg(not(target_os = "linux"))]
use copypasta::{ClipboardContext, ClipboardProvider};

/// Linux: wl-copy under Wayland, xclip under X11.
#[cfg(target_os = "linux")]
pub fn copy_to_clipboard(value: &str) -> Result<()> {
    let candidates: [(&str, &[&str], &str); 2] = [
        ("wl-copy", &[], "WAYLAND_DISPLAY"),
        ("xclip", &["-selection", "clipboard"], "DISPLAY"),
    ];

    let mut tried = false;
    for (cmd, args, env) in candidates {
        if std::env::var_os(env).is_none() {
            continue;
        }
        tried = true;
        match pipe_to(cmd, args, value) {
            Ok(()) => return Ok(()),
            Err(e) => log::debug!("{cmd} failed: {e}"),
        }
    }

    if !tried {
        return Err(anyhow!(
            "no graphical clipboard (neither DISPLAY nor WAYLAND_DISPLAY is set)"
        ));
    }
    Err(anyhow!(
        "failed to copy to clipboard: install wl-clipboard or xclip"
    ))
}

#[cfg(target_os = "linux")]
fn pipe_to(cmd: &str, args: &[&str], value: &str) -> Result<()> {
    use std::io::Write;

    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| anyhow!("failed to spawn {cmd}: {e}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(value.as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(anyhow!("{cmd} exited with status {status}"));
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn copy_to_clipboard(value: &str) -> Result<()> {
    let mut ctx =
        ClipboardContext::new().map_err(|e| anyhow!("failed to initialize clipboard: {e}"))?;
    ctx.set_contents(value.to_string())
        .map_err(|e| anyhow!("failed to copy to clipboard: {e}"))?;
    Ok(())
}
