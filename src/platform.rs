use std::path::PathBuf;

use crate::error::Result;

const LIBRARY_FILE: &str = "iTunes Music Library.xml";

/// Where the library export usually lives when no `--library` flag is
/// given. Linux has no native iTunes; outside WSL we assume the library
/// drive is mounted at a fixed path.
#[cfg(target_os = "linux")]
const DEFAULT_LINUX_DRIVE: &str = "/mnt/itunes";

#[cfg(target_os = "macos")]
pub fn default_library_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| std::io::Error::other("cannot determine home directory"))?;
    Ok(home.join("Music").join("iTunes").join(LIBRARY_FILE))
}

#[cfg(target_os = "windows")]
pub fn default_library_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| std::io::Error::other("cannot determine home directory"))?;
    Ok(home.join("Music").join("iTunes").join(LIBRARY_FILE))
}

#[cfg(target_os = "linux")]
pub fn default_library_path() -> Result<PathBuf> {
    let in_wsl = std::env::var_os("WSLENV").is_some();
    library_path_for(in_wsl, exec_windows_cmd)
}

/// Separated from the environment probe so tests can force the WSL branch
/// and stub the command executor.
#[cfg(target_os = "linux")]
fn library_path_for<F>(in_wsl: bool, exec: F) -> Result<PathBuf>
where
    F: Fn(&str) -> Result<String>,
{
    if !in_wsl {
        return Ok(PathBuf::from(DEFAULT_LINUX_DRIVE));
    }

    // Under WSL the Windows home directory is reachable through /mnt;
    // cmd.exe expands the host environment for us.
    let drive = exec("echo %HOMEDRIVE%")?;
    let drive = drive.trim_end_matches(':').to_lowercase();
    let home = exec("echo %HOMEPATH%")?.replace('\\', "/");

    Ok(PathBuf::from(format!(
        "/mnt/{drive}{home}/Music/iTunes/{LIBRARY_FILE}"
    )))
}

#[cfg(target_os = "linux")]
fn exec_windows_cmd(command: &str) -> Result<String> {
    let output = std::process::Command::new("cmd.exe")
        .args(["/c", command])
        .output()?;
    if !output.status.success() {
        return Err(std::io::Error::other(format!(
            "cmd.exe /c {command:?} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ))
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
