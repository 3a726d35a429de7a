//! FFmpeg installation through the host's package manager.
//!
//! The host is resolved once into a [`Platform`], which maps to an
//! [`InstallPlan`]. Running the plan never fails hard: every problem is
//! logged and reported as `false`.

use crate::Result;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Where Linux distributions describe themselves.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Host operating system family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux, with the `ID=` value from os-release if it could be read.
    Linux { distro: Option<String> },
    /// Anything else, by name.
    Other(String),
}

impl Platform {
    /// Detect the current host.
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS, Path::new(OS_RELEASE_PATH))
    }

    /// Resolve an OS name, reading `os_release` for Linux hosts.
    pub fn from_os_name(os: &str, os_release: &Path) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux {
                distro: read_distro(os_release),
            },
            other => Platform::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Linux { distro: Some(d) } => write!(f, "linux ({})", d),
            Platform::Linux { distro: None } => write!(f, "linux"),
            Platform::Other(name) => write!(f, "{}", name),
        }
    }
}

/// How FFmpeg gets installed on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallPlan {
    /// Check for winget, then `winget install FFmpeg`.
    Winget,
    /// A shell command line run through `sh -c`.
    Shell(String),
    /// No known way to install; carries the reason.
    Unsupported(String),
}

impl InstallPlan {
    /// Pick the plan for a platform.
    pub fn for_platform(platform: &Platform) -> Self {
        match platform {
            Platform::Windows => InstallPlan::Winget,
            Platform::MacOs => InstallPlan::Shell("brew install ffmpeg".to_string()),
            Platform::Linux { distro: None } => {
                InstallPlan::Unsupported("Failed to determine Linux distribution".to_string())
            }
            Platform::Linux {
                distro: Some(distro),
            } => match linux_install_command(distro) {
                Some(command) => InstallPlan::Shell(command.to_string()),
                None => {
                    InstallPlan::Unsupported(format!("Unsupported Linux distribution: {}", distro))
                }
            },
            Platform::Other(name) => {
                InstallPlan::Unsupported(format!("Unsupported operating system: {}", name))
            }
        }
    }

    /// Printable form of the command that will run.
    pub fn describe(&self) -> String {
        match self {
            InstallPlan::Winget => "winget install FFmpeg".to_string(),
            InstallPlan::Shell(command) => command.clone(),
            InstallPlan::Unsupported(reason) => reason.clone(),
        }
    }
}

/// Package-manager command for a distro id.
pub fn linux_install_command(distro: &str) -> Option<&'static str> {
    match distro {
        "ubuntu" | "debian" => Some("sudo apt update && sudo apt install -y ffmpeg"),
        "fedora" => Some("sudo dnf install -y ffmpeg"),
        "arch" => Some("sudo pacman -S --noconfirm ffmpeg"),
        _ => None,
    }
}

/// Extract the distro id from os-release content.
///
/// Takes the first `ID=` line; the value is unquoted and lowercased.
pub fn parse_distro_id(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("ID="))
        .map(|value| value.trim().replace('"', "").replace('\'', "").to_lowercase())
        .filter(|value| !value.is_empty())
}

/// Read the distro id from an os-release file.
pub fn read_distro(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_distro_id(&content),
        Err(e) => {
            tracing::warn!("Error reading OS release info: {}", e);
            None
        }
    }
}

/// Runs an [`InstallPlan`].
#[derive(Debug, Clone)]
pub struct Installer {
    plan: InstallPlan,
}

impl Installer {
    /// Create an installer for a resolved plan.
    pub fn new(plan: InstallPlan) -> Self {
        Self { plan }
    }

    /// Create an installer for the current host.
    pub fn detect() -> Self {
        let platform = Platform::detect();
        tracing::debug!("Detected platform: {}", platform);
        Self::new(InstallPlan::for_platform(&platform))
    }

    pub fn plan(&self) -> &InstallPlan {
        &self.plan
    }

    /// Install FFmpeg. Returns true iff the package manager exited with 0.
    pub async fn install(&self) -> bool {
        match self.try_install().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("{}", e);
                false
            }
        }
    }

    async fn try_install(&self) -> Result<()> {
        match &self.plan {
            InstallPlan::Unsupported(reason) => Err(crate::Error::UnsupportedPlatform(reason.clone())),
            InstallPlan::Winget => {
                if !winget_available().await {
                    return Err(crate::Error::InstallFailed(
                        "Winget package manager not found".to_string(),
                    ));
                }
                tracing::info!("Running: winget install FFmpeg");
                let status = Command::new("winget")
                    .args(["install", "FFmpeg"])
                    .stdin(Stdio::null())
                    .status()
                    .await?;
                check_status(status)
            }
            InstallPlan::Shell(command) => {
                tracing::info!("Running: {}", command);
                let status = Command::new("sh")
                    .arg("-c")
                    .arg(command)
                    .stdin(Stdio::null())
                    .status()
                    .await?;
                check_status(status)
            }
        }
    }
}

fn check_status(status: std::process::ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(crate::Error::InstallFailed(format!("package manager {}", status)))
    }
}

/// Ask PowerShell whether `winget` runs; it prints `True` when it does.
async fn winget_available() -> bool {
    let child = Command::new("powershell.exe")
        .args(["winget;", "echo", "$?"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!("Error checking winget availability: {}", e);
            return false;
        }
    };

    let Some(stdout) = child.stdout.take() else {
        return false;
    };

    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.contains("True") => return true,
            Ok(Some(_)) => continue,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Error checking winget availability: {}", e);
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_distro_id() {
        let content = "NAME=\"Ubuntu\"\nVERSION_ID=\"22.04\"\nID=ubuntu\nID_LIKE=debian\n";
        assert_eq!(parse_distro_id(content), Some("ubuntu".to_string()));

        assert_eq!(parse_distro_id("ID=\"Fedora\"\n"), Some("fedora".to_string()));
        assert_eq!(parse_distro_id("ID_LIKE=arch\nNAME=x\n"), None);
        assert_eq!(parse_distro_id(""), None);
    }

    #[test]
    fn test_linux_table() {
        assert_eq!(
            InstallPlan::for_platform(&Platform::Linux {
                distro: Some("debian".to_string())
            }),
            InstallPlan::Shell("sudo apt update && sudo apt install -y ffmpeg".to_string())
        );
        assert_eq!(
            InstallPlan::for_platform(&Platform::Linux {
                distro: Some("arch".to_string())
            }),
            InstallPlan::Shell("sudo pacman -S --noconfirm ffmpeg".to_string())
        );
        assert!(matches!(
            InstallPlan::for_platform(&Platform::Linux {
                distro: Some("gentoo".to_string())
            }),
            InstallPlan::Unsupported(reason) if reason.contains("gentoo")
        ));
        assert!(matches!(
            InstallPlan::for_platform(&Platform::Linux { distro: None }),
            InstallPlan::Unsupported(_)
        ));
    }

    #[test]
    fn test_other_platforms() {
        assert_eq!(InstallPlan::for_platform(&Platform::Windows), InstallPlan::Winget);
        assert_eq!(
            InstallPlan::for_platform(&Platform::MacOs),
            InstallPlan::Shell("brew install ffmpeg".to_string())
        );
        assert_eq!(
            InstallPlan::for_platform(&Platform::Other("freebsd".to_string())),
            InstallPlan::Unsupported("Unsupported operating system: freebsd".to_string())
        );
    }

    #[test]
    fn test_from_os_name_reads_release_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("os-release");
        std::fs::write(&path, "NAME=Fedora Linux\nID=fedora\n").unwrap();

        assert_eq!(
            Platform::from_os_name("linux", &path),
            Platform::Linux {
                distro: Some("fedora".to_string())
            }
        );
        assert_eq!(
            Platform::from_os_name("linux", &dir.path().join("missing")),
            Platform::Linux { distro: None }
        );
        assert_eq!(Platform::from_os_name("windows", &path), Platform::Windows);
    }

    #[tokio::test]
    async fn test_unsupported_plan_fails() {
        let installer = Installer::new(InstallPlan::Unsupported("nope".to_string()));
        assert!(!installer.install().await);
    }
}
