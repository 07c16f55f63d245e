//! Managed region of the system hosts file

use crate::runtime::command::CommandRunner;
use crate::{HerdError, Result};
use nix::unistd::{access, AccessFlags};
use std::fs::{self, Permissions};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Line opening the region herd owns; everything after it is rewritten
pub const MARKER: &str = "# cluster";

const HOSTS_MODE: u32 = 0o644;

/// One `address alias` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub address: String,
    pub alias: String,
}

impl HostEntry {
    pub fn new(address: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            alias: alias.into(),
        }
    }
}

/// Byte offset of the first line that is exactly the marker
fn marker_offset(contents: &str) -> Option<usize> {
    let mut offset = 0;
    for line in contents.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == MARKER {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

fn push_entries(out: &mut String, entries: &[HostEntry]) {
    for entry in entries {
        out.push_str(&entry.address);
        out.push(' ');
        out.push_str(&entry.alias);
        out.push('\n');
    }
}

/// Replace the managed region of `existing` with `entries`.
///
/// Content before the marker is kept byte for byte. Without a marker a
/// fresh one is appended after a blank line.
pub fn render(existing: &str, entries: &[HostEntry]) -> String {
    let mut out = match marker_offset(existing) {
        Some(pos) => existing[..pos].to_string(),
        None => format!("{}\n\n", existing),
    };
    out.push_str(MARKER);
    out.push('\n');
    push_entries(&mut out, entries);
    out
}

/// Write the plain `hosts` table, one `address alias` line per entry
pub fn write_local(path: &Path, entries: &[HostEntry]) -> Result<()> {
    let mut out = String::new();
    push_entries(&mut out, entries);
    fs::write(path, out)?;
    Ok(())
}

/// Delete the plain `hosts` table if present
pub fn remove_local(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// A hosts file with a herd-managed region
pub struct HostsFile {
    path: PathBuf,
    runner: CommandRunner,
}

impl HostsFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            runner: CommandRunner::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the managed region with `entries`, in the given order
    pub async fn write(&self, entries: &[HostEntry]) -> Result<()> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        self.install(&render(&existing, entries)).await?;
        info!(path = %self.path.display(), entries = entries.len(), "updated hosts file");
        Ok(())
    }

    /// Empty the managed region, keeping the marker
    pub async fn clear(&self) -> Result<()> {
        self.write(&[]).await
    }

    /// Atomically replace the file, escalating with `sudo mv` when its
    /// directory is not writable
    async fn install(&self, contents: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        if access(dir, AccessFlags::W_OK).is_ok() {
            let tmp = staged(NamedTempFile::new_in(dir)?, contents)?;
            tmp.persist(&self.path).map_err(|e| e.error)?;
            return Ok(());
        }

        let tmp = staged(NamedTempFile::new()?, contents)?;
        let tmp_path = tmp.into_temp_path().keep().map_err(|e| e.error)?;
        elevated_move(&self.runner, "sudo", &tmp_path, &self.path).await
    }
}

/// Move `source` onto `target` through `elevate mv`.
///
/// `source` is removed whenever the move does not happen.
async fn elevated_move(
    runner: &CommandRunner,
    elevate: &str,
    source: &Path,
    target: &Path,
) -> Result<()> {
    debug!(tmp = %source.display(), elevate, "moving hosts file into place");

    let args = vec![
        "mv".to_string(),
        source.to_string_lossy().into_owned(),
        target.to_string_lossy().into_owned(),
    ];
    let moved = match runner.passthrough(elevate, &args).await {
        Ok(Some(0)) => Ok(()),
        Ok(_) => Err(HerdError::Io(std::io::Error::new(
            ErrorKind::PermissionDenied,
            format!("could not move hosts file into {}", target.display()),
        ))),
        Err(e) => Err(e),
    };
    if moved.is_err() {
        let _ = fs::remove_file(source);
    }
    moved
}

fn staged(mut tmp: NamedTempFile, contents: &str) -> Result<NamedTempFile> {
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.as_file()
        .set_permissions(Permissions::from_mode(HOSTS_MODE))?;
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BASE: &str = "127.0.0.1 localhost\n::1 localhost ip6-localhost\n";

    fn prefix_before_marker(contents: &str) -> &str {
        &contents[..marker_offset(contents).unwrap()]
    }

    #[test]
    fn test_render_appends_marker_block() {
        let out = render(BASE, &[HostEntry::new("172.17.0.2", "host1")]);

        assert_eq!(
            out,
            format!("{}\n\n# cluster\n172.17.0.2 host1\n", BASE)
        );
    }

    #[test]
    fn test_render_replaces_managed_region() {
        let existing = format!("{}# cluster\n172.17.0.2 old1\n172.17.0.3 old2\n", BASE);
        let out = render(
            &existing,
            &[
                HostEntry::new("172.17.0.5", "host1"),
                HostEntry::new("172.17.0.6", "host2"),
            ],
        );

        assert_eq!(
            out,
            format!("{}# cluster\n172.17.0.5 host1\n172.17.0.6 host2\n", BASE)
        );
    }

    #[test]
    fn test_marker_must_be_whole_line() {
        let existing = "10.0.0.1 db # clusters of dbs\n";
        assert_eq!(marker_offset(existing), None);
        assert_eq!(marker_offset("a\n# cluster\r\nb\n"), Some(2));
    }

    #[tokio::test]
    async fn test_write_twice_preserves_prefix() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hosts");
        fs::write(&path, BASE).unwrap();
        let hosts = HostsFile::new(&path);

        hosts
            .write(&[HostEntry::new("172.17.0.2", "host1")])
            .await
            .unwrap();
        let first = fs::read_to_string(&path).unwrap();

        hosts
            .write(&[
                HostEntry::new("172.17.0.8", "host1"),
                HostEntry::new("172.17.0.9", "host2"),
            ])
            .await
            .unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert!(first.starts_with(BASE));
        assert_eq!(prefix_before_marker(&first), prefix_before_marker(&second));
        assert!(second.ends_with("# cluster\n172.17.0.8 host1\n172.17.0.9 host2\n"));

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[tokio::test]
    async fn test_clear_empties_region() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hosts");
        fs::write(&path, format!("{}# cluster\n172.17.0.2 host1\n", BASE)).unwrap();

        HostsFile::new(&path).clear().await.unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{}# cluster\n", BASE)
        );
    }

    #[tokio::test]
    async fn test_elevated_move_cleans_up_when_escalation_is_missing() {
        let tmp = TempDir::new().unwrap();
        let staged = tmp.path().join("staged");
        let target = tmp.path().join("hosts");
        fs::write(&staged, BASE).unwrap();

        let err = elevated_move(
            &CommandRunner::new(),
            "herd-definitely-missing-sudo",
            &staged,
            &target,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, HerdError::Spawn { .. }));
        assert!(!staged.exists());
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_elevated_move_cleans_up_on_refusal() {
        let tmp = TempDir::new().unwrap();
        let staged = tmp.path().join("staged");
        let target = tmp.path().join("hosts");
        fs::write(&staged, BASE).unwrap();

        // `false` ignores its arguments and exits 1, like a refused sudo
        let err = elevated_move(&CommandRunner::new(), "false", &staged, &target)
            .await
            .unwrap_err();

        assert!(matches!(err, HerdError::Io(_)));
        assert!(!staged.exists());
    }

    #[tokio::test]
    async fn test_elevated_move_installs_file() {
        let tmp = TempDir::new().unwrap();
        let staged = tmp.path().join("staged");
        let target = tmp.path().join("hosts");
        fs::write(&staged, BASE).unwrap();

        // `env mv a b` runs the move without escalation
        elevated_move(&CommandRunner::new(), "env", &staged, &target)
            .await
            .unwrap();

        assert!(!staged.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), BASE);
    }

    #[test]
    fn test_local_table() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hosts");

        write_local(
            &path,
            &[
                HostEntry::new("172.17.0.2", "host1"),
                HostEntry::new("172.17.0.3", "host2"),
            ],
        )
        .unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "172.17.0.2 host1\n172.17.0.3 host2\n"
        );

        remove_local(&path).unwrap();
        assert!(!path.exists());
        remove_local(&path).unwrap();
    }
}
