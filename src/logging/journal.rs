//! Structured sink: the systemd journal.
//!
//! # Responsibilities
//! - Probe whether the journal socket is present (fresh on every call)
//! - Encode entries in the journald native datagram format
//! - Pass entries too large for one datagram as a sealed memfd (Linux)
//! - Report write failures to the caller instead of swallowing them
//!
//! # Wire Format
//! ```text
//! PRIORITY=3\n                    field without newline
//! MESSAGE\n<u64 LE len><bytes>\n  field whose value contains a newline
//! ```
//!
//! An entry rejected with `EMSGSIZE` or `ENOBUFS` is written to a memfd,
//! sealed, and sent as an empty datagram carrying the fd in `SCM_RIGHTS`.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::logging::severity::Priority;

/// Default location of the journald native socket.
pub const DEFAULT_JOURNAL_SOCKET: &str = "/run/systemd/journal/socket";

/// Errors from writing to the structured sink.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Socket creation or the datagram send failed.
    #[error("journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Field name is empty or contains `=` or a newline.
    #[error("invalid journal field name: {0:?}")]
    InvalidField(String),

    /// The sink is disabled or not supported on this platform.
    #[error("journal not available")]
    Unavailable,
}

/// Host-managed structured log channel.
///
/// `is_available` is a capability check and must be cheap; the logger calls
/// it on every log call and never caches the answer.
pub trait StructuredSink: Send + Sync {
    fn is_available(&self) -> bool;

    fn send(&self, priority: Priority, message: &str) -> Result<(), JournalError>;
}

/// Journald client using the native protocol over a Unix datagram socket.
#[derive(Debug, Clone)]
pub struct JournalSink {
    socket_path: PathBuf,
    identifier: Option<String>,
    enabled: bool,
}

impl JournalSink {
    /// Sink pointed at the default journald socket.
    pub fn new() -> Self {
        Self::with_socket(DEFAULT_JOURNAL_SOCKET)
    }

    pub fn with_socket(path: impl AsRef<Path>) -> Self {
        Self {
            socket_path: path.as_ref().to_path_buf(),
            identifier: None,
            enabled: true,
        }
    }

    /// Sink that never reports itself available.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Attach a `SYSLOG_IDENTIFIER` to every entry.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        self.identifier = if identifier.is_empty() { None } else { Some(identifier) };
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Build the datagram payload for one entry.
    pub fn encode(&self, priority: Priority, message: &str) -> Result<Vec<u8>, JournalError> {
        let mut buf = Vec::with_capacity(message.len() + 64);
        append_field(&mut buf, "PRIORITY", priority.code().to_string().as_bytes())?;
        if let Some(identifier) = &self.identifier {
            append_field(&mut buf, "SYSLOG_IDENTIFIER", identifier.as_bytes())?;
        }
        append_field(&mut buf, "MESSAGE", message.as_bytes())?;
        Ok(buf)
    }
}

impl Default for JournalSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl StructuredSink for JournalSink {
    fn is_available(&self) -> bool {
        use std::os::unix::fs::FileTypeExt;

        self.enabled
            && std::fs::metadata(&self.socket_path)
                .map(|m| m.file_type().is_socket())
                .unwrap_or(false)
    }

    fn send(&self, priority: Priority, message: &str) -> Result<(), JournalError> {
        use std::os::unix::net::UnixDatagram;

        if !self.enabled {
            return Err(JournalError::Unavailable);
        }
        let payload = self.encode(priority, message)?;
        let socket = UnixDatagram::unbound()?;
        match socket.send_to(&payload, &self.socket_path) {
            Ok(_) => Ok(()),
            Err(e) if oversized::is_oversized(&e) => {
                tracing::debug!(bytes = payload.len(), "Journal entry exceeds datagram size, passing memfd");
                oversized::send(&socket, &self.socket_path, &payload)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(target_os = "linux")]
mod oversized {
    use std::fs::File;
    use std::io::{self, Write};
    use std::os::fd::AsRawFd;
    use std::os::unix::net::UnixDatagram;
    use std::path::Path;

    use nix::errno::Errno;
    use nix::fcntl::{fcntl, FcntlArg, SealFlag};
    use nix::sys::memfd::{memfd_create, MemFdCreateFlag};
    use nix::sys::socket::{sendmsg, ControlMessage, MsgFlags, UnixAddr};

    use super::JournalError;

    pub(super) fn is_oversized(err: &io::Error) -> bool {
        matches!(
            err.raw_os_error(),
            Some(code) if code == Errno::EMSGSIZE as i32 || code == Errno::ENOBUFS as i32
        )
    }

    pub(super) fn send(socket: &UnixDatagram, path: &Path, payload: &[u8]) -> Result<(), JournalError> {
        let fd = memfd_create(
            c"journal-entry",
            MemFdCreateFlag::MFD_CLOEXEC | MemFdCreateFlag::MFD_ALLOW_SEALING,
        )
        .map_err(io::Error::from)?;
        let mut file = File::from(fd);
        file.write_all(payload)?;

        // journald only accepts fully sealed memfds.
        let seals = SealFlag::F_SEAL_SHRINK
            | SealFlag::F_SEAL_GROW
            | SealFlag::F_SEAL_WRITE
            | SealFlag::F_SEAL_SEAL;
        fcntl(file.as_raw_fd(), FcntlArg::F_ADD_SEALS(seals)).map_err(io::Error::from)?;

        let addr = UnixAddr::new(path).map_err(io::Error::from)?;
        let fds = [file.as_raw_fd()];
        sendmsg(
            socket.as_raw_fd(),
            &[],
            &[ControlMessage::ScmRights(&fds)],
            MsgFlags::empty(),
            Some(&addr),
        )
        .map_err(io::Error::from)?;
        Ok(())
    }
}

#[cfg(all(unix, not(target_os = "linux")))]
mod oversized {
    use std::io;
    use std::os::unix::net::UnixDatagram;
    use std::path::Path;

    use super::JournalError;

    pub(super) fn is_oversized(_err: &io::Error) -> bool {
        false
    }

    pub(super) fn send(_socket: &UnixDatagram, _path: &Path, _payload: &[u8]) -> Result<(), JournalError> {
        Err(JournalError::Unavailable)
    }
}

#[cfg(not(unix))]
impl StructuredSink for JournalSink {
    fn is_available(&self) -> bool {
        false
    }

    fn send(&self, _priority: Priority, _message: &str) -> Result<(), JournalError> {
        Err(JournalError::Unavailable)
    }
}

fn append_field(buf: &mut Vec<u8>, name: &str, value: &[u8]) -> Result<(), JournalError> {
    if name.is_empty() || name.contains('=') || name.contains('\n') {
        return Err(JournalError::InvalidField(name.to_string()));
    }
    buf.extend_from_slice(name.as_bytes());
    if value.contains(&b'\n') {
        buf.push(b'\n');
        buf.extend_from_slice(&(value.len() as u64).to_le_bytes());
    } else {
        buf.push(b'=');
    }
    buf.extend_from_slice(value);
    buf.push(b'\n');
    Ok(())
}
