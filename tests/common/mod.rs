//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use retweeter::logging::{
    FallbackLevel, FallbackSink, JournalError, Logger, Priority, StructuredSink, Terminator,
};

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the request line (`POST /path?query HTTP/1.1`) and returns
/// the status code and body. Every response closes the connection.
pub async fn start_programmable_backend<F>(f: F) -> SocketAddr
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let request_line = read_request_line(&mut socket).await;
                let (status, body) = f(&request_line);
                let status_text = match status {
                    200 => "200 OK",
                    401 => "401 Unauthorized",
                    403 => "403 Forbidden",
                    404 => "404 Not Found",
                    429 => "429 Too Many Requests",
                    500 => "500 Internal Server Error",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    addr
}

/// Read the whole request (head and `Content-Length` body) and return its
/// first line. Draining the body keeps the close from turning into a reset.
async fn read_request_line(socket: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    let mut expected: Option<usize> = None;
    loop {
        if let Some(total) = expected {
            if data.len() >= total {
                break;
            }
        } else if let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            expected = Some(end + 4 + body_len);
            continue;
        }
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8_lossy(&data)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Journal stand-in with switchable availability and failure.
#[derive(Default)]
pub struct FakeJournal {
    pub available: AtomicBool,
    pub fail: AtomicBool,
    pub sent: Mutex<Vec<(Priority, String)>>,
}

impl FakeJournal {
    pub fn new(available: bool, fail: bool) -> Arc<Self> {
        let journal = Self::default();
        journal.available.store(available, Ordering::SeqCst);
        journal.fail.store(fail, Ordering::SeqCst);
        Arc::new(journal)
    }

    pub fn sent(&self) -> Vec<(Priority, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl StructuredSink for FakeJournal {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn send(&self, priority: Priority, message: &str) -> Result<(), JournalError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(JournalError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "journal went away",
            )));
        }
        self.sent.lock().unwrap().push((priority, message.to_string()));
        Ok(())
    }
}

/// Fallback sink that keeps every line.
#[derive(Default)]
pub struct RecordingSink(Mutex<Vec<(FallbackLevel, String)>>);

impl RecordingSink {
    pub fn lines(&self) -> Vec<(FallbackLevel, String)> {
        self.0.lock().unwrap().clone()
    }
}

impl FallbackSink for RecordingSink {
    fn write(&self, level: FallbackLevel, message: &str) {
        self.0.lock().unwrap().push((level, message.to_string()));
    }
}

/// Panic payload carrying the requested exit code.
#[derive(Debug)]
pub struct Exited(pub i32);

/// Terminator that unwinds with [`Exited`] instead of ending the test binary.
#[derive(Default)]
pub struct CatchExit(pub AtomicUsize);

impl CatchExit {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Terminator for CatchExit {
    fn exit(&self, code: i32) -> ! {
        self.0.fetch_add(1, Ordering::SeqCst);
        std::panic::panic_any(Exited(code))
    }
}

/// Logger wired to fakes, plus handles to inspect them.
pub struct Harness {
    pub logger: Logger,
    pub journal: Arc<FakeJournal>,
    pub fallback: Arc<RecordingSink>,
    pub exit: Arc<CatchExit>,
}

pub fn harness(journal_available: bool, journal_fails: bool) -> Harness {
    let journal = FakeJournal::new(journal_available, journal_fails);
    let fallback = Arc::new(RecordingSink::default());
    let exit = Arc::new(CatchExit::default());
    let logger = Logger::new(journal.clone(), fallback.clone()).with_terminator(exit.clone());
    Harness {
        logger,
        journal,
        fallback,
        exit,
    }
}
