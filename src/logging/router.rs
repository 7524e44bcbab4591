//! Severity router.
//!
//! # Responsibilities
//! - Decide per call whether a record goes to the journal or the fallback sink
//! - Demote journal write failures to one Error-level fallback line
//! - Hand Fatal and Panic records to the termination primitives

use std::fmt;
use std::sync::Arc;

use crate::logging::fallback::{FallbackSink, TracingSink};
use crate::logging::format::{join, Arg};
use crate::logging::journal::{JournalSink, StructuredSink};
use crate::logging::severity::{FallbackLevel, Severity};
use crate::logging::terminate::{raise_panic, ProcessExit, Terminator, FATAL_EXIT_CODE};

/// Body of a log call.
#[derive(Clone, Copy)]
pub enum Message<'a> {
    /// Format template with its arguments, rendered verbatim.
    Formatted(fmt::Arguments<'a>),
    /// Argument list rendered with [`join`].
    Joined(&'a [Arg<'a>]),
}

impl Message<'_> {
    pub fn render(&self) -> String {
        match self {
            Message::Formatted(args) => args.to_string(),
            Message::Joined(args) => join(args),
        }
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Message").field(&self.render()).finish()
    }
}

/// Outcome of the journal attempt for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Journaled {
    Delivered,
    Failed,
    Skipped,
}

/// Dual-sink logger.
///
/// Writes to the journal when it is reachable and to the fallback sink
/// otherwise. Holds no per-call state, so one instance is shared for the
/// whole process.
#[derive(Clone)]
pub struct Logger {
    journal: Arc<dyn StructuredSink>,
    fallback: Arc<dyn FallbackSink>,
    terminator: Arc<dyn Terminator>,
}

impl Logger {
    pub fn new(journal: Arc<dyn StructuredSink>, fallback: Arc<dyn FallbackSink>) -> Self {
        Self {
            journal,
            fallback,
            terminator: Arc::new(ProcessExit),
        }
    }

    /// Journal at the default socket, falling back to `tracing`.
    pub fn journal_or_tracing() -> Self {
        Self::new(Arc::new(JournalSink::new()), Arc::new(TracingSink::new()))
    }

    /// Replace the primitive used to end the process on Fatal.
    pub fn with_terminator(mut self, terminator: Arc<dyn Terminator>) -> Self {
        self.terminator = terminator;
        self
    }

    /// Route one record.
    ///
    /// Returns normally for every severity except Fatal (the process exits)
    /// and Panic (the caller unwinds).
    pub fn emit(&self, severity: Severity, message: Message<'_>) {
        match severity {
            Severity::Fatal => self.emit_fatal(message),
            Severity::Panic => self.emit_panic(message),
            _ => {
                if self.try_journal(severity, &message) == Journaled::Skipped {
                    self.fallback
                        .write(severity.fallback_level(), &message.render());
                }
            }
        }
    }

    fn emit_fatal(&self, message: Message<'_>) -> ! {
        if self.try_journal(Severity::Fatal, &message) != Journaled::Delivered {
            self.fallback.write(FallbackLevel::Fatal, &message.render());
        }
        self.terminator.exit(FATAL_EXIT_CODE)
    }

    fn emit_panic(&self, message: Message<'_>) -> ! {
        let rendered = message.render();
        self.fallback.write(FallbackLevel::Panic, &rendered);
        raise_panic(rendered)
    }

    fn try_journal(&self, severity: Severity, message: &Message<'_>) -> Journaled {
        let Some(priority) = severity.priority() else {
            return Journaled::Skipped;
        };
        if !self.journal.is_available() {
            return Journaled::Skipped;
        }
        match self.journal.send(priority, &message.render()) {
            Ok(()) => Journaled::Delivered,
            Err(e) => {
                self.fallback.write(
                    FallbackLevel::Error,
                    &format!("error printing to systemd journal: {}", e),
                );
                Journaled::Failed
            }
        }
    }

    pub fn debug(&self, args: &[Arg<'_>]) {
        self.emit(Severity::Debug, Message::Joined(args));
    }

    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Debug, Message::Formatted(args));
    }

    pub fn info(&self, args: &[Arg<'_>]) {
        self.emit(Severity::Info, Message::Joined(args));
    }

    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Info, Message::Formatted(args));
    }

    pub fn notice(&self, args: &[Arg<'_>]) {
        self.emit(Severity::Notice, Message::Joined(args));
    }

    pub fn noticef(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Notice, Message::Formatted(args));
    }

    pub fn warning(&self, args: &[Arg<'_>]) {
        self.emit(Severity::Warning, Message::Joined(args));
    }

    pub fn warningf(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Warning, Message::Formatted(args));
    }

    pub fn error(&self, args: &[Arg<'_>]) {
        self.emit(Severity::Error, Message::Joined(args));
    }

    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Error, Message::Formatted(args));
    }

    pub fn critical(&self, args: &[Arg<'_>]) {
        self.emit(Severity::Critical, Message::Joined(args));
    }

    pub fn criticalf(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Critical, Message::Formatted(args));
    }

    /// Log at Panic level and unwind.
    pub fn panic(&self, args: &[Arg<'_>]) -> ! {
        self.emit_panic(Message::Joined(args))
    }

    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        self.emit_panic(Message::Formatted(args))
    }

    /// Log at Fatal level and exit with status 1.
    pub fn fatal(&self, args: &[Arg<'_>]) -> ! {
        self.emit_fatal(Message::Joined(args))
    }

    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.emit_fatal(Message::Formatted(args))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("journal_available", &self.journal.is_available())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::journal::JournalError;
    use crate::logging::severity::Priority;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeJournal {
        available: AtomicBool,
        fail: AtomicBool,
        probes: AtomicUsize,
        sent: Mutex<Vec<(Priority, String)>>,
    }

    impl FakeJournal {
        fn new(available: bool, fail: bool) -> Arc<Self> {
            let j = Self::default();
            j.available.store(available, Ordering::SeqCst);
            j.fail.store(fail, Ordering::SeqCst);
            Arc::new(j)
        }

        fn sent(&self) -> Vec<(Priority, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl StructuredSink for FakeJournal {
        fn is_available(&self) -> bool {
            self.probes.fetch_add(1, Ordering::SeqCst);
            self.available.load(Ordering::SeqCst)
        }

        fn send(&self, priority: Priority, message: &str) -> Result<(), JournalError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(JournalError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "refused",
                )));
            }
            self.sent.lock().unwrap().push((priority, message.to_string()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(FallbackLevel, String)>>);

    impl Recorder {
        fn lines(&self) -> Vec<(FallbackLevel, String)> {
            self.0.lock().unwrap().clone()
        }
    }

    impl FallbackSink for Recorder {
        fn write(&self, level: FallbackLevel, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    struct Exit(i32);

    struct PanickingExit(AtomicUsize);

    impl Terminator for PanickingExit {
        fn exit(&self, code: i32) -> ! {
            self.0.fetch_add(1, Ordering::SeqCst);
            std::panic::panic_any(Exit(code))
        }
    }

    fn logger(journal: &Arc<FakeJournal>, recorder: &Arc<Recorder>) -> (Logger, Arc<PanickingExit>) {
        let exit = Arc::new(PanickingExit(AtomicUsize::new(0)));
        let logger = Logger::new(journal.clone(), recorder.clone()).with_terminator(exit.clone());
        (logger, exit)
    }

    #[test]
    fn test_unavailable_journal_uses_mapped_fallback_level() {
        let journal = FakeJournal::new(false, false);
        let recorder = Arc::new(Recorder::default());
        let (log, _) = logger(&journal, &recorder);

        log.infof(format_args!("a {}", 1));
        log.noticef(format_args!("b"));
        log.warningf(format_args!("c"));
        log.errorf(format_args!("d"));
        log.criticalf(format_args!("e"));

        assert!(journal.sent().is_empty());
        assert_eq!(
            recorder.lines(),
            vec![
                (FallbackLevel::Info, "a 1".to_string()),
                (FallbackLevel::Info, "b".to_string()),
                (FallbackLevel::Warn, "c".to_string()),
                (FallbackLevel::Error, "d".to_string()),
                (FallbackLevel::Error, "e".to_string()),
            ]
        );
    }

    #[test]
    fn test_available_journal_suppresses_fallback() {
        let journal = FakeJournal::new(true, false);
        let recorder = Arc::new(Recorder::default());
        let (log, _) = logger(&journal, &recorder);

        log.notice(&["retweeted ".into(), 42u64.into()]);
        log.critical(&[1.into(), 2.into()]);

        assert!(recorder.lines().is_empty());
        assert_eq!(
            journal.sent(),
            vec![
                (Priority::Notice, "retweeted 42".to_string()),
                (Priority::Critical, "1 2".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_failure_is_reported_once_without_duplicate() {
        let journal = FakeJournal::new(true, true);
        let recorder = Arc::new(Recorder::default());
        let (log, _) = logger(&journal, &recorder);

        log.warningf(format_args!("lagging"));

        let lines = recorder.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, FallbackLevel::Error);
        assert!(lines[0].1.starts_with("error printing to systemd journal:"));
        assert!(!lines[0].1.contains("lagging"));
    }

    #[test]
    fn test_debug_never_reaches_journal() {
        for available in [true, false] {
            let journal = FakeJournal::new(available, false);
            let recorder = Arc::new(Recorder::default());
            let (log, _) = logger(&journal, &recorder);

            log.debug(&["x".into()]);
            log.debugf(format_args!("y"));

            assert!(journal.sent().is_empty());
            assert_eq!(
                recorder.lines(),
                vec![
                    (FallbackLevel::Debug, "x".to_string()),
                    (FallbackLevel::Debug, "y".to_string())
                ]
            );
        }
    }

    #[test]
    fn test_availability_probed_every_call() {
        let journal = FakeJournal::new(false, false);
        let recorder = Arc::new(Recorder::default());
        let (log, _) = logger(&journal, &recorder);

        log.infof(format_args!("first"));
        journal.available.store(true, Ordering::SeqCst);
        log.infof(format_args!("second"));

        assert_eq!(journal.probes.load(Ordering::SeqCst), 2);
        assert_eq!(recorder.lines(), vec![(FallbackLevel::Info, "first".to_string())]);
        assert_eq!(journal.sent(), vec![(Priority::Info, "second".to_string())]);
    }

    fn run_fatal(available: bool, fail: bool) -> (Arc<FakeJournal>, Arc<Recorder>, usize, i32) {
        let journal = FakeJournal::new(available, fail);
        let recorder = Arc::new(Recorder::default());
        let (log, exit) = logger(&journal, &recorder);

        let payload = catch_unwind(AssertUnwindSafe(|| log.fatalf(format_args!("missing {}", "KEY"))))
            .unwrap_err();
        let code = payload.downcast_ref::<Exit>().map(|e| e.0).unwrap();
        (journal, recorder, exit.0.load(Ordering::SeqCst), code)
    }

    #[test]
    fn test_fatal_delivered_to_journal_exits_once() {
        let (journal, recorder, exits, code) = run_fatal(true, false);
        assert_eq!((exits, code), (1, 1));
        assert_eq!(journal.sent(), vec![(Priority::Emergency, "missing KEY".to_string())]);
        assert!(recorder.lines().is_empty());
    }

    #[test]
    fn test_fatal_without_journal_writes_fallback_and_exits_once() {
        let (journal, recorder, exits, code) = run_fatal(false, false);
        assert_eq!((exits, code), (1, 1));
        assert!(journal.sent().is_empty());
        assert_eq!(recorder.lines(), vec![(FallbackLevel::Fatal, "missing KEY".to_string())]);
    }

    #[test]
    fn test_fatal_journal_failure_falls_through() {
        let (_, recorder, exits, code) = run_fatal(true, true);
        assert_eq!((exits, code), (1, 1));
        let lines = recorder.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, FallbackLevel::Error);
        assert_eq!(lines[1], (FallbackLevel::Fatal, "missing KEY".to_string()));
    }

    #[test]
    fn test_panic_skips_journal_and_unwinds() {
        let journal = FakeJournal::new(true, false);
        let recorder = Arc::new(Recorder::default());
        let (log, exit) = logger(&journal, &recorder);

        let payload = catch_unwind(AssertUnwindSafe(|| log.panic(&["bad ".into(), 7.into()])))
            .unwrap_err();

        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("bad 7"));
        assert!(journal.sent().is_empty());
        assert_eq!(journal.probes.load(Ordering::SeqCst), 0);
        assert_eq!(exit.0.load(Ordering::SeqCst), 0);
        assert_eq!(recorder.lines(), vec![(FallbackLevel::Panic, "bad 7".to_string())]);
    }

    #[test]
    fn test_repeated_calls_render_identically() {
        let journal = FakeJournal::new(false, false);
        let recorder = Arc::new(Recorder::default());
        let (log, _) = logger(&journal, &recorder);

        for _ in 0..3 {
            log.info(&["id".into(), 5.into(), 6.into()]);
        }
        let lines = recorder.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.1 == "id5 6"));
    }
}
