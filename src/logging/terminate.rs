//! Termination primitives used by Fatal and Panic calls.

/// Exit status used for Fatal.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Ends the process after a Fatal record has been emitted.
pub trait Terminator: Send + Sync {
    fn exit(&self, code: i32) -> !;
}

/// Calls [`std::process::exit`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn exit(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

/// Unwind the caller with `message` as the panic payload.
pub fn raise_panic(message: String) -> ! {
    std::panic::panic_any(message)
}
