use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Run `f`, capturing a panic instead of unwinding through the worker.
///
/// Tasks are `FnOnce` and consumed by the call, so nothing they touched is
/// observed again by the worker after a panic.
pub(crate) fn catch_panic<F, R>(f: F) -> Result<R, PanicInfo>
where
    F: FnOnce() -> R,
{
    catch_unwind(AssertUnwindSafe(f)).map_err(PanicInfo::from_payload)
}

#[derive(Debug, Clone)]
pub(crate) struct PanicInfo {
    pub message: String,
}

impl PanicInfo {
    fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        Self { message }
    }
}

impl fmt::Display for PanicInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task panicked: {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_panic_success() {
        let result = catch_panic(|| 42);
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_catch_panic_str_payload() {
        let result: Result<(), _> = catch_panic(|| panic!("test panic"));
        assert_eq!(result.unwrap_err().message, "test panic");
    }

    #[test]
    fn test_catch_panic_string_payload() {
        let code = 3;
        let result: Result<(), _> = catch_panic(|| panic!("exit code {}", code));
        let info = result.unwrap_err();
        assert_eq!(info.message, "exit code 3");
        assert_eq!(info.to_string(), "task panicked: exit code 3");
    }

    #[test]
    fn test_catch_panic_opaque_payload() {
        let result: Result<(), _> = catch_panic(|| std::panic::panic_any(17u8));
        assert_eq!(result.unwrap_err().message, "Unknown panic");
    }
}
