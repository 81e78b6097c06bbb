//! Deduplicated warnings.
//!
//! Parsers hit the same recoverable problem many times over one document;
//! this module makes sure each distinct message is logged only once per run.
//! Messages go to the `log` facade at `warn` level, so the binary decides
//! where (and whether) they are printed.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already logged.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Log a warning for `component` once per unique message.
///
/// Returns `true` if the message was new and has been logged.
///
/// # Example
/// ```
/// use heron_common::warn_once;
///
/// assert!(warn_once("html", "eof-in-comment"));
/// assert!(!warn_once("html", "eof-in-comment"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let is_new = match WARNED.lock() {
        Ok(mut guard) => guard.get_or_insert_with(HashSet::new).insert(key),
        // A poisoned set only loses deduplication.
        Err(_) => true,
    };

    if is_new {
        log::warn!(target: "heron", "[{component}] {message}");
    }
    is_new
}

/// Forget every recorded warning (call before parsing an unrelated input).
pub fn clear_warnings() {
    if let Ok(mut guard) = WARNED.lock()
        && let Some(set) = guard.as_mut()
    {
        set.clear();
    }
}
