//! Purpose: Give serde_json's recursive passes a stack sized to the nesting they will walk.
//! Exports: `with_stack_for`.
//! Role: Lets the serde engine reach `max_depth` from small caller stacks (test threads, async workers).
//! Invariants: Shallow work runs inline on the caller's thread.
//! Invariants: A panic inside the task resumes on the caller's thread.

use std::panic;
use std::thread;

use crate::core::error::{Error, ErrorKind};

const INLINE_DEPTH: usize = 64;
const BASE_STACK: usize = 1 << 20;
// Unoptimized serde_json frames run to several KiB per nesting level.
const STACK_PER_LEVEL: usize = 32 << 10;

/// Runs `task`, moving it to a scoped thread when `depth` is more than the caller's
/// stack can be trusted with.
pub(crate) fn with_stack_for<T, F>(depth: usize, task: F) -> Result<T, Error>
where
    T: Send,
    F: FnOnce() -> Result<T, Error> + Send,
{
    if depth <= INLINE_DEPTH {
        return task();
    }
    let stack_size = depth
        .saturating_mul(STACK_PER_LEVEL)
        .saturating_add(BASE_STACK);
    tracing::debug!(depth, stack_size, "running serde_json on a sized stack");
    thread::scope(|scope| {
        let handle = thread::Builder::new()
            .name("portable-json-serde".to_string())
            .stack_size(stack_size)
            .spawn_scoped(scope, task)
            .map_err(|err| {
                Error::new(ErrorKind::Internal)
                    .with_message(format!(
                        "failed to start a {stack_size}-byte stack for nesting depth {depth}"
                    ))
                    .with_hint("Lower `max_depth` or use the native engine.")
                    .with_source(err)
            })?;
        match handle.join() {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    })
}
