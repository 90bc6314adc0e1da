use std::sync::Mutex;

// Process-global env vars are shared across parallel tests; every test
// touching them must hold this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily set or removed, then
/// restores the previous values (also on panic).
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");

    let restore = Restore {
        saved: changes
            .iter()
            .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
            .collect(),
    };

    for (key, value) in changes {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }

    let result = f();
    drop(restore);
    result
}

struct Restore {
    saved: Vec<(String, Option<String>)>,
}

impl Drop for Restore {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..) {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}
