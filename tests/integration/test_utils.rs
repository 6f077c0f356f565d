//! Shared test utilities for integration tests
//!
//! Centralizes XDG/env isolation and a scripted generator so tests stay independent
//! of the developer's own config and credentials.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Mutex as StdMutex;
use tarantino::error::GenerationError;
use tarantino::provider::{GenerationRequest, GenerationResult, Generator};
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: StdMutex<()> = StdMutex::new(());

const ISOLATED_VARS: [&str; 5] = [
    "HOME",
    "XDG_CONFIG_HOME",
    "TARANTINO_ENV",
    "TARANTINO__PROVIDER__MODEL",
    "ANTHROPIC_API_KEY",
];

/// Environment variable state to restore after test
struct EnvState {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            saved: ISOLATED_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.saved {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir` and the
/// Tarantino-specific variables cleared. The environment is restored afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_config_home = test_dir.path().join("xdg");
    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_config_home).unwrap();
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", &test_home);
    std::env::set_var("XDG_CONFIG_HOME", &test_config_home);
    std::env::remove_var("TARANTINO_ENV");
    std::env::remove_var("TARANTINO__PROVIDER__MODEL");
    std::env::remove_var("ANTHROPIC_API_KEY");

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    env_state.restore();
    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Generator that replays canned results and records every request.
pub struct ScriptedGenerator {
    results: Mutex<Vec<GenerationResult>>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(results: Vec<GenerationResult>) -> Self {
        Self {
            results: Mutex::new(results),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.requests.lock().last().map(|r| r.prompt.clone())
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> GenerationResult {
        self.requests.lock().push(request);
        let mut results = self.results.lock();
        if results.is_empty() {
            return Err(GenerationError::Transport("no scripted result left".to_string()));
        }
        results.remove(0)
    }
}
