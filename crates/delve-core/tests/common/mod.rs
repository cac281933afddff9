//! Scripted stand-ins for the search service and the model.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use delve_core::llm::{LLMError, LLM};
use delve_core::planning::prompts::PLANNER_SYSTEM_PROMPT;
use delve_core::{ExtractHit, SearchExtract, SearchHit, UpstreamError};

#[derive(Default, Clone)]
struct Script {
    urls: Vec<Option<String>>,
    delay: Duration,
    fail: bool,
}

/// Answers searches by objective and extracts by URL.
#[derive(Default)]
pub struct FakeSearch {
    scripts: HashMap<String, Script>,
    pages: HashMap<String, Vec<String>>,
    failing_pages: HashSet<String>,
    pub search_calls: AtomicUsize,
    pub extract_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub extract_objectives: Mutex<Vec<String>>,
    pub search_limits: Mutex<Vec<usize>>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Searching `objective` waits `delay_ms` then returns `urls`.
    pub fn with_task(mut self, objective: &str, urls: &[&str], delay_ms: u64) -> Self {
        self.scripts.insert(
            objective.to_string(),
            Script {
                urls: urls.iter().map(|u| Some(u.to_string())).collect(),
                delay: Duration::from_millis(delay_ms),
                fail: false,
            },
        );
        self
    }

    /// Like `with_task`, but hits may come back without a URL.
    pub fn with_hits(mut self, objective: &str, urls: &[Option<&str>]) -> Self {
        self.scripts.insert(
            objective.to_string(),
            Script {
                urls: urls.iter().map(|u| u.map(str::to_string)).collect(),
                ..Script::default()
            },
        );
        self
    }

    pub fn with_failing_search(mut self, objective: &str, delay_ms: u64) -> Self {
        self.scripts.insert(
            objective.to_string(),
            Script {
                urls: Vec::new(),
                delay: Duration::from_millis(delay_ms),
                fail: true,
            },
        );
        self
    }

    pub fn with_page(mut self, url: &str, excerpts: &[&str]) -> Self {
        self.pages
            .insert(url.to_string(), excerpts.iter().map(|e| e.to_string()).collect());
        self
    }

    /// Any extract call that includes `url` fails.
    pub fn with_failing_page(mut self, url: &str) -> Self {
        self.failing_pages.insert(url.to_string());
        self
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn extracts(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchExtract for FakeSearch {
    async fn search(
        &self,
        objective: &str,
        max_results: usize,
        _max_excerpt_chars: usize,
    ) -> Result<Vec<SearchHit>, UpstreamError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search_limits.lock().unwrap().push(max_results);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let script = self.scripts.get(objective).cloned().unwrap_or_default();
        tokio::time::sleep(script.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if script.fail {
            return Err(UpstreamError::Status {
                status: 503,
                message: format!("search unavailable for {objective}"),
            });
        }
        Ok(script
            .urls
            .into_iter()
            .map(|url| SearchHit { url, title: None })
            .collect())
    }

    async fn extract(
        &self,
        urls: &[String],
        objective: &str,
        _max_excerpt_chars: usize,
    ) -> Result<Vec<ExtractHit>, UpstreamError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        self.extract_objectives
            .lock()
            .unwrap()
            .push(objective.to_string());

        if urls.iter().any(|u| self.failing_pages.contains(u)) {
            return Err(UpstreamError::Timeout);
        }

        Ok(urls
            .iter()
            .map(|url| {
                let excerpts = self.pages.get(url).cloned().unwrap_or_default();
                ExtractHit::new(url.clone(), excerpts)
            })
            .collect())
    }
}

/// Returns `plan` to the planner and `summary` to everyone else.
pub struct FakeLLM {
    plan: String,
    summary: String,
    pub calls: AtomicUsize,
}

impl FakeLLM {
    pub fn new(plan: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            plan: plan.into(),
            summary: summary.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LLM for FakeLLM {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        self.complete_with_system("", prompt).await
    }

    async fn complete_with_system(&self, system: &str, _prompt: &str) -> Result<String, LLMError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if system == PLANNER_SYSTEM_PROMPT {
            Ok(self.plan.clone())
        } else {
            Ok(self.summary.clone())
        }
    }
}
