//! Shared fixtures for collection tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use comunica::adapters::comunica::{PageResult, PageSource};
use comunica::config::ResumeMode;
use comunica::core::collect::{RetryPolicy, RunPlan};
use comunica::domain::{Record, TribunalCode};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

/// `count` records tagged with their day and position
pub fn records(day: NaiveDate, count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| Record::from(json!({"id": format!("{day}-{i}"), "data": day.to_string()})))
        .collect()
}

/// Plan over `start..=end` with files under `dir` and no backoff
pub fn plan(dir: &Path, start: NaiveDate, end: NaiveDate) -> RunPlan {
    RunPlan {
        tribunal: TribunalCode::new("TJMG").unwrap(),
        start,
        end,
        resume: ResumeMode::AfterCheckpoint,
        retry: RetryPolicy {
            max_retries: 3,
            backoff: Duration::ZERO,
        },
        output_path: dir.join("casos.json"),
        checkpoint_path: dir.join("backup.json"),
        error_log_path: dir.join("erros.log"),
        pretty: true,
    }
}

/// Page source answering from a per-page script
///
/// Each `(day, page)` holds a queue of answers consumed one per request.
/// Pages without a script, or whose queue ran dry, answer `EndOfDay`.
pub struct ScriptedSource {
    page_size: usize,
    script: Mutex<HashMap<(NaiveDate, u32), VecDeque<PageResult>>>,
    requests: Mutex<Vec<(NaiveDate, u32)>>,
    interrupt_at: Mutex<Option<((NaiveDate, u32), watch::Sender<bool>)>>,
}

impl ScriptedSource {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            script: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            interrupt_at: Mutex::new(None),
        }
    }

    /// Queue an answer for `page` of `day`
    pub fn answer(self, day: NaiveDate, page: u32, result: PageResult) -> Self {
        self.script
            .lock()
            .unwrap()
            .entry((day, page))
            .or_default()
            .push_back(result);
        self
    }

    /// Full pages of records followed by a partial one
    pub fn day_with(self, day: NaiveDate, total: usize) -> Self {
        let all = records(day, total);
        let mut source = self;
        let mut page = 1;
        for chunk in all.chunks(source.page_size) {
            source = source.answer(day, page, PageResult::Items(chunk.to_vec()));
            page += 1;
        }
        source
    }

    /// Raise the shutdown flag while serving `page` of `day`
    pub fn interrupt_at(self, day: NaiveDate, page: u32, tx: watch::Sender<bool>) -> Self {
        *self.interrupt_at.lock().unwrap() = Some(((day, page), tx));
        self
    }

    pub fn requests(&self) -> Vec<(NaiveDate, u32)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<_> = self.requests().into_iter().map(|(d, _)| d).collect();
        days.dedup();
        days
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(&self, day: NaiveDate, page: u32) -> PageResult {
        self.requests.lock().unwrap().push((day, page));

        if let Some((at, tx)) = self.interrupt_at.lock().unwrap().as_ref() {
            if *at == (day, page) {
                let _ = tx.send(true);
            }
        }

        self.script
            .lock()
            .unwrap()
            .get_mut(&(day, page))
            .and_then(VecDeque::pop_front)
            .unwrap_or(PageResult::EndOfDay)
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}

/// Reads a JSON file written by the collector
pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

pub fn ids(array: &serde_json::Value) -> Vec<String> {
    array
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}
