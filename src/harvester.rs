use std::collections::HashSet;
use std::time::Instant;
use log::info;

use crate::error::Result;
use crate::extractor::Extractor;
use crate::search_api::{SearchApi, SerpRequest};

/// Parameters for one harvest. Immutable once the harvest starts.
#[derive(Debug, Clone)]
pub struct HarvestParams {
    pub query: String,
    pub start_page: u32,
    pub pages_per_run: u32,
    pub runs: u32,
}

/// Accumulated state of a single harvest invocation: the page cursor, the
/// run counter, and every profile seen so far. `seen` only grows; the state
/// is discarded when the harvest returns.
#[derive(Debug)]
pub struct HarvestState {
    current_page: u32,
    runs_completed: u32,
    seen: HashSet<String>,
    order: Vec<String>,
}

impl HarvestState {
    pub fn new(start_page: u32) -> Self {
        HarvestState {
            current_page: start_page,
            runs_completed: 0,
            seen: HashSet::new(),
            order: Vec::new(),
        }
    }

    /// Records a sighting. Returns true only the first time a profile is seen,
    /// so report order is first-seen order.
    pub fn record(&mut self, profile: String) -> bool {
        if self.seen.insert(profile.clone()) {
            self.order.push(profile);
            true
        } else {
            false
        }
    }

    pub fn finish_run(&mut self, pages: u32) {
        self.runs_completed += 1;
        self.current_page += pages;
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn runs_completed(&self) -> u32 {
        self.runs_completed
    }

    pub fn unique_count(&self) -> usize {
        self.order.len()
    }

    pub fn into_profiles(self) -> Vec<String> {
        self.order
    }
}

pub struct Harvester {
    extractor: Extractor,
}

impl Harvester {
    pub fn new() -> Self {
        Harvester {
            extractor: Extractor::new(),
        }
    }

    /// Runs the configured number of sequential SERP queries, advancing the
    /// page cursor by `pages_per_run` after each, and returns the unique
    /// profiles in discovery order. Any failed request aborts the whole
    /// harvest; no partial set is returned.
    pub fn harvest(&self, params: &HarvestParams, api: &dyn SearchApi) -> Result<Vec<String>> {
        let mut state = HarvestState::new(params.start_page);
        let started = Instant::now();
        info!("Starting requests...");

        for run in 1..=params.runs {
            let run_started = Instant::now();
            info!(
                "Running request with query: '{}', starting page: {}, run: {}...",
                params.query,
                state.current_page(),
                run
            );

            let request = SerpRequest {
                query: params.query.clone(),
                start_page: state.current_page(),
                pages: params.pages_per_run,
            };
            let response = api.run_query(&request)?;

            for page in &response.results {
                for profile in self.extractor.extract_page(page) {
                    if state.record(profile.clone()) {
                        info!("Found profile: {}", profile);
                    }
                }
            }

            state.finish_run(params.pages_per_run);
            info!(
                "Run {} completed in {:.2} seconds.",
                run,
                run_started.elapsed().as_secs_f64()
            );
        }

        info!(
            "All runs completed in {:.2} seconds, {} unique profiles found.",
            started.elapsed().as_secs_f64(),
            state.unique_count()
        );
        Ok(state.into_profiles())
    }
}
