//! Party → stage → task loading on top of a [`StageSource`].

use std::time::Duration;

use futures::channel::oneshot;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::cache::{FetchOutcome, FetchTicket, StageCache, StageClaim};
use crate::layout::StageLayout;
use crate::party::{parties_from_stages, Party};
use crate::row::RawRow;
use crate::source::{SourceError, SourceResult, StageSource};
use crate::stage::{apply_pending, StageSummary};
use crate::status::StatusVocabulary;
use crate::task::TaskRow;

pub const DEFAULT_BATCH_SIZE: usize = 3;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub vocabulary: StatusVocabulary,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            vocabulary: StatusVocabulary::Strict,
        }
    }
}

/// Outcome of a batched prefetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrefetchReport {
    pub fetched: Vec<String>,
    pub failed: Vec<(String, SourceError)>,
}

impl PrefetchReport {
    pub fn failure_for(&self, stage_name: &str) -> Option<&SourceError> {
        self.failed
            .iter()
            .find(|(name, _)| name == stage_name)
            .map(|(_, err)| err)
    }
}

/// The full party list, primary action first, stage scan as fallback.
pub async fn load_parties<S: StageSource>(source: &S) -> SourceResult<Vec<Party>> {
    match source.all_parties().await {
        Ok(parties) if !parties.is_empty() => {
            info!(count = parties.len(), "parties loaded");
            return Ok(parties);
        }
        Ok(_) => warn!("getAllParties returned no parties, scanning stages"),
        Err(err) => warn!("getAllParties failed, scanning stages: {err}"),
    }

    let stages = source.all_stage_data().await?;
    let parties = parties_from_stages(&stages);
    info!(stages = stages.len(), count = parties.len(), "parties derived from stage data");
    Ok(parties)
}

/// Distinct stage names across parties, first-seen order.
pub fn distinct_stages<'a>(parties: impl IntoIterator<Item = &'a Party>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for party in parties {
        for stage in &party.stages_present {
            if !names.contains(stage) {
                names.push(stage.clone());
            }
        }
    }
    names
}

/// Fills the cache for `stage_names`, a few requests at a time.
///
/// Every request of a batch settles before the next batch starts; a failure
/// leaves its stage uncached without affecting the others. Stages another
/// pass is already fetching are waited on, not requested again.
pub async fn prefetch_stages<S: StageSource>(
    source: &S,
    cache: &StageCache,
    stage_names: &[String],
    options: LoadOptions,
) -> PrefetchReport {
    let mut tickets: Vec<FetchTicket> = Vec::new();
    let mut waiting: Vec<(String, oneshot::Receiver<FetchOutcome>)> = Vec::new();
    let mut seen: Vec<&String> = Vec::new();
    for name in stage_names {
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        match cache.claim(name) {
            StageClaim::Cached => {}
            StageClaim::Fetch(ticket) => tickets.push(ticket),
            StageClaim::InFlight(waiter) => waiting.push((name.clone(), waiter)),
        }
    }

    let mut report = PrefetchReport::default();
    let batch_size = options.batch_size.max(1);
    let batch_count = tickets.len().div_ceil(batch_size);
    let mut tickets = tickets.into_iter();

    for batch_idx in 0..batch_count {
        let batch: Vec<FetchTicket> = tickets.by_ref().take(batch_size).collect();
        debug!(batch = batch_idx + 1, of = batch_count, size = batch.len(), "fetching stage batch");

        let results = join_all(batch.into_iter().map(|ticket| async move {
            let result = source.stage_rows(ticket.stage()).await;
            (ticket, result)
        }))
        .await;

        for (ticket, result) in results {
            settle_fetch(ticket, result, &mut report);
        }

        if batch_idx + 1 < batch_count && !options.batch_delay.is_zero() {
            source.throttle(options.batch_delay).await;
        }
    }

    for (name, waiter) in waiting {
        if let Err(err) = await_other_pass(source, cache, &name, waiter, &mut report).await {
            report.failed.push((name, err));
        }
    }

    report
}

fn settle_fetch(ticket: FetchTicket, result: SourceResult<Vec<RawRow>>, report: &mut PrefetchReport) {
    let name = ticket.stage().to_string();
    match result {
        Ok(rows) => {
            ticket.fill(rows);
            report.fetched.push(name);
        }
        Err(err) => {
            warn!(stage = %name, "stage fetch failed: {err}");
            ticket.fail(err.clone());
            report.failed.push((name, err));
        }
    }
}

/// Waits on a fetch owned by another pass; takes over if that pass is dropped.
async fn await_other_pass<S: StageSource>(
    source: &S,
    cache: &StageCache,
    stage_name: &str,
    mut waiter: oneshot::Receiver<FetchOutcome>,
    report: &mut PrefetchReport,
) -> FetchOutcome {
    loop {
        match waiter.await {
            Ok(outcome) => return outcome,
            Err(oneshot::Canceled) => match cache.claim(stage_name) {
                StageClaim::Cached => return Ok(()),
                StageClaim::InFlight(next) => waiter = next,
                StageClaim::Fetch(ticket) => {
                    debug!(stage = stage_name, "taking over abandoned stage fetch");
                    let result = source.stage_rows(stage_name).await;
                    settle_fetch(ticket, result, report);
                    return Ok(());
                }
            },
        }
    }
}

fn summaries_from_cache(
    cache: &StageCache,
    party: &Party,
    report: &PrefetchReport,
    vocabulary: StatusVocabulary,
) -> Vec<StageSummary> {
    party
        .stages_present
        .iter()
        .enumerate()
        .map(|(idx, stage)| {
            let id = idx as u32 + 1;
            match cache.get(stage) {
                Some(rows) => StageSummary::from_rows(id, stage, &rows, &party.name, vocabulary),
                None => StageSummary::unavailable(
                    id,
                    stage,
                    report.failure_for(stage).map(|err| err.to_string()),
                ),
            }
        })
        .collect()
}

/// Per-stage completion for one party, read through the cache.
pub async fn summarize_party<S: StageSource>(
    source: &S,
    cache: &StageCache,
    party: &Party,
    options: LoadOptions,
) -> Vec<StageSummary> {
    let report = prefetch_stages(source, cache, &party.stages_present, options).await;
    let summaries = summaries_from_cache(cache, party, &report, options.vocabulary);
    info!(party = %party.name, stages = summaries.len(), "stage summaries ready");
    summaries
}

/// Fills `pending_stages` for every party from one shared prefetch.
pub async fn annotate_pending<S: StageSource>(
    source: &S,
    cache: &StageCache,
    parties: &mut [Party],
    options: LoadOptions,
) -> PrefetchReport {
    let names = distinct_stages(parties.iter());
    let report = prefetch_stages(source, cache, &names, options).await;

    for party in parties.iter_mut() {
        let summaries = summaries_from_cache(cache, party, &report, options.vocabulary);
        apply_pending(party, &summaries);
    }

    info!(
        stages = names.len(),
        failed = report.failed.len(),
        "pending stages computed"
    );
    report
}

/// Fresh task rows for one (party, stage) pair.
pub async fn load_task_rows<S: StageSource>(
    source: &S,
    party_name: &str,
    stage_name: &str,
) -> SourceResult<Vec<TaskRow>> {
    let rows = source.stage_rows(stage_name).await?;
    let layout = StageLayout::classify(stage_name);
    let tasks = layout.task_rows(&rows, party_name);
    info!(
        party = party_name,
        stage = stage_name,
        ?layout,
        rows = rows.len(),
        tasks = tasks.len(),
        "tasks extracted"
    );
    Ok(tasks)
}
