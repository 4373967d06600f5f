//! calscrape daemon entry point.
//!
//! Wires the HTTP fetcher, the REST snapshot store, and the logging sink
//! into the poll scheduler, then runs until the process is killed.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::info;

use calscrape_core::{TracingConfig, init_tracing};
use calscrape_crawler::{HttpFetcher, LogSink, RestStore};
use calscrape_server::{
    PollScheduler, SchedulerConfig, ServerConfig, ServerError, run_cycle,
};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    init_tracing(TracingConfig::daemon())?;

    let config = ServerConfig::from_env()?;
    let fetcher = Arc::new(HttpFetcher::new(
        config.calendar_url.clone(),
        config.request_timeout,
    )?);
    let store = Arc::new(RestStore::new(
        config.store_url.clone(),
        config.request_timeout,
    )?);
    let sink = Arc::new(LogSink);

    let base_year = Utc::now().year();
    info!(
        base_year,
        calendar_url = %config.calendar_url,
        poll_interval_secs = config.poll_interval.as_secs(),
        "calscrape daemon starting"
    );

    let concurrency = config.fetch_concurrency;
    let scheduler = PollScheduler::new(SchedulerConfig::new(base_year, config.poll_interval));
    scheduler
        .run(move |year| {
            let fetcher = fetcher.clone();
            let store = store.clone();
            let sink = sink.clone();
            async move {
                run_cycle(
                    fetcher.as_ref(),
                    store.as_ref(),
                    sink.as_ref(),
                    year,
                    concurrency,
                )
                .await
                .map_err(|error| error.to_string())
            }
        })
        .await;

    Ok(())
}
