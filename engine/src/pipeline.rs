//! The refresh pipeline: fetch, normalize, estimate, summarize & rank.
//!
//! `Engine::refresh()` is the single entry point for both manual and timer-driven refreshes.
//! Its only suspension point is the fetch itself, everything after is `process()` which is
//! synchronous and pure.
//!
//! Every call takes a sequence number before fetching so that the `Dashboard` can tell which
//! of several overlapping refreshes is the latest one.
//!

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, trace};

use contrail_formats::{normalize, FlightRecord, StateList};
use contrail_sources::{FetchError, Fetchable};

use crate::{rank, summarize_at, FleetSummary, PipelineOptions, RankedFlight, Stats};

/// Result of one successful poll.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub seq: u64,
    pub summary: FleetSummary,
    pub ranking: Vec<RankedFlight>,
    pub flights: Vec<FlightRecord>,
}

/// A failed poll, tagged with its sequence number.
///
#[derive(Clone, Debug, Error, PartialEq)]
#[error("poll #{seq} failed: {source}")]
pub struct RefreshError {
    pub seq: u64,
    #[source]
    pub source: FetchError,
}

/// Run the synchronous part of the pipeline on a decoded snapshot.
///
/// The summary is timestamped with the snapshot time when there is one.
///
#[tracing::instrument(skip(list, opts))]
pub fn process(seq: u64, list: &StateList, opts: &PipelineOptions) -> Snapshot {
    let timestamp: DateTime<Utc> = list
        .time
        .and_then(|t| Utc.timestamp_opt(t, 0).single())
        .unwrap_or_else(Utc::now);

    let flights = normalize(list);
    let summary = summarize_at(&flights, timestamp);
    let ranking = rank(&flights, opts.top_n);

    debug!("#{seq}: {summary}");
    Snapshot {
        seq,
        summary,
        ranking,
        flights,
    }
}

#[derive(Debug)]
pub struct Engine<S: Fetchable> {
    source: S,
    opts: PipelineOptions,
    seq: AtomicU64,
    // Counters
    polls: AtomicU64,
    bytes: AtomicU64,
    hits: AtomicU64,
    err: AtomicU64,
    flights: AtomicUsize,
    start: Instant,
}

impl<S: Fetchable> Engine<S> {
    #[tracing::instrument(skip(opts))]
    pub fn new(source: S, opts: PipelineOptions) -> Self {
        trace!("engine::new({})", source.name());

        Engine {
            source,
            opts,
            seq: AtomicU64::new(0),
            polls: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            err: AtomicU64::new(0),
            flights: AtomicUsize::new(0),
            start: Instant::now(),
        }
    }

    /// Poll once and run the whole pipeline.
    ///
    /// Any failure aborts the poll, there is no retry, the next trigger will try again.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Snapshot, RefreshError> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.polls.fetch_add(1, Ordering::Relaxed);
        trace!("refresh #{seq} from {}", self.source.name());

        let list = match self.fetch().await {
            Ok(list) => list,
            Err(source) => {
                self.err.fetch_add(1, Ordering::Relaxed);
                let e = RefreshError { seq, source };
                error!("{e}");
                return Err(e);
            }
        };

        let snap = process(seq, &list, &self.opts);

        self.hits.fetch_add(1, Ordering::Relaxed);
        self.flights.store(snap.flights.len(), Ordering::Relaxed);
        info!(
            "#{seq}: {} flights out of {} states",
            snap.summary.count,
            list.len()
        );
        Ok(snap)
    }

    async fn fetch(&self) -> Result<StateList, FetchError> {
        let body = self.source.fetch().await?;
        self.bytes.fetch_add(body.len() as u64, Ordering::Relaxed);

        Ok(StateList::from_json(&body)?)
    }

    /// Polling side of the session counters.
    ///
    pub fn stats(&self) -> Stats {
        Stats {
            tm: self.start.elapsed().as_secs(),
            polls: self.polls.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            flights: self.flights.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            err: self.err.load(Ordering::Relaxed),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use rstest::rstest;

    use contrail_sources::Opensky;

    use super::*;

    /// A, B and C are kept, D has no longitude.
    ///
    const BODY: &str = r##"{"time":1700000000,"states":[
        ["aaaaaa","A1  ","Aland",null,null,10.0,50.0,9000.0,false,100.0,90.0,null,null,9100.0,null,false,0],
        ["bbbbbb","B2","Bland",null,null,11.0,51.0,8000.0,false,50.0,null,null,null,null,null,false,0],
        ["cccccc","","Cland",null,null,12.0,52.0,null,false,null,180.0,null,null,null,null,false,0],
        ["dddddd","D4","Dland",null,null,null,53.0,7000.0,false,300.0,0.0,null,null,null,null,false,0]
    ]}"##;

    #[derive(Debug)]
    struct Canned(&'static str);

    impl Fetchable for Canned {
        fn name(&self) -> String {
            "canned".to_string()
        }

        async fn fetch(&self) -> Result<String, FetchError> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl Fetchable for Broken {
        fn name(&self) -> String {
            "broken".to_string()
        }

        async fn fetch(&self) -> Result<String, FetchError> {
            Err(FetchError::Transport("connection refused".to_string()))
        }
    }

    fn opts(top_n: usize) -> PipelineOptions {
        PipelineOptions {
            top_n,
            ..Default::default()
        }
    }

    #[test]
    fn test_process_three_flights() -> eyre::Result<()> {
        let list = StateList::from_json(BODY)?;
        let snap = process(7, &list, &opts(2));

        assert_eq!(7, snap.seq);
        assert_eq!(3, snap.summary.count);
        assert_eq!(3, snap.flights.len());
        assert!((snap.summary.average_velocity_kmh - 180.).abs() < 1e-9);
        assert_eq!(Utc.timestamp_opt(1700000000, 0).unwrap(), snap.summary.timestamp);

        let ids: Vec<_> = snap.ranking.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(vec!["aaaaaa", "bbbbbb"], ids);
        assert!((snap.ranking[0].emission_rate_kg_per_hour - 5940.).abs() < 1e-9);
        assert!((snap.ranking[1].emission_rate_kg_per_hour - 2970.).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_process_empty() -> eyre::Result<()> {
        let list = StateList::from_json(r##"{"time":1700000000,"states":null}"##)?;
        let snap = process(1, &list, &opts(10));

        assert_eq!(0, snap.summary.count);
        assert_eq!(0., snap.summary.average_emission_rate_kg_per_hour);
        assert!(snap.ranking.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_engine_refresh() -> eyre::Result<()> {
        let engine = Engine::new(Canned(BODY), opts(10));

        let snap = engine.refresh().await?;
        assert_eq!(1, snap.seq);
        assert_eq!(3, snap.ranking.len());

        let snap = engine.refresh().await?;
        assert_eq!(2, snap.seq);

        let stats = engine.stats();
        assert_eq!(2, stats.polls);
        assert_eq!(2, stats.hits);
        assert_eq!(0, stats.err);
        assert_eq!(3, stats.flights);
        assert_eq!(2 * BODY.len() as u64, stats.bytes);
        Ok(())
    }

    #[tokio::test]
    async fn test_engine_refresh_failure() {
        let engine = Engine::new(Broken, opts(10));

        let err = engine.refresh().await.unwrap_err();
        assert_eq!(1, err.seq);
        assert_eq!(
            FetchError::Transport("connection refused".to_string()),
            err.source
        );
        assert_eq!(1, engine.stats().err);
    }

    #[rstest]
    #[case("<html>Too many requests</html>")]
    #[case("[1, 2, 3]")]
    #[case("")]
    #[tokio::test]
    async fn test_engine_refresh_bad_body(#[case] body: &'static str) {
        let engine = Engine::new(Canned(body), opts(10));

        let err = engine.refresh().await.unwrap_err();
        assert!(matches!(err.source, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_engine_refresh_http() -> eyre::Result<()> {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET).path("/states/all");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(BODY);
            })
            .await;

        let site = Opensky::new().base_url(&server.base_url());
        let engine = Engine::new(site, opts(1));
        let snap = engine.refresh().await?;

        m.assert_async().await;
        assert_eq!(1, snap.ranking.len());
        assert_eq!("A1", snap.ranking[0].callsign);
        Ok(())
    }

    #[tokio::test]
    async fn test_engine_refresh_http_500() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET).path("/states/all");
                then.status(500);
            })
            .await;

        let site = Opensky::new().base_url(&server.base_url());
        let engine = Engine::new(site, opts(10));
        let err = engine.refresh().await.unwrap_err();

        m.assert_async().await;
        assert!(matches!(err.source, FetchError::Status { status: 500, .. }));
        assert!(err.to_string().starts_with("poll #1 failed: HTTP Error(500)"));
    }
}
