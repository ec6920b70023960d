use std::time::Duration;

use m3u::StreamEntry;
use serde::Serialize;
use tracing::info;

use crate::config::CheckConfig;
use crate::probe::{ProbeResult, ProbeTransport, Prober};

/// One probed playlist entry.
#[derive(Debug, Clone, Serialize)]
pub struct CheckedEntry {
    pub entry: StreamEntry,
    pub result: ProbeResult,
}

/// Aggregate of one full check invocation, in playlist order.
///
/// Discarded once the report is emitted; nothing is persisted.
#[derive(Debug, Serialize)]
pub struct CheckRun {
    pub checked: Vec<CheckedEntry>,
}

impl CheckRun {
    pub fn total(&self) -> usize {
        self.checked.len()
    }

    pub fn alive_count(&self) -> usize {
        self.checked.iter().filter(|c| c.result.is_alive()).count()
    }

    pub fn dead_count(&self) -> usize {
        self.total() - self.alive_count()
    }

    /// Fraction of alive entries, `None` for an empty run.
    pub fn success_rate(&self) -> Option<f64> {
        if self.checked.is_empty() {
            None
        } else {
            Some(self.alive_count() as f64 / self.total() as f64)
        }
    }

    /// Dead entries with their 1-based playlist positions.
    pub fn dead_entries(&self) -> impl Iterator<Item = (usize, &CheckedEntry)> {
        self.checked
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.result.is_alive())
            .map(|(i, c)| (i + 1, c))
    }
}

/// Progress observation handed to the caller after every probe.
#[derive(Debug)]
pub struct ProbeUpdate<'a> {
    /// 0-based position of the probed entry.
    pub index: usize,
    pub total: usize,
    pub entry: &'a StreamEntry,
    pub result: &'a ProbeResult,
}

/// Sequential playlist checker.
///
/// Probes one entry at a time in playlist order with a fixed pause between
/// consecutive entries. Concurrency is deliberately absent: it would
/// reorder results and lift the load bound on checked hosts.
pub struct Checker<T> {
    prober: Prober<T>,
    entry_delay: Duration,
}

impl<T: ProbeTransport> Checker<T> {
    pub fn new(transport: T, config: CheckConfig) -> Self {
        Self {
            prober: Prober::new(transport, config.probe.retry.clone()),
            entry_delay: config.entry_delay,
        }
    }

    /// Probe every entry and aggregate the verdicts.
    ///
    /// The observer runs after each probe with the entry's verdict; an empty
    /// entry list returns an empty run without touching the network.
    pub async fn run<F>(&self, entries: Vec<StreamEntry>, mut observe: F) -> CheckRun
    where
        F: FnMut(ProbeUpdate<'_>),
    {
        let total = entries.len();
        let mut checked = Vec::with_capacity(total);

        for (index, entry) in entries.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.entry_delay).await;
            }

            let result = self.prober.probe(&entry.url).await;
            observe(ProbeUpdate {
                index,
                total,
                entry: &entry,
                result: &result,
            });
            checked.push(CheckedEntry { entry, result });
        }

        let run = CheckRun { checked };
        info!(
            total = run.total(),
            alive = run.alive_count(),
            dead = run.dead_count(),
            "check run finished"
        );
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use url::Url;

    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<u16, TransportError>>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<u16, TransportError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }

        fn next(&self) -> Result<u16, TransportError> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("script exhausted")
        }
    }

    #[async_trait]
    impl ProbeTransport for ScriptedTransport {
        async fn head(&self, _url: &Url) -> Result<u16, TransportError> {
            self.next()
        }

        async fn get_range(&self, _url: &Url) -> Result<u16, TransportError> {
            self.next()
        }
    }

    fn entry(host: &str, title: &str, group: &str) -> StreamEntry {
        StreamEntry {
            url: Url::parse(&format!("http://{host}/stream")).unwrap(),
            title: title.to_owned(),
            group_title: group.to_owned(),
        }
    }

    fn checker(script: Vec<Result<u16, TransportError>>) -> Checker<ScriptedTransport> {
        Checker::new(ScriptedTransport::new(script), CheckConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn aggregates_alive_and_dead_in_playlist_order() {
        // Three entries: 200, 404, then a timeout on both attempts.
        let checker = checker(vec![
            Ok(200),
            Ok(404),
            Err(TransportError::Timeout(10_000)),
            Err(TransportError::Timeout(10_000)),
        ]);
        let entries = vec![
            entry("one.example", "One", "News"),
            entry("two.example", "Two", "News"),
            entry("three.example", "Three", ""),
        ];

        let run = checker.run(entries, |_| {}).await;

        assert_eq!(run.total(), 3);
        assert_eq!(run.alive_count(), 1);
        assert_eq!(run.dead_count(), 2);
        let rate = run.success_rate().unwrap();
        assert!((rate - 1.0 / 3.0).abs() < 1e-9);

        let dead: Vec<_> = run.dead_entries().collect();
        assert_eq!(dead.len(), 2);
        assert_eq!(dead[0].0, 2);
        assert_eq!(dead[0].1.result.error(), Some("HTTP 404"));
        assert_eq!(dead[1].0, 3);
        assert_eq!(dead[1].1.result.error(), Some("Timeout after 10000ms"));
    }

    #[tokio::test]
    async fn empty_playlist_probes_nothing_and_has_no_rate() {
        // An empty script panics on any request, so finishing proves the
        // network was never touched.
        let checker = checker(vec![]);
        let mut observations = 0;
        let run = checker.run(Vec::new(), |_| observations += 1).await;

        assert_eq!(run.total(), 0);
        assert_eq!(run.success_rate(), None);
        assert_eq!(observations, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn observer_sees_every_entry_in_order() {
        let checker = checker(vec![Ok(200), Ok(500), Ok(301)]);
        let entries = vec![
            entry("a.example", "A", ""),
            entry("b.example", "B", ""),
            entry("c.example", "C", ""),
        ];

        let mut seen = Vec::new();
        let run = checker
            .run(entries, |update| {
                seen.push((update.index, update.total, update.result.is_alive()));
            })
            .await;

        assert_eq!(seen, vec![(0, 3, true), (1, 3, false), (2, 3, true)]);
        assert_eq!(run.checked[1].result.error(), Some("HTTP 500"));
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_between_consecutive_entries() {
        let checker = checker(vec![Ok(200), Ok(200), Ok(200)]);
        let entries = vec![
            entry("a.example", "A", ""),
            entry("b.example", "B", ""),
            entry("c.example", "C", ""),
        ];

        let started = tokio::time::Instant::now();
        checker.run(entries, |_| {}).await;

        // Two inter-entry pauses for three entries, none before the first.
        assert_eq!(started.elapsed(), Duration::from_millis(2000));
    }
}
