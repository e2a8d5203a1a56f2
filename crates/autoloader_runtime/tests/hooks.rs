//! Lifecycle hooks and load statistics.


use autoloader_core::LoadError;
use autoloader_runtime::hooks::LoadEvent;
use autoloader_runtime::hooks::schedule::{
    OnBatchComplete, OnBatchError, OnCoalesce, OnDependencyError, OnFetchComplete, OnFetchError,
    OnFetchStart, OnRequest, OnSettle, ScheduleId,
};
use autoloader_runtime::stats::{LoadStatsPlugin, LoadStatsSnapshot};
use autoloader_runtime::{Loader, LoaderBuilder, Plugin};
use std::sync::{Arc, Mutex};
use test_utils::{MockFetcher, test_builder, test_loader};

/// Records a short label for every event it observes.
#[derive(Default)]
struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Plugin for Recorder {
    fn build(&self, loader: &mut LoaderBuilder) {
        let events = Arc::clone(&self.events);
        loader
            .hooks()
            .register_observer::<(
                OnRequest,
                OnCoalesce,
                OnFetchStart,
                OnFetchComplete,
                OnFetchError,
                OnDependencyError,
                OnSettle,
                OnBatchComplete,
                OnBatchError,
            ), _>("recorder", move |event: &LoadEvent| {
                let label = match event {
                    LoadEvent::Request { name, force } => format!("request {name} {force}"),
                    LoadEvent::Coalesced { name, waiters } => format!("coalesced {name} {waiters}"),
                    LoadEvent::FetchStart { name, .. } => format!("fetch {name}"),
                    LoadEvent::FetchComplete { name, .. } => format!("fetched {name}"),
                    LoadEvent::FetchError { name, .. } => format!("fetch failed {name}"),
                    LoadEvent::DependencyError { error } => format!("dependency failed {}", error.name()),
                    LoadEvent::Settle { name, waiters, success } => {
                        format!("settle {name} {waiters} {success}")
                    }
                    LoadEvent::BatchComplete { names, .. } => format!("batch {}", names.join(",")),
                    LoadEvent::BatchError { requested, .. } => format!("batch failed {requested}"),
                };
                events.lock().unwrap().push(label);
            })
            .expect("recorder hook registration should not fail");
    }
}

fn recorded_loader() -> (Loader, Arc<MockFetcher>, Arc<Mutex<Vec<String>>>) {
    let fetcher = Arc::new(MockFetcher::new());
    let recorder = Recorder::default();
    let events = Arc::clone(&recorder.events);
    let loader = test_builder(&fetcher).add_plugin(recorder).build();
    (loader, fetcher, events)
}

#[tokio::test]
async fn single_load_emits_lifecycle_in_order() {
    let (loader, _, events) = recorded_loader();

    loader.load_one("!lua").await.unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec!["request lua true", "fetch lua", "fetched lua", "settle lua 1 true"]
    );
}

#[tokio::test]
async fn coalesced_request_is_reported() {
    let (loader, _, events) = recorded_loader();

    let (first, second) = futures::join!(loader.load_one("go"), loader.load_one("go"));
    first.unwrap();
    second.unwrap();

    let events = events.lock().unwrap();
    assert!(events.contains(&"coalesced go 2".to_owned()));
    assert!(events.contains(&"settle go 2 true".to_owned()));
}

#[tokio::test]
async fn dependency_failure_is_reported() {
    let (loader, fetcher, events) = recorded_loader();
    loader.tables().set_dependencies("a", ["b"]);
    fetcher.fail("b");

    let error = loader.load("a").await.unwrap_err();
    assert!(matches!(error.source, LoadError::Dependency { .. }));

    let events = events.lock().unwrap();
    let position = |label: &str| events.iter().position(|event| event == label).unwrap();
    assert!(position("fetch failed b") < position("dependency failed a"));
    assert!(position("dependency failed a") < position("settle a 1 false"));
    assert!(events.contains(&"batch failed a".to_owned()));
    assert!(!events.contains(&"fetch a".to_owned()));
}

#[tokio::test]
async fn hooks_can_be_registered_after_build() {
    let (loader, _) = test_loader();
    let settled = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&settled);

    loader
        .hooks()
        .register_observer::<OnSettle, _>("late", move |event: &LoadEvent| {
            if let Some(name) = event.name() {
                recorded.lock().unwrap().push(name.to_owned());
            }
        })
        .unwrap();

    loader.load_many(["css", "sql"]).await.unwrap();

    let mut settled = settled.lock().unwrap().clone();
    settled.sort();
    assert_eq!(settled, vec!["css".to_owned(), "sql".to_owned()]);
}

#[tokio::test]
async fn stats_count_loader_activity() {
    let fetcher = Arc::new(MockFetcher::with_yields(2));
    fetcher.fail("cobol");
    let plugin = LoadStatsPlugin::default();
    let stats = plugin.stats();
    let loader = test_builder(&fetcher).add_plugin(plugin).build();

    let (first, second) = futures::join!(loader.load_one("go"), loader.load_one("go"));
    first.unwrap();
    second.unwrap();
    loader.load_one("go").await.unwrap();
    loader.load_many(["go", "cobol"]).await.unwrap_err();

    assert_eq!(
        stats.snapshot(),
        LoadStatsSnapshot {
            requests: 5,
            coalesced: 1,
            fetches_started: 2,
            fetches_succeeded: 1,
            fetches_failed: 1,
            settlements: 2,
            batches_succeeded: 0,
            batches_failed: 1,
        }
    );
}

#[tokio::test]
async fn dependency_expansion_is_not_reported_as_a_batch() {
    let (loader, fetcher, events) = recorded_loader();
    loader.tables().set_dependencies("a", ["b"]);
    loader.tables().set_dependencies("c", ["d"]);
    fetcher.fail("d");

    loader.load("a").await.unwrap();
    loader.load("c").await.unwrap_err();

    let batches: Vec<String> = events
        .lock()
        .unwrap()
        .iter()
        .filter(|event| event.starts_with("batch"))
        .cloned()
        .collect();
    assert_eq!(batches, vec!["batch a", "batch failed c"]);
}

#[tokio::test]
async fn stats_count_only_caller_batches() {
    let fetcher = Arc::new(MockFetcher::new());
    let plugin = LoadStatsPlugin::default();
    let stats = plugin.stats();
    let loader = test_builder(&fetcher).add_plugin(plugin).build();
    loader.tables().set_dependencies("tsx", ["jsx", "typescript"]);

    loader.load_many(["tsx"]).await.unwrap();

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.batches_succeeded, 1);
    assert_eq!(snapshot.batches_failed, 0);
    assert_eq!(snapshot.fetches_succeeded, 3);
}

#[tokio::test]
async fn hook_may_call_back_into_loader() {
    let (loader, _) = test_loader();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);
    let handle = loader.clone();

    loader
        .hooks()
        .register_observer::<OnSettle, _>("reentrant", move |event: &LoadEvent| {
            let schedule = ScheduleId::of::<OnSettle>();
            let _ = handle
                .hooks()
                .register_observer::<OnSettle, _>("late", |_: &LoadEvent| {});
            recorded
                .lock()
                .unwrap()
                .push((event.name().map(str::to_owned), handle.hooks().hook_count(schedule)));
        })
        .unwrap();

    loader.load_one("css").await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![(Some("css".to_owned()), 2)]);
}
