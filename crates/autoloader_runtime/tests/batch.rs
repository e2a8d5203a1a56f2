//! Batch loading: fan-out, first-failure reporting and the empty batch.


use autoloader_core::LoadError;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use test_utils::{MockFetcher, test_builder, test_loader};

#[tokio::test]
async fn batch_returns_names_as_requested() {
    let (loader, fetcher) = test_loader();
    loader.tables().set_alias("js", "javascript");

    let names = loader.load_many(["js", "css"]).await.unwrap();

    assert_eq!(names, vec!["js".to_owned(), "css".to_owned()]);
    assert_eq!(fetcher.call_count("javascript"), 1);
    assert_eq!(fetcher.call_count("css"), 1);
}

#[tokio::test]
async fn batch_reports_failing_member() {
    let (loader, fetcher) = test_loader();
    fetcher.fail("b");

    let error = loader.load_many(["a", "b", "c"]).await.unwrap_err();

    assert_eq!(error.requested, "b");
    assert!(matches!(error.source, LoadError::Fetch { ref name, .. } if name == "b"));
    assert_eq!(error.to_string(), "failed to load 'b'");
}

#[tokio::test]
async fn batch_failure_is_reported_exactly_once() {
    let (loader, fetcher) = test_loader();
    fetcher.fail("b");

    let successes = Arc::new(Mutex::new(Vec::new()));
    let failures = Arc::new(Mutex::new(Vec::new()));
    let on_success = {
        let successes = Arc::clone(&successes);
        move |names: Vec<String>| successes.lock().unwrap().push(names)
    };
    let on_failure = {
        let failures = Arc::clone(&failures);
        move |name: String| failures.lock().unwrap().push(name)
    };

    loader
        .load_many_with(["a", "b", "c"], on_success, on_failure)
        .await
        .unwrap();

    // Let the remaining members settle too.
    loader.load_many(["a", "c"]).await.unwrap();

    assert!(successes.lock().unwrap().is_empty());
    assert_eq!(*failures.lock().unwrap(), vec!["b".to_owned()]);
}

#[tokio::test]
async fn batch_members_load_concurrently() {
    let (loader, fetcher) = test_loader();

    let batch = loader.load_many(["a", "b", "c"]);
    assert_eq!(loader.store().pending_count("a"), 1);
    assert_eq!(loader.store().pending_count("c"), 1);
    batch.await.unwrap();

    let log = fetcher.log();
    let first_end = log
        .iter()
        .position(|entry| matches!(entry, test_utils::FetchLog::End(_)))
        .unwrap();
    assert_eq!(first_end, 3, "every fetch starts before any settles: {log:?}");
}

#[tokio::test]
async fn empty_batch_succeeds_without_fetching() {
    let (loader, fetcher) = test_loader();

    let names = loader.load_many(Vec::<String>::new()).await.unwrap();

    assert!(names.is_empty());
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn empty_batch_calls_success_once() {
    let (loader, _) = test_loader();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);

    loader
        .load_many_with(
            Vec::<String>::new(),
            move |names| recorded.lock().unwrap().push(names),
            |name| panic!("unexpected failure for {name}"),
        )
        .await
        .unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![Vec::<String>::new()]);
}

#[tokio::test]
async fn single_name_load_is_a_batch_of_one() {
    let (loader, fetcher) = test_loader();
    fetcher.fail("cobol");

    assert_eq!(loader.load("go").await.unwrap(), vec!["go".to_owned()]);
    assert_eq!(loader.load("cobol").await.unwrap_err().requested, "cobol");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn batch_fails_iff_a_member_fails(
        names in proptest::collection::btree_set("[a-f]{1,2}", 0..6),
        failing in proptest::collection::btree_set("[a-f]{1,2}", 0..3),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let fetcher = Arc::new(MockFetcher::with_yields(1));
        for locator in &failing {
            fetcher.fail(locator);
        }
        let loader = test_builder(&fetcher).build();
        let requested: Vec<String> = names.iter().cloned().collect();

        let result = runtime.block_on(async { loader.load_many(requested.clone()).await });
        let failed: BTreeSet<&String> = names.intersection(&failing).collect();

        match result {
            Ok(loaded) => {
                prop_assert!(failed.is_empty());
                prop_assert_eq!(loaded, requested);
                prop_assert_eq!(fetcher.calls().len(), names.len());
            }
            Err(error) => prop_assert!(failed.contains(&error.requested)),
        }
    }
}
