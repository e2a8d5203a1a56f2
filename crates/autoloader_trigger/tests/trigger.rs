//! Content-settled handling against a real loader.

use async_trait::async_trait;
use autoloader_core::{FetchError, Fetcher, GrammarRegistry, LoaderConfig, Tables};
use autoloader_runtime::Loader;
use autoloader_trigger::{AutoloadTrigger, ContentSettled, Element, Highlighter, TriggerOutcome};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Fetches {
    calls: Mutex<Vec<String>>,
    failing: Vec<String>,
}

#[async_trait]
impl Fetcher for Fetches {
    async fn fetch(&self, locator: &str) -> Result<(), FetchError> {
        self.calls.lock().unwrap().push(locator.to_owned());
        if self.failing.iter().any(|failing| failing == locator) {
            Err(FetchError::transport(locator, "offline"))
        } else {
            Ok(())
        }
    }
}

struct Block {
    id: u32,
    dependencies: Option<String>,
}

impl Element for Block {
    fn attribute(&self, _name: &str) -> Option<String> {
        self.dependencies.clone()
    }

    fn container_attribute(&self, _name: &str) -> Option<String> {
        None
    }
}

fn block(dependencies: Option<&str>) -> Block {
    Block {
        id: 7,
        dependencies: dependencies.map(Into::into),
    }
}

#[derive(Default, Clone)]
struct Renders(Arc<Mutex<Vec<u32>>>);

impl Highlighter<Block> for Renders {
    fn rerender(&self, element: &Block) {
        self.0.lock().unwrap().push(element.id);
    }
}

fn setup(fetcher: &Arc<Fetches>, registry: GrammarRegistry) -> (AutoloadTrigger<Block, Renders>, Renders) {
    let loader = Loader::builder(Arc::clone(fetcher))
        .with_config(
            LoaderConfig::default()
                .with_base_path("")
                .with_prefix("")
                .with_extension("")
                .with_use_minified(false),
        )
        .with_tables(Tables::new())
        .with_registry(registry)
        .build();
    let renders = Renders::default();
    (AutoloadTrigger::new(loader, renders.clone()), renders)
}

async fn finish(outcome: TriggerOutcome) {
    match outcome {
        TriggerOutcome::Loading(handle) => handle.await.unwrap(),
        other => panic!("expected a load, got {other:?}"),
    }
}

#[tokio::test]
async fn diff_language_loads_diff_and_target() {
    let fetcher = Arc::new(Fetches::default());
    let (trigger, renders) = setup(&fetcher, GrammarRegistry::new());

    finish(trigger.on_content_settled(ContentSettled::new(block(None), "diff-python"))).await;

    let mut calls = fetcher.calls.lock().unwrap().clone();
    calls.sort();
    assert_eq!(calls, vec!["diff".to_owned(), "python".to_owned()]);
    assert_eq!(*renders.0.lock().unwrap(), vec![7]);
}

#[tokio::test]
async fn declared_dependencies_load_with_language() {
    let fetcher = Arc::new(Fetches::default());
    let (trigger, renders) = setup(&fetcher, GrammarRegistry::new());

    finish(trigger.on_content_settled(ContentSettled::new(block(Some("markup, css")), "php"))).await;

    let mut calls = fetcher.calls.lock().unwrap().clone();
    calls.sort();
    assert_eq!(calls, vec!["css".to_owned(), "markup".to_owned(), "php".to_owned()]);
    assert_eq!(renders.0.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn available_grammars_are_left_alone() {
    let fetcher = Arc::new(Fetches::default());
    let (trigger, renders) = setup(&fetcher, GrammarRegistry::with_grammars(["markup", "css"]));

    let outcome = trigger.on_content_settled(ContentSettled::new(block(Some("markup")), "css"));

    assert!(matches!(outcome, TriggerOutcome::AlreadyAvailable));
    assert!(fetcher.calls.lock().unwrap().is_empty());
    assert!(renders.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failure_skips_rerender() {
    let fetcher = Arc::new(Fetches {
        failing: vec!["cobol".into()],
        ..Fetches::default()
    });
    let (trigger, renders) = setup(&fetcher, GrammarRegistry::new());

    finish(trigger.on_content_settled(ContentSettled::new(block(None), "cobol"))).await;

    assert!(renders.0.lock().unwrap().is_empty());
    assert!(!trigger.loader().is_loaded("cobol"));
}

#[tokio::test]
async fn ignored_and_incomplete_notifications_do_nothing() {
    let fetcher = Arc::new(Fetches::default());
    let (trigger, _) = setup(&fetcher, GrammarRegistry::new());

    let ignored = trigger.on_content_settled(ContentSettled::new(block(None), "none"));
    let no_language = trigger.on_content_settled(ContentSettled {
        element: Some(Arc::new(block(None))),
        language: None,
    });
    let no_element = trigger.on_content_settled(ContentSettled {
        element: None,
        language: Some("rust".into()),
    });

    assert!(matches!(ignored, TriggerOutcome::Ignored));
    assert!(matches!(no_language, TriggerOutcome::Ignored));
    assert!(matches!(no_element, TriggerOutcome::Ignored));
    assert!(fetcher.calls.lock().unwrap().is_empty());
}
