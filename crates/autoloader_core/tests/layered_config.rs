//! Tables and locators configured from a JSON configuration.

use autoloader_core::{LoadSpec, LoaderConfig, Locator, Tables};

const CONFIG: &str = r#"{
    "basePath": "/assets/grammars/",
    "useMinified": false,
    "aliasOverrides": { "js": "typescript", "vue": "markup" },
    "dependencyOverrides": { "typescript": "javascript", "tsx": [] },
    "locatorOverrides": { "markup": "/vendor/markup.js" }
}"#;

fn configured() -> (Tables, Locator) {
    let config = LoaderConfig::from_json(CONFIG).expect("configuration should parse");
    let tables = Tables::with_presets();
    tables.apply_config(&config);
    (tables, Locator::from_config(&config))
}

#[test]
fn alias_overrides_win_over_presets() {
    let (tables, _) = configured();
    assert_eq!(tables.resolve_alias("js"), "typescript");
    assert_eq!(tables.resolve_alias("vue"), "markup");
    assert_eq!(tables.resolve_alias("py"), "python");
}

#[test]
fn dependency_overrides_replace_presets() {
    let (tables, _) = configured();
    assert_eq!(tables.dependencies("typescript"), vec!["javascript".to_string()]);
    assert!(tables.dependencies("tsx").is_empty());
    assert_eq!(
        tables.dependencies("jsx"),
        vec!["markup".to_string(), "javascript".to_string()]
    );
}

#[test]
fn requested_name_resolves_to_locator() {
    let (tables, locator) = configured();

    let spec = LoadSpec::parse("!html");
    assert!(spec.force());
    let canonical = tables.resolve_alias(spec.name());
    assert_eq!(locator.locate(&canonical), "/vendor/markup.js");

    let canonical = tables.resolve_alias("rb");
    assert_eq!(locator.locate(&canonical), "/assets/grammars/prism-ruby.js");
}

#[test]
fn runtime_overrides_apply_after_config() {
    let (tables, _) = configured();
    tables.set_dependencies("typescript", ["javascript", "clike"]);
    assert_eq!(
        tables.dependencies("typescript"),
        vec!["javascript".to_string(), "clike".to_string()]
    );
    assert_eq!(tables.remove_dependencies("typescript").as_deref().map(<[String]>::len), Some(2));
    assert_eq!(tables.dependencies("typescript"), vec!["javascript".to_string()]);
}
