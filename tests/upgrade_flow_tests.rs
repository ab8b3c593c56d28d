use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use upgrade_wizard::{
    CompletionStore, ExecutionSession, FINAL_SCHEMA, FileCompletionStore, FormValues,
    HostContext, INITIAL_SCHEMA, Invocation, MemorySchema, OrchestrationEngine, Registry,
    SchemaBootstrap, SchemaConnection, SessionOutput, SessionView, SqlWizardSpec, Status,
    UpgradeConfig,
};

const EXPECTED_SCHEMA: &str = "
    CREATE TABLE pages (uid int, title text, slug varchar(2048));
    CREATE TABLE sys_note (uid int, message text);
";

const BOOTSTRAP_SCHEMA: &str = "
    CREATE TABLE cache_hash (id int, identifier varchar(250), content text);
";

const CONFIG: &str = r#"{
    "target_version": "12.4.0",
    "expected_schema": "tables.sql",
    "bootstrap_schema": "cache.sql",
    "wizards": [
        {
            "identifier": "pagesSlug",
            "title": "Introduce URL parts (slugs) to all pages",
            "statements": ["ALTER TABLE pages ADD COLUMN slug_locked int"]
        },
        {
            "identifier": "dropLegacy",
            "title": "Remove legacy tables",
            "requires_confirmation": true,
            "statements": []
        }
    ]
}"#;

struct Installation {
    _dir: TempDir,
    schema: Arc<MemorySchema>,
    completions: Arc<FileCompletionStore>,
    engine: OrchestrationEngine,
}

fn installation() -> Installation {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tables.sql"), EXPECTED_SCHEMA).unwrap();
    fs::write(dir.path().join("cache.sql"), BOOTSTRAP_SCHEMA).unwrap();
    let config_path = dir.path().join("upgrade.json");
    fs::write(&config_path, CONFIG).unwrap();

    let config = UpgradeConfig::from_json_file(&config_path).unwrap();

    let schema = Arc::new(MemorySchema::new());
    schema
        .execute("CREATE TABLE pages (uid int, title varchar(255))")
        .unwrap();
    let completions = Arc::new(FileCompletionStore::new(dir.path().join("completions.json")));
    let host = HostContext::new(schema.clone(), completions.clone());

    let registry = config.build_registry().unwrap();
    let bootstrap = SchemaBootstrap::new(
        schema.clone(),
        config.load_bootstrap_schema().unwrap().unwrap(),
    );
    let engine = OrchestrationEngine::from_config(&config, registry, host)
        .unwrap()
        .with_bootstrap(bootstrap);

    Installation {
        _dir: dir,
        schema,
        completions,
        engine,
    }
}

fn run(installation: &Installation, invocation: Invocation) -> SessionOutput {
    ExecutionSession::new(&installation.engine)
        .run(&invocation)
        .unwrap()
}

fn pending(output: &SessionOutput) -> Vec<String> {
    match &output.view {
        SessionView::Pending(report) => report.pending.iter().map(|p| p.identifier.clone()).collect(),
        other => panic!("expected a pending list, got {:?}", other),
    }
}

fn next(output: &SessionOutput) -> Option<String> {
    match &output.view {
        SessionView::Update(report) => report.next_identifier.clone(),
        other => panic!("expected an update report, got {:?}", other),
    }
}

#[test]
fn test_full_upgrade_path() {
    let site = installation();

    // Missing tables and columns come first and hide everything else.
    let output = run(&site, Invocation::list());
    assert_eq!(pending(&output), vec![INITIAL_SCHEMA]);
    assert!(site.schema.catalog().unwrap().table_exists("cache_hash"));

    let output = run(
        &site,
        Invocation::perform_update(INITIAL_SCHEMA).show_database_queries(true),
    );
    let result = output.result.clone().unwrap();
    assert_eq!(result.status, Status::Ok);
    assert_eq!(
        result.diagnostics.unwrap(),
        vec![
            "CREATE TABLE sys_note (uid INTEGER, message TEXT)".to_string(),
            "ALTER TABLE pages ADD COLUMN slug VARCHAR(2048)".to_string(),
        ]
    );
    assert_eq!(next(&output).as_deref(), Some("pagesSlug"));

    // Now the ordinary wizards show up, the type change waits at the end.
    let output = run(&site, Invocation::list());
    assert_eq!(
        pending(&output),
        vec!["pagesSlug", "dropLegacy", FINAL_SCHEMA]
    );

    let output = run(&site, Invocation::perform_update("pagesSlug"));
    assert_eq!(output.result.as_ref().unwrap().title, "Update successful");
    assert!(site.completions.is_done("pagesSlug").unwrap());
    assert_eq!(next(&output).as_deref(), Some("dropLegacy"));

    // Confirmation is required.
    let output = run(&site, Invocation::perform_update("dropLegacy"));
    assert_eq!(output.result.as_ref().unwrap().title, "Input parameter broken");
    assert!(!site.completions.is_done("dropLegacy").unwrap());

    let mut values = FormValues::new();
    values.set_field("dropLegacy", "confirm", "1");
    let output = run(
        &site,
        Invocation::perform_update("dropLegacy").with_values(values),
    );
    assert_eq!(output.result.as_ref().unwrap().status, Status::Ok);
    assert_eq!(next(&output).as_deref(), Some(FINAL_SCHEMA));

    let output = run(&site, Invocation::list());
    assert_eq!(pending(&output), vec![FINAL_SCHEMA]);

    let output = run(&site, Invocation::perform_update(FINAL_SCHEMA));
    assert_eq!(output.result.as_ref().unwrap().status, Status::Ok);
    assert_eq!(next(&output), None);

    let output = run(&site, Invocation::list());
    match &output.view {
        SessionView::Pending(report) => {
            assert!(report.pending.is_empty());
            assert_eq!(report.percent_complete, 100);
        }
        other => panic!("expected a pending list, got {:?}", other),
    }
    let pages = site.schema.catalog().unwrap();
    assert_eq!(pages.column("pages", "title").unwrap().data_type, "TEXT");
    assert!(pages.column("pages", "slug_locked").is_some());
}

#[test]
fn test_completions_survive_a_new_process() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("completions.json");

    FileCompletionStore::new(&path).mark_done("pagesSlug").unwrap();

    let reopened = FileCompletionStore::new(&path);
    assert!(reopened.is_done("pagesSlug").unwrap());
    assert!(!reopened.is_done("dropLegacy").unwrap());
}

#[test]
fn test_schema_file_matches_completion_markers_without_explicit_save() {
    let dir = TempDir::new().unwrap();
    let catalog_path = dir.path().join("catalog.json");
    let completions_path = dir.path().join("completions.json");

    {
        let schema = Arc::new(MemorySchema::open(&catalog_path).unwrap());
        schema.execute("CREATE TABLE pages (uid int)").unwrap();
        let completions = Arc::new(FileCompletionStore::new(&completions_path));

        let mut registry = Registry::new();
        registry
            .register(
                SqlWizardSpec::new("pagesSlug", "Add slugs")
                    .statement("ALTER TABLE pages ADD COLUMN slug text")
                    .into_descriptor(),
            )
            .unwrap();
        let engine =
            OrchestrationEngine::new(registry, HostContext::new(schema, completions), 12_004_000);

        let output = ExecutionSession::new(&engine)
            .run(&Invocation::perform_update("pagesSlug"))
            .unwrap();
        assert_eq!(output.result.as_ref().unwrap().status, Status::Ok);
    }

    let reopened = MemorySchema::open(&catalog_path).unwrap();
    assert!(FileCompletionStore::new(&completions_path).is_done("pagesSlug").unwrap());
    assert!(reopened.catalog().unwrap().column("pages", "slug").is_some());
}
