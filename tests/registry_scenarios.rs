mod common;

use common::Sandbox;
use logreg::logging::SinkTarget;
use logreg::{ConsolePolicy, Encoder, Environment, InitEvent, LoggerRegistry, Severity};

#[test]
fn absent_config_synthesizes_default_logger() {
    let sandbox = Sandbox::new("billing");
    let registry = sandbox.build();

    let default = registry.resolve(&[]);
    assert_eq!(default.name(), "default");
    assert_eq!(default.file_path(), Some(sandbox.log_file("billing.log").as_path()));
    assert_eq!(default.level(), Severity::Info);
    assert_eq!(default.environment(), Environment::Prod);
    assert_eq!(default.cores()[0].encoder, Encoder::Json);

    assert!(matches!(
        registry.events(),
        [InitEvent::ConfigUnavailable { .. }, InitEvent::DefaultSynthesized]
    ));
    assert!(sandbox.log_file("billing.log").exists());
}

#[test]
fn dev_default_renders_text_and_keeps_warn_off_stdout() {
    let sandbox = Sandbox::new("billing");
    sandbox.write_config(
        r#"{"default": {"level": "debug", "env": "dev", "filename": "app.log", "maxsize": 10}}"#,
    );
    let registry = sandbox.build();

    let default = registry.resolve(&[]);
    assert_eq!(default.file_path(), Some(sandbox.log_file("app.log").as_path()));
    assert!(default.cores().iter().all(|core| core.encoder == Encoder::Text));
    assert!(default.enabled(Severity::Warn));

    default.warn("cache nearly full");

    assert!(sandbox.read_log("app.log").contains("cache nearly full"));
    assert!(sandbox.stdout.contents().is_empty());
    assert!(sandbox.stderr.contents().is_empty());
    assert!(registry.events().is_empty());
}

#[test]
fn default_tee_routes_by_severity() {
    let sandbox = Sandbox::new("billing");
    let registry = sandbox.build();
    let default = registry.default_logger();

    default.debug("not recorded");
    default.info("started");
    default.error("failed");
    logreg::fatal!(default, attempt = 3, "gave up");

    let file = sandbox.read_log("billing.log");
    assert!(!file.contains("not recorded"));
    assert!(file.contains("started") && file.contains("failed") && file.contains("gave up"));

    let stdout = sandbox.stdout.contents();
    assert!(stdout.contains("started"));
    assert!(!stdout.contains("failed"));

    let stderr = sandbox.stderr.contents();
    assert!(stderr.contains("failed") && stderr.contains("gave up"));
    assert!(!stderr.contains("started"));
}

#[test]
fn named_logger_without_default_entry() {
    let sandbox = Sandbox::new("billing");
    sandbox.write_config(r#"{"svc": {"level": "error", "filename": "svc.log"}}"#);
    let registry = sandbox.build();

    let svc = registry.resolve(&["svc"]);
    assert_eq!(svc.name(), "svc");
    assert!(registry.resolve(&["missing", "svc"]).ptr_eq(svc));

    let default = registry.resolve(&[]);
    assert_eq!(default.name(), "default");
    assert!(!default.ptr_eq(svc));
    assert_eq!(default.file_path(), Some(sandbox.log_file("billing.log").as_path()));
    assert_eq!(registry.events(), &[InitEvent::DefaultSynthesized]);

    // Named loggers have no console cores.
    assert_eq!(svc.cores().len(), 1);
    svc.info("below threshold");
    svc.error("at threshold");
    let file = sandbox.read_log("svc.log");
    assert!(!file.contains("below threshold"));
    assert!(file.contains("at threshold"));
    assert!(sandbox.stderr.contents().is_empty());
}

#[test]
fn configured_default_matches_default_name() {
    let sandbox = Sandbox::new("billing");
    sandbox.write_config(r#"{"default": {"filename": "main.log"}, "svc": {"filename": "svc.log"}}"#);
    let registry = sandbox.build();

    assert!(registry.resolve(&[]).ptr_eq(registry.resolve(&["default"])));
    assert_eq!(registry.names(), vec!["default", "svc"]);
}

#[test]
fn duplicate_entries_keep_first_registration() {
    let sandbox = Sandbox::new("billing");
    sandbox.write_config(
        r#"{
            "svc": {"filename": "first.log", "level": "warn"},
            "default": {"filename": "main.log"},
            "svc": {"filename": "second.log", "level": "debug"},
            "default": {"filename": "other.log"}
        }"#,
    );
    let registry = sandbox.build();

    let svc = registry.resolve(&["svc"]);
    assert_eq!(svc.file_path(), Some(sandbox.log_file("first.log").as_path()));
    assert_eq!(svc.level(), Severity::Warn);
    assert_eq!(
        registry.default_logger().file_path(),
        Some(sandbox.log_file("main.log").as_path())
    );

    // Dropped entries never open their files.
    assert!(!sandbox.log_file("second.log").exists());
    assert!(!sandbox.log_file("other.log").exists());
    assert_eq!(
        registry.events(),
        &[
            InitEvent::DuplicateLogger { name: "svc".to_string() },
            InitEvent::DuplicateLogger { name: "default".to_string() },
        ]
    );
}

#[test]
fn malformed_config_degrades_to_synthesized_default() {
    let sandbox = Sandbox::new("billing");
    sandbox.write_config(r#"{"default": 42}"#);
    let registry = sandbox.build();

    assert_eq!(
        registry.default_logger().file_path(),
        Some(sandbox.log_file("billing.log").as_path())
    );
    assert!(matches!(
        registry.events(),
        [InitEvent::ConfigUnavailable { .. }, InitEvent::DefaultSynthesized]
    ));
}

#[test]
fn invalid_level_and_env_fall_back() {
    let sandbox = Sandbox::new("billing");
    sandbox.write_config(r#"{"default": {"filename": "main.log", "level": "chatty", "env": "qa"}}"#);
    let registry = sandbox.build();

    let default = registry.default_logger();
    assert_eq!(default.level(), Severity::Info);
    assert_eq!(default.environment(), Environment::Prod);
    assert_eq!(
        registry.events(),
        &[
            InitEvent::InvalidLevel {
                logger: "default".to_string(),
                value: "chatty".to_string(),
            },
            InitEvent::InvalidEnv {
                logger: "default".to_string(),
                value: "qa".to_string(),
            },
        ]
    );
}

#[test]
fn unopenable_named_logger_falls_back_to_default() {
    let sandbox = Sandbox::new("billing");
    std::fs::create_dir_all(sandbox.log_file("svc")).unwrap();
    sandbox.write_config(r#"{"svc": {"filename": "svc"}}"#);
    let registry = sandbox.build();

    assert!(registry.get("svc").is_none());
    assert_eq!(registry.resolve(&["svc"]).name(), "default");
    assert!(matches!(
        registry.events(),
        [InitEvent::WriterUnavailable { logger, .. }, InitEvent::DefaultSynthesized] if logger == "svc"
    ));
}

#[test]
fn filenames_cannot_escape_with_leading_separator() {
    let sandbox = Sandbox::new("billing");
    sandbox.write_config(r#"{"svc": {"filename": "/nested/./svc.log"}}"#);
    let registry = sandbox.build();

    let path = registry.resolve(&["svc"]).file_path().unwrap().to_path_buf();
    assert_eq!(path, sandbox.log_dir().join("nested/svc.log"));
    assert!(path.exists());
}

#[test]
fn all_loggers_policy_tees_named_loggers() {
    let sandbox = Sandbox::new("billing");
    sandbox.write_config(r#"{"svc": {"filename": "svc.log", "env": "dev"}}"#);
    let registry = LoggerRegistry::builder(&sandbox.paths)
        .console(sandbox.console())
        .console_policy(ConsolePolicy::AllLoggers)
        .build();

    let svc = registry.resolve(&["svc"]);
    let targets: Vec<_> = svc.cores().iter().map(|core| core.target.clone()).collect();
    assert_eq!(
        targets,
        vec![
            SinkTarget::File(sandbox.log_file("svc.log")),
            SinkTarget::Stdout,
            SinkTarget::Stderr,
        ]
    );

    svc.info("teed");
    assert!(sandbox.stdout.contents().contains("teed"));
}

#[test]
fn handles_are_shared_across_threads() {
    let sandbox = Sandbox::new("billing");
    sandbox.write_config(r#"{"svc": {"filename": "svc.log"}}"#);
    let registry = sandbox.build();

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let registry = &registry;
            scope.spawn(move || {
                let log = registry.resolve(&["svc"]);
                for i in 0..25 {
                    logreg::info!(log, worker, i, "tick");
                }
            });
        }
    });

    let lines = sandbox.read_log("svc.log");
    assert_eq!(lines.lines().count(), 200);
    for line in lines.lines() {
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(record["fields"]["message"], "tick");
    }
}

#[test]
fn configured_rotation_rotates_and_compresses() {
    let sandbox = Sandbox::new("billing");
    sandbox.write_config(
        r#"{"svc": {"filename": "svc.log", "maxsize": 1, "maxbackups": 3,
                    "compress": true, "maxage": 1, "localtime": true}}"#,
    );
    let registry = sandbox.build();
    let svc = registry.resolve(&["svc"]);

    let payload = "y".repeat(1000);
    for _ in 0..2400 {
        svc.info(&payload);
    }

    let backups: Vec<String> = std::fs::read_dir(sandbox.log_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("svc.log."))
        .collect();
    assert!(!backups.is_empty(), "no backup written");
    assert!(backups.len() <= 3, "backups: {backups:?}");
    assert!(backups.iter().all(|name| name.ends_with(".gz")), "backups: {backups:?}");
}
