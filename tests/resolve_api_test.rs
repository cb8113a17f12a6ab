//! Integration tests for the resolution pipeline through the public API.

use std::fs;
use std::path::Path;

use buildplan::aliases::AliasTable;
use buildplan::config::{load_layered_config, LOCAL_FILE, PROJECT_FILE};
use buildplan::mode::{BuildMode, ModeSource};
use buildplan::resolve::resolve_mode;
use buildplan::{resolve_build_plan, ConfigError, EnvSnapshot, ResolveOptions};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn project_with_styles() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "src/assets/styles/less/variables.less",
        "@primary-color: #1890ff;\n@border-radius: 4px;\n",
    );
    write(temp.path(), "src/assets/styles/less/mixins.less", "");
    write(temp.path(), "src/assets/styles/less/functions.less", "");
    temp
}

#[test]
fn defaults_resolve_in_development() {
    let temp = project_with_styles();

    let plan = resolve_build_plan(temp.path(), &ResolveOptions::default()).unwrap();

    assert_eq!(plan.mode, BuildMode::Development);
    assert!(plan.optimization_policy.source_map);
    assert!(plan.chunk_splitting.is_none());
    assert!(plan.compression.is_none());
    assert_eq!(plan.style_resources.len(), 3);
    assert!(plan.style_resources.iter().all(|p| p.is_absolute()));
    assert!(plan.aliases["@components"].ends_with("src/components"));
}

#[test]
fn production_plan_enables_optimizations() {
    let temp = project_with_styles();
    let env = EnvSnapshot::from_pairs([("NODE_ENV", "production")]);

    let plan = resolve_build_plan(temp.path(), &ResolveOptions::new(env)).unwrap();

    assert_eq!(plan.mode, BuildMode::Production);
    assert!(plan.optimization_policy.minify);
    assert!(plan.optimization_policy.drop_console);
    assert!(!plan.optimization_policy.source_map);
    let chunks = plan.chunk_splitting.unwrap();
    assert_eq!(
        chunks.cache_groups.keys().collect::<Vec<_>>(),
        vec!["common", "vendors"]
    );
    assert!(plan.compression.is_some());
    assert!(plan.analyzer.is_some());
}

#[test]
fn layers_apply_in_order() {
    let temp = project_with_styles();
    write(
        temp.path(),
        PROJECT_FILE,
        "default_mode: production\ndev_server:\n  port: 8000\n  host: localhost\n",
    );
    write(
        temp.path(),
        "buildplan.production.yml",
        "dev_server:\n  port: 8100\n",
    );
    write(temp.path(), LOCAL_FILE, "dev_server:\n  port: 8200\n");

    let env = EnvSnapshot::from_pairs([("BUILDPLAN__DEV_SERVER__HTTPS", "true")]);
    let options = ResolveOptions::new(env);

    let mode = resolve_mode(temp.path(), &options).unwrap();
    assert_eq!(mode.mode, BuildMode::Production);
    assert_eq!(mode.source, ModeSource::ConfigDefault);

    let plan = resolve_build_plan(temp.path(), &options).unwrap();
    assert_eq!(plan.dev_server.port, 8200);
    assert_eq!(plan.dev_server.host, "localhost");
    assert!(plan.dev_server.https);
}

#[test]
fn mode_file_follows_resolved_mode() {
    let temp = project_with_styles();
    write(
        temp.path(),
        "buildplan.production.yml",
        "output:\n  public_path: /static-site/\n",
    );

    let dev = resolve_build_plan(temp.path(), &ResolveOptions::default()).unwrap();
    assert_eq!(dev.output.public_path, "/");

    let options = ResolveOptions::default().with_mode(BuildMode::Production);
    let prod = resolve_build_plan(temp.path(), &options).unwrap();
    assert_eq!(prod.output.public_path, "/static-site/");
}

#[test]
fn loaded_config_reports_sources() {
    let temp = project_with_styles();
    write(temp.path(), PROJECT_FILE, "");
    write(temp.path(), LOCAL_FILE, "");

    let loaded = load_layered_config(
        temp.path(),
        BuildMode::Development,
        None,
        &EnvSnapshot::new(),
    )
    .unwrap();

    assert_eq!(loaded.sources.len(), 2);
    assert!(!loaded.env_overrides);
}

#[test]
fn less_variables_are_extracted_on_request() {
    let temp = project_with_styles();
    write(temp.path(), PROJECT_FILE, "styles:\n  extract_variables: true\n");

    let plan = resolve_build_plan(temp.path(), &ResolveOptions::default()).unwrap();

    assert_eq!(plan.less_variables["primary-color"], "#1890ff");
    assert_eq!(plan.less_variables["border-radius"], "4px");
}

#[test]
fn proxy_rewrites_keep_last_duplicate() {
    let temp = project_with_styles();
    write(
        temp.path(),
        PROJECT_FILE,
        r#"
dev_server:
  proxy:
    - path_prefix: /api
      target: http://www.example.org
      rewrite:
        - pattern: "^/api"
          replacement: "/api"
        - pattern: "^/api"
          replacement: "/"
"#,
    );

    let plan = resolve_build_plan(temp.path(), &ResolveOptions::default()).unwrap();

    insta::assert_json_snapshot!(plan.proxy_rules, @r#"
    [
      {
        "path_prefix": "/api",
        "target": "http://www.example.org",
        "ws": true,
        "change_origin": true,
        "rewrite": {
          "^/api": "/"
        }
      }
    ]
    "#);
    assert_eq!(plan.proxy_rules[0].rewrite_path("/api/users"), "//users");
}

#[test]
fn resolved_aliases_answer_imports() {
    let temp = project_with_styles();

    let plan = resolve_build_plan(temp.path(), &ResolveOptions::default()).unwrap();
    let table = AliasTable::from(plan.aliases);

    let button = table.resolve_import("@components/Button.vue").unwrap();
    assert!(button.ends_with("src/components/Button.vue"));
    assert!(table.resolve_import("@componentsX/Button.vue").is_none());
}

#[test]
fn missing_style_resource_names_the_file() {
    let temp = TempDir::new().unwrap();

    let err = resolve_build_plan(temp.path(), &ResolveOptions::default()).unwrap_err();

    match err {
        ConfigError::MissingStyleResource { path } => {
            assert!(path.ends_with("src/assets/styles/less/variables.less"));
        }
        other => panic!("expected MissingStyleResource, got {other:?}"),
    }
}

#[test]
fn missing_root_is_reported() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nowhere");

    let err = resolve_build_plan(&missing, &ResolveOptions::default()).unwrap_err();

    assert!(matches!(err, ConfigError::MissingRoot { .. }));
}

#[test]
fn invalid_fields_are_named() {
    let temp = project_with_styles();
    write(temp.path(), PROJECT_FILE, "output:\n  output_dir: \"\"\n");

    let err = resolve_build_plan(temp.path(), &ResolveOptions::default()).unwrap_err();

    assert!(err.to_string().contains("output.output_dir"));
}

#[test]
fn resolution_is_repeatable() {
    let temp = project_with_styles();
    let options = ResolveOptions::default().with_mode(BuildMode::Production);

    let first = resolve_build_plan(temp.path(), &options).unwrap();
    let second = resolve_build_plan(temp.path(), &options).unwrap();

    assert_eq!(first, second);
}
