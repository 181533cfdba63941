//! Unit tests for the runner's translation and migration pipelines.

use super::*;
use crate::deploy::GenerateError;
use crate::validate::Check;
use rstest::{fixture, rstest};
use std::cell::RefCell;
use tempfile::TempDir;

/// Generator returning a fixed answer and recording prompts.
struct CannedGenerator {
    answer: &'static str,
    prompts: RefCell<Vec<String>>,
}

impl TextGenerator for CannedGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.borrow_mut().push(prompt.to_owned());
        Ok(self.answer.to_owned())
    }
}

#[fixture]
fn component() -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().expect("temp dir");
    let dir = Utf8Path::from_path(temp.path())
        .expect("utf8 temp dir")
        .join("billing");
    fs::create_dir(&dir).expect("component dir");
    fs::write(
        dir.join(CMAKE_LISTS),
        "cmake_minimum_required(VERSION 3.10)\n\
         project(billing)\n\
         add_library(ledger ledger.c)\n\
         include_directories(include)\n\
         add_executable(billing main.c)\n\
         target_link_libraries(billing ledger)\n",
    )
    .expect("write script");
    (temp, dir)
}

#[rstest]
fn translate_renders_binary_with_deps() {
    let translation = translate(
        "add_executable(app main.c util.c)\ntarget_link_libraries(app mathlib)\n",
        "CMakeLists.txt",
    )
    .expect("translate");
    let text = translation.content.as_str();
    assert!(text.contains("cc_binary("));
    assert!(text.contains("name = \"app\""));
    assert!(text.contains("srcs = [\"main.c\", \"util.c\"]"));
    assert!(text.contains("deps = [\"mathlib\"]"));
    assert!(!text.contains("includes ="));
    assert!(translation.validation.passed());
    assert_eq!(translation.validation.diagnostic(), "");
}

#[rstest]
fn translate_is_deterministic() {
    let src = "add_library(a a.c)\ninclude_directories(inc)\nadd_executable(b b.c)\n";
    let first = translate(src, "CMakeLists.txt").expect("first");
    let second = translate(src, "CMakeLists.txt").expect("second");
    assert_eq!(first.content, second.content);
}

#[rstest]
fn translate_without_targets_warns_but_succeeds() {
    let translation = translate("project(empty)\n", "CMakeLists.txt").expect("translate");
    assert!(translation.content.as_str().is_empty());
    assert_eq!(
        translation.validation.failed_check(),
        Some(Check::RuleKeyword)
    );
}

#[rstest]
fn translate_reports_malformed_statement() {
    let err = translate("project(x)\nadd_library()\n", "CMakeLists.txt").expect_err("error");
    assert!(format!("{err:#}").contains("`add_library` at statement 1"));
}

#[rstest]
fn parse_errors_render_with_source_snippet() {
    let err = translate("add_library(core \"a.c\n", "CMakeLists.txt").expect_err("error");
    let rendered = render_error(&err);
    assert!(rendered.contains("unterminated quoted argument"), "{rendered}");
    assert!(rendered.contains("CMakeLists.txt"), "{rendered}");
}

#[rstest]
fn migrate_writes_build_file_only_without_docs(component: (TempDir, Utf8PathBuf)) {
    let (_temp, dir) = component;
    let migration = migrate_component(&dir, None).expect("migrate");

    assert_eq!(migration.build_file, dir.join(BUILD_FILE));
    assert!(migration.config_file.is_none());
    assert!(migration.validation.passed());
    let build = fs::read_to_string(dir.join(BUILD_FILE)).expect("read build");
    insta::assert_snapshot!(build.trim_end(), @r#"
    cc_library(
        name = "ledger",
        srcs = ["ledger.c"],
        includes = ["include"],
        deps = [],
    )

    cc_binary(
        name = "billing",
        srcs = ["main.c"],
        deps = ["ledger"],
    )
    "#);
    assert!(!dir.join(DEPLOY_CONFIG).exists());
}

#[rstest]
fn migrate_writes_deploy_config(component: (TempDir, Utf8PathBuf)) {
    let (temp, dir) = component;
    let docs = Utf8Path::from_path(temp.path())
        .expect("utf8")
        .join("docs");
    fs::create_dir(&docs).expect("docs dir");
    fs::write(docs.join("deploy.md"), "Components declare a service name.").expect("doc");

    let generator = CannedGenerator {
        answer: "```yaml\nservice: billing\nreplicas: 2\n```",
        prompts: RefCell::new(Vec::new()),
    };
    let source = DeploySource {
        docs,
        generator: &generator,
    };
    let migration = migrate_component(&dir, Some(&source)).expect("migrate");

    assert_eq!(migration.config_file, Some(dir.join(DEPLOY_CONFIG)));
    let prompts = generator.prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Components declare a service name."));
    assert!(prompts[0].contains("component billing"));

    let yaml = fs::read_to_string(dir.join(DEPLOY_CONFIG)).expect("read config");
    let value: serde_json::Value = serde_saphyr::from_str(&yaml).expect("parse config");
    assert_eq!(
        value,
        serde_json::json!({ "service": "billing", "replicas": 2 })
    );
}

#[rstest]
fn migrate_without_script_reports_missing_file() {
    let temp = TempDir::new().expect("temp dir");
    let dir = Utf8Path::from_path(temp.path()).expect("utf8");
    let err = migrate_component(dir, None).expect_err("missing script");
    let runner_err = err.downcast_ref::<RunnerError>().expect("runner error");
    assert!(matches!(
        runner_err,
        RunnerError::ScriptNotFound { path } if *path == dir.join(CMAKE_LISTS)
    ));
    assert!(!dir.join(BUILD_FILE).exists());
}

#[rstest]
#[case("services/billing", "billing")]
#[case("billing/", "billing")]
fn component_name_uses_last_path_component(#[case] path: &str, #[case] expected: &str) {
    assert_eq!(component_name(Utf8Path::new(path)), expected);
}

#[rstest]
fn validate_command_rejects_incomplete_file() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("BUILD.bazel");
    fs::write(&path, "cc_library(\n    name = \"x\",\n)\n").expect("write");
    let err = handle_validate(&path).expect_err("invalid");
    assert!(err.to_string().contains("srcs"), "{err}");
}

#[rstest]
fn docs_flag_requires_llm_url() {
    let args = ["cmake-to-bazel", "migrate", "billing", "--docs", "docs"];
    let err = Cli::try_parse_with_default(args).expect_err("usage error");
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[rstest]
fn migrate_args_without_llm_url_skip_deploy_config(component: (TempDir, Utf8PathBuf)) {
    let (_temp, dir) = component;
    let args = MigrateArgs {
        component: dir.clone().into_std_path_buf(),
        docs: Some("docs".into()),
        llm_url: None,
        llm_api_key: None,
        model: None,
    };
    handle_migrate(&args).expect("migrate");
    assert!(dir.join(BUILD_FILE).exists());
    assert!(!dir.join(DEPLOY_CONFIG).exists());
}
