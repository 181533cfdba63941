//! Migration against a fake chat completion service.
//!
//! A local HTTP fixture stands in for the OpenAI-compatible endpoint so the
//! full `migrate --docs` path, including the request the client sends, can be
//! checked without network access.

use anyhow::{Context, Result, ensure};
use cmake_to_bazel::deploy::{ChatClient, TextGenerator, UNPARSEABLE_ANSWER};
use rstest::rstest;
use serde_json::{Value, json};
use test_support::{Component, run_cli_in, spawn_chat_server};

const SCRIPT: &str = "add_library(ledger ledger.c)\nadd_executable(billing main.c)\n";

#[rstest]
fn chat_client_posts_prompt_and_returns_answer() -> Result<()> {
    let (url, server) = spawn_chat_server("  service: billing\n");
    let client = ChatClient::new(&url, Some("secret".to_owned()), Some("local-model".to_owned()));

    let answer = client.generate("what now?").context("generate")?;
    ensure!(answer == "service: billing", "unexpected answer {answer:?}");

    let request = server
        .join()
        .map_err(|_| anyhow::anyhow!("server thread panicked"))?
        .context("server saw no request")?;
    ensure!(
        request.request_line.starts_with("POST /v1/chat/completions "),
        "request line: {}",
        request.request_line
    );
    ensure!(
        request.header("authorization") == Some("Bearer secret"),
        "headers: {:?}",
        request.headers
    );
    let body: Value = serde_json::from_str(&request.body).context("request body JSON")?;
    ensure!(
        body == json!({
            "model": "local-model",
            "messages": [{ "role": "user", "content": "what now?" }],
        }),
        "body: {body}"
    );
    Ok(())
}

#[rstest]
fn empty_answer_is_an_error() {
    let (url, _server) = spawn_chat_server("   ");
    let client = ChatClient::new(&url, None, None);
    assert!(client.generate("prompt").is_err());
}

#[rstest]
fn migrate_writes_config_from_service_answer() -> Result<()> {
    let component = Component::with_script("billing", SCRIPT)?;
    component.write_docs(&[
        ("deploy.md", "Every component declares `service` and `replicas`."),
        ("notes.txt", "Replicas default to one."),
    ])?;
    let (url, server) = spawn_chat_server("```yaml\nservice: billing\nreplicas: 1\n```");

    let run = run_cli_in(
        component.workspace()?.as_std_path(),
        &["migrate", "billing", "--docs", "docs", "--llm-url", &url],
    )?;
    ensure!(run.success, "migrate should succeed: {}", run.stderr);

    let request = server
        .join()
        .map_err(|_| anyhow::anyhow!("server thread panicked"))?
        .context("server saw no request")?;
    ensure!(request.header("authorization").is_none(), "no key was given");
    let body: Value = serde_json::from_str(&request.body).context("request body JSON")?;
    let prompt = body
        .pointer("/messages/0/content")
        .and_then(Value::as_str)
        .context("prompt in request")?;
    ensure!(prompt.contains("declares `service`"), "prompt: {prompt}");
    ensure!(prompt.contains("Replicas default to one."), "prompt: {prompt}");
    ensure!(prompt.contains("component billing"), "prompt: {prompt}");
    ensure!(body["model"] == "gpt-4", "body: {body}");

    let config: Value =
        serde_saphyr::from_str(&component.read("config.yaml")?).context("parse config.yaml")?;
    ensure!(
        config == json!({ "service": "billing", "replicas": 1 }),
        "config: {config}"
    );
    ensure!(
        component.read("BUILD.bazel")?.contains("cc_binary("),
        "BUILD.bazel should be written too"
    );
    Ok(())
}

#[rstest]
fn prose_answer_is_kept_as_raw_fallback() -> Result<()> {
    let component = Component::with_script("billing", SCRIPT)?;
    component.write_docs(&[("deploy.md", "docs")])?;
    let answer = "I cannot answer: [unclosed";
    let (url, _server) = spawn_chat_server(answer);

    let run = run_cli_in(
        component.workspace()?.as_std_path(),
        &["migrate", "billing", "--docs", "docs", "--llm-url", &url],
    )?;
    ensure!(run.success, "migrate should succeed: {}", run.stderr);

    let config: Value =
        serde_saphyr::from_str(&component.read("config.yaml")?).context("parse config.yaml")?;
    ensure!(
        config == json!({ "error": UNPARSEABLE_ANSWER, "raw": answer }),
        "config: {config}"
    );
    Ok(())
}

#[rstest]
fn unreachable_service_fails_after_writing_build_file() -> Result<()> {
    let component = Component::with_script("billing", SCRIPT)?;
    component.write_docs(&[("deploy.md", "docs")])?;
    let (url, server) = spawn_chat_server("unused");
    drop(server);

    let run = run_cli_in(
        component.workspace()?.as_std_path(),
        &["migrate", "billing", "--docs", "docs", "--llm-url", &url],
    )?;
    ensure!(!run.success, "migrate should fail when the service is down");
    ensure!(
        run.stderr.contains("generating deployment config for billing"),
        "stderr: {}",
        run.stderr
    );
    ensure!(component.dir().join("BUILD.bazel").exists(), "BUILD.bazel missing");
    ensure!(!component.dir().join("config.yaml").exists(), "config.yaml written");
    Ok(())
}
