//! Server-dependent cases run against the loopback server lifecycle.
#![expect(clippy::expect_used, reason = "tests assert on success paths")]

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use bdd_suite::{
    CaseOptions, DirectoryRegistry, FeaturesOnlySuiteBuilder, Formatter, GherkinRunner,
    LoopbackServer, StepContext, StepError, StepKeyword, step,
};
use camino::Utf8PathBuf;

fn fetch_front_page(ctx: &mut StepContext) -> Result<(), StepError> {
    let url = ctx
        .server_url()
        .ok_or_else(|| StepError::new("no live server url"))?;
    let addr = url
        .strip_prefix("http://")
        .ok_or_else(|| StepError::new("unexpected url scheme"))?;
    let mut stream =
        TcpStream::connect(addr).map_err(|err| StepError::new(format!("connect: {err}")))?;
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n")
        .map_err(|err| StepError::new(format!("request: {err}")))?;
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .map_err(|err| StepError::new(format!("response: {err}")))?;
    ctx.insert("status-line", response.lines().next().unwrap_or(""));
    Ok(())
}

fn front_page_is_ok(ctx: &mut StepContext) -> Result<(), StepError> {
    match ctx.get("status-line") {
        Some(line) if line.contains("200") => Ok(()),
        Some(line) => Err(StepError::new(format!("unexpected status: {line}"))),
        None => Err(StepError::new("front page was never fetched")),
    }
}

step!(StepKeyword::When, "the visitor fetches the front page", fetch_front_page);
step!(StepKeyword::Then, "the front page responds", front_page_is_ok);

const SITE_FEATURE: &str = "Feature: Front page\n\
    \n\
    Scenario: the site is up\n\
    When the visitor fetches the front page\n\
    Then the front page responds\n";

#[test]
fn feature_cases_run_against_a_live_server() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).expect("utf8 tempdir");
    let features = root.join("site").join("features");
    std::fs::create_dir_all(&features).expect("create features");
    std::fs::write(features.join("front.feature"), SITE_FEATURE).expect("write feature");

    let registry = DirectoryRegistry::discover(&root).expect("discover");
    let builder = FeaturesOnlySuiteBuilder::new(Box::new(registry), Arc::new(GherkinRunner))
        .with_options(CaseOptions {
            formatter: Formatter::Plain,
            ..CaseOptions::default()
        })
        .with_server_factory(Box::new(|| Box::new(LoopbackServer::new())));

    let mut suite = builder.build(&[]).expect("build");
    let mut out = Vec::new();
    let report = suite.run(&mut out, &mut Vec::<u8>::new(), false);

    let out = String::from_utf8(out).expect("utf8 output");
    assert!(report.success(), "suite failed: {out}");
    assert!(out.contains("ok Front page :: the site is up"));
}
