//! Two-phase import protocol tests against a mock registry.

use brick_reporter::ReporterError;
use brick_reporter::collector::PackageBundle;
use brick_reporter::discovery::ServiceEndpoint;
use brick_reporter::reporter::{Phase, RegistryReporter};
use httpmock::prelude::*;
use serde_json::json;

fn bundle() -> PackageBundle {
    PackageBundle {
        package_name: "pkgsNB".to_string(),
        bricks: json!({"a": 1}),
        stories: json!([]),
        snippets: json!({"snippets": []}),
    }
}

fn endpoint_of(server: &MockServer) -> ServiceEndpoint {
    ServiceEndpoint {
        host: server.host(),
        port: server.port(),
    }
}

#[test]
fn reports_atoms_then_snippets_with_expected_payloads() {
    let server = MockServer::start();
    let atom = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/brick/atom/import")
            .header("org", "8086")
            .header("user", "defaultUser")
            .json_body(json!({
                "packageName": "pkgsNB",
                "data": {"stories": [], "bricks": {"a": 1}},
            }));
        then.status(200);
    });
    let snippet = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/brick/snippet/import")
            .header("org", "8086")
            .header("user", "defaultUser")
            .json_body(json!({
                "packageName": "pkgsNB",
                "snippets": {"snippets": []},
            }));
        then.status(200);
    });

    let reporter = RegistryReporter::new().unwrap();
    reporter.report(&endpoint_of(&server), "8086", &bundle()).unwrap();

    atom.assert();
    snippet.assert();
}

#[test]
fn atom_failure_skips_the_snippet_call_entirely() {
    let server = MockServer::start();
    let atom = server.mock(|when, then| {
        when.method(POST).path("/api/v1/brick/atom/import");
        then.status(500).body("boom");
    });
    let snippet = server.mock(|when, then| {
        when.method(POST).path("/api/v1/brick/snippet/import");
        then.status(200);
    });

    let reporter = RegistryReporter::new().unwrap();
    let err = reporter
        .report(&endpoint_of(&server), "8086", &bundle())
        .unwrap_err();

    match err {
        ReporterError::Report {
            phase,
            status,
            body,
        } => {
            assert_eq!(phase, Phase::Atom);
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(atom.hits(), 1);
    assert_eq!(snippet.hits(), 0);
}

#[test]
fn snippet_failure_is_an_observable_partial_success() {
    let server = MockServer::start();
    let atom = server.mock(|when, then| {
        when.method(POST).path("/api/v1/brick/atom/import");
        then.status(200);
    });
    let snippet = server.mock(|when, then| {
        when.method(POST).path("/api/v1/brick/snippet/import");
        then.status(502).body("bad gateway");
    });

    let reporter = RegistryReporter::new().unwrap();
    let err = reporter
        .report(&endpoint_of(&server), "8086", &bundle())
        .unwrap_err();

    // Atoms were reported, snippets were not; the invoker owns any re-run.
    match err {
        ReporterError::Report { phase, status, .. } => {
            assert_eq!(phase, Phase::Snippet);
            assert_eq!(status, 502);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(atom.hits(), 1);
    assert_eq!(snippet.hits(), 1);
}

#[test]
fn each_phase_sends_exactly_one_request_on_success() {
    let server = MockServer::start();
    let atom = server.mock(|when, then| {
        when.method(POST).path("/api/v1/brick/atom/import");
        then.status(201);
    });
    let snippet = server.mock(|when, then| {
        when.method(POST).path("/api/v1/brick/snippet/import");
        then.status(201);
    });

    let reporter = RegistryReporter::new().unwrap();
    reporter.report(&endpoint_of(&server), "8086", &bundle()).unwrap();

    assert_eq!(atom.hits(), 1);
    assert_eq!(snippet.hits(), 1);
}
