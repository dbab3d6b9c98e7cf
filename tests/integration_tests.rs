//! Integration tests for wilf
//!
//! These tests verify:
//! - Requirement evaluation on requirements read from a Pipfile
//! - The check workflow against a mocked PyPI server
//! - Reporter output for a full run

use mockito::{Server, ServerGuard};
use std::fs;
use wilf::config::Config;
use wilf::domain::{are_compatible, DependencyKind, UpdateLevel};
use wilf::manifest::Pipfile;
use wilf::orchestrator::Orchestrator;
use wilf::output::{JsonReporter, MonochromeTableReporter, UpdateReporter};
use wilf::parser::parse_requirement;
use wilf::registry::{HttpClient, PyPIAdapter};
use wilf::update::{CompositeChecker, RegistryChecker};

const PIPFILE: &str = r#"[[source]]
url = "https://pypi.org/simple"
verify_ssl = true
name = "pypi"

[packages]
requests = "==2.31.0"
numpy = ">=1.21.0, <1.22.0"
urllib3 = { version = "==2.0.6", extras = ["socks"] }
mylib = { path = "./mylib", editable = true }

[dev-packages]
pytest = "~=6.0"

[requires]
python_version = "3.8"
"#;

fn pypi_body(name: &str, version: &str, requires_python: &str) -> String {
    serde_json::json!({
        "info": {
            "name": name,
            "version": version,
            "home_page": format!("https://{}.example.org", name),
            "project_url": format!("https://pypi.org/project/{}/", name),
            "package_url": format!("https://pypi.org/project/{}/", name),
            "requires_python": requires_python,
        }
    })
    .to_string()
}

/// Mock PyPI serving the latest release of every package in [`PIPFILE`]
async fn mock_pypi() -> ServerGuard {
    let mut server = Server::new_async().await;

    for (name, version, requires_python) in [
        ("requests", "2.31.0", ">=3.7"),
        ("numpy", "1.22.0", ">=3.8"),
        ("urllib3", "2.0.7", ">=3.7"),
        ("pytest", "8.0.0", ">=3.8"),
    ] {
        server
            .mock("GET", format!("/pypi/{}/json", name).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(pypi_body(name, version, requires_python))
            .create_async()
            .await;
    }

    server
}

fn orchestrator(server: &ServerGuard, pipfile: &Pipfile, config: &Config) -> Orchestrator {
    let client = HttpClient::new().unwrap().with_max_retries(0);
    let pypi = RegistryChecker::new(Box::new(PyPIAdapter::with_base_url(client, server.url())))
        .with_python_requirement(pipfile.python_requirement.clone());
    let checker = CompositeChecker::new().with(Box::new(pypi));

    Orchestrator::new(Box::new(checker), config.settings.filter())
        .with_dev_packages(config.settings.check_dev_packages)
}

mod engine {
    use super::*;

    /// Pinned, ranged and compatible-release requirements from a Pipfile
    #[test]
    fn test_requirements_from_pipfile() {
        let pipfile = Pipfile::parse(PIPFILE).unwrap();

        let numpy = pipfile
            .runtime
            .iter()
            .find(|d| d.name == "numpy")
            .unwrap();
        assert!(!numpy.requirement.needs_update("v1.21.5"));
        assert!(numpy.requirement.needs_update("v1.22.0"));
        assert_eq!(
            numpy.requirement.update_level("v1.22.0").unwrap(),
            UpdateLevel::Minor
        );
        assert_eq!(
            numpy.requirement.update_level("v2.0.0").unwrap(),
            UpdateLevel::Major
        );

        let pytest = &pipfile.dev[0];
        assert_eq!(
            pytest.requirement.update_level("v8.0.0").unwrap(),
            UpdateLevel::Major
        );
    }

    #[test]
    fn test_project_python_compatibility() {
        let pipfile = Pipfile::parse(PIPFILE).unwrap();

        let supports_38 = parse_requirement(">=3.8").unwrap();
        let needs_312 = parse_requirement(">=3.12").unwrap();

        assert!(are_compatible(&pipfile.python_requirement, &supports_38));
        assert!(!are_compatible(&pipfile.python_requirement, &needs_312));
    }

    #[test]
    fn test_local_installs_are_skipped() {
        let pipfile = Pipfile::parse(PIPFILE).unwrap();
        let names: Vec<&str> = pipfile.runtime.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["numpy", "requests", "urllib3"]);
    }
}

mod workflow {
    use super::*;

    #[tokio::test]
    async fn test_runtime_updates() {
        let server = mock_pypi().await;
        let pipfile = Pipfile::parse(PIPFILE).unwrap();
        let config = Config::default();

        let report = orchestrator(&server, &pipfile, &config)
            .run(&pipfile)
            .await
            .unwrap();

        let updates: Vec<(&str, UpdateLevel, bool)> = report
            .reports
            .iter()
            .map(|r| (r.name.as_str(), r.level, r.fatal))
            .collect();
        assert_eq!(
            updates,
            vec![
                ("numpy", UpdateLevel::Minor, true),
                ("urllib3", UpdateLevel::Patch, false),
            ]
        );
        assert!(report.requires_update);

        let numpy = &report.reports[0];
        assert_eq!(numpy.latest, "v1.22.0");
        assert_eq!(numpy.home_url.as_deref(), Some("https://numpy.example.org"));
    }

    #[tokio::test]
    async fn test_dev_updates_and_exclusions() {
        let server = mock_pypi().await;
        let pipfile = Pipfile::parse(PIPFILE).unwrap();
        let config = Config::parse(
            "check_dev_packages = true\nexcluded_packages = [\"numpy\"]\nupdate_level = \"major\"\n",
            std::path::Path::new("wilf.toml"),
        )
        .unwrap();

        let report = orchestrator(&server, &pipfile, &config)
            .run(&pipfile)
            .await
            .unwrap();

        let pytest = report.reports.iter().find(|r| r.name == "pytest").unwrap();
        assert_eq!(pytest.kind, DependencyKind::Dev);
        assert_eq!(pytest.level, UpdateLevel::Major);
        assert!(pytest.fails());

        let numpy = report.reports.iter().find(|r| r.name == "numpy").unwrap();
        assert!(numpy.excluded);
        assert!(!numpy.fatal);
        assert!(report.requires_update);
    }

    #[tokio::test]
    async fn test_incompatible_python_blocks_update() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/pypi/numpy/json")
            .with_status(200)
            .with_body(pypi_body("numpy", "2.0.0", ">=3.12"))
            .create_async()
            .await;

        let pipfile = Pipfile::parse(
            "[packages]\nnumpy = \"==1.26.0\"\n\n[requires]\npython_version = \"3.8\"\n",
        )
        .unwrap();

        let report = orchestrator(&server, &pipfile, &Config::default())
            .run(&pipfile)
            .await
            .unwrap();

        assert!(report.reports.is_empty());
        assert!(!report.requires_update);
    }

    #[tokio::test]
    async fn test_registry_failure_aborts_kind() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/pypi/requests/json")
            .with_status(500)
            .create_async()
            .await;

        let pipfile = Pipfile::parse("[packages]\nrequests = \"==2.31.0\"\n").unwrap();

        let err = orchestrator(&server, &pipfile, &Config::default())
            .run(&pipfile)
            .await
            .unwrap_err();

        assert_eq!(err.kind, DependencyKind::Runtime);
        assert_eq!(err.package, "requests");
    }
}

mod reporting {
    use super::*;

    #[tokio::test]
    async fn test_reports_for_full_run() {
        let server = mock_pypi().await;
        let pipfile = Pipfile::parse(PIPFILE).unwrap();
        let report = orchestrator(&server, &pipfile, &Config::default())
            .run(&pipfile)
            .await
            .unwrap();

        let mut table = MonochromeTableReporter::new("1.4.0");
        let mut json = JsonReporter::new("1.4.0");
        let mut table_out = Vec::new();
        let mut json_out = Vec::new();

        table.before(&mut table_out).unwrap();
        json.before(&mut json_out).unwrap();
        for dependency_report in &report.reports {
            table.report(dependency_report, &mut table_out).unwrap();
            json.report(dependency_report, &mut json_out).unwrap();
        }
        table.after(&mut table_out).unwrap();
        json.after(&mut json_out).unwrap();

        let table_out = String::from_utf8(table_out).unwrap();
        assert!(table_out.contains("minor for numpy; https://numpy.example.org"));
        assert!(table_out.contains("patch for urllib3; https://urllib3.example.org"));

        let json_out: serde_json::Value = serde_json::from_slice(&json_out).unwrap();
        assert_eq!(json_out["requires_update"], true);
        assert_eq!(json_out["updates"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_pipfile_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Pipfile"), PIPFILE).unwrap();

        let path = wilf::manifest::resolve_path(dir.path());
        let pipfile = Pipfile::from_path(&path).unwrap();
        assert_eq!(pipfile.runtime.len(), 3);
        assert_eq!(pipfile.dev.len(), 1);
    }
}
