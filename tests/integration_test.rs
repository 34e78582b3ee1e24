use pretty_assertions::assert_eq;
use salarystats::{DashboardConfig, Rank, SalaryDashboard, Sex};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/Salaries.csv")
}

fn setup_config() -> (DashboardConfig, TempDir) {
    let _ = env_logger::builder().is_test(true).try_init();

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard.json");
    let json = serde_json::json!({
        "dataset_path": fixture_path(),
        "percent_precision": 2,
    });
    fs::write(&config_path, json.to_string()).unwrap();

    let config = DashboardConfig::from_json_file(&config_path).unwrap();
    (config, temp_dir)
}

#[test]
fn test_full_workflow() {
    let (config, _temp_dir) = setup_config();
    let mut dashboard = SalaryDashboard::load(config).unwrap();

    // Whole dataset
    {
        let snapshot = dashboard.snapshot().unwrap();
        assert_eq!(snapshot.total_records, 16);
        assert_eq!(snapshot.active_records, 16);
        assert_eq!(snapshot.gender_count(Sex::Female), 4);
        assert_eq!(snapshot.gender_count(Sex::Male), 12);
        assert_eq!(snapshot.average_salary(Sex::Female), 102_500.0);
        assert_eq!(snapshot.average_salary(Sex::Male), 121_901.25);
        assert_eq!(snapshot.target_rank, Rank::Prof);
        assert_eq!(snapshot.target_rank_percent_by_sex[0].value, 50.0);
        assert_eq!(snapshot.target_rank_percent_by_sex[1].value, 58.33);
        assert_eq!(snapshot.service_vs_salary.len(), 16);
    }

    // Discipline selection
    {
        dashboard.select_discipline(Some("A")).unwrap();
        let snapshot = dashboard.snapshot().unwrap();
        assert_eq!(snapshot.active_records, 4);
        assert_eq!(snapshot.gender_count(Sex::Female), 3);
        assert_eq!(snapshot.average_salary(Sex::Male), 75_000.0);
        assert_eq!(snapshot.rank_percent(Sex::Male, Rank::AsstProf), 100.0);
        assert_eq!(snapshot.rank_percent(Sex::Male, Rank::Prof), 0.0);
    }

    // Stacked selections, then clearing them
    {
        dashboard.select_rank(Some(Rank::Prof)).unwrap();
        let snapshot = dashboard.snapshot().unwrap();
        assert_eq!(snapshot.active_records, 1);
        assert_eq!(snapshot.average_salary(Sex::Female), 112_000.0);

        dashboard.reset_selections().unwrap();
        let snapshot = dashboard.snapshot().unwrap();
        assert_eq!(snapshot.active_records, 16);
        assert_eq!(snapshot.average_salary(Sex::Female), 102_500.0);
    }

    // Snapshot output for the renderer
    {
        let json = dashboard.snapshot().unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["disciplines"][0]["key"], "A");
        assert_eq!(value["disciplines"][1]["value"], 12);
    }
}

#[test]
fn test_error_handling() {
    let _ = env_logger::builder().is_test(true).try_init();

    // Missing dataset
    {
        let config = DashboardConfig {
            dataset_path: PathBuf::from("/nonexistent/Salaries.csv"),
            ..DashboardConfig::default()
        };
        assert!(matches!(
            SalaryDashboard::load(config),
            Err(salarystats::Error::Ingest(_))
        ));
    }

    // Malformed config
    {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dashboard.json");
        fs::write(&config_path, "{ \"target_rank\": \"Dean\" }").unwrap();
        assert!(DashboardConfig::from_json_file(&config_path).is_err());
    }
}
