//! End-to-end pipeline tests: source → loader → filter → aggregation.

use std::io::Write;

use report_hub::data::cache::TableCache;
use report_hub::data::filter::{apply, default_selection, derive_domains, Selection};
use report_hub::report::{self, cyber};
use report_hub::state::ReportState;
use report_hub::{DataSource, Value};

const SAMPLE: &str = "\
Year,Country,Attack Type,Financial Loss (in Million $),Number of Affected Users,Incident Resolution Time (in Hours),Security Vulnerability Type,Defense Mechanism Used
2015,USA,Phishing,10.0,1000,24.0,Weak Passwords,Firewall
2016,USA,Ransomware,5.0,500,48.0,Zero-day,VPN
2015,Germany,Phishing,3.0,300,12.0,Weak Passwords,AI-based Detection
";

#[test]
fn path_source_runs_the_full_battery() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let spec = report::cybersecurity();
    let mut cache = TableCache::new();
    let mut state = ReportState::new(spec);
    state.load_from(&mut cache, &DataSource::Path(file.path().to_path_buf()));

    let out = state.output().expect("table should be loaded");
    assert_eq!(out.row_count, 3);
    // Total Incidents, then Total Financial Loss.
    assert_eq!(out.kpis[0].value, Some(3.0));
    assert_eq!(out.kpis[1].value, Some(18.0));

    let trend = &out.sections[0];
    assert_eq!(trend.key, "yearly_trend");
    assert_eq!(
        trend.table.rows[0],
        vec![
            Value::Integer(2015),
            Value::Float(13.0),
            Value::Float(1300.0),
            Value::Float(18.0),
        ]
    );
}

#[test]
fn filtering_a_year_narrows_every_downstream_table() {
    let spec = report::cybersecurity();
    let mut cache = TableCache::new();
    let mut state = ReportState::new(spec);
    state.load_from(
        &mut cache,
        &DataSource::Upload {
            name: "sample.csv".into(),
            bytes: Some(SAMPLE.as_bytes().to_vec()),
        },
    );

    state.selection.insert(
        "Year".into(),
        Selection::OneOf([Value::Integer(2015)].into()),
    );
    state.refilter();

    let out = state.output().unwrap();
    assert_eq!(out.row_count, 2);
    let attacks = out.sections.iter().find(|s| s.key == "attack_types").unwrap();
    assert_eq!(
        attacks.table.rows,
        vec![vec![Value::String("Phishing".into()), Value::Integer(2)]]
    );
    let countries = out.sections.iter().find(|s| s.key == "top_countries").unwrap();
    assert_eq!(countries.table.rows.len(), 2);
    assert_eq!(countries.table.rows[0][0], Value::String("USA".into()));
}

#[test]
fn broken_source_isolates_to_its_own_report() {
    let mut cache = TableCache::new();

    let mut broken = ReportState::new(report::cybersecurity());
    broken.load_from(&mut cache, &DataSource::Path("/no/such/file.csv".into()));
    assert!(broken.status_message.is_some());

    // The other report still loads from its bundled copy.
    let spec = report::student_habits();
    let source = spec.bundled_source();
    let mut healthy = ReportState::new(spec);
    healthy.load_from(&mut cache, &source);
    assert!(healthy.status_message.is_none());
    assert!(healthy.output().is_some());
}

#[test]
fn schema_mismatch_is_reported_at_load_time() {
    let spec = report::cybersecurity();
    let mut cache = TableCache::new();
    let mut state = ReportState::new(spec);
    state.load_from(
        &mut cache,
        &DataSource::Upload {
            name: "wrong.csv".into(),
            bytes: Some(b"Year,Country\n2015,USA\n".to_vec()),
        },
    );

    let message = state.status_message.expect("missing column should surface");
    assert!(message.contains("Attack Type"), "got: {message}");
}

#[test]
fn upload_report_with_no_file_computes_nothing() {
    let spec = report::cybersecurity();
    let mut cache = TableCache::new();
    let mut state = ReportState::new(spec);
    state.load_from(
        &mut cache,
        &DataSource::Upload {
            name: "pending.csv".into(),
            bytes: None,
        },
    );

    assert!(state.is_waiting());
    assert!(state.output().is_none());
    assert!(cache.is_empty());
}

#[test]
fn numeric_range_dimension_filters_inclusively() {
    let spec = report::student_habits();
    let source = spec.bundled_source();
    let mut cache = TableCache::new();
    let mut state = ReportState::new(spec);
    state.load_from(&mut cache, &source);

    let full = state.view().unwrap().len();
    state.set_range("age", 18.0, 20.0);
    let view = state.view().unwrap();
    assert!(view.len() < full);
    for v in view.column_values("age") {
        let age = v.as_f64().unwrap();
        assert!((18.0..=20.0).contains(&age));
    }
}

#[test]
fn blank_csv_cells_survive_the_default_selection() {
    let source = DataSource::Upload {
        name: "gaps.csv".into(),
        bytes: Some(b"Year,Country\n2015,US\n2016,\n".to_vec()),
    };
    let table = match report_hub::data::loader::load(&source, &["Year", "Country"]).unwrap() {
        report_hub::LoadOutcome::Table(t) => t,
        report_hub::LoadOutcome::AwaitingUpload => unreachable!(),
    };

    let dims = [
        report_hub::Dimension::categorical("Year"),
        report_hub::Dimension::categorical("Country"),
    ];
    let selection = default_selection(&derive_domains(&table, &dims));
    let view = apply(&table, &selection);
    assert_eq!(view.len(), table.len());
    assert_eq!(view.indices(), [0, 1]);
}

#[test]
fn default_selection_is_identity_on_the_bundled_data() {
    let spec = report::cybersecurity();
    let table = match report_hub::data::loader::load(&spec.bundled_source(), spec.required_columns)
        .unwrap()
    {
        report_hub::LoadOutcome::Table(t) => t,
        report_hub::LoadOutcome::AwaitingUpload => unreachable!(),
    };
    let selection = default_selection(&derive_domains(&table, spec.dimensions));
    let view = apply(&table, &selection);
    assert_eq!(view.len(), table.len());

    // Sanity: the loss column is numeric throughout.
    assert!(view
        .column_values(cyber::LOSS)
        .all(|v| v.as_f64().is_some()));
}
