use crate::data::aggregate::{self, DerivedTable, Reducer, TrendLine};
use crate::data::filter::Dimension;
use crate::data::loader::DataSource;
use crate::data::model::FilteredView;

// ---------------------------------------------------------------------------
// Column names of the two datasets
// ---------------------------------------------------------------------------

pub mod cyber {
    pub const YEAR: &str = "Year";
    pub const COUNTRY: &str = "Country";
    pub const ATTACK_TYPE: &str = "Attack Type";
    pub const LOSS: &str = "Financial Loss (in Million $)";
    pub const AFFECTED_USERS: &str = "Number of Affected Users";
    pub const RESOLUTION_TIME: &str = "Incident Resolution Time (in Hours)";
    pub const VULNERABILITY: &str = "Security Vulnerability Type";
    pub const DEFENSE: &str = "Defense Mechanism Used";
}

pub mod student {
    pub const GENDER: &str = "gender";
    pub const PART_TIME_JOB: &str = "part_time_job";
    pub const AGE: &str = "age";
    pub const INTERNET_QUALITY: &str = "internet_quality";
    pub const MENTAL_HEALTH: &str = "mental_health_rating";
    pub const PARENTAL_EDUCATION: &str = "parental_education_level";
    pub const EXAM_SCORE: &str = "exam_score";
    pub const STUDY_HOURS: &str = "study_hours_per_day";
    pub const SLEEP_HOURS: &str = "sleep_hours";
    pub const DIET_QUALITY: &str = "diet_quality";
}

// ---------------------------------------------------------------------------
// Report definitions
// ---------------------------------------------------------------------------

/// A headline metric: its label and how it is computed.
#[derive(Debug, Clone, Copy)]
pub struct KpiSpec {
    pub label: &'static str,
    pub kind: KpiKind,
}

#[derive(Debug, Clone, Copy)]
pub enum KpiKind {
    RowCount,
    Sum(&'static str),
    Mean(&'static str),
}

/// One derived table of the report's fixed aggregation battery.
#[derive(Debug, Clone, Copy)]
pub enum TableSpec {
    /// Group by an ordinal/time key, reduce numeric columns; rows come out in
    /// ascending key order.
    GroupedTrend {
        key: &'static str,
        reductions: &'static [(&'static str, Reducer)],
    },
    /// Occurrence counts in first-seen order.
    Frequency { column: &'static str },
    /// Group-by-sum ranked descending, truncated to the top `n`.
    TopBySum {
        key: &'static str,
        value: &'static str,
        n: usize,
    },
    /// Mean per category, ranked ascending by the mean.
    MeanRanking {
        key: &'static str,
        value: &'static str,
    },
    /// Equal-width bucket counts of a numeric column.
    Histogram { column: &'static str, bins: usize },
    /// Raw (x, y) pairs plus an optional least-squares trend overlay.
    Scatter {
        x: &'static str,
        y: &'static str,
        trend: bool,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub table: TableSpec,
}

/// Everything that defines one report: its dataset schema, which columns the
/// filter panel exposes, and the aggregation battery behind its charts.
#[derive(Debug, Clone)]
pub struct ReportSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub required_columns: &'static [&'static str],
    pub dimensions: &'static [Dimension],
    pub kpis: &'static [KpiSpec],
    pub sections: &'static [SectionSpec],
    bundled_name: &'static str,
    bundled_csv: &'static str,
}

impl ReportSpec {
    /// The CSV shipped with the binary, as a loader source.
    pub fn bundled_source(&self) -> DataSource {
        DataSource::Bundled {
            name: self.bundled_name,
            csv: self.bundled_csv,
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in reports
// ---------------------------------------------------------------------------

/// Global cybersecurity threats, 2015-2024 (simulated incidents).
pub fn cybersecurity() -> ReportSpec {
    use cyber::*;

    const DIMENSIONS: &[Dimension] = &[
        Dimension::categorical(YEAR),
        Dimension::categorical(COUNTRY),
    ];
    const KPIS: &[KpiSpec] = &[
        KpiSpec {
            label: "Total Incidents",
            kind: KpiKind::RowCount,
        },
        KpiSpec {
            label: "Total Financial Loss (Million $)",
            kind: KpiKind::Sum(LOSS),
        },
        KpiSpec {
            label: "Total Affected Users",
            kind: KpiKind::Sum(AFFECTED_USERS),
        },
        KpiSpec {
            label: "Avg Resolution Time (hrs)",
            kind: KpiKind::Mean(RESOLUTION_TIME),
        },
    ];
    const SECTIONS: &[SectionSpec] = &[
        SectionSpec {
            key: "yearly_trend",
            title: "Yearly Trends",
            table: TableSpec::GroupedTrend {
                key: YEAR,
                reductions: &[
                    (LOSS, Reducer::Sum),
                    (AFFECTED_USERS, Reducer::Sum),
                    (RESOLUTION_TIME, Reducer::Mean),
                ],
            },
        },
        SectionSpec {
            key: "attack_types",
            title: "Most Common Attack Types",
            table: TableSpec::Frequency {
                column: ATTACK_TYPE,
            },
        },
        SectionSpec {
            key: "top_countries",
            title: "Top 10 Countries by Financial Loss",
            table: TableSpec::TopBySum {
                key: COUNTRY,
                value: LOSS,
                n: 10,
            },
        },
        SectionSpec {
            key: "vulnerability_types",
            title: "Distribution of Vulnerability Types",
            table: TableSpec::Frequency {
                column: VULNERABILITY,
            },
        },
        SectionSpec {
            key: "defense_resolution",
            title: "Avg Resolution Time by Defense Mechanism",
            table: TableSpec::MeanRanking {
                key: DEFENSE,
                value: RESOLUTION_TIME,
            },
        },
    ];

    ReportSpec {
        key: "cybersecurity",
        title: "Global Cybersecurity Threats (2015-2024)",
        required_columns: &[
            YEAR,
            COUNTRY,
            ATTACK_TYPE,
            LOSS,
            AFFECTED_USERS,
            RESOLUTION_TIME,
            VULNERABILITY,
            DEFENSE,
        ],
        dimensions: DIMENSIONS,
        kpis: KPIS,
        sections: SECTIONS,
        bundled_name: "global_cybersecurity_threats.csv",
        bundled_csv: include_str!("../assets/global_cybersecurity_threats.csv"),
    }
}

/// Student habits vs academic performance.
pub fn student_habits() -> ReportSpec {
    use student::*;

    const DIMENSIONS: &[Dimension] = &[
        Dimension::categorical(GENDER),
        Dimension::categorical(PART_TIME_JOB),
        Dimension::numeric(AGE),
        Dimension::categorical(INTERNET_QUALITY),
        Dimension::numeric(MENTAL_HEALTH),
        Dimension::categorical(PARENTAL_EDUCATION),
    ];
    const KPIS: &[KpiSpec] = &[
        KpiSpec {
            label: "Average Exam Score",
            kind: KpiKind::Mean(EXAM_SCORE),
        },
        KpiSpec {
            label: "Average Study Hours",
            kind: KpiKind::Mean(STUDY_HOURS),
        },
        KpiSpec {
            label: "Average Sleep Hours",
            kind: KpiKind::Mean(SLEEP_HOURS),
        },
    ];
    const SECTIONS: &[SectionSpec] = &[
        SectionSpec {
            key: "study_vs_score",
            title: "Study Hours vs Exam Score",
            table: TableSpec::Scatter {
                x: STUDY_HOURS,
                y: EXAM_SCORE,
                trend: true,
            },
        },
        SectionSpec {
            key: "score_by_diet",
            title: "Exam Score by Diet Quality",
            table: TableSpec::MeanRanking {
                key: DIET_QUALITY,
                value: EXAM_SCORE,
            },
        },
        SectionSpec {
            key: "mental_health_vs_score",
            title: "Mental Health Rating vs Exam Score",
            table: TableSpec::Scatter {
                x: MENTAL_HEALTH,
                y: EXAM_SCORE,
                trend: true,
            },
        },
        SectionSpec {
            key: "score_by_parental_education",
            title: "Exam Score by Parental Education Level",
            table: TableSpec::MeanRanking {
                key: PARENTAL_EDUCATION,
                value: EXAM_SCORE,
            },
        },
        SectionSpec {
            key: "sleep_distribution",
            title: "Distribution of Sleep Hours",
            table: TableSpec::Histogram {
                column: SLEEP_HOURS,
                bins: 20,
            },
        },
        SectionSpec {
            key: "score_by_internet_quality",
            title: "Internet Quality vs Exam Score",
            table: TableSpec::MeanRanking {
                key: INTERNET_QUALITY,
                value: EXAM_SCORE,
            },
        },
    ];

    ReportSpec {
        key: "student-habits",
        title: "Student Habits & Performance",
        required_columns: &[
            GENDER,
            PART_TIME_JOB,
            AGE,
            INTERNET_QUALITY,
            MENTAL_HEALTH,
            PARENTAL_EDUCATION,
            EXAM_SCORE,
            STUDY_HOURS,
            SLEEP_HOURS,
            DIET_QUALITY,
        ],
        dimensions: DIMENSIONS,
        kpis: KPIS,
        sections: SECTIONS,
        bundled_name: "student_habits_performance.csv",
        bundled_csv: include_str!("../assets/student_habits_performance.csv"),
    }
}

/// All built-in reports, in hub order.
pub fn all() -> Vec<ReportSpec> {
    vec![cybersecurity(), student_habits()]
}

pub fn by_key(key: &str) -> Option<ReportSpec> {
    all().into_iter().find(|r| r.key == key)
}

// ---------------------------------------------------------------------------
// Running a report
// ---------------------------------------------------------------------------

/// A computed headline metric. `value` is `None` ("no data") when the
/// filtered view is empty and the metric is a mean.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SectionOutput {
    pub key: String,
    pub title: String,
    pub table: DerivedTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendLine>,
}

/// Everything the presentation layer needs to render one pass of a report:
/// plain scalars and tables, nothing chart-library-specific.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReportOutput {
    pub report: String,
    pub title: String,
    pub row_count: usize,
    pub kpis: Vec<Kpi>,
    pub sections: Vec<SectionOutput>,
}

/// Run the report's full aggregation battery against a filtered view. Total
/// and idempotent; an empty view produces empty tables and "no data" means,
/// never an error.
pub fn run(spec: &ReportSpec, view: &FilteredView<'_>) -> ReportOutput {
    let kpis = spec
        .kpis
        .iter()
        .map(|kpi| {
            let value = match kpi.kind {
                KpiKind::RowCount => Some(view.len() as f64),
                KpiKind::Sum(col) => Some(aggregate::sum(view, col)),
                KpiKind::Mean(col) => aggregate::mean(view, col),
            };
            Kpi {
                label: kpi.label.to_string(),
                value,
            }
        })
        .collect();

    let sections = spec
        .sections
        .iter()
        .map(|section| {
            let (table, trend) = match section.table {
                TableSpec::GroupedTrend { key, reductions } => {
                    (aggregate::group_by(view, key, reductions), None)
                }
                TableSpec::Frequency { column } => (aggregate::frequency(view, column), None),
                TableSpec::TopBySum { key, value, n } => {
                    (aggregate::top_n_by_sum(view, key, value, n), None)
                }
                TableSpec::MeanRanking { key, value } => (aggregate::mean_by(view, key, value), None),
                TableSpec::Histogram { column, bins } => {
                    (aggregate::histogram(view, column, bins), None)
                }
                TableSpec::Scatter { x, y, trend } => (
                    aggregate::scatter_pairs(view, x, y),
                    trend.then(|| aggregate::linear_trend(view, x, y)).flatten(),
                ),
            };
            SectionOutput {
                key: section.key.to_string(),
                title: section.title.to_string(),
                table,
                trend,
            }
        })
        .collect();

    ReportOutput {
        report: spec.key.to_string(),
        title: spec.title.to_string(),
        row_count: view.len(),
        kpis,
        sections,
    }
}
