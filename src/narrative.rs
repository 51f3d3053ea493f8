use std::collections::BTreeMap;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Static observation text, keyed by report and section
// ---------------------------------------------------------------------------

/// Narrative blocks belong to the presentation layer, not the computation
/// core, so they live in `assets/narratives.json` as data rather than inline
/// strings.
type Narratives = BTreeMap<String, BTreeMap<String, Vec<String>>>;

fn narratives() -> &'static Narratives {
    static NARRATIVES: OnceLock<Narratives> = OnceLock::new();
    NARRATIVES.get_or_init(|| {
        serde_json::from_str(include_str!("../assets/narratives.json"))
            .unwrap_or_else(|e| panic!("assets/narratives.json is malformed: {e}"))
    })
}

/// Observation lines for one report section, if any were written.
pub fn observations(report: &str, section: &str) -> Option<&'static [String]> {
    narratives()
        .get(report)?
        .get(section)
        .map(|lines| lines.as_slice())
}
