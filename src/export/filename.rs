//! Export file naming

use crate::persistence::Snapshot;
use chrono::NaiveDate;

/// Keep ASCII letters and digits, turn everything else into `_`, then
/// collapse runs of `_`
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

fn first_non_empty(snapshot: &Snapshot, names: &[&str], fallback: &str) -> String {
    names
        .iter()
        .filter_map(|name| snapshot.text(name))
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// `{division}_{school}_{YYYY-MM-DD}.doc`
pub fn export_file_name(snapshot: &Snapshot, date: NaiveDate) -> String {
    let school = first_non_empty(snapshot, &["schoolNameDeped", "schoolNameSec"], "School");
    let division = first_non_empty(snapshot, &["sdo"], "Division");
    format!(
        "{}_{}_{}.doc",
        sanitize(&division),
        sanitize(&school),
        date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("St. Mary's Academy"), "St_Mary_s_Academy");
        assert_eq!(sanitize("Pasig -- City"), "Pasig_City");
        assert_eq!(sanitize("Niño"), "Ni_o");
        assert_eq!(sanitize("a__b"), "a_b");
    }

    #[test]
    fn test_name_from_division_and_deped_name() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("sdo", "Quezon City");
        snapshot.insert("schoolNameSec", "SEC Name Inc.");
        snapshot.insert("schoolNameDeped", "St. Mary's Academy");
        assert_eq!(
            export_file_name(&snapshot, date()),
            "Quezon_City_St_Mary_s_Academy_2024-06-03.doc"
        );
    }

    #[test]
    fn test_falls_back_to_sec_name() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("sdo", "Cebu");
        snapshot.insert("schoolNameDeped", "");
        snapshot.insert("schoolNameSec", "Cebu Learning Center");
        assert_eq!(
            export_file_name(&snapshot, date()),
            "Cebu_Cebu_Learning_Center_2024-06-03.doc"
        );
    }

    #[test]
    fn test_defaults_when_empty() {
        assert_eq!(
            export_file_name(&Snapshot::new(), date()),
            "Division_School_2024-06-03.doc"
        );
    }
}
