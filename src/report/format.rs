//! Formatted terminal output.
//!
//! We keep formatting code in one place so the data and growth code stay free of
//! presentation concerns.

use crate::status::Assessment;

const DATE_FORMAT: &str = "%-d %b %Y";

/// One-paragraph status sentence for a region.
pub fn format_status(a: &Assessment) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: {}. ", a.country, a.status.label()));
    out.push_str(&format!(
        "Active cases of #Covid_19 are compounding daily by {:.2}; as of {}, there are {} active cases. ",
        a.rate,
        a.updated.format(DATE_FORMAT),
        group_thousands(a.active_cases),
    ));
    out.push_str(&format!(
        "Projections: {} cases ({}) in {} days",
        fmt_count(a.forecast_cases),
        fmt_growth(a.forecast_growth),
        a.forecast_days,
    ));
    if a.rate < 1.0 {
        out.push_str(&format!(
            "; only 1 active case left in {} days",
            fmt_count(a.days_to_one_case)
        ));
    }
    out.push('.');

    out
}

/// Ranked table, skipping regions with no active cases.
///
/// Row numbers are positions in the full ranking, so skipped regions leave gaps.
pub fn format_top(list: &[Assessment]) -> String {
    let width = list
        .iter()
        .map(|a| a.country.chars().count())
        .max()
        .unwrap_or(0)
        .max("country".len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:>3} {:<width$} {:>5} {:>8}    {}\n",
        "#", "country", "score", "cases", "rate x rate² -- peak"
    ));
    out.push_str(&"-".repeat(3 + 1 + width + 1 + 5 + 1 + 8 + 4 + 20));
    out.push('\n');

    for (i, a) in list.iter().enumerate().filter(|(_, a)| a.active_cases >= 1) {
        out.push_str(&format!(
            "{:>3} {:<width$} {:>5} {:>8}    {:.2}x{:.4} -- {}\n",
            i + 1,
            a.country,
            a.score,
            a.active_cases,
            a.rate,
            a.rate_of_rates,
            fmt_count(a.peak_cases),
        ));
    }

    out
}

pub fn format_countries(countries: &[String]) -> String {
    let mut out = countries.join("\n");
    out.push('\n');
    out
}

/// Signed whole percentage, e.g. `+15%` or `-3%`.
pub fn fmt_growth(percent: f64) -> String {
    let sign = if percent > 0.0 { "+" } else { "" };
    format!("{sign}{percent:.0}%")
}

/// Whole number with thousands separators; non-finite values print as-is.
pub fn fmt_count(v: f64) -> String {
    if !v.is_finite() || v.abs() >= i64::MAX as f64 {
        return format!("{v}");
    }
    group_thousands(v.round() as i64)
}

pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Counts, Window};

    fn assessment(country: &str, counts: Counts) -> Assessment {
        let latest = NaiveDate::from_ymd_opt(2020, 3, 23).unwrap();
        let window = Window::resolve(latest, Some(7), None, None, None).unwrap();
        Assessment::evaluate(country, &window, counts)
    }

    #[test]
    fn thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1435678), "1,435,678");
        assert_eq!(group_thousands(-2263), "-2,263");
    }

    #[test]
    fn growth_and_counts() {
        assert_eq!(fmt_growth(15.4), "+15%");
        assert_eq!(fmt_growth(-3.2), "-3%");
        assert_eq!(fmt_growth(0.0), "0%");
        assert_eq!(fmt_count(12343.6), "12,344");
        assert_eq!(fmt_count(f64::INFINITY), "inf");
        assert_eq!(fmt_count(f64::NAN), "NaN");
    }

    #[test]
    fn status_sentence_for_growth() {
        let a = assessment("ITALY", Counts { compare: 2500, since: 10000, latest: 40000 });
        let s = format_status(&a);
        assert!(s.starts_with("ITALY: out of control. "), "{s}");
        assert!(s.contains("as of 23 Mar 2020, there are 40,000 active cases"), "{s}");
        assert!(s.contains("in 30 days."), "{s}");
        assert!(!s.contains("only 1 active case"), "{s}");
    }

    #[test]
    fn status_sentence_for_decline_mentions_last_case() {
        let a = assessment("WORLD", Counts { compare: 4000, since: 2000, latest: 1000 });
        let s = format_status(&a);
        assert!(s.starts_with("WORLD: resolving. "), "{s}");
        assert!(s.contains("; only 1 active case left in "), "{s}");
        assert!(s.ends_with(" days."), "{s}");
    }

    #[test]
    fn top_skips_empty_regions() {
        let list = vec![
            assessment("ATLANTIS", Counts { compare: 0, since: 0, latest: 0 }),
            assessment("ITALY", Counts { compare: 4000, since: 2000, latest: 1000 }),
        ];
        let table = format_top(&list);
        assert!(!table.contains("ATLANTIS"));
        assert_eq!(table.lines().count(), 3);
        // Numbering keeps the position in the full ranking.
        let row = table.lines().nth(2).unwrap();
        assert!(row.trim_start().starts_with("2 ITALY"), "{row}");
    }
}
