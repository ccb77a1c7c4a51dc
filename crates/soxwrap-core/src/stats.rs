//! Parsing of the external tool's statistics report
//!
//! `sox <input> -n stats` prints a table of one metric per row. For stereo
//! input the table grows an `Overall Left Right` header and three value
//! columns per row; for mono input each row is just label and value.
//! Labels vary in width (`DC offset`, `RMS lev dB`), so rows are token
//! counted rather than column sliced.

use serde::Serialize;
use std::collections::BTreeMap;

/// Metric label to metric value. Values look numeric but are kept as text.
pub type MetricMap = BTreeMap<String, String>;

/// Per-scope breakdown for stereo input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub overall: MetricMap,
    pub left: MetricMap,
    pub right: MetricMap,
}

/// A parsed statistics report: nested per-channel maps for stereo input,
/// a single flat map for mono input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatsReport {
    Stereo(ChannelStats),
    Mono(MetricMap),
}

impl StatsReport {
    pub fn is_empty(&self) -> bool {
        match self {
            StatsReport::Stereo(s) => {
                s.overall.is_empty() && s.left.is_empty() && s.right.is_empty()
            }
            StatsReport::Mono(m) => m.is_empty(),
        }
    }
}

/// Parse captured stats text into a report.
///
/// Stereo layout is detected by the literal `Left` column header. Label
/// normalization (lowercase, spaces to underscores) is lossy on purpose:
/// the result keys a map. Duplicate labels keep the last row's value.
pub fn parse_stats(text: &str) -> StatsReport {
    if text.contains("Left") {
        StatsReport::Stereo(parse_stereo(text))
    } else {
        StatsReport::Mono(parse_mono(text))
    }
}

fn normalize_label(tokens: &[&str]) -> String {
    tokens.join("_").to_lowercase()
}

fn parse_stereo(text: &str) -> ChannelStats {
    let mut stats = ChannelStats::default();
    // First line is the Overall/Left/Right header.
    for line in text.lines().skip(1) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.len() {
            0 => continue,
            4 => {
                let label = tokens[0].to_lowercase();
                stats.overall.insert(label.clone(), tokens[1].to_string());
                stats.left.insert(label.clone(), tokens[2].to_string());
                stats.right.insert(label, tokens[3].to_string());
            }
            n if n > 4 => {
                let label = normalize_label(&tokens[..n - 3]);
                stats.overall.insert(label.clone(), tokens[n - 3].to_string());
                stats.left.insert(label.clone(), tokens[n - 2].to_string());
                stats.right.insert(label, tokens[n - 1].to_string());
            }
            n => {
                // A short row carries a single value (e.g. "Length s 10.0");
                // it is copied into all three scopes to match the historical
                // output shape.
                let label = normalize_label(&tokens[..n - 1]);
                let value = tokens[n - 1];
                stats.overall.insert(label.clone(), value.to_string());
                stats.left.insert(label.clone(), value.to_string());
                stats.right.insert(label, value.to_string());
            }
        }
    }
    stats
}

fn parse_mono(text: &str) -> MetricMap {
    let mut map = MetricMap::new();
    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.len() {
            // Rows without a value are skipped.
            0 | 1 => continue,
            2 => {
                map.insert(tokens[0].to_lowercase(), tokens[1].to_string());
            }
            n => {
                map.insert(normalize_label(&tokens[..n - 1]), tokens[n - 1].to_string());
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEREO_TEXT: &str = "\
             Overall     Left      Right
DC offset   0.000803  0.000803  0.000803
Min level  -0.515617 -0.515617 -0.509262
Bit-depth      16/16     16/16     16/16
RMS lev dB    -20.5     -20.4     -20.6
Length s       10.0
";

    const MONO_TEXT: &str = "\
DC offset   0.000803
Min level  -0.515617
Bit-depth      16/16
RMS lev dB    -20.5
";

    fn stereo(report: StatsReport) -> ChannelStats {
        match report {
            StatsReport::Stereo(s) => s,
            other => panic!("expected stereo report, got {:?}", other),
        }
    }

    fn mono(report: StatsReport) -> MetricMap {
        match report {
            StatsReport::Mono(m) => m,
            other => panic!("expected mono report, got {:?}", other),
        }
    }

    #[test]
    fn test_stereo_four_token_rows() {
        // ["Bit-depth", "16/16", "16/16", "16/16"]
        let stats = stereo(parse_stats(STEREO_TEXT));
        assert_eq!(stats.overall["bit-depth"], "16/16");
        assert_eq!(stats.left["bit-depth"], "16/16");
        assert_eq!(stats.right["bit-depth"], "16/16");
    }

    #[test]
    fn test_stereo_wide_label_rows() {
        // ["RMS", "lev", "dB", "-20.5", "-20.4", "-20.6"]
        let stats = stereo(parse_stats(STEREO_TEXT));
        assert_eq!(stats.overall["rms_lev_db"], "-20.5");
        assert_eq!(stats.left["rms_lev_db"], "-20.4");
        assert_eq!(stats.right["rms_lev_db"], "-20.6");
        // ["DC", "offset", ...] two-word label, three values
        assert_eq!(stats.overall["dc_offset"], "0.000803");
        assert_eq!(stats.left["min_level"], "-0.515617");
        assert_eq!(stats.right["min_level"], "-0.509262");
    }

    #[test]
    fn test_stereo_short_row_replicates_value() {
        // ["Length", "s", "10.0"] puts 10.0 into every scope.
        let stats = stereo(parse_stats(STEREO_TEXT));
        assert_eq!(stats.overall["length_s"], "10.0");
        assert_eq!(stats.left["length_s"], "10.0");
        assert_eq!(stats.right["length_s"], "10.0");
    }

    #[test]
    fn test_stereo_scopes_share_keys() {
        let stats = stereo(parse_stats(STEREO_TEXT));
        let overall_keys: Vec<_> = stats.overall.keys().collect();
        let left_keys: Vec<_> = stats.left.keys().collect();
        let right_keys: Vec<_> = stats.right.keys().collect();
        assert_eq!(overall_keys, left_keys);
        assert_eq!(overall_keys, right_keys);
    }

    #[test]
    fn test_stereo_header_line_is_skipped() {
        let stats = stereo(parse_stats(STEREO_TEXT));
        assert!(!stats.overall.contains_key("overall"));
    }

    #[test]
    fn test_mono_two_token_rows() {
        // ["Bit-depth", "16/16"]
        let map = mono(parse_stats(MONO_TEXT));
        assert_eq!(map["bit-depth"], "16/16");
    }

    #[test]
    fn test_mono_wide_label_rows() {
        let map = mono(parse_stats(MONO_TEXT));
        assert_eq!(map["dc_offset"], "0.000803");
        assert_eq!(map["min_level"], "-0.515617");
        assert_eq!(map["rms_lev_db"], "-20.5");
    }

    #[test]
    fn test_mono_single_token_rows_skipped() {
        let map = mono(parse_stats("garbage\nPk count 129\n"));
        assert_eq!(map.len(), 1);
        assert_eq!(map["pk_count"], "129");
    }

    #[test]
    fn test_whitespace_collapses() {
        let map = mono(parse_stats("RMS   lev    dB      -20.5\n"));
        assert_eq!(map["rms_lev_db"], "-20.5");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_stats("").is_empty());
        match parse_stats("") {
            StatsReport::Mono(m) => assert!(m.is_empty()),
            other => panic!("expected mono report, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_labels_last_row_wins() {
        let map = mono(parse_stats("Pk lev dB -1.0\nPk lev dB -2.0\n"));
        assert_eq!(map["pk_lev_db"], "-2.0");
    }

    #[test]
    fn test_parser_is_pure() {
        assert_eq!(parse_stats(STEREO_TEXT), parse_stats(STEREO_TEXT));
        assert_eq!(parse_stats(MONO_TEXT), parse_stats(MONO_TEXT));
    }
}
