use crate::stats::{Counter, Counters, StatsTable};
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Plain-text layouts for the summary tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutFormat {
    Wsv,
    Tsv,
    Csv,
    Vnl,
}

impl OutFormat {
    pub const NAMES: [&'static str; 4] = ["wsv", "tsv", "csv", "vnl"];

    /// Prefix for header lines; vnlog headers are comments.
    pub fn header_start(&self) -> &'static str {
        match self {
            OutFormat::Vnl => "# ",
            _ => "",
        }
    }

    pub fn seperator(&self) -> &'static str {
        match self {
            OutFormat::Wsv | OutFormat::Vnl => " ",
            OutFormat::Tsv => "\t",
            OutFormat::Csv => ",",
        }
    }

    /// Only whitespace output gets padded into columns.
    fn pads(&self) -> bool {
        match self {
            OutFormat::Wsv | OutFormat::Vnl => true,
            _ => false,
        }
    }
}

impl FromStr for OutFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wsv" => Ok(OutFormat::Wsv),
            "tsv" => Ok(OutFormat::Tsv),
            "csv" => Ok(OutFormat::Csv),
            "vnl" => Ok(OutFormat::Vnl),
            _ => Err(std::format!("Unrecognized output format: {}", s)),
        }
    }
}

/// Join `outs` with `seperator`, padding each column but the last out to
/// its width and cutting anything longer.
pub fn align_output(outs: &[String], widths: &[usize], seperator: &str) -> String {
    let len: usize = widths.iter().filter(|x| **x < usize::MAX).sum();
    let mut ret = String::with_capacity(len + outs.len());
    for (i, s) in outs.iter().enumerate() {
        let wi = widths.get(i).copied().unwrap_or(usize::MAX);
        let cut: String = s.chars().take(wi).collect();
        let clen = cut.chars().count();
        ret.push_str(&cut);
        if i < outs.len() - 1 {
            ret.push_str(seperator);
            for _ in clen..wi {
                ret.push(' ');
            }
        }
    }
    ret
}

/// Descending by `counter`, ties broken by name so output is stable.
pub fn by_counter(
    counter: Counter,
) -> impl Fn(&(&String, &Counters), &(&String, &Counters)) -> Ordering {
    move |a: &(&String, &Counters), b: &(&String, &Counters)| {
        b.1.get(counter)
            .cmp(&a.1.get(counter))
            .then_with(|| a.0.cmp(b.0))
    }
}

/// Name of the closing row that sums every entry.
pub const TOTAL_ROW: &str = "*total*";

fn counter_row(name: &str, c: &Counters) -> Vec<String> {
    let mut row = vec![name.to_string()];
    row.extend(Counter::ALL.iter().map(|k| c.get(*k).to_string()));
    row.push(std::format!("{:2.2}", c.kd_ratio()));
    row.push(match c.accuracy() {
        Some(acc) => std::format!("{:2.2}", acc),
        None => "-".to_string(),
    });
    row
}

/// Render a statistics table, one row per name plus a closing totals row.
/// `label` heads the name column (e.g. "pilot" or "group"). Sorted by name
/// unless `sort` is set. Acc is hits per shot, `-` when nothing was fired.
pub fn render_table(
    label: &str,
    table: &StatsTable,
    format: OutFormat,
    sort: Option<Counter>,
) -> Vec<String> {
    let name_width = table
        .iter()
        .map(|(n, _)| n.chars().count())
        .chain(std::iter::once(label.len()))
        .chain(std::iter::once(TOTAL_ROW.len()))
        .max()
        .unwrap_or(0)
        + 1;

    let mut header = vec![label.to_string()];
    header.extend(Counter::ALL.iter().map(|c| c.name()[..1].to_string()));
    header.push("K/D".to_string());
    header.push("Acc".to_string());

    let mut widths = vec![name_width];
    widths.extend(std::iter::repeat(5).take(Counter::ALL.len() + 1));
    widths.push(usize::MAX);
    //separated formats take each field at its own length
    let widths_for = |row: &[String]| -> Vec<usize> {
        if format.pads() {
            widths.clone()
        } else {
            row.iter().map(|s| s.chars().count()).collect()
        }
    };

    let mut lines = Vec::with_capacity(table.len() + 2);
    lines.push(std::format!(
        "{}{}",
        format.header_start(),
        align_output(&header, &widths_for(&header), format.seperator())
    ));

    let rows: Vec<(&String, &Counters)> = match sort {
        Some(counter) => table.iter().sorted_by(by_counter(counter)).collect(),
        None => table.iter().collect(),
    };
    for (name, c) in rows {
        let row = counter_row(name, c);
        lines.push(align_output(&row, &widths_for(&row), format.seperator()));
    }
    if !table.is_empty() {
        let row = counter_row(TOTAL_ROW, &table.totals());
        lines.push(align_output(&row, &widths_for(&row), format.seperator()));
    }
    lines
}

/// `key: value` lines for the header metadata, in key order.
pub fn render_metadata(metadata: &BTreeMap<String, String>) -> Vec<String> {
    metadata
        .iter()
        .map(|(k, v)| std::format!("{}: {}", k, v))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use claim::{assert_err, assert_ok_eq};

    fn sample() -> StatsTable {
        let mut t = StatsTable::new();
        t.increment("Viper", Counter::Kills);
        t.increment("Duke", Counter::Kills);
        t.increment("Duke", Counter::Kills);
        t.increment("Duke", Counter::Deaths);
        t.increment("Unknown", Counter::Shots);
        t
    }

    #[test]
    fn align_pads_and_cuts() {
        let outs = vec!["abc".to_string(), "defgh".to_string(), "last".to_string()];
        let widths = vec![4, 3, usize::MAX];
        assert_eq!(align_output(&outs, &widths, "|"), "abc| def|last");
    }

    #[test]
    fn align_handles_multibyte_names() {
        let outs = vec!["Ærøskøbing".to_string(), "1".to_string()];
        let widths = vec![3, usize::MAX];
        assert_eq!(align_output(&outs, &widths, " "), "Ærø 1");
    }

    #[test]
    fn csv_has_no_padding() {
        let lines = render_table("pilot", &sample(), OutFormat::Csv, None);
        assert_eq!(lines[0], "pilot,S,H,K,D,T,L,K/D,Acc");
        assert_eq!(lines[1], "Duke,0,0,2,1,0,0,2.00,-");
        assert_eq!(lines[2], "Unknown,1,0,0,0,0,0,0.00,0.00");
        assert_eq!(lines[3], "Viper,0,0,1,0,0,0,1.00,-");
        assert_eq!(lines[4], "*total*,1,0,3,1,0,0,3.00,0.00");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn accuracy_column_is_hits_per_shot() {
        let mut t = StatsTable::new();
        for _ in 0..4 {
            t.increment("Viper", Counter::Shots);
        }
        t.increment("Viper", Counter::Hits);
        t.increment("Duke", Counter::Shots);
        let lines = render_table("pilot", &t, OutFormat::Csv, None);
        assert_eq!(lines[1], "Duke,1,0,0,0,0,0,0.00,0.00");
        assert_eq!(lines[2], "Viper,4,1,0,0,0,0,0.00,0.25");
        assert_eq!(lines[3], "*total*,5,1,0,0,0,0,0.00,0.20");
    }

    #[test]
    fn totals_row_stays_last_when_sorted() {
        let lines = render_table("pilot", &sample(), OutFormat::Wsv, Some(Counter::Shots));
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("Unknown "));
        assert!(lines[4].starts_with(TOTAL_ROW));
    }

    #[test]
    fn sorted_by_counter_descending() {
        let lines = render_table("pilot", &sample(), OutFormat::Tsv, Some(Counter::Kills));
        assert!(lines[1].starts_with("Duke\t"));
        assert!(lines[2].starts_with("Viper\t"));
        assert!(lines[3].starts_with("Unknown\t"));
    }

    #[test]
    fn vnl_header_is_a_comment() {
        let lines = render_table("group", &sample(), OutFormat::Vnl, None);
        assert!(lines[0].starts_with("# group"));
        assert!(!lines[1].starts_with('#'));
    }

    #[test]
    fn empty_table_is_just_a_header() {
        let lines = render_table("pilot", &StatsTable::new(), OutFormat::Wsv, None);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn formats_parse() {
        for name in OutFormat::NAMES.iter() {
            assert!(name.parse::<OutFormat>().is_ok());
        }
        assert_ok_eq!("csv".parse::<OutFormat>(), OutFormat::Csv);
        assert_err!("json".parse::<OutFormat>());
    }

    #[test]
    fn metadata_lines() {
        let mut m = BTreeMap::new();
        m.insert("Title".to_string(), "Sortie".to_string());
        m.insert("FileType".to_string(), "text/acmi/tacview".to_string());
        assert_eq!(
            render_metadata(&m),
            vec!["FileType: text/acmi/tacview".to_string(), "Title: Sortie".to_string()]
        );
    }
}
