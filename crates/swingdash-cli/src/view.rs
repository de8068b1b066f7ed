//! Plain-text rendering of comparison results

use std::io::{self, Write};

use swingdash_analysis::{
    analytics::{ComparisonDelta, DescriptiveSummary, KpiRow},
    pipeline::{ComparisonReport, SHOT_TABLE_LIMIT, ShotTable, StageCount},
};

const UNDEFINED: &str = "—";

fn format_float(value: Option<f64>, decimals: usize, suffix: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}{suffix}"),
        _ => UNDEFINED.to_owned(),
    }
}

fn direction(sign: Option<i8>) -> &'static str {
    match sign {
        Some(1) => "↑ Improved",
        Some(-1) => "↓ Worse",
        _ => UNDEFINED,
    }
}

/// Column-aligned text table; the first column is left-aligned, the rest
/// right-aligned.
struct TextTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: vec![],
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .chain([h])
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn write_line<W>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()>
    where
        W: Write,
    {
        let mut line = String::from(" ");
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            let pad = width.saturating_sub(cell.chars().count());
            line.push(' ');
            if i == 0 {
                line.push_str(cell);
                line.push_str(&" ".repeat(pad));
            } else {
                line.push_str(&" ".repeat(pad));
                line.push_str(cell);
            }
        }
        writeln!(out, "{}", line.trim_end())
    }

    fn write<W>(&self, out: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        let widths = self.widths();
        Self::write_line(out, &self.header, &widths)?;
        let total = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        writeln!(out, "  {}", "-".repeat(total))?;
        for row in &self.rows {
            Self::write_line(out, row, &widths)?;
        }
        Ok(())
    }
}

fn write_section<W>(out: &mut W, title: &str) -> io::Result<()>
where
    W: Write,
{
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(title.chars().count()))
}

fn write_no_data<W>(out: &mut W) -> io::Result<()>
where
    W: Write,
{
    writeln!(out, "  No data available for this section.")
}

pub fn write_stage_counts<W>(
    out: &mut W,
    counts: &[StageCount],
    baseline: &str,
    comparison: &str,
) -> io::Result<()>
where
    W: Write,
{
    write_section(out, "Shot counts")?;
    let mut table = TextTable::new(["Stage", baseline, comparison]);
    for count in counts {
        table.push(vec![
            count.stage.to_string(),
            count.baseline.to_string(),
            count.comparison.to_string(),
        ]);
    }
    table.write(out)
}

/// KPI tiles in the configured metric order.
pub fn write_kpi_tiles<W>(out: &mut W, kpis: &[KpiRow]) -> io::Result<()>
where
    W: Write,
{
    write_section(out, "Key metrics")?;
    let mut table = TextTable::new(["Metric", "Value", "Change"]);
    for kpi in kpis {
        let change = match (kpi.delta, kpi.pct) {
            (Some(delta), Some(pct)) => format!("{delta:+.2} ({pct:+.1}%)"),
            (Some(delta), None) => format!("{delta:+.2}"),
            (None, _) => UNDEFINED.to_owned(),
        };
        table.push(vec![kpi.metric.clone(), format_float(kpi.new, 2, ""), change]);
    }
    if table.rows.is_empty() {
        return write_no_data(out);
    }
    table.write(out)
}

pub fn write_summary<W>(out: &mut W, title: &str, summary: &DescriptiveSummary) -> io::Result<()>
where
    W: Write,
{
    write_section(out, title)?;
    if summary.is_empty() {
        return write_no_data(out);
    }
    let mut table = TextTable::new(["Metric", "Shots", "Mean", "Median", "Std Dev"]);
    for row in &summary.rows {
        table.push(vec![
            row.metric.clone(),
            row.count.to_string(),
            format_float(row.mean, 2, ""),
            format_float(row.median, 2, ""),
            format_float(row.std, 2, ""),
        ]);
    }
    table.write(out)
}

pub fn write_comparison<W>(
    out: &mut W,
    delta: &ComparisonDelta,
    baseline: &str,
    comparison: &str,
) -> io::Result<()>
where
    W: Write,
{
    write_section(out, "Session comparison")?;
    if delta.is_empty() {
        return write_no_data(out);
    }
    let mut table = TextTable::new([
        "Metric".to_owned(),
        format!("Mean ({baseline})"),
        format!("Mean ({comparison})"),
        "Δ Mean".to_owned(),
        "Δ %".to_owned(),
        format!("Median ({baseline})"),
        format!("Median ({comparison})"),
        "Direction".to_owned(),
    ]);
    for row in &delta.rows {
        table.push(vec![
            row.metric.clone(),
            format_float(row.mean_old, 2, ""),
            format_float(row.mean_new, 2, ""),
            format_float(row.delta, 2, ""),
            format_float(row.pct_change, 1, "%"),
            format_float(row.median_old, 2, ""),
            format_float(row.median_new, 2, ""),
            direction(row.improvement_sign).to_owned(),
        ]);
    }
    table.write(out)
}

pub fn write_shots<W>(out: &mut W, shots: &ShotTable) -> io::Result<()>
where
    W: Write,
{
    write_section(out, &format!("Balanced shots (first {SHOT_TABLE_LIMIT} rows)"))?;
    if shots.is_empty() {
        return write_no_data(out);
    }
    let mut table = TextTable::new(shots.columns.iter().map(String::as_str));
    for row in &shots.rows {
        table.push(
            row.iter()
                .map(|value| match value.as_number() {
                    Some(v) => format_float(Some(v), 2, ""),
                    None => value.to_string(),
                })
                .collect(),
        );
    }
    table.write(out)?;
    if shots.truncated {
        writeln!(
            out,
            "  ... {} of {} shots shown",
            shots.rows.len(),
            shots.total_rows
        )?;
    }
    Ok(())
}

pub fn write_report<W>(out: &mut W, report: &ComparisonReport) -> io::Result<()>
where
    W: Write,
{
    let baseline = report.labels.baseline.as_str();
    let comparison = report.labels.comparison.as_str();

    writeln!(out, "Session comparison: {baseline} vs {comparison}")?;
    writeln!(out)?;
    for (label, empty) in [
        (baseline, report.baseline_empty),
        (comparison, report.comparison_empty),
    ] {
        if empty {
            writeln!(out, "Warning: no shots of '{label}' remain after processing")?;
            writeln!(out)?;
        }
    }

    write_stage_counts(out, &report.stage_counts, baseline, comparison)?;
    writeln!(out)?;
    write_kpi_tiles(out, &report.kpis)?;
    writeln!(out)?;
    write_summary(out, &format!("{baseline} summary"), &report.baseline_summary)?;
    writeln!(out)?;
    write_summary(out, &format!("{comparison} summary"), &report.comparison_summary)?;
    writeln!(out)?;
    write_comparison(out, &report.comparison, baseline, comparison)?;
    writeln!(out)?;
    write_shots(out, &report.shots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swingdash_analysis::analytics::{MetricDelta, MetricSummary};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(Some(5.555), 1, "%"), "5.6%");
        assert_eq!(format_float(Some(-8.0), 2, ""), "-8.00");
        assert_eq!(format_float(None, 2, ""), "—");
        assert_eq!(format_float(Some(f64::INFINITY), 2, ""), "—");
    }

    #[test]
    fn test_comparison_table() {
        let delta = ComparisonDelta {
            rows: vec![
                MetricDelta {
                    metric: "Club Speed".to_owned(),
                    mean_old: Some(90.0),
                    mean_new: Some(95.0),
                    median_old: Some(90.0),
                    median_new: Some(95.0),
                    delta: Some(5.0),
                    pct_change: Some(5.555_555),
                    improvement_sign: Some(1),
                },
                MetricDelta {
                    metric: "Spin Rate".to_owned(),
                    mean_old: Some(0.0),
                    mean_new: Some(2500.0),
                    median_old: Some(0.0),
                    median_new: Some(2500.0),
                    delta: Some(2500.0),
                    pct_change: None,
                    improvement_sign: None,
                },
            ],
        };
        let text = render(|out| write_comparison(out, &delta, "Old", "New"));
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Session comparison");
        assert!(lines[2].contains("Mean (Old)"));
        assert!(lines[2].contains("Median (New)"));
        assert!(lines[4].starts_with("  Club Speed"));
        assert!(lines[4].contains("5.00"));
        assert!(lines[4].contains("5.6%"));
        assert!(lines[4].ends_with("↑ Improved"));
        assert!(lines[5].ends_with("—"));
    }

    #[test]
    fn test_empty_sections() {
        let text = render(|out| write_summary(out, "Old summary", &DescriptiveSummary::default()));
        assert!(text.contains("No data available"));

        let summary = DescriptiveSummary {
            rows: vec![MetricSummary {
                metric: "Club Speed".to_owned(),
                count: 1,
                mean: Some(90.0),
                median: Some(90.0),
                std: None,
            }],
        };
        let text = render(|out| write_summary(out, "Old summary", &summary));
        let row = text.lines().last().unwrap();
        assert!(row.starts_with("  Club Speed"));
        assert!(row.ends_with("—"));
    }

    fn kpi(metric: &str, old: f64, new: f64) -> KpiRow {
        KpiRow {
            metric: metric.to_owned(),
            old: Some(old),
            new: Some(new),
            delta: Some(new - old),
            pct: (old.abs() > 0.0).then(|| (new - old) / old * 100.0),
        }
    }

    #[test]
    fn test_kpi_change_format() {
        let text = render(|out| write_kpi_tiles(out, &[kpi("Club Speed", 90.0, 95.0)]));
        assert!(text.contains("95.00"));
        assert!(text.contains("+5.00 (+5.6%)"));

        let text = render(|out| write_kpi_tiles(out, &[kpi("Spin Rate", 0.0, 2500.0)]));
        assert!(text.lines().last().unwrap().ends_with("+2500.00"));
    }

    #[test]
    fn test_kpi_tiles_keep_configured_order() {
        let kpis = [
            kpi("Club Speed", 90.0, 95.0),
            kpi("Ball Speed", 130.0, 135.0),
            kpi("Carry Distance", 150.0, 160.0),
            kpi("Apex Height", 25.0, 27.0),
        ];
        let text = render(|out| write_kpi_tiles(out, &kpis));
        let metrics = text
            .lines()
            .skip(4)
            .map(|line| line.split("  ").map(str::trim).find(|c| !c.is_empty()).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(
            metrics,
            vec!["Club Speed", "Ball Speed", "Carry Distance", "Apex Height"]
        );
    }
}
