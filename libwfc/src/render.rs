//! Output for one comparison: terminal table, CSV, word-cloud SVGs and a
//! Vega-Lite bar chart.

use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde_json::json;

use crate::{
    compare::{melt, ComparisonRow},
    frequency::FrequencyMap,
    session::Session,
    Comparison,
};

const CLOUD_WIDTH: f64 = 800.0;
const CLOUD_HEIGHT: f64 = 400.0;
const CLOUD_MIN_FONT: f64 = 10.0;
const CLOUD_MAX_FONT: f64 = 72.0;
// YlGnBu_r from blue toward yellow, indexed by frequency rank. The navy tail
// is left out, it disappears on the black background.
const CLOUD_PALETTE: [&str; 6] = ["#1d91c0", "#41b6c4", "#7fcdbb", "#c7e9b4", "#edf8b1", "#ffffd9"];

const SERIES_COLORS: [&str; 2] = ["#6accbc", "#158fad"];

fn headers(comparison: &Comparison) -> [String; 4] {
    [
        "Word".to_string(),
        format!("Frequency {}", comparison.label1()),
        format!("Frequency {}", comparison.label2()),
        "Significance".to_string(),
    ]
}

fn cells(row: &ComparisonRow) -> [String; 4] {
    [
        row.word.clone(),
        row.count1.to_string(),
        row.count2.to_string(),
        row.significance.label().to_string(),
    ]
}

/// Aligned comparison table, rows ordered by the session.
pub fn write_table<W: Write>(
    mut writer: W,
    comparison: &Comparison,
    session: &Session,
) -> anyhow::Result<()> {
    let headers = headers(comparison);
    let rows = session
        .arrange(&comparison.rows)
        .iter()
        .map(cells)
        .collect::<Vec<_>>();

    let mut widths = headers.clone().map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut write_line = |cells: &[String; 4]| -> std::io::Result<()> {
        let line = cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, width))| match i {
                1 | 2 => format!("{:>width$}", cell, width = width),
                _ => format!("{:<width$}", cell, width = width),
            })
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(writer, "{}", line.trim_end())
    };

    write_line(&headers)?;
    write_line(&widths.map(|w| "-".repeat(w)))?;
    for row in &rows {
        write_line(row)?;
    }
    Ok(())
}

fn csv_field(field: &str) -> String {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn write_csv<W: Write>(
    mut writer: W,
    comparison: &Comparison,
    session: &Session,
) -> anyhow::Result<()> {
    let line = |cells: &[String; 4]| {
        cells.iter().map(|c| csv_field(c)).collect::<Vec<_>>().join(",")
    };
    writeln!(writer, "{}", line(&headers(comparison)))?;
    for row in session.arrange(&comparison.rows) {
        writeln!(writer, "{}", line(&cells(&row)))?;
    }
    Ok(())
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders the `max_words` most frequent words as an SVG word cloud.
///
/// Font size scales linearly with frequency relative to the top word. Words
/// are flowed left to right in rows, largest first; words that no longer fit
/// vertically are dropped.
pub fn word_cloud_svg(freq: &FrequencyMap, title: &str, max_words: usize) -> String {
    const TITLE_HEIGHT: f64 = 36.0;
    const GAP: f64 = 8.0;

    let words = freq.most_common(max_words);
    let top_count = words.first().map(|&(_, c)| c).unwrap_or(1).max(1) as f64;

    let mut svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            "\n",
            r#"<rect width="100%" height="100%" fill="black"/>"#,
            "\n",
            r#"<text x="{cx}" y="26" fill="white" font-family="sans-serif" font-size="20" text-anchor="middle">{title}</text>"#,
            "\n"
        ),
        w = CLOUD_WIDTH,
        h = CLOUD_HEIGHT,
        cx = CLOUD_WIDTH / 2.0,
        title = escape_xml(title)
    );

    let (mut x, mut y, mut row_height) = (GAP, TITLE_HEIGHT, 0.0_f64);
    for (i, (word, count)) in words.iter().enumerate() {
        let size = CLOUD_MIN_FONT + (CLOUD_MAX_FONT - CLOUD_MIN_FONT) * (*count as f64 / top_count);
        let width = word.chars().count() as f64 * size * 0.6;
        if x + width > CLOUD_WIDTH - GAP && x > GAP {
            x = GAP;
            y += row_height + GAP;
            row_height = 0.0;
        }
        if y + size > CLOUD_HEIGHT {
            break;
        }
        row_height = row_height.max(size);
        let color = CLOUD_PALETTE[i % CLOUD_PALETTE.len()];
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-family=\"sans-serif\" font-size=\"{:.1}\">{}</text>\n",
            x,
            y + size,
            color,
            size,
            escape_xml(word)
        ));
        x += width + GAP;
    }
    svg.push_str("</svg>\n");
    svg
}

/// The truncated, weighted word lists behind both clouds.
pub fn clouds_json(comparison: &Comparison) -> serde_json::Value {
    let cloud = |freq: &FrequencyMap| {
        freq.most_common(comparison.cloud_words)
            .into_iter()
            .map(|(word, count)| json!({ "word": word, "weight": count }))
            .collect::<Vec<_>>()
    };
    let mut clouds = serde_json::Map::new();
    clouds.insert(comparison.label1(), cloud(&comparison.freq1).into());
    clouds.insert(comparison.label2(), cloud(&comparison.freq2).into());
    clouds.into()
}

/// Vega-Lite spec for a bar chart of the top words, one colored series per
/// text.
pub fn chart_spec(comparison: &Comparison) -> serde_json::Value {
    let (label1, label2) = (comparison.label1(), comparison.label2());
    let domain = [format!("Frequency {}", label1), format!("Frequency {}", label2)];
    let values = melt(&comparison.top, &domain[0], &domain[1]);
    json!({
        "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
        "title": "Word Frequency Comparison",
        "width": 700,
        "height": 400,
        "data": { "values": values },
        "mark": "bar",
        "encoding": {
            "x": { "field": "Word", "type": "nominal", "sort": "-y", "title": "Word" },
            "y": { "field": "Frequency", "type": "quantitative", "title": "Frequency" },
            "color": {
                "field": "Text",
                "type": "nominal",
                "scale": { "domain": domain, "range": SERIES_COLORS },
                "legend": { "title": "Text" }
            },
            "tooltip": [
                { "field": "Word", "type": "nominal" },
                { "field": "Text", "type": "nominal" },
                { "field": "Frequency", "type": "quantitative" }
            ]
        },
        "config": {
            "axis": { "labelFontSize": 12, "titleFontSize": 14 },
            "title": { "fontSize": 18 }
        }
    })
}

fn create(path: &Path) -> anyhow::Result<BufWriter<std::fs::File>> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    Ok(BufWriter::new(file))
}

/// Writes every artifact for `comparison` into `dir` and returns their paths.
pub fn write_outputs(
    dir: impl AsRef<Path>,
    comparison: &Comparison,
    session: &Session,
) -> anyhow::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let clouds = [
        ("cloud_text1.svg", &comparison.freq1, comparison.label1()),
        ("cloud_text2.svg", &comparison.freq2, comparison.label2()),
    ];
    let mut written = Vec::new();
    for (name, freq, title) in clouds {
        let path = dir.join(name);
        let mut writer = create(&path)?;
        writer.write_all(word_cloud_svg(freq, &title, comparison.cloud_words).as_bytes())?;
        writer.flush()?;
        written.push(path);
    }

    let path = dir.join("clouds.json");
    serde_json::to_writer_pretty(create(&path)?, &clouds_json(comparison))?;
    written.push(path);

    let path = dir.join("comparison.csv");
    let mut writer = create(&path)?;
    write_csv(&mut writer, comparison, session)?;
    writer.flush()?;
    written.push(path);

    let path = dir.join("chart.vl.json");
    serde_json::to_writer_pretty(create(&path)?, &chart_spec(comparison))?;
    written.push(path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compare::{classify, top_n},
        frequency::count,
        session::SortColumn,
    };

    fn comparison() -> Comparison {
        let freq1 = count(["cat", "cat", "dog"].map(String::from));
        let freq2 = count(["dog", "dog", "dog", "bird"].map(String::from));
        Comparison {
            lang1: "en".into(),
            lang2: "es".into(),
            rows: classify(&freq1, &freq2),
            top: top_n(&freq1, &freq2, 10),
            freq1,
            freq2,
            cloud_words: 100,
        }
    }

    #[test]
    fn table_is_aligned_and_sorted() {
        let mut session = Session::new();
        session.sort_by = Some(SortColumn::Frequency2);
        let mut out = Vec::new();
        write_table(&mut out, &comparison(), &session).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Word  Frequency Text 1 (en)  Frequency Text 2 (es)  Significance"
        );
        assert!(lines[2].starts_with("dog "));
        assert!(lines[3].starts_with("bird"));
        assert!(lines[3].ends_with("Exclusive to Text 2"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut out = Vec::new();
        write_csv(&mut out, &comparison(), &Session::new()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Word,Frequency Text 1 (en),Frequency Text 2 (es),Significance\n\
             cat,2,0,Exclusive to Text 1\n\
             dog,1,3,\n\
             bird,0,1,Exclusive to Text 2\n"
        );
    }

    #[test]
    fn csv_quotes_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn cloud_respects_word_limit() {
        let freq = count((0..20).map(|i| format!("w{}", i)));
        let svg = word_cloud_svg(&freq, "Text 1 (en)", 5);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">Text 1 (en)</text>"));
        assert_eq!(svg.matches("<text").count(), 6);
    }

    #[test]
    fn cloud_colors_run_from_blue_to_yellow() {
        let freq = count(
            [("a", 6), ("b", 5), ("c", 4), ("d", 3), ("e", 2), ("f", 1)]
                .iter()
                .flat_map(|&(w, n)| std::iter::repeat(w.to_string()).take(n)),
        );
        let svg = word_cloud_svg(&freq, "Text 1 (en)", 50);
        let fills: Vec<_> = svg
            .lines()
            .filter(|l| l.contains("font-size") && !l.contains("text-anchor"))
            .filter_map(|l| l.split("fill=\"").nth(1))
            .filter_map(|rest| rest.split('"').next())
            .collect();
        assert_eq!(fills.first(), Some(&"#1d91c0"));
        assert_eq!(fills.last(), Some(&"#ffffd9"));
        assert_eq!(fills.len(), 6);
    }

    #[test]
    fn cloud_of_empty_map_has_only_title() {
        let svg = word_cloud_svg(&FrequencyMap::new(), "Text 2 (fr)", 100);
        assert_eq!(svg.matches("<text").count(), 1);
    }

    #[test]
    fn chart_spec_uses_fixed_series_colors() {
        let spec = chart_spec(&comparison());
        assert_eq!(spec["mark"], "bar");
        assert_eq!(
            spec["encoding"]["color"]["scale"]["range"],
            json!(["#6accbc", "#158fad"])
        );
        assert_eq!(
            spec["encoding"]["color"]["scale"]["domain"][0],
            "Frequency Text 1 (en)"
        );
        let values = spec["data"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 6);
        assert_eq!(
            values[0],
            json!({"Word": "dog", "Text": "Frequency Text 1 (en)", "Frequency": 1})
        );
    }

    #[test]
    fn writes_all_artifacts() {
        let dir = std::env::temp_dir().join(format!("wfc-render-{}", std::process::id()));
        let written = write_outputs(&dir, &comparison(), &Session::new()).unwrap();
        assert_eq!(written.len(), 5);
        for path in written {
            assert!(path.exists(), "{:?} missing", path);
        }
        let clouds: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("clouds.json")).unwrap()).unwrap();
        assert_eq!(clouds["Text 1 (en)"][0], json!({"word": "cat", "weight": 2}));
    }
}
