use crate::stream::{StreamCatalog, StreamRecord};
use console::style;

const HEADER: [&str; 7] = ["#", "type", "codec", "lang", "forced", "frames", "title"];

/// Plain-text table of every stream in the catalog, one row per stream.
/// Indexes are per type, as used in `-map 0:a:N`.
pub fn format_stream_table(catalog: &StreamCatalog) -> String {
    let rows: Vec<[String; 7]> = catalog
        .video
        .iter()
        .chain(&catalog.audio)
        .chain(&catalog.subtitles)
        .map(row)
        .collect();

    let mut widths = HEADER.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header = HEADER.map(str::to_string);
    let mut lines = vec![render(&header)];
    lines.extend(rows.iter().map(|r| render(r)));
    lines.join("\n")
}

pub fn print_stream_info(catalog: &StreamCatalog) {
    println!();
    println!("{}", style(catalog.source.display()).bold());
    println!("{}", format_stream_table(catalog));
    println!();
}

fn row(record: &StreamRecord) -> [String; 7] {
    [
        record.index.to_string(),
        record.codec_type.to_string(),
        record.codec_name.clone(),
        record.language.clone(),
        if record.forced { "yes" } else { "" }.to_string(),
        record
            .frame_count_hint
            .map(|f| f.to_string())
            .unwrap_or_default(),
        record.title.clone().unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::ProbeOutput;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_stream_table() {
        let json = r#"{
            "streams": [
                {"index": 0, "codec_type": "video", "codec_name": "hevc"},
                {"index": 1, "codec_type": "audio", "codec_name": "eac3",
                 "tags": {"language": "jpn", "title": "Japanese"}},
                {"index": 2, "codec_type": "subtitle", "codec_name": "ass",
                 "disposition": {"default": 0, "forced": 1},
                 "tags": {"language": "eng", "NUMBER_OF_FRAMES-eng": "12"}}
            ]
        }"#;
        let probe = ProbeOutput::parse("show.mkv", json).unwrap();
        let catalog = StreamCatalog::from_probe("show.mkv", &probe, "und");

        let table = format_stream_table(&catalog);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("#  type"));
        assert!(lines[1].contains("hevc") && lines[1].contains("und"));
        assert!(lines[2].contains("eac3") && lines[2].ends_with("Japanese"));
        assert!(lines[3].contains("yes") && lines[3].contains("12"));
    }
}
