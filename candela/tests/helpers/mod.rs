#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Write CSV lines to a temporary file that lives as long as the handle.
pub fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// One-minute New York session bars for 2024-01-02, 09:30 to 09:30 + `n - 1` minutes,
/// in vendor layout with naive local timestamps.
pub fn ny_minute_csv(n: usize) -> Vec<String> {
    let mut lines = vec!["Date,Open,High,Low,Close,Volume,Symbol".to_string()];
    for i in 0..n {
        let minute = 30 + i;
        let (h, m) = (9 + minute / 60, minute % 60);
        let px = 100 + i;
        lines.push(format!(
            "2024-01-02 {h:02}:{m:02}:00,{px},{},{},{px},{},AAPL",
            px + 1,
            px - 1,
            10 * (i + 1)
        ));
    }
    lines
}
