use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

pub(crate) fn file_to_vec<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
    let file_in = fs::File::open(filename)?;
    let file_reader = BufReader::new(file_in);
    file_reader.lines().collect()
}

/// Logs the time spent since `last` and returns the new elapsed mark.
pub(crate) fn trace(l_step: &str, detect: Instant, last: Duration) -> Duration {
    let now = detect.elapsed();
    log::trace!("TIME | Total={:.2?} | {}={:.2?}", now, l_step, now - last);
    now
}
