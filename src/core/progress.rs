use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Minimum time between two in-place status updates.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Throttled `\r`-rewritten status line.
pub struct Progress<W: Write> {
    out: W,
    interval: Duration,
    last_print: Option<Instant>,
}

impl<W: Write> Progress<W> {
    pub fn new(out: W) -> Self {
        Self::with_interval(out, PROGRESS_INTERVAL)
    }

    pub fn with_interval(out: W, interval: Duration) -> Self {
        Self {
            out,
            interval,
            last_print: None,
        }
    }

    /// Report `lines` processed and `consumed` of `total` manifest bytes read,
    /// unless the previous update is too recent. Without a total only the line
    /// count is shown.
    pub fn tick(&mut self, lines: usize, consumed: u64, total: Option<u64>) -> io::Result<()> {
        let now = Instant::now();
        if let Some(last) = self.last_print
            && now.duration_since(last) < self.interval
        {
            return Ok(());
        }
        self.last_print = Some(now);

        match total {
            Some(total) => write!(
                self.out,
                "\rCopied {lines} files: {:6.2}%",
                percent(consumed, total)
            )?,
            None => write!(self.out, "\rCopied {lines} files")?,
        }
        self.out.flush()
    }

    /// Final status line; always reports completion and ends the line.
    pub fn finish(&mut self, lines: usize) -> io::Result<()> {
        write!(self.out, "\rCopied {lines} files: 100.00%\n")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn percent(consumed: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    consumed as f64 * 100.0 / total as f64
}
