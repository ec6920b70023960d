use std::io::{self, Write};

use plvet_engine::{CheckRun, ProbeUpdate};

use crate::error::Result;

/// Renders the check transcript: progress lines while the run is going,
/// then the summary and dead-entry listing. Everything goes through one
/// writer, in probe order.
pub struct Reporter<W> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn begin(&mut self, total: usize) -> io::Result<()> {
        writeln!(self.out, "Checking {total} entries...")
    }

    /// Per-entry progress line, with an immediate detail block for dead
    /// entries.
    pub fn progress(&mut self, update: &ProbeUpdate<'_>) -> io::Result<()> {
        let position = update.index + 1;
        let total = update.total;
        let title = &update.entry.title;
        let group = group_suffix(&update.entry.group_title);

        if update.result.is_alive() {
            writeln!(self.out, "[{position}/{total}] OK   {title}{group}")
        } else {
            writeln!(self.out, "[{position}/{total}] DEAD {title}{group}")?;
            writeln!(self.out, "        url:   {}", update.entry.url)?;
            writeln!(
                self.out,
                "        error: {}",
                update.result.error().unwrap_or_default()
            )
        }
    }

    /// Final summary block; dead entries are itemized with their 1-based
    /// playlist positions.
    pub fn summary(&mut self, run: &CheckRun) -> io::Result<()> {
        if run.total() == 0 {
            writeln!(self.out, "No entries found in playlist.")?;
            return Ok(());
        }

        writeln!(self.out)?;
        writeln!(
            self.out,
            "Checked {} entries: {} alive, {} dead",
            run.total(),
            run.alive_count(),
            run.dead_count()
        )?;
        if let Some(rate) = run.success_rate() {
            writeln!(self.out, "Success rate: {:.1}%", rate * 100.0)?;
        }

        if run.dead_count() > 0 {
            writeln!(self.out)?;
            writeln!(self.out, "Dead entries:")?;
            for (position, checked) in run.dead_entries() {
                writeln!(
                    self.out,
                    "  {position}. {}{}",
                    checked.entry.title,
                    group_suffix(&checked.entry.group_title)
                )?;
                writeln!(self.out, "     url:   {}", checked.entry.url)?;
                writeln!(
                    self.out,
                    "     error: {}",
                    checked.result.error().unwrap_or_default()
                )?;
            }
        }
        Ok(())
    }

    /// Machine-readable report: every entry with its verdict, plus the
    /// aggregate summary.
    pub fn json(&mut self, run: &CheckRun) -> Result<()> {
        let report = serde_json::json!({
            "summary": {
                "total": run.total(),
                "alive": run.alive_count(),
                "dead": run.dead_count(),
                "success_rate": run.success_rate(),
            },
            "entries": run.checked,
        });
        serde_json::to_writer_pretty(&mut self.out, &report)?;
        writeln!(self.out)?;
        Ok(())
    }
}

fn group_suffix(group_title: &str) -> String {
    if group_title.is_empty() {
        String::new()
    } else {
        format!(" [{group_title}]")
    }
}
