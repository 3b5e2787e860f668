use anyhow::Result;
use log::info;
use visage_match::{ReportSink, Verdict};

/// Renders verdicts to the operator through the log.
#[derive(Debug, Default)]
pub struct LogReport;

impl ReportSink for LogReport {
    fn report(&mut self, verdict: &Verdict) -> Result<()> {
        match verdict {
            Verdict::Matched { .. } => info!("✓ {}", verdict),
            Verdict::NotMatched | Verdict::NoCandidates => info!("{}", verdict),
        }
        Ok(())
    }
}
