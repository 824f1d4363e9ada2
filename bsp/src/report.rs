use super::types::{LinedefId, SectorId};
use log::warn;
use math::Pnt2d;

/// Observer for non-fatal anomalies found during a build. Events arrive
/// synchronously, in the order they are found.
pub trait Reporter {
    fn unclosed_sector_found(&mut self, _sector: SectorId, _near: Pnt2d) {
        // Default impl is empty to allow reporters to mix and match.
    }

    fn one_way_window_found(&mut self, _line: LinedefId, _back_sector: SectorId) {
        // Default impl is empty to allow reporters to mix and match.
    }
}

/// Drops every event.
pub struct NullReporter;

impl Reporter for NullReporter {}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UnclosedSector {
    pub sector: SectorId,
    pub near: Pnt2d,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OneWayWindow {
    pub line: LinedefId,
    pub back_sector: SectorId,
}

/// Collects anomalies for reporting once the build is over.
#[derive(Clone, Debug, Default)]
pub struct ReportLog {
    pub unclosed_sectors: Vec<UnclosedSector>,
    pub one_way_windows: Vec<OneWayWindow>,
}

impl ReportLog {
    pub fn new() -> ReportLog {
        ReportLog::default()
    }

    pub fn is_empty(&self) -> bool {
        self.unclosed_sectors.is_empty() && self.one_way_windows.is_empty()
    }

    pub fn clear(&mut self) {
        self.unclosed_sectors.clear();
        self.one_way_windows.clear();
    }

    pub fn log_warnings(&self) {
        for unclosed in &self.unclosed_sectors {
            warn!(
                "Sector {} is not closed near ({:.1}, {:.1}).",
                unclosed.sector, unclosed.near.x, unclosed.near.y
            );
        }
        for window in &self.one_way_windows {
            warn!(
                "Linedef {} is a one-way window onto sector {}.",
                window.line, window.back_sector
            );
        }
    }
}

impl Reporter for ReportLog {
    fn unclosed_sector_found(&mut self, sector: SectorId, near: Pnt2d) {
        self.unclosed_sectors.push(UnclosedSector { sector, near });
    }

    fn one_way_window_found(&mut self, line: LinedefId, back_sector: SectorId) {
        self.one_way_windows.push(OneWayWindow { line, back_sector });
    }
}

/// Sends every event to both reporters.
pub struct ReporterChain<'a, 'b> {
    first: &'a mut dyn Reporter,
    second: &'b mut dyn Reporter,
}

impl<'a, 'b> ReporterChain<'a, 'b> {
    pub fn new(first: &'a mut dyn Reporter, second: &'b mut dyn Reporter) -> Self {
        ReporterChain { first, second }
    }
}

impl<'a, 'b> Reporter for ReporterChain<'a, 'b> {
    fn unclosed_sector_found(&mut self, sector: SectorId, near: Pnt2d) {
        self.first.unclosed_sector_found(sector, near);
        self.second.unclosed_sector_found(sector, near);
    }

    fn one_way_window_found(&mut self, line: LinedefId, back_sector: SectorId) {
        self.first.one_way_window_found(line, back_sector);
        self.second.one_way_window_found(line, back_sector);
    }
}

#[cfg(test)]
mod test {
    use super::{NullReporter, OneWayWindow, ReportLog, Reporter, ReporterChain};
    use math::Pnt2d;

    #[test]
    fn log_aggregates_and_chain_forwards() {
        let mut first = ReportLog::new();
        let mut null = NullReporter;
        {
            let mut chain = ReporterChain::new(&mut first, &mut null);
            chain.one_way_window_found(4, 2);
            chain.unclosed_sector_found(1, Pnt2d::new(8.0, 8.0));
        }
        assert!(!first.is_empty());
        assert_eq!(
            first.one_way_windows,
            vec![OneWayWindow {
                line: 4,
                back_sector: 2
            }]
        );
        assert_eq!(first.unclosed_sectors[0].sector, 1);
        first.log_warnings();
        first.clear();
        assert!(first.is_empty());
    }
}
