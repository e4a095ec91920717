use std::fmt::Write;

use anyhow::Result;
use indicatif::ProgressIterator;
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::{
    distance::Comparator, error::LookupError, geocode::Geocoder, places::PlaceResolver,
    records::Record, utils::progress_style,
};

#[derive(Debug)]
pub enum Outcome {
    Same { distance: f64 },
    /// The provider puts the business somewhere else.
    Flagged { distance: f64, place: String },
    NotFound,
    Failed(LookupError),
}

#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<(String, Outcome)>,
}

impl Report {
    fn count(&self, f: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, x)| f(x)).count()
    }

    pub fn same(&self) -> usize {
        self.count(|x| matches!(x, Outcome::Same { .. }))
    }

    pub fn flagged(&self) -> usize {
        self.count(|x| matches!(x, Outcome::Flagged { .. }))
    }

    pub fn not_found(&self) -> usize {
        self.count(|x| matches!(x, Outcome::NotFound))
    }

    pub fn failed(&self) -> usize {
        self.count(|x| matches!(x, Outcome::Failed(_)))
    }

    pub fn summary(&self) -> Result<String> {
        let mut md = String::new();
        writeln!(md, "## Statistics\n")?;
        writeln!(md, "- {} records", self.outcomes.len())?;
        writeln!(md, "- {} at the same place", self.same())?;
        writeln!(md, "- {} flagged", self.flagged())?;
        writeln!(md, "- {} not found", self.not_found())?;
        writeln!(md, "- {} failed", self.failed())?;

        let mut flagged = String::new();
        let mut not_found = String::new();
        let mut failed = String::new();
        for (id, outcome) in &self.outcomes {
            match outcome {
                Outcome::Same { .. } => {}
                Outcome::Flagged { distance, place } => {
                    writeln!(flagged, "- {id}: {place} ({distance:.0}m away)")?
                }
                Outcome::NotFound => writeln!(not_found, "- {id}")?,
                Outcome::Failed(e) => writeln!(failed, "- {id}: {e}")?,
            }
        }

        for (title, section) in [
            ("Flagged", flagged),
            ("Not found", not_found),
            ("Failed", failed),
        ] {
            if !section.is_empty() {
                writeln!(md, "\n## {title}\n")?;
                write!(md, "{section}")?;
            }
        }

        Ok(md)
    }
}

/// Checks every record against the provider, one at a time and in order.
///
/// A record's matched place is set when the provider's place for it is more
/// than the comparator's threshold away from its own address, and cleared
/// when it is within it. Records that can't be resolved or whose lookups
/// fail are left untouched and reported.
pub fn validate<R, G>(
    records: &mut [Record],
    resolver: &R,
    geocoder: &G,
    comparator: &Comparator,
) -> Report
where
    R: PlaceResolver + ?Sized,
    G: Geocoder + ?Sized,
{
    let mut report = Report::default();

    for record in records.iter_mut().progress_with_style(progress_style()) {
        let outcome = match check(record, resolver, geocoder, comparator) {
            Ok(x) => x,
            Err(e) => {
                warn!(id = %record.id, error = %e, "lookup failed, skipping");
                Outcome::Failed(e)
            }
        };

        match &outcome {
            Outcome::Same { distance } => {
                debug!(id = %record.id, distance, "same place");
                record.matched_place = None;
            }
            Outcome::Flagged { distance, place } => {
                info!(id = %record.id, distance, place = %place, "address differs");
                record.matched_place = Some(place.clone());
            }
            Outcome::NotFound => {
                info!(id = %record.id, "No place found for {}", record.full_address);
            }
            Outcome::Failed(_) => {}
        }

        report.outcomes.push((record.id.clone(), outcome));
    }

    if report.failed() > 0 {
        let ids = report
            .outcomes
            .iter()
            .filter(|(_, x)| matches!(x, Outcome::Failed(_)))
            .map(|(id, _)| id)
            .join(", ");
        warn!("{} records failed: {ids}", report.failed());
    }

    report
}

fn check<R, G>(
    record: &Record,
    resolver: &R,
    geocoder: &G,
    comparator: &Comparator,
) -> Result<Outcome, LookupError>
where
    R: PlaceResolver + ?Sized,
    G: Geocoder + ?Sized,
{
    let place = match resolver.find_place(&record.full_address, &record.business_name)? {
        Some(x) => x.describe(),
        None => return Ok(Outcome::NotFound),
    };

    let original = geocoder.geocode(&record.full_address)?;
    let found = geocoder.geocode(&place)?;

    let distance = comparator.distance(&original, &found);
    Ok(if comparator.is_same(&original, &found) {
        Outcome::Same { distance }
    } else {
        Outcome::Flagged { distance, place }
    })
}
