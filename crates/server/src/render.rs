//! Plain-text rendering for the `query` subcommand.

use std::fmt;

use ktm_transit::prelude::*;

/// Displays a resolved route the way the `query` subcommand prints it.
pub struct ReportText<'a>(pub &'a RouteReport);

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let route = &report.route;
        let timeline = report.timeline();

        writeln!(f, "[{}] {}", route.bus_number(), route.route_name())?;
        if !route.description().is_empty() {
            writeln!(f, "{}", route.description())?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Frequency:        every {} min ({} departures)",
            route.frequency_minutes(),
            route.daily_departures()
        )?;
        writeln!(
            f,
            "Operating hours:  {} - {}",
            route.first_bus_time(),
            route.last_bus_time()
        )?;
        writeln!(f, "Traffic:          {}", route.traffic_condition())?;
        if !route.traffic_analysis().is_empty() {
            writeln!(f, "                  {}", route.traffic_analysis())?;
        }

        writeln!(
            f,
            "\nTimeline (total {} min, {:.1} km)",
            timeline.total_minutes(),
            timeline.total_distance_km()
        )?;
        for (stop, entry) in route.stops().iter().zip(timeline.entries()) {
            let marker = match entry.position {
                StopPosition::Origin => "●",
                StopPosition::Terminus => "◆",
                StopPosition::Intermediate => "│",
            };
            write!(f, "  {marker} +{:>3} min  {}", entry.cumulative_minutes, stop.name)?;
            if let Some(km) = entry.leg_distance_km {
                write!(f, " ({km} km leg)")?;
            }
            if let Some(landmark) = &stop.landmark {
                write!(f, " near {landmark}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nTypical crowd levels (estimate)")?;
        for sample in &report.crowd {
            let bar = "#".repeat(usize::from(sample.level / 5));
            writeln!(f, "  {:>5} {:>3}% {bar}", sample.label(), sample.level)?;
        }

        if !route.source_urls().is_empty() {
            writeln!(f, "\nVerified via map grounding")?;
            for (label, url) in route.source_urls().labeled() {
                writeln!(f, "  {label}: {url}")?;
            }
        }

        Ok(())
    }
}
