use crate::domain::ledger::HourTransition;
use crate::report::FinalReport;

/// Human-readable console rendering for the controller. External-facing
/// only; nothing here feeds back into the engine.

pub fn print_banner(title: &str) {
    println!();
    println!("============================================================");
    println!("  BERLIN PARK RESERVATION SYSTEM - {}", title);
    println!("============================================================");
    println!();
}

/// Hourly status: who leaves, who enters, how full the park is.
pub fn print_hour_status(transition: &HourTransition, capacity: i64) {
    println!();
    println!("---------------------- HOUR {:02}:00 ----------------------", transition.hour);

    println!("Families leaving the park:");
    if transition.leaving.is_empty() {
        println!("   (none)");
    } else {
        for reservation in &transition.leaving {
            println!("   - Family {} ({} people) - agent {}", reservation.family_name, reservation.party_size, reservation.agent_name);
        }
    }

    println!("Families entering the park:");
    if transition.entering.is_empty() {
        println!("   (none)");
    } else {
        for reservation in &transition.entering {
            println!(
                "   - Family {} ({} people) - agent {} [{}:00-{}:00]",
                reservation.family_name,
                reservation.party_size,
                reservation.agent_name,
                reservation.start_hour,
                reservation.end_hour + 1
            );
        }
    }

    let percent = transition.occupancy * 100 / capacity;
    println!("Occupancy: {} / {} people ({}%) {}", transition.occupancy, capacity, percent, bar(percent));
}

pub fn print_report(report: &FinalReport) {
    println!();
    println!("==================== FINAL DAY REPORT ====================");

    println!("Peak hours:");
    if report.peak_hours.is_empty() {
        println!("   (no admissions)");
    } else {
        for peak in &report.peak_hours {
            println!("   - {:02}:00 with {} people", peak.hour, peak.count);
        }
    }

    println!("Valley hours:");
    for valley in &report.valley_hours {
        println!("   - {:02}:00 with {} people", valley.hour, valley.count);
    }

    println!("Requests:");
    println!("   accepted at their hour: {}", report.counters.accepted);
    println!("   rescheduled:            {}", report.counters.rescheduled);
    println!("   denied:                 {}", report.counters.rejected);
    println!("   total:                  {}", report.counters.total());

    println!("Occupancy per hour:");
    println!("   Hour  | People | Percent");
    for load in &report.per_hour {
        println!("   {:02}:00 | {:>6} | {:>6}%", load.hour, load.count, load.percent);
    }
    println!("==========================================================");
}

fn bar(percent: i64) -> String {
    let filled = (percent / 5).clamp(0, 20) as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
}
