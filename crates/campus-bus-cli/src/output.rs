//! Output formatting module

use campus_bus_app::app::Ack;
use campus_bus_app::client::{BroadcastStats, PollStats};
use campus_bus_domain::model::{FleetEntry, FleetSource, Route};
use campus_bus_domain::service::{FleetDiff, FleetSummary};
use campus_bus_types::{OutputFormat, Result};
use chrono::Local;
use serde::Serialize;
use tracing::warn;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

fn last_seen(entry: &FleetEntry) -> String {
    match (entry.last_updated, entry.age_secs) {
        (Some(_), Some(age)) if entry.stale => format!("{}s (stale)", age),
        (Some(_), Some(age)) => format!("{}s ago", age),
        (Some(at), None) => at.with_timezone(&Local).format("%H:%M:%S").to_string(),
        (None, _) => "-".to_string(),
    }
}

fn print_fleet_row(entry: &FleetEntry) {
    println!(
        "{:<8} {:<10} {:<20} {:>9} {:>9} {:>7} {:<10} {:<8} {}",
        truncate(&entry.bus_id, 8),
        truncate(entry.bus_number.as_deref().unwrap_or("-"), 10),
        truncate(&entry.route, 20),
        format!("{:.4}", entry.position.lat),
        format!("{:.4}", entry.position.lng),
        format!("{}/{}", entry.occupancy, entry.capacity),
        entry.status,
        match entry.source {
            FleetSource::Live => "live",
            FleetSource::Roster => "roster",
        },
        last_seen(entry)
    );
}

fn print_fleet_header() {
    println!(
        "{:<8} {:<10} {:<20} {:>9} {:>9} {:>7} {:<10} {:<8} {}",
        "Bus", "Number", "Route", "Lat", "Lng", "Load", "Status", "Source", "Last seen"
    );
    println!("{}", "-".repeat(96));
}

pub fn output_fleet(output_format: OutputFormat, entries: &[FleetEntry]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(entries);
    }

    println!("Live Fleet");
    println!("==========");
    if entries.is_empty() {
        println!("No buses found.");
        return Ok(());
    }

    print_fleet_header();
    for entry in entries {
        print_fleet_row(entry);
    }

    let live = entries.iter().filter(|e| e.is_live()).count();
    println!();
    println!("{} buses ({} live)", entries.len(), live);
    Ok(())
}

pub fn output_bus(output_format: OutputFormat, entry: &FleetEntry) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(entry);
    }

    println!("\nBus {}", entry.bus_id);
    println!("===============");
    if let Some(ref number) = entry.bus_number {
        println!("Number:     {}", number);
    }
    if let Some(ref driver) = entry.driver_name {
        println!("Driver:     {}", driver);
    }
    println!("Route:      {}", entry.route);
    println!("Position:   {}", entry.position);
    println!(
        "Occupancy:  {}/{} ({:.0}%)",
        entry.occupancy,
        entry.capacity,
        if entry.capacity > 0 {
            f64::from(entry.occupancy) / f64::from(entry.capacity) * 100.0
        } else {
            0.0
        }
    );
    println!("Status:     {}", entry.status);
    println!("Last seen:  {}", last_seen(entry));
    if !entry.is_live() {
        println!("\n(roster position, no live report yet)");
    }
    Ok(())
}

pub fn output_routes(output_format: OutputFormat, routes: &[Route]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(routes);
    }

    println!("Routes");
    println!("======");
    println!("{:<4} {:<20} {:<9} {}", "ID", "Name", "Departs", "Stops");
    println!("{}", "-".repeat(72));
    for route in routes {
        println!(
            "{:<4} {:<20} {:<9} {}",
            route.id,
            truncate(&route.name, 20),
            route.start_time,
            route.stops.join(" > ")
        );
    }
    Ok(())
}

pub fn output_stats(output_format: OutputFormat, summary: &FleetSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(summary);
    }

    println!("Fleet Statistics");
    println!("================");
    println!("Buses:       {} ({} live, {} stale)", summary.total_buses, summary.live_buses, summary.stale_buses);
    println!("Passengers:  {}", summary.total_passengers);
    println!("Alerts:      {} (late: {}, breakdown: {})", summary.alerts, summary.late, summary.breakdown);

    if !summary.routes.is_empty() {
        println!();
        println!("{:<20} {:>6} {:>6} {:>10}", "Route", "Buses", "Live", "Load");
        println!("{}", "-".repeat(45));
        for route in &summary.routes {
            println!(
                "{:<20} {:>6} {:>6} {:>10}",
                truncate(&route.route, 20),
                route.buses,
                route.live_buses,
                format!("{}/{}", route.occupancy, route.capacity)
            );
        }
    }
    Ok(())
}

pub fn output_ack(output_format: OutputFormat, ack: &Ack) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(ack);
    }

    println!("Report accepted:");
    println!("  Bus:      {}", ack.bus_id);
    println!("  Received: {}", ack.received_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"));
    println!("  Receipt:  {}", ack.receipt_id);
    Ok(())
}

/// Print one poll's changes. JSON mode emits one line per change set.
pub fn print_diff(output_format: OutputFormat, diff: &FleetDiff, current: &[FleetEntry]) {
    if output_format == OutputFormat::Json {
        match serde_json::to_string(diff) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to encode fleet changes: {e}"),
        }
        return;
    }

    println!(
        "\n[{}] {} change(s), {} buses",
        Local::now().format("%H:%M:%S"),
        diff.change_count(),
        current.len()
    );
    for entry in &diff.added {
        print!("  + ");
        print_fleet_row(entry);
    }
    for entry in &diff.updated {
        print!("  ~ ");
        print_fleet_row(entry);
    }
    for bus_id in &diff.removed {
        println!("  - {}", bus_id);
    }
}

pub fn print_broadcast_stats(stats: &BroadcastStats) {
    println!(
        "Broadcast finished: {} ticks, {} published, {} failed",
        stats.ticks, stats.published, stats.failed
    );
}

pub fn print_poll_stats(stats: &PollStats) {
    println!(
        "Watch finished: {} polls, {} changes, {} failed",
        stats.polls, stats.changes, stats.failed
    );
}
