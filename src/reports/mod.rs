use classforge::domain::{DataService, GroupId};
use classforge::optimizer::{DropTally, GenerationStats};
use classforge::schedule::WeeklyEvent;
use classforge::scorer::{CoverageShortfall, ScoreDetails};
use classforge::slots::{PAIR_COUNT, PAIR_SLOTS, WORKING_DAYS};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::collections::BTreeSet;

/// One grid per group: pairs as rows, weekdays as columns.
pub fn print_weekly_grid(events: &[WeeklyEvent], data: &DataService) {
    let groups: BTreeSet<GroupId> = events.iter().map(|ev| ev.group_id).collect();

    for group_id in groups {
        let name = data
            .group(group_id)
            .map(|g| g.name.clone())
            .unwrap_or_else(|| format!("#{}", group_id));
        println!("\nGroup: {}", name);

        let mut table = Table::new();
        table
            .load_preset(ASCII_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let mut header = vec![Cell::new("Pair").add_attribute(Attribute::Bold)];
        header.extend(
            WORKING_DAYS
                .iter()
                .map(|d| Cell::new(d.short_name()).add_attribute(Attribute::Bold)),
        );
        table.set_header(header);

        for pair in 0..PAIR_COUNT {
            let slot = &PAIR_SLOTS[pair];
            let mut row = vec![Cell::new(format!(
                "{} {}-{}",
                pair + 1,
                slot.start_time().format("%H:%M"),
                slot.end_time().format("%H:%M")
            ))];
            for &day in &WORKING_DAYS {
                let text = events
                    .iter()
                    .find(|ev| ev.group_id == group_id && ev.day_of_week == day && ev.pair_index == pair)
                    .map(|ev| {
                        let room = data
                            .classroom(ev.classroom_id)
                            .map(|c| c.name.clone())
                            .unwrap_or_else(|| ev.classroom_id.to_string());
                        format!("{} ({})\n{}", ev.title, ev.lesson_type, room)
                    })
                    .unwrap_or_default();
                row.push(Cell::new(text).set_alignment(CellAlignment::Center));
            }
            table.add_row(row);
        }
        println!("{}", table);
    }
}

pub fn print_score_report(details: &ScoreDetails) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec![
        Cell::new("Term").add_attribute(Attribute::Bold),
        Cell::new("Raw"),
        Cell::new("Penalty").fg(Color::Red),
    ]);

    let rows = [
        (
            "Coverage",
            format!("-{:.0}h / +{:.0}h", details.stat_under_hours, details.stat_over_hours),
            details.coverage_penalty,
        ),
        (
            "Gaps",
            format!("T{} G{}", details.stat_teacher_gaps, details.stat_group_gaps),
            details.gap_penalty,
        ),
        (
            "Overload",
            format!("{}h", details.stat_overload_hours),
            details.overload_penalty,
        ),
        (
            "Preferences",
            format!(
                "free {} / busy {}",
                details.stat_preferred_free_hits, details.stat_preferred_busy_misses
            ),
            details.preference_penalty,
        ),
        (
            "Utilization",
            format!("{:.2}", details.stat_utilization_shortfall),
            details.utilization_penalty,
        ),
    ];

    for (name, raw, penalty) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(raw).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", penalty)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("Fitness").add_attribute(Attribute::Bold),
        Cell::new(format!("{} events", details.stat_events)).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.2}", details.fitness))
            .fg(Color::Cyan)
            .set_alignment(CellAlignment::Right),
    ]);

    println!("\n{}", table);
}

pub fn print_shortfalls(shortfalls: &[CoverageShortfall], data: &DataService) {
    if shortfalls.is_empty() {
        println!("\n✅ Every lesson type reaches its required hours.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec![
        Cell::new("Group").add_attribute(Attribute::Bold),
        Cell::new("Subject"),
        Cell::new("Type"),
        Cell::new("Required"),
        Cell::new("Scheduled"),
        Cell::new("Missing").fg(Color::Red),
    ]);
    for s in shortfalls {
        table.add_row(vec![
            Cell::new(s.group_id),
            Cell::new(data.lesson_title(s.subject_id)),
            Cell::new(s.lesson_type),
            Cell::new(s.required_hours).set_alignment(CellAlignment::Right),
            Cell::new(s.scheduled_hours).set_alignment(CellAlignment::Right),
            Cell::new(s.missing_hours()).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\n⚠️  Under-covered lessons:\n{}", table);
}

pub fn print_run_summary(history: &[GenerationStats], dropped: &DropTally) {
    if let (Some(first), Some(last)) = (history.first(), history.last()) {
        println!(
            "\n📈 Fitness {:.2} -> {:.2} over {} generations",
            first.best_fitness, last.best_fitness, last.generation
        );
    }
    if dropped.total() == 0 {
        return;
    }

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec![
        Cell::new("Dropped by").add_attribute(Attribute::Bold),
        Cell::new("Lessons"),
    ]);
    for (violation, count) in &dropped.by_violation {
        table.add_row(vec![Cell::new(violation), Cell::new(count)]);
    }
    if dropped.unplaced > 0 {
        table.add_row(vec![Cell::new("never placed"), Cell::new(dropped.unplaced)]);
    }
    println!("{}", table);
}
