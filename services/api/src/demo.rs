use clap::Args;
use mentor_map::error::AppError;
use mentor_map::matching::{
    auto_assign, build_matches, sample_roster, AutoAssignOptions, AutoAssignReport, MentorId,
    Roster, RosterCsvImporter, ScholarId, ScholarMatches, SignalReport, DEFAULT_TOP_N,
};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Roster JSON document (as returned by GET /api/v1/roster or `seed`)
    #[arg(long, conflicts_with_all = ["mentors_csv", "scholars_csv"])]
    pub(crate) roster: Option<PathBuf>,
    /// Mentor CSV export; requires --scholars-csv
    #[arg(long, requires = "scholars_csv")]
    pub(crate) mentors_csv: Option<PathBuf>,
    /// Scholar CSV export; requires --mentors-csv
    #[arg(long, requires = "mentors_csv")]
    pub(crate) scholars_csv: Option<PathBuf>,
    /// Run auto-assign before computing signals
    #[arg(long)]
    pub(crate) auto_assign: bool,
    /// Leave scholars who already have a mentor where they are during auto-assign
    #[arg(long, requires = "auto_assign")]
    pub(crate) open_only: bool,
    /// Candidates listed per scholar
    #[arg(long)]
    pub(crate) top_n: Option<usize>,
    /// Print the signal report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Write the resulting roster (including new placements) to this path
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Candidates listed per scholar
    #[arg(long)]
    pub(crate) top_n: Option<usize>,
    /// Stop after the initial signals without running auto-assign
    #[arg(long)]
    pub(crate) skip_auto_assign: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SeedArgs {
    /// Destination file; prints to stdout when omitted
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        roster,
        mentors_csv,
        scholars_csv,
        auto_assign: run_auto_assign,
        open_only,
        top_n,
        json,
        out,
    } = args;

    let mut roster = match (roster, mentors_csv, scholars_csv) {
        (Some(path), _, _) => Roster::from_json(&fs::read_to_string(path)?)?,
        (None, Some(mentors), Some(scholars)) => {
            RosterCsvImporter::from_paths(mentors, scholars)?
        }
        _ => {
            eprintln!("No roster supplied; reporting on the bundled sample roster.");
            sample_roster()
        }
    };

    let top_n = top_n.unwrap_or(DEFAULT_TOP_N);
    let placements =
        run_auto_assign.then(|| auto_assign(&mut roster, AutoAssignOptions { open_only }));
    let signals = SignalReport::build(&roster);

    if json {
        let payload = json_report(&roster, placements.as_ref(), &signals, top_n);
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).map_err(std::io::Error::from)?
        );
    } else {
        if let Some(placements) = &placements {
            render_placements(&roster, placements);
        }
        render_matches(&build_matches(&roster, top_n));
        render_signals(&signals);
    }

    if let Some(path) = out {
        fs::write(&path, roster.to_json_pretty()?)?;
        println!("\nRoster written to {}", path.display());
    }

    Ok(())
}

/// Machine-readable counterpart of the text report.
pub(crate) fn json_report(
    roster: &Roster,
    placements: Option<&AutoAssignReport>,
    signals: &SignalReport,
    top_n: usize,
) -> serde_json::Value {
    serde_json::json!({
        "auto_assign": placements,
        "signals": signals,
        "matches": build_matches(roster, top_n),
    })
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        top_n,
        skip_auto_assign,
    } = args;
    let top_n = top_n.unwrap_or(DEFAULT_TOP_N);

    println!("Mentor map demo");
    let mut roster = sample_roster();
    println!(
        "- {} mentors | {} scholars | {} seeded assignments",
        roster.mentors.len(),
        roster.scholars.len(),
        roster.assignments.len()
    );

    render_matches(&build_matches(&roster, top_n));
    render_signals(&SignalReport::build(&roster));

    if skip_auto_assign {
        return Ok(());
    }

    println!("\nRunning auto-assign");
    let placements = auto_assign(&mut roster, AutoAssignOptions::default());
    render_placements(&roster, &placements);
    render_signals(&SignalReport::build(&roster));

    Ok(())
}

pub(crate) fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let encoded = sample_roster().to_json_pretty()?;
    match args.out {
        Some(path) => {
            fs::write(&path, encoded)?;
            println!("Sample roster written to {}", path.display());
        }
        None => println!("{encoded}"),
    }
    Ok(())
}

fn mentor_name(roster: &Roster, mentor_id: &MentorId) -> String {
    roster
        .mentor(mentor_id)
        .map(|mentor| mentor.name.clone())
        .unwrap_or_else(|| mentor_id.as_str().to_string())
}

fn scholar_name(roster: &Roster, scholar_id: &ScholarId) -> String {
    roster
        .scholar(scholar_id)
        .map(|scholar| scholar.name.clone())
        .unwrap_or_else(|| scholar_id.as_str().to_string())
}

pub(crate) fn render_placements(roster: &Roster, report: &AutoAssignReport) {
    println!("\nAuto-assign placements");
    if report.placements.is_empty() {
        println!("- No new placements");
    }
    for placement in &report.placements {
        let moved = placement
            .previous
            .as_ref()
            .map(|previous| format!(" (was {})", mentor_name(roster, previous)))
            .unwrap_or_default();
        println!(
            "- {} -> {} | score {:.1}{}",
            scholar_name(roster, &placement.scholar_id),
            mentor_name(roster, &placement.mentor_id),
            placement.score,
            moved
        );
    }
    for scholar_id in &report.unplaced {
        println!(
            "- {} could not be placed under current capacity and hours",
            scholar_name(roster, scholar_id)
        );
    }
}

pub(crate) fn render_matches(matches: &[ScholarMatches]) {
    println!("\nSuggested matches");
    for entry in matches {
        let current = entry
            .current_mentor
            .as_ref()
            .map(|mentor_id| format!(" | current {}", mentor_id.as_str()))
            .unwrap_or_default();
        println!(
            "- {} [{}] urgency {}{}",
            entry.scholar_name, entry.cohort, entry.urgency, current
        );
        if entry.candidates.is_empty() {
            println!("    (no mentors on the roster)");
        }
        for candidate in &entry.candidates {
            println!(
                "    {:>6.1}  {}  {}",
                candidate.score,
                candidate.mentor.name,
                candidate.rationale.join("; ")
            );
        }
    }
}

pub(crate) fn render_signals(report: &SignalReport) {
    let headline = &report.headline;
    println!("\nRoster signals");
    println!(
        "- {} mentors | {} scholars | {}% assigned | {} open slots",
        headline.mentors, headline.scholars, headline.assigned_pct, headline.open_slots
    );
    let stages: Vec<String> = headline
        .stages
        .iter()
        .map(|stage| format!("{} {}", stage.stage_label, stage.count))
        .collect();
    println!("- Mentor stages: {}", stages.join(", "));
    println!(
        "- Load spread {} (min {}, max {}) | stdev {:.2}",
        report.fairness.spread,
        report.fairness.min_load,
        report.fairness.max_load,
        report.fairness.load_stdev
    );

    println!("Mentor load:");
    for entry in &report.mentor_loads {
        let mut flags = Vec::new();
        if entry.over_capacity {
            flags.push("over capacity");
        }
        if entry.over_hours {
            flags.push("over hours");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        println!(
            "  - {}: {}/{} scholars | {}/{} hrs{}",
            entry.name,
            entry.load_count,
            entry.capacity,
            entry.load_hours,
            entry.availability,
            flags
        );
    }

    if !report.coverage_gaps.uncovered_needs.is_empty() {
        println!(
            "- Needs no mentor covers: {}",
            report.coverage_gaps.uncovered_needs.join(", ")
        );
    }

    if !report.continuity.is_empty() {
        println!("Continuity risk:");
        for risk in &report.continuity {
            println!(
                "  - {} {} (risk {:.2}, {} scholar(s) without a backup)",
                risk.criticality_label,
                risk.name,
                risk.risk_score,
                risk.single_points_of_failure.len()
            );
        }
    }

    println!("Cohorts:");
    for cohort in &report.cohorts {
        let reasons = if cohort.reasons.is_empty() {
            String::new()
        } else {
            format!(" ({})", cohort.reasons.join("; "))
        };
        println!(
            "  - {}: {} | {}/{} assigned{}",
            cohort.cohort, cohort.level_label, cohort.assigned, cohort.scholars, reasons
        );
    }

    println!("Recommended actions:");
    for action in &report.recommended_actions {
        println!("  - {action}");
    }
}
