//! Command implementations

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Context as _};
use chrono::{DateTime, Utc};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;

use kioku_core::quiz::{generate_options, grade_for_answer, is_correct};
use kioku_core::{
    plan_session, validate_daily_limit, CandidateKind, Catalog, Grade, Item, LearnerProfile,
    PointsLedger, ReviewScheduler, ScheduleState, ScheduleStore, SessionStatus, StudySession,
    POINTS_PER_REVIEW,
};

use crate::store::JsonFileStore;

/// Everything a command needs
pub struct Context {
    pub store: JsonFileStore,
    pub scheduler: ReviewScheduler,
    pub learner: String,
}

/// Run decks command
pub fn run_decks(ctx: &Context) -> anyhow::Result<()> {
    println!("{}", "=== Decks ===".cyan().bold());
    println!();

    let states = ctx.store.load_schedule_states(&ctx.learner)?;
    let now = Utc::now();
    for deck in ctx.store.categories()? {
        let items = ctx.store.load_catalog(&deck)?;
        let due = items
            .iter()
            .filter(|item| states.get(&item.id).is_none_or(|s| s.is_due(now)))
            .count();
        println!(
            "{:<20} {:>4} cards  {:>4} ready",
            deck.white().bold(),
            items.len(),
            due
        );
    }
    Ok(())
}

/// Run due command
pub fn run_due(ctx: &Context, deck: &str, limit: Option<u32>) -> anyhow::Result<()> {
    let items = load_deck(ctx, deck)?;
    let states = ctx.store.load_schedule_states(&ctx.learner)?;
    let limit = match limit {
        Some(l) => validate_daily_limit(l)?,
        None => ctx.store.load_daily_limit(&ctx.learner)?,
    };
    let now = Utc::now();
    let plan = plan_session(&items, &states, now, limit);

    println!("{}", format!("=== {} (limit {}) ===", deck, limit).cyan().bold());
    println!();

    if plan.is_empty() {
        println!("{}", "Nothing due. Come back later.".dimmed());
        if let Some(next) = next_due(&items, &states) {
            println!("Next card due {}", format_due(next, now));
        }
        return Ok(());
    }

    let by_id: HashMap<_, _> = items.iter().map(|i| (i.id, i)).collect();
    for (position, candidate) in plan.iter().enumerate() {
        let Some(item) = by_id.get(&candidate.item_id) else {
            continue;
        };
        let kind = match candidate.kind {
            CandidateKind::New => "new".green(),
            CandidateKind::Due => "due".yellow(),
        };
        println!(
            "{:>3}. {:<5} {:>5.1}%  {} ({})  {}",
            position + 1,
            kind,
            candidate.probability * 100.0,
            item.kanji.white().bold(),
            item.kana,
            item.meaning.dimmed()
        );
    }
    Ok(())
}

/// Run study command
pub fn run_study(
    ctx: &Context,
    deck: &str,
    self_grade: bool,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    load_deck(ctx, deck)?;

    let mut session = StudySession::new(ctx.scheduler.clone(), ctx.learner.as_str(), deck);
    let status = session.start(&ctx.store, &ctx.store, &ctx.store, Utc::now())?;
    if status == SessionStatus::Complete {
        println!("{}", "Nothing to review in this deck right now.".green().bold());
        return Ok(());
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!(
        "{}",
        format!("=== {} : {} cards ===", deck, session.remaining()).cyan().bold()
    );

    while let Some((ticket, item)) = session.current_card() {
        let item = item.clone();
        println!();
        println!(
            "{} {}",
            format!("[{} left]", session.remaining()).dimmed(),
            item.kanji.white().bold()
        );

        let grade = if self_grade {
            ask_self_grade(&mut input, &item)?
        } else {
            let options = generate_options(session.deck(), &item, &mut rng);
            ask_multiple_choice(&mut input, &item, &options)?
        };
        let Some(grade) = grade else {
            println!("{}", "Session paused.".dimmed());
            break;
        };

        match session.rate(ticket, grade, Utc::now(), &ctx.store, &ctx.store) {
            Ok(report) => {
                let next = if report.outcome.passed {
                    format!("next review in {}", format_hours(report.outcome.interval_hours))
                } else {
                    "will come back soon".to_string()
                };
                println!(
                    "  half-life {} -> {}, {} (+{} XP)",
                    format_hours(report.outcome.previous_half_life_hours),
                    format_hours(report.outcome.state.half_life_hours),
                    next.dimmed(),
                    report.points_awarded
                );
            }
            Err(e) if e.is_silent() => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let summary = session.summary();
    println!();
    if summary.status == SessionStatus::Complete {
        println!("{}", "Session complete!".green().bold());
    }
    println!(
        "Reviewed {}  correct {}  missed {}  +{} XP",
        summary.reviewed,
        summary.passed.to_string().green(),
        summary.lapsed.to_string().red(),
        summary.points
    );
    Ok(())
}

fn ask_multiple_choice(
    input: &mut impl BufRead,
    item: &Item,
    options: &[Item],
) -> anyhow::Result<Option<Grade>> {
    for (i, option) in options.iter().enumerate() {
        println!("  {}) {}", i + 1, option.meaning);
    }
    loop {
        let Some(answer) = prompt(input, &format!("Choose 1-{} (q to quit): ", options.len()))?
        else {
            return Ok(None);
        };
        if answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        let Some(choice) = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i))
        else {
            println!("{}", "Pick one of the listed numbers.".red());
            continue;
        };

        let correct = is_correct(item, choice.id);
        if correct {
            println!("  {}", "Correct!".green().bold());
        } else {
            println!("  {} {} ({})", "Wrong! Answer:".red().bold(), item.meaning, item.kana);
        }
        return Ok(Some(grade_for_answer(correct)));
    }
}

const GRADE_PROMPT: &str = "Grade 1=again 2=hard 3=good 4=easy 5=perfect (q to quit): ";

fn ask_self_grade(input: &mut impl BufRead, item: &Item) -> anyhow::Result<Option<Grade>> {
    if prompt(input, "Press Enter to reveal ")?.is_none() {
        return Ok(None);
    }
    println!("  {} ({})", item.meaning.white().bold(), item.kana);
    loop {
        let Some(answer) = prompt(input, GRADE_PROMPT)? else {
            return Ok(None);
        };
        if answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match answer.parse::<Grade>() {
            Ok(grade) => return Ok(Some(grade)),
            Err(e) => println!("{}", e.to_string().red()),
        }
    }
}

/// Print `message` and read one trimmed line; `None` on end of input
fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Run review command
pub fn run_review(ctx: &Context, item_id: u32, grade: i32) -> anyhow::Result<()> {
    let item = ctx.store.find_item(item_id)?.clone();
    let now = Utc::now();
    let states = ctx.store.load_schedule_states(&ctx.learner)?;
    let previous = states
        .get(&item_id)
        .cloned()
        .unwrap_or_else(|| ScheduleState::new(item_id, now));

    let outcome = ctx.scheduler.apply_rating(&previous, grade, now)?;
    ctx.store
        .save_schedule_state(&ctx.learner, &outcome.state)
        .with_context(|| format!("saving review of item {}", item_id))?;
    if let Err(e) = ctx.store.award_points(&ctx.learner, POINTS_PER_REVIEW) {
        tracing::warn!(error = %e, "Failed to award points");
    }

    println!(
        "{} {} rated {}",
        item.kanji.white().bold(),
        item.meaning.dimmed(),
        outcome.grade.to_string().cyan()
    );
    print_state(&outcome.state, now);
    Ok(())
}

/// Run preview command
pub fn run_preview(ctx: &Context, item_id: u32) -> anyhow::Result<()> {
    let item = ctx.store.find_item(item_id)?;
    let now = Utc::now();
    let states = ctx.store.load_schedule_states(&ctx.learner)?;
    let state = states
        .get(&item_id)
        .cloned()
        .unwrap_or_else(|| ScheduleState::new(item_id, now));

    println!(
        "{}",
        format!("=== {} ({}) : {} ===", item.kanji, item.kana, item.meaning).cyan().bold()
    );
    print_state(&state, now);
    println!();

    for (grade, outcome) in ctx.scheduler.preview(&state, now).iter() {
        let label = format!("{} {:<8}", grade.value(), grade.as_str());
        let label = if outcome.passed { label.green() } else { label.red() };
        println!(
            "{}  half-life {:>10}  due {}",
            label,
            format_hours(outcome.state.half_life_hours),
            format_due(outcome.state.next_due_at, now)
        );
    }
    Ok(())
}

/// Run limit command
pub fn run_limit(ctx: &Context, value: Option<u32>) -> anyhow::Result<()> {
    match value {
        Some(limit) => {
            let limit = validate_daily_limit(limit)?;
            ctx.store.save_daily_limit(&ctx.learner, limit)?;
            println!("Daily limit set to {}", limit.to_string().green().bold());
        }
        None => {
            let limit = ctx.store.load_daily_limit(&ctx.learner)?;
            println!("Daily limit: {}", limit.to_string().white().bold());
        }
    }
    Ok(())
}

/// Run stats command
pub fn run_stats(ctx: &Context) -> anyhow::Result<()> {
    let now = Utc::now();
    let states = ctx.store.load_schedule_states(&ctx.learner)?;
    let items = ctx.store.items();

    let reviewed: Vec<&ScheduleState> = items.iter().filter_map(|i| states.get(&i.id)).collect();
    let due = reviewed.iter().filter(|s| s.is_due(now)).count();
    let lapses: u64 = reviewed.iter().map(|s| u64::from(s.lapses)).sum();
    let average_recall = if reviewed.is_empty() {
        0.0
    } else {
        reviewed.iter().map(|s| s.recall_probability_at(now)).sum::<f64>() / reviewed.len() as f64
    };

    println!("{}", format!("=== Kioku Statistics ({}) ===", ctx.learner).cyan().bold());
    println!();
    println!("{}: {}", "Catalog Size".white().bold(), items.len());
    println!("{}: {}", "Reviewed Items".white().bold(), reviewed.len());
    println!("{}: {}", "New Items".white().bold(), items.len() - reviewed.len());
    println!("{}: {}", "Due Now".white().bold(), due);
    println!("{}: {:.1}%", "Average Recall".white().bold(), average_recall * 100.0);
    println!("{}: {}", "Total Lapses".white().bold(), lapses);
    println!("{}: {}", "Daily Limit".white().bold(), ctx.store.load_daily_limit(&ctx.learner)?);
    println!("{}: {}", "Points".white().bold(), ctx.store.points(&ctx.learner)?);

    if let Some(next) = next_due(items, &states).filter(|t| *t > now) {
        println!("{}: {}", "Next Due".white().bold(), format_due(next, now));
    }
    Ok(())
}

fn load_deck(ctx: &Context, deck: &str) -> anyhow::Result<Vec<Item>> {
    let items = ctx.store.load_catalog(deck)?;
    if items.is_empty() {
        let decks = ctx.store.categories()?.join(", ");
        bail!("Unknown or empty deck '{}'. Available decks: {}", deck, decks);
    }
    Ok(items)
}

fn next_due(items: &[Item], states: &HashMap<u32, ScheduleState>) -> Option<DateTime<Utc>> {
    items
        .iter()
        .filter_map(|i| states.get(&i.id))
        .map(|s| s.next_due_at)
        .min()
}

fn print_state(state: &ScheduleState, now: DateTime<Utc>) {
    if state.is_new() {
        println!("  {}", "new item (never reviewed)".dimmed());
        return;
    }
    println!(
        "  half-life {}  reps {}  lapses {}  recall {:.1}%  due {}",
        format_hours(state.half_life_hours),
        state.repetitions,
        state.lapses,
        state.recall_probability_at(now) * 100.0,
        format_due(state.next_due_at, now)
    );
}

fn format_due(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if at <= now {
        return "now".to_string();
    }
    let hours = kioku_core::elapsed_hours_between(now, at);
    format!("in {}", format_hours(hours))
}

/// Human-readable span: minutes under an hour, hours under two days, else days
fn format_hours(hours: f64) -> String {
    if hours < 1.0 {
        format!("{}m", (hours * 60.0).round() as i64)
    } else if hours < 48.0 {
        format!("{:.1}h", hours)
    } else {
        format!("{:.1}d", hours / 24.0)
    }
}
