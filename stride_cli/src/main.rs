use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use stride_core::*;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "stride")]
#[command(about = "Step goal and progress tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the JSON steps file to read step counts from
    #[arg(long, global = true)]
    steps_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh step data and show today's progress (default)
    Today,

    /// Manage step goals
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Show the achievement board
    Achievements,

    /// Show weekly insight history
    Insights,

    /// Poll the step source continuously and apply each refresh
    Watch {
        /// Seconds between polls (defaults to the configured interval)
        #[arg(long)]
        interval_secs: Option<u64>,
    },

    /// Export step history and weekly insights to CSV
    Export {
        /// Directory to write CSV files into (defaults to the data directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Print shareable text for a milestone
    Share {
        #[command(subcommand)]
        subject: ShareSubject,
    },
}

#[derive(Subcommand)]
enum GoalAction {
    /// Add a new step goal
    Add {
        /// Step target (defaults to the configured daily target)
        #[arg(long)]
        target: Option<u32>,

        /// Goal period
        #[arg(long, value_enum, default_value = "daily")]
        kind: GoalKind,

        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,
    },

    /// List all goals
    List,

    /// Remove a goal by id
    Remove { id: Uuid },

    /// Mark a goal completed, ending its period today
    Done { id: Uuid },
}

#[derive(Subcommand)]
enum ShareSubject {
    /// Current streak
    Streak,

    /// Most recent weekly summary
    Week,

    /// An unlocked achievement
    Achievement { id: String },

    /// A goal and today's progress against it
    Goal { id: Uuid },
}

#[derive(Clone, Copy, ValueEnum)]
enum GoalKind {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl From<GoalKind> for GoalType {
    fn from(kind: GoalKind) -> Self {
        match kind {
            GoalKind::Daily => GoalType::Daily,
            GoalKind::Weekly => GoalType::Weekly,
            GoalKind::Monthly => GoalType::Monthly,
            GoalKind::Custom => GoalType::Custom,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    stride_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let steps_file = cli
        .steps_file
        .unwrap_or_else(|| config.source.steps_file.clone());

    match cli.command {
        Some(Commands::Today) | None => cmd_today(data_dir, steps_file).await,
        Some(Commands::Goal { action }) => cmd_goal(data_dir, action, &config),
        Some(Commands::Achievements) => cmd_achievements(data_dir),
        Some(Commands::Insights) => cmd_insights(data_dir),
        Some(Commands::Watch { interval_secs }) => {
            let period = Duration::from_secs(
                interval_secs.unwrap_or(config.refresh.interval_secs),
            );
            cmd_watch(data_dir, steps_file, period).await
        }
        Some(Commands::Export { out_dir }) => cmd_export(data_dir, steps_file, out_dir).await,
        Some(Commands::Share { subject }) => cmd_share(data_dir, steps_file, subject).await,
    }
}

fn open_store(data_dir: &PathBuf) -> Result<GoalStore<DirStore>> {
    let mut store = GoalStore::open(DirStore::new(data_dir));
    store.seed_achievements_if_empty()?;

    let errors = catalog::validate(store.achievements());
    if !errors.is_empty() {
        eprintln!("Achievement catalog problems:");
        for error in errors {
            eprintln!("  - {}", error);
        }
    }

    Ok(store)
}

async fn cmd_today(data_dir: PathBuf, steps_file: PathBuf) -> Result<()> {
    let mut store = open_store(&data_dir)?;
    let source = JsonStepSource::new(&steps_file);

    let today = Local::now().date_naive();
    let start = today - chrono::Days::new(6);
    let fetched = refresh::fetch_range(&source, start, today).await?;
    let unlocked = refresh::apply_refresh(&mut store, &fetched, today)?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  TODAY · {}", today);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Steps: {}", share::format_number(fetched.today_steps));
    println!();

    let tracked = store.today_goals(today);
    if tracked.is_empty() {
        println!("  No goals tracked for today. Add one with `stride goal add`.");
    } else {
        for goal in &tracked {
            let progress = goal_progress(goal, fetched.today_steps)?;
            println!(
                "  {} {} / {} steps",
                progress_bar(progress),
                share::format_number(fetched.today_steps.min(u64::from(goal.target_steps))),
                share::format_number(u64::from(goal.target_steps)),
            );
            println!(
                "    {} goal ({}%){}",
                goal.goal_type,
                (progress * 100.0) as u32,
                if is_goal_achieved(goal, fetched.today_steps) {
                    "  ✓"
                } else {
                    ""
                },
            );
        }
    }

    let streak = store.streak();
    println!();
    println!(
        "  Streak: {} day(s) (best: {})",
        streak.current_streak, streak.longest_streak
    );

    if !unlocked.is_empty() {
        println!();
        for id in &unlocked {
            if let Some(a) = store.achievements().iter().find(|a| &a.id == id) {
                println!("  🎉 Unlocked: {}", a.title);
            }
        }
    }

    println!();
    Ok(())
}

fn cmd_goal(data_dir: PathBuf, action: GoalAction, config: &Config) -> Result<()> {
    let mut store = open_store(&data_dir)?;

    match action {
        GoalAction::Add { target, kind, start } => {
            let target = target.unwrap_or(config.goals.default_daily_target);
            let start = start.unwrap_or_else(|| Local::now().date_naive());

            let goal = StepGoal::new(kind.into(), target, start)?;
            let id = goal.id;
            let label = goal.goal_type.to_string();
            store.add_goal(goal)?;

            println!(
                "✓ Added {} goal: {} steps starting {}",
                label,
                share::format_number(u64::from(target)),
                start
            );
            println!("  id: {}", id);
        }

        GoalAction::List => {
            if store.goals().is_empty() {
                println!("No goals yet. Add one with `stride goal add`.");
                return Ok(());
            }

            let today = Local::now().date_naive();
            println!("\n  GOALS");
            println!("  ─────────────────────────────────────────");
            for goal in store.goals() {
                let status = if !goal.is_active {
                    "done"
                } else if goal.is_completed(today) {
                    "ended"
                } else {
                    "active"
                };
                println!(
                    "  [{}] {} · {} steps · from {}",
                    status,
                    goal.goal_type,
                    share::format_number(u64::from(goal.target_steps)),
                    goal.start_date,
                );
                println!("        {}", goal.id);
            }
            println!();
        }

        GoalAction::Remove { id } => {
            let existed = store.goals().iter().any(|g| g.id == id);
            store.remove_goal(id)?;
            if existed {
                println!("✓ Removed goal {}", id);
            } else {
                println!("No goal with id {}", id);
            }
        }

        GoalAction::Done { id } => {
            let Some(mut goal) = store.goals().iter().find(|g| g.id == id).cloned() else {
                eprintln!("No goal with id {}", id);
                std::process::exit(1);
            };

            goal.is_active = false;
            goal.end_date = Some(Local::now().date_naive());
            store.update_goal(goal)?;

            // Completing a goal can unlock Goals-category achievements
            let unlocked = store.check_achievements(0)?;
            println!("✓ Goal completed!");
            for unlocked_id in &unlocked {
                if let Some(a) = store.achievements().iter().find(|a| &a.id == unlocked_id) {
                    println!("  🎉 Unlocked: {}", a.title);
                }
            }
        }
    }

    Ok(())
}

fn cmd_achievements(data_dir: PathBuf) -> Result<()> {
    let store = open_store(&data_dir)?;

    let unlocked_count = store
        .achievements()
        .iter()
        .filter(|a| a.is_unlocked)
        .count();

    println!("\n╭─────────────────────────────────────────╮");
    println!(
        "│  ACHIEVEMENTS · {}/{} unlocked",
        unlocked_count,
        store.achievements().len()
    );
    println!("╰─────────────────────────────────────────╯");

    for category in [
        AchievementCategory::Steps,
        AchievementCategory::Streaks,
        AchievementCategory::Goals,
        AchievementCategory::Special,
    ] {
        println!("\n  {}", category.label());
        for a in store
            .achievements()
            .iter()
            .filter(|a| a.category == category)
        {
            let marker = if a.is_unlocked { "✓" } else { " " };
            println!("  [{}] {} · {}", marker, a.title, a.description);
            if let Some(when) = a.unlocked_date {
                println!("        unlocked {}", when.date_naive());
            }
        }
    }

    println!();
    Ok(())
}

fn cmd_insights(data_dir: PathBuf) -> Result<()> {
    let store = open_store(&data_dir)?;

    if store.insights().is_empty() {
        println!("No weekly insights yet. Run `stride today` after logging steps.");
        return Ok(());
    }

    println!("\n  WEEKLY INSIGHTS");
    println!("  ─────────────────────────────────────────");
    for w in store.insights() {
        println!("  Week of {}", w.week_start);
        println!(
            "    Total {} · avg {}/day · consistency {}%",
            share::format_number(w.total_steps),
            share::format_number(w.average_steps as u64),
            w.consistency as u32,
        );
        if let Some(best) = w.best_day {
            println!(
                "    Best day {} ({} steps)",
                best,
                share::format_number(w.best_day_steps)
            );
        }
        println!(
            "    Goals hit: {} · {:+.1}% vs previous week",
            w.goals_achieved, w.improvement_from_last_week
        );
    }

    println!();
    Ok(())
}

async fn cmd_watch(data_dir: PathBuf, steps_file: PathBuf, period: Duration) -> Result<()> {
    let mut store = open_store(&data_dir)?;
    let source = JsonStepSource::new(&steps_file);

    println!(
        "Watching {} every {}s (Ctrl-C to stop)",
        steps_file.display(),
        period.as_secs()
    );
    refresh::run(&source, &mut store, period).await
}

async fn cmd_export(
    data_dir: PathBuf,
    steps_file: PathBuf,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let store = open_store(&data_dir)?;
    let source = JsonStepSource::new(&steps_file);

    let out_dir = out_dir.unwrap_or_else(|| data_dir.clone());
    std::fs::create_dir_all(&out_dir)?;

    // Everything the source has on record
    let steps = source
        .query_daily_steps(NaiveDate::MIN, NaiveDate::MAX)
        .await?;

    let steps_csv = out_dir.join("steps.csv");
    let day_count = export::export_daily_steps(&steps_csv, &steps)?;
    println!("✓ Exported {} days to {}", day_count, steps_csv.display());

    let insights_csv = out_dir.join("weekly_insights.csv");
    let week_count = export::export_weekly_insights(&insights_csv, store.insights())?;
    println!(
        "✓ Exported {} weeks to {}",
        week_count,
        insights_csv.display()
    );

    Ok(())
}

async fn cmd_share(
    data_dir: PathBuf,
    steps_file: PathBuf,
    subject: ShareSubject,
) -> Result<()> {
    let store = open_store(&data_dir)?;

    match subject {
        ShareSubject::Streak => {
            println!("{}", share::streak_message(store.streak()));
        }

        ShareSubject::Week => {
            let Some(latest) = store.insights().iter().max_by_key(|w| w.week_start) else {
                eprintln!("No weekly insights to share yet.");
                std::process::exit(1);
            };
            println!("{}", share::weekly_summary_message(latest));
        }

        ShareSubject::Achievement { id } => {
            let Some(achievement) = store.achievements().iter().find(|a| a.id == id) else {
                eprintln!("Unknown achievement id: {}", id);
                std::process::exit(1);
            };
            if !achievement.is_unlocked {
                eprintln!("'{}' is still locked.", achievement.title);
                std::process::exit(1);
            }
            println!("{}", share::achievement_message(achievement));
        }

        ShareSubject::Goal { id } => {
            let Some(goal) = store.goals().iter().find(|g| g.id == id) else {
                eprintln!("No goal with id {}", id);
                std::process::exit(1);
            };

            let source = JsonStepSource::new(&steps_file);
            let today_steps = source.query_today().await?;
            println!("{}", share::goal_completion_message(goal, today_steps));
        }
    }

    Ok(())
}

/// Render progress in [0, 1] as a 20-slot bar
fn progress_bar(progress: f64) -> String {
    const SLOTS: usize = 20;
    let filled = (progress * SLOTS as f64).round() as usize;
    let filled = filled.min(SLOTS);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(SLOTS - filled))
}
