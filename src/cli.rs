//! CLI interface for gapsense

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analytics::{
    self, community_struggles, mentor_workload, user_insights, ModerationSummary, StruggleFilter,
};
use crate::config::{self, Config};
use crate::session::{author_id, Role, SessionStore, User};
use crate::store::{Booking, Fixtures, Mentor, NewStruggle, RecordStore, Struggle};
use crate::tagging::{generate_tags, merge_tags};
use crate::types::{Category, Severity, StruggleStatus};
use crate::truncate_safe;

#[derive(Parser)]
#[command(name = "gapsense")]
#[command(about = "Track student struggles and find mentors", long_about = None)]
#[command(version)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dashboard totals and trends. Growth compares the windows ending at
    /// the newest submission.
    Stats,
    /// Submissions per day
    Timeline,
    /// Submissions by day of week and hour
    Heatmap,
    /// Suggest tags for a description
    Tags {
        description: String,
        #[arg(short, long, default_value = "other")]
        category: Category,
    },
    /// Browse approved struggles
    Community {
        /// Text to look for in titles and descriptions
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        category: Option<Category>,
        #[arg(long)]
        severity: Option<Severity>,
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// List mentors
    Mentors {
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Show one struggle with recommended mentors
    Show {
        id: String,
    },
    /// Submit a struggle (not persisted between runs)
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: Category,
        #[arg(long)]
        severity: Severity,
        /// Comma separated tags, merged with generated ones
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Hide the author when the struggle is displayed
        #[arg(long)]
        anonymous: bool,
    },
    /// List struggles in one moderation state (admin)
    Queue {
        #[arg(long, default_value = "pending")]
        status: StruggleStatus,
    },
    /// Approve, reject or flag a struggle for this run (admin)
    Moderate {
        id: String,
        #[arg(long)]
        status: StruggleStatus,
    },
    /// Book a session with a mentor for this run
    Book {
        mentor_id: String,
        /// One of the mentor's time slots
        #[arg(long)]
        slot: String,
        /// Struggle the session is about
        #[arg(long)]
        struggle: Option<String>,
        #[arg(long)]
        anonymous: bool,
    },
    /// Toggle a bookmark on a struggle for this run
    Bookmark {
        id: String,
    },
    /// Log in with any email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GAPSENSE_PASSWORD")]
        password: String,
        /// Defaults to a role inferred from the email
        #[arg(long)]
        role: Option<Role>,
    },
    /// Create an account and log in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "GAPSENSE_PASSWORD")]
        password: String,
        #[arg(long, default_value = "student")]
        role: Role,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Personal insights for the logged-in user
    Me,
    /// Relevant approved struggles for the logged-in mentor
    MentorDashboard,
    /// Show or reset configuration
    Config {
        #[arg(long)]
        show: bool,
        #[arg(long)]
        reset: bool,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let json = cli.json;

    if let Commands::Config { show, reset } = cli.command {
        return config_command(show, reset);
    }

    let config = Config::load()?;
    let session = SessionStore::open(&config)?;

    match cli.command {
        Commands::Login { email, password, role } => {
            let user = session.login(&email, &password, role)?;
            print_user(json, Some(&user), "Logged in")
        }
        Commands::Signup { name, email, password, role } => {
            let user = session.signup(&name, &email, &password, role)?;
            print_user(json, Some(&user), "Signed up")
        }
        Commands::Logout => {
            session.logout()?;
            if json {
                print_json(&serde_json::json!({ "loggedOut": true }))
            } else {
                println!("Logged out.");
                Ok(())
            }
        }
        Commands::Whoami => {
            let user = session.current_user()?;
            print_user(json, user.as_ref(), "Logged in")
        }
        Commands::Tags { description, category } => {
            let tags = generate_tags(&description, category);
            if json {
                print_json(&tags)
            } else {
                println!("{}", tags.join(", "));
                Ok(())
            }
        }
        command => {
            let mut store = load_store(&config).await?;
            run_with_store(command, &mut store, &config, &session, json)
        }
    }
}

async fn load_store(config: &Config) -> Result<RecordStore> {
    let fixtures = Fixtures::load(
        config.fixtures.struggles.as_deref(),
        config.fixtures.mentors.as_deref(),
    )
    .await
    .context("Failed to load fixtures")?;
    Ok(RecordStore::from_fixtures(fixtures))
}

fn run_with_store(
    command: Commands,
    store: &mut RecordStore,
    config: &Config,
    session: &SessionStore,
    json: bool,
) -> Result<()> {
    match command {
        Commands::Stats => show_stats(store, config, json),
        Commands::Timeline => show_timeline(store, json),
        Commands::Heatmap => show_heatmap(store, config, json),
        Commands::Community { search, category, severity, tag } => {
            let filter = StruggleFilter { search, category, severity, tag };
            let struggles = community_struggles(store, &filter);
            if json {
                print_json(&struggles)
            } else {
                display_struggles(&struggles);
                Ok(())
            }
        }
        Commands::Mentors { category } => {
            let mentors = match category {
                Some(category) => store.mentors_by_category(category),
                None => store.mentors(),
            };
            if json {
                print_json(&mentors)
            } else {
                display_mentors(&mentors);
                Ok(())
            }
        }
        Commands::Show { id } => show_struggle(store, config, &id, json),
        Commands::Submit { title, description, category, severity, tags, anonymous } => {
            let user = session.current_user()?;
            let fields = NewStruggle::new(&title, &description, category, severity)
                .with_tags(tags)
                .anonymous(anonymous);
            let struggle = store.add_struggle(prepare_submission(fields, user.as_ref()));

            if json {
                print_json(&struggle)
            } else {
                println!("Submitted {} for moderation", struggle.id);
                display_struggle(&struggle);
                println!("Note: submissions are kept for this run only.");
                Ok(())
            }
        }
        Commands::Queue { status } => {
            require_role(session, Role::Admin)?;
            let struggles = store.struggles_by_status(status);
            if json {
                print_json(&struggles)
            } else {
                println!("Struggles {}:", status);
                display_struggles(&struggles);
                Ok(())
            }
        }
        Commands::Moderate { id, status } => {
            require_role(session, Role::Admin)?;
            let Some(before) = store.struggle(&id) else {
                bail!("No struggle with id {}", id);
            };
            if !store.update_struggle_status(&id, status) {
                bail!("Cannot move {} from {} to {}", id, before.status, status);
            }
            let updated = store
                .struggle(&id)
                .with_context(|| format!("Struggle {} missing after moderation", id))?;

            if json {
                print_json(&updated)
            } else {
                println!("{}: {} -> {}", updated.id, before.status, updated.status);
                println!("Note: moderation is kept for this run only.");
                Ok(())
            }
        }
        Commands::Book { mentor_id, slot, struggle, anonymous } => {
            let Some(mentor) = store.mentor(&mentor_id) else {
                bail!("No mentor with id {}", mentor_id);
            };
            check_slot(&mentor, &slot)?;
            if let Some(id) = &struggle {
                if store.struggle(id).is_none() {
                    bail!("No struggle with id {}", id);
                }
            }

            let booking = store
                .book_session(&mentor.id, &slot, anonymous, struggle.as_deref())
                .with_context(|| format!("No mentor with id {}", mentor.id))?;

            if json {
                print_json(&booking)
            } else {
                display_booking(&booking);
                println!("Note: bookings are kept for this run only.");
                Ok(())
            }
        }
        Commands::Bookmark { id } => {
            if store.struggle(&id).is_none() {
                bail!("No struggle with id {}", id);
            }
            let bookmarked = store.toggle_bookmark(&id);

            if json {
                print_json(&serde_json::json!({
                    "id": id,
                    "bookmarked": bookmarked,
                    "bookmarks": store.bookmarked_struggles(),
                }))
            } else {
                let verb = if bookmarked { "Bookmarked" } else { "Removed bookmark on" };
                println!("{} {}", verb, id);
                println!("Note: bookmarks are kept for this run only.");
                Ok(())
            }
        }
        Commands::Me => {
            let user = require_user(session)?;
            let insights = user_insights(store, &user.id, config.analytics.recommended_mentors);
            if json {
                return print_json(&insights);
            }

            println!("\nInsights for {} ({})", user.name, user.id);
            println!("========================================");
            println!("  Struggles:          {}", insights.total);
            println!(
                "  Most common:        {}",
                display_or_na(insights.most_common_category)
            );
            println!(
                "  Average severity:   {}",
                display_or_na(insights.average_severity)
            );
            print_counts("By category", &Category::ALL, &insights.category_counts);
            print_counts("By severity", &Severity::ALL, &insights.severity_counts);

            if !insights.recommended_mentors.is_empty() {
                println!("\nRecommended mentors:");
                display_mentors(&insights.recommended_mentors);
            }
            Ok(())
        }
        Commands::MentorDashboard => {
            let user = require_role(session, Role::Mentor)?;
            let Some(mentor) = store.mentor_by_email(&user.email) else {
                bail!("No mentor profile for {}", user.email);
            };
            let Some(workload) = mentor_workload(store, &mentor.id) else {
                bail!("No mentor profile for {}", user.email);
            };
            if json {
                return print_json(&workload);
            }

            println!("\nMentor dashboard: {}", workload.mentor.name);
            println!("========================================");
            println!("  Relevant struggles: {}", workload.relevant.len());
            print_counts("By category", &Category::ALL, &workload.category_counts);
            print_counts("By severity", &Severity::ALL, &workload.severity_counts);
            println!();
            display_struggles(&workload.relevant);
            Ok(())
        }
        // handled before the store is loaded
        Commands::Config { .. }
        | Commands::Login { .. }
        | Commands::Signup { .. }
        | Commands::Logout
        | Commands::Whoami
        | Commands::Tags { .. } => Ok(()),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    total: usize,
    category_counts: BTreeMap<Category, usize>,
    severity_counts: BTreeMap<Severity, usize>,
    most_common_category: Option<Category>,
    most_active_time: Option<String>,
    fastest_growing_category: Option<Category>,
    moderation: ModerationSummary,
}

fn show_stats(store: &RecordStore, config: &Config, json: bool) -> Result<()> {
    let struggles = store.struggles();
    let report = StatsReport {
        total: struggles.len(),
        category_counts: store.category_counts(),
        severity_counts: store.severity_counts(),
        most_common_category: store.most_common_category(),
        most_active_time: analytics::most_active_time(
            &struggles,
            config.analytics.utc_offset_minutes,
        ),
        fastest_growing_category: analytics::fastest_growing_category(
            &struggles,
            analytics::latest_activity(&struggles).unwrap_or_else(|| store.now()),
            config.analytics.growth_window_days,
        ),
        moderation: analytics::moderation_summary(&struggles),
    };

    if json {
        return print_json(&report);
    }

    println!("\nGapSense Statistics");
    println!("========================================");
    println!("  Total struggles:    {}", report.total);
    println!("  Most common:        {}", display_or_na(report.most_common_category));
    println!(
        "  Most active time:   {}",
        report.most_active_time.as_deref().unwrap_or("N/A")
    );
    println!(
        "  Fastest growing:    {}",
        display_or_na(report.fastest_growing_category)
    );
    print_counts("By category", &Category::ALL, &report.category_counts);
    print_counts("By severity", &Severity::ALL, &report.severity_counts);

    let m = &report.moderation;
    println!("\nModeration:");
    println!("  Pending:  {}", m.pending);
    println!("  Approved: {}", m.approved);
    println!("  Rejected: {}", m.rejected);
    println!("  Flagged:  {}", m.flagged);
    Ok(())
}

fn show_timeline(store: &RecordStore, json: bool) -> Result<()> {
    let points = store.timeline_data();
    if json {
        return print_json(&points);
    }

    if points.is_empty() {
        println!("No struggles recorded.");
        return Ok(());
    }
    for point in &points {
        println!("{}  {:>3}  {}", point.date, point.count, "#".repeat(point.count));
    }
    Ok(())
}

fn show_heatmap(store: &RecordStore, config: &Config, json: bool) -> Result<()> {
    let heatmap = store.activity_heatmap_in(config.analytics.utc_offset_minutes);
    if json {
        return print_json(&heatmap.cells());
    }

    print!("     ");
    for hour in 0..analytics::HOURS {
        print!("{:>3}", hour);
    }
    println!();
    for (day, row) in heatmap.rows() {
        print!("{:<5}", day.to_string());
        for value in row {
            if *value == 0 {
                print!("  .");
            } else {
                print!("{:>3}", value);
            }
        }
        println!();
    }
    println!("\nTotal: {}  Peak: {}", heatmap.total(), heatmap.max());
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StruggleDetail {
    struggle: Struggle,
    recommended_mentors: Vec<Mentor>,
}

fn show_struggle(store: &RecordStore, config: &Config, id: &str, json: bool) -> Result<()> {
    let Some(struggle) = store.struggle(id) else {
        bail!("No struggle with id {}", id);
    };
    let recommended_mentors = analytics::top_mentors(
        &store.mentors(),
        struggle.category,
        config.analytics.recommended_mentors,
    );

    if json {
        return print_json(&StruggleDetail { struggle, recommended_mentors });
    }

    display_struggle(&struggle);
    if !recommended_mentors.is_empty() {
        println!("\nRecommended mentors:");
        display_mentors(&recommended_mentors);
    }
    Ok(())
}

fn config_command(show: bool, reset: bool) -> Result<()> {
    if reset {
        config::reset_config()
    } else if show {
        config::show_config(&Config::load()?)
    } else {
        println!("Configuration options:");
        println!("  --show    Display current configuration");
        println!("  --reset   Restore default configuration");
        println!();
        println!("Config file: {}", config::config_path()?.display());
        Ok(())
    }
}

/// Attribute a submission to the session user and merge in generated tags.
/// The author is kept even for anonymous submissions; the flag only hides
/// it when displayed.
fn prepare_submission(fields: NewStruggle, user: Option<&User>) -> NewStruggle {
    let generated = generate_tags(&fields.description, fields.category);
    let tags = merge_tags(&fields.tags, &generated);
    let user_id = author_id(user);
    fields.with_tags(tags).by_user(&user_id)
}

fn check_slot(mentor: &Mentor, slot: &str) -> Result<()> {
    if mentor.time_slots.is_empty() || mentor.time_slots.iter().any(|s| s == slot) {
        return Ok(());
    }
    bail!(
        "{} has no slot '{}'. Available: {}",
        mentor.name,
        slot,
        mentor.time_slots.join(", ")
    )
}

fn require_role(session: &SessionStore, role: Role) -> Result<User> {
    let user = require_user(session)?;
    if user.role != role {
        bail!("{} is logged in as {}, not {}", user.email, user.role, role);
    }
    Ok(user)
}

fn require_user(session: &SessionStore) -> Result<User> {
    match session.current_user()? {
        Some(user) => Ok(user),
        None => bail!("Not logged in. Run 'gapsense login' first."),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_user(json: bool, user: Option<&User>, verb: &str) -> Result<()> {
    if json {
        return print_json(&user);
    }
    match user {
        Some(user) => println!(
            "{} as {} <{}> [{}] ({})",
            verb, user.name, user.email, user.role, user.id
        ),
        None => println!("Not logged in."),
    }
    Ok(())
}

/// Every key in `keys` is printed, zero counts included
fn print_counts<K>(label: &str, keys: &[K], counts: &BTreeMap<K, usize>)
where
    K: Ord + std::fmt::Display,
{
    println!("\n{}:", label);
    for key in keys {
        let count = counts.get(key).copied().unwrap_or(0);
        println!("  {:<16} {}", key.to_string(), count);
    }
}

fn display_or_na<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn display_struggle(struggle: &Struggle) {
    println!("\n{} ({})", struggle.title, struggle.id);
    println!(
        "  Category: {}  Severity: {}  Status: {}",
        struggle.category, struggle.severity, struggle.status
    );
    println!("  Submitted: {}", struggle.timestamp.format("%Y-%m-%d %H:%M UTC"));
    if !struggle.anonymous {
        println!("  By: {}", struggle.user_id);
    }
    if !struggle.tags.is_empty() {
        println!("  Tags: {}", struggle.tags.join(", "));
    }
    println!("  {}", struggle.description);
}

fn display_struggles(struggles: &[Struggle]) {
    if struggles.is_empty() {
        println!("No struggles found.");
        return;
    }

    println!("Found {} struggle(s):\n", struggles.len());
    for (i, struggle) in struggles.iter().enumerate() {
        println!("{}. [{}] {} ({})", i + 1, struggle.severity, struggle.title, struggle.id);
        println!("   {} | {}", struggle.category, struggle.tags.join(", "));
        println!("   \"{}\"", truncate_safe(&struggle.description, 80));
        println!();
    }
}

fn display_mentors(mentors: &[Mentor]) {
    if mentors.is_empty() {
        println!("No mentors found.");
        return;
    }

    for mentor in mentors {
        let expertise: Vec<&str> = mentor.expertise.iter().map(|c| c.as_str()).collect();
        println!(
            "  {} ({})  rating {:.1}, {} sessions",
            mentor.name, mentor.id, mentor.rating, mentor.sessions_completed
        );
        println!("    Expertise: {}", expertise.join(", "));
        if !mentor.time_slots.is_empty() {
            println!("    Slots: {}", mentor.time_slots.join(", "));
        }
    }
}

fn display_booking(booking: &Booking) {
    println!("\nBooked {} with {} at {}", booking.id, booking.mentor_name, booking.slot);
    if let Some(struggle_id) = &booking.struggle_id {
        println!("  About: {}", struggle_id);
    }
    if booking.anonymous {
        println!("  Your name is hidden from the mentor.");
    }
}
