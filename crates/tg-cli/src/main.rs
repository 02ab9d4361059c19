//! TrustGuard CLI
//!
//! Command-line interface over the TrustGuard core: user risk scoring,
//! the alert center, and the triage workflow, driven against the bundled
//! demo data set.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use std::path::PathBuf;
use tg_core::{
    seed, Alert, AlertMetrics, AlertSeverity, AlertStatus, MockDispatcher, PostureSummary,
    ResponseChannel, ResponseVerdict, RiskLevel, ScoredUser, SecurityDirectory,
    TransitionOptions, UserResponse,
};
use tg_observability::{init_logging_with_config, LoggingConfig};

mod config;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "trustguard")]
#[command(version)]
#[command(about = "User risk scoring and alert triage", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the risk posture and alert center summary
    Overview,

    /// List monitored users with their risk scores
    Users,

    /// Show one user: factor breakdown, activities, and alerts
    User {
        /// User id prefix, email, or name fragment
        query: String,
    },

    /// List alerts (active view by default)
    Alerts {
        /// Show the resolved view instead
        #[arg(long)]
        resolved: bool,
    },

    /// Show one alert in full
    Alert {
        /// Alert id prefix or title fragment
        query: String,
    },

    /// Apply a triage action to an alert
    Triage {
        /// Alert id prefix or title fragment
        query: String,

        /// The action to apply
        action: TriageActionArg,

        /// Operator notes to attach when closing the alert
        #[arg(long)]
        notes: Option<String>,
    },

    /// Send a "was this you?" prompt for an alert
    Notify {
        /// Alert id prefix or title fragment
        query: String,

        /// Channel: email, sms, app_notification, phone_call
        #[arg(long, default_value = "email")]
        channel: String,
    },

    /// Record the flagged user's reply to a prompt
    Respond {
        /// Alert id prefix or title fragment
        query: String,

        /// The user's verdict
        verdict: VerdictArg,

        /// The user's explanation
        #[arg(long)]
        explanation: String,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum TriageActionArg {
    Open,
    Dismiss,
    Resolve,
}

#[derive(Clone, Copy, ValueEnum)]
enum VerdictArg {
    Confirmed,
    Denied,
}

impl From<VerdictArg> for ResponseVerdict {
    fn from(arg: VerdictArg) -> Self {
        match arg {
            VerdictArg::Confirmed => ResponseVerdict::Confirmed,
            VerdictArg::Denied => ResponseVerdict::Denied,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let logging = LoggingConfig {
        level: if cli.verbose {
            tracing::Level::DEBUG
        } else {
            config.logging.level()?
        },
        json_format: config.logging.json,
        ..LoggingConfig::default()
    };
    init_logging_with_config(logging);

    let mut dir = seed::demo_directory_with_weights(config.weights.clone())
        .context("Failed to build the demo directory")?;

    match cli.command {
        Commands::Overview => show_overview(&dir, cli.format)?,
        Commands::Users => show_users(&dir, cli.format)?,
        Commands::User { query } => show_user(&dir, &query)?,
        Commands::Alerts { resolved } => show_alerts(&dir, resolved, cli.format)?,
        Commands::Alert { query } => {
            let id = find_alert(&dir, &query)?;
            print_alert_detail(dir.alert(id)?);
        }
        Commands::Triage {
            query,
            action,
            notes,
        } => {
            let id = find_alert(&dir, &query)?;
            let opts = match notes {
                Some(notes) => TransitionOptions::with_notes(notes),
                None => TransitionOptions::default(),
            };
            let alert = match action {
                TriageActionArg::Open => dir.open_alert(id)?,
                TriageActionArg::Dismiss => dir.dismiss_alert(id, opts)?,
                TriageActionArg::Resolve => dir.resolve_alert(id, opts)?,
            };
            println!(
                "{} {} is now {}",
                "ok:".green().bold(),
                alert.title,
                status_colored(alert.status)
            );
        }
        Commands::Notify { query, channel } => {
            let id = find_alert(&dir, &query)?;
            let Some(channel) = ResponseChannel::parse(&channel) else {
                bail!("Invalid channel: {channel} (expected email, sms, app_notification, or phone_call)");
            };
            dir.notify_user(id, channel, &MockDispatcher::new())?;
            let alert = dir.alert(id)?;
            println!(
                "{} verification prompt for {} sent to {} via {}",
                "ok:".green().bold(),
                alert.title,
                alert.user_name,
                channel
            );
        }
        Commands::Respond {
            query,
            verdict,
            explanation,
        } => {
            let id = find_alert(&dir, &query)?;
            dir.record_response(id, verdict.into(), explanation)?;
            let alert = dir.alert(id)?;
            println!(
                "{} response recorded for {}: {}",
                "ok:".green().bold(),
                alert.title,
                response_summary(&alert.user_response)
            );
        }
        Commands::Config => {
            println!("{}", serde_yaml::to_string(&config)?);
        }
    }

    Ok(())
}

fn show_overview(dir: &SecurityDirectory, format: OutputFormat) -> Result<()> {
    let posture = PostureSummary::compute(dir.users());
    let metrics = AlertMetrics::compute(dir.alerts());

    if format == OutputFormat::Json {
        let combined = serde_json::json!({
            "posture": posture,
            "alerts": metrics,
        });
        println!("{}", serde_json::to_string_pretty(&combined)?);
        return Ok(());
    }

    println!("{}", "Risk posture".bold());
    println!("  monitored users: {}", posture.total_users);
    for level in [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low] {
        println!(
            "  {:>6}: {}",
            level_colored(level),
            posture.count_at(level)
        );
    }
    println!("  mean risk score: {:.1}", posture.mean_risk_score);

    println!();
    println!("{}", "Alert center".bold());
    println!(
        "  {} active, {} resolved ({} total)",
        metrics.active, metrics.resolved, metrics.total_alerts
    );
    println!(
        "  denied responses: {}, awaiting responses: {}",
        metrics.denied_responses, metrics.awaiting_responses
    );
    Ok(())
}

fn show_users(dir: &SecurityDirectory, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(dir.users())?);
        return Ok(());
    }

    for user in dir.users() {
        let assessment = user.assessment();
        println!(
            "{}  {:<18} {:<24} {:<12} score {:>3}  {}",
            short_id(user.profile.id),
            user.profile.name,
            user.profile.email,
            user.profile.department.name(),
            assessment.score,
            level_colored(assessment.level)
        );
    }
    Ok(())
}

fn show_user(dir: &SecurityDirectory, query: &str) -> Result<()> {
    let id = find_user(dir, query)?;
    let user = dir.user(id)?;
    let assessment = user.assessment();

    println!(
        "{} <{}> — {} {}",
        user.profile.name.bold(),
        user.profile.email,
        user.profile.role,
        format!("({})", user.profile.department).dimmed()
    );
    println!(
        "risk: {} (score {})",
        level_colored(assessment.level),
        assessment.score
    );

    if !assessment.factors.is_empty() {
        println!("\n{}", "Contributing factors".bold());
        for factor in &assessment.factors {
            println!("  +{:<4} {}", factor.points, factor.name);
        }
    }

    if !user.activities.is_empty() {
        println!("\n{}", "Recent activity".bold());
        for activity in &user.activities {
            println!(
                "  {}  {:<18} {}  {}",
                activity.timestamp.format("%Y-%m-%d %H:%M"),
                activity.kind.to_string().dimmed(),
                activity.description,
                activity_level_colored(activity),
            );
        }
    }

    let alerts = dir.alerts_for_user(id);
    if !alerts.is_empty() {
        println!("\n{}", "Alerts".bold());
        for alert in alerts {
            print_alert_row(alert);
        }
    }
    Ok(())
}

fn show_alerts(dir: &SecurityDirectory, resolved: bool, format: OutputFormat) -> Result<()> {
    let alerts = if resolved {
        dir.resolved_alerts()
    } else {
        dir.active_alerts()
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    if alerts.is_empty() {
        println!(
            "no {} alerts",
            if resolved { "resolved" } else { "active" }
        );
        return Ok(());
    }
    for alert in alerts {
        print_alert_row(alert);
    }
    Ok(())
}

fn print_alert_row(alert: &Alert) {
    println!(
        "{}  [{}] {:<42} {:<16} {}",
        short_id(alert.id),
        severity_colored(alert.severity),
        alert.title,
        alert.user_name,
        status_colored(alert.status)
    );
}

fn print_alert_detail(alert: &Alert) {
    println!("{}", alert.title.bold());
    println!("{}", alert.description);
    println!(
        "severity {}  status {}  rule {}",
        severity_colored(alert.severity),
        status_colored(alert.status),
        alert.rule
    );
    println!(
        "user {}  triggered {}",
        alert.user_name,
        alert.triggered_at.format("%Y-%m-%d %H:%M")
    );
    if let Some(resolved_at) = alert.resolved_at {
        println!("resolved {}", resolved_at.format("%Y-%m-%d %H:%M"));
    }
    if !alert.affected_systems.is_empty() {
        println!("affected systems: {}", alert.affected_systems.join(", "));
    }
    println!("user response: {}", response_summary(&alert.user_response));
    if let Some(notes) = &alert.admin_notes {
        println!("notes: {notes}");
    }
    if !alert.investigation_steps.is_empty() {
        println!("{}", "Investigation".bold());
        for (i, step) in alert.investigation_steps.iter().enumerate() {
            println!("  {}. {step}", i + 1);
        }
    }
}

fn response_summary(response: &UserResponse) -> String {
    match response {
        UserResponse::NotNotified => "user not notified".dimmed().to_string(),
        UserResponse::AwaitingResponse { channel, .. } => {
            format!("awaiting reply ({channel})").yellow().to_string()
        }
        UserResponse::Confirmed { explanation, .. } => {
            format!("{} — {explanation}", "confirmed by user".green())
        }
        UserResponse::Denied { explanation, .. } => {
            format!("{} — {explanation}", "denied by user".red().bold())
        }
    }
}

fn short_id(id: uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn find_user(dir: &SecurityDirectory, query: &str) -> Result<uuid::Uuid> {
    let query_lower = query.to_lowercase();
    let matches: Vec<&ScoredUser> = dir
        .users()
        .iter()
        .filter(|u| {
            u.profile.id.to_string().starts_with(&query_lower)
                || u.profile.email.eq_ignore_ascii_case(query)
                || u.profile.name.to_lowercase().contains(&query_lower)
        })
        .collect();
    match matches.as_slice() {
        [user] => Ok(user.profile.id),
        [] => bail!("No user matches '{query}'"),
        _ => bail!("'{query}' is ambiguous ({} users match)", matches.len()),
    }
}

fn find_alert(dir: &SecurityDirectory, query: &str) -> Result<uuid::Uuid> {
    let query_lower = query.to_lowercase();
    let matches: Vec<&Alert> = dir
        .alerts()
        .iter()
        .filter(|a| {
            a.id.to_string().starts_with(&query_lower)
                || a.title.to_lowercase().contains(&query_lower)
        })
        .collect();
    match matches.as_slice() {
        [alert] => Ok(alert.id),
        [] => bail!("No alert matches '{query}'"),
        _ => bail!("'{query}' is ambiguous ({} alerts match)", matches.len()),
    }
}

fn level_colored(level: RiskLevel) -> ColoredString {
    match level {
        RiskLevel::Low => "low".green(),
        RiskLevel::Medium => "medium".yellow(),
        RiskLevel::High => "high".red().bold(),
    }
}

fn severity_colored(severity: AlertSeverity) -> ColoredString {
    match severity {
        AlertSeverity::Low => "low".green(),
        AlertSeverity::Medium => "medium".yellow(),
        AlertSeverity::High => "high".red().bold(),
    }
}

fn status_colored(status: AlertStatus) -> ColoredString {
    match status {
        AlertStatus::Active => "active".red(),
        AlertStatus::Investigating => "investigating".yellow(),
        AlertStatus::Dismissed => "dismissed".dimmed(),
        AlertStatus::Resolved => "resolved".green(),
    }
}

fn activity_level_colored(activity: &tg_core::Activity) -> ColoredString {
    use tg_core::ActivityRiskLevel;
    match activity.risk_level {
        ActivityRiskLevel::Normal => "normal".dimmed(),
        ActivityRiskLevel::Suspicious => "suspicious".yellow(),
        ActivityRiskLevel::Critical => "critical".red().bold(),
    }
}
