use std::time::Duration;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::classify::Vocabulary;
use crate::scan::DEFAULT_FILTER_TEMPLATE;

#[derive(Parser, Debug)]
#[command(
    name = "tracker-board-report",
    version,
    about = "Aggregate issue-tracker records into status/urgency summaries and resolution trends (JSON)",
    long_about = None
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Command>,

  /// Tracker base URL (default: TRACKER_URL or JIRA_URL env)
  #[arg(long, global = true)]
  pub base_url: Option<String>,

  /// Records per search page
  #[arg(long, global = true, default_value_t = 100)]
  pub page_size: usize,

  /// Per-request timeout in seconds
  #[arg(long, global = true, default_value_t = 30)]
  pub timeout: u64,

  /// Concurrent project scans during `scan`
  #[arg(long, global = true, default_value_t = 4)]
  pub workers: usize,

  /// Output location: file path, or "-" for stdout
  #[arg(long, global = true, default_value = "-")]
  pub out: String,

  /// Priority name counted as urgent (repeatable; replaces the default set)
  #[arg(long = "urgent-priority", global = true)]
  pub urgent_priorities: Vec<String>,

  /// Outcome label enumerated for test artifacts (repeatable; replaces the default set)
  #[arg(long = "outcome-label", global = true)]
  pub outcome_labels: Vec<String>,

  /// Type name treated as a test artifact (repeatable; replaces the default set)
  #[arg(long = "test-type", global = true)]
  pub test_types: Vec<String>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant for window resolution (hidden; tests only)
  #[arg(long = "now-override", hide = true, global = true)]
  pub now_override: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
  /// Aggregate one filter into status/urgency/outcome counters
  Summary {
    /// Scope to a project key
    #[arg(long)]
    project: Option<String>,

    /// Restrict to one issue type, e.g. "Task"
    #[arg(long = "type")]
    type_name: Option<String>,

    /// Raw query passed through verbatim (instead of --project/--type)
    #[arg(long)]
    filter: Option<String>,
  },

  /// Merge counters across many projects
  Scan {
    /// Comma-separated project keys (default: discover from the source)
    #[arg(long, value_delimiter = ',')]
    projects: Vec<String>,

    /// Per-project filter; "{key}" is replaced with each project key
    #[arg(long, default_value = DEFAULT_FILTER_TEMPLATE)]
    filter_template: String,
  },

  /// Daily resolution-latency trend over a fixed-length window
  Trend {
    /// Scope to a project key
    #[arg(long)]
    project: Option<String>,

    /// Raw query passed through verbatim (instead of the generated one)
    #[arg(long)]
    filter: Option<String>,

    /// Window length in days
    #[arg(long, default_value_t = 30)]
    window_days: i64,

    /// First day of the window, YYYY-MM-DD (default: trailing window ending today UTC)
    #[arg(long)]
    window_start: Option<NaiveDate>,
  },
}

/// What the binary will actually do, with all filter text resolved.
#[derive(Debug, Clone)]
pub enum Action {
  Summary {
    filter: String,
  },
  Scan {
    projects: Vec<String>,
    filter_template: String,
  },
  Trend {
    project: Option<String>,
    filter: Option<String>,
    window_days: i64,
    window_start: Option<NaiveDate>,
  },
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub base_url: Option<String>,
  pub page_size: usize,
  pub timeout: Duration,
  pub workers: usize,
  pub out: String,
  pub vocabulary: Vocabulary,
  pub now_override: Option<String>,
  pub action: Action,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let Some(command) = cli.command else {
    bail!("Provide a command: summary, scan, or trend")
  };

  if cli.page_size == 0 {
    bail!("--page-size must be at least 1");
  }

  // Vocabulary flags replace the defaults wholesale when given
  let mut vocabulary = Vocabulary::default();
  if !cli.urgent_priorities.is_empty() {
    vocabulary.urgent_priorities = cli.urgent_priorities;
  }
  if !cli.outcome_labels.is_empty() {
    vocabulary.outcome_labels = cli.outcome_labels;
  }
  if !cli.test_types.is_empty() {
    vocabulary.test_artifact_types = cli.test_types;
  }

  let action = match command {
    Command::Summary {
      project,
      type_name,
      filter,
    } => {
      if filter.is_some() && (project.is_some() || type_name.is_some()) {
        bail!("Ambiguous scope: choose --filter or --project/--type, not both");
      }

      Action::Summary {
        filter: filter.unwrap_or_else(|| summary_filter(project.as_deref(), type_name.as_deref())),
      }
    }
    Command::Scan {
      projects,
      filter_template,
    } => Action::Scan {
      projects,
      filter_template,
    },
    Command::Trend {
      project,
      filter,
      window_days,
      window_start,
    } => {
      if filter.is_some() && project.is_some() {
        bail!("Ambiguous scope: choose --filter or --project, not both");
      }
      if window_days <= 0 {
        bail!("--window-days must be positive");
      }

      Action::Trend {
        project,
        filter,
        window_days,
        window_start,
      }
    }
  };

  Ok(EffectiveConfig {
    base_url: cli.base_url,
    page_size: cli.page_size,
    timeout: Duration::from_secs(cli.timeout),
    workers: cli.workers.max(1),
    out: cli.out,
    vocabulary,
    now_override: cli.now_override,
    action,
  })
}

fn summary_filter(project: Option<&str>, type_name: Option<&str>) -> String {
  let mut clauses = Vec::new();

  if let Some(key) = project {
    clauses.push(format!("project = \"{key}\""));
  }
  if let Some(name) = type_name {
    clauses.push(format!("issuetype = \"{name}\""));
  }

  if clauses.is_empty() {
    // All records, newest first (matches the all-boards dashboard default)
    "ORDER BY created DESC".to_string()
  } else {
    clauses.join(" AND ")
  }
}
