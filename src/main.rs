//! Attendance CLI
//!
//! Command-line interface for the attendance contract:
//! - Register employees
//! - Mark today's attendance
//! - Look up employee details
//! - Show daily and date-range counts
//! - Run an interactive session

use anyhow::Context;
use attendance::client::{
    bootstrap, render, App, ConsoleNotifier, InputField, BOOTSTRAP_FAILED,
};
use attendance::{AttendanceStatus, ClientContext, Config, LoggingConfig, SystemClock};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "attendance")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Employee attendance tracking on a smart contract")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/attendance/config.toml or ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint, overrides the config file
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Use an in-process ledger instead of a provider (state lasts one process)
    #[arg(long, global = true)]
    pub local: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register an employee
    AddEmployee {
        /// Employee address
        #[arg(long)]
        address: String,
        /// Employee name
        #[arg(long)]
        name: String,
        /// Age in years
        #[arg(long)]
        age: String,
        /// Employee number
        #[arg(long)]
        number: String,
    },

    /// Mark today's attendance for the current account
    Mark {
        status: StatusArg,
    },

    /// Show employee details
    Employee {
        /// Employee address
        address: String,
    },

    /// Count employees with a status today
    Today {
        status: StatusArg,
    },

    /// Count days with a status for one employee over a date range
    Range {
        /// Employee address
        address: String,
        status: StatusArg,
        /// First day (YYYY-MM-DD, default: today)
        #[arg(long)]
        start: Option<String>,
        /// Last day (YYYY-MM-DD, default: today)
        #[arg(long)]
        end: Option<String>,
    },

    /// Show connected accounts and network
    Accounts,

    /// Interactive session
    Shell,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Present,
    Absent,
    Leave,
}

impl From<StatusArg> for AttendanceStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Present => AttendanceStatus::Present,
            StatusArg::Absent => AttendanceStatus::Absent,
            StatusArg::Leave => AttendanceStatus::Leave,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = attendance::config::generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing config to {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.rpc_url {
        config.provider.url = url.clone();
    }

    init_logging(&config.logging);

    let ctx = if cli.local {
        bootstrap::local(&config, Arc::new(SystemClock))
    } else {
        bootstrap::connect(&config).await
    };

    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(e) => {
            println!("{}", BOOTSTRAP_FAILED);
            tracing::error!(error = %e, "Bootstrap failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(ctx, &config.display, Arc::new(ConsoleNotifier));

    // Failures were already alerted; only the exit status is left to set
    let ok = match cli.command {
        Commands::AddEmployee {
            address,
            name,
            age,
            number,
        } => {
            app.set_input(InputField::Address, &address)?;
            app.set_input(InputField::Name, &name)?;
            app.set_input(InputField::Age, &age)?;
            app.set_input(InputField::Number, &number)?;
            app.add_employee().await.is_ok()
        }

        Commands::Mark { status } => app.mark_attendance(status.into()).await.is_ok(),

        Commands::Employee { address } => {
            app.set_input(InputField::GetEmployee, &address)?;
            match app.lookup_employee().await {
                Ok(record) => {
                    for line in render::employee_details(&record) {
                        println!("{}", line);
                    }
                    true
                }
                Err(_) => false,
            }
        }

        Commands::Today { status } => {
            let ok = app.show_daily_count(status.into()).await.is_ok();
            print_counts(&app).await;
            ok
        }

        Commands::Range {
            address,
            status,
            start,
            end,
        } => {
            app.set_input(InputField::GetMonthlyAttendance, &address)?;
            if let Some(start) = start {
                app.set_input(InputField::StartDate, &start)?;
            }
            if let Some(end) = end {
                app.set_input(InputField::EndDate, &end)?;
            }
            let ok = app.show_range_count(status.into()).await.is_ok();
            print_counts(&app).await;
            ok
        }

        Commands::Accounts => {
            print_accounts(app.context());
            true
        }

        Commands::Shell => {
            run_shell(&mut app).await?;
            true
        }

        Commands::Config { .. } => true,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("attendance={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_accounts(ctx: &ClientContext) {
    println!("Network: {}", ctx.network_id);
    println!("Current account: {}", ctx.current_account);
    println!();
    println!("Accounts:");
    for (i, account) in ctx.accounts.iter().enumerate() {
        let marker = if *account == ctx.current_account { " *" } else { "" };
        println!("  [{}] {}{}", i, account, marker);
    }
}

async fn print_counts(app: &App) {
    let daily = app.daily().snapshot().await;
    let range = app.range().snapshot().await;

    if let Some(line) = render::visible_counts("today", &daily) {
        println!("{}", line);
    }
    if let Some(line) = render::visible_counts("range", &range) {
        println!("{}", line);
    }
}

// ============================================
// Interactive session
// ============================================

/// One line of shell input
#[derive(Debug, PartialEq)]
enum ShellCommand {
    Set(InputField, String),
    Inputs,
    Add,
    Mark(AttendanceStatus),
    Lookup,
    Today(AttendanceStatus),
    Range(AttendanceStatus),
    Counts,
    Accounts,
    Help,
    Quit,
}

fn parse_shell_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let status = |arg: &str| arg.parse::<AttendanceStatus>();

    match head.to_ascii_lowercase().as_str() {
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field: InputField = field.parse().map_err(|e| format!("{}", e))?;
            Ok(ShellCommand::Set(field, value.trim().to_string()))
        }
        "inputs" => Ok(ShellCommand::Inputs),
        "add" => Ok(ShellCommand::Add),
        "present" | "absent" | "leave" => Ok(ShellCommand::Mark(status(head)?)),
        "mark" => Ok(ShellCommand::Mark(status(rest)?)),
        "lookup" => Ok(ShellCommand::Lookup),
        "today" => Ok(ShellCommand::Today(status(rest)?)),
        "range" => Ok(ShellCommand::Range(status(rest)?)),
        "counts" => Ok(ShellCommand::Counts),
        "accounts" => Ok(ShellCommand::Accounts),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command: {} (try `help`)", other)),
    }
}

const SHELL_HELP: &str = "\
Commands:
  set <field> <value>   set an input (address, name, age, number,
                        getEmployee, getMonthlyAttendance, startDate, endDate)
  inputs                show current inputs
  add                   add employee from address/name/age/number
  present|absent|leave  mark today's attendance
  lookup                show employee in getEmployee
  today <status>        count today's attendance for a status
  range <status>        count days with a status for getMonthlyAttendance
                        between startDate and endDate
  counts                show visible counts
  accounts              show accounts
  quit                  leave the session";

async fn run_shell(app: &mut App) -> anyhow::Result<()> {
    println!("Attendance shell on network {}. Type `help` for commands.", app.context().network_id);
    println!("Dates use YYYY-MM-DD.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_shell_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        // Action failures are already alerted by the app
        match command {
            ShellCommand::Set(field, value) => {
                if let Err(e) = app.set_input(field, &value) {
                    println!("{}", e);
                }
            }
            ShellCommand::Inputs => {
                for field in InputField::ALL {
                    println!("  {:<22} {}", field.name(), app.inputs().get(field));
                }
            }
            ShellCommand::Add => {
                let _ = app.add_employee().await;
            }
            ShellCommand::Mark(status) => {
                let _ = app.mark_attendance(status).await;
            }
            ShellCommand::Lookup => {
                if let Ok(record) = app.lookup_employee().await {
                    for line in render::employee_details(&record) {
                        println!("  {}", line);
                    }
                }
            }
            ShellCommand::Today(status) => {
                let _ = app.show_daily_count(status).await;
                print_counts(app).await;
            }
            ShellCommand::Range(status) => {
                let _ = app.show_range_count(status).await;
                print_counts(app).await;
            }
            ShellCommand::Counts => print_counts(app).await,
            ShellCommand::Accounts => print_accounts(app.context()),
            ShellCommand::Help => println!("{}", SHELL_HELP),
            ShellCommand::Quit => break,
        }
    }

    Ok(())
}
