use std::path::PathBuf;

use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use shift_scheduler::config::{self, Config};
use shift_scheduler::display::{print_schedule, write_schedule_to_file};
use shift_scheduler::export::export_schedule_csv;
use shift_scheduler::import::{apply_requests, load_requests_from_path};
use shift_scheduler::schedule::{EmployeeId, StaffingCap};
use shift_scheduler::week::Week;
use shift_scheduler::web;

#[derive(Parser)]
#[command(name = "shift-scheduler")]
#[command(about = "Weekly shift scheduling from hourly availability")]
#[command(version)]
struct Cli {
    /// Directory holding the stored roster, availability and schedule
    #[arg(long, global = true, env = "SHIFT_DATA_DIR", default_value = config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Maximum staff per hour slot (0 = unlimited)
    #[arg(long, global = true, env = "SHIFT_MAX_STAFF", default_value_t = 2)]
    max_staff: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve(ServeArgs),

    /// Regenerate the schedule from stored availability and print it
    Generate {
        /// Also write the text schedule to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the current schedule
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import shift requests from CSV (name column plus one column per day)
    Import {
        csv: PathBuf,
    },

    /// Manage employees
    #[command(subcommand)]
    Roster(RosterCommand),

    /// Clear the schedule and everyone's availability
    Reset {
        /// Confirm the reset; it cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long, env = "SHIFT_BIND", default_value = config::DEFAULT_BIND)]
    bind: String,

    #[arg(short, long, env = "SHIFT_PORT", default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Front-end assets served at /
    #[arg(long, env = "SHIFT_STATIC_DIR", default_value = config::DEFAULT_STATIC_DIR)]
    static_dir: PathBuf,
}

#[derive(Subcommand)]
enum RosterCommand {
    /// List employees with their ids
    List,
    /// Add an employee
    Add { name: String },
    /// Remove an employee and their assignments
    Remove {
        id: EmployeeId,
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Text,
    Csv,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = Config {
        data_dir: cli.data_dir,
        max_staff_per_slot: StaffingCap::new(cli.max_staff),
        ..Config::default()
    };
    let store = config.store();
    let mut planner = store.load_planner(config.max_staff_per_slot)?;

    match cli.command {
        Commands::Serve(args) => {
            config.bind = args.bind;
            config.port = args.port;
            config.static_dir = args.static_dir;
            println!("Access the site at http://localhost:{}", config.port);
            web::start_server(&config, planner).await?;
        }
        Commands::Generate { output } => {
            planner.generate();
            store.save_planner(&planner)?;
            let week = Week::containing(Local::now().date_naive())?;
            print_schedule(&planner, Some(&week))?;
            if let Some(path) = output {
                write_schedule_to_file(&planner, Some(&week), &path)?;
                println!("Schedule saved to {}", path.display());
            }
        }
        Commands::Export { format, output } => {
            let week = Week::containing(Local::now().date_naive())?;
            match (format, output) {
                (ExportFormat::Text, Some(path)) => write_schedule_to_file(&planner, Some(&week), &path)?,
                (ExportFormat::Text, None) => print_schedule(&planner, Some(&week))?,
                (ExportFormat::Csv, Some(path)) => export_schedule_csv(&planner, std::fs::File::create(path)?)?,
                (ExportFormat::Csv, None) => export_schedule_csv(&planner, std::io::stdout().lock())?,
            }
        }
        Commands::Import { csv } => {
            let requests = load_requests_from_path(&csv)?;
            let summary = apply_requests(&mut planner, &requests);
            store.save_planner(&planner)?;
            println!(
                "Imported {} requests ({} new employees, {} updated)",
                requests.len(),
                summary.added.len(),
                summary.updated.len()
            );
        }
        Commands::Roster(RosterCommand::List) => {
            for employee in planner.roster().iter() {
                println!("{:>4}  {}", employee.id, employee.name);
            }
        }
        Commands::Roster(RosterCommand::Add { name }) => match planner.add_employee(&name) {
            Some(id) => {
                store.save_planner(&planner)?;
                println!("Added {} with id {}", name.trim(), id);
            }
            None => println!("Name is empty, nothing added"),
        },
        Commands::Roster(RosterCommand::Remove { id, yes }) => {
            if !yes {
                eprintln!("Refusing to remove employee {} without --yes", id);
                std::process::exit(2);
            }
            match planner.remove_employee(id) {
                Some(employee) => {
                    store.save_planner(&planner)?;
                    println!("Removed {}", employee.name);
                }
                None => println!("No employee with id {}", id),
            }
        }
        Commands::Reset { yes } => {
            if !yes {
                eprintln!("Refusing to reset without --yes; this cannot be undone");
                std::process::exit(2);
            }
            planner.reset();
            store.save_planner(&planner)?;
            println!("Schedule and availability cleared");
        }
    }

    Ok(())
}
