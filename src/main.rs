use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod catalog;
mod diagnostics;
mod graph;
mod render;
mod scheduler;
mod store;

use catalog::CatalogIndex;
use store::{CatalogStore, JsonFileStore};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "coursegraph")]
#[command(about = "Course catalog prerequisite graph explorer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List departments in catalog order.
    Departments {
        #[arg(long)]
        catalog: String,
    },

    /// List one department's courses with expanded prerequisite trees.
    Courses {
        #[arg(long)]
        catalog: String,

        #[arg(long)]
        dept: String,
    },

    /// Compute the courses reachable from a course via prerequisite edges.
    Reach {
        #[arg(long)]
        catalog: String,

        #[arg(long)]
        course: String,
    },

    /// Ask an external scheduler for a quarter-by-quarter plan.
    Schedule {
        #[arg(long)]
        catalog: String,

        #[arg(long, required = true)]
        required: Vec<String>,

        #[arg(long)]
        completed: Vec<String>,

        #[arg(long, default_value_t = 4)]
        max_per_quarter: u32,

        /// Scheduler executable; receives the request on stdin.
        #[arg(long)]
        scheduler_cmd: String,

        /// Extra arguments passed to the scheduler executable.
        #[arg(long)]
        scheduler_arg: Vec<String>,
    },

    /// Generate a catalog report (single self-contained HTML file).
    Report {
        #[arg(long)]
        catalog: String,

        #[arg(short = 'o', long)]
        out: String,
    },

    /// Validate course records and replace the store contents with them.
    Load {
        #[arg(long)]
        input: String,

        #[arg(long)]
        catalog: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("coursegraph=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn load_index(catalog_path: &str) -> Result<(Vec<catalog::RawCourseRecord>, CatalogIndex)> {
    let store = JsonFileStore::new(catalog_path);
    let records = store.fetch_all()?;
    let index = CatalogIndex::build(&records);
    Ok((records, index))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Departments { catalog } => {
            let (_, mut index) = load_index(&catalog)?;
            if index.is_empty() {
                tracing::warn!("catalog is empty");
            }
            println!("{}", serde_json::to_string_pretty(index.departments())?);
        }

        Commands::Courses { catalog, dept } => {
            let (_, mut index) = load_index(&catalog)?;
            let views = index.courses_in(&dept);
            if views.is_empty() {
                tracing::warn!(%dept, "no courses for department");
            }
            println!("{}", serde_json::to_string_pretty(views)?);
        }

        Commands::Reach { catalog, course } => {
            let (_, mut index) = load_index(&catalog)?;

            // Scope for cross-group classification: the root's department.
            let dept_id = index
                .lookup(&course)
                .map(|c| c.dept_id.clone())
                .ok_or_else(|| anyhow::anyhow!("course not in catalog: {}", course))?;
            let in_scope: std::collections::BTreeSet<String> = index
                .courses_in(&dept_id)
                .iter()
                .map(|v| v.course.course_id.clone())
                .collect();

            let traversal = graph::reachable_from(&mut index, &course)?;
            let output = ReachOutput {
                cross_department: traversal.external_sources(&in_scope),
                visited: traversal.visited,
                edges: traversal.edges,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Schedule {
            catalog,
            required,
            completed,
            max_per_quarter,
            scheduler_cmd,
            scheduler_arg,
        } => {
            let (records, index) = load_index(&catalog)?;
            for course_id in required.iter().chain(completed.iter()) {
                if index.lookup(course_id).is_none() {
                    tracing::warn!(%course_id, "course not in catalog");
                }
            }

            let request = scheduler::ScheduleRequest {
                catalog: &records,
                required_courses: &required,
                completed_courses: &completed,
                max_courses_per_quarter: max_per_quarter,
            };
            let schedule = scheduler::request_schedule(&scheduler_cmd, &scheduler_arg, &request)?;
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }

        Commands::Report { catalog, out } => {
            let (_, mut index) = load_index(&catalog)?;
            let data = render::build_report_data(&mut index);
            let html = render::render_html_report(&data)?;
            std::fs::write(&out, html)?;
            println!("Wrote {}", out);
        }

        Commands::Load { input, catalog } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("read records file {}", input))?;
            let records: Vec<catalog::RawCourseRecord> = serde_json::from_str(&text)
                .with_context(|| format!("parse records file {}", input))?;

            // Build an index once to surface diagnostics before committing.
            let index = CatalogIndex::build(&records);
            for diagnostic in index.diagnostics() {
                tracing::warn!(%diagnostic, "while validating records");
            }

            let mut store = JsonFileStore::new(&catalog);
            store.replace_all(&records)?;
            println!(
                "Loaded {} records into {}",
                records.len(),
                store.path().display()
            );
        }
    }

    Ok(())
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ReachOutput {
    visited: std::collections::BTreeSet<String>,
    edges: std::collections::BTreeMap<String, Vec<graph::Edge>>,
    cross_department: std::collections::BTreeSet<String>,
}
