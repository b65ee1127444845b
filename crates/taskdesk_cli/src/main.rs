//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load config, seed or load the store, and print one sorted task page.
//! - Keep output deterministic for quick local sanity checks.

use chrono::Local;
use clap::Parser;
use log::error;
use std::error::Error;
use std::path::PathBuf;
use taskdesk_core::{
    display_color, due_label, init_logging, CoreConfig, DueLabel, PageRequest, SortColumn,
    SortState, TaskQuery, TodoService,
};

#[derive(Parser, Debug)]
#[command(name = "taskdesk")]
#[command(author, version, about = "Print a filtered, sorted page of tasks", long_about = None)]
struct Cli {
    /// JSON config file; without one the demo data set is loaded.
    #[arg(long, env = "TASKDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Case-insensitive title fragment.
    #[arg(long)]
    title: Option<String>,

    /// Only completed (`true`) or only active (`false`) tasks.
    #[arg(long)]
    completed: Option<bool>,

    /// Sort column: id, title, date, priority, category or completed.
    #[arg(long, value_parser = parse_sort_column)]
    sort: Option<SortColumn>,

    /// Sort descending instead of ascending.
    #[arg(long, requires = "sort")]
    desc: bool,

    /// One-based page number.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    page: u64,
}

impl Cli {
    fn query(&self) -> TaskQuery {
        let query = TaskQuery::new().with_completed(self.completed);
        match &self.title {
            Some(fragment) => query.with_title(fragment.as_str()),
            None => query,
        }
    }

    fn sort(&self) -> Option<SortState> {
        self.sort.map(|column| {
            if self.desc {
                SortState::desc(column)
            } else {
                SortState::asc(column)
            }
        })
    }

    fn page_index(&self) -> usize {
        usize::try_from(self.page - 1).unwrap_or(usize::MAX)
    }
}

fn parse_sort_column(value: &str) -> Result<SortColumn, String> {
    value.parse::<SortColumn>().map_err(|err| err.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!("event=cli_run module=cli status=error error={err}");
        eprintln!("taskdesk: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match cli.config.as_deref() {
        Some(path) => CoreConfig::from_file(path)?,
        None => CoreConfig {
            seed_demo_data: true,
            ..CoreConfig::default()
        },
    }
    .with_env_overrides()?;
    init_logging(&config)?;

    let service = TodoService::from_config(&config)?;
    println!("taskdesk_core version={}", taskdesk_core::core_version());

    for category in service.list_categories().await? {
        let count = service
            .count_tasks(&TaskQuery::new().in_category(&category))
            .await?;
        println!("category id={} tasks={count} title={}", category.id, category.title);
    }

    let request = PageRequest::new(cli.page_index(), service.page_size());
    let page = service.task_table(&cli.query(), cli.sort(), request).await?;
    let today = Local::now().date_naive();
    println!(
        "tasks page={}/{} total={}",
        page.page_index + 1,
        page.page_count.max(1),
        page.total
    );
    for row in &page.items {
        let due = match due_label(row.task.date, today) {
            DueLabel::NoDeadline => "-".to_string(),
            DueLabel::Yesterday => "yesterday".to_string(),
            DueLabel::Today => "today".to_string(),
            DueLabel::Tomorrow => "tomorrow".to_string(),
            DueLabel::On(date) => date.to_string(),
        };
        println!(
            "{:>3} [{}] {:<40} due={:<10} priority={:<8} category={:<10} color={}",
            row.task.id,
            if row.task.completed { "x" } else { " " },
            row.task.title,
            due,
            row.priority.as_ref().map_or("-", |p| p.title.as_str()),
            row.category.as_ref().map_or("-", |c| c.title.as_str()),
            display_color(row)
        );
    }

    if let Some(path) = config.db_path.as_ref() {
        service.save_snapshot(path).await?;
        println!("snapshot saved path={}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};
    use taskdesk_core::{SortColumn, SortDirection};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_build_query_sort_and_page() {
        let cli = Cli::try_parse_from([
            "taskdesk",
            "--title",
            "milk",
            "--completed",
            "false",
            "--sort",
            "Priority",
            "--desc",
            "--page",
            "3",
        ])
        .unwrap();

        let sort = cli.sort().unwrap();
        assert_eq!(sort.column, SortColumn::Priority);
        assert_eq!(sort.direction, SortDirection::Desc);
        assert_eq!(cli.page_index(), 2);
        assert_eq!(cli.title.as_deref(), Some("milk"));
        assert_eq!(cli.completed, Some(false));
    }

    #[test]
    fn defaults_to_first_unsorted_page() {
        let cli = Cli::try_parse_from(["taskdesk"]).unwrap();
        assert!(cli.sort().is_none());
        assert_eq!(cli.page_index(), 0);
        assert!(cli.query().is_empty());
    }

    #[test]
    fn help_is_not_mistaken_for_a_config_path() {
        let err = Cli::try_parse_from(["taskdesk", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn bad_values_are_rejected_at_parse_time() {
        for args in [
            vec!["taskdesk", "--sort", "colour"],
            vec!["taskdesk", "--page", "0"],
            vec!["taskdesk", "--desc"],
        ] {
            assert!(Cli::try_parse_from(args).is_err());
        }
    }
}
