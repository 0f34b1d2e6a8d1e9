//! # taskboard
//!
//! Command-line client for the task service. Cookies live only in memory,
//! so every command that touches the service logs in first.

#![deny(unsafe_code)]

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use taskboard::{App, Board};
use taskboard_core::{Priority, ProjectId, Task, TaskId, TaskStatus};
use taskboard_mutation::{Confirmation, DeleteOutcome, MutationPipeline, SubmitError, TaskDraft};
use taskboard_session::REGISTERED_MESSAGE;
use taskboard_settings::{ThemePreference, TaskboardSettings};

/// Taskboard command-line client.
#[derive(Parser, Debug)]
#[command(name = "taskboard", about = "Taskboard command-line client")]
struct Cli {
    /// Service base URL (overrides settings).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Settings file (default: ~/.taskboard/settings.json).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log filter directive (overrides settings).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(flatten)]
    credentials: Credentials,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Credentials {
    /// Account email.
    #[arg(long, global = true, env = "TASKBOARD_EMAIL")]
    email: Option<String>,

    /// Account password.
    #[arg(long, global = true, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl Credentials {
    fn require(&self) -> Result<(&str, &str)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Ok((email.as_str(), password.as_str())),
            _ => bail!("missing credentials: pass --email/--password or set TASKBOARD_EMAIL/TASKBOARD_PASSWORD"),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check credentials and show the logged-in user.
    Login,
    /// Create an account.
    Register {
        /// Display name.
        #[arg(long)]
        name: String,
    },
    /// Show the Kanban board.
    Board {
        /// Project to show (default: first project).
        #[arg(long)]
        project: Option<ProjectId>,
    },
    /// Task mutations.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Project mutations.
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Dark mode preference.
    #[command(subcommand)]
    Theme(ThemeCommand),
}

#[derive(Args, Debug)]
struct TaskFields {
    /// Title.
    #[arg(long)]
    title: Option<String>,
    /// Description.
    #[arg(long)]
    description: Option<String>,
    /// Status (pending, in_progress, completed).
    #[arg(long)]
    status: Option<TaskStatus>,
    /// Priority (Low, Normal, High).
    #[arg(long)]
    priority: Option<Priority>,
    /// Assignee user ID.
    #[arg(long)]
    user: Option<String>,
    /// Project ID.
    #[arg(long)]
    project: Option<String>,
    /// Due date (YYYY-MM-DD, empty to clear).
    #[arg(long)]
    due: Option<String>,
}

impl TaskFields {
    fn apply(self, draft: &mut TaskDraft) {
        if let Some(v) = self.title {
            draft.title = v;
        }
        if let Some(v) = self.description {
            draft.description = v;
        }
        if let Some(v) = self.status {
            draft.status = v;
        }
        if let Some(v) = self.priority {
            draft.priority = v;
        }
        if let Some(v) = self.user {
            draft.user_id = v;
        }
        if let Some(v) = self.project {
            draft.project_id = v;
        }
        if let Some(v) = self.due {
            draft.due_date = v;
        }
    }
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// Create a task.
    Create(TaskFields),
    /// Edit a task; unset fields keep their value.
    Update {
        /// Task ID.
        id: TaskId,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Move a task to another column.
    Move {
        /// Task ID.
        id: TaskId,
        /// Target status.
        status: TaskStatus,
    },
    /// Delete a task.
    Delete {
        /// Task ID.
        id: TaskId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    /// Create a project owned by the logged-in user.
    Create {
        /// Project name.
        name: String,
    },
    /// Delete a project.
    Delete {
        /// Project ID.
        id: ProjectId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ThemeCommand {
    /// Print the current preference.
    Show,
    /// Flip between light and dark.
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(taskboard_settings::settings_path);
    let mut settings = taskboard_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    if let Some(url) = cli.api_url {
        settings.api.base_url = url;
    }
    taskboard_core::logging::init_subscriber(
        cli.log_level.as_deref().unwrap_or(&settings.logging.level),
    );

    match cli.command {
        Command::Theme(cmd) => run_theme(cmd, &settings),
        Command::Register { name } => {
            let (email, password) = cli.credentials.require()?;
            let app = App::from_settings(&settings)?;
            app.gate()
                .register(&name, email, password)
                .await
                .map_err(|e| anyhow!(e.message))?;
            println!("{REGISTERED_MESSAGE}");
            Ok(())
        }
        command => {
            let (email, password) = cli.credentials.require()?;
            let app = App::from_settings(&settings)?;
            let _ = app
                .gate()
                .login(email, password)
                .await
                .map_err(|e| anyhow!(e.message))?;
            let result = run_authenticated(&app, command).await;
            app.gate().logout().await;
            result
        }
    }
}

async fn run_authenticated(app: &App, command: Command) -> Result<()> {
    let store = app.store();
    let _ = store.load().await.context("Failed to load board")?;
    let pipeline = app.pipeline();

    match command {
        Command::Login => {
            if let Some(user) = app.gate().user() {
                println!("Logged in as {} <{}>", user.name, user.email);
            }
        }
        Command::Board { project } => {
            if let Some(id) = project {
                let found = store.with_snapshot(|s| s.project(id).cloned());
                let Some(found) = found else {
                    bail!("Project {id} not found");
                };
                let _ = store.select_project(&found);
            }
            print!("{}", Board::project(&store.snapshot()));
        }
        Command::Task(cmd) => run_task(pipeline, cmd).await?,
        Command::Project(cmd) => run_project(app, cmd).await?,
        Command::Register { .. } | Command::Theme(_) => {}
    }
    Ok(())
}

async fn run_task(pipeline: &MutationPipeline, cmd: TaskCommand) -> Result<()> {
    let store = pipeline.store();
    match cmd {
        TaskCommand::Create(fields) => {
            let mut draft = store.with_snapshot(|s| {
                let mut draft = TaskDraft::blank(&s.projects);
                if let Some(active) = &s.active_project {
                    draft.project_id = active.id.to_string();
                }
                draft
            });
            fields.apply(&mut draft);
            let created = pipeline.submit(&draft, None).await.map_err(submit_error)?;
            match created {
                Some(task) => println!("Created task #{}", task.id),
                None => println!("Task created"),
            }
        }
        TaskCommand::Update { id, fields } => {
            let task = find_task(pipeline, id)?;
            let mut draft = TaskDraft::from_task(&task);
            fields.apply(&mut draft);
            let _ = pipeline.submit(&draft, Some(&task)).await.map_err(submit_error)?;
            println!("Updated task #{id}");
        }
        TaskCommand::Move { id, status } => {
            let task = find_task(pipeline, id)?;
            let _ = pipeline.move_task(&task, status).await.map_err(submit_error)?;
            println!("Moved task #{id} to {}", status.label());
        }
        TaskCommand::Delete { id, yes } => {
            let task = find_task(pipeline, id)?;
            let confirmation = confirm(&MutationPipeline::delete_prompt(&task), yes)?;
            match pipeline.delete(&task, confirmation).await.map_err(submit_error)? {
                DeleteOutcome::Deleted => println!("Deleted task #{id}"),
                DeleteOutcome::Cancelled => println!("Cancelled"),
            }
        }
    }
    Ok(())
}

async fn run_project(app: &App, cmd: ProjectCommand) -> Result<()> {
    let pipeline = app.pipeline();
    match cmd {
        ProjectCommand::Create { name } => {
            let owner = app.gate().user().context("not logged in")?;
            let project = pipeline
                .create_project(&name, owner.id)
                .await
                .map_err(submit_error)?;
            match project {
                Some(project) => println!("Created project #{} {}", project.id, project.name),
                None => println!("Project created"),
            }
        }
        ProjectCommand::Delete { id, yes } => {
            let project = app
                .store()
                .with_snapshot(|s| s.project(id).cloned())
                .with_context(|| format!("Project {id} not found"))?;
            let prompt = format!("Are you sure you want to delete project \"{}\"?", project.name);
            let confirmation = confirm(&prompt, yes)?;
            match pipeline
                .delete_project(&project, confirmation)
                .await
                .map_err(submit_error)?
            {
                DeleteOutcome::Deleted => println!("Deleted project #{id}"),
                DeleteOutcome::Cancelled => println!("Cancelled"),
            }
        }
    }
    Ok(())
}

fn run_theme(cmd: ThemeCommand, settings: &TaskboardSettings) -> Result<()> {
    let mut theme = ThemePreference::load(taskboard_settings::preferences_path(), settings.ui.dark_mode);
    let dark = match cmd {
        ThemeCommand::Show => theme.is_dark(),
        ThemeCommand::Toggle => theme.toggle().context("Failed to save theme preference")?,
    };
    println!("{}", if dark { "dark" } else { "light" });
    Ok(())
}

fn find_task(pipeline: &MutationPipeline, id: TaskId) -> Result<Task> {
    pipeline
        .store()
        .with_snapshot(|s| s.task(id).cloned())
        .with_context(|| format!("Task {id} not found"))
}

fn confirm(prompt: &str, assume_yes: bool) -> Result<Confirmation> {
    if assume_yes {
        return Ok(Confirmation::Confirmed);
    }
    let mut stdout = std::io::stdout();
    write!(stdout, "{prompt} [y/N] ")?;
    stdout.flush()?;
    let mut answer = String::new();
    let _ = std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes").into())
}

fn submit_error(err: SubmitError) -> anyhow::Error {
    if let Some(report) = err.report() {
        for (field, message) in report.errors() {
            eprintln!("  {field}: {message}");
        }
    }
    anyhow!(err.message())
}
