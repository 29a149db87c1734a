use clap::{Parser, Subcommand};

use flowdesk::aggregator::{Aggregator, MEETING_PAGE_SIZE, UNASSIGNED_PHASE};
use flowdesk::api::customers::CustomerInput;
use flowdesk::api::documents::{upload_batch, DocumentUpload};
use flowdesk::api::meetings::MeetingInput;
use flowdesk::api::notifications::NotificationInput;
use flowdesk::api::projects::ProjectInput;
use flowdesk::api::token_store::StoredToken;
use flowdesk::api::{crew::CrewInput, phases::PhaseUpdate, tasks::TaskInput};
use flowdesk::session::SessionError;
use flowdesk::types::Customer;
use flowdesk::{ApiClient, ApiError, AppConfig, CustomerStore};

#[derive(Parser)]
#[command(name = "flowdesk")]
#[command(about = "Admin console for the FlowDesk furniture-sourcing service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        /// Password; falls back to FLOWDESK_PASSWORD
        #[arg(long)]
        password: Option<String>,
    },
    /// Invalidate the session server-side and forget the stored token
    Logout,
    /// Show the currently authenticated admin
    Whoami,
    /// Customer management and selection
    #[command(subcommand)]
    Customers(CustomersCommand),
    /// Per-project summaries for the selected customer
    Dashboard,
    /// Projects of the selected customer
    #[command(subcommand)]
    Projects(ProjectsCommand),
    /// Phases within a project
    #[command(subcommand)]
    Phases(PhasesCommand),
    /// Tasks within a phase
    #[command(subcommand)]
    Tasks(TasksCommand),
    /// Documents, grouped by phase
    #[command(subcommand)]
    Documents(DocumentsCommand),
    /// Meetings across the selected customer's projects
    #[command(subcommand)]
    Meetings(MeetingsCommand),
    /// Keyword search across projects, documents, and meetings
    Search {
        query: String,
    },
    /// Notifications for the selected customer
    #[command(subcommand)]
    Notifications(NotificationsCommand),
    /// Crew contacts on a phase
    #[command(subcommand)]
    Crew(CrewCommand),
}

#[derive(Subcommand)]
enum CustomersCommand {
    /// List customers, optionally filtered by a search term
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one customer
    Show { id: String },
    /// Select the customer all scoped commands operate on
    Select { id: String },
    /// Print the current selection
    Current,
    /// Clear the selection
    Clear,
    /// Create a customer
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        city: Option<String>,
    },
    /// Update fields of a customer; omitted flags are left unchanged
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a customer
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Set a customer's portal password
    SetPassword {
        id: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum ProjectsCommand {
    List,
    Show {
        id: String,
    },
    /// Create a project for the selected customer
    Create {
        #[arg(long = "type")]
        project_type: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        budget: Option<f64>,
        #[arg(long)]
        location: Option<String>,
    },
    Update {
        id: String,
        #[arg(long = "type")]
        project_type: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        budget: Option<f64>,
        #[arg(long)]
        location: Option<String>,
    },
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PhasesCommand {
    List {
        project_id: String,
    },
    /// Update a phase's status fields
    Update {
        id: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        payment_status: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
}

#[derive(Subcommand)]
enum TasksCommand {
    List {
        phase_id: String,
        #[arg(long)]
        status: Option<String>,
    },
    Create {
        phase_id: String,
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        task_type: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        task_type: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        required: Option<bool>,
    },
    /// Move a task through its status workflow
    SetStatus {
        id: String,
        status: String,
    },
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DocumentsCommand {
    /// The selected customer's documents, grouped by phase
    List,
    /// Upload one or more files to a phase, sequentially
    Upload {
        #[arg(long)]
        project: String,
        #[arg(long)]
        phase: String,
        #[arg(required = true)]
        files: Vec<std::path::PathBuf>,
    },
    /// Print a time-limited download link
    Download { id: String },
    /// Approve or reject a document
    Review {
        id: String,
        #[arg(long)]
        status: String,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum MeetingsCommand {
    /// Combined meeting list across the selected customer's projects
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        project: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        phase: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Attach an existing document to a meeting
    LinkDoc {
        meeting_id: String,
        document_id: String,
    },
    UnlinkDoc {
        meeting_id: String,
        document_id: String,
    },
}

#[derive(Subcommand)]
enum NotificationsCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },
    /// Send a notification to the selected customer
    Create {
        #[arg(long)]
        message: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        channel: Option<String>,
        #[arg(long)]
        phase: Option<String>,
    },
    MarkRead { id: String },
    MarkAllRead,
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Delete every notification belonging to the selected customer
    Purge {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CrewCommand {
    /// List crew on a phase, or on every phase of a project
    List {
        #[arg(long, conflicts_with = "project")]
        phase: Option<String>,
        #[arg(long)]
        project: Option<String>,
    },
    Add {
        phase_id: String,
        #[arg(long)]
        name: String,
        /// Repeat for multiple roles
        #[arg(long = "role", required = true)]
        roles: Vec<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "role")]
        roles: Vec<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("{0}")]
    Upload(#[from] flowdesk::api::documents::UploadBatchError),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        match &err {
            CliError::Api(ApiError::NotAuthenticated) => {
                eprintln!("Not signed in. Run `flowdesk login --email <email>` first.");
            }
            other => eprintln!("error: {other}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::load();
    let client = ApiClient::new(&config)?;
    let customers = CustomerStore::new();

    match cli.command {
        Command::Login { email, password } => {
            let password = password
                .or_else(|| std::env::var("FLOWDESK_PASSWORD").ok())
                .ok_or_else(|| {
                    CliError::Usage("pass --password or set FLOWDESK_PASSWORD".to_string())
                })?;
            let login = client.login(&email, &password).await?;
            client
                .token_store()
                .save(&StoredToken::new(login.token, Some(login.user.clone())))?;
            println!("Signed in as {} <{}>", login.user.name, login.user.email);
        }
        Command::Logout => {
            // Best effort server-side; the local token goes away regardless.
            if let Err(err) = client.logout().await {
                log::warn!("server logout failed: {err}");
            }
            client.token_store().clear()?;
            customers.clear()?;
            println!("Signed out.");
        }
        Command::Whoami => {
            let admin = client.me().await?;
            println!("{} <{}>", admin.name, admin.email);
        }
        Command::Customers(cmd) => run_customers(&client, &customers, cmd).await?,
        Command::Dashboard => {
            let customer = customers.load()?;
            let agg = Aggregator::new(&client);
            let overviews = agg.overview(&customer.id).await?;
            println!("Dashboard for {} ({} project(s))", customer.name, overviews.len());
            for view in &overviews {
                let kind = view.project.project_type.as_deref().unwrap_or("project");
                let status = view.project.status.as_deref().unwrap_or("-");
                println!("\n{kind} [{status}] {}% complete", view.completion_percentage);
                match &view.current_phase {
                    Some(phase) => println!("  current phase: {}", phase.display_name()),
                    None => println!("  no phases yet"),
                }
                println!(
                    "  {} phase(s) in progress, {} open task(s), {} meeting(s)",
                    view.ongoing_phases.len(),
                    view.ongoing_tasks.len(),
                    view.meetings.len()
                );
            }
        }
        Command::Projects(cmd) => run_projects(&client, &customers, cmd).await?,
        Command::Phases(cmd) => run_phases(&client, cmd).await?,
        Command::Tasks(cmd) => run_tasks(&client, cmd).await?,
        Command::Documents(cmd) => run_documents(&client, &customers, cmd).await?,
        Command::Meetings(cmd) => run_meetings(&client, &customers, cmd).await?,
        Command::Search { query } => {
            let customer = customers.load()?;
            let agg = Aggregator::new(&client);
            let results = agg.search(&customer.id, &query).await?;
            println!("{} hit(s) for \"{query}\"", results.total());
            for project in &results.projects {
                println!(
                    "project   {}  {}",
                    project.id,
                    project.project_type.as_deref().unwrap_or("-")
                );
            }
            for document in &results.documents {
                println!(
                    "document  {}  {}",
                    document.id,
                    document
                        .document_name
                        .as_deref()
                        .or(document.file_name.as_deref())
                        .unwrap_or("-")
                );
            }
            for meeting in &results.meetings {
                println!(
                    "meeting   {}  {}",
                    meeting.id,
                    meeting.title.as_deref().unwrap_or("(untitled)")
                );
            }
        }
        Command::Notifications(cmd) => run_notifications(&client, &customers, cmd).await?,
        Command::Crew(cmd) => run_crew(&client, cmd).await?,
    }

    Ok(())
}

async fn run_customers(
    client: &ApiClient,
    store: &CustomerStore,
    cmd: CustomersCommand,
) -> Result<(), CliError> {
    match cmd {
        CustomersCommand::List { page, limit, search } => {
            let result = client.list_customers(page, limit, &search).await?;
            if let Some(pagination) = &result.pagination {
                println!("page {} ({} total)", pagination.page, pagination.total);
            }
            for customer in &result.customers {
                print_customer(customer);
            }
        }
        CustomersCommand::Show { id } => {
            let customer = client.get_customer(&id).await?;
            print_customer(&customer);
            if let Some(city) = &customer.city {
                println!("  city: {city}");
            }
            if let Some(phone) = &customer.phone {
                println!("  phone: {phone}");
            }
        }
        CustomersCommand::Select { id } => {
            // Fetch first so a typo'd id cannot be selected.
            let customer = client.get_customer(&id).await?;
            store.select(&customer)?;
            println!("Selected {} ({})", customer.name, customer.id);
        }
        CustomersCommand::Current => {
            let customer = store.load()?;
            print_customer(&customer);
        }
        CustomersCommand::Clear => {
            store.clear()?;
            println!("Selection cleared.");
        }
        CustomersCommand::Create { name, email, phone, city } => {
            let customer = client
                .create_customer(&CustomerInput {
                    name: Some(name),
                    email: Some(email),
                    phone,
                    city,
                    ..CustomerInput::default()
                })
                .await?;
            println!("Created {}", customer.id);
        }
        CustomersCommand::Update { id, name, email, phone, city, active } => {
            client
                .update_customer(
                    &id,
                    &CustomerInput {
                        name,
                        email,
                        phone,
                        city,
                        is_active: active,
                        ..CustomerInput::default()
                    },
                )
                .await?;
            println!("Updated {id}");
        }
        CustomersCommand::Delete { id, yes } => {
            confirm(yes, "customer")?;
            client.delete_customer(&id).await?;
            println!("Deleted {id}");
        }
        CustomersCommand::SetPassword { id, password } => {
            client.set_customer_password(&id, &password).await?;
            println!("Password updated for {id}");
        }
    }
    Ok(())
}

async fn run_projects(
    client: &ApiClient,
    store: &CustomerStore,
    cmd: ProjectsCommand,
) -> Result<(), CliError> {
    match cmd {
        ProjectsCommand::List => {
            let customer = store.load()?;
            let agg = Aggregator::new(client);
            let projects = agg.customer_projects(&customer.id).await?;
            println!("{} project(s) for {}", projects.len(), customer.name);
            for project in &projects {
                println!(
                    "{}  {}  [{}]",
                    project.id,
                    project.project_type.as_deref().unwrap_or("-"),
                    project.status.as_deref().unwrap_or("-")
                );
            }
        }
        ProjectsCommand::Show { id } => {
            let project = client.get_project(&id).await?;
            println!(
                "{}  {}  [{}]",
                project.id,
                project.project_type.as_deref().unwrap_or("-"),
                project.status.as_deref().unwrap_or("-")
            );
            if let Some(description) = &project.project_description {
                println!("  {description}");
            }
            if let Some(location) = &project.location {
                println!("  location: {location}");
            }
            if let Some(budget) = project.budget {
                println!("  budget: {budget}");
            }
        }
        ProjectsCommand::Create { project_type, description, budget, location } => {
            let customer = store.load()?;
            let project = client
                .create_project(&ProjectInput {
                    customer_id: Some(customer.id),
                    project_type: Some(project_type),
                    project_description: description,
                    budget,
                    location,
                    ..ProjectInput::default()
                })
                .await?;
            println!("Created project {}", project.id);
        }
        ProjectsCommand::Update { id, project_type, description, status, budget, location } => {
            client
                .update_project(
                    &id,
                    &ProjectInput {
                        project_type,
                        project_description: description,
                        status,
                        budget,
                        location,
                        ..ProjectInput::default()
                    },
                )
                .await?;
            println!("Updated {id}");
        }
        ProjectsCommand::Delete { id, yes } => {
            confirm(yes, "project")?;
            client.delete_project(&id).await?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}

async fn run_phases(client: &ApiClient, cmd: PhasesCommand) -> Result<(), CliError> {
    match cmd {
        PhasesCommand::List { project_id } => {
            let phases = client.list_phases(&project_id).await?;
            for phase in &phases {
                println!(
                    "{}  #{} {}  {:?}",
                    phase.id,
                    phase.order,
                    phase.display_name(),
                    phase.status
                );
            }
        }
        PhasesCommand::Update { id, status, payment_status, completed } => {
            client
                .update_phase(
                    &id,
                    &PhaseUpdate {
                        status,
                        payment_status,
                        is_completed: completed,
                    },
                )
                .await?;
            println!("Updated {id}");
        }
    }
    Ok(())
}

async fn run_tasks(client: &ApiClient, cmd: TasksCommand) -> Result<(), CliError> {
    match cmd {
        TasksCommand::List { phase_id, status } => {
            let tasks = client.list_tasks(&phase_id, status.as_deref(), None).await?;
            for task in &tasks {
                println!(
                    "{}  {}  {:?}  due {}",
                    task.id,
                    task.name,
                    task.status,
                    fmt_date(task.due_date.as_deref())
                );
            }
        }
        TasksCommand::Create { phase_id, name, task_type, due } => {
            let task = client
                .create_task(
                    &phase_id,
                    &TaskInput {
                        name: Some(name),
                        task_type,
                        due_date: due,
                        ..TaskInput::default()
                    },
                )
                .await?;
            println!("Created task {}", task.id);
        }
        TasksCommand::Update { id, name, task_type, due, required } => {
            client
                .update_task(
                    &id,
                    &TaskInput {
                        name,
                        task_type,
                        due_date: due,
                        required,
                        ..TaskInput::default()
                    },
                )
                .await?;
            println!("Updated {id}");
        }
        TasksCommand::SetStatus { id, status } => {
            client.update_task_status(&id, &status).await?;
            println!("{id} -> {status}");
        }
        TasksCommand::Delete { id, yes } => {
            confirm(yes, "task")?;
            client.delete_task(&id).await?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}

async fn run_documents(
    client: &ApiClient,
    store: &CustomerStore,
    cmd: DocumentsCommand,
) -> Result<(), CliError> {
    match cmd {
        DocumentsCommand::List => {
            let customer = store.load()?;
            let agg = Aggregator::new(client);
            let library = agg.document_library(&customer.id).await?;
            println!(
                "{} document(s) across {} project(s)",
                library.total_documents(),
                library.projects.len()
            );
            for tagged in &library.phases {
                if let Some(documents) = library.by_phase.get(&tagged.phase.id) {
                    println!("\n{}", tagged.phase.display_name());
                    for doc in documents {
                        print_document(&doc.document);
                    }
                }
            }
            if let Some(unassigned) = library.by_phase.get(UNASSIGNED_PHASE) {
                println!("\nUnassigned");
                for doc in unassigned {
                    print_document(&doc.document);
                }
            }
        }
        DocumentsCommand::Upload { project, phase, files } => {
            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| CliError::Usage(format!("not a file: {}", path.display())))?;
                uploads.push(DocumentUpload {
                    file_name,
                    bytes: std::fs::read(path)?,
                    project_id: project.clone(),
                    phase_id: phase.clone(),
                });
            }
            let uploaded = upload_batch(client, &uploads, |current, total| {
                println!("uploading {current}/{total}...");
            })
            .await?;
            println!("Uploaded {} file(s).", uploaded.len());
        }
        DocumentsCommand::Download { id } => {
            let url = client.document_download_url(&id).await?;
            println!("{url}");
        }
        DocumentsCommand::Review { id, status, notes } => {
            client.review_document(&id, &status, notes.as_deref()).await?;
            println!("{id} -> {status}");
        }
        DocumentsCommand::Delete { id, yes } => {
            confirm(yes, "document")?;
            client.delete_document(&id).await?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}

async fn run_meetings(
    client: &ApiClient,
    store: &CustomerStore,
    cmd: MeetingsCommand,
) -> Result<(), CliError> {
    match cmd {
        MeetingsCommand::List { page } => {
            let customer = store.load()?;
            let agg = Aggregator::new(client);
            let board = agg.meeting_board(&customer.id, page).await?;
            println!(
                "page {page} of {} ({} meeting(s) total, page size {})",
                board.total_pages, board.combined_total, MEETING_PAGE_SIZE
            );
            for tagged in &board.meetings {
                println!(
                    "{}  {}  {}",
                    fmt_date(tagged.meeting.meeting_date.as_deref()),
                    tagged.meeting.title.as_deref().unwrap_or("(untitled)"),
                    tagged.project_type.as_deref().unwrap_or("-")
                );
            }
        }
        MeetingsCommand::Show { id } => {
            let meeting = client.get_meeting(&id).await?;
            println!(
                "{}  {}",
                fmt_date(meeting.meeting_date.as_deref()),
                meeting.title.as_deref().unwrap_or("(untitled)")
            );
            if let Some(summary) = &meeting.summary {
                println!("  {summary}");
            }
            for attendee in &meeting.attendees {
                println!("  attendee: {}", attendee.name);
            }
            for item in &meeting.action_items {
                let mark = if item.completed { "x" } else { " " };
                println!("  [{mark}] {}", item.text);
            }
        }
        MeetingsCommand::Create { project, title, description, date, phase } => {
            let meeting = client
                .create_meeting(&MeetingInput {
                    project_id: Some(project),
                    phase_id: phase,
                    title: Some(title),
                    description,
                    meeting_date: date,
                    ..MeetingInput::default()
                })
                .await?;
            println!("Created meeting {}", meeting.id);
        }
        MeetingsCommand::Update { id, title, description, summary, date } => {
            client
                .update_meeting(
                    &id,
                    &MeetingInput {
                        title,
                        description,
                        summary,
                        meeting_date: date,
                        ..MeetingInput::default()
                    },
                )
                .await?;
            println!("Updated {id}");
        }
        MeetingsCommand::Delete { id, yes } => {
            confirm(yes, "meeting")?;
            client.delete_meeting(&id).await?;
            println!("Deleted {id}");
        }
        MeetingsCommand::LinkDoc { meeting_id, document_id } => {
            client.link_meeting_document(&meeting_id, &document_id).await?;
            println!("Linked {document_id} to {meeting_id}");
        }
        MeetingsCommand::UnlinkDoc { meeting_id, document_id } => {
            client.unlink_meeting_document(&meeting_id, &document_id).await?;
            println!("Unlinked {document_id} from {meeting_id}");
        }
    }
    Ok(())
}

async fn run_notifications(
    client: &ApiClient,
    store: &CustomerStore,
    cmd: NotificationsCommand,
) -> Result<(), CliError> {
    match cmd {
        NotificationsCommand::List { page, unread } => {
            let customer = store.load()?;
            let read = if unread { Some(false) } else { None };
            let result = client
                .list_notifications(Some(&customer.id), page, 20, read)
                .await?;
            for notification in &result.notifications {
                let marker = if notification.read { " " } else { "*" };
                println!(
                    "{marker} {}  {}  {}",
                    notification.id,
                    fmt_date(notification.created_at.as_deref()),
                    notification.message
                );
            }
        }
        NotificationsCommand::Create { message, title, priority, channel, phase } => {
            let customer = store.load()?;
            let notification = client
                .create_notification(&NotificationInput {
                    customer_id: Some(customer.id),
                    channel,
                    title,
                    message: Some(message),
                    priority,
                    phase_id: phase,
                })
                .await?;
            println!("Sent notification {}", notification.id);
        }
        NotificationsCommand::MarkRead { id } => {
            client.mark_notification_read(&id).await?;
            println!("Marked {id} read");
        }
        NotificationsCommand::MarkAllRead => {
            let customer = store.load()?;
            client.mark_all_notifications_read(Some(&customer.id)).await?;
            println!("All notifications marked read for {}", customer.name);
        }
        NotificationsCommand::Delete { id, yes } => {
            confirm(yes, "notification")?;
            client.delete_notification(&id).await?;
            println!("Deleted {id}");
        }
        NotificationsCommand::Purge { yes } => {
            confirm(yes, "customer's notifications")?;
            let customer = store.load()?;
            client.delete_customer_notifications(&customer.id).await?;
            println!("Purged notifications for {}", customer.name);
        }
    }
    Ok(())
}

async fn run_crew(client: &ApiClient, cmd: CrewCommand) -> Result<(), CliError> {
    match cmd {
        CrewCommand::List { phase, project } => {
            let crew = match (phase, project) {
                (Some(phase_id), None) => client.list_phase_crew(&phase_id).await?,
                (None, Some(project_id)) => client.list_project_crew(&project_id).await?,
                _ => {
                    return Err(CliError::Usage(
                        "pass exactly one of --phase or --project".to_string(),
                    ))
                }
            };
            for member in &crew {
                println!(
                    "{}  {}  {}",
                    member.id,
                    member.contact_name,
                    member.contact_role.as_list().join(", ")
                );
            }
        }
        CrewCommand::Add { phase_id, name, roles, phone, email } => {
            let member = client
                .add_crew_member(
                    &phase_id,
                    &CrewInput {
                        contact_name: Some(name),
                        contact_role: roles,
                        contact_phone: phone,
                        contact_email: email,
                    },
                )
                .await?;
            println!("Added {} ({})", member.contact_name, member.id);
        }
        CrewCommand::Update { id, name, roles, phone, email } => {
            client
                .update_crew_member(
                    &id,
                    &CrewInput {
                        contact_name: name,
                        contact_role: roles,
                        contact_phone: phone,
                        contact_email: email,
                    },
                )
                .await?;
            println!("Updated {id}");
        }
        CrewCommand::Delete { id, yes } => {
            confirm(yes, "crew member")?;
            client.delete_crew_member(&id).await?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}

fn confirm(yes: bool, what: &str) -> Result<(), CliError> {
    if yes {
        Ok(())
    } else {
        Err(CliError::Usage(format!(
            "deleting a {what} is permanent; re-run with --yes to confirm"
        )))
    }
}

fn print_customer(customer: &Customer) {
    let active = if customer.is_active { "active" } else { "inactive" };
    println!("{}  {}  <{}>  [{active}]", customer.id, customer.name, customer.email);
}

fn print_document(document: &flowdesk::types::Document) {
    println!(
        "  {}  {}  [{}]",
        document.id,
        document
            .document_name
            .as_deref()
            .or(document.file_name.as_deref())
            .unwrap_or("-"),
        document.status.as_deref().unwrap_or("-")
    );
}

/// Render an ISO timestamp as a plain date; pass anything unparseable through.
fn fmt_date(value: Option<&str>) -> String {
    match value {
        Some(raw) => match chrono::DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
            Err(_) => raw.to_string(),
        },
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_every_resource_exposes_its_mutations() {
        // One parse per mutation verb, so a library endpoint cannot silently
        // lose its subcommand again.
        let cases: &[&[&str]] = &[
            &["flowdesk", "customers", "update", "c1", "--city", "Pune"],
            &["flowdesk", "projects", "create", "--type", "villa"],
            &["flowdesk", "projects", "update", "p1", "--status", "active"],
            &["flowdesk", "projects", "delete", "p1", "--yes"],
            &["flowdesk", "phases", "update", "ph1", "--status", "completed"],
            &["flowdesk", "tasks", "update", "t1", "--name", "order teak"],
            &["flowdesk", "meetings", "create", "--project", "p1", "--title", "kickoff"],
            &["flowdesk", "meetings", "update", "m1", "--summary", "done"],
            &["flowdesk", "meetings", "delete", "m1", "--yes"],
            &["flowdesk", "meetings", "link-doc", "m1", "d1"],
            &["flowdesk", "meetings", "unlink-doc", "m1", "d1"],
            &["flowdesk", "notifications", "create", "--message", "order shipped"],
            &["flowdesk", "notifications", "delete", "n1", "--yes"],
            &["flowdesk", "notifications", "purge", "--yes"],
            &["flowdesk", "crew", "list", "--project", "p1"],
            &["flowdesk", "crew", "update", "cr1", "--role", "foreman"],
        ];
        for case in cases {
            assert!(
                Cli::try_parse_from(case.iter().copied()).is_ok(),
                "failed to parse: {case:?}"
            );
        }
    }

    #[test]
    fn test_crew_list_scopes_conflict() {
        assert!(Cli::try_parse_from([
            "flowdesk", "crew", "list", "--phase", "ph1", "--project", "p1",
        ])
        .is_err());
    }
}
