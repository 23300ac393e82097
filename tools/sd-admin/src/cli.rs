//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// sd-admin: StaffDesk admin console
#[derive(Parser, Debug)]
#[command(name = "sd-admin", version)]
#[command(about = "Manage StaffDesk accounts, employees, skills and projects")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Backend base URL (overrides SD_API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory holding the session file
    #[arg(long, global = true, env = "SD_DATA_DIR", default_value = ".staffdesk")]
    pub data_dir: PathBuf,

    /// Print records as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Log filter (overrides SD_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in and persist the access token
    Login(LoginArgs),
    /// Forget the access token
    Logout,
    /// Show the claims of the persisted token
    Whoami,
    /// Generate a new password for an account and mail it
    ResetPassword {
        email: String,
    },
    #[command(subcommand)]
    Accounts(AccountsCommand),
    #[command(subcommand)]
    Employees(EmployeesCommand),
    #[command(subcommand)]
    Positions(CatalogueCommand),
    #[command(subcommand)]
    Skills(CatalogueCommand),
    #[command(subcommand)]
    Projects(ProjectsCommand),
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account email
    #[arg(long, required_unless_present = "saved")]
    pub email: Option<String>,

    /// Account password
    #[arg(long, required_unless_present = "saved")]
    pub password: Option<String>,

    /// Keep the credentials (password encrypted) for `login --saved`
    #[arg(long)]
    pub remember: bool,

    /// Log in with remembered credentials
    #[arg(long, conflicts_with_all = ["email", "password"])]
    pub saved: bool,
}

/// JSON body of a create or update.
#[derive(Args, Debug, Clone)]
pub struct PatchArg {
    /// Fields as a JSON object, e.g. '{"status":"Inactive"}'
    #[arg(long = "data", value_name = "JSON")]
    pub data: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AccountsCommand {
    List,
    /// Employees that have no account yet
    WithoutAccount,
    Add(PatchArg),
    Update {
        id: String,
        #[command(flatten)]
        patch: PatchArg,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum EmployeesCommand {
    List,
    /// Positions offered on employee forms
    Positions,
    Add(PatchArg),
    Update {
        id: String,
        #[command(flatten)]
        patch: PatchArg,
    },
    Delete {
        id: String,
    },
}

/// Positions and skills share the same verbs.
#[derive(Subcommand, Debug, Clone)]
pub enum CatalogueCommand {
    List,
    Add(PatchArg),
    Update {
        id: String,
        #[command(flatten)]
        patch: PatchArg,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProjectsCommand {
    List {
        /// Only projects of this account
        #[arg(long, conflicts_with = "employee")]
        account: Option<String>,
        /// Only projects of this employee
        #[arg(long)]
        employee: Option<String>,
        /// Include soft-deleted projects
        #[arg(long)]
        all: bool,
    },
    Show {
        id: String,
    },
    /// Accounts assigned to a project
    Members {
        id: String,
    },
    Add(PatchArg),
    /// Update a project; membership changes are mailed
    Update {
        id: String,
        #[command(flatten)]
        patch: PatchArg,
    },
    Delete {
        id: String,
    },
    Restore {
        id: String,
    },
    /// Change the role a member holds on a project
    SetRole {
        project: String,
        #[arg(long)]
        account: String,
        #[arg(long)]
        role: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Show an account profile (defaults to the logged-in account)
    Show {
        id: Option<String>,
    },
    /// Skills offered on the profile form
    Skills,
    /// Update the employee record of the loaded profile
    UpdateEmployee {
        id: String,
        #[command(flatten)]
        patch: PatchArg,
    },
}
