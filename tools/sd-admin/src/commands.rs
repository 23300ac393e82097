//! Command handlers. Each dispatches store operations and prints the slice
//! the operation updated.

use anyhow::{anyhow, bail, Context};
use sd_store::{
    reset_password, AccountsOutcome, AssignmentNotifier, EmployeesOutcome, Operation, Outcome,
    PositionsOutcome, ProfileOutcome, ProjectsOutcome, SkillsOutcome,
};
use shared_types::{
    AccountPatch, Credentials, EmployeePatch, EntityId, Patch, PositionPatch, ProjectPatch,
    RoleAssignment, SkillPatch,
};

use crate::cli::{
    AccountsCommand, CatalogueCommand, Command, EmployeesCommand, LoginArgs, ProfileCommand,
    ProjectsCommand,
};
use crate::console::Console;
use crate::render;

pub async fn execute(console: &Console, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login(args) => login(console, args).await,
        Command::Logout => {
            console.store.logout().await?;
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => whoami(console),
        Command::ResetPassword { email } => {
            reset_password(&console.api, console.mailer.as_ref(), &email).await?;
            println!("A new password was mailed to {email}");
            Ok(())
        }
        Command::Accounts(command) => accounts(console, command).await,
        Command::Employees(command) => employees(console, command).await,
        Command::Positions(command) => positions(console, command).await,
        Command::Skills(command) => skills(console, command).await,
        Command::Projects(command) => projects(console, command).await,
        Command::Profile(command) => profile(console, command).await,
    }
}

/// Dispatch, wait, and turn a rejection into an error.
async fn run(console: &Console, operation: Operation) -> anyhow::Result<Outcome> {
    let outcome = console.store.run(operation).await??;
    Ok(outcome)
}

fn id(raw: &str) -> anyhow::Result<EntityId> {
    EntityId::parse(raw).with_context(|| format!("invalid id {raw:?}"))
}

fn print_json_or(console: &Console, value: &impl serde::Serialize, text: String) -> anyhow::Result<()> {
    if console.json {
        println!("{}", render::json(value)?);
    } else {
        print!("{text}");
    }
    Ok(())
}

/// One-line summary of a write.
pub fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Accounts(AccountsOutcome::Added(a)) => format!("Added account {}", a.id),
        Outcome::Accounts(AccountsOutcome::Updated(a)) => format!("Updated account {}", a.id),
        Outcome::Accounts(AccountsOutcome::Deleted(id)) => format!("Deleted account {id}"),
        Outcome::Employees(EmployeesOutcome::Added(e)) => format!("Added employee {}", e.id),
        Outcome::Employees(EmployeesOutcome::Updated(e)) => format!("Updated employee {}", e.id),
        Outcome::Employees(EmployeesOutcome::Deleted(id)) => format!("Deleted employee {id}"),
        Outcome::Positions(PositionsOutcome::Added(p)) => format!("Added position {}", p.id),
        Outcome::Positions(PositionsOutcome::Updated(p)) => format!("Updated position {}", p.id),
        Outcome::Positions(PositionsOutcome::Deleted(id)) => format!("Deleted position {id}"),
        Outcome::Skills(SkillsOutcome::Added(s)) => format!("Added skill {}", s.id),
        Outcome::Skills(SkillsOutcome::Updated(s)) => format!("Updated skill {}", s.id),
        Outcome::Skills(SkillsOutcome::Deleted(id)) => format!("Deleted skill {id}"),
        Outcome::Projects(ProjectsOutcome::Added(p)) => format!("Added project {}", p.id),
        Outcome::Projects(ProjectsOutcome::Updated(update)) => format!(
            "Updated project {} ({} membership change(s))",
            update.project.id,
            update.messages.len()
        ),
        Outcome::Projects(ProjectsOutcome::Flagged(p)) if p.is_deleted => {
            format!("Deleted project {}", p.id)
        }
        Outcome::Projects(ProjectsOutcome::Flagged(p)) => format!("Restored project {}", p.id),
        Outcome::Projects(ProjectsOutcome::RoleUpdated(p)) => {
            format!("Updated member role on project {}", p.id)
        }
        Outcome::Profile(ProfileOutcome::EmployeeUpdated(e)) => {
            format!("Updated profile employee {}", e.id)
        }
        _ => "Done".to_string(),
    }
}

async fn write(console: &Console, operation: Operation) -> anyhow::Result<()> {
    let outcome = run(console, operation).await?;
    println!("{}", describe(&outcome));
    Ok(())
}

// =============================================================================
// SESSION
// =============================================================================

async fn login(console: &Console, args: LoginArgs) -> anyhow::Result<()> {
    let (credentials, remember) = if args.saved {
        let vault = console
            .store
            .context()
            .remember_me
            .as_ref()
            .ok_or_else(|| anyhow!("remember-me is not available"))?;
        let saved = vault
            .recall()?
            .ok_or_else(|| anyhow!("no remembered credentials, log in with --email and --remember"))?;
        (
            Credentials {
                email: saved.email,
                password: saved.password,
            },
            true,
        )
    } else {
        let (Some(email), Some(password)) = (args.email, args.password) else {
            bail!("--email and --password are required");
        };
        (Credentials { email, password }, args.remember)
    };

    let email = credentials.email.clone();
    run(
        console,
        Operation::Login {
            credentials,
            remember,
        },
    )
    .await?;
    println!("Logged in as {email}");
    Ok(())
}

fn whoami(console: &Console) -> anyhow::Result<()> {
    let Some(claims) = console.api.current_claims()? else {
        bail!("not logged in");
    };
    if console.json {
        println!("{}", render::json(&claims)?);
        return Ok(());
    }
    let expires = claims
        .exp
        .and_then(|exp| chrono::DateTime::from_timestamp(exp as i64, 0))
        .map_or_else(|| "-".to_string(), |at| at.to_rfc3339());
    println!(
        "email:   {}\nid:      {}\nrole:    {}\nexpires: {}",
        claims.sub.as_deref().unwrap_or("-"),
        claims.id.as_deref().unwrap_or("-"),
        claims.role.as_deref().unwrap_or("-"),
        expires
    );
    Ok(())
}

// =============================================================================
// ENTITIES
// =============================================================================

async fn accounts(console: &Console, command: AccountsCommand) -> anyhow::Result<()> {
    match command {
        AccountsCommand::List => {
            run(console, Operation::FetchAccounts).await?;
            let state = console.store.snapshot();
            print_json_or(console, &state.accounts.accounts, render::accounts(&state.accounts.accounts))
        }
        AccountsCommand::WithoutAccount => {
            run(console, Operation::FetchEmployeesWithoutAccount).await?;
            let state = console.store.snapshot();
            let employees = &state.accounts.employees_without_account;
            print_json_or(console, employees, render::employees(employees))
        }
        AccountsCommand::Add(patch) => {
            write(console, Operation::AddAccount(AccountPatch::from_json(&patch.data)?)).await
        }
        AccountsCommand::Update { id: raw, patch } => {
            let operation = Operation::UpdateAccount {
                id: id(&raw)?,
                patch: AccountPatch::from_json_non_empty(&patch.data)?,
            };
            write(console, operation).await
        }
        AccountsCommand::Delete { id: raw } => {
            write(console, Operation::DeleteAccount(id(&raw)?)).await
        }
    }
}

async fn employees(console: &Console, command: EmployeesCommand) -> anyhow::Result<()> {
    match command {
        EmployeesCommand::List => {
            run(console, Operation::FetchEmployees).await?;
            let state = console.store.snapshot();
            let employees = &state.employees.employees;
            print_json_or(console, employees, render::employees(employees))
        }
        EmployeesCommand::Positions => {
            run(console, Operation::FetchEmployeePositions).await?;
            let state = console.store.snapshot();
            let positions = &state.employees.positions;
            print_json_or(console, positions, render::positions(positions))
        }
        EmployeesCommand::Add(patch) => {
            write(console, Operation::AddEmployee(EmployeePatch::from_json(&patch.data)?)).await
        }
        EmployeesCommand::Update { id: raw, patch } => {
            let operation = Operation::UpdateEmployee {
                id: id(&raw)?,
                patch: EmployeePatch::from_json_non_empty(&patch.data)?,
            };
            write(console, operation).await
        }
        EmployeesCommand::Delete { id: raw } => {
            write(console, Operation::DeleteEmployee(id(&raw)?)).await
        }
    }
}

async fn positions(console: &Console, command: CatalogueCommand) -> anyhow::Result<()> {
    match command {
        CatalogueCommand::List => {
            run(console, Operation::FetchPositions).await?;
            let state = console.store.snapshot();
            let positions = &state.positions.positions;
            print_json_or(console, positions, render::positions(positions))
        }
        CatalogueCommand::Add(patch) => {
            write(console, Operation::AddPosition(PositionPatch::from_json(&patch.data)?)).await
        }
        CatalogueCommand::Update { id: raw, patch } => {
            let operation = Operation::UpdatePosition {
                id: id(&raw)?,
                patch: PositionPatch::from_json_non_empty(&patch.data)?,
            };
            write(console, operation).await
        }
        CatalogueCommand::Delete { id: raw } => {
            write(console, Operation::DeletePosition(id(&raw)?)).await
        }
    }
}

async fn skills(console: &Console, command: CatalogueCommand) -> anyhow::Result<()> {
    match command {
        CatalogueCommand::List => {
            run(console, Operation::FetchSkills).await?;
            let state = console.store.snapshot();
            let skills = &state.skills.skills;
            print_json_or(console, skills, render::skills(skills))
        }
        CatalogueCommand::Add(patch) => {
            write(console, Operation::AddSkill(SkillPatch::from_json(&patch.data)?)).await
        }
        CatalogueCommand::Update { id: raw, patch } => {
            let operation = Operation::UpdateSkill {
                id: id(&raw)?,
                patch: SkillPatch::from_json_non_empty(&patch.data)?,
            };
            write(console, operation).await
        }
        CatalogueCommand::Delete { id: raw } => {
            write(console, Operation::DeleteSkill(id(&raw)?)).await
        }
    }
}

async fn projects(console: &Console, command: ProjectsCommand) -> anyhow::Result<()> {
    match command {
        ProjectsCommand::List {
            account,
            employee,
            all,
        } => {
            let operation = match (account, employee) {
                (Some(raw), _) => Operation::FetchProjectsByAccount(id(&raw)?),
                (None, Some(raw)) => Operation::FetchProjectsByEmployee(id(&raw)?),
                (None, None) => Operation::FetchProjects,
            };
            run(console, operation).await?;
            let state = console.store.snapshot();
            if console.json {
                println!("{}", render::json(&state.projects.projects)?);
            } else if all {
                print!("{}", render::projects(&state.projects.projects));
            } else {
                print!("{}", render::projects(state.projects.active()));
            }
            Ok(())
        }
        ProjectsCommand::Show { id: raw } => {
            run(console, Operation::FetchProject(id(&raw)?)).await?;
            let state = console.store.snapshot();
            let project = state
                .projects
                .selected_project
                .as_ref()
                .ok_or_else(|| anyhow!("project {raw} was not loaded"))?;
            print_json_or(console, project, render::project_detail(project))
        }
        ProjectsCommand::Members { id: raw } => {
            run(console, Operation::FetchProjectEmployees(id(&raw)?)).await?;
            let state = console.store.snapshot();
            let members = &state.projects.project_employees;
            print_json_or(console, members, render::accounts(members))
        }
        ProjectsCommand::Add(patch) => {
            write(console, Operation::AddProject(ProjectPatch::from_json(&patch.data)?)).await
        }
        ProjectsCommand::Update { id: raw, patch } => {
            let operation = Operation::UpdateProject {
                id: id(&raw)?,
                patch: ProjectPatch::from_json_non_empty(&patch.data)?,
            };
            let notifier =
                AssignmentNotifier::spawn(console.store.events(), console.mailer.clone());
            let result = write(console, operation).await;
            let report = notifier.shutdown().await;
            if report.sent + report.failed > 0 {
                println!(
                    "Mailed {} assignment notice(s), {} failed",
                    report.sent, report.failed
                );
            }
            result
        }
        ProjectsCommand::Delete { id: raw } => {
            write(console, Operation::DeleteProject(id(&raw)?)).await
        }
        ProjectsCommand::Restore { id: raw } => {
            write(console, Operation::RestoreProject(id(&raw)?)).await
        }
        ProjectsCommand::SetRole {
            project,
            account,
            role,
        } => {
            let operation = Operation::UpdateMemberRole {
                project: id(&project)?,
                assignment: RoleAssignment {
                    account_id: id(&account)?,
                    role,
                },
            };
            write(console, operation).await
        }
    }
}

async fn profile(console: &Console, command: ProfileCommand) -> anyhow::Result<()> {
    match command {
        ProfileCommand::Show { id: raw } => {
            let account_id = match raw {
                Some(raw) => id(&raw)?,
                None => {
                    let claims = console
                        .api
                        .current_claims()?
                        .ok_or_else(|| anyhow!("not logged in, pass an account id"))?;
                    let raw = claims
                        .id
                        .ok_or_else(|| anyhow!("token carries no account id, pass one"))?;
                    id(&raw)?
                }
            };
            run(console, Operation::FetchProfile(account_id)).await?;
            let state = console.store.snapshot();
            let account = state
                .profile
                .account
                .as_ref()
                .ok_or_else(|| anyhow!("profile was not loaded"))?;
            print_json_or(console, account, render::profile(account))
        }
        ProfileCommand::Skills => {
            run(console, Operation::FetchProfileSkills).await?;
            let state = console.store.snapshot();
            let skills = state.profile.skills.clone().unwrap_or_default();
            print_json_or(console, &skills, render::skills(&skills))
        }
        ProfileCommand::UpdateEmployee { id: raw, patch } => {
            let operation = Operation::UpdateProfileEmployee {
                id: id(&raw)?,
                patch: EmployeePatch::from_json_non_empty(&patch.data)?,
            };
            write(console, operation).await
        }
    }
}
