//! Plain-text tables for slice contents.

use serde::Serialize;
use shared_types::{Account, Employee, Position, Project, Ref, Skill};

/// Left-aligned columns separated by two spaces.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &widths, headers.iter().copied());
    for row in rows {
        push_row(&mut out, &widths, row.iter().map(String::as_str));
    }
    out
}

fn push_row<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn employee_label(employee: Option<&Ref<Employee>>) -> String {
    match employee {
        Some(Ref::Populated(employee)) => or_dash(&employee.name),
        Some(Ref::Id(id)) => id.to_string(),
        None => "-".to_string(),
    }
}

fn account_label(account: &Ref<Account>) -> String {
    match account {
        Ref::Populated(account) => or_dash(&account.email),
        Ref::Id(id) => id.to_string(),
    }
}

pub fn accounts(accounts: &[Account]) -> String {
    let rows: Vec<Vec<String>> = accounts
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                or_dash(&a.email),
                or_dash(&a.role),
                or_dash(&a.status),
                employee_label(a.employee.as_ref()),
            ]
        })
        .collect();
    table(&["ID", "EMAIL", "ROLE", "STATUS", "EMPLOYEE"], &rows)
}

pub fn employees(employees: &[Employee]) -> String {
    let rows: Vec<Vec<String>> = employees
        .iter()
        .map(|e| {
            let position = match &e.position {
                Some(Ref::Populated(position)) => position.name.clone(),
                Some(Ref::Id(id)) => id.to_string(),
                None => "-".to_string(),
            };
            vec![
                e.id.to_string(),
                or_dash(&e.name),
                or_dash(&e.email),
                position,
                or_dash(&e.status),
                if e.has_account { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    table(&["ID", "NAME", "EMAIL", "POSITION", "STATUS", "ACCOUNT"], &rows)
}

pub fn positions(positions: &[Position]) -> String {
    let rows: Vec<Vec<String>> = positions
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                or_dash(&p.name),
                or_dash(&p.status),
                or_dash(&p.description),
            ]
        })
        .collect();
    table(&["ID", "NAME", "STATUS", "DESCRIPTION"], &rows)
}

pub fn skills(skills: &[Skill]) -> String {
    let rows: Vec<Vec<String>> = skills
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                or_dash(&s.name),
                or_dash(&s.category),
                or_dash(&s.status),
            ]
        })
        .collect();
    table(&["ID", "NAME", "CATEGORY", "STATUS"], &rows)
}

pub fn projects<'a>(projects: impl IntoIterator<Item = &'a Project>) -> String {
    let rows: Vec<Vec<String>> = projects
        .into_iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                or_dash(&p.name),
                or_dash(&p.status),
                or_dash(&p.start_date),
                or_dash(&p.end_date),
                p.employees.len().to_string(),
                if p.is_deleted { "deleted" } else { "" }.to_string(),
            ]
        })
        .collect();
    table(&["ID", "NAME", "STATUS", "START", "END", "MEMBERS", ""], &rows)
}

pub fn project_detail(project: &Project) -> String {
    let manager = project
        .project_manager
        .as_ref()
        .map_or_else(|| "-".to_string(), account_label);
    let technologies: Vec<String> = project
        .technologies
        .iter()
        .map(|t| match t {
            Ref::Populated(skill) => skill.name.clone(),
            Ref::Id(id) => id.to_string(),
        })
        .collect();

    let mut out = format!(
        "{} ({})\n  status:       {}\n  dates:        {} .. {}\n  manager:      {}\n  technologies: {}\n",
        or_dash(&project.name),
        project.id,
        or_dash(&project.status),
        or_dash(&project.start_date),
        or_dash(&project.end_date),
        manager,
        if technologies.is_empty() { "-".to_string() } else { technologies.join(", ") },
    );
    if project.is_deleted {
        out.push_str("  (deleted)\n");
    }
    if !project.employees.is_empty() {
        let rows: Vec<Vec<String>> = project
            .employees
            .iter()
            .map(|member| {
                let label = member.account.as_ref().map_or_else(|| "-".to_string(), account_label);
                vec![label, or_dash(&member.role)]
            })
            .collect();
        out.push('\n');
        out.push_str(&table(&["MEMBER", "ROLE"], &rows));
    }
    out
}

pub fn profile(account: &Account) -> String {
    let mut out = format!(
        "{} ({})\n  role:   {}\n  status: {}\n",
        or_dash(&account.email),
        account.id,
        or_dash(&account.role),
        or_dash(&account.status),
    );
    if let Some(Ref::Populated(employee)) = &account.employee {
        out.push_str(&format!(
            "  name:   {}\n  phone:  {}\n  skills: {}\n",
            or_dash(&employee.name),
            or_dash(&employee.phone_number),
            employee.skills.len()
        ));
    }
    out
}
