//! Command dispatch: one handler per subcommand
//!
//! Handlers play the part of the dashboard pages. They validate input,
//! call the roster/export services, and render the results.

use std::io::{self, BufRead};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{AddArgs, Cli, Commands, ConfigCommands, EditArgs, ReportArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::report::{
    budget_share_by_division, count_by_role, distinct_divisions, distinct_roles, filter, overview,
    summary_by_division,
};
use crate::domain::{MemberFields, MemberRecord};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

const MEMBER_HEADERS: [&str; 7] = [
    "ID",
    "Nama",
    "Jabatan",
    "Divisi",
    "Gaji",
    "Telepon",
    "Tanggal_Bergabung",
];

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config { command } => return cmd_config(cli, command),
        _ => {}
    }

    let settings = Settings::load()?.with_data_file(cli.data_file.clone());
    debug!("data file: {}", settings.data_file.display());
    let mut container = ServiceContainer::new(settings)?;

    match command {
        Commands::Home => cmd_home(&container),
        Commands::Structure => cmd_structure(&container),
        Commands::Budget => cmd_budget(&container),
        Commands::Report(args) => cmd_report(&container, args),
        Commands::List => cmd_list(&container),
        Commands::Add(args) => cmd_add(&mut container, args),
        Commands::Edit(args) => cmd_edit(&mut container, args),
        Commands::Delete { id, yes } => cmd_delete(&mut container, *id, *yes),
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?.with_data_file(cli.data_file.clone());
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let marker = if path.exists() { "" } else { " (not found)" };
                output::info(&format!("{}{}", path.display(), marker));
            }
            None => output::warning("cannot determine config directory"),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

fn member_row(member: &MemberRecord) -> Vec<String> {
    vec![
        member.id.to_string(),
        member.name.clone(),
        member.role.clone(),
        member.division.clone(),
        output::rupiah(member.amount),
        member.phone.clone(),
        member.join_date.clone(),
    ]
}

fn print_members(table: &[MemberRecord]) {
    let rows: Vec<Vec<String>> = table.iter().map(member_row).collect();
    output::info(&output::table(&MEMBER_HEADERS, &rows));
}

#[instrument(skip(container))]
fn cmd_home(container: &ServiceContainer) -> CliResult<()> {
    let stats = overview(container.roster.list());

    output::header("Masjid Ashobirin: Sistem Manajemen Organisasi & Keuangan");
    output::metric("Total Anggota", &stats.members);
    output::metric("Total Anggaran", &output::rupiah(stats.total_budget));
    output::metric("Rata-rata Gaji", &output::rupiah(stats.average));
    output::metric("Jumlah Divisi", &stats.divisions);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_structure(container: &ServiceContainer) -> CliResult<()> {
    let table = container.roster.list();
    let Some(counts) = count_by_role(table) else {
        output::warning("no members yet, add one with `roster add`");
        return Ok(());
    };

    output::header("Jumlah Anggota per Jabatan");
    let max = counts.iter().map(|c| c.count as u64).max().unwrap_or(0);
    let width = counts.iter().map(|c| c.role.chars().count()).max().unwrap_or(0);
    for c in &counts {
        output::detail(&format!(
            "{:<width$}  {} {}",
            c.role,
            output::bar(c.count as u64, max),
            c.count
        ));
    }

    output::info("");
    output::header("Daftar Anggota Organisasi");
    for member in table {
        output::info(&format!(
            "{} ({} - {})",
            member.name, member.role, member.division
        ));
        output::detail(&format!(
            "tel {}  |  {}",
            member.phone,
            output::rupiah(member.amount)
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_budget(container: &ServiceContainer) -> CliResult<()> {
    let table = container.roster.list();
    let Some(shares) = budget_share_by_division(table) else {
        output::warning("no budget data to show");
        return Ok(());
    };

    output::header("Distribusi Anggaran per Divisi");
    let max = shares.iter().map(|s| s.total).max().unwrap_or(0);
    let width = shares
        .iter()
        .map(|s| s.division.chars().count())
        .max()
        .unwrap_or(0);
    for s in &shares {
        output::detail(&format!(
            "{:<width$}  {:>5.1}%  {}",
            s.division,
            s.share * 100.0,
            output::bar(s.total, max)
        ));
    }

    output::info("");
    output::header("Ringkasan Anggaran per Divisi");
    let rows: Vec<Vec<String>> = summary_by_division(table)
        .iter()
        .map(|s| {
            vec![
                s.division.clone(),
                output::rupiah(s.total),
                s.count.to_string(),
                output::rupiah(s.average),
            ]
        })
        .collect();
    output::info(&output::table(
        &["Divisi", "Total Gaji", "Jumlah Anggota", "Rata-rata Gaji"],
        &rows,
    ));

    output::info("");
    output::header("Detail Anggaran per Anggota");
    let rows: Vec<Vec<String>> = table
        .iter()
        .map(|m| {
            vec![
                m.name.clone(),
                m.role.clone(),
                m.division.clone(),
                output::rupiah(m.amount),
            ]
        })
        .collect();
    output::info(&output::table(&["Nama", "Jabatan", "Divisi", "Gaji"], &rows));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_report(container: &ServiceContainer, args: &ReportArgs) -> CliResult<()> {
    let table = container.roster.list();
    if table.is_empty() {
        output::warning("no data to analyse yet");
        return Ok(());
    }

    let divisions = if args.divisions.is_empty() {
        distinct_divisions(table)
    } else {
        args.divisions.clone()
    };
    let roles = if args.roles.is_empty() {
        distinct_roles(table)
    } else {
        args.roles.clone()
    };
    debug!("report filter: divisions={:?} roles={:?}", divisions, roles);

    let selected = filter(table, &divisions, &roles);
    let stats = overview(&selected);

    output::header("Laporan & Analisis Data");
    output::metric("Total Anggota Filter", &stats.members);
    output::metric("Total Anggaran Filter", &output::rupiah(stats.total_budget));
    output::metric("Rata-rata Gaji", &output::rupiah(stats.average));
    output::info("");
    print_members(&selected);

    if args.export {
        let dir = args
            .export_dir
            .clone()
            .unwrap_or_else(|| container.settings.export_dir.clone());
        let path = container
            .export
            .export(&selected, &dir, args.format.into())?;
        output::success(&format!("exported to {}", path.display()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_list(container: &ServiceContainer) -> CliResult<()> {
    let table = container.roster.list();
    if table.is_empty() {
        output::info("no members yet");
    } else {
        print_members(table);
    }
    Ok(())
}

fn require_fields(fields: &MemberFields) -> CliResult<()> {
    fields
        .validate_required()
        .map_err(|e| CliError::InvalidArgs(e.to_string()))
}

#[instrument(skip(container))]
fn cmd_add(container: &mut ServiceContainer, args: &AddArgs) -> CliResult<()> {
    let fields = MemberFields::new(
        args.name.as_str(),
        args.role.as_str(),
        args.division.as_str(),
        args.amount,
        args.phone.as_str(),
    );
    require_fields(&fields)?;

    let member = container.roster.add(fields)?;
    output::success(&format!("added {} (ID: {})", member.name, member.id));
    Ok(())
}

/// Fill fields the user did not pass with the member's current values.
fn merge_edit(current: &MemberRecord, args: &EditArgs) -> MemberFields {
    let current = current.fields();
    MemberFields {
        name: args.name.clone().unwrap_or(current.name),
        role: args.role.clone().unwrap_or(current.role),
        division: args.division.clone().unwrap_or(current.division),
        amount: args.amount.unwrap_or(current.amount),
        phone: args.phone.clone().unwrap_or(current.phone),
    }
}

#[instrument(skip(container))]
fn cmd_edit(container: &mut ServiceContainer, args: &EditArgs) -> CliResult<()> {
    let Some(current) = container.roster.get(args.id) else {
        return Err(CliError::MemberNotFound(args.id));
    };
    let fields = merge_edit(current, args);
    require_fields(&fields)?;

    if !container.roster.edit(args.id, fields)? {
        return Err(CliError::MemberNotFound(args.id));
    }
    output::success(&format!("updated member {}", args.id));
    Ok(())
}

fn confirm(question: &str) -> CliResult<bool> {
    output::prompt(question);
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| InfraError::io("read confirmation", e))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[instrument(skip(container))]
fn cmd_delete(container: &mut ServiceContainer, id: u64, yes: bool) -> CliResult<()> {
    let Some(member) = container.roster.get(id) else {
        return Err(CliError::MemberNotFound(id));
    };

    if !yes {
        output::warning(&format!(
            "about to delete {} ({} - {})",
            member.name, member.role, member.division
        ));
        if !confirm("Delete permanently? [y/N]")? {
            output::info("aborted");
            return Ok(());
        }
    }

    if !container.roster.delete(id)? {
        return Err(CliError::MemberNotFound(id));
    }
    output::success(&format!("deleted member {id}"));
    Ok(())
}
