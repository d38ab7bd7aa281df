//! Output formatting for deployments, aliases and validation reports.
//!
//! Human-readable tables on stdout by default; `--json` switches every
//! command to serde_json output for scripting.

use sitedeploy_api::{Account, Alias, Deployment};
use sitedeploy_pipeline::{BatchReport, FileStatus};

/// Formats a byte count with a binary-unit suffix.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;
    match bytes {
        b if b >= GIB => format!("{:.1} GiB", b as f64 / GIB as f64),
        b if b >= MIB => format!("{:.1} MiB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.1} KiB", b as f64 / KIB as f64),
        b => format!("{b} B"),
    }
}

pub fn print_deployment(deployment: &Deployment, json: bool) {
    if json {
        print_json(deployment);
        return;
    }
    println!("{}", deployment.url);
    println!("  id:      {}", deployment.id);
    println!("  status:  {}", deployment.status);
    println!(
        "  files:   {} ({})",
        deployment.files_count,
        format_size(deployment.total_size)
    );
    println!("  created: {}", deployment.created_at);
    if let Some(expires) = deployment.expires_at {
        println!("  expires: {expires}");
    }
    if deployment.has_config {
        println!("  config:  yes");
    }
}

pub fn print_deployments(deployments: &[Deployment], json: bool) {
    if json {
        print_json(deployments);
        return;
    }
    if deployments.is_empty() {
        println!("No deployments.");
        return;
    }
    for deployment in deployments {
        println!(
            "{}  {}  {}  {}",
            deployment.id,
            deployment.status,
            format_size(deployment.total_size),
            deployment.url
        );
    }
}

pub fn print_aliases(aliases: &[Alias], json: bool) {
    if json {
        print_json(aliases);
        return;
    }
    if aliases.is_empty() {
        println!("No aliases.");
        return;
    }
    for alias in aliases {
        println!("{}  ->  {}  ({})", alias.name, alias.deployment_id, alias.url);
    }
}

pub fn print_account(account: &Account, json: bool) {
    if json {
        print_json(account);
        return;
    }
    println!("{} ({} plan)", account.email, account.plan);
    println!("  deployments: {}", account.deployments_count);
}

pub fn print_report(report: &BatchReport, json: bool) {
    if json {
        print_json(report);
        return;
    }
    for file in &report.files {
        let marker = match &file.status {
            FileStatus::Ready => "ok      ",
            FileStatus::Excluded { .. } => "excluded",
            FileStatus::Failed { .. } => "failed  ",
        };
        println!("{marker}  {}  ({})", file.path, format_size(file.size));
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for error in &report.errors {
        println!("error: {error}");
    }
    println!(
        "can deploy: {} ({} of {} files ready)",
        if report.can_deploy { "yes" } else { "no" },
        report.valid_files.len(),
        report.files.len()
    );
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(out) => println!("{out}"),
        Err(e) => eprintln!("failed to encode output: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_picks_sensible_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GiB");
    }
}
