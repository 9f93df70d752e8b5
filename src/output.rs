use clc_inventory_config::OutputFormat;
use clc_inventory_engine::{
    InventoryDocument,
    ScopeReport,
};
use color_eyre::Result;
use serde::Serialize;
use std::io::Write;

/// One entry of the JSON output. Aliases keep their configured order and a
/// repeated alias yields a second entry.
#[derive(Serialize)]
struct AliasInventory<'a> {
    alias: &'a str,
    inventory: &'a InventoryDocument,
}

pub fn write_reports(out: &mut impl Write, format: OutputFormat, reports: &[ScopeReport]) -> Result<()> {
    match format {
        OutputFormat::Pairs => {
            for report in reports {
                for (name, host) in report.document.meta.iter() {
                    writeln!(out, "{name}")?;
                    writeln!(out, "{}", host.ip_address)?;
                }
            }
        }
        OutputFormat::SshConfig => {
            for report in reports {
                writeln!(out, "# {}", report.scope)?;
                for (name, host) in report.document.meta.iter() {
                    writeln!(out, "Host {name}")?;
                    writeln!(out, "    HostName {}", host.ip_address)?;
                    writeln!(out)?;
                }
            }
        }
        OutputFormat::Json => {
            let documents: Vec<AliasInventory<'_>> = reports
                .iter()
                .map(|report| AliasInventory {
                    alias: report.scope.as_str(),
                    inventory: &report.document,
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &documents)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
