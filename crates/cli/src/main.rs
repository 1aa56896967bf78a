use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::fmt::SubscriberBuilder;

use thumbcluster::prelude::*;

mod provenance;
mod report;

#[derive(Parser)]
#[command(name = "cluster-cli")]
#[command(about = "Build and check thumb-cluster geometry")]
struct Cmd {
    /// Optional free-form tags; recorded in provenance sidecars
    #[arg(long)]
    tag: Vec<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    Mini,
}

impl From<Variant> for ClusterVariant {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Mini => ClusterVariant::Mini,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Build web, walls, plates and caps; write a JSON report plus provenance
    Build {
        /// Parameter JSON; defaults are used when omitted
        #[arg(long)]
        params: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Variant::Mini)]
        variant: Variant,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the default parameters as JSON
    Defaults,
    /// Validate parameters and layout without building geometry
    Check {
        #[arg(long)]
        params: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Variant::Mini)]
        variant: Variant,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Build {
            params,
            variant,
            out,
        } => build(params.as_deref(), variant.into(), &out, cmd.tag),
        Action::Defaults => defaults(),
        Action::Check { params, variant } => check(params.as_deref(), variant.into()),
    }
}

fn build(params: Option<&Path>, variant: ClusterVariant, out: &Path, tags: Vec<String>) -> Result<()> {
    tracing::info!(params = ?params, variant = variant.name(), out = %out.display(), "build");
    let raw = report::load_params(params)?;
    let report = report::build(&raw, variant)?;

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(&report)?)?;

    let sidecar = provenance::write_sidecar(
        out,
        provenance::BuildRecord {
            variant: variant.name(),
            params_file: params,
            params: &raw,
            validation: &report.validation,
            tags: &tags,
        },
    )?;
    tracing::info!(sidecar = %sidecar.display(), "wrote provenance");
    Ok(())
}

fn defaults() -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&ClusterParameters::default())?
    );
    Ok(())
}

fn check(params: Option<&Path>, variant: ClusterVariant) -> Result<()> {
    let raw = report::load_params(params)?;
    let validation = report::check(&raw, variant)?;
    tracing::info!(variant = variant.name(), "layout ok");
    println!("{}", serde_json::to_string_pretty(&validation)?);
    Ok(())
}
