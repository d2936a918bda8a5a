use anyhow::Context;
use serde::Deserialize;

/// Packages the domain crate must not depend on outside of dev-dependencies.
const DOMAIN_FORBIDDEN: &[&str] = &[
    "penpaper-engine",
    "tracing",
    "tracing-subscriber",
    "tokio",
    "mockall",
];

const DOMAIN_PACKAGE: &str = "penpaper-domain";

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    /// `None` for normal dependencies, `"dev"` or `"build"` otherwise.
    kind: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata output")?;

    let violations = domain_violations(&metadata)?;
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("arch-check: {DOMAIN_PACKAGE} must not depend on {violation}");
        }
        anyhow::bail!("arch-check failed with {} violation(s)", violations.len());
    }

    println!("arch-check: ok");
    Ok(())
}

fn domain_violations(metadata: &Metadata) -> anyhow::Result<Vec<String>> {
    let domain = metadata
        .packages
        .iter()
        .find(|package| package.name == DOMAIN_PACKAGE)
        .with_context(|| format!("{DOMAIN_PACKAGE} not found in workspace"))?;

    Ok(domain
        .dependencies
        .iter()
        .filter(|dependency| dependency.kind.is_none())
        .filter(|dependency| DOMAIN_FORBIDDEN.contains(&dependency.name.as_str()))
        .map(|dependency| dependency.name.clone())
        .collect())
}
