use anyhow::Context;
use serde::Deserialize;

/// Crates that must stay free of runtime and transport dependencies.
const PURE_CRATES: &[&str] = &["simdeck-domain", "simdeck-shared"];

/// Dependencies only the console crate may pull in.
const FORBIDDEN_IN_PURE: &[&str] = &["tokio", "tokio-util", "reqwest", "axum", "dotenvy"];

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
    /// `None` for normal dependencies, `dev` or `build` otherwise
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
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let violations = violations(&metadata);
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("arch-check: {violation}");
        }
        anyhow::bail!("{} architecture violation(s)", violations.len())
    }

    println!("arch-check: ok");
    Ok(())
}

fn violations(metadata: &Metadata) -> Vec<String> {
    let mut found = Vec::new();
    for package in &metadata.packages {
        if !PURE_CRATES.contains(&package.name.as_str()) {
            continue;
        }
        for dep in &package.dependencies {
            if dep.kind.is_none() && FORBIDDEN_IN_PURE.contains(&dep.name.as_str()) {
                found.push(format!("{} depends on {}", package.name, dep.name));
            }
        }
    }
    found
}
