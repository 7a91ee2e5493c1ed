//! Publish and version-bump commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use monorun_core::{NpmRegistry, PublishOutcome, Publisher, UpgradeOutcome, Upgrader};

use crate::formatting::{
    print_publish_table, print_section_header, print_success, print_upgrade_table, SectionStyle,
};

use super::Session;

fn publisher<'a>(session: &'a Session, registry: &'a NpmRegistry) -> Publisher<'a> {
    Publisher::new(
        registry,
        &session.runner,
        Arc::clone(&session.reporter),
        session.config.package_manager.clone(),
    )
    .with_live_processes(session.live().clone())
}

pub fn cmd_publish(root: PathBuf) -> Result<()> {
    let session = Session::open(root)?;
    let registry = NpmRegistry::new(&session.config.registry)?;
    let publisher = publisher(&session, &registry);

    print_section_header("Publishing projects", SectionStyle::Primary);
    let outcomes = session
        .runtime
        .block_on(publisher.publish_all(&session.workspace));
    println!();

    print_section_header("Publish Results", SectionStyle::Primary);
    print_publish_table(&outcomes);
    println!();

    let published = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, PublishOutcome::Published { .. }))
        .count();
    print_success(&format!("{} projects published", published));
    println!();

    Ok(())
}

pub fn cmd_upgrade(root: PathBuf) -> Result<()> {
    let session = Session::open(root)?;
    let registry = NpmRegistry::new(&session.config.registry)?;
    let publisher = publisher(&session, &registry);
    let upgrader = Upgrader::new(
        &session.runner,
        &publisher,
        Arc::clone(&session.reporter),
        session.config.upgrade.clone(),
    );

    print_section_header("Upgrading versions", SectionStyle::Primary);
    let outcomes = session
        .runtime
        .block_on(upgrader.upgrade_all(&session.workspace))?;
    println!();

    print_section_header("Upgrade Results", SectionStyle::Primary);
    print_upgrade_table(&outcomes);
    println!();

    let bumped = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, UpgradeOutcome::Bumped { .. }))
        .count();
    print_success(&format!("{} projects bumped", bumped));
    println!();

    Ok(())
}
