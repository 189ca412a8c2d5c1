use std::io::IsTerminal;
use std::path::Path;

use anyhow::Result;
use rf_config::EngineParameters;
use rf_core::{CheckReport, Facts, Rules};

use crate::cmd_fire::build_engine;
use crate::session::{Session, load_facts};

/// Evaluate every rule without running actions.
pub fn check_rules(
    rules: &Rules,
    facts: &Facts,
    parameters: EngineParameters,
) -> Result<CheckReport> {
    let engine = build_engine(parameters, false);
    Ok(engine.check(rules, facts)?)
}

/// One `name = true|false` line per evaluated rule, in rule order.
pub fn render_report(report: &CheckReport, color: bool) -> String {
    let mut out = String::new();
    for (rule, matched) in report.iter() {
        let line = match (matched, color) {
            (true, true) => format!("{} = \x1b[1;32mtrue\x1b[0m", rule.name()),
            (false, true) => format!("{} = \x1b[2mfalse\x1b[0m", rule.name()),
            (m, false) => format!("{} = {m}", rule.name()),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// CLI entry point.
pub fn run(session: &Session, facts: &Path) -> Result<()> {
    let rules = session.load_rules()?;
    let facts = load_facts(facts)?;
    let report = check_rules(&rules, &facts, session.config.engine)?;
    print!("{}", render_report(&report, std::io::stdout().is_terminal()));
    let matched = report.matched().count();
    eprintln!("---");
    eprintln!("{matched} of {} rule(s) matched", report.len());
    Ok(())
}
