//! Policies command - prints the policy registry

use clap::Args;

use crate::infrastructure::bandit::{PolicyInfo, PolicyRegistry};

#[derive(Args, Debug, Default)]
pub struct PoliciesArgs {
    /// Print as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PoliciesArgs) -> anyhow::Result<()> {
    let policies = PolicyRegistry::with_defaults().list();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&policies)?);
    } else {
        print!("{}", render_table(&policies));
    }

    Ok(())
}

fn render_table(policies: &[PolicyInfo]) -> String {
    let width = policies.iter().map(|p| p.id.len()).max().unwrap_or(0);

    policies
        .iter()
        .map(|p| {
            let marker = if p.implemented { " " } else { "*" };
            format!("{}{:<width$}  {}\n", marker, p.id, p.description, width = width)
        })
        .collect()
}
