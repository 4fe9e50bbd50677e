//! Key command - prints the derived cache key without touching the store

use clap::Args;

use crate::domain::{derive_key, Pattern};

#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Generator namespace, e.g. `cairn` or `promenade`
    #[arg(long)]
    pub namespace: String,

    /// Temporal coordinate, as sent on the wire
    #[arg(long, allow_hyphen_values = true)]
    pub temporal: String,

    /// Spatial coordinate, as sent on the wire
    #[arg(long, allow_hyphen_values = true)]
    pub spatial: String,
}

impl KeyArgs {
    pub fn key(&self) -> String {
        let pattern = Pattern::new(
            self.namespace.as_str(),
            self.temporal.as_str(),
            self.spatial.as_str(),
            "",
        );
        derive_key(&self.namespace, &pattern)
    }
}

pub fn run(args: KeyArgs) -> anyhow::Result<()> {
    println!("{}", args.key());
    Ok(())
}
