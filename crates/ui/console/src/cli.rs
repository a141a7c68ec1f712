use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "console", version, about = "Outreach admin console")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Run the interactive TUI on one of the admin screens
    Run {
        #[arg(value_enum, default_value_t = ScreenKind::Contact)]
        screen: ScreenKind,
    },
    /// Backend reachability probe (scripts/monitoring)
    Health,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScreenKind {
    /// Contact / survey intake form
    Contact,
    /// Volunteer journal (repeating entries)
    Journal,
    /// News post with attachment
    News,
}
