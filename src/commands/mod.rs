pub mod volume;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage volumes in the cluster
    #[command(arg_required_else_help = true)]
    Volume(volume::VolumeArgs),
}
