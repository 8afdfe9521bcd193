use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/* Argument Stucture
 *
 * [issue]
 * vehicles
 * templates
 * counter
 * days <start> <end>
 */

#[derive(Parser)]
pub struct Opts {
    /// Configuration with data, template and output locations
    #[clap(short, long, default_value="rentgen.toml",
        value_hint=ValueHint::FilePath)]
    pub config: PathBuf,

    #[clap(subcommand)]
    pub subcommand: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Issue a new contract and generate its documents (default)
    Issue,

    /// List the vehicles available for rental
    Vehicles,

    /// List the templates that will be filled and their categories
    Templates,

    /// Show the last issued and next contract number
    Counter,

    /// Count rental days between two DD.MM.YYYY dates, both included
    Days {
        /// first day of the rental
        start: String,
        /// last day of the rental
        end: String,
    },
}
