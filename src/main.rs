/*
 * Rental contract generator
 *
 * Issue a contract:
 *  - Select a vehicle from the catalog
 *  - Enter client, passport and license details
 *  - Select the rental period, daily rate and deposit
 *  - Add up to three additional drivers
 *  - Select allowed road types and additional countries
 *  - Review the summary and confirm
 *  - Take the next contract number from the counter
 *  - Fill every template and write the documents to the output directory
 *
 * Templates are Word documents with {{TOKEN}} placeholders. Paragraphs
 * without placeholders are written back untouched.
 */

mod calendar;
mod cli;
mod config;
mod counter;
mod document;
mod error;
mod input;
mod logging;
mod regions;
mod rental;
mod run;
mod summary;
mod templates;
mod vehicles;

use crate::cli::{Command, Opts};
use crate::config::Config;
use clap::Parser;

fn main() {
    let opts = Opts::parse();
    logging::setup_logging();

    let result = Config::load(&opts.config).and_then(|config| {
        run::run_cmd(opts.subcommand.unwrap_or(Command::Issue), &config)
    });
    if let Err(error) = result {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
