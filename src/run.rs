use std::path::PathBuf;

use log::{error, info};

use crate::calendar;
use crate::cli::Command;
use crate::config::Config;
use crate::counter::{ContractSequence, FileCounter};
use crate::error::RunError;
use crate::input;
use crate::rental::{money, Contract, Rental};
use crate::summary;
use crate::templates;
use crate::vehicles::{self, Vehicle};

type RunResult = Result<(), RunError>;

pub fn run_cmd(cmd: Command, config: &Config) -> RunResult {
    match cmd {
        Command::Issue => {
            let counter = FileCounter::new(&config.counter);
            issue(config, &counter)
        }
        Command::Vehicles => list_vehicles(config),
        Command::Templates => list_templates(config),
        Command::Counter => show_counter(config),
        Command::Days { start, end } => show_days(&start, &end),
    }
}

fn print_vehicles(vehicles: &[Vehicle]) {
    for (n, vehicle) in vehicles.iter().enumerate() {
        println!("{}. {}", n + 1, vehicle);
    }
}

fn issue(config: &Config, counter: &dyn ContractSequence) -> RunResult {
    let mut vehicles = vehicles::load(&config.vehicles)?;
    if vehicles.is_empty() {
        println!(
            "No vehicle data found in {}",
            config.vehicles.display()
        );
        return Ok(());
    }

    println!("Available vehicles:\n");
    print_vehicles(&vehicles);
    let index = input::select_vehicle(vehicles.len())?;
    let vehicle = vehicles.swap_remove(index);

    let client = input::new_client()?;
    let (start, end) = input::select_period()?;
    let rate = input::select_amount("Daily rate:")?;
    let deposit = input::select_amount("Security deposit:")?;
    let drivers = input::select_drivers()?;
    let roads = input::select_roads()?;
    let regions = input::select_countries()?;

    let rental = Rental {
        client,
        vehicle,
        start,
        end,
        rate,
        deposit,
        drivers,
        roads,
        regions,
    };

    println!("\nIssuing contract:\n\n{}\n", summary::summary(&rental)?);
    if !input::confirm()? {
        return Ok(());
    }

    let number = counter.issue()?;
    info!("Issued contract number {}", number);
    let contract = Contract::new(number, calendar::today(), rental);

    let written = emit(config, &contract)?;
    println!(
        "\nContract {} for {}, total {}: {} documents written",
        contract.number,
        contract.rental.client.name,
        money(contract.rental.total()),
        written.len()
    );
    Ok(())
}

/// Fills every template for the contract; nothing is written when the
/// template directory is missing.
fn emit(
    config: &Config,
    contract: &Contract,
) -> Result<Vec<PathBuf>, RunError> {
    let templates = match templates::resolve(config)? {
        Some(templates) => templates,
        None => {
            error!(
                "Template directory {} not found",
                config.template_dir.display()
            );
            return Ok(Vec::new());
        }
    };
    templates::generate(
        &templates,
        &contract.placeholders(),
        &contract.rental.client.name,
        &config.output_dir,
    )
}

fn list_vehicles(config: &Config) -> RunResult {
    let vehicles = vehicles::load(&config.vehicles)?;
    if vehicles.is_empty() {
        println!(
            "No vehicle data found in {}",
            config.vehicles.display()
        );
    }
    print_vehicles(&vehicles);
    Ok(())
}

fn list_templates(config: &Config) -> RunResult {
    let templates = match templates::resolve(config)? {
        Some(templates) => templates,
        None => {
            println!(
                "Template directory {} not found",
                config.template_dir.display()
            );
            return Ok(());
        }
    };
    for template in templates {
        let category = template
            .category
            .map_or("unclassified".to_string(), |c| c.to_string());
        println!(
            "{} ({}) -> {}",
            template.path.display(),
            category,
            template.output_name("<client>")
        );
    }
    Ok(())
}

fn show_counter(config: &Config) -> RunResult {
    let counter = FileCounter::new(&config.counter);
    println!("Counter store: {}", counter.path().display());
    match counter.last_issued() {
        Ok(Some(last)) => println!("Last issued contract: {}", last),
        Ok(None) => println!("No contracts issued yet"),
        Err(error) => println!("Counter store unreadable: {}", error),
    }
    println!("Next contract: {}", counter.load_next());
    Ok(())
}

fn show_days(start: &str, end: &str) -> RunResult {
    let days = calendar::days(start, end)?;
    if days < 1 {
        println!("{} days, the end date is before the start date", days);
    } else {
        println!("{} days", days);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::package::{docx_bytes, MAIN_PART};
    use crate::document::Package;
    use crate::rental::tests::rental;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> Config {
        Config {
            vehicles: dir.path().join("data").join("cars.json"),
            counter: dir.path().join("data").join("contract_counter.json"),
            template_dir: dir.path().join("templates"),
            output_dir: dir.path().join("output"),
            templates: Vec::new(),
        }
    }

    fn contract() -> Contract {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Contract::new(12, date, rental())
    }

    #[test]
    fn emit_fills_contract_template() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        fs::create_dir(&config.template_dir).unwrap();
        let xml = "<w:document xmlns:w=\"urn:w\"><w:body>\
             <w:p><w:r><w:t>No. {{CONTRACT_NUMBER}}</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Total: {{TOTAL_</w:t></w:r>\
             <w:r><w:rPr><w:b/></w:rPr><w:t>AMOUNT}}</w:t></w:r></w:p>\
             </w:body></w:document>";
        fs::write(
            config.template_dir.join("Contract.docx"),
            docx_bytes(&[(MAIN_PART, xml.as_bytes())]),
        )
        .unwrap();

        let written = emit(&config, &contract()).unwrap();
        assert_eq!(
            written,
            vec![config.output_dir.join("contract_Ivanov_Ivan.docx")]
        );

        let package = Package::open(&written[0]).unwrap();
        let text: Vec<String> = package
            .part(MAIN_PART)
            .unwrap()
            .document
            .paragraphs()
            .iter()
            .map(|p| p.text())
            .collect();
        assert_eq!(text, vec!["No. 12", "Total: 250.00"]);
    }

    #[test]
    fn missing_template_directory_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        assert!(emit(&config, &contract()).unwrap().is_empty());
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn listing_commands_without_data() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        run_cmd(Command::Vehicles, &config).unwrap();
        run_cmd(Command::Templates, &config).unwrap();
        run_cmd(Command::Counter, &config).unwrap();
    }

    #[test]
    fn counter_command_survives_corrupt_store() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        fs::create_dir_all(config.counter.parent().unwrap()).unwrap();
        fs::write(&config.counter, "{ not json").unwrap();
        run_cmd(Command::Counter, &config).unwrap();
    }

    #[test]
    fn days_command_counts_and_rejects_bad_dates() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let days = |start: &str, end: &str| Command::Days {
            start: start.to_string(),
            end: end.to_string(),
        };
        run_cmd(days("01.01.2024", "05.01.2024"), &config).unwrap();
        run_cmd(days("05.01.2024", "01.01.2024"), &config).unwrap();
        assert!(matches!(
            run_cmd(days("2024-01-01", "05.01.2024"), &config),
            Err(RunError::Date { .. })
        ));
    }

    #[test]
    fn issue_without_vehicles_ends_early() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let counter = FileCounter::new(&config.counter);
        issue(&config, &counter).unwrap();
        assert_eq!(counter.last_issued().unwrap(), None);
    }
}
