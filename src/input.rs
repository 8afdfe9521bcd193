use chrono::{NaiveDate, Weekday};
use inquire::validator::Validation;
use inquire::CustomUserError;
use inquire::{
    error::InquireError, required, Confirm, CustomType, DateSelect, Text,
};
use rust_decimal::Decimal;

use crate::calendar;
use crate::regions::{self, Country, RegionSelection, RoadType};
use crate::rental::{Client, Driver, Passport, MAX_DRIVERS};

type InputResult<T> = Result<T, InquireError>;

fn date_validator(text: &str) -> Result<Validation, CustomUserError> {
    match calendar::parse_date(text) {
        Ok(_) => Ok(Validation::Valid),
        Err(_) => Ok(Validation::Invalid("Expected DD.MM.YYYY".into())),
    }
}

/// Zero based index of the chosen vehicle in a list numbered from one.
pub fn select_vehicle(count: usize) -> InputResult<usize> {
    let number: usize = CustomType::new("Vehicle number:")
        .with_error_message("Please type a valid number")
        .with_validator(move |number: &usize| {
            if (1..=count).contains(number) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(
                    format!("Choose a vehicle from 1 to {}", count).into(),
                ))
            }
        })
        .prompt()?;
    Ok(number - 1)
}

pub fn new_client() -> InputResult<Client> {
    let name = Text::new("Client name (Surname Name):")
        .with_validator(required!())
        .prompt()?;
    let date_of_birth = Text::new("Date of birth (DD.MM.YYYY):")
        .with_validator(date_validator)
        .prompt()?;
    let address = Text::new("Address:").prompt()?;
    let phone = Text::new("Phone:").prompt()?;
    let email = Text::new("Email:").prompt()?;

    let passport = Passport {
        number: Text::new("Passport number:").prompt()?,
        issue_date: Text::new("Passport issue date (DD.MM.YYYY):")
            .with_validator(date_validator)
            .prompt()?,
        issued_by: Text::new("Passport issued by:").prompt()?,
    };
    let license = Text::new("Driver license number:").prompt()?;

    Ok(Client {
        name,
        date_of_birth,
        address,
        phone,
        email,
        passport,
        license,
    })
}

pub fn select_period() -> InputResult<(NaiveDate, NaiveDate)> {
    let start = DateSelect::new("Rental from:")
        .with_week_start(Weekday::Mon)
        .with_formatter(&calendar::format_date)
        .prompt()?;

    let end = DateSelect::new("until:")
        .with_default(start)
        .with_min_date(start)
        .with_week_start(Weekday::Mon)
        .with_formatter(&calendar::format_date)
        .prompt()?;

    Ok((start, end))
}

pub fn select_amount(message: &str) -> InputResult<Decimal> {
    CustomType::new(message)
        .with_formatter(&|amount: Decimal| format!("{:.2}", amount))
        .with_error_message("Please type a valid amount")
        .prompt()
}

pub fn select_drivers() -> InputResult<Vec<Driver>> {
    let mut drivers = Vec::new();
    if !Confirm::new("Additional drivers?")
        .with_default(false)
        .prompt()?
    {
        return Ok(drivers);
    }

    let count: usize =
        CustomType::new(&format!("How many (up to {})?", MAX_DRIVERS))
            .with_error_message("Please type a valid number")
            .with_validator(|count: &usize| {
                if (1..=MAX_DRIVERS).contains(count) {
                    Ok(Validation::Valid)
                } else {
                    Ok(Validation::Invalid(
                        format!("At most {} additional drivers", MAX_DRIVERS)
                            .into(),
                    ))
                }
            })
            .prompt()?;

    for n in 1..=count {
        let name = Text::new(&format!("Driver {} name:", n)).prompt()?;
        let license =
            Text::new(&format!("Driver {} license number:", n)).prompt()?;
        drivers.push(Driver { name, license });
    }
    Ok(drivers)
}

pub fn select_roads() -> InputResult<Vec<RoadType>> {
    println!("\nRoad types:");
    for line in regions::menu::<RoadType, _>(|road| road.to_string()) {
        println!("{}", line);
    }
    let choice = Text::new("Road types:")
        .with_help_message("Comma separated, e.g. 1,3,5. Empty for Paved")
        .prompt()?;
    Ok(regions::pick(&choice))
}

pub fn select_countries() -> InputResult<RegionSelection> {
    println!(
        "\nAdditional countries ({} is always allowed):",
        regions::HOME_JURISDICTION
    );
    for line in regions::menu::<Country, _>(|country| {
        format!("{} / {}", country.legal(), country.local())
    }) {
        println!("{}", line);
    }
    let choice = Text::new("Countries:")
        .with_help_message("Comma separated, e.g. 1,2. Empty for none")
        .prompt()?;
    Ok(regions::select(&choice))
}

pub fn confirm() -> InputResult<bool> {
    Confirm::new("Issue contract").with_default(true).prompt()
}
