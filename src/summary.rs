use askama::Template;

use crate::calendar;
use crate::error::RunError;
use crate::regions;
use crate::rental::{money, Rental};

#[derive(Template)]
#[template(
    ext = "txt",
    source = "Client:    {{ rental.client.name }}, born {{ rental.client.date_of_birth }}
Contact:   {{ rental.client.phone }}, {{ rental.client.email }}
Address:   {{ rental.client.address }}
Passport:  {{ rental.client.passport.number }}, issued {{ rental.client.passport.issue_date }} by {{ rental.client.passport.issued_by }}
License:   {{ rental.client.license }}
Vehicle:   {{ rental.vehicle }}, {{ rental.vehicle.year }}, {{ rental.vehicle.color }}, VIN {{ rental.vehicle.vin }}
Period:    {{ start }} to {{ end }} ({{ days }} days)
Rate:      {{ rate }} per day
Total:     {{ total }}
Deposit:   {{ deposit }}
{% for driver in rental.drivers %}Driver {{ loop.index }}:  {{ driver.name }} ({{ driver.license }})
{% endfor %}Territory: {{ territories }}
Roads:     {{ roads }}"
)]
struct RentalSummary<'a> {
    rental: &'a Rental,
    start: String,
    end: String,
    days: i64,
    rate: String,
    total: String,
    deposit: String,
    territories: String,
    roads: String,
}

/// Plain text overview shown to the operator before a contract is issued.
pub fn summary(rental: &Rental) -> Result<String, RunError> {
    let (territories, _) = regions::format_country_strings(
        &rental.regions.legal,
        &rental.regions.display,
    );
    let data = RentalSummary {
        rental,
        start: calendar::format_date(rental.start),
        end: calendar::format_date(rental.end),
        days: rental.days(),
        rate: money(rental.rate),
        total: money(rental.total()),
        deposit: money(rental.deposit),
        territories,
        roads: regions::format_roads(&rental.roads),
    };
    Ok(data.render()?)
}
