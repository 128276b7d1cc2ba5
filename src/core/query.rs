use crate::config::settings::{RouteConfig, SiteSettings};
use crate::domain::model::RouteQuery;
use crate::utils::error::{MonitorError, Result};
use chrono::NaiveDate;
use url::Url;

/// Every date from `start` to `end`, both inclusive. Empty when `start > end`.
pub fn generate_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

pub fn build_search_url(site: &SiteSettings, route: &RouteConfig, date: NaiveDate) -> Result<String> {
    let date = date.format("%Y-%m-%d").to_string();
    let passengers = site
        .passengers_count()
        .ok_or_else(|| MonitorError::InvalidConfigValueError {
            field: "site".to_string(),
            value: "passenger counts".to_string(),
            reason: "Passenger total does not fit in u32".to_string(),
        })?;
    let params = [
        ("DepartureStation", route.from_station.clone()),
        ("ArrivalStation", route.to_station.clone()),
        ("DepartureDateString", date),
        ("AdultCount", site.adult_count.to_string()),
        ("ChildCount", site.child_count.to_string()),
        ("InfantCount", site.infant_count.to_string()),
        ("DisabledCount", site.disabled_count.to_string()),
        ("CarerCount", site.carer_count.to_string()),
        ("passengersCount", passengers.to_string()),
        ("Lang", site.language.clone()),
        ("serviceType", site.service_type.clone()),
        ("WithCarCargo", site.with_car_cargo.to_string()),
        ("TripDirection", route.direction.clone()),
    ];

    let url = Url::parse_with_params(&site.base_url, &params).map_err(|e| {
        MonitorError::InvalidConfigValueError {
            field: "site.base_url".to_string(),
            value: site.base_url.clone(),
            reason: format!("Invalid URL format: {}", e),
        }
    })?;

    Ok(url.into())
}

/// Pretty JSON of the planned queries, printed by `--dry-run`.
pub fn plan_as_json(queries: &[RouteQuery]) -> Result<String> {
    Ok(serde_json::to_string_pretty(queries)?)
}

/// One query per (route, date), routes in configuration order and dates ascending.
pub fn plan_queries(routes: &[RouteConfig], site: &SiteSettings) -> Result<Vec<RouteQuery>> {
    let mut queries = Vec::new();

    for route in routes {
        let label = route.label();
        for date in generate_dates(route.start_date, route.end_date) {
            queries.push(RouteQuery {
                route: label.clone(),
                origin: route.from_station.clone(),
                destination: route.to_station.clone(),
                date,
                url: build_search_url(site, route, date)?,
            });
        }
    }

    Ok(queries)
}
