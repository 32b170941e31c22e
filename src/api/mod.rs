//! JSON views of the three prayer-time endpoints, independent of any HTTP
//! framework. Each returns the success body or an [`ErrorResponse`].

use crate::error::{AppError, AppResult};
use crate::models::locations::featured_locations;
use crate::models::{Location, PrayerName, PrayerSchedule, School, TimeOfDay, Timings};
use crate::provider::{to_schedule, TimingsProvider, TimingsQuery};
use crate::schedule::resolve_next_prayer;
use chrono::{DateTime, NaiveDateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;

pub const DEFAULT_CITY: &str = "Osaka";
pub const DEFAULT_COUNTRY: &str = "Japan";
pub const DEFAULT_METHOD: u8 = 3;
pub const DEFAULT_SCHOOL: School = School::Hanafi;
/// Method used by the multi-city and next-prayer views.
pub const SUMMARY_METHOD: u8 = 2;
pub const NEXT_PRAYER_CITY: &str = "Tokyo";
pub const NEXT_PRAYER_COUNTRY: &str = "Japan";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerEntry {
    pub name: PrayerName,
    pub ar: String,
    pub time: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerTimesResponse {
    pub success: bool,
    pub city: String,
    pub country: String,
    pub school: School,
    pub school_value: u8,
    pub date: String,
    pub gregorian_date: String,
    pub hijri_date: String,
    pub prayers: Vec<PrayerEntry>,
    pub timezone: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextPrayerView {
    pub name: PrayerName,
    pub time: TimeOfDay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomorrow: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySummary {
    pub city: String,
    pub country: String,
    pub next_prayer: Option<NextPrayerView>,
    pub fajr: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiCityResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    pub cities: Vec<CitySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPrayerResponse {
    pub success: bool,
    pub city: String,
    pub country: String,
    pub next_prayer: Option<NextPrayerView>,
    pub timings: Timings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub const STATUS: u16 = 500;
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self {
            success: false,
            error: err.to_safe_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ErrorResponse>;

/// Query for the single-city view with the defaults filled in.
pub fn prayer_times_query(city: Option<&str>, country: Option<&str>, method: Option<u8>, school: Option<School>) -> TimingsQuery {
    TimingsQuery::new(
        Location::new(city.unwrap_or(DEFAULT_CITY), country.unwrap_or(DEFAULT_COUNTRY)),
        method.unwrap_or(DEFAULT_METHOD),
        school.unwrap_or(DEFAULT_SCHOOL),
    )
}

/// Today's six times for one location.
pub async fn prayer_times(provider: &dyn TimingsProvider, query: &TimingsQuery, now: NaiveDateTime) -> ApiResult<PrayerTimesResponse> {
    let data = provider.fetch_timings(query).await?;
    let schedule = to_schedule(&data, query.cache_key(now.date()))?;

    Ok(PrayerTimesResponse {
        success: true,
        city: query.location.city.clone(),
        country: query.location.country.clone(),
        school: query.school,
        school_value: query.school.value(),
        date: data.date.gregorian.date.clone(),
        gregorian_date: data.date.gregorian.display(),
        hijri_date: data.date.hijri.display(),
        prayers: schedule
            .prayers()
            .iter()
            .map(|p| PrayerEntry {
                name: p.name,
                ar: p.label().to_string(),
                time: p.time,
            })
            .collect(),
        timezone: data.meta.timezone.clone(),
        timestamp: Utc::now(),
    })
}

/// Next prayer and daily times for the featured cities, fetched concurrently.
/// One failing city fails the whole batch.
pub async fn prayer_times_multi(provider: &dyn TimingsProvider, now: NaiveDateTime) -> ApiResult<MultiCityResponse> {
    let requests = featured_locations().into_iter().map(|location| async move {
        let query = TimingsQuery::new(location, SUMMARY_METHOD, School::Shafi);
        let data = provider.fetch_timings(&query).await?;
        let schedule = to_schedule(&data, query.cache_key(now.date()))?;
        let timings = data.timings;
        Ok::<_, AppError>(CitySummary {
            next_prayer: next_prayer_view(&schedule, now),
            city: query.location.city,
            country: query.location.country,
            fajr: timings.fajr,
            dhuhr: timings.dhuhr,
            asr: timings.asr,
            maghrib: timings.maghrib,
            isha: timings.isha,
        })
    });

    let cities = try_join_all(requests).await?;
    Ok(MultiCityResponse {
        success: true,
        timestamp: Utc::now(),
        cities,
    })
}

/// Next of the five daily prayers, Sunrise excluded. Defaults to Tokyo.
pub async fn next_prayer(provider: &dyn TimingsProvider, location: Option<Location>, now: NaiveDateTime) -> ApiResult<NextPrayerResponse> {
    let location = location.unwrap_or_else(|| Location::new(NEXT_PRAYER_CITY, NEXT_PRAYER_COUNTRY));
    let query = TimingsQuery::new(location, SUMMARY_METHOD, School::Shafi);

    let data = provider.fetch_timings(&query).await?;
    let schedule = to_schedule(&data, query.cache_key(now.date()))?;

    Ok(NextPrayerResponse {
        success: true,
        next_prayer: next_prayer_view(&schedule, now),
        city: query.location.city,
        country: query.location.country,
        timings: data.timings,
    })
}

fn next_prayer_view(schedule: &PrayerSchedule, now: NaiveDateTime) -> Option<NextPrayerView> {
    let daily = schedule.only(&PrayerName::DAILY);
    resolve_next_prayer(&daily, TimeOfDay::from(now.time())).map(|next| NextPrayerView {
        name: next.prayer.name,
        time: next.prayer.time,
        tomorrow: next.is_tomorrow.then_some(true),
    })
}

/// Status code and body for a view result.
pub fn to_json<T: Serialize>(result: &ApiResult<T>) -> AppResult<(u16, String)> {
    Ok(match result {
        Ok(body) => (200, serde_json::to_string(body)?),
        Err(err) => (ErrorResponse::STATUS, serde_json::to_string(err)?),
    })
}
