//! Static reference data: the curated timezone list and display names.

/// Timezones offered in pickers, UTC first, then roughly west to east.
static COMMON_TIMEZONES: &[&str] = &[
    "UTC",
    "Pacific/Honolulu",
    "America/Anchorage",
    "America/Los_Angeles",
    "America/Denver",
    "America/Phoenix",
    "America/Chicago",
    "America/Mexico_City",
    "America/New_York",
    "America/Toronto",
    "America/Bogota",
    "America/Caracas",
    "America/Halifax",
    "America/Santiago",
    "America/St_Johns",
    "America/Sao_Paulo",
    "America/Argentina/Buenos_Aires",
    "Atlantic/Azores",
    "Europe/London",
    "Europe/Lisbon",
    "Africa/Lagos",
    "Europe/Paris",
    "Europe/Berlin",
    "Europe/Madrid",
    "Europe/Rome",
    "Africa/Cairo",
    "Africa/Johannesburg",
    "Europe/Athens",
    "Europe/Istanbul",
    "Africa/Nairobi",
    "Europe/Moscow",
    "Asia/Riyadh",
    "Asia/Tehran",
    "Asia/Dubai",
    "Asia/Karachi",
    "Asia/Kolkata",
    "Asia/Kathmandu",
    "Asia/Dhaka",
    "Asia/Bangkok",
    "Asia/Jakarta",
    "Asia/Shanghai",
    "Asia/Singapore",
    "Asia/Manila",
    "Australia/Perth",
    "Asia/Tokyo",
    "Asia/Seoul",
    "Australia/Adelaide",
    "Australia/Brisbane",
    "Australia/Sydney",
    "Pacific/Auckland",
];

static DISPLAY_NAMES: &[(&str, &str)] = &[
    ("UTC", "Coordinated Universal Time"),
    ("Pacific/Honolulu", "Hawaii Time"),
    ("America/Anchorage", "Alaska Time"),
    ("America/Los_Angeles", "Pacific Time (US & Canada)"),
    ("America/Denver", "Mountain Time (US & Canada)"),
    ("America/Phoenix", "Arizona"),
    ("America/Chicago", "Central Time (US & Canada)"),
    ("America/Mexico_City", "Mexico City"),
    ("America/New_York", "Eastern Time (US & Canada)"),
    ("America/Toronto", "Eastern Time (Toronto)"),
    ("America/Bogota", "Bogota"),
    ("America/Caracas", "Caracas"),
    ("America/Halifax", "Atlantic Time (Canada)"),
    ("America/Santiago", "Santiago"),
    ("America/St_Johns", "Newfoundland"),
    ("America/Sao_Paulo", "Brasilia"),
    ("America/Argentina/Buenos_Aires", "Buenos Aires"),
    ("Atlantic/Azores", "Azores"),
    ("Europe/London", "London"),
    ("Europe/Lisbon", "Lisbon"),
    ("Africa/Lagos", "West Central Africa"),
    ("Europe/Paris", "Paris"),
    ("Europe/Berlin", "Berlin"),
    ("Europe/Madrid", "Madrid"),
    ("Europe/Rome", "Rome"),
    ("Africa/Cairo", "Cairo"),
    ("Africa/Johannesburg", "Johannesburg"),
    ("Europe/Athens", "Athens"),
    ("Europe/Istanbul", "Istanbul"),
    ("Africa/Nairobi", "Nairobi"),
    ("Europe/Moscow", "Moscow"),
    ("Asia/Riyadh", "Riyadh"),
    ("Asia/Tehran", "Tehran"),
    ("Asia/Dubai", "Abu Dhabi, Dubai"),
    ("Asia/Karachi", "Karachi"),
    ("Asia/Kolkata", "India Standard Time"),
    ("Asia/Kathmandu", "Kathmandu"),
    ("Asia/Dhaka", "Dhaka"),
    ("Asia/Bangkok", "Bangkok"),
    ("Asia/Jakarta", "Jakarta"),
    ("Asia/Shanghai", "Beijing, Shanghai"),
    ("Asia/Singapore", "Singapore"),
    ("Asia/Manila", "Manila"),
    ("Australia/Perth", "Perth"),
    ("Asia/Tokyo", "Tokyo"),
    ("Asia/Seoul", "Seoul"),
    ("Australia/Adelaide", "Adelaide"),
    ("Australia/Brisbane", "Brisbane"),
    ("Australia/Sydney", "Sydney, Melbourne"),
    ("Pacific/Auckland", "Auckland"),
];

/// The curated list of commonly offered timezones.
///
/// Always starts with `"UTC"`; the order is fixed.
pub fn get_common_timezones() -> &'static [&'static str] {
    COMMON_TIMEZONES
}

/// Human-readable name for a timezone identifier.
///
/// Identifiers outside the lookup table get their last path segment with
/// underscores replaced, so `America/Argentina/Ushuaia` becomes `Ushuaia`.
pub fn display_name(timezone: &str) -> String {
    if let Some((_, name)) = DISPLAY_NAMES.iter().find(|(id, _)| *id == timezone) {
        return (*name).to_string();
    }
    timezone
        .rsplit('/')
        .next()
        .unwrap_or(timezone)
        .replace('_', " ")
}
