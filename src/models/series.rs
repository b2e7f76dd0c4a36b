use chrono::{Local, NaiveDateTime, SubsecRound, TimeDelta, Timelike};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::models::metric::base_range_for;
use crate::models::request::GenerationRequest;

pub const DAILY_CYCLE_AMPLITUDE: f64 = 5.0;
pub const WEEKLY_TREND_AMPLITUDE: f64 = 2.0;
pub const NOISE_AMPLITUDE: f64 = 3.0;

const MICROSECONDS_PER_DAY: i64 = 86_400_000_000;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub timestamp: String,
    pub value: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesResponse {
    pub city: String,
    pub metric: String,
    pub data: Vec<DataPoint>,
    pub total_points: usize,
}

/// Generate a series ending at the current local time.
pub fn generate(request: &GenerationRequest) -> SeriesResponse {
    let end_time = Local::now().naive_local().trunc_subsecs(6);
    generate_series(request, end_time, &mut rand::rng())
}

/// Generate `days * points_per_day` points covering the `days` leading up to
/// `end_time`.
///
/// Every point shares one base value drawn from the metric's base range. On
/// top of it sit a daily sine cycle, a weekly sine trend and independent
/// uniform noise per point. The result is clamped to the base range widened by
/// [`RANGE_MARGIN`](crate::models::metric::RANGE_MARGIN) and rounded to two
/// decimals.
pub fn generate_series<R: Rng>(
    request: &GenerationRequest,
    end_time: NaiveDateTime,
    rng: &mut R,
) -> SeriesResponse {
    let range = base_range_for(&request.metric);
    let total_points = request.total_points();
    let points_per_day = request.points_per_day as f64;

    let start_time = end_time - TimeDelta::days(request.days as i64);
    let interval = point_interval(request.days, total_points);

    let base_value = rng.random_range(range.min..=range.max);

    let data: Vec<DataPoint> = (0..total_points)
        .map(|i| {
            let current_time = start_time + interval * i as i32;
            let daily_cycle = DAILY_CYCLE_AMPLITUDE
                * (2.0 * PI * (i % request.points_per_day as usize) as f64 / points_per_day).sin();
            let weekly_trend =
                WEEKLY_TREND_AMPLITUDE * (2.0 * PI * i as f64 / (points_per_day * 7.0)).sin();
            let random_noise = rng.random_range(-NOISE_AMPLITUDE..=NOISE_AMPLITUDE);

            let value = (base_value + daily_cycle + weekly_trend + random_noise)
                .clamp(range.lower_bound(), range.upper_bound());
            DataPoint {
                timestamp: isoformat(current_time),
                value: round_to_hundredths(value),
            }
        })
        .collect();

    log::debug!(
        "Generated {} {} points for {}",
        data.len(),
        request.metric,
        request.city
    );

    SeriesResponse {
        city: title_case(&request.city),
        metric: request.metric.to_lowercase(),
        total_points: data.len(),
        data,
    }
}

/// Spacing between points: `days` divided evenly over `total_points`, rounded
/// to the nearest microsecond with ties going to even.
fn point_interval(days: u32, total_points: usize) -> TimeDelta {
    let span = days as i64 * MICROSECONDS_PER_DAY;
    let divisor = total_points as i64;
    let mut quotient = span / divisor;
    let remainder = span % divisor;
    if 2 * remainder > divisor || (2 * remainder == divisor && quotient % 2 == 1) {
        quotient += 1;
    }
    TimeDelta::microseconds(quotient)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// ISO-8601 without a timezone. Fractional seconds are printed with six
/// digits, and only when non-zero.
pub fn isoformat(time: NaiveDateTime) -> String {
    let micros = time.nanosecond() / 1_000;
    if micros == 0 {
        time.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        format!("{}.{:06}", time.format("%Y-%m-%dT%H:%M:%S"), micros)
    }
}

/// Titlecase every cased character that does not follow another cased
/// character, lowercase the rest. Uncased characters (digits, punctuation,
/// most CJK) break words without being changed.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_cased = false;
    for c in text.chars() {
        if previous_is_cased {
            result.extend(c.to_lowercase());
        } else {
            push_titlecase(&mut result, c);
        }
        previous_is_cased = is_cased(c);
    }
    result
}

// Latin titlecase digraphs (Lt). Greek titlecase letters with iota
// subscript are not covered.
fn is_titlecase_letter(c: char) -> bool {
    matches!(c, '\u{01C5}' | '\u{01C8}' | '\u{01CB}' | '\u{01F2}')
}

fn is_cased(c: char) -> bool {
    c.is_lowercase() || c.is_uppercase() || is_titlecase_letter(c)
}

/// Titlecase mapping where it differs from the uppercase one, otherwise
/// uppercase.
fn push_titlecase(result: &mut String, c: char) {
    let titlecase = match c {
        'ß' => "Ss",
        '\u{01C4}'..='\u{01C6}' => "\u{01C5}",
        '\u{01C7}'..='\u{01C9}' => "\u{01C8}",
        '\u{01CA}'..='\u{01CC}' => "\u{01CB}",
        '\u{01F1}'..='\u{01F3}' => "\u{01F2}",
        'ﬀ' => "Ff",
        'ﬁ' => "Fi",
        'ﬂ' => "Fl",
        'ﬃ' => "Ffi",
        'ﬄ' => "Ffl",
        'ﬅ' | 'ﬆ' => "St",
        _ => {
            result.extend(c.to_uppercase());
            return;
        }
    };
    result.push_str(titlecase);
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn request(city: &str, metric: &str, days: u32, points_per_day: u32) -> GenerationRequest {
        GenerationRequest {
            city: city.to_string(),
            metric: metric.to_string(),
            days,
            points_per_day,
        }
    }

    fn end_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_micro_opt(12, 30, 0, 250_000)
            .unwrap()
    }

    fn parse(timestamp: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f").unwrap()
    }

    #[test]
    fn test_point_count() {
        let mut rng = StdRng::seed_from_u64(1);
        for (days, points_per_day) in [(1, 1), (1, 2), (7, 24), (30, 7), (365, 144)] {
            let series = generate_series(
                &request("x", "temperature", days, points_per_day),
                end_time(),
                &mut rng,
            );
            assert_eq!(series.total_points, (days * points_per_day) as usize);
            assert_eq!(series.data.len(), series.total_points);
        }
    }

    #[test]
    fn test_timestamps_evenly_spaced() {
        let mut rng = StdRng::seed_from_u64(2);
        let series = generate_series(&request("x", "pressure", 3, 48), end_time(), &mut rng);
        let times: Vec<NaiveDateTime> = series.data.iter().map(|p| parse(&p.timestamp)).collect();

        assert_eq!(times[0], end_time() - TimeDelta::days(3));
        assert_eq!(times[times.len() - 1], end_time() - TimeDelta::minutes(30));
        for pair in times.windows(2) {
            assert_eq!(pair[1] - pair[0], TimeDelta::minutes(30));
        }
    }

    #[test]
    fn test_uneven_interval_rounds_to_microseconds() {
        // One week over 7 * 7 points does not divide into whole microseconds.
        let interval = point_interval(7, 49);
        assert_eq!(interval, TimeDelta::microseconds(12_342_857_143));
        assert_eq!(point_interval(1, 144), TimeDelta::minutes(10));
        assert_eq!(point_interval(365, 365), TimeDelta::days(1));
    }

    #[test]
    fn test_values_within_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for (metric, low, high) in [
            ("temperature", 5.0, 45.0),
            ("humidity", 20.0, 100.0),
            ("pressure", 970.0, 1040.0),
            ("wind_speed", -10.0, 35.0),
            ("rainfall", -10.0, 20.0),
            ("something_else", -10.0, 110.0),
        ] {
            for _ in 0..20 {
                let series = generate_series(&request("x", metric, 7, 24), end_time(), &mut rng);
                for point in &series.data {
                    assert!(
                        point.value >= low && point.value <= high,
                        "{metric}: {} outside [{low}, {high}]",
                        point.value
                    );
                }
            }
        }
    }

    #[test]
    fn test_values_rounded_to_two_decimals() {
        let mut rng = StdRng::seed_from_u64(4);
        let series = generate_series(&request("x", "humidity", 2, 24), end_time(), &mut rng);
        for point in &series.data {
            let scaled = point.value * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-6, "{}", point.value);
        }
    }

    #[test]
    fn test_echo_fields() {
        let mut rng = StdRng::seed_from_u64(5);
        let series = generate_series(&request("nEW yORK", "HUMIDITY", 1, 2), end_time(), &mut rng);
        assert_eq!(series.city, "New York");
        assert_eq!(series.metric, "humidity");
        assert_eq!(series.total_points, 2);
    }

    #[test]
    fn test_same_seed_same_series() {
        let a = generate_series(
            &request("x", "rainfall", 2, 12),
            end_time(),
            &mut StdRng::seed_from_u64(6),
        );
        let b = generate_series(
            &request("x", "rainfall", 2, 12),
            end_time(),
            &mut StdRng::seed_from_u64(6),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_ends_near_now() {
        let before = Local::now().naive_local();
        let series = generate(&request("x", "temperature", 1, 24));
        let after = Local::now().naive_local();
        let first = parse(&series.data[0].timestamp);
        let last = parse(&series.data[23].timestamp);
        assert!(first >= before - TimeDelta::days(1) - TimeDelta::milliseconds(1));
        assert!(first <= after - TimeDelta::days(1));
        assert!(last <= after - TimeDelta::hours(1));
        assert!(last >= before - TimeDelta::hours(1) - TimeDelta::milliseconds(1));
    }

    #[test]
    fn test_isoformat() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(
            isoformat(date.and_hms_opt(7, 8, 9).unwrap()),
            "2024-01-05T07:08:09"
        );
        assert_eq!(
            isoformat(date.and_hms_micro_opt(7, 8, 9, 42).unwrap()),
            "2024-01-05T07:08:09.000042"
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("london"), "London");
        assert_eq!(title_case("LONDON"), "London");
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("o'NEIL"), "O'Neil");
        assert_eq!(title_case("san-josé"), "San-José");
        assert_eq!(title_case("area51city"), "Area51City");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_uncased_characters_break_words() {
        assert_eq!(title_case("东京tokyo"), "东京Tokyo");
        assert_eq!(title_case("tokyo东京tokyo"), "Tokyo东京Tokyo");
        assert_eq!(title_case("st. petersburg"), "St. Petersburg");
    }

    #[test]
    fn test_title_case_uses_titlecase_mapping() {
        assert_eq!(title_case("ß"), "Ss");
        assert_eq!(title_case("straße"), "Straße");
        assert_eq!(title_case("ǆemal"), "ǅemal");
        assert_eq!(title_case("ǄEMAL"), "ǅemal");
        assert_eq!(title_case("ﬁnland"), "Finland");
    }
}
