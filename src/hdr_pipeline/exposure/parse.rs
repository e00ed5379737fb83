/// Parses an exposure time written as a decimal (`"0.01"`) or a fraction
/// (`"1/250"`).
///
/// Returns `None` for anything that does not yield a positive, finite number
/// of seconds.
pub fn parse_exposure_time(value: &str) -> Option<f64> {
    let value = value.trim();
    let seconds = match value.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            let (num, den) = value.split_once('/')?;
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            num / den
        }
    };

    (seconds.is_finite() && seconds > 0.0).then_some(seconds)
}
