use std::fmt;

/// Number of cities surveyed per run.
pub const CITY_COUNT: usize = 100;

/// Coordinates of the most populous cities, in ranking order.
pub type CityList = [Coordinate; CITY_COUNT];

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the geographic range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude {latitude} is outside [-90, 90]"));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude {longitude} is outside [-180, 180]"));
        }

        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Where On Earth ID handed out by the location search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationId(pub i64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Running sum and count of the temperatures collected so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    pub fn add(&mut self, reading: f64) {
        self.sum += reading;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, or `None` when nothing was added.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Outcome of one survey run.
#[derive(Debug, Clone)]
pub struct SurveyReport {
    pub country: String,
    pub unit: String,
    /// Cities returned by the ranking endpoint.
    pub cities: usize,
    /// Cities whose temperature made it into the mean.
    pub sampled: usize,
    /// Locations that had no temperature reading.
    pub skipped: Vec<LocationId>,
    pub mean: f64,
}

impl fmt::Display for SurveyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The average temperature in the {} most populous {} cities is: {:.2}{}",
            self.sampled, self.country, self.mean, self.unit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_rejects_out_of_range_values() {
        assert!(Coordinate::new(40.7, -74.0).is_ok());
        assert!(Coordinate::new(90.1, 0.0).unwrap_err().contains("latitude"));
        assert!(Coordinate::new(0.0, -180.5).unwrap_err().contains("longitude"));
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn accumulator_mean_is_none_when_empty() {
        let mut acc = Accumulator::default();
        assert_eq!(acc.mean(), None);

        acc.add(70.0);
        acc.add(72.0);
        assert_eq!(acc.count(), 2);
        assert_eq!(acc.mean(), Some(71.0));
    }

    #[test]
    fn report_renders_two_decimals() {
        let report = SurveyReport {
            country: "US".into(),
            unit: "C".into(),
            cities: 100,
            sampled: 97,
            skipped: vec![LocationId(1), LocationId(2), LocationId(3)],
            mean: 21.456,
        };

        assert_eq!(
            report.to_string(),
            "The average temperature in the 97 most populous US cities is: 21.46C"
        );
    }
}
