use hifitime::{Duration, Epoch};
use std::str::FromStr;

use crate::{
    collaborators::Clock,
    constants::{JulianDate, J2000_JD, JDTOMJD, MJD},
    orrery_errors::OrreryError,
};

/// Transformation from an ISO 8601 date (YYYY-MM-ddTHH:mm:ss) to julian date (JD), UTC scale
///
/// Argument
/// --------
/// * `date`: a date string understood by hifitime
///
/// Return
/// ------
/// * the julian date, or [`OrreryError::InvalidDate`]
pub fn date_to_jd(date: &str) -> Result<JulianDate, OrreryError> {
    Epoch::from_str(date)
        .map(|epoch| epoch.to_jde_utc_days())
        .map_err(|_| OrreryError::InvalidDate(date.to_string()))
}

/// Transformation from julian date (JD) to modified julian date (MJD)
pub fn jd_to_mjd(jd: JulianDate) -> MJD {
    jd - JDTOMJD
}

/// Transformation from modified julian date (MJD) to julian date (JD)
pub fn mjd_to_jd(mjd: MJD) -> JulianDate {
    mjd + JDTOMJD
}

/// Game clock backed by a hifitime [`Epoch`].
///
/// The simulated time advances by the real elapsed time multiplied by `rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    epoch: Epoch,
    rate: f64,
    max_cull_distance: f64,
}

impl SimulationClock {
    /// Arguments
    /// ---------
    /// * `start`: julian date of the first frame
    /// * `rate`: simulated seconds per real second
    /// * `max_cull_distance`: far clipping distance of the camera, in scene units
    pub fn new(start: JulianDate, rate: f64, max_cull_distance: f64) -> Self {
        Self {
            epoch: Epoch::from_jde_utc(start),
            rate,
            max_cull_distance,
        }
    }

    /// Clock frozen at J2000.
    pub fn at_j2000(max_cull_distance: f64) -> Self {
        Self::new(J2000_JD, 0.0, max_cull_distance)
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    /// Advance by `real_elapsed` wall-clock time.
    pub fn advance(&mut self, real_elapsed: Duration) {
        self.epoch += real_elapsed * self.rate;
    }

    /// Jump to `time`.
    pub fn set_epoch(&mut self, time: JulianDate) -> Result<(), OrreryError> {
        if !time.is_finite() {
            return Err(OrreryError::InvalidEpoch(time));
        }
        self.epoch = Epoch::from_jde_utc(time);
        Ok(())
    }
}

impl Clock for SimulationClock {
    fn current_epoch(&self) -> JulianDate {
        self.epoch.to_jde_utc_days()
    }

    fn max_cull_distance(&self) -> f64 {
        self.max_cull_distance
    }
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_date_to_jd() {
        let jd = date_to_jd("2000-01-01T12:00:00 UTC").unwrap();
        assert_abs_diff_eq!(jd, J2000_JD, epsilon = 1e-6);
        assert_eq!(
            date_to_jd("not a date"),
            Err(OrreryError::InvalidDate("not a date".into()))
        );
    }

    #[test]
    fn test_julian_dates_are_utc() {
        // TT - UTC was 64.184 s at J2000
        let jd = date_to_jd("2000-01-01T12:00:00 TT").unwrap();
        assert_abs_diff_eq!(jd, J2000_JD - 64.184 / 86_400.0, epsilon = 1e-7);
    }

    #[test]
    fn test_mjd_round_trip() {
        assert_eq!(jd_to_mjd(2_400_000.5), 0.0);
        assert_eq!(mjd_to_jd(51544.5), J2000_JD);
    }

    #[test]
    fn test_clock_advances_with_rate() {
        // one simulated day per real second
        let mut clock = SimulationClock::new(J2000_JD, 86_400.0, 10_000.0);
        clock.advance(Duration::from_seconds(2.0));
        assert_abs_diff_eq!(clock.current_epoch(), J2000_JD + 2.0, epsilon = 1e-6);
        assert_eq!(clock.max_cull_distance(), 10_000.0);

        clock.set_epoch(2_460_000.5).unwrap();
        assert_abs_diff_eq!(clock.current_epoch(), 2_460_000.5, epsilon = 1e-6);
        assert!(clock.set_epoch(f64::INFINITY).is_err());
    }
}
