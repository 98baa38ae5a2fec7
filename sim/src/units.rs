//! A lightweight uom-ish library. The real thing breaks rust-analyzer.
#![allow(dead_code)]

use std::ops::{Add, AddAssign, Div, Mul, Sub};

use serde::Serialize;

#[derive(Copy, Clone, PartialEq, PartialOrd)]
pub struct Time {
    seconds: f64,
}

impl std::fmt::Debug for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} s", self.seconds)
    }
}

impl Time {
    pub fn from_hours(hours: f64) -> Time {
        Self::from_minutes(hours * 60.0)
    }

    pub fn from_minutes(minutes: f64) -> Time {
        Self::from_secs(minutes * 60.0)
    }

    pub const fn from_secs(seconds: f64) -> Time {
        Time { seconds }
    }

    pub fn as_secs(&self) -> f64 {
        self.seconds
    }

    pub fn abs(&self) -> Time {
        Time {
            seconds: self.seconds.abs(),
        }
    }
}

impl Add<Time> for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Self::Output {
        Time::from_secs(self.as_secs() + rhs.as_secs())
    }
}

impl AddAssign<Time> for Time {
    fn add_assign(&mut self, rhs: Time) {
        self.seconds += rhs.as_secs()
    }
}

impl Sub<Time> for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Self::Output {
        Time::from_secs(self.as_secs() - rhs.as_secs())
    }
}

impl Div<Time> for Time {
    type Output = Ratio;

    fn div(self, rhs: Time) -> Self::Output {
        Ratio::from_f64(self.as_secs() / rhs.as_secs())
    }
}

impl Mul<f64> for Time {
    type Output = Time;

    fn mul(self, rhs: f64) -> Self::Output {
        Time::from_secs(self.as_secs() * rhs)
    }
}

impl Mul<Ratio> for Time {
    type Output = Time;

    fn mul(self, rhs: Ratio) -> Self::Output {
        Time::from_secs(self.as_secs() * rhs.as_f64())
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd)]
pub struct Angle {
    degrees: f64,
}

impl std::fmt::Debug for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees)
    }
}

impl Angle {
    pub fn from_degrees(degrees: f64) -> Angle {
        Angle { degrees }
    }

    pub fn from_radians(radians: f64) -> Angle {
        Angle {
            degrees: radians.to_degrees(),
        }
    }

    pub fn as_degrees(&self) -> f64 {
        self.degrees
    }

    pub fn as_radians(&self) -> f64 {
        self.degrees.to_radians()
    }

    /// Reduce into [0, 360). Modulo rather than a single add/subtract so
    /// increments larger than a full revolution stay in range.
    pub fn wrapped_full_turn(&self) -> Angle {
        Angle {
            degrees: self.degrees.rem_euclid(360.0),
        }
    }
}

impl Add<Angle> for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Self::Output {
        Angle::from_degrees(self.as_degrees() + rhs.as_degrees())
    }
}

impl Sub<Angle> for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Self::Output {
        Angle::from_degrees(self.as_degrees() - rhs.as_degrees())
    }
}

#[derive(Copy, Clone, PartialEq, Serialize)]
pub struct AngularVelocity {
    radians_per_second: f64,
}

impl std::fmt::Debug for AngularVelocity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} °·s⁻¹", self.as_degrees_per_second())
    }
}

impl AngularVelocity {
    pub fn from_degrees_per_second(degrees_per_second: f64) -> AngularVelocity {
        AngularVelocity {
            radians_per_second: degrees_per_second.to_radians(),
        }
    }

    pub fn from_radians_per_second(radians_per_second: f64) -> AngularVelocity {
        AngularVelocity { radians_per_second }
    }

    pub fn as_degrees_per_second(&self) -> f64 {
        self.radians_per_second.to_degrees()
    }

    pub fn as_radians_per_second(&self) -> f64 {
        self.radians_per_second
    }
}

impl Mul<Time> for AngularVelocity {
    type Output = Angle;

    fn mul(self, rhs: Time) -> Self::Output {
        Angle::from_radians(self.as_radians_per_second() * rhs.as_secs())
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd, Serialize)]
pub struct Ratio {
    ratio: f64,
}

impl std::fmt::Debug for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ratio)
    }
}

impl Ratio {
    pub fn from_f64(ratio: f64) -> Ratio {
        Ratio { ratio }
    }

    pub fn as_f64(&self) -> f64 {
        self.ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn angle_wrap_stays_in_full_turn() {
        let wrapped = Angle::from_degrees(350.0 + 20.0).wrapped_full_turn();
        assert_relative_eq!(wrapped.as_degrees(), 10.0);

        let wrapped = Angle::from_degrees(10.0 - 20.0).wrapped_full_turn();
        assert_relative_eq!(wrapped.as_degrees(), 350.0);

        // Increments larger than one revolution reduce too
        let wrapped = Angle::from_degrees(10.0 + 4321.0).wrapped_full_turn();
        assert_relative_eq!(wrapped.as_degrees(), 4331.0 % 360.0);

        let wrapped = Angle::from_degrees(-725.0).wrapped_full_turn();
        assert!(wrapped.as_degrees() >= 0.0 && wrapped.as_degrees() < 360.0);
    }
}
