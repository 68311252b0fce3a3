use tracing::warn;

use crate::error::TripError;
use crate::extractors::FuelPair;

/// Gallons burned on `segment`: fuel on leaving checkpoint `segment` minus
/// fuel on reaching the next one.
pub fn fuel_consumed(segment: usize, fuel_pairs: &[FuelPair]) -> Result<f64, TripError> {
    let next = segment + 1;
    let (Some(from), Some(to)) = (fuel_pairs.get(segment), fuel_pairs.get(next)) else {
        return Err(TripError::Index {
            what: "fuel pairs",
            index: next,
            len: fuel_pairs.len(),
        });
    };
    Ok(from.at_departure - to.at_arrival)
}

/// Fuel burned and miles per gallon over one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelEconomy {
    pub fuel_consumed_gal: f64,
    pub miles_per_gallon: f64,
}

pub fn fuel_economy(
    selected: usize,
    distances: &[f64],
    fuel_pairs: &[FuelPair],
) -> Result<FuelEconomy, TripError> {
    let consumed = fuel_consumed(selected, fuel_pairs)?;
    let miles = *distances.get(selected).ok_or(TripError::Index {
        what: "distances",
        index: selected,
        len: distances.len(),
    })?;

    if consumed == 0.0 {
        return Err(TripError::Division {
            what: "fuel consumed",
            segment: selected,
        });
    }
    if consumed < 0.0 {
        warn!(
            segment = selected,
            gallons = consumed,
            "fuel level rose over the selected segment"
        );
    }
    Ok(FuelEconomy {
        fuel_consumed_gal: consumed,
        miles_per_gallon: miles / consumed,
    })
}

/// Miles per gallon of the selected segment.
pub fn compute_mpg(
    selected: usize,
    distances: &[f64],
    fuel_pairs: &[FuelPair],
) -> Result<f64, TripError> {
    fuel_economy(selected, distances, fuel_pairs).map(|economy| economy.miles_per_gallon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumed_uses_departure_then_next_arrival() {
        let pairs = [FuelPair::new(20.0, 14.0), FuelPair::new(11.5, 16.0)];
        assert_eq!(fuel_consumed(0, &pairs).unwrap(), 2.5);
    }

    #[test]
    fn refuelling_gives_negative_mpg() {
        let pairs = [FuelPair::new(10.0, 8.0), FuelPair::new(12.0, 12.0)];
        let mpg = compute_mpg(0, &[40.0], &pairs).unwrap();
        assert_eq!(mpg, -10.0);
    }

    #[test]
    fn economy_reports_consumption_with_mpg() {
        let pairs = [FuelPair::new(20.0, 14.0), FuelPair::new(11.5, 16.0)];
        let economy = fuel_economy(0, &[75.0], &pairs).unwrap();
        assert_eq!(
            economy,
            FuelEconomy {
                fuel_consumed_gal: 2.5,
                miles_per_gallon: 30.0
            }
        );
    }

    #[test]
    fn distance_index_is_checked() {
        let pairs = [FuelPair::new(10.0, 10.0), FuelPair::new(8.0, 8.0)];
        let err = compute_mpg(0, &[], &pairs).unwrap_err();
        assert_eq!(
            err,
            TripError::Index {
                what: "distances",
                index: 0,
                len: 0
            }
        );
    }
}
