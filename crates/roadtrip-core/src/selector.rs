use crate::error::TripError;

/// Index of the highest speed. Ties keep the earliest segment.
pub fn argmax_speed(speeds: &[f64]) -> Result<usize, TripError> {
    let (first, rest) = speeds
        .split_first()
        .ok_or(TripError::EmptySequence("speed"))?;

    let mut best_index = 0;
    let mut best = *first;
    for (offset, &speed) in rest.iter().enumerate() {
        if speed > best || best.is_nan() {
            best_index = offset + 1;
            best = speed;
        }
    }
    Ok(best_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_of_ties_wins() {
        assert_eq!(argmax_speed(&[1.0, 3.0, 3.0, 2.0]).unwrap(), 1);
    }

    #[test]
    fn single_speed() {
        assert_eq!(argmax_speed(&[42.0]).unwrap(), 0);
    }

    #[test]
    fn negative_speeds_still_compare() {
        assert_eq!(argmax_speed(&[-5.0, -1.0, -3.0]).unwrap(), 1);
    }

    #[test]
    fn nan_never_wins() {
        assert_eq!(argmax_speed(&[f64::NAN, 2.0, 1.0]).unwrap(), 1);
        assert_eq!(argmax_speed(&[2.0, f64::NAN, 3.0]).unwrap(), 2);
    }

    #[test]
    fn empty_is_an_error() {
        assert_eq!(
            argmax_speed(&[]).unwrap_err(),
            TripError::EmptySequence("speed")
        );
    }
}
