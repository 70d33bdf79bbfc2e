//! Builds one ordered, duplicate-free stop sequence per train trip, oriented
//! so that all sequences of a line family face the same direction, and buckets
//! the trips by their line family ("ref", the hundreds digit of the train
//! number).

use std::collections::BTreeSet;
use std::fmt;

use gtfs::{orig, StopID, StopTime, GTFS};

use super::error::TrainError;

/// An ordered list of stops with no repeats, as one trip runs it.
pub type Sequence = Vec<StopID>;

/// The 1-4 digit number from a train trip's headsign, uniquely labelling one
/// scheduled run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrainNumber(pub u16);

impl TrainNumber {
    /// The line-family bucket: the hundreds digit. Trips with different refs
    /// are never merged together.
    pub fn line_ref(self) -> u8 {
        ((self.0 / 100) % 10) as u8
    }
}

impl fmt::Display for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct TrainTrip {
    pub trip: orig::TripID,
    pub route: orig::RouteID,
    pub number: TrainNumber,
    pub line_ref: u8,
    pub outbound: bool,
    /// Direction-normalized: inbound trips are already reversed.
    pub sequence: Sequence,
}

pub struct Collection {
    pub trips: Vec<TrainTrip>,
    /// Line families that contained a data-contract violation. Everything in
    /// them is unusable; the rest of the import continues without them.
    pub poisoned: BTreeSet<u8>,
}

pub fn collect(gtfs: &GTFS) -> Collection {
    let mut trips = Vec::new();
    let mut poisoned = BTreeSet::new();

    for trip in &gtfs.trips {
        let stations = trip
            .stop_times
            .iter()
            .filter(|st| gtfs.stop(st.stop_id).is_train_station())
            .count();
        if stations == 0 {
            // Not a train
            continue;
        }
        if stations < trip.stop_times.len() {
            // Dropping these is a deliberate divergence from projecting the
            // trip down to its stations, so make it loud
            error!(
                "Trip {:?} mixes train stations and street stops; skipping it",
                trip.orig_id
            );
            continue;
        }

        let number = match parse_train_number(&trip.orig_id, trip.headsign.as_deref()) {
            Ok(n) => n,
            Err(err) => {
                // No train number means no ref bucket to poison; losing just
                // this trip is the best we can do.
                warn!("{err}");
                continue;
            }
        };
        let line_ref = number.line_ref();

        let sequence = match build_sequence(&trip.orig_id, &trip.stop_times) {
            Ok(seq) => seq,
            Err(err) => {
                error!("Trains with ref {line_ref}: {err}");
                poisoned.insert(line_ref);
                continue;
            }
        };

        trips.push(TrainTrip {
            trip: trip.orig_id.clone(),
            route: trip.route_id.clone(),
            number,
            line_ref,
            outbound: trip.outbound_direction,
            sequence: orient(sequence, trip.outbound_direction),
        });
    }

    info!(
        "Collected {} train trips, {} poisoned refs",
        trips.len(),
        poisoned.len()
    );
    Collection { trips, poisoned }
}

pub fn parse_train_number(
    trip: &orig::TripID,
    headsign: Option<&str>,
) -> Result<TrainNumber, TrainError> {
    let headsign = headsign.unwrap_or("");
    let valid = !headsign.is_empty()
        && headsign.len() <= 4
        && headsign.bytes().all(|b| b.is_ascii_digit());
    if !valid {
        return Err(TrainError::InvalidTrainNumber {
            trip: trip.clone(),
            headsign: headsign.to_string(),
        });
    }
    Ok(TrainNumber(headsign.parse().unwrap()))
}

/// Sorts the raw (stop_sequence, stop_id) pairs into the trip's path. A
/// repeated stop_sequence means the feed contradicts itself about this trip;
/// a repeated stop_id means a circular run, which the merge passes can't
/// represent.
pub fn build_sequence(trip: &orig::TripID, stop_times: &[StopTime]) -> Result<Sequence, TrainError> {
    let mut by_position = std::collections::BTreeMap::new();
    let mut seen = BTreeSet::new();
    for st in stop_times {
        if by_position.insert(st.stop_sequence, st.stop_id).is_some() {
            return Err(TrainError::MalformedSequence {
                trip: trip.clone(),
                position: st.stop_sequence,
            });
        }
        if !seen.insert(st.stop_id) {
            return Err(TrainError::LoopedSequence {
                trip: trip.clone(),
                stop: st.stop_id,
            });
        }
    }
    Ok(by_position.into_values().collect())
}

/// Inbound trips run the same stops backwards; flip them so that first/last
/// and sub-sequence comparisons line up across a whole line family.
pub fn orient(mut sequence: Sequence, outbound: bool) -> Sequence {
    if !outbound {
        sequence.reverse();
    }
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtfs::CheapID;

    fn trip_id() -> orig::TripID {
        orig::TripID("t1".to_string())
    }

    fn stop(x: usize) -> StopID {
        StopID::new(x)
    }

    #[test]
    fn train_number_must_be_1_to_4_digits() {
        assert_eq!(
            parse_train_number(&trip_id(), Some("423")).unwrap(),
            TrainNumber(423)
        );
        assert_eq!(
            parse_train_number(&trip_id(), Some("1")).unwrap(),
            TrainNumber(1)
        );
        assert_eq!(
            parse_train_number(&trip_id(), Some("9999")).unwrap(),
            TrainNumber(9999)
        );
        for bad in ["", "12345", "4a3", "-12", " 42", "ירושלים"] {
            assert!(parse_train_number(&trip_id(), Some(bad)).is_err(), "{bad:?}");
        }
        assert!(parse_train_number(&trip_id(), None).is_err());
    }

    #[test]
    fn line_ref_is_the_hundreds_digit() {
        assert_eq!(TrainNumber(423).line_ref(), 4);
        assert_eq!(TrainNumber(1423).line_ref(), 4);
        assert_eq!(TrainNumber(99).line_ref(), 0);
        assert_eq!(TrainNumber(6001).line_ref(), 0);
    }

    #[test]
    fn sequence_sorted_by_position() {
        let stop_times = vec![
            StopTime {
                stop_sequence: 3,
                stop_id: stop(30),
            },
            StopTime {
                stop_sequence: 1,
                stop_id: stop(10),
            },
            StopTime {
                stop_sequence: 2,
                stop_id: stop(20),
            },
        ];
        assert_eq!(
            build_sequence(&trip_id(), &stop_times).unwrap(),
            vec![stop(10), stop(20), stop(30)]
        );
    }

    #[test]
    fn duplicate_position_is_malformed() {
        let stop_times = vec![
            StopTime {
                stop_sequence: 1,
                stop_id: stop(10),
            },
            StopTime {
                stop_sequence: 1,
                stop_id: stop(20),
            },
        ];
        match build_sequence(&trip_id(), &stop_times) {
            Err(TrainError::MalformedSequence { position: 1, .. }) => {}
            x => panic!("expected MalformedSequence, got {x:?}"),
        }
    }

    #[test]
    fn circular_trip_is_rejected() {
        // Same stop under two distinct positions: a loop, not a linear path
        let stop_times = vec![
            StopTime {
                stop_sequence: 1,
                stop_id: stop(10),
            },
            StopTime {
                stop_sequence: 2,
                stop_id: stop(20),
            },
            StopTime {
                stop_sequence: 3,
                stop_id: stop(10),
            },
        ];
        match build_sequence(&trip_id(), &stop_times) {
            Err(TrainError::LoopedSequence { stop: s, .. }) => assert_eq!(s, stop(10)),
            x => panic!("expected LoopedSequence, got {x:?}"),
        }
    }

    #[test]
    fn orienting_twice_restores_the_original() {
        let seq = vec![stop(1), stop(2), stop(3)];
        assert_eq!(orient(seq.clone(), true), seq);
        let reversed = orient(seq.clone(), false);
        assert_eq!(reversed, vec![stop(3), stop(2), stop(1)]);
        assert_eq!(orient(reversed, false), seq);
    }
}
