use gtfs::{orig, StopID};

/// Contract violations in the train data. Each one is fatal for the line
/// family (ref bucket) it occurred in, but must not abort the whole import:
/// the pipeline logs it, drops that bucket, and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("trip {trip:?} repeats stop_sequence {position}")]
    MalformedSequence { trip: orig::TripID, position: u32 },

    /// Circular runs are legal GTFS, but the merge passes assume loop-free
    /// paths, so a trip visiting the same stop twice cannot be reconciled.
    #[error("trip {trip:?} visits stop {stop:?} more than once")]
    LoopedSequence { trip: orig::TripID, stop: StopID },

    #[error("trip {trip:?} has headsign {headsign:?}, expected a 1-4 digit train number")]
    InvalidTrainNumber { trip: orig::TripID, headsign: String },

    #[error("sequences order their shared stops differently: {a:?} vs {b:?}")]
    InconsistentOrder { a: Vec<StopID>, b: Vec<StopID> },

    #[error("no known sequence orders the divergent stops {stops:?}")]
    NoWitnessSequence { stops: Vec<StopID> },

    #[error("two distinct routes with ref {line_ref} both read {from} -> {to}")]
    AmbiguousIdentifier {
        line_ref: u8,
        from: String,
        to: String,
    },
}
