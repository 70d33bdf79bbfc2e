use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use gtfs::GTFS;

use super::collect::Sequence;
use super::error::TrainError;
use super::merge::Group;

/// The output identity of one canonical line: the line family plus the display
/// names of its two termini.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RouteIdentifier {
    pub line_ref: u8,
    pub from: String,
    pub to: String,
}

impl fmt::Display for RouteIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} -> {})", self.line_ref, self.from, self.to)
    }
}

/// Name each canonical group after its endpoints, then map every absorbed
/// original sequence back to that name. Two groups collapsing to the same
/// name would silently conflate two different lines, so that's an error.
pub fn assign(
    gtfs: &GTFS,
    line_ref: u8,
    groups: Vec<Group>,
) -> Result<BTreeMap<Sequence, RouteIdentifier>, TrainError> {
    let mut seen = BTreeSet::new();
    let mut by_sequence = BTreeMap::new();
    for group in groups {
        let identifier = RouteIdentifier {
            line_ref,
            from: gtfs.stop(group.sequence[0]).name.clone(),
            to: gtfs.stop(*group.sequence.last().unwrap()).name.clone(),
        };
        if !seen.insert(identifier.clone()) {
            return Err(TrainError::AmbiguousIdentifier {
                line_ref,
                from: identifier.from,
                to: identifier.to,
            });
        }
        for member in group.members {
            by_sequence.insert(member, identifier.clone());
        }
    }
    Ok(by_sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtfs::{orig, CheapID, Stop, StopID};
    use std::collections::BTreeMap;

    fn gtfs_with_stops(names: &[&str]) -> GTFS {
        let mut stops = BTreeMap::new();
        for (i, name) in names.iter().enumerate() {
            let id = StopID::new(i);
            stops.insert(
                id,
                Stop {
                    id,
                    orig_id: orig::StopID(format!("s{i}")),
                    name: name.to_string(),
                    description: String::new(),
                },
            );
        }
        GTFS {
            stops,
            routes: BTreeMap::new(),
            trips: Vec::new(),
            agencies: BTreeMap::new(),
        }
    }

    fn seq(stops: &[usize]) -> Sequence {
        stops.iter().map(|x| StopID::new(*x)).collect()
    }

    #[test]
    fn members_map_back_to_their_group() {
        let gtfs = gtfs_with_stops(&["Alef", "Bet", "Gimel"]);
        let groups = vec![Group {
            sequence: seq(&[0, 1, 2]),
            members: vec![seq(&[0, 1, 2]), seq(&[0, 2])],
        }];
        let map = assign(&gtfs, 4, groups).unwrap();
        let identifier = RouteIdentifier {
            line_ref: 4,
            from: "Alef".to_string(),
            to: "Gimel".to_string(),
        };
        assert_eq!(map.len(), 2);
        assert_eq!(map[&seq(&[0, 2])], identifier);
        assert_eq!(map[&seq(&[0, 1, 2])], identifier);
    }

    #[test]
    fn name_collision_between_groups_is_ambiguous() {
        // Stops 0 and 3 carry the same display name, so two different
        // physical lines read identically
        let gtfs = gtfs_with_stops(&["Alef", "Bet", "Gimel", "Alef"]);
        let groups = vec![
            Group {
                sequence: seq(&[0, 1, 2]),
                members: vec![seq(&[0, 1, 2])],
            },
            Group {
                sequence: seq(&[3, 2]),
                members: vec![seq(&[3, 2])],
            },
        ];
        match assign(&gtfs, 4, groups) {
            Err(TrainError::AmbiguousIdentifier { line_ref: 4, .. }) => {}
            x => panic!("expected AmbiguousIdentifier, got {x:?}"),
        }
    }
}
