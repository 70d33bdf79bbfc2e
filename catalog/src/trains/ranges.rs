//! Compresses each line's assigned train numbers into a human-readable range
//! string plus the full listing, walking the number -> identifier map in
//! ascending numeric order.
//!
//! A range only ends when the identifier changes or the number crosses a
//! multiple-of-1000 boundary (the 1000 split is deliberate: e.g. 6xx suburban
//! runs and 6xxx night runs of the same line read better apart). Plain gaps
//! do NOT end a range, so a missing 408 between 407 and 409 of the same line
//! still reads "401-409".

use std::collections::BTreeMap;

use super::collect::TrainNumber;
use super::identify::RouteIdentifier;

pub struct NumberSummary {
    /// e.g. "401-409, 418-426, 429"
    pub ranges: String,
    /// every number, comma-joined with no spaces
    pub full: String,
}

pub fn summarize(
    by_number: &BTreeMap<TrainNumber, RouteIdentifier>,
) -> BTreeMap<RouteIdentifier, NumberSummary> {
    let mut ranges: BTreeMap<RouteIdentifier, Vec<(TrainNumber, TrainNumber)>> = BTreeMap::new();
    let mut numbers: BTreeMap<RouteIdentifier, Vec<TrainNumber>> = BTreeMap::new();

    // (identifier, start, last number seen) of the range being built
    let mut current: Option<(RouteIdentifier, TrainNumber, TrainNumber)> = None;
    for (&number, identifier) in by_number {
        numbers.entry(identifier.clone()).or_default().push(number);
        current = Some(match current {
            Some((prev_id, start, prev))
                if prev_id == *identifier && prev.0 / 1000 == number.0 / 1000 =>
            {
                (prev_id, start, number)
            }
            Some((prev_id, start, prev)) => {
                ranges.entry(prev_id).or_default().push((start, prev));
                (identifier.clone(), number, number)
            }
            None => (identifier.clone(), number, number),
        });
    }
    if let Some((prev_id, start, prev)) = current {
        ranges.entry(prev_id).or_default().push((start, prev));
    }

    ranges
        .into_iter()
        .map(|(identifier, ranges)| {
            let compact = ranges
                .iter()
                .map(|(start, end)| {
                    if start == end {
                        start.to_string()
                    } else {
                        format!("{start}-{end}")
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            let full = numbers[&identifier]
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(",");
            (
                identifier,
                NumberSummary {
                    ranges: compact,
                    full,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier(name: &str) -> RouteIdentifier {
        RouteIdentifier {
            line_ref: 4,
            from: name.to_string(),
            to: "X".to_string(),
        }
    }

    fn map(pairs: &[(u16, &str)]) -> BTreeMap<TrainNumber, RouteIdentifier> {
        pairs
            .iter()
            .map(|(n, name)| (TrainNumber(*n), identifier(name)))
            .collect()
    }

    #[test]
    fn ranges_split_where_another_line_interleaves() {
        // The classic shape: 408 doesn't exist at all (no split), 410-417 and
        // 427-428 belong to another line (splits)
        let mut pairs = vec![];
        for n in 401..=407 {
            pairs.push((n, "a"));
        }
        pairs.push((409, "a"));
        for n in 410..=417 {
            pairs.push((n, "b"));
        }
        for n in 418..=426 {
            pairs.push((n, "a"));
        }
        pairs.push((427, "b"));
        pairs.push((428, "b"));
        pairs.push((429, "a"));

        let summaries = summarize(&map(&pairs));
        let a = &summaries[&identifier("a")];
        assert_eq!(a.ranges, "401-409, 418-426, 429");
        assert_eq!(
            a.full,
            "401,402,403,404,405,406,407,409,418,419,420,421,422,423,424,425,426,429"
        );
        let b = &summaries[&identifier("b")];
        assert_eq!(b.ranges, "410-417, 427-428");
    }

    #[test]
    fn thousand_boundary_splits_even_with_one_line() {
        let summaries = summarize(&map(&[
            (998, "a"),
            (999, "a"),
            (1000, "a"),
            (1001, "a"),
        ]));
        assert_eq!(summaries[&identifier("a")].ranges, "998-999, 1000-1001");
        assert_eq!(summaries[&identifier("a")].full, "998,999,1000,1001");
    }

    #[test]
    fn singleton_number() {
        let summaries = summarize(&map(&[(429, "a")]));
        assert_eq!(summaries[&identifier("a")].ranges, "429");
        assert_eq!(summaries[&identifier("a")].full, "429");
    }
}
