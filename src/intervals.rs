/// Total length of the set union of `ranges`, each range a closed
/// `(start, end)` pair in microseconds.
///
/// Ranges are sorted by start only, ties keep their incoming order. A range
/// whose end falls short of the end of the range merged before it counts as
/// nested and adds nothing.
pub fn non_overlapping_duration(mut ranges: Vec<(i64, i64)>) -> i64 {
    ranges.sort_by_key(|range| range.0);

    let mut merged: Vec<(i64, i64)> = Vec::new();
    for (start, end) in ranges {
        let Some(&(prev_start, prev_end)) = merged.last() else {
            merged.push((start, end));
            continue;
        };
        if end < prev_end {
            // Fully contained in the previous range.
            continue;
        }
        if start > prev_end {
            merged.push((start, end));
        } else {
            merged.pop();
            merged.push((prev_start, end));
        }
    }

    merged.into_iter().map(|(start, end)| end - start).sum()
}
