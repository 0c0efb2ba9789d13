use tracing::debug;

use super::controls::FilterSelection;
use crate::data::OptionTable;

/// Global filter stage shared by every view.
///
/// Keeps a row iff its date lies in `[start, end]` and its strike in
/// `[min, max]`, both inclusive. Row order is preserved, so applying the same
/// selection to the output returns it unchanged.
pub fn apply_filters(table: &OptionTable, selection: &FilterSelection) -> OptionTable {
    let filtered = table.filter(|r| {
        selection.dates.contains(r.date) && selection.strikes.contains(r.strike_price)
    });
    debug!(
        input_rows = table.len(),
        output_rows = filtered.len(),
        start = %selection.dates.start,
        end = %selection.dates.end,
        strike_min = selection.strikes.min,
        strike_max = selection.strikes.max,
        "applied global filters"
    );
    filtered
}
