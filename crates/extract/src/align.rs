use finlens_core::FiscalYear;

/// Pair the years found on a line with its amounts, by position.
///
/// - no amounts: nothing to pair
/// - no years: every amount is undated
/// - equal counts: left to right
/// - one year: applies to every amount
/// - more years than amounts: the right-most years are kept
/// - fewer (but several) years than amounts: the last year applies to every
///   amount. This is a guess and is known to misdate some rows.
pub fn assign_years_to_amounts(years: &[FiscalYear], amount_count: usize) -> Vec<Option<FiscalYear>> {
    if amount_count == 0 {
        return Vec::new();
    }
    match years {
        [] => vec![None; amount_count],
        _ if years.len() == amount_count => years.iter().copied().map(Some).collect(),
        [only] => vec![Some(*only); amount_count],
        _ if years.len() > amount_count => years[years.len() - amount_count..]
            .iter()
            .copied()
            .map(Some)
            .collect(),
        [.., last] => vec![Some(*last); amount_count],
    }
}
