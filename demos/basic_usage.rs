// ============================================================================
// Basic Usage Example
// ============================================================================

use period_algebra::prelude::*;

fn main() -> Result<(), PeriodError> {
    println!("=== Period Algebra Example ===\n");

    let algebra = create_from_config(AlgebraConfig::modern())?;
    println!("Using the {} span API\n", algebra.backend_name());

    // Hourly period; converting floors both ends to the hour
    let shift = RollingPeriod::create_with_interval("2019-09-01 08:02", "2019-09-01 15:03", "1 hour")?;
    let span = algebra.to_span(&shift)?;
    println!("{shift}");
    println!("  as span: {span} ({} hours)\n", algebra.length(&shift)?);

    // Gap between two day periods
    let january = RollingPeriod::create("2018-01-01", "2018-01-10")?;
    let later = RollingPeriod::create("2018-01-15", "2018-01-31")?;
    if let Some(gap) = algebra.gap(&january, &later)? {
        println!("Gap: {gap}\n");
    }

    // Chunks of a quarter that fall inside each booking
    let quarter = RollingPeriod::create("2018-01-20", "2018-03-10")?;
    let bookings = [
        RollingPeriod::create("2018-01-01", "2018-01-31")?,
        RollingPeriod::create("2018-02-10", "2018-02-20")?,
        RollingPeriod::create("2018-03-01", "2018-03-31")?,
    ];
    println!("Booked parts of {quarter}:");
    for chunk in algebra.overlap_any(&quarter, &bookings)? {
        println!("  {chunk}");
    }

    // What is left once every booking is removed
    println!("\nFree parts of {quarter}:");
    for free in algebra.diff(&quarter, &bookings)? {
        println!("  {free}");
    }

    Ok(())
}
