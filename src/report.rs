use crate::engine::Forecast;

/// Print the forecast summary table.
pub fn print_table(forecast: &Forecast, series_len: usize) {
    let s = &forecast.statistics;

    println!("\n{}", "═".repeat(52));
    println!(
        "  Monte Carlo Forecast — {} ({} simulations)",
        forecast.method.display_name(),
        forecast.simulation_count
    );
    println!("{}", "═".repeat(52));
    println!(
        "  {} observations, last = {:.4}",
        series_len, forecast.last_observation
    );
    println!("  {}", "─".repeat(36));

    let rows = [
        ("mean", s.mean),
        ("median", s.median),
        ("p10", s.p10),
        ("p25", s.p25),
        ("p75", s.p75),
        ("p90", s.p90),
    ];
    for (label, value) in rows {
        println!("  {:>12}  {:>14.4}", label, value);
    }
    match s.standard_deviation {
        Some(std) => println!("  {:>12}  {:>14.4}", "std", std),
        None => println!("  {:>12}  {:>14}", "std", "undefined"),
    }
    println!("{}", "═".repeat(52));
}
