use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

fn pass_counts(results: &[ScenarioResult]) -> (usize, usize, f64) {
    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    #[allow(clippy::cast_precision_loss)]
    let rate = if total == 0 {
        0.0
    } else {
        (passed as f64 / total as f64) * 100.0
    };
    (total, passed, rate)
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    let (total, passed, rate) = pass_counts(results);
    writeln!(out)?;
    writeln!(out, "{}", "📊 Simulation Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=============================".cyan())?;
    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {rate:.1}%")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{status} {} seed {}",
            result.strategy.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Days: {}/{} | profit {} | cash {}",
            result.days_played, result.days_planned, result.total_profit, result.final_cash
        )?;
        writeln!(
            out,
            "   Fulfillment {:.1}% | satisfaction {:.1}",
            result.mean_fulfillment, result.mean_satisfaction
        )?;
        if let Some(day) = result.bankrupt_on {
            writeln!(out, "   {}", format!("Bankrupt on day {day}").yellow())?;
        }
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    if let Some(best) = results.iter().max_by_key(|r| r.total_profit) {
        writeln!(out, "{}", "💰 Profit Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "================".yellow())?;
        writeln!(
            out,
            "Best: {} seed {} ({})",
            best.strategy.green(),
            best.seed,
            best.total_profit
        )?;
        if let Some(worst) = results.iter().min_by_key(|r| r.total_profit) {
            writeln!(
                out,
                "Worst: {} seed {} ({})",
                worst.strategy.yellow(),
                worst.seed,
                worst.total_profit
            )?;
        }
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
) -> Result<()> {
    let (total, passed, rate) = pass_counts(results);
    writeln!(out, "# Pizza Parlour Simulation Results\n")?;
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {rate:.1}%\n")?;

    writeln!(out, "## Runs\n")?;
    writeln!(
        out,
        "| Status | Strategy | Seed | Days | Profit | Final cash | Fulfillment |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "| {status} | {} | {} | {}/{} | {} | {} | {:.1}% |",
            result.strategy,
            result.seed,
            result.days_played,
            result.days_planned,
            result.total_profit,
            result.final_cash,
            result.mean_fulfillment
        )?;
    }

    let failing: Vec<&ScenarioResult> = results.iter().filter(|r| !r.passed).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for result in failing {
            writeln!(out, "### {} seed {}\n", result.strategy, result.seed)?;
            for failure in &result.failures {
                writeln!(out, "- {failure}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// One row per simulated day across all runs.
pub fn generate_csv_report<W: Write + ?Sized>(out: &mut W, results: &[ScenarioResult]) -> Result<()> {
    writeln!(
        out,
        "strategy,seed,day,price,order_cost,expected_arrivals,spawned,dropped,served,missed,abandoned,stockouts,revenue,costs,profit,fulfillment,satisfaction,cash_after"
    )?;
    for result in results {
        for day in &result.days {
            writeln!(
                out,
                "{},{},{},{:.2},{:.2},{},{},{},{},{},{},{},{:.2},{:.2},{:.2},{:.2},{},{:.2}",
                result.strategy,
                result.seed,
                day.day,
                day.price.as_dollars(),
                day.order_cost.as_dollars(),
                day.expected_arrivals,
                day.spawned,
                day.dropped,
                day.served,
                day.missed,
                day.abandoned,
                day.stockouts,
                day.revenue.as_dollars(),
                day.costs.as_dollars(),
                day.profit.as_dollars(),
                day.fulfillment,
                day.satisfaction,
                day.cash_after.as_dollars()
            )?;
        }
    }
    Ok(())
}
