use textplots::{Chart, Plot, Shape};
use threatfeed_core::RowBatch;

use crate::{cli::Config, CLIErr};

use super::CliOutput;

pub struct Graphical;

impl CliOutput for Graphical {
    fn output(batch: &RowBatch, config: &Config) -> Result<(), CLIErr> {
        if batch.column_index(&config.group_by).is_none() {
            return Err(CLIErr::UnknownColumnErr {
                column: config.group_by.clone(),
            });
        }

        println!("{} by \"{}\"", batch.len(), config.group_by);
        bar_chart(&batch.value_counts(&config.group_by));
        Ok(())
    }
}

/// Plots `counts` as bars in their given order, followed by a legend
/// mapping each bar position to its label.
pub fn bar_chart(counts: &[(String, usize)]) {
    if counts.is_empty() {
        return;
    }

    let bars = bar_points(counts);
    Chart::new(120, 40, 0.0, counts.len() as f32)
        .lineplot(&Shape::Bars(&bars))
        .display();

    for (position, (label, count)) in counts.iter().enumerate() {
        println!("{:>3}  {} ({})", position, label, count);
    }
}

fn bar_points(counts: &[(String, usize)]) -> Vec<(f32, f32)> {
    counts
        .iter()
        .enumerate()
        .map(|(position, (_, count))| (position as f32, *count as f32))
        .chain(std::iter::once((counts.len() as f32, 0.0)))
        .collect()
}
