//! Output formatting for CLI

use crate::pipeline::TrainingResult;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a rate in [0, 1] as a percentage with two decimals
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// The per-epoch progress line: `xx.xx% win, yy.yy% loss`
pub fn format_win_loss(win_rate: f64, loss_rate: f64) -> String {
    format!(
        "{} win, {} loss",
        format_percent(win_rate),
        format_percent(loss_rate)
    )
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, &str)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Print the win/draw/loss block of a result
pub fn print_result(result: &TrainingResult) {
    let total = format_number(result.total_games);
    let wins = format!("{} ({})", result.wins, format_percent(result.win_rate));
    let draws = format!("{} ({})", result.draws, format_percent(result.draw_rate));
    let losses = format!("{} ({})", result.losses, format_percent(result.loss_rate));
    print_stats_table(&[
        ("Total games", &total),
        ("Wins", &wins),
        ("Draws", &draws),
        ("Losses", &losses),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(199_000), "199,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_win_loss_line() {
        assert_eq!(format_win_loss(0.8765, 0.05), "87.65% win, 5.00% loss");
    }
}
