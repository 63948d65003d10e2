use arcana_core::spread::{SpreadLayout, all_spreads};
use colored::Colorize;

/// Prints the spread catalog in selector order.
pub fn list() {
    println!("{}", "=== Spreads ===".bright_magenta().bold());
    for spread in all_spreads() {
        let layout = match spread.layout {
            SpreadLayout::CelticCross => " (cross and staff)",
            SpreadLayout::Default => "",
        };
        println!(
            "{} {} - {} card(s){}",
            format!("{:<18}", spread.id.as_ref()).bright_cyan(),
            spread.display_name.bright_white(),
            spread.card_count,
            layout
        );
        println!("{}", format!("{:<18} {}", "", spread.position_labels.join(", ")).bright_black());
    }
}
