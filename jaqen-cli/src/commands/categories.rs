use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use jaqen_core::NationTable;

/// List every ethnic category (the image folder names) with its nation count.
pub(crate) fn run_categories() {
    let table = NationTable::new();
    let counts = table.category_counts();
    let total: usize = counts.iter().map(|(_, n)| n).sum();

    log::info!(
        "{}",
        "Ethnic categories (image folder names)".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    for (category, n) in counts {
        log::info!(
            "  {:<18} {:>3} nation(s)",
            category.if_supports_color(Stdout, |t| t.cyan()),
            n
        );
    }
    log::info!("");
    log::info!("{total} nations in the built-in table");
}
