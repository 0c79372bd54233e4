use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use arcana_catalog::{parse_flag, parse_flag_strict, Criteria, SortOrder, Spell};

use super::existing_store;
use crate::cli_types::FilterArgs;
use crate::table::{Column, Table};
use crate::CliError;

/// Find spells by criteria and print them as a numbered table.
pub(crate) fn run_find(
    db_path: &Path,
    filters: FilterArgs,
    sort: Option<String>,
    limit: Option<usize>,
    show: Option<usize>,
) -> Result<(), CliError> {
    let predicate = build_criteria(filters)
        .compile()
        .map_err(|e| CliError::other(e.to_string()))?;
    let sort = sort
        .map(|s| s.parse::<SortOrder>())
        .transpose()
        .map_err(|e| CliError::other(e.to_string()))?;

    let store = existing_store(db_path)?;
    let spells = store
        .query(&predicate, sort.as_ref(), limit)
        .map_err(|e| CliError::database(format!("Failed to query spells: {}", e)))?;

    if spells.is_empty() {
        log::info!("No spells match.");
        return Ok(());
    }

    spell_table(&spells).log();
    crate::log_blank();
    match sort {
        Some(sort) => log::info!("{} spell(s) found, sorted by {}.", spells.len(), sort),
        None => log::info!("{} spell(s) found.", spells.len()),
    }

    if let Some(n) = show {
        let spell = n
            .checked_sub(1)
            .and_then(|i| spells.get(i))
            .ok_or_else(|| {
                CliError::other(format!("--show {} is out of range (1-{})", n, spells.len()))
            })?;
        crate::log_blank();
        log_spell_detail(spell);
    }
    Ok(())
}

/// Map CLI filter options onto criteria. Flag values outside the known
/// true/false tokens count as false, with a warning.
pub(crate) fn build_criteria(filters: FilterArgs) -> Criteria {
    Criteria {
        book: filters.book,
        name: filters.name,
        category: filters.category,
        range: filters.range,
        duration: filters.duration,
        casting_time: filters.casting_time,
        description: filters.description,
        level: filters.level,
        ritual: filters.ritual.as_deref().map(|t| flag_value("ritual", t)),
        guild: filters.guild.as_deref().map(|t| flag_value("guild", t)),
        school: filters.school,
        caster: filters.caster,
        general: filters.general,
    }
}

fn flag_value(field: &str, token: &str) -> bool {
    parse_flag_strict(token).unwrap_or_else(|| {
        log::warn!("Unrecognized --{} value '{}', treating it as false", field, token);
        parse_flag(token)
    })
}

fn yes_no(flag: bool) -> String {
    (if flag { "Y" } else { "N" }).to_string()
}

fn spell_table(spells: &[Spell]) -> Table {
    let mut table = Table::new(vec![
        Column::right("N"),
        Column::left("Book").max(28),
        Column::left("Name").max(32),
        Column::right("Lvl"),
        Column::left("School"),
        Column::left("Ritual"),
        Column::left("Guild"),
        Column::left("Casters").max(40),
        Column::left("Components"),
    ]);
    for (idx, spell) in spells.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            spell.book.clone(),
            spell.name.clone(),
            spell.level.to_string(),
            spell.school.label().to_string(),
            yes_no(spell.ritual),
            yes_no(spell.guild),
            spell.casters_display(),
            spell.components_display(false),
        ]);
    }
    table
}

fn log_spell_detail(spell: &Spell) {
    log::info!("{}", spell.name.if_supports_color(Stdout, |t| t.red()));
    log::info!(
        "{}",
        format!(
            "level {} {}{}",
            spell.level,
            spell.school,
            if spell.ritual { " (ritual)" } else { "" }
        )
        .if_supports_color(Stdout, |t| t.italic()),
    );
    if let Some(category) = spell.category.as_deref().filter(|c| !c.is_empty()) {
        log::info!("Category: {}", category);
    }
    log_field("Book", &spell.book);
    log_field("Range", &spell.range);
    log_field("Duration", &spell.duration);
    log_field("Casting Time", &spell.casting_time);
    log_field("Components", &spell.components_display(true));
    log_field("Casters", &spell.casters_display());
    crate::log_blank();
    for line in spell.description.lines() {
        log::info!("{}", line);
    }
}

fn log_field(name: &str, value: &str) {
    log::info!(
        "{} {}",
        format!("{name}:").if_supports_color(Stdout, |t| t.bold()),
        value
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_map_onto_criteria() {
        let criteria = build_criteria(FilterArgs {
            name: Some("animal".into()),
            level: Some("(1, 3)".into()),
            ritual: Some("Yes".into()),
            guild: Some("maybe".into()),
            ..FilterArgs::default()
        });
        assert_eq!(criteria.name.as_deref(), Some("animal"));
        assert_eq!(criteria.level.as_deref(), Some("(1, 3)"));
        assert_eq!(criteria.ritual, Some(true));
        assert_eq!(criteria.guild, Some(false));
        assert!(criteria.book.is_none());
    }

    #[test]
    fn no_filters_is_empty_criteria() {
        assert!(build_criteria(FilterArgs::default()).is_empty());
    }
}
