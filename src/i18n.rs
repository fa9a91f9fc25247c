/// Card strings keyed by locale. English is the fallback for any gap.
const EN: &[(&str, &str)] = &[
    ("statcard_title", "{name}'s GitHub Stats"),
    ("statcard_totalstars", "Total Stars Earned"),
    ("statcard_commits", "Total Commits"),
    ("statcard_prs", "Total PRs"),
    ("statcard_prs_merged", "Total PRs Merged"),
    ("statcard_prs_merged_percentage", "Merged PRs Percentage"),
    ("statcard_issues", "Total Issues"),
    ("statcard_contribs", "Contributed to (last year)"),
    ("statcard_reviews", "Total PRs Reviewed"),
    ("statcard_discussions_started", "Total Discussions Started"),
    ("statcard_discussions_answered", "Total Discussions Answered"),
    ("contrib_title", "Top Contributions"),
    ("contrib_empty", "No contributions found"),
];

const DE: &[(&str, &str)] = &[
    ("statcard_title", "{name}s GitHub-Statistiken"),
    ("statcard_totalstars", "Insgesamt erhaltene Sterne"),
    ("statcard_commits", "Anzahl Commits"),
    ("statcard_prs", "PRs insgesamt"),
    ("statcard_issues", "Anzahl Issues"),
    ("statcard_contribs", "Beigetragen (letztes Jahr)"),
    ("contrib_title", "Top-Beiträge"),
    ("contrib_empty", "Keine Beiträge gefunden"),
];

const ES: &[(&str, &str)] = &[
    ("statcard_title", "Estadísticas de GitHub de {name}"),
    ("statcard_totalstars", "Total de estrellas"),
    ("statcard_commits", "Commits totales"),
    ("statcard_prs", "PRs totales"),
    ("statcard_issues", "Issues totales"),
    ("statcard_contribs", "Contribuciones (año pasado)"),
    ("contrib_title", "Principales contribuciones"),
    ("contrib_empty", "No se encontraron contribuciones"),
];

const FR: &[(&str, &str)] = &[
    ("statcard_title", "Statistiques GitHub de {name}"),
    ("statcard_totalstars", "Total d'étoiles"),
    ("statcard_commits", "Total des commits"),
    ("statcard_prs", "Total des PRs"),
    ("statcard_issues", "Total des issues"),
    ("statcard_contribs", "Contribué à (l'année dernière)"),
    ("contrib_title", "Principales contributions"),
    ("contrib_empty", "Aucune contribution trouvée"),
];

fn table(locale: &str) -> &'static [(&'static str, &'static str)] {
    match locale {
        "de" => DE,
        "es" => ES,
        "fr" => FR,
        _ => EN,
    }
}

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn is_supported(locale: &str) -> bool {
    matches!(locale, "en" | "de" | "es" | "fr")
}

/// Returns the string for `key`, empty when no table has it.
pub fn translate(key: &str, locale: &str) -> &'static str {
    lookup(table(locale), key)
        .or_else(|| lookup(EN, key))
        .unwrap_or_else(|| {
            tracing::debug!("missing translation for {key:?}");
            ""
        })
}

/// The stats card title for `name`.
pub fn stats_title(name: &str, locale: &str) -> String {
    if (locale == "en" || !is_supported(locale)) && name.ends_with('s') {
        return format!("{name}' GitHub Stats");
    }
    translate("statcard_title", locale).replace("{name}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english() {
        assert_eq!(translate("statcard_reviews", "de"), "Total PRs Reviewed");
        assert_eq!(translate("statcard_commits", "xx"), "Total Commits");
        assert_eq!(translate("statcard_commits", "fr"), "Total des commits");
    }

    #[test]
    fn english_title_handles_trailing_s() {
        assert_eq!(stats_title("Anna", "en"), "Anna's GitHub Stats");
        assert_eq!(stats_title("James", "en"), "James' GitHub Stats");
        assert_eq!(stats_title("James", "fr"), "Statistiques GitHub de James");
    }
}
