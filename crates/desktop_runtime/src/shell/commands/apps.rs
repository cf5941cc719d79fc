use crate::model::DesktopState;

pub(super) fn list(state: &DesktopState) -> String {
    state
        .installed_apps()
        .map(|app| format!("{}: {} - {}", app.id, app.name, app.description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesktopConfig;

    #[test]
    fn hidden_catalog_entries_are_not_listed() {
        let state = DesktopState {
            apps: DesktopConfig::default().apps,
            ..DesktopState::default()
        };
        let listing = list(&state);
        assert!(listing.starts_with("terminal: Terminal - "));
        assert_eq!(listing.lines().count(), 5);
        assert!(!listing.contains("properties"));
    }
}
