use crate::model::{DesktopState, WindowStatus};

pub(super) fn list(state: &DesktopState) -> String {
    state
        .windows
        .iter()
        .filter(|window| window.status != WindowStatus::Closed)
        .map(|window| window.summary_line())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::DesktopConfig;
    use crate::runtime_context::DesktopRuntime;

    #[test]
    fn lists_live_windows_in_registry_order() {
        let mut runtime = DesktopRuntime::new(DesktopConfig::default());
        runtime.open_window("terminal", None);
        let files = runtime.open_window("files", None).expect("files");
        runtime.minimize_window(&files);

        assert_eq!(
            list(runtime.state()),
            "win-1: Terminal (100,50) 400x300 [open]\nwin-2: Files (130,80) 400x300 [minimized]"
        );
    }

    #[test]
    fn empty_registry_lists_nothing() {
        assert_eq!(list(&DesktopState::default()), "");
    }
}
